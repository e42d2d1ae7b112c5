//! Validation of the constructed configuration
//!
//! Rules are declared on the target type with `validator` derives. All
//! violations are collected, including those of nested structs and list
//! elements, and reported together.

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::config::error::{ConfigError, ValidationIssue};

/// Options passed to the validation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Run the validation rules at all
    pub enabled: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Validate a constructed configuration instance
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] listing every violated rule.
pub fn validate<T: Validate>(instance: &T, options: &ValidationOptions) -> Result<(), ConfigError> {
    if !options.enabled {
        tracing::debug!("Configuration validation disabled");
        return Ok(());
    }

    match instance.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let issues = collect_issues(&errors);
            for issue in &issues {
                tracing::error!(field = %issue.field, code = %issue.code, "{}", issue.message);
            }
            Err(ConfigError::Validation { issues })
        }
    }
}

/// Flatten validator errors into a sorted list of issues
pub fn collect_issues(errors: &ValidationErrors) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    flatten(errors, "", &mut issues);
    issues.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    issues
}

fn flatten(errors: &ValidationErrors, prefix: &str, out: &mut Vec<ValidationIssue>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| format!("failed '{}' validation", error.code));
                    out.push(ValidationIssue {
                        field: path.clone(),
                        code: error.code.to_string(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Validate)]
    struct Endpoint {
        #[validate(length(min = 1, message = "Host must not be empty"))]
        host: String,
        #[validate(range(min = 1))]
        port: u16,
    }

    #[derive(Debug, Validate)]
    struct Settings {
        #[validate(length(min = 3, max = 20))]
        name: String,
        #[validate(nested)]
        primary: Endpoint,
        #[validate(nested)]
        replicas: Vec<Endpoint>,
    }

    fn endpoint(host: &str, port: u16) -> Endpoint {
        Endpoint {
            host: host.to_string(),
            port,
        }
    }

    #[test]
    fn test_valid_instance() {
        let settings = Settings {
            name: "service".to_string(),
            primary: endpoint("a", 80),
            replicas: vec![endpoint("b", 81)],
        };
        assert!(validate(&settings, &ValidationOptions::default()).is_ok());
    }

    #[test]
    fn test_collects_every_issue() {
        let settings = Settings {
            name: "x".to_string(),
            primary: endpoint("", 80),
            replicas: vec![endpoint("b", 81), endpoint("c", 0)],
        };

        let err = validate(&settings, &ValidationOptions::default()).unwrap_err();
        let ConfigError::Validation { issues } = err else {
            panic!("Expected Validation error");
        };

        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "primary.host", "replicas[1].port"]);
        assert_eq!(issues[1].message, "Host must not be empty");
        assert_eq!(issues[2].code, "range");
    }

    #[test]
    fn test_disabled_validation_skips_rules() {
        let settings = Settings {
            name: String::new(),
            primary: endpoint("", 0),
            replicas: Vec::new(),
        };
        let options = ValidationOptions { enabled: false };
        assert!(validate(&settings, &options).is_ok());
    }
}
