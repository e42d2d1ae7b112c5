//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::str::FromStr;

use crate::config::Format;

/// Validate an `EXT=FORMAT` parser mapping such as `.conf=yaml`
pub fn parse_parser_mapping(mapping: &str) -> Result<(String, Format), String> {
    let (extension, format) = mapping
        .split_once('=')
        .ok_or_else(|| format!("Parser mapping must look like EXT=FORMAT, got: '{}'", mapping))?;

    let extension = validate_extension(extension.trim())?;
    let format = Format::from_str(format.trim())?;
    Ok((extension, format))
}

/// Validate a file extension; the leading dot is added when missing
pub fn validate_extension(extension: &str) -> Result<String, String> {
    let bare = extension.strip_prefix('.').unwrap_or(extension);

    if bare.is_empty() {
        return Err("Extension cannot be empty".to_string());
    }

    if bare.contains('.') || bare.contains('/') || bare.contains(char::is_whitespace) {
        return Err(format!(
            "Extension must be a single suffix such as '.conf', got: '{}'",
            extension
        ));
    }

    Ok(format!(".{bare}"))
}

/// Validate an environment variable name (used by `--locator-var`)
pub fn validate_env_var_name(name: &str) -> Result<String, String> {
    if name.is_empty() {
        return Err("Variable name cannot be empty".to_string());
    }

    if name.contains('=') || name.contains('\0') {
        return Err(format!("Variable name cannot contain '=' or NUL: '{}'", name));
    }

    Ok(name.to_string())
}

/// Validate an environment prefix such as `APP_`
pub fn validate_env_prefix(prefix: &str) -> Result<String, String> {
    if prefix.is_empty() {
        return Err("Environment prefix cannot be empty".to_string());
    }

    if !prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(format!(
            "Environment prefix may only contain letters, digits, '_' and '-', got: '{}'",
            prefix
        ));
    }

    Ok(prefix.to_string())
}
