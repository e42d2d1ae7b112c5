//! Resolution pipeline
//!
//! Runs the stages of one resolution pass in order:
//!
//! 1. `Init -> DotenvLoaded`: optional `.env` bootstrap (best-effort)
//! 2. `DotenvLoaded -> FilesMerged`: resolve locators, load and merge files
//! 3. `FilesMerged -> EnvMerged`: build the environment tree and merge it over the files
//! 4. `EnvMerged -> Validated`: construct the typed instance and validate it
//! 5. `Validated -> Ready`
//!
//! Path conflicts, construction and validation failures move the pass to
//! `Failed` and are returned to the caller.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::config::EnvMap;
use crate::config::construct::construct;
use crate::config::dotenv;
use crate::config::error::ConfigError;
use crate::config::loader::FileLoader;
use crate::config::locator::resolve_locators;
use crate::config::merge::deep_merge;
use crate::config::options::ConfigOptions;
use crate::config::validation::validate;

/// Stage of a resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    DotenvLoaded,
    FilesMerged,
    EnvMerged,
    Validated,
    Ready,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::DotenvLoaded => "dotenv_loaded",
            Stage::FilesMerged => "files_merged",
            Stage::EnvMerged => "env_merged",
            Stage::Validated => "validated",
            Stage::Ready => "ready",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where environment variables come from
#[derive(Debug, Clone, Default)]
pub enum EnvSource {
    /// The process environment; dotenv values are written into it
    #[default]
    Process,
    /// An explicit mapping; dotenv values are merged into the mapping only
    Explicit(EnvMap),
}

/// Snapshot of the process environment, skipping non UTF-8 entries
pub fn process_env() -> EnvMap {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Tracks the stage of one pass and logs transitions
struct Pass {
    stage: Stage,
}

impl Pass {
    fn new() -> Self {
        Self { stage: Stage::Init }
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = %self.stage, to = %next, "Configuration stage transition");
        self.stage = next;
    }

    fn fail(&mut self, error: ConfigError) -> ConfigError {
        tracing::error!(stage = %self.stage, error = %error, "Configuration resolution failed");
        self.stage = Stage::Failed;
        error
    }
}

/// Resolves configuration according to a set of options
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    options: ConfigOptions,
}

impl ConfigResolver {
    pub fn new(options: ConfigOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConfigOptions {
        &self.options
    }

    /// Resolve the merged plain-data tree without constructing a typed value
    ///
    /// # Errors
    ///
    /// Returns an error if the environment tree cannot be built (path conflicts).
    pub fn resolve_tree(&self, source: EnvSource) -> Result<Value, ConfigError> {
        let mut pass = Pass::new();
        self.merged_tree(&mut pass, source)
    }

    /// Resolve, construct and validate a typed configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - two environment variables disagree about the shape of a path
    /// - the merged tree cannot be turned into `T`
    /// - the instance violates its validation rules
    pub fn resolve<T>(&self, source: EnvSource) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Validate,
    {
        let mut pass = Pass::new();
        let tree = self.merged_tree(&mut pass, source)?;

        let instance: T = construct(tree, &self.options.transform).map_err(|e| pass.fail(e))?;
        validate(&instance, &self.options.validation).map_err(|e| pass.fail(e))?;
        pass.advance(Stage::Validated);

        pass.advance(Stage::Ready);
        Ok(instance)
    }

    fn merged_tree(&self, pass: &mut Pass, source: EnvSource) -> Result<Value, ConfigError> {
        let env = self.bootstrap(source);
        pass.advance(Stage::DotenvLoaded);

        let paths = resolve_locators(&self.options.files, &env);
        let loader = FileLoader::new(&self.options.parsers, self.options.suppress_failed_file_loads);
        let files = loader.load_and_merge(&paths);
        tracing::info!(
            loaded = files.loaded.len(),
            failed = files.failed.len(),
            "Merged configuration files"
        );
        pass.advance(Stage::FilesMerged);

        let env_tree = self.options.env_parser.parse(&env).map_err(|e| pass.fail(e))?;
        let tree = deep_merge(files.tree, env_tree);
        pass.advance(Stage::EnvMerged);

        Ok(tree)
    }

    /// Apply the dotenv bootstrap and produce the environment for this pass
    fn bootstrap(&self, source: EnvSource) -> EnvMap {
        let dotenv = &self.options.dotenv;

        match source {
            EnvSource::Process => {
                if self.options.use_dotenv
                    && let Err(e) = dotenv::load_into_process(dotenv)
                {
                    dotenv::report_failure(&dotenv.path, &e);
                }
                process_env()
            }
            EnvSource::Explicit(mut env) => {
                if self.options.use_dotenv
                    && let Err(e) = dotenv::load_into_map(dotenv, &mut env)
                {
                    dotenv::report_failure(&dotenv.path, &e);
                }
                env
            }
        }
    }
}

/// Holder of a resolved, validated configuration
#[derive(Debug, Clone)]
pub struct ConfigurationService<T> {
    config: T,
}

impl<T> ConfigurationService<T>
where
    T: DeserializeOwned + Validate,
{
    /// Resolve against the process environment
    ///
    /// # Errors
    ///
    /// See [`ConfigResolver::resolve`].
    pub fn new(options: ConfigOptions) -> Result<Self, ConfigError> {
        Self::with_env(options, EnvSource::Process)
    }

    /// Resolve against a chosen environment source
    ///
    /// # Errors
    ///
    /// See [`ConfigResolver::resolve`].
    pub fn with_env(options: ConfigOptions, source: EnvSource) -> Result<Self, ConfigError> {
        let config = ConfigResolver::new(options).resolve(source)?;
        Ok(Self { config })
    }
}

impl<T> ConfigurationService<T> {
    pub fn config(&self) -> &T {
        &self.config
    }

    pub fn into_inner(self) -> T {
        self.config
    }
}
