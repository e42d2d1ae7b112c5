//! layered-config Library
//!
//! Resolves one validated configuration object from configuration files,
//! a `.env` file and environment variables.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod logger;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
