//! # Common Components
//!
//! Shared utilities used by the binaries.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration loading
//! - [`logging`]: `env_logger` setup

pub mod config;
pub mod logging;
