//! # Configuration Utilities
//!
//! TOML configuration shared by the binaries. Every field has a default, so an
//! empty file (or no file at all) is a valid configuration.
//!
//! ```toml
//! [stream]
//! alpha_threshold = 0
//! reveal_carriers = false
//!
//! [image]
//! force_rgba = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::stream::StreamOptions;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegConfig = load_config(Path::new("config/steg.toml"))?;
/// ```
pub fn load_config<T>(path: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse TOML configuration text.
pub fn parse_config<T>(content: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    Ok(toml::from_str(content)?)
}

/// Complete configuration for the `steg` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegConfig {
    /// Carrier selection and marking
    pub stream: StreamOptions,
    /// Image loading behaviour
    pub image: ImageConfig,
}

/// How input images are decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Convert every input to 32bpp RGBA before embedding/extracting.
    /// Images without an alpha channel gain an opaque one, so this only helps
    /// together with a raised `alpha_threshold` of 255.
    pub force_rgba: bool,
}
