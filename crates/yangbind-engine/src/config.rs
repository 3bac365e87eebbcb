//! Engine configuration
//!
//! ```toml
//! [logging]
//! profile = "production"
//!
//! [binding]
//! relax-leafrefs = true
//!
//! [render]
//! module-qualify = true
//! ```
//!
//! Every section and key is optional; missing values take the defaults.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use yangbind_core::logging_facility::Profile;
use yangbind_core::BindOptions;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BindingConfig {
    /// Let leafrefs pass UPDATE/REPLACE validation while their target holds
    /// no data
    pub relax_leafrefs: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            relax_leafrefs: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RenderConfig {
    pub module_qualify: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            module_qualify: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    pub binding: BindingConfig,
    pub render: RenderConfig,
}

impl EngineConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Io` when the file cannot be read, otherwise as
    /// [`EngineConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn bind_options(&self) -> BindOptions {
        BindOptions {
            relax_leafrefs: self.binding.relax_leafrefs,
        }
    }
}
