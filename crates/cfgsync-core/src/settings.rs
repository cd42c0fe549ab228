//! Tool settings from `cfgsync.toml`
//!
//! The settings file is optional. Every field has a default, so an empty or
//! missing file behaves like:
//!
//! ```toml
//! key_prefix = "CONFIG_"
//! schema = "config/{variant}/Kconfig.system"
//! artifact = "src/{variant}/bios.mac"
//! variant_prefix = "VARIANT_"
//! ```

use cfgsync_fs::layout::{DEFAULT_ARTIFACT_TEMPLATE, DEFAULT_SCHEMA_TEMPLATE};
use cfgsync_fs::{NormalizedPath, VariantLayout, io};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// File name of the settings file in the project root.
pub const SETTINGS_FILE: &str = "cfgsync.toml";

fn default_key_prefix() -> String {
    "CONFIG_".to_string()
}

fn default_schema() -> String {
    DEFAULT_SCHEMA_TEMPLATE.to_string()
}

fn default_artifact() -> String {
    DEFAULT_ARTIFACT_TEMPLATE.to_string()
}

fn default_variant_prefix() -> String {
    "VARIANT_".to_string()
}

/// Project settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncSettings {
    /// Prefix of configuration keys; the key of a parameter is prefix + name.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Schema path template relative to the project root.
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Artifact path template relative to the project root.
    #[serde(default = "default_artifact")]
    pub artifact: String,

    /// Parameter name prefix marking the selected variant, used by `auto`.
    #[serde(default = "default_variant_prefix")]
    pub variant_prefix: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            schema: default_schema(),
            artifact: default_artifact(),
            variant_prefix: default_variant_prefix(),
        }
    }
}

impl SyncSettings {
    /// Parse settings from TOML content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`] if the content is not valid TOML or
    /// contains unknown fields.
    pub fn parse(content: &str, path: &NormalizedPath) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::InvalidSettings {
            path: path.to_native(),
            message: e.to_string(),
        })
    }

    /// Load `cfgsync.toml` from `root`, or the defaults if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let path = root.join(SETTINGS_FILE);
        match io::read_text_if_exists(&path)? {
            Some(file) => {
                let settings = Self::parse(&file.content, &path)?;
                tracing::debug!(path = %path, ?settings, "loaded settings");
                Ok(settings)
            }
            None => Ok(Self::default()),
        }
    }

    /// Path templates of the schema and artifact.
    pub fn layout(&self) -> VariantLayout {
        VariantLayout::new(&self.schema, &self.artifact)
    }

    /// Configuration key of a parameter.
    pub fn key(&self, parameter: &str) -> String {
        format!("{}{}", self.key_prefix, parameter)
    }

    /// Configuration key prefix identifying variant selections.
    pub fn variant_key_prefix(&self) -> String {
        format!("{}{}", self.key_prefix, self.variant_prefix)
    }
}
