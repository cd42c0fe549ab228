//! Per-variant project layout
//!
//! Every system variant owns one schema and one artifact. Their locations are
//! described by templates relative to the project root in which the literal
//! `{variant}` is replaced by the variant identifier:
//!
//! ```text
//! config/{variant}/Kconfig.system
//! src/{variant}/bios.mac
//! ```

use serde::{Deserialize, Serialize};

use crate::{NormalizedPath, Result, validate_path_identifier};

/// Placeholder substituted by the variant identifier.
pub const VARIANT_PLACEHOLDER: &str = "{variant}";

/// Default schema location template.
pub const DEFAULT_SCHEMA_TEMPLATE: &str = "config/{variant}/Kconfig.system";

/// Default artifact location template.
pub const DEFAULT_ARTIFACT_TEMPLATE: &str = "src/{variant}/bios.mac";

/// Path templates for the schema and artifact of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantLayout {
    pub schema: String,
    pub artifact: String,
}

impl Default for VariantLayout {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA_TEMPLATE.to_string(),
            artifact: DEFAULT_ARTIFACT_TEMPLATE.to_string(),
        }
    }
}

impl VariantLayout {
    pub fn new(schema: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            artifact: artifact.into(),
        }
    }

    /// Resolve both templates for `variant` below `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `variant` is not a single path component.
    pub fn resolve(&self, root: &NormalizedPath, variant: &str) -> Result<VariantPaths> {
        validate_path_identifier(variant)?;

        let schema = root.join(&self.schema.replace(VARIANT_PLACEHOLDER, variant));
        let artifact = root.join(&self.artifact.replace(VARIANT_PLACEHOLDER, variant));
        tracing::debug!(%variant, %schema, %artifact, "resolved variant layout");

        Ok(VariantPaths {
            variant: variant.to_string(),
            schema,
            artifact,
        })
    }
}

/// Concrete schema and artifact paths of one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPaths {
    pub variant: String,
    pub schema: NormalizedPath,
    pub artifact: NormalizedPath,
}

impl VariantPaths {
    /// The artifact kind schema annotations refer to (`source=<kind>`),
    /// which is the artifact's file name.
    pub fn source_kind(&self) -> &str {
        self.artifact.file_name().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_resolution() {
        let root = NormalizedPath::new("/work");
        let paths = VariantLayout::default().resolve(&root, "bc_a5120").unwrap();

        assert_eq!(paths.schema.as_str(), "/work/config/bc_a5120/Kconfig.system");
        assert_eq!(paths.artifact.as_str(), "/work/src/bc_a5120/bios.mac");
        assert_eq!(paths.source_kind(), "bios.mac");
    }

    #[test]
    fn test_template_without_placeholder() {
        let root = NormalizedPath::new("/work");
        let layout = VariantLayout::new("Kconfig", "/abs/bios.mac");
        let paths = layout.resolve(&root, "any").unwrap();

        assert_eq!(paths.schema.as_str(), "/work/Kconfig");
        assert_eq!(paths.artifact.as_str(), "/abs/bios.mac");
    }

    #[test]
    fn test_rejects_escaping_variant() {
        let root = NormalizedPath::new("/work");
        assert!(VariantLayout::default().resolve(&root, "../etc").is_err());
    }
}
