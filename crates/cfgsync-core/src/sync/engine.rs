//! SyncEngine implementation
//!
//! The SyncEngine resolves a variant's schema and artifact, loads the schema
//! once and dispatches to extraction, patching or verification.

use std::str::FromStr;

use cfgsync_content::{ArtifactDocument, ConfigValue, unified_diff};
use cfgsync_fs::{NormalizedPath, TextFile, VariantPaths, io};
use cfgsync_schema::Schema;
use serde::Serialize;

use crate::dotconfig::ConfigFile;
use crate::settings::SyncSettings;
use crate::sync::extract::ArtifactReader;
use crate::sync::patch::ArtifactPatcher;
use crate::sync::report::SyncReport;
use crate::sync::verify::RoundTripVerifier;
use crate::{Error, Result};

/// Variant argument that selects the variant from the configuration file.
pub const AUTO_VARIANT: &str = "auto";

/// Direction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Artifact -> configuration.
    Extract,
    /// Configuration -> artifact.
    Patch,
    /// In-memory round trip of every parameter.
    Verify,
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "extract" => Ok(Self::Extract),
            "patch" => Ok(Self::Patch),
            "verify" => Ok(Self::Verify),
            other => Err(Error::UnknownOperation {
                operation: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Extract => "extract",
            Self::Patch => "patch",
            Self::Verify => "verify",
        })
    }
}

/// Options for a run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, compute everything but write nothing; the report carries a
    /// unified diff instead.
    pub dry_run: bool,
    /// Schema path overriding the settings template.
    pub schema: Option<NormalizedPath>,
    /// Artifact path overriding the settings template.
    pub artifact: Option<NormalizedPath>,
}

/// Everything loaded for one run.
struct Workspace {
    paths: VariantPaths,
    schema: Schema,
    artifact_file: TextFile,
    artifact: ArtifactDocument,
}

/// Engine for synchronizing a configuration file with a variant's artifact
pub struct SyncEngine {
    /// Project root; relative paths are resolved against it
    root: NormalizedPath,
    settings: SyncSettings,
}

impl SyncEngine {
    /// Create an engine with explicit settings.
    pub fn new(root: NormalizedPath, settings: SyncSettings) -> Self {
        Self { root, settings }
    }

    /// Create an engine with settings from `cfgsync.toml` in `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but is invalid.
    pub fn load(root: NormalizedPath) -> Result<Self> {
        let settings = SyncSettings::load(&root)?;
        Ok(Self::new(root, settings))
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Run `operation` for `variant` with the configuration at `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variant cannot be determined, the schema or
    /// artifact is missing, the selection conflicts, or a file cannot be
    /// read or written.
    pub fn run(
        &self,
        operation: Operation,
        config: &str,
        variant: &str,
        options: &SyncOptions,
    ) -> Result<SyncReport> {
        let config_path = self.root.join(config);
        let config_file = ConfigFile::load(&config_path)?;
        let variant = self.resolve_variant(&config_file, &config_path, variant)?;
        let workspace = self.open(&variant, options)?;

        let mut report = SyncReport::new(operation, &variant, options.dry_run);
        report.schema = workspace.paths.schema.to_string();
        report.artifact = workspace.paths.artifact.to_string();
        report.config = config_path.to_string();

        tracing::info!(%operation, %variant, config = %config_path, "sync");
        match operation {
            Operation::Extract => self.extract(workspace, config_file, &config_path, options, &mut report)?,
            Operation::Patch => self.patch(workspace, &config_file, options, &mut report)?,
            Operation::Verify => {
                let verify = RoundTripVerifier::new(&workspace.schema, &self.settings.key_prefix)
                    .run(&workspace.artifact);
                report.verify = Some(verify);
            }
        }
        Ok(report)
    }

    /// Resolve the `auto` variant from the configuration; other values are
    /// returned unchanged.
    ///
    /// `auto` picks the first selected key `<key_prefix><variant_prefix>NAME`
    /// and returns `NAME` in lower case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VariantUndetermined`] if no such key is selected.
    pub fn resolve_variant(
        &self,
        config: &ConfigFile,
        config_path: &NormalizedPath,
        variant: &str,
    ) -> Result<String> {
        if variant != AUTO_VARIANT {
            return Ok(variant.to_string());
        }

        let prefix = self.settings.variant_key_prefix();
        config
            .entries()
            .find_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .filter(|name| !name.is_empty() && value == &ConfigValue::Selected)
            })
            .map(|name| {
                let variant = name.to_ascii_lowercase();
                tracing::info!(%variant, "variant selected by configuration");
                variant
            })
            .ok_or_else(|| Error::VariantUndetermined {
                config: config_path.to_native(),
                key_pattern: format!("{prefix}<NAME>"),
            })
    }

    /// Resolve paths and load schema and artifact for `variant`.
    fn open(&self, variant: &str, options: &SyncOptions) -> Result<Workspace> {
        let mut paths = self.settings.layout().resolve(&self.root, variant)?;
        if let Some(schema) = &options.schema {
            paths.schema = self.root.join(schema.as_str());
        }
        if let Some(artifact) = &options.artifact {
            paths.artifact = self.root.join(artifact.as_str());
        }

        if !paths.schema.is_file() {
            return Err(Error::SchemaMissing {
                path: paths.schema.to_native(),
            });
        }
        if !paths.artifact.is_file() {
            return Err(Error::ArtifactMissing {
                path: paths.artifact.to_native(),
            });
        }

        let schema = Schema::load(&paths.schema, Some(paths.source_kind()))?;
        let artifact_file = io::read_text(&paths.artifact)?;
        let artifact = ArtifactDocument::parse(&artifact_file.content);

        Ok(Workspace {
            paths,
            schema,
            artifact_file,
            artifact,
        })
    }

    fn extract(
        &self,
        workspace: Workspace,
        mut config: ConfigFile,
        config_path: &NormalizedPath,
        options: &SyncOptions,
        report: &mut SyncReport,
    ) -> Result<()> {
        let extraction =
            ArtifactReader::new(&workspace.schema, &self.settings.key_prefix).read(&workspace.artifact);
        report.unmatched = extraction.unmatched;
        report.config_changes = config.merge(extraction.values);

        if !config.is_modified() {
            tracing::info!(config = %config_path, "configuration already up to date");
            return Ok(());
        }
        if options.dry_run {
            report.diff = Some(unified_diff(config.original(), &config.render(), config_path.as_str()));
            return Ok(());
        }
        io::write_text(config_path, &config.to_text_file())?;
        report.written.push(config_path.to_string());
        Ok(())
    }

    fn patch(
        &self,
        workspace: Workspace,
        config: &ConfigFile,
        options: &SyncOptions,
        report: &mut SyncReport,
    ) -> Result<()> {
        let Workspace {
            paths,
            schema,
            artifact_file,
            mut artifact,
        } = workspace;

        let outcome = ArtifactPatcher::new(&schema, &self.settings.key_prefix).apply(&mut artifact, config)?;
        report.artifact_changes = outcome.changes;
        report.unmatched = outcome.unmatched;
        report.ignored = outcome.ignored;

        let rendered = artifact.render();
        if rendered == artifact_file.content {
            tracing::info!(artifact = %paths.artifact, "artifact already up to date");
            return Ok(());
        }
        if options.dry_run {
            report.diff = Some(unified_diff(&artifact_file.content, &rendered, paths.artifact.as_str()));
            return Ok(());
        }
        io::write_text(&paths.artifact, &artifact_file.with_content(rendered))?;
        report.written.push(paths.artifact.to_string());
        Ok(())
    }
}
