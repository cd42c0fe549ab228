//! [`TestProject`] builder for cfgsync test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures;

/// A temporary project directory laid out like a real cfgsync project:
///
/// ```text
/// config/<variant>/Kconfig.system
/// src/<variant>/bios.mac
/// .config
/// cfgsync.toml          (optional)
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use cfgsync_test_utils::project::TestProject;
///
/// let project = TestProject::new().with_fixture_variant();
/// project.write_config("CONFIG_CPU_K2526=y\n");
/// project.assert_file_exists("src/bc_a5120/bios.mac");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Add the canonical fixture variant ([`fixtures::VARIANT`]).
    pub fn with_fixture_variant(self) -> Self {
        self.with_variant(fixtures::VARIANT, fixtures::SCHEMA, fixtures::BIOS_MAC)
    }

    /// Add a variant with the given schema and artifact texts.
    pub fn with_variant(self, variant: &str, schema: &str, artifact: &str) -> Self {
        self.write(&Self::schema_rel(variant), schema);
        self.write(&Self::artifact_rel(variant), artifact);
        self
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a project-relative path.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Project-relative schema path of a variant.
    pub fn schema_rel(variant: &str) -> String {
        format!("config/{variant}/Kconfig.system")
    }

    /// Project-relative artifact path of a variant.
    pub fn artifact_rel(variant: &str) -> String {
        format!("src/{variant}/bios.mac")
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        self.write_bytes(rel, content.as_bytes());
    }

    /// Write raw bytes, creating parent directories.
    pub fn write_bytes(&self, rel: &str, content: &[u8]) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }

    /// Write `.config` in the project root.
    pub fn write_config(&self, content: &str) {
        self.write(".config", content);
    }

    /// Write `cfgsync.toml` in the project root.
    pub fn write_settings(&self, content: &str) {
        self.write("cfgsync.toml", content);
    }

    /// Read a file as UTF-8.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("failed to read {rel}: {e}"))
    }

    pub fn read_bytes(&self, rel: &str) -> Vec<u8> {
        fs::read(self.path(rel)).unwrap_or_else(|e| panic!("failed to read {rel}: {e}"))
    }

    /// Read `.config`.
    pub fn read_config(&self) -> String {
        self.read(".config")
    }

    /// Read the artifact of the fixture variant.
    pub fn read_artifact(&self) -> String {
        self.read(&Self::artifact_rel(fixtures::VARIANT))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    /// Assert that a file exists.
    pub fn assert_file_exists(&self, rel: &str) {
        assert!(self.exists(rel), "expected file {rel} to exist");
    }

    /// Assert that a file does not exist.
    pub fn assert_file_missing(&self, rel: &str) {
        assert!(!self.exists(rel), "expected file {rel} to be absent");
    }
}
