//! Parsed schema

use cfgsync_fs::{NormalizedPath, io};

use crate::Result;
use crate::group::{ExclusiveGroup, compute_groups};
use crate::mapping::ParameterMapping;
use crate::parser::{MalformedAnnotation, SchemaParser};

/// The mapping table derived from a schema, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    mappings: Vec<ParameterMapping>,
    groups: Vec<ExclusiveGroup>,
    diagnostics: Vec<MalformedAnnotation>,
}

impl Schema {
    pub(crate) fn from_parts(
        mappings: Vec<ParameterMapping>,
        diagnostics: Vec<MalformedAnnotation>,
    ) -> Self {
        let groups = compute_groups(&mappings);
        Self {
            mappings,
            groups,
            diagnostics,
        }
    }

    /// Parse schema text accepting annotations for any artifact kind.
    pub fn parse(text: &str) -> Self {
        SchemaParser::new().parse(text)
    }

    /// Read and parse a schema file, keeping only annotations for
    /// `source_kind` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(path: &NormalizedPath, source_kind: Option<&str>) -> Result<Self> {
        let file = io::read_text(path)?;
        let parser = match source_kind {
            Some(kind) => SchemaParser::for_source(kind),
            None => SchemaParser::new(),
        };
        let schema = parser.parse(&file.content);

        for diagnostic in &schema.diagnostics {
            tracing::debug!(
                path = %path,
                line = diagnostic.line,
                reason = %diagnostic.reason,
                "skipped schema annotation"
            );
        }
        tracing::debug!(
            path = %path,
            parameters = schema.mappings.len(),
            groups = schema.groups.len(),
            "loaded schema"
        );
        Ok(schema)
    }

    pub fn mappings(&self) -> &[ParameterMapping] {
        &self.mappings
    }

    pub fn get(&self, name: &str) -> Option<&ParameterMapping> {
        self.mappings.iter().find(|m| m.name == name)
    }

    pub fn exclusive_groups(&self) -> &[ExclusiveGroup] {
        &self.groups
    }

    /// The exclusive group `parameter` belongs to, if any.
    pub fn group_of(&self, parameter: &str) -> Option<&ExclusiveGroup> {
        self.groups.iter().find(|g| g.contains(parameter))
    }

    /// Annotation lines that were skipped while parsing.
    pub fn diagnostics(&self) -> &[MalformedAnnotation] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
