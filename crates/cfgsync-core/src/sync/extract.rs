//! Artifact -> configuration

use cfgsync_content::codec::{self, ConfigValue};
use cfgsync_content::ArtifactDocument;
use cfgsync_schema::{ParameterMapping, Schema, TargetKind};
use serde::Serialize;

/// A target symbol with no assignment site in the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedSymbol {
    pub parameter: String,
    pub symbol: String,
}

/// Configuration state computed from an artifact.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Configuration keys and states in schema order.
    pub values: Vec<(String, ConfigValue)>,
    pub unmatched: Vec<UnmatchedSymbol>,
}

impl Extraction {
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Reads parameter states out of an artifact.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactReader<'a> {
    schema: &'a Schema,
    key_prefix: &'a str,
}

impl<'a> ArtifactReader<'a> {
    pub fn new(schema: &'a Schema, key_prefix: &'a str) -> Self {
        Self { schema, key_prefix }
    }

    /// Compute the state of every parameter.
    ///
    /// A toggle parameter is selected only if every one of its targets holds
    /// its literal. A parameter with an unmatched target reads as unselected.
    pub fn read(&self, doc: &ArtifactDocument) -> Extraction {
        let mut extraction = Extraction::default();
        for mapping in self.schema.mappings() {
            let value = read_parameter(mapping, doc, &mut extraction.unmatched);
            tracing::debug!(parameter = %mapping.name, %value, "extracted");
            extraction
                .values
                .push((mapping.config_key(self.key_prefix), value));
        }
        extraction
    }
}

fn read_parameter(
    mapping: &ParameterMapping,
    doc: &ArtifactDocument,
    unmatched: &mut Vec<UnmatchedSymbol>,
) -> ConfigValue {
    let mut selected = true;
    let mut typed: Option<ConfigValue> = None;

    for target in &mapping.targets {
        let Some(observed) = doc.read_value(&target.symbol) else {
            tracing::warn!(parameter = %mapping.name, symbol = %target.symbol, "symbol not found in artifact");
            unmatched.push(UnmatchedSymbol {
                parameter: mapping.name.clone(),
                symbol: target.symbol.clone(),
            });
            selected = false;
            continue;
        };

        match &target.kind {
            TargetKind::Toggle(literal) => {
                if !codec::matches_literal(&observed.text, literal) {
                    selected = false;
                }
            }
            kind => {
                typed.get_or_insert_with(|| codec::decode_typed(kind.value_kind(), &observed.text));
            }
        }
    }

    if mapping.kind().is_typed() {
        return typed.unwrap_or(ConfigValue::Unselected);
    }
    if selected {
        ConfigValue::Selected
    } else {
        ConfigValue::Unselected
    }
}
