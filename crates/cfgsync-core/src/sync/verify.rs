//! In-memory round-trip verification
//!
//! For every parameter, patch a copy of the artifact with a probe value and
//! extract it again. The parameter must read back as the probe and every
//! other member of its exclusive group must read back unselected. Nothing
//! is written to disk.

use cfgsync_content::ArtifactDocument;
use cfgsync_content::codec::ConfigValue;
use cfgsync_schema::{ParameterMapping, Schema, ValueKind};
use serde::Serialize;

use crate::dotconfig::ConfigFile;
use crate::sync::extract::ArtifactReader;
use crate::sync::patch::ArtifactPatcher;

/// Probe for string parameters.
pub const STRING_PROBE: &str = "Test Command";
/// Probe for hex parameters.
pub const HEX_PROBE: &str = "123CAFFEh";
/// Probe for integer parameters.
pub const INT_PROBE: &str = "42";

/// Outcome of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pass,
    Fail,
    Skip,
}

/// One probe of one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyStep {
    pub parameter: String,
    pub probe: ConfigValue,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// All probes of a verification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub steps: Vec<VerifyStep>,
}

impl VerifyReport {
    fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(StepStatus::Pass)
    }

    pub fn failed(&self) -> usize {
        self.count(StepStatus::Fail)
    }

    pub fn skipped(&self) -> usize {
        self.count(StepStatus::Skip)
    }

    /// True when no step failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// The selected probe for a parameter kind.
pub fn probe_value(kind: ValueKind) -> ConfigValue {
    match kind {
        ValueKind::Toggle => ConfigValue::Selected,
        ValueKind::BoundedString => ConfigValue::Value(STRING_PROBE.to_string()),
        ValueKind::HexString => ConfigValue::Value(HEX_PROBE.to_string()),
        ValueKind::Integer => ConfigValue::Value(INT_PROBE.to_string()),
    }
}

/// Round-trip verifier over one schema and artifact.
pub struct RoundTripVerifier<'a> {
    schema: &'a Schema,
    key_prefix: &'a str,
}

impl<'a> RoundTripVerifier<'a> {
    pub fn new(schema: &'a Schema, key_prefix: &'a str) -> Self {
        Self { schema, key_prefix }
    }

    /// Probe every parameter against `artifact`.
    pub fn run(&self, artifact: &ArtifactDocument) -> VerifyReport {
        let baseline: Vec<(String, ConfigValue)> = self
            .schema
            .mappings()
            .iter()
            .map(|m| (m.config_key(self.key_prefix), ConfigValue::Unselected))
            .collect();

        let mut report = VerifyReport::default();
        for mapping in self.schema.mappings() {
            let missing: Vec<&str> = mapping
                .symbols()
                .filter(|s| !artifact.contains(s))
                .collect();
            if !missing.is_empty() {
                report.steps.push(VerifyStep {
                    parameter: mapping.name.clone(),
                    probe: probe_value(mapping.kind()),
                    status: StepStatus::Skip,
                    detail: Some(format!("symbol not in artifact: {}", missing.join(", "))),
                });
                continue;
            }

            let mut probes = vec![probe_value(mapping.kind())];
            if mapping.kind().is_typed() {
                probes.push(ConfigValue::Unselected);
            }
            for probe in probes {
                let step = self.probe(mapping, probe, &baseline, artifact);
                tracing::debug!(parameter = %step.parameter, status = ?step.status, "verify step");
                report.steps.push(step);
            }
        }
        report
    }

    fn probe(
        &self,
        mapping: &ParameterMapping,
        probe: ConfigValue,
        baseline: &[(String, ConfigValue)],
        artifact: &ArtifactDocument,
    ) -> VerifyStep {
        let key = mapping.config_key(self.key_prefix);
        let mut config = ConfigFile::from_entries(baseline.iter().cloned());
        config.set(&key, probe.clone());

        let fail = |detail: String| VerifyStep {
            parameter: mapping.name.clone(),
            probe: probe.clone(),
            status: StepStatus::Fail,
            detail: Some(detail),
        };

        let mut doc = artifact.clone();
        if let Err(e) = ArtifactPatcher::new(self.schema, self.key_prefix).apply(&mut doc, &config) {
            return fail(format!("patch failed: {e}"));
        }
        let extraction = ArtifactReader::new(self.schema, self.key_prefix).read(&doc);

        match extraction.get(&key) {
            Some(value) if value == &probe => {}
            other => {
                let found = other.map_or_else(|| "nothing".to_string(), ToString::to_string);
                return fail(format!("read back {found}, expected {probe}"));
            }
        }

        if let Some(group) = self.schema.group_of(&mapping.name) {
            for member in group.members.iter().filter(|m| **m != mapping.name) {
                let member_key = format!("{}{}", self.key_prefix, member);
                if let Some(value) = extraction.get(&member_key)
                    && value != &ConfigValue::Unselected
                {
                    return fail(format!("group member {member} reads back {value}"));
                }
            }
        }

        VerifyStep {
            parameter: mapping.name.clone(),
            probe,
            status: StepStatus::Pass,
            detail: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_values() {
        assert_eq!(probe_value(ValueKind::Toggle), ConfigValue::Selected);
        assert_eq!(
            probe_value(ValueKind::HexString),
            ConfigValue::Value("123CAFFEh".into())
        );
    }

    #[test]
    fn test_unmatched_parameter_is_skipped() {
        let schema = Schema::parse("config A\n help\n  source=bios.mac a=1 b=1\n");
        let doc = ArtifactDocument::parse("a equ 0\n");
        let report = RoundTripVerifier::new(&schema, "CONFIG_").run(&doc);

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.steps[0].detail.as_deref(), Some("symbol not in artifact: b"));
        assert!(report.is_success());
    }

    #[test]
    fn test_toggle_and_typed_probes_pass() {
        let schema = Schema::parse(
            "config A\n help\n  source=bios.mac a=1\nconfig S\n help\n  source=bios.mac msg=string\n",
        );
        let doc = ArtifactDocument::parse("a equ 0\nmsg: db 'x',0\n");
        let report = RoundTripVerifier::new(&schema, "CONFIG_").run(&doc);

        assert_eq!(report.passed(), 3);
        assert!(report.is_success());
    }
}
