//! Configuration -> artifact
//!
//! Patching runs in two passes over the artifact. The clear pass writes the
//! cleared value of every unselected parameter in schema order; the select
//! pass then writes the value of every selected parameter. A symbol shared
//! by the members of an exclusive group therefore ends up holding the
//! selected member's value.
//!
//! The select pass is checked up front: when two selected parameters would
//! write different values to one symbol the whole patch is rejected, so
//! schema order never picks a winner.

use std::collections::HashMap;

use cfgsync_content::codec::{self, ConfigValue};
use cfgsync_content::{ArtifactDocument, LineChange};
use cfgsync_schema::mapping::symbol_key;
use cfgsync_schema::{ParameterMapping, Schema, TargetKind, ValueKind};
use serde::Serialize;

use crate::dotconfig::ConfigFile;
use crate::sync::extract::UnmatchedSymbol;
use crate::{Error, Result};

/// Which pass a write belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Clear,
    Select,
}

/// One value to write to one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedWrite {
    pub pass: Pass,
    pub parameter: String,
    pub symbol: String,
    pub value: String,
    pub kind: ValueKind,
}

/// A parameter whose configuration state does not fit its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredState {
    pub parameter: String,
    pub value: ConfigValue,
}

/// The ordered writes for a configuration state.
#[derive(Debug, Clone, Default)]
pub struct PatchPlan {
    /// Clear-pass writes first, then select-pass writes, each in schema order.
    pub writes: Vec<PlannedWrite>,
    pub ignored: Vec<IgnoredState>,
}

/// Result of applying a plan to a document.
#[derive(Debug, Clone, Default)]
pub struct PatchOutcome {
    /// Net change per line, in line order.
    pub changes: Vec<LineChange>,
    pub unmatched: Vec<UnmatchedSymbol>,
    pub ignored: Vec<IgnoredState>,
}

/// Rewrites artifact lines from configuration state.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactPatcher<'a> {
    schema: &'a Schema,
    key_prefix: &'a str,
}

impl<'a> ArtifactPatcher<'a> {
    pub fn new(schema: &'a Schema, key_prefix: &'a str) -> Self {
        Self { schema, key_prefix }
    }

    /// Plan the writes for `config`.
    ///
    /// Parameters whose key is absent from the configuration are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConflictingSelection`] if two selected parameters
    /// would write different values to the same symbol.
    pub fn plan(&self, config: &ConfigFile) -> Result<PatchPlan> {
        let mut clear = Vec::new();
        let mut select = Vec::new();
        let mut ignored = Vec::new();

        for mapping in self.schema.mappings() {
            let key = mapping.config_key(self.key_prefix);
            let Some(value) = config.get(&key) else {
                tracing::debug!(parameter = %mapping.name, "not in configuration, left untouched");
                continue;
            };
            match planned_writes(mapping, value) {
                Some(writes) if value == &ConfigValue::Unselected => clear.extend(writes),
                Some(writes) => select.extend(writes),
                None => {
                    tracing::warn!(parameter = %mapping.name, %value, kind = %mapping.kind(), "configuration state does not fit parameter kind, ignored");
                    ignored.push(IgnoredState {
                        parameter: mapping.name.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        check_conflicts(&select)?;
        clear.extend(select);
        Ok(PatchPlan {
            writes: clear,
            ignored,
        })
    }

    /// Plan and apply `config` to `doc`.
    ///
    /// Nothing is written to `doc` unless the whole plan applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection conflicts or a value cannot be
    /// written to its assignment line.
    pub fn apply(&self, doc: &mut ArtifactDocument, config: &ConfigFile) -> Result<PatchOutcome> {
        let plan = self.plan(config)?;
        let mut work = doc.clone();
        let mut changes = Vec::new();
        let mut unmatched: Vec<UnmatchedSymbol> = Vec::new();

        for write in &plan.writes {
            if !work.contains(&write.symbol) {
                let record = UnmatchedSymbol {
                    parameter: write.parameter.clone(),
                    symbol: write.symbol.clone(),
                };
                if !unmatched.contains(&record) {
                    tracing::warn!(parameter = %write.parameter, symbol = %write.symbol, "symbol not found in artifact");
                    unmatched.push(record);
                }
                continue;
            }
            tracing::debug!(pass = ?write.pass, parameter = %write.parameter, symbol = %write.symbol, value = %write.value, "write");
            changes.extend(work.write_value(&write.symbol, &write.value, write.kind)?);
        }

        *doc = work;
        Ok(PatchOutcome {
            changes: net_changes(changes),
            unmatched,
            ignored: plan.ignored,
        })
    }
}

/// Writes for one parameter, or `None` if its state does not fit its kind.
fn planned_writes(mapping: &ParameterMapping, value: &ConfigValue) -> Option<Vec<PlannedWrite>> {
    let pass = if value == &ConfigValue::Unselected {
        Pass::Clear
    } else {
        Pass::Select
    };

    mapping
        .targets
        .iter()
        .map(|target| {
            let text = match (&target.kind, value) {
                (TargetKind::Toggle(_), ConfigValue::Value(_)) => return None,
                (TargetKind::Toggle(literal), state) => {
                    codec::toggle_value(literal, state == &ConfigValue::Selected).to_string()
                }
                (kind, state) => codec::encode_typed(kind.value_kind(), state)?,
            };
            Some(PlannedWrite {
                pass,
                parameter: mapping.name.clone(),
                symbol: target.symbol.clone(),
                value: text,
                kind: target.kind.value_kind(),
            })
        })
        .collect()
}

fn check_conflicts(select: &[PlannedWrite]) -> Result<()> {
    let mut seen: HashMap<String, &PlannedWrite> = HashMap::new();
    for write in select {
        match seen.get(&symbol_key(&write.symbol)) {
            Some(first) if !same_value(first, write) => {
                return Err(Error::ConflictingSelection {
                    symbol: first.symbol.clone(),
                    members: vec![first.parameter.clone(), write.parameter.clone()],
                });
            }
            Some(_) => {}
            None => {
                seen.insert(symbol_key(&write.symbol), write);
            }
        }
    }
    Ok(())
}

/// Toggle literals compare ASCII case-insensitively, as on extraction.
fn same_value(a: &PlannedWrite, b: &PlannedWrite) -> bool {
    if a.kind == ValueKind::Toggle && b.kind == ValueKind::Toggle {
        a.value.eq_ignore_ascii_case(&b.value)
    } else {
        a.value == b.value
    }
}

/// Collapse successive rewrites of a line into one change from its original
/// text to its final text, dropping lines that ended up unchanged.
fn net_changes(changes: Vec<LineChange>) -> Vec<LineChange> {
    let mut net: Vec<LineChange> = Vec::new();
    for change in changes {
        match net.iter_mut().find(|c| c.line == change.line) {
            Some(existing) => {
                existing.after = change.after;
                existing.symbol = change.symbol;
            }
            None => net.push(change),
        }
    }
    net.retain(|c| c.before != c.after);
    net.sort_by_key(|c| c.line);
    net
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(name: &str, targets: &[(&str, &str)]) -> ParameterMapping {
        ParameterMapping {
            name: name.to_string(),
            source: "bios.mac".to_string(),
            targets: targets
                .iter()
                .map(|(s, v)| cfgsync_schema::Target::new(*s, TargetKind::from_annotation(v)))
                .collect(),
            line: 1,
        }
    }

    #[test]
    fn test_planned_writes_per_state() {
        let cpu = mapping("CPU_K2526", &[("cpu", "k2526")]);
        let selected = planned_writes(&cpu, &ConfigValue::Selected).unwrap();
        assert_eq!(selected[0].value, "k2526");
        assert_eq!(selected[0].pass, Pass::Select);

        let cleared = planned_writes(&cpu, &ConfigValue::Unselected).unwrap();
        assert_eq!(cleared[0].value, "0");
        assert_eq!(cleared[0].pass, Pass::Clear);

        assert!(planned_writes(&cpu, &ConfigValue::Value("x".into())).is_none());

        let top = mapping("TOP", &[("top", "hex")]);
        assert!(planned_writes(&top, &ConfigValue::Selected).is_none());
        assert_eq!(
            planned_writes(&top, &ConfigValue::Unselected).unwrap()[0].value,
            "0"
        );
    }

    #[test]
    fn test_net_changes_collapse_and_drop_noops() {
        let change = |line, before: &str, after: &str| LineChange {
            line,
            symbol: "x".into(),
            before: before.into(),
            after: after.into(),
        };
        let net = net_changes(vec![
            change(3, "x equ 1", "x equ 0"),
            change(1, "y equ 0", "y equ 1"),
            change(3, "x equ 0", "x equ 1"),
        ]);

        assert_eq!(net, vec![change(1, "y equ 0", "y equ 1")]);
    }
}
