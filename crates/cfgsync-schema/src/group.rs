//! Mutually exclusive parameter groups
//!
//! Two parameters compete when they write different values to the same
//! symbol. Groups are the connected components of that relation, so a
//! selector like a disk type spread over several flags ends up as a single
//! group even when not every pair of members shares every symbol.

use std::collections::HashMap;

use serde::Serialize;

use crate::mapping::{ParameterMapping, TargetKind};

/// A set of parameters of which at most one may be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusiveGroup {
    /// Member parameter names in schema order.
    pub members: Vec<String>,
    /// Symbols written with differing values by members, in first-use order.
    pub symbols: Vec<String>,
}

impl ExclusiveGroup {
    pub fn contains(&self, parameter: &str) -> bool {
        self.members.iter().any(|m| m == parameter)
    }
}

/// The value a target would write while its parameter is selected.
/// Typed targets write configuration text, which differs from any literal.
fn write_signature(kind: &TargetKind) -> String {
    match kind {
        TargetKind::Toggle(literal) => literal.to_ascii_lowercase(),
        other => format!("<{}>", other.value_kind()),
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut idx: usize) -> usize {
        while self.parent[idx] != idx {
            self.parent[idx] = self.parent[self.parent[idx]];
            idx = self.parent[idx];
        }
        idx
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Keep the earliest parameter as root so groups order by schema position.
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }
}

/// Compute the exclusive groups of a mapping table.
pub fn compute_groups(mappings: &[ParameterMapping]) -> Vec<ExclusiveGroup> {
    // symbol key -> (display name, [(parameter index, signature)])
    let mut writers: Vec<(String, Vec<(usize, String)>)> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for (idx, mapping) in mappings.iter().enumerate() {
        for target in &mapping.targets {
            let slot = *by_key.entry(target.symbol_key()).or_insert_with(|| {
                writers.push((target.symbol.clone(), Vec::new()));
                writers.len() - 1
            });
            writers[slot].1.push((idx, write_signature(&target.kind)));
        }
    }

    let mut uf = UnionFind::new(mappings.len());
    let mut contested: Vec<&str> = Vec::new();
    for (symbol, entries) in &writers {
        let first = &entries[0].1;
        if entries.iter().all(|(_, sig)| sig == first) {
            continue;
        }
        contested.push(symbol);
        for (idx, _) in &entries[1..] {
            uf.union(entries[0].0, *idx);
        }
    }

    let mut groups: Vec<(usize, ExclusiveGroup)> = Vec::new();
    for (idx, mapping) in mappings.iter().enumerate() {
        let root = uf.find(idx);
        match groups.iter_mut().find(|(r, _)| *r == root) {
            Some((_, group)) => group.members.push(mapping.name.clone()),
            None => groups.push((
                root,
                ExclusiveGroup {
                    members: vec![mapping.name.clone()],
                    symbols: Vec::new(),
                },
            )),
        }
    }

    let mut groups: Vec<ExclusiveGroup> = groups
        .into_iter()
        .map(|(_, g)| g)
        .filter(|g| g.members.len() > 1)
        .collect();

    for symbol in contested {
        let owner = mappings
            .iter()
            .find(|m| m.target(symbol).is_some())
            .map(|m| m.name.as_str());
        if let Some(group) = owner.and_then(|name| groups.iter_mut().find(|g| g.contains(name))) {
            group.symbols.push(symbol.to_string());
        }
    }

    groups
}
