//! Kconfig annotation parser
//!
//! Walks the schema line by line, tracking the current `config` block and
//! whether we are inside its help text. Only `source=` lines inside help text
//! are interpreted; everything else in the schema is ignored. Parsing is
//! best-effort: broken annotations are recorded as [`MalformedAnnotation`]s
//! and skipped.

use serde::Serialize;

use crate::mapping::{ParameterMapping, Target, TargetKind, symbol_key};
use crate::schema::Schema;

/// Prefix of an annotation line.
const ANNOTATION_PREFIX: &str = "source=";

/// Width of a tab when measuring help text indentation.
const TAB_WIDTH: usize = 8;

/// Keywords that end the current block (and its help text).
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "config",
    "menuconfig",
    "menu",
    "endmenu",
    "choice",
    "endchoice",
    "if",
    "endif",
    "comment",
    "mainmenu",
    "source",
];

/// A schema line that could not be used, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedAnnotation {
    /// 1-based schema line.
    pub line: usize,
    pub text: String,
    pub reason: String,
}

impl MalformedAnnotation {
    fn new(line: usize, text: &str, reason: impl Into<String>) -> Self {
        Self {
            line,
            text: text.trim().to_string(),
            reason: reason.into(),
        }
    }
}

/// Parser producing a [`Schema`] from Kconfig text.
#[derive(Debug, Clone, Default)]
pub struct SchemaParser {
    source_filter: Option<String>,
}

#[derive(Debug)]
struct Block {
    name: String,
    line: usize,
    source: Option<String>,
    targets: Vec<Target>,
    help: Option<HelpState>,
}

#[derive(Debug, Clone, Copy)]
struct HelpState {
    keyword_indent: usize,
    text_indent: Option<usize>,
}

#[derive(Debug, Default)]
struct ParseState {
    mappings: Vec<ParameterMapping>,
    diagnostics: Vec<MalformedAnnotation>,
    current: Option<Block>,
}

impl SchemaParser {
    /// Parser that accepts annotations for any artifact kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser that only accepts annotations declaring `source=<kind>`.
    pub fn for_source(kind: impl Into<String>) -> Self {
        Self {
            source_filter: Some(kind.into()),
        }
    }

    /// Parse schema text.
    pub fn parse(&self, text: &str) -> Schema {
        let mut state = ParseState::default();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let indent = indentation(raw);

            let in_help = state
                .current
                .as_mut()
                .and_then(|block| block.help.as_mut())
                .map(|help| {
                    let text_indent = *help.text_indent.get_or_insert(indent);
                    indent >= text_indent
                        && !(indent <= help.keyword_indent && is_structural(trimmed))
                });
            match in_help {
                Some(true) => {
                    if trimmed.starts_with(ANNOTATION_PREFIX) {
                        self.annotation(&mut state, line_no, trimmed);
                    }
                    continue;
                }
                Some(false) => {
                    if let Some(block) = state.current.as_mut() {
                        block.help = None;
                    }
                }
                None => {}
            }

            if trimmed.starts_with('#') {
                continue;
            }

            let keyword = trimmed.split_whitespace().next().unwrap_or_default();
            match keyword {
                "config" | "menuconfig" => {
                    state.finish_block();
                    match trimmed.split_whitespace().nth(1) {
                        Some(name) => {
                            state.current = Some(Block {
                                name: name.to_string(),
                                line: line_no,
                                source: None,
                                targets: Vec::new(),
                                help: None,
                            });
                        }
                        None => state.diagnostics.push(MalformedAnnotation::new(
                            line_no,
                            raw,
                            "config keyword without a name",
                        )),
                    }
                }
                "help" | "---help---" => {
                    if let Some(block) = state.current.as_mut() {
                        block.help = Some(HelpState {
                            keyword_indent: indent,
                            text_indent: None,
                        });
                    }
                }
                _ if is_structural(trimmed) => state.finish_block(),
                _ => {}
            }
        }

        state.finish_block();
        Schema::from_parts(state.mappings, state.diagnostics)
    }

    fn annotation(&self, state: &mut ParseState, line_no: usize, text: &str) {
        let Some((source, targets)) = parse_annotation(line_no, text, &mut state.diagnostics)
        else {
            return;
        };

        if let Some(filter) = &self.source_filter
            && !source.eq_ignore_ascii_case(filter)
        {
            tracing::debug!(line = line_no, %source, "annotation for another artifact kind");
            return;
        }

        let Some(block) = state.current.as_mut() else {
            return;
        };

        if let Some(existing) = &block.source
            && !existing.eq_ignore_ascii_case(&source)
        {
            state.diagnostics.push(MalformedAnnotation::new(
                line_no,
                text,
                format!("parameter already maps to source {existing}"),
            ));
            return;
        }
        block.source.get_or_insert(source);

        for target in targets {
            let key = target.symbol_key();
            match block.targets.iter_mut().find(|t| t.symbol_key() == key) {
                Some(existing) => {
                    tracing::debug!(line = line_no, symbol = %target.symbol, "symbol redeclared, later value wins");
                    existing.kind = target.kind;
                }
                None => block.targets.push(target),
            }
        }
    }
}

impl ParseState {
    fn finish_block(&mut self) {
        let Some(block) = self.current.take() else {
            return;
        };
        let Some(source) = block.source else {
            return;
        };
        if block.targets.is_empty() {
            return;
        }

        let typed = block.targets.iter().filter(|t| t.kind.is_typed()).count();
        if typed != 0 && typed != block.targets.len() {
            self.reject(&block.name, block.line, "mixes toggle literals and type tags");
            return;
        }
        if typed > 1 {
            let first = block.targets[0].kind.value_kind();
            if block.targets.iter().any(|t| t.kind.value_kind() != first) {
                self.reject(&block.name, block.line, "mixes different type tags");
                return;
            }
        }
        if self.mappings.iter().any(|m| m.name == block.name) {
            self.reject(&block.name, block.line, "duplicate parameter, first declaration wins");
            return;
        }

        self.mappings.push(ParameterMapping {
            name: block.name,
            source,
            targets: block.targets,
            line: block.line,
        });
    }

    fn reject(&mut self, name: &str, line: usize, reason: &str) {
        tracing::warn!(parameter = %name, line, "{reason}, skipping");
        self.diagnostics.push(MalformedAnnotation::new(
            line,
            &format!("config {name}"),
            reason,
        ));
    }
}

/// Parse one `source=<kind> key=value ...` line.
///
/// Unusable tokens are recorded and skipped; the line is rejected only when
/// no usable target remains.
fn parse_annotation(
    line_no: usize,
    text: &str,
    diagnostics: &mut Vec<MalformedAnnotation>,
) -> Option<(String, Vec<Target>)> {
    let mut tokens = text.split_whitespace();
    let source = tokens
        .next()
        .and_then(|t| t.strip_prefix(ANNOTATION_PREFIX))
        .unwrap_or_default();
    if source.is_empty() {
        diagnostics.push(MalformedAnnotation::new(line_no, text, "empty source kind"));
        return None;
    }

    let mut targets: Vec<Target> = Vec::new();
    for token in tokens {
        match token.split_once('=') {
            Some((symbol, value)) if !symbol.is_empty() && !value.is_empty() => {
                let target = Target::new(symbol, TargetKind::from_annotation(value));
                let key = symbol_key(symbol);
                targets.retain(|t| t.symbol_key() != key);
                targets.push(target);
            }
            _ => diagnostics.push(MalformedAnnotation::new(
                line_no,
                text,
                format!("unusable token {token:?}"),
            )),
        }
    }

    if targets.is_empty() {
        diagnostics.push(MalformedAnnotation::new(line_no, text, "no symbol=value tokens"));
        return None;
    }
    Some((source.to_string(), targets))
}

fn is_structural(trimmed: &str) -> bool {
    let keyword = trimmed.split_whitespace().next().unwrap_or_default();
    STRUCTURAL_KEYWORDS.contains(&keyword)
}

fn indentation(raw: &str) -> usize {
    let mut width = 0;
    for ch in raw.chars() {
        match ch {
            ' ' => width += 1,
            '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => break,
        }
    }
    width
}
