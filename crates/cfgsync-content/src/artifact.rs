//! Assembler artifact model
//!
//! The artifact is kept as an arena of lines. Lines that assign a symbol
//! are *managed*:
//!
//! ```text
//! cpu     equ     k2526       ; CPU board
//! @ramdsk:  equ   1
//! kltbef: db      'DIR',0     ; autoexec
//! ```
//!
//! Every other line is opaque. A symbol index built once at load time maps
//! each symbol to the lines assigning it. Writes replace only the operand
//! of a managed line, so everything else on the line and every opaque line
//! is reproduced byte for byte by [`ArtifactDocument::render`].

use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

use cfgsync_schema::ValueKind;
use cfgsync_schema::mapping::symbol_key;
use regex::Regex;
use serde::Serialize;

use crate::diff::LineChange;
use crate::text::{Line, join_lines, split_lines};
use crate::{Error, Result};

/// `[ws][@]symbol[:] equ|defl|= value`
///
/// `set` is left out: a labeled Z80 `set b,r` instruction has the same shape.
static EQU_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*@?([A-Za-z_.$?][A-Za-z0-9_.$?]*):?(?:\s+(?i:equ|defl)\s+|\s*=\s*)([^\s;]+)",
    )
    .expect("Invalid equ regex")
});

/// `[ws][@]symbol[:] db|defb|defm operand`
static DB_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@?([A-Za-z_.$?][A-Za-z0-9_.$?]*):?\s+(?i:db|defb|defm)\s+")
        .expect("Invalid db regex")
});

/// Shape of a managed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentForm {
    /// Numeric operand (`equ` and friends).
    Equ,
    /// String operand (`db` and friends).
    Db,
}

impl AssignmentForm {
    fn accepts(self, kind: ValueKind) -> bool {
        match self {
            Self::Equ => kind.is_numeric(),
            Self::Db => kind == ValueKind::BoundedString,
        }
    }
}

impl std::fmt::Display for AssignmentForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Equ => "equ",
            Self::Db => "db",
        })
    }
}

/// The assignment found on a managed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Symbol as written in the artifact.
    pub symbol: String,
    pub form: AssignmentForm,
    /// Byte range of the operand text. For quoted strings this excludes the
    /// delimiters.
    pub value: Range<usize>,
    /// String delimiter, `None` for `equ` operands and unquoted `db` operands.
    pub quote: Option<char>,
}

/// Parse a line as a managed assignment.
pub fn parse_assignment(text: &str) -> Option<Assignment> {
    if text.trim_start().starts_with(';') {
        return None;
    }

    if let Some(caps) = DB_REGEX.captures(text) {
        let symbol = caps.get(1)?.as_str().to_string();
        let operand_start = caps.get(0)?.end();
        return parse_db_operand(text, operand_start).map(|(value, quote)| Assignment {
            symbol,
            form: AssignmentForm::Db,
            value,
            quote,
        });
    }

    let caps = EQU_REGEX.captures(text)?;
    let value = caps.get(2)?;
    Some(Assignment {
        symbol: caps.get(1)?.as_str().to_string(),
        form: AssignmentForm::Equ,
        value: value.range(),
        quote: None,
    })
}

/// Locate the string inside a `db` operand.
///
/// A quoted operand yields the range between its delimiters, where a doubled
/// delimiter stands for one literal delimiter. An unquoted operand yields
/// the range up to the first `,` (or comment) so that writing a string
/// replaces it.
fn parse_db_operand(text: &str, start: usize) -> Option<(Range<usize>, Option<char>)> {
    let operand = &text[start..];
    let first = operand.chars().next();

    if let Some(delim) = first.filter(|c| matches!(*c, '\'' | '"')) {
        let body_start = start + 1;
        let mut chars = text[body_start..].char_indices().peekable();
        while let Some((offset, ch)) = chars.next() {
            if ch != delim {
                continue;
            }
            if chars.peek().is_some_and(|(_, next)| *next == delim) {
                chars.next();
                continue;
            }
            return Some((body_start..body_start + offset, Some(delim)));
        }
        tracing::debug!(line = %text, "unterminated string operand");
        return None;
    }

    let end = operand
        .find([',', ';'])
        .map_or(operand.trim_end().len(), |idx| operand[..idx].trim_end().len());
    Some((start..start + end, None))
}

fn unescape_string(raw: &str, quote: Option<char>) -> String {
    match quote {
        Some(delim) => {
            let doubled: String = [delim, delim].iter().collect();
            raw.replace(&doubled, &delim.to_string())
        }
        None => String::new(),
    }
}

fn escape_string(text: &str, delim: char) -> String {
    let doubled: String = [delim, delim].iter().collect();
    format!("{delim}{}{delim}", text.replace(delim, &doubled))
}

#[derive(Debug, Clone)]
struct ArtifactLine {
    line: Line,
    assignment: Option<Assignment>,
}

/// Value read from the first assignment site of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactValue {
    /// 1-based line number.
    pub line: usize,
    pub form: AssignmentForm,
    /// Operand text; for strings the unescaped string content.
    pub text: String,
}

/// An artifact held as lines plus a symbol index.
#[derive(Debug, Clone)]
pub struct ArtifactDocument {
    lines: Vec<ArtifactLine>,
    index: HashMap<String, Vec<usize>>,
    modified: bool,
}

impl ArtifactDocument {
    /// Parse artifact text and build the symbol index.
    pub fn parse(text: &str) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        let lines: Vec<ArtifactLine> = split_lines(text)
            .into_iter()
            .enumerate()
            .map(|(idx, line)| {
                let assignment = parse_assignment(&line.text);
                if let Some(a) = &assignment {
                    index.entry(symbol_key(&a.symbol)).or_default().push(idx);
                }
                ArtifactLine { line, assignment }
            })
            .collect();

        tracing::debug!(lines = lines.len(), symbols = index.len(), "indexed artifact");
        Self {
            lines,
            index,
            modified: false,
        }
    }

    /// Reassemble the artifact text.
    pub fn render(&self) -> String {
        let lines: Vec<Line> = self.lines.iter().map(|l| l.line.clone()).collect();
        join_lines(&lines)
    }

    /// Whether any write changed a line.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of distinct symbols with at least one assignment site.
    pub fn symbol_count(&self) -> usize {
        self.index.len()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(&symbol_key(symbol))
    }

    /// Zero-based indices of the lines assigning `symbol`, in file order.
    pub fn sites(&self, symbol: &str) -> &[usize] {
        self.index
            .get(&symbol_key(symbol))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Text of a line by zero-based index.
    pub fn line_text(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(|l| l.line.text.as_str())
    }

    /// Read the value at the first assignment site of `symbol`.
    pub fn read_value(&self, symbol: &str) -> Option<ArtifactValue> {
        let idx = *self.sites(symbol).first()?;
        let entry = &self.lines[idx];
        let assignment = entry.assignment.as_ref()?;
        let raw = &entry.line.text[assignment.value.clone()];

        let text = match assignment.form {
            AssignmentForm::Equ => raw.to_string(),
            AssignmentForm::Db => unescape_string(raw, assignment.quote),
        };
        Some(ArtifactValue {
            line: idx + 1,
            form: assignment.form,
            text,
        })
    }

    /// Write `value` to every assignment site of `symbol`.
    ///
    /// For `equ` lines the operand is replaced; for `db` lines the string
    /// content is replaced and quoted with the line's delimiter (`'` when the
    /// operand was unquoted). Returns one change per line that changed.
    ///
    /// # Errors
    ///
    /// Fails without modifying anything if the symbol has no site, a site
    /// has the wrong form for `kind`, or the value cannot be an operand.
    pub fn write_value(&mut self, symbol: &str, value: &str, kind: ValueKind) -> Result<Vec<LineChange>> {
        let sites = self.sites(symbol).to_vec();
        if sites.is_empty() {
            return Err(Error::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        validate_operand(symbol, value, kind)?;

        let mut rewrites = Vec::with_capacity(sites.len());
        for &idx in &sites {
            let entry = &self.lines[idx];
            let Some(assignment) = &entry.assignment else {
                continue;
            };
            if !assignment.form.accepts(kind) {
                return Err(Error::FormMismatch {
                    symbol: symbol.to_string(),
                    line: idx + 1,
                    found: assignment.form.to_string(),
                    expected: kind.to_string(),
                });
            }

            let text = &entry.line.text;
            let (start, end, operand) = match (assignment.form, assignment.quote) {
                (AssignmentForm::Equ, _) => {
                    (assignment.value.start, assignment.value.end, value.to_string())
                }
                (AssignmentForm::Db, Some(delim)) => (
                    assignment.value.start - 1,
                    assignment.value.end + 1,
                    escape_string(value, delim),
                ),
                (AssignmentForm::Db, None) => {
                    let mut operand = escape_string(value, '\'');
                    if text[assignment.value.end..].starts_with(';') {
                        operand.push(' ');
                    }
                    (assignment.value.start, assignment.value.end, operand)
                }
            };
            let rewritten = format!("{}{}{}", &text[..start], operand, &text[end..]);
            rewrites.push((idx, rewritten));
        }

        let mut changes = Vec::new();
        for (idx, rewritten) in rewrites {
            let entry = &mut self.lines[idx];
            if entry.line.text == rewritten {
                continue;
            }
            tracing::debug!(line = idx + 1, before = %entry.line.text, after = %rewritten, "rewrite");
            changes.push(LineChange {
                line: idx + 1,
                symbol: symbol.to_string(),
                before: std::mem::replace(&mut entry.line.text, rewritten),
                after: entry.line.text.clone(),
            });
            entry.assignment = parse_assignment(&entry.line.text);
            self.modified = true;
        }
        Ok(changes)
    }
}

fn validate_operand(symbol: &str, value: &str, kind: ValueKind) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidOperand {
        symbol: symbol.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.contains(['\r', '\n']) {
        return Err(invalid("contains a line break"));
    }
    if kind.is_numeric() {
        if value.is_empty() {
            return Err(invalid("empty numeric operand"));
        }
        if value.contains(|c: char| c.is_whitespace() || c == ';') {
            return Err(invalid("numeric operand contains whitespace or ';'"));
        }
    }
    Ok(())
}
