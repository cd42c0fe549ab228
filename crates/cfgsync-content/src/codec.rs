//! Value conversion between configuration and artifact form
//!
//! Configuration values are `y`, `# KEY is not set`, or text (usually
//! quoted). Artifact values are `equ` operands or the text of a `db` string.

use cfgsync_schema::ValueKind;
use serde::Serialize;

/// Artifact value written for a cleared integer or hex target.
pub const NUMERIC_ZERO: &str = "0";

/// State of one configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ConfigValue {
    Selected,
    Unselected,
    /// Free-form text, stored without configuration quoting.
    Value(String),
}

impl ConfigValue {
    /// Decode the right-hand side of a `KEY=<raw>` line.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "y" => Self::Selected,
            "n" => Self::Unselected,
            quoted if quoted.len() >= 2 && quoted.starts_with('"') && quoted.ends_with('"') => {
                Self::Value(unquote(&quoted[1..quoted.len() - 1]))
            }
            other => Self::Value(other.to_string()),
        }
    }

    /// Render the configuration line for `key`.
    pub fn render(&self, key: &str) -> String {
        match self {
            Self::Selected => format!("{key}=y"),
            Self::Unselected => format!("# {key} is not set"),
            Self::Value(text) => format!("{key}={}", quote(text)),
        }
    }

    pub fn is_selected(&self) -> bool {
        !matches!(self, Self::Unselected)
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selected => f.write_str("y"),
            Self::Unselected => f.write_str("is not set"),
            Self::Value(text) => write!(f, "{}", quote(text)),
        }
    }
}

/// Quote text for the configuration file, escaping `\` and `"`.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Undo [`quote`] on the text between the quotes.
pub fn unquote(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.extend(chars.next()),
            other => out.push(other),
        }
    }
    out
}

/// Strip one pair of surrounding quote marks (`"` or `'`), if present.
pub fn strip_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed
}

/// The value a toggle target holds while its parameter is not selected.
///
/// Binary literals are complemented; any other literal clears to `0`.
pub fn cleared_literal(literal: &str) -> &'static str {
    match literal {
        "1" => "0",
        "0" => "1",
        _ => NUMERIC_ZERO,
    }
}

/// Artifact value of a toggle target for the given selection.
pub fn toggle_value(literal: &str, selected: bool) -> &str {
    if selected {
        literal
    } else {
        cleared_literal(literal)
    }
}

/// Whether an observed artifact value equals a toggle literal.
pub fn matches_literal(observed: &str, literal: &str) -> bool {
    observed.eq_ignore_ascii_case(literal)
}

/// Whether `text` is the integer/hex "not set" sentinel: empty, or zero in
/// assembler notation (`0`, `00h`, `0x0`, ...).
pub fn is_zero_sentinel(text: &str) -> bool {
    let text = strip_quotes(text);
    if text.is_empty() {
        return true;
    }
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_suffix(['h', 'H']))
        .unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b == b'0')
}

/// Configuration state of a typed target from its artifact value.
pub fn decode_typed(kind: ValueKind, observed: &str) -> ConfigValue {
    let unset = match kind {
        ValueKind::BoundedString => observed.is_empty(),
        _ => is_zero_sentinel(observed),
    };
    if unset {
        ConfigValue::Unselected
    } else {
        ConfigValue::Value(observed.to_string())
    }
}

/// Artifact value of a typed target for a configuration state.
///
/// Returns `None` for [`ConfigValue::Selected`], which carries no text.
/// String text is written verbatim; the artifact applies its own quoting.
/// Numeric text loses surrounding whitespace and one pair of quotes.
pub fn encode_typed(kind: ValueKind, value: &ConfigValue) -> Option<String> {
    let text = match value {
        ConfigValue::Selected => return None,
        ConfigValue::Unselected => "",
        ConfigValue::Value(text) if kind == ValueKind::BoundedString => text,
        ConfigValue::Value(text) => strip_quotes(text),
    };
    match kind {
        ValueKind::BoundedString => Some(text.to_string()),
        _ if text.is_empty() => Some(NUMERIC_ZERO.to_string()),
        _ => Some(text.to_string()),
    }
}
