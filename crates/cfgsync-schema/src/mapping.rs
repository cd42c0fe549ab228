//! Parameter mapping types

use serde::Serialize;

/// Type tag for free-form text targets.
pub const TAG_STRING: &str = "string";
/// Type tag for integer targets.
pub const TAG_INT: &str = "int";
/// Type tag for hexadecimal targets.
pub const TAG_HEX: &str = "hex";
/// Legacy spelling of [`TAG_HEX`].
pub const TAG_HEXSTRING: &str = "hexstring";

/// How a target symbol's value relates to the configuration state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "literal", rename_all = "snake_case")]
pub enum TargetKind {
    /// The symbol holds `literal` while the parameter is selected.
    Toggle(String),
    /// The symbol holds the configured integer (`equ` operand).
    IntegerLiteral,
    /// The symbol holds the configured text (`db 'text',0`).
    BoundedString,
    /// The symbol holds the configured hexadecimal number (`equ` operand).
    HexString,
}

impl TargetKind {
    /// Classify the right-hand side of an annotation token.
    pub fn from_annotation(value: &str) -> Self {
        match value {
            TAG_STRING => Self::BoundedString,
            TAG_INT => Self::IntegerLiteral,
            TAG_HEX | TAG_HEXSTRING => Self::HexString,
            literal => Self::Toggle(literal.to_string()),
        }
    }

    /// The selected literal of a toggle target.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Toggle(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn is_typed(&self) -> bool {
        !matches!(self, Self::Toggle(_))
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::Toggle(_) => ValueKind::Toggle,
            Self::IntegerLiteral => ValueKind::Integer,
            Self::BoundedString => ValueKind::BoundedString,
            Self::HexString => ValueKind::HexString,
        }
    }
}

/// The value kind of a whole parameter, without per-target literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Toggle,
    Integer,
    BoundedString,
    HexString,
}

impl ValueKind {
    pub fn is_typed(self) -> bool {
        self != Self::Toggle
    }

    /// Whether the artifact holds this kind as an `equ`-style operand
    /// rather than a `db` string.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Toggle | Self::Integer | Self::HexString)
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Toggle => "toggle",
            Self::Integer => TAG_INT,
            Self::BoundedString => TAG_STRING,
            Self::HexString => TAG_HEX,
        };
        f.write_str(name)
    }
}

/// One artifact symbol controlled by a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Target {
    pub symbol: String,
    pub kind: TargetKind,
}

impl Target {
    pub fn new(symbol: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
        }
    }

    /// Lookup key for the symbol. Assembler symbols are case-insensitive.
    pub fn symbol_key(&self) -> String {
        symbol_key(&self.symbol)
    }
}

/// Canonical lookup key for an assembler symbol.
pub fn symbol_key(symbol: &str) -> String {
    symbol.to_ascii_lowercase()
}

/// A schema-declared parameter and the artifact symbols it controls.
///
/// A parameter with several targets updates all of them together, and is
/// only considered selected when every target holds its literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterMapping {
    /// Parameter name without configuration key prefix.
    pub name: String,
    /// Artifact kind named by `source=`.
    pub source: String,
    /// Targets in declaration order, one per symbol.
    pub targets: Vec<Target>,
    /// 1-based line of the `config` keyword in the schema.
    pub line: usize,
}

impl ParameterMapping {
    /// Configuration key for this parameter, e.g. `CONFIG_CPU_K2526`.
    pub fn config_key(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.name)
    }

    /// Value kind of the parameter.
    ///
    /// The parser never produces a parameter that mixes toggle and typed
    /// targets, so the first target decides.
    pub fn kind(&self) -> ValueKind {
        self.targets
            .first()
            .map_or(ValueKind::Toggle, |t| t.kind.value_kind())
    }

    pub fn is_multi_target(&self) -> bool {
        self.targets.len() > 1
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.symbol.as_str())
    }

    /// Find the target for `symbol` (case-insensitive).
    pub fn target(&self, symbol: &str) -> Option<&Target> {
        self.targets
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }
}
