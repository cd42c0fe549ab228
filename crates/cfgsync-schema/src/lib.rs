//! Schema handling for cfgsync
//!
//! A schema is a Kconfig-style file whose `config` blocks carry annotations
//! in their help text:
//!
//! ```text
//! config CPU_K2526
//!     bool "K2526"
//!     help
//!       CPU board K2526
//!       source=bios.mac cpu=k2526
//! ```
//!
//! Each annotation names an artifact kind (`source=bios.mac`) followed by
//! `symbol=value` tokens. A value is either a type tag (`string`, `int`,
//! `hex`) or the literal the symbol must hold while the parameter is
//! selected. Parsing yields one [`ParameterMapping`] per annotated block and
//! the [`ExclusiveGroup`]s formed by parameters competing for a symbol.

pub mod error;
pub mod group;
pub mod mapping;
pub mod parser;
pub mod schema;

pub use error::{Error, Result};
pub use group::ExclusiveGroup;
pub use mapping::{ParameterMapping, Target, TargetKind, ValueKind};
pub use parser::{MalformedAnnotation, SchemaParser};
pub use schema::Schema;
