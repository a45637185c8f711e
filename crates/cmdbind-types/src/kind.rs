//! Value kind and modifier kind tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of argument value kinds.
///
/// Every argument descriptor is tagged with exactly one kind, and the adapter
/// registry is keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    /// Free text: a single word, or the rest of the input.
    Str,
    /// One of a fixed set of named variants.
    Choice,
    /// The invoking identity. Never read from text.
    Sender,
    /// The next command in a sub-command tree.
    SubCommand,
}

impl ValueKind {
    /// Lower-case name used in usage strings and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
            Self::Choice => "choice",
            Self::Sender => "sender",
            Self::SubCommand => "sub command",
        }
    }

    /// Whether values of this kind are numbers.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tag identifying a modifier type attached to an argument.
///
/// Used for exclusivity checks and for adapters that change behavior when a
/// given modifier is present (e.g. multi-word strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Rename,
    Range,
    Default,
    Optional,
    MultiWord,
    /// Modifier defined outside this crate family.
    Custom(&'static str),
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rename => f.write_str("rename"),
            Self::Range => f.write_str("range"),
            Self::Default => f.write_str("default"),
            Self::Optional => f.write_str("optional"),
            Self::MultiWord => f.write_str("multi-word"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Lightweight identification of an argument descriptor, carried by errors.
///
/// Two references are equal iff name and kind match, mirroring descriptor
/// equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgumentRef {
    pub name: String,
    pub kind: ValueKind,
}

impl ArgumentRef {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for ArgumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
