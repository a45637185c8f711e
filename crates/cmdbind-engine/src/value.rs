//! Bound argument values.

use std::fmt;
use std::sync::Arc;

use cmdbind_types::kind::ValueKind;
use cmdbind_types::sender::Sender;

use crate::command::Command;

/// A typed value bound to one argument slot.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Canonical variant name of a choice argument.
    Choice(String),
    Sender(Arc<dyn Sender>),
    /// Selected child of a sub-command tree.
    Command(Arc<Command>),
}

impl Value {
    /// The kind tag this value satisfies.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Choice(_) => ValueKind::Choice,
            Self::Sender(_) => ValueKind::Sender,
            Self::Command(_) => ValueKind::SubCommand,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of an int or float value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view of a string or choice value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sender(&self) -> Option<&Arc<dyn Sender>> {
        match self {
            Self::Sender(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&Arc<Command>> {
        match self {
            Self::Command(c) => Some(c),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) | (Self::Choice(a), Self::Choice(b)) => a == b,
            (Self::Sender(a), Self::Sender(b)) => Arc::ptr_eq(a, b),
            (Self::Command(a), Self::Command(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Choice(s) => f.debug_tuple("Choice").field(s).finish(),
            Self::Sender(s) => f.debug_tuple("Sender").field(&s.name()).finish(),
            Self::Command(c) => f.debug_tuple("Command").field(&c.name()).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) | Self::Choice(s) => f.write_str(s),
            Self::Sender(s) => f.write_str(s.name()),
            Self::Command(c) => f.write_str(c.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::from(3).kind(), ValueKind::Int);
        assert_eq!(Value::from(0.5).kind(), ValueKind::Float);
        assert_eq!(Value::from("x").kind(), ValueKind::Str);
        assert_eq!(Value::Choice("A".into()).kind(), ValueKind::Choice);
    }

    #[test]
    fn numeric_view() {
        assert_eq!(Value::Int(4).as_f64(), Some(4.0));
        assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::Str("4".into()).as_f64(), None);
    }

    #[test]
    fn str_and_choice_are_distinct() {
        assert_ne!(Value::Str("a".into()), Value::Choice("a".into()));
        assert_eq!(Value::Choice("a".into()).as_str(), Some("a"));
    }

    #[test]
    fn int_and_float_are_distinct() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Str("hi there".into()).to_string(), "hi there");
    }
}
