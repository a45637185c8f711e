//! Argument modifiers.
//!
//! A modifier is attached to one argument and acts at two times: once while
//! the descriptor is built ([`Modifier::init`]) and once per resolve call
//! ([`Modifier::process`]). Exclusivity between modifier kinds is declared
//! with [`Modifier::incompatible_with`] and checked when the descriptor is
//! built.

use std::fmt;

use cmdbind_types::error::{CmdError, Result};
use cmdbind_types::kind::{ModifierKind, ValueKind};

use crate::argument::{Argument, ArgumentInit};
use crate::context::Context;
use crate::value::Value;

/// Behavior attached to an argument descriptor.
pub trait Modifier: Send + Sync + fmt::Debug {
    fn kind(&self) -> ModifierKind;

    /// Returning false marks the argument non-required.
    fn is_required(&self) -> bool {
        true
    }

    /// Returning false marks the argument non-syntax: its pipeline runs
    /// before any input is read.
    fn is_syntax(&self) -> bool {
        true
    }

    /// Modifier kinds that may not be attached alongside this one.
    fn incompatible_with(&self) -> &[ModifierKind] {
        &[]
    }

    /// Adjust the descriptor while it is built.
    fn init(&self, _arg: &mut ArgumentInit) -> Result<()> {
        Ok(())
    }

    /// Transform or validate the current value. `Ok(None)` keeps it.
    fn process(
        &self,
        _value: Option<&Value>,
        _arg: &Argument,
        _ctx: &Context,
    ) -> Result<Option<Value>> {
        Ok(None)
    }
}

fn invalid(modifier: ModifierKind, arg: &ArgumentInit, reason: impl Into<String>) -> CmdError {
    CmdError::InvalidModifier {
        modifier,
        argument: arg.to_ref(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// rename
// ---------------------------------------------------------------------------

/// Gives the argument a display name and optional description.
#[derive(Debug, Clone)]
pub struct Rename {
    name: String,
    description: Option<String>,
}

impl Rename {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Modifier for Rename {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Rename
    }

    fn init(&self, arg: &mut ArgumentInit) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid(self.kind(), arg, "name must not be empty"));
        }
        arg.set_name(self.name.clone());
        if let Some(desc) = &self.description {
            arg.set_description(desc.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// range
// ---------------------------------------------------------------------------

/// Rejects numeric values outside `[min, max]`. Infinite bounds are open.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self::new(min, f64::INFINITY)
    }

    pub fn at_most(max: f64) -> Self {
        Self::new(f64::NEG_INFINITY, max)
    }

    fn violation(&self, name: &str) -> String {
        match (self.min.is_finite(), self.max.is_finite()) {
            (true, true) => format!("{name} value must be between {} and {}!", self.min, self.max),
            (false, true) => format!("{name} value must be smaller than {}!", self.max),
            _ => format!("{name} value must be greater than {}!", self.min),
        }
    }
}

impl Modifier for Range {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Range
    }

    fn init(&self, arg: &mut ArgumentInit) -> Result<()> {
        if !arg.kind().is_numeric() {
            return Err(invalid(self.kind(), arg, "only numbers can be range-checked"));
        }
        if self.min.is_nan() || self.max.is_nan() || self.min > self.max {
            return Err(invalid(
                self.kind(),
                arg,
                format!("empty range [{}, {}]", self.min, self.max),
            ));
        }
        Ok(())
    }

    fn process(
        &self,
        value: Option<&Value>,
        arg: &Argument,
        _ctx: &Context,
    ) -> Result<Option<Value>> {
        let Some(n) = value.and_then(Value::as_f64) else {
            return Ok(None);
        };
        if n < self.min || n > self.max {
            return Err(CmdError::InvalidArgument {
                argument: arg.to_ref(),
                reason: self.violation(arg.name()),
            });
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// default
// ---------------------------------------------------------------------------

/// Supplies a value when none was given. Makes the argument non-required.
#[derive(Debug, Clone)]
pub struct DefaultValue {
    value: Value,
}

impl DefaultValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Fit the configured value to the argument's kind.
    fn coerce(&self, arg: &ArgumentInit) -> Option<Value> {
        match (arg.kind(), &self.value) {
            (ValueKind::Float, Value::Int(n)) => Some(Value::Float(*n as f64)),
            (ValueKind::Choice, Value::Str(s) | Value::Choice(s)) => arg
                .choices()
                .iter()
                .find(|c| c.to_lowercase() == s.to_lowercase())
                .map(|c| Value::Choice(c.clone())),
            (kind, v) if v.kind() == kind => Some(v.clone()),
            _ => None,
        }
    }
}

impl Modifier for DefaultValue {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Default
    }

    fn is_required(&self) -> bool {
        false
    }

    fn incompatible_with(&self) -> &[ModifierKind] {
        &[ModifierKind::Optional]
    }

    fn init(&self, arg: &mut ArgumentInit) -> Result<()> {
        let value = self.coerce(arg).ok_or_else(|| {
            invalid(
                self.kind(),
                arg,
                format!("default {:?} does not fit {}", self.value, arg.kind()),
            )
        })?;
        arg.set_default(value);
        Ok(())
    }

    fn process(
        &self,
        value: Option<&Value>,
        arg: &Argument,
        _ctx: &Context,
    ) -> Result<Option<Value>> {
        if value.is_none() {
            return Ok(arg.default_value().cloned());
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// optional
// ---------------------------------------------------------------------------

/// Lets the argument be left out; it then binds as absent.
#[derive(Debug, Clone, Copy)]
pub struct Optional;

impl Modifier for Optional {
    fn kind(&self) -> ModifierKind {
        ModifierKind::Optional
    }

    fn is_required(&self) -> bool {
        false
    }

    fn incompatible_with(&self) -> &[ModifierKind] {
        &[ModifierKind::Default]
    }
}

// ---------------------------------------------------------------------------
// multi-word
// ---------------------------------------------------------------------------

/// String argument that takes the rest of the line.
#[derive(Debug, Clone, Copy)]
pub struct MultiWord;

impl Modifier for MultiWord {
    fn kind(&self) -> ModifierKind {
        ModifierKind::MultiWord
    }

    fn init(&self, arg: &mut ArgumentInit) -> Result<()> {
        if arg.kind() != ValueKind::Str {
            return Err(invalid(self.kind(), arg, "only strings can span words"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_messages_by_finite_bounds() {
        assert_eq!(
            Range::new(1.0, 6.0).violation("max"),
            "max value must be between 1 and 6!"
        );
        assert_eq!(
            Range::at_most(10.0).violation("n"),
            "n value must be smaller than 10!"
        );
        assert_eq!(
            Range::at_least(1.0).violation("amount"),
            "amount value must be greater than 1!"
        );
    }

    #[test]
    fn fractional_bounds_keep_precision() {
        assert_eq!(
            Range::new(0.5, 2.5).violation("f"),
            "f value must be between 0.5 and 2.5!"
        );
    }

    #[test]
    fn default_and_optional_exclude_each_other() {
        assert_eq!(
            DefaultValue::new(1).incompatible_with(),
            &[ModifierKind::Optional]
        );
        assert_eq!(Optional.incompatible_with(), &[ModifierKind::Default]);
    }

    #[test]
    fn requiredness_flags() {
        assert!(!DefaultValue::new(1).is_required());
        assert!(!Optional.is_required());
        assert!(Range::at_least(0.0).is_required());
        assert!(MultiWord.is_syntax());
    }
}
