//! Argument descriptors.
//!
//! Descriptors are built in two phases. An [`ArgSpec`] collects the name,
//! kind and modifiers as plain data. [`Argument::build`] then binds an
//! adapter, lets every modifier adjust an [`ArgumentInit`] once, checks
//! modifier exclusivity, and freezes the result.

use std::fmt;
use std::sync::Arc;

use cmdbind_types::error::{CmdError, Result};
use cmdbind_types::kind::{ArgumentRef, ModifierKind, ValueKind};

use crate::adapter::{Adapter, AdapterRegistry};
use crate::context::Context;
use crate::cursor::Cursor;
use crate::modifier::Modifier;
use crate::value::Value;

/// Plain-data description of one argument slot.
pub struct ArgSpec {
    name: String,
    kind: ValueKind,
    choices: Vec<String>,
    modifiers: Vec<Box<dyn Modifier>>,
}

impl ArgSpec {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            choices: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Bool)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Float)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Str)
    }

    pub fn sender(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Sender)
    }

    /// A choice among named variants.
    pub fn choice<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: variants.into_iter().map(Into::into).collect(),
            ..Self::new(name, ValueKind::Choice)
        }
    }

    /// Attach a modifier. Modifiers run in attachment order.
    pub fn with(mut self, modifier: impl Modifier + 'static) -> Self {
        self.modifiers.push(Box::new(modifier));
        self
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

/// Descriptor fields a modifier may set while the descriptor is built.
pub struct ArgumentInit {
    name: String,
    kind: ValueKind,
    description: Option<String>,
    required: bool,
    syntax: bool,
    default_value: Option<Value>,
    choices: Vec<String>,
    modifier_kinds: Vec<ModifierKind>,
}

impl ArgumentInit {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn has_modifier(&self, kind: ModifierKind) -> bool {
        self.modifier_kinds.contains(&kind)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn set_syntax(&mut self, syntax: bool) {
        self.syntax = syntax;
    }

    pub fn set_default(&mut self, value: Value) {
        self.default_value = Some(value);
    }

    pub fn to_ref(&self) -> ArgumentRef {
        ArgumentRef::new(self.name.clone(), self.kind)
    }
}

/// A frozen argument descriptor.
///
/// Equality compares name and kind only.
pub struct Argument {
    name: String,
    kind: ValueKind,
    description: Option<String>,
    required: bool,
    syntax: bool,
    default_value: Option<Value>,
    choices: Vec<String>,
    adapter: Arc<dyn Adapter>,
    modifiers: Vec<Box<dyn Modifier>>,
}

impl Argument {
    /// Build a descriptor, taking its adapter from the registry.
    pub fn build(spec: ArgSpec, adapters: &AdapterRegistry) -> Result<Self> {
        let adapter = adapters
            .lookup(spec.kind)
            .ok_or(CmdError::NoAdapterFound { kind: spec.kind })?;
        Self::with_adapter(spec, adapter)
    }

    /// Build a descriptor around an explicit adapter.
    pub fn with_adapter(spec: ArgSpec, adapter: Arc<dyn Adapter>) -> Result<Self> {
        let ArgSpec {
            name,
            kind,
            choices,
            modifiers,
        } = spec;

        let mut init = ArgumentInit {
            name,
            kind,
            description: None,
            required: true,
            syntax: adapter.is_syntax(),
            default_value: adapter.default_value(),
            choices,
            modifier_kinds: modifiers.iter().map(|m| m.kind()).collect(),
        };

        // Exclusivity is a property of the attached set, so check it before
        // any modifier touches the descriptor.
        for m in &modifiers {
            for excluded in m.incompatible_with() {
                if let Some(other) = modifiers.iter().find(|o| o.kind() == *excluded) {
                    return Err(CmdError::IncompatibleModifiers {
                        first: m.kind(),
                        second: other.kind(),
                        argument: init.to_ref(),
                    });
                }
            }
        }

        for m in &modifiers {
            if !m.is_required() {
                init.required = false;
            }
            if !m.is_syntax() {
                init.syntax = false;
            }
        }
        for m in &modifiers {
            m.init(&mut init)?;
        }

        Ok(Self {
            name: init.name,
            kind: init.kind,
            description: init.description,
            required: init.required,
            syntax: init.syntax,
            default_value: init.default_value,
            choices: init.choices,
            adapter,
            modifiers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// False when the value is resolved without reading input.
    pub fn is_syntax(&self) -> bool {
        self.syntax
    }

    pub fn is_nullable(&self) -> bool {
        self.adapter.nullable()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Canonical variant matching `word`, case-insensitively.
    pub fn choice(&self, word: &str) -> Option<&str> {
        let word = word.to_lowercase();
        self.choices
            .iter()
            .find(|c| c.to_lowercase() == word)
            .map(String::as_str)
    }

    pub fn has_modifier(&self, kind: ModifierKind) -> bool {
        self.modifiers.iter().any(|m| m.kind() == kind)
    }

    pub fn adapter(&self) -> &Arc<dyn Adapter> {
        &self.adapter
    }

    pub fn to_ref(&self) -> ArgumentRef {
        ArgumentRef::new(self.name.clone(), self.kind)
    }

    /// Usage fragment: `<name>` when required, `[name]` otherwise, nothing
    /// for out-of-syntax arguments.
    pub fn usage(&self) -> Option<String> {
        if !self.syntax {
            return None;
        }
        if self.kind == ValueKind::Choice && !self.choices.is_empty() {
            let alts = self.choices.join("|");
            return Some(if self.required {
                format!("<{alts}>")
            } else {
                format!("[{alts}]")
            });
        }
        Some(if self.required {
            format!("<{}>", self.name)
        } else {
            format!("[{}]", self.name)
        })
    }

    pub fn out_of_syntax(&self, ctx: &Context) -> Option<Value> {
        self.adapter.out_of_syntax(ctx)
    }

    pub fn parse(&self, cursor: &mut Cursor<'_>, ctx: &Context) -> Result<Option<Value>> {
        self.adapter.parse(cursor, self, ctx)
    }

    /// Run the modifier pipeline. Each modifier sees the previous result; a
    /// `None` return leaves the value unchanged.
    pub fn process(&self, mut value: Option<Value>, ctx: &Context) -> Result<Option<Value>> {
        for m in &self.modifiers {
            if let Some(replaced) = m.process(value.as_ref(), self, ctx)? {
                log::trace!("{}: {} replaced value with {replaced:?}", self.name, m.kind());
                value = Some(replaced);
            }
        }
        Ok(value)
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("syntax", &self.syntax)
            .field("default_value", &self.default_value)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
