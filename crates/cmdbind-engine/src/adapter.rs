//! Value adapters: per-kind strategies that turn input text into values.
//!
//! The [`AdapterRegistry`] maps each [`ValueKind`] to one adapter. Lookup
//! tries an exact kind match first, then the first registered adapter that
//! declares the requested kind compatible.

use std::sync::Arc;

use cmdbind_types::error::{CmdError, Result};
use cmdbind_types::kind::{ModifierKind, ValueKind};

use crate::argument::Argument;
use crate::command::SubCommands;
use crate::context::Context;
use crate::cursor::{Cursor, ReadError};
use crate::value::Value;

/// Parsing and value-supply strategy for one value kind.
pub trait Adapter: Send + Sync {
    /// The kind this adapter is registered under.
    fn kind(&self) -> ValueKind;

    /// Whether this adapter can also serve `kind`. Used by the registry's
    /// fallback lookup.
    fn accepts(&self, kind: ValueKind) -> bool {
        kind == self.kind()
    }

    /// Read a value for `arg` from the cursor.
    fn parse(
        &self,
        cursor: &mut Cursor<'_>,
        arg: &Argument,
        ctx: &Context,
    ) -> Result<Option<Value>>;

    /// Whether an absent value is acceptable.
    fn nullable(&self) -> bool {
        false
    }

    /// Whether values come from the input text at all.
    fn is_syntax(&self) -> bool {
        true
    }

    /// Value supplied without reading input (e.g. the sender).
    fn out_of_syntax(&self, _ctx: &Context) -> Option<Value> {
        None
    }

    /// Fallback value for arguments of this kind.
    fn default_value(&self) -> Option<Value> {
        None
    }
}

/// Convert a cursor failure into an error naming the argument.
pub fn read_error(arg: &Argument, err: ReadError) -> CmdError {
    match err {
        ReadError::OutOfBounds { position } => CmdError::OutOfBounds { position },
        ReadError::Malformed { expected, token } => CmdError::Parse {
            argument: arg.to_ref(),
            token,
            expected: expected.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Built-in adapters
// ---------------------------------------------------------------------------

/// `true` / `false`, case-insensitive.
pub struct BoolAdapter;

impl Adapter for BoolAdapter {
    fn kind(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn parse(
        &self,
        cursor: &mut Cursor<'_>,
        arg: &Argument,
        _ctx: &Context,
    ) -> Result<Option<Value>> {
        let b = cursor.read_bool().map_err(|e| read_error(arg, e))?;
        Ok(Some(Value::Bool(b)))
    }
}

/// Integers and floats. The argument's declared kind picks the reading.
pub struct NumberAdapter;

impl Adapter for NumberAdapter {
    fn kind(&self) -> ValueKind {
        ValueKind::Float
    }

    fn accepts(&self, kind: ValueKind) -> bool {
        kind.is_numeric()
    }

    fn parse(
        &self,
        cursor: &mut Cursor<'_>,
        arg: &Argument,
        _ctx: &Context,
    ) -> Result<Option<Value>> {
        let value = if arg.kind() == ValueKind::Int {
            Value::Int(cursor.read_int().map_err(|e| read_error(arg, e))?)
        } else {
            Value::Float(cursor.read_number().map_err(|e| read_error(arg, e))?)
        };
        Ok(Some(value))
    }
}

/// A single word, or the rest of the line for multi-word arguments.
pub struct StringAdapter;

impl Adapter for StringAdapter {
    fn kind(&self) -> ValueKind {
        ValueKind::Str
    }

    fn parse(
        &self,
        cursor: &mut Cursor<'_>,
        arg: &Argument,
        _ctx: &Context,
    ) -> Result<Option<Value>> {
        if arg.has_modifier(ModifierKind::MultiWord) {
            return Ok(Some(Value::Str(cursor.read_rest().to_string())));
        }
        let word = cursor.read_word();
        if word.is_empty() {
            return Err(CmdError::Parse {
                argument: arg.to_ref(),
                token: cursor.rest().to_string(),
                expected: "word".to_string(),
            });
        }
        Ok(Some(Value::Str(word.to_string())))
    }
}

/// One word matched case-insensitively against the argument's variants.
pub struct ChoiceAdapter;

impl Adapter for ChoiceAdapter {
    fn kind(&self) -> ValueKind {
        ValueKind::Choice
    }

    fn parse(
        &self,
        cursor: &mut Cursor<'_>,
        arg: &Argument,
        _ctx: &Context,
    ) -> Result<Option<Value>> {
        let word = cursor.read_word();
        match arg.choice(word) {
            Some(variant) => Ok(Some(Value::Choice(variant.to_string()))),
            None => Err(CmdError::Parse {
                argument: arg.to_ref(),
                token: word.to_string(),
                expected: arg.kind().name().to_string(),
            }),
        }
    }
}

/// The invoking identity. Never read from text.
pub struct SenderAdapter;

impl Adapter for SenderAdapter {
    fn kind(&self) -> ValueKind {
        ValueKind::Sender
    }

    fn parse(
        &self,
        _cursor: &mut Cursor<'_>,
        _arg: &Argument,
        _ctx: &Context,
    ) -> Result<Option<Value>> {
        Ok(None)
    }

    fn is_syntax(&self) -> bool {
        false
    }

    fn out_of_syntax(&self, ctx: &Context) -> Option<Value> {
        Some(Value::Sender(Arc::clone(ctx.sender())))
    }
}

/// Selects a child of a sub-command tree.
///
/// Bound directly to a tree's synthetic argument rather than registered,
/// since each tree has its own children.
pub struct SubCommandAdapter {
    subs: Arc<SubCommands>,
}

impl SubCommandAdapter {
    pub fn new(subs: Arc<SubCommands>) -> Self {
        Self { subs }
    }
}

impl Adapter for SubCommandAdapter {
    fn kind(&self) -> ValueKind {
        ValueKind::SubCommand
    }

    fn parse(
        &self,
        cursor: &mut Cursor<'_>,
        _arg: &Argument,
        _ctx: &Context,
    ) -> Result<Option<Value>> {
        let start = cursor.position();
        let word = cursor.read_word();
        if let Some(child) = self.subs.find(word) {
            return Ok(Some(Value::Command(Arc::clone(child))));
        }
        if let Some(default) = self.subs.default_child() {
            log::trace!(
                "'{word}' matches no sub command, rewinding to default '{}'",
                default.name()
            );
            cursor
                .set_position(start)
                .map_err(|_| CmdError::OutOfBounds { position: start })?;
            return Ok(Some(Value::Command(Arc::clone(default))));
        }
        Err(CmdError::UnknownSubCommand {
            word: word.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Adapters keyed by value kind, in registration order.
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn Adapter>>,
}

impl AdapterRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// A registry holding the built-in boolean, number, string, choice and
    /// sender adapters.
    pub fn new() -> Self {
        let mut reg = Self::empty();
        reg.register(Arc::new(BoolAdapter));
        reg.register(Arc::new(NumberAdapter));
        reg.register(Arc::new(StringAdapter));
        reg.register(Arc::new(ChoiceAdapter));
        reg.register(Arc::new(SenderAdapter));
        reg
    }

    /// Register an adapter. Replaces any adapter registered under the same
    /// kind, keeping its position.
    pub fn register(&mut self, adapter: Arc<dyn Adapter>) {
        let kind = adapter.kind();
        match self.adapters.iter_mut().find(|a| a.kind() == kind) {
            Some(slot) => {
                log::warn!("Replacing adapter for {kind}");
                *slot = adapter;
            },
            None => self.adapters.push(adapter),
        }
    }

    /// Adapter for `kind`: exact match first, then the first compatible one.
    pub fn lookup(&self, kind: ValueKind) -> Option<Arc<dyn Adapter>> {
        self.adapters
            .iter()
            .find(|a| a.kind() == kind)
            .or_else(|| self.adapters.iter().find(|a| a.accepts(kind)))
            .map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct IntOnly;

    impl Adapter for IntOnly {
        fn kind(&self) -> ValueKind {
            ValueKind::Int
        }

        fn parse(
            &self,
            _cursor: &mut Cursor<'_>,
            _arg: &Argument,
            _ctx: &Context,
        ) -> Result<Option<Value>> {
            Ok(Some(Value::Int(99)))
        }
    }

    #[test]
    fn builtins_cover_all_text_kinds() {
        let reg = AdapterRegistry::new();
        for kind in [
            ValueKind::Bool,
            ValueKind::Int,
            ValueKind::Float,
            ValueKind::Str,
            ValueKind::Choice,
            ValueKind::Sender,
        ] {
            assert!(reg.lookup(kind).is_some(), "no adapter for {kind}");
        }
    }

    #[test]
    fn sub_command_is_not_registered() {
        assert!(AdapterRegistry::new().lookup(ValueKind::SubCommand).is_none());
    }

    #[test]
    fn int_falls_back_to_number_adapter() {
        let reg = AdapterRegistry::new();
        let adapter = reg.lookup(ValueKind::Int).unwrap();
        assert_eq!(adapter.kind(), ValueKind::Float);
    }

    #[test]
    fn exact_match_beats_fallback() {
        let mut reg = AdapterRegistry::new();
        reg.register(Arc::new(IntOnly));
        assert_eq!(reg.lookup(ValueKind::Int).unwrap().kind(), ValueKind::Int);
        assert_eq!(reg.lookup(ValueKind::Float).unwrap().kind(), ValueKind::Float);
    }

    #[test]
    fn register_replaces_same_kind() {
        let mut reg = AdapterRegistry::new();
        let before = reg.len();
        reg.register(Arc::new(BoolAdapter));
        assert_eq!(reg.len(), before);
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let reg = AdapterRegistry::empty();
        assert!(reg.is_empty());
        assert!(reg.lookup(ValueKind::Bool).is_none());
    }

    #[test]
    fn sender_adapter_is_out_of_syntax() {
        assert!(!SenderAdapter.is_syntax());
        assert!(BoolAdapter.is_syntax());
    }
}
