//! Per-call resolution state.

use std::sync::Arc;

use cmdbind_types::sender::Sender;

use crate::argument::Argument;
use crate::command::Command;
use crate::value::Value;

/// One argument descriptor paired with the value bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub argument: Arc<Argument>,
    /// `None` for a nullable or optional argument left unset.
    pub value: Option<Value>,
}

/// State threaded through one resolve call.
///
/// `command` starts at the matched top-level command and is reassigned each
/// time resolution descends into a sub-command; the tree it leaves is kept
/// in the trail. Bindings accumulate across descents.
pub struct Context {
    sender: Arc<dyn Sender>,
    alias: String,
    input: String,
    command: Arc<Command>,
    trail: Vec<Arc<Command>>,
    bindings: Vec<Binding>,
}

impl Context {
    pub fn new(
        sender: Arc<dyn Sender>,
        alias: impl Into<String>,
        input: impl Into<String>,
        command: Arc<Command>,
    ) -> Self {
        Self {
            sender,
            alias: alias.into(),
            input: input.into(),
            command,
            trail: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// The invoking identity.
    pub fn sender(&self) -> &Arc<dyn Sender> {
        &self.sender
    }

    /// The alias as originally typed.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The full raw input line.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The command currently being resolved (or resolved, once done).
    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Tree commands passed through before the current one, outermost first.
    pub fn trail(&self) -> &[Arc<Command>] {
        &self.trail
    }

    pub(crate) fn set_command(&mut self, command: Arc<Command>) {
        let parent = std::mem::replace(&mut self.command, command);
        self.trail.push(parent);
    }

    pub(crate) fn bind(&mut self, argument: Arc<Argument>, value: Option<Value>) {
        self.bindings.push(Binding { argument, value });
    }

    /// Value bound to a descriptor equal to `argument` (same name and kind).
    pub fn value_of(&self, argument: &Argument) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|b| *b.argument == *argument)
            .and_then(|b| b.value.as_ref())
    }

    /// Value bound to the first argument with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|b| b.argument.name() == name)
            .and_then(|b| b.value.as_ref())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("sender", &self.sender.name())
            .field("alias", &self.alias)
            .field("input", &self.input)
            .field("command", &self.command.name())
            .field(
                "trail",
                &self.trail.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("bindings", &self.bindings)
            .finish()
    }
}
