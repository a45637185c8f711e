//! Command definitions, sub-command trees, and handler invocation.

use std::fmt;
use std::sync::Arc;

use cmdbind_types::error::{BoxError, CmdError, Result};
use cmdbind_types::kind::ValueKind;
use cmdbind_types::outcome::Outcome;
use cmdbind_types::sender::Sender;

use crate::adapter::{AdapterRegistry, SubCommandAdapter};
use crate::argument::{ArgSpec, Argument};
use crate::context::Context;
use crate::reply::Reply;
use crate::value::Value;

/// Name of the synthetic argument carried by tree commands.
pub const SUB_COMMAND_ARG: &str = "sub command";

/// Boxed command handler.
pub type Handler =
    Box<dyn Fn(&Invocation<'_>) -> std::result::Result<Reply, BoxError> + Send + Sync>;

/// Extra access predicate evaluated against the sender.
pub type Requirement = Box<dyn Fn(&dyn Sender) -> bool + Send + Sync>;

/// The children of a tree command.
pub struct SubCommands {
    children: Vec<Arc<Command>>,
    default: Option<Arc<Command>>,
}

impl SubCommands {
    /// First child whose name or alias matches `word`, case-insensitively.
    pub fn find(&self, word: &str) -> Option<&Arc<Command>> {
        self.children.iter().find(|c| c.matches(word))
    }

    pub fn children(&self) -> &[Arc<Command>] {
        &self.children
    }

    /// Child selected when the next word matches no other child.
    pub fn default_child(&self) -> Option<&Arc<Command>> {
        self.default.as_ref()
    }
}

/// A registered command: either a leaf with a handler, or a tree node whose
/// single argument selects a child command.
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: String,
    permission: Option<String>,
    no_permission_message: Option<String>,
    requirement: Option<Requirement>,
    arguments: Vec<Arc<Argument>>,
    handler: Option<Handler>,
    subs: Option<Arc<SubCommands>>,
}

impl Command {
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    pub fn tree(name: impl Into<String>) -> TreeBuilder {
        TreeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased aliases.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn arguments(&self) -> &[Arc<Argument>] {
        &self.arguments
    }

    /// Children, when this is a tree command.
    pub fn sub_commands(&self) -> Option<&SubCommands> {
        self.subs.as_deref()
    }

    pub fn is_tree(&self) -> bool {
        self.subs.is_some()
    }

    /// Whether `alias` is this command's name or one of its aliases,
    /// ignoring case.
    pub fn matches(&self, alias: &str) -> bool {
        let alias = alias.to_lowercase();
        self.name.to_lowercase() == alias || self.aliases.contains(&alias)
    }

    /// Name followed by every alias.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// One-line usage, e.g. `dice [min] [max] [rolls]` or `coins <add|take>`.
    pub fn usage(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if let Some(subs) = &self.subs {
            let names: Vec<&str> = subs.children.iter().map(|c| c.name()).collect();
            if subs.default.is_some() {
                parts.push(format!("[{}]", names.join("|")));
            } else {
                parts.push(format!("<{}>", names.join("|")));
            }
        } else {
            parts.extend(self.arguments.iter().filter_map(|a| a.usage()));
        }
        parts.join(" ")
    }

    /// Permission and requirement check against the sender.
    ///
    /// `fallback_message` is used when the command has no message of its own.
    pub fn check_access(&self, sender: &dyn Sender, fallback_message: &str) -> Result<()> {
        let denied = || CmdError::PermissionDenied {
            message: self
                .no_permission_message
                .clone()
                .unwrap_or_else(|| fallback_message.to_string()),
        };
        if let Some(perm) = self.permission.as_deref().filter(|p| !p.is_empty())
            && !sender.has_permission(perm)
        {
            log::debug!("{} lacks permission '{perm}' for {}", sender.name(), self.name);
            return Err(denied());
        }
        if let Some(req) = &self.requirement
            && !req(sender)
        {
            log::debug!("{} fails requirement of {}", sender.name(), self.name);
            return Err(denied());
        }
        Ok(())
    }

    /// Run the handler and normalize its return value.
    pub fn invoke(&self, invocation: &Invocation<'_>) -> Result<Outcome> {
        let handler = self.handler.as_ref().ok_or_else(|| CmdError::NoHandler {
            command: self.name.clone(),
        })?;
        let reply = handler(invocation).map_err(CmdError::HandlerFailure)?;
        Ok(reply.into_outcome())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("permission", &self.permission)
            .field("arguments", &self.arguments)
            .field("tree", &self.is_tree())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Settings shared by leaf and tree builders.
struct Header {
    name: String,
    aliases: Vec<String>,
    description: String,
    permission: Option<String>,
    no_permission_message: Option<String>,
    requirement: Option<Requirement>,
}

impl Header {
    fn new(name: String) -> Self {
        Self {
            name,
            aliases: Vec::new(),
            description: String::new(),
            permission: None,
            no_permission_message: None,
            requirement: None,
        }
    }

    fn add_alias(&mut self, alias: &str) {
        let alias = alias.trim().to_lowercase();
        if alias.is_empty()
            || alias == self.name.to_lowercase()
            || self.aliases.contains(&alias)
        {
            return;
        }
        self.aliases.push(alias);
    }

    fn finish(
        self,
        arguments: Vec<Arc<Argument>>,
        handler: Option<Handler>,
        subs: Option<Arc<SubCommands>>,
    ) -> Command {
        Command {
            name: self.name,
            aliases: self.aliases,
            description: self.description,
            permission: self.permission,
            no_permission_message: self.no_permission_message,
            requirement: self.requirement,
            arguments,
            handler,
            subs,
        }
    }
}

macro_rules! header_setters {
    () => {
        /// Add an alias. Aliases are stored lower-cased.
        pub fn alias(mut self, alias: &str) -> Self {
            self.header.add_alias(alias);
            self
        }

        pub fn aliases<'s>(mut self, aliases: impl IntoIterator<Item = &'s str>) -> Self {
            for alias in aliases {
                self.header.add_alias(alias);
            }
            self
        }

        pub fn description(mut self, description: impl Into<String>) -> Self {
            self.header.description = description.into();
            self
        }

        /// Permission id the sender must hold.
        pub fn permission(mut self, permission: impl Into<String>) -> Self {
            self.header.permission = Some(permission.into());
            self
        }

        /// Feedback when the permission or requirement check fails.
        pub fn no_permission_message(mut self, message: impl Into<String>) -> Self {
            self.header.no_permission_message = Some(message.into());
            self
        }

        /// Additional predicate the sender must satisfy.
        pub fn requires(
            mut self,
            pred: impl Fn(&dyn Sender) -> bool + Send + Sync + 'static,
        ) -> Self {
            self.header.requirement = Some(Box::new(pred));
            self
        }
    };
}

/// Builder for a leaf command.
pub struct CommandBuilder {
    header: Header,
    args: Vec<ArgSpec>,
    handler: Option<Handler>,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: Header::new(name.into()),
            args: Vec::new(),
            handler: None,
        }
    }

    header_setters!();

    /// Append an argument. Arguments bind in declaration order.
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    /// Fallible handler.
    pub fn handler<F, R, E>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> std::result::Result<R, E> + Send + Sync + 'static,
        R: Into<Reply>,
        E: Into<BoxError>,
    {
        self.handler = Some(Box::new(move |inv| f(inv).map(Into::into).map_err(Into::into)));
        self
    }

    /// Infallible handler.
    pub fn run<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.handler = Some(Box::new(move |inv| Ok(f(inv).into())));
        self
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Build every argument descriptor against `adapters`.
    ///
    /// Argument names must be unique within the command once modifiers have
    /// run, since handlers look values up by name.
    pub fn build(self, adapters: &AdapterRegistry) -> Result<Command> {
        let mut arguments: Vec<Arc<Argument>> = Vec::with_capacity(self.args.len());
        for spec in self.args {
            let arg = Argument::build(spec, adapters)?;
            if arguments.iter().any(|a| a.name() == arg.name()) {
                return Err(CmdError::DuplicateArgument {
                    command: self.header.name,
                    argument: arg.to_ref(),
                });
            }
            arguments.push(Arc::new(arg));
        }
        Ok(self.header.finish(arguments, self.handler, None))
    }
}

/// Builder for a tree command whose children are commands themselves.
pub struct TreeBuilder {
    header: Header,
    children: Vec<CommandBuilder>,
    default: Option<CommandBuilder>,
}

impl TreeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: Header::new(name.into()),
            children: Vec::new(),
            default: None,
        }
    }

    header_setters!();

    /// Add a child, matched by name or alias in the order added.
    pub fn child(mut self, child: CommandBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Child used when the next word matches no other child. The word is
    /// left in the input for the default child's own arguments.
    pub fn default_child(mut self, child: CommandBuilder) -> Self {
        self.default = Some(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn build(self, adapters: &AdapterRegistry) -> Result<Command> {
        let mut children: Vec<Arc<Command>> = Vec::with_capacity(self.children.len());
        for builder in self.children {
            let child = builder.build(adapters)?;
            for label in child.labels() {
                if let Some(existing) = children.iter().find(|c| c.matches(label)) {
                    return Err(CmdError::DuplicateAlias {
                        alias: label.to_lowercase(),
                        existing: format!("{} {}", self.header.name, existing.name()),
                    });
                }
            }
            children.push(Arc::new(child));
        }
        let default = self
            .default
            .map(|b| b.build(adapters).map(Arc::new))
            .transpose()?;

        let subs = Arc::new(SubCommands { children, default });
        let adapter = Arc::new(SubCommandAdapter::new(Arc::clone(&subs)));
        let spec = ArgSpec::new(SUB_COMMAND_ARG, ValueKind::SubCommand);
        let arg = Argument::with_adapter(spec, adapter)?;
        Ok(self.header.finish(vec![Arc::new(arg)], None, Some(subs)))
    }
}

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// What a handler sees: the resolved context plus the command's values in
/// declaration order.
pub struct Invocation<'r> {
    context: &'r Context,
    values: Vec<Option<&'r Value>>,
}

impl<'r> Invocation<'r> {
    /// Collect values for the context's current command, matching each of
    /// its descriptors against the bindings.
    pub fn new(context: &'r Context) -> Self {
        let values = context
            .command()
            .arguments()
            .iter()
            .map(|arg| context.value_of(arg))
            .collect();
        Self { context, values }
    }

    pub fn sender(&self) -> &'r Arc<dyn Sender> {
        self.context.sender()
    }

    pub fn alias(&self) -> &'r str {
        self.context.alias()
    }

    pub fn input(&self) -> &'r str {
        self.context.input()
    }

    pub fn command(&self) -> &'r Arc<Command> {
        self.context.command()
    }

    pub fn context(&self) -> &'r Context {
        self.context
    }

    /// Values in descriptor order. Absent optional values are `None`.
    pub fn values(&self) -> &[Option<&'r Value>] {
        &self.values
    }

    /// Value bound to the named argument.
    pub fn get(&self, name: &str) -> Option<&'r Value> {
        self.context.get(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Text of a string or choice argument.
    pub fn string(&self, name: &str) -> Option<&'r str> {
        self.get(name).and_then(Value::as_str)
    }
}
