//! Command registry: registration, alias lookup and the resolve entry point.

use std::sync::Arc;

use cmdbind_types::config::EngineConfig;
use cmdbind_types::error::{CmdError, Result};
use cmdbind_types::outcome::Outcome;
use cmdbind_types::sender::Sender;

use crate::adapter::AdapterRegistry;
use crate::command::{Command, CommandBuilder, TreeBuilder};
use crate::resolve::{Resolved, resolve};

/// Summary of a registered command for help listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub usage: String,
    pub description: String,
}

/// Registered commands plus the adapters their arguments are built with.
///
/// Registration is expected to finish before resolution starts. Embedders
/// that register while resolving must guard the registry themselves.
pub struct CommandRegistry {
    adapters: AdapterRegistry,
    commands: Vec<Arc<Command>>,
    config: EngineConfig,
}

impl CommandRegistry {
    /// An empty registry with the built-in adapters and default config.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            adapters: AdapterRegistry::new(),
            commands: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    /// Adapters used for commands registered from now on.
    pub fn adapters_mut(&mut self) -> &mut AdapterRegistry {
        &mut self.adapters
    }

    /// Build and register a leaf command.
    ///
    /// A failure leaves the registry unchanged.
    pub fn register(&mut self, builder: CommandBuilder) -> Result<Arc<Command>> {
        let command = builder.build(&self.adapters)?;
        self.insert(command)
    }

    /// Build and register a sub-command tree.
    pub fn register_tree(&mut self, builder: TreeBuilder) -> Result<Arc<Command>> {
        let command = builder.build(&self.adapters)?;
        self.insert(command)
    }

    fn insert(&mut self, command: Command) -> Result<Arc<Command>> {
        for label in command.labels() {
            if let Some(existing) = self.find(label) {
                if self.config.reject_alias_collisions {
                    return Err(CmdError::DuplicateAlias {
                        alias: label.to_lowercase(),
                        existing: existing.name().to_string(),
                    });
                }
                log::warn!(
                    "'{label}' of '{}' is already taken by '{}'; lookups keep the first",
                    command.name(),
                    existing.name()
                );
            }
        }
        log::debug!(
            "Registered command '{}' ({} args{})",
            command.name(),
            command.arguments().len(),
            if command.is_tree() { ", tree" } else { "" }
        );
        let command = Arc::new(command);
        self.commands.push(Arc::clone(&command));
        Ok(command)
    }

    /// First command whose name or alias matches, ignoring case.
    pub fn find(&self, alias: &str) -> Option<&Arc<Command>> {
        self.commands.iter().find(|c| c.matches(alias))
    }

    /// Commands in registration order.
    pub fn commands(&self) -> Vec<CommandInfo> {
        self.commands
            .iter()
            .map(|c| CommandInfo {
                name: c.name().to_string(),
                aliases: c.aliases().to_vec(),
                usage: c.usage(),
                description: c.description().to_string(),
            })
            .collect()
    }

    /// Sorted names and aliases starting with `prefix`, ignoring case.
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        let lower = prefix.to_lowercase();
        let mut out: Vec<String> = self
            .commands
            .iter()
            .flat_map(|c| c.labels())
            .filter(|label| label.to_lowercase().starts_with(&lower))
            .map(str::to_string)
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Resolve one input line. The first word selects the command.
    pub fn resolve(&self, sender: Arc<dyn Sender>, input: &str) -> Result<Resolved> {
        let line = input.trim_start_matches(' ');
        let (alias, args) = line.split_once(' ').unwrap_or((line, ""));
        let command = self
            .find(alias)
            .ok_or_else(|| CmdError::UnknownCommand {
                alias: alias.to_string(),
            })?;
        resolve(sender, alias, args, Arc::clone(command), &self.config)
    }

    /// Resolve and execute one input line.
    pub fn execute(&self, sender: Arc<dyn Sender>, input: &str) -> Result<Outcome> {
        self.resolve(sender, input)?.execute()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Adapter;
    use crate::argument::{ArgSpec, Argument};
    use crate::context::Context;
    use crate::cursor::Cursor;
    use crate::modifier::{DefaultValue, Optional, Range};
    use crate::value::Value;
    use cmdbind_types::kind::ValueKind;

    struct Console;

    impl Sender for Console {
        fn name(&self) -> &str {
            "console"
        }

        fn send_message(&self, _msg: &str) {}
    }

    fn console() -> Arc<dyn Sender> {
        Arc::new(Console)
    }

    fn demo() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        reg.register(
            CommandBuilder::new("dice")
                .aliases(["Roll", "d"])
                .description("Roll dice")
                .arg(ArgSpec::int("min").with(DefaultValue::new(1)))
                .arg(ArgSpec::int("max").with(DefaultValue::new(6)))
                .arg(ArgSpec::int("rolls").with(DefaultValue::new(1)))
                .run(|inv| inv.int("rolls").unwrap_or(1)),
        )
        .unwrap();
        reg.register_tree(
            TreeBuilder::new("coins")
                .description("Manage coins")
                .child(
                    CommandBuilder::new("add")
                        .arg(ArgSpec::int("amount").with(Range::at_least(1.0)))
                        .run(|inv| inv.int("amount").unwrap_or(0)),
                )
                .child(
                    CommandBuilder::new("take")
                        .arg(ArgSpec::int("amount"))
                        .run(|inv| inv.int("amount").unwrap_or(0)),
                ),
        )
        .unwrap();
        reg
    }

    #[test]
    fn aliases_are_stored_lower_case() {
        let reg = demo();
        assert_eq!(reg.find("dice").unwrap().aliases(), ["roll", "d"]);
    }

    #[test]
    fn lookup_ignores_case() {
        let reg = demo();
        for alias in ["dice", "DICE", "roll", "RoLl", "D"] {
            assert!(Arc::ptr_eq(reg.find(alias).unwrap(), reg.find("dice").unwrap()));
        }
    }

    #[test]
    fn unknown_command_binds_nothing() {
        let err = demo().resolve(console(), "fly away").unwrap_err();
        assert!(matches!(err, CmdError::UnknownCommand { ref alias } if alias == "fly"));
    }

    #[test]
    fn empty_line_is_unknown_command() {
        let err = demo().resolve(console(), "").unwrap_err();
        assert!(matches!(err, CmdError::UnknownCommand { ref alias } if alias.is_empty()));
    }

    #[test]
    fn resolve_through_alias() {
        let r = demo().resolve(console(), "ROLL 2 5").unwrap();
        assert_eq!(r.context().alias(), "ROLL");
        assert_eq!(r.context().input(), "ROLL 2 5");
        assert_eq!(r.get("min"), Some(&Value::Int(2)));
        assert_eq!(r.get("max"), Some(&Value::Int(5)));
        assert_eq!(r.get("rolls"), Some(&Value::Int(1)));
    }

    #[test]
    fn execute_normalizes_return() {
        let outcome = demo().execute(console(), "coins add 5").unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.code, 5);
    }

    #[test]
    fn duplicate_alias_rejected_by_default() {
        let mut reg = demo();
        let err = reg
            .register(CommandBuilder::new("die").alias("D").run(|_| ()))
            .unwrap_err();
        assert!(matches!(err, CmdError::DuplicateAlias { ref alias, ref existing }
            if alias == "d" && existing == "dice"));
        assert!(err.is_registration_error());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn tolerated_collision_keeps_first() {
        let mut reg = CommandRegistry::with_config(EngineConfig {
            reject_alias_collisions: false,
            ..EngineConfig::default()
        });
        reg.register(CommandBuilder::new("one").alias("x").run(|_| 1))
            .unwrap();
        reg.register(CommandBuilder::new("two").alias("x").run(|_| 2))
            .unwrap();
        assert_eq!(reg.find("x").unwrap().name(), "one");
        assert_eq!(reg.execute(console(), "x").unwrap().code, 1);
    }

    #[test]
    fn sibling_collision_rejected() {
        let err = CommandRegistry::new()
            .register_tree(
                TreeBuilder::new("t")
                    .child(CommandBuilder::new("a").run(|_| ()))
                    .child(CommandBuilder::new("b").alias("A").run(|_| ())),
            )
            .unwrap_err();
        assert!(matches!(err, CmdError::DuplicateAlias { .. }));
    }

    #[test]
    fn failed_registration_leaves_registry_usable() {
        let mut reg = demo();
        let err = reg
            .register(
                CommandBuilder::new("bad")
                    .arg(ArgSpec::int("n").with(Optional).with(DefaultValue::new(1)))
                    .run(|_| ()),
            )
            .unwrap_err();
        assert!(matches!(err, CmdError::IncompatibleModifiers { .. }));
        assert!(reg.find("bad").is_none());
        assert!(reg.execute(console(), "dice").is_ok());
    }

    #[test]
    fn duplicate_argument_fails_registration() {
        let mut reg = demo();
        let err = reg
            .register(
                CommandBuilder::new("pair")
                    .arg(ArgSpec::int("n"))
                    .arg(ArgSpec::int("n"))
                    .run(|_| ()),
            )
            .unwrap_err();
        assert!(matches!(err, CmdError::DuplicateArgument { .. }));
        assert!(reg.find("pair").is_none());
    }

    #[test]
    fn non_ascii_alias_lookup_and_completion() {
        let mut reg = CommandRegistry::new();
        reg.register(CommandBuilder::new("Ñandú").alias("ÑU").run(|_| 3))
            .unwrap();
        assert_eq!(reg.find("ñandú").unwrap().name(), "Ñandú");
        assert_eq!(reg.execute(console(), "ñu").unwrap().code, 3);
        assert_eq!(reg.completions("ñ"), vec!["Ñandú", "ñu"]);
        let err = reg
            .register(CommandBuilder::new("gnu").alias("Ñu").run(|_| ()))
            .unwrap_err();
        assert!(matches!(err, CmdError::DuplicateAlias { ref alias, .. } if alias == "ñu"));
    }

    #[test]
    fn missing_adapter_fails_registration() {
        let mut reg = CommandRegistry::new();
        *reg.adapters_mut() = AdapterRegistry::empty();
        let err = reg
            .register(CommandBuilder::new("n").arg(ArgSpec::int("n")).run(|_| ()))
            .unwrap_err();
        assert!(matches!(err, CmdError::NoAdapterFound { kind: ValueKind::Int }));
    }

    struct Hex;

    impl Adapter for Hex {
        fn kind(&self) -> ValueKind {
            ValueKind::Int
        }

        fn parse(
            &self,
            cursor: &mut Cursor<'_>,
            arg: &Argument,
            _ctx: &Context,
        ) -> Result<Option<Value>> {
            let word = cursor.read_word();
            i64::from_str_radix(word, 16)
                .map(|n| Some(Value::Int(n)))
                .map_err(|_| CmdError::Parse {
                    argument: arg.to_ref(),
                    token: word.to_string(),
                    expected: "hex number".to_string(),
                })
        }
    }

    #[test]
    fn custom_adapter_overrides_fallback() {
        let mut reg = CommandRegistry::new();
        reg.adapters_mut().register(Arc::new(Hex));
        reg.register(CommandBuilder::new("hex").arg(ArgSpec::int("n")).run(|inv| inv.int("n").unwrap_or(0)))
            .unwrap();
        assert_eq!(reg.execute(console(), "hex ff").unwrap().code, 255);
    }

    #[test]
    fn completions_are_sorted_and_case_insensitive() {
        let reg = demo();
        assert_eq!(reg.completions("D"), vec!["d", "dice"]);
        assert_eq!(reg.completions("co"), vec!["coins"]);
        assert!(reg.completions("zzz").is_empty());
    }

    #[test]
    fn listing_includes_usage() {
        let infos = demo().commands();
        assert_eq!(infos[0].usage, "dice [min] [max] [rolls]");
        assert_eq!(infos[0].description, "Roll dice");
        assert_eq!(infos[1].usage, "coins <add|take>");
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_casing_finds_same_command(flips in proptest::collection::vec(any::<bool>(), 4)) {
                let reg = demo();
                let alias: String = "dice"
                    .chars()
                    .zip(&flips)
                    .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
                    .collect();
                prop_assert_eq!(reg.find(&alias).unwrap().name(), "dice");
            }

            #[test]
            fn unknown_alias_never_resolves(alias in "[a-z]{5,10}") {
                prop_assume!(alias != "coins");
                let err = demo().resolve(console(), &alias).unwrap_err();
                let is_unknown = matches!(err, CmdError::UnknownCommand { .. });
                prop_assert!(is_unknown);
            }
        }
    }
}
