//! The resolution loop: binds a command's arguments from one line of input.
//!
//! Arguments are visited in declaration order. Each one is either supplied
//! out of syntax (never tokenized), parsed from the cursor while input
//! remains, or filled from its default once input is exhausted. A
//! sub-command argument swaps the context's current command for the selected
//! child and restarts the walk on the child's arguments at the same cursor
//! position.

use std::sync::Arc;

use cmdbind_types::config::EngineConfig;
use cmdbind_types::error::{CmdError, Result};
use cmdbind_types::kind::ValueKind;
use cmdbind_types::outcome::Outcome;
use cmdbind_types::sender::Sender;

use crate::argument::Argument;
use crate::command::{Command, Invocation};
use crate::context::{Binding, Context};
use crate::cursor::Cursor;
use crate::value::Value;

/// Resolve `args` (the text after the alias) against `command`.
pub fn resolve(
    sender: Arc<dyn Sender>,
    alias: &str,
    args: &str,
    command: Arc<Command>,
    config: &EngineConfig,
) -> Result<Resolved> {
    let input = if args.is_empty() {
        alias.to_string()
    } else {
        format!("{alias} {args}")
    };
    let mut ctx = Context::new(sender, alias, input, command);
    let mut cursor = Cursor::new(args);
    cursor.skip_space();

    bind_arguments(&mut ctx, &mut cursor)?;

    if config.strict_trailing_input && cursor.can_read() {
        return Err(CmdError::UnexpectedInput {
            rest: cursor.rest().to_string(),
        });
    }
    Ok(Resolved {
        context: ctx,
        no_permission_message: config.no_permission_message.clone(),
    })
}

fn missing(arg: &Argument) -> CmdError {
    CmdError::MissingArgument {
        argument: arg.to_ref(),
    }
}

/// Walk the current command's arguments, descending into sub-commands.
fn bind_arguments(ctx: &mut Context, cursor: &mut Cursor<'_>) -> Result<()> {
    'descend: loop {
        let command = Arc::clone(ctx.command());
        log::trace!("binding arguments of '{}'", command.name());

        for arg in command.arguments() {
            let supplied = arg.out_of_syntax(ctx);

            if !arg.is_syntax() {
                let value = arg.process(supplied, ctx)?;
                if value.is_none() && !arg.is_nullable() && arg.is_required() {
                    return Err(missing(arg));
                }
                log::trace!("{}: out of syntax -> {value:?}", arg.name());
                ctx.bind(Arc::clone(arg), value);
                continue;
            }

            if cursor.can_read() {
                if supplied.is_some() {
                    log::trace!("{}: supplied -> {supplied:?}", arg.name());
                    ctx.bind(Arc::clone(arg), supplied);
                    continue;
                }
                let parsed = arg.parse(cursor, ctx)?;
                cursor.skip_space();
                let value = arg.process(parsed, ctx)?;
                if value.is_none() && !arg.is_nullable() {
                    return Err(missing(arg));
                }
                if arg.kind() == ValueKind::SubCommand {
                    let next = match value {
                        Some(Value::Command(next)) => next,
                        other => {
                            return Err(CmdError::InvalidArgument {
                                argument: arg.to_ref(),
                                reason: format!("expected a sub command, got {other:?}"),
                            });
                        },
                    };
                    log::trace!("descending from '{}' into '{}'", command.name(), next.name());
                    ctx.set_command(next);
                    continue 'descend;
                }
                log::trace!("{}: parsed -> {value:?}", arg.name());
                ctx.bind(Arc::clone(arg), value);
            } else {
                let fallback = supplied.or_else(|| arg.default_value().cloned());
                if fallback.is_none() && !arg.is_nullable() && arg.is_required() {
                    return Err(missing(arg));
                }
                let value = arg.process(fallback, ctx)?;
                log::trace!("{}: input exhausted -> {value:?}", arg.name());
                ctx.bind(Arc::clone(arg), value);
            }
        }
        return Ok(());
    }
}

/// A successfully bound command, ready to execute.
#[derive(Debug)]
pub struct Resolved {
    context: Context,
    no_permission_message: String,
}

impl Resolved {
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The command that will run: the leaf reached after any descent.
    pub fn command(&self) -> &Arc<Command> {
        self.context.command()
    }

    pub fn bindings(&self) -> &[Binding] {
        self.context.bindings()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.context.get(name)
    }

    /// Check access on every tree passed through and on the command
    /// itself, then run the handler and normalize its return.
    pub fn execute(&self) -> Result<Outcome> {
        let command = self.context.command();
        let sender = self.context.sender().as_ref();
        for node in self.context.trail().iter().chain(std::iter::once(command)) {
            node.check_access(sender, &self.no_permission_message)?;
        }
        let invocation = Invocation::new(&self.context);
        let outcome = command.invoke(&invocation)?;
        log::debug!(
            "{} ran '{}': success={} code={}",
            self.context.sender().name(),
            command.name(),
            outcome.success,
            outcome.code
        );
        Ok(outcome)
    }
}
