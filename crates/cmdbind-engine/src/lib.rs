//! Command resolution and argument binding.
//!
//! Commands are registered as typed argument lists (or trees of
//! sub-commands). Resolving an input line tokenizes it with a [`Cursor`],
//! parses each argument through its kind's [`Adapter`], runs the argument's
//! [`Modifier`] pipeline, and yields a [`Resolved`] command ready to
//! execute against its handler.

pub mod adapter;
pub mod argument;
pub mod command;
pub mod context;
pub mod cursor;
pub mod modifier;
mod registry;
mod reply;
mod resolve;
pub mod value;

/// Parsing strategy for one value kind.
pub use adapter::Adapter;
/// Adapters keyed by value kind.
pub use adapter::AdapterRegistry;
/// Declaration of an argument before registration.
pub use argument::ArgSpec;
/// Frozen argument descriptor.
pub use argument::Argument;
pub use command::{Command, CommandBuilder, Invocation, TreeBuilder};
/// Per-call resolution state.
pub use context::Context;
/// Character-level reader over the argument text.
pub use cursor::Cursor;
pub use modifier::{DefaultValue, Modifier, MultiWord, Optional, Range, Rename};
/// Registry of commands with alias lookup and the resolve entry point.
pub use registry::{CommandInfo, CommandRegistry};
/// Handler return values before normalization.
pub use reply::Reply;
/// A bound command ready to execute.
pub use resolve::{Resolved, resolve};
/// A typed argument value.
pub use value::Value;

pub use cmdbind_types::config::EngineConfig;
pub use cmdbind_types::error::{CmdError, Result};
pub use cmdbind_types::kind::{ModifierKind, ValueKind};
pub use cmdbind_types::outcome::Outcome;
pub use cmdbind_types::sender::Sender;
