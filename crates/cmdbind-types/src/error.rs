//! Error types for cmdbind.

use std::io;

use crate::kind::{ArgumentRef, ModifierKind, ValueKind};

/// Boxed error produced by a command handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while registering, resolving or executing commands.
///
/// Registration-time variants abort only the command being registered.
/// Resolution-time variants abort only the current resolve call.
#[derive(Debug, thiserror::Error)]
pub enum CmdError {
    #[error("Unknown command '{alias}'!")]
    UnknownCommand { alias: String },

    #[error("Unknown sub command '{word}'")]
    UnknownSubCommand { word: String },

    #[error("No argument adapter found for type {kind}")]
    NoAdapterFound { kind: ValueKind },

    #[error("Modifier {first} is incompatible with {second} on argument {argument}")]
    IncompatibleModifiers {
        first: ModifierKind,
        second: ModifierKind,
        argument: ArgumentRef,
    },

    #[error("Modifier {modifier} cannot be applied to argument {argument}: {reason}")]
    InvalidModifier {
        modifier: ModifierKind,
        argument: ArgumentRef,
        reason: String,
    },

    #[error("Missing argument {argument}")]
    MissingArgument { argument: ArgumentRef },

    #[error("{reason}")]
    InvalidArgument {
        argument: ArgumentRef,
        reason: String,
    },

    #[error("Invalid {expected} '{token}' for argument {argument}")]
    Parse {
        argument: ArgumentRef,
        token: String,
        expected: String,
    },

    #[error("{message}")]
    PermissionDenied { message: String },

    #[error("command failed: {0}")]
    HandlerFailure(#[source] BoxError),

    #[error("command '{command}' has no handler")]
    NoHandler { command: String },

    #[error("alias '{alias}' is already used by command '{existing}'")]
    DuplicateAlias { alias: String, existing: String },

    #[error("argument '{}' is declared twice in command '{command}'", .argument.name)]
    DuplicateArgument {
        command: String,
        argument: ArgumentRef,
    },

    #[error("unexpected input '{rest}'")]
    UnexpectedInput { rest: String },

    #[error("read past end of input at position {position}")]
    OutOfBounds { position: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl CmdError {
    /// The argument descriptor this error concerns, if any.
    pub fn argument(&self) -> Option<&ArgumentRef> {
        match self {
            Self::IncompatibleModifiers { argument, .. }
            | Self::InvalidModifier { argument, .. }
            | Self::MissingArgument { argument }
            | Self::InvalidArgument { argument, .. }
            | Self::Parse { argument, .. }
            | Self::DuplicateArgument { argument, .. } => Some(argument),
            _ => None,
        }
    }

    /// Whether this error is raised while registering a command.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::NoAdapterFound { .. }
                | Self::IncompatibleModifiers { .. }
                | Self::InvalidModifier { .. }
                | Self::DuplicateAlias { .. }
                | Self::DuplicateArgument { .. }
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CmdError>;
