//! Error types for tokenizing, binding and dispatch.
//!
//! Parsing errors describe bad user input and abort the current parse; they
//! carry the offending option, argument or command name so the message can be
//! shown to the user verbatim. Schema mistakes are reported separately as
//! [`SpecificationError`].

use argbind_core::SpecificationError;
use thiserror::Error;

/// Errors caused by the argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// `--x` or `--x=value`: long name shorter than two characters.
    #[error("long option name '{0}' is too short, must be at least 2 characters long")]
    LongOptionTooShort(String),

    /// Long name with characters outside the allowed set.
    #[error("long option name '{0}' is invalid")]
    LongOptionInvalidName(String),

    /// Non-alphabetic character inside a short option cluster.
    #[error("short option name '{0}' is invalid")]
    ShortOptionInvalidName(char),

    /// `--` while peeling a command name off the argument vector.
    #[error("cannot use '--' specifier in the middle of the command invocation")]
    MisplacedEndOfOptions,

    /// Option absent with no default to fall back on.
    #[error("option '{0}' has no default value and no value was provided")]
    OptionValueMissing(String),

    /// Required positional argument absent.
    #[error("positional argument '{0}' is mandatory and no value was provided")]
    ArgumentValueMissing(String),

    /// Option not declared by the schema.
    #[error("invalid option name '{0}'")]
    UnrecognizedOptionName(String),

    /// Command name not registered with the dispatcher.
    #[error("unknown command name: '{0}'")]
    UnrecognizedCommandName(String),

    /// Text that could not be converted to the field's value type.
    #[error("unable to parse value of '{field}': {message}")]
    UnableToParseValue { field: String, message: String },

    /// Single-valued option given more than once.
    #[error("expected option '{0}' to have no more than 1 value")]
    TooManyValues(String),

    /// Bare single-valued option without an implicit value.
    #[error("no implicit value exists for option '{0}' and no value was given")]
    NoImplicitValue(String),

    /// Bare multi-option invocation without a per-element implicit value.
    #[error(
        "no implicit single value exists for option '{0}' and no value was given in one of the usages"
    )]
    NoImplicitSingleValue(String),

    /// Multi-command dispatch found no positional token to use as command name.
    #[error("no command name provided")]
    NoCommandName,

    /// More positional tokens than the arguments schema accepts.
    #[error("too many arguments given")]
    ExcessiveArguments,

    /// A validator rejected a bound value.
    #[error("failed to validate '{field}': {message}")]
    ValidationError { field: String, message: String },
}

/// Errors produced by applications and command dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Schema or command registry is malformed.
    #[error(transparent)]
    Specification(#[from] SpecificationError),

    /// Argument vector does not match the schema.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Convenience alias for results with [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
