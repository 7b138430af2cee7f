//! Schema validation.
//!
//! Validates the structural invariants of a schema before it is used for
//! parsing: option schemas hold only option kinds, argument schemas hold only
//! positional kinds ordered required → optional → sink, and every name obeys
//! the long-name, short-name and command-name rules.
//!
//! # Examples
//!
//! ```
//! use argbind_core::*;
//!
//! let fields = vec![
//!     FieldSchema::new("input", FieldKind::RequiredArgument),
//!     FieldSchema::new("rest", FieldKind::ArgumentSink),
//! ];
//! assert!(validate_arguments(&fields).is_ok());
//!
//! // Invalid: optional argument before a required one
//! let bad = vec![
//!     FieldSchema::new("output", FieldKind::OptionalArgument),
//!     FieldSchema::new("input", FieldKind::RequiredArgument),
//! ];
//! assert!(validate_arguments(&bad).is_err());
//! ```

use thiserror::Error;

use crate::{FieldKind, FieldSchema};

/// Errors in the declaration of a schema or command registry.
///
/// These are programming mistakes detected once, before any argument vector
/// is looked at. They are never produced by user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecificationError {
    /// Long option name fails the character-class rules.
    #[error("long option at field '{field}' has invalid name: {name}")]
    LongOptionInvalidName { field: String, name: String },
    /// Two options share a long name.
    #[error("long option at field '{field}' has been already declared: {name}")]
    DuplicateLongOptionName { field: String, name: String },
    /// Short alias is not an alphabetic character.
    #[error("short option at field '{field}' is invalid: {short}")]
    ShortOptionInvalidName { field: String, short: char },
    /// Two options share a short alias.
    #[error("short option at field '{field}' has been already declared: {short}")]
    DuplicateShortOptionName { field: String, short: char },
    /// Command name fails the character-class rules.
    #[error("invalid command name: '{0}'")]
    CommandInvalidName(String),
    /// Two commands registered under the same name.
    #[error("duplicate command name: '{0}'")]
    DuplicateCommandName(String),
    /// Positional field declared in an options schema.
    #[error("options schema is not allowed to have argument field '{0}'")]
    ArgumentInOptions(String),
    /// Option field declared in an arguments schema.
    #[error("arguments schema is not allowed to have option field '{0}'")]
    OptionInArguments(String),
    /// Required positional argument declared after an optional one or a sink.
    #[error("required argument '{0}' must precede all optional arguments")]
    RequiredArgumentAfterOptional(String),
    /// Argument sink that is not the last field, or a second sink.
    #[error("argument sink '{0}' must be the last field")]
    ArgumentSinkNotLast(String),
}

/// Returns `true` if `name` is a valid long option name.
///
/// A valid name is at least two characters long, consists of ASCII letters,
/// digits, `-`, `$` and `_`, and starts with a letter, `$` or `_`.
///
/// # Examples
///
/// ```
/// use argbind_core::is_valid_long_name;
///
/// assert!(is_valid_long_name("dry-run"));
/// assert!(is_valid_long_name("$home"));
/// assert!(!is_valid_long_name("x"));
/// assert!(!is_valid_long_name("2fast"));
/// assert!(!is_valid_long_name("-dash"));
/// ```
pub fn is_valid_long_name(name: &str) -> bool {
    name.len() >= 2 && is_identifier(name)
}

/// Returns `true` if `c` may be used as a short option alias.
pub fn is_valid_short_name(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Returns `true` if `name` is a valid command name.
///
/// Same character rules as [`is_valid_long_name`], but a single character is
/// enough.
///
/// # Examples
///
/// ```
/// use argbind_core::is_valid_command_name;
///
/// assert!(is_valid_command_name("valid_cmd"));
/// assert!(is_valid_command_name("___"));
/// assert!(!is_valid_command_name("1valid-cmd"));
/// assert!(!is_valid_command_name(""));
/// ```
pub fn is_valid_command_name(name: &str) -> bool {
    !name.is_empty() && is_identifier(name)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    let valid_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '$' | '_');

    (first.is_ascii_alphabetic() || first == '$' || first == '_') && chars.all(valid_char)
}

/// Validates the field list of an options schema.
///
/// Rejects positional kinds. Name rules are checked by the
/// [`Prototype`](crate::Prototype) builder.
pub fn validate_options(fields: &[FieldSchema]) -> Result<(), SpecificationError> {
    match fields.iter().find(|f| f.kind.is_argument()) {
        Some(field) => Err(SpecificationError::ArgumentInOptions(field.name.clone())),
        None => Ok(()),
    }
}

/// Validates the field list of an arguments schema.
///
/// Rejects option kinds, required arguments following optional ones, and
/// argument sinks that are not the final field.
///
/// # Examples
///
/// ```
/// use argbind_core::*;
///
/// let fields = vec![
///     FieldSchema::new("files", FieldKind::ArgumentSink),
///     FieldSchema::new("more", FieldKind::ArgumentSink),
/// ];
/// assert_eq!(
///     validate_arguments(&fields),
///     Err(SpecificationError::ArgumentSinkNotLast("files".into()))
/// );
/// ```
pub fn validate_arguments(fields: &[FieldSchema]) -> Result<(), SpecificationError> {
    if let Some(field) = fields.iter().find(|f| f.kind.is_option()) {
        return Err(SpecificationError::OptionInArguments(field.name.clone()));
    }

    for pair in fields.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);

        if prev.kind == FieldKind::ArgumentSink {
            return Err(SpecificationError::ArgumentSinkNotLast(prev.name.clone()));
        }
        if next.kind.strictness() > prev.kind.strictness() {
            return Err(SpecificationError::RequiredArgumentAfterOptional(
                next.name.clone(),
            ));
        }
    }

    Ok(())
}
