//! Schema type definitions for declared command-line fields.
//!
//! This module defines the untyped description of a schema: one
//! [`FieldSchema`] per declared field, in declaration order. Typed slots in
//! the `argbind` crate describe themselves with these values, and both schema
//! validation and the [`Prototype`](crate::Prototype) builder operate on them
//! without knowing the concrete value types.

use serde::{Deserialize, Serialize};

/// Kind of a declared field.
///
/// Option kinds are matched by name on the command line; argument kinds are
/// matched by position. A schema holds either option kinds or argument kinds,
/// never both (see [`validate_options`](crate::validate_options) and
/// [`validate_arguments`](crate::validate_arguments)).
///
/// # Examples
///
/// ```
/// use argbind_core::FieldKind;
///
/// assert!(FieldKind::Flag.is_option());
/// assert!(FieldKind::ArgumentSink.is_argument());
/// assert!(FieldKind::RequiredArgument.strictness() > FieldKind::OptionalArgument.strictness());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Single-valued option that must resolve to a value (supplied or default).
    RequiredOption,
    /// Single-valued option that is nullable or carries a default.
    OptionalOption,
    /// Boolean switch; never takes a following token as its value.
    Flag,
    /// Option collecting every invocation into a container.
    MultiOption,
    /// Positional argument that must be present.
    RequiredArgument,
    /// Positional argument falling back to a default when absent.
    OptionalArgument,
    /// Positional field consuming every remaining positional token.
    ArgumentSink,
}

impl FieldKind {
    /// Returns `true` for kinds matched by option name.
    pub fn is_option(self) -> bool {
        matches!(
            self,
            Self::RequiredOption | Self::OptionalOption | Self::Flag | Self::MultiOption
        )
    }

    /// Returns `true` for positional kinds.
    pub fn is_argument(self) -> bool {
        !self.is_option()
    }

    /// Ordering rank of positional kinds.
    ///
    /// Within an arguments schema the rank must never increase from one field
    /// to the next: required (2) before optional (1) before the sink (0).
    /// Option kinds rank as required.
    pub fn strictness(self) -> u8 {
        match self {
            Self::OptionalArgument => 1,
            Self::ArgumentSink => 0,
            _ => 2,
        }
    }
}

/// Description of one declared field.
///
/// Built by typed slots when a schema is inspected. For option kinds `long`
/// always holds the name matched after `--` (the field name unless
/// configured otherwise); for argument kinds it holds the display name used
/// in error messages.
///
/// # Examples
///
/// ```
/// use argbind_core::{FieldKind, FieldSchema};
///
/// let verbose = FieldSchema::new("verbose", FieldKind::Flag).with_short('v');
/// assert_eq!(verbose.long_name(), "verbose");
/// assert!(verbose.matches_short('v'));
/// assert!(!verbose.requires_value);
///
/// let level = FieldSchema::new("level", FieldKind::RequiredOption).with_long("log-level");
/// assert!(level.requires_value);
/// assert!(level.matches_long("log-level"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Declared field name.
    pub name: String,
    /// Field kind.
    pub kind: FieldKind,
    /// Long option name, or the display name of a positional argument.
    pub long: Option<String>,
    /// Single-letter alias (options only).
    pub short: Option<char>,
    /// Whether a bare invocation consumes the next token as its value.
    pub requires_value: bool,
    /// Whether a default value is declared.
    pub has_default: bool,
    /// Whether an implicit value (or per-element implicit value) is declared.
    pub has_implicit: bool,
    /// Free-form description.
    pub description: Option<String>,
}

impl FieldSchema {
    /// Creates a field description named after the declared field.
    ///
    /// Every kind except [`FieldKind::Flag`] starts out requiring a value.
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            long: Some(name.to_string()),
            short: None,
            requires_value: kind != FieldKind::Flag,
            has_default: false,
            has_implicit: false,
            description: None,
        }
    }

    /// Overrides the long (or display) name.
    pub fn with_long(mut self, long: &str) -> Self {
        self.long = Some(long.to_string());
        self
    }

    /// Sets the single-letter alias.
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Overrides whether a bare invocation consumes the next token.
    pub fn with_requires_value(mut self, requires_value: bool) -> Self {
        self.requires_value = requires_value;
        self
    }

    /// Marks the field as carrying a default value.
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Marks the field as carrying an implicit value.
    pub fn with_implicit(mut self) -> Self {
        self.has_implicit = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns the long name, falling back to the field name.
    pub fn long_name(&self) -> &str {
        self.long.as_deref().unwrap_or(&self.name)
    }

    /// Checks the long name against `name` (without the `--` prefix).
    pub fn matches_long(&self, name: &str) -> bool {
        self.long_name() == name
    }

    /// Checks the single-letter alias against `c`.
    pub fn matches_short(&self, c: char) -> bool {
        self.short == Some(c)
    }
}
