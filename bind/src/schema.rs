//! Schema reflection.
//!
//! A schema is a plain struct whose fields are typed slots
//! ([`Opt`](crate::Opt), [`MultiOpt`](crate::MultiOpt), [`Arg`](crate::Arg),
//! [`OptArg`](crate::OptArg), [`ArgSink`](crate::ArgSink)). The [`schema!`]
//! macro implements [`Schema`] for such a struct by listing its fields in
//! declaration order; the binding engine then walks that list through the
//! [`OptionSlot`] and [`ArgumentSlot`] capability traits.
//!
//! ```
//! use argbind::{Arg, Flag, Opt, Schema, schema};
//!
//! #[derive(Default)]
//! struct Options {
//!     verbose: Flag,
//!     jobs: Opt<u32>,
//! }
//! schema!(Options { verbose, jobs });
//!
//! let fields = argbind::describe(&mut Options::default());
//! assert_eq!(fields[0].name, "verbose");
//! assert_eq!(fields[1].long_name(), "jobs");
//! ```

use argbind_core::{
    FieldSchema, Prototype, SpecificationError, validate_arguments, validate_options,
};

use crate::{Invocation, Mapper, ParseError};

/// Capability interface of option-kind slots.
pub trait OptionSlot {
    /// Describes the slot for validation and prototype building.
    fn describe(&self, field: &str) -> FieldSchema;

    /// Resolves the slot when no invocation matched it.
    fn bind_absent(&mut self, name: &str) -> Result<(), ParseError>;

    /// Resolves the slot from its invocations, in command-line order.
    fn bind_invocations(
        &mut self,
        name: &str,
        invocations: Vec<Invocation>,
        mapper: &Mapper,
    ) -> Result<(), ParseError>;

    /// Runs the validator chain against the bound value.
    fn validate_value(&self, name: &str) -> Result<(), ParseError>;
}

/// Capability interface of positional slots.
pub trait ArgumentSlot {
    fn describe(&self, field: &str) -> FieldSchema;

    /// Binds from the positional tokens not yet consumed and returns how many
    /// of them were used.
    fn bind_tokens(
        &mut self,
        name: &str,
        tokens: &[String],
        mapper: &Mapper,
    ) -> Result<usize, ParseError>;

    fn validate_value(&self, name: &str) -> Result<(), ParseError>;
}

/// Borrowed view of one schema field.
pub enum FieldRef<'a> {
    Option {
        name: &'static str,
        slot: &'a mut dyn OptionSlot,
    },
    Argument {
        name: &'static str,
        slot: &'a mut dyn ArgumentSlot,
    },
}

impl FieldRef<'_> {
    /// Declared field name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Option { name, .. } | Self::Argument { name, .. } => *name,
        }
    }

    pub fn describe(&self) -> FieldSchema {
        match self {
            Self::Option { name, slot } => slot.describe(name),
            Self::Argument { name, slot } => slot.describe(name),
        }
    }
}

/// Types usable as schema fields.
pub trait Field {
    fn field_ref(&mut self, name: &'static str) -> FieldRef<'_>;
}

/// A struct of typed slots.
///
/// Usually implemented with [`schema!`].
pub trait Schema {
    /// Fields in declaration order.
    fn fields(&mut self) -> Vec<FieldRef<'_>>;
}

/// Describes every field of `schema`, in declaration order.
pub fn describe<S: Schema + ?Sized>(schema: &mut S) -> Vec<FieldSchema> {
    schema.fields().iter().map(FieldRef::describe).collect()
}

/// Validates an options schema and builds its tokenizer [`Prototype`].
pub fn prototype<S: Schema + ?Sized>(options: &mut S) -> Result<Prototype, SpecificationError> {
    let fields = describe(options);
    validate_options(&fields)?;
    Prototype::build(&fields)
}

/// Validates the field order of an arguments schema.
pub fn check_arguments<S: Schema + ?Sized>(arguments: &mut S) -> Result<(), SpecificationError> {
    validate_arguments(&describe(arguments))
}

/// Implements [`Schema`] for a struct by listing its slot fields.
///
/// Fields are bound in the listed order, which for arguments schemas is the
/// positional order.
///
/// ```
/// use argbind::{Arg, ArgSink, schema};
///
/// #[derive(Default)]
/// struct Arguments {
///     target: Arg<String>,
///     files: ArgSink<String>,
/// }
/// schema!(Arguments { target, files });
/// ```
#[macro_export]
macro_rules! schema {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Schema for $ty {
            fn fields(&mut self) -> ::std::vec::Vec<$crate::FieldRef<'_>> {
                ::std::vec![
                    $($crate::Field::field_ref(&mut self.$field, ::std::stringify!($field))),*
                ]
            }
        }
    };
}

/// Options schema with no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOptions;

impl Schema for NoOptions {
    fn fields(&mut self) -> Vec<FieldRef<'_>> {
        Vec::new()
    }
}

/// Arguments schema with no fields; every positional token is excess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoArguments;

impl Schema for NoArguments {
    fn fields(&mut self) -> Vec<FieldRef<'_>> {
        Vec::new()
    }
}
