//! Schema model, schema validation and option prototypes.
//!
//! This crate holds the type-erased description of a command-line schema:
//!
//! - [`FieldSchema`]: one declared field (option, flag, multi-option,
//!   positional argument or argument sink) with its names and value policy.
//! - [`FieldKind`]: the closed set of field kinds.
//! - [`Prototype`]: the validated long/short name lookup the tokenizer uses
//!   to decide whether an option consumes the next token.
//!
//! Validation ([`validate_options`], [`validate_arguments`],
//! [`Prototype::build`]) reports schema mistakes as [`SpecificationError`]s
//! before any argument vector is parsed.
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! let options = vec![
//!     FieldSchema::new("verbose", FieldKind::Flag).with_short('v'),
//!     FieldSchema::new("jobs", FieldKind::OptionalOption)
//!         .with_short('j')
//!         .with_default(),
//! ];
//! assert!(validate_options(&options).is_ok());
//!
//! let prototype = Prototype::build(&options).unwrap();
//! assert_eq!(prototype.short_requires_value('j'), Some(true));
//! ```

mod prototype;
mod types;
mod validate;

pub use prototype::Prototype;
pub use types::*;
pub use validate::{
    SpecificationError, is_valid_command_name, is_valid_long_name, is_valid_short_name,
    validate_arguments, validate_options,
};
