//! Option lookup tables derived from a schema.
//!
//! A [`Prototype`] records which long and short option names a schema
//! declares and whether a bare invocation of each one consumes the next
//! token as its value. It is built once per schema and then shared
//! read-only by every parse of that schema.

use std::collections::HashMap;

use tracing::debug;

use crate::FieldSchema;
use crate::validate::{SpecificationError, is_valid_long_name, is_valid_short_name};

/// Validated option-name lookup for one schema.
///
/// # Examples
///
/// ```
/// use argbind_core::*;
///
/// let fields = vec![
///     FieldSchema::new("verbose", FieldKind::Flag).with_short('v'),
///     FieldSchema::new("output", FieldKind::RequiredOption).with_short('o'),
/// ];
/// let prototype = Prototype::build(&fields).unwrap();
///
/// assert_eq!(prototype.long_requires_value("output"), Some(true));
/// assert_eq!(prototype.short_requires_value('v'), Some(false));
/// assert_eq!(prototype.long_requires_value("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prototype {
    long_options: HashMap<String, bool>,
    short_options: HashMap<char, bool>,
}

impl Prototype {
    /// Builds the prototype for the option fields of a schema.
    ///
    /// Positional fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first [`SpecificationError`] found in declaration order:
    /// an invalid or duplicated long name, or a non-alphabetic or duplicated
    /// short alias.
    pub fn build(fields: &[FieldSchema]) -> Result<Self, SpecificationError> {
        let mut out = Self::default();

        for field in fields.iter().filter(|f| f.kind.is_option()) {
            let long = field.long_name();

            if !is_valid_long_name(long) {
                return Err(SpecificationError::LongOptionInvalidName {
                    field: field.name.clone(),
                    name: long.to_string(),
                });
            }

            if out
                .long_options
                .insert(long.to_string(), field.requires_value)
                .is_some()
            {
                return Err(SpecificationError::DuplicateLongOptionName {
                    field: field.name.clone(),
                    name: long.to_string(),
                });
            }

            if let Some(short) = field.short {
                if !is_valid_short_name(short) {
                    return Err(SpecificationError::ShortOptionInvalidName {
                        field: field.name.clone(),
                        short,
                    });
                }

                if out
                    .short_options
                    .insert(short, field.requires_value)
                    .is_some()
                {
                    return Err(SpecificationError::DuplicateShortOptionName {
                        field: field.name.clone(),
                        short,
                    });
                }
            }
        }

        debug!(
            long = out.long_options.len(),
            short = out.short_options.len(),
            "Built option prototype"
        );

        Ok(out)
    }

    /// Whether `--name` takes the next token as its value, or `None` when
    /// the schema does not declare it.
    pub fn long_requires_value(&self, name: &str) -> Option<bool> {
        self.long_options.get(name).copied()
    }

    /// Whether `-c` takes the next token as its value, or `None` when the
    /// schema does not declare it.
    pub fn short_requires_value(&self, c: char) -> Option<bool> {
        self.short_options.get(&c).copied()
    }

    /// Declared long names (unordered).
    pub fn long_names(&self) -> impl Iterator<Item = &str> {
        self.long_options.keys().map(String::as_str)
    }

    /// Declared short aliases (unordered).
    pub fn short_names(&self) -> impl Iterator<Item = char> + '_ {
        self.short_options.keys().copied()
    }
}
