//! Conversion of argument text into typed values.
//!
//! [`FromArg`] is implemented for integers, floats, strings, paths, `char`,
//! `bool`, `Option<T>`, the standard collections and tuples of up to four
//! elements. Collections and tuples split their text on the separator
//! configured in [`ValueParserConfig`] and parse each piece with the element
//! type's own implementation.
//!
//! # Examples
//!
//! ```
//! use argbind::ValueParser;
//!
//! let parser = ValueParser::default();
//! assert_eq!(parser.parse::<u16>("8080").unwrap(), 8080);
//! assert_eq!(parser.parse::<Vec<i32>>("1,2,3").unwrap(), vec![1, 2, 3]);
//! assert_eq!(parser.parse::<(String, u8)>("x,7").unwrap(), ("x".to_string(), 7));
//! assert!(parser.parse::<bool>("yes").is_err());
//! ```

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;
use std::num::{IntErrorKind, ParseIntError};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value conversion failure.
///
/// The binding engine attaches the field name when lifting this into
/// [`ParseError::UnableToParseValue`](crate::ParseError::UnableToParseValue).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValueError(pub String);

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Settings for [`ValueParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueParserConfig {
    /// Separator between elements of collection and tuple values.
    pub separator: char,
}

impl Default for ValueParserConfig {
    fn default() -> Self {
        Self { separator: ',' }
    }
}

/// Converts argument text into typed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueParser {
    config: ValueParserConfig,
}

impl ValueParser {
    pub fn new(config: ValueParserConfig) -> Self {
        Self { config }
    }

    /// Element separator for collections and tuples.
    pub fn separator(&self) -> char {
        self.config.separator
    }

    /// Parses `text` as a `T`.
    pub fn parse<T: FromArg>(&self, text: &str) -> Result<T, ValueError> {
        T::from_arg(text, self)
    }
}

/// Types which can be bound from command-line text.
///
/// Besides the conversion itself the trait carries the value-type policy the
/// binding engine consults: whether a bare option consumes the next token,
/// and what an absent or bare option resolves to when nothing else is
/// declared. Custom types usually implement only [`from_arg`](Self::from_arg).
pub trait FromArg: Sized {
    /// Whether a bare `--option` of this type consumes the next token.
    const REQUIRES_VALUE: bool = true;

    /// Converts one piece of text.
    fn from_arg(text: &str, parser: &ValueParser) -> Result<Self, ValueError>;

    /// Value of an option that never appeared, before any default applies.
    fn when_absent() -> Option<Self> {
        None
    }

    /// Value of an option that appeared without text and has no implicit value.
    fn when_bare() -> Option<Self> {
        None
    }
}

/// Rejects text that does not start like a number.
///
/// `str::parse` accepts a leading `+`, which is not a valid spelling here.
fn check_numeric_start(text: &str) -> Result<(), ValueError> {
    if text.starts_with('+') {
        return Err(ValueError::new("could not parse numeric value"));
    }
    Ok(())
}

/// Message for text with a numeric prefix followed by other characters.
fn garbage_error(text: &str) -> ValueError {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.starts_with(|c: char| c.is_ascii_digit()) {
        ValueError::new("invalid characters encountered, could not parse numeric value")
    } else {
        ValueError::new("could not parse numeric value")
    }
}

fn integer_error(text: &str, err: &ParseIntError) -> ValueError {
    match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ValueError::new("numeric value out of range")
        }
        IntErrorKind::InvalidDigit => garbage_error(text),
        _ => ValueError::new("could not parse numeric value"),
    }
}

macro_rules! impl_from_arg_for_integers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromArg for $ty {
                fn from_arg(text: &str, _parser: &ValueParser) -> Result<Self, ValueError> {
                    check_numeric_start(text)?;
                    text.parse::<$ty>().map_err(|e| integer_error(text, &e))
                }
            }
        )*
    };
}

impl_from_arg_for_integers![u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize];

macro_rules! impl_from_arg_for_floats {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromArg for $ty {
                fn from_arg(text: &str, _parser: &ValueParser) -> Result<Self, ValueError> {
                    check_numeric_start(text)?;
                    text.parse::<$ty>().map_err(|_| garbage_error(text))
                }
            }
        )*
    };
}

impl_from_arg_for_floats![f32, f64];

impl FromArg for String {
    fn from_arg(text: &str, _parser: &ValueParser) -> Result<Self, ValueError> {
        Ok(text.to_string())
    }
}

impl FromArg for PathBuf {
    fn from_arg(text: &str, _parser: &ValueParser) -> Result<Self, ValueError> {
        Ok(PathBuf::from(text))
    }
}

impl FromArg for char {
    fn from_arg(text: &str, _parser: &ValueParser) -> Result<Self, ValueError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ValueError::new("character value must be exactly one character")),
        }
    }
}

impl FromArg for bool {
    const REQUIRES_VALUE: bool = false;

    fn from_arg(text: &str, _parser: &ValueParser) -> Result<Self, ValueError> {
        match text {
            "T" | "t" | "1" | "True" | "true" => Ok(true),
            "F" | "f" | "0" | "False" | "false" => Ok(false),
            _ => Err(ValueError::new("could not parse boolean value")),
        }
    }

    fn when_absent() -> Option<Self> {
        Some(false)
    }

    fn when_bare() -> Option<Self> {
        Some(true)
    }
}

/// Nullable values: empty text, an absent option and a bare option all bind
/// to `None`.
impl<T: FromArg> FromArg for Option<T> {
    fn from_arg(text: &str, parser: &ValueParser) -> Result<Self, ValueError> {
        if text.is_empty() {
            return Ok(None);
        }
        T::from_arg(text, parser).map(Some)
    }

    fn when_absent() -> Option<Self> {
        Some(None)
    }

    fn when_bare() -> Option<Self> {
        Some(None)
    }
}

fn split_elements<T, C>(text: &str, parser: &ValueParser) -> Result<C, ValueError>
where
    T: FromArg,
    C: FromIterator<T>,
{
    text.split(parser.separator())
        .map(|part| T::from_arg(part, parser))
        .collect()
}

impl<T: FromArg> FromArg for Vec<T> {
    fn from_arg(text: &str, parser: &ValueParser) -> Result<Self, ValueError> {
        split_elements(text, parser)
    }
}

impl<T: FromArg> FromArg for VecDeque<T> {
    fn from_arg(text: &str, parser: &ValueParser) -> Result<Self, ValueError> {
        split_elements(text, parser)
    }
}

impl<T: FromArg + Ord> FromArg for BTreeSet<T> {
    fn from_arg(text: &str, parser: &ValueParser) -> Result<Self, ValueError> {
        split_elements(text, parser)
    }
}

impl<T: FromArg + Eq + Hash> FromArg for HashSet<T> {
    fn from_arg(text: &str, parser: &ValueParser) -> Result<Self, ValueError> {
        split_elements(text, parser)
    }
}

fn arity_error(len: usize) -> ValueError {
    ValueError::new(format!("expected exactly {len} separated values"))
}

macro_rules! impl_from_arg_for_tuples {
    ($($len:literal => ($($name:ident),+);)+) => {
        $(
            impl<$($name: FromArg),+> FromArg for ($($name,)+) {
                fn from_arg(text: &str, parser: &ValueParser) -> Result<Self, ValueError> {
                    let mut parts = text.split(parser.separator());
                    let value = ($(
                        <$name as FromArg>::from_arg(
                            parts.next().ok_or_else(|| arity_error($len))?,
                            parser,
                        )?,
                    )+);
                    if parts.next().is_some() {
                        return Err(arity_error($len));
                    }
                    Ok(value)
                }
            }
        )+
    };
}

impl_from_arg_for_tuples! {
    2 => (A, B);
    3 => (A, B, C);
    4 => (A, B, C, D);
}
