//! Binding of tokenized arguments onto schemas.
//!
//! The [`Mapper`] walks an options schema and an arguments schema in
//! declaration order. Option fields take every invocation of their long and
//! short names, merged back into command-line order; positional fields take
//! tokens from a shared cursor. Whatever no field claims is either an error
//! or, when the [`MapperConfig`] tolerates it, reported as [`UnmatchedData`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parser::{Invocation, ParseResult};
use crate::schema::{FieldRef, Schema};
use crate::value::{ValueParser, ValueParserConfig};
use crate::ParseError;

/// Tolerance switches of the binding engine.
///
/// Every switch defaults to `false`, i.e. strict binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Keep undeclared options in [`UnmatchedData`] instead of failing.
    pub allow_unrecognized_options: bool,
    /// Let the last of several invocations of a single-valued option win.
    pub allow_too_many_values: bool,
    /// Keep surplus positional tokens in [`UnmatchedData`] instead of failing.
    pub allow_excessive_arguments: bool,
}

/// Tokens no field claimed, collected under a tolerant [`MapperConfig`].
///
/// Option keys are long names or single letters, values the texts of the
/// invocations (`None` for bare ones) in command-line order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedData {
    pub options: BTreeMap<String, Vec<Option<String>>>,
    pub arguments: Vec<String>,
}

impl UnmatchedData {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.arguments.is_empty()
    }
}

/// Binding engine.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    config: MapperConfig,
    value_parser: ValueParser,
}

impl Mapper {
    pub fn new(config: MapperConfig, value_parser: ValueParser) -> Self {
        Self {
            config,
            value_parser,
        }
    }

    /// Strict mapper with the given value-parser settings.
    pub fn with_value_parser(config: ValueParserConfig) -> Self {
        Self::new(MapperConfig::default(), ValueParser::new(config))
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn value_parser(&self) -> &ValueParser {
        &self.value_parser
    }

    /// Binds `parsed` onto both schemas, options first.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind::{ArgSink, ArgumentLimit, Flag, Mapper, schema, tokenize};
    ///
    /// #[derive(Default)]
    /// struct Options { verbose: Flag }
    /// schema!(Options { verbose });
    ///
    /// #[derive(Default)]
    /// struct Arguments { files: ArgSink<String> }
    /// schema!(Arguments { files });
    ///
    /// let (mut options, mut arguments) = (Options::default(), Arguments::default());
    /// let prototype = argbind::prototype(&mut options).unwrap();
    /// let argv = ["a", "--verbose", "b"];
    /// let parsed = tokenize(&argv, &prototype, ArgumentLimit::Unlimited).unwrap();
    ///
    /// let unmatched = Mapper::default().map(&mut options, &mut arguments, parsed).unwrap();
    /// assert!(unmatched.is_empty());
    /// assert!(*options.verbose.value());
    /// assert_eq!(arguments.files.value(), &vec!["a".to_string(), "b".to_string()]);
    /// ```
    pub fn map<O, A>(
        &self,
        options: &mut O,
        arguments: &mut A,
        mut parsed: ParseResult,
    ) -> Result<UnmatchedData, ParseError>
    where
        O: Schema + ?Sized,
        A: Schema + ?Sized,
    {
        let mut unmatched = UnmatchedData::default();
        self.map_options(options, &mut parsed, &mut unmatched)?;
        self.map_arguments(arguments, std::mem::take(&mut parsed.arguments), &mut unmatched)?;
        Ok(unmatched)
    }

    /// Binds every option field, removing claimed invocations from `parsed`.
    pub fn map_options<O: Schema + ?Sized>(
        &self,
        options: &mut O,
        parsed: &mut ParseResult,
        unmatched: &mut UnmatchedData,
    ) -> Result<(), ParseError> {
        for field in options.fields() {
            let FieldRef::Option { name, slot } = field else {
                continue;
            };

            let schema = slot.describe(name);
            let long = schema.long_name();
            let long_hits = parsed.long_options.remove(long);
            let short_hits = schema
                .short
                .and_then(|short| parsed.short_options.remove(&short));

            if long_hits.is_none() && short_hits.is_none() {
                slot.bind_absent(long)?;
                continue;
            }

            let invocations = merge_invocations(
                long_hits.unwrap_or_default(),
                short_hits.unwrap_or_default(),
            );
            debug!(option = long, count = invocations.len(), "Binding option");

            slot.bind_invocations(long, invocations, self)?;
            slot.validate_value(long)?;
        }

        if parsed.long_options.is_empty() && parsed.short_options.is_empty() {
            return Ok(());
        }

        if !self.config.allow_unrecognized_options {
            return Err(ParseError::UnrecognizedOptionName(first_leftover(parsed)));
        }

        for (name, invocations) in parsed.long_options.drain() {
            debug!(option = %name, "Keeping unrecognized option");
            unmatched
                .options
                .insert(name, invocations.into_iter().map(|i| i.text).collect());
        }
        for (short, invocations) in parsed.short_options.drain() {
            debug!(option = %short, "Keeping unrecognized option");
            unmatched
                .options
                .insert(short.to_string(), invocations.into_iter().map(|i| i.text).collect());
        }

        Ok(())
    }

    /// Binds every positional field from `tokens`, left to right.
    pub fn map_arguments<A: Schema + ?Sized>(
        &self,
        arguments: &mut A,
        tokens: Vec<String>,
        unmatched: &mut UnmatchedData,
    ) -> Result<(), ParseError> {
        let mut cursor = 0;

        for field in arguments.fields() {
            let FieldRef::Argument { name, slot } = field else {
                continue;
            };

            let schema = slot.describe(name);
            let display = schema.long_name();

            cursor += slot.bind_tokens(display, &tokens[cursor..], self)?;
            slot.validate_value(display)?;
        }

        if cursor == tokens.len() {
            return Ok(());
        }

        if !self.config.allow_excessive_arguments {
            return Err(ParseError::ExcessiveArguments);
        }

        debug!(count = tokens.len() - cursor, "Keeping excess arguments");
        unmatched.arguments.extend(tokens.into_iter().skip(cursor));
        Ok(())
    }
}

/// Merges two index-ordered invocation lists into one list ordered by
/// invocation index.
fn merge_invocations(long: Vec<Invocation>, short: Vec<Invocation>) -> Vec<Invocation> {
    let mut merged = Vec::with_capacity(long.len() + short.len());
    let mut long = long.into_iter().peekable();
    let mut short = short.into_iter().peekable();

    loop {
        let next = match (long.peek(), short.peek()) {
            (Some(l), Some(s)) if l.index < s.index => long.next(),
            (Some(_), Some(_)) => short.next(),
            (Some(_), None) => long.next(),
            (None, Some(_)) => short.next(),
            (None, None) => break,
        };
        if let Some(invocation) = next {
            merged.push(invocation);
        }
    }

    merged
}

/// Name of the unclaimed option that appeared first on the command line.
fn first_leftover(parsed: &ParseResult) -> String {
    let long = parsed
        .long_options
        .iter()
        .filter_map(|(name, invocations)| Some((invocations.first()?.index, name.clone())));
    let short = parsed
        .short_options
        .iter()
        .filter_map(|(short, invocations)| Some((invocations.first()?.index, short.to_string())));

    long.chain(short)
        .min_by_key(|(index, _)| *index)
        .map(|(_, name)| name)
        .unwrap_or_default()
}
