//! Tokenizing of raw argument vectors.
//!
//! [`tokenize`] performs one left-to-right scan over the argument vector and
//! sorts every token into long-option invocations, short-option invocations
//! or positional tokens. Option invocations share a single order counter so
//! that the binding engine can restore command-line order when an option is
//! used through both its long and its short form.
//!
//! Recognised syntax:
//!
//! - `--name` and `--name=value`: long options;
//! - `-abc`: a cluster of short options, `-o=value` attaches text to the
//!   last letter of the cluster;
//! - `--`: end of options, every following token is positional;
//! - anything else (including a lone `-`): a positional token.
//!
//! A bare option whose [`Prototype`] entry requires a value takes the next
//! token as its text, whatever that token looks like.

use std::collections::HashMap;

use argbind_core::{Prototype, is_valid_long_name};
use tracing::trace;

use crate::ParseError;

/// One occurrence of an option on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Attached text, if any.
    pub text: Option<String>,
    /// Position among all option invocations of the scan.
    pub index: usize,
    /// Set for a value-requiring letter before the end of a short cluster.
    /// Such an invocation never receives text.
    pub withheld: bool,
}

/// Structured view of an argument vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Invocations by long name, in command-line order.
    pub long_options: HashMap<String, Vec<Invocation>>,
    /// Invocations by short letter, in command-line order.
    pub short_options: HashMap<char, Vec<Invocation>>,
    /// Positional tokens, in command-line order.
    pub arguments: Vec<String>,
    /// Number of tokens consumed by the scan.
    pub args_used: usize,
}

/// How many positional tokens the scan may collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentLimit {
    /// Stop right after the first positional token (command-name extraction).
    Single,
    /// Scan the whole vector.
    Unlimited,
}

#[derive(Debug)]
enum Pending {
    Long(String),
    Short(char),
}

#[derive(Debug)]
enum State {
    Scanning,
    AwaitingOptionValue(Pending),
    PastEndMarker,
}

/// Splits `tokens` into option invocations and positional tokens.
///
/// # Errors
///
/// - [`ParseError::LongOptionTooShort`] / [`ParseError::LongOptionInvalidName`]
///   for malformed `--name` tokens;
/// - [`ParseError::ShortOptionInvalidName`] for a non-alphabetic letter in a
///   short cluster;
/// - [`ParseError::MisplacedEndOfOptions`] for `--` under
///   [`ArgumentLimit::Single`].
///
/// # Examples
///
/// ```
/// use argbind::{ArgumentLimit, tokenize};
/// use argbind_core::{FieldKind, FieldSchema, Prototype};
///
/// let prototype = Prototype::build(&[
///     FieldSchema::new("output", FieldKind::RequiredOption).with_short('o'),
/// ]).unwrap();
///
/// let argv = ["-o", "out.txt", "in.txt"];
/// let parsed = tokenize(&argv, &prototype, ArgumentLimit::Unlimited).unwrap();
/// assert_eq!(parsed.short_options[&'o'][0].text.as_deref(), Some("out.txt"));
/// assert_eq!(parsed.arguments, vec!["in.txt"]);
/// assert_eq!(parsed.args_used, 3);
/// ```
pub fn tokenize<S: AsRef<str>>(
    tokens: &[S],
    prototype: &Prototype,
    limit: ArgumentLimit,
) -> Result<ParseResult, ParseError> {
    let mut tokenizer = Tokenizer {
        prototype,
        out: ParseResult::default(),
        counter: 0,
    };
    let mut state = State::Scanning;

    for token in tokens {
        if limit == ArgumentLimit::Single && !tokenizer.out.arguments.is_empty() {
            break;
        }

        let token = token.as_ref();
        tokenizer.out.args_used += 1;

        state = match state {
            State::PastEndMarker => {
                tokenizer.out.arguments.push(token.to_string());
                State::PastEndMarker
            }
            State::AwaitingOptionValue(pending) => {
                trace!(?pending, token, "Option value");
                tokenizer.attach(pending, token);
                State::Scanning
            }
            State::Scanning => tokenizer.scan(token, limit)?,
        };
    }

    Ok(tokenizer.out)
}

struct Tokenizer<'p> {
    prototype: &'p Prototype,
    out: ParseResult,
    counter: usize,
}

impl Tokenizer<'_> {
    fn scan(&mut self, token: &str, limit: ArgumentLimit) -> Result<State, ParseError> {
        if !is_option(token) {
            trace!(token, "Positional token");
            self.out.arguments.push(token.to_string());
            return Ok(State::Scanning);
        }

        if token == "--" {
            if limit == ArgumentLimit::Single {
                return Err(ParseError::MisplacedEndOfOptions);
            }
            return Ok(State::PastEndMarker);
        }

        match token.strip_prefix("--") {
            Some(body) => self.long_option(body),
            None => self.short_cluster(&token[1..]),
        }
    }

    fn long_option(&mut self, body: &str) -> Result<State, ParseError> {
        let (name, text) = match body.split_once('=') {
            Some((name, text)) => (name, Some(text.to_string())),
            None => (body, None),
        };

        if name.chars().count() < 2 {
            return Err(ParseError::LongOptionTooShort(name.to_string()));
        }
        if !is_valid_long_name(name) {
            return Err(ParseError::LongOptionInvalidName(name.to_string()));
        }

        trace!(name, ?text, "Long option");

        let bare = text.is_none();
        let index = self.next_index();
        self.out
            .long_options
            .entry(name.to_string())
            .or_default()
            .push(Invocation {
                text,
                index,
                withheld: false,
            });

        if bare && self.prototype.long_requires_value(name) == Some(true) {
            return Ok(State::AwaitingOptionValue(Pending::Long(name.to_string())));
        }
        Ok(State::Scanning)
    }

    fn short_cluster(&mut self, body: &str) -> Result<State, ParseError> {
        let (letters, mut text) = match body.split_once('=') {
            Some((letters, text)) => (letters, Some(text.to_string())),
            None => (body, None),
        };

        if letters.is_empty() {
            return Err(ParseError::ShortOptionInvalidName('='));
        }
        if let Some(c) = letters.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(ParseError::ShortOptionInvalidName(c));
        }

        let count = letters.chars().count();
        let mut state = State::Scanning;

        for (position, c) in letters.chars().enumerate() {
            let last = position + 1 == count;
            let requires_value = self.prototype.short_requires_value(c) == Some(true);
            let index = self.next_index();
            let invocation = Invocation {
                text: if last { text.take() } else { None },
                index,
                withheld: !last && requires_value,
            };

            trace!(
                short = %c,
                text = ?invocation.text,
                withheld = invocation.withheld,
                "Short option"
            );

            let bare = invocation.text.is_none();
            self.out.short_options.entry(c).or_default().push(invocation);

            // Only the final letter of a cluster may take the next token.
            if last && bare && requires_value {
                state = State::AwaitingOptionValue(Pending::Short(c));
            }
        }

        Ok(state)
    }

    fn attach(&mut self, pending: Pending, token: &str) {
        let slot = match pending {
            Pending::Long(name) => self
                .out
                .long_options
                .get_mut(&name)
                .and_then(|invocations| invocations.last_mut()),
            Pending::Short(c) => self
                .out
                .short_options
                .get_mut(&c)
                .and_then(|invocations| invocations.last_mut()),
        };

        if let Some(invocation) = slot {
            invocation.text = Some(token.to_string());
        }
    }

    fn next_index(&mut self) -> usize {
        let index = self.counter;
        self.counter += 1;
        index
    }
}

fn is_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}
