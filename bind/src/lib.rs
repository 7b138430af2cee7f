//! Declarative command-line argument tokenizing and binding.
//!
//! A command line is described by two plain structs of typed slots: an
//! options schema (matched by `--long` / `-s` names) and an arguments schema
//! (matched by position). Binding a command line runs in three steps:
//!
//! 1. [`prototype`] validates the options schema and builds the
//!    [`Prototype`](argbind_core::Prototype), the name table the tokenizer
//!    consults to decide whether a bare option takes the next token.
//! 2. [`tokenize`] scans the argument vector once into a [`ParseResult`].
//! 3. [`Mapper::map`] resolves every field (defaults, implicit values,
//!    repeats, validators) and reports what nothing claimed as
//!    [`UnmatchedData`].
//!
//! [`SimpleApp`] and [`MultiCommandApp`] bundle the steps, the latter
//! dispatching on a command name through nested [`CommandGroup`]s.
//!
//! # Example
//!
//! ```
//! use argbind::validators::greater_than;
//! use argbind::{Arg, ArgSink, Flag, Mapper, MultiOpt, Opt, SimpleApp, schema};
//!
//! struct Options {
//!     verbose: Flag,
//!     level: MultiOpt<u8>,
//!     jobs: Opt<u32>,
//! }
//!
//! impl Default for Options {
//!     fn default() -> Self {
//!         Self {
//!             verbose: Flag::new().short('v'),
//!             level: MultiOpt::new().short('l').default_value(vec![]),
//!             jobs: Opt::new().long("max-jobs").default_value(1).validate(greater_than(0)),
//!         }
//!     }
//! }
//! schema!(Options { verbose, level, jobs });
//!
//! #[derive(Default)]
//! struct Arguments {
//!     target: Arg<String>,
//!     files: ArgSink<String>,
//! }
//! schema!(Arguments { target, files });
//!
//! let app = SimpleApp::<Options, Arguments>::new(Mapper::default()).unwrap();
//! let cmd = app
//!     .parse(&["tool", "--level=1", "-vl", "2", "dist", "--max-jobs", "8", "a.rs", "b.rs"])
//!     .unwrap();
//!
//! assert!(*cmd.options.verbose.value());
//! assert_eq!(cmd.options.level.value(), &vec![1, 2]);
//! assert_eq!(*cmd.options.jobs.value(), 8);
//! assert_eq!(cmd.arguments.target.value(), "dist");
//! assert_eq!(cmd.arguments.files.value().len(), 2);
//! ```

mod dispatch;
mod error;
mod mapper;
mod parser;
mod schema;
mod slot;
mod value;
pub mod validators;

pub use dispatch::{
    Command, CommandFrame, CommandGroup, LeafCommand, MultiCommandApp, ParsedCommand, SimpleApp,
};
pub use error::{Error, ParseError, Result};
pub use mapper::{Mapper, MapperConfig, UnmatchedData};
pub use parser::{ArgumentLimit, Invocation, ParseResult, tokenize};
pub use schema::{
    ArgumentSlot, Field, FieldRef, NoArguments, NoOptions, OptionSlot, Schema, check_arguments,
    describe, prototype,
};
pub use slot::{Arg, ArgSink, Flag, MultiOpt, Opt, OptArg};
pub use value::{FromArg, ValueError, ValueParser, ValueParserConfig};
