//! Applications and command dispatch.
//!
//! [`SimpleApp`] binds a whole argument vector onto one options schema and
//! one arguments schema. [`MultiCommandApp`] binds the options in front of a
//! command name, then hands the rest of the vector to the command registered
//! under that name. Command groups nest: every level adds a
//! [`CommandFrame`] with its bound options and unmatched data to the context
//! passed further down, so a leaf sees `((((), root), group), ...)`.
//!
//! Schemas are validated and prototypes built when an application, group or
//! leaf is constructed; parsing never revisits them.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use argbind_core::{Prototype, SpecificationError, is_valid_command_name};
use tracing::debug;

use crate::mapper::{Mapper, UnmatchedData};
use crate::parser::{ArgumentLimit, tokenize};
use crate::schema::{NoArguments, Schema, check_arguments, prototype};
use crate::{Error, ParseError};

/// Outcome of a successful parse of one schema level.
#[derive(Debug)]
pub struct ParsedCommand<O, A> {
    pub options: O,
    pub arguments: A,
    /// `argv[0]` of the parsed slice: the program or command name.
    pub program_name: String,
    pub unmatched: UnmatchedData,
}

/// Bound state of one command-group level, passed down to nested commands.
#[derive(Debug)]
pub struct CommandFrame<O> {
    pub options: O,
    pub program_name: String,
    pub unmatched: UnmatchedData,
}

fn split_program<S: AsRef<str>>(argv: &[S]) -> (String, &[S]) {
    match argv.split_first() {
        Some((program, rest)) => (program.as_ref().to_string(), rest),
        None => (String::new(), argv),
    }
}

/// Schema pair with its prebuilt prototype.
struct Binder<O, A> {
    prototype: Prototype,
    schema: PhantomData<fn() -> (O, A)>,
}

impl<O, A> Binder<O, A>
where
    O: Schema + Default,
    A: Schema + Default,
{
    fn new() -> Result<Self, SpecificationError> {
        let prototype = prototype(&mut O::default())?;
        check_arguments(&mut A::default())?;
        Ok(Self {
            prototype,
            schema: PhantomData,
        })
    }

    fn parse<S: AsRef<str>>(
        &self,
        mapper: &Mapper,
        argv: &[S],
    ) -> Result<ParsedCommand<O, A>, ParseError> {
        let (program_name, tokens) = split_program(argv);
        let parsed = tokenize(tokens, &self.prototype, ArgumentLimit::Unlimited)?;

        let mut options = O::default();
        let mut arguments = A::default();
        let unmatched = mapper.map(&mut options, &mut arguments, parsed)?;

        Ok(ParsedCommand {
            options,
            arguments,
            program_name,
            unmatched,
        })
    }
}

/// Application with a single options schema and a single arguments schema.
///
/// # Examples
///
/// ```
/// use argbind::{ArgSink, Flag, Mapper, Opt, SimpleApp, schema};
///
/// struct Options {
///     verbose: Flag,
///     jobs: Opt<u32>,
/// }
///
/// impl Default for Options {
///     fn default() -> Self {
///         Self {
///             verbose: Flag::new().short('v'),
///             jobs: Opt::new().short('j').default_value(1),
///         }
///     }
/// }
/// schema!(Options { verbose, jobs });
///
/// #[derive(Default)]
/// struct Arguments {
///     files: ArgSink<String>,
/// }
/// schema!(Arguments { files });
///
/// let app = SimpleApp::<Options, Arguments>::new(Mapper::default()).unwrap();
/// let cmd = app.parse(&["tool", "-vj", "4", "a.txt"]).unwrap();
///
/// assert_eq!(cmd.program_name, "tool");
/// assert!(*cmd.options.verbose.value());
/// assert_eq!(*cmd.options.jobs.value(), 4);
/// assert_eq!(cmd.arguments.files.value(), &vec!["a.txt".to_string()]);
/// ```
pub struct SimpleApp<O, A = NoArguments> {
    mapper: Mapper,
    binder: Binder<O, A>,
}

impl<O, A> SimpleApp<O, A>
where
    O: Schema + Default,
    A: Schema + Default,
{
    pub fn new(mapper: Mapper) -> Result<Self, SpecificationError> {
        Ok(Self {
            mapper,
            binder: Binder::new()?,
        })
    }

    /// Parses `argv`, whose first element is the program name.
    pub fn parse<S: AsRef<str>>(&self, argv: &[S]) -> Result<ParsedCommand<O, A>, ParseError> {
        self.binder.parse(&self.mapper, argv)
    }

    /// Parses the arguments of the current process.
    pub fn parse_from_env(&self) -> Result<ParsedCommand<O, A>, ParseError> {
        let argv: Vec<String> = std::env::args().collect();
        self.parse(&argv)
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }
}

impl<O, A> fmt::Debug for SimpleApp<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleApp")
            .field("mapper", &self.mapper)
            .field("prototype", &self.binder.prototype)
            .finish()
    }
}

/// A dispatch target receiving context `C` from the levels above it.
pub trait Command<C> {
    /// Runs the command on `argv`, whose first element is the command name.
    fn invoke(&mut self, mapper: &Mapper, argv: &[String], context: C) -> Result<(), Error>;
}

/// Terminal command: binds its slice onto `O` and `A`, then calls the handler.
pub struct LeafCommand<O, A, F> {
    binder: Binder<O, A>,
    handler: F,
}

impl<O, A, F> LeafCommand<O, A, F>
where
    O: Schema + Default,
    A: Schema + Default,
{
    pub fn new(handler: F) -> Result<Self, SpecificationError> {
        Ok(Self {
            binder: Binder::new()?,
            handler,
        })
    }
}

impl<C, O, A, F> Command<C> for LeafCommand<O, A, F>
where
    O: Schema + Default,
    A: Schema + Default,
    F: FnMut(C, ParsedCommand<O, A>) -> Result<(), Error>,
{
    fn invoke(&mut self, mapper: &Mapper, argv: &[String], context: C) -> Result<(), Error> {
        let parsed = self.binder.parse(mapper, argv)?;
        (self.handler)(context, parsed)
    }
}

type BoxedCommand<P, O> = Box<dyn Command<(P, CommandFrame<O>)>>;

/// Named commands sharing the options schema `O`.
///
/// `P` is the context received from the level above; registered commands
/// receive `(P, CommandFrame<O>)`.
pub struct CommandGroup<O, P = ()> {
    prototype: Prototype,
    commands: BTreeMap<String, BoxedCommand<P, O>>,
}

impl<O, P> CommandGroup<O, P>
where
    O: Schema + Default + 'static,
    P: 'static,
{
    pub fn new() -> Result<Self, SpecificationError> {
        Ok(Self {
            prototype: prototype(&mut O::default())?,
            commands: BTreeMap::new(),
        })
    }

    /// Registers `command` under `name`.
    pub fn add_command<C>(&mut self, name: &str, command: C) -> Result<(), SpecificationError>
    where
        C: Command<(P, CommandFrame<O>)> + 'static,
    {
        if !is_valid_command_name(name) {
            return Err(SpecificationError::CommandInvalidName(name.to_string()));
        }
        if self.commands.contains_key(name) {
            return Err(SpecificationError::DuplicateCommandName(name.to_string()));
        }

        self.commands.insert(name.to_string(), Box::new(command));
        Ok(())
    }

    /// Registers a [`LeafCommand`] built from `handler`.
    pub fn add_leaf<SO, SA, F>(&mut self, name: &str, handler: F) -> Result<(), SpecificationError>
    where
        SO: Schema + Default + 'static,
        SA: Schema + Default + 'static,
        F: FnMut((P, CommandFrame<O>), ParsedCommand<SO, SA>) -> Result<(), Error> + 'static,
    {
        let leaf = LeafCommand::<SO, SA, F>::new(handler)?;
        self.add_command(name, leaf)
    }

    /// Registered command names, sorted.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    fn dispatch(&mut self, mapper: &Mapper, argv: &[String], context: P) -> Result<(), Error> {
        let (program_name, tokens) = split_program(argv);
        let mut parsed = tokenize(tokens, &self.prototype, ArgumentLimit::Single)?;

        let name = parsed
            .arguments
            .pop()
            .ok_or(ParseError::NoCommandName)?;

        let args_used = parsed.args_used;
        let command = self
            .commands
            .get_mut(&name)
            .ok_or_else(|| ParseError::UnrecognizedCommandName(name.clone()))?;

        let mut options = O::default();
        let unmatched = mapper.map(&mut options, &mut NoArguments, parsed)?;

        debug!(command = %name, program = %program_name, "Dispatching command");

        let frame = CommandFrame {
            options,
            program_name,
            unmatched,
        };

        // The command name sits at `tokens[args_used - 1]`, i.e. `argv[args_used]`.
        command.invoke(mapper, &argv[args_used..], (context, frame))
    }
}

impl<O, P> Command<P> for CommandGroup<O, P>
where
    O: Schema + Default + 'static,
    P: 'static,
{
    fn invoke(&mut self, mapper: &Mapper, argv: &[String], context: P) -> Result<(), Error> {
        self.dispatch(mapper, argv, context)
    }
}

impl<O, P> fmt::Debug for CommandGroup<O, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandGroup")
            .field("prototype", &self.prototype)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Application dispatching on a command name.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use argbind::{CommandFrame, Flag, Mapper, MultiCommandApp, NoArguments, ParsedCommand, schema};
///
/// #[derive(Default)]
/// struct Global { verbose: Flag }
/// schema!(Global { verbose });
///
/// #[derive(Default)]
/// struct Build { release: Flag }
/// schema!(Build { release });
///
/// let seen = Rc::new(RefCell::new(None));
/// let sink = Rc::clone(&seen);
///
/// let mut app = MultiCommandApp::<Global>::new(Mapper::default()).unwrap();
/// app.add_leaf(
///     "build",
///     move |(_, frame): ((), CommandFrame<Global>), cmd: ParsedCommand<Build, NoArguments>| {
///         let verbose = *frame.options.verbose.value();
///         *sink.borrow_mut() = Some((verbose, *cmd.options.release.value()));
///         Ok(())
///     },
/// )
/// .unwrap();
///
/// app.run(&["tool", "--verbose", "build", "--release"]).unwrap();
/// assert_eq!(*seen.borrow(), Some((true, true)));
/// ```
pub struct MultiCommandApp<O> {
    mapper: Mapper,
    group: CommandGroup<O, ()>,
}

impl<O> MultiCommandApp<O>
where
    O: Schema + Default + 'static,
{
    pub fn new(mapper: Mapper) -> Result<Self, SpecificationError> {
        Ok(Self {
            mapper,
            group: CommandGroup::new()?,
        })
    }

    pub fn add_command<C>(&mut self, name: &str, command: C) -> Result<(), SpecificationError>
    where
        C: Command<((), CommandFrame<O>)> + 'static,
    {
        self.group.add_command(name, command)
    }

    pub fn add_leaf<SO, SA, F>(&mut self, name: &str, handler: F) -> Result<(), SpecificationError>
    where
        SO: Schema + Default + 'static,
        SA: Schema + Default + 'static,
        F: FnMut(((), CommandFrame<O>), ParsedCommand<SO, SA>) -> Result<(), Error> + 'static,
    {
        self.group.add_leaf(name, handler)
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.group.command_names()
    }

    /// Dispatches `argv`, whose first element is the program name.
    pub fn run<S: AsRef<str>>(&mut self, argv: &[S]) -> Result<(), Error> {
        let argv: Vec<String> = argv.iter().map(|s| s.as_ref().to_string()).collect();
        self.group.dispatch(&self.mapper, &argv, ())
    }

    /// Dispatches the arguments of the current process.
    pub fn run_from_env(&mut self) -> Result<(), Error> {
        let argv: Vec<String> = std::env::args().collect();
        self.run(&argv)
    }
}

impl<O> fmt::Debug for MultiCommandApp<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiCommandApp")
            .field("mapper", &self.mapper)
            .field("group", &self.group)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::{Arg, Flag, MapperConfig, NoOptions, Opt, OptArg, ValueParser, schema};

    struct Global {
        verbose: Flag,
        color: Opt<Option<String>>,
    }

    impl Default for Global {
        fn default() -> Self {
            Self {
                verbose: Flag::new().short('v'),
                color: Opt::new(),
            }
        }
    }

    schema!(Global { verbose, color });

    #[derive(Default)]
    struct Build {
        release: Flag,
    }

    schema!(Build { release });

    #[derive(Default)]
    struct Target {
        name: Arg<String>,
    }

    schema!(Target { name });

    type Log = Rc<RefCell<Vec<String>>>;

    fn app(log: &Log) -> MultiCommandApp<Global> {
        let mut app = MultiCommandApp::<Global>::new(Mapper::default()).unwrap();

        let sink = Rc::clone(log);
        app.add_leaf(
            "build",
            move |(_, frame): ((), CommandFrame<Global>), cmd: ParsedCommand<Build, Target>| {
                sink.borrow_mut().push(format!(
                    "{} verbose={} release={} target={}",
                    cmd.program_name,
                    frame.options.verbose.value(),
                    cmd.options.release.value(),
                    cmd.arguments.name.value(),
                ));
                Ok(())
            },
        )
        .unwrap();

        app
    }

    #[test]
    fn test_dispatch_binds_each_level() {
        let log = Log::default();
        let mut app = app(&log);

        app.run(&["tool", "-v", "build", "--release", "x86"]).unwrap();
        app.run(&["tool", "build", "arm"]).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "build verbose=true release=true target=x86",
                "build verbose=false release=false target=arm",
            ]
        );
    }

    #[test]
    fn test_value_option_may_swallow_command_name() {
        let log = Log::default();
        let mut app = app(&log);

        let err = app.run(&["tool", "--color", "build"]).unwrap_err();
        assert_eq!(err, Error::Parse(ParseError::NoCommandName));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_dispatch_errors() {
        let log = Log::default();
        let mut app = app(&log);

        assert_eq!(
            app.run(&["tool", "-v"]).unwrap_err(),
            Error::Parse(ParseError::NoCommandName)
        );
        assert_eq!(
            app.run(&["tool", "test"]).unwrap_err(),
            Error::Parse(ParseError::UnrecognizedCommandName("test".to_string()))
        );
        assert_eq!(
            app.run(&["tool", "--", "build"]).unwrap_err(),
            Error::Parse(ParseError::MisplacedEndOfOptions)
        );
        assert_eq!(
            app.run(&["tool", "--release", "build", "x86"]).unwrap_err(),
            Error::Parse(ParseError::UnrecognizedOptionName("release".to_string()))
        );
        assert_eq!(
            app.run(&["tool", "build"]).unwrap_err(),
            Error::Parse(ParseError::ArgumentValueMissing("name".to_string()))
        );
    }

    #[test]
    fn test_command_registration() {
        let mut app = app(&Log::default());

        let noop = |_: ((), CommandFrame<Global>), _: ParsedCommand<Build, NoArguments>| Ok(());
        assert_eq!(
            app.add_leaf("build", noop),
            Err(SpecificationError::DuplicateCommandName("build".to_string()))
        );
        assert_eq!(
            app.add_leaf("1st", noop),
            Err(SpecificationError::CommandInvalidName("1st".to_string()))
        );
        app.add_leaf("x", noop).unwrap();

        assert_eq!(app.command_names().collect::<Vec<_>>(), vec!["build", "x"]);
    }

    #[test]
    fn test_nested_groups_accumulate_context() {
        #[derive(Default)]
        struct Remote {
            dry_run: Flag,
        }
        schema!(Remote { dry_run });

        let log = Log::default();
        let sink = Rc::clone(&log);

        let mut remote = CommandGroup::<Remote, ((), CommandFrame<Global>)>::new().unwrap();
        remote
            .add_leaf(
                "add",
                move |(((), root), group): (((), CommandFrame<Global>), CommandFrame<Remote>),
                      cmd: ParsedCommand<NoOptions, Target>| {
                    sink.borrow_mut().push(format!(
                        "{}/{}/{} verbose={} dry_run={} name={}",
                        root.program_name,
                        group.program_name,
                        cmd.program_name,
                        root.options.verbose.value(),
                        group.options.dry_run.value(),
                        cmd.arguments.name.value(),
                    ));
                    Ok(())
                },
            )
            .unwrap();

        let mut app = MultiCommandApp::<Global>::new(Mapper::default()).unwrap();
        app.add_command("remote", remote).unwrap();

        app.run(&["git", "-v", "remote", "--dry_run", "add", "origin"])
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["git/remote/add verbose=true dry_run=true name=origin"]
        );
    }

    #[test]
    fn test_unmatched_options_travel_with_frame() {
        let seen = Rc::new(RefCell::new(UnmatchedData::default()));
        let sink = Rc::clone(&seen);

        let mapper = Mapper::new(
            MapperConfig {
                allow_unrecognized_options: true,
                ..MapperConfig::default()
            },
            ValueParser::default(),
        );
        let mut app = MultiCommandApp::<Global>::new(mapper).unwrap();
        app.add_leaf(
            "build",
            move |(_, frame): ((), CommandFrame<Global>), _: ParsedCommand<Build, NoArguments>| {
                *sink.borrow_mut() = frame.unmatched;
                Ok(())
            },
        )
        .unwrap();

        app.run(&["tool", "--jobs=4", "build"]).unwrap();
        assert_eq!(seen.borrow().options["jobs"], vec![Some("4".to_string())]);
    }

    #[test]
    fn test_simple_app_rejects_bad_schemas() {
        struct Swapped {
            first: OptArg<String>,
            second: Arg<String>,
        }
        impl Default for Swapped {
            fn default() -> Self {
                Self {
                    first: OptArg::new(String::new()),
                    second: Arg::new(),
                }
            }
        }
        schema!(Swapped { first, second });

        assert_eq!(
            SimpleApp::<NoOptions, Swapped>::new(Mapper::default()).unwrap_err(),
            SpecificationError::RequiredArgumentAfterOptional("second".to_string())
        );
    }
}
