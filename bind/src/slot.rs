//! Typed schema slots.
//!
//! Each slot holds the declaration of one field (names, default, implicit
//! value, validators) together with the value bound to it. The resolution
//! rules live in the [`OptionSlot`] and [`ArgumentSlot`] implementations
//! below; [`Mapper`] decides which slot receives which tokens.
//!
//! | slot            | kind                                          |
//! |-----------------|-----------------------------------------------|
//! | [`Flag`]        | flag                                          |
//! | [`Opt<T>`]      | required or optional option, flag for `bool`  |
//! | [`MultiOpt<T>`] | multi-option                                  |
//! | [`Arg<T>`]      | required argument                             |
//! | [`OptArg<T>`]   | optional argument                             |
//! | [`ArgSink<T>`]  | argument sink                                 |

use std::fmt;

use argbind_core::{FieldKind, FieldSchema};

use crate::schema::{ArgumentSlot, Field, FieldRef, OptionSlot};
use crate::validators::Validators;
use crate::value::FromArg;
use crate::{Invocation, Mapper, ParseError};

fn parse_text<T: FromArg>(mapper: &Mapper, name: &str, text: &str) -> Result<T, ParseError> {
    mapper
        .value_parser()
        .parse(text)
        .map_err(|err| ParseError::UnableToParseValue {
            field: name.to_string(),
            message: err.0,
        })
}

fn run_validators<T>(
    validators: &Validators<T>,
    value: Option<&T>,
    name: &str,
) -> Result<(), ParseError> {
    let Some(value) = value else {
        return Ok(());
    };
    match validators.validate(value) {
        Some(message) => Err(ParseError::ValidationError {
            field: name.to_string(),
            message,
        }),
        None => Ok(()),
    }
}

fn unbound(kind: &str) -> ! {
    panic!("{kind} was read before a successful parse bound it")
}

/// Single-valued option.
///
/// The kind follows from the value type and the declaration: `bool` makes a
/// flag, a nullable `Option<_>` or a declared default makes an optional
/// option, anything else a required option.
///
/// # Examples
///
/// ```
/// use argbind::Opt;
///
/// let jobs: Opt<u32> = Opt::new().short('j').default_value(4).validate(|n: &u32| {
///     (*n == 0).then(|| "must be positive".to_string())
/// });
/// assert_eq!(jobs.get(), None);
/// ```
pub struct Opt<T> {
    value: Option<T>,
    long: Option<String>,
    short: Option<char>,
    default: Option<T>,
    implicit: Option<T>,
    description: Option<String>,
    validators: Validators<T>,
}

/// Boolean switch.
pub type Flag = Opt<bool>;

impl<T> Opt<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            long: None,
            short: None,
            default: None,
            implicit: None,
            description: None,
            validators: Validators::new(),
        }
    }

    /// Overrides the long name, which defaults to the field name.
    pub fn long(mut self, name: &str) -> Self {
        self.long = Some(name.to_string());
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Value bound when the option is absent.
    pub fn default_value(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    /// Value bound when the option appears without text.
    pub fn implicit_value(mut self, value: T) -> Self {
        self.implicit = Some(value);
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Appends a validator.
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.validators.push(validator);
        self
    }

    /// Bound value, `None` before binding.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Bound value.
    ///
    /// # Panics
    ///
    /// Panics if the option has not been bound yet.
    pub fn value(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => unbound("option"),
        }
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for Opt<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opt")
            .field("value", &self.value)
            .field("long", &self.long)
            .field("short", &self.short)
            .finish_non_exhaustive()
    }
}

impl<T: FromArg + Clone> OptionSlot for Opt<T> {
    fn describe(&self, field: &str) -> FieldSchema {
        let kind = if !T::REQUIRES_VALUE {
            FieldKind::Flag
        } else if T::when_absent().is_some() || self.default.is_some() {
            FieldKind::OptionalOption
        } else {
            FieldKind::RequiredOption
        };

        let mut schema = FieldSchema::new(field, kind).with_requires_value(T::REQUIRES_VALUE);
        if let Some(long) = &self.long {
            schema = schema.with_long(long);
        }
        if let Some(short) = self.short {
            schema = schema.with_short(short);
        }
        if self.default.is_some() {
            schema = schema.with_default();
        }
        if self.implicit.is_some() {
            schema = schema.with_implicit();
        }
        if let Some(description) = &self.description {
            schema = schema.with_description(description);
        }
        schema
    }

    fn bind_absent(&mut self, name: &str) -> Result<(), ParseError> {
        let value = T::when_absent()
            .or_else(|| self.default.clone())
            .ok_or_else(|| ParseError::OptionValueMissing(name.to_string()))?;
        self.value = Some(value);
        Ok(())
    }

    fn bind_invocations(
        &mut self,
        name: &str,
        mut invocations: Vec<Invocation>,
        mapper: &Mapper,
    ) -> Result<(), ParseError> {
        if invocations.len() > 1 && !mapper.config().allow_too_many_values {
            return Err(ParseError::TooManyValues(name.to_string()));
        }

        // Last invocation wins when repeats are tolerated.
        let Some(invocation) = invocations.pop() else {
            return self.bind_absent(name);
        };

        let value = match invocation.text {
            Some(text) => parse_text(mapper, name, &text)?,
            // Withheld by a short cluster: resolved like a bare or absent option.
            None if invocation.withheld => {
                let fallback = self
                    .implicit
                    .clone()
                    .or_else(|| self.default.clone())
                    .or_else(T::when_bare);
                match fallback {
                    Some(value) => value,
                    None => return self.bind_absent(name),
                }
            }
            None => self
                .implicit
                .clone()
                .or_else(T::when_bare)
                .ok_or_else(|| ParseError::NoImplicitValue(name.to_string()))?,
        };
        self.value = Some(value);
        Ok(())
    }

    fn validate_value(&self, name: &str) -> Result<(), ParseError> {
        run_validators(&self.validators, self.value.as_ref(), name)
    }
}

impl<T: FromArg + Clone> Field for Opt<T> {
    fn field_ref(&mut self, name: &'static str) -> FieldRef<'_> {
        FieldRef::Option { name, slot: self }
    }
}

/// Option collecting every invocation into a container.
///
/// Each invocation contributes one element, parsed from its text. A bare
/// invocation contributes the implicit element, or `T`'s own bare value
/// (`true` for `bool`).
///
/// ```
/// use argbind::MultiOpt;
///
/// let includes: MultiOpt<String> = MultiOpt::new().short('I').default_value(vec![]);
/// assert!(includes.get().is_none());
/// ```
pub struct MultiOpt<T, C = Vec<T>> {
    value: Option<C>,
    long: Option<String>,
    short: Option<char>,
    default: Option<C>,
    implicit_element: Option<T>,
    description: Option<String>,
    validators: Validators<C>,
}

impl<T, C> MultiOpt<T, C> {
    pub fn new() -> Self {
        Self {
            value: None,
            long: None,
            short: None,
            default: None,
            implicit_element: None,
            description: None,
            validators: Validators::new(),
        }
    }

    pub fn long(mut self, name: &str) -> Self {
        self.long = Some(name.to_string());
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Container bound when the option never appears.
    pub fn default_value(mut self, value: C) -> Self {
        self.default = Some(value);
        self
    }

    /// Element contributed by a bare invocation.
    pub fn implicit_element(mut self, value: T) -> Self {
        self.implicit_element = Some(value);
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Appends a validator over the whole container.
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&C) -> Option<String> + Send + Sync + 'static,
    {
        self.validators.push(validator);
        self
    }

    pub fn get(&self) -> Option<&C> {
        self.value.as_ref()
    }

    /// Bound container.
    ///
    /// # Panics
    ///
    /// Panics if the option has not been bound yet.
    pub fn value(&self) -> &C {
        match &self.value {
            Some(value) => value,
            None => unbound("multi-option"),
        }
    }

    pub fn into_inner(self) -> Option<C> {
        self.value
    }
}

impl<T, C> Default for MultiOpt<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: fmt::Debug> fmt::Debug for MultiOpt<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiOpt")
            .field("value", &self.value)
            .field("long", &self.long)
            .field("short", &self.short)
            .finish_non_exhaustive()
    }
}

impl<T, C> OptionSlot for MultiOpt<T, C>
where
    T: FromArg + Clone,
    C: FromIterator<T> + Clone,
{
    fn describe(&self, field: &str) -> FieldSchema {
        let mut schema = FieldSchema::new(field, FieldKind::MultiOption)
            .with_requires_value(T::REQUIRES_VALUE);
        if let Some(long) = &self.long {
            schema = schema.with_long(long);
        }
        if let Some(short) = self.short {
            schema = schema.with_short(short);
        }
        if self.default.is_some() {
            schema = schema.with_default();
        }
        if self.implicit_element.is_some() {
            schema = schema.with_implicit();
        }
        if let Some(description) = &self.description {
            schema = schema.with_description(description);
        }
        schema
    }

    fn bind_absent(&mut self, name: &str) -> Result<(), ParseError> {
        let value = self
            .default
            .clone()
            .ok_or_else(|| ParseError::OptionValueMissing(name.to_string()))?;
        self.value = Some(value);
        Ok(())
    }

    fn bind_invocations(
        &mut self,
        name: &str,
        invocations: Vec<Invocation>,
        mapper: &Mapper,
    ) -> Result<(), ParseError> {
        let value = invocations
            .into_iter()
            .filter_map(|invocation| match invocation.text {
                Some(text) => Some(parse_text(mapper, name, &text)),
                None => {
                    let bare = self.implicit_element.clone().or_else(T::when_bare);
                    if invocation.withheld {
                        // A withheld element with nothing to fall back on is dropped.
                        bare.map(Ok)
                    } else {
                        Some(bare.ok_or_else(|| {
                            ParseError::NoImplicitSingleValue(name.to_string())
                        }))
                    }
                }
            })
            .collect::<Result<C, _>>()?;
        self.value = Some(value);
        Ok(())
    }

    fn validate_value(&self, name: &str) -> Result<(), ParseError> {
        run_validators(&self.validators, self.value.as_ref(), name)
    }
}

impl<T, C> Field for MultiOpt<T, C>
where
    T: FromArg + Clone,
    C: FromIterator<T> + Clone,
{
    fn field_ref(&mut self, name: &'static str) -> FieldRef<'_> {
        FieldRef::Option { name, slot: self }
    }
}

fn argument_schema(
    field: &str,
    kind: FieldKind,
    display_name: Option<&str>,
    description: Option<&str>,
) -> FieldSchema {
    let mut schema = FieldSchema::new(field, kind);
    if let Some(display_name) = display_name {
        schema = schema.with_long(display_name);
    }
    if let Some(description) = description {
        schema = schema.with_description(description);
    }
    schema
}

/// Positional argument that must be present.
pub struct Arg<T> {
    value: Option<T>,
    display_name: Option<String>,
    description: Option<String>,
    validators: Validators<T>,
}

impl<T> Arg<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            display_name: None,
            description: None,
            validators: Validators::new(),
        }
    }

    /// Name used in error messages, defaults to the field name.
    pub fn display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.validators.push(validator);
        self
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Bound value.
    ///
    /// # Panics
    ///
    /// Panics if the argument has not been bound yet.
    pub fn value(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => unbound("argument"),
        }
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for Arg<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Arg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arg")
            .field("value", &self.value)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

impl<T: FromArg> ArgumentSlot for Arg<T> {
    fn describe(&self, field: &str) -> FieldSchema {
        argument_schema(
            field,
            FieldKind::RequiredArgument,
            self.display_name.as_deref(),
            self.description.as_deref(),
        )
    }

    fn bind_tokens(
        &mut self,
        name: &str,
        tokens: &[String],
        mapper: &Mapper,
    ) -> Result<usize, ParseError> {
        let token = tokens
            .first()
            .ok_or_else(|| ParseError::ArgumentValueMissing(name.to_string()))?;
        self.value = Some(parse_text(mapper, name, token)?);
        Ok(1)
    }

    fn validate_value(&self, name: &str) -> Result<(), ParseError> {
        run_validators(&self.validators, self.value.as_ref(), name)
    }
}

impl<T: FromArg> Field for Arg<T> {
    fn field_ref(&mut self, name: &'static str) -> FieldRef<'_> {
        FieldRef::Argument { name, slot: self }
    }
}

/// Positional argument with a mandatory default.
///
/// ```
/// use argbind::OptArg;
///
/// let target = OptArg::new(".".to_string()).display_name("TARGET");
/// assert_eq!(target.default_value(), ".");
/// ```
pub struct OptArg<T> {
    value: Option<T>,
    default: T,
    display_name: Option<String>,
    description: Option<String>,
    validators: Validators<T>,
}

impl<T> OptArg<T> {
    pub fn new(default: T) -> Self {
        Self {
            value: None,
            default,
            display_name: None,
            description: None,
            validators: Validators::new(),
        }
    }

    pub fn display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.validators.push(validator);
        self
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Bound value.
    ///
    /// # Panics
    ///
    /// Panics if the argument has not been bound yet.
    pub fn value(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => unbound("argument"),
        }
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for OptArg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptArg")
            .field("value", &self.value)
            .field("default", &self.default)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

impl<T: FromArg + Clone> ArgumentSlot for OptArg<T> {
    fn describe(&self, field: &str) -> FieldSchema {
        argument_schema(
            field,
            FieldKind::OptionalArgument,
            self.display_name.as_deref(),
            self.description.as_deref(),
        )
        .with_default()
    }

    fn bind_tokens(
        &mut self,
        name: &str,
        tokens: &[String],
        mapper: &Mapper,
    ) -> Result<usize, ParseError> {
        match tokens.first() {
            Some(token) => {
                self.value = Some(parse_text(mapper, name, token)?);
                Ok(1)
            }
            None => {
                self.value = Some(self.default.clone());
                Ok(0)
            }
        }
    }

    fn validate_value(&self, name: &str) -> Result<(), ParseError> {
        run_validators(&self.validators, self.value.as_ref(), name)
    }
}

impl<T: FromArg + Clone> Field for OptArg<T> {
    fn field_ref(&mut self, name: &'static str) -> FieldRef<'_> {
        FieldRef::Argument { name, slot: self }
    }
}

/// Positional field taking every remaining positional token.
///
/// Binds to an empty container when nothing is left.
pub struct ArgSink<T, C = Vec<T>> {
    value: Option<C>,
    display_name: Option<String>,
    description: Option<String>,
    validators: Validators<C>,
    element: std::marker::PhantomData<fn() -> T>,
}

impl<T, C> ArgSink<T, C> {
    pub fn new() -> Self {
        Self {
            value: None,
            display_name: None,
            description: None,
            validators: Validators::new(),
            element: std::marker::PhantomData,
        }
    }

    pub fn display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&C) -> Option<String> + Send + Sync + 'static,
    {
        self.validators.push(validator);
        self
    }

    pub fn get(&self) -> Option<&C> {
        self.value.as_ref()
    }

    /// Bound container.
    ///
    /// # Panics
    ///
    /// Panics if the sink has not been bound yet.
    pub fn value(&self) -> &C {
        match &self.value {
            Some(value) => value,
            None => unbound("argument sink"),
        }
    }

    pub fn into_inner(self) -> Option<C> {
        self.value
    }
}

impl<T, C> Default for ArgSink<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: fmt::Debug> fmt::Debug for ArgSink<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgSink")
            .field("value", &self.value)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

impl<T, C> ArgumentSlot for ArgSink<T, C>
where
    T: FromArg,
    C: FromIterator<T>,
{
    fn describe(&self, field: &str) -> FieldSchema {
        argument_schema(
            field,
            FieldKind::ArgumentSink,
            self.display_name.as_deref(),
            self.description.as_deref(),
        )
    }

    fn bind_tokens(
        &mut self,
        name: &str,
        tokens: &[String],
        mapper: &Mapper,
    ) -> Result<usize, ParseError> {
        let value = tokens
            .iter()
            .map(|token| parse_text(mapper, name, token))
            .collect::<Result<C, _>>()?;
        self.value = Some(value);
        Ok(tokens.len())
    }

    fn validate_value(&self, name: &str) -> Result<(), ParseError> {
        run_validators(&self.validators, self.value.as_ref(), name)
    }
}

impl<T, C> Field for ArgSink<T, C>
where
    T: FromArg,
    C: FromIterator<T>,
{
    fn field_ref(&mut self, name: &'static str) -> FieldRef<'_> {
        FieldRef::Argument { name, slot: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapperConfig;

    fn mapper() -> Mapper {
        Mapper::default()
    }

    fn texts(values: &[Option<&str>]) -> Vec<Invocation> {
        values
            .iter()
            .enumerate()
            .map(|(index, text)| Invocation {
                text: text.map(str::to_string),
                index,
                withheld: false,
            })
            .collect()
    }

    fn withheld() -> Vec<Invocation> {
        vec![Invocation {
            text: None,
            index: 0,
            withheld: true,
        }]
    }

    #[test]
    fn test_absent_option_resolution() {
        let mut nullable: Opt<Option<u8>> = Opt::new().default_value(Some(3));
        nullable.bind_absent("count").unwrap();
        assert_eq!(nullable.get(), Some(&None));

        let mut flag = Flag::new();
        flag.bind_absent("verbose").unwrap();
        assert_eq!(flag.get(), Some(&false));

        let mut with_default: Opt<u8> = Opt::new().default_value(7);
        with_default.bind_absent("count").unwrap();
        assert_eq!(*with_default.value(), 7);

        let mut required: Opt<u8> = Opt::new();
        assert_eq!(
            required.bind_absent("count"),
            Err(ParseError::OptionValueMissing("count".to_string()))
        );
    }

    #[test]
    fn test_bare_option_resolution() {
        let mut with_implicit: Opt<u8> = Opt::new().implicit_value(9);
        with_implicit
            .bind_invocations("count", texts(&[None]), &mapper())
            .unwrap();
        assert_eq!(*with_implicit.value(), 9);

        let mut flag = Flag::new();
        flag.bind_invocations("verbose", texts(&[None]), &mapper())
            .unwrap();
        assert!(*flag.value());

        let mut flag = Flag::new();
        flag.bind_invocations("verbose", texts(&[Some("false")]), &mapper())
            .unwrap();
        assert!(!*flag.value());

        let mut plain: Opt<u8> = Opt::new();
        assert_eq!(
            plain.bind_invocations("count", texts(&[None]), &mapper()),
            Err(ParseError::NoImplicitValue("count".to_string()))
        );
    }

    #[test]
    fn test_withheld_option_resolution() {
        let mut with_implicit: Opt<String> = Opt::new()
            .default_value("dflt".to_string())
            .implicit_value("imp".to_string());
        with_implicit
            .bind_invocations("out", withheld(), &mapper())
            .unwrap();
        assert_eq!(with_implicit.value(), "imp");

        let mut with_default: Opt<String> = Opt::new().default_value("dflt".to_string());
        with_default
            .bind_invocations("out", withheld(), &mapper())
            .unwrap();
        assert_eq!(with_default.value(), "dflt");

        let mut nullable: Opt<Option<String>> = Opt::new();
        nullable
            .bind_invocations("out", withheld(), &mapper())
            .unwrap();
        assert_eq!(nullable.value(), &None);

        let mut plain: Opt<String> = Opt::new();
        assert_eq!(
            plain.bind_invocations("out", withheld(), &mapper()),
            Err(ParseError::OptionValueMissing("out".to_string()))
        );

        let mut levels: MultiOpt<u8> = MultiOpt::new();
        levels
            .bind_invocations("level", withheld(), &mapper())
            .unwrap();
        assert!(levels.value().is_empty());

        let mut levels: MultiOpt<u8> = MultiOpt::new().implicit_element(4);
        levels
            .bind_invocations("level", withheld(), &mapper())
            .unwrap();
        assert_eq!(levels.value(), &vec![4]);
    }

    #[test]
    fn test_repeated_single_option() {
        let mut opt: Opt<u8> = Opt::new();
        assert_eq!(
            opt.bind_invocations("count", texts(&[Some("1"), Some("2")]), &mapper()),
            Err(ParseError::TooManyValues("count".to_string()))
        );

        let tolerant = Mapper::new(
            MapperConfig {
                allow_too_many_values: true,
                ..MapperConfig::default()
            },
            Default::default(),
        );
        opt.bind_invocations("count", texts(&[Some("1"), Some("2")]), &tolerant)
            .unwrap();
        assert_eq!(*opt.value(), 2);
    }

    #[test]
    fn test_multi_option_elements() {
        let mut levels: MultiOpt<u8> = MultiOpt::new().implicit_element(5);
        levels
            .bind_invocations("level", texts(&[Some("1"), None, Some("3")]), &mapper())
            .unwrap();
        assert_eq!(levels.value(), &vec![1, 5, 3]);

        let mut strict: MultiOpt<u8> = MultiOpt::new();
        assert_eq!(
            strict.bind_invocations("level", texts(&[Some("1"), None]), &mapper()),
            Err(ParseError::NoImplicitSingleValue("level".to_string()))
        );

        let mut switches: MultiOpt<bool> = MultiOpt::new();
        switches
            .bind_invocations("debug", texts(&[None, None]), &mapper())
            .unwrap();
        assert_eq!(switches.value(), &vec![true, true]);
    }

    #[test]
    fn test_parse_failure_names_the_field() {
        let mut opt: Opt<u8> = Opt::new();
        let err = opt
            .bind_invocations("count", texts(&[Some("many")]), &mapper())
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnableToParseValue { ref field, .. } if field == "count"
        ));
    }

    #[test]
    fn test_validators_run_on_bound_value() {
        let mut opt: Opt<u16> = Opt::new().validate(crate::validators::less_than(1024));
        opt.bind_invocations("port", texts(&[Some("8080")]), &mapper())
            .unwrap();
        assert_eq!(
            opt.validate_value("port"),
            Err(ParseError::ValidationError {
                field: "port".to_string(),
                message: "Value is required to be less than '1024'".to_string(),
            })
        );
    }

    #[test]
    fn test_argument_slots() {
        let tokens = vec!["a".to_string(), "b".to_string()];

        let mut required: Arg<String> = Arg::new();
        assert_eq!(required.bind_tokens("src", &tokens, &mapper()), Ok(1));
        assert_eq!(required.value(), "a");
        assert_eq!(
            required.bind_tokens("src", &[], &mapper()),
            Err(ParseError::ArgumentValueMissing("src".to_string()))
        );

        let mut optional = OptArg::new(10u8);
        assert_eq!(optional.bind_tokens("count", &[], &mapper()), Ok(0));
        assert_eq!(*optional.value(), 10);

        let mut sink: ArgSink<String> = ArgSink::new();
        assert_eq!(sink.bind_tokens("files", &tokens[1..], &mapper()), Ok(1));
        assert_eq!(sink.value(), &vec!["b".to_string()]);

        let mut empty: ArgSink<String> = ArgSink::new();
        assert_eq!(empty.bind_tokens("files", &[], &mapper()), Ok(0));
        assert!(empty.value().is_empty());
    }

    #[test]
    #[should_panic(expected = "before a successful parse")]
    fn test_value_before_binding_panics() {
        let opt: Opt<u8> = Opt::new();
        let _ = opt.value();
    }
}
