//! Value validators.
//!
//! A validator is any `Fn(&T) -> Option<String>`: `None` accepts the value,
//! `Some(message)` rejects it. Fields keep an ordered [`Validators`] chain
//! and the first rejection wins.
//!
//! # Examples
//!
//! ```
//! use argbind::validators::{Validators, greater_than, less_than};
//!
//! let chain = Validators::new()
//!     .with(greater_than(0))
//!     .with(less_than(65536));
//!
//! assert_eq!(chain.validate(&8080), None);
//! assert_eq!(
//!     chain.validate(&0),
//!     Some("Value is required to be greater than '0'".to_string())
//! );
//! ```

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt::{self, Display};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

type BoxedValidator<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Ordered validator chain for values of type `T`.
pub struct Validators<T> {
    chain: Vec<BoxedValidator<T>>,
}

impl<T> Validators<T> {
    pub fn new() -> Self {
        Self { chain: Vec::new() }
    }

    /// Appends a validator to the end of the chain.
    pub fn with<F>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.push(validator);
        self
    }

    pub fn push<F>(&mut self, validator: F)
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.chain.push(Box::new(validator));
    }

    /// Runs the chain in order, stopping at the first rejection.
    pub fn validate(&self, value: &T) -> Option<String> {
        self.chain.iter().find_map(|validator| validator(value))
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl<T> Default for Validators<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Validators<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validators")
            .field("len", &self.chain.len())
            .finish()
    }
}

/// Accepts values within `[min, max]`.
pub fn in_range<T>(min: T, max: T) -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    move |value: &T| {
        if *value < min || *value > max {
            return Some(format!("Value is required to be between '{min}' and '{max}'"));
        }
        None
    }
}

pub fn less_than<T>(max: T) -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    move |value: &T| (*value >= max).then(|| format!("Value is required to be less than '{max}'"))
}

pub fn less_than_eq<T>(max: T) -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    move |value: &T| {
        (*value > max).then(|| format!("Value is required to be less than or equal to '{max}'"))
    }
}

pub fn greater_than<T>(min: T) -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    move |value: &T| {
        (*value <= min).then(|| format!("Value is required to be greater than '{min}'"))
    }
}

pub fn greater_than_eq<T>(min: T) -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: PartialOrd + Display + Send + Sync + 'static,
{
    move |value: &T| {
        (*value < min)
            .then(|| format!("Value is required to be greater than or equal to '{min}'"))
    }
}

pub fn equal_to<T>(expected: T) -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: PartialEq + Display + Send + Sync + 'static,
{
    move |value: &T| {
        (*value != expected).then(|| format!("Value is required to be equal to '{expected}'"))
    }
}

/// Accepts only the listed values.
///
/// # Examples
///
/// ```
/// use argbind::validators::one_of;
///
/// let format = one_of(["json".to_string(), "yaml".to_string()]);
/// assert_eq!(format(&"json".to_string()), None);
/// assert_eq!(
///     format(&"toml".to_string()).as_deref(),
///     Some("Unexpected value 'toml', allowed values are: json, yaml")
/// );
/// ```
pub fn one_of<T, I>(allowed: I) -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: PartialEq + Display + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
{
    let allowed: Vec<T> = allowed.into_iter().collect();
    move |value: &T| {
        if allowed.contains(value) {
            return None;
        }
        let listed = allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!("Unexpected value '{value}', allowed values are: {listed}"))
    }
}

/// Values with a length, for [`size`].
pub trait Length {
    fn length(&self) -> usize;
}

impl Length for String {
    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl<T> Length for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T> Length for VecDeque<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T> Length for BTreeSet<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T, S> Length for HashSet<T, S> {
    fn length(&self) -> usize {
        self.len()
    }
}

/// Accepts strings and collections whose length lies within `[min, max]`.
pub fn size<T>(min: usize, max: usize) -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: Length + 'static,
{
    move |value: &T| {
        let len = value.length();
        (len < min || len > max)
            .then(|| format!("Value size is required to be between '{min}' and '{max}'"))
    }
}

pub fn existing_file<T>() -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: AsRef<Path> + 'static,
{
    |value: &T| {
        let path = value.as_ref();
        if !path.exists() {
            return Some(format!("File '{}' does not exist", path.display()));
        }
        if !path.is_file() {
            return Some(format!("'{}' is not a file", path.display()));
        }
        None
    }
}

pub fn existing_directory<T>() -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: AsRef<Path> + 'static,
{
    |value: &T| {
        let path = value.as_ref();
        if !path.exists() {
            return Some(format!("Directory '{}' does not exist", path.display()));
        }
        if !path.is_dir() {
            return Some(format!("'{}' is not a directory", path.display()));
        }
        None
    }
}

pub fn existing_path<T>() -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: AsRef<Path> + 'static,
{
    |value: &T| {
        let path = value.as_ref();
        (!path.exists()).then(|| format!("'{}' is not a file or a directory", path.display()))
    }
}

pub fn nonexistent_path<T>() -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: AsRef<Path> + 'static,
{
    |value: &T| {
        let path = value.as_ref();
        if !path.exists() {
            return None;
        }
        let kind = if path.is_dir() { "Directory" } else { "File" };
        Some(format!("{kind} '{}' already exists", path.display()))
    }
}

/// Accepts paths whose permission bits include every bit of `required`,
/// given as a mode such as `0o640`.
///
/// Missing read, write and execute bits are reported first, in that order.
#[cfg(unix)]
pub fn permissions<T>(required: u32) -> impl Fn(&T) -> Option<String> + Send + Sync + 'static
where
    T: AsRef<Path> + 'static,
{
    const CHECKS: [(u32, &str); 4] = [
        (0o444, "is not readable"),
        (0o222, "is not writable"),
        (0o111, "is not executable"),
        (0o7777, "does not have required permissions"),
    ];

    move |value: &T| {
        let path = value.as_ref();
        let Ok(metadata) = std::fs::metadata(path) else {
            return Some(format!(
                "Failed to get permissions for file or directory: '{}'",
                path.display()
            ));
        };
        let mode = metadata.permissions().mode();

        CHECKS
            .iter()
            .find(|(mask, _)| {
                let needed = mask & required;
                mode & needed != needed
            })
            .map(|(_, message)| format!("File or directory '{}' {message}", path.display()))
    }
}

/// Lifts a validator over `T` to a nullable `Option<T>`; `None` is accepted.
pub fn if_present<T, F>(
    validator: F,
) -> impl Fn(&Option<T>) -> Option<String> + Send + Sync + 'static
where
    T: 'static,
    F: Fn(&T) -> Option<String> + Send + Sync + 'static,
{
    move |value: &Option<T>| value.as_ref().and_then(&validator)
}

/// Lifts a validator over `T` to every element of a collection.
///
/// # Examples
///
/// ```
/// use argbind::validators::{each, in_range};
///
/// let levels = each(in_range(0u8, 3));
/// assert_eq!(levels(&vec![0, 2]), None);
/// assert!(levels(&vec![1, 9]).is_some());
/// ```
pub fn each<T, C, F>(validator: F) -> impl Fn(&C) -> Option<String> + Send + Sync + 'static
where
    T: 'static,
    C: 'static,
    F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
{
    move |values: &C| values.into_iter().find_map(&validator)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_first_rejection_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let chain = Validators::new()
            .with(|_: &i32| Some("first".to_string()))
            .with(move |_: &i32| {
                counter.fetch_add(1, Ordering::SeqCst);
                Some("second".to_string())
            });

        assert_eq!(chain.validate(&1), Some("first".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_chain_is_repeatable() {
        let chain = Validators::new().with(in_range(1, 10));
        assert_eq!(chain.validate(&11), chain.validate(&11));
        assert_eq!(chain.validate(&5), None);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(less_than(5)(&5), Some("Value is required to be less than '5'".to_string()));
        assert_eq!(less_than_eq(5)(&5), None);
        assert!(greater_than(5)(&5).is_some());
        assert_eq!(greater_than_eq(5)(&5), None);
        assert_eq!(equal_to(3)(&3), None);
        assert!(equal_to(3)(&4).is_some());
        assert_eq!(
            in_range(1, 3)(&4),
            Some("Value is required to be between '1' and '3'".to_string())
        );
    }

    #[test]
    fn test_size() {
        let check = size::<String>(2, 4);
        assert_eq!(check(&"abc".to_string()), None);
        assert!(check(&"a".to_string()).is_some());
        assert!(size::<Vec<u8>>(1, 1)(&vec![]).is_some());
    }

    #[test]
    fn test_if_present_accepts_none() {
        let check = if_present(less_than(10));
        assert_eq!(check(&None), None);
        assert!(check(&Some(11)).is_some());
    }

    #[test]
    fn test_filesystem_validators() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("input.txt");
        std::fs::write(&file, "data").unwrap();
        let missing = dir.path().join("missing");

        assert_eq!(existing_file::<PathBuf>()(&file), None);
        assert!(existing_file::<PathBuf>()(&dir.path().to_path_buf())
            .unwrap()
            .contains("is not a file"));
        assert!(existing_file::<PathBuf>()(&missing)
            .unwrap()
            .contains("does not exist"));

        assert_eq!(existing_directory::<PathBuf>()(&dir.path().to_path_buf()), None);
        assert!(existing_directory::<PathBuf>()(&file).is_some());

        assert_eq!(existing_path::<PathBuf>()(&file), None);
        assert!(existing_path::<PathBuf>()(&missing).is_some());

        assert_eq!(nonexistent_path::<PathBuf>()(&missing), None);
        assert!(nonexistent_path::<PathBuf>()(&file)
            .unwrap()
            .starts_with("File"));
        assert!(nonexistent_path::<String>()(&dir.path().display().to_string())
            .unwrap()
            .starts_with("Directory"));
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions() {
        use std::fs::{Permissions, set_permissions};

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("script.sh");
        std::fs::write(&file, "exit 0").unwrap();
        set_permissions(&file, Permissions::from_mode(0o640)).unwrap();

        assert_eq!(permissions::<PathBuf>(0o600)(&file), None);
        assert_eq!(permissions::<PathBuf>(0o640)(&file), None);
        assert_eq!(
            permissions::<PathBuf>(0o700)(&file),
            Some(format!("File or directory '{}' is not executable", file.display()))
        );
        assert!(permissions::<PathBuf>(0o644)(&file)
            .unwrap()
            .ends_with("is not readable"));
        assert!(permissions::<PathBuf>(0o1600)(&file)
            .unwrap()
            .ends_with("does not have required permissions"));

        let missing = dir.path().join("missing");
        assert!(permissions::<PathBuf>(0o400)(&missing)
            .unwrap()
            .starts_with("Failed to get permissions"));
    }
}
