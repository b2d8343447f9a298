//! SQL fragments.
//!
//! A [`Fragment`] is an immutable tree node: literal segments interleaved with
//! slots. Rendering walks the tree and produces one statement text plus the
//! parameter list, numbering placeholders globally so nested fragments never
//! need to know where they end up.
//!
//! # Example
//!
//! ```ignore
//! use sql_template::{sql, join};
//!
//! let columns = vec![sql!("name varchar"), sql!("age int2")];
//! let q = sql!("SELECT * FROM {} WHERE id = ANY({}) AND age <= {}",
//!     sql!("people"), vec![1, 2, 3], 80);
//!
//! assert_eq!(q.text()?, "SELECT * FROM people WHERE id = ANY($1) AND age <= $2");
//! ```

mod collect;
mod flatten;
mod resolve;


pub use flatten::Dialect;

use crate::arg::Arg;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// An immutable piece of SQL with slots for values and nested fragments.
///
/// Cloning is cheap and keeps identity: clones share content and render
/// caches, and compare equal under [`Fragment::ptr_eq`].
#[derive(Clone)]
#[must_use]
pub struct Fragment(Arc<Inner>);

struct Inner {
    segments: Arc<[String]>,
    slots: Arc<[Arg]>,
    delimiter: String,
    name: Option<String>,
    text: OnceLock<String>,
    sql: OnceLock<String>,
    values: OnceLock<Vec<Value>>,
}

impl Fragment {
    /// Create a fragment from literal segments and slot args.
    ///
    /// Segment `i` is emitted before slot `i`; normally there is one more
    /// segment than there are slots.
    pub fn new<I, S, J, A>(segments: I, slots: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        Self::from_parts(
            segments.into_iter().map(Into::into).collect(),
            slots.into_iter().map(Into::into).collect(),
            String::new(),
            None,
        )
    }

    /// A fragment with no text and no values.
    pub fn empty() -> Self {
        Self::from_parts(Arc::from([]), Arc::from([]), String::new(), None)
    }

    /// Create a fragment from dynamically-typed args, checking their kinds.
    ///
    /// `segments` must be a list (or array, or template) of text, `slots` a
    /// list or array, and `delimiter` text; anything else is
    /// [`SqlError::InvalidArgument`].
    pub fn try_new(
        segments: impl Into<Arg>,
        slots: impl Into<Arg>,
        delimiter: impl Into<Arg>,
    ) -> SqlResult<Self> {
        let segments = segments_from_arg(segments.into())?;
        let slots = slots_from_arg(slots.into())?;
        let delimiter = text_arg(delimiter.into(), "Fragment delimiter")?;
        Ok(Self::from_parts(segments, slots, delimiter, None))
    }

    pub(crate) fn from_parts(
        segments: Arc<[String]>,
        slots: Arc<[Arg]>,
        delimiter: String,
        name: Option<String>,
    ) -> Self {
        Self(Arc::new(Inner {
            segments,
            slots,
            delimiter,
            name,
            text: OnceLock::new(),
            sql: OnceLock::new(),
            values: OnceLock::new(),
        }))
    }

    /// Statement text with `$1, $2, ...` placeholders (PostgreSQL).
    ///
    /// Computed on first access and cached on this instance; deferred values
    /// are not invoked again by later calls.
    pub fn text(&self) -> SqlResult<&str> {
        cached(&self.0.text, || flatten::render(self, Dialect::Numbered)).map(String::as_str)
    }

    /// Statement text with `?` placeholders (MySQL, SQLite).
    pub fn sql(&self) -> SqlResult<&str> {
        cached(&self.0.sql, || flatten::render(self, Dialect::Unnumbered)).map(String::as_str)
    }

    /// Bound values, aligned 1:1 with the placeholders.
    pub fn values(&self) -> SqlResult<&[Value]> {
        cached(&self.0.values, || collect::collect_values(self)).map(Vec::as_slice)
    }

    /// Statement text in the given placeholder dialect.
    pub fn render(&self, dialect: Dialect) -> SqlResult<&str> {
        match dialect {
            Dialect::Numbered => self.text(),
            Dialect::Unnumbered => self.sql(),
        }
    }

    /// Statement name (e.g. for prepared statements), if set.
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Text inserted between adjacent fragments and adjacent slots.
    pub fn delimiter(&self) -> &str {
        &self.0.delimiter
    }

    pub fn segments(&self) -> &[String] {
        &self.0.segments
    }

    pub fn slots(&self) -> &[Arg] {
        &self.0.slots
    }

    /// Return a fragment joined by `delimiter`.
    ///
    /// Returns `self` (same identity) when the delimiter is unchanged;
    /// otherwise a new fragment sharing this one's segments and slots.
    pub fn join_by(&self, delimiter: impl Into<Arg>) -> SqlResult<Self> {
        let delimiter = text_arg(delimiter.into(), "Fragment delimiter")?;
        if delimiter == self.0.delimiter {
            return Ok(self.clone());
        }
        Ok(Self::from_parts(
            Arc::clone(&self.0.segments),
            Arc::clone(&self.0.slots),
            delimiter,
            self.0.name.clone(),
        ))
    }

    /// Return a fragment named `name`, with the same sharing rules as
    /// [`Fragment::join_by`].
    pub fn set_name(&self, name: impl Into<Arg>) -> SqlResult<Self> {
        let name = text_arg(name.into(), "Fragment name")?;
        if self.name() == Some(name.as_str()) {
            return Ok(self.clone());
        }
        Ok(Self::from_parts(
            Arc::clone(&self.0.segments),
            Arc::clone(&self.0.slots),
            self.0.delimiter.clone(),
            Some(name),
        ))
    }

    /// Whether `a` and `b` are the same fragment instance.
    pub fn ptr_eq(a: &Fragment, b: &Fragment) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

/// Return the cached value, computing it if this is the first access.
///
/// A failed computation stores nothing, so the next access tries again.
fn cached<T>(cell: &OnceLock<T>, compute: impl FnOnce() -> SqlResult<T>) -> SqlResult<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = compute()?;
    Ok(cell.get_or_init(|| value))
}

fn text_arg(arg: Arg, what: &'static str) -> SqlResult<String> {
    match arg {
        Arg::Value(Value::Text(s)) => Ok(s),
        other => Err(SqlError::invalid_argument(
            what,
            "a string",
            other.describe(),
            other.kind(),
        )),
    }
}

fn segments_from_arg(arg: Arg) -> SqlResult<Arc<[String]>> {
    const WHAT: &str = "Fragment segments";
    let invalid = |arg: &Arg| {
        SqlError::invalid_argument(WHAT, "a list of strings", arg.describe(), arg.kind())
    };

    match &arg {
        Arg::Template(t) => Ok(t.shared_segments()),
        Arg::List(items) => items
            .iter()
            .map(|item| match item {
                Arg::Value(Value::Text(s)) => Ok(s.clone()),
                _ => Err(invalid(&arg)),
            })
            .collect(),
        Arg::Value(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Text(s) => Ok(s.clone()),
                _ => Err(invalid(&arg)),
            })
            .collect(),
        _ => Err(invalid(&arg)),
    }
}

fn slots_from_arg(arg: Arg) -> SqlResult<Arc<[Arg]>> {
    match arg {
        Arg::List(items) => Ok(items.into()),
        Arg::Value(Value::Array(items)) => Ok(items.into_iter().map(Arg::Value).collect()),
        other => Err(SqlError::invalid_argument(
            "Fragment slots",
            "a list",
            other.describe(),
            other.kind(),
        )),
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("segments", &self.0.segments)
            .field("slots", &self.0.slots)
            .field("delimiter", &self.0.delimiter)
            .field("name", &self.0.name)
            .finish()
    }
}

/// Renders [`Fragment::text`]. A failing deferred value surfaces as
/// `fmt::Error`; call `text()` directly to see the error.
impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.text().map_err(|_| fmt::Error)?;
        f.write_str(text)
    }
}
