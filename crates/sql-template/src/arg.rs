//! Slot inputs.
//!
//! An [`Arg`] fills a slot of a [`Fragment`]: a scalar [`Value`], another
//! fragment, a list of args, a deferred value computed at render time, or a
//! template (the literal segments of a tag-mode call).

use crate::error::BoxError;
use crate::fragment::Fragment;
use crate::template::Template;
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

type LazyFn = dyn Fn(&Fragment) -> Result<Arg, BoxError> + Send + Sync;

/// A value computed when the enclosing fragment is rendered.
///
/// The callback receives the fragment whose slot holds it, so a single
/// callback shared by several statements can tell them apart (see
/// [`Fragment::ptr_eq`]).
#[derive(Clone)]
pub struct Lazy(Arc<LazyFn>);

impl Lazy {
    /// Invoke the callback for `owner`.
    pub fn call(&self, owner: &Fragment) -> Result<Arg, BoxError> {
        (self.0)(owner)
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Lazy").field(&"<fn>").finish()
    }
}

/// The contents of one slot.
#[derive(Debug, Clone)]
pub enum Arg {
    /// A scalar, bound to one placeholder.
    Value(Value),
    /// A nested fragment, inlined in place.
    Fragment(Fragment),
    /// A sequence of args.
    List(Vec<Arg>),
    /// A deferred arg.
    Lazy(Lazy),
    /// Literal segments of a tag-mode call. Outside the head position of
    /// [`build`](crate::build) this is just a list of its text segments.
    Template(Template),
    /// Nothing: no placeholder and no value.
    Absent,
}

/// The kind of an [`Arg`] or [`Value`], as reported in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    Json,
    Uuid,
    Timestamp,
    Array,
    Fragment,
    List,
    Lazy,
    Template,
    Absent,
}

impl ArgKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArgKind::Null => "null",
            ArgKind::Bool => "bool",
            ArgKind::Int => "int",
            ArgKind::Float => "float",
            ArgKind::Text => "text",
            ArgKind::Json => "json",
            ArgKind::Uuid => "uuid",
            ArgKind::Timestamp => "timestamp",
            ArgKind::Array => "array",
            ArgKind::Fragment => "fragment",
            ArgKind::List => "list",
            ArgKind::Lazy => "function",
            ArgKind::Template => "template",
            ArgKind::Absent => "undefined",
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Arg {
    /// A deferred arg computed from the owning fragment.
    ///
    /// ```ignore
    /// let q = sql!("SELECT * FROM people WHERE name = {}", Arg::lazy(|_| "hey"));
    /// ```
    pub fn lazy<F, R>(f: F) -> Self
    where
        F: Fn(&Fragment) -> R + Send + Sync + 'static,
        R: Into<Arg>,
    {
        Arg::Lazy(Lazy(Arc::new(move |owner| Ok(f(owner).into()))))
    }

    /// A deferred arg whose callback can fail.
    ///
    /// The error is returned unchanged (as [`SqlError::Resolve`](crate::SqlError::Resolve))
    /// from whichever getter triggered the render.
    pub fn try_lazy<F, R, E>(f: F) -> Self
    where
        F: Fn(&Fragment) -> Result<R, E> + Send + Sync + 'static,
        R: Into<Arg>,
        E: Into<BoxError>,
    {
        Arg::Lazy(Lazy(Arc::new(move |owner| {
            f(owner).map(Into::into).map_err(Into::into)
        })))
    }

    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Value(v) => v.kind(),
            Arg::Fragment(_) => ArgKind::Fragment,
            Arg::List(_) => ArgKind::List,
            Arg::Lazy(_) => ArgKind::Lazy,
            Arg::Template(_) => ArgKind::Template,
            Arg::Absent => ArgKind::Absent,
        }
    }

    /// Short human-readable form used in error messages. Never renders
    /// fragments or invokes callbacks.
    pub(crate) fn describe(&self) -> String {
        match self {
            Arg::Value(v) => v.to_string(),
            Arg::Fragment(f) => match f.name() {
                Some(name) => format!("[fragment {name}]"),
                None => "[fragment]".to_string(),
            },
            Arg::List(items) => {
                let parts: Vec<String> = items.iter().map(Arg::describe).collect();
                parts.join(",")
            }
            Arg::Lazy(_) => "[function]".to_string(),
            Arg::Template(t) => t.segments().join(","),
            Arg::Absent => "undefined".to_string(),
        }
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<Fragment> for Arg {
    fn from(f: Fragment) -> Self {
        Arg::Fragment(f)
    }
}

impl From<&Fragment> for Arg {
    fn from(f: &Fragment) -> Self {
        Arg::Fragment(f.clone())
    }
}

impl From<Template> for Arg {
    fn from(t: Template) -> Self {
        Arg::Template(t)
    }
}

impl From<Lazy> for Arg {
    fn from(l: Lazy) -> Self {
        Arg::Lazy(l)
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    &str,
    String,
    &String,
    serde_json::Value,
    uuid::Uuid,
    DateTime<Utc>
);

/// `None` binds SQL NULL; use [`Arg::Absent`] to leave a slot empty.
impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Value(Value::Null), Into::into)
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(v: Vec<T>) -> Self {
        Arg::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Arg>, const N: usize> From<[T; N]> for Arg {
    fn from(v: [T; N]) -> Self {
        Arg::List(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_use_caller_facing_names() {
        assert_eq!(Arg::lazy(|_| 1).kind().to_string(), "function");
        assert_eq!(Arg::Absent.kind().to_string(), "undefined");
        assert_eq!(Arg::from(1.5).kind(), ArgKind::Float);
        assert_eq!(Arg::from(vec![1, 2]).kind(), ArgKind::List);
    }

    #[test]
    fn none_is_null_not_absent() {
        assert!(matches!(Arg::from(None::<i64>), Arg::Value(Value::Null)));
        assert!(matches!(Arg::from(Some("x")), Arg::Value(Value::Text(ref s)) if s == "x"));
    }

    #[test]
    fn describe_never_renders_fragments() {
        let arg = Arg::from(vec![
            Arg::from(1),
            Arg::from(crate::raw("secret")),
            Arg::lazy(|_| 2),
        ]);
        assert_eq!(arg.describe(), "1,[fragment],[function]");
    }

    #[test]
    fn try_lazy_passes_errors_through() {
        let owner = Fragment::empty();
        let lazy = match Arg::try_lazy(|_| Err::<i64, _>("boom")) {
            Arg::Lazy(lazy) => lazy,
            other => panic!("expected a lazy arg, got {other:?}"),
        };
        let err = lazy.call(&owner).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
