//! Slot resolution.
//!
//! Every render pass resolves each slot exactly once: deferred args are
//! invoked with the owning fragment, and the result is classified as a
//! [`Slot`] that the flattener and the collector both match on. Sharing the
//! classification is what keeps placeholders and values aligned.

use super::Fragment;
use crate::arg::Arg;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;

/// An arg with every deferred value invoked.
#[derive(Debug)]
pub(crate) enum Resolved {
    Fragment(Fragment),
    Scalar(Value),
    List(Vec<Resolved>),
    Absent,
}

/// A resolved slot.
#[derive(Debug)]
pub(crate) enum Slot {
    Fragment(Fragment),
    /// One placeholder, one value. Fragment-free lists land here as arrays.
    Scalar(Value),
    /// A list holding at least one fragment, walked member by member.
    Group(Vec<Member>),
    Absent,
}

/// One member of a [`Slot::Group`].
#[derive(Debug)]
pub(crate) enum Member {
    Fragment(Fragment),
    Scalar(Value),
}

/// Resolve `arg` in the context of `owner`.
///
/// A deferred arg is called with `owner` and its result resolved again, so a
/// callback may return another callback.
pub(crate) fn resolve(arg: &Arg, owner: &Fragment) -> SqlResult<Resolved> {
    match arg {
        Arg::Value(v) => Ok(Resolved::Scalar(v.clone())),
        Arg::Fragment(f) => Ok(Resolved::Fragment(f.clone())),
        Arg::List(items) => items
            .iter()
            .map(|item| resolve(item, owner))
            .collect::<SqlResult<Vec<_>>>()
            .map(Resolved::List),
        Arg::Template(t) => Ok(Resolved::List(
            t.segments()
                .iter()
                .map(|s| Resolved::Scalar(Value::Text(s.clone())))
                .collect(),
        )),
        Arg::Lazy(lazy) => {
            let produced = lazy.call(owner).map_err(|err| {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    target: "sql_template.render",
                    fragment = owner.name().unwrap_or("-"),
                    error = %err,
                    "deferred value failed"
                );
                SqlError::Resolve(err)
            })?;
            resolve(&produced, owner)
        }
        Arg::Absent => Ok(Resolved::Absent),
    }
}

/// Resolve and classify one slot of `owner`.
pub(crate) fn resolve_slot(arg: &Arg, owner: &Fragment) -> SqlResult<Slot> {
    Ok(match resolve(arg, owner)? {
        Resolved::Fragment(f) => Slot::Fragment(f),
        Resolved::Scalar(v) => Slot::Scalar(v),
        Resolved::Absent => Slot::Absent,
        Resolved::List(items) => {
            if items.iter().any(Resolved::contains_fragment) {
                let mut members = Vec::with_capacity(items.len());
                push_members(items, &mut members);
                Slot::Group(members)
            } else {
                Slot::Scalar(Value::Array(scalar_items(items)))
            }
        }
    })
}

/// Flatten list items into group members.
///
/// Nested lists that hold fragments are walked inline; fragment-free nested
/// lists are single array members; absent items are dropped.
fn push_members(items: Vec<Resolved>, out: &mut Vec<Member>) {
    for item in items {
        match item {
            Resolved::Fragment(f) => out.push(Member::Fragment(f)),
            Resolved::Scalar(v) => out.push(Member::Scalar(v)),
            Resolved::Absent => {}
            Resolved::List(nested) => {
                if nested.iter().any(Resolved::contains_fragment) {
                    push_members(nested, out);
                } else {
                    out.push(Member::Scalar(Value::Array(scalar_items(nested))));
                }
            }
        }
    }
}

/// Values of a fragment-free list, nested lists becoming nested arrays.
fn scalar_items(items: Vec<Resolved>) -> Vec<Value> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Resolved::Scalar(v) => Some(v),
            Resolved::List(nested) => Some(Value::Array(scalar_items(nested))),
            Resolved::Absent | Resolved::Fragment(_) => None,
        })
        .collect()
}

impl Resolved {
    fn contains_fragment(&self) -> bool {
        match self {
            Resolved::Fragment(_) => true,
            Resolved::List(items) => items.iter().any(Resolved::contains_fragment),
            Resolved::Scalar(_) | Resolved::Absent => false,
        }
    }
}
