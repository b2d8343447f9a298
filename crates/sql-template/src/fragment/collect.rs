//! Bound value collection.

use super::Fragment;
use super::resolve::{Member, Slot, resolve_slot};
use crate::error::SqlResult;
use crate::value::Value;

/// Collect the values of `fragment` in placeholder order.
pub(crate) fn collect_values(fragment: &Fragment) -> SqlResult<Vec<Value>> {
    let mut out = Vec::new();
    collect(fragment, &mut out)?;

    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "sql_template.render",
        fragment = fragment.name().unwrap_or("-"),
        values = out.len(),
        "collected values"
    );

    Ok(out)
}

fn collect(fragment: &Fragment, out: &mut Vec<Value>) -> SqlResult<()> {
    for arg in fragment.slots().iter() {
        match resolve_slot(arg, fragment)? {
            Slot::Fragment(nested) => collect(&nested, out)?,
            Slot::Scalar(value) => out.push(value),
            Slot::Group(members) => collect_group(members, out)?,
            Slot::Absent => {}
        }
    }
    Ok(())
}

/// Fragments splice their own values in; each run of consecutive scalars
/// becomes one grouped array value.
fn collect_group(members: Vec<Member>, out: &mut Vec<Value>) -> SqlResult<()> {
    let mut run: Option<Vec<Value>> = None;

    for member in members {
        match member {
            Member::Scalar(value) => run.get_or_insert_with(Vec::new).push(value),
            Member::Fragment(nested) => {
                if let Some(group) = run.take() {
                    out.push(Value::Array(group));
                }
                collect(&nested, out)?;
            }
        }
    }
    if let Some(group) = run {
        out.push(Value::Array(group));
    }
    Ok(())
}
