//! Statement text generation.
//!
//! One counter is threaded through the whole tree, so the Nth placeholder
//! emitted in pre-order, left-to-right, is `$N`. The collector visits slots
//! in the same order and produces the Nth value at the same point.

use super::Fragment;
use super::resolve::{Member, Slot, resolve_slot};
use crate::error::SqlResult;

/// Placeholder syntax used when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `$1, $2, ...` (PostgreSQL)
    Numbered,
    /// `?` for every parameter (MySQL, SQLite)
    Unnumbered,
}

impl Dialect {
    /// The placeholder for the 1-based parameter `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Numbered => format!("${index}"),
            Dialect::Unnumbered => "?".to_string(),
        }
    }

    fn push_placeholder(self, out: &mut String, index: usize) {
        match self {
            Dialect::Numbered => {
                out.push('$');
                out.push_str(&index.to_string());
            }
            Dialect::Unnumbered => out.push('?'),
        }
    }
}

/// Render `fragment` as one statement, with literal newlines removed.
pub(crate) fn render(fragment: &Fragment, dialect: Dialect) -> SqlResult<String> {
    let mut out = String::new();
    let mut counter = 0;
    flatten(fragment, dialect, &mut counter, &mut out)?;
    out.retain(|c| c != '\n');

    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "sql_template.render",
        fragment = fragment.name().unwrap_or("-"),
        ?dialect,
        placeholders = counter,
        "rendered statement"
    );

    Ok(out)
}

fn flatten(
    fragment: &Fragment,
    dialect: Dialect,
    counter: &mut usize,
    out: &mut String,
) -> SqlResult<()> {
    let segments = fragment.segments();
    let slots = fragment.slots();
    let delimiter = fragment.delimiter();
    // Whether the previous slot produced output with no literal text since.
    let mut adjacent = false;

    for i in 0..segments.len().max(slots.len()) {
        if let Some(segment) = segments.get(i).filter(|s| !s.is_empty()) {
            out.push_str(segment);
            adjacent = false;
        }

        let Some(arg) = slots.get(i) else {
            continue;
        };
        let slot = resolve_slot(arg, fragment)?;
        if matches!(slot, Slot::Absent) {
            continue;
        }
        if adjacent {
            out.push_str(delimiter);
        }

        match slot {
            Slot::Fragment(nested) => flatten(&nested, dialect, counter, out)?,
            Slot::Scalar(_) => emit(dialect, counter, out),
            Slot::Group(members) => flatten_group(&members, delimiter, dialect, counter, out)?,
            Slot::Absent => {}
        }
        adjacent = true;
    }
    Ok(())
}

/// Walk a list that holds fragments.
///
/// Adjacent fragments are separated by `delimiter`; a run of scalars shares
/// one placeholder, matching the single grouped value the collector binds.
/// One placeholder per scalar would leave more placeholders than values.
fn flatten_group(
    members: &[Member],
    delimiter: &str,
    dialect: Dialect,
    counter: &mut usize,
    out: &mut String,
) -> SqlResult<()> {
    let mut prev: Option<&Member> = None;

    for member in members {
        match member {
            Member::Fragment(nested) => {
                if matches!(prev, Some(Member::Fragment(_))) {
                    out.push_str(delimiter);
                }
                flatten(nested, dialect, counter, out)?;
            }
            Member::Scalar(_) => {
                if !matches!(prev, Some(Member::Scalar(_))) {
                    emit(dialect, counter, out);
                }
            }
        }
        prev = Some(member);
    }
    Ok(())
}

fn emit(dialect: Dialect, counter: &mut usize, out: &mut String) {
    *counter += 1;
    dialect.push_placeholder(out, *counter);
}
