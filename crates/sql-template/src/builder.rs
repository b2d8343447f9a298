//! Entry points: [`build`], [`raw`], and the `sql!` / `join!` macros.

use crate::arg::Arg;
use crate::fragment::Fragment;
use crate::template::Template;
use std::sync::Arc;

/// Delimiter of fragments created in join mode.
pub const DEFAULT_JOIN_DELIMITER: &str = ",";

/// Build a fragment from call arguments.
///
/// - **Tag mode**: the first arg is a [`Template`]. Its segments become the
///   literal text and the remaining args fill the slots in order.
/// - **Join mode**: anything else. Every arg is a slot, no literal text is
///   added, and the fragment is joined by `","` (change it with
///   [`Fragment::join_by`]).
///
/// The [`sql!`](crate::sql) and [`join!`](crate::join) macros are the usual
/// way to call this.
pub fn build(args: impl IntoIterator<Item = Arg>) -> Fragment {
    let mut args = args.into_iter().peekable();
    if let Some(Arg::Template(template)) = args.next_if(|arg| matches!(arg, Arg::Template(_))) {
        return tagged(template, args.collect());
    }
    joined(args.collect())
}

fn tagged(template: Template, slots: Arc<[Arg]>) -> Fragment {
    Fragment::from_parts(template.shared_segments(), slots, String::new(), None)
}

fn joined(slots: Arc<[Arg]>) -> Fragment {
    let segments = vec![String::new(); slots.len() + 1];
    Fragment::from_parts(
        segments.into(),
        slots,
        DEFAULT_JOIN_DELIMITER.to_string(),
        None,
    )
}

/// Insert `text` verbatim, with no placeholder and no value.
///
/// The text is **not** escaped. Never pass user input here; use it for
/// trusted identifiers and keywords only.
pub fn raw(text: impl Into<String>) -> Fragment {
    Fragment::from_parts(Arc::from([text.into()]), Arc::from([]), String::new(), None)
}

/// Build a fragment in tag mode.
///
/// Every `{}` in the template is a slot filled by the next argument; `{{`
/// and `}}` are literal braces. Arguments may be anything convertible into
/// [`Arg`]: scalars, fragments, vectors, [`Arg::lazy`] callbacks.
///
/// ```ignore
/// let q = sql!("SELECT * FROM cars WHERE name = {}", 123);
/// assert_eq!(q.text()?, "SELECT * FROM cars WHERE name = $1");
/// ```
#[macro_export]
macro_rules! sql {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::build([
            $crate::Arg::from($crate::Template::parse($template))
            $(, $crate::Arg::from($arg))*
        ])
    };
}

/// Build a fragment in join mode: the items joined by `","`.
///
/// ```ignore
/// let row = join!("Peter", 25);
/// assert_eq!(sql!("({})", row).text()?, "($1,$2)");
/// ```
#[macro_export]
macro_rules! join {
    ($($arg:expr),* $(,)?) => {
        $crate::build(::std::vec![$($crate::Arg::from($arg)),*])
    };
}
