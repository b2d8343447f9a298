//! # sql-template
//!
//! Compose parameterized SQL from small, immutable fragments.
//!
//! ## Features
//!
//! - **Injection-safe**: values never touch the SQL text; they become `$n` / `?` placeholders
//! - **Composable**: fragments nest inside fragments, lists of fragments are joined
//! - **Global numbering**: placeholders are numbered across the whole tree, so nested
//!   fragments are written without knowing where they will end up
//! - **Deferred values**: [`Arg::lazy`] callbacks run at render time and see the fragment
//!   being rendered
//! - **Array binding**: a list of scalars binds as one array parameter (`id = ANY($1)`)
//! - **Driver-agnostic output**: `text()` for PostgreSQL, `sql()` for `?` dialects, and
//!   `ToSql` for every [`Value`] when the `postgres` feature is on
//!
//! ## Example
//!
//! ```ignore
//! use sql_template::{join, sql};
//!
//! let rows = [("Peter", 25), ("Wendy", 24)];
//! let tuples: Vec<_> = rows
//!     .iter()
//!     .map(|(name, age)| sql!("({})", join!(*name, *age)))
//!     .collect();
//!
//! // Adjacent fragments in a list are separated by the enclosing delimiter.
//! let q = sql!("INSERT INTO people VALUES {}", tuples).join_by(",")?;
//!
//! assert_eq!(q.text()?, "INSERT INTO people VALUES ($1,$2),($3,$4)");
//! assert_eq!(q.sql()?, "INSERT INTO people VALUES (?,?),(?,?)");
//! assert_eq!(q.values()?.len(), 4);
//! ```

pub mod arg;
pub mod builder;
pub mod error;
pub mod fragment;
pub mod statement;
pub mod template;
pub mod value;

#[cfg(feature = "postgres")]
mod pg;

pub use arg::{Arg, ArgKind, Lazy};
pub use builder::{DEFAULT_JOIN_DELIMITER, build, raw};
pub use error::{BoxError, SqlError, SqlResult};
pub use fragment::{Dialect, Fragment};
pub use statement::Statement;
pub use template::Template;
pub use value::Value;
