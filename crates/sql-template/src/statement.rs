//! Rendered statements.

use crate::error::SqlResult;
use crate::fragment::Fragment;
use crate::value::Value;
use serde::Serialize;

/// Everything a driver needs to run a fragment, rendered once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub name: Option<String>,
    /// `$n` placeholders
    pub text: String,
    /// `?` placeholders
    pub sql: String,
    pub values: Vec<Value>,
}

impl Statement {
    pub fn param_count(&self) -> usize {
        self.values.len()
    }

    /// Parameter refs compatible with `tokio-postgres`.
    #[cfg(feature = "postgres")]
    pub fn params_ref(&self) -> Vec<&(dyn tokio_postgres::types::ToSql + Sync)> {
        self.values
            .iter()
            .map(|v| v as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect()
    }
}

impl Fragment {
    /// Render text, sql and values (each from its cache when present).
    pub fn to_statement(&self) -> SqlResult<Statement> {
        Ok(Statement {
            name: self.name().map(str::to_string),
            text: self.text()?.to_string(),
            sql: self.sql()?.to_string(),
            values: self.values()?.to_vec(),
        })
    }
}
