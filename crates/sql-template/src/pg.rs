//! `tokio-postgres` parameter encoding for [`Value`].
//!
//! Integers and floats are narrowed to the parameter type the server asked
//! for (`int2`/`int4`/`float4`), and integers bound to text parameters are
//! sent as their decimal form. An integer bound to a float parameter must be
//! exactly representable there; `Float` to `float4` rounds like any `f64` to
//! `f32` cast. Timestamps bind to both `timestamptz` and `timestamp` (as UTC).
//! Arrays (including grouped list values) must be bound to array-typed
//! parameters, e.g. `id = ANY($1)`.
//!
//! Every variant defers to its inner type's checked encoder, so a mismatched
//! binding fails with `WrongType` instead of sending bytes the server would
//! misread.

use crate::value::Value;
use bytes::BytesMut;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// Largest integer magnitudes `f32` / `f64` represent exactly.
const F32_EXACT: u64 = 1 << 24;
const F64_EXACT: u64 = 1 << 53;

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                Type::FLOAT4 => {
                    exact_in_float(*v, F32_EXACT, ty)?;
                    (*v as f32).to_sql_checked(ty, out)
                }
                Type::FLOAT8 => {
                    exact_in_float(*v, F64_EXACT, ty)?;
                    (*v as f64).to_sql_checked(ty, out)
                }
                Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
                    v.to_string().to_sql_checked(ty, out)
                }
                _ => v.to_sql_checked(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => match *ty {
                Type::TIMESTAMP => v.naive_utc().to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Array(items) => items.to_sql_checked(ty, out),
        }
    }

    /// `NULL` binds to any parameter, so the type check happens per variant
    /// in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn exact_in_float(v: i64, limit: u64, ty: &Type) -> Result<(), Box<dyn Error + Sync + Send>> {
    if v.unsigned_abs() > limit {
        return Err(format!("integer {v} is not exactly representable as {ty}").into());
    }
    Ok(())
}
