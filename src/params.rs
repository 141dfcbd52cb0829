use rusqlite::ToSql;
use rusqlite::types::Value;

use crate::error::SlowLogError;
use crate::types::RowValues;

/// Convert a single [`RowValues`] into a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Owned parameter container ready for binding.
pub struct Params(pub(crate) Vec<Value>);

impl Params {
    /// Convert caller-supplied row values into `SQLite` values.
    ///
    /// # Errors
    /// Returns `SlowLogError::Parameter` if a value cannot be converted.
    pub fn convert(params: &[RowValues]) -> Result<Self, SlowLogError> {
        let mut values = Vec::with_capacity(params.len());
        for p in params {
            values.push(row_value_to_sqlite_value(p));
        }
        Ok(Params(values))
    }

    /// Borrow the underlying values.
    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }

    /// Build a borrowed params slice suitable for rusqlite execution.
    #[must_use]
    pub fn as_refs(&self) -> Vec<&dyn ToSql> {
        self.0.iter().map(|v| v as &dyn ToSql).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_conversions() {
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Int(42)),
            Value::Integer(42)
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Bool(true)),
            Value::Integer(1)
        );
        assert_eq!(row_value_to_sqlite_value(&RowValues::Null), Value::Null);
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Text("a".into())),
            Value::Text("a".into())
        );
    }

    #[test]
    fn json_serializes_to_text() {
        let v = RowValues::JSON(serde_json::json!({"k": 1}));
        match row_value_to_sqlite_value(&v) {
            Value::Text(s) => assert_eq!(s, "{\"k\":1}"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn convert_preserves_order_and_length() {
        let params = [
            RowValues::Int(1),
            RowValues::Text("x".into()),
            RowValues::Null,
        ];
        let converted = Params::convert(&params).unwrap();
        assert_eq!(converted.as_values().len(), 3);
        assert_eq!(converted.as_values()[2], Value::Null);
    }
}
