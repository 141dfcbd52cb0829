use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SlowLogError;
use crate::params::Params;
use crate::types::{ResultSet, Row, RowValues};

/// Extract a [`RowValues`] from a driver row.
fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, SlowLogError> {
    let value: Value = row.get(idx).map_err(SlowLogError::Sqlite)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

fn column_names(stmt: &Statement) -> Arc<Vec<String>> {
    Arc::new(
        stmt.column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect(),
    )
}

/// Run a statement and materialize every returned row.
///
/// # Errors
/// Returns the driver error verbatim if execution or value extraction fails.
pub(crate) fn build_result_set(
    stmt: &mut Statement,
    params: &Params,
) -> Result<ResultSet, SlowLogError> {
    let names = column_names(stmt);
    let col_count = names.len();

    let refs = params.as_refs();
    let mut rows_iter = stmt.query(&refs[..])?;

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(names);

    while let Some(row) = rows_iter.next()? {
        let mut values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}

/// Run a statement and materialize the first returned row.
///
/// # Errors
/// Returns `rusqlite::Error::QueryReturnedNoRows` (through the transparent
/// variant) when the result is empty, matching the driver's `query_row`.
pub(crate) fn first_row(stmt: &mut Statement, params: &Params) -> Result<Row, SlowLogError> {
    let names = column_names(stmt);
    let col_count = names.len();

    let refs = params.as_refs();
    let mut rows_iter = stmt.query(&refs[..])?;

    match rows_iter.next()? {
        Some(row) => {
            let mut values = Vec::with_capacity(col_count);
            for i in 0..col_count {
                values.push(extract_value(row, i)?);
            }
            Ok(Row::new(names, values))
        }
        None => Err(rusqlite::Error::QueryReturnedNoRows.into()),
    }
}
