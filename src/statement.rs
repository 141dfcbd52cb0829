use std::sync::Arc;

use rusqlite::Statement;

use crate::error::SlowLogError;
use crate::options::InstrumentOptions;
use crate::params::Params;
use crate::query::{build_result_set, first_row};
use crate::types::{ResultSet, Row, RowValues};

/// Instrumented wrapper around a prepared [`rusqlite::Statement`].
///
/// Remembers the SQL text it was prepared with; every later record
/// carries that original text, whatever else happens in between.
#[derive(Debug)]
pub struct PreparedStatement<'conn> {
    stmt: Statement<'conn>,
    sql: Arc<str>,
    opts: InstrumentOptions,
}

impl<'conn> PreparedStatement<'conn> {
    pub(crate) fn new(stmt: Statement<'conn>, sql: &str, opts: InstrumentOptions) -> Self {
        Self {
            stmt,
            sql: Arc::from(sql),
            opts,
        }
    }

    /// The SQL text this statement was prepared with.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Execute the statement as DML, returning rows affected.
    ///
    /// # Errors
    /// Returns the driver error verbatim.
    pub fn exec(&mut self, params: &[RowValues]) -> Result<usize, SlowLogError> {
        let converted = Params::convert(params)?;
        let _timer = self.opts.time_statement("stmt exec", &self.sql, params);
        let refs = converted.as_refs();
        Ok(self.stmt.execute(&refs[..])?)
    }

    /// Execute the statement as a query and materialize all rows.
    ///
    /// # Errors
    /// Returns the driver error verbatim.
    pub fn query(&mut self, params: &[RowValues]) -> Result<ResultSet, SlowLogError> {
        let converted = Params::convert(params)?;
        let _timer = self.opts.time_statement("stmt query", &self.sql, params);
        build_result_set(&mut self.stmt, &converted)
    }

    /// Execute the statement as a query expected to return one row.
    ///
    /// # Errors
    /// Returns the driver error verbatim; an empty result surfaces as
    /// `rusqlite::Error::QueryReturnedNoRows`.
    pub fn query_row(&mut self, params: &[RowValues]) -> Result<Row, SlowLogError> {
        let converted = Params::convert(params)?;
        let _timer = self.opts.time_statement("stmt query row", &self.sql, params);
        first_row(&mut self.stmt, &converted)
    }

    /// Finalize the statement. Pure delegation, no record.
    ///
    /// # Errors
    /// Surfaces the driver's finalize error.
    pub fn finalize(self) -> Result<(), SlowLogError> {
        Ok(self.stmt.finalize()?)
    }
}
