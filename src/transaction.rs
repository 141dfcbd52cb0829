use crate::error::SlowLogError;
use crate::options::InstrumentOptions;
use crate::params::Params;
use crate::query::{build_result_set, first_row};
use crate::statement::PreparedStatement;
use crate::types::{ResultSet, Row, RowValues};

/// Instrumented wrapper around an open [`rusqlite::Transaction`].
///
/// Carries the options the creating [`crate::Handle`] had at `begin`
/// time. Dropping without `commit`/`rollback` inherits the driver's
/// rollback-on-drop behavior, unlogged.
pub struct Transaction<'conn> {
    tx: rusqlite::Transaction<'conn>,
    opts: InstrumentOptions,
}

impl<'conn> Transaction<'conn> {
    pub(crate) fn new(tx: rusqlite::Transaction<'conn>, opts: InstrumentOptions) -> Self {
        Self { tx, opts }
    }

    #[must_use]
    pub fn options(&self) -> &InstrumentOptions {
        &self.opts
    }

    /// Execute a DML statement inside the transaction.
    ///
    /// # Errors
    /// Returns the driver error verbatim.
    pub fn exec(&self, sql: &str, params: &[RowValues]) -> Result<usize, SlowLogError> {
        let converted = Params::convert(params)?;
        let _timer = self.opts.time_statement("tx exec", sql, params);
        let refs = converted.as_refs();
        Ok(self.tx.execute(sql, &refs[..])?)
    }

    /// Run a query inside the transaction and materialize all rows.
    ///
    /// # Errors
    /// Returns the driver error verbatim.
    pub fn query(&self, sql: &str, params: &[RowValues]) -> Result<ResultSet, SlowLogError> {
        let converted = Params::convert(params)?;
        let _timer = self.opts.time_statement("tx query", sql, params);
        let mut stmt = self.tx.prepare(sql)?;
        build_result_set(&mut stmt, &converted)
    }

    /// Run a query expected to return one row.
    ///
    /// # Errors
    /// Returns the driver error verbatim; an empty result surfaces as
    /// `rusqlite::Error::QueryReturnedNoRows`.
    pub fn query_row(&self, sql: &str, params: &[RowValues]) -> Result<Row, SlowLogError> {
        let converted = Params::convert(params)?;
        let _timer = self.opts.time_statement("tx query row", sql, params);
        let mut stmt = self.tx.prepare(sql)?;
        first_row(&mut stmt, &converted)
    }

    /// Prepare a statement bound to this transaction. Not timed, not
    /// logged; the statement snapshots this transaction's options.
    ///
    /// # Errors
    /// Returns the driver error verbatim; no wrapper is constructed on
    /// failure.
    pub fn prepare(&self, sql: &str) -> Result<PreparedStatement<'_>, SlowLogError> {
        let stmt = self.tx.prepare(sql)?;
        Ok(PreparedStatement::new(stmt, sql, self.opts.clone()))
    }

    /// Commit, timed and logged with duration only.
    ///
    /// # Errors
    /// Returns the driver error verbatim.
    pub fn commit(self) -> Result<(), SlowLogError> {
        let Transaction { tx, opts } = self;
        let _timer = opts.time_boundary("tx commit");
        Ok(tx.commit()?)
    }

    /// Roll back, timed and logged with duration only.
    ///
    /// # Errors
    /// Returns the driver error verbatim.
    pub fn rollback(self) -> Result<(), SlowLogError> {
        let Transaction { tx, opts } = self;
        let _timer = opts.time_boundary("tx rollback");
        Ok(tx.rollback()?)
    }
}
