use rusqlite::Connection;

use crate::error::SlowLogError;
use crate::options::InstrumentOptions;
use crate::params::Params;
use crate::query::{build_result_set, first_row};
use crate::statement::PreparedStatement;
use crate::transaction::Transaction;
use crate::types::{ResultSet, Row, RowValues};

/// Instrumented wrapper around a live [`rusqlite::Connection`].
///
/// Every operation forwards to the driver unchanged; the wrapper only
/// measures latency and emits one structured record per call when the
/// gating rule (`debug || elapsed >= slow_threshold`) fires.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use sql_slowlog::{Handle, InstrumentOptions, RowValues};
///
/// # fn main() -> Result<(), sql_slowlog::SlowLogError> {
/// let conn = rusqlite::Connection::open("app.db")?;
/// let db = Handle::wrap(
///     conn,
///     InstrumentOptions::new().with_slow_threshold(Duration::from_millis(200)),
/// );
/// db.exec(
///     "INSERT INTO t (id) VALUES (?1)",
///     &[RowValues::Int(1)],
/// )?;
/// # Ok(())
/// # }
/// ```
pub struct Handle {
    conn: Connection,
    opts: InstrumentOptions,
}

impl Handle {
    /// Wrap an already-open connection. The caller remains responsible
    /// for the connection's lifetime; [`Handle::close`] forwards to the
    /// driver and nothing more.
    #[must_use]
    pub fn wrap(conn: Connection, opts: InstrumentOptions) -> Self {
        Self { conn, opts }
    }

    #[must_use]
    pub fn options(&self) -> &InstrumentOptions {
        &self.opts
    }

    /// Mutable access to the configuration. Children created before a
    /// mutation keep the values they were created with.
    pub fn options_mut(&mut self) -> &mut InstrumentOptions {
        &mut self.opts
    }

    /// Execute a DML statement, returning rows affected.
    ///
    /// # Errors
    /// Returns the driver error verbatim.
    pub fn exec(&self, sql: &str, params: &[RowValues]) -> Result<usize, SlowLogError> {
        let converted = Params::convert(params)?;
        let _timer = self.opts.time_statement("db exec", sql, params);
        let refs = converted.as_refs();
        Ok(self.conn.execute(sql, &refs[..])?)
    }

    /// Run a query and materialize all rows.
    ///
    /// # Errors
    /// Returns the driver error verbatim.
    pub fn query(&self, sql: &str, params: &[RowValues]) -> Result<ResultSet, SlowLogError> {
        let converted = Params::convert(params)?;
        let _timer = self.opts.time_statement("db query", sql, params);
        let mut stmt = self.conn.prepare(sql)?;
        build_result_set(&mut stmt, &converted)
    }

    /// Run a query expected to return one row.
    ///
    /// # Errors
    /// Returns the driver error verbatim; an empty result surfaces as
    /// `rusqlite::Error::QueryReturnedNoRows`.
    pub fn query_row(&self, sql: &str, params: &[RowValues]) -> Result<Row, SlowLogError> {
        let converted = Params::convert(params)?;
        let _timer = self.opts.time_statement("db query row", sql, params);
        let mut stmt = self.conn.prepare(sql)?;
        first_row(&mut stmt, &converted)
    }

    /// Prepare a statement for repeated execution. Not timed, not
    /// logged; the statement remembers `sql` for its own records.
    ///
    /// # Errors
    /// Returns the driver error verbatim; no wrapper is constructed on
    /// failure.
    pub fn prepare(&self, sql: &str) -> Result<PreparedStatement<'_>, SlowLogError> {
        let stmt = self.conn.prepare(sql)?;
        Ok(PreparedStatement::new(stmt, sql, self.opts.clone()))
    }

    /// Begin a transaction carrying a snapshot of this handle's options.
    ///
    /// # Errors
    /// Returns the driver error verbatim.
    pub fn begin(&mut self) -> Result<Transaction<'_>, SlowLogError> {
        let tx = self.conn.transaction()?;
        Ok(Transaction::new(tx, self.opts.clone()))
    }

    /// Close the underlying connection. Pure delegation, no record.
    ///
    /// # Errors
    /// Surfaces the driver's close error; the connection is dropped
    /// either way.
    pub fn close(self) -> Result<(), SlowLogError> {
        self.conn.close().map_err(|(_conn, e)| e.into())
    }
}
