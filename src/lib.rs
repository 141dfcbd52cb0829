//! Latency measurement and structured query logging over `rusqlite`.
//!
//! Three decorators compose in an ownership chain: [`Handle`] wraps a
//! live connection, [`Handle::begin`] yields a [`Transaction`], and
//! `prepare` on either yields a [`PreparedStatement`]. Every operation
//! forwards to the driver unchanged; the only added behavior is a
//! scope-exit timer that emits one structured record per call when
//! `debug` is set or the call ran at least `slow_threshold`.
//!
//! Records go to a [`QuerySink`]: the default [`TracingSink`] emits
//! `tracing` events (see [`init_stdout_logging`] for a JSON-to-stdout
//! subscriber), and [`MemorySink`] captures records for assertions.

pub use rusqlite;

mod error;
mod handle;
mod observe;
mod options;
mod params;
mod query;
mod statement;
mod transaction;
mod types;

pub mod prelude;

pub use error::SlowLogError;
pub use handle::Handle;
pub use observe::{MemorySink, QueryLog, QueryRecord, QuerySink, TracingSink, init_stdout_logging};
pub use options::InstrumentOptions;
pub use params::{Params, row_value_to_sqlite_value};
pub use statement::PreparedStatement;
pub use transaction::Transaction;
pub use types::{ResultSet, Row, RowValues};
