//! Convenience re-exports for typical use.

pub use crate::error::SlowLogError;
pub use crate::handle::Handle;
pub use crate::observe::{MemorySink, QueryLog, QueryRecord, QuerySink, TracingSink};
pub use crate::options::InstrumentOptions;
pub use crate::statement::PreparedStatement;
pub use crate::transaction::Transaction;
pub use crate::types::{ResultSet, Row, RowValues};
