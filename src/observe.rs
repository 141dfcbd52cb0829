use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::options::InstrumentOptions;
use crate::types::RowValues;

/// One record describing a completed database call.
///
/// `sql` and `params` are present for query-shaped operations and absent
/// for transaction boundaries (`commit`/`rollback`).
#[derive(Debug)]
pub struct QueryLog<'a> {
    /// Operation label, e.g. `"db exec"` or `"tx commit"`
    pub op: &'static str,
    /// SQL text, if the operation carries one
    pub sql: Option<&'a str>,
    /// Positional arguments, if the operation carries any
    pub params: Option<&'a [RowValues]>,
    /// Wall-clock time spent in the underlying call
    pub elapsed: Duration,
    /// Optional fixed service tag from the options
    pub service: Option<&'a str>,
}

/// Destination for instrumentation records.
///
/// The sink is an explicit shared object held in [`InstrumentOptions`],
/// so tests can substitute an in-memory sink for the default
/// tracing-backed one.
pub trait QuerySink: Send + Sync {
    fn emit(&self, record: &QueryLog<'_>);
}

/// Default sink: one `tracing` DEBUG event per record.
///
/// Fields carried: `elapsed`, `sql`, `params`, `service`, and `host`
/// (machine hostname, resolved once per process). Where the event ends
/// up is decided by whatever subscriber the host process installed; see
/// [`init_stdout_logging`] for a JSON-to-stdout default.
#[derive(Debug, Default)]
pub struct TracingSink;

fn host_tag() -> Option<&'static str> {
    static HOST: OnceLock<Option<String>> = OnceLock::new();
    HOST.get_or_init(|| hostname::get().ok().and_then(|h| h.into_string().ok()))
        .as_deref()
}

impl QuerySink for TracingSink {
    fn emit(&self, record: &QueryLog<'_>) {
        tracing::debug!(
            target: "sql_slowlog",
            elapsed = ?record.elapsed,
            sql = record.sql,
            params = record.params.map(|p| format!("{p:?}")).as_deref(),
            service = record.service,
            host = host_tag(),
            "{}",
            record.op
        );
    }
}

/// Owned copy of a [`QueryLog`], as captured by [`MemorySink`].
#[derive(Debug, Clone)]
pub struct QueryRecord {
    pub op: &'static str,
    pub sql: Option<String>,
    pub params: Option<Vec<RowValues>>,
    pub elapsed: Duration,
    pub service: Option<String>,
}

/// In-memory sink collecting owned records, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<QueryRecord>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<QueryRecord>> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Snapshot of everything captured so far.
    #[must_use]
    pub fn records(&self) -> Vec<QueryRecord> {
        self.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl QuerySink for MemorySink {
    fn emit(&self, record: &QueryLog<'_>) {
        self.lock().push(QueryRecord {
            op: record.op,
            sql: record.sql.map(str::to_owned),
            params: record.params.map(<[RowValues]>::to_vec),
            elapsed: record.elapsed,
            service: record.service.map(str::to_owned),
        });
    }
}

/// Scope-exit timer for one forwarded call.
///
/// Created immediately before delegating to the driver; its `Drop` runs
/// on every exit path, so the measurement and the gating check happen
/// whether the call succeeded or returned an error.
pub(crate) struct OpGuard<'a> {
    opts: &'a InstrumentOptions,
    op: &'static str,
    sql: Option<&'a str>,
    params: Option<&'a [RowValues]>,
    started: Instant,
}

impl<'a> OpGuard<'a> {
    pub(crate) fn new(
        opts: &'a InstrumentOptions,
        op: &'static str,
        sql: Option<&'a str>,
        params: Option<&'a [RowValues]>,
    ) -> Self {
        Self {
            opts,
            op,
            sql,
            params,
            started: Instant::now(),
        }
    }
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        if self.opts.debug || elapsed >= self.opts.slow_threshold {
            self.opts.sink().emit(&QueryLog {
                op: self.op,
                sql: self.sql,
                params: self.params,
                elapsed,
                service: self.opts.service.as_deref(),
            });
        }
    }
}

/// Install a process-wide JSON subscriber writing to stdout at DEBUG
/// level (honoring `RUST_LOG` when set). Best-effort: does nothing if a
/// subscriber is already installed.
pub fn init_stdout_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(std::io::stdout))
        .try_init();
}
