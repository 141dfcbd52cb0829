use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::observe::{OpGuard, QuerySink, TracingSink};
use crate::types::RowValues;

/// Instrumentation configuration carried by every wrapper.
///
/// The gating values (`debug`, `slow_threshold`) and the `service` tag
/// are copied into a [`crate::Transaction`] or
/// [`crate::PreparedStatement`] when it is created; the sink `Arc` is
/// shared. Mutating a parent's options afterwards never affects
/// already-created children.
#[derive(Clone)]
pub struct InstrumentOptions {
    /// Log every call regardless of duration
    pub debug: bool,
    /// Log calls whose elapsed time meets or exceeds this value even
    /// when `debug` is false
    pub slow_threshold: Duration,
    /// Optional fixed tag attached to every record
    pub service: Option<String>,
    sink: Arc<dyn QuerySink>,
}

impl InstrumentOptions {
    /// Defaults: `debug` off, threshold `Duration::MAX` (log nothing),
    /// no service tag, tracing-backed sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            debug: false,
            slow_threshold: Duration::MAX,
            service: None,
            sink: Arc::new(TracingSink),
        }
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_slow_threshold(mut self, slow_threshold: Duration) -> Self {
        self.slow_threshold = slow_threshold;
        self
    }

    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn QuerySink>) -> Self {
        self.sink = sink;
        self
    }

    pub(crate) fn sink(&self) -> &dyn QuerySink {
        self.sink.as_ref()
    }

    /// Timer for a query-shaped operation (carries SQL text and args).
    pub(crate) fn time_statement<'a>(
        &'a self,
        op: &'static str,
        sql: &'a str,
        params: &'a [RowValues],
    ) -> OpGuard<'a> {
        OpGuard::new(self, op, Some(sql), Some(params))
    }

    /// Timer for a transaction boundary (duration only).
    pub(crate) fn time_boundary(&self, op: &'static str) -> OpGuard<'_> {
        OpGuard::new(self, op, None, None)
    }
}

impl Default for InstrumentOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InstrumentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentOptions")
            .field("debug", &self.debug)
            .field("slow_threshold", &self.slow_threshold)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}
