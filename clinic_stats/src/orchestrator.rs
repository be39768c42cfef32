//! Concurrent fan-out over every source.
//!
//! One blocking task per [`SourceKind`], each with its own reader. The orchestrator waits for
//! all of them (or for the deadline), then hands the collected outputs to
//! [`assemble`](crate::assemble::assemble).

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::assemble::{SourceResults, assemble};
use crate::config::{FailurePolicy, StatsConfig};
use crate::errors::{SourceError, StatsError};
use crate::fetchers::{FetchOutput, run_fetcher};
use crate::models::StatisticsReport;
use crate::source::{ReaderFactory, SourceKind};

/// Builds [`StatisticsReport`]s from a [`ReaderFactory`].
#[derive(Debug)]
pub struct AggregationOrchestrator<F> {
    factory: Arc<F>,
    config: StatsConfig,
}

impl<F> Clone for AggregationOrchestrator<F> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            config: self.config.clone(),
        }
    }
}

impl<F: ReaderFactory + 'static> AggregationOrchestrator<F> {
    pub fn new(factory: F, config: StatsConfig) -> Self {
        Self::with_shared(Arc::new(factory), config)
    }

    /// Use a factory that is also held elsewhere.
    pub fn with_shared(factory: Arc<F>, config: StatsConfig) -> Self {
        Self { factory, config }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// Run every fetcher concurrently and assemble the report.
    ///
    /// Under [`FailurePolicy::BestEffort`] failed sources are replaced by defaults and listed in
    /// the report. Under [`FailurePolicy::Strict`] the first failure to complete is returned as
    /// [`StatsError::SourceUnavailable`] and the other tasks are abandoned; when several sources
    /// fail, which one is named depends on completion order. Either way the deadline from the
    /// config bounds the whole call; on expiry outstanding tasks are abandoned and
    /// [`StatsError::Timeout`] is returned.
    #[instrument(
        skip(self),
        fields(policy = ?self.config.failure_policy, timeout_ms = self.config.timeout_ms)
    )]
    pub async fn build_report(&self) -> Result<StatisticsReport, StatsError> {
        let started = Instant::now();
        let deadline = self.config.timeout();

        let results = match tokio::time::timeout(deadline, self.fan_out()).await {
            Ok(results) => results?,
            Err(_) => {
                warn!(?deadline, "statistics fan-out timed out");
                return Err(StatsError::Timeout(deadline));
            }
        };

        let report = assemble(results)?;
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            failed_sources = report.failed_sources.len(),
            "statistics report built"
        );
        Ok(report)
    }

    /// [`build_report`](Self::build_report) for callers without a runtime.
    ///
    /// Starts a private multi-threaded runtime for the duration of the call. Tasks still
    /// blocked on a read when the deadline fires are left to finish in the background.
    ///
    /// Returns [`StatsError::Runtime`] when called from inside a tokio runtime, where blocking
    /// on a nested runtime is not allowed; await [`build_report`](Self::build_report) there.
    pub fn build_report_blocking(&self) -> Result<StatisticsReport, StatsError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(StatsError::Runtime(std::io::Error::other(
                "build_report_blocking called from within a tokio runtime",
            )));
        }
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let report = rt.block_on(self.build_report());
        rt.shutdown_background();
        report
    }

    async fn fan_out(&self) -> Result<SourceResults, StatsError> {
        let mut tasks = JoinSet::new();
        for kind in SourceKind::ALL {
            let factory = Arc::clone(&self.factory);
            tasks.spawn_blocking(move || (kind, guarded_fetch(factory.as_ref(), kind)));
        }

        let mut results = SourceResults::default();
        while let Some(joined) = tasks.join_next().await {
            let (kind, outcome) = match joined {
                Ok(done) => done,
                Err(e) => {
                    // the source shows up as missing at assembly
                    warn!(error = %e, "fetcher task did not complete");
                    continue;
                }
            };

            match outcome {
                Ok(output) => {
                    debug!(source = %kind, "source fetched");
                    results.record(output);
                }
                Err(e) if self.config.failure_policy == FailurePolicy::Strict => {
                    warn!(source = %kind, error = %e, "source failed, aborting report");
                    tasks.abort_all();
                    return Err(StatsError::SourceUnavailable { kind, source: e });
                }
                Err(e) => {
                    warn!(source = %kind, error = %e, "source failed, using defaults");
                    results.record_failure(kind, e.to_string());
                }
            }
        }

        if self.config.failure_policy == FailurePolicy::Strict {
            if let Some(kind) = results.missing().into_iter().next() {
                return Err(StatsError::SourceUnavailable {
                    kind,
                    source: SourceError::Panicked("fetcher task did not complete".into()),
                });
            }
        }
        Ok(results)
    }
}

/// Run one fetcher, turning a panic into [`SourceError::Panicked`].
fn guarded_fetch<F: ReaderFactory + ?Sized>(
    factory: &F,
    kind: SourceKind,
) -> Result<FetchOutput, SourceError> {
    std::panic::catch_unwind(AssertUnwindSafe(|| run_fetcher(factory, kind)))
        .unwrap_or_else(|payload| Err(SourceError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
