//! Observability port for the statistics engine.
//!
//! The engine never logs on its own. It reports what it did to an optional
//! [`EngineObserver`] supplied at construction, and [`TracingObserver`]
//! forwards those reports to `tracing`.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use edastat::{Column, EngineEvent, StatisticsEngine};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let engine = StatisticsEngine::new().with_observer(move |event: &EngineEvent<'_>| {
//!     sink.lock().unwrap().push(event.column().map(str::to_string));
//! });
//!
//! engine.detect_outliers_iqr(&Column::float("x", [Some(1.0), Some(2.0)]), 1.5);
//! assert_eq!(seen.lock().unwrap().len(), 1);
//! ```

use crate::stats::{NormalityFailure, OutlierMethod, QualityTier};

/// Something the engine did that an observer may want to record.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent<'a> {
    /// All per-column analyses finished for a column.
    ColumnAnalyzed { column: &'a str, present: usize },
    /// Distribution statistics were not applicable.
    DistributionSkipped {
        column: &'a str,
        reason: &'static str,
    },
    /// The normality test ran on a subset of the present values.
    NormalitySampled {
        column: &'a str,
        population: usize,
        sample_size: usize,
    },
    /// The normality test could not produce a result.
    NormalityFailed {
        column: &'a str,
        failure: &'a NormalityFailure,
    },
    OutliersDetected {
        column: &'a str,
        method: OutlierMethod,
        count: usize,
    },
    MissingAnalyzed {
        columns: usize,
        total_missing: usize,
    },
    QualitySummarized { tier: QualityTier, completeness: f64 },
}

impl EngineEvent<'_> {
    /// Column the event concerns, if it is column-scoped.
    pub fn column(&self) -> Option<&str> {
        match self {
            EngineEvent::ColumnAnalyzed { column, .. }
            | EngineEvent::DistributionSkipped { column, .. }
            | EngineEvent::NormalitySampled { column, .. }
            | EngineEvent::NormalityFailed { column, .. }
            | EngineEvent::OutliersDetected { column, .. } => Some(*column),
            EngineEvent::MissingAnalyzed { .. } | EngineEvent::QualitySummarized { .. } => None,
        }
    }
}

/// Receiver for engine events.
///
/// Observers run synchronously inside engine calls, which may happen on any
/// thread.
pub trait EngineObserver: Send + Sync {
    fn observe(&self, event: &EngineEvent<'_>);
}

impl<F> EngineObserver for F
where
    F: Fn(&EngineEvent<'_>) + Send + Sync,
{
    fn observe(&self, event: &EngineEvent<'_>) {
        self(event)
    }
}

/// Forwards events to `tracing`. Numerical failures are warnings, quality
/// summaries are info, the rest is debug.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn observe(&self, event: &EngineEvent<'_>) {
        match event {
            EngineEvent::ColumnAnalyzed { column, present } => {
                tracing::debug!(column, present, "column analyzed");
            }
            EngineEvent::DistributionSkipped { column, reason } => {
                tracing::debug!(column, reason, "distribution statistics skipped");
            }
            EngineEvent::NormalitySampled {
                column,
                population,
                sample_size,
            } => {
                tracing::debug!(column, population, sample_size, "normality test sampled");
            }
            EngineEvent::NormalityFailed { column, failure } => {
                tracing::warn!(column, error = %failure, "normality test failed");
            }
            EngineEvent::OutliersDetected {
                column,
                method,
                count,
            } => {
                tracing::debug!(column, method = method.label(), count, "outliers detected");
            }
            EngineEvent::MissingAnalyzed {
                columns,
                total_missing,
            } => {
                tracing::debug!(columns, total_missing, "missing data analyzed");
            }
            EngineEvent::QualitySummarized { tier, completeness } => {
                tracing::info!(tier = tier.label(), completeness, "quality summarized");
            }
        }
    }
}
