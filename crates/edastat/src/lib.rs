//! edastat: statistics and data-quality engine for tabular datasets.
//!
//! The engine turns an in-memory [`Table`] into quantitative summaries:
//! descriptive statistics, distribution shape and normality, missing-data
//! patterns, outliers (IQR and Z-score) and an aggregate quality score.
//!
//! # Core Principles
//!
//! - **Pure**: every analysis is a function of its input; the engine keeps no
//!   state between calls and never mutates a table
//! - **Total**: degenerate input (too few values, wrong kind, zero variance)
//!   produces a documented empty result, never an error
//! - **Typed**: one immutable record type per analysis kind
//!
//! # Example
//!
//! ```
//! use edastat::{Column, StatisticsEngine, Table};
//!
//! let table = Table::new(vec![
//!     Column::float("score", [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0), Some(100.0)]),
//! ])
//! .unwrap();
//!
//! let engine = StatisticsEngine::new();
//! let outliers = engine.detect_outliers_iqr(table.column("score").unwrap(), 1.5);
//!
//! assert_eq!(outliers.outlier_count, 1);
//! assert_eq!(outliers.outlier_values, vec![100.0]);
//! ```

pub mod error;
pub mod input;
pub mod observe;
pub mod stats;
pub mod table;

mod engine;

pub use crate::engine::{EngineConfig, StatisticsEngine};
pub use error::{EdaError, Result};
pub use input::{Loader, LoaderConfig, SourceMetadata};
pub use observe::{EngineEvent, EngineObserver, TracingObserver};
pub use stats::{
    BasicStats, ColumnMissing, ColumnMissingDetail, ColumnReport, DistributionStats,
    KurtosisShape, ListLimit, MissingBracket, MissingPattern, MissingReport, NormalityFailure,
    NormalityTest, OutlierDetail, OutlierMethod, OutlierResult, OutlierSummary, Percentiles,
    QualitySummary, QualityTier, SkewShape,
};
pub use table::{Column, ColumnData, ColumnInfo, ColumnKind, DatasetSummary, Scalar, Table};
