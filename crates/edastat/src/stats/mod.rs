//! Statistical analyses over columns and tables.
//!
//! The free functions here are the building blocks; [`crate::StatisticsEngine`]
//! wires them to its configuration and observer.

pub mod basic;
pub mod distribution;
pub mod missing;
pub mod normality;
pub(crate) mod numeric;
pub mod outliers;
pub mod quality;
mod report;

pub use basic::{BasicStats, basic_stats};
pub use distribution::{DistributionStats, KurtosisShape, Percentiles, SkewShape};
pub use missing::{ColumnMissing, ColumnMissingDetail, MissingBracket, MissingPattern, MissingReport};
pub use normality::{NormalityFailure, NormalityTest, shapiro_wilk};
pub use outliers::{ListLimit, OutlierDetail, OutlierMethod, OutlierResult, OutlierSummary};
pub use quality::{QualitySummary, QualityTier};
pub use report::ColumnReport;
