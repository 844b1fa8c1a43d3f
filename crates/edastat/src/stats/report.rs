use serde::{Deserialize, Serialize};

use crate::table::ColumnKind;

use super::{BasicStats, ColumnMissing, DistributionStats, OutlierSummary};

/// Every per-column analysis for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub column: String,
    pub kind: ColumnKind,
    pub basic: BasicStats,
    pub distribution: DistributionStats,
    pub missing: ColumnMissing,
    pub outliers: OutlierSummary,
}
