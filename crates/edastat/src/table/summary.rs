//! Dataset-level overview and per-column information.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::stats::basic::distinct_count;
use crate::stats::numeric::percentage;

use super::table::Table;
use super::types::ColumnKind;

/// Shape and completeness overview of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub n_rows: usize,
    pub n_columns: usize,
    /// Number of columns per kind, every kind present (possibly zero).
    pub kind_counts: IndexMap<ColumnKind, usize>,
    pub total_cells: usize,
    pub missing_cells: usize,
    /// Percentage of cells that are present (0 for an empty table).
    pub completeness: f64,
}

/// Descriptive information about one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    /// Storage type name (e.g. `int64`, `text`).
    pub dtype: String,
    pub non_null_count: usize,
    pub null_count: usize,
    /// Percentage of present cells.
    pub completeness: f64,
    pub unique_count: usize,
}

impl Table {
    /// Summarise the table's shape, kinds and completeness.
    pub fn summary(&self) -> DatasetSummary {
        let mut kind_counts: IndexMap<ColumnKind, usize> =
            ColumnKind::ALL.iter().map(|&k| (k, 0)).collect();
        let mut missing_cells = 0;

        for column in self.columns() {
            *kind_counts.entry(column.kind()).or_insert(0) += 1;
            missing_cells += column.missing_count();
        }

        let total_cells = self.cell_count();
        let completeness = if total_cells == 0 {
            0.0
        } else {
            percentage(total_cells - missing_cells, total_cells)
        };

        DatasetSummary {
            n_rows: self.row_count(),
            n_columns: self.column_count(),
            kind_counts,
            total_cells,
            missing_cells,
            completeness,
        }
    }

    /// Per-column information, in column order.
    pub fn column_info(&self) -> Vec<ColumnInfo> {
        self.columns()
            .iter()
            .map(|column| {
                let null_count = column.missing_count();
                let non_null_count = column.len() - null_count;
                ColumnInfo {
                    name: column.name().to_string(),
                    kind: column.kind(),
                    dtype: column.data().type_name().to_string(),
                    non_null_count,
                    null_count,
                    completeness: percentage(non_null_count, column.len()),
                    unique_count: distinct_count(column),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::table::Column;

    use super::*;

    #[test]
    fn test_summary_counts() {
        let table = Table::new(vec![
            Column::integer("a", [Some(1), None, Some(3), Some(3)]),
            Column::text("b", [Some("x"), Some("y"), None, None]),
            Column::boolean("c", [Some(true), Some(false), Some(true), Some(true)]),
        ])
        .unwrap();

        let summary = table.summary();
        assert_eq!(summary.n_rows, 4);
        assert_eq!(summary.n_columns, 3);
        assert_eq!(summary.total_cells, 12);
        assert_eq!(summary.missing_cells, 3);
        assert!((summary.completeness - 75.0).abs() < 1e-9);
        assert_eq!(summary.kind_counts[&ColumnKind::Numeric], 1);
        assert_eq!(summary.kind_counts[&ColumnKind::Categorical], 1);
        assert_eq!(summary.kind_counts[&ColumnKind::Boolean], 1);
        assert_eq!(summary.kind_counts[&ColumnKind::Datetime], 0);
    }

    #[test]
    fn test_column_info() {
        let table = Table::new(vec![Column::integer("a", [Some(1), None, Some(3), Some(3)])]).unwrap();
        let info = &table.column_info()[0];

        assert_eq!(info.name, "a");
        assert_eq!(info.dtype, "int64");
        assert_eq!(info.non_null_count, 3);
        assert_eq!(info.null_count, 1);
        assert_eq!(info.unique_count, 2);
        assert!((info.completeness - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table_summary() {
        let summary = Table::empty().summary();
        assert_eq!(summary.total_cells, 0);
        assert_eq!(summary.completeness, 0.0);
    }
}
