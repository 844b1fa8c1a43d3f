//! Table of equal-length named columns.

use indexmap::IndexMap;

use crate::error::{EdaError, Result};

use super::column::Column;
use super::types::ColumnKind;

/// An immutable, ordered collection of named columns of equal length.
///
/// Every column has exactly [`Table::row_count`] positions. Nothing in the
/// crate mutates a table after construction, so a `&Table` can be shared
/// freely across threads for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    positions: IndexMap<String, usize>,
    row_count: usize,
}

impl Table {
    /// Build a table, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut positions = IndexMap::with_capacity(columns.len());

        for (position, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(EdaError::RaggedColumns {
                    column: column.name().to_string(),
                    expected: row_count,
                    found: column.len(),
                });
            }
            if positions
                .insert(column.name().to_string(), position)
                .is_some()
            {
                return Err(EdaError::DuplicateColumn(column.name().to_string()));
            }
        }

        Ok(Self {
            columns,
            positions,
            row_count,
        })
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            positions: IndexMap::new(),
            row_count: 0,
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of cells (rows x columns).
    pub fn cell_count(&self) -> usize {
        self.row_count * self.columns.len()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.positions.get(name).map(|&i| &self.columns[i])
    }

    /// Get a column by name, failing if it does not exist.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| EdaError::ColumnNotFound(name.to_string()))
    }

    /// Get a column by position.
    pub fn column_at(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }

    /// All column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.positions.keys().map(String::as_str).collect()
    }

    /// Columns of a given kind, in order.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.kind() == kind)
    }

    /// Names of numeric columns.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.names_of_kind(ColumnKind::Numeric)
    }

    /// Names of categorical columns.
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.names_of_kind(ColumnKind::Categorical)
    }

    /// Names of datetime columns.
    pub fn datetime_columns(&self) -> Vec<&str> {
        self.names_of_kind(ColumnKind::Datetime)
    }

    fn names_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns_of_kind(kind).map(Column::name).collect()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::empty()
    }
}
