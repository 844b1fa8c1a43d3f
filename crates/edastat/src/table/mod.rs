//! In-memory tabular dataset the engine operates over.

mod column;
mod summary;
#[allow(clippy::module_inception)]
mod table;
mod types;

pub use column::{Column, ColumnData};
pub use summary::{ColumnInfo, DatasetSummary};
pub use table::Table;
pub use types::{ColumnKind, Scalar};
