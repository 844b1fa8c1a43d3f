//! Loading data files into tables.

mod infer;
mod parser;
mod source;

pub use parser::{Loader, LoaderConfig};
pub use source::{SourceMetadata, is_null_value};
