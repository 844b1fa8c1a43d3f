//! Fuzz target for the statistics engine.
//!
//! Every analysis is total: arbitrary numeric columns, including NaN,
//! infinities and huge magnitudes, must produce a result without panicking.

#![no_main]

use arbitrary::Arbitrary;
use edastat::{Column, StatisticsEngine, Table};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    floats: Vec<Option<f64>>,
    k: f64,
    threshold: f64,
}

fuzz_target!(|input: Input| {
    if input.floats.len() > 20_000 {
        return;
    }

    let len = input.floats.len();
    let column = Column::float("x", input.floats);
    let engine = StatisticsEngine::new();

    let _ = engine.analyze_column(&column);
    let _ = engine.detect_outliers_iqr(&column, input.k);
    let _ = engine.detect_outliers_zscore(&column, input.threshold);

    let ids = Column::integer("id", (0..len as i64).map(Some));
    if let Ok(table) = Table::new(vec![column, ids]) {
        let _ = engine.quality_summary(&table);
    }
});
