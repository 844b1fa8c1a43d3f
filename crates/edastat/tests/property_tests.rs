//! Property-based tests for the statistics engine.
//!
//! These tests use proptest to generate random columns and verify that
//! every analysis keeps its invariants.
//!
//! # Testing Philosophy
//!
//! Property-based tests verify:
//! 1. **No panics**: analyses are total on any column
//! 2. **Determinism**: the same column always produces the same result
//! 3. **Consistency**: counts, percentages and bounds agree with each other
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p edastat --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p edastat --test property_tests
//! ```

use proptest::prelude::*;

use edastat::{Column, ListLimit, OutlierDetail, StatisticsEngine, Table};

// =============================================================================
// Test Strategies
// =============================================================================

/// Float columns with roughly a fifth of the cells missing.
fn float_column() -> impl Strategy<Value = Column> {
    prop::collection::vec(
        prop_oneof![1 => Just(None), 4 => (-1.0e6..1.0e6f64).prop_map(Some)],
        0..200,
    )
    .prop_map(|values| Column::float("x", values))
}

/// Integer columns with few distinct values, so ties and constants occur.
fn integer_column() -> impl Strategy<Value = Column> {
    prop::collection::vec(prop::option::weighted(0.9, -5i64..5), 1..100)
        .prop_map(|values| Column::integer("n", values))
}

fn text_column() -> impl Strategy<Value = Column> {
    prop::collection::vec(prop::option::of("[a-c]{0,3}"), 0..50)
        .prop_map(|values| Column::text("t", values))
}

fn any_column() -> impl Strategy<Value = Column> {
    prop_oneof![float_column(), integer_column(), text_column()]
}

// =============================================================================
// Basic Statistics
// =============================================================================

proptest! {
    #[test]
    fn prop_counts_add_up(column in any_column()) {
        let stats = StatisticsEngine::new().basic_stats(&column);
        prop_assert_eq!(stats.count + stats.missing, stats.count_total);
        prop_assert!(stats.unique <= stats.count);
        prop_assert!(stats.mode_count <= stats.unique);
    }

    #[test]
    fn prop_range_matches_extremes(column in float_column()) {
        let stats = StatisticsEngine::new().basic_stats(&column);
        if let (Some(min), Some(max), Some(range)) = (stats.min_f64(), stats.max_f64(), stats.range) {
            prop_assert_eq!(range, max - min);
            prop_assert!(min <= stats.median.unwrap() && stats.median.unwrap() <= max);
        }
    }

    #[test]
    fn prop_missing_percentages_sum_to_100(column in any_column()) {
        prop_assume!(!column.is_empty());
        let missing = StatisticsEngine::new().analyze_column_missing(&column);
        prop_assert!((missing.missing_pct + missing.complete_pct - 100.0).abs() < 1e-9);
        prop_assert_eq!(missing.missing + missing.complete, missing.total);
    }
}

// =============================================================================
// Distribution Statistics
// =============================================================================

proptest! {
    #[test]
    fn prop_percentiles_monotonic(column in float_column()) {
        let engine = StatisticsEngine::new();
        let basic = engine.basic_stats(&column);
        let dist = engine.distribution_stats(&column);

        if let Some(p) = dist.percentiles {
            let min = basic.min_f64().unwrap();
            let max = basic.max_f64().unwrap();
            let chain = [min, p.p10, p.p25, p.p50, p.p75, p.p90, p.p95, p.p99, max];
            for pair in chain.windows(2) {
                prop_assert!(pair[0] <= pair[1], "{:?}", chain);
            }
        } else {
            prop_assert!(basic.count < 3);
        }
    }

    #[test]
    fn prop_normality_in_range(column in float_column()) {
        let dist = StatisticsEngine::new().distribution_stats(&column);
        if let Some(test) = dist.normality {
            prop_assert!(test.statistic > 0.0 && test.statistic <= 1.0);
            prop_assert!((0.0..=1.0).contains(&test.p_value));
            prop_assert_eq!(dist.is_normal, Some(test.p_value > 0.05));
        }
    }
}

// =============================================================================
// Outlier Detection
// =============================================================================

proptest! {
    #[test]
    fn prop_iqr_bounds_ordered(column in float_column(), k in 0.0..5.0f64) {
        let result = StatisticsEngine::new().detect_outliers_iqr(&column, k);
        if let Some(OutlierDetail::Iqr { q1, q3, lower_outlier_count, upper_outlier_count, .. }) =
            result.detail
        {
            let lower = result.lower_bound.unwrap();
            let upper = result.upper_bound.unwrap();
            prop_assert!(lower <= q1 && q1 <= q3 && q3 <= upper);
            prop_assert_eq!(lower_outlier_count + upper_outlier_count, result.outlier_count);
            for v in &result.outlier_values {
                prop_assert!(*v < lower || *v > upper);
            }
        } else {
            prop_assert_eq!(column.present_count(), 0);
        }
    }

    #[test]
    fn prop_zero_variance_zscore_empty(value in -100i64..100, len in 1usize..60) {
        let column = Column::integer("c", vec![Some(value); len]);
        let result = StatisticsEngine::new().detect_outliers_zscore(&column, 3.0);
        prop_assert!(result.method().is_none());
        prop_assert_eq!(result.outlier_count, 0);
    }

    #[test]
    fn prop_lists_respect_cap(column in integer_column(), cap in 0usize..5) {
        let engine = StatisticsEngine::with_config(
            edastat::EngineConfig::default().with_outlier_list_limit(ListLimit::Capped(cap)),
        );
        let result = engine.detect_outliers_zscore(&column, 1.0);
        prop_assert_eq!(result.outlier_indices.len(), result.outlier_count.min(cap));
        prop_assert_eq!(result.outlier_values.len(), result.outlier_indices.len());
        prop_assert!(result.outlier_indices.windows(2).all(|w| w[0] < w[1]));
    }
}

// =============================================================================
// Determinism
// =============================================================================

proptest! {
    #[test]
    fn prop_analyses_are_idempotent(column in any_column()) {
        let engine = StatisticsEngine::new();
        prop_assert_eq!(engine.analyze_column(&column), engine.analyze_column(&column));
    }

    #[test]
    fn prop_quality_tracks_missing(a in float_column()) {
        let len = a.len();
        let b = Column::integer("b", (0..len as i64).map(Some));
        let table = Table::new(vec![a, b]).unwrap();

        let engine = StatisticsEngine::new();
        let quality = engine.quality_summary(&table);
        prop_assert_eq!(&quality.missing, &engine.analyze_missing_data(&table));
        prop_assert!((quality.completeness + quality.missing.total_missing_pct - 100.0).abs() < 1e-9);
        prop_assert_eq!(quality.has_issues, !quality.issues.is_empty());
    }
}
