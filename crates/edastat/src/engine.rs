//! The statistics engine and its configuration.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EdaError, Result};
use crate::observe::{EngineEvent, EngineObserver};
use crate::stats::distribution::{self, MIN_DISTRIBUTION_VALUES};
use crate::stats::{
    BasicStats, ColumnMissing, ColumnReport, DistributionStats, ListLimit, MissingReport,
    OutlierMethod, OutlierResult, OutlierSummary, QualitySummary, basic, missing, outliers,
};
use crate::table::{Column, Table};

/// Tunable parameters of the statistics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IQR multiplier used by summaries (default 1.5).
    pub iqr_k: f64,
    /// Z-score cutoff used by summaries (default 3.0).
    pub zscore_threshold: f64,
    /// Largest sample the normality test runs on (default 5000).
    pub normality_sample_cap: usize,
    /// Significance level for `is_normal` (default 0.05).
    pub normality_alpha: f64,
    /// A missing run longer than this share of the column is systematic
    /// (default 0.1).
    pub systematic_run_fraction: f64,
    /// How many outlier entries results list.
    pub outlier_list_limit: ListLimit,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            iqr_k: 1.5,
            zscore_threshold: 3.0,
            normality_sample_cap: 5000,
            normality_alpha: 0.05,
            systematic_run_fraction: 0.1,
            outlier_list_limit: ListLimit::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_iqr_k(mut self, k: f64) -> Self {
        self.iqr_k = k;
        self
    }

    pub fn with_zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = threshold;
        self
    }

    pub fn with_normality_sample_cap(mut self, cap: usize) -> Self {
        self.normality_sample_cap = cap;
        self
    }

    pub fn with_normality_alpha(mut self, alpha: f64) -> Self {
        self.normality_alpha = alpha;
        self
    }

    pub fn with_systematic_run_fraction(mut self, fraction: f64) -> Self {
        self.systematic_run_fraction = fraction;
        self
    }

    pub fn with_outlier_list_limit(mut self, limit: ListLimit) -> Self {
        self.outlier_list_limit = limit;
        self
    }

    /// Check that every parameter is in its valid range.
    pub fn validate(&self) -> Result<()> {
        fn non_negative(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(EdaError::Config(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )))
            }
        }

        non_negative("iqr_k", self.iqr_k)?;
        non_negative("zscore_threshold", self.zscore_threshold)?;

        if self.normality_sample_cap < MIN_DISTRIBUTION_VALUES {
            return Err(EdaError::Config(format!(
                "normality_sample_cap must be at least {}, got {}",
                MIN_DISTRIBUTION_VALUES, self.normality_sample_cap
            )));
        }
        if !(self.normality_alpha > 0.0 && self.normality_alpha < 1.0) {
            return Err(EdaError::Config(format!(
                "normality_alpha must be in (0, 1), got {}",
                self.normality_alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.systematic_run_fraction) {
            return Err(EdaError::Config(format!(
                "systematic_run_fraction must be in [0, 1], got {}",
                self.systematic_run_fraction
            )));
        }

        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing keys take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| EdaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

/// Computes statistics over tables and columns.
///
/// Every method is a pure function of its arguments and the configuration.
/// The engine holds no mutable state, so one instance can be shared across
/// threads.
#[derive(Clone, Default)]
pub struct StatisticsEngine {
    config: EngineConfig,
    observer: Option<Arc<dyn EngineObserver>>,
}

impl fmt::Debug for StatisticsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatisticsEngine")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl StatisticsEngine {
    /// Create an engine with default configuration and no observer.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Report engine events to `observer`.
    pub fn with_observer(mut self, observer: impl EngineObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn emit(&self, event: EngineEvent<'_>) {
        if let Some(observer) = &self.observer {
            observer.observe(&event);
        }
    }

    /// Descriptive statistics for any column kind.
    pub fn basic_stats(&self, column: &Column) -> BasicStats {
        basic::basic_stats(column)
    }

    /// Percentiles, shape and normality of a numeric column.
    ///
    /// Returns [`DistributionStats::empty`] for non-numeric columns and for
    /// fewer than three present values.
    pub fn distribution_stats(&self, column: &Column) -> DistributionStats {
        let run = distribution::distribution_stats(
            column,
            self.config.normality_sample_cap,
            self.config.normality_alpha,
        );

        if run.stats.is_empty() {
            let reason = if column.kind().is_numeric() {
                "fewer than 3 present values"
            } else {
                "column is not numeric"
            };
            self.emit(EngineEvent::DistributionSkipped {
                column: column.name(),
                reason,
            });
        }
        if let Some(test) = run.stats.normality.as_ref().filter(|t| t.sampled) {
            self.emit(EngineEvent::NormalitySampled {
                column: column.name(),
                population: column.present_count(),
                sample_size: test.sample_size,
            });
        }
        if let Some(failure) = &run.normality_failure {
            self.emit(EngineEvent::NormalityFailed {
                column: column.name(),
                failure,
            });
        }

        run.stats
    }

    /// Missing-value profile of the whole table.
    pub fn analyze_missing_data(&self, table: &Table) -> MissingReport {
        let report = missing::analyze_missing_data(table);
        self.emit(EngineEvent::MissingAnalyzed {
            columns: report.total_columns,
            total_missing: report.total_missing,
        });
        report
    }

    /// Missing-value profile and pattern of one column.
    pub fn analyze_column_missing(&self, column: &Column) -> ColumnMissing {
        missing::analyze_column_missing(column, self.config.systematic_run_fraction)
    }

    /// IQR outliers with multiplier `k`.
    pub fn detect_outliers_iqr(&self, column: &Column, k: f64) -> OutlierResult {
        let result = outliers::detect_iqr(column, k, self.config.outlier_list_limit);
        self.report_outliers(column, OutlierMethod::Iqr, &result);
        result
    }

    /// Z-score outliers beyond `threshold` sample standard deviations.
    pub fn detect_outliers_zscore(&self, column: &Column, threshold: f64) -> OutlierResult {
        let result = outliers::detect_zscore(column, threshold, self.config.outlier_list_limit);
        self.report_outliers(column, OutlierMethod::ZScore, &result);
        result
    }

    fn report_outliers(&self, column: &Column, method: OutlierMethod, result: &OutlierResult) {
        if !result.is_empty() {
            self.emit(EngineEvent::OutliersDetected {
                column: column.name(),
                method,
                count: result.outlier_count,
            });
        }
    }

    /// Both outlier methods with the configured parameters, plus advice.
    pub fn outlier_summary(&self, column: &Column) -> OutlierSummary {
        OutlierSummary::new(
            self.detect_outliers_iqr(column, self.config.iqr_k),
            self.detect_outliers_zscore(column, self.config.zscore_threshold),
        )
    }

    /// Completeness tier, outlier totals and issues for the whole table.
    pub fn quality_summary(&self, table: &Table) -> QualitySummary {
        let report = self.analyze_missing_data(table);

        let mut total_outliers = 0;
        let mut outlier_columns = 0;
        for column in table.columns().iter().filter(|c| c.kind().is_numeric()) {
            // Only counts are needed here.
            let result = outliers::detect_iqr(column, self.config.iqr_k, ListLimit::Capped(0));
            if result.outlier_count > 0 {
                total_outliers += result.outlier_count;
                outlier_columns += 1;
            }
        }

        let summary = QualitySummary::new(report, total_outliers, outlier_columns);
        self.emit(EngineEvent::QualitySummarized {
            tier: summary.tier,
            completeness: summary.completeness,
        });
        summary
    }

    /// Run every per-column analysis on `column`.
    pub fn analyze_column(&self, column: &Column) -> ColumnReport {
        let report = ColumnReport {
            column: column.name().to_string(),
            kind: column.kind(),
            basic: self.basic_stats(column),
            distribution: self.distribution_stats(column),
            missing: self.analyze_column_missing(column),
            outliers: self.outlier_summary(column),
        };
        self.emit(EngineEvent::ColumnAnalyzed {
            column: column.name(),
            present: report.basic.count,
        });
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::stats::MissingPattern;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_send_sync() {
        assert_send_sync::<StatisticsEngine>();
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.outlier_list_limit, ListLimit::Capped(100));
    }

    #[test]
    fn test_invalid_config() {
        assert!(EngineConfig::default().with_iqr_k(-1.0).validate().is_err());
        assert!(EngineConfig::default().with_zscore_threshold(f64::NAN).validate().is_err());
        assert!(EngineConfig::default().with_normality_sample_cap(2).validate().is_err());
        assert!(EngineConfig::default().with_normality_alpha(1.0).validate().is_err());
        assert!(EngineConfig::default().with_systematic_run_fraction(1.5).validate().is_err());
    }

    #[test]
    fn test_config_json_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"iqr_k": 3.0, "outlier_list_limit": "unbounded"}"#).unwrap();
        assert_eq!(config.iqr_k, 3.0);
        assert_eq!(config.zscore_threshold, 3.0);
        assert_eq!(config.outlier_list_limit, ListLimit::Unbounded);

        let config: EngineConfig =
            serde_json::from_str(r#"{"outlier_list_limit": {"capped": 5}}"#).unwrap();
        assert_eq!(config.outlier_list_limit, ListLimit::Capped(5));
    }

    #[test]
    fn test_configured_run_fraction() {
        let col = Column::integer("x", (0..100).map(|i| (!(40..55).contains(&i)).then_some(i)));
        let default = StatisticsEngine::new().analyze_column_missing(&col);
        assert_eq!(default.pattern, MissingPattern::Systematic);

        let lenient = StatisticsEngine::with_config(
            EngineConfig::default().with_systematic_run_fraction(0.2),
        );
        assert_eq!(
            lenient.analyze_column_missing(&col).pattern,
            MissingPattern::Random
        );
    }

    #[test]
    fn test_observer_receives_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let engine = StatisticsEngine::new().with_observer(move |event: &EngineEvent<'_>| {
            sink.lock().unwrap().push(format!("{:?}", event));
        });

        let flat = Column::integer("flat", std::iter::repeat(Some(7)).take(10));
        engine.analyze_column(&flat);

        let events = events.lock().unwrap();
        assert!(events.iter().any(|e| e.starts_with("NormalityFailed")));
        assert!(events.iter().any(|e| e.starts_with("OutliersDetected")));
        assert!(events.last().unwrap().starts_with("ColumnAnalyzed"));
        // Zero variance leaves the Z-score result empty, so only IQR reports.
        assert_eq!(
            events.iter().filter(|e| e.starts_with("OutliersDetected")).count(),
            1
        );
    }

    #[test]
    fn test_quality_summary_counts_numeric_columns() {
        let table = Table::new(vec![
            Column::integer("spike", [1, 2, 3, 4, 5, 100].map(Some)),
            Column::text("label", ["a", "b", "c", "d", "e", "f"].map(Some)),
            Column::float("calm", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0].map(Some)),
        ])
        .unwrap();

        let summary = StatisticsEngine::new().quality_summary(&table);
        assert_eq!(summary.completeness, 100.0);
        assert_eq!(summary.total_outliers, 1);
        assert_eq!(summary.outlier_columns, 1);
        assert_eq!(summary.issues, vec!["Columns with outliers: 1"]);
    }

    #[test]
    fn test_analyze_column_bundles_parts() {
        let col = Column::text("city", [Some("a"), None, Some("b")]);
        let report = StatisticsEngine::new().analyze_column(&col);

        assert_eq!(report.column, "city");
        assert_eq!(report.basic.count, 2);
        assert!(report.distribution.is_empty());
        assert_eq!(report.missing.missing, 1);
        assert!(report.outliers.iqr.is_empty());
        assert_eq!(report.outliers.recommendations, vec!["No outliers detected"]);
    }
}
