//! Drought feature-table core crate.
//!
//! Implemented pipeline:
//! - daily weather CSV loading and per-county curation
//! - local SQLite store for curated daily rows
//! - weekly window-feature derivation anchored at scored dates

mod daily_weather;
mod features;
mod observability;
mod store;

pub use daily_weather::{
    compute_coverage, load_daily_csv, DailyCoverageReport, DailyLoadError, DailyLoadResult,
    DailyObservation, DailySeries,
};
pub use features::{
    aggregate, build_feature_schema, build_features, feature_catalogue, resolve_window,
    scored_labels, transform_store, write_feature_table, AggOp, FeatureBuildConfig,
    FeatureBuildReport, FeatureError, FeatureRecord, FeatureSchema, FeatureSpec, LabelPoint,
    Measurement, DERIVED_COLUMNS, FEATURE_SCHEMA_VERSION,
};
pub use observability::{init_logging, log_app_start, LogFormat, LoggingConfig, LoggingInitError};
pub use store::{StoreError, WeatherStore};
