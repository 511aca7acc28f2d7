//! Weekly drought-feature derivation from a curated daily weather series.
//!
//! For every date carrying a drought score, a fixed catalogue of rolling
//! aggregations over the trailing 7/30/90/180 days is evaluated, then a
//! small set of deficit/anomaly indicators is derived from aggregates
//! already present in the same record. Window membership for a label date
//! `d` and lookback `L` is the half-open interval `(d - L, d]`.

use std::fs;
use std::path::Path;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use crate::daily_weather::{DailyObservation, DailySeries};
use crate::store::{StoreError, WeatherStore};

pub const FEATURE_SCHEMA_VERSION: u32 = 1;

const LOOKBACKS_FULL: [u32; 4] = [7, 30, 90, 180];
const LOOKBACKS_HUMIDITY: [u32; 3] = [7, 30, 90];
const LOOKBACKS_SHORT: [u32; 2] = [7, 30];

/// Derived columns, in output order, appended after the catalogue columns.
pub const DERIVED_COLUMNS: [&str; 6] = [
    "prec_deficit_30v90d",
    "prec_deficit_7v30d",
    "temp_anomaly_7v90d",
    "temp_anomaly_30v180d",
    "vpd_proxy_7d",
    "vpd_proxy_30d",
];

/// A measured daily quantity the catalogue can aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Measurement {
    Precipitation,
    SurfacePressure,
    SpecificHumidity,
    MeanTemp,
    DewpointTemp,
    WetBulbTemp,
    MaxTemp,
    MinTemp,
    TempRange,
    SkinTemp,
    Wind10m,
    Wind10mMax,
    Wind10mMin,
    Wind10mRange,
    Wind50m,
    Wind50mMax,
    Wind50mMin,
    Wind50mRange,
}

impl Measurement {
    pub fn value(self, obs: &DailyObservation) -> Option<f64> {
        match self {
            Self::Precipitation => obs.prectot,
            Self::SurfacePressure => obs.ps,
            Self::SpecificHumidity => obs.qv2m,
            Self::MeanTemp => obs.t2m,
            Self::DewpointTemp => obs.t2mdew,
            Self::WetBulbTemp => obs.t2mwet,
            Self::MaxTemp => obs.t2m_max,
            Self::MinTemp => obs.t2m_min,
            Self::TempRange => obs.t2m_range,
            Self::SkinTemp => obs.ts,
            Self::Wind10m => obs.ws10m,
            Self::Wind10mMax => obs.ws10m_max,
            Self::Wind10mMin => obs.ws10m_min,
            Self::Wind10mRange => obs.ws10m_range,
            Self::Wind50m => obs.ws50m,
            Self::Wind50mMax => obs.ws50m_max,
            Self::Wind50mMin => obs.ws50m_min,
            Self::Wind50mRange => obs.ws50m_range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggOp {
    Sum,
    Mean,
    Max,
}

impl AggOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::Max => "max",
        }
    }
}

/// One catalogue entry: which field to aggregate, how, and over which
/// trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub field: Measurement,
    pub op: AggOp,
    pub lookback_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub fingerprint: String,
    pub columns: Vec<String>,
}

/// One output row: key fields plus one cell per schema column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub fips: u32,
    pub date: NaiveDate,
    pub score: Option<f64>,
    pub values: Vec<Option<f64>>,
}

/// A date for which a drought score was recorded. The score is opaque
/// payload and is carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPoint {
    pub date: NaiveDate,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureBuildConfig {
    pub schema_version: u32,
}

impl Default for FeatureBuildConfig {
    fn default() -> Self {
        Self {
            schema_version: FEATURE_SCHEMA_VERSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureBuildReport {
    pub input_days: u64,
    pub label_count: u64,
    pub output_rows: u64,
    pub missing_cells: u64,
}

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("invalid feature build config: {0}")]
    InvalidConfig(String),
    #[error("daily series is empty")]
    EmptySeries,
    #[error("daily series is not sorted ascending by date (row {index})")]
    UnsortedSeries { index: usize },
    #[error("label date set is empty")]
    EmptyLabels,
    #[error("label date {date} underflows the {lookback_days}d lookback")]
    LookbackUnderflow { date: NaiveDate, lookback_days: u32 },
    #[error("record has {found} cells, schema has {expected} columns")]
    RecordWidthMismatch { expected: usize, found: usize },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// The fixed window/field/operator catalogue, in output column order.
pub fn feature_catalogue() -> Vec<FeatureSpec> {
    const CORE_TEMP: [(&str, Measurement); 5] = [
        ("t2m", Measurement::MeanTemp),
        ("t2m_max", Measurement::MaxTemp),
        ("t2m_min", Measurement::MinTemp),
        ("t2m_range", Measurement::TempRange),
        ("ts", Measurement::SkinTemp),
    ];
    const HUMIDITY: [(&str, Measurement); 3] = [
        ("qv2m", Measurement::SpecificHumidity),
        ("t2mdew", Measurement::DewpointTemp),
        ("t2mwet", Measurement::WetBulbTemp),
    ];
    const WIND: [(&str, Measurement, AggOp); 8] = [
        ("ws10m", Measurement::Wind10m, AggOp::Mean),
        ("ws10m", Measurement::Wind10mMax, AggOp::Max),
        ("ws10m_min", Measurement::Wind10mMin, AggOp::Mean),
        ("ws10m_range", Measurement::Wind10mRange, AggOp::Mean),
        ("ws50m", Measurement::Wind50m, AggOp::Mean),
        ("ws50m", Measurement::Wind50mMax, AggOp::Max),
        ("ws50m_min", Measurement::Wind50mMin, AggOp::Mean),
        ("ws50m_range", Measurement::Wind50mRange, AggOp::Mean),
    ];

    let mut specs = Vec::new();

    for lookback in LOOKBACKS_FULL {
        push_spec(
            &mut specs,
            "prec",
            Measurement::Precipitation,
            AggOp::Sum,
            lookback,
        );
    }

    for lookback in LOOKBACKS_FULL {
        for (stem, field) in CORE_TEMP {
            push_spec(&mut specs, stem, field, AggOp::Mean, lookback);
        }
    }

    // Heat extremes over the short windows only.
    for lookback in LOOKBACKS_SHORT {
        push_spec(&mut specs, "t2m", Measurement::MaxTemp, AggOp::Max, lookback);
    }

    for lookback in LOOKBACKS_HUMIDITY {
        for (stem, field) in HUMIDITY {
            push_spec(&mut specs, stem, field, AggOp::Mean, lookback);
        }
    }

    for lookback in LOOKBACKS_SHORT {
        for (stem, field, op) in WIND {
            push_spec(&mut specs, stem, field, op, lookback);
        }
    }

    for lookback in LOOKBACKS_SHORT {
        push_spec(
            &mut specs,
            "ps",
            Measurement::SurfacePressure,
            AggOp::Mean,
            lookback,
        );
    }

    specs
}

fn push_spec(
    specs: &mut Vec<FeatureSpec>,
    stem: &str,
    field: Measurement,
    op: AggOp,
    lookback_days: u32,
) {
    specs.push(FeatureSpec {
        name: format!("{stem}_{}_{lookback_days}d", op.as_str()),
        field,
        op,
        lookback_days,
    });
}

pub fn build_feature_schema(cfg: &FeatureBuildConfig) -> FeatureSchema {
    let mut columns: Vec<String> = feature_catalogue()
        .into_iter()
        .map(|spec| spec.name)
        .collect();
    columns.extend(DERIVED_COLUMNS.iter().map(|name| (*name).to_string()));

    let fingerprint = schema_fingerprint(cfg.schema_version, &columns);

    info!(
        component = "features",
        event = "features.schema.built",
        version = cfg.schema_version,
        column_count = columns.len(),
        fingerprint = %fingerprint
    );

    FeatureSchema {
        version: cfg.schema_version,
        fingerprint,
        columns,
    }
}

/// Label points discovered in the sorted series, in encounter order.
pub fn scored_labels(series: &DailySeries) -> Vec<LabelPoint> {
    series
        .rows
        .iter()
        .filter(|row| row.score.is_some())
        .map(|row| LabelPoint {
            date: row.date,
            score: row.score,
        })
        .collect()
}

/// Rows satisfying `d - L < date <= d`. The slice must be sorted by date.
pub fn resolve_window(
    rows: &[DailyObservation],
    label_date: NaiveDate,
    lookback_days: u32,
) -> Result<&[DailyObservation], FeatureError> {
    let open_start = label_date
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .ok_or(FeatureError::LookbackUnderflow {
            date: label_date,
            lookback_days,
        })?;

    let lo = rows.partition_point(|row| row.date <= open_start);
    let hi = rows.partition_point(|row| row.date <= label_date);
    Ok(&rows[lo..hi])
}

/// Applies `op` to the present values of `field` across the window.
///
/// `sum` treats a window with no usable values as 0; `mean` and `max` have
/// no empty identity and yield a missing marker instead.
pub fn aggregate(window: &[DailyObservation], field: Measurement, op: AggOp) -> Option<f64> {
    let mut count = 0u64;
    let mut acc = match op {
        AggOp::Max => f64::NEG_INFINITY,
        _ => 0.0,
    };

    for obs in window {
        let Some(value) = field.value(obs) else {
            continue;
        };
        count += 1;
        match op {
            AggOp::Sum | AggOp::Mean => acc += value,
            AggOp::Max => acc = acc.max(value),
        }
    }

    match op {
        AggOp::Sum => Some(acc),
        AggOp::Mean => (count > 0).then(|| acc / count as f64),
        AggOp::Max => (count > 0).then_some(acc),
    }
}

/// Builds one feature record per label point, ascending by label date.
pub fn build_features(
    series: &DailySeries,
    labels: &[LabelPoint],
    cfg: &FeatureBuildConfig,
) -> Result<(FeatureSchema, Vec<FeatureRecord>, FeatureBuildReport), FeatureError> {
    validate_config(cfg)?;
    validate_series(series)?;
    if labels.is_empty() {
        return Err(FeatureError::EmptyLabels);
    }

    info!(
        component = "features",
        event = "features.build.start",
        fips = series.fips,
        input_days = series.rows.len(),
        label_count = labels.len()
    );

    let schema = build_feature_schema(cfg);
    let catalogue = feature_catalogue();
    let derived = DerivedIndices::resolve(&catalogue);

    let mut ordered = labels.to_vec();
    ordered.sort_by_key(|label| label.date);

    let mut records = Vec::with_capacity(ordered.len());
    let mut missing_cells = 0u64;
    for label in &ordered {
        let record = build_record(series, *label, &catalogue, &derived)?;
        missing_cells += record.values.iter().filter(|cell| cell.is_none()).count() as u64;
        records.push(record);
    }

    let report = FeatureBuildReport {
        input_days: series.rows.len() as u64,
        label_count: ordered.len() as u64,
        output_rows: records.len() as u64,
        missing_cells,
    };

    info!(
        component = "features",
        event = "features.build.finish",
        fips = series.fips,
        output_rows = report.output_rows,
        missing_cells = report.missing_cells
    );

    Ok((schema, records, report))
}

/// Reads the daily series for `fips` from the store and builds the feature
/// table from its scored dates.
pub fn transform_store(
    store_path: &Path,
    fips: u32,
    cfg: &FeatureBuildConfig,
) -> Result<(FeatureSchema, Vec<FeatureRecord>, FeatureBuildReport), FeatureError> {
    validate_config(cfg)?;

    info!(
        component = "features",
        event = "features.transform.start",
        store_path = %store_path.display(),
        fips = fips
    );

    let store = WeatherStore::open(store_path)?;
    let series = store.load_series(fips)?;
    let labels = scored_labels(&series);
    build_features(&series, &labels, cfg)
}

/// Writes `fips,date,score` plus one column per schema entry; missing cells
/// serialize as empty strings.
pub fn write_feature_table(
    path: &Path,
    schema: &FeatureSchema,
    records: &[FeatureRecord],
) -> Result<(), FeatureError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["fips".to_string(), "date".to_string(), "score".to_string()];
    header.extend(schema.columns.iter().cloned());
    writer.write_record(&header)?;

    for record in records {
        if record.values.len() != schema.columns.len() {
            return Err(FeatureError::RecordWidthMismatch {
                expected: schema.columns.len(),
                found: record.values.len(),
            });
        }

        let mut row = Vec::with_capacity(header.len());
        row.push(record.fips.to_string());
        row.push(record.date.format("%Y-%m-%d").to_string());
        row.push(format_cell(record.score));
        row.extend(record.values.iter().map(|cell| format_cell(*cell)));
        writer.write_record(&row)?;
    }
    writer.flush()?;

    info!(
        component = "features",
        event = "features.table.written",
        path = %path.display(),
        rows = records.len(),
        columns = schema.columns.len() + 3
    );

    Ok(())
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn validate_config(cfg: &FeatureBuildConfig) -> Result<(), FeatureError> {
    if cfg.schema_version != FEATURE_SCHEMA_VERSION {
        return Err(FeatureError::InvalidConfig(format!(
            "schema_version must equal FEATURE_SCHEMA_VERSION ({FEATURE_SCHEMA_VERSION})"
        )));
    }
    Ok(())
}

fn validate_series(series: &DailySeries) -> Result<(), FeatureError> {
    if series.rows.is_empty() {
        return Err(FeatureError::EmptySeries);
    }
    for (index, pair) in series.rows.windows(2).enumerate() {
        if pair[1].date < pair[0].date {
            return Err(FeatureError::UnsortedSeries { index: index + 1 });
        }
    }
    Ok(())
}

fn build_record(
    series: &DailySeries,
    label: LabelPoint,
    catalogue: &[FeatureSpec],
    derived: &DerivedIndices,
) -> Result<FeatureRecord, FeatureError> {
    let mut values = Vec::with_capacity(catalogue.len() + DERIVED_COLUMNS.len());
    for spec in catalogue {
        let window = resolve_window(&series.rows, label.date, spec.lookback_days)?;
        values.push(aggregate(window, spec.field, spec.op));
    }
    append_derived(&mut values, derived);

    Ok(FeatureRecord {
        fips: series.fips,
        date: label.date,
        score: label.score,
        values,
    })
}

/// Positions of the aggregate columns the derived fields read from.
struct DerivedIndices {
    prec_sum_7: usize,
    prec_sum_30: usize,
    prec_sum_90: usize,
    t2m_mean_7: usize,
    t2m_mean_30: usize,
    t2m_mean_90: usize,
    t2m_mean_180: usize,
    t2mdew_mean_7: usize,
    t2mdew_mean_30: usize,
}

impl DerivedIndices {
    fn resolve(catalogue: &[FeatureSpec]) -> Self {
        let position = |name: &str| {
            catalogue
                .iter()
                .position(|spec| spec.name == name)
                .expect("catalogue must contain every derived-field input")
        };

        Self {
            prec_sum_7: position("prec_sum_7d"),
            prec_sum_30: position("prec_sum_30d"),
            prec_sum_90: position("prec_sum_90d"),
            t2m_mean_7: position("t2m_mean_7d"),
            t2m_mean_30: position("t2m_mean_30d"),
            t2m_mean_90: position("t2m_mean_90d"),
            t2m_mean_180: position("t2m_mean_180d"),
            t2mdew_mean_7: position("t2mdew_mean_7d"),
            t2mdew_mean_30: position("t2mdew_mean_30d"),
        }
    }
}

fn append_derived(values: &mut Vec<Option<f64>>, idx: &DerivedIndices) {
    let prec_sum_7 = values[idx.prec_sum_7];
    let prec_sum_30 = values[idx.prec_sum_30];
    let prec_sum_90 = values[idx.prec_sum_90];
    let t2m_mean_7 = values[idx.t2m_mean_7];
    let t2m_mean_30 = values[idx.t2m_mean_30];
    let t2m_mean_90 = values[idx.t2m_mean_90];
    let t2m_mean_180 = values[idx.t2m_mean_180];
    let t2mdew_mean_7 = values[idx.t2mdew_mean_7];
    let t2mdew_mean_30 = values[idx.t2mdew_mean_30];

    values.extend([
        diff(prec_sum_30, prec_sum_90.map(|v| v / 3.0)),
        diff(prec_sum_7, prec_sum_30.map(|v| v / 4.3)),
        diff(t2m_mean_7, t2m_mean_90),
        diff(t2m_mean_30, t2m_mean_180),
        diff(t2m_mean_7, t2mdew_mean_7),
        diff(t2m_mean_30, t2mdew_mean_30),
    ]);
}

fn diff(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

fn schema_fingerprint(version: u32, columns: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("version:{version};"));
    hasher.update("columns:");
    for column in columns {
        hasher.update(column.as_bytes());
        hasher.update(";");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i32, month: u32, dayno: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, dayno).expect("valid test date")
    }

    fn observation(date: NaiveDate, t2m: Option<f64>) -> DailyObservation {
        DailyObservation {
            date,
            score: None,
            prectot: Some(1.0),
            ps: None,
            qv2m: None,
            t2m,
            t2mdew: None,
            t2mwet: None,
            t2m_max: None,
            t2m_min: None,
            t2m_range: None,
            ts: None,
            ws10m: None,
            ws10m_max: None,
            ws10m_min: None,
            ws10m_range: None,
            ws50m: None,
            ws50m_max: None,
            ws50m_min: None,
            ws50m_range: None,
        }
    }

    fn daily_run(start: NaiveDate, days: u32) -> Vec<DailyObservation> {
        (0..days)
            .map(|offset| {
                let date = start
                    .checked_add_days(Days::new(u64::from(offset)))
                    .expect("next day should exist");
                observation(date, Some(10.0))
            })
            .collect()
    }

    #[test]
    fn catalogue_reproduces_every_required_combination() {
        let catalogue = feature_catalogue();
        assert_eq!(catalogue.len(), 53);

        // Spot-check the block boundaries of the declared order.
        assert_eq!(catalogue[0].name, "prec_sum_7d");
        assert_eq!(catalogue[3].name, "prec_sum_180d");
        assert_eq!(catalogue[4].name, "t2m_mean_7d");
        assert_eq!(catalogue[5].name, "t2m_max_mean_7d");
        assert_eq!(catalogue[23].name, "ts_mean_180d");
        assert_eq!(catalogue[24].name, "t2m_max_7d");
        assert_eq!(catalogue[25].name, "t2m_max_30d");
        assert_eq!(catalogue[26].name, "qv2m_mean_7d");
        assert_eq!(catalogue[34].name, "t2mwet_mean_90d");
        assert_eq!(catalogue[35].name, "ws10m_mean_7d");
        assert_eq!(catalogue[36].name, "ws10m_max_7d");
        assert_eq!(catalogue[50].name, "ws50m_range_mean_30d");
        assert_eq!(catalogue[51].name, "ps_mean_7d");
        assert_eq!(catalogue[52].name, "ps_mean_30d");

        let sums = catalogue.iter().filter(|s| s.op == AggOp::Sum).count();
        let maxes = catalogue.iter().filter(|s| s.op == AggOp::Max).count();
        assert_eq!(sums, 4);
        assert_eq!(maxes, 6);

        // Precipitation is summed over every lookback.
        let prec_lookbacks: Vec<u32> = catalogue
            .iter()
            .filter(|s| s.field == Measurement::Precipitation)
            .map(|s| s.lookback_days)
            .collect();
        assert_eq!(prec_lookbacks, vec![7, 30, 90, 180]);
    }

    #[test]
    fn window_boundaries_are_half_open() {
        let anchor = day(2020, 6, 30);
        let rows = vec![
            observation(day(2020, 6, 23), Some(1.0)), // exactly d - 7: excluded
            observation(day(2020, 6, 24), Some(2.0)), // d - 7 + 1: included
            observation(anchor, Some(3.0)),           // d itself: included
        ];

        let window = resolve_window(&rows, anchor, 7).expect("window resolves");
        let dates: Vec<NaiveDate> = window.iter().map(|row| row.date).collect();
        assert_eq!(dates, vec![day(2020, 6, 24), anchor]);
    }

    #[test]
    fn windows_nest_monotonically() {
        let rows = daily_run(day(2020, 1, 1), 200);
        let anchor = rows.last().expect("non-empty run").date;

        let w7 = resolve_window(&rows, anchor, 7).expect("7d window");
        let w30 = resolve_window(&rows, anchor, 30).expect("30d window");
        let w90 = resolve_window(&rows, anchor, 90).expect("90d window");
        let w180 = resolve_window(&rows, anchor, 180).expect("180d window");

        assert_eq!(w7.len(), 7);
        assert_eq!(w30.len(), 30);
        assert_eq!(w90.len(), 90);
        assert_eq!(w180.len(), 180);
        assert_eq!(&w30[w30.len() - w7.len()..], w7);
        assert_eq!(&w90[w90.len() - w30.len()..], w30);
        assert_eq!(&w180[w180.len() - w90.len()..], w90);
    }

    #[test]
    fn sum_is_zero_on_empty_window_and_mean_max_are_missing() {
        let empty: &[DailyObservation] = &[];
        assert_eq!(
            aggregate(empty, Measurement::Precipitation, AggOp::Sum),
            Some(0.0)
        );
        assert_eq!(aggregate(empty, Measurement::MeanTemp, AggOp::Mean), None);
        assert_eq!(aggregate(empty, Measurement::MaxTemp, AggOp::Max), None);
    }

    #[test]
    fn aggregates_skip_missing_values_inside_the_window() {
        let rows = vec![
            observation(day(2020, 1, 1), Some(10.0)),
            observation(day(2020, 1, 2), None),
            observation(day(2020, 1, 3), Some(20.0)),
        ];

        assert_eq!(
            aggregate(&rows, Measurement::MeanTemp, AggOp::Mean),
            Some(15.0)
        );

        let all_missing = vec![
            observation(day(2020, 1, 1), None),
            observation(day(2020, 1, 2), None),
        ];
        assert_eq!(
            aggregate(&all_missing, Measurement::MeanTemp, AggOp::Mean),
            None
        );
        // Precipitation is present on both days, so the sum still counts it.
        assert_eq!(
            aggregate(&all_missing, Measurement::Precipitation, AggOp::Sum),
            Some(2.0)
        );
    }

    #[test]
    fn schema_appends_derived_columns_after_catalogue() {
        let schema = build_feature_schema(&FeatureBuildConfig::default());
        assert_eq!(schema.columns.len(), 59);
        assert_eq!(schema.columns[53], "prec_deficit_30v90d");
        assert_eq!(schema.columns[58], "vpd_proxy_30d");
        assert_eq!(schema.version, FEATURE_SCHEMA_VERSION);
    }

    #[test]
    fn unsorted_series_is_rejected() {
        let series = DailySeries {
            fips: 6107,
            rows: vec![
                observation(day(2020, 1, 2), Some(1.0)),
                observation(day(2020, 1, 1), Some(1.0)),
            ],
        };
        let labels = vec![LabelPoint {
            date: day(2020, 1, 2),
            score: Some(1.0),
        }];

        let err = build_features(&series, &labels, &FeatureBuildConfig::default())
            .expect_err("must fail");
        assert!(matches!(err, FeatureError::UnsortedSeries { index: 1 }));
    }

    #[test]
    fn wrong_schema_version_is_rejected() {
        let series = DailySeries {
            fips: 6107,
            rows: vec![observation(day(2020, 1, 1), Some(1.0))],
        };
        let labels = vec![LabelPoint {
            date: day(2020, 1, 1),
            score: Some(1.0),
        }];
        let cfg = FeatureBuildConfig {
            schema_version: FEATURE_SCHEMA_VERSION + 1,
        };

        let err = build_features(&series, &labels, &cfg).expect_err("must fail");
        assert!(matches!(err, FeatureError::InvalidConfig(_)));
    }
}
