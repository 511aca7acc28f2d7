//! Daily weather CSV loading and per-county curation.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

const MAX_REPORTED_GAP_RANGES: usize = 256;

/// One curated daily row for the county of interest.
///
/// Every measurement is optional: the source table may carry an empty cell
/// for any field on any day, and the score is present only on scored dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub score: Option<f64>,
    pub prectot: Option<f64>,
    pub ps: Option<f64>,
    pub qv2m: Option<f64>,
    pub t2m: Option<f64>,
    pub t2mdew: Option<f64>,
    pub t2mwet: Option<f64>,
    pub t2m_max: Option<f64>,
    pub t2m_min: Option<f64>,
    pub t2m_range: Option<f64>,
    pub ts: Option<f64>,
    pub ws10m: Option<f64>,
    pub ws10m_max: Option<f64>,
    pub ws10m_min: Option<f64>,
    pub ws10m_range: Option<f64>,
    pub ws50m: Option<f64>,
    pub ws50m_max: Option<f64>,
    pub ws50m_min: Option<f64>,
    pub ws50m_range: Option<f64>,
}

/// A single county's daily series, sorted ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub fips: u32,
    pub rows: Vec<DailyObservation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCoverageReport {
    pub expected_days: u64,
    pub actual_days: u64,
    pub missing_days: u64,
    pub duplicate_dates: u64,
    pub total_gap_ranges: u64,
    pub gap_ranges: Vec<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLoadResult {
    pub series: DailySeries,
    pub coverage: DailyCoverageReport,
    pub skipped_other_units: u64,
}

#[derive(Debug, Error)]
pub enum DailyLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("no rows found for fips {fips} in {path}")]
    NoRowsForUnit { fips: u32, path: PathBuf },
}

#[derive(Debug, Deserialize)]
struct RawDailyRecord {
    fips: u32,
    date: NaiveDate,
    #[serde(rename = "PRECTOT")]
    prectot: Option<f64>,
    #[serde(rename = "PS")]
    ps: Option<f64>,
    #[serde(rename = "QV2M")]
    qv2m: Option<f64>,
    #[serde(rename = "T2M")]
    t2m: Option<f64>,
    #[serde(rename = "T2MDEW")]
    t2mdew: Option<f64>,
    #[serde(rename = "T2MWET")]
    t2mwet: Option<f64>,
    #[serde(rename = "T2M_MAX")]
    t2m_max: Option<f64>,
    #[serde(rename = "T2M_MIN")]
    t2m_min: Option<f64>,
    #[serde(rename = "T2M_RANGE")]
    t2m_range: Option<f64>,
    #[serde(rename = "TS")]
    ts: Option<f64>,
    #[serde(rename = "WS10M")]
    ws10m: Option<f64>,
    #[serde(rename = "WS10M_MAX")]
    ws10m_max: Option<f64>,
    #[serde(rename = "WS10M_MIN")]
    ws10m_min: Option<f64>,
    #[serde(rename = "WS10M_RANGE")]
    ws10m_range: Option<f64>,
    #[serde(rename = "WS50M")]
    ws50m: Option<f64>,
    #[serde(rename = "WS50M_MAX")]
    ws50m_max: Option<f64>,
    #[serde(rename = "WS50M_MIN")]
    ws50m_min: Option<f64>,
    #[serde(rename = "WS50M_RANGE")]
    ws50m_range: Option<f64>,
    score: Option<f64>,
}

impl RawDailyRecord {
    fn into_observation(self) -> DailyObservation {
        DailyObservation {
            date: self.date,
            score: self.score,
            prectot: self.prectot,
            ps: self.ps,
            qv2m: self.qv2m,
            t2m: self.t2m,
            t2mdew: self.t2mdew,
            t2mwet: self.t2mwet,
            t2m_max: self.t2m_max,
            t2m_min: self.t2m_min,
            t2m_range: self.t2m_range,
            ts: self.ts,
            ws10m: self.ws10m,
            ws10m_max: self.ws10m_max,
            ws10m_min: self.ws10m_min,
            ws10m_range: self.ws10m_range,
            ws50m: self.ws50m,
            ws50m_max: self.ws50m_max,
            ws50m_min: self.ws50m_min,
            ws50m_range: self.ws50m_range,
        }
    }
}

/// Loads the raw daily table, keeps only `fips`, and sorts by date.
pub fn load_daily_csv(path: &Path, fips: u32) -> Result<DailyLoadResult, DailyLoadError> {
    info!(
        component = "daily_weather",
        event = "daily.load.start",
        path = %path.display(),
        fips = fips
    );

    let file = File::open(path)?;
    let result = load_daily_reader(file, fips).map_err(|err| match err {
        DailyLoadError::NoRowsForUnit { fips, .. } => DailyLoadError::NoRowsForUnit {
            fips,
            path: path.to_path_buf(),
        },
        other => other,
    })?;

    if result.coverage.missing_days > 0 {
        warn!(
            component = "daily_weather",
            event = "daily.load.gap_detected",
            fips = fips,
            missing_days = result.coverage.missing_days,
            total_gap_ranges = result.coverage.total_gap_ranges,
            reported_gap_ranges = result.coverage.gap_ranges.len()
        );
    }

    info!(
        component = "daily_weather",
        event = "daily.load.finish",
        fips = fips,
        rows = result.series.rows.len(),
        skipped_other_units = result.skipped_other_units,
        expected_days = result.coverage.expected_days,
        missing_days = result.coverage.missing_days,
        duplicate_dates = result.coverage.duplicate_dates
    );

    Ok(result)
}

fn load_daily_reader<R: Read>(reader: R, fips: u32) -> Result<DailyLoadResult, DailyLoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped_other_units = 0u64;
    for record in csv_reader.deserialize::<RawDailyRecord>() {
        let record = record?;
        if record.fips != fips {
            skipped_other_units += 1;
            continue;
        }
        rows.push(record.into_observation());
    }

    if rows.is_empty() {
        return Err(DailyLoadError::NoRowsForUnit {
            fips,
            path: PathBuf::new(),
        });
    }

    rows.sort_by_key(|row| row.date);
    let coverage = compute_coverage(&rows);

    Ok(DailyLoadResult {
        series: DailySeries { fips, rows },
        coverage,
        skipped_other_units,
    })
}

/// Calendar coverage of a sorted daily series. Duplicate dates are counted
/// but not removed.
pub fn compute_coverage(rows: &[DailyObservation]) -> DailyCoverageReport {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return DailyCoverageReport {
            expected_days: 0,
            actual_days: 0,
            missing_days: 0,
            duplicate_dates: 0,
            total_gap_ranges: 0,
            gap_ranges: Vec::new(),
        };
    };

    let expected_days = (last.date - first.date).num_days() as u64 + 1;

    let mut duplicate_dates = 0u64;
    let mut missing_days = 0u64;
    let mut full_gaps = Vec::new();
    for pair in rows.windows(2) {
        let (prev, next) = (pair[0].date, pair[1].date);
        if next == prev {
            duplicate_dates += 1;
            continue;
        }
        let step = (next - prev).num_days();
        if step > 1 {
            missing_days += (step - 1) as u64;
            let gap_start = prev.succ_opt().expect("next day should exist");
            let gap_end = next.pred_opt().expect("previous day should exist");
            full_gaps.push((gap_start, gap_end));
        }
    }

    let total_gap_ranges = full_gaps.len() as u64;
    let gap_ranges = full_gaps
        .into_iter()
        .take(MAX_REPORTED_GAP_RANGES)
        .collect();

    DailyCoverageReport {
        expected_days,
        actual_days: rows.len() as u64,
        missing_days,
        duplicate_dates,
        total_gap_ranges,
        gap_ranges,
    }
}
