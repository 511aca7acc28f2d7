use std::path::PathBuf;

use droughtfeat::{compute_coverage, init_logging, log_app_start, LoggingConfig, WeatherStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging = LoggingConfig::from_env();
    init_logging(&logging)?;
    log_app_start("daily_gap_audit", &logging);

    let store_path = std::env::var("DROUGHTFEAT_STORE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/weather_daily.sqlite"));
    let fips = parse_fips();

    println!(
        "Running daily coverage audit | store={} fips={}",
        store_path.display(),
        fips
    );

    let store = WeatherStore::open(&store_path)?;
    let series = store.load_series(fips)?;
    if series.rows.is_empty() {
        return Err(format!("store holds no rows for fips {fips}").into());
    }

    let coverage = compute_coverage(&series.rows);
    println!(
        "coverage | expected_days={} actual_days={} missing_days={} duplicate_dates={}",
        coverage.expected_days,
        coverage.actual_days,
        coverage.missing_days,
        coverage.duplicate_dates
    );

    for (gap_start, gap_end) in &coverage.gap_ranges {
        println!("  gap {gap_start} -> {gap_end}");
    }
    if coverage.total_gap_ranges as usize > coverage.gap_ranges.len() {
        println!(
            "  ({} further gap ranges not listed)",
            coverage.total_gap_ranges as usize - coverage.gap_ranges.len()
        );
    }

    if coverage.missing_days == 0 {
        println!("RESULT: no calendar gaps detected.");
    } else {
        println!(
            "RESULT: {} missing days across {} gap ranges.",
            coverage.missing_days, coverage.total_gap_ranges
        );
    }

    Ok(())
}

fn parse_fips() -> u32 {
    if let Ok(raw) = std::env::var("DROUGHTFEAT_FIPS") {
        raw.trim()
            .parse()
            .expect("DROUGHTFEAT_FIPS must be a positive integer")
    } else {
        6107
    }
}
