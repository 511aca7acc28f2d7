use std::path::PathBuf;

use droughtfeat::{init_logging, load_daily_csv, log_app_start, LoggingConfig, WeatherStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging = LoggingConfig::from_env();
    init_logging(&logging)?;
    log_app_start("weather_store_sync", &logging);

    let input_path = env_path("DROUGHTFEAT_DAILY_CSV", "data/drought_daily.csv");
    let store_path = env_path("DROUGHTFEAT_STORE_PATH", "data/weather_daily.sqlite");
    let fips = parse_fips();

    println!(
        "Daily store sync start | input={} store={} fips={}",
        input_path.display(),
        store_path.display(),
        fips
    );

    let loaded = load_daily_csv(&input_path, fips)?;
    println!(
        "loaded {} rows | expected_days={} missing_days={} duplicate_dates={} gap_ranges={} skipped_other_units={}",
        loaded.series.rows.len(),
        loaded.coverage.expected_days,
        loaded.coverage.missing_days,
        loaded.coverage.duplicate_dates,
        loaded.coverage.total_gap_ranges,
        loaded.skipped_other_units
    );

    let mut store = WeatherStore::open(&store_path)?;
    store.upsert_days(fips, &loaded.series.rows)?;

    let first_date = loaded
        .series
        .rows
        .first()
        .expect("loader rejects empty series")
        .date;
    let last_date = loaded
        .series
        .rows
        .last()
        .expect("loader rejects empty series")
        .date;
    let stored = store.count_range(fips, first_date, last_date)?;
    println!("store now holds {stored} rows for fips {fips} in {first_date}..={last_date}");

    Ok(())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
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
