use std::path::PathBuf;

use droughtfeat::{
    init_logging, log_app_start, transform_store, write_feature_table, FeatureBuildConfig,
    LoggingConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging = LoggingConfig::from_env();
    init_logging(&logging)?;
    log_app_start("drought_feature_export", &logging);

    let store_path = std::env::var("DROUGHTFEAT_STORE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/weather_daily.sqlite"));
    let fips = parse_fips();
    let output_path = std::env::var("DROUGHTFEAT_FEATURES_CSV")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(format!("data/fips_{fips}_drought_features.csv")));

    println!(
        "Feature export start | store={} output={} fips={}",
        store_path.display(),
        output_path.display(),
        fips
    );

    let cfg = FeatureBuildConfig::default();
    let (schema, records, report) = transform_store(&store_path, fips, &cfg)?;
    write_feature_table(&output_path, &schema, &records)?;

    println!(
        "Feature table written | rows={} columns={} fingerprint={}",
        records.len(),
        schema.columns.len() + 3,
        schema.fingerprint
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

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
