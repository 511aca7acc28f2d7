use std::io;
use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::{Days, NaiveDate};
use droughtfeat::{
    build_features, log_app_start, DailyObservation, DailySeries, FeatureBuildConfig, LabelPoint,
    LoggingConfig,
};
use tracing::dispatcher::with_default;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriter;

#[derive(Clone, Default)]
struct SharedWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedWriter {
    fn output_string(&self) -> String {
        let bytes = self
            .inner
            .lock()
            .expect("writer lock should not be poisoned");
        String::from_utf8_lossy(&bytes).to_string()
    }
}

struct SharedWriterGuard {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SharedWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedWriterGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Write for SharedWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut out = self
            .inner
            .lock()
            .expect("writer lock should not be poisoned");
        out.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_logs(max_level: Level, f: impl FnOnce()) -> String {
    let writer = SharedWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_max_level(max_level)
        .with_writer(writer.clone())
        .finish();
    let dispatch = tracing::Dispatch::new(subscriber);

    with_default(&dispatch, f);
    writer.output_string()
}

fn day(year: i32, month: u32, dayno: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dayno).expect("valid test date")
}

fn sample_series(days: u64) -> DailySeries {
    let rows = (0..days)
        .map(|offset| {
            let date = day(2020, 1, 1)
                .checked_add_days(Days::new(offset))
                .expect("next day should exist");
            DailyObservation {
                date,
                score: None,
                prectot: Some(1.0),
                ps: Some(85.0),
                qv2m: Some(4.0),
                t2m: Some(10.0),
                t2mdew: Some(2.0),
                t2mwet: Some(6.0),
                t2m_max: Some(17.0),
                t2m_min: Some(3.0),
                t2m_range: Some(14.0),
                ts: Some(11.0),
                ws10m: Some(2.0),
                ws10m_max: Some(4.0),
                ws10m_min: Some(1.0),
                ws10m_range: Some(3.0),
                ws50m: Some(3.0),
                ws50m_max: Some(5.0),
                ws50m_min: Some(2.0),
                ws50m_range: Some(3.5),
            }
        })
        .collect();
    DailySeries { fips: 6107, rows }
}

#[test]
fn feature_build_emits_lifecycle_events() {
    let series = sample_series(40);
    let labels = vec![LabelPoint {
        date: day(2020, 2, 9),
        score: Some(1.0),
    }];

    let logs = capture_logs(Level::INFO, || {
        build_features(&series, &labels, &FeatureBuildConfig::default())
            .expect("build succeeds");
    });

    assert!(logs.contains("\"event\":\"features.build.start\""));
    assert!(logs.contains("\"event\":\"features.schema.built\""));
    assert!(logs.contains("\"event\":\"features.build.finish\""));
}

#[test]
fn app_start_helper_emits_baseline_event() {
    let logs = capture_logs(Level::INFO, || {
        let cfg = LoggingConfig::default();
        log_app_start("drought_feature_export", &cfg);
    });

    assert!(logs.contains("\"event\":\"app.start\""));
    assert!(logs.contains("drought_feature_export"));
}
