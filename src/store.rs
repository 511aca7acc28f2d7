//! Local SQLite store for curated daily weather rows.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use thiserror::Error;
use tracing::info;

use crate::daily_weather::{DailyObservation, DailySeries};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid stored date '{raw}' for fips {fips}")]
    InvalidStoredDate { fips: u32, raw: String },
}

pub struct WeatherStore {
    conn: Connection,
}

impl WeatherStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
            ",
        )?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS daily_weather (
                fips INTEGER NOT NULL,
                date TEXT NOT NULL,
                score REAL,
                prectot REAL,
                ps REAL,
                qv2m REAL,
                t2m REAL,
                t2mdew REAL,
                t2mwet REAL,
                t2m_max REAL,
                t2m_min REAL,
                t2m_range REAL,
                ts REAL,
                ws10m REAL,
                ws10m_max REAL,
                ws10m_min REAL,
                ws10m_range REAL,
                ws50m REAL,
                ws50m_max REAL,
                ws50m_min REAL,
                ws50m_range REAL,
                PRIMARY KEY(fips, date)
            ) WITHOUT ROWID;
            ",
        )?;

        Ok(Self { conn })
    }

    /// Inserts or refreshes one transaction's worth of daily rows.
    pub fn upsert_days(&mut self, fips: u32, rows: &[DailyObservation]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO daily_weather (
                    fips, date, score,
                    prectot, ps, qv2m,
                    t2m, t2mdew, t2mwet, t2m_max, t2m_min, t2m_range, ts,
                    ws10m, ws10m_max, ws10m_min, ws10m_range,
                    ws50m, ws50m_max, ws50m_min, ws50m_range
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                    ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21
                )
                ON CONFLICT(fips, date) DO UPDATE SET
                    score = excluded.score,
                    prectot = excluded.prectot,
                    ps = excluded.ps,
                    qv2m = excluded.qv2m,
                    t2m = excluded.t2m,
                    t2mdew = excluded.t2mdew,
                    t2mwet = excluded.t2mwet,
                    t2m_max = excluded.t2m_max,
                    t2m_min = excluded.t2m_min,
                    t2m_range = excluded.t2m_range,
                    ts = excluded.ts,
                    ws10m = excluded.ws10m,
                    ws10m_max = excluded.ws10m_max,
                    ws10m_min = excluded.ws10m_min,
                    ws10m_range = excluded.ws10m_range,
                    ws50m = excluded.ws50m,
                    ws50m_max = excluded.ws50m_max,
                    ws50m_min = excluded.ws50m_min,
                    ws50m_range = excluded.ws50m_range
                ",
            )?;

            for row in rows {
                stmt.execute(params![
                    fips,
                    row.date.format(DATE_FORMAT).to_string(),
                    row.score,
                    row.prectot,
                    row.ps,
                    row.qv2m,
                    row.t2m,
                    row.t2mdew,
                    row.t2mwet,
                    row.t2m_max,
                    row.t2m_min,
                    row.t2m_range,
                    row.ts,
                    row.ws10m,
                    row.ws10m_max,
                    row.ws10m_min,
                    row.ws10m_range,
                    row.ws50m,
                    row.ws50m_max,
                    row.ws50m_min,
                    row.ws50m_range,
                ])?;
            }
        }
        tx.commit()?;

        info!(
            component = "store",
            event = "store.upsert.finish",
            fips = fips,
            rows = rows.len()
        );

        Ok(())
    }

    /// Reads the full daily series for `fips`, ascending by date.
    pub fn load_series(&self, fips: u32) -> Result<DailySeries, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT
                date, score,
                prectot, ps, qv2m,
                t2m, t2mdew, t2mwet, t2m_max, t2m_min, t2m_range, ts,
                ws10m, ws10m_max, ws10m_min, ws10m_range,
                ws50m, ws50m_max, ws50m_min, ws50m_range
            FROM daily_weather
            WHERE fips = ?1
            ORDER BY date ASC
            ",
        )?;

        let mut rows = stmt.query(params![fips])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(observation_from_row(fips, row)?);
        }

        Ok(DailySeries { fips, rows: out })
    }

    pub fn count_range(
        &self,
        fips: u32,
        start_inclusive: NaiveDate,
        end_inclusive: NaiveDate,
    ) -> Result<u64, StoreError> {
        let count: i64 = self.conn.query_row(
            "
            SELECT COUNT(*)
            FROM daily_weather
            WHERE fips = ?1
              AND date >= ?2
              AND date <= ?3
            ",
            params![
                fips,
                start_inclusive.format(DATE_FORMAT).to_string(),
                end_inclusive.format(DATE_FORMAT).to_string()
            ],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn observation_from_row(fips: u32, row: &Row<'_>) -> Result<DailyObservation, StoreError> {
    let raw_date: String = row.get(0)?;
    let date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
        .map_err(|_| StoreError::InvalidStoredDate {
            fips,
            raw: raw_date,
        })?;

    Ok(DailyObservation {
        date,
        score: row.get(1)?,
        prectot: row.get(2)?,
        ps: row.get(3)?,
        qv2m: row.get(4)?,
        t2m: row.get(5)?,
        t2mdew: row.get(6)?,
        t2mwet: row.get(7)?,
        t2m_max: row.get(8)?,
        t2m_min: row.get(9)?,
        t2m_range: row.get(10)?,
        ts: row.get(11)?,
        ws10m: row.get(12)?,
        ws10m_max: row.get(13)?,
        ws10m_min: row.get(14)?,
        ws10m_range: row.get(15)?,
        ws50m: row.get(16)?,
        ws50m_max: row.get(17)?,
        ws50m_min: row.get(18)?,
        ws50m_range: row.get(19)?,
    })
}
