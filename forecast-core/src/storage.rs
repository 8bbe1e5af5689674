//! CSV persistence for the three pipeline outputs.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::model::{DailyStats, NormalizedRecord};

pub const CURRENT_FILE: &str = "current_weather_data.csv";
pub const HOURLY_FILE: &str = "hourly_weather_data.csv";
pub const DAILY_FILE: &str = "daily_weather_stats.csv";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize)]
struct RecordRow<'a> {
    #[serde(rename = "Datetime")]
    datetime: String,
    #[serde(rename = "Temperature (C)")]
    temperature_c: f64,
    #[serde(rename = "Humidity (%)")]
    humidity_pct: f64,
    #[serde(rename = "Wind Speed (m/s)")]
    wind_speed: f64,
    #[serde(rename = "Weather")]
    description: &'a str,
}

impl<'a> From<&'a NormalizedRecord> for RecordRow<'a> {
    fn from(r: &'a NormalizedRecord) -> Self {
        Self {
            datetime: r.timestamp.format(DATETIME_FORMAT).to_string(),
            temperature_c: r.temperature_c,
            humidity_pct: r.humidity_pct,
            wind_speed: r.wind_speed,
            description: &r.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DailyRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Min Temperature (C)")]
    min_temp_c: f64,
    #[serde(rename = "Max Temperature (C)")]
    max_temp_c: f64,
    #[serde(rename = "Min Humidity (%)")]
    min_humidity_pct: f64,
    #[serde(rename = "Max Humidity (%)")]
    max_humidity_pct: f64,
    #[serde(rename = "Min Wind Speed (m/s)")]
    min_wind_speed: f64,
    #[serde(rename = "Max Wind Speed (m/s)")]
    max_wind_speed: f64,
}

impl From<&DailyStats> for DailyRow {
    fn from(d: &DailyStats) -> Self {
        Self {
            date: d.date,
            min_temp_c: d.min_temp_c,
            max_temp_c: d.max_temp_c,
            min_humidity_pct: d.min_humidity_pct,
            max_humidity_pct: d.max_humidity_pct,
            min_wind_speed: d.min_wind_speed,
            max_wind_speed: d.max_wind_speed,
        }
    }
}

impl From<DailyRow> for DailyStats {
    fn from(r: DailyRow) -> Self {
        Self {
            date: r.date,
            min_temp_c: r.min_temp_c,
            max_temp_c: r.max_temp_c,
            min_humidity_pct: r.min_humidity_pct,
            max_humidity_pct: r.max_humidity_pct,
            min_wind_speed: r.min_wind_speed,
            max_wind_speed: r.max_wind_speed,
        }
    }
}

/// Writes pipeline outputs as CSV files into one directory.
///
/// Saving an absent or empty dataset does nothing and returns `Ok(None)`;
/// otherwise the written path is returned.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_current(&self, record: Option<&NormalizedRecord>) -> Result<Option<PathBuf>> {
        self.write_rows(CURRENT_FILE, record.into_iter().map(RecordRow::from))
    }

    pub fn save_hourly(&self, records: Option<&[NormalizedRecord]>) -> Result<Option<PathBuf>> {
        self.write_rows(HOURLY_FILE, records.unwrap_or_default().iter().map(RecordRow::from))
    }

    pub fn save_daily(&self, days: Option<&[DailyStats]>) -> Result<Option<PathBuf>> {
        self.write_rows(DAILY_FILE, days.unwrap_or_default().iter().map(DailyRow::from))
    }

    pub fn load_daily(&self) -> Result<Vec<DailyStats>> {
        let path = self.dir.join(DAILY_FILE);
        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("Failed to open daily stats file: {}", path.display()))?;

        reader
            .deserialize::<DailyRow>()
            .map(|row| {
                row.map(DailyStats::from)
                    .with_context(|| format!("Failed to parse daily stats file: {}", path.display()))
            })
            .collect()
    }

    fn write_rows<T, I>(&self, file_name: &str, rows: I) -> Result<Option<PathBuf>>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let mut rows = rows.into_iter().peekable();
        if rows.peek().is_none() {
            info!(file = file_name, "no data to save");
            return Ok(None);
        }

        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create output directory: {}", self.dir.display())
        })?;

        let path = self.dir.join(file_name);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

        let mut count = 0usize;
        for row in rows {
            writer
                .serialize(row)
                .with_context(|| format!("Failed to write CSV row to {}", path.display()))?;
            count += 1;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush CSV file: {}", path.display()))?;

        info!(path = %path.display(), rows = count, "saved weather data");
        Ok(Some(path))
    }
}
