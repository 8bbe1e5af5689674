//! Normalizer → Aggregator → Classifier for one city.
//!
//! The current-weather record and the forecast list run as independent
//! pipeline instances, so a bad current record never blocks the forecast
//! and vice versa.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    aggregate::aggregate,
    classify::classify,
    error::{PipelineError, SchemaError},
    model::{ClassifiedDay, DailyStats, MalformedRecordPolicy, NormalizedRecord, ThresholdConfig},
    normalize::normalize_value,
};

#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    thresholds: ThresholdConfig,
    policy: MalformedRecordPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutput {
    pub hourly: Vec<NormalizedRecord>,
    pub daily: Vec<ClassifiedDay>,
    /// Entries dropped under [`MalformedRecordPolicy::Skip`].
    pub skipped: usize,
}

impl ForecastOutput {
    pub fn daily_stats(&self) -> Vec<DailyStats> {
        self.daily.iter().map(|d| d.stats.clone()).collect()
    }
}

#[derive(Debug)]
pub struct PipelineReport {
    pub current: Result<Option<NormalizedRecord>, SchemaError>,
    pub forecast: Result<Option<ForecastOutput>, PipelineError>,
}

impl Pipeline {
    pub fn new(thresholds: ThresholdConfig, policy: MalformedRecordPolicy) -> Self {
        Self { thresholds, policy }
    }

    pub fn process_current(&self, raw: Option<&Value>) -> Result<Option<NormalizedRecord>, SchemaError> {
        let current = normalize_value(raw)?;
        debug!(present = current.is_some(), "normalized current weather");
        Ok(current)
    }

    pub fn process_forecast(
        &self,
        raw: Option<&[Value]>,
    ) -> Result<Option<ForecastOutput>, PipelineError> {
        let Some(entries) = raw else {
            return Ok(None);
        };

        let mut hourly = Vec::with_capacity(entries.len());
        let mut skipped = 0;

        for (index, entry) in entries.iter().enumerate() {
            match normalize_value(Some(entry)) {
                Ok(Some(record)) => hourly.push(record),
                Ok(None) => {}
                Err(source) => match self.policy {
                    MalformedRecordPolicy::Abort => {
                        return Err(PipelineError::Schema { index, source });
                    }
                    MalformedRecordPolicy::Skip => {
                        warn!(index, error = %source, "skipping malformed forecast entry");
                        skipped += 1;
                    }
                },
            }
        }

        let daily = aggregate(Some(hourly.as_slice()))?.unwrap_or_default();

        Ok(Some(ForecastOutput {
            hourly,
            daily: self.classify_days(daily),
            skipped,
        }))
    }

    pub fn classify_days(&self, daily: Vec<DailyStats>) -> Vec<ClassifiedDay> {
        daily
            .into_iter()
            .map(|stats| {
                let category = classify(&stats, &self.thresholds);
                ClassifiedDay { stats, category }
            })
            .collect()
    }

    pub fn run(&self, current: Option<&Value>, forecast: Option<&[Value]>) -> PipelineReport {
        PipelineReport {
            current: self.process_current(current),
            forecast: self.process_forecast(forecast),
        }
    }
}
