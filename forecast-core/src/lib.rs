//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - The weather data pipeline: normalization, daily aggregation, classification
//! - Abstraction over the weather data provider
//! - CSV persistence of the pipeline outputs
//! - Configuration handling
//!
//! The pipeline modules (`normalize`, `aggregate`, `classify`) are pure and
//! perform no I/O; `provider` and `storage` are the thin collaborators around
//! them.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod provider;
pub mod storage;

pub use aggregate::aggregate;
pub use classify::{CLASSIFICATION_RULES, classify};
pub use config::Config;
pub use error::{AggregateError, PipelineError, SchemaError};
pub use model::{
    ClassifiedDay, DailyStats, MalformedRecordPolicy, NormalizedRecord, RawWeatherRecord,
    ThresholdConfig, WeatherCategory,
};
pub use normalize::{normalize, normalize_value};
pub use pipeline::{ForecastOutput, Pipeline, PipelineReport};
pub use provider::{OpenWeatherFetcher, WeatherFetcher};
pub use storage::CsvStore;
