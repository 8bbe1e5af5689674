use chrono::NaiveDate;
use thiserror::Error;

/// A raw provider record that does not have the expected shape.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Malformed weather record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Weather record has an empty description list")]
    EmptyDescription,

    #[error("Weather record timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    #[error("Weather record humidity {0} is outside 0..=100")]
    HumidityOutOfRange(f64),

    #[error("Weather record wind speed {0} is negative")]
    NegativeWindSpeed(f64),
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("No records grouped under {0}")]
    EmptyGroup(NaiveDate),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Forecast entry #{index} failed validation")]
    Schema {
        index: usize,
        #[source]
        source: SchemaError,
    },

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}
