use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::SchemaError,
    model::{NormalizedRecord, RawWeatherRecord},
};

const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Validate an opaque provider value into a [`RawWeatherRecord`].
pub fn parse_raw(value: &Value) -> Result<RawWeatherRecord, SchemaError> {
    Ok(RawWeatherRecord::deserialize(value)?)
}

/// Convert one raw record into the internal schema.
///
/// An absent record yields `Ok(None)`. A present record with an empty
/// description list, an unrepresentable timestamp or out-of-range humidity
/// or wind fails with [`SchemaError`].
pub fn normalize(raw: Option<&RawWeatherRecord>) -> Result<Option<NormalizedRecord>, SchemaError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let timestamp =
        DateTime::from_timestamp(raw.dt, 0).ok_or(SchemaError::InvalidTimestamp(raw.dt))?;

    let description = raw
        .weather
        .first()
        .map(|w| w.description.clone())
        .ok_or(SchemaError::EmptyDescription)?;

    let humidity_pct = raw.main.humidity;
    if !(0.0..=100.0).contains(&humidity_pct) {
        return Err(SchemaError::HumidityOutOfRange(humidity_pct));
    }

    let wind_speed = raw.wind.speed;
    if wind_speed.is_nan() || wind_speed < 0.0 {
        return Err(SchemaError::NegativeWindSpeed(wind_speed));
    }

    Ok(Some(NormalizedRecord {
        timestamp,
        temperature_c: kelvin_to_celsius(raw.main.temp),
        humidity_pct,
        wind_speed,
        description,
    }))
}

/// [`parse_raw`] followed by [`normalize`].
pub fn normalize_value(value: Option<&Value>) -> Result<Option<NormalizedRecord>, SchemaError> {
    let raw = value.map(parse_raw).transpose()?;
    normalize(raw.as_ref())
}
