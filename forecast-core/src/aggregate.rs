use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    error::AggregateError,
    model::{DailyStats, NormalizedRecord},
};

/// Group records by calendar date and reduce each group to min/max per metric.
///
/// The date is the timestamp's own date; no timezone conversion happens here.
/// Absent input yields `Ok(None)`, an empty slice yields `Ok(Some(vec![]))`.
/// Rows come out in ascending date order.
pub fn aggregate(
    records: Option<&[NormalizedRecord]>,
) -> Result<Option<Vec<DailyStats>>, AggregateError> {
    let Some(records) = records else {
        return Ok(None);
    };

    let mut groups: BTreeMap<NaiveDate, Vec<&NormalizedRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.timestamp.date_naive()).or_default().push(record);
    }

    let daily = groups
        .into_iter()
        .map(|(date, group)| reduce_group(date, &group))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(records = records.len(), days = daily.len(), "aggregated forecast");

    Ok(Some(daily))
}

fn reduce_group(date: NaiveDate, group: &[&NormalizedRecord]) -> Result<DailyStats, AggregateError> {
    let (first, rest) = group.split_first().ok_or(AggregateError::EmptyGroup(date))?;

    let mut stats = DailyStats {
        date,
        min_temp_c: first.temperature_c,
        max_temp_c: first.temperature_c,
        min_humidity_pct: first.humidity_pct,
        max_humidity_pct: first.humidity_pct,
        min_wind_speed: first.wind_speed,
        max_wind_speed: first.wind_speed,
    };

    for record in rest {
        stats.min_temp_c = stats.min_temp_c.min(record.temperature_c);
        stats.max_temp_c = stats.max_temp_c.max(record.temperature_c);
        stats.min_humidity_pct = stats.min_humidity_pct.min(record.humidity_pct);
        stats.max_humidity_pct = stats.max_humidity_pct.max(record.humidity_pct);
        stats.min_wind_speed = stats.min_wind_speed.min(record.wind_speed);
        stats.max_wind_speed = stats.max_wind_speed.max(record.wind_speed);
    }

    Ok(stats)
}
