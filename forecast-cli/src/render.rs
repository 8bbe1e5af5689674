//! Plain-text rendering of pipeline results.

use forecast_core::{ClassifiedDay, Config, NormalizedRecord};

const CHART_WIDTH: usize = 40;

pub fn current(record: &NormalizedRecord) -> String {
    format!(
        "Now ({}): {:.1} °C, humidity {:.0}%, wind {:.1} m/s, {}\n",
        record.timestamp.format("%Y-%m-%d %H:%M UTC"),
        record.temperature_c,
        record.humidity_pct,
        record.wind_speed,
        record.description,
    )
}

pub fn cities(config: &Config) -> String {
    let default = config.default_city().ok();
    let mut out = String::new();
    for city in &config.cities {
        let marker = if Some(city.as_str()) == default { "*" } else { " " };
        out.push_str(&format!("{marker} {city}\n"));
    }
    out
}

pub fn daily_table(days: &[ClassifiedDay]) -> String {
    if days.is_empty() {
        return "No daily statistics.\n".to_string();
    }

    let mut out = format!(
        "{:<10}  {:<13}  {:>13}  {:>13}  {:>13}\n",
        "Date", "Weather", "Temp (C)", "Humidity (%)", "Wind (m/s)"
    );
    for day in days {
        let s = &day.stats;
        out.push_str(&format!(
            "{:<10}  {:<13}  {:>13}  {:>13}  {:>13}\n",
            s.date.to_string(),
            day.category.as_str(),
            format!("{:.1}..{:.1}", s.min_temp_c, s.max_temp_c),
            format!("{:.0}..{:.0}", s.min_humidity_pct, s.max_humidity_pct),
            format!("{:.1}..{:.1}", s.min_wind_speed, s.max_wind_speed),
        ));
    }
    out
}

/// One bar per day spanning its min..max temperature on a shared scale.
pub fn temperature_chart(days: &[ClassifiedDay]) -> String {
    if days.is_empty() {
        return String::new();
    }

    let lo = days.iter().map(|d| d.stats.min_temp_c).fold(f64::INFINITY, f64::min);
    let hi = days.iter().map(|d| d.stats.max_temp_c).fold(f64::NEG_INFINITY, f64::max);

    let mut out = format!("Temperature {lo:.1} °C .. {hi:.1} °C\n");
    for day in days {
        let start = scale(day.stats.min_temp_c, lo, hi);
        let end = scale(day.stats.max_temp_c, lo, hi).max(start);

        let bar: String = (0..CHART_WIDTH)
            .map(|i| if (start..=end).contains(&i) { '█' } else { ' ' })
            .collect();
        out.push_str(&format!("{}  |{}|  {}\n", day.stats.date, bar, day.category));
    }
    out
}

fn scale(value: f64, lo: f64, hi: f64) -> usize {
    let span = hi - lo;
    if span <= 0.0 {
        return 0;
    }
    let pos = ((value - lo) / span * (CHART_WIDTH - 1) as f64).round();
    (pos.max(0.0) as usize).min(CHART_WIDTH - 1)
}
