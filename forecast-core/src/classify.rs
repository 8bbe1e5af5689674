use crate::model::{DailyStats, ThresholdConfig, WeatherCategory};

pub type Rule = fn(&DailyStats, &ThresholdConfig) -> bool;

/// Classification rules in priority order. The first predicate that holds
/// decides the category; [`WeatherCategory::PartlyCloudy`] is the fallback.
pub const CLASSIFICATION_RULES: &[(Rule, WeatherCategory)] = &[
    (is_sunny as Rule, WeatherCategory::Sunny),
    (is_rainy as Rule, WeatherCategory::Rainy),
];

fn is_sunny(day: &DailyStats, t: &ThresholdConfig) -> bool {
    day.max_temp_c > t.sunny_temp_threshold && day.max_humidity_pct < t.rainy_humidity_threshold
}

fn is_rainy(day: &DailyStats, t: &ThresholdConfig) -> bool {
    day.min_temp_c < t.rainy_min_temp_threshold || day.max_humidity_pct > t.rainy_humidity_threshold
}

pub fn classify(day: &DailyStats, thresholds: &ThresholdConfig) -> WeatherCategory {
    CLASSIFICATION_RULES
        .iter()
        .find(|(rule, _)| rule(day, thresholds))
        .map(|(_, category)| *category)
        .unwrap_or(WeatherCategory::PartlyCloudy)
}
