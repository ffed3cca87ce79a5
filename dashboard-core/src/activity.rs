//! Outdoor activity window: which hours of the day are pleasant enough to
//! be outside.

use std::ops::Range;

use crate::model::{HourReading, HourlySeries};

pub const MIN_TEMPERATURE_C: f64 = 15.0;
pub const MAX_TEMPERATURE_C: f64 = 25.0;
/// Exclusive upper bound, in percent.
pub const MAX_PRECIPITATION_PCT: f64 = 20.0;
/// Exclusive upper bound, in km/h.
pub const MAX_WIND_KMH: f64 = 15.0;

/// Hours evaluated by the activity view: one calendar day.
pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suitability {
    Suitable,
    Unsuitable,
}

impl Suitability {
    pub fn is_suitable(&self) -> bool {
        matches!(self, Suitability::Suitable)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Suitability::Suitable => "This time is good for outdoor activity",
            Suitability::Unsuitable => "Not a good time for outdoor activities",
        }
    }
}

/// Classify a single hour. An hour without a wind reading is unsuitable.
pub fn classify(hour: &HourReading) -> Suitability {
    let temperature_ok = (MIN_TEMPERATURE_C..=MAX_TEMPERATURE_C).contains(&hour.temperature);
    let precipitation_ok = hour.precipitation_probability < MAX_PRECIPITATION_PCT;
    let wind_ok = hour.wind_speed.is_some_and(|w| w < MAX_WIND_KMH);

    if temperature_ok && precipitation_ok && wind_ok {
        Suitability::Suitable
    } else {
        Suitability::Unsuitable
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRow {
    /// Hour offset into the series.
    pub index: usize,
    pub reading: HourReading,
    pub suitability: Suitability,
}

/// Classify the hours in `range`. Hours missing a time, temperature or
/// precipitation value produce no row.
pub fn evaluate_range(series: &HourlySeries, range: Range<usize>) -> Vec<ActivityRow> {
    range
        .filter_map(|index| {
            let reading = series.reading(index)?;
            let suitability = classify(&reading);
            Some(ActivityRow { index, reading, suitability })
        })
        .collect()
}

/// Classify the first day of the series.
pub fn evaluate_day(series: &HourlySeries) -> Vec<ActivityRow> {
    evaluate_range(series, 0..HOURS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(temperature: f64, precipitation_probability: f64, wind_speed: Option<f64>) -> HourReading {
        HourReading {
            time: "2024-06-01T12:00".into(),
            temperature,
            precipitation_probability,
            wind_speed,
        }
    }

    #[test]
    fn boundary_values_inside_the_window_are_suitable() {
        assert_eq!(classify(&hour(15.0, 0.0, Some(0.0))), Suitability::Suitable);
        assert_eq!(classify(&hour(25.0, 0.0, Some(0.0))), Suitability::Suitable);
        assert_eq!(classify(&hour(20.0, 19.999, Some(0.0))), Suitability::Suitable);
        assert_eq!(classify(&hour(20.0, 0.0, Some(14.999))), Suitability::Suitable);
    }

    #[test]
    fn boundary_values_outside_the_window_are_unsuitable() {
        assert_eq!(classify(&hour(14.999, 0.0, Some(0.0))), Suitability::Unsuitable);
        assert_eq!(classify(&hour(25.001, 0.0, Some(0.0))), Suitability::Unsuitable);
        assert_eq!(classify(&hour(20.0, 20.0, Some(0.0))), Suitability::Unsuitable);
        assert_eq!(classify(&hour(20.0, 0.0, Some(15.0))), Suitability::Unsuitable);
    }

    #[test]
    fn missing_wind_is_unsuitable() {
        assert_eq!(classify(&hour(20.0, 0.0, None)), Suitability::Unsuitable);
    }

    #[test]
    fn suitability_messages() {
        assert!(Suitability::Suitable.is_suitable());
        assert_eq!(Suitability::Unsuitable.message(), "Not a good time for outdoor activities");
    }

    fn series(hours: usize) -> HourlySeries {
        HourlySeries {
            time: Some((0..hours).map(|h| Some(format!("2024-06-01T{:02}:00", h % 24))).collect()),
            temperature_2m: Some((0..hours).map(|h| Some(10.0 + h as f64 * 0.5)).collect()),
            precipitation_probability: Some(vec![Some(10.0); hours]),
            wind_speed_10m: Some(vec![Some(5.0); hours]),
        }
    }

    #[test]
    fn evaluate_day_covers_only_the_first_24_hours() {
        let rows = evaluate_day(&series(48));
        assert_eq!(rows.len(), HOURS_PER_DAY);
        assert_eq!(rows.last().map(|r| r.index), Some(23));

        // 10.0 + 0.5h lands in [15, 25] for hours 10..=30; within the day that is 10..=23.
        let suitable: Vec<usize> =
            rows.iter().filter(|r| r.suitability.is_suitable()).map(|r| r.index).collect();
        assert_eq!(suitable, (10..24).collect::<Vec<_>>());
    }

    #[test]
    fn evaluate_range_skips_incomplete_hours() {
        let mut s = series(6);
        if let Some(temps) = s.temperature_2m.as_mut() {
            temps[1] = None;
        }
        if let Some(precip) = s.precipitation_probability.as_mut() {
            precip[2] = None;
        }
        if let Some(wind) = s.wind_speed_10m.as_mut() {
            wind[3] = None;
        }

        let rows = evaluate_range(&s, 0..6);
        let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 3, 4, 5]);
        assert_eq!(rows[1].suitability, Suitability::Unsuitable);
    }

    #[test]
    fn evaluate_day_on_short_series_returns_what_exists() {
        assert_eq!(evaluate_day(&series(5)).len(), 5);
        assert!(evaluate_day(&HourlySeries::default()).is_empty());
    }
}
