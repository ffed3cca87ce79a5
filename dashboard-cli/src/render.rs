//! Plain-text rendering of the dashboard and activity views.

use chrono::NaiveDateTime;
use dashboard_core::{
    TemperatureUnit,
    activity::ActivityRow,
    view::{ActivityState, ChartPoint, ChartRenderer, DashboardState, Load},
};
use std::fmt::Write;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One-line bar chart with first/last labels and the value range.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sparkline;

impl ChartRenderer for Sparkline {
    type Output = String;

    fn render(&self, title: &str, points: &[ChartPoint]) -> String {
        let mut out = format!("{title}\n");

        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            out.push_str("  (no data)\n");
            return out;
        };

        let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
        let max = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        let bars: String = points
            .iter()
            .map(|p| {
                if span <= f64::EPSILON {
                    BARS[BARS.len() / 2]
                } else {
                    let level = ((p.value - min) / span * (BARS.len() - 1) as f64).round() as usize;
                    BARS[level.min(BARS.len() - 1)]
                }
            })
            .collect();

        let _ = writeln!(out, "  {bars}");
        let _ = writeln!(out, "  {} .. {}   min {min:.1}  max {max:.1}", first.label, last.label);
        out
    }
}

pub fn dashboard<R: ChartRenderer<Output = String>>(state: &DashboardState, chart: &R) -> String {
    let city = state.city().display_name();
    let symbol = state.unit().symbol();
    let mut out = format!("Current weather in {city}\n");

    match state.weather() {
        Load::Idle => {}
        Load::Loading => out.push_str("  Loading...\n"),
        Load::Failed => out.push_str("  Failed to load weather data.\n"),
        Load::Ready(_) => {
            match state.current_temperature() {
                Some(t) => {
                    let _ = writeln!(out, "  Temperature: {t:.1}{symbol}");
                }
                None => out.push_str("  Temperature: n/a\n"),
            }
            if let Some(condition) = state.condition() {
                let _ = writeln!(out, "  Conditions:  {condition}");
            }
            if let Some(time) = state.observed_at() {
                let _ = writeln!(out, "  Observed:    {time}");
            }
        }
    }
    out.push('\n');

    match state.forecast() {
        Load::Failed => out.push_str("Temperature forecast\n  Failed to load forecast.\n"),
        _ => out.push_str(&chart.render(
            &format!("Temperature, next 24 hours ({symbol})"),
            &state.temperature_series(),
        )),
    }
    out.push('\n');

    out.push_str(&chart.render(
        "Daily average precipitation probability (%)",
        &state.daily_precipitation(),
    ));
    out.push('\n');

    let _ = writeln!(out, "Outdoor activity: {}", state.activity_link());
    out
}

/// Menu entry that switches the dashboard to the other unit.
pub fn unit_toggle_label(current: TemperatureUnit) -> String {
    format!("Show in {}", current.toggled().symbol())
}

pub fn activity(state: &ActivityState) -> String {
    let mut out = String::from("Weather Forecast (Next 24 Hours)");
    if let Some(city) = state.city() {
        let _ = write!(out, " - {city}");
    }
    out.push('\n');

    match state.series() {
        Load::Idle | Load::Loading => {
            out.push_str("Loading forecast data...\n");
            return out;
        }
        Load::Failed => {
            out.push_str("No data available.\n");
            return out;
        }
        Load::Ready(_) => {}
    }

    for row in state.rows() {
        out.push_str(&activity_row(&row));
    }

    let page = state.page();
    let prev = if page.has_prev() { "< Previous" } else { "          " };
    let next = if page.has_next() { "Next >" } else { "      " };
    let _ = writeln!(out, "\n{prev}   {}   {next}", page.label());
    out
}

fn activity_row(row: &ActivityRow) -> String {
    let reading = &row.reading;
    let wind = reading
        .wind_speed
        .map(|w| format!("{w:.1} km/h"))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "{}  {:>5.1}°C  rain {:>3.0}%  wind {:>9}  {}\n",
        display_time(&reading.time),
        reading.temperature,
        reading.precipitation_probability,
        wind,
        row.suitability.message(),
    )
}

/// `2024-06-01T13:00` → `Sat 01 Jun 13:00`; anything else is shown as is.
pub fn display_time(time: &str) -> String {
    NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
        .map(|dt| dt.format("%a %d %b %H:%M").to_string())
        .unwrap_or_else(|_| time.to_string())
}
