use tracing::warn;

use crate::{
    activity::{ActivityRow, HOURS_PER_DAY, evaluate_range},
    client::WeatherSource,
    model::{ForecastEnvelope, HourlySeries},
    pagination::{Direction, PageState},
};

use super::{Load, RequestToken};

#[derive(Debug, Clone, PartialEq)]
pub enum ActivityEvent {
    CityChanged(String),
    Loaded(RequestToken, ForecastEnvelope),
    Failed(RequestToken),
    PageChanged(Direction),
    /// Jump straight to a page; out-of-range pages are clamped.
    PageSelected(usize),
}

/// Paginated outdoor-activity verdicts for the next 24 hours of one city.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityState {
    city: Option<String>,
    token: RequestToken,
    series: Load<HourlySeries>,
    page: PageState,
}

impl ActivityState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            city: None,
            token: RequestToken::default(),
            series: Load::Idle,
            page: PageState::new(items_per_page, HOURS_PER_DAY),
        }
    }

    pub fn reduce(self, event: ActivityEvent) -> Self {
        match event {
            // A new city starts over on the first page.
            ActivityEvent::CityChanged(city) => Self {
                city: Some(city),
                token: self.token.next(),
                series: Load::Loading,
                page: self.page.reset(),
            },
            ActivityEvent::Loaded(token, envelope) if token == self.token => {
                let series = envelope.hourly_series().map_or(Load::Failed, Load::Ready);
                Self { series, ..self }
            }
            ActivityEvent::Failed(token) if token == self.token => {
                Self { series: Load::Failed, ..self }
            }
            ActivityEvent::PageChanged(direction) => {
                Self { page: self.page.page(direction), ..self }
            }
            ActivityEvent::PageSelected(page) => Self { page: self.page.goto(page), ..self },
            _ => self,
        }
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn series(&self) -> &Load<HourlySeries> {
        &self.series
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    /// Verdicts for the hours on the current page.
    pub fn rows(&self) -> Vec<ActivityRow> {
        self.series
            .ready()
            .map(|series| evaluate_range(series, self.page.visible_range()))
            .unwrap_or_default()
    }
}

/// Select `city` and fetch its hourly series.
pub async fn load(source: &dyn WeatherSource, state: ActivityState, city: &str) -> ActivityState {
    let state = state.reduce(ActivityEvent::CityChanged(city.to_string()));
    let token = state.token();

    let event = match source.weather(city).await {
        Ok(envelope) => ActivityEvent::Loaded(token, envelope),
        Err(err) => {
            warn!(city, error = %err, "failed to load activity forecast");
            ActivityEvent::Failed(token)
        }
    };

    state.reduce(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{activity::Suitability, model::CityForecast};
    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    fn day_envelope() -> ForecastEnvelope {
        let time: Vec<String> = (0..24).map(|h| format!("2024-06-01T{h:02}:00")).collect();
        let temps: Vec<Value> =
            (0..24).map(|h| if h == 7 { Value::Null } else { json!(20.0) }).collect();
        let precipitation: Vec<u32> = (0..24).map(|h| if h < 12 { 10 } else { 60 }).collect();

        ForecastEnvelope {
            temperature: Some(20.0),
            weather_code: Some(0),
            full_data: json!({
                "hourly": {
                    "time": time,
                    "temperature_2m": temps,
                    "precipitation_probability": precipitation,
                    "wind_speed_10m": vec![5.0; 24]
                }
            }),
        }
    }

    fn loaded(items_per_page: usize) -> ActivityState {
        let state = ActivityState::new(items_per_page).reduce(ActivityEvent::CityChanged("berlin".into()));
        let token = state.token();
        state.reduce(ActivityEvent::Loaded(token, day_envelope()))
    }

    #[test]
    fn first_page_skips_incomplete_hours() {
        let state = loaded(6);
        let rows = state.rows();

        assert_eq!(state.page().label(), "Page 1 of 4");
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.suitability == Suitability::Suitable));

        let state = state.reduce(ActivityEvent::PageChanged(Direction::Next));
        let indices: Vec<usize> = state.rows().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![6, 8, 9, 10, 11]);
    }

    #[test]
    fn later_pages_reflect_rain() {
        let mut state = loaded(6);
        for _ in 0..10 {
            state = state.reduce(ActivityEvent::PageChanged(Direction::Next));
        }

        assert_eq!(state.page().current_page(), 4);
        assert!(state.rows().iter().all(|r| r.suitability == Suitability::Unsuitable));
    }

    #[test]
    fn selecting_a_page_clamps_into_range() {
        let state = loaded(6).reduce(ActivityEvent::PageSelected(3));
        assert_eq!(state.page().current_page(), 3);
        assert_eq!(state.rows().first().map(|r| r.index), Some(12));

        let state = state.reduce(ActivityEvent::PageSelected(10_000_000_000_000));
        assert_eq!(state.page().current_page(), 4);
        assert_eq!(state.page().visible_range(), 18..24);

        let state = state.reduce(ActivityEvent::PageSelected(0));
        assert_eq!(state.page().current_page(), 1);
    }

    #[test]
    fn five_per_page_variant() {
        let state = loaded(5);
        assert_eq!(state.page().total_pages(), 5);
        assert_eq!(state.rows().len(), 5);
    }

    #[test]
    fn city_change_resets_page_and_ignores_stale_result() {
        let state = loaded(6).reduce(ActivityEvent::PageChanged(Direction::Next));
        let stale = state.token();

        let state = state.reduce(ActivityEvent::CityChanged("tokyo".into()));
        assert_eq!(state.page().current_page(), 1);
        assert_eq!(state.city(), Some("tokyo"));

        let state = state.reduce(ActivityEvent::Loaded(stale, day_envelope()));
        assert!(state.series().is_loading());
        assert!(state.rows().is_empty());
    }

    #[test]
    fn payload_without_hourly_block_is_no_data() {
        let state = ActivityState::new(6).reduce(ActivityEvent::CityChanged("paris".into()));
        let token = state.token();
        let envelope = ForecastEnvelope { temperature: None, weather_code: None, full_data: json!({}) };

        let state = state.reduce(ActivityEvent::Loaded(token, envelope));

        assert_eq!(state.series(), &Load::Failed);
        assert!(state.rows().is_empty());
    }

    #[derive(Debug)]
    struct DownSource;

    #[async_trait]
    impl WeatherSource for DownSource {
        async fn weather(&self, _city: &str) -> Result<ForecastEnvelope> {
            bail!("connection refused")
        }

        async fn forecast(&self, _city: &str) -> Result<CityForecast> {
            bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn load_failure_degrades_to_no_data() {
        let state = load(&DownSource, ActivityState::new(6), "london").await;

        assert_eq!(state.city(), Some("london"));
        assert_eq!(state.series(), &Load::Failed);
    }
}
