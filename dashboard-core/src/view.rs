//! View state for the dashboard and activity screens.
//!
//! Each view is an immutable state value plus a pure `reduce(state, event)`
//! transition. Fetches are tagged with the [`RequestToken`] current when they
//! were issued; results carrying any other token are dropped, so a slow
//! response for a previous city never overwrites the current one.

pub mod activity;
pub mod dashboard;

pub use activity::{ActivityEvent, ActivityState};
pub use dashboard::{DashboardEvent, DashboardState};

/// Generation number of the latest fetch a view has issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Progress of one fetched resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Load<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed,
}

impl<T> Load<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Load::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Load::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// One point of a chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value }
    }
}

/// Draws a titled series. The views only hand over points.
pub trait ChartRenderer {
    type Output;

    fn render(&self, title: &str, points: &[ChartPoint]) -> Self::Output;
}

/// Average each consecutive `chunk`-sized slice of `values` into `buckets`
/// values. Missing entries are ignored; a bucket with nothing in it is 0.
pub fn bucket_averages(values: &[Option<f64>], chunk: usize, buckets: usize) -> Vec<f64> {
    let chunk = chunk.max(1);

    (0..buckets)
        .map(|bucket| {
            let start = (bucket * chunk).min(values.len());
            let end = (start + chunk).min(values.len());
            let present: Vec<f64> = values[start..end].iter().flatten().copied().collect();

            if present.is_empty() {
                0.0
            } else {
                present.iter().sum::<f64>() / present.len() as f64
            }
        })
        .collect()
}
