use crate::city::UnknownCity;

/// Failure talking to the upstream forecast provider.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Failed to reach forecast provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Forecast provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Forecast provider returned malformed JSON: {0}")]
    Body(#[from] serde_json::Error),
}

/// Errors surfaced by the forecast gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    InvalidCity(#[from] UnknownCity),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("Unexpected forecast payload: {0}")]
    UpstreamSchema(String),
}

impl GatewayError {
    /// True when the caller asked for something we cannot serve, as opposed
    /// to the upstream failing us.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GatewayError::InvalidCity(_))
    }
}
