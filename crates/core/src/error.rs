use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location access denied: {0}. Please enable location services and try again.")]
    PermissionDenied(String),

    #[error("Location access denied: position unavailable ({0}). Please enable location services and try again.")]
    Unavailable(String),

    #[error("Location access denied: timed out while waiting for a position. Please enable location services and try again.")]
    Timeout,

    #[error("Geolocation is not supported by this environment.")]
    Unsupported,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Failed to fetch from Gemini: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch from Gemini: invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to fetch from Gemini: backend returned {status}: {details}")]
    BackendResponse { status: u16, details: String },

    #[error("Failed to fetch from Gemini: malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to fetch from Gemini: invalid search request: {0}")]
    Request(String),

    #[cfg(test)]
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
