use crate::error::ConfigError;
use crate::traits::LocationProvider;
use crate::{Coordinates, LocationError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";
pub const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub enum LocationCapability {
    Available(Coordinates),
    Unsupported,
    PermissionDenied(String),
    Unavailable(String),
    Timeout,
}

#[async_trait]
impl LocationProvider for LocationCapability {
    async fn acquire_location(&self) -> Result<Coordinates, LocationError> {
        match self {
            Self::Available(coordinates) => Ok(*coordinates),
            Self::Unsupported => Err(LocationError::Unsupported),
            Self::PermissionDenied(reason) => Err(LocationError::PermissionDenied(reason.clone())),
            Self::Unavailable(reason) => Err(LocationError::Unavailable(reason.clone())),
            Self::Timeout => Err(LocationError::Timeout),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IpLocationConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for IpLocationConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GEOLOCATION_URL.to_string(),
            timeout: DEFAULT_GEOLOCATION_TIMEOUT,
        }
    }
}

pub struct IpLocationProvider {
    client: Client,
    url: String,
}

impl IpLocationProvider {
    pub fn new(config: IpLocationConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| ConfigError::Invalid(format!("geolocation client: {error}")))?;

        Ok(Self {
            client,
            url: config.url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpLookup {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    async fn acquire_location(&self) -> Result<Coordinates, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LocationError::PermissionDenied(format!(
                "geolocation service refused the request ({status})"
            )));
        }
        if !status.is_success() {
            return Err(LocationError::Unavailable(format!(
                "geolocation service returned {status}"
            )));
        }

        let lookup: IpLookup = response.json().await.map_err(transport_error)?;
        if lookup.status != "success" {
            let reason = lookup.message.unwrap_or_else(|| lookup.status.clone());
            warn!(%reason, "ip geolocation lookup failed");
            return Err(LocationError::Unavailable(reason));
        }

        let (Some(latitude), Some(longitude)) = (lookup.lat, lookup.lon) else {
            return Err(LocationError::Unavailable(
                "lookup response had no coordinates".to_string(),
            ));
        };

        let coordinates = Coordinates::new(latitude, longitude)
            .map_err(|error| LocationError::Unavailable(error.to_string()))?;
        debug!(latitude, longitude, "resolved location from ip address");
        Ok(coordinates)
    }
}

fn transport_error(error: reqwest::Error) -> LocationError {
    if error.is_timeout() {
        LocationError::Timeout
    } else {
        LocationError::Unavailable(error.to_string())
    }
}
