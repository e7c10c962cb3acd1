use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Coordinates;

/// Why the visitor's location could not be determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("location services unsupported")]
    Unsupported,
}

impl LocationError {
    /// Map an error code reported by a browser; unrecognised codes mean the position was unavailable
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "permission_denied" | "1" => LocationError::PermissionDenied,
            "timeout" | "3" => LocationError::Timeout,
            "unsupported" => LocationError::Unsupported,
            _ => LocationError::PositionUnavailable,
        }
    }

    /// Message shown to the visitor
    pub fn message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => {
                "Location access denied. Please enable location permissions to use this feature."
            }
            LocationError::PositionUnavailable => "Unable to determine your location. Please try again.",
            LocationError::Timeout => "Location request timed out. Please try again.",
            LocationError::Unsupported => {
                "Location services are not available. This feature requires HTTPS."
            }
        }
    }
}

/// Options for a one-shot location request
#[derive(Debug, Clone, Copy)]
pub struct LocationOptions {
    pub timeout: Duration,
    /// Oldest cached fix that is still accepted
    pub maximum_age: Duration,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(300),
        }
    }
}

/// A location fix and when it was taken
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coordinates: Coordinates,
    pub captured_at: DateTime<Utc>,
}

/// Source of the visitor's current position
pub trait LocationProvider {
    fn current_position(
        &self,
        options: &LocationOptions,
    ) -> impl Future<Output = Result<Position, LocationError>> + Send;
}

/// Request the current position once
///
/// No retries: a provider that does not answer within `options.timeout`
/// yields `Timeout`, and a fix older than `options.maximum_age` or outside
/// valid coordinate ranges yields `PositionUnavailable`.
pub async fn request_location<P: LocationProvider>(
    provider: &P,
    options: &LocationOptions,
) -> Result<Coordinates, LocationError> {
    let position = tokio::time::timeout(options.timeout, provider.current_position(options))
        .await
        .map_err(|_| LocationError::Timeout)??;

    let age = Utc::now().signed_duration_since(position.captured_at);
    let too_old = age
        .to_std()
        .map(|age| age > options.maximum_age)
        .unwrap_or(false);

    if too_old || !position.coordinates.is_valid() {
        return Err(LocationError::PositionUnavailable);
    }

    Ok(position.coordinates)
}

/// "Close to me" toggle state for one listing view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProximityState {
    pub enabled: bool,
    pub coordinates: Option<Coordinates>,
    pub loading: bool,
    pub error: Option<LocationError>,
}

impl ProximityState {
    /// Flip the toggle, requesting a position on every off-to-on transition
    pub async fn set_enabled<P: LocationProvider>(
        &mut self,
        enabled: bool,
        provider: &P,
        options: &LocationOptions,
    ) {
        if !enabled {
            self.enabled = false;
            self.clear();
            return;
        }

        if self.enabled {
            return;
        }

        self.enabled = true;
        self.loading = true;
        self.error = None;

        match request_location(provider, options).await {
            Ok(coordinates) => {
                tracing::debug!("Location resolved for proximity sort");
                self.coordinates = Some(coordinates);
                self.error = None;
            }
            Err(e) => {
                tracing::debug!("Location request failed: {}", e);
                self.coordinates = None;
                self.error = Some(e);
            }
        }
        self.loading = false;
    }

    /// Drop any resolved or pending location
    pub fn clear(&mut self) {
        self.coordinates = None;
        self.error = None;
        self.loading = false;
    }

    /// Dismissing the error banner turns the toggle off
    pub fn dismiss_error(&mut self) {
        self.enabled = false;
        self.clear();
    }

    /// Origin to sort by, only while the toggle is on and a fix is held
    pub fn origin(&self) -> Option<Coordinates> {
        self.coordinates.filter(|_| self.enabled)
    }
}

/// Position reported by the visitor's browser alongside a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportedLocation {
    pub coordinates: Option<Coordinates>,
    pub captured_at: Option<DateTime<Utc>>,
    pub error: Option<LocationError>,
}

impl LocationProvider for ReportedLocation {
    async fn current_position(&self, _options: &LocationOptions) -> Result<Position, LocationError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let coordinates = self.coordinates.ok_or(LocationError::PositionUnavailable)?;
        Ok(Position {
            coordinates,
            captured_at: self.captured_at.unwrap_or_else(Utc::now),
        })
    }
}
