use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::core::geolocation::{LocationError, ReportedLocation};
use crate::models::{Coordinates, DateWindow, FilterCriteria};

/// Query string for the centre directory
///
/// GET /api/v1/centres?search=&neighbourhood=&near=true&lat=&lng=
///
/// `lat`/`lng` are not range-checked here: an impossible fix is a location
/// failure reported in the response, not a bad request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CentreListQuery {
    #[validate(length(max = 100))]
    pub search: Option<String>,
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub near: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub located_at: Option<i64>,
    pub location_error: Option<String>,
}

impl CentreListQuery {
    pub fn reported_location(&self) -> ReportedLocation {
        reported_location(self.lat, self.lng, self.located_at, self.location_error.as_deref())
    }
}

/// Query string for session listings
///
/// `age` is kept as text so that a non-numeric value simply disables the
/// age filter instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    pub age: Option<String>,
    pub window: Option<String>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub near: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub located_at: Option<i64>,
    pub location_error: Option<String>,
}

impl SessionQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            age: self.age.as_deref().and_then(FilterCriteria::parse_age),
            date_window: self
                .window
                .as_deref()
                .map(DateWindow::from_name)
                .unwrap_or_default(),
            available_only: self.available,
            proximity: self.near,
        }
    }

    pub fn reported_location(&self) -> ReportedLocation {
        reported_location(self.lat, self.lng, self.located_at, self.location_error.as_deref())
    }
}

/// Query string for a centre's activity groups
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CentreDetailsQuery {
    /// Comma separated activity categories
    pub types: Option<String>,
    #[validate(length(max = 100))]
    pub search: Option<String>,
}

impl CentreDetailsQuery {
    pub fn activity_types(&self) -> Vec<String> {
        self.types
            .as_deref()
            .map(|types| {
                types
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Query string for the activity index
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ActivityIndexQuery {
    #[validate(length(max = 100))]
    pub search: Option<String>,
}

fn reported_location(
    lat: Option<f64>,
    lng: Option<f64>,
    located_at: Option<i64>,
    location_error: Option<&str>,
) -> ReportedLocation {
    let coordinates = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
        _ => None,
    };

    ReportedLocation {
        coordinates,
        captured_at: located_at.and_then(DateTime::<Utc>::from_timestamp_millis),
        error: location_error.map(LocationError::from_code),
    }
}
