use serde::{Deserialize, Serialize};

use crate::core::distance::format_distance;
use crate::core::filters::Availability;
use crate::core::geolocation::LocationError;
use crate::core::icons::ActivityIcon;
use crate::core::pipeline::Ranked;
use crate::models::domain::{ActivitySession, CentreActivityGroup, CommunityCentre};

/// Centre as listed in the directory, with its distance when "near me" is on
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CentreEntry<'a> {
    #[serde(flatten)]
    pub centre: &'a CommunityCentre,
    pub distance_km: Option<f64>,
    pub distance_label: Option<String>,
}

impl<'a> From<Ranked<'a, CommunityCentre>> for CentreEntry<'a> {
    fn from(ranked: Ranked<'a, CommunityCentre>) -> Self {
        Self {
            centre: ranked.item,
            distance_km: ranked.distance_km,
            distance_label: ranked.distance_km.map(format_distance),
        }
    }
}

/// Session as listed on an activity or centre page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntry<'a> {
    #[serde(flatten)]
    pub session: &'a ActivitySession,
    pub availability: Availability,
    pub availability_label: String,
    pub signup_url: Option<&'a str>,
    pub distance_km: Option<f64>,
    pub distance_label: Option<String>,
}

impl<'a> From<Ranked<'a, ActivitySession>> for SessionEntry<'a> {
    fn from(ranked: Ranked<'a, ActivitySession>) -> Self {
        let availability = Availability::from_openings(ranked.item.openings);
        Self {
            session: ranked.item,
            availability,
            availability_label: availability.label(),
            signup_url: ranked.item.signup_url(),
            distance_km: ranked.distance_km,
            distance_label: ranked.distance_km.map(format_distance),
        }
    }
}

/// Location failure surfaced to the visitor as a dismissible banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationErrorBody {
    pub kind: LocationError,
    pub message: String,
}

impl From<LocationError> for LocationErrorBody {
    fn from(error: LocationError) -> Self {
        Self {
            kind: error,
            message: error.message().to_string(),
        }
    }
}

/// Response for the centre directory
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CentreListResponse<'a> {
    pub centres: Vec<CentreEntry<'a>>,
    pub neighbourhoods: Vec<String>,
    pub total_results: usize,
    pub location_error: Option<LocationErrorBody>,
}

/// Response for a centre's detail page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CentreDetailsResponse<'a> {
    pub centre: &'a CommunityCentre,
    pub activities: Vec<&'a CentreActivityGroup>,
    pub categories: Vec<String>,
    pub total_activities: usize,
    pub total_results: usize,
}

/// Response for any session listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListResponse<'a> {
    pub activity_name: String,
    pub total_sessions: usize,
    pub sessions: Vec<SessionEntry<'a>>,
    pub total_results: usize,
    pub location_error: Option<LocationErrorBody>,
}

/// Activity index entry with its display icon
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityIndexEntry<'a> {
    pub name: &'a str,
    pub icon: &'static ActivityIcon,
}

/// Response for the cross-centre activity index
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityIndexResponse<'a> {
    pub activities: Vec<ActivityIndexEntry<'a>>,
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cached_responses: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
