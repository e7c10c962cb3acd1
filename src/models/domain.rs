use serde::{Deserialize, Serialize};
use validator::Validate;

/// Community centre as served by the upstream `/centres` endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommunityCentre {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub address: String,
    pub neighbourhood: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[serde(default)]
    pub total_activities: u32,
    #[serde(default)]
    pub example_activities: Vec<String>,
}

/// A single scheduled activity session at a centre
///
/// Mirrors the upstream "activity" record. Every optional field may be
/// missing or explicitly `null`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActivitySession {
    pub id: i64,
    #[validate(length(min = 1))]
    pub name: String,
    pub desc: String,
    pub centre_id: String,
    pub centre_name: String,
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub centre_lat: Option<f64>,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub centre_lng: Option<f64>,
    pub category_id: String,
    #[serde(default)]
    pub detail_url: Option<String>,
    #[serde(default)]
    pub date_range_start: Option<String>,
    #[serde(default)]
    pub date_range_end: Option<String>,
    #[serde(default)]
    pub date_range_description: Option<String>,
    #[serde(default)]
    pub date_range: Option<String>,
    #[serde(default)]
    pub time_range: Option<String>,
    #[serde(default)]
    pub only_one_day: Option<bool>,
    #[serde(default)]
    pub days_of_week: Option<String>,
    #[serde(default)]
    pub age_max_year: Option<u32>,
    #[serde(default)]
    pub age_max_month: Option<u32>,
    #[serde(default)]
    pub age_min_year: Option<u32>,
    #[serde(default)]
    pub age_min_month: Option<u32>,
    #[serde(default)]
    pub ages: Option<String>,
    #[serde(default)]
    pub openings: Option<i64>,
    #[serde(default)]
    pub enroll_url: Option<String>,
    #[serde(default)]
    pub normalized_activity_type: Option<String>,
}

impl ActivitySession {
    /// Link a visitor should follow to sign up, preferring the enrolment page
    pub fn signup_url(&self) -> Option<&str> {
        self.enroll_url
            .as_deref()
            .or(self.detail_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// Entry of the cross-centre activity index
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NormalizedActivityName {
    #[validate(length(min = 1))]
    pub name: String,
}

/// Activity type offered by one centre, with a few example programme names
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CentreActivityGroup {
    #[validate(length(min = 1))]
    pub name: String,
    pub centre_id: String,
    pub centre_name: String,
    pub category: String,
    pub total: u32,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build coordinates for a listing, treating a zero component as "no location"
    pub fn located(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng))
                if lat.is_finite() && lng.is_finite() && lat != 0.0 && lng != 0.0 =>
            {
                Some(Self::new(lat, lng))
            }
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Relative calendar window a listing's dates must intersect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateWindow {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "next-7-days")]
    Next7Days,
    #[serde(rename = "this-month")]
    ThisMonth,
    #[serde(rename = "next-month")]
    NextMonth,
}

impl DateWindow {
    /// Resolve a window name; unknown names fall back to `All` so nothing is hidden
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "next-7-days" => DateWindow::Next7Days,
            "this-month" => DateWindow::ThisMonth,
            "next-month" => DateWindow::NextMonth,
            _ => DateWindow::All,
        }
    }
}

/// Visitor-selected filters for a listing view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub age: Option<u32>,
    pub date_window: DateWindow,
    pub available_only: bool,
    pub proximity: bool,
}

impl FilterCriteria {
    /// Parse a free-text age field; blank or non-numeric input disables the filter
    pub fn parse_age(raw: &str) -> Option<u32> {
        raw.trim().parse().ok()
    }
}
