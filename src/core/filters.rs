use serde::{Deserialize, Serialize};

/// Check whether a visitor's age falls inside a listing's age range
///
/// A missing minimum means 0. A missing maximum, or a maximum of 0, means
/// there is no upper limit. With no age entered every listing matches.
#[inline]
pub fn matches_age(user_age: Option<u32>, age_min: Option<u32>, age_max: Option<u32>) -> bool {
    let Some(age) = user_age else {
        return true;
    };

    let min = age_min.unwrap_or(0);
    let max = match age_max {
        None | Some(0) => u32::MAX,
        Some(max) => max,
    };

    min <= age && age <= max
}

/// Check whether a listing still has spots open
#[inline]
pub fn matches_availability(openings: Option<i64>, require_available: bool) -> bool {
    if !require_available {
        return true;
    }

    matches!(openings, Some(n) if n > 0)
}

/// Case-insensitive substring search over a name; a blank query matches everything
#[inline]
pub fn matches_search(name: &str, query: Option<&str>) -> bool {
    match query.map(str::trim) {
        None | Some("") => true,
        Some(query) => name.to_lowercase().contains(&query.to_lowercase()),
    }
}

/// Exact neighbourhood match, inactive when nothing is selected
#[inline]
pub fn matches_neighbourhood(neighbourhood: &str, selected: Option<&str>) -> bool {
    match selected {
        None | Some("") => true,
        Some(selected) => neighbourhood == selected,
    }
}

/// Keep a category when no types are selected or it is one of them
#[inline]
pub fn matches_activity_types(category: &str, selected: &[String]) -> bool {
    selected.is_empty() || selected.iter().any(|t| t == category)
}

/// Distinct values sorted ascending, e.g. the neighbourhood picker
pub fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut distinct: Vec<String> = values.into_iter().map(str::to_string).collect();
    distinct.sort();
    distinct.dedup();
    distinct
}

/// How many spots a session has left, bucketed for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "openings", rename_all = "snake_case")]
pub enum Availability {
    Unknown,
    Full,
    Few(i64),
    Plenty(i64),
}

impl Availability {
    pub fn from_openings(openings: Option<i64>) -> Self {
        match openings {
            None => Availability::Unknown,
            Some(n) if n <= 0 => Availability::Full,
            Some(n) if n < 10 => Availability::Few(n),
            Some(n) => Availability::Plenty(n),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Availability::Unknown => "Unknown".to_string(),
            Availability::Full => "Full (Waitlist)".to_string(),
            Availability::Few(1) => "1 Spot Left".to_string(),
            Availability::Few(n) => format!("{} Spots Left", n),
            Availability::Plenty(n) if *n >= 20 => "20+ Spots Left".to_string(),
            Availability::Plenty(n) => format!("{} Spots Left", n),
        }
    }
}
