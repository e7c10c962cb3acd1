use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{
    dates::{matches_date_window, parse_date},
    distance::distance_between,
    filters::{matches_age, matches_availability},
};
use crate::models::{ActivitySession, CommunityCentre, Coordinates, FilterCriteria};

/// Distances closer than this are considered tied and ordered by name
pub const DISTANCE_TIE_KM: f64 = 0.01;

/// Ordering used when "near me" is not engaged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackOrder {
    /// Alphabetical by display name
    Alphabetical,
    /// Keep the order the upstream returned
    Source,
}

/// Something that can be filtered and sorted on a listing page
pub trait Listing {
    const FALLBACK_ORDER: FallbackOrder;

    fn display_name(&self) -> &str;

    fn coordinates(&self) -> Option<Coordinates>;

    fn date_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (None, None)
    }

    fn age_range(&self) -> (Option<u32>, Option<u32>) {
        (None, None)
    }

    fn openings(&self) -> Option<i64> {
        None
    }
}

impl Listing for CommunityCentre {
    const FALLBACK_ORDER: FallbackOrder = FallbackOrder::Alphabetical;

    fn display_name(&self) -> &str {
        &self.name
    }

    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::located(Some(self.lat), Some(self.lng))
    }
}

impl Listing for ActivitySession {
    const FALLBACK_ORDER: FallbackOrder = FallbackOrder::Source;

    fn display_name(&self) -> &str {
        &self.name
    }

    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::located(self.centre_lat, self.centre_lng)
    }

    fn date_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (
            self.date_range_start.as_deref().and_then(parse_date),
            self.date_range_end.as_deref().and_then(parse_date),
        )
    }

    fn age_range(&self) -> (Option<u32>, Option<u32>) {
        (self.age_min_year, self.age_max_year)
    }

    fn openings(&self) -> Option<i64> {
        self.openings
    }
}

/// A listing that survived filtering, with its distance from the visitor
#[derive(Debug, Serialize)]
pub struct Ranked<'a, T> {
    pub item: &'a T,
    pub distance_km: Option<f64>,
}

// Manual impls: a derive would require `T: Clone`.
impl<T> Clone for Ranked<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ranked<'_, T> {}

/// Check a listing against every active filter
#[inline]
pub fn matches_criteria<T: Listing>(item: &T, criteria: &FilterCriteria, today: NaiveDate) -> bool {
    if !matches_availability(item.openings(), criteria.available_only) {
        return false;
    }

    let (age_min, age_max) = item.age_range();
    if !matches_age(criteria.age, age_min, age_max) {
        return false;
    }

    let (start, end) = item.date_range();
    matches_date_window(start, end, criteria.date_window, today)
}

/// Filter listings and put them in display order
///
/// Listings are borrowed, never modified. With proximity on and an origin
/// known, the result is ordered by distance (listings without a location
/// last); otherwise by the listing type's fallback order.
pub fn apply<'a, T, I>(
    entities: I,
    criteria: &FilterCriteria,
    origin: Option<Coordinates>,
    today: NaiveDate,
) -> Vec<Ranked<'a, T>>
where
    T: Listing + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let retained = entities
        .into_iter()
        .filter(|item| matches_criteria(*item, criteria, today));

    match origin.filter(|_| criteria.proximity) {
        Some(origin) => {
            let mut ranked: Vec<Ranked<'a, T>> = retained
                .map(|item| Ranked {
                    item,
                    distance_km: item.coordinates().map(|c| distance_between(origin, c)),
                })
                .collect();
            sort_by_distance(&mut ranked);
            ranked
        }
        None => {
            let mut ranked: Vec<Ranked<'a, T>> = retained
                .map(|item| Ranked { item, distance_km: None })
                .collect();
            if T::FALLBACK_ORDER == FallbackOrder::Alphabetical {
                ranked.sort_by(|a, b| compare_names(a.item.display_name(), b.item.display_name()));
            }
            ranked
        }
    }
}

/// Order by distance ascending with located listings first
///
/// Located listings are split into tie groups: each group starts at the
/// nearest listing not yet grouped and takes every following listing less
/// than [`DISTANCE_TIE_KM`] farther than that first one. A group is ordered
/// by name. Unlocated listings follow, ordered by name.
pub fn sort_by_distance<T: Listing>(ranked: &mut [Ranked<'_, T>]) {
    ranked.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_names(a.item.display_name(), b.item.display_name()),
    });

    let located = ranked.iter().take_while(|r| r.distance_km.is_some()).count();
    let mut group_start = 0;
    while group_start < located {
        let Some(anchor) = ranked[group_start].distance_km else {
            break;
        };
        let group_end = ranked[group_start..located]
            .iter()
            .position(|r| r.distance_km.map_or(true, |d| d - anchor >= DISTANCE_TIE_KM))
            .map_or(located, |offset| group_start + offset);

        ranked[group_start..group_end].sort_by(|a, b| {
            compare_names(a.item.display_name(), b.item.display_name())
                .then_with(|| cmp_distance(a.distance_km, b.distance_km))
        });
        group_start = group_end;
    }
}

fn cmp_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => Ordering::Equal,
    }
}

/// Alphabetical comparison that ignores case first
///
/// Names equal apart from case put lowercase first at the first differing
/// character, e.g. "a" before "A". Characters compare by code point, so
/// accented letters sort after unaccented ones ("École" after "Zed").
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .find(|(x, y)| x != y)
                .map_or(Ordering::Equal, |(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
        })
        .then_with(|| a.cmp(b))
}
