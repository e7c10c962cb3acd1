use actix_web::{web, HttpResponse};
use validator::Validate;

use super::{listing_ok, resolve_proximity, today, upstream_error, validation_error, AppState};
use crate::core::filters::{distinct_sorted, matches_activity_types, matches_neighbourhood, matches_search};
use crate::core::pipeline::apply;
use crate::models::{
    CentreDetailsQuery, CentreDetailsResponse, CentreEntry, CentreListQuery, CentreListResponse,
    FilterCriteria, LocationErrorBody, SessionEntry, SessionListResponse, SessionQuery,
};

/// Configure all centre routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/centres", web::get().to(list_centres))
        .route("/centres/{centre_id}", web::get().to(centre_details))
        .route(
            "/centres/{centre_id}/activities/{activity_name}",
            web::get().to(centre_activity_sessions),
        );
}

/// Centre directory
///
/// GET /api/v1/centres?search=&neighbourhood=&near=true&lat=&lng=
///
/// Alphabetical by default; nearest first when `near` is set and the
/// visitor's location is known.
async fn list_centres(
    state: web::Data<AppState>,
    query: web::Query<CentreListQuery>,
) -> HttpResponse {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let centres = match state.upstream.centres().await {
        Ok(centres) => centres,
        Err(e) => return upstream_error("Failed to fetch centres", e),
    };

    let proximity = resolve_proximity(query.near, &query.reported_location(), &state.location).await;
    let criteria = FilterCriteria {
        proximity: query.near,
        ..Default::default()
    };

    let matching = centres.iter().filter(|centre| {
        matches_search(&centre.name, query.search.as_deref())
            && matches_neighbourhood(&centre.neighbourhood, query.neighbourhood.as_deref())
    });

    let entries: Vec<CentreEntry> = apply(matching, &criteria, proximity.origin(), today())
        .into_iter()
        .map(CentreEntry::from)
        .collect();

    tracing::debug!("Listing {} of {} centres", entries.len(), centres.len());

    listing_ok(&state).json(CentreListResponse {
        total_results: entries.len(),
        centres: entries,
        neighbourhoods: distinct_sorted(centres.iter().map(|c| c.neighbourhood.as_str())),
        location_error: proximity.error.map(LocationErrorBody::from),
    })
}

/// A centre and the activity types it offers
///
/// GET /api/v1/centres/{centre_id}?types=Sports,Arts&search=
async fn centre_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<CentreDetailsQuery>,
) -> HttpResponse {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let centre_id = path.into_inner();
    let (centre, groups) = tokio::join!(
        state.upstream.centre(&centre_id),
        state.upstream.centre_activities(&centre_id),
    );

    let centre = match centre {
        Ok(centre) => centre,
        Err(e) => return upstream_error("Failed to fetch centre", e),
    };
    let groups = match groups {
        Ok(groups) => groups,
        Err(e) => return upstream_error("Failed to fetch centre activities", e),
    };

    let types = query.activity_types();
    let activities: Vec<_> = groups
        .iter()
        .filter(|group| matches_activity_types(&group.category, &types))
        .filter(|group| matches_search(&group.name, query.search.as_deref()))
        .collect();

    listing_ok(&state).json(CentreDetailsResponse {
        centre: &centre,
        total_activities: groups.len(),
        total_results: activities.len(),
        activities,
        categories: distinct_sorted(groups.iter().map(|g| g.category.as_str())),
    })
}

/// Sessions of one activity type at one centre, in upstream order
///
/// GET /api/v1/centres/{centre_id}/activities/{activity_name}?age=&window=&available=
async fn centre_activity_sessions(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    query: web::Query<SessionQuery>,
) -> HttpResponse {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let (centre_id, activity_name) = path.into_inner();
    let sessions = match state
        .upstream
        .centre_activity_sessions(&centre_id, &activity_name)
        .await
    {
        Ok(sessions) => sessions,
        Err(e) => return upstream_error("Failed to fetch centre sessions", e),
    };

    // Every session here shares one location, so distance ordering is meaningless
    let criteria = FilterCriteria {
        proximity: false,
        ..query.criteria()
    };

    let entries: Vec<SessionEntry> = apply(&sessions, &criteria, None, today())
        .into_iter()
        .map(SessionEntry::from)
        .collect();

    listing_ok(&state).json(SessionListResponse {
        activity_name,
        total_sessions: sessions.len(),
        total_results: entries.len(),
        sessions: entries,
        location_error: None,
    })
}
