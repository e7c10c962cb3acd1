use actix_web::{web, HttpResponse};
use validator::Validate;

use super::{listing_ok, not_found, resolve_proximity, today, upstream_error, validation_error, AppState};
use crate::core::filters::matches_search;
use crate::core::icons::activity_icon;
use crate::core::naming::normalize_activity_name;
use crate::core::pipeline::apply;
use crate::models::{
    ActivityIndexEntry, ActivityIndexQuery, ActivityIndexResponse, LocationErrorBody, SessionEntry,
    SessionListResponse, SessionQuery,
};

/// Configure all activity routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/activities", web::get().to(list_activities))
        .route("/activities/{activity_name}", web::get().to(activity_details));
}

/// Cross-centre activity index
///
/// GET /api/v1/activities?search=
async fn list_activities(
    state: web::Data<AppState>,
    query: web::Query<ActivityIndexQuery>,
) -> HttpResponse {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let activities = match state.upstream.normalized_activities().await {
        Ok(activities) => activities,
        Err(e) => return upstream_error("Failed to fetch activities", e),
    };

    let entries: Vec<ActivityIndexEntry> = activities
        .iter()
        .filter(|activity| matches_search(&activity.name, query.search.as_deref()))
        .map(|activity| ActivityIndexEntry {
            name: &activity.name,
            icon: activity_icon(&activity.name),
        })
        .collect();

    listing_ok(&state).json(ActivityIndexResponse {
        total_results: entries.len(),
        activities: entries,
    })
}

/// Every session of one activity type across all centres
///
/// GET /api/v1/activities/{activity_name}?age=&window=&available=&near=&lat=&lng=
///
/// Upstream order by default; nearest centre first when `near` is set and
/// the visitor's location is known.
async fn activity_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<SessionQuery>,
) -> HttpResponse {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let requested = normalize_activity_name(&path.into_inner());
    let sessions = match state.upstream.activity_sessions(&requested).await {
        Ok(sessions) => sessions,
        Err(e) => return upstream_error("Failed to fetch activity sessions", e),
    };

    if sessions.is_empty() {
        return not_found(format!("No sessions found for {}", requested));
    }

    let activity_name = sessions
        .first()
        .and_then(|session| session.normalized_activity_type.clone())
        .unwrap_or(requested);

    let proximity = resolve_proximity(query.near, &query.reported_location(), &state.location).await;
    let criteria = query.criteria();

    let entries: Vec<SessionEntry> = apply(&sessions, &criteria, proximity.origin(), today())
        .into_iter()
        .map(SessionEntry::from)
        .collect();

    tracing::debug!(
        "Listing {} of {} sessions for {}",
        entries.len(),
        sessions.len(),
        activity_name
    );

    listing_ok(&state).json(SessionListResponse {
        activity_name,
        total_sessions: sessions.len(),
        total_results: entries.len(),
        sessions: entries,
        location_error: proximity.error.map(LocationErrorBody::from),
    })
}
