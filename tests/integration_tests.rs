// Integration tests for Third Places

use actix_web::{http::header, test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use third_places::core::LocationOptions;
use third_places::routes::{configure_routes, AppState};
use third_places::services::{ResponseCache, UpstreamClient, UpstreamError};

fn upstream_client(url: &str) -> UpstreamClient {
    let cache = Arc::new(ResponseCache::new(100, 3600));
    UpstreamClient::new(url, Duration::from_secs(5), cache).unwrap()
}

fn app_state(url: &str) -> web::Data<AppState> {
    web::Data::new(AppState {
        upstream: Arc::new(upstream_client(url)),
        location: LocationOptions::default(),
        site_url: "https://thirdplaces.example".to_string(),
    })
}

fn centres_body() -> String {
    json!([
        {
            "id": "7",
            "name": "Kitsilano Community Centre",
            "address": "2690 Larch St",
            "neighbourhood": "Kitsilano",
            "lat": 49.2624,
            "lng": -123.1627,
            "total_activities": 42,
            "example_activities": ["Yoga", "Pickleball"]
        },
        {
            "id": "12",
            "name": "Hillcrest Community Centre",
            "address": "4575 Clancy Loranger Way",
            "neighbourhood": "Riley Park",
            "lat": 49.2440,
            "lng": -123.1073
        },
        {
            "id": "3",
            "name": "Britannia Community Centre",
            "address": "1661 Napier St",
            "neighbourhood": "Grandview-Woodland",
            "lat": 49.2755,
            "lng": -123.0719
        },
        {
            "id": "21",
            "name": "Aberthau Mansion",
            "address": "4397 W 2nd Ave",
            "neighbourhood": "West Point Grey",
            "lat": 0.0,
            "lng": 0.0
        }
    ])
    .to_string()
}

fn yoga_sessions_body() -> String {
    json!([
        {
            "id": 101,
            "name": "Hatha Yoga",
            "desc": "All levels",
            "centre_id": "7",
            "centre_name": "Kitsilano Community Centre",
            "centre_lat": 49.2624,
            "centre_lng": -123.1627,
            "category_id": "fitness",
            "age_min_year": 19,
            "age_max_year": 0,
            "openings": 5,
            "enroll_url": "https://example.org/enroll/101",
            "detail_url": "https://example.org/101",
            "normalized_activity_type": "Yoga"
        },
        {
            "id": 102,
            "name": "Yin Yoga",
            "desc": "",
            "centre_id": "12",
            "centre_name": "Hillcrest Community Centre",
            "centre_lat": 49.2440,
            "centre_lng": -123.1073,
            "category_id": "fitness",
            "age_min_year": 19,
            "openings": 0,
            "normalized_activity_type": "Yoga"
        },
        {
            "id": 103,
            "name": "Chair Yoga",
            "desc": "",
            "centre_id": "3",
            "centre_name": "Britannia Community Centre",
            "centre_lat": null,
            "centre_lng": null,
            "category_id": "fitness",
            "age_min_year": 55,
            "openings": 8,
            "detail_url": "https://example.org/103",
            "normalized_activity_type": "Yoga"
        }
    ])
    .to_string()
}

fn centre_names(body: &Value) -> Vec<String> {
    body["centres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

#[actix_web::test]
async fn test_health_check() {
    let server = mockito::Server::new_async().await;
    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn test_centres_alphabetical_by_default() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(centres_body())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/centres").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=3600"
    );

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        centre_names(&body),
        vec![
            "Aberthau Mansion",
            "Britannia Community Centre",
            "Hillcrest Community Centre",
            "Kitsilano Community Centre",
        ]
    );
    assert_eq!(
        body["neighbourhoods"],
        json!(["Grandview-Woodland", "Kitsilano", "Riley Park", "West Point Grey"])
    );
    assert_eq!(body["totalResults"], 4);
    assert!(body["centres"][0]["distanceKm"].is_null());
    assert!(body["locationError"].is_null());
}

#[actix_web::test]
async fn test_centres_nearest_first() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(200)
        .with_body(centres_body())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    // Visitor standing at Kitsilano
    let req = test::TestRequest::get()
        .uri("/api/v1/centres?near=true&lat=49.2624&lng=-123.1627")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        centre_names(&body),
        vec![
            "Kitsilano Community Centre",
            "Hillcrest Community Centre",
            "Britannia Community Centre",
            "Aberthau Mansion",
        ]
    );
    assert_eq!(body["centres"][0]["distanceLabel"], "0m");
    assert_eq!(body["centres"][1]["distanceLabel"], "4.5km");
    assert!(body["centres"][3]["distanceKm"].is_null());
}

#[actix_web::test]
async fn test_centres_search_and_neighbourhood() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(200)
        .with_body(centres_body())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/centres?search=%20community%20")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalResults"], 3);

    let req = test::TestRequest::get()
        .uri("/api/v1/centres?search=centre&neighbourhood=Riley%20Park")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(centre_names(&body), vec!["Hillcrest Community Centre"]);
    // The picker still offers every neighbourhood
    assert_eq!(body["neighbourhoods"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_location_denied_falls_back_to_alphabetical() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(200)
        .with_body(centres_body())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/centres?near=true&locationError=permission_denied")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(centre_names(&body)[0], "Aberthau Mansion");
    assert_eq!(body["locationError"]["kind"], "permission_denied");
    assert_eq!(
        body["locationError"]["message"],
        "Location access denied. Please enable location permissions to use this feature."
    );
}

#[actix_web::test]
async fn test_stale_location_is_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(200)
        .with_body(centres_body())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let an_hour_ago = chrono::Utc::now().timestamp_millis() - 3_600_000;
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/centres?near=true&lat=49.2624&lng=-123.1627&locatedAt={}",
            an_hour_ago
        ))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["locationError"]["kind"], "position_unavailable");
    assert!(body["centres"][0]["distanceKm"].is_null());
}

#[actix_web::test]
async fn test_impossible_coordinates_fall_back() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(200)
        .with_body(centres_body())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/centres?near=true&lat=200&lng=-123.1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["locationError"]["kind"], "position_unavailable");
    assert_eq!(
        centre_names(&body),
        vec![
            "Aberthau Mansion",
            "Britannia Community Centre",
            "Hillcrest Community Centre",
            "Kitsilano Community Centre",
        ]
    );
    assert!(body["centres"][2]["distanceKm"].is_null());
}

#[actix_web::test]
async fn test_overlong_search_rejected() {
    let server = mockito::Server::new_async().await;
    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/centres?search={}", "a".repeat(101)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], 400);
}

#[actix_web::test]
async fn test_upstream_failure_is_bad_gateway() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(500)
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/centres").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 502);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to fetch centres");
    assert_eq!(body["message"], "API request failed: 500 Internal Server Error");
}

#[actix_web::test]
async fn test_centre_details_filters_by_type() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(200)
        .with_body(centres_body())
        .create_async()
        .await;
    server
        .mock("GET", "/centres/7/normalized-activities")
        .with_status(200)
        .with_body(
            json!([
                {"name": "Yoga", "centre_id": "7", "centre_name": "Kitsilano", "category": "Fitness", "total": 6, "examples": ["Hatha Yoga"]},
                {"name": "Pickleball", "centre_id": "7", "centre_name": "Kitsilano", "category": "Sports", "total": 3},
                {"name": "Soccer", "centre_id": "7", "centre_name": "Kitsilano", "category": "Sports", "total": 2},
                {"name": "Pottery", "centre_id": "7", "centre_name": "Kitsilano", "category": "Arts", "total": 1}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/centres/7?types=Sports,Arts&search=E")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["centre"]["name"], "Kitsilano Community Centre");
    assert_eq!(body["categories"], json!(["Arts", "Fitness", "Sports"]));
    assert_eq!(body["totalActivities"], 4);
    let names: Vec<&str> = body["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Pickleball", "Soccer", "Pottery"]);
}

#[actix_web::test]
async fn test_unknown_centre_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(200)
        .with_body(centres_body())
        .create_async()
        .await;
    server
        .mock("GET", "/centres/99/normalized-activities")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/centres/99").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_activity_details_filters_sessions() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/activities/Yoga")
        .with_status(200)
        .with_body(yoga_sessions_body())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/activities/yoga?age=30&available=true")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["activityName"], "Yoga");
    assert_eq!(body["totalSessions"], 3);
    assert_eq!(body["totalResults"], 1);

    let session = &body["sessions"][0];
    assert_eq!(session["id"], 101);
    assert_eq!(session["availabilityLabel"], "5 Spots Left");
    assert_eq!(session["availability"], json!({"status": "few", "openings": 5}));
    assert_eq!(session["signupUrl"], "https://example.org/enroll/101");
}

#[actix_web::test]
async fn test_activity_details_nearest_first() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/activities/Yoga")
        .with_status(200)
        .with_body(yoga_sessions_body())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    // Visitor standing at Hillcrest
    let req = test::TestRequest::get()
        .uri("/api/v1/activities/yoga?near=true&lat=49.2440&lng=-123.1073")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let ids: Vec<i64> = body["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![102, 101, 103]);
    assert_eq!(body["sessions"][2]["availabilityLabel"], "8 Spots Left");
    assert_eq!(body["sessions"][2]["signupUrl"], "https://example.org/103");
}

#[actix_web::test]
async fn test_activity_without_sessions_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/activities/Curling")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/activities/curling").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No sessions found for Curling");
}

#[actix_web::test]
async fn test_centre_sessions_keep_upstream_order() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres/7/activities/Yoga")
        .with_status(200)
        .with_body(yoga_sessions_body())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/centres/7/activities/Yoga?near=true&lat=49.2440&lng=-123.1073")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let ids: Vec<i64> = body["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![101, 102, 103]);
    assert_eq!(body["sessions"][1]["availabilityLabel"], "Full (Waitlist)");
}

#[actix_web::test]
async fn test_activity_index_with_icons() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/normalized-activities")
        .with_status(200)
        .with_body(json!([{"name": "Table Tennis"}, {"name": "Yoga"}, {"name": "Pottery"}]).to_string())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/activities?search=TA").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalResults"], 1);
    assert_eq!(body["activities"][0]["name"], "Table Tennis");
    assert_eq!(body["activities"][0]["icon"]["iconPath"], "/icons/table-tennis.svg");

    let req = test::TestRequest::get().uri("/api/v1/activities").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["activities"][2]["icon"]["iconPath"], "/icons/card.svg");
}

#[actix_web::test]
async fn test_sitemap_lists_every_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(200)
        .with_body(centres_body())
        .create_async()
        .await;
    server
        .mock("GET", "/normalized-activities")
        .with_status(200)
        .with_body(json!([{"name": "Yoga"}]).to_string())
        .create_async()
        .await;

    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/sitemap.xml").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let xml = String::from_utf8(body.to_vec()).unwrap();

    assert!(xml.contains("<loc>https://thirdplaces.example/centres/7</loc>"));
    assert!(xml.contains("<loc>https://thirdplaces.example/activities/Yoga</loc>"));
    assert_eq!(xml.matches("<url>").count(), 2 + 4 + 1);
}

#[actix_web::test]
async fn test_sitemap_falls_back_to_static_pages() {
    // No mocks: every upstream request fails
    let server = mockito::Server::new_async().await;
    let app = test::init_service(
        App::new().app_data(app_state(&server.url())).configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/sitemap.xml").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let xml = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert_eq!(xml.matches("<url>").count(), 2);
    assert!(xml.contains("<loc>https://thirdplaces.example/activities</loc>"));
}

#[tokio::test]
async fn test_upstream_responses_are_cached() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/centres")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_body(centres_body())
        .expect(1)
        .create_async()
        .await;

    let client = upstream_client(&server.url());
    let first = client.centres().await.unwrap();
    let second = client.centres().await.unwrap();

    assert_eq!(first.len(), 4);
    assert_eq!(second.len(), 4);
    assert_eq!(first[0].example_activities, vec!["Yoga", "Pickleball"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_upstream_payload_is_validation_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/normalized-activities")
        .with_status(200)
        .with_body(r#"[{"title": "Yoga"}]"#)
        .create_async()
        .await;

    let client = upstream_client(&server.url());
    let result = client.normalized_activities().await;

    assert!(matches!(result, Err(UpstreamError::Validation(_))));
}

#[tokio::test]
async fn test_unknown_centre_is_not_found_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/centres")
        .with_status(200)
        .with_body(centres_body())
        .create_async()
        .await;

    let client = upstream_client(&server.url());
    let error = client.centre("99").await.unwrap_err();

    assert!(error.is_not_found());
    assert_eq!(error.to_string(), "Not found: Centre 99 not found");
}
