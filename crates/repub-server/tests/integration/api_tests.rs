use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::integration::common::{seed_listing, setup_test_app};

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "repub-server");
}

#[tokio::test]
async fn ads_list_returns_discovered_ids() {
    let app = setup_test_app();
    seed_listing(&app.fetcher, &["111", "222"]);

    let response = app
        .router
        .oneshot(Request::get("/ads/list").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["adIds"], serde_json::json!(["111", "222"]));
    assert_eq!(json["totalCount"], 2);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn ads_count_matches_listing() {
    let app = setup_test_app();
    seed_listing(&app.fetcher, &["1", "2", "3"]);

    let response = app
        .router
        .oneshot(Request::get("/ads/count").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["count"], 3);
}

#[tokio::test]
async fn republish_all_accepts_empty_body() {
    let app = setup_test_app();
    seed_listing(&app.fetcher, &["10", "20", "30"]);

    let response = app
        .router
        .oneshot(
            Request::post("/republish/all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["message"], "Republishing process completed");
    assert_eq!(json["stats"]["totalPublishedAdsFound"], 3);
    assert_eq!(json["stats"]["requestsSent"], 3);
    assert!(json["processId"].is_string());

    let republish_calls = app
        .fetcher
        .calls()
        .into_iter()
        .filter(|u| u.contains("/republicar/"))
        .count();
    assert_eq!(republish_calls, 3);
}

#[tokio::test]
async fn republish_all_returns_409_while_running() {
    let app = setup_test_app();
    seed_listing(&app.fetcher, &["1"]);

    app.state.service.tracker().begin(false).unwrap();

    let response = app
        .router
        .oneshot(
            Request::post("/republish/all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = json_body(response).await;
    assert_eq!(json["error"], "conflict");
    assert_eq!(json["message"], "Republishing process is already running");
}

#[tokio::test]
async fn force_run_overrides_active_process() {
    let app = setup_test_app();
    seed_listing(&app.fetcher, &["1"]);

    app.state.service.tracker().begin(false).unwrap();

    let response = app
        .router
        .oneshot(
            Request::post("/republish/all")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"forceRun": true}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["stats"]["requestsSent"], 1);
}

#[tokio::test]
async fn republish_specific_sends_one_request_per_id() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(
            Request::post("/republish/specific")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"adIds": ["7", "8"]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(
        json["message"],
        "Republishing process completed for 2 specific ads"
    );
    assert_eq!(json["stats"]["totalAdsProvided"], 2);
    assert_eq!(json["stats"]["requestsSent"], 2);
    assert_eq!(json["stats"]["failed"], 0);

    let republish_calls = app
        .fetcher
        .calls()
        .into_iter()
        .filter(|u| u.contains("/republicar/"))
        .count();
    assert_eq!(republish_calls, 2);
}

#[tokio::test]
async fn republish_specific_rejects_empty_id_list() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(
            Request::post("/republish/specific")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"adIds": []}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "validation_error");
}

#[tokio::test]
async fn status_reflects_a_completed_run() {
    let app = setup_test_app();
    seed_listing(&app.fetcher, &["5", "6"]);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/republish/all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(
            Request::get("/republish/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["isRunning"], false);
    assert_eq!(json["totalAdsFound"], 2);
    assert_eq!(json["adsRepublished"], 2);
    assert_eq!(json["errors"], 0);
    assert!(json["lastRun"].is_string());
    assert!(json["nextScheduledRun"].is_string());
    assert!(json["processId"].is_null());
}

#[tokio::test]
async fn status_before_any_run_is_idle() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(
            Request::get("/republish/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["isRunning"], false);
    assert!(json["lastRun"].is_null());
    assert!(json["nextScheduledRun"].is_null());
    assert_eq!(json["totalAdsFound"], 0);
}
