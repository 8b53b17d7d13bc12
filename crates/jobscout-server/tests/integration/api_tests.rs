use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::integration::common::{
    FIXTURE_SITES, TEST_ADMIN_TOKEN, setup_test_app, setup_test_app_no_auth,
};

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn search_request(body: serde_json::Value) -> Request<Body> {
    Request::post("/v1/search")
        .header("authorization", format!("Bearer {TEST_ADMIN_TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["sites"], FIXTURE_SITES.len());
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn unauthenticated_request_returns_401() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(Request::get("/v1/sites").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_token_returns_401() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(
            Request::get("/v1/sites")
                .header("authorization", "Bearer wrong-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn no_admin_token_returns_403() {
    let app = setup_test_app_no_auth().await;

    let response = app
        .router
        .oneshot(search_request(serde_json::json!({ "query": "dev" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = json_body(response).await;
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn lists_sites_and_directory() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(
            Request::get("/v1/sites")
                .header("authorization", format!("Bearer {TEST_ADMIN_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let names: Vec<&str> = json["sites"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, FIXTURE_SITES);
    assert_eq!(json["sites"][0]["origin"], app.fixtures);

    let directory = json["directory"].as_array().unwrap();
    assert!(directory.iter().any(|e| e["name"] == "Net Empregos"));
    assert!(directory.iter().any(|e| e["region"] == "international"));
}

#[tokio::test]
async fn search_combines_selected_sites() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(search_request(serde_json::json!({
            "query": "dev ops",
            "sites": ["net", "empty", "broken"],
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["query"], "dev ops");
    assert_eq!(json["total"], 2);

    let jobs = json["jobs"].as_array().unwrap();
    assert_eq!(jobs[0]["title"], "dev ops Junior");
    assert_eq!(jobs[0]["company"], "Tech Lisboa");
    assert_eq!(jobs[0]["url"], format!("{}/vaga/1", app.fixtures));
    assert_eq!(jobs[0]["source"], "NET");
    assert!(jobs[1]["company"].is_null());

    let sites = json["sites"].as_array().unwrap();
    assert_eq!(sites.len(), 3);
    let status = |name: &str| {
        sites
            .iter()
            .find(|s| s["site"] == name)
            .map(|s| s["status"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(status("net"), "completed");
    assert_eq!(status("empty"), "empty");
    assert_eq!(status("broken"), "failed");
}

#[tokio::test]
async fn slow_site_times_out_without_failing_search() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(search_request(serde_json::json!({ "query": "dev" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["total"], 2);

    let sites = json["sites"].as_array().unwrap();
    assert_eq!(sites.len(), FIXTURE_SITES.len());
    let slow = sites.iter().find(|s| s["site"] == "slow").unwrap();
    assert_eq!(slow["status"], "timed_out");
    assert!(slow["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn blank_query_returns_400() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(search_request(serde_json::json!({ "query": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "validation_error");
    assert_eq!(json["message"], "search term must not be empty");
}

#[tokio::test]
async fn unknown_site_returns_404() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(search_request(serde_json::json!({
            "query": "dev",
            "sites": ["net", "monster"],
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"], "not_found");
    assert!(json["message"].as_str().unwrap().contains("monster"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert!(json["paths"]["/v1/search"]["post"].is_object());
    assert!(json["components"]["securitySchemes"]["bearer"].is_object());
}
