use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;

use jobscout_client::{ReqwestFetcher, SelectorParser};
use jobscout_core::testutil::sample_site;
use jobscout_core::{Aggregator, AggregatorConfig, SiteRegistry};
use jobscout_server::routes;
use jobscout_server::state::AppState;

pub const TEST_ADMIN_TOKEN: &str = "test-secret-token";

/// Site names served by the fixture listener, in registry order.
pub const FIXTURE_SITES: [&str; 4] = ["net", "empty", "broken", "slow"];

pub struct TestApp {
    pub router: Router,
    /// Base URL of the fixture job board.
    pub fixtures: String,
}

async fn fixture_page(
    Path(site): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = params.get("q").cloned().unwrap_or_default();
    match site.as_str() {
        "net" => Html(format!(
            r#"<html><body>
                <div class="job">
                  <a class="title" href="/vaga/1">{query} Junior</a>
                  <span class="company">Tech Lisboa</span>
                  <span class="location">Lisboa</span>
                </div>
                <div class="job">
                  <a class="title" href="/vaga/2">{query} Senior</a>
                  <span class="location">Porto</span>
                </div>
            </body></html>"#
        ))
        .into_response(),
        "empty" => Html("<html><body><p>Sem resultados</p></body></html>").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Html("<html></html>").into_response()
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn serve_fixtures() -> String {
    let router = Router::new().route("/search/{site}", get(fixture_page));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fixture listener");
    let addr = listener.local_addr().expect("Fixture listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}")
}

async fn build_app(admin_token: Option<&str>) -> TestApp {
    let fixtures = serve_fixtures().await;

    let registry = SiteRegistry::with_sites(
        FIXTURE_SITES
            .iter()
            .map(|name| sample_site(name, &fixtures))
            .collect(),
    )
    .expect("Fixture sites are valid");
    let config = AggregatorConfig::default().with_site_timeout(Some(Duration::from_millis(500)));
    let fetcher = ReqwestFetcher::from_config(&config).expect("Failed to build HTTP client");

    let state = Arc::new(AppState {
        aggregator: Aggregator::new(fetcher, SelectorParser, registry, config),
        admin_token: admin_token.map(str::to_string),
    });

    TestApp {
        router: routes::router(state),
        fixtures,
    }
}

/// Test app with the admin token configured.
pub async fn setup_test_app() -> TestApp {
    build_app(Some(TEST_ADMIN_TOKEN)).await
}

/// Test app without an admin token: `/v1/*` is disabled.
pub async fn setup_test_app_no_auth() -> TestApp {
    build_app(None).await
}
