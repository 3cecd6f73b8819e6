//! admin-server — HTTP host for the campaign URL creator.
//!
//! Serves the admin form and a small JSON API around the `domain` crate:
//! - Pages: in-memory (default) or SQLite when the `sqlite` feature is enabled.
//! - Destinations: submitted `select-page` values are trusted or validated
//!   against the offered pages (DESTINATION_POLICY).
//! - Access: the host asserts capabilities via X-User-Capabilities; checked
//!   only when ENFORCE_CAPABILITY is set.
//!
//! Run:
//! ```bash
//! # pretty logs (default); PORT optional
//! cargo run -p admin-server
//!
//! # offer pages from a SQLite table
//! PAGES_PROVIDER=sqlite DB_PATH=./data/pages.db cargo run -p admin-server
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.
//!

mod config;
mod render;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use domain::adapters::memory_source::InMemoryContentSource;
use domain::form::CampaignSubmission;
use domain::service::{CampaignService, FormOutcome};
use domain::{
    AdminPage, CampaignFields, ContentSource, CoreError, DestinationCandidate, URL_CREATOR_PAGE,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const CAPABILITIES_HEADER: &str = "x-user-capabilities";

// Page source supporting memory or sqlite (feature-gated).
enum AnyPages {
    Memory(InMemoryContentSource),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite_adapter::SqlitePageSource),
}

impl ContentSource for AnyPages {
    fn site_url(&self) -> Result<String, CoreError> {
        match self {
            AnyPages::Memory(s) => s.site_url(),
            #[cfg(feature = "sqlite")]
            AnyPages::Sqlite(s) => s.site_url(),
        }
    }

    fn published_items(&self) -> Result<Vec<DestinationCandidate>, CoreError> {
        match self {
            AnyPages::Memory(s) => s.published_items(),
            #[cfg(feature = "sqlite")]
            AnyPages::Sqlite(s) => s.published_items(),
        }
    }
}

#[derive(Clone)]
struct AppState {
    service: Arc<CampaignService<AnyPages>>,
    page: &'static AdminPage,
    enforce_capability: bool,
}

#[tokio::main]
async fn main() {
    // Load and validate config first (fail fast on misconfiguration)
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&cfg);
    cfg.warn_if_insecure();

    let pages = build_pages_from_config(&cfg);
    let state = AppState {
        service: Arc::new(CampaignService::new(pages, cfg.destination_policy)),
        page: &URL_CREATOR_PAGE,
        enforce_capability: cfg.enforce_capability,
    };
    let service_policy = state.service.policy();

    // Request ID header name
    let x_request_id = axum::http::HeaderName::from_static("x-request-id");

    let mut app = build_router(state)
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid));

    // CORS - already validated in Config::from_env()
    let cors = if cfg.cors_allow_origin == HeaderValue::from_static("*") {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([cfg.cors_allow_origin]))
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::HeaderName::from_static(CAPABILITIES_HEADER),
            ])
    };
    app = app.layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    info!(
        %addr,
        page = %URL_CREATOR_PAGE.path(),
        destination_policy = service_policy.as_str(),
        "admin-server listening"
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind port");
    axum::serve(listener, app).await.expect("server error");
}

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
    }
}

// Construct a page source based on config and feature flags.
fn build_pages_from_config(cfg: &config::Config) -> AnyPages {
    match cfg.pages_provider {
        #[cfg(feature = "sqlite")]
        config::PagesProvider::Sqlite => {
            match sqlite_adapter::SqlitePageSource::open_creating_dir(&cfg.db_path, cfg.site_url.clone()) {
                Ok(s) => AnyPages::Sqlite(s),
                Err(e) => {
                    error!(err = %e, db_path = %cfg.db_path.display(), "failed to open page database, using memory");
                    AnyPages::Memory(InMemoryContentSource::new(cfg.site_url.clone()))
                }
            }
        }
        _ => AnyPages::Memory(InMemoryContentSource::new(cfg.site_url.clone())),
    }
}

fn build_router(state: AppState) -> Router {
    let page = state.page;
    register_admin_page(Router::new(), page)
        .route("/api/destinations", get(list_destinations))
        .route("/api/campaign-urls", post(create_campaign_url))
        .with_state(state)
}

/// Mount the admin page: one GET/POST route at the page path, rendered by the
/// form handlers.
fn register_admin_page(router: Router<AppState>, page: &AdminPage) -> Router<AppState> {
    info!(
        title = page.page_title,
        menu_title = page.menu_title,
        capability = page.capability,
        path = %page.path(),
        "registering admin page"
    );
    router.route(&page.path(), get(show_form).post(submit_form))
}

/// Check the host-asserted capability list when enforcement is on.
fn check_capability(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    if !state.enforce_capability {
        return Ok(());
    }
    let granted = headers
        .get(CAPABILITIES_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|caps| caps.split(',').any(|c| c.trim() == state.page.capability))
        .unwrap_or(false);
    if granted {
        Ok(())
    } else {
        warn!(capability = state.page.capability, "capability missing");
        Err((
            StatusCode::FORBIDDEN,
            Json(http_common::json_error_with_message(
                "forbidden",
                &format!("requires capability {}", state.page.capability),
            )),
        )
            .into_response())
    }
}

fn source_error(e: CoreError) -> Response {
    error!(err = %e, "content source error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(http_common::json_err("internal")),
    )
        .into_response()
}

fn log_outcome(outcome: &FormOutcome) {
    if outcome.destination_rejected {
        warn!("select-page not among offered destinations; using none");
    }
    match &outcome.result {
        Ok(url) => info!(url = %url, "campaign url generated"),
        Err(missing) => info!(missing = %missing, "campaign url not generated"),
    }
}

async fn show_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_capability(&state, &headers) {
        return resp;
    }
    let candidates = match state.service.candidates() {
        Ok(c) => c,
        Err(e) => return source_error(e),
    };
    let fields = CampaignFields::default();
    Html(render::render_page(&render::PageView {
        page: state.page,
        fields: &fields,
        candidates: &candidates,
        result: None,
    }))
    .into_response()
}

async fn submit_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    if let Err(resp) = check_capability(&state, &headers) {
        return resp;
    }
    // Raw pairs so repeated keys keep the last value instead of rejecting.
    let submission = CampaignSubmission::from_pairs(pairs);
    let outcome = match state.service.generate(&submission) {
        Ok(o) => o,
        Err(e) => return source_error(e),
    };
    log_outcome(&outcome);
    Html(render::render_page(&render::PageView {
        page: state.page,
        fields: &outcome.fields,
        candidates: &outcome.candidates,
        result: Some(&outcome.result),
    }))
    .into_response()
}

async fn list_destinations(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_capability(&state, &headers) {
        return resp;
    }
    match state.service.candidates() {
        Ok(c) => (StatusCode::OK, Json(c)).into_response(),
        Err(e) => source_error(e),
    }
}

#[derive(Serialize)]
struct CampaignUrlOut {
    url: String,
    fields: CampaignFields,
}

async fn create_campaign_url(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(submission): Json<CampaignSubmission>,
) -> Response {
    if let Err(resp) = check_capability(&state, &headers) {
        return resp;
    }
    let outcome = match state.service.generate(&submission) {
        Ok(o) => o,
        Err(e) => return source_error(e),
    };
    log_outcome(&outcome);
    match outcome.result {
        Ok(url) => (
            StatusCode::OK,
            Json(CampaignUrlOut {
                url: url.into_string(),
                fields: outcome.fields,
            }),
        )
            .into_response(),
        Err(missing) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(http_common::json_missing_fields(
                missing.iter().map(|m| m.as_str()),
            )),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use domain::destination::DestinationPolicy;
    use tower::util::ServiceExt;

    fn app_with(policy: DestinationPolicy, enforce_capability: bool) -> Router {
        let pages = InMemoryContentSource::new("https://example.com");
        pages
            .add_page("12", "Spring Sale", "https://example.com/spring-sale/")
            .unwrap();
        let state = AppState {
            service: Arc::new(CampaignService::new(AnyPages::Memory(pages), policy)),
            page: &URL_CREATOR_PAGE,
            enforce_capability,
        };
        build_router(state)
    }

    fn app() -> Router {
        app_with(DestinationPolicy::Trusted, false)
    }

    async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/admin/tools/url-creator")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/campaign-urls")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn form_renders_with_destinations() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/admin/tools/url-creator")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("Generate a custom campaign URL"));
        assert!(html.contains(r#"<option value="https://example.com/spring-sale/">Spring Sale</option>"#));
        assert!(!html.contains("<code"));
    }

    #[tokio::test]
    async fn form_submit_generates_url() {
        let resp = app()
            .oneshot(form_post(
                "source=google&medium=cpc&term=&content=&name=spring+sale&select-page=https%3A%2F%2Fexample.com%2F&submit=Generate",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains(
            r#"<code id="campaign-url">https://example.com/?utm_source=google&amp;utm_medium=cpc&amp;utm_campaign=spring%20sale</code>"#
        ));
        assert!(!html.contains(r#"class="notice notice-error""#));
    }

    #[tokio::test]
    async fn form_submit_keeps_unlisted_destination_selected() {
        let resp = app()
            .oneshot(form_post(
                "source=g&medium=m&name=n&select-page=https%3A%2F%2Fother.test%2Fx",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains(r#"<code id="campaign-url">https://other.test/x?utm_source=g"#));
        assert!(html.contains(
            r#"<option value="https://other.test/x" selected>https://other.test/x</option>"#
        ));
        assert_eq!(html.matches(" selected>").count(), 1);
    }

    #[tokio::test]
    async fn form_submit_repeated_key_keeps_last_value() {
        let resp = app()
            .oneshot(form_post("source=a&source=b&medium=cpc&name=n"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains(
            r#"<code id="campaign-url">?utm_source=b&amp;utm_medium=cpc&amp;utm_campaign=n</code>"#
        ));
        assert!(html.contains(r#"name="source" id="source" value="b""#));
    }

    #[tokio::test]
    async fn form_submit_reports_missing_fields() {
        let resp = app()
            .oneshot(form_post("source=news+letter&medium=&name="))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("<li>Campaign Medium is required</li>"));
        assert!(html.contains("<li>Campaign Name is required</li>"));
        assert!(html.contains(r#"value="news%20letter""#));
        assert!(!html.contains("<code"));
    }

    #[tokio::test]
    async fn api_returns_url_and_fields() {
        let resp = app()
            .oneshot(json_post(
                r#"{"source":"google","medium":"cpc","term":"shoes","content":"banner1","name":"spring_sale","select-page":"https://example.com/"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        let url = v["url"].as_str().unwrap();
        assert_eq!(
            url,
            "https://example.com/?utm_source=google&utm_medium=cpc&utm_term=shoes&utm_content=banner1&utm_campaign=spring_sale"
        );
        assert_eq!(http_common::raw_query_param(url, "utm_term"), Some("shoes"));
        assert_eq!(v["fields"]["destination_url"], "https://example.com/");
    }

    #[tokio::test]
    async fn api_missing_fields_is_unprocessable() {
        let resp = app()
            .oneshot(json_post(r#"{"medium":"cpc"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["error"]["code"], "missing_required_field");
        assert_eq!(v["error"]["missing"], serde_json::json!(["source", "name"]));
    }

    #[tokio::test]
    async fn destinations_list_includes_synthetic_options() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/api/destinations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        let ids: Vec<&str> = v
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["none", "home", "12"]);
    }

    #[tokio::test]
    async fn validated_policy_drops_unknown_destination() {
        let resp = app_with(DestinationPolicy::Validated, false)
            .oneshot(json_post(
                r#"{"source":"g","medium":"m","name":"n","select-page":"https://evil.test/"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["url"], "?utm_source=g&utm_medium=m&utm_campaign=n");
    }

    #[tokio::test]
    async fn capability_is_enforced_when_enabled() {
        let router = app_with(DestinationPolicy::Trusted, true);

        let resp = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/tools/url-creator")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/tools/url-creator")
                    .header(CAPABILITIES_HEADER, "read, manage_options")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
