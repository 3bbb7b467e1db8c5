//! Drives `HttpBackend` against an in-process axum server that mimics the
//! contest-sync backend.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use contest_sync_core::controller::REAUTH_GUIDANCE;
use contest_sync_core::{
    AuthState, Backend, ClientConfig, Contest, HttpBackend, SessionSyncController, SyncState,
    View, cookies,
};

const SESSION: &str = "session=s3cret";

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .any(|c| c.trim() == SESSION)
}

fn unauthenticated() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Not authenticated" })),
    )
        .into_response()
}

async fn check_auth(headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "is_logged_in": false })),
        )
            .into_response();
    }
    Json(json!({
        "is_logged_in": true,
        "user": { "id": "1057", "email": "a@b.com" }
    }))
    .into_response()
}

async fn manual_sync(headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return unauthenticated();
    }
    Json(json!({
        "message": "Sync complete. Added 1 new events to your calendar.",
        "new_contests_added": 1,
        "total_contests_checked": 9,
        "new_contests": [{
            "platform": "Codeforces",
            "title": "Round 999",
            "url": "https://codeforces.com/contest/2999",
            "start": "2025-06-01T14:35:00+00:00"
        }]
    }))
    .into_response()
}

async fn slow_sync() -> Response {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "message": "too late" })).into_response()
}

async fn logout() -> Response {
    (
        [(header::SET_COOKIE, "session=; Max-Age=0; Path=/")],
        Json(json!({ "message": "Logged out successfully." })),
    )
        .into_response()
}

fn routes_under(prefix: &str) -> Router {
    Router::new()
        .route(&format!("{prefix}/check-auth"), get(check_auth))
        .route(&format!("{prefix}/"), post(manual_sync))
        .route(&format!("{prefix}/logout"), post(logout))
}

fn routes() -> Router {
    routes_under("")
}

async fn spawn_backend(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn backend_for(base_url: String) -> HttpBackend {
    HttpBackend::new(&ClientConfig::with_base_url(base_url)).unwrap()
}

#[tokio::test]
async fn test_without_cookie_is_logged_out() {
    let addr = spawn_backend(routes()).await;
    let controller = SessionSyncController::new(backend_for(format!("http://{addr}")));

    assert_eq!(controller.check_auth().await, AuthState::logged_out());
    assert_eq!(
        controller.view(),
        View::LoginPrompt {
            login_url: format!("http://{addr}/login").parse().unwrap(),
            notice: None,
        }
    );
}

#[tokio::test]
async fn test_full_session_round_trip() {
    let addr = spawn_backend(routes()).await;
    let backend = backend_for(format!("http://{addr}"));
    assert!(cookies::import_cookie(backend.jar(), backend.base_url(), SESSION));

    let controller = SessionSyncController::new(backend);

    let auth = controller.check_auth().await;
    assert_eq!(
        auth,
        AuthState::LoggedIn {
            email: "a@b.com".into(),
            user_id: Some("1057".into()),
        }
    );

    let state = controller.sync().await.unwrap();
    assert!(state.is_complete());
    assert!(!state.is_loading());
    assert_eq!(
        state.message(),
        "Sync complete. Added 1 new events to your calendar."
    );
    let contests = state.new_contests();
    assert_eq!(contests.len(), 1);
    assert_eq!(contests[0].platform, "Codeforces");
    assert_eq!(contests[0].title, "Round 999");
    assert_eq!(
        contests[0].url.as_deref(),
        Some("https://codeforces.com/contest/2999")
    );

    controller.logout().await;
    assert_eq!(controller.auth(), AuthState::logged_out());
    assert_eq!(controller.sync_state(), SyncState::Idle);
    // The backend expired the cookie, so the jar is empty again.
    assert_eq!(controller.backend().session_cookies(), None);
}

#[tokio::test]
async fn test_sync_without_session_surfaces_backend_error() {
    let addr = spawn_backend(routes()).await;
    let controller = SessionSyncController::new(backend_for(format!("http://{addr}")));

    let state = controller.sync().await.unwrap();

    assert!(state.is_failed());
    assert_eq!(
        state.message(),
        format!("Not authenticated. {REAUTH_GUIDANCE}")
    );
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let addr = spawn_backend(routes_under("/api")).await;
    let backend = backend_for(format!("http://{addr}/api"));
    cookies::import_cookie(backend.jar(), backend.base_url(), SESSION);

    assert_eq!(
        backend.login_url().as_str(),
        format!("http://{addr}/api/login")
    );

    let controller = SessionSyncController::new(backend);
    assert!(controller.check_auth().await.is_logged_in());
    assert!(controller.sync().await.unwrap().is_complete());
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Bind then drop, so nothing is listening on the port.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let controller = SessionSyncController::new(backend_for(format!("http://{addr}")));

    match controller.check_auth().await {
        AuthState::LoggedOut { notice: Some(_) } => {}
        other => panic!("expected logged out with notice, got {other:?}"),
    }

    let state = controller.sync().await.unwrap();
    assert!(state.is_failed());
    assert!(
        state
            .message()
            .starts_with("Failed to connect to the backend")
    );

    // Logout still resets local state even though the call fails.
    controller.logout().await;
    assert_eq!(controller.auth(), AuthState::logged_out());
}

#[tokio::test]
async fn test_request_timeout() {
    // Under a `/slow` base, the sync endpoint is POST /slow/.
    let addr = spawn_backend(Router::new().route("/slow/", post(slow_sync))).await;
    let mut config = ClientConfig::with_base_url(format!("http://{addr}/slow"));
    config.request_timeout = Some("200ms".into());

    let controller = SessionSyncController::new(HttpBackend::new(&config).unwrap());
    let state = controller.sync().await.unwrap();

    assert!(state.is_failed());
    assert!(state.message().starts_with("The backend did not respond in time"));
}

#[tokio::test]
async fn test_session_survives_restart_via_cookie_file() {
    let addr = spawn_backend(routes()).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.cookies");

    {
        let backend = backend_for(format!("http://{addr}"));
        cookies::import_cookie(backend.jar(), backend.base_url(), SESSION);
        cookies::save_jar(backend.jar(), backend.base_url(), &path).unwrap();
    }

    let config = ClientConfig::with_base_url(format!("http://{addr}"));
    let origin = config.base_url().unwrap();
    let jar = cookies::load_jar(&origin, &path).unwrap();
    let controller = SessionSyncController::new(HttpBackend::with_jar(&config, jar).unwrap());

    assert_eq!(
        controller.check_auth().await.user_email(),
        Some("a@b.com")
    );
    assert_eq!(
        controller.sync().await.unwrap().new_contests()[0],
        Contest {
            platform: "Codeforces".into(),
            title: "Round 999".into(),
            url: Some("https://codeforces.com/contest/2999".into()),
            start: Some("2025-06-01T14:35:00Z".parse().unwrap()),
        }
    );
}
