//! End-to-end session behavior against a mock backend.

use std::sync::Arc;

use serde_json::{json, Value};
use sessionward_core::auth::{CREDENTIAL_KEY, PROFILE_KEY};
use sessionward_core::notify::NotificationKind;
use sessionward_core::{
    ApiError, Config, FileStorage, MemoryStorage, Navigator, SessionApp, Storage, ToastQueue,
    UserProfile,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    durable: Arc<MemoryStorage>,
    ephemeral: Arc<MemoryStorage>,
    toasts: Arc<ToastQueue>,
    app: SessionApp,
}

fn harness_with(config: Config) -> Harness {
    let durable = Arc::new(MemoryStorage::new());
    let ephemeral = Arc::new(MemoryStorage::new());
    let toasts = Arc::new(ToastQueue::new());
    let app = SessionApp::new(&config, durable.clone(), ephemeral.clone(), toasts.clone())
        .expect("Failed to wire session app");
    Harness {
        durable,
        ephemeral,
        toasts,
        app,
    }
}

fn harness(server: &MockServer) -> Harness {
    harness_with(Config {
        api_base_url: server.uri(),
        ..Config::default()
    })
}

fn profile() -> UserProfile {
    UserProfile::new(json!({"id": 1, "name": "Ada", "email": "ada@example.com"}))
}

fn login_count(history: &[String]) -> usize {
    history.iter().filter(|p| p.as_str() == "/login").count()
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    h.durable.set(CREDENTIAL_KEY, "abc").unwrap();

    let users: Value = h.app.client.get("/api/users").await.unwrap();
    assert_eq!(users[0]["id"], 1);
}

#[tokio::test]
async fn test_no_credential_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let h = harness(&server);
    let _: Value = h.app.client.get("/api/categories").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unauthorized_ends_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/suppliers"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.app.auth.login("abc", &profile(), true).unwrap();
    assert_eq!(h.app.router.current().as_deref(), Some("/dashboard"));
    assert!(h.app.auth.get_user().is_some());

    let result: Result<Value, ApiError> = h.app.client.get("/api/suppliers").await;

    // The caller still sees the failure
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert!(h.durable.is_empty());
    assert!(h.ephemeral.is_empty());
    assert!(!h.app.auth.is_authenticated());
    assert_eq!(h.app.session.cached_user(), None);
    assert_eq!(h.app.router.current().as_deref(), Some("/login"));
    // No toast on forced expiry
    assert!(h.toasts.drain().is_empty());
}

#[tokio::test]
async fn test_concurrent_unauthorized_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.app.auth.login("abc", &profile(), false).unwrap();
    assert_eq!(h.ephemeral.get(CREDENTIAL_KEY).as_deref(), Some("abc"));

    let (first, second) = futures::join!(
        h.app.client.get::<Value>("/api/users"),
        h.app.client.get::<Value>("/api/services"),
    );

    assert!(matches!(first, Err(ApiError::Unauthorized)));
    assert!(matches!(second, Err(ApiError::Unauthorized)));
    assert!(h.durable.is_empty());
    assert!(h.ephemeral.is_empty());
    assert_eq!(
        h.app.router.history(),
        vec!["/dashboard".to_string(), "/login".to_string()]
    );
}

#[tokio::test]
async fn test_other_errors_pass_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.app.auth.login("abc", &profile(), true).unwrap();

    let result: Result<Value, ApiError> = h.app.client.get("/api/users").await;
    assert!(matches!(result, Err(ApiError::ServerError(ref body)) if body == "boom"));

    let result: Result<Value, ApiError> = h.app.client.get("/api/services").await;
    assert!(matches!(result, Err(ApiError::AccessDenied(_))));

    assert!(h.app.auth.is_authenticated());
    assert_eq!(h.durable.get(CREDENTIAL_KEY).as_deref(), Some("abc"));
    assert_eq!(h.app.router.current().as_deref(), Some("/dashboard"));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let h = harness(&server);
    let result: Result<Value, ApiError> = h.app.client.get("/api/users").await;
    assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_logout_calls_remote_with_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    h.app.auth.login("abc", &profile(), true).unwrap();
    h.app.auth.logout().await;

    assert!(h.durable.is_empty());
    assert!(h.ephemeral.is_empty());
    assert_eq!(h.app.router.current().as_deref(), Some("/login"));

    let toasts = h.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Logged out successfully");
    assert_eq!(toasts[0].kind, NotificationKind::Success);
}

#[tokio::test]
async fn test_logout_survives_remote_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.app.auth.login("abc", &profile(), true).unwrap();
    h.ephemeral.set(CREDENTIAL_KEY, "stale").unwrap();
    h.ephemeral.set(PROFILE_KEY, "{}").unwrap();
    assert!(h.app.auth.get_user().is_some());

    h.app.auth.logout().await;

    assert!(h.durable.is_empty());
    assert!(h.ephemeral.is_empty());
    assert_eq!(h.app.session.cached_user(), None);
    assert_eq!(h.app.router.current().as_deref(), Some("/login"));
    assert_eq!(h.toasts.drain().len(), 1);
}

#[tokio::test]
async fn test_logout_with_unreachable_backend() {
    // Nothing listens on the discard port
    let h = harness_with(Config {
        api_base_url: "http://127.0.0.1:9".to_string(),
        ..Config::default()
    });
    h.app.auth.login("abc", &profile(), false).unwrap();

    h.app.auth.logout().await;

    assert!(h.ephemeral.is_empty());
    assert!(!h.app.auth.is_authenticated());
    assert_eq!(h.app.router.current().as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_logout_remote_401_navigates_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.app.auth.login("abc", &profile(), true).unwrap();
    h.app.auth.logout().await;

    let history = h.app.router.history();
    assert_eq!(login_count(&history), 1);
    assert!(h.durable.is_empty());
    assert_eq!(h.toasts.drain().len(), 1);
}

#[tokio::test]
async fn test_logout_without_remote_endpoint() {
    let server = MockServer::start().await;
    let h = harness_with(Config {
        api_base_url: server.uri(),
        logout_path: None,
        ..Config::default()
    });
    h.app.auth.login("abc", &profile(), true).unwrap();

    h.app.auth.logout().await;

    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(h.durable.is_empty());
    assert_eq!(h.app.router.current().as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_route_guard_flow() {
    let server = MockServer::start().await;
    let h = harness(&server);
    let router = h.app.router.clone();

    // Signed out: everything but login sends you to login
    assert_eq!(router.navigate("/users").unwrap().location(), "/login");
    assert_eq!(router.navigate("/categories").unwrap().location(), "/login");

    // Signed in: login sends you to the landing route
    h.app.auth.login("abc", &profile(), true).unwrap();
    assert_eq!(router.current().as_deref(), Some("/dashboard"));
    assert_eq!(router.navigate("/login").unwrap().location(), "/dashboard");
    assert_eq!(router.navigate("/users").unwrap().location(), "/users");
}

#[tokio::test]
async fn test_load_user_reads_fresh_profile() {
    let server = MockServer::start().await;
    let h = harness(&server);
    h.app.auth.login("abc", &profile(), true).unwrap();
    assert_eq!(
        h.app.auth.get_user().and_then(|u| u.display_name().map(str::to_string)),
        Some("Ada".to_string())
    );

    h.durable
        .set(PROFILE_KEY, &json!({"name": "Grace"}).to_string())
        .unwrap();
    let reloaded = h.app.auth.load_user().unwrap();
    assert_eq!(reloaded.display_name(), Some("Grace"));
}

fn stored_entries(path: &std::path::Path) -> Option<serde_json::Map<String, Value>> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

#[tokio::test]
async fn test_file_tier_discards_corrupt_profile_on_disk() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let durable = Arc::new(FileStorage::new(dir.path().to_path_buf()));
    let app = SessionApp::new(
        &Config {
            api_base_url: server.uri(),
            ..Config::default()
        },
        durable.clone(),
        Arc::new(MemoryStorage::new()),
        Arc::new(ToastQueue::new()),
    )
    .unwrap();

    app.auth.login("abc", &profile(), true).unwrap();
    durable.set(PROFILE_KEY, "{not json").unwrap();
    app.session.invalidate();

    assert_eq!(app.auth.get_user(), None);

    let entries = stored_entries(durable.path()).expect("session file should remain");
    assert!(!entries.contains_key(PROFILE_KEY));
    assert_eq!(entries[CREDENTIAL_KEY], "abc");
    assert!(app.auth.is_authenticated());
}

#[tokio::test]
async fn test_file_tier_cleared_on_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let durable = Arc::new(FileStorage::new(dir.path().to_path_buf()));
    let ephemeral = Arc::new(MemoryStorage::new());
    let app = SessionApp::new(
        &Config {
            api_base_url: server.uri(),
            ..Config::default()
        },
        durable.clone(),
        ephemeral.clone(),
        Arc::new(ToastQueue::new()),
    )
    .unwrap();

    app.auth.login("abc", &profile(), true).unwrap();
    ephemeral.set(CREDENTIAL_KEY, "def").unwrap();
    assert!(durable.path().exists());

    let result: Result<Value, ApiError> = app.client.get("/api/users").await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));

    // Clearing twice leaves the same empty state
    app.store.clear_session().unwrap();

    assert_eq!(durable.get(CREDENTIAL_KEY), None);
    assert_eq!(durable.get(PROFILE_KEY), None);
    assert!(ephemeral.is_empty());
    assert!(!durable.path().exists());
    assert_eq!(app.store.get_credential(), None);
    assert_eq!(app.store.get_profile(), None);

    // A fresh handle on the same directory sees nothing either
    let reopened = FileStorage::new(dir.path().to_path_buf());
    assert_eq!(reopened.get(CREDENTIAL_KEY), None);
}
