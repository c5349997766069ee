//! Integration tests for `ApiClient` against a local stand-in backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use serde_json::{json, Value};

use cova_core::auth::FileTokenStore;
use cova_core::forms::BookingForm;
use cova_core::models::{bestsellers, OrderRequest, SignupProfile};
use cova_core::{ApiClient, MemoryTokenStore, RequestError, TokenStore};

/// A request as the backend saw it
#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: String,
}

impl Seen {
    fn authorization(&self) -> Option<&str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone, Default)]
struct MockBackend {
    routes: Arc<Mutex<HashMap<(Method, String), (StatusCode, String)>>>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockBackend {
    fn respond(&self, method: Method, path: &str, status: StatusCode, body: impl Into<String>) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), (status, body.into()));
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn last(&self) -> Seen {
        self.seen().last().cloned().expect("no request reached the backend")
    }

    async fn spawn(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

async fn handle(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    backend.seen.lock().unwrap().push(Seen {
        method: method.clone(),
        path: uri.path().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let routes = backend.routes.lock().unwrap();
    let (status, body) = routes
        .get(&(method, uri.path().to_string()))
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, r#"{"detail":"Not Found"}"#.to_string()));
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

async fn setup() -> (MockBackend, ApiClient, Arc<MemoryTokenStore>) {
    let backend = MockBackend::default();
    let base_url = backend.spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    let api = ApiClient::new(base_url, store.clone()).unwrap();
    (backend, api, store)
}

fn request_error(err: &anyhow::Error) -> &RequestError {
    err.downcast_ref::<RequestError>()
        .expect("expected a RequestError")
}

#[tokio::test]
async fn test_get_without_credential_sends_no_authorization() {
    let (backend, api, _store) = setup().await;
    backend.respond(Method::GET, "/menu", StatusCode::OK, "[]");

    let body: Value = api.get("/menu").await.unwrap();
    assert_eq!(body, json!([]));

    let seen = backend.last();
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.path, "/menu");
    assert_eq!(seen.authorization(), None);
    assert_eq!(seen.content_type(), Some("application/json"));
}

#[tokio::test]
async fn test_authorization_present_iff_credential_stored() {
    let (backend, api, store) = setup().await;
    backend.respond(Method::GET, "/location", StatusCode::OK, "{}");
    backend.respond(Method::POST, "/orders", StatusCode::CREATED, r#"{"ok":true}"#);

    store.set_credential("t1").unwrap();
    let _: Value = api.get("/location").await.unwrap();
    assert_eq!(backend.last().authorization(), Some("Bearer t1"));

    let _: Value = api.post("/orders", &json!({"items": []})).await.unwrap();
    assert_eq!(backend.last().authorization(), Some("Bearer t1"));

    store.clear_credential().unwrap();
    let _: Value = api.get("/location").await.unwrap();
    assert_eq!(backend.last().authorization(), None);
}

#[tokio::test]
async fn test_non_success_status_is_request_error_with_body() {
    let (backend, api, _store) = setup().await;
    backend.respond(Method::GET, "/menu", StatusCode::INTERNAL_SERVER_ERROR, "database down");

    let err = api.get::<Value>("/menu").await.unwrap_err();
    let err = request_error(&err);
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.body, "database down");

    // A JSON body on an error status is still an error
    backend.respond(Method::POST, "/bookings", StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail":"bad"}"#);
    let err = api.post::<_, Value>("/bookings", &json!({})).await.unwrap_err();
    let err = request_error(&err);
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err.body, r#"{"detail":"bad"}"#);

    // Unrouted path answers 404
    let err = api.get::<Value>("/nowhere").await.unwrap_err();
    assert_eq!(request_error(&err).status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_sends_json_payload() {
    let (backend, api, _store) = setup().await;
    backend.respond(Method::POST, "/bookings", StatusCode::CREATED, r#"{"id":"b1"}"#);

    let form = BookingForm {
        name: "Ana".to_string(),
        phone: "555-0100".to_string(),
        email: "ana@example.com".to_string(),
        date: "2026-11-02".to_string(),
        time: "19:30".to_string(),
        guests: "4".to_string(),
        notes: String::new(),
    };
    let booking = form.validate().unwrap();
    let response = api.create_booking(&booking).await.unwrap();
    assert_eq!(response, json!({"id": "b1"}));

    let seen = backend.last();
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.content_type(), Some("application/json"));
    let sent: Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(
        sent,
        json!({
            "name": "Ana",
            "phone": "555-0100",
            "email": "ana@example.com",
            "date": "2026-11-02",
            "time": "19:30",
            "guests": 4
        })
    );
}

#[tokio::test]
async fn test_sign_in_then_menu_carries_bearer() {
    let (backend, api, store) = setup().await;
    backend.respond(Method::POST, "/auth/token", StatusCode::OK, r#"{"access_token":"abc"}"#);
    backend.respond(
        Method::GET,
        "/menu",
        StatusCode::OK,
        r#"[{"_id":"1","name":"Soup","price":5,"is_bestseller":true}]"#,
    );

    let session = api.authenticate("ana@example.com", "p&ss word").await.unwrap();
    assert_eq!(session.token(), Some("abc"));
    assert_eq!(store.get_credential().unwrap().as_deref(), Some("abc"));

    let sign_in = backend.last();
    assert_eq!(sign_in.path, "/auth/token");
    assert_eq!(sign_in.authorization(), None);
    assert_eq!(
        sign_in.content_type(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(sign_in.body, "username=ana%40example.com&password=p%26ss+word");

    let menu = api.fetch_menu().await.unwrap();
    assert_eq!(backend.last().authorization(), Some("Bearer abc"));
    assert_eq!(menu.len(), 1);
    assert_eq!(bestsellers(&menu).len(), 1);
}

#[tokio::test]
async fn test_sign_in_never_sends_existing_token() {
    let (backend, api, store) = setup().await;
    backend.respond(Method::POST, "/auth/token", StatusCode::OK, r#"{"access_token":"new"}"#);
    store.set_credential("old").unwrap();

    api.authenticate("ana@example.com", "pw").await.unwrap();
    assert_eq!(backend.last().authorization(), None);
    assert_eq!(store.get_credential().unwrap().as_deref(), Some("new"));
}

#[tokio::test]
async fn test_failed_sign_in_keeps_previous_credential() {
    let (backend, api, store) = setup().await;
    backend.respond(
        Method::POST,
        "/auth/token",
        StatusCode::UNAUTHORIZED,
        r#"{"detail":"Incorrect username or password"}"#,
    );
    store.set_credential("previous").unwrap();

    let err = api.authenticate("ana@example.com", "wrong").await.unwrap_err();
    assert!(request_error(&err).is_unauthorized());
    assert_eq!(store.get_credential().unwrap().as_deref(), Some("previous"));
}

#[tokio::test]
async fn test_sign_in_without_token_stores_nothing() {
    let (backend, api, store) = setup().await;
    backend.respond(Method::POST, "/auth/token", StatusCode::OK, r#"{"token_type":"bearer"}"#);

    let session = api.authenticate("ana@example.com", "pw").await.unwrap();
    assert_eq!(session.token(), None);
    assert_eq!(store.get_credential().unwrap(), None);
}

#[tokio::test]
async fn test_register_stores_token_when_returned() {
    let (backend, api, store) = setup().await;
    backend.respond(
        Method::POST,
        "/auth/signup",
        StatusCode::CREATED,
        r#"{"access_token":"fresh","user":{"name":"Ana"}}"#,
    );
    store.set_credential("stale").unwrap();

    let profile = SignupProfile {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        password: "pw".to_string(),
        phone: String::new(),
    };
    let session = api.register(&profile).await.unwrap();
    assert!(session.extra.contains_key("user"));
    assert_eq!(store.get_credential().unwrap().as_deref(), Some("fresh"));

    let seen = backend.last();
    assert_eq!(seen.path, "/auth/signup");
    assert_eq!(seen.authorization(), None);
    let sent: Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(
        sent,
        json!({"name": "Ana", "email": "ana@example.com", "password": "pw", "phone": ""})
    );
}

#[tokio::test]
async fn test_register_without_token_and_failure() {
    let (backend, api, store) = setup().await;
    let profile = SignupProfile {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        password: "pw".to_string(),
        phone: "555-0100".to_string(),
    };

    backend.respond(Method::POST, "/auth/signup", StatusCode::CREATED, r#"{"message":"created"}"#);
    api.register(&profile).await.unwrap();
    assert_eq!(store.get_credential().unwrap(), None);

    backend.respond(Method::POST, "/auth/signup", StatusCode::BAD_REQUEST, "Email already registered");
    let err = api.register(&profile).await.unwrap_err();
    assert_eq!(request_error(&err).body, "Email already registered");
    assert_eq!(store.get_credential().unwrap(), None);
}

#[tokio::test]
async fn test_failed_booking_changes_nothing() {
    let (backend, api, store) = setup().await;
    backend.respond(Method::POST, "/bookings", StatusCode::INTERNAL_SERVER_ERROR, "boom");
    store.set_credential("abc").unwrap();

    let booking = BookingForm {
        name: "Ana".to_string(),
        phone: "555-0100".to_string(),
        date: "2026-11-02".to_string(),
        time: "19:30".to_string(),
        guests: "2".to_string(),
        ..Default::default()
    }
    .validate()
    .unwrap();

    let err = api.create_booking(&booking).await.unwrap_err();
    assert_eq!(request_error(&err).status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.get_credential().unwrap().as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_order_posts_first_item_total() {
    let (backend, api, _store) = setup().await;
    backend.respond(
        Method::GET,
        "/menu",
        StatusCode::OK,
        r#"[{"_id":1,"name":"Soup","price":5},{"_id":2,"name":"Pie","price":4}]"#,
    );
    backend.respond(Method::POST, "/orders", StatusCode::CREATED, r#"{"id":"o1"}"#);

    let menu = api.fetch_menu().await.unwrap();
    let order = OrderRequest::first_item(&menu, "1 Harbour St", "");
    api.create_order(&order).await.unwrap();

    let sent: Value = serde_json::from_str(&backend.last().body).unwrap();
    assert_eq!(
        sent,
        json!({
            "items": [{"item_id": "1", "quantity": 1}],
            "total": 5.0,
            "address": "1 Harbour St",
            "notes": ""
        })
    );
}

#[tokio::test]
async fn test_location_fetch() {
    let (backend, api, _store) = setup().await;
    backend.respond(
        Method::GET,
        "/location",
        StatusCode::OK,
        r#"{"address":"1 Harbour St","phone":"555-0100","opening_hours":"12-23","lat":1.5,"lng":2.5}"#,
    );

    let location = api.fetch_location().await.unwrap();
    assert_eq!(location.address.as_deref(), Some("1 Harbour St"));
    assert_eq!(
        location.maps_url().as_deref(),
        Some("https://www.google.com/maps?q=1.5,2.5")
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_not_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(format!("http://{}", addr), Arc::new(MemoryTokenStore::new())).unwrap();
    let err = api.fetch_menu().await.unwrap_err();
    assert!(err.downcast_ref::<RequestError>().is_none());
}

#[tokio::test]
async fn test_file_store_credential_survives_new_client() {
    let (backend, base_url) = {
        let backend = MockBackend::default();
        let base_url = backend.spawn().await;
        (backend, base_url)
    };
    backend.respond(Method::POST, "/auth/token", StatusCode::OK, r#"{"access_token":"disk"}"#);
    backend.respond(Method::GET, "/menu", StatusCode::OK, "[]");

    let dir = tempfile::tempdir().unwrap();
    let first = ApiClient::new(
        base_url.clone(),
        Arc::new(FileTokenStore::new(dir.path().to_path_buf())),
    )
    .unwrap();
    first.authenticate("ana@example.com", "pw").await.unwrap();

    // Simulates a restart
    let second = ApiClient::new(
        base_url,
        Arc::new(FileTokenStore::new(dir.path().to_path_buf())),
    )
    .unwrap();
    assert!(second.is_authenticated().unwrap());
    second.fetch_menu().await.unwrap();
    assert_eq!(backend.last().authorization(), Some("Bearer disk"));

    second.logout().unwrap();
    assert!(!first.is_authenticated().unwrap());
}
