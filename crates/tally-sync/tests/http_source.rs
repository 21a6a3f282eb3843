//! HTTP catalog source against a local inventory server.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use tally_core::{ChangePolicy, Money};
use tally_sync::source::SESSION_HEADER;
use tally_sync::{CatalogSource, HttpCatalogSource, HttpSourceConfig, Store, SyncError};

const CATALOG: &str = r#"{
    "Box1": { "label": "Box of Pens", "imageUrl": "images/pens.png", "price": 5, "quantity": 7 },
    "Tent": { "label": "Camping Tent", "imageUrl": "images/tent.png", "price": 49.99, "quantity": 2 }
}"#;

#[derive(Default)]
struct ServerState {
    /// Requests answered with 500 before the catalog is served.
    failures_left: AtomicUsize,
    requests: AtomicUsize,
    sessions: Mutex<Vec<String>>,
    body: Mutex<String>,
}

async fn products(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if let Some(session) = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) {
        state.sessions.lock().unwrap().push(session.to_string());
    }

    let failing = state
        .failures_left
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "try again").into_response();
    }

    let body = state.body.lock().unwrap().clone();
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn spawn_server(failures: usize, body: &str) -> (Url, Arc<ServerState>) {
    let state = Arc::new(ServerState::default());
    state.failures_left.store(failures, Ordering::SeqCst);
    *state.body.lock().unwrap() = body.to_string();

    let app = Router::new()
        .route("/products", get(products))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = Url::parse(&format!("http://{}/products", addr)).unwrap();
    (url, state)
}

fn source_for(url: Url, max_attempts: u32) -> HttpCatalogSource {
    HttpCatalogSource::new(HttpSourceConfig {
        products_url: url,
        request_timeout: Duration::from_secs(2),
        max_attempts,
        initial_backoff: Duration::from_millis(5),
        max_backoff: Duration::from_millis(20),
        session_id: "session-under-test".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetches_catalog() {
    let (url, state) = spawn_server(0, CATALOG).await;
    let source = source_for(url, 3);

    let catalog = source.fetch_catalog().await.unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog["Box1"].label, "Box of Pens");
    assert_eq!(catalog["Box1"].price, Money::from_major(5));
    assert_eq!(catalog["Tent"].price, Money::from_cents(4999));
    assert_eq!(state.requests.load(Ordering::SeqCst), 1);
    assert_eq!(
        state.sessions.lock().unwrap().as_slice(),
        ["session-under-test".to_string()]
    );
}

#[tokio::test]
async fn test_retries_after_server_errors() {
    let (url, state) = spawn_server(2, CATALOG).await;
    let source = source_for(url, 3);

    let catalog = source.fetch_catalog().await.unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(state.requests.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_gives_up_after_attempt_budget() {
    let (url, state) = spawn_server(10, CATALOG).await;
    let source = source_for(url, 3);

    let err = source.fetch_catalog().await.unwrap_err();

    match err {
        SyncError::RetriesExhausted {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("500"));
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }
    assert_eq!(state.requests.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_malformed_body_is_retried_then_reported() {
    let (url, _) = spawn_server(0, "{ not json").await;
    let source = source_for(url, 2);

    match source.fetch_catalog().await {
        Err(SyncError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 2),
        other => panic!("unexpected result: {:?}", other.map(|c| c.len())),
    }
}

#[tokio::test]
async fn test_store_checkout_over_http() {
    let (url, state) = spawn_server(0, CATALOG).await;
    let store = Store::new(Arc::new(source_for(url, 3)), ChangePolicy::Both);

    store.sync_with_server().await.unwrap();
    store.add_item_to_cart("Box1").unwrap();
    store.add_item_to_cart("Box1").unwrap();
    assert_eq!(store.get_item_quantity("Box1").unwrap(), 5);

    let outcome = store.check_out().await.unwrap();
    assert_eq!(outcome.to_string(), "The total price is $10.00");

    // price and stock both move on the server
    *state.body.lock().unwrap() = CATALOG
        .replace("\"price\": 5, \"quantity\": 7", "\"price\": 6, \"quantity\": 1");

    let outcome = store.check_out().await.unwrap();
    assert_eq!(
        outcome.to_string(),
        "Price of Box1 changed from $5.00 to $6.00\nQuantity of Box1 changed from 7 to 1\n"
    );
    assert_eq!(store.cart_quantity("Box1"), 1);
    assert_eq!(store.get_item_quantity("Box1").unwrap(), 0);
}
