//! End-to-end tests of the REST surface over in-memory stores.

use api_lib::{
    adapters::MemorySwapStore,
    config::Config,
    web::{build_router, error::panic_response, AppState},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{json, Value};
use skill_swap_core::{PortError, PortResult, Swap, SwapBoard, SwapStore, SystemClock};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn app_over(store: Arc<dyn SwapStore>, vars: &[(&str, &str)]) -> Router {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = Config::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap();
    let board = SwapBoard::new(store, Arc::new(SystemClock))
        .with_mutation_attempts(config.mutation_attempts);
    build_router(Arc::new(AppState {
        board,
        config: Arc::new(config),
    }))
}

fn app_with(vars: &[(&str, &str)]) -> Router {
    app_over(Arc::new(MemorySwapStore::new()), vars)
}

/// In-memory store whose conditional writes always lose to another writer.
#[derive(Default)]
struct AlwaysConflictingStore {
    inner: MemorySwapStore,
}

#[async_trait]
impl SwapStore for AlwaysConflictingStore {
    async fn list_swaps(&self) -> PortResult<Vec<Swap>> {
        self.inner.list_swaps().await
    }

    async fn insert_swap(&self, swap: Swap) -> PortResult<Swap> {
        self.inner.insert_swap(swap).await
    }

    async fn get_swap(&self, id: Uuid) -> PortResult<Swap> {
        self.inner.get_swap(id).await
    }

    async fn replace_swap(&self, expected_revision: u64, swap: Swap) -> PortResult<Swap> {
        Err(PortError::Conflict(format!(
            "Skill swap {} moved past revision {}",
            swap.id, expected_revision
        )))
    }

    async fn delete_swap(&self, id: Uuid) -> PortResult<()> {
        self.inner.delete_swap(id).await
    }
}

/// In-memory store that panics when asked for the swap list.
#[derive(Default)]
struct PanickingListStore {
    inner: MemorySwapStore,
}

#[async_trait]
impl SwapStore for PanickingListStore {
    async fn list_swaps(&self) -> PortResult<Vec<Swap>> {
        panic!("swap list is corrupted");
    }

    async fn insert_swap(&self, swap: Swap) -> PortResult<Swap> {
        self.inner.insert_swap(swap).await
    }

    async fn get_swap(&self, id: Uuid) -> PortResult<Swap> {
        self.inner.get_swap(id).await
    }

    async fn replace_swap(&self, expected_revision: u64, swap: Swap) -> PortResult<Swap> {
        self.inner.replace_swap(expected_revision, swap).await
    }

    async fn delete_swap(&self, id: Uuid) -> PortResult<()> {
        self.inner.delete_swap(id).await
    }
}

fn app() -> Router {
    app_with(&[])
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post_swap(app: &Router, student: &str) -> Value {
    let (status, swap) = send(
        app,
        Method::POST,
        "/api/swaps",
        Some(json!({
            "studentName": student,
            "department": "CS",
            "canHelpWith": "X",
            "needsHelpWith": "Y"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    swap
}

async fn post_interest(app: &Router, swap_id: &str, name: &str) -> Value {
    let (status, swap) = send(
        app,
        Method::POST,
        &format!("/api/swaps/{}/interested", swap_id),
        Some(json!({
            "name": name,
            "email": format!("{}@x.com", name.to_lowercase()),
            "preferredTime": "PM",
            "preferredLocation": "Lib"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    swap
}

fn id_of(swap: &Value) -> String {
    swap["_id"].as_str().unwrap().to_string()
}

fn interest_names(swap: &Value) -> Vec<String> {
    swap["interestedUsers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_check_answers() {
    let (status, body) = send(&app(), Method::GET, "/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Server is working!");
}

#[tokio::test]
async fn create_then_express_interest_round_trip() {
    let app = app();
    let swap = post_swap(&app, "A").await;
    assert_eq!(swap["notes"], "");
    assert_eq!(swap["interestedUsers"], json!([]));
    assert!(swap["postedAt"].is_string());

    let (status, updated) = send(
        &app,
        Method::POST,
        &format!("/api/swaps/{}/interested", id_of(&swap)),
        Some(json!({
            "name": "B",
            "email": "b@x.com",
            "preferredTime": "PM",
            "preferredLocation": "Lib"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["_id"], swap["_id"]);
    let users = updated["interestedUsers"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "B");
    assert_eq!(users[0]["email"], "b@x.com");
    assert_eq!(users[0]["preferredTime"], "PM");
    assert_eq!(users[0]["preferredLocation"], "Lib");
    assert!(users[0]["contactDate"].is_string());
    assert!(users[0]["_id"].is_string());
}

#[tokio::test]
async fn created_ids_are_unique_and_listed_newest_first() {
    let app = app();
    let first = post_swap(&app, "A").await;
    let second = post_swap(&app, "B").await;
    assert_ne!(first["_id"], second["_id"]);

    let (status, list) = send(&app, Method::GET, "/api/swaps", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&Value> = list.as_array().unwrap().iter().map(|s| &s["_id"]).collect();
    assert_eq!(ids, vec![&second["_id"], &first["_id"]]);
}

#[tokio::test]
async fn create_with_missing_field_is_rejected_and_persists_nothing() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/swaps",
        Some(json!({ "studentName": "A", "department": "CS", "canHelpWith": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("needsHelpWith"));
    assert!(body.get("details").is_none());

    let (_, list) = send(&app, Method::GET, "/api/swaps", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/swaps")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn missing_interest_fields_are_itemized() {
    let app = app();
    let swap = post_swap(&app, "A").await;
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/swaps/{}/interested", id_of(&swap)),
        Some(json!({ "name": "B", "email": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");
    assert_eq!(
        body["details"],
        json!({
            "name": null,
            "email": "Email is required",
            "preferredTime": "Preferred time is required",
            "preferredLocation": "Preferred location is required"
        })
    );
}

#[tokio::test]
async fn appended_interest_lands_last_and_leaves_others_alone() {
    let app = app();
    let swap = post_swap(&app, "A").await;
    let id = id_of(&swap);
    let before = post_interest(&app, &id, "P").await;
    post_interest(&app, &id, "Q").await;

    let (_, list) = send(&app, Method::GET, "/api/swaps", None).await;
    let listed = &list[0];
    assert_eq!(interest_names(listed), vec!["P", "Q"]);
    assert_eq!(listed["interestedUsers"][0], before["interestedUsers"][0]);
}

#[tokio::test]
async fn deleting_by_index_shifts_later_entries() {
    let app = app();
    let id = id_of(&post_swap(&app, "A").await);
    for name in ["P", "Q", "R", "S"] {
        post_interest(&app, &id, name).await;
    }

    let (status, swap) = send(
        &app,
        Method::DELETE,
        &format!("/api/swaps/{}/interested/1", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(interest_names(&swap), vec!["P", "R", "S"]);
}

#[tokio::test]
async fn empty_interest_name_is_ignored_but_empty_notes_clear() {
    let app = app();
    let id = id_of(&post_swap(&app, "A").await);
    post_interest(&app, &id, "B").await;

    let (status, swap) = send(
        &app,
        Method::PUT,
        &format!("/api/swaps/{}/interested/0", id),
        Some(json!({ "name": "", "preferredTime": "AM" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(swap["interestedUsers"][0]["name"], "B");
    assert_eq!(swap["interestedUsers"][0]["preferredTime"], "AM");

    send(
        &app,
        Method::PUT,
        &format!("/api/swaps/{}", id),
        Some(json!({ "notes": "meet weekly" })),
    )
    .await;
    let (status, swap) = send(
        &app,
        Method::PUT,
        &format!("/api/swaps/{}", id),
        Some(json!({ "notes": "", "studentName": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(swap["notes"], "");
    assert_eq!(swap["studentName"], "A");
}

#[rstest]
#[case(Method::PUT, "interested/5", Some(json!({ "name": "Z" })))]
#[case(Method::DELETE, "interested/1", None)]
#[case(Method::DELETE, "interested/abc", None)]
#[case(Method::PUT, "interested/-1", Some(json!({ "name": "Z" })))]
#[tokio::test]
async fn bad_index_on_existing_swap_is_invalid_index(
    #[case] method: Method,
    #[case] suffix: &str,
    #[case] body: Option<Value>,
) {
    let app = app();
    let id = id_of(&post_swap(&app, "A").await);
    post_interest(&app, &id, "B").await;

    let (status, response) = send(&app, method, &format!("/api/swaps/{}/{}", id, suffix), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Invalid user index");
}

#[rstest]
#[case(Method::GET, "", None)]
#[case(Method::PUT, "", Some(json!({ "notes": "x" })))]
#[case(Method::DELETE, "", None)]
#[case(Method::PUT, "/interested/0", Some(json!({ "name": "Z" })))]
#[case(Method::DELETE, "/interested/0", None)]
#[case(Method::DELETE, "/interested/abc", None)]
#[case(Method::POST, "/interested", Some(json!({
    "name": "B", "email": "b@x.com", "preferredTime": "PM", "preferredLocation": "Lib"
})))]
#[tokio::test]
async fn unknown_swap_is_not_found(
    #[case] method: Method,
    #[case] suffix: &str,
    #[case] body: Option<Value>,
    #[values("8d6f2f5c-0b7e-4d2a-9a53-3f1c2b4e5d60", "not-a-uuid")] id: &str,
) {
    let app = app();
    let (status, response) = send(&app, method, &format!("/api/swaps/{}{}", id, suffix), body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Skill swap not found");
}

#[tokio::test]
async fn deleted_swap_is_gone_for_every_operation() {
    let app = app();
    let id = id_of(&post_swap(&app, "A").await);
    post_interest(&app, &id, "B").await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/swaps/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Skill swap deleted successfully");

    let (status, _) = send(&app, Method::GET, &format!("/api/swaps/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/swaps/{}/interested/0", id),
        Some(json!({ "name": "Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stable_ids_address_interests_after_shifts() {
    let app = app();
    let id = id_of(&post_swap(&app, "A").await);
    post_interest(&app, &id, "P").await;
    let swap = post_interest(&app, &id, "Q").await;
    let q_id = swap["interestedUsers"][1]["_id"].as_str().unwrap().to_string();

    send(&app, Method::DELETE, &format!("/api/swaps/{}/interested/0", id), None).await;

    let (status, swap) = send(
        &app,
        Method::PUT,
        &format!("/api/swaps/{}/interests/{}", id, q_id),
        Some(json!({ "preferredLocation": "Cafe" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(swap["interestedUsers"][0]["name"], "Q");
    assert_eq!(swap["interestedUsers"][0]["preferredLocation"], "Cafe");

    let (status, swap) = send(
        &app,
        Method::DELETE,
        &format!("/api/swaps/{}/interests/{}", id, q_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(swap["interestedUsers"], json!([]));

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/swaps/{}/interests/{}", id, q_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Interested user not found");
}

#[tokio::test]
async fn concurrent_appends_are_all_kept() {
    let app = app_with(&[("MUTATION_ATTEMPTS", "16")]);
    let id = id_of(&post_swap(&app, "A").await);

    let names: Vec<String> = (0..8).map(|n| format!("U{}", n)).collect();
    let results = futures::future::join_all(
        names.iter().map(|name| post_interest(&app, &id, name)),
    )
    .await;
    assert_eq!(results.len(), names.len());

    let (_, swap) = send(&app, Method::GET, &format!("/api/swaps/{}", id), None).await;
    let mut stored = interest_names(&swap);
    stored.sort();
    assert_eq!(stored, names);
    assert_eq!(swap["revision"], 8);
}

#[test]
fn handler_panics_become_generic_server_errors() {
    let response = panic_response(Box::new("boom"));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, doc) = send(&app(), Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/swaps/{id}/interested/{index}"].is_object());
}

#[tokio::test]
async fn exhausted_conflict_retries_answer_409_and_keep_the_document() {
    let app = app_over(Arc::new(AlwaysConflictingStore::default()), &[]);
    let swap = post_swap(&app, "A").await;
    let id = id_of(&swap);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/swaps/{}", id),
        Some(json!({ "notes": "lost write" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({ "message": "Skill swap was modified concurrently, please retry" })
    );

    let (status, stored) = send(&app, Method::GET, &format!("/api/swaps/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, swap);
}

#[tokio::test]
async fn panicking_handler_answers_500_and_server_keeps_serving() {
    let app = app_over(Arc::new(PanickingListStore::default()), &[]);

    let (status, body) = send(&app, Method::GET, "/api/swaps", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Something went wrong!" }));

    let (status, body) = send(&app, Method::GET, "/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Server is working!");
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let app = app_with(&[("MAX_BODY_BYTES", "64")]);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/swaps",
        Some(json!({
            "studentName": "A",
            "department": "CS",
            "canHelpWith": "X",
            "needsHelpWith": "Y",
            "notes": "n".repeat(500)
        })),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["message"].as_str().unwrap().contains("length limit exceeded"));

    let (_, list) = send(&app, Method::GET, "/api/swaps", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn interest_validation_precedes_unparseable_swap_id() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/swaps/not-a-uuid/interested",
        Some(json!({ "name": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");
    assert_eq!(body["details"]["name"], Value::Null);
    assert_eq!(body["details"]["email"], "Email is required");
}
