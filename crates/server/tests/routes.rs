use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::{Request, StatusCode}, Router};
use configs::CacheConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::{startup::build_app, state::ServerState};
use service::errors::ServiceError;
use service::spaceship::{repository::memory::InMemorySpaceshipRepository, Spaceship, SpaceshipRepository, SpaceshipService};

fn app_with(repo: Arc<dyn SpaceshipRepository>) -> Router {
    build_app(ServerState::new(SpaceshipService::new(repo, &CacheConfig::default())))
}

async fn seeded(n: usize) -> Arc<InMemorySpaceshipRepository> {
    let repo = Arc::new(InMemorySpaceshipRepository::default());
    for i in 0..n {
        repo.insert(&format!("ship-{i}"), "Test").await.unwrap();
    }
    repo
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let app = app_with(seeded(0).await);
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn list_defaults_to_first_ten() {
    let app = app_with(seeded(12).await);

    let (status, body) = send(&app, get("/api/spaceships")).await;
    assert_eq!(status, StatusCode::OK);
    let ships = body.as_array().unwrap();
    assert_eq!(ships.len(), 10);
    assert_eq!(ships[0]["id"], 1);

    let (_, body) = send(&app, get("/api/spaceships?page=1&size=10")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, get("/api/spaceships?page=9")).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_rejects_invalid_pagination() {
    let app = app_with(seeded(1).await);
    let (status, body) = send(&app, get("/api/spaceships?page=0&size=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["message"], "Page size must not be less than one");
    assert_eq!(body["path"], "/api/spaceships");

    let (status, _) = send(&app, get("/api/spaceships?page=-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_by_id_found_and_missing() {
    let app = app_with(seeded(2).await);

    let (status, body) = send(&app, get("/api/spaceships/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 2, "name": "ship-1", "series": "Test"}));

    let (status, body) = send(&app, get("/api/spaceships/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Spaceship not found with id 999");
    assert_eq!(body["path"], "/api/spaceships/999");
}

#[tokio::test]
async fn negative_id_is_still_looked_up() {
    let app = app_with(seeded(2).await);
    let (status, body) = send(&app, get("/api/spaceships/-3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/api/spaceships/-3");
}

#[tokio::test]
async fn search_is_cached_between_requests() {
    let repo = Arc::new(InMemorySpaceshipRepository::default());
    for name in ["X-Wing", "Y-Wing", "Executor"] {
        repo.insert(name, "Star Wars").await.unwrap();
    }
    let app = app_with(repo.clone());

    let (status, first) = send(&app, get("/api/spaceships/search?name=Wing")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = first.as_array().unwrap().iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["X-Wing", "Y-Wing"]);

    let (_, second) = send(&app, get("/api/spaceships/search?name=Wing")).await;
    assert_eq!(first, second);
    assert_eq!(repo.name_queries(), 1);

    let (_, none) = send(&app, get("/api/spaceships/search?name=Falcon")).await;
    assert_eq!(none, json!([]));

    let (_, all) = send(&app, get("/api/spaceships/search?name=")).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let res = app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let text = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&text).contains("spaceship_search_cache_hits_total"));
}

fn assert_error_body(body: &Value, status: StatusCode, path: &str) {
    assert_eq!(body["status"], status.as_u16());
    assert_eq!(body["error"], status.canonical_reason().unwrap());
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert_eq!(body["path"], path);
}

#[tokio::test]
async fn search_requires_name_parameter() {
    let app = app_with(seeded(1).await);
    let (status, body) = send(&app, get("/api/spaceships/search")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, StatusCode::BAD_REQUEST, "/api/spaceships/search");
}

#[tokio::test]
async fn malformed_input_gets_json_error_body() {
    let app = app_with(seeded(1).await);

    let (status, body) = send(&app, get("/api/spaceships/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, StatusCode::BAD_REQUEST, "/api/spaceships/abc");

    let (status, body) = send(&app, get("/api/spaceships?page=x")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, StatusCode::BAD_REQUEST, "/api/spaceships");

    let req = Request::builder()
        .method("POST")
        .uri("/api/spaceships")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, StatusCode::BAD_REQUEST, "/api/spaceships");

    let (status, body) = send(&app, with_json("PUT", "/api/spaceships/1", json!({"name": "no series"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_body(&body, StatusCode::UNPROCESSABLE_ENTITY, "/api/spaceships/1");

    let req = Request::builder().method("DELETE").uri("/api/spaceships/1.5").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, StatusCode::BAD_REQUEST, "/api/spaceships/1.5");

    // nothing was written
    let (_, body) = send(&app, get("/api/spaceships/1")).await;
    assert_eq!(body["name"], "ship-0");
}

#[tokio::test]
async fn create_ignores_client_id() {
    let app = app_with(seeded(3).await);
    let (status, body) = send(
        &app,
        with_json("POST", "/api/spaceships", json!({"id": 100, "name": "Y-Wing", "series": "Star Wars"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 4, "name": "Y-Wing", "series": "Star Wars"}));
}

#[tokio::test]
async fn update_takes_id_from_path() {
    let app = app_with(seeded(3).await);
    let (status, body) = send(
        &app,
        with_json("PUT", "/api/spaceships/2", json!({"id": 3, "name": "Refit", "series": "Test"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 2, "name": "Refit", "series": "Test"}));

    let (_, body) = send(&app, get("/api/spaceships/3")).await;
    assert_eq!(body["name"], "ship-2");
}

#[tokio::test]
async fn delete_returns_no_content_even_when_absent() {
    let app = app_with(seeded(1).await);
    let req = || Request::builder().method("DELETE").uri("/api/spaceships/1").body(Body::empty()).unwrap();

    let (status, body) = send(&app, req()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, req()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get("/api/spaceships/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Every operation fails the way a broken datastore would.
struct BrokenRepository;

fn broken() -> ServiceError {
    ServiceError::Db("Unexpected error".into())
}

#[async_trait]
impl SpaceshipRepository for BrokenRepository {
    async fn insert(&self, _: &str, _: &str) -> Result<Spaceship, ServiceError> { Err(broken()) }
    async fn get_by_id(&self, _: i64) -> Result<Option<Spaceship>, ServiceError> { Err(broken()) }
    async fn get_page(&self, _: u64, _: u64) -> Result<Vec<Spaceship>, ServiceError> { Err(broken()) }
    async fn find_by_name_contains(&self, _: &str) -> Result<Vec<Spaceship>, ServiceError> { Err(broken()) }
    async fn update(&self, _: &Spaceship) -> Result<Spaceship, ServiceError> { Err(broken()) }
    async fn delete(&self, _: i64) -> Result<bool, ServiceError> { Err(broken()) }
}

#[tokio::test]
async fn storage_failures_become_internal_server_error() {
    let app = app_with(Arc::new(BrokenRepository));

    let (status, body) = send(&app, get("/api/spaceships")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["message"].as_str().unwrap().contains("Unexpected error"));
    assert_eq!(body["path"], "/api/spaceships");

    let (status, body) = send(&app, get("/api/spaceships/1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["path"], "/api/spaceships/1");

    let (status, _) = send(&app, get("/api/spaceships/search?name=x")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, with_json("POST", "/api/spaceships", json!({"name": "a", "series": "b"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let req = Request::builder().method("DELETE").uri("/api/spaceships/1").body(Body::empty()).unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
