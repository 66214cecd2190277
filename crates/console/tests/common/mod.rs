//! Stateful in-process mock of the apilink backend for controller tests.
//!
//! Unlike a canned-response stub, this mock keeps a mutable catalog so
//! structural mutations (create, delete, upload) are visible to the full
//! reload the controller performs afterwards. Tests can force individual
//! endpoints to reject and add per-endpoint latency to exercise ordering.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Form, Multipart, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Mutable backend state plus request-observation hooks.
#[derive(Default)]
pub struct MockState {
    /// Nested link documents, exactly as the list endpoint serves them.
    links: Mutex<Vec<Value>>,
    /// Uploaded image filenames.
    images: Mutex<Vec<String>>,
    /// Every request path observed, in arrival order.
    hits: Mutex<Vec<String>>,
    /// Paths forced to answer with a rejection envelope.
    fail: Mutex<HashSet<String>>,
    /// Artificial per-path latency, for ordering tests.
    delay_ms: Mutex<HashMap<String, u64>>,
}

impl MockState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_link(&self, file: &str, name: &str, enabled: bool) {
        self.links.lock().unwrap().push(link_record(file, name, enabled));
    }

    pub fn seed_image(&self, file: &str) {
        self.images.lock().unwrap().push(file.to_string());
    }

    pub fn fail_on(&self, path: &str) {
        self.fail.lock().unwrap().insert(path.to_string());
    }

    pub fn delay(&self, path: &str, ms: u64) {
        self.delay_ms.lock().unwrap().insert(path.to_string(), ms);
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self) -> usize {
        self.hits.lock().unwrap().len()
    }

    /// Record a hit, apply configured latency, and short-circuit with a
    /// rejection envelope when the path is set to fail.
    async fn observe(&self, path: &str) -> Result<(), Json<Value>> {
        self.hits.lock().unwrap().push(path.to_string());

        let delay = self.delay_ms.lock().unwrap().get(path).copied();
        if let Some(ms) = delay {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        if self.fail.lock().unwrap().contains(path) {
            return Err(Json(fail("forced failure")));
        }
        Ok(())
    }

    fn set_enabled(&self, file: &str, enabled: bool) {
        for doc in self.links.lock().unwrap().iter_mut() {
            if doc["info"]["file"] == file {
                doc["info"]["enabled"] = json!(enabled);
            }
        }
    }
}

/// An `ok` envelope wrapping the given payload.
pub fn ok(data: Value) -> Value {
    json!({"status": "ok", "message": "", "data": data})
}

/// A rejection envelope with the given message.
pub fn fail(message: &str) -> Value {
    json!({"status": "fail", "message": message, "data": null})
}

/// A link document in the nested wire shape the backend lists.
pub fn link_record(file: &str, name: &str, enabled: bool) -> Value {
    json!({
        "info": {
            "file": file,
            "name": name,
            "description": "No Description",
            "image": null,
            "enabled": enabled,
        },
        "api": {
            "url": "https://example.com/api",
            "item": "value",
            "update_period": 60,
            "value_modifiers": [{"fn": "value_clip"}],
        },
    })
}

/// Serve the full mock API on an ephemeral port; returns the base URL.
pub async fn spawn(state: Arc<MockState>) -> String {
    let router = Router::new()
        .route("/api/v0/link/list", get(list_links))
        .route("/api/v0/link/read", get(read_link))
        .route("/api/v0/link/write", post(write_link))
        .route("/api/v0/link/update", post(update_link))
        .route("/api/v0/link/enable", get(enable_link))
        .route("/api/v0/link/disable", get(disable_link))
        .route("/api/v0/link/delete", get(delete_link))
        .route("/api/v0/link/reload", get(reload_links))
        .route("/api/v0/image/list", get(list_images))
        .route("/api/v0/image/upload", post(upload_image))
        .route("/api/v0/image/delete", get(delete_image))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_links(State(state): State<Arc<MockState>>) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/link/list").await {
        return resp;
    }
    let links = state.links.lock().unwrap().clone();
    Json(ok(Value::Array(links)))
}

async fn read_link(State(state): State<Arc<MockState>>) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/link/read").await {
        return resp;
    }
    Json(ok(json!({"contents": "[info]\nname = \"Weather\"\n"})))
}

async fn write_link(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/link/write").await {
        return resp;
    }
    let file = form["link_filename"].clone();
    state.seed_link(&file, &file, true);
    Json(ok(Value::Null))
}

async fn update_link(
    State(state): State<Arc<MockState>>,
    Form(_form): Form<HashMap<String, String>>,
) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/link/update").await {
        return resp;
    }
    Json(ok(Value::Null))
}

async fn enable_link(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/link/enable").await {
        return resp;
    }
    state.set_enabled(&query["link"], true);
    Json(ok(Value::Null))
}

async fn disable_link(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/link/disable").await {
        return resp;
    }
    state.set_enabled(&query["link"], false);
    Json(ok(Value::Null))
}

async fn delete_link(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/link/delete").await {
        return resp;
    }
    let file = &query["link"];
    state.links.lock().unwrap().retain(|doc| doc["info"]["file"] != *file);
    Json(ok(Value::Null))
}

async fn reload_links(State(state): State<Arc<MockState>>) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/link/reload").await {
        return resp;
    }
    Json(ok(Value::Null))
}

async fn list_images(State(state): State<Arc<MockState>>) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/image/list").await {
        return resp;
    }
    let images = state.images.lock().unwrap().clone();
    Json(ok(json!({"images": images})))
}

async fn upload_image(
    State(state): State<Arc<MockState>>,
    mut multipart: Multipart,
) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/image/upload").await {
        return resp;
    }
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("image_name") {
            let name = field.text().await.unwrap();
            state.seed_image(&format!("{name}.png"));
        }
    }
    Json(ok(Value::Null))
}

async fn delete_image(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Err(resp) = state.observe("/api/v0/image/delete").await {
        return resp;
    }
    let file = &query["file"];
    state.images.lock().unwrap().retain(|image| image != file);
    Json(ok(Value::Null))
}
