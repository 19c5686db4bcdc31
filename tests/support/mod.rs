//! In-process stand-ins for master and volume nodes

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Bind an ephemeral port and serve `app` on it, returning `host:port`
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr.to_string()
}

/// Address nothing listens on
pub fn dead_addr() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

// ============================================================================
// Working cluster: a master handing out fids and a volume keeping blobs in memory
// ============================================================================

#[derive(Default)]
struct MemStore {
    map: Mutex<HashMap<String, Bytes>>,
}

impl MemStore {
    fn get(&self, key: &str) -> Option<Bytes> {
        self.map.lock().unwrap().get(key).cloned()
    }
    fn put(&self, key: &str, value: Bytes) {
        self.map.lock().unwrap().insert(key.to_string(), value);
    }
    fn delete(&self, key: &str) -> bool {
        self.map.lock().unwrap().remove(key).is_some()
    }
}

struct MasterState {
    volume: String,
    next_key: AtomicU64,
}

pub struct StubCluster {
    pub master: String,
    pub volume: String,
    store: Arc<MemStore>,
}

impl StubCluster {
    pub async fn start() -> Self {
        let store = Arc::new(MemStore::default());
        let volume_app = Router::new()
            .route("/:fid", get(volume_get).post(volume_post).delete(volume_delete))
            .with_state(store.clone());
        let volume = serve(volume_app).await;

        let master_state = Arc::new(MasterState {
            volume: volume.clone(),
            next_key: AtomicU64::new(0x01637037d6),
        });
        let master_app = Router::new()
            .route("/dir/assign", get(master_assign))
            .with_state(master_state);
        let master = serve(master_app).await;

        Self {
            master,
            volume,
            store,
        }
    }

    pub fn contains(&self, fid: &str) -> bool {
        self.store.get(fid).is_some()
    }
}

async fn master_assign(State(state): State<Arc<MasterState>>) -> impl IntoResponse {
    let key = state.next_key.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "count": 1,
        "fid": format!("3,{:x}", key),
        "url": state.volume,
        "publicUrl": state.volume,
    }))
}

async fn volume_post(
    State(store): State<Arc<MemStore>>,
    Path(fid): Path<String>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().map(str::to_string);
        let Ok(data) = field.bytes().await else {
            break;
        };
        let size = data.len();
        store.put(&fid, data);
        return (
            StatusCode::CREATED,
            Json(json!({ "fid": fid, "name": name, "size": size })),
        );
    }
    (StatusCode::BAD_REQUEST, Json(json!({ "error": "no file part" })))
}

async fn volume_get(
    State(store): State<Arc<MemStore>>,
    Path(fid): Path<String>,
) -> impl IntoResponse {
    match store.get(&fid) {
        Some(data) => (StatusCode::OK, data),
        None => (StatusCode::NOT_FOUND, Bytes::new()),
    }
}

async fn volume_delete(State(store): State<Arc<MemStore>>, Path(fid): Path<String>) -> StatusCode {
    if store.delete(&fid) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

// ============================================================================
// Scripted node: answers every request with a fixed response and records it
// ============================================================================

#[derive(Debug, Clone)]
pub struct RecordedPart {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub parts: Vec<RecordedPart>,
}

struct Script {
    status: StatusCode,
    body: Bytes,
    requests: Mutex<Vec<Recorded>>,
}

#[derive(Clone)]
pub struct ScriptedNode {
    pub addr: String,
    script: Arc<Script>,
}

impl ScriptedNode {
    pub async fn start(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let script = Arc::new(Script {
            status,
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(scripted).with_state(script.clone());
        let addr = serve(app).await;
        Self { addr, script }
    }

    /// Master answering `/dir/assign` with `fid` on `public_url`
    pub async fn master(fid: &str, public_url: &str) -> Self {
        let body = json!({ "fid": fid, "url": public_url, "publicUrl": public_url, "count": 1 });
        Self::start(StatusCode::OK, body.to_string()).await
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.script.requests.lock().unwrap().clone()
    }
}

async fn scripted(State(script): State<Arc<Script>>, req: Request) -> impl IntoResponse {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut parts = Vec::new();
    if content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    {
        let mut multipart = Multipart::from_request(req, &()).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.unwrap();
            parts.push(RecordedPart {
                name,
                file_name,
                content_type,
                data,
            });
        }
    }

    script.requests.lock().unwrap().push(Recorded {
        method,
        path,
        content_type,
        parts,
    });
    (script.status, script.body.clone())
}
