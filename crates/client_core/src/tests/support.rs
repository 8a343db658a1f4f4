//! Test doubles shared by the client tests: a view that records what it was
//! asked to draw, and a scriptable in-memory backend.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex as StdMutex,
    },
};

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    alert::Alert,
    form::{FormChrome, FormValues},
    view::{PanelView, TableRow},
    AdminClient, ClientConfig,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum TableBody {
    #[default]
    Untouched,
    Rows(Vec<TableRow>),
    Placeholder(String),
}

impl TableBody {
    pub(crate) fn row_count(&self) -> usize {
        match self {
            TableBody::Untouched => 0,
            TableBody::Rows(rows) => rows.len(),
            TableBody::Placeholder(_) => 1,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ViewState {
    pub table: TableBody,
    pub renders: usize,
    pub visible_alert: Option<Alert>,
    pub alerts: Vec<Alert>,
    pub cleared: Vec<u64>,
    pub form: FormValues,
    pub chrome: Option<FormChrome>,
    pub scrolls: usize,
    pub prompts: Vec<String>,
}

pub(crate) struct RecordingView {
    state: StdMutex<ViewState>,
    confirm_answer: AtomicBool,
}

impl RecordingView {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: StdMutex::new(ViewState::default()),
            confirm_answer: AtomicBool::new(true),
        })
    }

    pub(crate) fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.store(answer, Ordering::SeqCst);
    }

    pub(crate) fn type_field(&self, name: &str, value: &str) {
        self.state.lock().expect("view state").form.set(name, value);
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.state.lock().expect("view state"))
    }

    pub(crate) fn last_alert(&self) -> Alert {
        self.with(|state| state.alerts.last().cloned())
            .expect("an alert was shown")
    }
}

#[async_trait]
impl PanelView for RecordingView {
    fn render_rows(&self, rows: &[TableRow]) {
        let mut state = self.state.lock().expect("view state");
        state.table = TableBody::Rows(rows.to_vec());
        state.renders += 1;
    }

    fn render_placeholder(&self, message: &str) {
        let mut state = self.state.lock().expect("view state");
        state.table = TableBody::Placeholder(message.to_string());
        state.renders += 1;
    }

    fn show_alert(&self, alert: &Alert) {
        let mut state = self.state.lock().expect("view state");
        state.visible_alert = Some(alert.clone());
        state.alerts.push(alert.clone());
    }

    fn clear_alert(&self, alert_id: u64) {
        let mut state = self.state.lock().expect("view state");
        state.visible_alert = None;
        state.cleared.push(alert_id);
    }

    fn read_form(&self) -> FormValues {
        self.state.lock().expect("view state").form.clone()
    }

    fn fill_form(&self, values: &FormValues) {
        self.state.lock().expect("view state").form = values.clone();
    }

    fn clear_form(&self) {
        self.state.lock().expect("view state").form = FormValues::default();
    }

    fn set_chrome(&self, chrome: &FormChrome) {
        self.state.lock().expect("view state").chrome = Some(*chrome);
    }

    fn scroll_to_form(&self) {
        self.state.lock().expect("view state").scrolls += 1;
    }

    async fn confirm(&self, prompt: &str) -> bool {
        self.state
            .lock()
            .expect("view state")
            .prompts
            .push(prompt.to_string());
        self.confirm_answer.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct BackendState {
    tables: HashMap<String, Vec<Value>>,
    next_ids: HashMap<String, i64>,
    requests: Vec<RecordedRequest>,
    /// Canned `(status, raw body)` answers keyed by method and path.
    scripted: HashMap<(Method, String), (StatusCode, String)>,
}

/// Backend speaking the `/api/<entity>` envelope protocol, with records kept
/// as raw JSON using the upper-case column names.
#[derive(Clone, Default)]
pub(crate) struct MockBackend {
    state: Arc<Mutex<BackendState>>,
}

impl MockBackend {
    pub(crate) async fn seed(&self, entity: &str, records: Vec<Value>) {
        let mut state = self.state.lock().await;
        let max_id = records
            .iter()
            .filter_map(|record| record.get(id_column(entity)).and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        state.next_ids.insert(entity.to_string(), max_id + 1);
        state.tables.insert(entity.to_string(), records);
    }

    pub(crate) async fn script(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.state
            .lock()
            .await
            .scripted
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    pub(crate) async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }

    pub(crate) async fn mutating_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|request| request.method != Method::GET)
            .collect()
    }
}

fn id_column(entity: &str) -> &'static str {
    match entity {
        "customers" => "ID_CLIENTE",
        _ => "ID_PRODUCTO",
    }
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn envelope(status: StatusCode, body: Value) -> Response {
    json_response(status, body.to_string())
}

fn record_from_payload(entity: &str, id: i64, payload: &Value) -> Value {
    let mut record = Map::new();
    record.insert(id_column(entity).to_string(), json!(id));
    if let Some(fields) = payload.as_object() {
        for (key, value) in fields {
            record.insert(key.to_uppercase(), value.clone());
        }
    }
    Value::Object(record)
}

async fn handle(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let payload = serde_json::from_slice::<Value>(&body).ok();
    let mut state = backend.state.lock().await;
    state.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        body: payload.clone(),
    });

    if let Some((status, raw)) = state.scripted.get(&(method.clone(), path.clone())) {
        return json_response(*status, raw.clone());
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let (entity, id) = match segments.as_slice() {
        ["api", entity] => (entity.to_string(), None),
        ["api", entity, id] => match id.parse::<i64>() {
            Ok(id) => (entity.to_string(), Some(id)),
            Err(_) => return envelope(StatusCode::NOT_FOUND, json!({ "error": "bad id" })),
        },
        _ => return envelope(StatusCode::NOT_FOUND, json!({ "error": "no route" })),
    };
    let id_key = id_column(&entity);

    match (method, id) {
        (Method::GET, None) => {
            let rows = state.tables.get(&entity).cloned().unwrap_or_default();
            envelope(StatusCode::OK, json!({ "success": true, "data": rows }))
        }
        (Method::GET, Some(id)) => {
            let found = state.tables.get(&entity).and_then(|rows| {
                rows.iter()
                    .find(|row| row.get(id_key).and_then(Value::as_i64) == Some(id))
                    .cloned()
            });
            match found {
                Some(record) => envelope(StatusCode::OK, json!({ "success": true, "data": record })),
                None => envelope(
                    StatusCode::NOT_FOUND,
                    json!({ "success": false, "error": "not found" }),
                ),
            }
        }
        (Method::POST, None) => {
            let next = state.next_ids.entry(entity.clone()).or_insert(1);
            let id = *next;
            *next += 1;
            let record = record_from_payload(&entity, id, payload.as_ref().unwrap_or(&Value::Null));
            state.tables.entry(entity).or_default().push(record);
            envelope(StatusCode::OK, json!({ "success": true, "message": "Created" }))
        }
        (Method::PUT, Some(id)) => {
            let record = record_from_payload(&entity, id, payload.as_ref().unwrap_or(&Value::Null));
            let rows = state.tables.entry(entity).or_default();
            match rows
                .iter_mut()
                .find(|row| row.get(id_key).and_then(Value::as_i64) == Some(id))
            {
                Some(row) => {
                    *row = record;
                    envelope(StatusCode::OK, json!({ "success": true, "message": "Updated" }))
                }
                None => envelope(
                    StatusCode::NOT_FOUND,
                    json!({ "success": false, "error": "not found" }),
                ),
            }
        }
        (Method::DELETE, Some(id)) => {
            let rows = state.tables.entry(entity).or_default();
            let before = rows.len();
            rows.retain(|row| row.get(id_key).and_then(Value::as_i64) != Some(id));
            if rows.len() < before {
                envelope(StatusCode::OK, json!({ "success": true, "message": "Deleted" }))
            } else {
                envelope(
                    StatusCode::NOT_FOUND,
                    json!({ "success": false, "error": "not found" }),
                )
            }
        }
        _ => envelope(
            StatusCode::METHOD_NOT_ALLOWED,
            json!({ "success": false, "error": "method not allowed" }),
        ),
    }
}

pub(crate) async fn spawn_backend() -> (String, MockBackend) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let backend = MockBackend::default();
    let app = Router::new()
        .fallback(handle)
        .with_state(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), backend)
}

/// Address nothing listens on, for transport failures.
pub(crate) async fn closed_server_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

pub(crate) fn client_for(server_url: &str) -> AdminClient {
    AdminClient::new(ClientConfig::new(server_url).expect("config")).expect("client")
}
