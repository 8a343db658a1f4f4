use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use shared::{
    domain::RecordId,
    error::{ApiError, ErrorCode},
    protocol::{ApiResponse, Customer, Product},
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod store;

use config::load_settings;
use store::{Resource, Store};

struct AppState {
    store: Store,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let store = Store::default();
    if settings.seed_demo_data {
        store.seed_demo_data().await?;
        info!("demo records seeded");
    }
    let app = build_router(Arc::new(AppState { store }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/api/customers",
            get(list::<Customer>).post(create::<Customer>),
        )
        .route(
            "/api/customers/:id",
            get(fetch::<Customer>)
                .put(update::<Customer>)
                .delete(remove::<Customer>),
        )
        .route("/api/products", get(list::<Product>).post(create::<Product>))
        .route(
            "/api/products/:id",
            get(fetch::<Product>)
                .put(update::<Product>)
                .delete(remove::<Product>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list<R: Resource>(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Vec<R>>> {
    Json(ApiResponse::with_data(state.store.list::<R>().await))
}

async fn fetch<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    match state.store.get::<R>(RecordId(id)).await {
        Ok(record) => Json(ApiResponse::with_data(record)).into_response(),
        Err(err) => failure(err),
    }
}

async fn create<R: Resource>(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<R::Payload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return failure(ApiError::validation(rejection.body_text())),
    };
    match state.store.create::<R>(payload).await {
        Ok(id) => {
            info!(resource = R::NOUN, record_id = %id, "record created");
            success(format!("{} creado exitosamente", R::NOUN))
        }
        Err(err) => failure(err),
    }
}

async fn update<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<R::Payload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return failure(ApiError::validation(rejection.body_text())),
    };
    match state.store.update::<R>(RecordId(id), payload).await {
        Ok(()) => {
            info!(resource = R::NOUN, record_id = id, "record updated");
            success(format!("{} actualizado exitosamente", R::NOUN))
        }
        Err(err) => failure(err),
    }
}

async fn remove<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    match state.store.delete::<R>(RecordId(id)).await {
        Ok(()) => {
            info!(resource = R::NOUN, record_id = id, "record deleted");
            success(format!("{} eliminado exitosamente", R::NOUN))
        }
        Err(err) => failure(err),
    }
}

fn success(message: String) -> Response {
    Json(ApiResponse::<()>::with_message(message)).into_response()
}

fn failure(err: ApiError) -> Response {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
    };
    warn!(code = ?err.code, message = %err.message, "request failed");
    (status, Json(ApiResponse::<()>::from(err))).into_response()
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
