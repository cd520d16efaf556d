//! HTTP endpoints for the item list server using axum.
//!
//! Endpoints (all under `/api`):
//! - GET  /items            - one page of (optionally searched) items
//! - GET  /items/order      - the global order
//! - POST /items/order      - replace or scope-splice the global order
//! - GET  /items/selection  - selected ids
//! - POST /items/selection  - replace selected ids
//!
//! Inputs are never rejected: malformed pagination falls back to defaults
//! and malformed id bodies are read as an empty list.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use itemlist_core::model::page::normalize_search;
use itemlist_core::{query_page, ItemId, ItemPage, OrderWrite, PageRequest};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as CorsAny, CorsLayer};

use crate::error::ServerError;
use crate::AppState;

type QueryParams = HashMap<String, String>;

/// Acknowledgement body for writes.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Build the axum router with all endpoints.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(CorsAny)
        .allow_methods(CorsAny)
        .allow_headers(CorsAny);

    let items = Router::new()
        .route("/items", get(list_items))
        .route("/items/order", get(get_order).post(set_order))
        .route("/items/selection", get(get_selection).post(set_selection));

    Router::new()
        .nest("/api", items)
        .layer(middleware::from_fn(log_request))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .with_state(state)
}

// ── Handlers ────────────────────────────────────────────────────────

async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<ItemPage>, ServerError> {
    let request = PageRequest::from_raw(
        param(&params, "offset"),
        param(&params, "limit"),
        param(&params, "search"),
    );

    let page = run_blocking(move || {
        let order = lock(&state.ledger, "ledger")?.snapshot();
        Ok(query_page(&state.catalog, &order, &request))
    })
    .await?;

    Ok(Json(page))
}

/// The ledger is global, so the `search` parameter does not narrow the result.
async fn get_order(State(state): State<AppState>) -> Result<Json<Vec<ItemId>>, ServerError> {
    let order = run_blocking(move || {
        let order = lock(&state.ledger, "ledger")?.snapshot();
        Ok(order.as_ref().clone())
    })
    .await?;

    Ok(Json(order))
}

async fn set_order(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ServerError> {
    let scope = normalize_search(param(&params, "search"));
    let ids = ids_from_body(&body);

    let outcome = run_blocking(move || {
        let mut ledger = lock(&state.ledger, "ledger")?;
        Ok(ledger.apply(ids, &scope))
    })
    .await?;

    if outcome == (OrderWrite::Applied { persisted: false }) {
        info!("event=order_write module=http status=degraded reason=persist_failed");
    }
    Ok(SuccessResponse::ok())
}

async fn get_selection(State(state): State<AppState>) -> Result<Json<Vec<ItemId>>, ServerError> {
    let selection = lock(&state.selection, "selection")?;
    Ok(Json(selection.ids()))
}

async fn set_selection(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ServerError> {
    let ids = ids_from_body(&body);
    lock(&state.selection, "selection")?.replace(ids);
    Ok(SuccessResponse::ok())
}

// ── Helpers ─────────────────────────────────────────────────────────

fn param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str)
}

/// Reads a JSON id list; anything that is not an array yields an empty list
/// and non-string entries are dropped.
pub fn ids_from_body(body: &[u8]) -> Vec<ItemId> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::String(id) => Some(id),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, ServerError> {
    mutex
        .lock()
        .map_err(|_| ServerError::Internal(format!("{name} lock poisoned")))
}

async fn run_blocking<T, F>(task: F) -> Result<T, ServerError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ServerError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ServerError::Internal(format!("blocking task failed: {err}")))?
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=http status={} method={} path={} duration_ms={}",
        response.status().as_u16(),
        method,
        path,
        started_at.elapsed().as_millis()
    );
    response
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };
    error!(
        "event=http_panic module=http status=error payload={}",
        itemlist_core::logging::sanitize_message(&detail, 160)
    );
    ServerError::Internal("handler panicked".to_string()).into_response()
}
