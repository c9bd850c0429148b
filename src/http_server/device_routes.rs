//! Device HTTP Routes
//!
//! | Method | Path    | Handler          |
//! |--------|---------|------------------|
//! | GET    | `/`     | `list_devices`   |
//! | PUT    | `/`     | `create_device`  |
//! | GET    | `/:id`  | `get_device`     |
//! | PUT    | `/:id`  | `update_device`  |
//! | DELETE | `/:id`  | `delete_device`  |

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::observability::{Event, Logger};
use crate::store::{Device, DeviceList, DeviceStore, StoreResult};

use super::errors::{ApiError, ApiResult};

/// Create device routes over the given store
pub fn device_routes<S: DeviceStore>(store: Arc<S>) -> Router {
    Router::new()
        .route("/", get(list_devices::<S>).put(create_device::<S>))
        .route(
            "/:id",
            get(get_device::<S>)
                .put(update_device::<S>)
                .delete(delete_device::<S>),
        )
        .with_state(store)
}

/// Run a store call on the blocking pool
async fn run_store<T, F>(call: F) -> ApiResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Decode a device from a raw body, ignoring the declared content type.
///
/// Only the first JSON value is read; anything after it is left unread. A
/// bare `null` decodes to the zero device.
fn decode_device(body: &[u8]) -> ApiResult<Device> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<Device>>()
        .next()
    {
        Some(Ok(device)) => Ok(device.unwrap_or_default()),
        Some(Err(e)) => Err(ApiError::InvalidBody(e.to_string())),
        None => Err(ApiError::InvalidBody("empty body".to_string())),
    }
}

/// A path id that is not an integer cannot name any row
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("no device with id {:?}", raw)))
}

async fn list_devices<S: DeviceStore>(
    State(store): State<Arc<S>>,
) -> ApiResult<Json<DeviceList>> {
    let devices = run_store(move || store.list()).await?;
    Logger::info(Event::DeviceList, &[("count", &devices.len().to_string())]);
    Ok(Json(DeviceList::from(devices)))
}

async fn get_device<S: DeviceStore>(
    State(store): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Device>> {
    let id = parse_id(&raw_id)?;
    let device = run_store(move || store.get(id)).await?;
    Logger::info(Event::DeviceGet, &[("id", &id.to_string())]);
    Ok(Json(device))
}

async fn create_device<S: DeviceStore>(
    State(store): State<Arc<S>>,
    body: Bytes,
) -> ApiResult<Json<Device>> {
    let device = decode_device(&body)?;

    let device = run_store(move || store.create(&device).map(|()| device)).await?;
    Logger::info(Event::DeviceCreate, &[("id", &device.id.to_string())]);
    Ok(Json(device))
}

async fn update_device<S: DeviceStore>(
    State(store): State<Arc<S>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Device>> {
    let device = decode_device(&body)?;
    let id = parse_id(&raw_id)?;

    let device = run_store(move || store.update(id, &device).map(|()| device)).await?;
    Logger::info(
        Event::DeviceUpdate,
        &[("id", &id.to_string()), ("new_id", &device.id.to_string())],
    );
    Ok(Json(device))
}

async fn delete_device<S: DeviceStore>(
    State(store): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    run_store(move || store.delete(id)).await?;
    Logger::info(Event::DeviceDelete, &[("id", &id.to_string())]);
    Ok(StatusCode::OK)
}
