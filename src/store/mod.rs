//! Device store
//!
//! A single `devices` table, recreated empty on every start.
//!
//! # Locking
//!
//! - create, update and delete serialize on one exclusive lock held from
//!   statement preparation through execution
//! - list and get do not take that lock
//!
//! # Error mapping
//!
//! | Operation | Prepare failure | Execute failure | Zero rows |
//! |-----------|-----------------|-----------------|-----------|
//! | create    | `Prepare`       | `Conflict`      | n/a       |
//! | update    | `Prepare`       | `NotFound`      | `NotFound`|
//! | delete    | `Prepare`       | `NotFound`      | `NotFound`|
//! | get       | `NotFound`      | `NotFound`      | `NotFound`|
//! | list      | `Query`         | `Query`         | empty vec |

mod config;
mod device;
mod errors;
mod sqlite;

pub use config::StoreConfig;
pub use device::{Device, DeviceList};
pub use errors::{StoreError, StoreResult};
pub use sqlite::SqliteDeviceStore;

/// Storage operations behind the HTTP routes.
///
/// Calls block; async callers run them on the blocking pool.
pub trait DeviceStore: Send + Sync + 'static {
    /// Every device, in engine order
    fn list(&self) -> StoreResult<Vec<Device>>;

    /// The device with this id
    fn get(&self, id: i64) -> StoreResult<Device>;

    /// Insert a device with a caller-chosen id
    fn create(&self, device: &Device) -> StoreResult<()>;

    /// Overwrite the row selected by `id` with all fields of `device`,
    /// including its id
    fn update(&self, id: i64, device: &Device) -> StoreResult<()>;

    /// Remove the device with this id
    fn delete(&self, id: i64) -> StoreResult<()>;
}
