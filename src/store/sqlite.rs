//! SQLite-backed device store
//!
//! One write connection sits behind a mutex; that mutex is the service-wide
//! exclusive lock. Create, update and delete hold it from statement
//! preparation through execution. Reads go through a small pool of
//! read-only connections and never touch the write lock.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OpenFlags, Row};

use super::config::StoreConfig;
use super::device::Device;
use super::errors::{StoreError, StoreResult};
use super::DeviceStore;

const CREATE_TABLE: &str =
    "CREATE TABLE devices (id INTEGER PRIMARY KEY, status INTEGER CHECK (status IN (0,1)), name TEXT)";
const SELECT_ALL: &str = "SELECT id, status, name FROM devices";
const SELECT_ONE: &str = "SELECT id, status, name FROM devices WHERE id = ?1";
const INSERT: &str = "INSERT INTO devices (id, status, name) VALUES (?1, ?2, ?3)";
const UPDATE: &str = "UPDATE devices SET id = ?1, status = ?2, name = ?3 WHERE id = ?4";
const DELETE: &str = "DELETE FROM devices WHERE id = ?1";

/// Files SQLite may leave next to the database
const SIDE_FILE_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// Device store over a single SQLite file
pub struct SqliteDeviceStore {
    path: PathBuf,
    write_connection: Mutex<Connection>,
    read_connections: Vec<Mutex<Connection>>,
    read_cursor: AtomicUsize,
}

impl SqliteDeviceStore {
    /// Discard any previous store file, create an empty devices table and
    /// open the connections.
    ///
    /// Errors here are fatal to the process.
    pub fn bootstrap(config: &StoreConfig) -> StoreResult<Self> {
        reset_file(&config.path)?;

        let write_connection = Connection::open(&config.path).map_err(StoreError::Open)?;
        configure(&write_connection, config.busy_timeout_ms)?;
        write_connection
            .execute_batch("PRAGMA journal_mode = wal;")
            .map_err(StoreError::Open)?;
        write_connection
            .execute_batch(CREATE_TABLE)
            .map_err(StoreError::Schema)?;

        let pool_size = config.read_connections.max(1);
        let mut read_connections = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
            let connection =
                Connection::open_with_flags(&config.path, flags).map_err(StoreError::Open)?;
            configure(&connection, config.busy_timeout_ms)?;
            read_connections.push(Mutex::new(connection));
        }

        Ok(Self {
            path: config.path.clone(),
            write_connection: Mutex::new(write_connection),
            read_connections,
            read_cursor: AtomicUsize::new(0),
        })
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire the exclusive write lock
    fn lock_writer(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.write_connection
            .lock()
            .map_err(|_| StoreError::Poisoned)
    }

    /// Next read connection, round-robin
    fn lock_reader(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        let index = self.read_cursor.fetch_add(1, Ordering::Relaxed) % self.read_connections.len();
        self.read_connections[index]
            .lock()
            .map_err(|_| StoreError::Poisoned)
    }
}

impl DeviceStore for SqliteDeviceStore {
    fn list(&self) -> StoreResult<Vec<Device>> {
        let connection = self.lock_reader()?;
        let mut statement = connection.prepare(SELECT_ALL).map_err(StoreError::Query)?;
        let devices = statement
            .query_map([], row_to_device)
            .map_err(StoreError::Query)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Query)?;
        Ok(devices)
    }

    fn get(&self, id: i64) -> StoreResult<Device> {
        let connection = self.lock_reader()?;
        connection
            .query_row(SELECT_ONE, params![id], row_to_device)
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    StoreError::NotFound(format!("no device with id {id}"))
                }
                other => StoreError::NotFound(other.to_string()),
            })
    }

    fn create(&self, device: &Device) -> StoreResult<()> {
        let connection = self.lock_writer()?;
        let mut statement = connection.prepare(INSERT).map_err(StoreError::Prepare)?;
        statement
            .execute(params![device.id, device.status, device.name])
            .map_err(StoreError::Conflict)?;
        Ok(())
    }

    fn update(&self, id: i64, device: &Device) -> StoreResult<()> {
        let connection = self.lock_writer()?;
        let mut statement = connection.prepare(UPDATE).map_err(StoreError::Prepare)?;
        let changed = statement
            .execute(params![device.id, device.status, device.name, id])
            .map_err(|err| StoreError::NotFound(err.to_string()))?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("no device with id {id}")));
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> StoreResult<()> {
        let connection = self.lock_writer()?;
        let mut statement = connection.prepare(DELETE).map_err(StoreError::Prepare)?;
        let changed = statement
            .execute(params![id])
            .map_err(|err| StoreError::NotFound(err.to_string()))?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("no device with id {id}")));
        }
        Ok(())
    }
}

fn row_to_device(row: &Row<'_>) -> rusqlite::Result<Device> {
    Ok(Device {
        id: row.get(0)?,
        status: row.get(1)?,
        name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}

fn configure(connection: &Connection, busy_timeout_ms: u64) -> StoreResult<()> {
    connection
        .busy_timeout(Duration::from_millis(busy_timeout_ms))
        .map_err(StoreError::Open)
}

/// Remove the database and its side files, then create an empty file
fn reset_file(path: &Path) -> StoreResult<()> {
    remove_if_present(path)?;
    for suffix in SIDE_FILE_SUFFIXES {
        let mut side: OsString = path.as_os_str().to_owned();
        side.push(suffix);
        remove_if_present(Path::new(&side))?;
    }

    File::create(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn remove_if_present(path: &Path) -> StoreResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqliteDeviceStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteDeviceStore::bootstrap(&StoreConfig::with_path(dir.path().join("devices.db")))
            .unwrap();
        (dir, store)
    }

    #[test]
    fn test_bootstrap_discards_previous_file() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::with_path(dir.path().join("devices.db"));

        {
            let store = SqliteDeviceStore::bootstrap(&config).unwrap();
            store.create(&Device::new(1, 0, "old")).unwrap();
        }

        let store = SqliteDeviceStore::bootstrap(&config).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_bootstrap_fails_on_missing_directory() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::with_path(dir.path().join("missing").join("devices.db"));

        let err = SqliteDeviceStore::bootstrap(&config).err().unwrap();
        assert!(matches!(err, StoreError::Io { .. } | StoreError::Open(_)));
    }

    #[test]
    fn test_create_and_get() {
        let (_dir, store) = open_store();
        let device = Device::new(1, 0, "sensor");

        store.create(&device).unwrap();
        assert_eq!(store.get(1).unwrap(), device);
    }

    #[test]
    fn test_duplicate_id_conflicts() {
        let (_dir, store) = open_store();
        store.create(&Device::new(1, 0, "first")).unwrap();

        let err = store.create(&Device::new(1, 1, "second")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.get(1).unwrap().name, "first");
    }

    #[test]
    fn test_status_constraint_rejects_create() {
        let (_dir, store) = open_store();

        let err = store.create(&Device::new(5, 2, "bad")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_status_constraint_rejects_update_as_not_found() {
        let (_dir, store) = open_store();
        store.create(&Device::new(1, 0, "lamp")).unwrap();

        let err = store.update(1, &Device::new(1, 7, "lamp")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.get(1).unwrap().status, 0);
    }

    #[test]
    fn test_update_can_change_id() {
        let (_dir, store) = open_store();
        store.create(&Device::new(1, 0, "lamp")).unwrap();

        store.update(1, &Device::new(9, 1, "lamp")).unwrap();

        assert!(matches!(store.get(1), Err(StoreError::NotFound(_))));
        assert_eq!(store.get(9).unwrap(), Device::new(9, 1, "lamp"));
    }

    #[test]
    fn test_update_missing_row_is_not_found() {
        let (_dir, store) = open_store();
        store.create(&Device::new(1, 0, "lamp")).unwrap();

        let err = store.update(2, &Device::new(2, 1, "ghost")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.list().unwrap(), vec![Device::new(1, 0, "lamp")]);
    }

    #[test]
    fn test_update_onto_existing_id_is_not_found() {
        let (_dir, store) = open_store();
        store.create(&Device::new(1, 0, "a")).unwrap();
        store.create(&Device::new(2, 0, "b")).unwrap();

        let err = store.update(1, &Device::new(2, 1, "a")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.get(1).unwrap().name, "a");
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = open_store();
        store.create(&Device::new(1, 0, "lamp")).unwrap();

        store.delete(1).unwrap();
        assert!(matches!(store.get(1), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(1), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_reads_use_every_pool_connection() {
        let (_dir, store) = open_store();
        store.create(&Device::new(1, 1, "lamp")).unwrap();

        for _ in 0..store.read_connections.len() * 2 {
            assert_eq!(store.get(1).unwrap().status, 1);
        }
        assert!(store.read_cursor.load(Ordering::Relaxed) >= store.read_connections.len());
    }
}
