use std::{collections::HashMap, path::Path, time::Duration};

use rusqlite::{params, Connection, OptionalExtension};

use crate::clock::now_iso;
use crate::error::{sqlite_error_string, StoreError};

pub const CLIENTS_SLOT: &str = "clients";
pub const ORDERS_SLOT: &str = "orders";
pub const INVOICES_SLOT: &str = "invoices";
pub const EXPENSES_SLOT: &str = "expenses";
pub const SETTINGS_SLOT: &str = "shopConfig";

/// Persistent string key-value mapping. Each slot holds one serialized collection.
///
/// A failed `write` must leave the previous value of the slot in place.
pub trait SlotStorage {
    fn read(&self, slot: &'static str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, slot: &'static str, value: &str) -> Result<(), StoreError>;
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Persistence {
                    slot: "*",
                    reason: e.to_string(),
                })?;
            }
        }
        let conn = Connection::open(path).map_err(open_error)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(open_error)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        configure_sqlite(&conn).map_err(open_error)?;
        init_schema(&conn).map_err(open_error)?;
        Ok(Self { conn })
    }
}

fn open_error(err: rusqlite::Error) -> StoreError {
    StoreError::Persistence {
        slot: "*",
        reason: sqlite_error_string(&err),
    }
}

fn configure_sqlite(conn: &Connection) -> Result<(), rusqlite::Error> {
    // Apply PRAGMAs on init (outside any transaction).
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;\n\
         PRAGMA synchronous = NORMAL;\n\
         PRAGMA temp_store = MEMORY;\n\
         PRAGMA busy_timeout = 5000;\n",
    )?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    Ok(())
}

fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updatedAt TEXT NOT NULL
        );
        PRAGMA user_version = 1;
        "#,
    )?;
    Ok(())
}

impl SlotStorage for SqliteStorage {
    fn read(&self, slot: &'static str) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![slot],
                |r| r.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Persistence {
                slot,
                reason: sqlite_error_string(&e),
            })
    }

    fn write(&mut self, slot: &'static str, value: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO slots(key, value, updatedAt) VALUES(?1, ?2, ?3) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updatedAt = excluded.updatedAt",
                params![slot, value, now_iso()],
            )
            .map(|_| ())
            .map_err(|e| StoreError::Persistence {
                slot,
                reason: sqlite_error_string(&e),
            })
    }
}

/// In-process storage with an optional byte quota, mirroring the capacity
/// limit of browser local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: HashMap<&'static str, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.slots.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl SlotStorage for MemoryStorage {
    fn read(&self, slot: &'static str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &'static str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota_bytes {
            let current = self.slots.get(slot).map(|v| slot.len() + v.len()).unwrap_or(0);
            let projected = self.used_bytes() - current + slot.len() + value.len();
            if projected > quota {
                return Err(StoreError::Persistence {
                    slot,
                    reason: format!("quota exceeded ({projected} > {quota} bytes)"),
                });
            }
        }
        self.slots.insert(slot, value.to_string());
        Ok(())
    }
}
