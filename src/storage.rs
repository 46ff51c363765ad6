//! Opaque key-value slot storage behind an explicit handle.
//!
//! The ledger and the admin contact number each live in a single text slot.
//! The store is passed in by the application root (no hidden singletons),
//! so the SQLite backend can be swapped for the in-memory one in tests
//! without touching business logic.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;

use crate::db::{self, DbState};
use crate::error::PosError;

/// Slot key for the serialized ledger. Kept from the previous app so an
/// imported localStorage dump drops straight in.
pub const ORDERS_SLOT: &str = "fastfood_orders_v2";
/// Slot key for the admin WhatsApp number.
pub const ADMIN_CONTACT_SLOT: &str = "fastfood_whatsapp_admin";

pub trait SlotStore: Send {
    /// Read a slot. `None` when the slot was never written or the backend
    /// failed; callers treat both the same way.
    fn get_slot(&self, key: &str) -> Option<String>;

    /// Write a slot, replacing any previous value.
    fn set_slot(&self, key: &str, value: &str) -> Result<(), PosError>;
}

/// A shared store handle is itself a store. Lets the application root keep
/// one handle while the ledger owns its own boxed copy.
impl<S: SlotStore + Sync + ?Sized> SlotStore for std::sync::Arc<S> {
    fn get_slot(&self, key: &str) -> Option<String> {
        (**self).get_slot(key)
    }

    fn set_slot(&self, key: &str, value: &str) -> Result<(), PosError> {
        (**self).set_slot(key, value)
    }
}

// ---------------------------------------------------------------------------
// Admin contact slot
// ---------------------------------------------------------------------------

/// Free-text admin WhatsApp number used for the daily summary share link.
/// No validation beyond what link construction strips later.
pub fn admin_contact(store: &dyn SlotStore) -> Option<String> {
    store.get_slot(ADMIN_CONTACT_SLOT)
}

/// Store the admin contact. Write failures are logged and swallowed, same
/// policy as ledger persistence.
pub fn set_admin_contact(store: &dyn SlotStore, value: &str) {
    if let Err(e) = store.set_slot(ADMIN_CONTACT_SLOT, value) {
        warn!("persist admin contact: {e}");
    }
}

// ---------------------------------------------------------------------------
// SQLite-backed store
// ---------------------------------------------------------------------------

/// Production store: slots live in the `slots` table of the local SQLite db.
pub struct SqliteStore {
    state: DbState,
}

impl SqliteStore {
    /// Open (or create) the database under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, PosError> {
        Ok(Self {
            state: db::init(data_dir)?,
        })
    }
}

impl SlotStore for SqliteStore {
    fn get_slot(&self, key: &str) -> Option<String> {
        let conn = match self.state.conn.lock() {
            Ok(c) => c,
            Err(e) => {
                warn!("slot store lock poisoned: {e}");
                return None;
            }
        };
        db::get_slot(&conn, key)
    }

    fn set_slot(&self, key: &str, value: &str) -> Result<(), PosError> {
        let conn = self
            .state
            .conn
            .lock()
            .map_err(|e| PosError::Storage(format!("lock poisoned: {e}")))?;
        db::set_slot(&conn, key, value)
    }
}

// ---------------------------------------------------------------------------
// In-memory store (tests, dry runs)
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a slot, e.g. with a legacy payload for a load test.
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.to_string(), value.to_string());
        Self {
            slots: Mutex::new(slots),
        }
    }
}

impl SlotStore for MemoryStore {
    fn get_slot(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    fn set_slot(&self, key: &str, value: &str) -> Result<(), PosError> {
        self.slots
            .lock()
            .map_err(|e| PosError::Storage(format!("lock poisoned: {e}")))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
