//! Order tracker for a single-location food stand.
//!
//! The crate keeps a catalog, a cart, and a day-keyed ledger of orders with
//! independent payment and kitchen states, persists everything through an
//! opaque key-value slot store (SQLite in production, in-memory for tests),
//! and renders the share and export artifacts the stand actually uses:
//! daily summaries, WhatsApp links, CSV, and PNG receipts.

pub mod cart;
pub mod catalog;
pub mod db;
pub mod error;
pub mod export;
pub mod history;
pub mod ledger;
pub mod order;
pub mod receipt;
pub mod storage;
pub mod totals;

pub use cart::Cart;
pub use catalog::{default_catalog, CatalogItem};
pub use error::PosError;
pub use history::{query_history, HistoryFilter, HistoryView, StatusFilter};
pub use ledger::{today_key, Ledger, NewOrder};
pub use order::{Order, PaymentStatus};
pub use receipt::ReceiptKind;
pub use storage::{MemoryStore, SlotStore, SqliteStore};
pub use totals::{compute_totals, Totals};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Safe to call more than once;
/// later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ss_burger_pos=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .ok();
}
