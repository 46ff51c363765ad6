//! Day-keyed order ledger: the sole source of truth.
//!
//! Orders are filed under their creation date (`YYYY-MM-DD`, local time),
//! most recent first within a day. Every mutation immediately re-saves the
//! whole mapping into the store's orders slot; persistence is
//! fire-and-forget, so a failed write leaves the in-memory state
//! authoritative for the session. A corrupt or unparsable stored payload
//! degrades to an empty ledger rather than blocking the stand.
//!
//! Known limitation: two processes over the same store are an accepted
//! inconsistency window, not a supported configuration. This is a
//! single-device, single-operator design.

use std::collections::BTreeMap;

use chrono::{Local, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cart::CartLine;
use crate::error::PosError;
use crate::order::{
    KitchenStatus, Order, OrderLine, PaymentStatus, METHOD_CASH, NO_NAME,
};
use crate::storage::{SlotStore, ORDERS_SLOT};

/// Today's day key in the stand's local time zone.
pub fn today_key() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Customer-facing fields for a new order.
#[derive(Debug, Clone, Default)]
pub struct NewOrder<'a> {
    pub customer_name: &'a str,
    pub phone: &'a str,
    pub note: &'a str,
    /// When set, the order is created already paid in cash.
    pub mark_paid: bool,
}

pub struct Ledger {
    days: BTreeMap<String, Vec<Order>>,
    store: Box<dyn SlotStore>,
}

impl Ledger {
    /// Load the ledger from the store's orders slot.
    ///
    /// Fail-open policy: a missing slot or an unparsable payload yields an
    /// empty ledger; operational continuity outweighs recovery here.
    pub fn load(store: Box<dyn SlotStore>) -> Self {
        let days = match store.get_slot(ORDERS_SLOT) {
            None => BTreeMap::new(),
            Some(raw) => match serde_json::from_str::<BTreeMap<String, Vec<Order>>>(&raw) {
                Ok(mut days) => {
                    // Records that predate the dayKey field inherit it from
                    // the map key they were filed under.
                    for (day, orders) in days.iter_mut() {
                        for order in orders.iter_mut() {
                            if order.day_key.is_empty() {
                                order.day_key = day.clone();
                            }
                        }
                    }
                    days
                }
                Err(e) => {
                    warn!("Stored ledger is unreadable ({e}), starting empty");
                    BTreeMap::new()
                }
            },
        };
        Self { days, store }
    }

    /// Orders for a day, most recent first. Empty slice for unknown days.
    pub fn orders_for(&self, day_key: &str) -> &[Order] {
        self.days
            .get(day_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All day keys present in the ledger, ascending.
    pub fn day_keys(&self) -> impl Iterator<Item = &str> {
        self.days.keys().map(String::as_str)
    }

    pub fn days(&self) -> &BTreeMap<String, Vec<Order>> {
        &self.days
    }

    // -----------------------------------------------------------------
    // Mutations (each one persists the whole ledger afterwards)
    // -----------------------------------------------------------------

    /// Materialize cart lines into a new order filed under `day_key`.
    ///
    /// Rejects an empty cart with no mutation; the caller keeps the cart
    /// intact and prompts the operator. Returns the new order's id.
    pub fn create_order(
        &mut self,
        day_key: &str,
        details: NewOrder<'_>,
        cart_lines: &[CartLine],
    ) -> Result<String, PosError> {
        if cart_lines.is_empty() {
            return Err(PosError::EmptyCart);
        }

        let customer_name = if details.customer_name.trim().is_empty() {
            NO_NAME.to_string()
        } else {
            details.customer_name.trim().to_string()
        };

        let (payment_status, payment_method) = if details.mark_paid {
            (PaymentStatus::Paid, METHOD_CASH.to_string())
        } else {
            (PaymentStatus::Unpaid, String::new())
        };

        let order = Order {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            customer_name,
            phone: details.phone.trim().to_string(),
            note: details.note.trim().to_string(),
            lines: cart_lines
                .iter()
                .map(|line| OrderLine {
                    item: line.item.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            payment_status,
            payment_method,
            payment_reference: String::new(),
            kitchen_status: KitchenStatus::Pending,
            day_key: day_key.to_string(),
        };

        let id = order.id.clone();
        info!(order_id = %id, day = day_key, total = order.total(), "Order created");
        self.days.entry(day_key.to_string()).or_default().insert(0, order);
        self.persist();
        Ok(id)
    }

    /// Delete an order from its day. Unknown ids are a no-op.
    pub fn remove_order(&mut self, day_key: &str, order_id: &str) -> bool {
        let Some(orders) = self.days.get_mut(day_key) else {
            return false;
        };
        let before = orders.len();
        orders.retain(|o| o.id != order_id);
        if orders.len() == before {
            return false;
        }
        info!(order_id, day = day_key, "Order removed");
        self.persist();
        true
    }

    /// Mark an unpaid order as paid with the given method and reference.
    ///
    /// Legal only from UNPAID; calling it on a paid order is a no-op.
    pub fn mark_paid(
        &mut self,
        day_key: &str,
        order_id: &str,
        method: &str,
        reference: &str,
    ) -> bool {
        let Some(order) = find_order_mut(&mut self.days, day_key, order_id) else {
            return false;
        };
        if order.payment_status == PaymentStatus::Paid {
            warn!(order_id, "mark_paid on an already-paid order ignored");
            return false;
        }
        order.payment_status = PaymentStatus::Paid;
        order.payment_method = method.to_string();
        order.payment_reference = reference.trim().to_string();
        self.persist();
        true
    }

    /// Revert a paid order to unpaid.
    ///
    /// Destructive: the stored method and reference are discarded and not
    /// recoverable, so callers should confirm with the operator first.
    /// Legal only from PAID; a no-op otherwise.
    pub fn revert_to_unpaid(&mut self, day_key: &str, order_id: &str) -> bool {
        let Some(order) = find_order_mut(&mut self.days, day_key, order_id) else {
            return false;
        };
        if order.payment_status == PaymentStatus::Unpaid {
            return false;
        }
        order.payment_status = PaymentStatus::Unpaid;
        order.payment_method.clear();
        order.payment_reference.clear();
        self.persist();
        true
    }

    /// Set the kitchen status. Any target is accepted from any source state
    /// so a mis-click can be corrected. Unknown ids are a no-op.
    pub fn set_kitchen_status(
        &mut self,
        day_key: &str,
        order_id: &str,
        status: KitchenStatus,
    ) -> bool {
        let Some(order) = find_order_mut(&mut self.days, day_key, order_id) else {
            return false;
        };
        order.kitchen_status = status;
        self.persist();
        true
    }

    /// Replace the free-text note on an order.
    pub fn set_note(&mut self, day_key: &str, order_id: &str, note: &str) -> bool {
        let Some(order) = find_order_mut(&mut self.days, day_key, order_id) else {
            return false;
        };
        order.note = note.trim().to_string();
        self.persist();
        true
    }

    // -----------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------

    /// Rewrite the whole ledger into the orders slot. Failures are logged
    /// and swallowed: the in-memory state stays authoritative until the
    /// next successful write.
    fn persist(&self) {
        let payload = match serde_json::to_string(&self.days) {
            Ok(p) => p,
            Err(e) => {
                warn!("serialize ledger: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set_slot(ORDERS_SLOT, &payload) {
            warn!("persist ledger: {e}");
        }
    }
}

fn find_order_mut<'a>(
    days: &'a mut BTreeMap<String, Vec<Order>>,
    day_key: &str,
    order_id: &str,
) -> Option<&'a mut Order> {
    days.get_mut(day_key)?.iter_mut().find(|o| o.id == order_id)
}
