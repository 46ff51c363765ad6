//! The persisted order record and its state enums.
//!
//! Field names on the wire stay camelCase, matching the payload the stand's
//! previous app wrote to its storage slot. Deserialization goes through
//! [`OrderRecord`], which also accepts the legacy single-item shape
//! (`product`/`qty` directly on the order) and upgrades it to a one-line
//! order, so the rest of the crate only ever sees the canonical shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

/// Sentinel customer name used when the field is left blank.
pub const NO_NAME: &str = "Sin nombre";

// Known payment methods. The method is stored as a plain string: these
// cover the stand's accepted channels, and `METHOD_OTHER` is a sentinel
// whose free text replaces it (see `resolve_method`).
pub const METHOD_CASH: &str = "Efectivo";
pub const METHOD_NEQUI: &str = "Nequi";
pub const METHOD_DAVIPLATA: &str = "Daviplata";
pub const METHOD_BANCOLOMBIA: &str = "Bancolombia";
pub const METHOD_OTHER: &str = "Otro";

pub const KNOWN_METHODS: &[&str] = &[
    METHOD_CASH,
    METHOD_NEQUI,
    METHOD_DAVIPLATA,
    METHOD_BANCOLOMBIA,
    METHOD_OTHER,
];

/// Resolve the stored method string from a selection. When the selection is
/// the `Otro` sentinel, the supplied free text becomes the stored method.
pub fn resolve_method(selected: &str, other_text: &str) -> String {
    if selected == METHOD_OTHER && !other_text.trim().is_empty() {
        other_text.trim().to_string()
    } else {
        selected.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

/// Kitchen preparation progress. Transitions are deliberately unrestricted
/// (any state to any state) so a mis-click can be corrected; do not tighten
/// this into a forward-only sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KitchenStatus {
    Pending,
    Preparing,
    Ready,
}

/// One order line: a snapshot of the catalog item at order time plus a
/// quantity. Catalog edits after the fact never change historical totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(alias = "product")]
    pub item: CatalogItem,
    #[serde(alias = "qty")]
    pub quantity: u32,
}

impl OrderLine {
    pub fn total(&self) -> i64 {
        self.item.unit_price * i64::from(self.quantity)
    }
}

/// A finalized, persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "OrderRecord")]
pub struct Order {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub phone: String,
    pub note: String,
    /// Never empty for a persisted order.
    pub lines: Vec<OrderLine>,
    pub payment_status: PaymentStatus,
    /// Meaningful only when paid; empty string otherwise.
    pub payment_method: String,
    /// Meaningful only when paid; empty string otherwise.
    pub payment_reference: String,
    pub kitchen_status: KitchenStatus,
    /// Calendar date (`YYYY-MM-DD`, local) assigned once at creation.
    pub day_key: String,
}

impl Order {
    /// Order total, recomputed fresh from the line snapshots every time.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(OrderLine::total).sum()
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

/// Wire-shape record accepted at the deserialization boundary.
///
/// Covers both the current multi-line shape and the legacy shape where a
/// single `product`/`qty` pair sat directly on the order and payment state
/// was a `paid` boolean.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderRecord {
    #[serde(default)]
    id: String,
    #[serde(default, alias = "at")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    customer_name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    note: String,
    #[serde(default, alias = "items")]
    lines: Option<Vec<OrderLine>>,
    // Legacy single-item shape.
    #[serde(default, alias = "product")]
    item: Option<CatalogItem>,
    #[serde(default, alias = "qty")]
    quantity: Option<u32>,
    #[serde(default)]
    payment_status: Option<PaymentStatus>,
    #[serde(default)]
    paid: Option<bool>,
    #[serde(default)]
    payment_method: String,
    #[serde(default)]
    payment_reference: String,
    #[serde(default, alias = "kitchen")]
    kitchen_status: Option<KitchenStatus>,
    #[serde(default)]
    day_key: String,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        let lines = match record.lines {
            Some(lines) => lines,
            None => match record.item {
                // Legacy upgrade: one-line order from the flat item/quantity.
                Some(item) => vec![OrderLine {
                    item,
                    quantity: record.quantity.unwrap_or(1).max(1),
                }],
                None => Vec::new(),
            },
        };
        let payment_status = record.payment_status.unwrap_or(match record.paid {
            Some(true) => PaymentStatus::Paid,
            _ => PaymentStatus::Unpaid,
        });
        let customer_name = if record.customer_name.trim().is_empty() {
            NO_NAME.to_string()
        } else {
            record.customer_name
        };
        Order {
            id: record.id,
            created_at: record.created_at.unwrap_or_else(Utc::now),
            customer_name,
            phone: record.phone,
            note: record.note,
            lines,
            payment_status,
            payment_method: record.payment_method,
            payment_reference: record.payment_reference,
            kitchen_status: record.kitchen_status.unwrap_or(KitchenStatus::Pending),
            day_key: record.day_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> CatalogItem {
        CatalogItem::new("tocisuizo", "Tocisuizo", 12000)
    }

    fn sample_order() -> Order {
        Order {
            id: "o-1".to_string(),
            created_at: Utc::now(),
            customer_name: "Ana".to_string(),
            phone: String::new(),
            note: String::new(),
            lines: vec![OrderLine {
                item: sample_item(),
                quantity: 2,
            }],
            payment_status: PaymentStatus::Unpaid,
            payment_method: String::new(),
            payment_reference: String::new(),
            kitchen_status: KitchenStatus::Pending,
            day_key: "2025-03-01".to_string(),
        }
    }

    #[test]
    fn order_total_sums_line_snapshots() {
        let order = sample_order();
        assert_eq!(order.total(), 24000);
    }

    #[test]
    fn serde_round_trip_preserves_order() {
        let order = sample_order();
        let json = serde_json::to_string(&order).expect("serialize");
        let back: Order = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, order);
    }

    #[test]
    fn legacy_single_item_record_upgrades_to_one_line() {
        // Shape written by the v1 app: product/qty on the order, paid bool.
        let json = r#"{
            "id": "legacy-1",
            "at": "2024-11-02T18:30:00Z",
            "customerName": "Briand",
            "phone": "3017352907",
            "product": { "id": "x", "name": "X", "price": 7000 },
            "qty": 3,
            "paid": true,
            "kitchen": "preparing"
        }"#;
        let order: Order = serde_json::from_str(json).expect("legacy record should parse");
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 3);
        assert_eq!(order.total(), 21000);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.kitchen_status, KitchenStatus::Preparing);
    }

    #[test]
    fn legacy_total_matches_equivalent_lines_based_order() {
        let legacy: Order = serde_json::from_str(
            r#"{ "id": "a", "product": { "id": "x", "name": "X", "price": 5000 }, "qty": 3 }"#,
        )
        .unwrap();
        let current: Order = serde_json::from_str(
            r#"{ "id": "b", "lines": [
                { "item": { "id": "x", "name": "X", "unitPrice": 5000 }, "quantity": 3 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(legacy.total(), current.total());
        assert_eq!(legacy.total(), 15000);
    }

    #[test]
    fn blank_customer_name_defaults_to_sentinel() {
        let order: Order = serde_json::from_str(
            r#"{ "id": "c", "customerName": "  ", "lines": [
                { "item": { "id": "x", "name": "X", "unitPrice": 1000 }, "quantity": 1 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(order.customer_name, NO_NAME);
    }

    #[test]
    fn resolve_method_handles_other_sentinel() {
        assert_eq!(resolve_method(METHOD_CASH, ""), METHOD_CASH);
        assert_eq!(resolve_method(METHOD_OTHER, " transferencia tia "), "transferencia tia");
        // Sentinel with no free text stays as-is rather than storing blank.
        assert_eq!(resolve_method(METHOD_OTHER, "  "), METHOD_OTHER);
    }
}
