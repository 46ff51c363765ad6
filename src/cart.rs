//! In-progress order cart.
//!
//! Transient multiset of catalog items being assembled into a new order.
//! Discarded on save or cancel; never persisted. All operations are total:
//! removing an unknown item is a no-op, not an error.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

/// One cart line. Quantity is always >= 1; a line decremented to zero is
/// removed from the cart entirely, never stored at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: CatalogItem,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the quantity for this item by 1, inserting a new line at
    /// quantity 1 if the item is not in the cart yet.
    pub fn add(&mut self, item: &CatalogItem) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id == item.id) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                item: item.clone(),
                quantity: 1,
            });
        }
    }

    /// Decrement the quantity for this item id by 1, deleting the line when
    /// it reaches zero. Unknown ids are a no-op.
    pub fn remove(&mut self, item_id: &str) {
        if let Some(pos) = self.lines.iter().position(|l| l.item.id == item_id) {
            if self.lines[pos].quantity <= 1 {
                self.lines.remove(pos);
            } else {
                self.lines[pos].quantity -= 1;
            }
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of unit_price * quantity over current lines.
    pub fn total(&self) -> i64 {
        self.lines
            .iter()
            .map(|l| l.item.unit_price * i64::from(l.quantity))
            .sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.item.id == item_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }
}
