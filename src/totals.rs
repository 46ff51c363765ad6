//! Pure gross/collected/outstanding aggregation over a set of orders.
//!
//! Everything downstream (today's list, history view, exports) derives its
//! totals from here; nothing is cached persistently.

use serde::Serialize;

use crate::order::Order;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub gross: i64,
    pub collected: i64,
    pub outstanding: i64,
}

/// Single O(n) pass. `collected + outstanding == gross` holds for every
/// input by construction.
pub fn compute_totals<'a, I>(orders: I) -> Totals
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut totals = Totals::default();
    for order in orders {
        let amount = order.total();
        totals.gross += amount;
        if order.is_paid() {
            totals.collected += amount;
        }
    }
    totals.outstanding = totals.gross - totals.collected;
    totals
}
