//! Read-only cross-day query surface.
//!
//! Flattens orders from every day except the excluded (current) one, tags
//! each with its source day, filters by payment status, and hands back the
//! aggregated totals. Never mutates the ledger.

use crate::ledger::Ledger;
use crate::order::Order;
use crate::totals::{compute_totals, Totals};

/// Payment-status filter shared by the history view and today's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

impl StatusFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Paid => order.is_paid(),
            StatusFilter::Unpaid => !order.is_paid(),
        }
    }
}

/// An order tagged with the day it was filed under.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub day_key: String,
    pub order: Order,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub entries: Vec<HistoryEntry>,
    pub totals: Totals,
    pub count: usize,
}

/// Optional narrowing for a history query.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter<'a> {
    /// Restrict to exactly this day (if present in the ledger).
    pub date: Option<&'a str>,
    pub status: StatusFilter,
}

/// Query all non-current days of the ledger.
///
/// Candidate days are every key except `exclude_day_key`, most recent
/// first, unless `filter.date` picks one specific day, which wins even
/// over the exclusion (matching how the stand re-checks "today" by date).
pub fn query_history(
    ledger: &Ledger,
    exclude_day_key: &str,
    filter: HistoryFilter<'_>,
) -> HistoryView {
    let candidate_days: Vec<&str> = match filter.date {
        Some(date) => {
            if ledger.days().contains_key(date) {
                vec![date]
            } else {
                Vec::new()
            }
        }
        None => {
            let mut days: Vec<&str> = ledger
                .day_keys()
                .filter(|day| *day != exclude_day_key)
                .collect();
            days.sort_unstable_by(|a, b| b.cmp(a));
            days
        }
    };

    let entries: Vec<HistoryEntry> = candidate_days
        .iter()
        .flat_map(|day| {
            ledger
                .orders_for(day)
                .iter()
                .filter(|order| filter.status.matches(order))
                .map(|order| HistoryEntry {
                    day_key: (*day).to_string(),
                    order: order.clone(),
                })
        })
        .collect();

    let totals = compute_totals(entries.iter().map(|entry| &entry.order));
    let count = entries.len();

    HistoryView {
        entries,
        totals,
        count,
    }
}

/// Filter a single day's orders by payment status (today's list view).
pub fn filter_by_status<'a>(orders: &'a [Order], status: StatusFilter) -> Vec<&'a Order> {
    orders.iter().filter(|o| status.matches(o)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::catalog::CatalogItem;
    use crate::ledger::NewOrder;
    use crate::storage::MemoryStore;

    fn item(price: i64) -> CatalogItem {
        CatalogItem::new("x", "X", price)
    }

    /// Ledger fixture for Scenario C: two orders on D1 (one paid 10000,
    /// one unpaid 5000) and one paid order of 7000 on D2 ("today").
    fn scenario_c_ledger() -> Ledger {
        let mut ledger = Ledger::load(Box::new(MemoryStore::new()));

        let mut cart = Cart::new();
        cart.add(&item(10000));
        ledger
            .create_order(
                "2025-03-01",
                NewOrder {
                    mark_paid: true,
                    ..Default::default()
                },
                cart.lines(),
            )
            .unwrap();

        let mut cart = Cart::new();
        cart.add(&item(5000));
        ledger
            .create_order("2025-03-01", NewOrder::default(), cart.lines())
            .unwrap();

        let mut cart = Cart::new();
        cart.add(&item(7000));
        ledger
            .create_order(
                "2025-03-02",
                NewOrder {
                    mark_paid: true,
                    ..Default::default()
                },
                cart.lines(),
            )
            .unwrap();

        ledger
    }

    #[test]
    fn excludes_current_day_and_aggregates_the_rest() {
        let ledger = scenario_c_ledger();
        let view = query_history(&ledger, "2025-03-02", HistoryFilter::default());

        assert_eq!(view.count, 2);
        assert!(view.entries.iter().all(|e| e.day_key == "2025-03-01"));
        assert_eq!(view.totals.gross, 15000);
        assert_eq!(view.totals.collected, 10000);
        assert_eq!(view.totals.outstanding, 5000);
    }

    #[test]
    fn status_filter_narrows_entries_and_totals() {
        let ledger = scenario_c_ledger();

        let paid = query_history(
            &ledger,
            "2025-03-02",
            HistoryFilter {
                status: StatusFilter::Paid,
                ..Default::default()
            },
        );
        assert_eq!(paid.count, 1);
        assert_eq!(paid.totals.gross, 10000);
        assert_eq!(paid.totals.outstanding, 0);

        let unpaid = query_history(
            &ledger,
            "2025-03-02",
            HistoryFilter {
                status: StatusFilter::Unpaid,
                ..Default::default()
            },
        );
        assert_eq!(unpaid.count, 1);
        assert_eq!(unpaid.totals.gross, 5000);
        assert_eq!(unpaid.totals.collected, 0);
    }

    #[test]
    fn explicit_date_restricts_to_that_day() {
        let ledger = scenario_c_ledger();
        let view = query_history(
            &ledger,
            "2025-03-02",
            HistoryFilter {
                date: Some("2025-03-01"),
                ..Default::default()
            },
        );
        assert_eq!(view.count, 2);

        let missing = query_history(
            &ledger,
            "2025-03-02",
            HistoryFilter {
                date: Some("2019-01-01"),
                ..Default::default()
            },
        );
        assert_eq!(missing.count, 0);
        assert_eq!(missing.totals, Totals::default());
    }

    #[test]
    fn explicit_date_wins_over_the_excluded_day() {
        let ledger = scenario_c_ledger();
        let view = query_history(
            &ledger,
            "2025-03-02",
            HistoryFilter {
                date: Some("2025-03-02"),
                ..Default::default()
            },
        );
        assert_eq!(view.count, 1);
        assert_eq!(view.totals.gross, 7000);
    }

    #[test]
    fn days_are_ordered_most_recent_first() {
        let mut ledger = scenario_c_ledger();
        let mut cart = Cart::new();
        cart.add(&item(1000));
        ledger
            .create_order("2025-02-15", NewOrder::default(), cart.lines())
            .unwrap();

        let view = query_history(&ledger, "zzzz-no-day", HistoryFilter::default());
        let days: Vec<&str> = view.entries.iter().map(|e| e.day_key.as_str()).collect();
        let mut sorted = days.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(days, sorted);
        assert_eq!(view.entries.first().unwrap().day_key, "2025-03-02");
        assert_eq!(view.entries.last().unwrap().day_key, "2025-02-15");
    }

    #[test]
    fn query_never_mutates_the_ledger() {
        let ledger = scenario_c_ledger();
        let before = ledger.days().clone();
        let _ = query_history(&ledger, "2025-03-02", HistoryFilter::default());
        assert_eq!(ledger.days(), &before);
    }

    #[test]
    fn today_list_filter_by_status() {
        let ledger = scenario_c_ledger();
        let today = ledger.orders_for("2025-03-01");
        assert_eq!(filter_by_status(today, StatusFilter::All).len(), 2);
        assert_eq!(filter_by_status(today, StatusFilter::Paid).len(), 1);
        assert_eq!(filter_by_status(today, StatusFilter::Unpaid).len(), 1);
    }
}
