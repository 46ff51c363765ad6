//! Text export artifacts: daily summary, WhatsApp share link, history CSV.
//!
//! These are pure "data to string" functions; writing files, opening share
//! sheets, and the clipboard are the caller's problem. Labels stay in
//! Spanish to match what the stand's customers and accountant already see.

use chrono::Local;

use crate::history::HistoryEntry;
use crate::order::Order;
use crate::totals::compute_totals;

/// es-CO peso display without decimals: `$ 12.000`.
pub fn currency(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-$ {grouped}")
    } else {
        format!("$ {grouped}")
    }
}

/// Strip everything but digits; what `wa.me` expects in the path.
pub fn normalize_phone(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn items_text(order: &Order, separator: &str) -> String {
    order
        .lines
        .iter()
        .map(|line| format!("{}x {}", line.quantity, line.item.name))
        .collect::<Vec<_>>()
        .join(separator)
}

fn payment_tag(order: &Order) -> String {
    if !order.is_paid() {
        return "[PENDIENTE]".to_string();
    }
    let mut tag = String::from("[PAGADO");
    if !order.payment_method.is_empty() {
        tag.push_str(" - ");
        tag.push_str(&order.payment_method);
    }
    if !order.payment_reference.is_empty() {
        tag.push_str(" - Ref:");
        tag.push_str(&order.payment_reference);
    }
    tag.push(']');
    tag
}

/// Plain-text day summary: header, totals line, blank line, one line per
/// order.
pub fn summary_text(day_key: &str, orders: &[Order]) -> String {
    let totals = compute_totals(orders);
    let mut lines = vec![
        format!("Resumen {day_key}"),
        format!("Total pedidos: {}", orders.len()),
        format!(
            "Cobrado: {} | Pendiente: {} | Total: {}",
            currency(totals.collected),
            currency(totals.outstanding),
            currency(totals.gross)
        ),
        String::new(),
    ];
    for order in orders {
        lines.push(format!(
            "• {} — {} ({}) {}",
            order.customer_name,
            items_text(order, ", "),
            currency(order.total()),
            payment_tag(order)
        ));
    }
    lines.join("\n")
}

/// Percent-encode a query component the way `encodeURIComponent` does
/// (unreserved: alphanumerics and `-_.!~*'()`).
fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => out.push(byte as char),
            b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Outbound WhatsApp link carrying `text`. With no admin number configured
/// the link opens the contact picker instead.
pub fn whatsapp_link(admin_phone: &str, text: &str) -> String {
    let digits = normalize_phone(admin_phone);
    let encoded = encode_component(text);
    if digits.is_empty() {
        format!("https://wa.me/?text={encoded}")
    } else {
        format!("https://wa.me/{digits}?text={encoded}")
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

pub const CSV_HEADER: &str = "fecha,hora,cliente,telefono,items,total,estado";

/// Quote a free-text CSV field, doubling embedded quotes.
fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn csv_row(day_key: &str, order: &Order) -> String {
    let hora = order
        .created_at
        .with_timezone(&Local)
        .format("%H:%M:%S")
        .to_string();
    let estado = if order.is_paid() { "PAGADO" } else { "PENDIENTE" };
    [
        day_key.to_string(),
        hora,
        csv_quote(&order.customer_name),
        csv_quote(&order.phone),
        csv_quote(&items_text(order, " + ")),
        order.total().to_string(),
        estado.to_string(),
    ]
    .join(",")
}

/// CSV for a history view (filtered or complete): header row plus one row
/// per entry. Quoting is applied to the free-text fields only.
pub fn history_csv(entries: &[HistoryEntry]) -> String {
    let mut out = vec![CSV_HEADER.to_string()];
    for entry in entries {
        out.push(csv_row(&entry.day_key, &entry.order));
    }
    out.join("\n")
}
