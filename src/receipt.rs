//! PNG receipt and invoice rendering.
//!
//! Draws a fixed-width ticket (32 columns) with the embedded 8x8 bitmap
//! font at 2x scale onto a grayscale canvas, then PNG-encodes it. No
//! printer or GPU involved; the caller decides where the bytes go.

use std::io::Cursor;

use chrono::Local;
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{DynamicImage, GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::error::PosError;
use crate::export::currency;
use crate::order::Order;

const COLS: usize = 32;
const GLYPH: u32 = 8;
const SCALE: u32 = 2;
const MARGIN: u32 = 16;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptKind {
    Receipt,
    Invoice,
}

impl ReceiptKind {
    pub fn slug(self) -> &'static str {
        match self {
            Self::Receipt => "recibo",
            Self::Invoice => "factura",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Receipt => "RECIBO",
            Self::Invoice => "FACTURA",
        }
    }
}

/// Lowercase, collapse everything that is not ascii-alphanumeric into a
/// single underscore, trim the ends.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// `recibo_2025-03-01_sin_nombre.png` and friends.
pub fn receipt_filename(kind: ReceiptKind, day_key: &str, customer_name: &str) -> String {
    let mut slug = sanitize(customer_name);
    if slug.is_empty() {
        slug = "cliente".to_string();
    }
    format!("{}_{}_{}.png", kind.slug(), day_key, slug)
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Label left, value right, padded to the ticket width. The label gets
/// truncated before the value ever does.
fn pair(label: &str, value: &str) -> String {
    let value_len = value.chars().count();
    let label_room = COLS.saturating_sub(value_len + 1);
    let label = truncate(label, label_room);
    let pad = COLS - label.chars().count() - value_len;
    format!("{label}{}{value}", " ".repeat(pad))
}

fn centered(text: &str) -> String {
    let text = truncate(text, COLS);
    let pad = (COLS - text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn separator() -> String {
    "-".repeat(COLS)
}

fn ticket_lines(kind: ReceiptKind, order: &Order) -> Vec<String> {
    let hora = order
        .created_at
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();

    let mut lines = vec![
        centered("S&S BURGER"),
        centered(&format!("{} {}", kind.title(), order.day_key)),
        separator(),
        truncate(&format!("Cliente: {}", order.customer_name), COLS),
    ];
    if !order.phone.is_empty() {
        lines.push(truncate(&format!("Tel: {}", order.phone), COLS));
    }
    lines.push(truncate(&format!("Hora: {hora}"), COLS));
    lines.push(separator());
    for line in &order.lines {
        lines.push(pair(
            &format!("{}x {}", line.quantity, line.item.name),
            &currency(line.total()),
        ));
    }
    lines.push(separator());
    lines.push(pair("TOTAL", &currency(order.total())));
    if order.is_paid() {
        let mut paid = "PAGADO".to_string();
        if !order.payment_method.is_empty() {
            paid.push_str(" - ");
            paid.push_str(&order.payment_method);
        }
        lines.push(truncate(&paid, COLS));
        if !order.payment_reference.is_empty() {
            lines.push(truncate(&format!("Ref: {}", order.payment_reference), COLS));
        }
    } else {
        lines.push("PENDIENTE".to_string());
    }
    if !order.note.is_empty() {
        lines.push(truncate(&format!("Nota: {}", order.note), COLS));
    }
    lines.push(separator());
    lines.push(centered("Gracias por su compra!"));
    lines
}

// ---------------------------------------------------------------------------
// Rasterization
// ---------------------------------------------------------------------------

fn glyph_for(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn blit_char(canvas: &mut GrayImage, ch: char, origin_x: u32, origin_y: u32) {
    let glyph = glyph_for(ch);
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..GLYPH {
            if bits & (1 << col) == 0 {
                continue;
            }
            for dy in 0..SCALE {
                for dx in 0..SCALE {
                    let x = origin_x + col * SCALE + dx;
                    let y = origin_y + row as u32 * SCALE + dy;
                    canvas.put_pixel(x, y, Luma([0]));
                }
            }
        }
    }
}

/// Render the ticket for `order` as an in-memory PNG.
pub fn render_receipt_png(kind: ReceiptKind, order: &Order) -> Result<Vec<u8>, PosError> {
    let lines = ticket_lines(kind, order);
    let cell = GLYPH * SCALE;
    let width = COLS as u32 * cell + MARGIN * 2;
    let height = lines.len() as u32 * cell + MARGIN * 2;

    let mut canvas = GrayImage::from_pixel(width, height, Luma([255]));
    for (row, line) in lines.iter().enumerate() {
        for (col, ch) in line.chars().take(COLS).enumerate() {
            blit_char(
                &mut canvas,
                ch,
                MARGIN + col as u32 * cell,
                MARGIN + row as u32 * cell,
            );
        }
    }

    let mut encoded = Vec::new();
    DynamicImage::ImageLuma8(canvas)
        .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
        .map_err(|e| PosError::Render(format!("failed to encode receipt png: {e}")))?;
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::order::{KitchenStatus, OrderLine, PaymentStatus};
    use chrono::Utc;

    fn sample_order() -> Order {
        Order {
            id: "o-1".to_string(),
            created_at: Utc::now(),
            customer_name: "Ana María".to_string(),
            phone: "3001112233".to_string(),
            note: "sin cebolla".to_string(),
            lines: vec![OrderLine {
                item: CatalogItem::new("perro", "Perro Sencillo", 6000),
                quantity: 2,
            }],
            payment_status: PaymentStatus::Paid,
            payment_method: "Nequi".to_string(),
            payment_reference: "tx-9".to_string(),
            kitchen_status: KitchenStatus::Pending,
            day_key: "2025-03-01".to_string(),
        }
    }

    #[test]
    fn filename_sanitizes_customer_name() {
        assert_eq!(
            receipt_filename(ReceiptKind::Receipt, "2025-03-01", "Ana María P."),
            "recibo_2025-03-01_ana_mar_a_p.png"
        );
        assert_eq!(
            receipt_filename(ReceiptKind::Invoice, "2025-03-01", "Sin nombre"),
            "factura_2025-03-01_sin_nombre.png"
        );
        assert_eq!(
            receipt_filename(ReceiptKind::Receipt, "2025-03-01", "¡¡¡"),
            "recibo_2025-03-01_cliente.png"
        );
    }

    #[test]
    fn pair_right_aligns_value() {
        let line = pair("TOTAL", "$ 12.000");
        assert_eq!(line.chars().count(), COLS);
        assert!(line.starts_with("TOTAL"));
        assert!(line.ends_with("$ 12.000"));
    }

    #[test]
    fn pair_truncates_long_labels_not_values() {
        let line = pair(
            "3x Combo especial de la casa con todo",
            "$ 48.000",
        );
        assert_eq!(line.chars().count(), COLS);
        assert!(line.ends_with(" $ 48.000"));
    }

    #[test]
    fn ticket_includes_payment_and_note() {
        let lines = ticket_lines(ReceiptKind::Invoice, &sample_order());
        assert!(lines.iter().any(|l| l.contains("FACTURA 2025-03-01")));
        assert!(lines.iter().any(|l| l == "PAGADO - Nequi"));
        assert!(lines.iter().any(|l| l == "Ref: tx-9"));
        assert!(lines.iter().any(|l| l == "Nota: sin cebolla"));
    }

    #[test]
    fn unpaid_ticket_says_pendiente() {
        let mut order = sample_order();
        order.payment_status = PaymentStatus::Unpaid;
        order.payment_method.clear();
        order.payment_reference.clear();
        let lines = ticket_lines(ReceiptKind::Receipt, &order);
        assert!(lines.iter().any(|l| l == "PENDIENTE"));
        assert!(!lines.iter().any(|l| l.contains("PAGADO")));
    }

    #[test]
    fn renders_valid_png_bytes() {
        let bytes = render_receipt_png(ReceiptKind::Receipt, &sample_order()).expect("png");
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n']);
        assert!(bytes.len() > 100);
    }
}
