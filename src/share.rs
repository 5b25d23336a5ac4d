//! Plain-text invoice summary for print, messaging and QR collaborators.

use std::fmt::Write as _;

use crate::models::{Invoice, PaymentStatus};
use crate::money::{format_amount, format_currency, Amount};
use crate::settings::ShopSettings;

pub fn invoice_share_text(invoice: &Invoice, settings: &ShopSettings) -> String {
    let cur = settings.currency.as_str();
    let mut out = String::new();

    let _ = writeln!(out, "{}", settings.name);
    if !settings.subtitle.trim().is_empty() {
        let _ = writeln!(out, "{}", settings.subtitle);
    }
    if !settings.phone.trim().is_empty() {
        let _ = writeln!(out, "Tel: {}", settings.phone);
    }
    out.push('\n');

    let _ = writeln!(out, "Invoice: {}", invoice.invoice_number);
    let _ = writeln!(out, "Date: {}", invoice.invoice_date);
    let _ = writeln!(out, "Client: {}", invoice.client_name);
    let _ = writeln!(out, "Phone: {}", invoice.client_phone);
    out.push('\n');

    for item in &invoice.items {
        let _ = writeln!(
            out,
            "- {} x{} @ {} = {}",
            item.name,
            item.quantity,
            format_amount(item.unit_price),
            format_amount(item.total)
        );
    }
    out.push('\n');

    let _ = writeln!(out, "Subtotal: {}", format_currency(cur, invoice.subtotal));
    if invoice.discount > Amount::ZERO {
        let _ = writeln!(out, "Discount: -{}", format_currency(cur, invoice.discount));
    }
    if invoice.tax > Amount::ZERO {
        let _ = writeln!(out, "Tax: {}", format_currency(cur, invoice.tax));
    }
    let _ = writeln!(out, "Total: {}", format_currency(cur, invoice.grand_total));
    if invoice.grand_total < Amount::ZERO {
        out.push_str("Note: discount exceeds invoice value\n");
    }
    let status = match invoice.payment_status {
        PaymentStatus::Paid => "PAID",
        PaymentStatus::Unpaid => "UNPAID",
    };
    let _ = write!(out, "Status: {}", status);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;

    fn invoice(discount: i64, tax: i64) -> Invoice {
        let unit = Amount::new(12_500, 3);
        let subtotal = unit * Amount::from(2u32);
        let discount = Amount::new(discount, 3);
        let tax = Amount::new(tax, 3);
        Invoice {
            id: "i1".to_string(),
            invoice_number: "INV-0001".to_string(),
            client_id: "c1".to_string(),
            client_name: "Ahmed".to_string(),
            client_phone: "5551234".to_string(),
            client_book_no: "B1".to_string(),
            items: vec![LineItem {
                name: "Suit".to_string(),
                quantity: 2,
                unit_price: unit,
                total: subtotal,
            }],
            subtotal,
            discount,
            tax,
            grand_total: subtotal - discount + tax,
            invoice_date: "2025-03-01".to_string(),
            payment_status: PaymentStatus::Unpaid,
            created_at: "x".to_string(),
            updated_at: "x".to_string(),
        }
    }

    #[test]
    fn summary_lists_totals_in_currency() {
        let text = invoice_share_text(&invoice(1_000, 500), &ShopSettings::default());
        assert!(text.starts_with("JAMAL AL-SHUWAIKH\n"));
        assert!(text.contains("Invoice: INV-0001"));
        assert!(text.contains("- Suit x2 @ 12.500 = 25.000"));
        assert!(text.contains("Subtotal: KWD 25.000"));
        assert!(text.contains("Discount: -KWD 1.000"));
        assert!(text.contains("Tax: KWD 0.500"));
        assert!(text.contains("Total: KWD 24.500"));
        assert!(text.ends_with("Status: UNPAID"));
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn negative_total_is_flagged() {
        let text = invoice_share_text(&invoice(100_000, 0), &ShopSettings::default());
        assert!(text.contains("Total: KWD -75.000"));
        assert!(text.contains("Note: discount exceeds invoice value"));
        assert!(!text.contains("Tax:"));
    }

    #[test]
    fn custom_currency_label() {
        let settings = ShopSettings {
            currency: "BHD".to_string(),
            ..Default::default()
        };
        let text = invoice_share_text(&invoice(0, 0), &settings);
        assert!(text.contains("Total: BHD 25.000"));
    }
}
