use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, ValidationError};
use crate::models::{LineItem, Order};
use crate::money::Amount;

/// A raw invoice row as entered by the user, before filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Amount,
}

impl LineItemInput {
    pub fn new(name: impl Into<String>, quantity: i64, unit_price: Amount) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    fn into_line_item(self) -> std::result::Result<Option<LineItem>, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() || self.quantity <= 0 || self.unit_price <= Amount::ZERO {
            return Ok(None);
        }
        let Ok(quantity) = u32::try_from(self.quantity) else {
            return Ok(None);
        };
        let total = Amount::from(quantity)
            .checked_mul(self.unit_price)
            .ok_or(ValidationError::OutOfRange("line total"))?;
        Ok(Some(LineItem {
            name,
            quantity,
            unit_price: self.unit_price,
            total,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub items: Vec<LineItem>,
    pub subtotal: Amount,
    pub discount: Amount,
    pub tax: Amount,
    pub grand_total: Amount,
}

impl InvoiceDraft {
    /// A discount larger than subtotal plus tax yields a negative total. It is
    /// kept as-is; presentation decides how to flag it.
    pub fn is_negative(&self) -> bool {
        self.grand_total < Amount::ZERO
    }
}

/// Builds an invoice draft from raw rows. Rows with an empty name, a
/// non-positive quantity or a non-positive unit price are dropped silently.
/// Totals that do not fit an `Amount` are rejected rather than wrapped.
pub fn calculate(items: Vec<LineItemInput>, discount: Amount, tax: Amount) -> Result<InvoiceDraft> {
    if discount < Amount::ZERO {
        return Err(ValidationError::Negative("discount").into());
    }
    if tax < Amount::ZERO {
        return Err(ValidationError::Negative("tax").into());
    }

    let mut kept = Vec::with_capacity(items.len());
    for input in items {
        if let Some(item) = input.into_line_item()? {
            kept.push(item);
        }
    }
    if kept.is_empty() {
        return Err(Error::NoValidItems);
    }
    let items = kept;

    let subtotal = items
        .iter()
        .try_fold(Amount::ZERO, |acc, it| acc.checked_add(it.total))
        .ok_or(ValidationError::OutOfRange("subtotal"))?;
    let grand_total = subtotal
        .checked_sub(discount)
        .and_then(|v| v.checked_add(tax))
        .ok_or(ValidationError::OutOfRange("grand total"))?;

    Ok(InvoiceDraft {
        items,
        subtotal,
        discount,
        tax,
        grand_total,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    pub client_id: String,
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub discount: Amount,
    #[serde(default)]
    pub tax: Amount,
    /// Defaults to today when absent.
    #[serde(default)]
    pub invoice_date: Option<String>,
}

/// Pre-fills one invoice row from an existing order.
pub fn line_item_from_order(order: &Order) -> LineItemInput {
    LineItemInput::new(
        format!("{} - {}", order.garment_type, order.description),
        1,
        order.price,
    )
}
