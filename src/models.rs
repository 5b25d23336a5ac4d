use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::money::Amount;

/// Work status shared by clients and orders. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Received,
    Process,
    Pending,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Received => "received",
            Status::Process => "process",
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }

    pub fn parse(v: &str) -> Option<Status> {
        let s = v.trim();
        [Status::Received, Status::Process, Status::Pending, Status::Completed]
            .into_iter()
            .find(|st| s.eq_ignore_ascii_case(st.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementField {
    Chest,
    Waist,
    Length,
    Sleeve,
}

impl MeasurementField {
    pub const ALL: [MeasurementField; 4] = [
        MeasurementField::Chest,
        MeasurementField::Waist,
        MeasurementField::Length,
        MeasurementField::Sleeve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementField::Chest => "chest",
            MeasurementField::Waist => "waist",
            MeasurementField::Length => "length",
            MeasurementField::Sleeve => "sleeve",
        }
    }

    pub fn parse(v: &str) -> Option<MeasurementField> {
        let s = v.trim();
        Self::ALL.into_iter().find(|f| s.eq_ignore_ascii_case(f.as_str()))
    }
}

pub type Measurements = BTreeMap<MeasurementField, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub book_no: String,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default)]
    pub order_status: Status,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    pub phone: String,
    pub book_no: String,
    #[serde(default)]
    pub measurements: Measurements,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub book_no: Option<String>,
    #[serde(default)]
    pub measurements: Option<Measurements>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub client_phone: String,
    pub order_number: String,
    pub order_date: String,
    pub garment_type: String,
    pub description: String,
    pub price: Amount,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub client_id: String,
    pub order_number: String,
    pub order_date: String,
    pub garment_type: String,
    pub description: String,
    pub price: Amount,
    #[serde(default)]
    pub status: Option<Status>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Amount,
    pub total: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub client_id: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_book_no: String,
    pub items: Vec<LineItem>,
    pub subtotal: Amount,
    pub discount: Amount,
    pub tax: Amount,
    pub grand_total: Amount,
    pub invoice_date: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Amount,
    pub date: String, // YYYY-MM-DD
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Amount,
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&Status::Process).unwrap(), "\"process\"");
        let s: Status = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(s, Status::Completed);
        assert_eq!(Status::parse(" Pending "), Some(Status::Pending));
        assert_eq!(Status::parse("done"), None);
    }

    #[test]
    fn client_json_shape() {
        let mut measurements = Measurements::new();
        measurements.insert(MeasurementField::Chest, "42".to_string());
        let c = Client {
            id: "c1".to_string(),
            name: "Ahmed".to_string(),
            phone: "5551234".to_string(),
            book_no: "B1".to_string(),
            measurements,
            order_status: Status::Received,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        };
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["bookNo"], "B1");
        assert_eq!(v["orderStatus"], "received");
        assert_eq!(v["measurements"]["chest"], "42");
    }

    #[test]
    fn expense_type_field_and_numeric_amount() {
        let e: Expense = serde_json::from_str(
            r#"{"id":"e1","type":"Rent","amount":150.5,"date":"2025-02-01","createdAt":"x"}"#,
        )
        .unwrap();
        assert_eq!(e.kind, "Rent");
        assert_eq!(e.amount, Amount::new(1505, 1));
        assert_eq!(e.description, None);
    }

    #[test]
    fn invoice_payment_status_defaults_to_unpaid() {
        let json = r#"{
            "id":"i1","invoiceNumber":"INV-0001","clientId":"c1","clientName":"A",
            "clientPhone":"1","clientBookNo":"B","items":[],"subtotal":"0","discount":"0",
            "tax":"0","grandTotal":"0","invoiceDate":"2025-01-01","createdAt":"x"
        }"#;
        let inv: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(inv.payment_status, PaymentStatus::Unpaid);
    }
}
