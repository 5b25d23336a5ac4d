//! Status changes for clients, orders and invoice payments.
//!
//! There is no transition graph: any status may be set from any other. Every
//! change stamps `updatedAt`. Entering `completed` stamps an order's
//! `completedDate`; leaving `completed` keeps the earlier stamp.

use crate::clock::now_iso;
use crate::error::StoreError;
use crate::models::{Client, Invoice, Order, PaymentStatus, Status};
use crate::storage::SlotStorage;
use crate::store::RecordStore;

pub fn apply_client_status(client: &mut Client, status: Status, now: &str) {
    client.order_status = status;
    client.updated_at = now.to_string();
}

pub fn apply_order_status(order: &mut Order, status: Status, now: &str) {
    order.status = status;
    order.updated_at = now.to_string();
    if status == Status::Completed {
        order.completed_date = Some(now.to_string());
    }
}

pub fn apply_payment_status(invoice: &mut Invoice, status: PaymentStatus, now: &str) {
    invoice.payment_status = status;
    invoice.updated_at = now.to_string();
}

impl<S: SlotStorage> RecordStore<S> {
    /// Returns `Ok(None)` when no client has this id.
    pub fn update_client_status(&mut self, id: &str, status: Status) -> Result<Option<Client>, StoreError> {
        let Some(mut client) = self.find::<Client>(id)? else {
            return Ok(None);
        };
        apply_client_status(&mut client, status, &now_iso());
        self.upsert(&client)?;
        Ok(Some(client))
    }

    pub fn update_order_status(&mut self, id: &str, status: Status) -> Result<Option<Order>, StoreError> {
        let Some(mut order) = self.find::<Order>(id)? else {
            return Ok(None);
        };
        apply_order_status(&mut order, status, &now_iso());
        self.upsert(&order)?;
        Ok(Some(order))
    }

    pub fn update_payment_status(
        &mut self,
        id: &str,
        status: PaymentStatus,
    ) -> Result<Option<Invoice>, StoreError> {
        let Some(mut invoice) = self.find::<Invoice>(id)? else {
            return Ok(None);
        };
        apply_payment_status(&mut invoice, status, &now_iso());
        self.upsert(&invoice)?;
        Ok(Some(invoice))
    }
}
