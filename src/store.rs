use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::clock::{now_iso, today_ymd};
use crate::error::{Result, StoreError, ValidationError};
use crate::ids::{format_invoice_number, generate_id};
use crate::invoice::{calculate, NewInvoice};
use crate::models::{
    Client, ClientPatch, Expense, Invoice, Measurements, NewClient, NewExpense, NewOrder, Order,
    Status,
};
use crate::money::Amount;
use crate::settings::{SettingsPatch, ShopSettings};
use crate::storage::{
    SlotStorage, CLIENTS_SLOT, EXPENSES_SLOT, INVOICES_SLOT, ORDERS_SLOT, SETTINGS_SLOT,
};

/// An entity kept in its own storage slot as one serialized ordered sequence.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const SLOT: &'static str;

    fn id(&self) -> &str;

    /// Fields matched by `RecordStore::search`.
    fn search_fields(&self) -> Vec<&str>;

    fn matches(&self, needle_lower: &str) -> bool {
        self.search_fields()
            .into_iter()
            .any(|f| f.to_lowercase().contains(needle_lower))
    }
}

impl Record for Client {
    const SLOT: &'static str = CLIENTS_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.phone.as_str(), self.book_no.as_str()]
    }
}

impl Record for Order {
    const SLOT: &'static str = ORDERS_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.client_name.as_str(), self.order_number.as_str()]
    }
}

impl Record for Invoice {
    const SLOT: &'static str = INVOICES_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.client_name.as_str(), self.invoice_number.as_str()]
    }
}

impl Record for Expense {
    const SLOT: &'static str = EXPENSES_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut out = vec![self.kind.as_str()];
        if let Some(d) = self.description.as_deref() {
            out.push(d);
        }
        out
    }
}

/// Single source of truth for all four collections and the shop settings.
///
/// Every mutation reads the whole collection, changes it in memory and writes
/// it back in one step. Entities are copied in and out; callers never hold
/// references into the store across calls.
pub struct RecordStore<S> {
    storage: S,
}

impl<S: SlotStorage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Current contents of a collection in insertion order. Unreadable or
    /// corrupt slots read as empty.
    pub fn get_all<T: Record>(&self) -> Vec<T> {
        self.load().unwrap_or_else(|e| {
            warn!(slot = T::SLOT, error = %e, "slot read failed, treating as empty");
            Vec::new()
        })
    }

    pub fn get_by_id<T: Record>(&self, id: &str) -> Option<T> {
        self.get_all::<T>().into_iter().find(|r| r.id() == id)
    }

    /// Collection contents for a read-modify-write. A storage read failure is
    /// returned so the caller never persists a collection it could not see.
    /// Corrupt contents still read as empty.
    pub(crate) fn load<T: Record>(&self) -> std::result::Result<Vec<T>, StoreError> {
        let Some(raw) = self.storage.read(T::SLOT)? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_str::<Vec<T>>(&raw).unwrap_or_else(|e| {
            warn!(slot = T::SLOT, error = %e, "corrupt slot, treating as empty");
            Vec::new()
        }))
    }

    pub(crate) fn find<T: Record>(&self, id: &str) -> std::result::Result<Option<T>, StoreError> {
        Ok(self.load::<T>()?.into_iter().find(|r| r.id() == id))
    }

    /// Replaces the record with the same id in place, or appends it.
    pub fn upsert<T: Record>(&mut self, record: &T) -> std::result::Result<(), StoreError> {
        let mut all = self.load::<T>()?;
        match all.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => *slot = record.clone(),
            None => all.push(record.clone()),
        }
        self.persist(&all)
    }

    /// Removes the record if present. An unknown id is not an error.
    pub fn delete_by_id<T: Record>(&mut self, id: &str) -> std::result::Result<(), StoreError> {
        let mut all = self.load::<T>()?;
        if let Some(pos) = all.iter().position(|r| r.id() == id) {
            all.remove(pos);
        }
        self.persist(&all)
    }

    /// Case-insensitive substring filter, storage order preserved.
    pub fn search<T: Record>(&self, query: &str) -> Vec<T> {
        let needle = query.to_lowercase();
        let all = self.get_all::<T>();
        if needle.is_empty() {
            return all;
        }
        all.into_iter().filter(|r| r.matches(&needle)).collect()
    }

    pub(crate) fn replace_all<T: Record>(&mut self, records: &[T]) -> std::result::Result<(), StoreError> {
        self.persist(records)
    }

    fn persist<T: Record>(&mut self, records: &[T]) -> std::result::Result<(), StoreError> {
        let json = serde_json::to_string(records).map_err(|source| StoreError::Serialization {
            slot: T::SLOT,
            source,
        })?;
        self.storage.write(T::SLOT, &json).map_err(|e| {
            warn!(slot = T::SLOT, error = %e, "collection write failed");
            e
        })?;
        debug!(slot = T::SLOT, count = records.len(), "collection persisted");
        Ok(())
    }

    pub fn settings(&self) -> ShopSettings {
        self.load_settings().unwrap_or_else(|e| {
            warn!(slot = SETTINGS_SLOT, error = %e, "settings read failed, using defaults");
            ShopSettings::default()
        })
    }

    fn load_settings(&self) -> std::result::Result<ShopSettings, StoreError> {
        let Some(raw) = self.storage.read(SETTINGS_SLOT)? else {
            return Ok(ShopSettings::default());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(slot = SETTINGS_SLOT, error = %e, "corrupt settings, using defaults");
            ShopSettings::default()
        }))
    }

    pub fn save_settings(&mut self, settings: &ShopSettings) -> std::result::Result<(), StoreError> {
        let json = serde_json::to_string(settings).map_err(|source| StoreError::Serialization {
            slot: SETTINGS_SLOT,
            source,
        })?;
        self.storage.write(SETTINGS_SLOT, &json)
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> std::result::Result<ShopSettings, StoreError> {
        let mut current = self.load_settings()?;
        current.apply(patch);
        self.save_settings(&current)?;
        Ok(current)
    }

    pub fn create_client(&mut self, input: NewClient) -> Result<Client> {
        let name = required(input.name, "name")?;
        let phone = required(input.phone, "phone")?;
        let book_no = required(input.book_no, "book number")?;

        let now = now_iso();
        let created = Client {
            id: generate_id(),
            name,
            phone,
            book_no,
            measurements: clean_measurements(input.measurements),
            order_status: Status::Received,
            created_at: now.clone(),
            updated_at: now,
        };
        self.upsert(&created)?;
        Ok(created)
    }

    /// Field-by-field edit. Returns `Ok(None)` when the client does not exist.
    pub fn update_client(&mut self, id: &str, patch: ClientPatch) -> Result<Option<Client>> {
        let Some(mut existing) = self.find::<Client>(id)? else {
            return Ok(None);
        };

        if let Some(v) = patch.name {
            existing.name = required(v, "name")?;
        }
        if let Some(v) = patch.phone {
            existing.phone = required(v, "phone")?;
        }
        if let Some(v) = patch.book_no {
            existing.book_no = required(v, "book number")?;
        }
        if let Some(v) = patch.measurements {
            existing.measurements = clean_measurements(v);
        }
        existing.updated_at = now_iso();

        self.upsert(&existing)?;
        Ok(Some(existing))
    }

    pub fn create_order(&mut self, input: NewOrder) -> Result<Order> {
        let order_number = required(input.order_number, "order number")?;
        let garment_type = required(input.garment_type, "garment type")?;
        let description = required(input.description, "description")?;
        if input.price <= Amount::ZERO {
            return Err(ValidationError::NotPositive("price").into());
        }
        let client = self
            .find::<Client>(&input.client_id)?
            .ok_or_else(|| ValidationError::UnknownClient(input.client_id.clone()))?;

        let now = now_iso();
        let created = Order {
            id: generate_id(),
            client_id: client.id,
            client_name: client.name,
            client_phone: client.phone,
            order_number,
            order_date: non_empty_or(input.order_date, today_ymd),
            garment_type,
            description,
            price: input.price,
            status: input.status.unwrap_or_default(),
            completed_date: None,
            created_at: now.clone(),
            updated_at: now,
        };
        self.upsert(&created)?;
        Ok(created)
    }

    /// Computes totals, assigns the next invoice number and persists.
    ///
    /// The number counter lives in the settings slot and is bumped by a second,
    /// separate write, so two creations racing on one storage can share a number.
    pub fn create_invoice(&mut self, input: NewInvoice) -> Result<Invoice> {
        let client = self
            .find::<Client>(&input.client_id)?
            .ok_or_else(|| ValidationError::UnknownClient(input.client_id.clone()))?;
        let draft = calculate(input.items, input.discount, input.tax)?;

        let mut settings = self.load_settings()?;
        let following = settings
            .next_invoice_number
            .checked_add(1)
            .ok_or(ValidationError::OutOfRange("invoice number"))?;
        let now = now_iso();
        let created = Invoice {
            id: generate_id(),
            invoice_number: format_invoice_number(&settings.invoice_prefix, settings.next_invoice_number),
            client_id: client.id,
            client_name: client.name,
            client_phone: client.phone,
            client_book_no: client.book_no,
            items: draft.items,
            subtotal: draft.subtotal,
            discount: draft.discount,
            tax: draft.tax,
            grand_total: draft.grand_total,
            invoice_date: non_empty_or(input.invoice_date.unwrap_or_default(), today_ymd),
            payment_status: Default::default(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.upsert(&created)?;

        settings.next_invoice_number = following;
        if let Err(e) = self.save_settings(&settings) {
            // The invoice is already stored; a stale counter only risks a repeated number.
            warn!(error = %e, invoice = %created.invoice_number, "invoice counter not advanced");
        }
        Ok(created)
    }

    pub fn create_expense(&mut self, input: NewExpense) -> Result<Expense> {
        let kind = required(input.kind, "type")?;
        if input.amount <= Amount::ZERO {
            return Err(ValidationError::NotPositive("amount").into());
        }
        let date = required(input.date, "date")?;
        let description = input
            .description
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let created = Expense {
            id: generate_id(),
            kind,
            amount: input.amount,
            date,
            description,
            created_at: now_iso(),
        };
        self.upsert(&created)?;
        Ok(created)
    }
}

fn required(v: String, field: &'static str) -> std::result::Result<String, ValidationError> {
    let t = v.trim();
    if t.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(t.to_string())
}

fn non_empty_or(v: String, fallback: fn() -> String) -> String {
    let t = v.trim();
    if t.is_empty() {
        fallback()
    } else {
        t.to_string()
    }
}

fn clean_measurements(m: Measurements) -> Measurements {
    m.into_iter()
        .map(|(k, v)| (k, v.trim().to_string()))
        .filter(|(_, v)| !v.is_empty())
        .collect()
}
