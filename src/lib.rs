//! Record store and invoice engine for a tailoring shop.
//!
//! [`RecordStore`] owns the client, order, invoice and expense collections and
//! the shop settings, each persisted as one JSON slot of a [`SlotStorage`].
//! Invoice totals come from [`invoice::calculate`]; status changes live in
//! [`workflow`]; [`backup`] snapshots and restores everything at once.

pub mod backup;
pub mod clock;
pub mod error;
pub mod ids;
pub mod invoice;
pub mod models;
pub mod money;
pub mod settings;
pub mod share;
pub mod storage;
pub mod store;
pub mod workflow;

pub use backup::{backup_file_name, Backup};
pub use error::{Error, Result, StoreError, ValidationError};
pub use invoice::{calculate, line_item_from_order, InvoiceDraft, LineItemInput, NewInvoice};
pub use models::{
    Client, ClientPatch, Expense, Invoice, LineItem, MeasurementField, Measurements, NewClient,
    NewExpense, NewOrder, Order, PaymentStatus, Status,
};
pub use settings::{SettingsPatch, ShopSettings};
pub use share::invoice_share_text;
pub use storage::{MemoryStorage, SlotStorage, SqliteStorage};
pub use store::{Record, RecordStore};
