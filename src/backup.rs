use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::now_iso;
use crate::error::StoreError;
use crate::models::{Client, Expense, Invoice, Order};
use crate::settings::ShopSettings;
use crate::storage::SlotStorage;
use crate::store::RecordStore;

/// Point-in-time copy of every collection plus the shop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub clients: Vec<Client>,
    pub orders: Vec<Order>,
    pub invoices: Vec<Invoice>,
    pub expenses: Vec<Expense>,
    pub settings: ShopSettings,
    pub timestamp: String,
}

impl Backup {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses and shape-checks a backup document. Every field must be present.
    pub fn from_json(input: &str) -> Result<Backup, serde_json::Error> {
        serde_json::from_str(input)
    }
}

pub fn backup_file_name(date_ymd: &str) -> String {
    format!("tailorbook-backup-{}.json", date_ymd)
}

impl<S: SlotStorage> RecordStore<S> {
    pub fn snapshot(&self) -> Backup {
        Backup {
            clients: self.get_all(),
            orders: self.get_all(),
            invoices: self.get_all(),
            expenses: self.get_all(),
            settings: self.settings(),
            timestamp: now_iso(),
        }
    }

    /// Replaces every collection and the settings with the backup contents.
    ///
    /// Slots are written one at a time; a failure part-way leaves earlier slots
    /// restored and later ones untouched.
    pub fn restore(&mut self, backup: &Backup) -> Result<(), StoreError> {
        self.replace_all(&backup.clients)?;
        self.replace_all(&backup.orders)?;
        self.replace_all(&backup.invoices)?;
        self.replace_all(&backup.expenses)?;
        self.save_settings(&backup.settings)?;
        info!(
            clients = backup.clients.len(),
            orders = backup.orders.len(),
            invoices = backup.invoices.len(),
            expenses = backup.expenses.len(),
            taken_at = %backup.timestamp,
            "backup restored"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewClient, NewExpense};
    use crate::money::Amount;
    use crate::storage::MemoryStorage;

    fn seeded() -> RecordStore<MemoryStorage> {
        let mut store = RecordStore::new(MemoryStorage::new());
        store
            .create_client(NewClient {
                name: "Ali".to_string(),
                phone: "999".to_string(),
                book_no: "B7".to_string(),
                ..Default::default()
            })
            .unwrap();
        store
            .create_expense(NewExpense {
                kind: "Rent".to_string(),
                amount: Amount::new(300_000, 3),
                date: "2025-01-31".to_string(),
                description: None,
            })
            .unwrap();
        store
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let store = seeded();
        let before: Vec<Client> = store.get_all();
        let snap = store.snapshot();
        assert_eq!(snap.clients, before);
        assert_eq!(snap.expenses.len(), 1);
        assert!(snap.orders.is_empty());
        assert_eq!(store.get_all::<Client>(), before);
    }

    #[test]
    fn restore_into_fresh_store() {
        let source = seeded();
        let json = source.snapshot().to_json_pretty().unwrap();

        let parsed = Backup::from_json(&json).unwrap();
        let mut target = RecordStore::new(MemoryStorage::new());
        target.restore(&parsed).unwrap();

        assert_eq!(target.get_all::<Client>(), source.get_all::<Client>());
        assert_eq!(target.get_all::<Expense>(), source.get_all::<Expense>());
        assert_eq!(target.settings(), source.settings());
    }

    #[test]
    fn malformed_backup_is_rejected() {
        assert!(Backup::from_json(r#"{"clients":[]}"#).is_err());
        assert!(Backup::from_json("not json").is_err());
    }

    #[test]
    fn file_name_has_date() {
        assert_eq!(backup_file_name("2025-05-01"), "tailorbook-backup-2025-05-01.json");
    }
}
