use rust_decimal::Decimal;
use tailorbook_lib::{
    invoice_share_text, line_item_from_order, Backup, Client, Expense, Invoice, LineItemInput,
    NewClient, NewExpense, NewInvoice, NewOrder, Order, PaymentStatus, RecordStore,
    SqliteStorage, Status,
};

fn kwd(minor: i64) -> Decimal {
    Decimal::new(minor, 3)
}

fn open(path: &std::path::Path) -> RecordStore<SqliteStorage> {
    RecordStore::new(SqliteStorage::open(path).unwrap())
}

#[test]
fn full_day_at_the_counter_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("shop.db");

    let (client_id, order_id, invoice_id) = {
        let mut store = open(&db);
        let client = store
            .create_client(NewClient {
                name: "Ahmed".to_string(),
                phone: "5551234".to_string(),
                book_no: "B1".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.get_all::<Client>().len(), 1);

        let order = store
            .create_order(NewOrder {
                client_id: client.id.clone(),
                order_number: "1001".to_string(),
                order_date: "2025-03-01".to_string(),
                garment_type: "Suit".to_string(),
                description: "Navy wool".to_string(),
                price: kwd(12_500),
                status: None,
            })
            .unwrap();

        let invoice = store
            .create_invoice(NewInvoice {
                client_id: client.id.clone(),
                items: vec![LineItemInput::new("Suit", 2, kwd(12_500))],
                discount: kwd(1_000),
                tax: kwd(500),
                invoice_date: Some("2025-03-01".to_string()),
            })
            .unwrap();
        assert_eq!(invoice.subtotal, kwd(25_000));
        assert_eq!(invoice.grand_total, kwd(24_500));

        store.update_order_status(&order.id, Status::Completed).unwrap();
        store
            .update_payment_status(&invoice.id, PaymentStatus::Paid)
            .unwrap();
        (client.id, order.id, invoice.id)
    };

    let store = open(&db);
    let client: Client = store.get_by_id(&client_id).unwrap();
    assert_eq!(client.name, "Ahmed");

    let order: Order = store.get_by_id(&order_id).unwrap();
    assert_eq!(order.status, Status::Completed);
    assert!(order.completed_date.is_some());

    let invoice: Invoice = store.get_by_id(&invoice_id).unwrap();
    assert_eq!(invoice.payment_status, PaymentStatus::Paid);
    assert_eq!(invoice.grand_total, kwd(24_500));
    // Decimal scale survives the JSON slot.
    assert_eq!(invoice.items[0].unit_price.to_string(), "12.500");

    let text = invoice_share_text(&invoice, &store.settings());
    assert!(text.contains("Total: KWD 24.500"));
    assert!(text.contains("Status: PAID"));
}

#[test]
fn deleting_client_leaves_orders_orphaned() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir.path().join("shop.db"));

    let client = store
        .create_client(NewClient {
            name: "Omar".to_string(),
            phone: "123".to_string(),
            book_no: "B9".to_string(),
            ..Default::default()
        })
        .unwrap();
    let order = store
        .create_order(NewOrder {
            client_id: client.id.clone(),
            order_number: "7".to_string(),
            order_date: "2025-04-01".to_string(),
            garment_type: "Thobe".to_string(),
            description: "White".to_string(),
            price: kwd(18_000),
            status: Some(Status::Process),
        })
        .unwrap();

    store.delete_by_id::<Client>(&client.id).unwrap();
    assert!(store.get_by_id::<Client>(&client.id).is_none());

    let kept: Order = store.get_by_id(&order.id).unwrap();
    assert_eq!(kept.client_id, client.id);
    assert_eq!(kept.client_name, "Omar");

    // Invoicing needs a live client record.
    let res = store.create_invoice(NewInvoice {
        client_id: kept.client_id.clone(),
        items: vec![line_item_from_order(&kept)],
        discount: Decimal::ZERO,
        tax: Decimal::ZERO,
        invoice_date: None,
    });
    assert!(res.is_err());
}

#[test]
fn backup_moves_between_databases() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = open(&dir.path().join("a.db"));
    source
        .create_expense(NewExpense {
            kind: "Fabric".to_string(),
            amount: kwd(45_250),
            date: "2025-01-02".to_string(),
            description: Some("Wool roll".to_string()),
        })
        .unwrap();

    let json = source.snapshot().to_json_pretty().unwrap();
    let backup = Backup::from_json(&json).unwrap();

    let mut target = open(&dir.path().join("b.db"));
    target.restore(&backup).unwrap();
    let expenses: Vec<Expense> = target.get_all();
    assert_eq!(expenses, source.get_all::<Expense>());
    assert_eq!(target.search::<Expense>("WOOL").len(), 1);
}
