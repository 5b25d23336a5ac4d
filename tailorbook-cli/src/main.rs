use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tailorbook_lib::{
  backup_file_name, clock::today_ymd, invoice_share_text, line_item_from_order,
  money::{format_currency, parse_amount},
  Backup, Client, ClientPatch, Error, Expense, Invoice, LineItemInput, MeasurementField,
  Measurements, NewClient, NewExpense, NewInvoice, NewOrder, Order, PaymentStatus, RecordStore,
  SettingsPatch, SqliteStorage, Status,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tailorbook", about = "Front desk records for a tailoring shop")]
struct Cli {
  /// SQLite file holding all records.
  #[arg(long, env = "TAILORBOOK_DB", default_value = "tailorbook.db", global = true)]
  db: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  #[command(subcommand)]
  Client(ClientCmd),
  #[command(subcommand)]
  Order(OrderCmd),
  #[command(subcommand)]
  Invoice(InvoiceCmd),
  #[command(subcommand)]
  Expense(ExpenseCmd),
  #[command(subcommand)]
  Settings(SettingsCmd),
  #[command(subcommand)]
  Backup(BackupCmd),
}

#[derive(Subcommand, Debug)]
enum ClientCmd {
  Add {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    book_no: String,
    /// Measurement as `field=value`, e.g. `chest=42`.
    #[arg(long = "measure")]
    measures: Vec<String>,
  },
  Edit {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    book_no: Option<String>,
    #[arg(long = "measure")]
    measures: Vec<String>,
  },
  List {
    #[arg(long, default_value = "")]
    search: String,
  },
  Status {
    id: String,
    #[arg(value_enum)]
    status: StatusArg,
  },
  Delete {
    id: String,
  },
}

#[derive(Subcommand, Debug)]
enum OrderCmd {
  Add {
    #[arg(long)]
    client: String,
    #[arg(long)]
    number: String,
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long)]
    garment: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    price: String,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
  },
  List {
    #[arg(long, default_value = "")]
    search: String,
  },
  Status {
    id: String,
    #[arg(value_enum)]
    status: StatusArg,
  },
  Delete {
    id: String,
  },
}

#[derive(Subcommand, Debug)]
enum InvoiceCmd {
  Create {
    #[arg(long)]
    client: String,
    /// Line item as `name:qty:price`. Repeatable.
    #[arg(long = "item")]
    items: Vec<String>,
    /// Pre-fill one line item from an order.
    #[arg(long)]
    from_order: Option<String>,
    #[arg(long, default_value = "0")]
    discount: String,
    #[arg(long, default_value = "0")]
    tax: String,
    #[arg(long)]
    date: Option<String>,
  },
  List {
    #[arg(long, default_value = "")]
    search: String,
  },
  Show {
    id: String,
  },
  Paid {
    id: String,
    /// Mark as unpaid instead.
    #[arg(long)]
    undo: bool,
  },
  Delete {
    id: String,
  },
}

#[derive(Subcommand, Debug)]
enum ExpenseCmd {
  Add {
    #[arg(long = "type")]
    kind: String,
    #[arg(long)]
    amount: String,
    #[arg(long, default_value_t = today_ymd())]
    date: String,
    #[arg(long)]
    description: Option<String>,
  },
  List {
    #[arg(long, default_value = "")]
    search: String,
  },
  Delete {
    id: String,
  },
}

#[derive(Subcommand, Debug)]
enum SettingsCmd {
  Show,
  Set {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    subtitle: Option<String>,
    #[arg(long)]
    arabic_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    currency: Option<String>,
    #[arg(long)]
    invoice_prefix: Option<String>,
    #[arg(long)]
    next_invoice_number: Option<i64>,
  },
}

#[derive(Subcommand, Debug)]
enum BackupCmd {
  Export {
    /// Defaults to `tailorbook-backup-<today>.json` in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,
  },
  Restore {
    file: PathBuf,
  },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
  Received,
  Process,
  Pending,
  Completed,
}

impl From<StatusArg> for Status {
  fn from(v: StatusArg) -> Self {
    match v {
      StatusArg::Received => Status::Received,
      StatusArg::Process => Status::Process,
      StatusArg::Pending => Status::Pending,
      StatusArg::Completed => Status::Completed,
    }
  }
}

/// Per-invocation context owned by the front end, never by the core.
struct Session {
  store: RecordStore<SqliteStorage>,
  currency: String,
}

impl Session {
  fn open(db: &Path) -> anyhow::Result<Self> {
    let storage = SqliteStorage::open(db)
      .with_context(|| format!("failed to open database {}", db.display()))?;
    let store = RecordStore::new(storage);
    let currency = store.settings().currency;
    tracing::debug!(db = %db.display(), "session opened");
    Ok(Self { store, currency })
  }

  fn money(&self, v: Decimal) -> String {
    format_currency(&self.currency, v)
  }
}

fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tailorbook=info,tailorbook_lib=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();
  let mut session = Session::open(&cli.db)?;

  match cli.command {
    Command::Client(cmd) => run_client(&mut session, cmd),
    Command::Order(cmd) => run_order(&mut session, cmd),
    Command::Invoice(cmd) => run_invoice(&mut session, cmd),
    Command::Expense(cmd) => run_expense(&mut session, cmd),
    Command::Settings(cmd) => run_settings(&mut session, cmd),
    Command::Backup(cmd) => run_backup(&mut session, cmd),
  }
}

fn run_client(s: &mut Session, cmd: ClientCmd) -> anyhow::Result<()> {
  match cmd {
    ClientCmd::Add {
      name,
      phone,
      book_no,
      measures,
    } => {
      let measurements = parse_measures(&measures)?;
      let c = s.store.create_client(NewClient {
        name,
        phone,
        book_no,
        measurements,
      });
      let c = report(c)?;
      println!("{}", c.id);
    }
    ClientCmd::Edit {
      id,
      name,
      phone,
      book_no,
      measures,
    } => {
      let measurements = if measures.is_empty() {
        None
      } else {
        Some(parse_measures(&measures)?)
      };
      let patch = ClientPatch {
        name,
        phone,
        book_no,
        measurements,
      };
      match report(s.store.update_client(&id, patch))? {
        Some(c) => print_client(&c),
        None => anyhow::bail!("client {id} not found"),
      }
    }
    ClientCmd::List { search } => {
      for c in s.store.search::<Client>(&search) {
        print_client(&c);
      }
    }
    ClientCmd::Status { id, status } => match s.store.update_client_status(&id, status.into())? {
      Some(c) => print_client(&c),
      None => anyhow::bail!("client {id} not found"),
    },
    ClientCmd::Delete { id } => {
      s.store.delete_by_id::<Client>(&id)?;
      println!("deleted {id}");
    }
  }
  Ok(())
}

fn run_order(s: &mut Session, cmd: OrderCmd) -> anyhow::Result<()> {
  match cmd {
    OrderCmd::Add {
      client,
      number,
      date,
      garment,
      description,
      price,
      status,
    } => {
      let price = amount_arg("price", &price)?;
      let o = report(s.store.create_order(NewOrder {
        client_id: client,
        order_number: number,
        order_date: date,
        garment_type: garment,
        description,
        price,
        status: status.map(Status::from),
      }))?;
      println!("{}", o.id);
    }
    OrderCmd::List { search } => {
      for o in s.store.search::<Order>(&search) {
        print_order(s, &o);
      }
    }
    OrderCmd::Status { id, status } => match s.store.update_order_status(&id, status.into())? {
      Some(o) => print_order(s, &o),
      None => anyhow::bail!("order {id} not found"),
    },
    OrderCmd::Delete { id } => {
      s.store.delete_by_id::<Order>(&id)?;
      println!("deleted {id}");
    }
  }
  Ok(())
}

fn run_invoice(s: &mut Session, cmd: InvoiceCmd) -> anyhow::Result<()> {
  match cmd {
    InvoiceCmd::Create {
      client,
      items,
      from_order,
      discount,
      tax,
      date,
    } => {
      let mut rows = Vec::new();
      if let Some(order_id) = from_order {
        let order: Order = s
          .store
          .get_by_id(&order_id)
          .ok_or_else(|| anyhow::anyhow!("order {order_id} not found"))?;
        rows.push(line_item_from_order(&order));
      }
      for raw in &items {
        rows.push(parse_item(raw)?);
      }
      let inv = report(s.store.create_invoice(NewInvoice {
        client_id: client,
        items: rows,
        discount: amount_arg("discount", &discount)?,
        tax: amount_arg("tax", &tax)?,
        invoice_date: date,
      }))?;
      if inv.grand_total < Decimal::ZERO {
        tracing::warn!(invoice = %inv.invoice_number, "grand total is negative");
      }
      println!("{}", invoice_share_text(&inv, &s.store.settings()));
    }
    InvoiceCmd::List { search } => {
      for inv in s.store.search::<Invoice>(&search) {
        println!(
          "{}  {}  {}  {}  {}  {}",
          inv.id,
          inv.invoice_number,
          inv.invoice_date,
          inv.client_name,
          s.money(inv.grand_total),
          inv.payment_status.as_str()
        );
      }
    }
    InvoiceCmd::Show { id } => match s.store.get_by_id::<Invoice>(&id) {
      Some(inv) => println!("{}", invoice_share_text(&inv, &s.store.settings())),
      None => anyhow::bail!("invoice {id} not found"),
    },
    InvoiceCmd::Paid { id, undo } => {
      let status = if undo {
        PaymentStatus::Unpaid
      } else {
        PaymentStatus::Paid
      };
      match s.store.update_payment_status(&id, status)? {
        Some(inv) => println!("{} {}", inv.invoice_number, inv.payment_status.as_str()),
        None => anyhow::bail!("invoice {id} not found"),
      }
    }
    InvoiceCmd::Delete { id } => {
      s.store.delete_by_id::<Invoice>(&id)?;
      println!("deleted {id}");
    }
  }
  Ok(())
}

fn run_expense(s: &mut Session, cmd: ExpenseCmd) -> anyhow::Result<()> {
  match cmd {
    ExpenseCmd::Add {
      kind,
      amount,
      date,
      description,
    } => {
      let e = report(s.store.create_expense(NewExpense {
        kind,
        amount: amount_arg("amount", &amount)?,
        date,
        description,
      }))?;
      println!("{}", e.id);
    }
    ExpenseCmd::List { search } => {
      for e in s.store.search::<Expense>(&search) {
        println!(
          "{}  {}  {}  {}  {}",
          e.id,
          e.date,
          e.kind,
          s.money(e.amount),
          e.description.as_deref().unwrap_or("")
        );
      }
    }
    ExpenseCmd::Delete { id } => {
      s.store.delete_by_id::<Expense>(&id)?;
      println!("deleted {id}");
    }
  }
  Ok(())
}

fn run_settings(s: &mut Session, cmd: SettingsCmd) -> anyhow::Result<()> {
  let settings = match cmd {
    SettingsCmd::Show => s.store.settings(),
    SettingsCmd::Set {
      name,
      subtitle,
      arabic_name,
      phone,
      address,
      currency,
      invoice_prefix,
      next_invoice_number,
    } => s.store.update_settings(SettingsPatch {
      name,
      subtitle,
      arabic_name,
      phone,
      address,
      currency,
      invoice_prefix,
      next_invoice_number,
    })?,
  };
  println!("{}", serde_json::to_string_pretty(&settings)?);
  Ok(())
}

fn run_backup(s: &mut Session, cmd: BackupCmd) -> anyhow::Result<()> {
  match cmd {
    BackupCmd::Export { out } => {
      let backup = s.store.snapshot();
      let path = out.unwrap_or_else(|| PathBuf::from(backup_file_name(&today_ymd())));
      std::fs::write(&path, backup.to_json_pretty()?)
        .with_context(|| format!("failed to write {}", path.display()))?;
      println!("{}", path.display());
    }
    BackupCmd::Restore { file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
      let backup = Backup::from_json(&raw)
        .map_err(|e| anyhow::anyhow!("invalid backup document: {e}"))?;
      s.store.restore(&backup)?;
      println!(
        "restored {} clients, {} orders, {} invoices, {} expenses",
        backup.clients.len(),
        backup.orders.len(),
        backup.invoices.len(),
        backup.expenses.len()
      );
    }
  }
  Ok(())
}

/// Turns a core failure into a message the user can act on.
fn report<T>(res: tailorbook_lib::Result<T>) -> anyhow::Result<T> {
  res.map_err(|e| match e {
    Error::Validation(v) => anyhow::anyhow!("please fix the input: {v}"),
    Error::NoValidItems => anyhow::anyhow!("add at least one item with a name, quantity and price"),
    Error::Store(e) => anyhow::anyhow!("could not save, please try again: {e}"),
  })
}

fn amount_arg(field: &str, raw: &str) -> anyhow::Result<Decimal> {
  parse_amount(raw).ok_or_else(|| anyhow::anyhow!("invalid {field}: {raw:?}"))
}

fn parse_item(raw: &str) -> anyhow::Result<LineItemInput> {
  // Split from the right so item names may contain ':'.
  let mut parts = raw.rsplitn(3, ':');
  let (Some(price), Some(qty), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
    anyhow::bail!("item must look like name:qty:price, got {raw:?}");
  };
  let quantity: i64 = qty
    .trim()
    .parse()
    .map_err(|_| anyhow::anyhow!("invalid quantity in item {raw:?}"))?;
  Ok(LineItemInput::new(name, quantity, amount_arg("price", price)?))
}

fn parse_measures(raw: &[String]) -> anyhow::Result<Measurements> {
  let mut out = Measurements::new();
  for m in raw {
    let Some((field, value)) = m.split_once('=') else {
      anyhow::bail!("measurement must look like field=value, got {m:?}");
    };
    let field = MeasurementField::parse(field)
      .ok_or_else(|| anyhow::anyhow!("unknown measurement {field:?} (chest, waist, length, sleeve)"))?;
    out.insert(field, value.to_string());
  }
  Ok(out)
}

fn print_client(c: &Client) {
  let measures: Vec<String> = c
    .measurements
    .iter()
    .map(|(k, v)| format!("{}={}", k.as_str(), v))
    .collect();
  println!(
    "{}  {}  {}  {}  {}  {}",
    c.id,
    c.name,
    c.phone,
    c.book_no,
    c.order_status.as_str(),
    measures.join(",")
  );
}

fn print_order(s: &Session, o: &Order) {
  println!(
    "{}  {}  {}  {}  {}  {}  {}",
    o.id,
    o.order_number,
    o.order_date,
    o.client_name,
    o.garment_type,
    s.money(o.price),
    o.status.as_str()
  );
}
