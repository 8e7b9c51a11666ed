// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use bank_records::{
    add_customer, export_csv, list_customers, logging, open_store, AppConfig, ConfigOverrides,
    CustomerError, CustomerForm, LoadOptions, LogFormat, RecordStore,
};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug, Parser)]
#[command(name = "bank-records", version = bank_records::VERSION, about = "Add and list bank customer records")]
struct CommandLine {
    /// Config file (defaults to ./bank-records.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Customer file to use instead of the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    /// compact, pretty or json
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty customer file if none exists
    Init,
    /// Add one customer
    Add {
        #[arg(long)]
        account: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        pin: String,
        // Kept as text so the same validation as the form applies
        #[arg(long, allow_hyphen_values = true)]
        balance: String,
    },
    /// List every customer
    List,
    /// Write customers as CSV (no PINs)
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Interactive form (default)
    Ui,
}

fn main() {
    let cli = CommandLine::parse();

    if let Err(err) = run(cli) {
        eprintln!("❌ {:#}", err);
        process::exit(1);
    }
}

fn run(cli: CommandLine) -> Result<()> {
    let config = AppConfig::load(LoadOptions {
        config_path: cli.config,
        overrides: ConfigOverrides {
            store_path: cli.store,
            log_level: cli.log_level,
            log_format: cli.log_format,
        },
    })?;

    let command = cli.command.unwrap_or(Command::Ui);
    let interactive = matches!(command, Command::Ui);
    logging::init(&config.logging, interactive)?;

    let store = prepare_store(&command, &config.store.path)?;

    match command {
        Command::Init => {
            println!("✓ Customer file ready at {}", store.path().display());
        }
        Command::Add { account, name, pin, balance } => {
            run_add(&store, CustomerForm::new(account, name, pin, balance))?;
        }
        Command::List => {
            for line in list_customers(&store, &config.display.currency_symbol) {
                println!("{}", line);
            }
        }
        Command::Export { output } => {
            let count = match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let count = export_csv(&store, file)?;
                    eprintln!("✓ Exported {} customers to {}", count, path.display());
                    count
                }
                None => export_csv(&store, io::stdout().lock())?,
            };
            tracing::debug!(count, "export finished");
        }
        Command::Ui => run_ui_mode(store, &config.display.currency_symbol)?,
    }

    Ok(())
}

impl Command {
    /// Listing and export only read; they must not create the file.
    fn writes_store(&self) -> bool {
        !matches!(self, Command::List | Command::Export { .. })
    }
}

fn prepare_store(command: &Command, path: &Path) -> Result<RecordStore> {
    if !command.writes_store() {
        return Ok(RecordStore::new(path));
    }
    open_store(path).with_context(|| format!("Failed to open customer file {}", path.display()))
}

fn run_add(store: &RecordStore, form: CustomerForm) -> Result<()> {
    match add_customer(store, &form) {
        Ok(record) => {
            println!("✓ Customer {} added", record.account_number);
            Ok(())
        }
        // Input problems are reported plainly, without the error chain
        Err(err) if err.is_user_error() => {
            eprintln!("❌ {}", err);
            process::exit(2);
        }
        Err(err @ CustomerError::Storage(_)) => Err(err).context("Customer was not saved"),
        Err(err) => Err(err.into()),
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(store: RecordStore, currency_symbol: &str) -> Result<()> {
    let mut app = ui::App::new(store, currency_symbol);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_store: RecordStore, _currency_symbol: &str) -> Result<()> {
    eprintln!("❌ Interactive mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the subcommands: init, add, list, export");
    process::exit(1);
}
