// Customer workflows - the only calls a shell needs to make
//
// add:  trim -> validate -> duplicate check -> append -> rewrite file
// list: load -> one display line per record (or a sentinel line)

use crate::error::{CustomerError, StoreError, ValidationError};
use crate::record::CustomerRecord;
use crate::store::RecordStore;
use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

pub const NO_CUSTOMERS: &str = "No customers found in records.";

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerForm {
    pub account_number: String,
    pub name: String,
    pub pin: String,
    pub balance: String,
}

impl CustomerForm {
    pub fn new(
        account_number: impl Into<String>,
        name: impl Into<String>,
        pin: impl Into<String>,
        balance: impl Into<String>,
    ) -> Self {
        CustomerForm {
            account_number: account_number.into(),
            name: name.into(),
            pin: pin.into(),
            balance: balance.into(),
        }
    }

    /// Trim and check the fields, producing the record to store.
    pub fn validate(&self) -> Result<CustomerRecord, ValidationError> {
        let account_number = self.account_number.trim();
        let name = self.name.trim();
        let pin = self.pin.trim();

        if account_number.is_empty() || name.is_empty() || pin.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        let balance = parse_balance(&self.balance)?;

        Ok(CustomerRecord::new(account_number, name, pin, balance))
    }
}

/// Non-finite values are refused: the file format has no way to store them.
fn parse_balance(text: &str) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::InvalidBalance(trimmed.to_string())),
    }
}

/// Validate the form and append a new customer. Nothing is written on failure.
pub fn add_customer(store: &RecordStore, form: &CustomerForm) -> Result<CustomerRecord, CustomerError> {
    let record = form.validate()?;

    let mut records = store.load_all();
    if records.iter().any(|r| r.account_number == record.account_number) {
        return Err(CustomerError::Duplicate(record.account_number));
    }

    records.push(record.clone());
    store.save_all(&records)?;

    info!(account = %record.account_number, total = records.len(), "customer added");
    Ok(record)
}

/// Display lines for every stored customer, or the sentinel when there are none.
pub fn list_customers(store: &RecordStore, currency_symbol: &str) -> Vec<String> {
    let records = store.load_all();
    if records.is_empty() {
        return vec![NO_CUSTOMERS.to_string()];
    }

    records
        .iter()
        .map(|r| r.display_line(currency_symbol))
        .collect()
}

/// Write customers as CSV (account_number, name, balance). PINs are left out.
pub fn export_csv<W: Write>(store: &RecordStore, writer: W) -> Result<usize> {
    let records = store.load_all();
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["account_number", "name", "balance"])
        .context("Failed to write CSV header")?;
    for r in &records {
        let balance = format!("{:.2}", r.balance);
        wtr.write_record([r.account_number.as_str(), r.name.as_str(), balance.as_str()])
            .context("Failed to write CSV row")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;

    Ok(records.len())
}

/// Convenience for shells that want to make sure the file exists first.
pub fn open_store(path: impl Into<std::path::PathBuf>) -> Result<RecordStore, StoreError> {
    let store = RecordStore::new(path);
    store.initialize()?;
    Ok(store)
}
