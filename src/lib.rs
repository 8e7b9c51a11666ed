// Bank Customer Records - Core Library
// Record store + workflows shared by the CLI, the terminal form and tests

pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod store;
pub mod workflow;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, ConfigOverrides, DisplayConfig, LoadOptions, LogFormat, LoggingConfig, StoreConfig};
pub use error::{CustomerError, StorageCorruption, StoreError, ValidationError};
pub use record::CustomerRecord;
pub use store::{RecordStore, FORMAT_TAG, SCHEMA_VERSION};
pub use workflow::{add_customer, export_csv, list_customers, open_store, CustomerForm, NO_CUSTOMERS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
