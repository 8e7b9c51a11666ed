// 🗄️ Record Store - customer book persisted as a single versioned file
//
// Every mutation is read-all / append / rewrite-all. Fine for a handful of
// customers, not meant for anything bigger.
//
// On-disk layout (JSON envelope):
//   { "format": "bank-records", "version": 1, "saved_at": "...",
//     "checksum": "<sha256 of records text>", "records": [...] }

use crate::error::{StorageCorruption, StoreError};
use crate::record::CustomerRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub const FORMAT_TAG: &str = "bank-records";
pub const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// FILE ENVELOPE
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    format: String,
    version: u32,
    saved_at: DateTime<Utc>,
    checksum: String,
    /// Kept as raw text so the checksum covers exactly what is on disk
    records: Box<RawValue>,
}

fn checksum(records_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(records_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Serialize a collection into the versioned file layout.
///
/// JSON has no NaN or infinity, so a non-finite balance is refused here
/// rather than written out as `null`.
pub fn encode(records: &[CustomerRecord], saved_at: DateTime<Utc>) -> Result<Vec<u8>, StoreError> {
    if let Some(bad) = records.iter().find(|r| !r.balance.is_finite()) {
        return Err(StoreError::NonFiniteBalance {
            account_number: bad.account_number.clone(),
        });
    }

    let body = serde_json::to_string(records)?;
    let file = StoreFile {
        format: FORMAT_TAG.to_string(),
        version: SCHEMA_VERSION,
        saved_at,
        checksum: checksum(&body),
        records: RawValue::from_string(body)?,
    };

    Ok(serde_json::to_vec_pretty(&file)?)
}

/// Parse and verify a customer file. Any failure means the file is unusable.
pub fn decode(bytes: &[u8]) -> Result<Vec<CustomerRecord>, StorageCorruption> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(StorageCorruption::Empty);
    }

    let file: StoreFile = serde_json::from_slice(bytes)?;

    if file.format != FORMAT_TAG {
        return Err(StorageCorruption::UnknownFormat(file.format));
    }

    if file.version == 0 || file.version > SCHEMA_VERSION {
        return Err(StorageCorruption::UnsupportedVersion {
            found: file.version,
            supported: SCHEMA_VERSION,
        });
    }

    let computed = checksum(file.records.get());
    if computed != file.checksum {
        return Err(StorageCorruption::ChecksumMismatch {
            expected: file.checksum,
            computed,
        });
    }

    Ok(serde_json::from_str(file.records.get())?)
}

// ============================================================================
// RECORD STORE
// ============================================================================

/// Owns the customer file. Holds no handle between calls; each operation
/// opens, works and closes.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RecordStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with an empty collection unless it already exists.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            debug!(path = %self.path.display(), "customer file already present");
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        self.save_all(&[])?;
        info!(path = %self.path.display(), "initialized empty customer file");
        Ok(())
    }

    /// Read every record. Missing or unreadable files come back as empty.
    pub fn load_all(&self) -> Vec<CustomerRecord> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no customer file yet");
                return Vec::new();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read customer file, treating as empty");
                return Vec::new();
            }
        };

        match decode(&bytes) {
            Ok(records) => {
                debug!(count = records.len(), "loaded customer records");
                records
            }
            Err(corruption) => {
                warn!(path = %self.path.display(), reason = %corruption, "discarding unreadable customer file contents");
                Vec::new()
            }
        }
    }

    /// Rewrite the whole file. Goes through a temp file in the same
    /// directory and a rename, so a failed write leaves the old file intact.
    pub fn save_all(&self, records: &[CustomerRecord]) -> Result<(), StoreError> {
        let bytes = encode(records, Utc::now())?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!(path = %self.path.display(), count = records.len(), "saved customer records");
        Ok(())
    }

    /// Exact, case-sensitive account number lookup.
    pub fn exists(&self, account_number: &str) -> bool {
        self.load_all()
            .iter()
            .any(|r| r.account_number == account_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_records() -> Vec<CustomerRecord> {
        vec![
            CustomerRecord::new("001", "Alice", "1234", 100.0),
            CustomerRecord::new("002", "Bob", "0000", -42.5),
            CustomerRecord::new("003", "Zoë Ünïcode", "9 9 9", 0.1 + 0.2),
        ]
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("customers.dat"));

        let records = sample_records();
        store.save_all(&records).unwrap();

        assert_eq!(store.load_all(), records);
    }

    #[test]
    fn test_initialize_creates_empty_file() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("nested/customers.dat"));

        store.initialize().unwrap();

        assert!(store.path().exists());
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("customers.dat"));

        store.save_all(&sample_records()).unwrap();
        let before = fs::read(store.path()).unwrap();

        store.initialize().unwrap();
        store.initialize().unwrap();

        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("absent.dat"));

        assert!(store.load_all().is_empty());
        assert!(!store.exists("001"));
    }

    #[test]
    fn test_garbage_bytes_load_empty() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("customers.dat"));
        fs::write(store.path(), b"\x80\x03\xff not a customer file \x00").unwrap();

        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_empty_and_truncated_files_load_empty() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("customers.dat"));

        fs::write(store.path(), b"").unwrap();
        assert!(store.load_all().is_empty());

        let full = encode(&sample_records(), Utc::now()).unwrap();
        fs::write(store.path(), &full[..full.len() / 2]).unwrap();
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_decode_rejects_tampered_records() {
        let encoded = encode(&sample_records(), Utc::now()).unwrap();
        let tampered = String::from_utf8(encoded).unwrap().replace("Alice", "Mallory");

        let err = decode(tampered.as_bytes()).unwrap_err();
        assert!(matches!(err, StorageCorruption::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let encoded = encode(&sample_records(), Utc::now()).unwrap();
        let future = String::from_utf8(encoded)
            .unwrap()
            .replace("\"version\": 1", "\"version\": 99");

        let err = decode(future.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            StorageCorruption::UnsupportedVersion { found: 99, supported: SCHEMA_VERSION }
        ));
    }

    #[test]
    fn test_decode_rejects_foreign_format() {
        let encoded = encode(&[], Utc::now()).unwrap();
        let foreign = String::from_utf8(encoded)
            .unwrap()
            .replace(FORMAT_TAG, "something-else");

        let err = decode(foreign.as_bytes()).unwrap_err();
        assert!(matches!(err, StorageCorruption::UnknownFormat(tag) if tag == "something-else"));
    }

    #[test]
    fn test_exists_is_case_sensitive() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("customers.dat"));
        store
            .save_all(&[CustomerRecord::new("AB-1", "Alice", "1234", 1.0)])
            .unwrap();

        assert!(store.exists("AB-1"));
        assert!(!store.exists("ab-1"));
        assert!(!store.exists("AB-1 "));
    }

    #[test]
    fn test_save_into_missing_directory_fails_and_propagates() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("no/such/dir/customers.dat"));

        let err = store.save_all(&sample_records()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_non_finite_balance_rejected_and_file_kept() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("customers.dat"));
        store.save_all(&sample_records()).unwrap();
        let before = fs::read(store.path()).unwrap();

        for balance in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut records = sample_records();
            records.push(CustomerRecord::new("004", "Dan", "4444", balance));

            let err = store.save_all(&records).unwrap_err();
            assert!(matches!(err, StoreError::NonFiniteBalance { ref account_number } if account_number == "004"));
        }

        assert_eq!(fs::read(store.path()).unwrap(), before);
        assert_eq!(store.load_all(), sample_records());
    }

    #[test]
    fn test_failed_rename_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("customers.dat"));
        store.save_all(&sample_records()).unwrap();
        let before = fs::read(store.path()).unwrap();

        // A directory sitting at the target path makes the final rename fail
        let blocked = RecordStore::new(dir.path().join("blocked"));
        fs::create_dir(blocked.path()).unwrap();
        fs::write(blocked.path().join("keep.txt"), b"keep").unwrap();

        let err = blocked.save_all(&sample_records()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert!(blocked.path().is_dir());
        assert_eq!(fs::read(blocked.path().join("keep.txt")).unwrap(), b"keep");

        // Only the target file lives in the directory; no stray temp files remain
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n != "customers.dat" && n != "blocked")
            .collect();
        assert!(leftovers.is_empty(), "unexpected files: {:?}", leftovers);
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_save_overwrites_whole_file() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("customers.dat"));

        store.save_all(&sample_records()).unwrap();
        let single = vec![CustomerRecord::new("009", "Nina", "4321", 9.0)];
        store.save_all(&single).unwrap();

        assert_eq!(store.load_all(), single);
    }
}
