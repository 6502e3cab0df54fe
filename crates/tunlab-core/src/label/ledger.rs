//! CSV label ledger with duplicate-key exclusion.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{LabelRecord, LedgerSchema};
use crate::error::LedgerError;

/// Storage seam for label records.
///
/// The flat-file ledger is the only implementation today; the trait keeps the
/// session controller independent of the backing store.
pub trait LabelStore {
    /// Whether a record with this image key already exists.
    fn contains(&self, key: &str) -> bool;

    /// Append one record; the write must be durable when this returns.
    fn append(&mut self, record: &LabelRecord) -> Result<(), LedgerError>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append-only CSV ledger.
///
/// Created with a fixed header when absent. The first column is the image
/// path and serves as the deduplication key; it is read once at open time and
/// never refreshed during a session.
pub struct CsvLedger {
    path: PathBuf,
    schema: LedgerSchema,
    keys: HashSet<String>,
}

impl CsvLedger {
    /// Open an existing ledger or create a new one with the schema's header.
    pub fn open(path: &Path, schema: LedgerSchema) -> Result<Self, LedgerError> {
        let mut keys = HashSet::new();

        let is_new = !path.exists() || fs::metadata(path)?.len() == 0;
        if is_new {
            let mut writer = csv::Writer::from_path(path)?;
            writer.write_record(schema.header())?;
            writer.flush()?;
            debug!("Created ledger {} ({} schema)", path.display(), schema);
        } else {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_path(path)?;

            let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
            if header != schema.header() {
                return Err(LedgerError::SchemaMismatch {
                    path: path.display().to_string(),
                    expected: schema.name().to_string(),
                });
            }

            for result in reader.records() {
                let record = result?;
                if let Some(key) = record.get(0) {
                    keys.insert(key.to_string());
                }
            }
            debug!(
                "Loaded ledger {} with {} labeled images",
                path.display(),
                keys.len()
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            schema,
            keys,
        })
    }

    /// The schema this ledger was opened with.
    pub fn schema(&self) -> LedgerSchema {
        self.schema
    }

    /// Path of the backing CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LabelStore for CsvLedger {
    fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn append(&mut self, record: &LabelRecord) -> Result<(), LedgerError> {
        let row = record.to_row(self.schema)?;

        // Reopened in append mode per submission so each row is durable
        // before the next image loads
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(&row)?;
        writer.flush()?;

        self.keys.insert(record.image.clone());
        Ok(())
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}
