//! Core library for tunnel image dataset tooling.
//!
//! This crate provides:
//! - PDF embedded-image extraction (lopdf)
//! - The batch extraction pipeline with minimum-size filtering
//! - The manual labeling session state machine
//! - The CSV label ledger with duplicate-key exclusion

pub mod config;
pub mod error;
pub mod extract;
pub mod label;
pub mod pdf;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{ExtractConfig, LabelConfig, TunlabConfig};
pub use error::{LedgerError, PdfError, Result, TunlabError};
pub use extract::{DocumentStats, ExtractOptions, extract_document};
pub use label::{
    CsvLedger, DisplacementValues, FormValues, LabelRecord, LabelSession, LabelStore,
    LedgerSchema, MAX_TUNNELS, NOT_AVAILABLE, scan_candidates,
};
pub use pdf::{DocumentSource, PdfExtractor, PdfImage};
