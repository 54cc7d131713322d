// IBAN Check - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod validator;   // ISO 13616 mod-97 check
pub mod error;       // Why an IBAN was rejected
pub mod iban;        // Validated IBAN value + check digit generation
pub mod batch;       // CSV bulk validation + summaries

#[cfg(feature = "server")]
pub mod api;         // REST API router

// Re-export commonly used types
pub use validator::{
    is_valid_iban, validate,
    sanitize, matches_pattern, rearrange, expand_letters, mod97,
    MIN_IBAN_LENGTH, MAX_IBAN_LENGTH, MOD_VALUE, IBAN_PATTERN,
};
pub use error::IbanError;
pub use iban::{Iban, compute_check_digits, build_iban};
pub use batch::{
    IbanRecord, ValidationReport, BatchSummary,
    load_csv, read_records, check_record, validate_batch, batch_summary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
