// 📋 Batch Validation - check a whole CSV of IBANs
//
// Input: CSV with header `reference,iban` (reference may be empty)
// Output: one ValidationReport per row + a BatchSummary

use crate::error::IbanError;
use crate::validator::validate;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

// ============================================================================
// INPUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IbanRecord {
    /// Caller's own identifier for the row (customer id, invoice, ...)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub reference: Option<String>,

    /// Candidate IBAN as typed by the user
    pub iban: String,
}

impl IbanRecord {
    pub fn new(iban: impl Into<String>) -> Self {
        IbanRecord {
            reference: None,
            iban: iban.into(),
        }
    }

    /// Builder: attach a reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Load IBAN records from a CSV file
pub fn load_csv(csv_path: &Path) -> Result<Vec<IbanRecord>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let records = read_records(file)?;
    log::debug!("load_csv: {} records from {}", records.len(), csv_path.display());

    Ok(records)
}

/// Read IBAN records from any CSV source
pub fn read_records<R: Read>(reader: R) -> Result<Vec<IbanRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        // +2: header is line 1, rows start at line 2
        let record: IbanRecord =
            result.with_context(|| format!("Failed to deserialize IBAN record on line {}", index + 2))?;
        records.push(record);
    }

    Ok(records)
}

// ============================================================================
// VALIDATION REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub reference: Option<String>,
    pub valid: bool,

    /// Only set when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    /// Only set when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub checked_at: DateTime<Utc>,
}

impl ValidationReport {
    fn from_outcome(reference: Option<String>, outcome: std::result::Result<crate::Iban, IbanError>) -> Self {
        let checked_at = Utc::now();

        match outcome {
            Ok(iban) => ValidationReport {
                reference,
                valid: true,
                masked: Some(iban.masked()),
                fingerprint: Some(iban.fingerprint()),
                country_code: Some(iban.country_code().to_string()),
                reason: None,
                message: None,
                checked_at,
            },
            Err(err) => ValidationReport {
                reference,
                valid: false,
                masked: None,
                fingerprint: None,
                country_code: None,
                reason: Some(err.reason_code().to_string()),
                message: Some(err.to_string()),
                checked_at,
            },
        }
    }
}

/// Validate one record
pub fn check_record(record: &IbanRecord) -> ValidationReport {
    ValidationReport::from_outcome(record.reference.clone(), validate(&record.iban))
}

/// Validate every record, preserving order
pub fn validate_batch(records: &[IbanRecord]) -> Vec<ValidationReport> {
    let reports: Vec<ValidationReport> = records.iter().map(check_record).collect();

    log::debug!(
        "validate_batch: {} records, {} valid",
        reports.len(),
        reports.iter().filter(|r| r.valid).count()
    );

    reports
}

// ============================================================================
// BATCH SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// Failure reason → count
    pub by_reason: BTreeMap<String, usize>,
    /// Country code → count of valid IBANs
    pub by_country: BTreeMap<String, usize>,
}

impl BatchSummary {
    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Valid: {} ({:.1}%), Invalid: {}",
            self.total,
            self.valid_count,
            self.valid_ratio() * 100.0,
            self.invalid_count
        )
    }

    /// Share of valid IBANs (0.0 for an empty batch)
    pub fn valid_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.valid_count as f64 / self.total as f64
    }

    pub fn all_valid(&self) -> bool {
        self.invalid_count == 0
    }

    /// Count one validation outcome directly, without building a report
    pub fn record_outcome(&mut self, outcome: &std::result::Result<crate::Iban, IbanError>) {
        match outcome {
            Ok(iban) => self.count(Some(iban.country_code()), None),
            Err(err) => self.count(None, Some(err.reason_code())),
        }
    }

    fn count(&mut self, country_code: Option<&str>, reason: Option<&str>) {
        self.total += 1;

        match reason {
            None => {
                self.valid_count += 1;
                if let Some(country) = country_code {
                    *self.by_country.entry(country.to_string()).or_insert(0) += 1;
                }
            }
            Some(reason) => {
                self.invalid_count += 1;
                *self.by_reason.entry(reason.to_string()).or_insert(0) += 1;
            }
        }
    }
}

/// Aggregate reports into counts per outcome, reason and country
pub fn batch_summary(reports: &[ValidationReport]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for report in reports {
        if report.valid {
            summary.count(report.country_code.as_deref(), None);
        } else {
            summary.count(None, Some(report.reason.as_deref().unwrap_or("unknown")));
        }
    }

    summary
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_records() -> Vec<IbanRecord> {
        vec![
            IbanRecord::new("RS35265100000071202319").with_reference("cust-1"),
            IbanRecord::new("CY30 9050 0001 0000 0010 0000 0469").with_reference("cust-2"),
            IbanRecord::new("RS35265100000071202310").with_reference("cust-3"),
            IbanRecord::new("036020343320"),
            IbanRecord::new("RS35"),
        ]
    }

    #[test]
    fn test_check_valid_record() {
        let report = check_record(&IbanRecord::new("CY30905000010000001000000469").with_reference("a"));

        assert!(report.valid);
        assert_eq!(report.reference.as_deref(), Some("a"));
        assert_eq!(report.masked.as_deref(), Some("CY30*0469"));
        assert_eq!(report.country_code.as_deref(), Some("CY"));
        assert!(report.fingerprint.is_some());
        assert!(report.reason.is_none());
    }

    #[test]
    fn test_check_invalid_record_hides_details() {
        let report = check_record(&IbanRecord::new("RS35265100000071202310"));

        assert!(!report.valid);
        assert_eq!(report.reason.as_deref(), Some("checksum_mismatch"));
        assert!(report.message.is_some());
        assert!(report.masked.is_none());
        assert!(report.fingerprint.is_none());
        assert!(report.country_code.is_none());
    }

    #[test]
    fn test_batch_preserves_order() {
        let records = sample_records();
        let reports = validate_batch(&records);

        assert_eq!(reports.len(), records.len());
        let valid: Vec<bool> = reports.iter().map(|r| r.valid).collect();
        assert_eq!(valid, vec![true, true, false, false, false]);
        assert_eq!(reports[0].reference.as_deref(), Some("cust-1"));
    }

    #[test]
    fn test_batch_summary() {
        let reports = validate_batch(&sample_records());
        let summary = batch_summary(&reports);

        println!("Batch summary: {}", summary.summary());

        assert_eq!(summary.total, 5);
        assert_eq!(summary.valid_count, 2);
        assert_eq!(summary.invalid_count, 3);
        assert_eq!(summary.by_reason.get("checksum_mismatch"), Some(&1));
        assert_eq!(summary.by_reason.get("bad_format"), Some(&1));
        assert_eq!(summary.by_reason.get("too_short"), Some(&1));
        assert_eq!(summary.by_country.get("RS"), Some(&1));
        assert_eq!(summary.by_country.get("CY"), Some(&1));
        assert!(!summary.all_valid());
        assert!((summary.valid_ratio() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_outcome_matches_batch_summary() {
        let records = sample_records();

        let mut direct = BatchSummary::default();
        for record in &records {
            direct.record_outcome(&validate(&record.iban));
        }

        assert_eq!(direct, batch_summary(&validate_batch(&records)));
        assert_eq!(direct.total, 5);
        assert_eq!(direct.by_reason.get("bad_format"), Some(&1));
    }

    #[test]
    fn test_empty_batch_summary() {
        let summary = batch_summary(&[]);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.valid_ratio(), 0.0);
        assert!(summary.all_valid());
    }

    #[test]
    fn test_read_records_from_csv() {
        let data = "reference,iban\ncust-1,RS35 2651 0000 0071 2023 19\n,RS351\n";
        let records = read_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reference.as_deref(), Some("cust-1"));
        assert_eq!(records[0].iban, "RS35 2651 0000 0071 2023 19");
        assert_eq!(records[1].reference, None);
        assert_eq!(records[1].iban, "RS351");
    }

    #[test]
    fn test_load_csv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reference,iban").unwrap();
        writeln!(file, "inv-7,CY30905000010000001000000469").unwrap();
        writeln!(file, "inv-8,KZ22551B229629855USD").unwrap();
        file.flush().unwrap();

        let records = load_csv(file.path()).unwrap();
        let summary = batch_summary(&validate_batch(&records));

        assert_eq!(summary.total, 2);
        assert_eq!(summary.valid_count, 1);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = load_csv(Path::new("/nonexistent/ibans.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }

    #[test]
    fn test_report_serializes_without_empty_fields() {
        let report = check_record(&IbanRecord::new("RS35"));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["valid"], false);
        assert_eq!(json["reason"], "too_short");
        assert!(json.get("masked").is_none());
        assert!(json.get("checked_at").is_some());
    }
}
