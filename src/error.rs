// ⚠️ Validation Errors
// Why an IBAN was rejected. Callers that only need yes/no use is_valid_iban().

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IbanError {
    /// Sanitized input is shorter than MIN_IBAN_LENGTH
    TooShort { length: usize },

    /// Sanitized input is longer than MAX_IBAN_LENGTH
    TooLong { length: usize },

    /// Not country code + check digits + alphanumeric BBAN
    BadFormat,

    /// Expanded digit string could not be read as a number
    Unparseable,

    /// Mod-97 remainder was not 1
    ChecksumMismatch { remainder: u32 },
}

impl IbanError {
    /// Stable tag used in reports and JSON responses
    pub fn reason_code(&self) -> &'static str {
        match self {
            IbanError::TooShort { .. } => "too_short",
            IbanError::TooLong { .. } => "too_long",
            IbanError::BadFormat => "bad_format",
            IbanError::Unparseable => "unparseable",
            IbanError::ChecksumMismatch { .. } => "checksum_mismatch",
        }
    }
}

impl std::fmt::Display for IbanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IbanError::TooShort { length } => {
                write!(f, "IBAN too short: {} characters (minimum {})", length, crate::MIN_IBAN_LENGTH)
            }
            IbanError::TooLong { length } => {
                write!(f, "IBAN too long: {} characters (maximum {})", length, crate::MAX_IBAN_LENGTH)
            }
            IbanError::BadFormat => write!(
                f,
                "IBAN must be 2 letters, 2 digits, then 1-30 letters or digits"
            ),
            IbanError::Unparseable => write!(f, "IBAN could not be converted to a number"),
            IbanError::ChecksumMismatch { remainder } => {
                write!(f, "IBAN checksum failed: mod 97 = {}, expected 1", remainder)
            }
        }
    }
}

impl std::error::Error for IbanError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_are_stable() {
        assert_eq!(IbanError::TooShort { length: 4 }.reason_code(), "too_short");
        assert_eq!(IbanError::TooLong { length: 35 }.reason_code(), "too_long");
        assert_eq!(IbanError::BadFormat.reason_code(), "bad_format");
        assert_eq!(IbanError::Unparseable.reason_code(), "unparseable");
        assert_eq!(
            IbanError::ChecksumMismatch { remainder: 40 }.reason_code(),
            "checksum_mismatch"
        );
    }

    #[test]
    fn test_display_mentions_limits() {
        let msg = IbanError::TooShort { length: 4 }.to_string();
        assert!(msg.contains("4 characters"));
        assert!(msg.contains("minimum 5"));

        let msg = IbanError::TooLong { length: 40 }.to_string();
        assert!(msg.contains("maximum 34"));
    }

    #[test]
    fn test_serializes_with_reason_tag() {
        let json = serde_json::to_value(IbanError::ChecksumMismatch { remainder: 12 }).unwrap();
        assert_eq!(json["reason"], "checksum_mismatch");
        assert_eq!(json["remainder"], 12);
    }
}
