// 🏦 IBAN Validator - ISO 13616 checksum
//
// Pipeline: sanitize → length → pattern → rearrange → letters to digits → mod 97
//
// Every step is a pure function over its own input. Nothing here logs or
// keeps state, so the validator can be called from any thread.

use crate::error::IbanError;
use crate::iban::Iban;
use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum IBAN length (country code + check digits + 1 BBAN character)
pub const MIN_IBAN_LENGTH: usize = 5;

/// Maximum IBAN length (SWIFT registry limit)
pub const MAX_IBAN_LENGTH: usize = 34;

/// ISO 7064 MOD 97-10 modulus
pub const MOD_VALUE: u32 = 97;

/// Basic IBAN structure:
/// - 2 letter country code
/// - 2 check digits
/// - 1 to 30 alphanumeric BBAN characters (country-specific layout not checked)
pub static IBAN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]{1,30}$").expect("IBAN pattern must compile")
});

// ============================================================================
// PIPELINE STEPS
// ============================================================================

/// Remove spaces and upper-case everything
///
/// Only the space character is stripped; tabs and other separators are
/// left in place and rejected by the pattern check.
///
/// Case mapping is one character to one character. A character whose
/// upper-case form is longer ('ß' → "SS", 'ﬀ' → "FF") is kept as is, so it
/// can never turn into ASCII letters that pass the pattern.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|&c| c != ' ')
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .collect()
}

/// Anchored match against IBAN_PATTERN (expects sanitized input)
pub fn matches_pattern(clean: &str) -> bool {
    IBAN_PATTERN.is_match(clean)
}

/// Move the first 4 characters (country code + check digits) to the end
///
/// Example: "RS351" → "1RS35"
pub fn rearrange(clean: &str) -> String {
    match (clean.get(..4), clean.get(4..)) {
        (Some(head), Some(tail)) => format!("{}{}", tail, head),
        _ => clean.to_string(),
    }
}

/// Replace each letter with its two-digit code (A=10 … Z=35)
///
/// Digits pass through unchanged. Any other character is skipped; after
/// the pattern check none can reach this point.
pub fn expand_letters(rearranged: &str) -> String {
    let mut digits = String::with_capacity(rearranged.len() * 2);

    for c in rearranged.chars() {
        match c {
            'A'..='Z' => digits.push_str(&(c as u32 - 'A' as u32 + 10).to_string()),
            '0'..='9' => digits.push(c),
            _ => {}
        }
    }

    digits
}

/// Remainder of a decimal digit string modulo 97
///
/// Reduces digit by digit, so a 68-digit number never has to be held as an
/// integer. Returns None for an empty string or any non-digit byte.
pub fn mod97(digits: &str) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }

    digits.bytes().try_fold(0u32, |acc, b| {
        if b.is_ascii_digit() {
            Some((acc * 10 + u32::from(b - b'0')) % MOD_VALUE)
        } else {
            None
        }
    })
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Validate an IBAN and report the first failing step
pub fn validate(input: &str) -> Result<Iban, IbanError> {
    let clean = sanitize(input);

    if clean.len() < MIN_IBAN_LENGTH {
        return Err(IbanError::TooShort { length: clean.len() });
    }
    if clean.len() > MAX_IBAN_LENGTH {
        return Err(IbanError::TooLong { length: clean.len() });
    }

    if !matches_pattern(&clean) {
        return Err(IbanError::BadFormat);
    }

    let digits = expand_letters(&rearrange(&clean));
    let remainder = mod97(&digits).ok_or(IbanError::Unparseable)?;

    if remainder != 1 {
        return Err(IbanError::ChecksumMismatch { remainder });
    }

    Ok(Iban::from_validated(clean))
}

/// true if the input is a structurally and arithmetically valid IBAN
///
/// Never fails: malformed input of any kind yields false.
pub fn is_valid_iban(input: &str) -> bool {
    validate(input).is_ok()
}

// ============================================================================
// TESTS
// ============================================================================
