// 💳 Iban Value - a number that already passed validation
//
// Holding an Iban means the checksum was verified. The only way in is
// validate() (or FromStr / TryFrom / serde, which all call it).

use crate::error::IbanError;
use crate::validator::{expand_letters, mod97, sanitize, validate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iban(String);

impl Iban {
    /// Wrap an already-sanitized string that passed every validation step
    pub(crate) fn from_validated(clean: String) -> Self {
        Iban(clean)
    }

    /// Electronic format: upper-case, no spaces
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ISO 3166 country code (first 2 characters)
    pub fn country_code(&self) -> &str {
        &self.0[..2]
    }

    /// Check digits (characters 3-4)
    pub fn check_digits(&self) -> &str {
        &self.0[2..4]
    }

    /// Country-specific Basic Bank Account Number
    pub fn bban(&self) -> &str {
        &self.0[4..]
    }

    /// Print format: groups of four separated by spaces
    ///
    /// Example: "RS35265100000071202319" → "RS35 2651 0000 0071 2023 19"
    pub fn print_format(&self) -> String {
        self.0
            .as_bytes()
            .chunks(4)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Show only country, check digits and the last 4 BBAN characters
    ///
    /// Example: "CY30905000010000001000000469" → "CY30*0469"
    pub fn masked(&self) -> String {
        let bban = self.bban();
        let tail = &bban[bban.len().saturating_sub(4)..];
        format!("{}{}*{}", self.country_code(), self.check_digits(), tail)
    }

    /// SHA-256 of the electronic format, lowercase hex
    ///
    /// Lets reports correlate the same account without printing it.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Display for Iban {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print_format())
    }
}

impl FromStr for Iban {
    type Err = IbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

impl TryFrom<String> for Iban {
    type Error = IbanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)
    }
}

impl From<Iban> for String {
    fn from(iban: Iban) -> Self {
        iban.0
    }
}

impl AsRef<str> for Iban {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// CHECK DIGIT GENERATION
// ============================================================================

/// Compute the two ISO 7064 MOD 97-10 check digits for a country + BBAN
///
/// check = 98 - (BBAN + country + "00" as digits) mod 97
///
/// Inputs are sanitized the same way as validate(). The country must be 2
/// letters and the BBAN 1-30 letters or digits, otherwise BadFormat.
pub fn compute_check_digits(country: &str, bban: &str) -> Result<String, IbanError> {
    let country = sanitize(country);
    let bban = sanitize(bban);

    let country_ok = country.len() == 2 && country.bytes().all(|b| b.is_ascii_uppercase());
    let bban_ok = (1..=30).contains(&bban.len())
        && bban
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());

    if !country_ok || !bban_ok {
        return Err(IbanError::BadFormat);
    }

    let digits = expand_letters(&format!("{}{}00", bban, country));
    let remainder = mod97(&digits).ok_or(IbanError::Unparseable)?;

    Ok(format!("{:02}", 98 - remainder))
}

/// Build a full IBAN from a country code and BBAN
pub fn build_iban(country: &str, bban: &str) -> Result<Iban, IbanError> {
    let check = compute_check_digits(country, bban)?;
    validate(&format!("{}{}{}", sanitize(country), check, sanitize(bban)))
}

// ============================================================================
// TESTS
// ============================================================================
