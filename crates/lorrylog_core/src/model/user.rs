//! User credential model and validation rules.
//!
//! # Responsibility
//! - Define the persisted user row and the insert payload.
//! - Validate phone numbers and passwords before any store call.
//!
//! # Invariants
//! - A phone number is exactly 10 ASCII digits, compared verbatim.
//! - Only bcrypt hashes are persisted; plaintext passwords never reach storage.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type UserId = i64;

pub const PHONE_NUMBER_DIGITS: usize = 10;
pub const MIN_PASSWORD_CHARS: usize = 8;
/// bcrypt only consumes the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

static PHONE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone number regex"));

/// Persisted user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// Insert payload for the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub phone_number: String,
    pub password_hash: String,
}

/// Rejected login or registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    InvalidPhoneNumber,
    PasswordTooShort { min_chars: usize, actual_chars: usize },
    PasswordTooLong { max_bytes: usize, actual_bytes: usize },
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPhoneNumber => write!(
                f,
                "phone number must be exactly {PHONE_NUMBER_DIGITS} digits"
            ),
            Self::PasswordTooShort {
                min_chars,
                actual_chars,
            } => write!(
                f,
                "password must be at least {min_chars} characters, got {actual_chars}"
            ),
            Self::PasswordTooLong {
                max_bytes,
                actual_bytes,
            } => write!(
                f,
                "password must be at most {max_bytes} bytes, got {actual_bytes}"
            ),
        }
    }
}

impl Error for CredentialError {}

/// Checks the phone number format. The value is not trimmed.
pub fn validate_phone_number(phone_number: &str) -> Result<(), CredentialError> {
    if PHONE_NUMBER_RE.is_match(phone_number) {
        Ok(())
    } else {
        Err(CredentialError::InvalidPhoneNumber)
    }
}

/// Checks password length bounds for registration.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    let actual_chars = password.chars().count();
    if actual_chars < MIN_PASSWORD_CHARS {
        return Err(CredentialError::PasswordTooShort {
            min_chars: MIN_PASSWORD_CHARS,
            actual_chars,
        });
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(CredentialError::PasswordTooLong {
            max_bytes: MAX_PASSWORD_BYTES,
            actual_bytes: password.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_number_requires_exactly_ten_ascii_digits() {
        assert!(validate_phone_number("9876543210").is_ok());
        assert!(validate_phone_number("987654321").is_err());
        assert!(validate_phone_number("98765432100").is_err());
        assert!(validate_phone_number(" 9876543210").is_err());
        assert!(validate_phone_number("98765-4321").is_err());
        assert!(validate_phone_number("٩٨٧٦٥٤٣٢١٠").is_err());
    }

    #[test]
    fn password_length_counts_characters() {
        assert_eq!(
            validate_password("short"),
            Err(CredentialError::PasswordTooShort {
                min_chars: 8,
                actual_chars: 5
            })
        );
        assert!(validate_password("secretpw").is_ok());
        assert!(validate_password("pässwörd").is_ok());
    }

    #[test]
    fn password_over_bcrypt_limit_is_rejected() {
        let long = "x".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(matches!(
            validate_password(&long),
            Err(CredentialError::PasswordTooLong { .. })
        ));
    }
}
