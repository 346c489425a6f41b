//! User registration and authentication service.
//!
//! # Responsibility
//! - Validate credentials and register users with bcrypt-hashed passwords.
//! - Verify phone/password pairs.
//!
//! # Invariants
//! - A phone number maps to at most one user; re-registration fails without
//!   touching stored rows.
//! - Plaintext passwords are never persisted or logged.
//! - A stored hash that bcrypt cannot parse is an error, never a silent
//!   authentication failure.

use crate::model::user::{
    validate_password, validate_phone_number, CredentialError, NewUser, UserId,
};
use crate::repo::error::RepoError;
use crate::repo::user_repo::UserRepository;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// bcrypt work factor used unless a caller overrides it.
pub const DEFAULT_HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Service error for user use-cases.
#[derive(Debug)]
pub enum UserServiceError {
    Validation(CredentialError),
    /// The phone number already has an account.
    DuplicateUser,
    Hash(bcrypt::BcryptError),
    Repo(RepoError),
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateUser => write!(f, "phone number is already registered"),
            Self::Hash(err) => write!(f, "password hashing failed: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateUser => None,
            Self::Hash(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<CredentialError> for UserServiceError {
    fn from(value: CredentialError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicatePhoneNumber => Self::DuplicateUser,
            other => Self::Repo(other),
        }
    }
}

impl From<bcrypt::BcryptError> for UserServiceError {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::Hash(value)
    }
}

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
    hash_cost: u32,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service hashing with [`DEFAULT_HASH_COST`].
    pub fn new(repo: R) -> Self {
        Self::with_hash_cost(repo, DEFAULT_HASH_COST)
    }

    /// Creates a service with an explicit bcrypt cost (4..=31).
    pub fn with_hash_cost(repo: R, hash_cost: u32) -> Self {
        Self { repo, hash_cost }
    }

    /// Registers a new user.
    ///
    /// # Errors
    /// - `Validation` when the phone number or password is malformed.
    /// - `DuplicateUser` when the phone number is already registered.
    pub fn register(
        &self,
        phone_number: &str,
        password: &str,
    ) -> Result<UserId, UserServiceError> {
        validate_phone_number(phone_number)?;
        validate_password(password)?;

        if self.repo.find_by_phone(phone_number)?.is_some() {
            info!("event=user_register module=auth status=rejected reason=duplicate");
            return Err(UserServiceError::DuplicateUser);
        }

        let password_hash = bcrypt::hash(password, self.hash_cost)?;
        let user_id = self.repo.insert_user(&NewUser {
            phone_number: phone_number.to_string(),
            password_hash,
        })?;

        info!("event=user_register module=auth status=ok user_id={user_id}");
        Ok(user_id)
    }

    /// Returns whether `phone_number` is registered with `password`.
    ///
    /// Both values are compared exactly; nothing is trimmed or case-folded.
    pub fn authenticate(
        &self,
        phone_number: &str,
        password: &str,
    ) -> Result<bool, UserServiceError> {
        let Some(user) = self.repo.find_by_phone(phone_number)? else {
            info!("event=user_authenticate module=auth status=rejected reason=unknown_user");
            return Ok(false);
        };

        let verified = match bcrypt::verify(password, &user.password_hash) {
            Ok(verified) => verified,
            Err(err) => {
                warn!(
                    "event=user_authenticate module=auth status=error user_id={} error_code=invalid_hash",
                    user.id
                );
                return Err(err.into());
            }
        };

        if verified {
            info!(
                "event=user_authenticate module=auth status=ok user_id={}",
                user.id
            );
        } else {
            info!(
                "event=user_authenticate module=auth status=rejected reason=bad_password user_id={}",
                user.id
            );
        }
        Ok(verified)
    }

    pub fn user_count(&self) -> Result<u64, UserServiceError> {
        Ok(self.repo.count()?)
    }
}
