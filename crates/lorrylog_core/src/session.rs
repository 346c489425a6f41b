//! Session/auth gate.
//!
//! # Responsibility
//! - Track whether, and as whom, the current process is authenticated.
//! - Gate repair and import operations behind a successful login or
//!   registration.
//!
//! # Invariants
//! - A session starts `LoggedOut`.
//! - `LoggedIn` is terminal; there is no logout transition.
//! - Failed login/registration never changes state.
//! - Unknown phone numbers are rejected at login; accounts are only created
//!   by `register`.
//! - The gate scopes nothing per user: every logged-in user sees all records.

use crate::model::user::{validate_phone_number, CredentialError};
use crate::repo::error::RepoError;
use crate::repo::user_repo::UserRepository;
use crate::service::user_service::{UserService, UserServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Authentication state of the current process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn { phone_number: String },
}

/// Error surfaced by gate transitions.
#[derive(Debug)]
pub enum SessionError {
    Validation(CredentialError),
    DuplicateUser,
    InvalidCredentials,
    NotLoggedIn,
    AlreadyLoggedIn,
    Hash(bcrypt::BcryptError),
    Storage(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateUser => write!(f, "phone number is already registered"),
            Self::InvalidCredentials => write!(f, "invalid phone number or password"),
            Self::NotLoggedIn => write!(f, "login required"),
            Self::AlreadyLoggedIn => write!(f, "session is already logged in"),
            Self::Hash(err) => write!(f, "password hashing failed: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Hash(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UserServiceError> for SessionError {
    fn from(value: UserServiceError) -> Self {
        match value {
            UserServiceError::Validation(err) => Self::Validation(err),
            UserServiceError::DuplicateUser => Self::DuplicateUser,
            UserServiceError::Hash(err) => Self::Hash(err),
            UserServiceError::Repo(err) => Self::Storage(err),
        }
    }
}

impl From<CredentialError> for SessionError {
    fn from(value: CredentialError) -> Self {
        Self::Validation(value)
    }
}

/// Process-local two-state login gate.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn { .. })
    }

    /// Authenticated phone number, when logged in.
    pub fn phone_number(&self) -> Option<&str> {
        match &self.state {
            SessionState::LoggedIn { phone_number } => Some(phone_number.as_str()),
            SessionState::LoggedOut => None,
        }
    }

    /// Logs in with an existing account.
    ///
    /// # Errors
    /// - `Validation` for a malformed phone number; no lookup is attempted.
    /// - `InvalidCredentials` for an unknown phone number or wrong password.
    /// - `AlreadyLoggedIn` once the session is logged in.
    pub fn login<R: UserRepository>(
        &mut self,
        users: &UserService<R>,
        phone_number: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        self.ensure_logged_out()?;
        validate_phone_number(phone_number)?;

        if !users.authenticate(phone_number, password)? {
            return Err(SessionError::InvalidCredentials);
        }

        self.state = SessionState::LoggedIn {
            phone_number: phone_number.to_string(),
        };
        Ok(())
    }

    /// Registers a new account and logs it in.
    pub fn register<R: UserRepository>(
        &mut self,
        users: &UserService<R>,
        phone_number: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        self.ensure_logged_out()?;
        users.register(phone_number, password)?;

        self.state = SessionState::LoggedIn {
            phone_number: phone_number.to_string(),
        };
        Ok(())
    }

    /// Returns the authenticated phone number or `NotLoggedIn`.
    ///
    /// Every repair and import call must pass through this check.
    pub fn require_login(&self) -> Result<&str, SessionError> {
        self.phone_number().ok_or(SessionError::NotLoggedIn)
    }

    fn ensure_logged_out(&self) -> Result<(), SessionError> {
        if self.is_logged_in() {
            return Err(SessionError::AlreadyLoggedIn);
        }
        Ok(())
    }
}
