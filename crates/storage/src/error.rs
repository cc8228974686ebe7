use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StorageError::DuplicateKey(_) => true,
            StorageError::Database(sqlx::Error::Database(e)) => {
                e.code().as_deref() == Some("23505")
            }
            _ => false,
        }
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Classify a raw sqlx error coming back from an insert or update.
    pub(crate) fn from_write(error: sqlx::Error, what: &str) -> Self {
        let classified = StorageError::Database(error);
        if classified.is_unique_violation() {
            return StorageError::DuplicateKey(what.to_string());
        }
        if classified.is_foreign_key_violation() {
            return StorageError::ConstraintViolation(format!("{what}: referenced row missing"));
        }
        classified
    }
}

/// Rejections produced by the admission, spot-registration and payment workflows.
///
/// Everything except `Storage` is a client-facing outcome, not a server fault.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Event not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("Registration for this event is currently closed")]
    RegistrationClosed,

    #[error("{0}")]
    InvalidTeamSize(String),

    #[error("Team name is required for teams with more than 2 members")]
    MissingTeamName,

    #[error("Team leader details are required")]
    MissingLeaderDetails,

    #[error("At least one team member with name, email and mobile is required")]
    MissingTeamMember,

    #[error("You have already registered for this event")]
    AlreadyRegistered,

    #[error("Payment is required for this event")]
    PaymentRequired { event_fees: Decimal },

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for RegistrationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => RegistrationError::NotFound,
            e if e.is_unique_violation() => RegistrationError::AlreadyRegistered,
            e => RegistrationError::Storage(e),
        }
    }
}

pub type RegistrationResult<T> = std::result::Result<T, RegistrationError>;
