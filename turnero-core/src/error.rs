//! Error types for turnero.

use thiserror::Error;

/// A form field, as named to the user in validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Service,
    Date,
    Time,
    FullName,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Service => "service",
            Field::Date => "date",
            Field::Time => "time",
            Field::FullName => "full name",
        };
        f.write_str(label)
    }
}

/// A form value was rejected. Raised before any store is contacted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The {0} field is required")]
    Missing(Field),

    #[error("Phone number '{0}' contains no digits")]
    InvalidPhone(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("Date {date} is in the past (today is {today})")]
    DateInPast { date: String, today: String },

    #[error("Unknown scope '{0}'. Expected today, all-upcoming or specific-date")]
    InvalidScope(String),
}

/// Errors that can occur in turnero operations.
#[derive(Error, Debug)]
pub enum TurneroError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("No {collection} record with id '{id}'")]
    NotFound { collection: &'static str, id: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TurneroError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TurneroError::NotFound { .. })
    }
}

/// Result type alias for turnero operations.
pub type TurneroResult<T> = Result<T, TurneroError>;
