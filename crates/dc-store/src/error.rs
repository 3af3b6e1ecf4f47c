use std::fmt;

use dc_core::{CounterError, PlanError};

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    Config(String),
    Counter(CounterError),
    Plan(PlanError),
    NotFound(String),
    InvalidData(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "SQLite error: {e}"),
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Config(msg) => write!(f, "invalid config: {msg}"),
            StoreError::Counter(e) => write!(f, "{e}"),
            StoreError::Plan(e) => write!(f, "{e}"),
            StoreError::NotFound(what) => write!(f, "not found: {what}"),
            StoreError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            StoreError::Io(e) => Some(e),
            StoreError::Counter(e) => Some(e),
            StoreError::Plan(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<CounterError> for StoreError {
    fn from(e: CounterError) -> Self {
        StoreError::Counter(e)
    }
}

impl From<PlanError> for StoreError {
    fn from(e: PlanError) -> Self {
        StoreError::Plan(e)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
