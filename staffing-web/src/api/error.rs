//! Errors returned by store calls

use crate::store::Table;

/// Failure of a single store call
#[derive(Debug)]
pub enum StoreError {
    /// Credentials were refused or the token grant failed
    Auth { message: String },
    /// The spreadsheet or one of its worksheets does not exist
    NotFound { what: String },
    /// The request never produced a usable response (network, timeout, bad body)
    Transport { message: String },
    /// Any other non-success response from the API
    Api { status: u16, message: String },
    /// A stored row does not have the expected number of columns
    MalformedRow {
        table: Table,
        /// 1-based row number in the sheet (the header is row 1)
        row: usize,
        expected: usize,
        found: usize,
    },
    /// An append failed
    Write {
        table: Table,
        source: Box<StoreError>,
    },
}

impl StoreError {
    pub fn write(table: Table, source: StoreError) -> Self {
        StoreError::Write {
            table,
            source: Box::new(source),
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Auth { message } => {
                write!(f, "Spreadsheet authentication failed: {}", message)
            }
            StoreError::NotFound { what } => write!(f, "Not found in spreadsheet: {}", what),
            StoreError::Transport { message } => {
                write!(f, "Spreadsheet request failed: {}", message)
            }
            StoreError::Api { status, message } => {
                write!(f, "Spreadsheet API returned {}: {}", status, message)
            }
            StoreError::MalformedRow {
                table,
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} of '{}' has {} columns, expected {}",
                row, table, found, expected
            ),
            StoreError::Write { table, .. } => write!(f, "Failed to append row to '{}'", table),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Write { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport {
            message: err.to_string(),
        }
    }
}
