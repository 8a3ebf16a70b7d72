//! Google Sheets API module
//!
//! Authenticated access to one spreadsheet whose worksheets act as the
//! People, Projects and Assignments tables.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use client::SheetsClient;
pub use error::StoreError;
pub use models::ServiceAccountKey;
