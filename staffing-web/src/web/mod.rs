//! Web front end: pages for listing and adding records, plus Excel export
//! and CSV import

pub mod error;
pub mod handlers;
pub mod pages;
pub mod server;

pub use server::serve;
