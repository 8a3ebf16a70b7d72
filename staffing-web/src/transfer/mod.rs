//! Data interchange: Excel export of every table, CSV import of assignments

pub mod csv_import;
pub mod workbook;

pub use csv_import::import_assignments;
pub use workbook::{WORKBOOK_FILENAME, WORKBOOK_MIME, export_workbook};
