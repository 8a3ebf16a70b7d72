//! Spreadsheet-backed table store
//!
//! The spreadsheet holds three worksheets, each an append-only list of rows
//! under a fixed header row. [`TableStore`] is the seam between the record
//! layer and whatever actually holds the rows (Google Sheets in production,
//! an in-memory map in tests).

pub mod records;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::api::StoreError;

pub use records::{Assignment, NewAssignment, Person, Project};

/// One named worksheet of the spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    People,
    Projects,
    Assignments,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::People, Table::Projects, Table::Assignments];

    /// Worksheet title in the spreadsheet
    pub fn sheet_name(self) -> &'static str {
        match self {
            Table::People => "People",
            Table::Projects => "Projects",
            Table::Assignments => "Assignments",
        }
    }

    /// Header row, also used for the exported workbook
    pub fn header(self) -> &'static [&'static str] {
        match self {
            Table::People | Table::Projects => &["Name"],
            Table::Assignments => &["Person", "Project", "Month", "Fraction"],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// Pad rows shorter than `width` with empty cells. Longer rows are left as
/// they are so the record layer can reject them.
///
/// Spreadsheet APIs drop trailing empty cells, so a row whose last column is
/// blank comes back shorter than its neighbours.
pub fn fill_gaps(rows: &mut [Vec<String>], width: usize) {
    for row in rows.iter_mut().filter(|row| row.len() < width) {
        row.resize(width, String::new());
    }
}

/// Raw row access to the three tables.
///
/// `fetch_rows` returns every row including the header, in store order, with
/// rows padded to a common width. `append_row` adds one row after the last.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn fetch_rows(&self, table: Table) -> Result<Vec<Vec<String>>, StoreError>;

    async fn append_row(&self, table: Table, values: Vec<String>) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[&[&str]]) -> Vec<Vec<String>> {
        values
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_fill_gaps_pads_to_header_width() {
        let mut table = rows(&[&["Person", "Project", "Month", "Fraction"], &["Alice", "Apollo"], &[]]);

        fill_gaps(&mut table, Table::Assignments.header().len());

        assert_eq!(table[1], vec!["Alice", "Apollo", "", ""]);
        assert_eq!(table[2], vec!["", "", "", ""]);
    }

    #[test]
    fn test_fill_gaps_leaves_wide_rows_alone() {
        let mut table = rows(&[
            &["Person", "Project", "Month", "Fraction"],
            &["Alice", "Apollo", "2024-01", "0.5"],
            &["Bob", "Apollo", "2024-02", "1", "note"],
        ]);

        fill_gaps(&mut table, 4);

        assert_eq!(table[1].len(), 4);
        assert_eq!(table[2].len(), 5);
    }
}
