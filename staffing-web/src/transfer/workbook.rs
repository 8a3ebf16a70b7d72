//! Export all three tables to one Excel workbook

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::store::records::{load_assignments, load_people, load_projects};
use crate::store::{Table, TableStore};

pub const WORKBOOK_FILENAME: &str = "assignments.xlsx";
pub const WORKBOOK_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Read every table and render the workbook into memory.
///
/// Sheets are People, Projects, Assignments in that order, each with its
/// header row. All reads happen before anything is written, so a failed
/// read never yields a partial file.
pub async fn export_workbook(store: &dyn TableStore) -> Result<Vec<u8>> {
    let people = load_people(store).await.context("Failed to read People")?;
    let projects = load_projects(store).await.context("Failed to read Projects")?;
    let assignments = load_assignments(store)
        .await
        .context("Failed to read Assignments")?;

    let mut workbook = Workbook::new();

    let people_rows = people.into_iter().map(|p| vec![p.name]);
    write_sheet(workbook.add_worksheet(), Table::People, people_rows)?;

    let project_rows = projects.into_iter().map(|p| vec![p.name]);
    write_sheet(workbook.add_worksheet(), Table::Projects, project_rows)?;

    let assignment_rows = assignments.into_iter().map(|a| a.into_row());
    write_sheet(workbook.add_worksheet(), Table::Assignments, assignment_rows)?;

    let buffer = workbook
        .save_to_buffer()
        .context("Failed to render Excel workbook")?;

    log::info!("Exported workbook ({} bytes)", buffer.len());
    Ok(buffer)
}

/// Header row then one row per record, every cell as a string
fn write_sheet(
    worksheet: &mut Worksheet,
    table: Table,
    rows: impl Iterator<Item = Vec<String>>,
) -> Result<()> {
    worksheet.set_name(table.sheet_name())?;

    for (col, name) in table.header().iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }

    for (row_idx, values) in rows.enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, value) in values.iter().enumerate() {
            worksheet.write_string(row, col as u16, value)?;
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use std::io::Cursor;

    /// Sheet contents as strings, header included
    pub(crate) fn read_sheet(buffer: &[u8], sheet: &str) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(buffer.to_vec())).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::String(s) => s.clone(),
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    fn sheet_names(buffer: &[u8]) -> Vec<String> {
        let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(buffer.to_vec())).unwrap();
        workbook.sheet_names()
    }

    pub(crate) fn seeded_store() -> MemoryStore {
        let store = MemoryStore::with_headers();
        store.push_row(Table::People, &["Alice"]);
        store.push_row(Table::People, &["Bob"]);
        store.push_row(Table::Projects, &["Apollo"]);
        store.push_row(Table::Assignments, &["Alice", "Apollo", "2024-01", "0.5"]);
        store.push_row(Table::Assignments, &["Bob", "Apollo", "2024-02", "1"]);
        store.push_row(Table::Assignments, &["Alice", "Apollo", "2024-02", "0.25"]);
        store
    }

    #[tokio::test]
    async fn test_sheets_in_contract_order() {
        let buffer = export_workbook(&seeded_store()).await.unwrap();
        assert_eq!(sheet_names(&buffer), vec!["People", "Projects", "Assignments"]);
    }

    #[tokio::test]
    async fn test_sheet_contents_match_tables() {
        let store = seeded_store();
        let buffer = export_workbook(&store).await.unwrap();

        for table in Table::ALL {
            let sheet = read_sheet(&buffer, table.sheet_name());
            let stored = store.rows(table);
            // Header row plus one row per record
            assert_eq!(sheet.len(), stored.len(), "row count of {}", table);
            assert_eq!(sheet, stored, "cells of {}", table);
        }
    }

    #[tokio::test]
    async fn test_empty_tables_still_get_headers() {
        let buffer = export_workbook(&MemoryStore::with_headers()).await.unwrap();

        assert_eq!(read_sheet(&buffer, "People"), vec![vec!["Name".to_string()]]);
        assert_eq!(
            read_sheet(&buffer, "Assignments"),
            vec![vec![
                "Person".to_string(),
                "Project".to_string(),
                "Month".to_string(),
                "Fraction".to_string()
            ]]
        );
    }

    #[tokio::test]
    async fn test_fraction_stays_text() {
        let buffer = export_workbook(&seeded_store()).await.unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(buffer)).unwrap();
        let range = workbook.worksheet_range("Assignments").unwrap();
        assert_eq!(range.get((1, 3)), Some(&Data::String("0.5".to_string())));
    }

    #[tokio::test]
    async fn test_read_failure_aborts_export() {
        let store = seeded_store();
        store.push_row(Table::Assignments, &["Eve", "Apollo", "2024-03", "0.1", "extra"]);

        let err = export_workbook(&store).await.unwrap_err();
        assert!(err.to_string().contains("Assignments"));
    }

    #[tokio::test]
    async fn test_missing_table_aborts_export() {
        let store = seeded_store();
        store.remove_table(Table::Projects);

        assert!(export_workbook(&store).await.is_err());
    }
}
