//! Import assignments from CSV

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};

use crate::store::records::{NewAssignment, add_assignment};
use crate::store::TableStore;

/// Counts from one import, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub appended: usize,
    pub skipped: usize,
}

/// Positions of the four assignment columns in the header
#[derive(Debug, Default)]
struct ColumnIndices {
    person: Option<usize>,
    project: Option<usize>,
    month: Option<usize>,
    fraction: Option<usize>,
}

impl ColumnIndices {
    fn from_header(header: &StringRecord) -> Self {
        // A repeated column name resolves to its last occurrence
        let position = |name: &str| {
            header
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == name)
                .map(|(idx, _)| idx)
                .last()
        };
        Self {
            person: position("Person"),
            project: position("Project"),
            month: position("Month"),
            fraction: position("Fraction"),
        }
    }

    fn is_complete(&self) -> bool {
        self.person.is_some()
            && self.project.is_some()
            && self.month.is_some()
            && self.fraction.is_some()
    }

    fn extract(&self, record: &StringRecord) -> NewAssignment {
        let cell = |col: Option<usize>| col.and_then(|c| record.get(c)).map(str::to_string);
        NewAssignment {
            person: cell(self.person),
            project: cell(self.project),
            month: cell(self.month),
            fraction: cell(self.fraction),
        }
    }
}

/// Append every complete row of a CSV document to Assignments.
///
/// The header must name `Person`, `Project`, `Month` and `Fraction` (exact
/// case, any order, other columns ignored). Rows with any of the four empty
/// or missing are skipped. Rows are appended one at a time; an error stops
/// the import but keeps whatever was already appended.
pub async fn import_assignments(store: &dyn TableStore, data: &[u8]) -> Result<ImportOutcome> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let header = reader.headers().context("Failed to read CSV header")?.clone();
    let columns = ColumnIndices::from_header(&header);
    if !columns.is_complete() {
        log::warn!(
            "CSV header is missing assignment columns (found: {}); no rows will be imported",
            header.iter().collect::<Vec<_>>().join(", ")
        );
    }

    let mut outcome = ImportOutcome::default();
    for (idx, record) in reader.records().enumerate() {
        // +2: header is line 1
        let record = record.with_context(|| format!("Failed to parse CSV row {}", idx + 2))?;

        let appended = add_assignment(store, columns.extract(&record))
            .await
            .with_context(|| format!("Failed to import CSV row {}", idx + 2))?;
        if appended {
            outcome.appended += 1;
        } else {
            outcome.skipped += 1;
        }
    }

    log::info!(
        "CSV import finished: {} appended, {} skipped",
        outcome.appended,
        outcome.skipped
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Table;
    use crate::store::memory::MemoryStore;
    use crate::store::records::load_assignments;
    use crate::transfer::workbook::export_workbook;
    use crate::transfer::workbook::tests::{read_sheet, seeded_store};

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_skips_incomplete_rows() {
        let store = MemoryStore::with_headers();
        let csv = b"Person,Project,Month,Fraction\nAlice,Apollo,2024-01,0.5\nBob,,2024-02,\n";

        let outcome = import_assignments(&store, csv).await.unwrap();

        assert_eq!(outcome, ImportOutcome { appended: 1, skipped: 1 });
        let rows = store.rows(Table::Assignments);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], row(&["Alice", "Apollo", "2024-01", "0.5"]));
    }

    #[tokio::test]
    async fn test_columns_by_name_in_any_order() {
        let store = MemoryStore::with_headers();
        let csv = "Fraction,Notes,Month,Person,Project\n0.3,ignored,2024-05,Carol,Gemini\n";

        import_assignments(&store, csv.as_bytes()).await.unwrap();

        assert_eq!(
            store.rows(Table::Assignments)[1],
            row(&["Carol", "Gemini", "2024-05", "0.3"])
        );
    }

    #[tokio::test]
    async fn test_repeated_column_uses_last_occurrence() {
        let store = MemoryStore::with_headers();
        let csv = "Person,Project,Month,Fraction,Month\nAlice,Apollo,draft,0.5,2024-07\n";

        import_assignments(&store, csv.as_bytes()).await.unwrap();

        assert_eq!(
            store.rows(Table::Assignments)[1],
            row(&["Alice", "Apollo", "2024-07", "0.5"])
        );
    }

    #[tokio::test]
    async fn test_short_rows_are_skipped() {
        let store = MemoryStore::with_headers();
        let csv = "Person,Project,Month,Fraction\nDave,Apollo\nErin,Apollo,2024-06,1\n";

        let outcome = import_assignments(&store, csv.as_bytes()).await.unwrap();

        assert_eq!(outcome, ImportOutcome { appended: 1, skipped: 1 });
        assert_eq!(store.rows(Table::Assignments)[1][0], "Erin");
    }

    #[tokio::test]
    async fn test_header_names_are_case_sensitive() {
        let store = MemoryStore::with_headers();
        let csv = "person,project,month,fraction\nAlice,Apollo,2024-01,0.5\n";

        let outcome = import_assignments(&store, csv.as_bytes()).await.unwrap();

        assert_eq!(outcome.appended, 0);
        assert_eq!(store.rows(Table::Assignments).len(), 1);
    }

    #[tokio::test]
    async fn test_quoted_values_keep_commas() {
        let store = MemoryStore::with_headers();
        let csv = "Person,Project,Month,Fraction\n\"Smith, Jane\",\"Apollo, phase 2\",2024-07,0.75\n";

        import_assignments(&store, csv.as_bytes()).await.unwrap();

        let assignments = load_assignments(&store).await.unwrap();
        assert_eq!(assignments[0].person, "Smith, Jane");
        assert_eq!(assignments[0].project, "Apollo, phase 2");
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_rows() {
        let store = MemoryStore::with_headers();
        // Second data row is not valid UTF-8
        let mut csv = b"Person,Project,Month,Fraction\nAlice,Apollo,2024-01,0.5\n".to_vec();
        csv.extend_from_slice(b"B\xffb,Apollo,2024-02,1\n");

        let err = import_assignments(&store, &csv).await.unwrap_err();

        assert!(err.to_string().contains("row 3"));
        assert_eq!(store.rows(Table::Assignments).len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_stops_import() {
        let store = MemoryStore::with_headers();
        store.fail_appends();
        let csv = "Person,Project,Month,Fraction\nAlice,Apollo,2024-01,0.5\n";

        assert!(import_assignments(&store, csv.as_bytes()).await.is_err());
    }

    #[tokio::test]
    async fn test_export_then_import_round_trip() {
        let source = seeded_store();
        let before = load_assignments(&source).await.unwrap();

        let buffer = export_workbook(&source).await.unwrap();
        let sheet = read_sheet(&buffer, "Assignments");

        let mut writer = csv::Writer::from_writer(Vec::new());
        for values in &sheet {
            writer.write_record(values).unwrap();
        }
        let csv = writer.into_inner().unwrap();

        let target = MemoryStore::with_headers();
        let outcome = import_assignments(&target, &csv).await.unwrap();

        assert_eq!(outcome.appended, before.len());
        assert_eq!(load_assignments(&target).await.unwrap(), before);
    }
}
