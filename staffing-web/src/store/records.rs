//! Record-level reads and appends on top of [`TableStore`]

use serde::Deserialize;

use super::{Table, TableStore};
use crate::api::StoreError;

const ASSIGNMENT_COLUMNS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
}

/// One row of the Assignments table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub person: String,
    pub project: String,
    /// Free text, by convention `YYYY-MM`
    pub month: String,
    /// Text form of a number, by convention between 0 and 1
    pub fraction: String,
}

impl Assignment {
    /// Column values in stored order
    pub fn into_row(self) -> Vec<String> {
        vec![self.person, self.project, self.month, self.fraction]
    }
}

/// An assignment submission; any field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAssignment {
    pub person: Option<String>,
    pub project: Option<String>,
    pub month: Option<String>,
    pub fraction: Option<String>,
}

impl NewAssignment {
    /// Complete record when all four fields are present and non-empty
    pub fn complete(self) -> Option<Assignment> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Some(Assignment {
            person: present(self.person)?,
            project: present(self.project)?,
            month: present(self.month)?,
            fraction: present(self.fraction)?,
        })
    }
}

/// Data rows of a table, header dropped
async fn data_rows(store: &dyn TableStore, table: Table) -> Result<Vec<Vec<String>>, StoreError> {
    let mut rows = store.fetch_rows(table).await?;
    if !rows.is_empty() {
        rows.remove(0);
    }
    Ok(rows)
}

/// First column of every data row
async fn load_names(store: &dyn TableStore, table: Table) -> Result<Vec<String>, StoreError> {
    Ok(data_rows(store, table)
        .await?
        .into_iter()
        .map(|row| row.into_iter().next().unwrap_or_default())
        .collect())
}

pub async fn load_people(store: &dyn TableStore) -> Result<Vec<Person>, StoreError> {
    let names = load_names(store, Table::People).await?;
    Ok(names.into_iter().map(|name| Person { name }).collect())
}

pub async fn load_projects(store: &dyn TableStore) -> Result<Vec<Project>, StoreError> {
    let names = load_names(store, Table::Projects).await?;
    Ok(names.into_iter().map(|name| Project { name }).collect())
}

/// Read every assignment in store order.
///
/// Each row must have exactly four columns; the first row that does not
/// fails the whole read.
pub async fn load_assignments(store: &dyn TableStore) -> Result<Vec<Assignment>, StoreError> {
    let rows = data_rows(store, Table::Assignments).await?;

    let mut assignments = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        let found = row.len();
        let [person, project, month, fraction]: [String; ASSIGNMENT_COLUMNS] =
            row.try_into().map_err(|_| StoreError::MalformedRow {
                table: Table::Assignments,
                // +2: header is sheet row 1
                row: idx + 2,
                expected: ASSIGNMENT_COLUMNS,
                found,
            })?;

        assignments.push(Assignment {
            person,
            project,
            month,
            fraction,
        });
    }

    Ok(assignments)
}

async fn append(store: &dyn TableStore, table: Table, values: Vec<String>) -> Result<(), StoreError> {
    store
        .append_row(table, values)
        .await
        .map_err(|e| StoreError::write(table, e))
}

/// Append a single-name row; blank names are discarded.
async fn add_name(store: &dyn TableStore, table: Table, name: &str) -> Result<bool, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        log::debug!("Ignoring blank name for '{}'", table);
        return Ok(false);
    }

    append(store, table, vec![name.to_string()]).await?;
    log::info!("Added '{}' to '{}'", name, table);
    Ok(true)
}

/// Append a person. Returns `false` when the trimmed name is empty.
pub async fn add_person(store: &dyn TableStore, name: &str) -> Result<bool, StoreError> {
    add_name(store, Table::People, name).await
}

/// Append a project. Returns `false` when the trimmed name is empty.
pub async fn add_project(store: &dyn TableStore, name: &str) -> Result<bool, StoreError> {
    add_name(store, Table::Projects, name).await
}

/// Append an assignment. Returns `false` when any field is missing or empty.
pub async fn add_assignment(
    store: &dyn TableStore,
    submission: NewAssignment,
) -> Result<bool, StoreError> {
    let Some(assignment) = submission.complete() else {
        log::debug!("Ignoring incomplete assignment submission");
        return Ok(false);
    };

    log::info!(
        "Adding assignment {} -> {} ({}, {})",
        assignment.person,
        assignment.project,
        assignment.month,
        assignment.fraction
    );
    append(store, Table::Assignments, assignment.into_row()).await?;
    Ok(true)
}
