//! In-memory [`TableStore`] for tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{Table, TableStore, fill_gaps};
use crate::api::StoreError;

#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<HashMap<Table, Vec<Vec<String>>>>,
    fail_appends: AtomicBool,
}

impl MemoryStore {
    /// Store with three empty worksheets
    pub fn new() -> Self {
        let tables = Table::ALL.iter().map(|t| (*t, Vec::new())).collect();
        Self {
            tables: Mutex::new(tables),
            fail_appends: AtomicBool::new(false),
        }
    }

    /// Store whose worksheets already carry their header rows
    pub fn with_headers() -> Self {
        let store = Self::new();
        for table in Table::ALL {
            store.push_row(table, table.header());
        }
        store
    }

    pub fn push_row(&self, table: Table, values: &[&str]) {
        self.tables
            .lock()
            .unwrap()
            .entry(table)
            .or_default()
            .push(values.iter().map(|v| v.to_string()).collect());
    }

    /// Raw rows, header included, exactly as stored
    pub fn rows(&self, table: Table) -> Vec<Vec<String>> {
        self.tables
            .lock()
            .unwrap()
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop a worksheet so reads and appends report it missing
    pub fn remove_table(&self, table: Table) {
        self.tables.lock().unwrap().remove(&table);
    }

    /// Make every subsequent append fail
    pub fn fail_appends(&self) {
        self.fail_appends.store(true, Ordering::SeqCst);
    }

    fn missing(table: Table) -> StoreError {
        StoreError::NotFound {
            what: format!("worksheet '{}'", table),
        }
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn fetch_rows(&self, table: Table) -> Result<Vec<Vec<String>>, StoreError> {
        let mut rows = self
            .tables
            .lock()
            .unwrap()
            .get(&table)
            .cloned()
            .ok_or_else(|| Self::missing(table))?;
        fill_gaps(&mut rows, table.header().len());
        Ok(rows)
    }

    async fn append_row(&self, table: Table, values: Vec<String>) -> Result<(), StoreError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Transport {
                message: "connection reset".to_string(),
            });
        }

        self.tables
            .lock()
            .unwrap()
            .get_mut(&table)
            .ok_or_else(|| Self::missing(table))?
            .push(values);
        Ok(())
    }
}
