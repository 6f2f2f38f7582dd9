//! Interface to the storage collaborator.
//!
//! The engine only loads a whole grid once and then reports individual
//! cell changes, layout changes and title changes. How they are stored is
//! up to the implementation; [`MemoryStore`] keeps them in memory and
//! [`FileStore`](crate::saving::FileStore) writes gzip files.

use crate::cell::{CellContent, CellKey};
use crate::error::{EngineError, Result};
use crate::layout::{ColumnSize, RowSize};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Everything stored for one grid. Formulas are kept verbatim.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct GridDocument {
    pub title: String,
    pub cells: Vec<(CellKey, CellContent)>,
    pub column_sizes: Vec<ColumnSize>,
    pub row_sizes: Vec<RowSize>,
    pub updated_at: DateTime<Utc>,
}

impl GridDocument {
    pub fn new(title: impl Into<String>) -> Self {
        GridDocument {
            title: title.into(),
            cells: Vec::new(),
            column_sizes: Vec::new(),
            row_sizes: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Inserts or replaces one cell, keeping first-insertion order.
    pub fn upsert_cell(&mut self, key: CellKey, content: &CellContent) {
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = content.clone(),
            None => self.cells.push((key, content.clone())),
        }
        self.updated_at = Utc::now();
    }
}

pub trait Persistence: Send {
    /// `Ok(None)` when nothing is stored for `grid_id` yet.
    fn load(&mut self, grid_id: &str) -> Result<Option<GridDocument>>;

    fn save_cell(&mut self, grid_id: &str, key: CellKey, content: &CellContent) -> Result<()>;

    fn save_layout(&mut self, grid_id: &str, columns: &[ColumnSize], rows: &[RowSize]) -> Result<()>;

    fn rename(&mut self, grid_id: &str, title: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    documents: HashMap<String, GridDocument>,
    cell_saves: usize,
    layout_saves: usize,
    fail_writes: bool,
}

/// In-memory store. Clones share the same data, so a caller can keep a
/// handle after giving one to a controller.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(grid_id: &str, document: GridDocument) -> Self {
        let store = Self::new();
        store.lock().documents.insert(grid_id.to_string(), document);
        store
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn document(&self, grid_id: &str) -> Option<GridDocument> {
        self.lock().documents.get(grid_id).cloned()
    }

    pub fn cell_saves(&self) -> usize {
        self.lock().cell_saves
    }

    pub fn layout_saves(&self) -> usize {
        self.lock().layout_saves
    }

    /// Makes every later write fail with an I/O error.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn write<F>(&self, grid_id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut MemoryInner, &str),
    {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(EngineError::Io(std::io::Error::other("memory store is read-only")));
        }
        f(&mut *inner, grid_id);
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn load(&mut self, grid_id: &str) -> Result<Option<GridDocument>> {
        Ok(self.document(grid_id))
    }

    fn save_cell(&mut self, grid_id: &str, key: CellKey, content: &CellContent) -> Result<()> {
        self.write(grid_id, |inner, id| {
            inner.cell_saves += 1;
            inner
                .documents
                .entry(id.to_string())
                .or_insert_with(|| GridDocument::new(""))
                .upsert_cell(key, content);
        })
    }

    fn save_layout(&mut self, grid_id: &str, columns: &[ColumnSize], rows: &[RowSize]) -> Result<()> {
        self.write(grid_id, |inner, id| {
            inner.layout_saves += 1;
            let doc = inner
                .documents
                .entry(id.to_string())
                .or_insert_with(|| GridDocument::new(""));
            doc.column_sizes = columns.to_vec();
            doc.row_sizes = rows.to_vec();
            doc.updated_at = Utc::now();
        })
    }

    fn rename(&mut self, grid_id: &str, title: &str) -> Result<()> {
        self.write(grid_id, |inner, id| {
            let doc = inner
                .documents
                .entry(id.to_string())
                .or_insert_with(|| GridDocument::new(""));
            doc.title = title.to_string();
            doc.updated_at = Utc::now();
        })
    }
}
