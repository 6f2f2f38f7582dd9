use crate::spreadsheet::Spreadsheet;
use log::debug;

/// Linear undo/redo over full cell store snapshots.
///
/// `cursor` always points at the entry currently on screen and stays in
/// `0..entries.len()`. Pushing after an undo discards the redo tail.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<Spreadsheet>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Starts from a single baseline entry (empty or freshly loaded grid).
    pub fn new(baseline: Spreadsheet) -> Self {
        Self::with_limit(baseline, 0)
    }

    /// `limit` caps the number of retained entries; 0 means unbounded.
    pub fn with_limit(baseline: Spreadsheet, limit: usize) -> Self {
        History {
            entries: vec![baseline],
            cursor: 0,
            limit,
        }
    }

    pub fn push(&mut self, snapshot: Spreadsheet) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if self.limit > 0 && self.entries.len() > self.limit.max(1) {
            let excess = self.entries.len() - self.limit.max(1);
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        debug!("history push: {} entries", self.entries.len());
    }

    pub fn undo(&mut self) -> Option<&Spreadsheet> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        debug!("undo to entry {}", self.cursor);
        self.entries.get(self.cursor)
    }

    pub fn redo(&mut self) -> Option<&Spreadsheet> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        debug!("redo to entry {}", self.cursor);
        self.entries.get(self.cursor)
    }

    pub fn current(&self) -> &Spreadsheet {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
