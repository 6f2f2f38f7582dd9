//! Grid interaction controller.
//!
//! Turns pointer, keyboard and resize events into changes of the
//! selection, the cell store and the layout. Every user action that
//! changes cells ends in exactly one history push followed by one save
//! call per changed cell. Save failures are logged and otherwise ignored;
//! the in-memory store stays the source of truth for the session.

use crate::address::{self, CellPosition};
use crate::cell::{CellContent, CellKey, CellStyle};
use crate::clipboard::{self, Clipboard};
use crate::config::GridConfig;
use crate::error::Result;
use crate::history::History;
use crate::layout::GridLayout;
use crate::persistence::Persistence;
use crate::recalc;
use crate::selection::{Direction, Selection, SelectionModel};
use crate::spreadsheet::Spreadsheet;
use log::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Tab,
    Escape,
    Delete,
    Backspace,
    F2,
    Char(char),
}

/// `ctrl` covers both Control and Command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false };
    pub const CTRL: Modifiers = Modifiers { shift: false, ctrl: true };
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Drag {
    Idle,
    Selecting,
    Column { index: u32, initial: f64, origin: f64 },
    Row { index: u32, initial: f64, origin: f64 },
}

pub struct GridController {
    config: GridConfig,
    grid_id: String,
    title: String,
    sheet: Spreadsheet,
    selection: SelectionModel,
    edit_buffer: String,
    history: History,
    clipboard: Clipboard,
    layout: GridLayout,
    drag: Drag,
    persistence: Box<dyn Persistence>,
}

impl GridController {
    /// Loads `grid_id` from the collaborator; a grid with nothing stored
    /// starts empty. The loaded state is the history baseline.
    pub fn new<P>(config: GridConfig, grid_id: &str, persistence: P) -> Result<Self>
    where
        P: Persistence + 'static,
    {
        let mut persistence: Box<dyn Persistence> = Box::new(persistence);
        let mut layout = GridLayout::new(&config);
        let mut title = String::new();

        let mut sheet = match persistence.load(grid_id)? {
            Some(document) => {
                info!("loaded grid '{}' with {} cells", grid_id, document.cells.len());
                layout = layout.with_overrides(&document.column_sizes, &document.row_sizes);
                title = document.title;
                Spreadsheet::from_entries(document.cells)
            }
            None => {
                info!("grid '{}' has no stored data, starting empty", grid_id);
                Spreadsheet::new()
            }
        };
        recalc::recalculate(&mut sheet, config.recalc_mode, config.range_mode);

        Ok(GridController {
            history: History::with_limit(sheet.clone(), config.history_limit),
            config,
            grid_id: grid_id.to_string(),
            title,
            sheet,
            selection: SelectionModel::new(),
            edit_buffer: String::new(),
            clipboard: Clipboard::new(),
            layout,
            drag: Drag::Idle,
            persistence,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sheet(&self) -> &Spreadsheet {
        &self.sheet
    }

    pub fn cell(&self, row: u32, col: u32) -> CellContent {
        self.sheet.content(CellPosition::new(row, col))
    }

    pub fn value(&self, row: u32, col: u32) -> &str {
        self.sheet.value(row, col)
    }

    pub fn selection(&self) -> Selection {
        self.selection.selection()
    }

    pub fn active(&self) -> CellPosition {
        self.selection.active()
    }

    pub fn is_selected(&self, row: u32, col: u32) -> bool {
        self.selection.contains(row, col)
    }

    pub fn is_editing(&self) -> bool {
        self.selection.is_editing()
    }

    pub fn edit_buffer(&self) -> &str {
        &self.edit_buffer
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn column_header(&self, col: u32) -> String {
        address::col_to_letters(col)
    }

    /// "A1" or "A1:B3" for the current selection.
    pub fn range_label(&self) -> String {
        clipboard::range_label(&self.selection.selection())
    }

    fn in_grid(&self, row: u32, col: u32) -> bool {
        row < self.config.rows && col < self.config.cols
    }

    fn clamp(&self, pos: CellPosition) -> CellPosition {
        CellPosition::new(
            pos.row.min(self.config.rows.saturating_sub(1)),
            pos.col.min(self.config.cols.saturating_sub(1)),
        )
    }

    pub fn select_cell(&mut self, row: u32, col: u32) {
        let pos = self.clamp(CellPosition::new(row, col));
        self.selection.stop_editing();
        self.selection.select_cell(pos.row, pos.col);
    }

    pub fn extend_selection(&mut self, row: u32, col: u32) {
        let pos = self.clamp(CellPosition::new(row, col));
        self.selection.extend_selection(pos);
    }

    // --- editing ---------------------------------------------------------

    /// Starts editing the active cell with its current input (formula text
    /// for formula cells).
    pub fn start_editing(&mut self) {
        let cell = self.sheet.content(self.active());
        self.edit_buffer = cell.formula.unwrap_or(cell.value);
        self.selection.start_editing();
    }

    /// Replaces the edit buffer, for hosts that own the text field.
    pub fn set_edit_buffer(&mut self, text: &str) {
        self.edit_buffer = text.to_string();
    }

    /// Leaves edit mode without writing anything.
    pub fn stop_editing(&mut self) {
        self.selection.stop_editing();
        self.edit_buffer.clear();
    }

    /// Writes the edit buffer to the active cell and leaves edit mode.
    pub fn commit_edit(&mut self) -> bool {
        let input = std::mem::take(&mut self.edit_buffer);
        let active = self.active();
        self.selection.stop_editing();
        self.set_cell_input(active.row, active.col, &input)
    }

    /// Applies user input to one cell. Returns false when the cell is
    /// outside the grid or the input changes nothing.
    pub fn set_cell_input(&mut self, row: u32, col: u32, input: &str) -> bool {
        if !self.in_grid(row, col) {
            return false;
        }
        let key = CellPosition::new(row, col);
        let before = self.sheet.content(key);
        let unchanged = match before.formula.as_deref() {
            Some(formula) => formula == input,
            None => !input.starts_with('=') && before.value == input,
        };
        if unchanged {
            return false;
        }
        self.sheet.set_input(key, input);
        self.commit(vec![key]);
        true
    }

    /// Shallow-merges `patch` into the style of every selected cell.
    /// Returns false when no cell's style changes.
    pub fn apply_style(&mut self, patch: &CellStyle) -> bool {
        let bounds = self.selection.selection().bounds();
        let keys: Vec<CellKey> = bounds
            .cells()
            .filter(|k| self.in_grid(k.row, k.col))
            .filter(|k| {
                let current = self.sheet.content(*k).style_or_default();
                let mut merged = current.clone();
                merged.merge(patch);
                merged != current
            })
            .collect();
        if keys.is_empty() {
            return false;
        }
        for &key in &keys {
            self.sheet.merge_style(key, patch);
        }
        self.commit(keys);
        true
    }

    /// Clears every stored cell in the selection to `{ value: "" }`.
    pub fn clear_selection(&mut self) -> bool {
        let bounds = self.selection.selection().bounds();
        let keys: Vec<CellKey> = bounds.cells().filter(|k| self.sheet.get(*k).is_some()).collect();
        if keys.is_empty() {
            return false;
        }
        for &key in &keys {
            self.sheet.clear(key);
        }
        self.commit(keys);
        true
    }

    // --- clipboard -------------------------------------------------------

    /// Copies the selection; returns its range label.
    pub fn copy(&mut self) -> String {
        let selection = self.selection.selection();
        self.clipboard.copy(&self.sheet, selection);
        debug!("copied {}", clipboard::range_label(&selection));
        clipboard::range_label(&selection)
    }

    /// Cuts the selection as one history entry; returns its range label.
    pub fn cut(&mut self) -> String {
        let selection = self.selection.selection();
        let cleared = self.clipboard.cut(&mut self.sheet, selection);
        if !cleared.is_empty() {
            self.commit(cleared);
        }
        clipboard::range_label(&selection)
    }

    /// Pastes at the top-left of the selection, clamped to the grid, and
    /// selects the pasted rectangle. Returns its label, or `None` when the
    /// clipboard is empty.
    pub fn paste(&mut self) -> Option<String> {
        let anchor = self.selection.selection().bounds().start();
        let outcome = self.clipboard.paste(
            &mut self.sheet,
            anchor,
            Some((self.config.rows, self.config.cols)),
        )?;
        self.selection.set_selection(outcome.selection);
        if !outcome.written.is_empty() {
            self.commit(outcome.written);
        }
        Some(clipboard::range_label(&outcome.selection))
    }

    // --- history ---------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    fn restore(&mut self, snapshot: Spreadsheet) {
        let changed = self.sheet.diff_keys(&snapshot);
        self.sheet = snapshot;
        self.persist(&changed);
    }

    /// Recalculates, records one history entry and saves every touched key.
    fn commit(&mut self, mut touched: Vec<CellKey>) {
        let recalculated =
            recalc::recalculate(&mut self.sheet, self.config.recalc_mode, self.config.range_mode);
        touched.extend(recalculated);
        touched.sort();
        touched.dedup();
        self.history.push(self.sheet.clone());
        self.persist(&touched);
    }

    fn persist(&mut self, keys: &[CellKey]) {
        for &key in keys {
            let content = self.sheet.content(key);
            if let Err(e) = self.persistence.save_cell(&self.grid_id, key, &content) {
                warn!("failed to save {} in grid '{}': {}", key, self.grid_id, e);
            }
        }
    }

    pub fn rename(&mut self, title: &str) {
        self.title = title.to_string();
        if let Err(e) = self.persistence.rename(&self.grid_id, title) {
            warn!("failed to rename grid '{}': {}", self.grid_id, e);
        }
    }

    // --- pointer ---------------------------------------------------------

    /// Cell under a pointer offset measured from the grid origin.
    pub fn cell_at(&self, x: f64, y: f64) -> CellPosition {
        CellPosition::new(
            self.layout.row_at(y, self.config.rows),
            self.layout.column_at(x, self.config.cols),
        )
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, shift: bool) {
        let pos = self.cell_at(x, y);
        if shift {
            self.selection.extend_selection(pos);
        } else {
            self.select_cell(pos.row, pos.col);
        }
        self.drag = Drag::Selecting;
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        match self.drag {
            Drag::Idle => {}
            Drag::Selecting => {
                let pos = self.cell_at(x, y);
                self.selection.extend_selection(pos);
            }
            Drag::Column { .. } => self.drag_resize(x),
            Drag::Row { .. } => self.drag_resize(y),
        }
    }

    pub fn pointer_up(&mut self) {
        match self.drag {
            Drag::Column { .. } | Drag::Row { .. } => self.end_resize(),
            _ => self.drag = Drag::Idle,
        }
    }

    // --- resize ----------------------------------------------------------

    pub fn begin_column_resize(&mut self, index: u32, pointer_x: f64) {
        self.drag = Drag::Column {
            index,
            initial: self.layout.column_width(index),
            origin: pointer_x,
        };
    }

    pub fn begin_row_resize(&mut self, index: u32, pointer_y: f64) {
        self.drag = Drag::Row {
            index,
            initial: self.layout.row_height(index),
            origin: pointer_y,
        };
    }

    /// `pointer` is the coordinate along the axis being resized.
    pub fn drag_resize(&mut self, pointer: f64) {
        match self.drag {
            Drag::Column { index, initial, origin } => {
                self.layout.resize_column(index, initial, pointer - origin);
            }
            Drag::Row { index, initial, origin } => {
                self.layout.resize_row(index, initial, pointer - origin);
            }
            _ => {}
        }
    }

    pub fn end_resize(&mut self) {
        if matches!(self.drag, Drag::Column { .. } | Drag::Row { .. }) {
            let columns = self.layout.column_sizes();
            let rows = self.layout.row_sizes();
            if let Err(e) = self.persistence.save_layout(&self.grid_id, &columns, &rows) {
                warn!("failed to save layout of grid '{}': {}", self.grid_id, e);
            }
        }
        self.drag = Drag::Idle;
    }

    // --- keyboard --------------------------------------------------------

    /// Handles a key press; returns whether the key was consumed.
    pub fn key_down(&mut self, key: Key, mods: Modifiers) -> bool {
        if self.selection.is_editing() {
            return self.key_down_editing(key, mods);
        }

        if mods.ctrl {
            return match key {
                Key::Char(c) => match c.to_ascii_lowercase() {
                    'c' => {
                        self.copy();
                        true
                    }
                    'x' => {
                        self.cut();
                        true
                    }
                    'v' => self.paste().is_some(),
                    'z' if mods.shift => self.redo(),
                    'z' => self.undo(),
                    'y' => self.redo(),
                    _ => false,
                },
                _ => false,
            };
        }

        match key {
            Key::ArrowUp => self.arrow(Direction::Up, mods.shift),
            Key::ArrowDown => self.arrow(Direction::Down, mods.shift),
            Key::ArrowLeft => self.arrow(Direction::Left, mods.shift),
            Key::ArrowRight => self.arrow(Direction::Right, mods.shift),
            Key::Enter => self.arrow(Direction::Down, false),
            Key::Tab if mods.shift => self.arrow(Direction::Left, false),
            Key::Tab => self.arrow(Direction::Right, false),
            Key::Delete | Key::Backspace => {
                self.clear_selection();
            }
            Key::F2 => self.start_editing(),
            Key::Char(c) => {
                self.selection.start_editing();
                self.edit_buffer = c.to_string();
            }
            Key::Escape => return false,
        }
        true
    }

    fn key_down_editing(&mut self, key: Key, mods: Modifiers) -> bool {
        match key {
            Key::Enter => {
                self.commit_edit();
                self.arrow(Direction::Down, false);
            }
            Key::Tab => {
                self.commit_edit();
                let dir = if mods.shift { Direction::Left } else { Direction::Right };
                self.arrow(dir, false);
            }
            Key::Escape => self.stop_editing(),
            Key::Backspace => {
                self.edit_buffer.pop();
            }
            Key::Char(c) => self.edit_buffer.push(c),
            _ => return false,
        }
        true
    }

    fn arrow(&mut self, direction: Direction, extend: bool) {
        if extend {
            let next = self.selection.extend_active(direction);
            let clamped = self.clamp(next);
            self.selection.extend_selection(clamped);
        } else {
            let next = self.selection.move_active(direction);
            let clamped = self.clamp(next);
            self.selection.select_cell(clamped.row, clamped.col);
        }
    }
}
