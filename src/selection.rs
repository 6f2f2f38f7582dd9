use crate::address::{CellPosition, CellRange};
use serde::{Deserialize, Serialize};

/// Anchor/focus pair. `start` and `end` are not ordered; use
/// [`Selection::bounds`] to get the rectangle.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: CellPosition,
    pub end: CellPosition,
}

impl Selection {
    pub fn single(pos: CellPosition) -> Self {
        Selection { start: pos, end: pos }
    }

    pub fn new(start: CellPosition, end: CellPosition) -> Self {
        Selection { start, end }
    }

    pub fn bounds(&self) -> CellRange {
        CellRange::from_corners(self.start, self.end)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.bounds().contains(row, col)
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Active cell, selected rectangle and the editing flag.
#[derive(Clone, Debug, Default)]
pub struct SelectionModel {
    selection: Selection,
    editing: bool,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The cell keyboard input goes to.
    pub fn active(&self) -> CellPosition {
        self.selection.start
    }

    pub fn select_cell(&mut self, row: u32, col: u32) {
        self.selection = Selection::single(CellPosition::new(row, col));
    }

    pub fn extend_selection(&mut self, to: CellPosition) {
        self.selection.end = to;
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.selection.contains(row, col)
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
    }

    pub fn stop_editing(&mut self) {
        self.editing = false;
    }

    /// Moves the active cell one step and collapses the selection onto it.
    /// Clamped at zero; upper bounds are the controller's concern.
    pub fn move_active(&mut self, direction: Direction) -> CellPosition {
        let next = step(self.active(), direction);
        self.select_cell(next.row, next.col);
        next
    }

    /// Moves the focus corner one step, keeping the anchor.
    pub fn extend_active(&mut self, direction: Direction) -> CellPosition {
        let next = step(self.selection.end, direction);
        self.extend_selection(next);
        next
    }
}

fn step(pos: CellPosition, direction: Direction) -> CellPosition {
    match direction {
        Direction::Up => CellPosition::new(pos.row.saturating_sub(1), pos.col),
        Direction::Down => CellPosition::new(pos.row.saturating_add(1), pos.col),
        Direction::Left => CellPosition::new(pos.row, pos.col.saturating_sub(1)),
        Direction::Right => CellPosition::new(pos.row, pos.col.saturating_add(1)),
    }
}
