/*!
# Spreadsheet Grid Engine

The in-memory core of an online spreadsheet: cells, formulas, selection,
undo/redo and clipboard, driven by a controller that turns pointer and
keyboard events into edits.

## Architecture

### Model
- **address**: A1 references, column letters and range lists ("A1:B3, C5")
- **cell**: cell content (value, formula, style) and style merging
- **spreadsheet**: the cell store, an insertion-ordered map from position to content

### Evaluation
- **formula**: evaluates `=SUM(A1:A3)` style calls and `=A1*(B1+2)` arithmetic;
  failures become error values such as `#DIV/0!`, never panics
- **recalc**: recalculates every formula cell after each edit, either in
  dependency order (cycles become `#REF!`) or in plain store order

### Interaction
- **selection**: active cell, anchor/focus rectangle and the editing flag
- **history**: linear undo/redo over full store snapshots
- **clipboard**: single-slot copy/cut/paste of rectangles
- **layout**: column widths and row heights with sparse overrides
- **controller**: wires everything to pointer, keyboard and resize events

### Persistence
- **persistence**: the load/save/rename interface the host implements,
  plus an in-memory implementation
- **saving**: gzip + bincode file implementation

## Example

```
use spreadsheet_engine::{GridConfig, GridController, MemoryStore};

let mut grid = GridController::new(GridConfig::default(), "budget", MemoryStore::new()).unwrap();
grid.set_cell_input(0, 0, "10");
grid.set_cell_input(1, 0, "5");
grid.set_cell_input(2, 0, "=SUM(A1:A2)");
assert_eq!(grid.value(2, 0), "15");

grid.undo();
assert_eq!(grid.value(2, 0), "");
```
*/

pub mod address;
pub mod cell;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod formula;
pub mod history;
pub mod layout;
pub mod persistence;
pub mod recalc;
pub mod saving;
pub mod selection;
pub mod spreadsheet;

/// Re-export the main types so callers can use them from the crate root
pub use address::{CellPosition, CellRange, RangeMode};
pub use cell::*;
pub use clipboard::{Clipboard, ClipboardSnapshot, PasteOutcome};
pub use config::GridConfig;
pub use controller::{GridController, Key, Modifiers};
pub use error::{EngineError, Result};
pub use formula::{ErrorSentinel, FormulaValue, evaluate};
pub use history::History;
pub use layout::{ColumnSize, GridLayout, RowSize};
pub use persistence::{GridDocument, MemoryStore, Persistence};
pub use recalc::RecalcMode;
pub use saving::FileStore;
pub use selection::{Direction, Selection, SelectionModel};
pub use spreadsheet::Spreadsheet;
