//! Terminal core
//!
//! The platform-independent screen model:
//! - grid primitives (cells, lines, buffers)
//! - cursor, margins, tab stops, and modes
//! - scrollback and viewport management
//! - graphics rendition (SGR) and color resolution
//! - the command interpreter ([`Screen`])

pub mod buffer;
pub mod cell;
pub mod charset;
pub mod color;
pub mod cursor;
pub mod hyperlink;
pub mod line;
pub mod margin;
pub mod modes;
pub mod screen;
pub mod scrollback;
pub mod snapshot;

pub use buffer::{BufferType, ScreenBuffer};
pub use cell::{Cell, GraphicsAttributes, StyleFlags};
pub use charset::{Charset, CharsetState, CharsetTable};
pub use color::{Color, ColorProfile, ColorTarget, DynamicColorName, RgbColor};
pub use cursor::{Cursor, CursorDisplay, CursorShape, SavedState};
pub use hyperlink::{Hyperlink, HyperlinkId, HyperlinkRegistry};
pub use line::Line;
pub use margin::{Margin, Span};
pub use modes::{Mode, ModeSet, MouseProtocol, MouseTransport, MouseWheelMode};
pub use screen::Screen;
pub use scrollback::Scrollback;
pub use snapshot::{CompactSnapshot, Snapshot};

use serde::{Deserialize, Serialize};

/// A 1-based screen position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Coordinate {
    pub row: usize,
    pub column: usize,
}

impl Coordinate {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Coordinate::new(1, 1)
    }
}

/// Screen dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub columns: usize,
    pub rows: usize,
}

impl WindowSize {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }
}

/// Default distance between tab stops.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Tab stop set.
///
/// HTS adds explicit stops; while any explicit stop exists the explicit set
/// is authoritative, otherwise stops fall at every `tab_width` columns.
/// Columns are 1-based throughout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabStops {
    stops: Vec<usize>,
    tab_width: usize,
}

impl Default for TabStops {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}

impl TabStops {
    pub fn new(tab_width: usize) -> Self {
        Self {
            stops: Vec::new(),
            tab_width: tab_width.max(1),
        }
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, tab_width: usize) {
        self.tab_width = tab_width.max(1);
    }

    /// Add an explicit stop at `column`.
    pub fn set(&mut self, column: usize) {
        if let Err(slot) = self.stops.binary_search(&column) {
            self.stops.insert(slot, column);
        }
    }

    /// Remove the explicit stop at `column`, if any.
    pub fn clear(&mut self, column: usize) {
        if let Ok(slot) = self.stops.binary_search(&column) {
            self.stops.remove(slot);
        }
    }

    /// Drop all explicit stops; subsequent tabbing uses `tab_width`
    /// multiples again.
    pub fn clear_all(&mut self) {
        self.stops.clear();
    }

    /// Drop explicit stops beyond `columns` (after a narrowing resize).
    pub fn truncate(&mut self, columns: usize) {
        self.stops.retain(|&column| column <= columns);
    }

    /// The next stop strictly after `column`, clamped to `right`.
    pub fn next_stop(&self, column: usize, right: usize) -> usize {
        if self.stops.is_empty() {
            let next = column + self.tab_width - (column - 1) % self.tab_width;
            return next.min(right);
        }
        self.stops
            .iter()
            .copied()
            .find(|&stop| stop > column)
            .unwrap_or(right)
            .min(right)
    }

    /// The previous stop strictly before `column`, clamped to `left`.
    pub fn prev_stop(&self, column: usize, left: usize) -> usize {
        if self.stops.is_empty() {
            if column <= 1 {
                return left;
            }
            let prev = column - ((column - 2) % self.tab_width + 1);
            return prev.max(left);
        }
        self.stops
            .iter()
            .rev()
            .copied()
            .find(|&stop| stop < column)
            .unwrap_or(left)
            .max(left)
    }

    /// All stops within `1..=columns`, for the DECTABSR report.
    pub fn report(&self, columns: usize) -> Vec<usize> {
        if self.stops.is_empty() {
            return (1..=columns)
                .skip(self.tab_width)
                .step_by(self.tab_width)
                .collect();
        }
        self.stops
            .iter()
            .copied()
            .filter(|&column| column <= columns)
            .collect()
    }
}
