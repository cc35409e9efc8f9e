//! Screen snapshots
//!
//! Serializable captures of screen state for golden tests and debugging.

use serde::{Deserialize, Serialize};

use super::cursor::{CursorDisplay, CursorShape};
use super::margin::Margin;
use super::screen::Screen;
use super::WindowSize;

/// A full snapshot of the visible state of the active buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: WindowSize,
    pub cursor: CursorSnapshot,
    /// Row text at full width, top to bottom.
    pub lines: Vec<String>,
    pub margin: Margin,
    pub history_line_count: usize,
    pub title: String,
}

/// Cursor state within a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub row: usize,
    pub column: usize,
    pub visible: bool,
    pub shape: CursorShape,
    pub display: CursorDisplay,
    pub wrap_pending: bool,
}

impl Snapshot {
    pub fn from_screen(screen: &Screen) -> Self {
        let buffer = screen.buffer();
        let cursor = buffer.cursor();
        Self {
            size: screen.size(),
            cursor: CursorSnapshot {
                row: cursor.row,
                column: cursor.column,
                visible: cursor.visible,
                shape: cursor.shape,
                display: cursor.display,
                wrap_pending: buffer.wrap_pending,
            },
            lines: (1..=screen.size().rows)
                .map(|row| buffer.render_text_line(row))
                .collect(),
            margin: *buffer.margin(),
            history_line_count: buffer.history_line_count(),
            title: screen.window_title().to_string(),
        }
    }
}

/// Text and cursor only, for terse test assertions. Lines are trimmed of
/// trailing blanks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactSnapshot {
    pub cursor_row: usize,
    pub cursor_column: usize,
    pub text: Vec<String>,
}

impl CompactSnapshot {
    pub fn from_screen(screen: &Screen) -> Self {
        let buffer = screen.buffer();
        Self {
            cursor_row: buffer.cursor().row,
            cursor_column: buffer.cursor().column,
            text: (1..=screen.size().rows)
                .map(|row| buffer.render_text_line(row).trim_end().to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::hooks::NullHooks;

    #[test]
    fn test_snapshot_capture() {
        let mut screen = Screen::new(WindowSize::new(10, 3), None);
        let mut hooks = NullHooks;
        screen.apply(&Command::print('H'), &mut hooks);
        screen.apply(&Command::print('i'), &mut hooks);

        let snapshot = Snapshot::from_screen(&screen);
        assert_eq!(snapshot.size, WindowSize::new(10, 3));
        assert_eq!(snapshot.cursor.row, 1);
        assert_eq!(snapshot.cursor.column, 3);
        assert_eq!(snapshot.lines[0].trim_end(), "Hi");
    }

    #[test]
    fn test_compact_snapshot_trims() {
        let mut screen = Screen::new(WindowSize::new(10, 2), None);
        screen.apply(&Command::print('X'), &mut NullHooks);
        let snapshot = CompactSnapshot::from_screen(&screen);
        assert_eq!(snapshot.text, vec!["X".to_string(), String::new()]);
        assert_eq!(snapshot.cursor_column, 2);
    }

    #[test]
    fn test_snapshot_serialization_round_trip() {
        let screen = Screen::new(WindowSize::new(10, 3), None);
        let snapshot = Snapshot::from_screen(&screen);
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, restored);
    }
}
