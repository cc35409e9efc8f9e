//! Cursor state
//!
//! Position (1-based), visibility, and the DECSC/DECRC saved-state record.

use serde::{Deserialize, Serialize};

use super::cell::GraphicsAttributes;
use super::charset::CharsetState;
use super::Coordinate;

/// Cursor shape as selected by DECSCUSR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorShape {
    #[default]
    Block,
    Underline,
    Bar,
}

/// Whether the cursor blinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorDisplay {
    #[default]
    Steady,
    Blinking,
}

/// The cursor: a 1-based position plus visibility and style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub row: usize,
    pub column: usize,
    pub visible: bool,
    pub shape: CursorShape,
    pub display: CursorDisplay,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 1,
            column: 1,
            visible: true,
            shape: CursorShape::Block,
            display: CursorDisplay::Steady,
        }
    }
}

impl Cursor {
    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.row, self.column)
    }

    pub fn set_position(&mut self, position: Coordinate) {
        self.row = position.row;
        self.column = position.column;
    }
}

/// State captured by DECSC and reinstated by DECRC.
///
/// Restoring with an empty stack reinstates this baseline rather than
/// failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub cursor_position: Coordinate,
    pub graphics_rendition: GraphicsAttributes,
    pub auto_wrap: bool,
    pub origin_mode: bool,
    pub charsets: CharsetState,
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            cursor_position: Coordinate::new(1, 1),
            graphics_rendition: GraphicsAttributes::default(),
            auto_wrap: true,
            origin_mode: false,
            charsets: CharsetState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_default() {
        let cursor = Cursor::default();
        assert_eq!(cursor.position(), Coordinate::new(1, 1));
        assert!(cursor.visible);
        assert_eq!(cursor.shape, CursorShape::Block);
    }

    #[test]
    fn test_set_position() {
        let mut cursor = Cursor::default();
        cursor.set_position(Coordinate::new(5, 10));
        assert_eq!(cursor.row, 5);
        assert_eq!(cursor.column, 10);
    }
}
