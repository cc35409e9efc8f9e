//! Scroll margins
//!
//! A margin is a pair of inclusive 1-based ranges: top/bottom (DECSTBM) and
//! left/right (DECSLRM). With left/right margin mode off the horizontal span
//! always covers the full width, so the scroll region is the rectangle of
//! the two spans.

use serde::{Deserialize, Serialize};

use super::WindowSize;

/// An inclusive 1-based range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub from: usize,
    pub to: usize,
}

impl Span {
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> usize {
        self.to - self.from + 1
    }

    pub fn contains(&self, value: usize) -> bool {
        self.from <= value && value <= self.to
    }
}

/// The scroll region: vertical (top/bottom) and horizontal (left/right)
/// spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub vertical: Span,
    pub horizontal: Span,
}

impl Margin {
    /// The margin covering the whole screen.
    pub fn full(size: WindowSize) -> Self {
        Self {
            vertical: Span::new(1, size.rows),
            horizontal: Span::new(1, size.columns),
        }
    }

    /// Whether the horizontal span covers every column.
    pub fn full_width(&self, size: WindowSize) -> bool {
        self.horizontal.from == 1 && self.horizontal.to == size.columns
    }

    /// Whether the margin is the whole screen.
    pub fn is_full_screen(&self, size: WindowSize) -> bool {
        self.full_width(size) && self.vertical.from == 1 && self.vertical.to == size.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span() {
        let span = Span::new(3, 5);
        assert_eq!(span.length(), 3);
        assert!(span.contains(3));
        assert!(span.contains(5));
        assert!(!span.contains(6));
    }

    #[test]
    fn test_full_margin() {
        let size = WindowSize::new(80, 24);
        let margin = Margin::full(size);
        assert!(margin.is_full_screen(size));
        assert!(margin.full_width(size));

        let partial = Margin {
            vertical: Span::new(3, 5),
            horizontal: Span::new(1, 80),
        };
        assert!(!partial.is_full_screen(size));
        assert!(partial.full_width(size));
    }
}
