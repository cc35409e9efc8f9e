//! Terminal cell
//!
//! A cell holds one grapheme cluster (a base code point plus combining
//! marks), its display width in columns, the graphics rendition it was
//! written with, and an optional hyperlink handle.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use super::color::{Color, ColorProfile, ColorTarget, RgbColor};
use super::hyperlink::HyperlinkId;

/// VARIATION SELECTOR-16 forces emoji presentation, i.e. width 2.
pub const VARIATION_SELECTOR_16: char = '\u{FE0F}';

bitflags! {
    /// Character style bits set through SGR.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u16 {
        const BOLD              = 1 << 0;
        const FAINT             = 1 << 1;
        const ITALIC            = 1 << 2;
        const UNDERLINE         = 1 << 3;
        const BLINKING          = 1 << 4;
        const INVERSE           = 1 << 5;
        const HIDDEN            = 1 << 6;
        const CROSSED_OUT       = 1 << 7;
        const DOUBLY_UNDERLINED = 1 << 8;
        const CURLY_UNDERLINED  = 1 << 9;
        const DOTTED_UNDERLINE  = 1 << 10;
        const DASHED_UNDERLINE  = 1 << 11;
        const FRAMED            = 1 << 12;
        const ENCIRCLED         = 1 << 13;
    }
}

impl StyleFlags {
    /// All underline variants; setting one clears the others.
    pub const ANY_UNDERLINE: StyleFlags = StyleFlags::UNDERLINE
        .union(StyleFlags::DOUBLY_UNDERLINED)
        .union(StyleFlags::CURLY_UNDERLINED)
        .union(StyleFlags::DOTTED_UNDERLINE)
        .union(StyleFlags::DASHED_UNDERLINE);
}

impl Serialize for StyleFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for StyleFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(StyleFlags::from_bits_truncate(u16::deserialize(
            deserializer,
        )?))
    }
}

/// Graphics rendition applied to newly written cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphicsAttributes {
    pub foreground: Color,
    pub background: Color,
    pub underline: Color,
    pub styles: StyleFlags,
}

impl GraphicsAttributes {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Resolve this rendition to concrete (foreground, background) colors.
    ///
    /// Faint halves the foreground opacity, Bold selects the bright palette
    /// for named indices, and Inverse swaps the pair before opacity applies.
    pub fn colors(&self, profile: &ColorProfile) -> (RgbColor, RgbColor) {
        let opacity = if self.styles.contains(StyleFlags::FAINT) {
            0.5
        } else {
            1.0
        };
        let bright = self.styles.contains(StyleFlags::BOLD);

        let fg = profile.resolve(self.foreground, ColorTarget::Foreground, bright);
        let bg = profile.resolve(self.background, ColorTarget::Background, bright);

        if self.styles.contains(StyleFlags::INVERSE) {
            (bg.dim(opacity), fg)
        } else {
            (fg.dim(opacity), bg)
        }
    }

    /// Resolve the underline color, falling back to the foreground default.
    pub fn underline_color(&self, profile: &ColorProfile) -> RgbColor {
        let opacity = if self.styles.contains(StyleFlags::FAINT) {
            0.5
        } else {
            1.0
        };
        let bright = self.styles.contains(StyleFlags::BOLD);
        profile
            .resolve(self.underline, ColorTarget::Foreground, bright)
            .dim(opacity)
    }
}

/// Display width of a code point in terminal columns (0, 1, or 2).
pub(crate) fn codepoint_width(cp: char) -> usize {
    if cp == VARIATION_SELECTOR_16 {
        return 2;
    }
    cp.width().unwrap_or(0).min(2)
}

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    codepoints: [char; Cell::MAX_CODEPOINTS],
    codepoint_count: u8,
    width: u8,
    attributes: GraphicsAttributes,
    hyperlink: Option<HyperlinkId>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            codepoints: ['\0'; Cell::MAX_CODEPOINTS],
            codepoint_count: 0,
            width: 1,
            attributes: GraphicsAttributes::default(),
            hyperlink: None,
        }
    }
}

impl Cell {
    /// Maximum number of code points a cell can carry (base + combining).
    pub const MAX_CODEPOINTS: usize = 9;

    /// A blank cell carrying the given rendition.
    pub fn blank(attributes: GraphicsAttributes) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// A cell holding a single character under the given rendition.
    pub fn new(cp: char, attributes: GraphicsAttributes) -> Self {
        let mut cell = Self::blank(attributes);
        cell.set_character(cp);
        cell
    }

    /// Reset to a blank carrying the given rendition and hyperlink.
    pub fn reset(&mut self, attributes: GraphicsAttributes, hyperlink: Option<HyperlinkId>) {
        *self = Self {
            attributes,
            hyperlink,
            ..Self::default()
        };
    }

    pub fn is_empty(&self) -> bool {
        self.codepoint_count == 0
    }

    /// The code points stored in this cell (base first).
    pub fn codepoints(&self) -> &[char] {
        &self.codepoints[..usize::from(self.codepoint_count)]
    }

    pub fn codepoint_count(&self) -> usize {
        usize::from(self.codepoint_count)
    }

    /// Cell width in columns: 0 for a wide-character placeholder, else 1 or 2.
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    pub fn attributes(&self) -> &GraphicsAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut GraphicsAttributes {
        &mut self.attributes
    }

    pub fn hyperlink(&self) -> Option<HyperlinkId> {
        self.hyperlink
    }

    pub fn set_hyperlink(&mut self, hyperlink: Option<HyperlinkId>) {
        self.hyperlink = hyperlink;
    }

    /// Replace the cell content with a single base character.
    ///
    /// A zero-width code point written at start-of-cell becomes a width-1
    /// base rather than vanishing.
    pub fn set_character(&mut self, cp: char) {
        self.codepoints[0] = cp;
        self.codepoint_count = 1;
        self.width = codepoint_width(cp).max(1) as u8;
    }

    /// Mark this cell as the trailing placeholder of a wide character.
    pub fn set_wide_placeholder(&mut self) {
        self.codepoint_count = 0;
        self.width = 0;
    }

    /// Clamp the width, e.g. for a wide glyph forced into the last column.
    pub(crate) fn set_width(&mut self, width: usize) {
        self.width = width.min(2) as u8;
    }

    /// Append a combining code point to this cell.
    ///
    /// Returns `Some(gain)` with the number of columns the cell grew by
    /// (U+FE0F upgrades width to 2), or `None` when the cell is already full
    /// and the code point was dropped. Width never shrinks.
    pub fn append_codepoint(&mut self, cp: char) -> Option<usize> {
        if self.codepoint_count as usize >= Self::MAX_CODEPOINTS {
            return None;
        }
        self.codepoints[usize::from(self.codepoint_count)] = cp;
        self.codepoint_count += 1;

        let width = codepoint_width(cp);
        if width > usize::from(self.width) {
            let gain = width - usize::from(self.width);
            self.width = width as u8;
            Some(gain)
        } else {
            Some(0)
        }
    }

    /// The cell content as a string; empty for blank and placeholder cells.
    pub fn text(&self) -> String {
        self.codepoints().iter().collect()
    }
}
