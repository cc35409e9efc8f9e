//! Terminal colors
//!
//! Colors live in a small hierarchy: default → 16 named → 256 palette →
//! 24-bit RGB. Cells store the symbolic form; a [`ColorProfile`] resolves it
//! to concrete RGB at render time, applying the bright-palette hint for bold
//! text.

use serde::{Deserialize, Serialize};

/// A concrete 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale all channels by `opacity` (0.0..=1.0). Used for faint text.
    pub fn dim(self, opacity: f32) -> Self {
        let scale = |v: u8| (f32::from(v) * opacity) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

/// Symbolic color as stored in cells and the current graphics rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    /// The terminal default for the given target (SGR 39 / 49 / 59).
    #[default]
    Default,
    /// Named color index 0-15: the standard 8 plus their bright variants.
    Indexed(u8),
    /// 256-color palette index (SGR 38;5;n and friends).
    Palette(u8),
    /// 24-bit true color (SGR 38;2;r;g;b and friends).
    Rgb(RgbColor),
}

/// Whether a color resolves against the foreground or background default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Foreground,
    Background,
}

/// Names of the dynamically settable colors (OSC 10..19).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DynamicColorName {
    DefaultForegroundColor,
    DefaultBackgroundColor,
    TextCursorColor,
    MouseForegroundColor,
    MouseBackgroundColor,
    HighlightForegroundColor,
    HighlightBackgroundColor,
}

impl DynamicColorName {
    /// The OSC code used to set (and echo back) this color.
    pub fn code(self) -> u8 {
        match self {
            DynamicColorName::DefaultForegroundColor => 10,
            DynamicColorName::DefaultBackgroundColor => 11,
            DynamicColorName::TextCursorColor => 12,
            DynamicColorName::MouseForegroundColor => 13,
            DynamicColorName::MouseBackgroundColor => 14,
            DynamicColorName::HighlightForegroundColor => 19,
            DynamicColorName::HighlightBackgroundColor => 17,
        }
    }
}

/// Maps symbolic colors to RGB.
///
/// Carries the default foreground/background and the full 256-entry xterm
/// palette. Indices 0-7 resolve through the bright half when the `bright`
/// hint is set (bold text).
#[derive(Debug, Clone)]
pub struct ColorProfile {
    pub default_foreground: RgbColor,
    pub default_background: RgbColor,
    palette: [RgbColor; 256],
}

impl Default for ColorProfile {
    fn default() -> Self {
        let mut palette = [RgbColor::default(); 256];
        for (i, slot) in palette.iter_mut().enumerate() {
            *slot = xterm_palette_entry(i as u8);
        }
        Self {
            default_foreground: RgbColor::new(229, 229, 229),
            default_background: RgbColor::new(0, 0, 0),
            palette,
        }
    }
}

impl ColorProfile {
    /// Resolve a symbolic color for the given target.
    ///
    /// `bright` requests the bright palette for named indices 0-7, which is
    /// how bold text picks up bright colors.
    pub fn resolve(&self, color: Color, target: ColorTarget, bright: bool) -> RgbColor {
        match color {
            Color::Default => match target {
                ColorTarget::Foreground => self.default_foreground,
                ColorTarget::Background => self.default_background,
            },
            Color::Indexed(index) => {
                let index = if bright && index < 8 { index + 8 } else { index };
                self.palette[usize::from(index)]
            }
            Color::Palette(index) => self.palette[usize::from(index)],
            Color::Rgb(rgb) => rgb,
        }
    }

    /// Direct palette access, mostly for renderers.
    pub fn palette_color(&self, index: u8) -> RgbColor {
        self.palette[usize::from(index)]
    }
}

/// The standard xterm 256-color palette.
fn xterm_palette_entry(index: u8) -> RgbColor {
    match index {
        0 => RgbColor::new(0, 0, 0),
        1 => RgbColor::new(205, 0, 0),
        2 => RgbColor::new(0, 205, 0),
        3 => RgbColor::new(205, 205, 0),
        4 => RgbColor::new(0, 0, 238),
        5 => RgbColor::new(205, 0, 205),
        6 => RgbColor::new(0, 205, 205),
        7 => RgbColor::new(229, 229, 229),
        8 => RgbColor::new(127, 127, 127),
        9 => RgbColor::new(255, 0, 0),
        10 => RgbColor::new(0, 255, 0),
        11 => RgbColor::new(255, 255, 0),
        12 => RgbColor::new(92, 92, 255),
        13 => RgbColor::new(255, 0, 255),
        14 => RgbColor::new(0, 255, 255),
        15 => RgbColor::new(255, 255, 255),
        // 6x6x6 color cube
        16..=231 => {
            let n = index - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            RgbColor::new(level(n / 36), level((n % 36) / 6), level(n % 6))
        }
        // grayscale ramp
        232..=255 => {
            let gray = 8 + (index - 232) * 10;
            RgbColor::new(gray, gray, gray)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_standard_colors() {
        let profile = ColorProfile::default();
        assert_eq!(profile.palette_color(0), RgbColor::new(0, 0, 0));
        assert_eq!(profile.palette_color(15), RgbColor::new(255, 255, 255));
        // cube endpoints
        assert_eq!(profile.palette_color(16), RgbColor::new(0, 0, 0));
        assert_eq!(profile.palette_color(231), RgbColor::new(255, 255, 255));
        // grayscale endpoints
        assert_eq!(profile.palette_color(232), RgbColor::new(8, 8, 8));
        assert_eq!(profile.palette_color(255), RgbColor::new(238, 238, 238));
    }

    #[test]
    fn test_resolve_default() {
        let profile = ColorProfile::default();
        assert_eq!(
            profile.resolve(Color::Default, ColorTarget::Foreground, false),
            profile.default_foreground
        );
        assert_eq!(
            profile.resolve(Color::Default, ColorTarget::Background, false),
            profile.default_background
        );
    }

    #[test]
    fn test_resolve_bright_hint() {
        let profile = ColorProfile::default();
        let dim_red = profile.resolve(Color::Indexed(1), ColorTarget::Foreground, false);
        let bright_red = profile.resolve(Color::Indexed(1), ColorTarget::Foreground, true);
        assert_eq!(dim_red, RgbColor::new(205, 0, 0));
        assert_eq!(bright_red, RgbColor::new(255, 0, 0));
        // already-bright indices are unaffected by the hint
        assert_eq!(
            profile.resolve(Color::Indexed(9), ColorTarget::Foreground, true),
            RgbColor::new(255, 0, 0)
        );
    }

    #[test]
    fn test_dim() {
        let c = RgbColor::new(200, 100, 50);
        assert_eq!(c.dim(0.5), RgbColor::new(100, 50, 25));
    }

    #[test]
    fn test_dynamic_color_codes() {
        assert_eq!(DynamicColorName::DefaultForegroundColor.code(), 10);
        assert_eq!(DynamicColorName::DefaultBackgroundColor.code(), 11);
        assert_eq!(DynamicColorName::TextCursorColor.code(), 12);
    }
}
