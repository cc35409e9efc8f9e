//! Screen commands
//!
//! The closed set of operations the screen interprets. An external escape
//! sequence parser turns the host byte stream into these records with
//! already-validated parameters; the screen applies them one at a time via
//! [`Screen::apply`](crate::core::Screen::apply).

use serde::{Deserialize, Serialize};

use crate::core::charset::{Charset, CharsetTable};
use crate::core::color::{Color, DynamicColorName, RgbColor};
use crate::core::cursor::{CursorDisplay, CursorShape};
use crate::core::modes::{Mode, MouseProtocol};

/// Which tab stops HorizontalTabClear removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabClear {
    UnderCursor,
    All,
}

/// One SGR sub-command.
///
/// Underline variants are mutually exclusive; selecting one clears the
/// others. Bold and Faint compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sgr {
    Reset,
    Bold,
    Faint,
    Italic,
    Underline,
    DoublyUnderlined,
    CurlyUnderlined,
    DottedUnderline,
    DashedUnderline,
    Blinking,
    Inverse,
    Hidden,
    CrossedOut,
    Framed,
    Encircled,
    NotBoldNorFaint,
    NotItalic,
    NotUnderlined,
    NotBlinking,
    NotInverse,
    NotHidden,
    NotCrossedOut,
    NotFramedNorEncircled,
    Foreground(Color),
    Background(Color),
    UnderlineColor(Color),
}

/// A parsed screen command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Write a printable code point at the cursor. `consecutive` is set when
    /// the code point directly followed the previous printable in the input
    /// stream, enabling grapheme-cluster combining.
    AppendChar { codepoint: char, consecutive: bool },
    Bell,
    Linefeed,
    Backspace,
    FullReset,
    SoftTerminalReset,

    // erase
    ClearToEndOfScreen,
    ClearToBeginOfScreen,
    ClearScreen,
    ClearScrollbackBuffer,
    ClearToEndOfLine,
    ClearToBeginOfLine,
    ClearLine,
    EraseCharacters { count: usize },

    // scroll / insert / delete
    ScrollUp { count: usize },
    ScrollDown { count: usize },
    InsertCharacters { count: usize },
    DeleteCharacters { count: usize },
    InsertLines { count: usize },
    DeleteLines { count: usize },
    InsertColumns { count: usize },
    DeleteColumns { count: usize },

    // cursor motion
    MoveCursorUp { count: usize },
    MoveCursorDown { count: usize },
    MoveCursorForward { count: usize },
    MoveCursorBackward { count: usize },
    CursorNextLine { count: usize },
    CursorPreviousLine { count: usize },
    MoveCursorToColumn { column: usize },
    MoveCursorToLine { row: usize },
    MoveCursorTo { row: usize, column: usize },
    MoveCursorToBeginOfLine,
    MoveCursorToNextTab { count: usize },
    CursorBackwardTab { count: usize },
    HorizontalPositionAbsolute { column: usize },
    HorizontalPositionRelative { count: usize },
    Index,
    ReverseIndex,
    BackIndex,
    ForwardIndex,
    SaveCursor,
    RestoreCursor,

    // tabs
    HorizontalTabSet,
    HorizontalTabClear { which: TabClear },
    RequestTabStops,

    // rendition
    SetGraphicsRendition { commands: Vec<Sgr> },
    SetForegroundColor { color: Color },
    SetBackgroundColor { color: Color },
    SetUnderlineColor { color: Color },

    // modes and margins
    SetMode { mode: Mode, enable: bool },
    RequestMode { mode: Mode },
    SetTopBottomMargin {
        top: Option<usize>,
        bottom: Option<usize>,
    },
    SetLeftRightMargin {
        left: Option<usize>,
        right: Option<usize>,
    },

    // reports
    DeviceStatusReport,
    ReportCursorPosition,
    ReportExtendedCursorPosition,
    SendDeviceAttributes,
    SendTerminalId,

    // charset
    DesignateCharset {
        table: CharsetTable,
        charset: Charset,
    },
    SingleShiftSelect { table: CharsetTable },

    // window
    ChangeWindowTitle { title: String },
    SaveWindowTitle,
    RestoreWindowTitle,
    ResizeWindow {
        width: usize,
        height: usize,
        in_pixels: bool,
    },

    // embedder projections
    SendMouseEvents {
        protocol: MouseProtocol,
        enable: bool,
    },
    ApplicationKeypadMode { enable: bool },
    SetCursorStyle {
        display: CursorDisplay,
        shape: CursorShape,
    },

    // dynamic colors
    SetDynamicColor {
        name: DynamicColorName,
        color: RgbColor,
    },
    ResetDynamicColor { name: DynamicColorName },
    RequestDynamicColor { name: DynamicColorName },

    // misc
    ScreenAlignmentPattern,
    SetMark,
    Hyperlink { id: String, uri: String },
    Notify { title: String, content: String },
}

impl Command {
    /// Convenience constructor for plain text.
    pub fn print(codepoint: char) -> Self {
        Command::AppendChar {
            codepoint,
            consecutive: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_helper() {
        assert_eq!(
            Command::print('A'),
            Command::AppendChar {
                codepoint: 'A',
                consecutive: false
            }
        );
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::SetGraphicsRendition {
            commands: vec![Sgr::Bold, Sgr::Foreground(Color::Indexed(1))],
        };
        let json = serde_json::to_string(&command).unwrap();
        let restored: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(command, restored);
    }
}
