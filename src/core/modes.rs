//! Terminal modes
//!
//! ANSI and DEC private modes are one tagged enum; the DEC variants carry
//! their xterm numbering in [`Mode::code`]. A buffer stores the enabled set;
//! modes with side effects (origin, autowrap, margins, the alternate screen
//! family) are handled by the command interpreter on top of the set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A settable terminal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    // ANSI modes
    /// KAM: keyboard action.
    KeyboardAction,
    /// IRM: insert/replace.
    Insert,
    /// SRM: send/receive (local echo off).
    SendReceive,
    /// LNM: linefeed implies carriage return.
    AutomaticNewLine,

    // DEC private modes
    /// DECCKM: cursor keys send application sequences.
    UseApplicationCursorKeys,
    /// DECANM family: USASCII designation, permanently set here.
    DesignateCharsetUsAscii,
    /// DECCOLM: 132-column mode.
    Columns132,
    /// DECSCLM: smooth scrolling.
    SmoothScroll,
    /// DECSCNM: reverse video.
    ReverseVideo,
    /// DECOM: origin mode.
    Origin,
    /// DECAWM: auto wrap.
    AutoWrap,
    /// DECARM: auto repeat.
    AutoRepeat,
    /// X10 mouse reporting.
    MouseProtocolX10,
    ShowToolbar,
    BlinkingCursor,
    PrinterExtend,
    /// DECTCEM: cursor visible.
    VisibleCursor,
    ShowScrollbar,
    /// Switch to the alternate screen buffer.
    UseAlternateScreen,
    /// DECLRMM: enable left/right margins.
    LeftRightMargin,
    /// VT200 normal mouse tracking.
    MouseProtocolNormalTracking,
    /// VT200 highlight mouse tracking.
    MouseProtocolHighlightTracking,
    /// Button-event mouse tracking.
    MouseProtocolButtonTracking,
    /// Any-event mouse tracking.
    MouseProtocolAnyEventTracking,
    /// Focus in/out reporting.
    FocusEvents,
    /// UTF-8 extended mouse coordinates.
    MouseExtended,
    /// SGR mouse coordinates.
    MouseSgr,
    /// Mouse wheel maps to cursor keys in the alternate screen.
    MouseAlternateScroll,
    /// URXVT mouse coordinates.
    MouseUrxvt,
    /// Alternate screen, clearing it when switching back.
    AlternateScreenClear,
    /// Save/restore cursor as a mode (xterm 1048).
    SaveCursor,
    /// Alternate screen combined with cursor save/restore.
    AlternateScreenSaveCursor,
    /// Bracketed paste.
    BracketedPaste,
}

impl Mode {
    /// Whether this is an ANSI mode (CSI h/l without the `?` prefix).
    pub fn is_ansi(self) -> bool {
        matches!(
            self,
            Mode::KeyboardAction | Mode::Insert | Mode::SendReceive | Mode::AutomaticNewLine
        )
    }

    /// The numeric parameter used on the wire.
    pub fn code(self) -> u16 {
        match self {
            Mode::KeyboardAction => 2,
            Mode::Insert => 4,
            Mode::SendReceive => 12,
            Mode::AutomaticNewLine => 20,

            Mode::UseApplicationCursorKeys => 1,
            Mode::DesignateCharsetUsAscii => 2,
            Mode::Columns132 => 3,
            Mode::SmoothScroll => 4,
            Mode::ReverseVideo => 5,
            Mode::Origin => 6,
            Mode::AutoWrap => 7,
            Mode::AutoRepeat => 8,
            Mode::MouseProtocolX10 => 9,
            Mode::ShowToolbar => 10,
            Mode::BlinkingCursor => 12,
            Mode::PrinterExtend => 19,
            Mode::VisibleCursor => 25,
            Mode::ShowScrollbar => 30,
            Mode::UseAlternateScreen => 47,
            Mode::LeftRightMargin => 69,
            Mode::MouseProtocolNormalTracking => 1000,
            Mode::MouseProtocolHighlightTracking => 1001,
            Mode::MouseProtocolButtonTracking => 1002,
            Mode::MouseProtocolAnyEventTracking => 1003,
            Mode::FocusEvents => 1004,
            Mode::MouseExtended => 1005,
            Mode::MouseSgr => 1006,
            Mode::MouseAlternateScroll => 1007,
            Mode::MouseUrxvt => 1015,
            Mode::AlternateScreenClear => 1047,
            Mode::SaveCursor => 1048,
            Mode::AlternateScreenSaveCursor => 1049,
            Mode::BracketedPaste => 2004,
        }
    }
}

/// The set of enabled modes of one screen buffer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeSet {
    enabled: HashSet<Mode>,
}

impl ModeSet {
    pub fn new() -> Self {
        let mut set = Self::default();
        // xterm defaults
        set.enabled.insert(Mode::AutoWrap);
        set.enabled.insert(Mode::VisibleCursor);
        set.enabled.insert(Mode::AutoRepeat);
        set
    }

    pub fn set(&mut self, mode: Mode, enable: bool) {
        if enable {
            self.enabled.insert(mode);
        } else {
            self.enabled.remove(&mode);
        }
    }

    pub fn is_enabled(&self, mode: Mode) -> bool {
        self.enabled.contains(&mode)
    }
}

/// Mouse reporting protocol, forwarded to the input generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseProtocol {
    X10,
    NormalTracking,
    HighlightTracking,
    ButtonTracking,
    AnyEventTracking,
}

/// Mouse coordinate encoding, forwarded to the input generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseTransport {
    #[default]
    Standard,
    Extended,
    Sgr,
    Urxvt,
}

/// What the mouse wheel generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseWheelMode {
    #[default]
    Default,
    NormalCursorKeys,
    ApplicationCursorKeys,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let modes = ModeSet::new();
        assert!(modes.is_enabled(Mode::AutoWrap));
        assert!(modes.is_enabled(Mode::VisibleCursor));
        assert!(!modes.is_enabled(Mode::Origin));
        assert!(!modes.is_enabled(Mode::BracketedPaste));
    }

    #[test]
    fn test_set_and_reset() {
        let mut modes = ModeSet::new();
        modes.set(Mode::BracketedPaste, true);
        assert!(modes.is_enabled(Mode::BracketedPaste));
        modes.set(Mode::BracketedPaste, false);
        assert!(!modes.is_enabled(Mode::BracketedPaste));
    }

    #[test]
    fn test_codes() {
        assert_eq!(Mode::Origin.code(), 6);
        assert_eq!(Mode::AutoWrap.code(), 7);
        assert_eq!(Mode::LeftRightMargin.code(), 69);
        assert_eq!(Mode::BracketedPaste.code(), 2004);
        assert!(Mode::Insert.is_ansi());
        assert!(!Mode::Origin.is_ansi());
    }
}
