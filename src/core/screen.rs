//! Terminal screen
//!
//! Owns the main and alternate buffers, interprets [`Command`]s against the
//! active one, manages the scrollback viewport and the window-title stack,
//! and answers device queries through the embedder's [`Hooks`].

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::command::{Command, Sgr, TabClear};
use crate::hooks::Hooks;

use super::buffer::{BufferType, ScreenBuffer};
use super::cell::{Cell, GraphicsAttributes, StyleFlags};
use super::color::{Color, DynamicColorName};
use super::line::Line;
use super::modes::{Mode, MouseProtocol, MouseTransport, MouseWheelMode};
use super::{Coordinate, WindowSize};

/// The terminal screen model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screen {
    primary: ScreenBuffer,
    alternate: ScreenBuffer,
    active: BufferType,
    size: WindowSize,
    max_history_line_count: Option<usize>,
    window_title: String,
    saved_window_titles: Vec<String>,
    /// Lines above the live view; 0 means at-bottom.
    scroll_offset: usize,
}

impl Screen {
    pub fn new(size: WindowSize, max_history_line_count: Option<usize>) -> Self {
        Self {
            primary: ScreenBuffer::new(BufferType::Main, size, max_history_line_count),
            alternate: ScreenBuffer::new(BufferType::Alternate, size, max_history_line_count),
            active: BufferType::Main,
            size,
            max_history_line_count,
            window_title: String::new(),
            saved_window_titles: Vec::new(),
            scroll_offset: 0,
        }
    }

    // --- buffer access ----------------------------------------------------

    /// The active buffer.
    pub fn buffer(&self) -> &ScreenBuffer {
        match self.active {
            BufferType::Main => &self.primary,
            BufferType::Alternate => &self.alternate,
        }
    }

    fn buffer_mut(&mut self) -> &mut ScreenBuffer {
        match self.active {
            BufferType::Main => &mut self.primary,
            BufferType::Alternate => &mut self.alternate,
        }
    }

    pub fn buffer_type(&self) -> BufferType {
        self.active
    }

    pub fn is_primary_screen(&self) -> bool {
        self.active == BufferType::Main
    }

    pub fn is_alternate_screen(&self) -> bool {
        self.active == BufferType::Alternate
    }

    pub fn size(&self) -> WindowSize {
        self.size
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    pub fn cursor_position(&self) -> Coordinate {
        self.buffer().cursor_position()
    }

    pub fn real_cursor_position(&self) -> Coordinate {
        self.buffer().real_cursor_position()
    }

    pub fn history_line_count(&self) -> usize {
        self.primary.history_line_count()
    }

    pub fn max_history_line_count(&self) -> Option<usize> {
        self.max_history_line_count
    }

    pub fn set_max_history_line_count(&mut self, max: Option<usize>) {
        self.max_history_line_count = max;
        self.primary.set_max_history_line_count(max);
        self.scroll_offset = self.scroll_offset.min(self.primary.history_line_count());
    }

    /// Mode query; the alternate-screen modes reflect the active buffer.
    pub fn is_mode_enabled(&self, mode: Mode) -> bool {
        match mode {
            Mode::UseAlternateScreen
            | Mode::AlternateScreenClear
            | Mode::AlternateScreenSaveCursor => self.is_alternate_screen(),
            _ => self.buffer().is_mode_enabled(mode),
        }
    }

    // --- command interpretation -------------------------------------------

    /// Apply a batch of commands.
    pub fn apply_all<'a>(
        &mut self,
        commands: impl IntoIterator<Item = &'a Command>,
        hooks: &mut dyn Hooks,
    ) {
        for command in commands {
            self.apply(command, hooks);
        }
    }

    /// Apply one command to the active buffer.
    pub fn apply(&mut self, command: &Command, hooks: &mut dyn Hooks) {
        hooks.on_command(command);

        match command {
            Command::AppendChar {
                codepoint,
                consecutive,
            } => self.buffer_mut().append_char(*codepoint, *consecutive),
            Command::Bell => hooks.bell(),
            Command::Linefeed => {
                let buffer = self.buffer();
                let column = if buffer.is_mode_enabled(Mode::AutomaticNewLine) {
                    buffer.margin().horizontal.from
                } else {
                    buffer.cursor().column
                };
                self.buffer_mut().linefeed(column);
            }
            Command::Backspace => self.buffer_mut().move_cursor_backward(1),
            Command::FullReset => self.reset_hard(hooks),
            Command::SoftTerminalReset => self.reset_soft(),

            Command::ClearToEndOfScreen => self.buffer_mut().clear_to_end_of_screen(),
            Command::ClearToBeginOfScreen => self.buffer_mut().clear_to_begin_of_screen(),
            Command::ClearScreen => self.buffer_mut().clear_screen(),
            Command::ClearScrollbackBuffer => {
                self.buffer_mut().clear_scrollback();
                self.scroll_offset = 0;
            }
            Command::ClearToEndOfLine => self.buffer_mut().clear_to_end_of_line(),
            Command::ClearToBeginOfLine => self.buffer_mut().clear_to_begin_of_line(),
            Command::ClearLine => self.buffer_mut().clear_line(),
            Command::EraseCharacters { count } => self.buffer_mut().erase_characters(*count),

            Command::ScrollUp { count } => self.buffer_mut().scroll_up(*count),
            Command::ScrollDown { count } => self.buffer_mut().scroll_down(*count),
            Command::InsertCharacters { count } => self.buffer_mut().insert_chars(*count),
            Command::DeleteCharacters { count } => self.buffer_mut().delete_chars(*count),
            Command::InsertLines { count } => self.buffer_mut().insert_lines(*count),
            Command::DeleteLines { count } => self.buffer_mut().delete_lines(*count),
            Command::InsertColumns { count } => self.buffer_mut().insert_columns(*count),
            Command::DeleteColumns { count } => self.buffer_mut().delete_columns(*count),

            Command::MoveCursorUp { count } => self.buffer_mut().move_cursor_up(*count),
            Command::MoveCursorDown { count } => self.buffer_mut().move_cursor_down(*count),
            Command::MoveCursorForward { count } => self.buffer_mut().move_cursor_forward(*count),
            Command::MoveCursorBackward { count } => {
                self.buffer_mut().move_cursor_backward(*count)
            }
            Command::CursorNextLine { count } => self.buffer_mut().cursor_next_line(*count),
            Command::CursorPreviousLine { count } => {
                self.buffer_mut().cursor_previous_line(*count)
            }
            Command::MoveCursorToColumn { column } => {
                self.buffer_mut().move_cursor_to_column(*column)
            }
            Command::MoveCursorToLine { row } => self.buffer_mut().move_cursor_to_line(*row),
            Command::MoveCursorTo { row, column } => {
                self.buffer_mut().move_cursor_to(*row, *column)
            }
            Command::MoveCursorToBeginOfLine => self.buffer_mut().move_to_begin_of_line(),
            Command::MoveCursorToNextTab { count } => self.buffer_mut().move_to_next_tab(*count),
            Command::CursorBackwardTab { count } => {
                self.buffer_mut().move_to_previous_tab(*count)
            }
            Command::HorizontalPositionAbsolute { column } => {
                self.buffer_mut().move_cursor_to_column(*column)
            }
            Command::HorizontalPositionRelative { count } => {
                self.buffer_mut().move_cursor_forward(*count)
            }
            Command::Index => self.buffer_mut().index(),
            Command::ReverseIndex => self.buffer_mut().reverse_index(),
            Command::BackIndex => self.buffer_mut().back_index(),
            Command::ForwardIndex => self.buffer_mut().forward_index(),
            Command::SaveCursor => self.buffer_mut().save_state(),
            Command::RestoreCursor => self.buffer_mut().restore_state(),

            Command::HorizontalTabSet => {
                let column = self.buffer().cursor().column;
                self.buffer_mut().tabs_mut().set(column);
            }
            Command::HorizontalTabClear { which } => match which {
                TabClear::UnderCursor => {
                    let column = self.buffer().cursor().column;
                    self.buffer_mut().tabs_mut().clear(column);
                }
                TabClear::All => self.buffer_mut().tabs_mut().clear_all(),
            },
            Command::RequestTabStops => self.report_tab_stops(hooks),

            Command::SetGraphicsRendition { commands } => {
                apply_sgr(&mut self.buffer_mut().graphics_rendition, commands);
            }
            Command::SetForegroundColor { color } => {
                self.buffer_mut().graphics_rendition.foreground = *color;
            }
            Command::SetBackgroundColor { color } => {
                self.buffer_mut().graphics_rendition.background = *color;
            }
            Command::SetUnderlineColor { color } => {
                self.buffer_mut().graphics_rendition.underline = *color;
            }

            Command::SetMode { mode, enable } => self.set_mode(*mode, *enable, hooks),
            Command::RequestMode { mode } => self.request_mode(*mode, hooks),
            Command::SetTopBottomMargin { top, bottom } => {
                self.buffer_mut().set_top_bottom_margin(*top, *bottom);
            }
            Command::SetLeftRightMargin { left, right } => {
                self.buffer_mut().set_left_right_margin(*left, *right);
            }

            Command::DeviceStatusReport => hooks.reply("\x1b[0n"),
            Command::ReportCursorPosition => {
                let position = self.cursor_position();
                hooks.reply(&format!("\x1b[{};{}R", position.row, position.column));
            }
            Command::ReportExtendedCursorPosition => {
                let position = self.cursor_position();
                hooks.reply(&format!("\x1b[{};{};1R", position.row, position.column));
            }
            Command::SendDeviceAttributes => {
                // VT220-class with 132 columns, selective erase, national
                // replacement charsets, technical charset, and ANSI color
                hooks.reply("\x1b[?62;1;6;9;15;22c");
            }
            Command::SendTerminalId => hooks.reply("\x1b[>1;10;0c"),

            Command::DesignateCharset { table, charset } => {
                self.buffer_mut().charsets.designate(*table, *charset);
            }
            Command::SingleShiftSelect { table } => {
                self.buffer_mut().charsets.single_shift(*table);
            }

            Command::ChangeWindowTitle { title } => {
                self.window_title = title.clone();
                hooks.on_window_title_changed(title);
            }
            Command::SaveWindowTitle => {
                self.saved_window_titles.push(self.window_title.clone());
            }
            Command::RestoreWindowTitle => {
                if let Some(title) = self.saved_window_titles.pop() {
                    self.window_title = title.clone();
                    hooks.on_window_title_changed(&title);
                }
            }
            Command::ResizeWindow {
                width,
                height,
                in_pixels,
            } => hooks.resize_window(*width, *height, *in_pixels),

            Command::SendMouseEvents { protocol, enable } => {
                let mode = match protocol {
                    MouseProtocol::X10 => Mode::MouseProtocolX10,
                    MouseProtocol::NormalTracking => Mode::MouseProtocolNormalTracking,
                    MouseProtocol::HighlightTracking => Mode::MouseProtocolHighlightTracking,
                    MouseProtocol::ButtonTracking => Mode::MouseProtocolButtonTracking,
                    MouseProtocol::AnyEventTracking => Mode::MouseProtocolAnyEventTracking,
                };
                self.buffer_mut().modes_mut().set(mode, *enable);
                hooks.set_mouse_protocol(*protocol, *enable);
            }
            Command::ApplicationKeypadMode { enable } => {
                hooks.set_application_keypad_mode(*enable);
            }
            Command::SetCursorStyle { display, shape } => {
                let cursor = &mut self.buffer_mut().cursor;
                cursor.display = *display;
                cursor.shape = *shape;
                hooks.set_cursor_style(*display, *shape);
            }

            Command::SetDynamicColor { name, color } => hooks.set_dynamic_color(*name, *color),
            Command::ResetDynamicColor { name } => hooks.reset_dynamic_color(*name),
            Command::RequestDynamicColor { name } => self.request_dynamic_color(*name, hooks),

            Command::ScreenAlignmentPattern => self.buffer_mut().screen_alignment_pattern(),
            Command::SetMark => self.buffer_mut().set_mark(),
            Command::Hyperlink { id, uri } => self.buffer_mut().set_hyperlink(id, uri),
            Command::Notify { title, content } => hooks.notify(title, content),
        }

        #[cfg(debug_assertions)]
        self.buffer().verify_state();
    }

    // --- modes ------------------------------------------------------------

    fn set_mode(&mut self, mode: Mode, enable: bool, hooks: &mut dyn Hooks) {
        match mode {
            Mode::Origin => {
                let buffer = self.buffer_mut();
                buffer.cursor_restricted_to_margin = enable;
                buffer.modes_mut().set(mode, enable);
                buffer.move_cursor_to_origin();
            }
            Mode::AutoWrap => {
                let buffer = self.buffer_mut();
                buffer.auto_wrap = enable;
                buffer.wrap_pending = false;
                buffer.modes_mut().set(mode, enable);
            }
            Mode::LeftRightMargin => {
                let buffer = self.buffer_mut();
                buffer.modes_mut().set(mode, enable);
                if !enable {
                    buffer.reset_horizontal_margin();
                    buffer.wrap_pending = false;
                }
            }
            Mode::VisibleCursor => {
                let buffer = self.buffer_mut();
                buffer.cursor.visible = enable;
                buffer.modes_mut().set(mode, enable);
            }
            Mode::UseAlternateScreen => {
                self.set_buffer(
                    if enable {
                        BufferType::Alternate
                    } else {
                        BufferType::Main
                    },
                    hooks,
                );
            }
            Mode::AlternateScreenClear => {
                if enable {
                    self.set_buffer(BufferType::Alternate, hooks);
                } else {
                    self.alternate.clear_screen();
                    self.set_buffer(BufferType::Main, hooks);
                }
            }
            Mode::SaveCursor => {
                if enable {
                    self.buffer_mut().save_state();
                } else {
                    self.buffer_mut().restore_state();
                }
            }
            Mode::AlternateScreenSaveCursor => {
                if enable {
                    self.primary.save_state();
                    self.alternate =
                        ScreenBuffer::new(BufferType::Alternate, self.size, None);
                    self.set_buffer(BufferType::Alternate, hooks);
                } else {
                    self.set_buffer(BufferType::Main, hooks);
                    self.primary.restore_state();
                }
            }
            Mode::Columns132 => {
                let columns = if enable { 132 } else { 80 };
                let rows = self.size.rows;
                let buffer = self.buffer_mut();
                buffer.modes_mut().set(mode, enable);
                buffer.clear_screen();
                buffer.reset_margins();
                buffer.move_cursor_to_origin();
                hooks.resize_window(columns, rows, false);
            }
            Mode::UseApplicationCursorKeys => {
                self.buffer_mut().modes_mut().set(mode, enable);
                hooks.use_application_cursor_keys(enable);
            }
            Mode::BracketedPaste => {
                self.buffer_mut().modes_mut().set(mode, enable);
                hooks.set_bracketed_paste(enable);
            }
            Mode::FocusEvents => {
                self.buffer_mut().modes_mut().set(mode, enable);
                hooks.set_generate_focus_events(enable);
            }
            Mode::MouseProtocolX10
            | Mode::MouseProtocolNormalTracking
            | Mode::MouseProtocolHighlightTracking
            | Mode::MouseProtocolButtonTracking
            | Mode::MouseProtocolAnyEventTracking => {
                self.buffer_mut().modes_mut().set(mode, enable);
                let protocol = match mode {
                    Mode::MouseProtocolX10 => MouseProtocol::X10,
                    Mode::MouseProtocolNormalTracking => MouseProtocol::NormalTracking,
                    Mode::MouseProtocolHighlightTracking => MouseProtocol::HighlightTracking,
                    Mode::MouseProtocolButtonTracking => MouseProtocol::ButtonTracking,
                    _ => MouseProtocol::AnyEventTracking,
                };
                hooks.set_mouse_protocol(protocol, enable);
            }
            Mode::MouseExtended => {
                self.buffer_mut().modes_mut().set(mode, enable);
                hooks.set_mouse_transport(if enable {
                    MouseTransport::Extended
                } else {
                    MouseTransport::Standard
                });
            }
            Mode::MouseSgr => {
                self.buffer_mut().modes_mut().set(mode, enable);
                hooks.set_mouse_transport(if enable {
                    MouseTransport::Sgr
                } else {
                    MouseTransport::Standard
                });
            }
            Mode::MouseUrxvt => {
                self.buffer_mut().modes_mut().set(mode, enable);
                hooks.set_mouse_transport(if enable {
                    MouseTransport::Urxvt
                } else {
                    MouseTransport::Standard
                });
            }
            Mode::MouseAlternateScroll => {
                self.buffer_mut().modes_mut().set(mode, enable);
                hooks.set_mouse_wheel_mode(if enable {
                    MouseWheelMode::ApplicationCursorKeys
                } else {
                    MouseWheelMode::Default
                });
            }
            _ => {
                // stored; observable through DECRQM only
                self.buffer_mut().modes_mut().set(mode, enable);
            }
        }
    }

    /// DECRQM reply: 1 = set, 2 = reset.
    fn request_mode(&mut self, mode: Mode, hooks: &mut dyn Hooks) {
        let enabled = self.is_mode_enabled(mode);
        let value = if enabled { 1 } else { 2 };
        let reply = if mode.is_ansi() {
            format!("\x1b[{};{}$y", mode.code(), value)
        } else {
            format!("\x1b[?{};{}$y", mode.code(), value)
        };
        hooks.reply(&reply);
    }

    fn set_buffer(&mut self, buffer_type: BufferType, hooks: &mut dyn Hooks) {
        if self.active != buffer_type {
            self.active = buffer_type;
            self.scroll_offset = 0;
            hooks.on_buffer_changed(buffer_type);
        }
    }

    // --- reports ----------------------------------------------------------

    fn report_tab_stops(&mut self, hooks: &mut dyn Hooks) {
        let stops = self.buffer().tabs().report(self.size.columns);
        let body = stops
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/");
        hooks.reply(&format!("\x1bP2$u{body}\x1b\\"));
    }

    fn request_dynamic_color(&mut self, name: DynamicColorName, hooks: &mut dyn Hooks) {
        if let Some(color) = hooks.request_dynamic_color(name) {
            let reply = format!(
                "\x1b]{};rgb:{:02x}{:02x}/{:02x}{:02x}/{:02x}{:02x}\x1b\\",
                name.code(),
                color.r,
                color.r,
                color.g,
                color.g,
                color.b,
                color.b,
            );
            hooks.reply(&reply);
        }
    }

    // --- viewport ---------------------------------------------------------

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Scroll the viewport up into history. Returns whether it moved.
    pub fn scroll_up(&mut self, lines: usize) -> bool {
        let max = self.buffer().history_line_count();
        let offset = (self.scroll_offset + lines).min(max);
        let changed = offset != self.scroll_offset;
        self.scroll_offset = offset;
        changed
    }

    /// Scroll the viewport down towards the live view.
    pub fn scroll_down(&mut self, lines: usize) -> bool {
        let offset = self.scroll_offset.saturating_sub(lines);
        let changed = offset != self.scroll_offset;
        self.scroll_offset = offset;
        changed
    }

    pub fn scroll_to_top(&mut self) -> bool {
        let max = self.buffer().history_line_count();
        let changed = self.scroll_offset != max;
        self.scroll_offset = max;
        changed
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        let changed = self.scroll_offset != 0;
        self.scroll_offset = 0;
        changed
    }

    /// Jump to the nearest marked line above the viewport.
    pub fn scroll_mark_up(&mut self) -> bool {
        if let Some(offset) = self.buffer().find_prev_marker(self.scroll_offset) {
            self.scroll_offset = offset;
            true
        } else {
            false
        }
    }

    /// Jump to the nearest marked line below, or back to the live view.
    pub fn scroll_mark_down(&mut self) -> bool {
        let offset = self
            .buffer()
            .find_next_marker(self.scroll_offset)
            .unwrap_or(0);
        let changed = offset != self.scroll_offset;
        self.scroll_offset = offset;
        changed
    }

    // --- rendering --------------------------------------------------------

    /// Visit every visible cell, row-major, at the given viewport offset.
    /// When the offset is non-zero the first rows come from scrollback.
    pub fn render_at<F>(&self, mut renderer: F, scroll_offset: usize)
    where
        F: FnMut(usize, usize, &Cell),
    {
        let buffer = self.buffer();
        let history = buffer.history();
        let offset = scroll_offset.min(history.len());
        for row in 1..=self.size.rows {
            let line = if row <= offset {
                history.get(history.len() - offset + row - 1)
            } else {
                buffer.line(row - offset)
            };
            let Some(line) = line else { continue };
            for column in 1..=self.size.columns {
                if let Some(cell) = line.cell(column - 1) {
                    renderer(row, column, cell);
                }
            }
        }
    }

    /// Visit every visible cell at the current viewport offset.
    pub fn render<F>(&self, renderer: F)
    where
        F: FnMut(usize, usize, &Cell),
    {
        self.render_at(renderer, self.scroll_offset);
    }

    /// A single live row as text, full width.
    pub fn render_text_line(&self, row: usize) -> String {
        self.buffer().render_text_line(row)
    }

    /// The live grid as text, one LF per row.
    pub fn render_text(&self) -> String {
        self.buffer().render_text()
    }

    /// The n'th line into history; 1 is the most recent saved line.
    pub fn render_history_text_line(&self, n: usize) -> String {
        self.buffer()
            .history()
            .get_from_end(n.saturating_sub(1))
            .map(Line::text)
            .unwrap_or_default()
    }

    /// Control sequences that reproduce the visible state of the active
    /// buffer on an empty terminal of the same size. The cursor is hidden
    /// during emission and restored at the end.
    pub fn screenshot(&self) -> String {
        let buffer = self.buffer();
        let mut out = String::new();
        out.push_str("\x1b[?25l\x1b[2J");

        let mut current: Option<GraphicsAttributes> = None;
        for row in 1..=self.size.rows {
            let _ = write!(out, "\x1b[{row};1H");
            let Some(line) = buffer.line(row) else { continue };
            for cell in line.cells() {
                if cell.width() == 0 {
                    continue;
                }
                if current != Some(*cell.attributes()) {
                    out.push_str(&sgr_sequence(cell.attributes()));
                    current = Some(*cell.attributes());
                }
                if cell.is_empty() {
                    out.push(' ');
                } else {
                    out.push_str(&cell.text());
                }
            }
        }

        out.push_str("\x1b[0m");
        let cursor = buffer.real_cursor_position();
        let _ = write!(out, "\x1b[{};{}H", cursor.row, cursor.column);
        if buffer.cursor().visible {
            out.push_str("\x1b[?25h");
        }
        out
    }

    // --- resize and reset -------------------------------------------------

    /// Resize both buffers; the viewport snaps back to the live view.
    pub fn resize(&mut self, new_size: WindowSize) {
        self.primary.resize(new_size);
        self.alternate.resize(new_size);
        self.size = new_size;
        self.scroll_offset = 0;
    }

    /// Default tab stop distance, applied to both buffers.
    pub fn set_tab_width(&mut self, width: usize) {
        self.primary.tabs_mut().set_tab_width(width);
        self.alternate.tabs_mut().set_tab_width(width);
    }

    /// DECSTR on the active buffer.
    pub fn reset_soft(&mut self) {
        self.buffer_mut().soft_reset();
    }

    /// RIS: rebuild both buffers and all auxiliary state.
    pub fn reset_hard(&mut self, hooks: &mut dyn Hooks) {
        let switched = self.active != BufferType::Main;
        self.primary =
            ScreenBuffer::new(BufferType::Main, self.size, self.max_history_line_count);
        self.alternate =
            ScreenBuffer::new(BufferType::Alternate, self.size, self.max_history_line_count);
        self.active = BufferType::Main;
        self.window_title.clear();
        self.saved_window_titles.clear();
        self.scroll_offset = 0;
        if switched {
            hooks.on_buffer_changed(BufferType::Main);
        }
    }
}

/// Apply SGR sub-commands to a rendition.
fn apply_sgr(rendition: &mut GraphicsAttributes, commands: &[Sgr]) {
    for sgr in commands {
        match sgr {
            Sgr::Reset => rendition.reset(),
            Sgr::Bold => rendition.styles.insert(StyleFlags::BOLD),
            Sgr::Faint => rendition.styles.insert(StyleFlags::FAINT),
            Sgr::Italic => rendition.styles.insert(StyleFlags::ITALIC),
            Sgr::Underline => set_underline(rendition, StyleFlags::UNDERLINE),
            Sgr::DoublyUnderlined => set_underline(rendition, StyleFlags::DOUBLY_UNDERLINED),
            Sgr::CurlyUnderlined => set_underline(rendition, StyleFlags::CURLY_UNDERLINED),
            Sgr::DottedUnderline => set_underline(rendition, StyleFlags::DOTTED_UNDERLINE),
            Sgr::DashedUnderline => set_underline(rendition, StyleFlags::DASHED_UNDERLINE),
            Sgr::Blinking => rendition.styles.insert(StyleFlags::BLINKING),
            Sgr::Inverse => rendition.styles.insert(StyleFlags::INVERSE),
            Sgr::Hidden => rendition.styles.insert(StyleFlags::HIDDEN),
            Sgr::CrossedOut => rendition.styles.insert(StyleFlags::CROSSED_OUT),
            Sgr::Framed => rendition.styles.insert(StyleFlags::FRAMED),
            Sgr::Encircled => rendition.styles.insert(StyleFlags::ENCIRCLED),
            Sgr::NotBoldNorFaint => rendition
                .styles
                .remove(StyleFlags::BOLD | StyleFlags::FAINT),
            Sgr::NotItalic => rendition.styles.remove(StyleFlags::ITALIC),
            Sgr::NotUnderlined => rendition.styles.remove(StyleFlags::ANY_UNDERLINE),
            Sgr::NotBlinking => rendition.styles.remove(StyleFlags::BLINKING),
            Sgr::NotInverse => rendition.styles.remove(StyleFlags::INVERSE),
            Sgr::NotHidden => rendition.styles.remove(StyleFlags::HIDDEN),
            Sgr::NotCrossedOut => rendition.styles.remove(StyleFlags::CROSSED_OUT),
            Sgr::NotFramedNorEncircled => rendition
                .styles
                .remove(StyleFlags::FRAMED | StyleFlags::ENCIRCLED),
            Sgr::Foreground(color) => rendition.foreground = *color,
            Sgr::Background(color) => rendition.background = *color,
            Sgr::UnderlineColor(color) => rendition.underline = *color,
        }
    }
}

fn set_underline(rendition: &mut GraphicsAttributes, variant: StyleFlags) {
    rendition.styles.remove(StyleFlags::ANY_UNDERLINE);
    rendition.styles.insert(variant);
}

/// Minimal SGR sequence reproducing the given rendition from scratch.
fn sgr_sequence(attributes: &GraphicsAttributes) -> String {
    let mut params = vec!["0".to_string()];
    let styles = attributes.styles;

    for (flag, code) in [
        (StyleFlags::BOLD, "1"),
        (StyleFlags::FAINT, "2"),
        (StyleFlags::ITALIC, "3"),
        (StyleFlags::UNDERLINE, "4"),
        (StyleFlags::CURLY_UNDERLINED, "4"),
        (StyleFlags::DOTTED_UNDERLINE, "4"),
        (StyleFlags::DASHED_UNDERLINE, "4"),
        (StyleFlags::BLINKING, "5"),
        (StyleFlags::INVERSE, "7"),
        (StyleFlags::HIDDEN, "8"),
        (StyleFlags::CROSSED_OUT, "9"),
        (StyleFlags::DOUBLY_UNDERLINED, "21"),
        (StyleFlags::FRAMED, "51"),
        (StyleFlags::ENCIRCLED, "52"),
    ] {
        if styles.contains(flag) {
            params.push(code.to_string());
        }
    }

    push_color_params(&mut params, attributes.foreground, 30);
    push_color_params(&mut params, attributes.background, 40);
    if attributes.underline != Color::Default {
        match attributes.underline {
            Color::Indexed(index) | Color::Palette(index) => {
                params.push(format!("58;5;{index}"));
            }
            Color::Rgb(rgb) => params.push(format!("58;2;{};{};{}", rgb.r, rgb.g, rgb.b)),
            Color::Default => {}
        }
    }

    format!("\x1b[{}m", params.join(";"))
}

fn push_color_params(params: &mut Vec<String>, color: Color, base: u16) {
    match color {
        Color::Default => {}
        Color::Indexed(index) if index < 8 => {
            params.push((base + u16::from(index)).to_string());
        }
        Color::Indexed(index) => {
            params.push((base + 60 + u16::from(index - 8)).to_string());
        }
        Color::Palette(index) => params.push(format!("{};5;{index}", base + 8)),
        Color::Rgb(rgb) => {
            params.push(format!("{};2;{};{};{}", base + 8, rgb.r, rgb.g, rgb.b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::RgbColor;

    #[derive(Default)]
    struct Recorder {
        replies: Vec<String>,
        events: Vec<String>,
        commands: usize,
    }

    impl Hooks for Recorder {
        fn reply(&mut self, data: &str) {
            self.replies.push(data.to_string());
        }

        fn on_window_title_changed(&mut self, title: &str) {
            self.events.push(format!("title:{title}"));
        }

        fn on_buffer_changed(&mut self, buffer: BufferType) {
            self.events.push(format!("buffer:{buffer:?}"));
        }

        fn bell(&mut self) {
            self.events.push("bell".to_string());
        }

        fn set_bracketed_paste(&mut self, enable: bool) {
            self.events.push(format!("paste:{enable}"));
        }

        fn request_dynamic_color(&mut self, _name: DynamicColorName) -> Option<RgbColor> {
            Some(RgbColor::new(0x11, 0x22, 0x33))
        }

        fn on_command(&mut self, _command: &Command) {
            self.commands += 1;
        }
    }

    fn screen() -> Screen {
        Screen::new(WindowSize::new(80, 24), Some(100))
    }

    fn type_text(screen: &mut Screen, hooks: &mut Recorder, text: &str) {
        for c in text.chars() {
            screen.apply(&Command::print(c), hooks);
        }
    }

    #[test]
    fn test_print_and_trace_hook() {
        let mut s = screen();
        let mut hooks = Recorder::default();
        type_text(&mut s, &mut hooks, "Hi");
        assert_eq!(s.render_text_line(1).trim_end(), "Hi");
        assert_eq!(hooks.commands, 2);
    }

    #[test]
    fn test_alternate_screen_save_cursor_round_trip() {
        let mut s = screen();
        let mut hooks = Recorder::default();
        type_text(&mut s, &mut hooks, "main");
        s.apply(
            &Command::MoveCursorTo { row: 3, column: 7 },
            &mut hooks,
        );
        s.apply(
            &Command::SetMode {
                mode: Mode::AlternateScreenSaveCursor,
                enable: true,
            },
            &mut hooks,
        );
        assert!(s.is_alternate_screen());
        assert_eq!(s.render_text_line(1).trim_end(), "");
        type_text(&mut s, &mut hooks, "alt");

        s.apply(
            &Command::SetMode {
                mode: Mode::AlternateScreenSaveCursor,
                enable: false,
            },
            &mut hooks,
        );
        assert!(s.is_primary_screen());
        assert_eq!(s.render_text_line(1).trim_end(), "main");
        assert_eq!(s.real_cursor_position(), Coordinate::new(3, 7));
        assert_eq!(
            hooks.events,
            vec!["buffer:Alternate".to_string(), "buffer:Main".to_string()]
        );
    }

    #[test]
    fn test_device_status_and_cursor_reports() {
        let mut s = screen();
        let mut hooks = Recorder::default();
        s.apply(&Command::DeviceStatusReport, &mut hooks);
        s.apply(
            &Command::MoveCursorTo { row: 5, column: 12 },
            &mut hooks,
        );
        s.apply(&Command::ReportCursorPosition, &mut hooks);
        assert_eq!(hooks.replies, vec!["\x1b[0n", "\x1b[5;12R"]);
    }

    #[test]
    fn test_cursor_report_in_origin_mode() {
        let mut s = screen();
        let mut hooks = Recorder::default();
        s.apply(
            &Command::SetTopBottomMargin {
                top: Some(5),
                bottom: Some(20),
            },
            &mut hooks,
        );
        s.apply(
            &Command::SetMode {
                mode: Mode::Origin,
                enable: true,
            },
            &mut hooks,
        );
        s.apply(&Command::ReportCursorPosition, &mut hooks);
        assert_eq!(hooks.replies, vec!["\x1b[1;1R"]);
        assert_eq!(s.real_cursor_position(), Coordinate::new(5, 1));
    }

    #[test]
    fn test_request_mode_replies() {
        let mut s = screen();
        let mut hooks = Recorder::default();
        s.apply(&Command::RequestMode { mode: Mode::AutoWrap }, &mut hooks);
        s.apply(
            &Command::RequestMode {
                mode: Mode::BracketedPaste,
            },
            &mut hooks,
        );
        s.apply(&Command::RequestMode { mode: Mode::Insert }, &mut hooks);
        assert_eq!(
            hooks.replies,
            vec!["\x1b[?7;1$y", "\x1b[?2004;2$y", "\x1b[4;2$y"]
        );
    }

    #[test]
    fn test_tab_stop_report() {
        let mut s = Screen::new(WindowSize::new(20, 5), None);
        let mut hooks = Recorder::default();
        s.apply(&Command::RequestTabStops, &mut hooks);
        assert_eq!(hooks.replies, vec!["\x1bP2$u9/17\x1b\\"]);
    }

    #[test]
    fn test_dynamic_color_reply() {
        let mut s = screen();
        let mut hooks = Recorder::default();
        s.apply(
            &Command::RequestDynamicColor {
                name: DynamicColorName::DefaultBackgroundColor,
            },
            &mut hooks,
        );
        assert_eq!(hooks.replies, vec!["\x1b]11;rgb:1111/2222/3333\x1b\\"]);
    }

    #[test]
    fn test_window_title_stack() {
        let mut s = screen();
        let mut hooks = Recorder::default();
        s.apply(
            &Command::ChangeWindowTitle {
                title: "first".into(),
            },
            &mut hooks,
        );
        s.apply(&Command::SaveWindowTitle, &mut hooks);
        s.apply(
            &Command::ChangeWindowTitle {
                title: "second".into(),
            },
            &mut hooks,
        );
        s.apply(&Command::RestoreWindowTitle, &mut hooks);
        assert_eq!(s.window_title(), "first");
        // popping an empty stack is a no-op
        s.apply(&Command::RestoreWindowTitle, &mut hooks);
        assert_eq!(s.window_title(), "first");
    }

    #[test]
    fn test_sgr_underline_variants_are_exclusive() {
        let mut rendition = GraphicsAttributes::default();
        apply_sgr(&mut rendition, &[Sgr::Underline, Sgr::CurlyUnderlined]);
        assert!(rendition.styles.contains(StyleFlags::CURLY_UNDERLINED));
        assert!(!rendition.styles.contains(StyleFlags::UNDERLINE));
        apply_sgr(&mut rendition, &[Sgr::NotUnderlined]);
        assert!(!rendition.styles.intersects(StyleFlags::ANY_UNDERLINE));
    }

    #[test]
    fn test_sgr_bold_faint_compose() {
        let mut rendition = GraphicsAttributes::default();
        apply_sgr(&mut rendition, &[Sgr::Faint, Sgr::Bold]);
        assert!(rendition.styles.contains(StyleFlags::BOLD));
        assert!(rendition.styles.contains(StyleFlags::FAINT));
        apply_sgr(&mut rendition, &[Sgr::NotBoldNorFaint]);
        assert!(!rendition.styles.contains(StyleFlags::BOLD));
        assert!(!rendition.styles.contains(StyleFlags::FAINT));
    }

    #[test]
    fn test_viewport_scrolling() {
        let mut s = Screen::new(WindowSize::new(10, 3), Some(100));
        let mut hooks = Recorder::default();
        for i in 0..6 {
            type_text(&mut s, &mut hooks, &format!("l{i}"));
            s.apply(&Command::MoveCursorToBeginOfLine, &mut hooks);
            s.apply(&Command::Linefeed, &mut hooks);
        }
        assert!(s.history_line_count() > 0);
        assert!(s.scroll_up(2));
        assert_eq!(s.scroll_offset(), 2);
        assert!(s.scroll_down(1));
        assert_eq!(s.scroll_offset(), 1);
        assert!(s.scroll_to_top());
        assert_eq!(s.scroll_offset(), s.history_line_count());
        assert!(s.scroll_to_bottom());
        assert_eq!(s.scroll_offset(), 0);
    }

    #[test]
    fn test_render_at_shows_history() {
        let mut s = Screen::new(WindowSize::new(10, 2), Some(100));
        let mut hooks = Recorder::default();
        // push "l0" into history
        for i in 0..3 {
            type_text(&mut s, &mut hooks, &format!("l{i}"));
            s.apply(&Command::MoveCursorToBeginOfLine, &mut hooks);
            s.apply(&Command::Linefeed, &mut hooks);
        }
        let mut first_row = String::new();
        s.render_at(
            |row, _, cell| {
                if row == 1 && cell.width() > 0 {
                    let text = cell.text();
                    first_row.push_str(if cell.is_empty() { " " } else { &text });
                }
            },
            1,
        );
        assert_eq!(first_row.trim_end(), "l1");
    }

    #[test]
    fn test_screenshot_small_screen() {
        let mut s = Screen::new(WindowSize::new(3, 2), None);
        let mut hooks = Recorder::default();
        type_text(&mut s, &mut hooks, "AB");
        let shot = s.screenshot();
        assert_eq!(
            shot,
            "\x1b[?25l\x1b[2J\x1b[1;1H\x1b[0mAB \x1b[2;1H   \x1b[0m\x1b[1;3H\x1b[?25h"
        );
    }

    #[test]
    fn test_full_reset_is_idempotent() {
        let mut s = screen();
        let mut hooks = Recorder::default();
        type_text(&mut s, &mut hooks, "content");
        s.apply(
            &Command::SetMode {
                mode: Mode::UseAlternateScreen,
                enable: true,
            },
            &mut hooks,
        );
        s.apply(&Command::FullReset, &mut hooks);
        let once = (
            s.render_text(),
            s.real_cursor_position(),
            s.history_line_count(),
            s.window_title().to_string(),
        );
        s.apply(&Command::FullReset, &mut hooks);
        let twice = (
            s.render_text(),
            s.real_cursor_position(),
            s.history_line_count(),
            s.window_title().to_string(),
        );
        assert_eq!(once, twice);
        assert!(s.is_primary_screen());
        assert_eq!(s.render_text_line(1).trim_end(), "");
    }

    #[test]
    fn test_event_hooks_forwarded() {
        let mut s = screen();
        let mut hooks = Recorder::default();
        s.apply(&Command::Bell, &mut hooks);
        s.apply(
            &Command::SetMode {
                mode: Mode::BracketedPaste,
                enable: true,
            },
            &mut hooks,
        );
        assert_eq!(hooks.events, vec!["bell", "paste:true"]);
    }
}
