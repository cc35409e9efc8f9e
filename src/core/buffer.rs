//! Screen buffer
//!
//! One full grid with its cursor, margins, modes, tab stops, saved states,
//! hyperlinks, and (for the main buffer) scrollback. All coordinates on this
//! API are 1-based; the screen owns two of these and switches between them
//! for the alternate-screen modes.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use super::cell::{codepoint_width, Cell, GraphicsAttributes};
use super::charset::CharsetState;
use super::cursor::{Cursor, SavedState};
use super::hyperlink::{HyperlinkId, HyperlinkRegistry};
use super::line::Line;
use super::margin::{Margin, Span};
use super::modes::{Mode, ModeSet};
use super::scrollback::Scrollback;
use super::{Coordinate, TabStops, WindowSize};

/// Which buffer a [`ScreenBuffer`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BufferType {
    #[default]
    Main,
    Alternate,
}

/// Maximum depth of the DECSC stack; pushing past it drops the oldest entry.
const MAX_SAVED_STATES: usize = 64;

/// Whether `next` extends the grapheme cluster ending in `prev`.
fn is_grapheme_extension(prev: char, next: char) -> bool {
    let mut pair = String::with_capacity(8);
    pair.push(prev);
    pair.push(next);
    pair.graphemes(true).count() == 1
}

/// A single screen buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenBuffer {
    buffer_type: BufferType,
    size: WindowSize,
    margin: Margin,
    modes: ModeSet,
    pub(crate) cursor: Cursor,
    lines: Vec<Line>,
    saved_lines: Scrollback,
    pub(crate) auto_wrap: bool,
    pub(crate) wrap_pending: bool,
    pub(crate) cursor_restricted_to_margin: bool,
    tabs: TabStops,
    pub(crate) graphics_rendition: GraphicsAttributes,
    saved_states: Vec<SavedState>,
    pub(crate) charsets: CharsetState,
    current_hyperlink: Option<HyperlinkId>,
    hyperlinks: HyperlinkRegistry,
    /// Position of the most recently written base cell, for combining marks.
    last_cursor: Option<Coordinate>,
    /// Combining marks dropped from full cells.
    dropped_codepoints: u64,
}

impl ScreenBuffer {
    pub fn new(
        buffer_type: BufferType,
        size: WindowSize,
        max_history_line_count: Option<usize>,
    ) -> Self {
        let max_history = match buffer_type {
            BufferType::Main => max_history_line_count,
            BufferType::Alternate => Some(0),
        };
        let buffer = Self {
            buffer_type,
            size,
            margin: Margin::full(size),
            modes: ModeSet::new(),
            cursor: Cursor::default(),
            lines: vec![Line::new(size.columns); size.rows],
            saved_lines: Scrollback::new(max_history),
            auto_wrap: true,
            wrap_pending: false,
            cursor_restricted_to_margin: false,
            tabs: TabStops::default(),
            graphics_rendition: GraphicsAttributes::default(),
            saved_states: Vec::new(),
            charsets: CharsetState::default(),
            current_hyperlink: None,
            hyperlinks: HyperlinkRegistry::default(),
            last_cursor: None,
            dropped_codepoints: 0,
        };
        buffer.verify_state();
        buffer
    }

    // --- accessors -------------------------------------------------------

    pub fn buffer_type(&self) -> BufferType {
        self.buffer_type
    }

    pub fn size(&self) -> WindowSize {
        self.size
    }

    pub fn margin(&self) -> &Margin {
        &self.margin
    }

    pub fn modes(&self) -> &ModeSet {
        &self.modes
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn tabs(&self) -> &TabStops {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabStops {
        &mut self.tabs
    }

    pub fn graphics_rendition(&self) -> &GraphicsAttributes {
        &self.graphics_rendition
    }

    pub fn hyperlinks(&self) -> &HyperlinkRegistry {
        &self.hyperlinks
    }

    pub fn current_hyperlink(&self) -> Option<HyperlinkId> {
        self.current_hyperlink
    }

    pub fn history(&self) -> &Scrollback {
        &self.saved_lines
    }

    pub fn history_line_count(&self) -> usize {
        self.saved_lines.len()
    }

    pub fn set_max_history_line_count(&mut self, max: Option<usize>) {
        let max = match self.buffer_type {
            BufferType::Main => max,
            BufferType::Alternate => Some(0),
        };
        self.saved_lines.set_max_lines(max);
    }

    /// Combining marks dropped from full cells so far.
    pub fn dropped_codepoints(&self) -> u64 {
        self.dropped_codepoints
    }

    /// Line at 1-based `row`.
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row.wrapping_sub(1))
    }

    pub fn line_mut(&mut self, row: usize) -> Option<&mut Line> {
        self.lines.get_mut(row.wrapping_sub(1))
    }

    /// Cell at a 1-based coordinate.
    pub fn cell_at(&self, position: Coordinate) -> Option<&Cell> {
        self.line(position.row)
            .and_then(|line| line.cell(position.column.wrapping_sub(1)))
    }

    pub fn cell_at_mut(&mut self, position: Coordinate) -> Option<&mut Cell> {
        self.line_mut(position.row)
            .and_then(|line| line.cell_mut(position.column.wrapping_sub(1)))
    }

    pub fn is_mode_enabled(&self, mode: Mode) -> bool {
        self.modes.is_enabled(mode)
    }

    pub(crate) fn modes_mut(&mut self) -> &mut ModeSet {
        &mut self.modes
    }

    // --- coordinates and margins -----------------------------------------

    /// Home position: margin-local under DECOM, (1,1) otherwise.
    pub fn origin(&self) -> Coordinate {
        if self.cursor_restricted_to_margin {
            Coordinate::new(self.margin.vertical.from, self.margin.horizontal.from)
        } else {
            Coordinate::new(1, 1)
        }
    }

    pub fn real_cursor_position(&self) -> Coordinate {
        self.cursor.position()
    }

    /// Cursor position in the frame reports use: margin-local under DECOM.
    pub fn cursor_position(&self) -> Coordinate {
        if self.cursor_restricted_to_margin {
            Coordinate::new(
                self.cursor.row + 1 - self.margin.vertical.from,
                self.cursor.column + 1 - self.margin.horizontal.from,
            )
        } else {
            self.real_cursor_position()
        }
    }

    pub fn is_cursor_inside_margins(&self) -> bool {
        self.margin.vertical.contains(self.cursor.row)
            && (!self.modes.is_enabled(Mode::LeftRightMargin)
                || self.margin.horizontal.contains(self.cursor.column))
    }

    /// Rightmost column writes may advance into from the cursor's position.
    fn right_boundary(&self) -> usize {
        if self.cursor.column <= self.margin.horizontal.to {
            self.margin.horizontal.to
        } else {
            self.size.columns
        }
    }

    fn left_boundary(&self) -> usize {
        if self.cursor.column >= self.margin.horizontal.from {
            self.margin.horizontal.from
        } else {
            1
        }
    }

    fn top_boundary(&self) -> usize {
        if self.cursor.row >= self.margin.vertical.from {
            self.margin.vertical.from
        } else {
            1
        }
    }

    fn bottom_boundary(&self) -> usize {
        if self.cursor.row <= self.margin.vertical.to {
            self.margin.vertical.to
        } else {
            self.size.rows
        }
    }

    // --- blanks ----------------------------------------------------------

    /// Blank carrying the full current rendition (erase operations).
    fn blank_cell(&self) -> Cell {
        Cell::blank(self.graphics_rendition)
    }

    /// Blank for scroll-exposed lines: background-color erase only.
    fn scroll_blank_cell(&self) -> Cell {
        Cell::blank(GraphicsAttributes {
            background: self.graphics_rendition.background,
            ..GraphicsAttributes::default()
        })
    }

    fn scroll_blank_line(&self) -> Line {
        Line::filled(self.size.columns, self.scroll_blank_cell())
    }

    // --- printing --------------------------------------------------------

    /// Write a printable code point at the cursor.
    pub fn append_char(&mut self, codepoint: char, consecutive: bool) {
        let codepoint = self.charsets.map(codepoint);

        if consecutive && self.try_append_to_previous(codepoint) {
            return;
        }

        if self.wrap_pending && self.auto_wrap {
            let column = self.margin.horizontal.from;
            self.linefeed(column);
        }
        self.wrap_pending = false;

        let mut width = codepoint_width(codepoint).max(1);
        let right = self.right_boundary();

        if width == 2 && self.cursor.column == right {
            if self.auto_wrap {
                // a wide glyph cannot straddle the wrap: break the line now
                let column = self.margin.horizontal.from;
                self.linefeed(column);
            } else {
                width = 1;
            }
        }

        if self.modes.is_enabled(Mode::Insert) {
            let right0 = self.right_boundary() - 1;
            let blank = self.blank_cell();
            let column0 = self.cursor.column - 1;
            let row0 = self.cursor.row - 1;
            if let Some(line) = self.lines.get_mut(row0) {
                line.insert_cells(column0, width, right0, &blank);
            }
        }

        let attributes = self.graphics_rendition;
        let hyperlink = self.current_hyperlink;
        let position = self.cursor.position();

        if let Some(cell) = self.cell_at_mut(position) {
            cell.reset(attributes, hyperlink);
            cell.set_character(codepoint);
            if width == 1 {
                cell.set_width(1);
            }
        }
        self.last_cursor = Some(position);

        if width == 2 && position.column < self.size.columns {
            let next = Coordinate::new(position.row, position.column + 1);
            if let Some(cell) = self.cell_at_mut(next) {
                cell.reset(attributes, hyperlink);
                cell.set_wide_placeholder();
            }
        }

        let right = self.right_boundary();
        if position.column + width <= right {
            self.cursor.column = position.column + width;
        } else if self.auto_wrap {
            self.cursor.column = right;
            self.wrap_pending = true;
        } else {
            self.cursor.column = right;
        }
    }

    /// Combining-mark path: extend the cluster in the last written cell.
    fn try_append_to_previous(&mut self, codepoint: char) -> bool {
        let Some(position) = self.last_cursor else {
            return false;
        };
        let extends = match self.cell_at(position).and_then(|c| c.codepoints().last()) {
            Some(&base) => is_grapheme_extension(base, codepoint),
            None => false,
        };
        if !extends {
            return false;
        }

        let gain = match self.cell_at_mut(position) {
            Some(cell) => cell.append_codepoint(codepoint),
            None => return false,
        };
        match gain {
            None => {
                self.dropped_codepoints += 1;
            }
            Some(0) => {}
            // width grew under the cursor: blank the newly covered column,
            // unless the cursor still sits on the extended cell itself
            Some(gain) if self.cursor.position() != position => self.clear_and_advance(gain),
            Some(_) => {}
        }
        true
    }

    /// Write `count` blank cells at the cursor, advancing like a print.
    pub fn clear_and_advance(&mut self, count: usize) {
        let attributes = self.graphics_rendition;
        let hyperlink = self.current_hyperlink;
        for _ in 0..count {
            let position = self.cursor.position();
            if let Some(cell) = self.cell_at_mut(position) {
                cell.reset(attributes, hyperlink);
            }
            let right = self.right_boundary();
            if position.column < right {
                self.cursor.column = position.column + 1;
            } else if self.auto_wrap {
                self.wrap_pending = true;
                break;
            } else {
                break;
            }
        }
    }

    // --- vertical movement and scrolling ---------------------------------

    /// Line feed that also sets the column.
    ///
    /// At the bottom of the vertical margin the region scrolls up by one
    /// instead of the cursor moving.
    pub fn linefeed(&mut self, column: usize) {
        if self.cursor.row == self.margin.vertical.to {
            self.scroll_up(1);
        } else if self.cursor.row < self.size.rows {
            self.cursor.row += 1;
        }
        self.cursor.column = column.clamp(1, self.size.columns);
        self.wrap_pending = false;
    }

    /// IND: move down within the region, scrolling at the bottom margin.
    pub fn index(&mut self) {
        if self.cursor.row == self.margin.vertical.to {
            self.scroll_up(1);
        } else if self.cursor.row < self.size.rows {
            self.cursor.row += 1;
        }
        self.wrap_pending = false;
    }

    /// RI: the upward dual of [`ScreenBuffer::index`].
    pub fn reverse_index(&mut self) {
        if self.cursor.row == self.margin.vertical.from {
            self.scroll_down(1);
        } else if self.cursor.row > 1 {
            self.cursor.row -= 1;
        }
        self.wrap_pending = false;
    }

    /// DECBI: move left; at the left margin the region scrolls right.
    pub fn back_index(&mut self) {
        if self.cursor.column == self.margin.horizontal.from {
            self.insert_columns_at(self.margin.horizontal.from, 1);
        } else {
            self.move_cursor_backward(1);
        }
        self.wrap_pending = false;
    }

    /// DECFI: move right; at the right margin the region scrolls left.
    pub fn forward_index(&mut self) {
        if self.cursor.column == self.margin.horizontal.to {
            self.delete_columns_at(self.margin.horizontal.from, 1);
        } else {
            self.move_cursor_forward(1);
        }
        self.wrap_pending = false;
    }

    pub fn scroll_up(&mut self, count: usize) {
        let margin = self.margin;
        self.scroll_up_in(count, &margin);
    }

    pub fn scroll_down(&mut self, count: usize) {
        let margin = self.margin;
        self.scroll_down_in(count, &margin);
    }

    /// Scroll the region up by `count`, blanking at the bottom.
    ///
    /// Lines scrolled off the top reach scrollback only on the main buffer
    /// when the region is the whole screen; partial regions (and the
    /// alternate buffer) discard them.
    pub fn scroll_up_in(&mut self, count: usize, margin: &Margin) {
        let count = count.min(margin.vertical.length());
        if count == 0 {
            return;
        }

        if margin.full_width(self.size) {
            let top = margin.vertical.from - 1;
            let keep = self.buffer_type == BufferType::Main && margin.is_full_screen(self.size);
            for _ in 0..count {
                let line = self.lines.remove(top);
                if keep {
                    self.saved_lines.push(line);
                }
            }
            let blank_line = self.scroll_blank_line();
            let insert_at = margin.vertical.to - count;
            for _ in 0..count {
                self.lines.insert(insert_at, blank_line.clone());
            }
        } else {
            let left = margin.horizontal.from - 1;
            let right = margin.horizontal.to - 1;
            let blank = self.scroll_blank_cell();
            for row in margin.vertical.from..=margin.vertical.to - count {
                let source: Vec<Cell> =
                    self.lines[row - 1 + count].cells()[left..=right].to_vec();
                let target = &mut self.lines[row - 1];
                for (offset, cell) in source.into_iter().enumerate() {
                    if let Some(slot) = target.cell_mut(left + offset) {
                        *slot = cell;
                    }
                }
            }
            for row in margin.vertical.to - count + 1..=margin.vertical.to {
                self.lines[row - 1].fill_range(left, right, &blank);
            }
        }
        self.last_cursor = None;
    }

    /// Scroll the region down by `count`, blanking at the top. Lines pushed
    /// off the bottom are always discarded.
    pub fn scroll_down_in(&mut self, count: usize, margin: &Margin) {
        let count = count.min(margin.vertical.length());
        if count == 0 {
            return;
        }

        if margin.full_width(self.size) {
            let remove_at = margin.vertical.to - count;
            for _ in 0..count {
                self.lines.remove(remove_at);
            }
            let blank_line = self.scroll_blank_line();
            let top = margin.vertical.from - 1;
            for _ in 0..count {
                self.lines.insert(top, blank_line.clone());
            }
        } else {
            let left = margin.horizontal.from - 1;
            let right = margin.horizontal.to - 1;
            let blank = self.scroll_blank_cell();
            for row in (margin.vertical.from + count..=margin.vertical.to).rev() {
                let source: Vec<Cell> =
                    self.lines[row - 1 - count].cells()[left..=right].to_vec();
                let target = &mut self.lines[row - 1];
                for (offset, cell) in source.into_iter().enumerate() {
                    if let Some(slot) = target.cell_mut(left + offset) {
                        *slot = cell;
                    }
                }
            }
            for row in margin.vertical.from..margin.vertical.from + count {
                self.lines[row - 1].fill_range(left, right, &blank);
            }
        }
        self.last_cursor = None;
    }

    /// IL: insert blank lines at the cursor, pushing the region down.
    pub fn insert_lines(&mut self, count: usize) {
        if !self.is_cursor_inside_margins() {
            tracing::debug!("insert_lines outside margins ignored");
            return;
        }
        let region = Margin {
            vertical: Span::new(self.cursor.row, self.margin.vertical.to),
            horizontal: self.margin.horizontal,
        };
        self.scroll_down_in(count, &region);
    }

    /// DL: delete lines at the cursor, pulling the region up.
    pub fn delete_lines(&mut self, count: usize) {
        if !self.is_cursor_inside_margins() {
            tracing::debug!("delete_lines outside margins ignored");
            return;
        }
        let region = Margin {
            vertical: Span::new(self.cursor.row, self.margin.vertical.to),
            horizontal: self.margin.horizontal,
        };
        self.scroll_up_in(count, &region);
    }

    // --- column operations -----------------------------------------------

    fn insert_columns_at(&mut self, column: usize, count: usize) {
        let blank = self.scroll_blank_cell();
        let right0 = self.margin.horizontal.to - 1;
        for row in self.margin.vertical.from..=self.margin.vertical.to {
            self.lines[row - 1].insert_cells(column - 1, count, right0, &blank);
        }
        self.last_cursor = None;
    }

    fn delete_columns_at(&mut self, column: usize, count: usize) {
        let blank = self.scroll_blank_cell();
        let right0 = self.margin.horizontal.to - 1;
        for row in self.margin.vertical.from..=self.margin.vertical.to {
            self.lines[row - 1].delete_cells(column - 1, count, right0, &blank);
        }
        self.last_cursor = None;
    }

    /// DECIC: insert blank columns at the cursor within the margins.
    pub fn insert_columns(&mut self, count: usize) {
        if !self.is_cursor_inside_margins() {
            tracing::debug!("insert_columns outside margins ignored");
            return;
        }
        self.insert_columns_at(self.cursor.column, count);
    }

    /// DECDC: delete columns at the cursor within the margins.
    pub fn delete_columns(&mut self, count: usize) {
        if !self.is_cursor_inside_margins() {
            tracing::debug!("delete_columns outside margins ignored");
            return;
        }
        self.delete_columns_at(self.cursor.column, count);
    }

    // --- character operations --------------------------------------------

    /// ICH: shift cells right within the line, from the cursor to the right
    /// margin.
    pub fn insert_chars(&mut self, count: usize) {
        let right0 = self.right_boundary() - 1;
        let column0 = self.cursor.column - 1;
        let blank = self.blank_cell();
        if let Some(line) = self.lines.get_mut(self.cursor.row - 1) {
            line.insert_cells(column0, count, right0, &blank);
        }
        self.last_cursor = None;
    }

    /// DCH: shift cells left within the line, from the cursor to the right
    /// margin.
    pub fn delete_chars(&mut self, count: usize) {
        let right0 = self.right_boundary() - 1;
        let column0 = self.cursor.column - 1;
        let blank = self.blank_cell();
        if let Some(line) = self.lines.get_mut(self.cursor.row - 1) {
            line.delete_cells(column0, count, right0, &blank);
        }
        self.last_cursor = None;
    }

    /// ECH: blank `count` cells from the cursor without moving it.
    pub fn erase_characters(&mut self, count: usize) {
        self.wrap_pending = false;
        let count = count.max(1);
        let start = self.cursor.column - 1;
        let end = (self.cursor.column + count - 2).min(self.size.columns - 1);
        let blank = self.blank_cell();
        if let Some(line) = self.lines.get_mut(self.cursor.row - 1) {
            line.fill_range(start, end, &blank);
        }
    }

    // --- erase -----------------------------------------------------------

    pub fn clear_to_end_of_line(&mut self) {
        self.wrap_pending = false;
        let start = self.cursor.column - 1;
        let end = self.size.columns - 1;
        let blank = self.blank_cell();
        if let Some(line) = self.lines.get_mut(self.cursor.row - 1) {
            line.fill_range(start, end, &blank);
        }
    }

    pub fn clear_to_begin_of_line(&mut self) {
        self.wrap_pending = false;
        let end = self.cursor.column - 1;
        let blank = self.blank_cell();
        if let Some(line) = self.lines.get_mut(self.cursor.row - 1) {
            line.fill_range(0, end, &blank);
        }
    }

    pub fn clear_line(&mut self) {
        self.wrap_pending = false;
        let blank = self.blank_cell();
        if let Some(line) = self.lines.get_mut(self.cursor.row - 1) {
            line.fill(&blank);
        }
    }

    pub fn clear_to_end_of_screen(&mut self) {
        self.clear_to_end_of_line();
        let blank = self.blank_cell();
        for line in self.lines.iter_mut().skip(self.cursor.row) {
            line.fill(&blank);
        }
    }

    pub fn clear_to_begin_of_screen(&mut self) {
        self.clear_to_begin_of_line();
        let blank = self.blank_cell();
        for line in self.lines.iter_mut().take(self.cursor.row - 1) {
            line.fill(&blank);
        }
    }

    pub fn clear_screen(&mut self) {
        self.wrap_pending = false;
        let blank = self.blank_cell();
        for line in &mut self.lines {
            line.fill(&blank);
        }
        self.last_cursor = None;
    }

    pub fn clear_scrollback(&mut self) {
        self.saved_lines.clear();
    }

    /// DECALN: fill the screen with 'E', reset margins, home the cursor.
    pub fn screen_alignment_pattern(&mut self) {
        self.margin = Margin::full(self.size);
        self.wrap_pending = false;
        let fill = Cell::new('E', GraphicsAttributes::default());
        for line in &mut self.lines {
            line.fill(&fill);
        }
        self.cursor.set_position(Coordinate::new(1, 1));
        self.last_cursor = None;
    }

    // --- cursor movement --------------------------------------------------

    pub fn move_cursor_up(&mut self, count: usize) {
        let top = self.top_boundary();
        self.cursor.row = self.cursor.row.saturating_sub(count).max(top);
        self.wrap_pending = false;
    }

    pub fn move_cursor_down(&mut self, count: usize) {
        let bottom = self.bottom_boundary();
        self.cursor.row = (self.cursor.row + count).min(bottom);
        self.wrap_pending = false;
    }

    pub fn move_cursor_forward(&mut self, count: usize) {
        let right = if self.cursor.column <= self.margin.horizontal.to {
            self.margin.horizontal.to
        } else {
            self.size.columns
        };
        self.cursor.column = (self.cursor.column + count).min(right);
        self.wrap_pending = false;
    }

    pub fn move_cursor_backward(&mut self, count: usize) {
        let left = self.left_boundary();
        self.cursor.column = self.cursor.column.saturating_sub(count).max(left);
        self.wrap_pending = false;
    }

    pub fn cursor_next_line(&mut self, count: usize) {
        self.move_cursor_down(count);
        self.cursor.column = self.margin.horizontal.from;
    }

    pub fn cursor_previous_line(&mut self, count: usize) {
        self.move_cursor_up(count);
        self.cursor.column = self.margin.horizontal.from;
    }

    /// CR: return to the left margin.
    pub fn move_to_begin_of_line(&mut self) {
        self.cursor.column = self.left_boundary();
        self.wrap_pending = false;
    }

    /// CHA/HPA: absolute column in the current DECOM frame.
    pub fn move_cursor_to_column(&mut self, column: usize) {
        self.cursor.column = if self.cursor_restricted_to_margin {
            (self.margin.horizontal.from + column - 1).clamp(
                self.margin.horizontal.from,
                self.margin.horizontal.to,
            )
        } else {
            column.clamp(1, self.size.columns)
        };
        self.wrap_pending = false;
    }

    /// VPA: absolute row in the current DECOM frame.
    pub fn move_cursor_to_line(&mut self, row: usize) {
        self.cursor.row = if self.cursor_restricted_to_margin {
            (self.margin.vertical.from + row - 1)
                .clamp(self.margin.vertical.from, self.margin.vertical.to)
        } else {
            row.clamp(1, self.size.rows)
        };
        self.wrap_pending = false;
    }

    /// CUP: absolute position in the current DECOM frame.
    pub fn move_cursor_to(&mut self, row: usize, column: usize) {
        self.move_cursor_to_line(row);
        self.move_cursor_to_column(column);
    }

    pub fn move_cursor_to_origin(&mut self) {
        let origin = self.origin();
        self.cursor.set_position(origin);
        self.wrap_pending = false;
    }

    /// HT and CHT: advance to the next tab stop `count` times.
    pub fn move_to_next_tab(&mut self, count: usize) {
        let right = self.right_boundary();
        for _ in 0..count.max(1) {
            self.cursor.column = self.tabs.next_stop(self.cursor.column, right);
        }
        self.wrap_pending = false;
    }

    /// CBT: move back to the previous tab stop `count` times.
    pub fn move_to_previous_tab(&mut self, count: usize) {
        let left = self.left_boundary();
        for _ in 0..count.max(1) {
            self.cursor.column = self.tabs.prev_stop(self.cursor.column, left);
        }
        self.wrap_pending = false;
    }

    // --- saved state ------------------------------------------------------

    /// DECSC.
    pub fn save_state(&mut self) {
        if self.saved_states.len() == MAX_SAVED_STATES {
            self.saved_states.remove(0);
        }
        self.saved_states.push(SavedState {
            cursor_position: self.cursor.position(),
            graphics_rendition: self.graphics_rendition,
            auto_wrap: self.auto_wrap,
            origin_mode: self.cursor_restricted_to_margin,
            charsets: self.charsets,
        });
    }

    /// DECRC: pop and reinstate; an empty stack restores the baseline.
    pub fn restore_state(&mut self) {
        let state = self.saved_states.pop().unwrap_or_default();
        self.graphics_rendition = state.graphics_rendition;
        self.auto_wrap = state.auto_wrap;
        self.cursor_restricted_to_margin = state.origin_mode;
        self.charsets = state.charsets;
        self.modes.set(Mode::AutoWrap, state.auto_wrap);
        self.modes.set(Mode::Origin, state.origin_mode);
        self.cursor.row = state.cursor_position.row.clamp(1, self.size.rows);
        self.cursor.column = state.cursor_position.column.clamp(1, self.size.columns);
        self.wrap_pending = false;
    }

    // --- margins ----------------------------------------------------------

    /// DECSTBM. Invalid ranges are ignored.
    pub fn set_top_bottom_margin(&mut self, top: Option<usize>, bottom: Option<usize>) {
        let top = top.unwrap_or(1).max(1);
        let bottom = bottom.unwrap_or(self.size.rows).min(self.size.rows);
        if top >= bottom {
            tracing::debug!(top, bottom, "ignoring invalid DECSTBM range");
            return;
        }
        self.margin.vertical = Span::new(top, bottom);
        self.move_cursor_to_origin();
    }

    /// DECSLRM; only honored while left/right margin mode is enabled.
    pub fn set_left_right_margin(&mut self, left: Option<usize>, right: Option<usize>) {
        if !self.modes.is_enabled(Mode::LeftRightMargin) {
            tracing::debug!("ignoring DECSLRM while DECLRMM is disabled");
            return;
        }
        let left = left.unwrap_or(1).max(1);
        let right = right.unwrap_or(self.size.columns).min(self.size.columns);
        if left >= right {
            tracing::debug!(left, right, "ignoring invalid DECSLRM range");
            return;
        }
        self.margin.horizontal = Span::new(left, right);
        self.move_cursor_to_origin();
    }

    pub(crate) fn reset_horizontal_margin(&mut self) {
        self.margin.horizontal = Span::new(1, self.size.columns);
    }

    pub(crate) fn reset_margins(&mut self) {
        self.margin = Margin::full(self.size);
    }

    // --- hyperlinks and marks ---------------------------------------------

    /// OSC 8: an empty URI ends the active hyperlink.
    pub fn set_hyperlink(&mut self, id: &str, uri: &str) {
        self.current_hyperlink = if uri.is_empty() {
            None
        } else {
            Some(self.hyperlinks.insert(id, uri))
        };
    }

    /// Mark the cursor's line for scrollback jumps.
    pub fn set_mark(&mut self) {
        let row = self.cursor.row;
        if let Some(line) = self.line_mut(row) {
            line.set_marked(true);
        }
    }

    /// Offset of the nearest marked line above the given viewport offset.
    pub fn find_prev_marker(&self, current_offset: usize) -> Option<usize> {
        let history = self.saved_lines.len();
        (current_offset + 1..=history).find(|&offset| {
            self.saved_lines
                .get(history - offset)
                .is_some_and(Line::is_marked)
        })
    }

    /// Offset of the nearest marked line below the given viewport offset.
    pub fn find_next_marker(&self, current_offset: usize) -> Option<usize> {
        let history = self.saved_lines.len();
        (1..current_offset).rev().find(|&offset| {
            self.saved_lines
                .get(history - offset)
                .is_some_and(Line::is_marked)
        })
    }

    // --- resize and reset -------------------------------------------------

    /// Resize in place: lines pad/truncate to the new width; on the main
    /// buffer excess top rows move into scrollback and regrowth pulls them
    /// back. Margins reset to the full screen.
    pub fn resize(&mut self, new_size: WindowSize) {
        if new_size == self.size {
            return;
        }

        let blank = Cell::default();
        for line in &mut self.lines {
            line.resize(new_size.columns, blank.clone());
        }
        for line in self.saved_lines.iter_mut() {
            line.resize(new_size.columns, blank.clone());
        }

        if new_size.rows < self.size.rows {
            let excess = self.size.rows - new_size.rows;
            for _ in 0..excess {
                let line = self.lines.remove(0);
                self.saved_lines.push(line);
            }
            self.cursor.row = self.cursor.row.saturating_sub(excess).max(1);
        } else if new_size.rows > self.size.rows {
            let mut missing = new_size.rows - self.size.rows;
            while missing > 0 {
                match self.saved_lines.pop() {
                    Some(line) => {
                        self.lines.insert(0, line);
                        self.cursor.row += 1;
                        missing -= 1;
                    }
                    None => break,
                }
            }
            for _ in 0..missing {
                self.lines.push(Line::filled(new_size.columns, blank.clone()));
            }
        }

        self.size = new_size;
        self.margin = Margin::full(new_size);
        self.tabs.truncate(new_size.columns);
        self.cursor.row = self.cursor.row.clamp(1, new_size.rows);
        self.cursor.column = self.cursor.column.clamp(1, new_size.columns);
        self.wrap_pending = false;
        self.last_cursor = None;
        self.verify_state();
    }

    /// DECSTR: reset rendition, margins, DECOM, DECAWM, saved states, and
    /// tab stops without touching the grid.
    pub fn soft_reset(&mut self) {
        self.graphics_rendition = GraphicsAttributes::default();
        self.margin = Margin::full(self.size);
        self.cursor_restricted_to_margin = false;
        self.auto_wrap = true;
        self.wrap_pending = false;
        self.saved_states.clear();
        self.tabs.clear_all();
        self.charsets = CharsetState::default();
        self.modes.set(Mode::Origin, false);
        self.modes.set(Mode::AutoWrap, true);
        self.modes.set(Mode::VisibleCursor, true);
        self.cursor.visible = true;
    }

    // --- rendering --------------------------------------------------------

    /// A single row as text, full width.
    pub fn render_text_line(&self, row: usize) -> String {
        self.line(row).map(Line::text).unwrap_or_default()
    }

    /// The whole grid as text, one LF per row.
    pub fn render_text(&self) -> String {
        let mut out = String::with_capacity(self.size.rows * (self.size.columns + 1));
        for row in 1..=self.size.rows {
            out.push_str(&self.render_text_line(row));
            out.push('\n');
        }
        out
    }

    // --- invariants -------------------------------------------------------

    /// Debug-build invariant check; violations are bugs, never expected.
    pub fn verify_state(&self) {
        if cfg!(debug_assertions) {
            debug_assert_eq!(self.lines.len(), self.size.rows);
            debug_assert!(self
                .lines
                .iter()
                .all(|line| line.len() == self.size.columns));
            debug_assert!((1..=self.size.rows).contains(&self.cursor.row));
            debug_assert!((1..=self.size.columns).contains(&self.cursor.column));
            debug_assert!(self.margin.vertical.from >= 1);
            debug_assert!(self.margin.vertical.from <= self.margin.vertical.to);
            debug_assert!(self.margin.vertical.to <= self.size.rows);
            debug_assert!(self.margin.horizontal.from >= 1);
            debug_assert!(self.margin.horizontal.from <= self.margin.horizontal.to);
            debug_assert!(self.margin.horizontal.to <= self.size.columns);
            debug_assert!(!self.wrap_pending || self.auto_wrap);
            if let Some(max) = self.saved_lines.max_lines() {
                debug_assert!(self.saved_lines.len() <= max);
            }
        }
    }
}
