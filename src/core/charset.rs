//! Character set designation
//!
//! G0-G3 designation (SCS) plus single-shift selection. Only the charsets
//! that change printable output are translated: DEC Special Graphics maps
//! the lowercase range onto line-drawing glyphs, and the UK set replaces
//! `#` with `£`.

use serde::{Deserialize, Serialize};

/// A designatable character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Charset {
    #[default]
    UsAscii,
    British,
    Special,
}

/// The four designation slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharsetTable {
    #[default]
    G0,
    G1,
    G2,
    G3,
}

impl CharsetTable {
    fn index(self) -> usize {
        match self {
            CharsetTable::G0 => 0,
            CharsetTable::G1 => 1,
            CharsetTable::G2 => 2,
            CharsetTable::G3 => 3,
        }
    }
}

/// Designations plus the pending single shift (SS2/SS3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharsetState {
    tables: [Charset; 4],
    shift: CharsetTable,
    single_shift: Option<CharsetTable>,
}

impl CharsetState {
    /// Designate `charset` into the given slot.
    pub fn designate(&mut self, table: CharsetTable, charset: Charset) {
        self.tables[table.index()] = charset;
    }

    pub fn designation(&self, table: CharsetTable) -> Charset {
        self.tables[table.index()]
    }

    /// Select `table` for the next printable character only.
    pub fn single_shift(&mut self, table: CharsetTable) {
        self.single_shift = Some(table);
    }

    /// Translate a printable code point, consuming any pending single shift.
    pub fn map(&mut self, cp: char) -> char {
        let table = self.single_shift.take().unwrap_or(self.shift);
        match self.tables[table.index()] {
            Charset::UsAscii => cp,
            Charset::British => {
                if cp == '#' {
                    '£'
                } else {
                    cp
                }
            }
            Charset::Special => special_graphics(cp),
        }
    }
}

/// DEC Special Graphics: `0x60..=0x7e` become line-drawing glyphs.
fn special_graphics(cp: char) -> char {
    match cp {
        '`' => '\u{25C6}', // diamond
        'a' => '\u{2592}', // checkerboard
        'b' => '\u{2409}',
        'c' => '\u{240C}',
        'd' => '\u{240D}',
        'e' => '\u{240A}',
        'f' => '\u{00B0}', // degree
        'g' => '\u{00B1}', // plus/minus
        'h' => '\u{2424}',
        'i' => '\u{240B}',
        'j' => '\u{2518}',
        'k' => '\u{2510}',
        'l' => '\u{250C}',
        'm' => '\u{2514}',
        'n' => '\u{253C}',
        'o' => '\u{23BA}',
        'p' => '\u{23BB}',
        'q' => '\u{2500}',
        'r' => '\u{23BC}',
        's' => '\u{23BD}',
        't' => '\u{251C}',
        'u' => '\u{2524}',
        'v' => '\u{2534}',
        'w' => '\u{252C}',
        'x' => '\u{2502}',
        'y' => '\u{2264}',
        'z' => '\u{2265}',
        '{' => '\u{03C0}',
        '|' => '\u{2260}',
        '}' => '\u{00A3}',
        '~' => '\u{00B7}',
        _ => cp,
    }
}
