//! Tatami
//!
//! A VT/xterm-style terminal screen model: the in-memory grid and the
//! command interpreter that drives it. Tatami consumes parsed escape-sequence
//! commands and maintains a dual-buffer screen with styled cells, cursor,
//! margins, tab stops, modes, scrollback, saved states, and hyperlinks. It
//! does no parsing, rendering, or I/O itself; those live in the embedder:
//!
//! - an escape-sequence parser feeds [`Command`]s into [`Screen::apply`]
//! - a renderer reads cells back through [`Screen::render`]
//! - device queries are answered through the [`Hooks`] reply channel
//!
//! # Example
//!
//! ```
//! use tatami::{Command, NullHooks, Screen, WindowSize};
//!
//! let mut screen = Screen::new(WindowSize::new(80, 24), Some(10_000));
//! let mut hooks = NullHooks;
//!
//! for c in "Hello, World!".chars() {
//!     screen.apply(&Command::print(c), &mut hooks);
//! }
//!
//! assert_eq!(screen.render_text_line(1).trim_end(), "Hello, World!");
//! ```

pub mod command;
pub mod core;
pub mod hooks;

pub use command::{Command, Sgr, TabClear};
pub use core::{
    BufferType, Cell, Charset, CharsetTable, Color, ColorProfile, ColorTarget, Coordinate,
    Cursor, CursorDisplay, CursorShape, DynamicColorName, GraphicsAttributes, Hyperlink,
    HyperlinkId, Line, Margin, Mode, MouseProtocol, MouseTransport, MouseWheelMode, RgbColor,
    Screen, ScreenBuffer, Span, StyleFlags, WindowSize,
};
pub use hooks::{Hooks, NullHooks};
