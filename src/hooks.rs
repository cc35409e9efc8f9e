//! Embedder callbacks
//!
//! The screen pushes side effects out through this trait: replies to the
//! host, mode projections for the input generator, window management, bell,
//! notifications, and a trace hook that sees every applied command. Every
//! method has a no-op default, so embedders implement only what they need;
//! with no `reply` implementation replies are discarded.
//!
//! Hooks are invoked synchronously from within command application and must
//! not re-enter the screen's write path.

use crate::command::Command;
use crate::core::buffer::BufferType;
use crate::core::color::{DynamicColorName, RgbColor};
use crate::core::cursor::{CursorDisplay, CursorShape};
use crate::core::modes::{MouseProtocol, MouseTransport, MouseWheelMode};

/// Outbound interface of the screen.
#[allow(unused_variables)]
pub trait Hooks {
    /// Terminal-to-host reply, already encoded (CSI/DCS/OSC response).
    fn reply(&mut self, data: &str) {}

    /// The window title changed (OSC 0/2 or a title-stack pop).
    fn on_window_title_changed(&mut self, title: &str) {}

    /// The application asked the host to resize the window.
    fn resize_window(&mut self, width: usize, height: usize, in_pixels: bool) {}

    fn set_application_keypad_mode(&mut self, enable: bool) {}

    fn use_application_cursor_keys(&mut self, enable: bool) {}

    fn set_bracketed_paste(&mut self, enable: bool) {}

    fn set_generate_focus_events(&mut self, enable: bool) {}

    fn set_mouse_protocol(&mut self, protocol: MouseProtocol, enable: bool) {}

    fn set_mouse_transport(&mut self, transport: MouseTransport) {}

    fn set_mouse_wheel_mode(&mut self, mode: MouseWheelMode) {}

    fn set_cursor_style(&mut self, display: CursorDisplay, shape: CursorShape) {}

    /// The active buffer switched between main and alternate.
    fn on_buffer_changed(&mut self, buffer: BufferType) {}

    fn bell(&mut self) {}

    /// Asked for a dynamic color; `None` suppresses the reply.
    fn request_dynamic_color(&mut self, name: DynamicColorName) -> Option<RgbColor> {
        None
    }

    fn set_dynamic_color(&mut self, name: DynamicColorName, color: RgbColor) {}

    fn reset_dynamic_color(&mut self, name: DynamicColorName) {}

    fn notify(&mut self, title: &str, content: &str) {}

    /// Trace hook: sees every command before it is applied.
    fn on_command(&mut self, command: &Command) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHooks;

impl Hooks for NullHooks {}
