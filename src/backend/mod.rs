//! Window system access for orphan-mode ribbons.

#[cfg(feature = "x11")]
pub mod x11;

use crate::{error::Result, render::Canvas};

/// A top-level surface the ribbon can be drawn into.
pub trait Window {
    fn set_title(&mut self, title: &str) -> Result<()>;
    fn set_contents(&mut self, canvas: &Canvas) -> Result<()>;
    /// Maps the window above everything else.
    fn show(&mut self) -> Result<()>;
    fn hide(&mut self) -> Result<()>;
    fn is_mapped(&self) -> bool;
    fn poll_for_event(&mut self) -> Result<Option<WindowEvent>>;
    fn size(&self) -> (u32, u32);
}

/// Events that can be emitted by a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    CloseRequested,
    RedrawRequested,
    Resized { width: u32, height: u32 },
    ButtonPress(MouseButton, CursorPos),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPos {
    pub x: i16,
    pub y: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}
