//! Containers a ribbon attaches to.

use tracing::{debug, warn};

use crate::{
    backend::{Window, WindowEvent},
    error::Result,
    render::Canvas,
    ui::coordinator::HostContainer,
};

/// A ribbon placed inside a surrounding layout. Attaching only records that
/// the layout now holds the ribbon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineHost {
    attached: bool,
    attach_count: usize,
}

impl InlineHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the ribbon was attached since creation.
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }
}

impl HostContainer for InlineHost {
    fn has_parent(&self) -> bool {
        true
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn attach(&mut self) {
        self.attached = true;
        self.attach_count += 1;
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn save_state(&self) -> Vec<u8> {
        vec![u8::from(self.attached)]
    }

    fn restore_state(&mut self, state: &[u8]) {
        self.attached = state.first().is_some_and(|b| *b != 0);
    }
}

/// Orphan-mode host: the ribbon owns a top-level window of its own.
///
/// Attaching maps the window and detaching unmaps it. Window system errors are
/// logged here and never reach the coordinator.
pub struct WindowHost<W> {
    window: W,
}

impl<W: Window> WindowHost<W> {
    pub fn new(window: W) -> Self {
        Self {
            window,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn size(&self) -> (u32, u32) {
        self.window.size()
    }

    /// Uploads a rendered frame. Skipped while the window is unmapped.
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        if !self.window.is_mapped() {
            return Ok(());
        }
        self.window.set_contents(canvas)
    }

    pub fn poll_event(&mut self) -> Result<Option<WindowEvent>> {
        self.window.poll_for_event()
    }
}

impl<W: Window> HostContainer for WindowHost<W> {
    fn has_parent(&self) -> bool {
        false
    }

    fn is_attached(&self) -> bool {
        self.window.is_mapped()
    }

    fn attach(&mut self) {
        match self.window.show() {
            Ok(()) => debug!("ribbon window mapped"),
            Err(e) => warn!("could not map ribbon window: {e}"),
        }
    }

    fn detach(&mut self) {
        match self.window.hide() {
            Ok(()) => debug!("ribbon window unmapped"),
            Err(e) => warn!("could not unmap ribbon window: {e}"),
        }
    }
}

impl<W> std::fmt::Debug for WindowHost<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowHost").finish_non_exhaustive()
    }
}
