//! The progress ribbon widget and its collaborators.

pub mod attributes;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod host;
pub mod ribbon;
pub mod state;
pub mod timer;
pub mod view;
pub(crate) mod widgets;

use crate::render::{Rgba, rgb};

/// Scale factor used when the host does not report one.
pub const DEFAULT_DENSITY: f32 = 1.0;

/// Color palette the ribbon falls back to when no colors are configured.
#[derive(Debug, Clone, Copy)]
pub struct Colors {
    pub ribbon_bg: Rgba,
    pub text: Rgba,
    pub accent: Rgba,
    pub progress_bg: Rgba,
    pub progress_fill: Rgba,
    pub progress_secondary: Rgba,
    pub progress_border: Rgba,
    pub shadow: Rgba,
}

/// Palette for light desktops.
pub static THEME_LIGHT: Colors = Colors {
    ribbon_bg: rgb(255, 255, 255),
    text: rgb(33, 33, 33),
    accent: rgb(63, 81, 181),
    progress_bg: rgb(224, 224, 228),
    progress_fill: rgb(63, 81, 181),
    progress_secondary: rgb(159, 168, 218),
    progress_border: rgb(189, 189, 189),
    shadow: Rgba::new(0, 0, 0, 50),
};

/// Palette for dark desktops.
pub static THEME_DARK: Colors = Colors {
    ribbon_bg: rgb(48, 48, 48),
    text: rgb(236, 236, 236),
    accent: rgb(121, 134, 203),
    progress_bg: rgb(66, 66, 70),
    progress_fill: rgb(121, 134, 203),
    progress_secondary: rgb(72, 82, 130),
    progress_border: rgb(97, 97, 97),
    shadow: Rgba::new(0, 0, 0, 80),
};

/// Picks a palette from `GTK_THEME`, then the GNOME color scheme. Falls back
/// to the dark palette.
pub fn detect_theme() -> &'static Colors {
    match prefers_dark() {
        Some(false) => &THEME_LIGHT,
        _ => &THEME_DARK,
    }
}

fn prefers_dark() -> Option<bool> {
    if let Some(name) = std::env::var_os("GTK_THEME") {
        return Some(name.to_string_lossy().to_ascii_lowercase().contains("dark"));
    }

    let scheme = std::process::Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
        .ok()?;
    let scheme = String::from_utf8_lossy(&scheme.stdout);
    if scheme.contains("dark") {
        Some(true)
    } else if scheme.contains("light") || scheme.contains("default") {
        Some(false)
    } else {
        None
    }
}
