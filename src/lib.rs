//! progress-ribbon - A progress indicator band that shows and hides itself
//! with debounced delays and entrance/exit animations.
//!
//! The core is [`VisibilityCoordinator`], a single-threaded state machine
//! driven by [`poll`](VisibilityCoordinator::poll). [`ProgressRibbon`] adds
//! progress bookkeeping, appearance settings and save/restore on top.
//!
//! ```
//! use std::time::Duration;
//! use progress_ribbon::{InlineHost, ManualClock, ProgressRibbon, RibbonView, THEME_LIGHT};
//!
//! let clock = ManualClock::new();
//! let view = RibbonView::with_font(&THEME_LIGHT, None, 480, 800);
//! let mut ribbon = ProgressRibbon::new(view, InlineHost::new(), clock.clone());
//!
//! ribbon.set_show_delay(Duration::from_millis(500));
//! ribbon.show(None);
//! clock.advance(Duration::from_millis(500));
//! ribbon.poll();
//! assert!(ribbon.is_showing());
//! ```

pub mod backend;
pub mod error;
pub mod render;
pub mod ui;

pub use error::{Error, Result};
pub use render::{Canvas, Rgba};
pub use ui::attributes::{Attributes, Inflated, inflate};
pub use ui::config::{
    AnimationSpec, AnimationType, BarStyle, DelayConfig, Margin, RibbonConfig, SizeUnit,
    TextPosition,
};
pub use ui::coordinator::{
    Appearance, Direction, HostContainer, Origin, Renderer, VisibilityCoordinator,
    VisibilityState,
};
pub use ui::events::{EventKind, RibbonEvent, SubscriptionId};
pub use ui::host::{InlineHost, WindowHost};
pub use ui::ribbon::ProgressRibbon;
pub use ui::state::{Bundle, Value};
pub use ui::timer::{Clock, ManualClock, SystemClock, TimerId, TimerQueue};
pub use ui::view::RibbonView;
pub use ui::{Colors, THEME_DARK, THEME_LIGHT, detect_theme};

/// Creates a dynamic ribbon for a surrounding layout, themed after the
/// desktop's color scheme and drawn with a system font.
pub fn ribbon(
    width: u32,
    parent_height: u32,
    config: RibbonConfig,
) -> ProgressRibbon<RibbonView, InlineHost, SystemClock> {
    let view = RibbonView::new(detect_theme(), width, parent_height);
    ProgressRibbon::with_config(config, view, InlineHost::new(), SystemClock)
}
