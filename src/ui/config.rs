//! Ribbon configuration value object.

use std::time::Duration;

use crate::{render::Rgba, ui::Colors};

const DEFAULT_MIN: u32 = 0;
const DEFAULT_MAX: u32 = 100;
const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(300);
const DEFAULT_PADDING_DP: f32 = 16.0;
const DEFAULT_BORDER_DP: f32 = 1.0;
const DEFAULT_BORDER_RADIUS_DP: f32 = 8.0;
const DEFAULT_ELEVATION: f32 = 24.0;
const DEFAULT_TEXT_SIZE_SP: f32 = 16.0;

/// Shape of the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarStyle {
    #[default]
    Circular,
    Linear,
}

impl BarStyle {
    pub fn from_raw(raw: i64) -> Self {
        if raw == 1 {
            BarStyle::Linear
        } else {
            BarStyle::Circular
        }
    }

    pub fn raw(self) -> i64 {
        match self {
            BarStyle::Circular => 0,
            BarStyle::Linear => 1,
        }
    }
}

/// Entrance/exit animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationType {
    #[default]
    None,
    Fade,
    Scale,
    ScaleFade,
}

impl AnimationType {
    /// Maps a numeric animation id. Negative ids mean no animation; ids past
    /// the known range fall back to a plain fade.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            i64::MIN..=0 => AnimationType::None,
            1 => AnimationType::Fade,
            2 => AnimationType::Scale,
            3 => AnimationType::ScaleFade,
            _ => AnimationType::Fade,
        }
    }

    pub fn raw(self) -> i64 {
        match self {
            AnimationType::None => 0,
            AnimationType::Fade => 1,
            AnimationType::Scale => 2,
            AnimationType::ScaleFade => 3,
        }
    }

    pub fn fades(self) -> bool {
        matches!(self, AnimationType::Fade | AnimationType::ScaleFade)
    }

    pub fn scales(self) -> bool {
        matches!(self, AnimationType::Scale | AnimationType::ScaleFade)
    }
}

/// Animation kind together with its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSpec {
    pub kind: AnimationType,
    pub duration: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            kind: AnimationType::None,
            duration: DEFAULT_ANIMATION_DURATION,
        }
    }
}

/// Default delays applied when `show()`/`hide()` are called without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelayConfig {
    pub show_delay: Duration,
    pub hide_delay: Duration,
}

/// Where the label sits relative to the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextPosition {
    #[default]
    Under,
    Beside,
}

/// Unit of a size passed to a setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    /// Physical pixels.
    Px,
    /// Density-independent pixels.
    Dp,
    /// Scale-independent pixels (text). Treated like `Dp`.
    Sp,
}

impl SizeUnit {
    pub fn to_px(self, value: f32, density: f32) -> f32 {
        match self {
            SizeUnit::Px => value,
            SizeUnit::Dp | SizeUnit::Sp => value * density,
        }
    }
}

/// Vertical margin of the ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margin {
    Px(u32),
    /// Percentage of the parent's height, resolved at layout time.
    ParentPercent(u32),
}

impl Margin {
    pub fn resolve(self, parent_height: u32) -> u32 {
        match self {
            Margin::Px(px) => px,
            Margin::ParentPercent(pct) => {
                (pct as f32 / 100.0 * parent_height as f32).round() as u32
            }
        }
    }

    pub fn is_percentage(self) -> bool {
        matches!(self, Margin::ParentPercent(_))
    }
}

impl Default for Margin {
    fn default() -> Self {
        Margin::Px(0)
    }
}

/// Every visual and behavioural setting of a ribbon.
///
/// Sizes are physical pixels. Use [`SizeUnit::to_px`] with [`Self::density`]
/// when converting from density-independent values.
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonConfig {
    pub density: f32,

    pub border_color: Rgba,
    pub background_color: Rgba,
    pub text_color: Rgba,
    pub text_size: f32,

    pub delays: DelayConfig,
    pub animation: AnimationSpec,

    pub min: u32,
    pub max: u32,
    pub progress: u32,
    pub secondary_progress: u32,

    pub bar_style: BarStyle,
    pub text_position: TextPosition,

    pub padding_top: u32,
    pub padding_bottom: u32,
    pub margin_top: Margin,
    pub margin_bottom: Margin,
    pub border_size: u32,
    pub border_radius: f32,
    pub elevation: f32,

    pub indeterminate: bool,
    pub blocks_underlying: bool,
    pub orphan: bool,
    pub dialogue_mode: bool,
    pub report_progress_as_max_percent: bool,
    pub right_to_left: bool,
}

impl RibbonConfig {
    /// Defaults with colors taken from a palette.
    pub fn themed(colors: &Colors, density: f32) -> Self {
        let dp = |v: f32| SizeUnit::Dp.to_px(v, density);
        Self {
            density,
            border_color: colors.accent,
            background_color: colors.ribbon_bg,
            text_color: colors.text,
            text_size: SizeUnit::Sp.to_px(DEFAULT_TEXT_SIZE_SP, density).round(),
            delays: DelayConfig::default(),
            animation: AnimationSpec::default(),
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            progress: DEFAULT_MIN,
            secondary_progress: DEFAULT_MIN,
            bar_style: BarStyle::Circular,
            text_position: TextPosition::Under,
            padding_top: dp(DEFAULT_PADDING_DP).round() as u32,
            padding_bottom: dp(DEFAULT_PADDING_DP).round() as u32,
            margin_top: Margin::default(),
            margin_bottom: Margin::default(),
            border_size: dp(DEFAULT_BORDER_DP).round() as u32,
            border_radius: dp(DEFAULT_BORDER_RADIUS_DP),
            elevation: DEFAULT_ELEVATION,
            indeterminate: true,
            blocks_underlying: true,
            orphan: true,
            dialogue_mode: false,
            report_progress_as_max_percent: false,
            right_to_left: false,
        }
    }

    /// Restores `min <= progress, secondary <= max` after fields were set directly.
    pub fn normalized(mut self) -> Self {
        self.max = self.max.max(self.min);
        self.progress = self.progress.clamp(self.min, self.max);
        self.secondary_progress = self.secondary_progress.clamp(self.min, self.max);
        self
    }

    /// Text beside the indicator is only honoured for the circular style.
    pub fn text_beside_bar(&self) -> bool {
        self.text_position == TextPosition::Beside && self.bar_style == BarStyle::Circular
    }
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self::themed(&crate::ui::THEME_DARK, crate::ui::DEFAULT_DENSITY)
    }
}
