//! Software renderer for the ribbon.
//!
//! [`RibbonView`] keeps the last [`Appearance`] it was given and lays it out
//! as a full-width band, or an inset card in dialogue mode:
//!
//! ```text
//! ┌──────────────────────────────┐  <- border (top and bottom, all sides in dialogue mode)
//! │           padding            │
//! │             (◠)              │  <- 48dp spinner, or a linear bar
//! │           Loading…           │  <- label under (or beside) the indicator
//! │           padding            │
//! └──────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use bitflags::bitflags;
use tracing::warn;

use crate::{
    error::Result,
    render::{Canvas, Font},
    ui::{
        Colors,
        config::{AnimationSpec, BarStyle, RibbonConfig},
        coordinator::{Appearance, Direction, Renderer},
        widgets::{
            IndicatorColors, IndicatorState, Widget, fraction, point_in_rect,
            progress_bar::ProgressBar, spinner::Spinner,
        },
    },
};

const SIDE_MARGIN_DP: f32 = 24.0;
const TEXT_GAP_UNDER_DP: f32 = 8.0;
const TEXT_GAP_BESIDE_DP: f32 = 16.0;
const DIALOGUE_INSET_DP: f32 = 16.0;
/// One turn of the indeterminate animation.
const INDETERMINATE_CYCLE: Duration = Duration::from_millis(1500);

bitflags! {
    /// Edges of the ribbon that carry a border.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Borders: u8 {
        const TOP    = 0x01;
        const BOTTOM = 0x02;
        const LEFT   = 0x04;
        const RIGHT  = 0x08;
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        point_in_rect(x, y, self.x, self.y, self.width, self.height)
    }

    fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Where everything goes for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub band: Bounds,
    pub indicator: Bounds,
    pub text: Option<Bounds>,
    pub borders: Borders,
    /// Band plus both margins.
    pub total_height: u32,
}

#[derive(Debug, Clone, Copy)]
struct ActiveAnimation {
    direction: Direction,
    spec: AnimationSpec,
    started: Instant,
}

pub struct RibbonView {
    colors: &'static Colors,
    font: Option<Font>,
    config: RibbonConfig,
    text: String,
    progress: u32,
    secondary_progress: u32,
    visible: bool,
    animation: Option<ActiveAnimation>,
    epoch: Instant,
    width: u32,
    parent_height: u32,
}

impl RibbonView {
    /// A view drawing with a system font. Text is skipped when none is found.
    pub fn new(colors: &'static Colors, width: u32, parent_height: u32) -> Self {
        let config = RibbonConfig::themed(colors, crate::ui::DEFAULT_DENSITY);
        let font = Font::load(config.text_size)
            .inspect_err(|e| warn!("no usable font, the label will not be drawn: {e}"))
            .ok();
        Self::with_font(colors, font, width, parent_height)
    }

    pub fn with_font(
        colors: &'static Colors,
        font: Option<Font>,
        width: u32,
        parent_height: u32,
    ) -> Self {
        Self {
            colors,
            font,
            config: RibbonConfig::themed(colors, crate::ui::DEFAULT_DENSITY),
            text: String::new(),
            progress: 0,
            secondary_progress: 0,
            visible: false,
            animation: None,
            epoch: Instant::now(),
            width,
            parent_height,
        }
    }

    pub fn set_size(&mut self, width: u32, parent_height: u32) {
        self.width = width;
        self.parent_height = parent_height;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn config(&self) -> &RibbonConfig {
        &self.config
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Opacity and scale of the ribbon at `now`.
    pub fn transition_at(&self, now: Instant) -> (f32, f32) {
        let Some(anim) = self.animation else {
            return (1.0, 1.0);
        };
        let t = if anim.spec.duration.is_zero() {
            1.0
        } else {
            (now.saturating_duration_since(anim.started).as_secs_f32()
                / anim.spec.duration.as_secs_f32())
            .clamp(0.0, 1.0)
        };
        let v = match anim.direction {
            Direction::Show => t,
            Direction::Hide => 1.0 - t,
        };
        let alpha = if anim.spec.kind.fades() { v } else { 1.0 };
        let scale = if anim.spec.kind.scales() { v } else { 1.0 };
        (alpha, scale)
    }

    /// Whether a pointer at `(x, y)` lands on the ribbon itself.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.visible && self.layout().band.contains(x, y)
    }

    /// Whether a pointer event at `(x, y)` should stop here instead of
    /// reaching whatever is underneath.
    pub fn swallows_input(&self, x: i32, y: i32) -> bool {
        self.visible && (self.config.blocks_underlying || self.contains(x, y))
    }

    pub fn preferred_height(&self) -> u32 {
        self.layout().total_height
    }

    pub fn layout(&self) -> Layout {
        let c = &self.config;
        let dp = |v: f32| (v * c.density).round() as u32;
        let side = dp(SIDE_MARGIN_DP);

        let margin_top = c.margin_top.resolve(self.parent_height);
        let margin_bottom = c.margin_bottom.resolve(self.parent_height);
        let inset = if c.dialogue_mode { dp(DIALOGUE_INSET_DP) } else { 0 };
        let band_width = self.width.saturating_sub(inset * 2).max(1);
        let band_x = inset as i32;
        let border = c.border_size;
        let content_top = (margin_top + border + c.padding_top) as i32;

        let (ind_w, ind_h) = match c.bar_style {
            BarStyle::Circular => {
                let s = Spinner::new(c.density);
                (s.width(), s.height())
            }
            BarStyle::Linear => {
                let b = ProgressBar::new(band_width.saturating_sub(side * 2).max(1), c.density);
                (b.width(), b.height())
            }
        };

        let mut indicator = Bounds {
            x: 0,
            y: content_top,
            width: ind_w,
            height: ind_h,
        };
        let mut text = None;
        let content_height;

        if c.text_beside_bar() {
            let gap = dp(TEXT_GAP_BESIDE_DP);
            let avail = band_width.saturating_sub(side * 2 + ind_w + gap);
            let (tw, th) = self.measure_text(avail);
            content_height = ind_h.max(th);
            indicator.y = content_top + (content_height - ind_h) as i32 / 2;

            let leading = band_x + side as i32;
            let trailing = band_x + band_width as i32 - side as i32;
            if c.right_to_left {
                indicator.x = trailing - ind_w as i32;
            } else {
                indicator.x = leading;
            }
            if tw > 0 {
                let ty = content_top + (content_height - th) as i32 / 2;
                let tx = if c.right_to_left {
                    indicator.x - gap as i32 - tw as i32
                } else {
                    indicator.x + (ind_w + gap) as i32
                };
                text = Some(Bounds {
                    x: tx,
                    y: ty,
                    width: tw,
                    height: th,
                });
            }
        } else {
            let avail = band_width.saturating_sub(side * 2);
            let (tw, th) = self.measure_text(avail);
            indicator.x = band_x + (band_width as i32 - ind_w as i32) / 2;
            let gap = dp(TEXT_GAP_UNDER_DP);
            if tw > 0 {
                text = Some(Bounds {
                    x: band_x + (band_width as i32 - tw as i32) / 2,
                    y: content_top + (ind_h + gap) as i32,
                    width: tw,
                    height: th,
                });
                content_height = ind_h + gap + th;
            } else {
                content_height = ind_h;
            }
        }

        let band = Bounds {
            x: band_x,
            y: margin_top as i32,
            width: band_width,
            height: border * 2 + c.padding_top + c.padding_bottom + content_height,
        };
        let borders = if c.dialogue_mode {
            Borders::all()
        } else {
            Borders::TOP | Borders::BOTTOM
        };

        Layout {
            band,
            indicator,
            text,
            borders,
            total_height: margin_top + band.height + margin_bottom,
        }
    }

    fn measure_text(&self, max_width: u32) -> (u32, u32) {
        match &self.font {
            Some(font) if !self.text.is_empty() => {
                let (w, h) = font
                    .render(&self.text)
                    .with_max_width(max_width as f32)
                    .measure();
                (w.ceil() as u32, h.ceil() as u32)
            }
            _ => (0, 0),
        }
    }

    fn phase(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.epoch).as_secs_f32();
        (elapsed / INDETERMINATE_CYCLE.as_secs_f32()).fract()
    }

    /// Draws the current frame. Does nothing while hidden.
    pub fn draw(&self, canvas: &mut Canvas, now: Instant) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        let (alpha, scale) = self.transition_at(now);
        let layout = self.layout();

        if alpha >= 1.0 && scale >= 1.0 {
            self.draw_ribbon(canvas, &layout, now);
            return Ok(());
        }

        let mut layer = Canvas::new(canvas.width(), canvas.height())?;
        self.draw_ribbon(&mut layer, &layout, now);
        let (px, py) = layout.band.center();
        canvas.draw_canvas_faded(&layer, 0, 0, alpha, scale, px, py);
        Ok(())
    }

    fn draw_ribbon(&self, canvas: &mut Canvas, layout: &Layout, now: Instant) {
        let c = &self.config;
        let band = layout.band;
        let (x, y, w, h) = (
            band.x as f32,
            band.y as f32,
            band.width as f32,
            band.height as f32,
        );
        let radius = if c.dialogue_mode { c.border_radius } else { 0.0 };

        canvas.fill_shadow(x, y, w, h, radius, c.elevation / 2.0, self.colors.shadow);

        if c.dialogue_mode {
            canvas.fill_rounded_rect(x, y, w, h, radius, c.background_color);
            if c.border_size > 0 {
                let bw = c.border_size as f32;
                canvas.stroke_rounded_rect(
                    x + bw / 2.0,
                    y + bw / 2.0,
                    w - bw,
                    h - bw,
                    radius,
                    c.border_color,
                    bw,
                );
            }
        } else {
            canvas.fill_rect(x, y, w, h, c.background_color);
            let bw = c.border_size as f32;
            if bw > 0.0 {
                if layout.borders.contains(Borders::TOP) {
                    canvas.fill_rect(x, y, w, bw, c.border_color);
                }
                if layout.borders.contains(Borders::BOTTOM) {
                    canvas.fill_rect(x, y + h - bw, w, bw, c.border_color);
                }
            }
        }

        let colors = IndicatorColors {
            track: self.colors.progress_bg,
            fill: self.colors.progress_fill,
            secondary: self.colors.progress_secondary,
        };
        let state = IndicatorState {
            fraction: fraction(self.progress, c.min, c.max),
            secondary: fraction(self.secondary_progress, c.min, c.max),
            indeterminate: c.indeterminate,
            phase: self.phase(now),
            right_to_left: c.right_to_left,
        };
        let ind = layout.indicator;
        match c.bar_style {
            BarStyle::Circular => {
                let mut spinner = Spinner::new(c.density);
                spinner.set_position(ind.x, ind.y);
                spinner.draw(canvas, &colors, &state);
            }
            BarStyle::Linear => {
                let mut bar = ProgressBar::new(ind.width, c.density);
                bar.set_position(ind.x, ind.y);
                bar.draw(canvas, &colors, &state);
            }
        }

        if let (Some(font), Some(bounds)) = (&self.font, layout.text) {
            let label = font
                .render(&self.text)
                .with_color(c.text_color)
                .with_max_width(bounds.width as f32 + 1.0)
                .finish();
            if let Some(label) = label {
                canvas.draw_canvas(&label, bounds.x - 1, bounds.y - 1);
            }
        }
    }
}

impl Renderer for RibbonView {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn play_animation(&mut self, direction: Direction, spec: AnimationSpec, started: Instant) {
        self.animation = Some(ActiveAnimation {
            direction,
            spec,
            started,
        });
    }

    fn finish_animation(&mut self) {
        self.animation = None;
    }

    fn update(&mut self, appearance: &Appearance<'_>) {
        let size = appearance.config.text_size;
        if let Some(font) = &self.font {
            if (font.size() - size).abs() >= 0.5 {
                match font.resized(size) {
                    Ok(resized) => self.font = Some(resized),
                    Err(e) => warn!("could not resize font to {size}px: {e}"),
                }
            }
        }
        self.config = appearance.config.clone();
        self.text = appearance.text.to_string();
        self.progress = appearance.progress;
        self.secondary_progress = appearance.secondary_progress;
    }
}

impl std::fmt::Debug for RibbonView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RibbonView")
            .field("visible", &self.visible)
            .field("animation", &self.animation)
            .field("text", &self.text)
            .field("progress", &self.progress)
            .field("width", &self.width)
            .field("parent_height", &self.parent_height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{
        THEME_LIGHT,
        config::{AnimationType, Margin, TextPosition},
    };

    fn view() -> RibbonView {
        RibbonView::with_font(&THEME_LIGHT, None, 400, 800)
    }

    fn apply(view: &mut RibbonView, config: &RibbonConfig) {
        view.update(&Appearance {
            config,
            text: "",
            progress: 0,
            secondary_progress: 0,
        });
    }

    #[test]
    fn band_spans_width_with_top_and_bottom_borders() {
        let mut v = view();
        let config = RibbonConfig::themed(&THEME_LIGHT, 1.0);
        apply(&mut v, &config);

        let layout = v.layout();
        assert_eq!(layout.band.x, 0);
        assert_eq!(layout.band.width, 400);
        assert_eq!(layout.borders, Borders::TOP | Borders::BOTTOM);
        // 1px borders, 16dp padding each side, 48dp spinner
        assert_eq!(layout.band.height, 1 + 16 + 48 + 16 + 1);
        assert_eq!(layout.indicator.x, (400 - 48) / 2);
    }

    #[test]
    fn dialogue_mode_insets_and_borders_all_sides() {
        let mut v = view();
        let config = RibbonConfig {
            dialogue_mode: true,
            ..RibbonConfig::themed(&THEME_LIGHT, 1.0)
        };
        apply(&mut v, &config);

        let layout = v.layout();
        assert_eq!(layout.band.x, 16);
        assert_eq!(layout.band.width, 400 - 32);
        assert_eq!(layout.borders, Borders::all());
    }

    #[test]
    fn beside_layout_mirrors_for_rtl() {
        let mut v = view();
        let config = RibbonConfig {
            text_position: TextPosition::Beside,
            ..RibbonConfig::themed(&THEME_LIGHT, 1.0)
        };
        apply(&mut v, &config);
        assert_eq!(v.layout().indicator.x, 24);

        let rtl = RibbonConfig {
            right_to_left: true,
            ..config
        };
        apply(&mut v, &rtl);
        assert_eq!(v.layout().indicator.x, 400 - 24 - 48);
    }

    #[test]
    fn percentage_margins_follow_parent() {
        let mut v = view();
        let config = RibbonConfig {
            margin_top: Margin::ParentPercent(50),
            ..RibbonConfig::themed(&THEME_LIGHT, 1.0)
        };
        apply(&mut v, &config);
        assert_eq!(v.layout().band.y, 400);
    }

    #[test]
    fn fade_runs_both_ways() {
        let mut v = view();
        let start = Instant::now();
        let spec = AnimationSpec {
            kind: AnimationType::Fade,
            duration: Duration::from_millis(200),
        };

        v.play_animation(Direction::Show, spec, start);
        let (alpha, scale) = v.transition_at(start + Duration::from_millis(50));
        assert!((alpha - 0.25).abs() < 1e-3);
        assert_eq!(scale, 1.0);

        v.play_animation(Direction::Hide, spec, start);
        let (alpha, _) = v.transition_at(start + Duration::from_millis(150));
        assert!((alpha - 0.25).abs() < 1e-3);

        v.finish_animation();
        assert_eq!(v.transition_at(start), (1.0, 1.0));
    }

    #[test]
    fn hit_testing_respects_blocking() {
        let mut v = view();
        let config = RibbonConfig {
            blocks_underlying: false,
            ..RibbonConfig::themed(&THEME_LIGHT, 1.0)
        };
        apply(&mut v, &config);
        assert!(!v.contains(10, 10));

        v.set_visible(true);
        assert!(v.contains(10, 10));
        assert!(!v.swallows_input(10, 500));

        let blocking = RibbonConfig {
            blocks_underlying: true,
            ..config
        };
        apply(&mut v, &blocking);
        assert!(v.swallows_input(10, 500));
    }

    #[test]
    fn draws_background_only_when_visible() {
        let mut v = view();
        let config = RibbonConfig::themed(&THEME_LIGHT, 1.0);
        apply(&mut v, &config);
        let mut canvas = Canvas::new(400, 200).unwrap();
        let now = Instant::now();

        v.draw(&mut canvas, now).unwrap();
        assert_eq!(canvas.pixel(5, 40).unwrap().a, 0);

        v.set_visible(true);
        v.draw(&mut canvas, now).unwrap();
        assert_eq!(canvas.pixel(5, 40).unwrap().a, 255);
    }
}
