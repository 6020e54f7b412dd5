//! The progress ribbon: configuration, progress bookkeeping and visibility in
//! one object.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    error::Result,
    render::Rgba,
    ui::{
        Colors,
        attributes::{self, Attributes},
        config::{
            AnimationSpec, AnimationType, BarStyle, DelayConfig, Margin, RibbonConfig, SizeUnit,
            TextPosition,
        },
        coordinator::{
            Appearance, HostContainer, Origin, Renderer, VisibilityCoordinator, VisibilityState,
        },
        events::{EventKind, RibbonEvent, SubscriptionId},
        state::Bundle,
        timer::Clock,
    },
};

/// A progress indicator with a label, shown as a band across its host.
///
/// Visibility goes through [`VisibilityCoordinator`]; nothing happens on a
/// background thread, so call [`ProgressRibbon::poll`] from the event loop.
pub struct ProgressRibbon<R, H, C> {
    coordinator: VisibilityCoordinator<R, H, C>,
    config: RibbonConfig,
    text: String,
    /// Progress as drawn. Lags `config.progress` while frozen.
    displayed_progress: u32,
    displayed_secondary: u32,
    frozen: bool,
    do_not_show_on_attach: bool,
}

impl<R: Renderer, H: HostContainer, C: Clock> ProgressRibbon<R, H, C> {
    /// A dynamic ribbon with default settings.
    pub fn new(renderer: R, host: H, clock: C) -> Self {
        Self::with_config(RibbonConfig::default(), renderer, host, clock)
    }

    /// A dynamic ribbon. It attaches itself to `host` the first time it is shown.
    pub fn with_config(config: RibbonConfig, renderer: R, host: H, clock: C) -> Self {
        let mut config = config.normalized();
        config.orphan = !host.has_parent();
        if config.orphan {
            config.blocks_underlying = true;
        }
        Self::build(Origin::Dynamic, config, String::new(), false, renderer, host, clock)
    }

    /// A declarative ribbon read from layout attributes.
    ///
    /// It shows itself right away, honoring the configured show delay, unless
    /// `do-not-show-on-attach` is set.
    pub fn inflate(
        attrs: &Attributes,
        colors: &Colors,
        density: f32,
        renderer: R,
        host: H,
        clock: C,
    ) -> Result<Self> {
        let inflated = attributes::inflate(attrs, colors, density)?;
        let mut ribbon = Self::build(
            Origin::Declarative,
            inflated.config,
            inflated.text,
            inflated.do_not_show_on_attach,
            renderer,
            host,
            clock,
        );
        ribbon.show_on_attach();
        Ok(ribbon)
    }

    /// A dynamic ribbon configured from layout attributes, for hosts that
    /// only hold the ribbon while it is shown.
    ///
    /// Unlike [`Self::inflate`] it attaches itself when shown. It is shown
    /// with the configured delay unless `do-not-show-on-attach` is set.
    pub fn from_attributes(
        attrs: &Attributes,
        colors: &Colors,
        density: f32,
        renderer: R,
        host: H,
        clock: C,
    ) -> Result<Self> {
        let inflated = attributes::inflate(attrs, colors, density)?;
        let mut ribbon = Self::with_config(inflated.config, renderer, host, clock);
        ribbon.set_text(&inflated.text);
        if !inflated.do_not_show_on_attach {
            ribbon.show(None);
        }
        Ok(ribbon)
    }

    fn build(
        origin: Origin,
        config: RibbonConfig,
        text: String,
        do_not_show_on_attach: bool,
        renderer: R,
        host: H,
        clock: C,
    ) -> Self {
        let coordinator = VisibilityCoordinator::new(
            origin,
            config.delays,
            config.animation,
            renderer,
            host,
            clock,
        );
        let mut ribbon = Self {
            coordinator,
            displayed_progress: config.progress,
            displayed_secondary: config.secondary_progress,
            config,
            text,
            frozen: false,
            do_not_show_on_attach,
        };
        ribbon.refresh();
        ribbon
    }

    fn show_on_attach(&mut self) {
        if self.do_not_show_on_attach {
            self.coordinator.hide_no_delay();
        } else {
            self.coordinator.show(None);
        }
    }

    /// Pushes the current appearance to the renderer.
    fn refresh(&mut self) {
        let appearance = Appearance {
            config: &self.config,
            text: &self.text,
            progress: self.displayed_progress,
            secondary_progress: self.displayed_secondary,
        };
        self.coordinator.renderer_mut().update(&appearance);
    }

    pub fn config(&self) -> &RibbonConfig {
        &self.config
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn coordinator(&self) -> &VisibilityCoordinator<R, H, C> {
        &self.coordinator
    }

    pub fn renderer(&self) -> &R {
        self.coordinator.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.coordinator.renderer_mut()
    }

    pub fn host(&self) -> &H {
        self.coordinator.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.coordinator.host_mut()
    }

    pub fn origin(&self) -> Origin {
        self.coordinator.origin()
    }

    pub fn state(&self) -> VisibilityState {
        self.coordinator.state()
    }

    pub fn is_showing(&self) -> bool {
        self.coordinator.is_showing()
    }

    pub fn is_animating(&self) -> bool {
        self.coordinator.is_animating()
    }

    pub fn is_orphan(&self) -> bool {
        self.config.orphan
    }

    pub fn blocks_underlying(&self) -> bool {
        self.config.blocks_underlying
    }

    // Visibility

    pub fn show(&mut self, delay: Option<Duration>) {
        self.coordinator.show(delay);
    }

    pub fn show_no_delay(&mut self) {
        self.coordinator.show_no_delay();
    }

    pub fn hide(&mut self, delay: Option<Duration>) {
        self.coordinator.hide(delay);
    }

    pub fn hide_no_delay(&mut self) {
        self.coordinator.hide_no_delay();
    }

    pub fn remove_dynamic_ribbon(&mut self) {
        self.coordinator.remove_dynamic_ribbon();
    }

    pub fn poll(&mut self) -> usize {
        self.coordinator.poll()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.coordinator.next_deadline()
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&RibbonEvent) + 'static,
    ) -> SubscriptionId {
        self.coordinator.subscribe(kind, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.coordinator.unsubscribe(id)
    }

    // Progress

    pub fn min(&self) -> u32 {
        self.config.min
    }

    pub fn max(&self) -> u32 {
        self.config.max
    }

    /// Sets the minimum and resets progress to it. A minimum above the
    /// current maximum raises the maximum too.
    pub fn set_min(&mut self, min: u32) -> &mut Self {
        self.config.min = min;
        self.config.max = self.config.max.max(min);
        self.config.progress = min;
        self.config.secondary_progress = self.config.secondary_progress.max(min);
        self.displayed_progress = min;
        self.displayed_secondary = self.displayed_secondary.max(min);
        self.refresh();
        self
    }

    /// Sets the maximum. A value below the minimum silently becomes the
    /// minimum.
    pub fn set_max(&mut self, max: u32) -> &mut Self {
        if max < self.config.min {
            debug!(max, min = self.config.min, "maximum below minimum, clamping");
        }
        self.config.max = max.max(self.config.min);
        self.config.progress = self.config.progress.min(self.config.max);
        self.config.secondary_progress = self.config.secondary_progress.min(self.config.max);
        self.displayed_progress = self.displayed_progress.min(self.config.max);
        self.displayed_secondary = self.displayed_secondary.min(self.config.max);
        self.refresh();
        self
    }

    /// Stores a new progress value.
    ///
    /// Values at or below the minimum reset to the minimum. Larger values are
    /// capped at the maximum and only drawn while progress is not frozen.
    pub fn set_progress(&mut self, progress: u32) {
        let min = self.config.min;
        if progress == min {
            self.coordinator.emit(RibbonEvent::ProgressStarted(progress));
        }

        if progress > min {
            self.config.progress = progress.min(self.config.max);
            if !self.frozen {
                self.displayed_progress = self.config.progress;
                self.coordinator
                    .emit(RibbonEvent::ProgressChanged(self.config.progress));
            }
        } else {
            self.config.progress = min;
            self.displayed_progress = min;
        }
        self.refresh();

        if self.config.progress == self.config.max {
            self.coordinator
                .emit(RibbonEvent::ProgressStopped(self.config.progress));
        }
    }

    pub fn set_secondary_progress(&mut self, secondary: u32) {
        self.config.secondary_progress = secondary.clamp(self.config.min, self.config.max);
        if !self.frozen {
            self.displayed_secondary = self.config.secondary_progress;
            self.refresh();
        }
    }

    pub fn increment_progress_by(&mut self, diff: u32) {
        self.set_progress(self.config.progress.saturating_add(diff));
    }

    pub fn increment_secondary_progress_by(&mut self, diff: u32) {
        self.set_secondary_progress(self.config.secondary_progress.saturating_add(diff));
    }

    /// The drawn progress, or its percentage of the maximum when
    /// `report_progress_as_max_percent` is set.
    pub fn progress(&self) -> u32 {
        if !self.config.report_progress_as_max_percent {
            return self.displayed_progress;
        }
        match self.config.max {
            0 => 0,
            max => (u64::from(self.displayed_progress) * 100 / u64::from(max)) as u32,
        }
    }

    /// The stored progress, which may be ahead of [`Self::progress`] while frozen.
    pub fn raw_progress(&self) -> u32 {
        self.config.progress
    }

    pub fn secondary_progress(&self) -> u32 {
        self.config.secondary_progress
    }

    pub fn set_report_progress_as_max_percent(&mut self, value: bool) -> &mut Self {
        self.config.report_progress_as_max_percent = value;
        self
    }

    /// Keeps the drawn progress where it is. Later updates are stored but not drawn.
    pub fn freeze_progress(&mut self) -> &mut Self {
        self.frozen = true;
        if self.config.progress < self.config.max {
            self.coordinator
                .emit(RibbonEvent::ProgressStopped(self.config.progress));
        }
        self
    }

    /// Lifts a freeze and draws the latest stored progress.
    pub fn allow_progress(&mut self) -> &mut Self {
        self.frozen = false;
        self.displayed_progress = self.config.progress;
        self.displayed_secondary = self.config.secondary_progress;
        self.refresh();
        if self.config.progress >= self.config.min {
            self.coordinator
                .emit(RibbonEvent::ProgressStarted(self.config.progress));
        }
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn set_indeterminate(&mut self, indeterminate: bool) -> &mut Self {
        if self.config.indeterminate != indeterminate {
            self.config.indeterminate = indeterminate;
            self.refresh();
            self.coordinator
                .emit(RibbonEvent::IndeterminateChanged(indeterminate));
        }
        self
    }

    pub fn is_indeterminate(&self) -> bool {
        self.config.indeterminate
    }

    // Appearance

    pub fn set_text(&mut self, text: &str) -> &mut Self {
        self.text = text.to_string();
        self.refresh();
        self
    }

    pub fn set_text_color(&mut self, color: Rgba) -> &mut Self {
        self.config.text_color = color;
        self.refresh();
        self
    }

    pub fn set_text_size(&mut self, size: f32, unit: SizeUnit) -> &mut Self {
        self.config.text_size = unit.to_px(size, self.config.density).max(1.0);
        self.refresh();
        self
    }

    /// Switching to the linear bar moves the label under it.
    pub fn set_bar_style(&mut self, style: BarStyle) -> &mut Self {
        self.config.bar_style = style;
        if style == BarStyle::Linear {
            self.config.text_position = TextPosition::Under;
        }
        self.refresh();
        self
    }

    /// Text beside the bar only applies to the circular style; a linear bar
    /// keeps its label underneath.
    pub fn set_text_position(&mut self, position: TextPosition) -> &mut Self {
        self.config.text_position = match self.config.bar_style {
            BarStyle::Linear => TextPosition::Under,
            BarStyle::Circular => position,
        };
        self.refresh();
        self
    }

    pub fn set_dialogue_mode(&mut self, dialogue_mode: bool) -> &mut Self {
        self.config.dialogue_mode = dialogue_mode;
        self.refresh();
        self
    }

    pub fn set_border_size(&mut self, size: f32, unit: SizeUnit) -> &mut Self {
        self.config.border_size = unit.to_px(size, self.config.density).round() as u32;
        self.refresh();
        self
    }

    pub fn set_border_color(&mut self, color: Rgba) -> &mut Self {
        self.config.border_color = color;
        self.refresh();
        self
    }

    /// Only drawn in dialogue mode.
    pub fn set_border_radius(&mut self, radius: f32, unit: SizeUnit) -> &mut Self {
        self.config.border_radius = unit.to_px(radius, self.config.density);
        self.refresh();
        self
    }

    pub fn set_background_color(&mut self, color: Rgba) -> &mut Self {
        self.config.background_color = color;
        self.refresh();
        self
    }

    /// Clears both the background and the borders.
    pub fn set_transparent(&mut self) -> &mut Self {
        self.config.background_color = Rgba::TRANSPARENT;
        self.config.border_color = Rgba::TRANSPARENT;
        self.refresh();
        self
    }

    pub fn set_padding_top(&mut self, padding: f32, unit: SizeUnit) -> &mut Self {
        self.config.padding_top = unit.to_px(padding, self.config.density).round() as u32;
        self.refresh();
        self
    }

    pub fn set_padding_bottom(&mut self, padding: f32, unit: SizeUnit) -> &mut Self {
        self.config.padding_bottom = unit.to_px(padding, self.config.density).round() as u32;
        self.refresh();
        self
    }

    pub fn set_margin_top(&mut self, margin: Margin) -> &mut Self {
        self.config.margin_top = margin;
        self.refresh();
        self
    }

    pub fn set_margin_bottom(&mut self, margin: Margin) -> &mut Self {
        self.config.margin_bottom = margin;
        self.refresh();
        self
    }

    pub fn set_elevation(&mut self, elevation: f32) -> &mut Self {
        self.config.elevation = elevation.max(0.0);
        self.refresh();
        self
    }

    /// Whether input under the ribbon is swallowed. Orphan ribbons always block.
    pub fn set_view_blocking(&mut self, blocks: bool) -> &mut Self {
        if self.config.orphan && !blocks {
            debug!("orphan ribbon always blocks underlying input");
            return self;
        }
        self.config.blocks_underlying = blocks;
        self.refresh();
        self
    }

    pub fn set_right_to_left(&mut self, rtl: bool) -> &mut Self {
        self.config.right_to_left = rtl;
        self.refresh();
        self
    }

    pub fn set_show_delay(&mut self, delay: Duration) -> &mut Self {
        self.config.delays.show_delay = delay;
        self.coordinator.set_show_delay(delay);
        self
    }

    pub fn set_hide_delay(&mut self, delay: Duration) -> &mut Self {
        self.config.delays.hide_delay = delay;
        self.coordinator.set_hide_delay(delay);
        self
    }

    /// Ignored while an animation runs.
    pub fn set_animation_type(&mut self, kind: AnimationType) -> &mut Self {
        if self.coordinator.set_animation_kind(kind) {
            self.config.animation.kind = kind;
        }
        self
    }

    /// Ignored while an animation runs.
    pub fn set_animation_duration(&mut self, duration: Duration) -> &mut Self {
        if self.coordinator.set_animation_duration(duration) {
            self.config.animation.duration = duration;
        }
        self
    }

    // Persistence

    /// Captures everything needed to rebuild this ribbon.
    pub fn save_state(&self) -> Bundle {
        let c = &self.config;
        let mut bundle = Bundle::new();

        bundle.put_text("progress_text", &self.text);
        bundle.put_u32("border_color", c.border_color.to_argb());
        bundle.put_u32("background_color", c.background_color.to_argb());
        bundle.put_u32("text_color", c.text_color.to_argb());
        bundle.put_float("text_size", c.text_size);
        bundle.put_int("show_delay", millis(c.delays.show_delay));
        bundle.put_int("hide_delay", millis(c.delays.hide_delay));
        bundle.put_int("animation_type", c.animation.kind.raw());
        bundle.put_int("animation_duration", millis(c.animation.duration));
        bundle.put_u32("min", c.min);
        bundle.put_u32("max", c.max);
        bundle.put_u32("progress", c.progress);
        bundle.put_u32("secondary_progress", c.secondary_progress);
        bundle.put_u32("displayed_progress", self.displayed_progress);
        bundle.put_u32("displayed_secondary_progress", self.displayed_secondary);
        bundle.put_int("bar_style", c.bar_style.raw());
        bundle.put_bool("text_beside_bar", c.text_position == TextPosition::Beside);
        bundle.put_u32("padding_top", c.padding_top);
        bundle.put_u32("padding_bottom", c.padding_bottom);
        put_margin(&mut bundle, "margin_top", c.margin_top);
        put_margin(&mut bundle, "margin_bottom", c.margin_bottom);
        bundle.put_u32("border_size", c.border_size);
        bundle.put_float("border_radius", c.border_radius);
        bundle.put_float("elevation", c.elevation);
        bundle.put_float("density", c.density);
        bundle.put_bool("indeterminate", c.indeterminate);
        bundle.put_bool("blocks_underlying", c.blocks_underlying);
        bundle.put_bool("orphan", c.orphan);
        bundle.put_bool("dialogue_mode", c.dialogue_mode);
        bundle.put_bool(
            "report_progress_as_max_percent",
            c.report_progress_as_max_percent,
        );
        bundle.put_bool("right_to_left", c.right_to_left);

        bundle.put_bool("progress_frozen", self.frozen);
        bundle.put_bool("showing", self.coordinator.is_showing());
        bundle.put_bool("animation_in_progress", self.coordinator.is_animating());
        bundle.put_bool(
            "dynamically_created",
            self.coordinator.origin() == Origin::Dynamic,
        );
        bundle.put_bool("do_not_show_on_attach", self.do_not_show_on_attach);
        bundle.put_bytes("host_state", self.coordinator.host().save_state());

        bundle
    }

    /// Rebuilds the ribbon from [`Self::save_state`] output.
    ///
    /// A ribbon saved while showing comes back showing, without delay or
    /// animation. Otherwise a declarative ribbon goes through its normal
    /// show-on-attach path. Nothing changes when the record is incomplete.
    pub fn restore_state(&mut self, bundle: &Bundle) -> Result<()> {
        let text = bundle.text("progress_text")?.to_string();
        let config = RibbonConfig {
            density: bundle.float("density")?,
            border_color: Rgba::from_argb(bundle.u32("border_color")?),
            background_color: Rgba::from_argb(bundle.u32("background_color")?),
            text_color: Rgba::from_argb(bundle.u32("text_color")?),
            text_size: bundle.float("text_size")?,
            delays: DelayConfig {
                show_delay: duration(bundle, "show_delay")?,
                hide_delay: duration(bundle, "hide_delay")?,
            },
            animation: AnimationSpec {
                kind: AnimationType::from_raw(bundle.int("animation_type")?),
                duration: duration(bundle, "animation_duration")?,
            },
            min: bundle.u32("min")?,
            max: bundle.u32("max")?,
            progress: bundle.u32("progress")?,
            secondary_progress: bundle.u32("secondary_progress")?,
            bar_style: BarStyle::from_raw(bundle.int("bar_style")?),
            text_position: if bundle.bool("text_beside_bar")? {
                TextPosition::Beside
            } else {
                TextPosition::Under
            },
            padding_top: bundle.u32("padding_top")?,
            padding_bottom: bundle.u32("padding_bottom")?,
            margin_top: margin(bundle, "margin_top")?,
            margin_bottom: margin(bundle, "margin_bottom")?,
            border_size: bundle.u32("border_size")?,
            border_radius: bundle.float("border_radius")?,
            elevation: bundle.float("elevation")?,
            indeterminate: bundle.bool("indeterminate")?,
            blocks_underlying: bundle.bool("blocks_underlying")?,
            orphan: bundle.bool("orphan")?,
            dialogue_mode: bundle.bool("dialogue_mode")?,
            report_progress_as_max_percent: bundle.bool("report_progress_as_max_percent")?,
            right_to_left: bundle.bool("right_to_left")?,
        }
        .normalized();
        let displayed_progress = bundle.u32("displayed_progress")?;
        let displayed_secondary = bundle.u32("displayed_secondary_progress")?;
        let frozen = bundle.bool("progress_frozen")?;
        let showing = bundle.bool("showing")?;
        let was_animating = bundle.bool("animation_in_progress")?;
        let origin = if bundle.bool("dynamically_created")? {
            Origin::Dynamic
        } else {
            Origin::Declarative
        };
        let do_not_show_on_attach = bundle.bool("do_not_show_on_attach")?;
        let host_state = bundle.bytes("host_state")?;

        debug!(showing, was_animating, ?origin, "restoring ribbon state");

        self.coordinator.reset();
        self.coordinator.set_origin(origin);
        self.coordinator.set_show_delay(config.delays.show_delay);
        self.coordinator.set_hide_delay(config.delays.hide_delay);
        self.coordinator.set_animation_kind(config.animation.kind);
        self.coordinator
            .set_animation_duration(config.animation.duration);
        self.coordinator.host_mut().restore_state(host_state);

        self.displayed_progress = displayed_progress.clamp(config.min, config.max);
        self.displayed_secondary = displayed_secondary.clamp(config.min, config.max);
        self.config = config;
        self.text = text;
        self.frozen = frozen;
        self.do_not_show_on_attach = do_not_show_on_attach;
        self.refresh();

        if showing {
            self.coordinator.show_no_delay();
        } else if origin == Origin::Declarative {
            self.show_on_attach();
        }
        Ok(())
    }
}

impl<R, H, C> std::fmt::Debug for ProgressRibbon<R, H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressRibbon")
            .field("coordinator", &self.coordinator)
            .field("text", &self.text)
            .field("progress", &self.config.progress)
            .field("displayed_progress", &self.displayed_progress)
            .field("frozen", &self.frozen)
            .finish_non_exhaustive()
    }
}

fn millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

fn duration(bundle: &Bundle, key: &str) -> Result<Duration> {
    let ms = u64::try_from(bundle.int(key)?)
        .map_err(|_| crate::error::Error::state(key, "negative duration"))?;
    Ok(Duration::from_millis(ms))
}

fn put_margin(bundle: &mut Bundle, key: &str, margin: Margin) {
    let (value, percent) = match margin {
        Margin::Px(px) => (px, false),
        Margin::ParentPercent(pct) => (pct, true),
    };
    bundle.put_u32(key, value);
    bundle.put_bool(&format!("{key}_is_percent"), percent);
}

fn margin(bundle: &Bundle, key: &str) -> Result<Margin> {
    let value = bundle.u32(key)?;
    Ok(if bundle.bool(&format!("{key}_is_percent"))? {
        Margin::ParentPercent(value)
    } else {
        Margin::Px(value)
    })
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::ui::{coordinator::Direction, timer::ManualClock};

    #[derive(Default)]
    struct Recorder {
        visible: bool,
        last_progress: u32,
        last_text: String,
    }

    impl Renderer for Recorder {
        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }

        fn play_animation(&mut self, _: Direction, _: AnimationSpec, _: Instant) {}

        fn finish_animation(&mut self) {}

        fn update(&mut self, appearance: &Appearance<'_>) {
            self.last_progress = appearance.progress;
            self.last_text = appearance.text.to_string();
        }
    }

    struct Window;

    impl HostContainer for Window {
        fn has_parent(&self) -> bool {
            false
        }

        fn is_attached(&self) -> bool {
            false
        }

        fn attach(&mut self) {}

        fn detach(&mut self) {}
    }

    fn ribbon() -> TestRibbon {
        ProgressRibbon::new(Recorder::default(), Window, ManualClock::new())
    }

    type TestRibbon = ProgressRibbon<Recorder, Window, ManualClock>;

    fn record(ribbon: &mut TestRibbon) -> Rc<RefCell<Vec<RibbonEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [
            EventKind::ProgressStarted,
            EventKind::ProgressChanged,
            EventKind::ProgressStopped,
        ] {
            let log = log.clone();
            ribbon.subscribe(kind, move |event| log.borrow_mut().push(*event));
        }
        log
    }

    #[test]
    fn progress_at_min_resets_and_starts() {
        let mut r = ribbon();
        let log = record(&mut r);
        r.set_progress(40);
        r.set_progress(0);
        assert_eq!(r.progress(), 0);
        assert_eq!(
            *log.borrow(),
            vec![
                RibbonEvent::ProgressChanged(40),
                RibbonEvent::ProgressStarted(0)
            ]
        );
    }

    #[test]
    fn reaching_max_stops() {
        let mut r = ribbon();
        let log = record(&mut r);
        r.set_progress(250);
        assert_eq!(r.progress(), 100);
        assert_eq!(log.borrow().last(), Some(&RibbonEvent::ProgressStopped(100)));
    }

    #[test]
    fn frozen_progress_is_stored_but_not_drawn() {
        let mut r = ribbon();
        r.set_progress(10);
        r.freeze_progress();
        r.set_progress(60);
        assert_eq!(r.progress(), 10);
        assert_eq!(r.raw_progress(), 60);
        assert_eq!(r.renderer().last_progress, 10);

        r.allow_progress();
        assert_eq!(r.progress(), 60);
        assert_eq!(r.renderer().last_progress, 60);
    }

    #[test]
    fn percentage_reporting_uses_max() {
        let mut r = ribbon();
        r.set_max(200).set_report_progress_as_max_percent(true);
        r.set_progress(50);
        assert_eq!(r.progress(), 25);
    }

    #[test]
    fn max_below_min_snaps_to_min() {
        let mut r = ribbon();
        r.set_min(30).set_max(10);
        assert_eq!(r.max(), 30);
        assert_eq!(r.min(), 30);
    }

    #[test]
    fn orphan_ribbon_keeps_blocking() {
        let mut r = ribbon();
        assert!(r.is_orphan());
        r.set_view_blocking(false);
        assert!(r.blocks_underlying());
    }

    #[test]
    fn linear_bar_forces_text_under() {
        let mut r = ribbon();
        r.set_text_position(TextPosition::Beside);
        r.set_bar_style(BarStyle::Linear);
        assert_eq!(r.config().text_position, TextPosition::Under);
        r.set_text_position(TextPosition::Beside);
        assert_eq!(r.config().text_position, TextPosition::Under);
    }

    #[test]
    fn setters_reach_the_renderer() {
        let mut r = ribbon();
        r.set_text("Syncing");
        assert_eq!(r.renderer().last_text, "Syncing");
    }
}
