//! Show/hide coordination.
//!
//! The coordinator owns the ribbon's visibility state machine:
//!
//! ```text
//! Hidden -> PendingShow -> (Animating(Show)) -> Showing
//! Showing -> PendingHide -> (Animating(Hide)) -> Hidden
//! ```
//!
//! Delays and animation completions are tasks on one [`TimerQueue`], run from
//! [`VisibilityCoordinator::poll`] on the caller's thread. A new request always
//! cancels the competing timer before anything else happens, so the last
//! request wins and a cancelled task never runs.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::ui::{
    config::{AnimationSpec, AnimationType, DelayConfig, RibbonConfig},
    events::{EventKind, RibbonEvent, SubscriptionId, Subscribers},
    timer::{Clock, TimerId, TimerQueue},
};

/// Which way an animation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Show,
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    PendingShow,
    Showing,
    PendingHide,
    Animating(Direction),
}

/// How the ribbon came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Placed by a layout; the layout owns attachment.
    Declarative,
    /// Created in code; the ribbon attaches itself when shown.
    Dynamic,
}

/// Everything a renderer needs to draw the ribbon's contents.
#[derive(Debug, Clone, Copy)]
pub struct Appearance<'a> {
    pub config: &'a RibbonConfig,
    pub text: &'a str,
    /// Progress as displayed, which lags the stored value while frozen.
    pub progress: u32,
    pub secondary_progress: u32,
}

/// The layer that changes what is on screen.
pub trait Renderer {
    fn set_visible(&mut self, visible: bool);

    /// Starts an entrance or exit animation. Completion is driven by the
    /// coordinator, which calls [`Renderer::finish_animation`] when `spec.duration`
    /// has elapsed or the animation is superseded.
    fn play_animation(&mut self, direction: Direction, spec: AnimationSpec, started: Instant);

    /// Drops any animation state, leaving alpha and scale at their resting values.
    fn finish_animation(&mut self);

    fn update(&mut self, appearance: &Appearance<'_>) {
        let _ = appearance;
    }
}

/// The parent container or window the ribbon attaches to.
///
/// Attach failures are the host's business; the coordinator never sees them.
pub trait HostContainer {
    /// False when the ribbon sits directly on the application window.
    fn has_parent(&self) -> bool;
    fn is_attached(&self) -> bool;
    fn attach(&mut self);
    fn detach(&mut self);

    /// Opaque host state stored alongside the ribbon's own saved state.
    fn save_state(&self) -> Vec<u8> {
        Vec::new()
    }

    fn restore_state(&mut self, state: &[u8]) {
        let _ = state;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Show,
    Hide,
    AnimationEnd(Direction),
}

pub struct VisibilityCoordinator<R, H, C> {
    renderer: R,
    host: H,
    clock: C,
    origin: Origin,
    state: VisibilityState,
    delays: DelayConfig,
    animation: AnimationSpec,
    timers: TimerQueue<Task>,
    show_timer: Option<TimerId>,
    hide_timer: Option<TimerId>,
    animation_timer: Option<TimerId>,
    /// Whether the renderer currently draws the ribbon.
    visible: bool,
    /// An attach-and-show completed and no hide has completed since.
    showing: bool,
    remove_after_hide: bool,
    events: Subscribers,
}

impl<R: Renderer, H: HostContainer, C: Clock> VisibilityCoordinator<R, H, C> {
    pub fn new(
        origin: Origin,
        delays: DelayConfig,
        animation: AnimationSpec,
        renderer: R,
        host: H,
        clock: C,
    ) -> Self {
        Self {
            renderer,
            host,
            clock,
            origin,
            state: VisibilityState::Hidden,
            delays,
            animation,
            timers: TimerQueue::new(),
            show_timer: None,
            hide_timer: None,
            animation_timer: None,
            visible: false,
            showing: false,
            remove_after_hide: false,
            events: Subscribers::new(),
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, VisibilityState::Animating(_))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: Origin) {
        self.origin = origin;
    }

    pub fn delays(&self) -> DelayConfig {
        self.delays
    }

    pub fn set_show_delay(&mut self, delay: Duration) {
        self.delays.show_delay = delay;
    }

    pub fn set_hide_delay(&mut self, delay: Duration) {
        self.delays.hide_delay = delay;
    }

    pub fn animation(&self) -> AnimationSpec {
        self.animation
    }

    /// Returns false, leaving the current kind, while an animation runs.
    pub fn set_animation_kind(&mut self, kind: AnimationType) -> bool {
        if self.is_animating() {
            debug!(?kind, "animation in progress, ignoring new animation type");
            return false;
        }
        self.animation.kind = kind;
        true
    }

    /// Returns false, leaving the current duration, while an animation runs.
    pub fn set_animation_duration(&mut self, duration: Duration) -> bool {
        if self.is_animating() {
            debug!(?duration, "animation in progress, ignoring new animation duration");
            return false;
        }
        self.animation.duration = duration;
        true
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&RibbonEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(kind, Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub(crate) fn emit(&mut self, event: RibbonEvent) {
        self.events.emit(event);
    }

    /// Number of queued show, hide and animation-completion tasks.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Requests the ribbon to appear after `delay`, or the configured show
    /// delay when `None`.
    ///
    /// Anything already on screen disappears immediately and stays hidden
    /// until the delay runs out.
    pub fn show(&mut self, delay: Option<Duration>) {
        let delay = delay.unwrap_or(self.delays.show_delay);

        self.cancel_requests();
        self.cancel_animation();
        self.remove_after_hide = false;
        self.set_render_visible(false);
        self.events.emit(RibbonEvent::SignalledToShow(delay));

        if delay.is_zero() {
            self.attach_and_show(false);
        } else {
            let deadline = self.clock.now() + delay;
            self.show_timer = Some(self.timers.schedule(deadline, Task::Show));
            self.state = VisibilityState::PendingShow;
            debug!(?delay, "show scheduled");
        }
    }

    /// Shows synchronously, skipping both the delay and the entrance animation.
    pub fn show_no_delay(&mut self) {
        self.cancel_requests();
        self.remove_after_hide = false;
        self.events.emit(RibbonEvent::SignalledToShow(Duration::ZERO));
        self.attach_and_show(true);
    }

    /// Requests the ribbon to disappear after `delay`, or the configured hide
    /// delay when `None`. A pending show is cancelled right away.
    pub fn hide(&mut self, delay: Option<Duration>) {
        let delay = delay.unwrap_or(self.delays.hide_delay);

        self.events.emit(RibbonEvent::SignalledToHide(delay));
        self.cancel_requests();

        if delay.is_zero() {
            self.hide_internal();
        } else {
            let deadline = self.clock.now() + delay;
            self.hide_timer = Some(self.timers.schedule(deadline, Task::Hide));
            if !self.is_animating() {
                self.state = VisibilityState::PendingHide;
            }
            debug!(?delay, "hide scheduled");
        }
    }

    /// Hides without waiting for the hide delay. A configured exit animation
    /// still plays.
    pub fn hide_no_delay(&mut self) {
        self.cancel_requests();
        self.events.emit(RibbonEvent::SignalledToHide(Duration::ZERO));
        self.hide_internal();
    }

    /// Hides a dynamically created ribbon and detaches it from its host.
    /// Declaratively placed ribbons are left alone.
    ///
    /// With an exit animation configured, the detach happens once the
    /// animation has finished.
    pub fn remove_dynamic_ribbon(&mut self) {
        if self.origin != Origin::Dynamic {
            debug!("ribbon was not created dynamically, not removing");
            return;
        }

        self.cancel_requests();
        self.remove_after_hide = true;
        self.hide_internal();
    }

    /// Runs every task whose deadline has passed. Returns how many ran.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();
        let mut ran = 0;
        while let Some((_, task)) = self.timers.pop_due(now) {
            self.run(task);
            ran += 1;
        }
        ran
    }

    /// Forgets every pending request and animation and goes back to hidden
    /// without notifying anyone.
    pub(crate) fn reset(&mut self) {
        self.cancel_requests();
        self.cancel_animation();
        self.remove_after_hide = false;
        self.showing = false;
        self.set_render_visible(false);
        self.state = VisibilityState::Hidden;
    }

    fn run(&mut self, task: Task) {
        debug!(?task, state = ?self.state, "timer fired");
        match task {
            Task::Show => {
                self.show_timer = None;
                self.attach_and_show(false);
            }
            Task::Hide => {
                self.hide_timer = None;
                self.cancel_show();
                self.hide_internal();
            }
            Task::AnimationEnd(direction) => {
                self.animation_timer = None;
                self.renderer.finish_animation();
                match direction {
                    Direction::Show => self.finish_show(),
                    Direction::Hide => self.finish_hide(),
                }
            }
        }
    }

    fn attach_and_show(&mut self, skip_animation: bool) {
        self.cancel_animation();
        self.set_render_visible(false);

        if self.origin == Origin::Dynamic {
            if self.host.is_attached() {
                self.host.detach();
            }
            self.host.attach();
            let has_parent = self.host.has_parent();
            self.events.emit(RibbonEvent::Attached { has_parent });
        }

        if self.animation.kind != AnimationType::None && !skip_animation {
            self.start_animation(Direction::Show);
        } else {
            self.finish_show();
        }
    }

    fn hide_internal(&mut self) {
        if self.visible && self.animation.kind != AnimationType::None {
            self.start_animation(Direction::Hide);
        } else {
            self.cancel_animation();
            self.finish_hide();
        }
    }

    fn start_animation(&mut self, direction: Direction) {
        self.cancel_animation();

        if self.animation.duration.is_zero() {
            match direction {
                Direction::Show => self.finish_show(),
                Direction::Hide => self.finish_hide(),
            }
            return;
        }

        let now = self.clock.now();
        self.set_render_visible(true);
        self.renderer.play_animation(direction, self.animation, now);
        self.animation_timer = Some(
            self.timers
                .schedule(now + self.animation.duration, Task::AnimationEnd(direction)),
        );
        self.state = VisibilityState::Animating(direction);
        debug!(?direction, duration = ?self.animation.duration, "animation started");
    }

    fn finish_show(&mut self) {
        self.showing = true;
        self.set_render_visible(true);
        self.state = if self.hide_timer.is_some() {
            VisibilityState::PendingHide
        } else {
            VisibilityState::Showing
        };
        debug!("ribbon shown");
        self.events.emit(RibbonEvent::Shown);
    }

    fn finish_hide(&mut self) {
        self.showing = false;
        self.set_render_visible(false);
        self.state = if self.hide_timer.is_some() {
            VisibilityState::PendingHide
        } else {
            VisibilityState::Hidden
        };
        debug!("ribbon hidden");
        self.events.emit(RibbonEvent::Hidden);

        if self.remove_after_hide {
            self.remove_after_hide = false;
            self.detach_from_host();
        }
    }

    fn detach_from_host(&mut self) {
        if self.host.is_attached() {
            self.host.detach();
        }
        self.showing = false;
        debug!("ribbon removed");
        self.events.emit(RibbonEvent::Removed);
    }

    fn set_render_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.renderer.set_visible(visible);
    }

    fn cancel_requests(&mut self) {
        self.cancel_show();
        if let Some(id) = self.hide_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn cancel_show(&mut self) {
        if let Some(id) = self.show_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn cancel_animation(&mut self) {
        if let Some(id) = self.animation_timer.take() {
            self.timers.cancel(id);
            self.renderer.finish_animation();
        }
    }
}

impl<R, H, C> std::fmt::Debug for VisibilityCoordinator<R, H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityCoordinator")
            .field("origin", &self.origin)
            .field("state", &self.state)
            .field("showing", &self.showing)
            .field("visible", &self.visible)
            .field("delays", &self.delays)
            .field("animation", &self.animation)
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::ui::timer::ManualClock;

    #[derive(Default)]
    struct Screen {
        visible: bool,
        animations: Vec<Direction>,
    }

    impl Renderer for Screen {
        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }

        fn play_animation(&mut self, direction: Direction, _: AnimationSpec, _: Instant) {
            self.animations.push(direction);
        }

        fn finish_animation(&mut self) {}
    }

    #[derive(Default)]
    struct Parent {
        attached: bool,
        attaches: usize,
        detaches: usize,
    }

    impl HostContainer for Parent {
        fn has_parent(&self) -> bool {
            true
        }

        fn is_attached(&self) -> bool {
            self.attached
        }

        fn attach(&mut self) {
            self.attached = true;
            self.attaches += 1;
        }

        fn detach(&mut self) {
            self.attached = false;
            self.detaches += 1;
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn coordinator(
        origin: Origin,
        kind: AnimationType,
    ) -> (VisibilityCoordinator<Screen, Parent, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let coordinator = VisibilityCoordinator::new(
            origin,
            DelayConfig {
                show_delay: ms(500),
                hide_delay: ms(200),
            },
            AnimationSpec {
                kind,
                duration: ms(300),
            },
            Screen::default(),
            Parent::default(),
            clock.clone(),
        );
        (coordinator, clock)
    }

    #[test]
    fn delayed_show_then_delayed_hide() {
        let (mut c, clock) = coordinator(Origin::Dynamic, AnimationType::None);

        c.show(None);
        assert_eq!(c.state(), VisibilityState::PendingShow);
        assert!(!c.renderer().visible);

        clock.advance(ms(499));
        c.poll();
        assert_eq!(c.state(), VisibilityState::PendingShow);

        clock.advance(ms(1));
        c.poll();
        assert_eq!(c.state(), VisibilityState::Showing);
        assert!(c.renderer().visible);
        assert!(c.host().attached);

        c.hide(None);
        assert_eq!(c.state(), VisibilityState::PendingHide);
        assert!(c.renderer().visible);

        clock.advance(ms(200));
        c.poll();
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert!(!c.renderer().visible);
        assert!(!c.is_showing());
    }

    #[test]
    fn entrance_animation_passes_through_animating() {
        let (mut c, clock) = coordinator(Origin::Dynamic, AnimationType::Fade);

        c.show(Some(Duration::ZERO));
        assert_eq!(c.state(), VisibilityState::Animating(Direction::Show));
        assert!(!c.is_showing());

        clock.advance(ms(300));
        c.poll();
        assert_eq!(c.state(), VisibilityState::Showing);
        assert!(c.is_showing());
        assert_eq!(c.renderer().animations, vec![Direction::Show]);
    }

    #[test]
    fn hide_cancels_pending_show() {
        let (mut c, clock) = coordinator(Origin::Dynamic, AnimationType::None);
        let shown = Rc::new(RefCell::new(0));
        let counter = shown.clone();
        c.subscribe(EventKind::Shown, move |_| *counter.borrow_mut() += 1);

        c.show(Some(ms(100)));
        c.hide(Some(Duration::ZERO));
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert_eq!(c.pending_timers(), 0);

        clock.advance(ms(1000));
        assert_eq!(c.poll(), 0);
        assert_eq!(*shown.borrow(), 0);
        assert_eq!(c.host().attaches, 0);
    }

    #[test]
    fn show_no_delay_is_synchronous() {
        let (mut c, _clock) = coordinator(Origin::Dynamic, AnimationType::ScaleFade);
        c.show_no_delay();
        assert_eq!(c.state(), VisibilityState::Showing);
        assert_eq!(c.pending_timers(), 0);
        assert!(c.renderer().animations.is_empty());
    }

    #[test]
    fn showing_again_reattaches_from_stale_parent() {
        let (mut c, _clock) = coordinator(Origin::Dynamic, AnimationType::None);
        c.show(Some(Duration::ZERO));
        c.show(Some(Duration::ZERO));
        assert_eq!(c.host().attaches, 2);
        assert_eq!(c.host().detaches, 1);
        assert!(c.host().attached);
    }

    #[test]
    fn declarative_ribbon_never_touches_host() {
        let (mut c, _clock) = coordinator(Origin::Declarative, AnimationType::None);
        c.show(Some(Duration::ZERO));
        assert_eq!(c.state(), VisibilityState::Showing);
        assert_eq!(c.host().attaches, 0);

        c.remove_dynamic_ribbon();
        assert_eq!(c.state(), VisibilityState::Showing);
        assert_eq!(c.host().detaches, 0);
    }

    #[test]
    fn animation_settings_are_locked_while_animating() {
        let (mut c, clock) = coordinator(Origin::Dynamic, AnimationType::Fade);

        assert!(c.set_animation_duration(ms(400)));
        c.show(Some(Duration::ZERO));
        assert!(!c.set_animation_duration(ms(50)));
        assert!(!c.set_animation_kind(AnimationType::Scale));
        assert_eq!(c.animation().duration, ms(400));
        assert_eq!(c.animation().kind, AnimationType::Fade);

        clock.advance(ms(400));
        c.poll();
        assert!(c.set_animation_kind(AnimationType::Scale));
    }

    #[test]
    fn removal_waits_for_exit_animation() {
        let (mut c, clock) = coordinator(Origin::Dynamic, AnimationType::Fade);
        c.show_no_delay();
        assert!(c.host().attached);

        c.remove_dynamic_ribbon();
        assert_eq!(c.state(), VisibilityState::Animating(Direction::Hide));
        assert!(c.host().attached);

        clock.advance(ms(300));
        c.poll();
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert!(!c.host().attached);
    }

    #[test]
    fn delayed_hide_during_entrance_waits_for_it() {
        let (mut c, clock) = coordinator(Origin::Dynamic, AnimationType::Fade);
        c.show(Some(Duration::ZERO));
        c.hide(Some(ms(500)));
        assert_eq!(c.state(), VisibilityState::Animating(Direction::Show));

        clock.advance(ms(300));
        c.poll();
        assert_eq!(c.state(), VisibilityState::PendingHide);
        assert!(c.is_showing());

        clock.advance(ms(200));
        c.poll();
        assert_eq!(c.state(), VisibilityState::Animating(Direction::Hide));

        clock.advance(ms(300));
        c.poll();
        assert_eq!(c.state(), VisibilityState::Hidden);
    }
}
