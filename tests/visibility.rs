mod common;

use std::{cell::RefCell, rc::Rc, time::Duration};

use common::{Call, Layout, Recorder, ms, ribbon, tick};
use progress_ribbon::{
    AnimationType, Attributes, Direction, EventKind, ManualClock, Origin, ProgressRibbon,
    RibbonConfig, RibbonEvent, THEME_LIGHT, VisibilityState,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

#[test]
fn show_then_immediate_hide_never_shows() {
    let (mut r, clock) = ribbon(RibbonConfig::default());
    let shown = Rc::new(RefCell::new(0));
    let counter = shown.clone();
    r.subscribe(EventKind::Shown, move |_| *counter.borrow_mut() += 1);

    r.show(Some(ms(300)));
    r.hide(Some(Duration::ZERO));
    assert_eq!(r.state(), VisibilityState::Hidden);

    assert_eq!(tick(&mut r, &clock, ms(1000)), 0);
    assert_eq!(r.state(), VisibilityState::Hidden);
    assert_eq!(*shown.borrow(), 0);
    assert_eq!(r.host().attaches, 0);
    assert!(!r.renderer().visible);
}

#[test]
fn configured_delays_scenario() {
    let (mut r, clock) = ribbon(RibbonConfig::default());
    let events = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        EventKind::SignalledToShow,
        EventKind::Shown,
        EventKind::SignalledToHide,
        EventKind::Hidden,
    ] {
        let sink = events.clone();
        r.subscribe(kind, move |e| sink.borrow_mut().push(*e));
    }

    r.show(None);
    tick(&mut r, &clock, ms(400));
    assert_eq!(r.state(), VisibilityState::PendingShow);
    tick(&mut r, &clock, ms(100));
    assert_eq!(r.state(), VisibilityState::Showing);
    assert!(r.host().attached);

    r.hide(None);
    tick(&mut r, &clock, ms(199));
    assert!(r.renderer().visible);
    tick(&mut r, &clock, ms(1));
    assert_eq!(r.state(), VisibilityState::Hidden);
    assert!(!r.renderer().visible);

    assert_eq!(
        *events.borrow(),
        vec![
            RibbonEvent::SignalledToShow(ms(500)),
            RibbonEvent::Shown,
            RibbonEvent::SignalledToHide(ms(200)),
            RibbonEvent::Hidden,
        ]
    );
}

#[test]
fn show_no_delay_skips_delay_and_animation() {
    let mut config = RibbonConfig::default();
    config.animation.kind = AnimationType::ScaleFade;
    let (mut r, _clock) = ribbon(config);

    r.show_no_delay();
    assert_eq!(r.state(), VisibilityState::Showing);
    assert!(r.is_showing());
    assert!(r.renderer().plays().is_empty());
    assert_eq!(r.coordinator().pending_timers(), 0);
}

#[test]
fn entrance_and_exit_animations() {
    let mut config = RibbonConfig::default();
    config.animation.kind = AnimationType::Fade;
    config.animation.duration = ms(300);
    let (mut r, clock) = ribbon(config);

    r.show(Some(Duration::ZERO));
    assert_eq!(r.state(), VisibilityState::Animating(Direction::Show));
    assert!(r.is_animating());
    tick(&mut r, &clock, ms(300));
    assert_eq!(r.state(), VisibilityState::Showing);

    r.hide_no_delay();
    assert_eq!(r.state(), VisibilityState::Animating(Direction::Hide));
    tick(&mut r, &clock, ms(300));
    assert_eq!(r.state(), VisibilityState::Hidden);
    assert_eq!(r.renderer().plays(), vec![Direction::Show, Direction::Hide]);
}

#[test]
fn animation_settings_ignored_while_animating() {
    let mut config = RibbonConfig::default();
    config.animation.kind = AnimationType::Scale;
    config.animation.duration = ms(250);
    let (mut r, clock) = ribbon(config);

    r.show(Some(Duration::ZERO));
    r.set_animation_type(AnimationType::Fade)
        .set_animation_duration(ms(10));
    assert_eq!(r.coordinator().animation().kind, AnimationType::Scale);
    assert_eq!(r.coordinator().animation().duration, ms(250));

    tick(&mut r, &clock, ms(250));
    r.set_animation_type(AnimationType::Fade);
    assert_eq!(r.coordinator().animation().kind, AnimationType::Fade);
}

#[test]
fn remove_detaches_dynamic_ribbon() {
    let (mut r, _clock) = ribbon(RibbonConfig::default());
    let removed = Rc::new(RefCell::new(false));
    let flag = removed.clone();
    r.subscribe(EventKind::Removed, move |_| *flag.borrow_mut() = true);

    r.show_no_delay();
    r.remove_dynamic_ribbon();
    assert_eq!(r.state(), VisibilityState::Hidden);
    assert!(!r.host().attached);
    assert!(*removed.borrow());
}

#[test]
fn remove_leaves_declarative_ribbon_alone() {
    let attrs = Attributes::parse("show-delay = 0\nanimation-type = none\n").unwrap();
    let clock = ManualClock::new();
    let mut r = ProgressRibbon::inflate(
        &attrs,
        &THEME_LIGHT,
        1.0,
        Recorder::default(),
        Layout::default(),
        clock,
    )
    .unwrap();
    assert_eq!(r.origin(), Origin::Declarative);
    assert_eq!(r.state(), VisibilityState::Showing);

    r.remove_dynamic_ribbon();
    assert_eq!(r.state(), VisibilityState::Showing);
    assert_eq!(r.host().detaches, 0);
    assert_eq!(r.host().attaches, 0);
}

#[test]
fn orphan_ribbon_always_blocks_input() {
    let clock = ManualClock::new();
    let mut config = RibbonConfig::default();
    config.blocks_underlying = false;
    let mut r =
        ProgressRibbon::with_config(config, Recorder::default(), Layout::orphan(), clock);
    assert!(r.is_orphan());
    assert!(r.blocks_underlying());

    r.set_view_blocking(false);
    assert!(r.blocks_underlying());

    let attached = Rc::new(RefCell::new(None));
    let sink = attached.clone();
    r.subscribe(EventKind::Attached, move |e| *sink.borrow_mut() = Some(*e));
    r.show_no_delay();
    assert_eq!(
        *attached.borrow(),
        Some(RibbonEvent::Attached { has_parent: false })
    );
}

#[test]
fn appearance_updates_reach_renderer() {
    let (mut r, _clock) = ribbon(RibbonConfig::default());
    r.set_indeterminate(false);
    r.set_text("Copying");
    r.set_progress(40);

    let calls = r.renderer().calls.borrow();
    assert_eq!(
        calls.last(),
        Some(&Call::Update {
            text: "Copying".into(),
            progress: 40,
        })
    );
}

/// Whatever the interleaving of requests, once every timer has run the
/// ribbon ends up where the last request asked it to be.
#[test]
fn last_request_wins() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..200 {
        let mut config = RibbonConfig::default();
        config.animation.kind = if rng.random_bool(0.5) {
            AnimationType::Fade
        } else {
            AnimationType::None
        };
        config.animation.duration = ms(rng.random_range(1..=300));
        let (mut r, clock) = ribbon(config);

        let mut last_show = false;
        for _ in 0..rng.random_range(1..20) {
            let delay = match rng.random_range(0..3) {
                0 => None,
                1 => Some(Duration::ZERO),
                _ => Some(ms(rng.random_range(1..600))),
            };
            let request = rng.random_range(0..4);
            match request {
                0 => r.show(delay),
                1 => r.hide(delay),
                2 => r.show_no_delay(),
                _ => r.hide_no_delay(),
            }
            last_show = request % 2 == 0;
            tick(&mut r, &clock, ms(rng.random_range(0..400)));
        }

        // completions are scheduled relative to the poll that starts them
        while r.coordinator().pending_timers() > 0 {
            tick(&mut r, &clock, ms(5_000));
        }
        let expected = if last_show {
            VisibilityState::Showing
        } else {
            VisibilityState::Hidden
        };
        assert_eq!(r.state(), expected, "round {round}");
        assert_eq!(r.coordinator().pending_timers(), 0, "round {round}");
        assert_eq!(r.renderer().visible, last_show, "round {round}");
    }
}
