mod common;

use common::{Layout, Recorder, TestRibbon, ms, ribbon};
use progress_ribbon::{
    AnimationType, Attributes, BarStyle, Bundle, Error, ManualClock, Margin, Origin,
    ProgressRibbon, RibbonConfig, SizeUnit, THEME_DARK, VisibilityState,
};

fn fresh() -> TestRibbon {
    ProgressRibbon::new(Recorder::default(), Layout::default(), ManualClock::new())
}

#[test]
fn saved_settings_come_back() {
    let (mut r, _clock) = ribbon(RibbonConfig::default());
    r.set_text("Syncing")
        .set_bar_style(BarStyle::Linear)
        .set_margin_top(Margin::ParentPercent(25))
        .set_padding_bottom(4.0, SizeUnit::Dp)
        .set_right_to_left(true)
        .set_animation_type(AnimationType::Scale)
        .set_hide_delay(ms(750));
    r.set_max(200).set_indeterminate(false);
    r.set_progress(120);
    r.set_secondary_progress(150);
    r.freeze_progress();
    r.set_progress(130);

    let saved = r.save_state();
    let mut restored = fresh();
    restored.restore_state(&saved).unwrap();

    assert_eq!(restored.config(), r.config());
    assert_eq!(restored.text(), "Syncing");
    assert_eq!(restored.raw_progress(), 130);
    assert_eq!(restored.progress(), 120);
    assert_eq!(restored.progress(), r.progress());
    assert_eq!(restored.secondary_progress(), 150);
    assert!(restored.is_frozen());
    assert_eq!(restored.coordinator().delays().hide_delay, ms(750));
    assert_eq!(restored.coordinator().animation().kind, AnimationType::Scale);
    assert_eq!(restored.origin(), Origin::Dynamic);
    assert_eq!(restored.host().restored, Some(vec![0xab, 0]));
}

#[test]
fn showing_ribbon_is_shown_again_without_delay() {
    let (mut r, _clock) = ribbon(RibbonConfig::default());
    r.show_no_delay();
    let saved = r.save_state();

    let mut restored = fresh();
    restored.restore_state(&saved).unwrap();
    assert_eq!(restored.state(), VisibilityState::Showing);
    assert!(restored.is_showing());
    assert_eq!(restored.coordinator().pending_timers(), 0);
}

#[test]
fn interrupted_animation_is_not_replayed() {
    let mut config = RibbonConfig::default();
    config.animation.kind = AnimationType::Fade;
    let (mut r, _clock) = ribbon(config);
    r.show(Some(std::time::Duration::ZERO));
    assert!(r.is_animating());
    let saved = r.save_state();
    assert!(saved.bool("animation_in_progress").unwrap());

    let mut restored = fresh();
    restored.restore_state(&saved).unwrap();
    assert_eq!(restored.state(), VisibilityState::Hidden);
    assert!(restored.renderer().plays().is_empty());
}

#[test]
fn declarative_ribbon_respects_do_not_show_on_attach() {
    let attrs = Attributes::parse(
        "do-not-show-on-attach = true\nshow-delay = 0\nprogress-text = Waiting",
    )
    .unwrap();
    let r = ProgressRibbon::inflate(
        &attrs,
        &THEME_DARK,
        2.0,
        Recorder::default(),
        Layout::default(),
        ManualClock::new(),
    )
    .unwrap();
    assert_eq!(r.state(), VisibilityState::Hidden);
    let saved = r.save_state();

    let mut restored = fresh();
    restored.restore_state(&saved).unwrap();
    assert_eq!(restored.origin(), Origin::Declarative);
    assert_eq!(restored.state(), VisibilityState::Hidden);
    assert_eq!(restored.text(), "Waiting");
    assert_eq!(restored.config().density, 2.0);
}

#[test]
fn missing_key_leaves_ribbon_untouched() {
    let (mut source, _clock) = ribbon(RibbonConfig::default());
    source.set_text("Saved");
    let saved = source.save_state();

    let mut partial = Bundle::new();
    for key in saved.keys().filter(|k| *k != "max") {
        if let Some(value) = saved.get(key) {
            partial.put(key, value.clone());
        }
    }

    let mut target = fresh();
    target.set_text("Original");
    let before = target.config().clone();
    let err = target.restore_state(&partial).unwrap_err();
    assert!(matches!(err, Error::State { ref key, .. } if key == "max"));
    assert_eq!(target.text(), "Original");
    assert_eq!(target.config(), &before);
}

#[test]
fn frozen_progress_is_still_frozen_after_restore() {
    let (mut r, _clock) = ribbon(RibbonConfig::default());
    r.set_indeterminate(false);
    r.set_progress(10);
    r.freeze_progress();
    r.set_progress(60);
    assert_eq!(r.progress(), 10);

    let mut restored = fresh();
    restored.restore_state(&r.save_state()).unwrap();
    assert_eq!(restored.progress(), 10);
    assert_eq!(restored.raw_progress(), 60);

    restored.allow_progress();
    assert_eq!(restored.progress(), 60);
}
