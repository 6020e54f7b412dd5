#![allow(dead_code)]

use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use progress_ribbon::{
    AnimationSpec, Appearance, Direction, HostContainer, ManualClock, ProgressRibbon, Renderer,
    RibbonConfig,
};

/// Everything the ribbon asked the screen to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Visible(bool),
    Play(Direction),
    Finish,
    Update { text: String, progress: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub visible: bool,
}

impl Recorder {
    pub fn plays(&self) -> Vec<Direction> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Play(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for Recorder {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.calls.borrow_mut().push(Call::Visible(visible));
    }

    fn play_animation(&mut self, direction: Direction, _: AnimationSpec, _: Instant) {
        self.calls.borrow_mut().push(Call::Play(direction));
    }

    fn finish_animation(&mut self) {
        self.calls.borrow_mut().push(Call::Finish);
    }

    fn update(&mut self, appearance: &Appearance<'_>) {
        self.calls.borrow_mut().push(Call::Update {
            text: appearance.text.to_string(),
            progress: appearance.progress,
        });
    }
}

/// A parent layout that counts attaches and remembers its saved state.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub orphan: bool,
    pub attached: bool,
    pub attaches: usize,
    pub detaches: usize,
    pub restored: Option<Vec<u8>>,
}

impl Layout {
    pub fn orphan() -> Self {
        Self {
            orphan: true,
            ..Self::default()
        }
    }
}

impl HostContainer for Layout {
    fn has_parent(&self) -> bool {
        !self.orphan
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

    fn save_state(&self) -> Vec<u8> {
        vec![0xab, u8::from(self.attached)]
    }

    fn restore_state(&mut self, state: &[u8]) {
        self.restored = Some(state.to_vec());
    }
}

pub type TestRibbon = ProgressRibbon<Recorder, Layout, ManualClock>;

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// A dynamic ribbon inside a parent layout, with a 500ms show delay and a
/// 200ms hide delay.
pub fn ribbon(config: RibbonConfig) -> (TestRibbon, ManualClock) {
    let clock = ManualClock::new();
    let mut config = config;
    config.delays.show_delay = ms(500);
    config.delays.hide_delay = ms(200);
    let ribbon = ProgressRibbon::with_config(
        config,
        Recorder::default(),
        Layout::default(),
        clock.clone(),
    );
    (ribbon, clock)
}

/// Advances the clock and runs whatever became due.
pub fn tick(ribbon: &mut TestRibbon, clock: &ManualClock, by: Duration) -> usize {
    clock.advance(by);
    ribbon.poll()
}
