//! Ribbon notifications and their subscriber lists.

use std::time::Duration;

/// Something that happened to the ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibbonEvent {
    /// A show was requested; it takes effect after the given delay.
    SignalledToShow(Duration),
    Shown,
    /// A hide was requested; it takes effect after the given delay.
    SignalledToHide(Duration),
    Hidden,
    /// The ribbon was attached to its host. `has_parent` is false in orphan mode.
    Attached { has_parent: bool },
    Removed,
    ProgressStarted(u32),
    ProgressStopped(u32),
    ProgressChanged(u32),
    IndeterminateChanged(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SignalledToShow,
    Shown,
    SignalledToHide,
    Hidden,
    Attached,
    Removed,
    ProgressStarted,
    ProgressStopped,
    ProgressChanged,
    IndeterminateChanged,
}

impl RibbonEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RibbonEvent::SignalledToShow(_) => EventKind::SignalledToShow,
            RibbonEvent::Shown => EventKind::Shown,
            RibbonEvent::SignalledToHide(_) => EventKind::SignalledToHide,
            RibbonEvent::Hidden => EventKind::Hidden,
            RibbonEvent::Attached { .. } => EventKind::Attached,
            RibbonEvent::Removed => EventKind::Removed,
            RibbonEvent::ProgressStarted(_) => EventKind::ProgressStarted,
            RibbonEvent::ProgressStopped(_) => EventKind::ProgressStopped,
            RibbonEvent::ProgressChanged(_) => EventKind::ProgressChanged,
            RibbonEvent::IndeterminateChanged(_) => EventKind::IndeterminateChanged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&RibbonEvent)>;

/// Independent subscriptions, delivered per kind in subscription order.
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, EventKind, Callback)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, kind: EventKind, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, kind, callback));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sid, _, _)| *sid != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: RibbonEvent) {
        let kind = event.kind();
        for (_, k, callback) in self.entries.iter_mut() {
            if *k == kind {
                callback(&event);
            }
        }
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}
