//! Session notifications for observers (visualizer, replay output, tests).

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use gesture_pipeline::GestureEvent;

use crate::mode::{Action, InteractionMode};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    ModeChanged { from: InteractionMode, to: InteractionMode },
    GestureConfirmed(GestureEvent),
    ActionDispatched { action: Action, ok: bool },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::ModeChanged { from, to } => write!(f, "mode {} -> {}", from, to),
            Notification::GestureConfirmed(ev) => {
                write!(f, "gesture {} @ {}ms", ev.symbol, ev.confirmed_at_ms)
            }
            Notification::ActionDispatched { action, ok: true } => write!(f, "action {}", action),
            Notification::ActionDispatched { action, ok: false } => {
                write!(f, "action {} FAILED", action)
            }
        }
    }
}

/// Fan-out to any number of subscribers.  Subscribers whose receiver was
/// dropped are pruned on the next publish.
#[derive(Default)]
pub struct Notifier {
    subscribers: Vec<Sender<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        Notifier::default()
    }

    pub fn subscribe(&mut self) -> Receiver<Notification> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn add(&mut self, tx: Sender<Notification>) {
        self.subscribers.push(tx);
    }

    pub fn publish(&mut self, n: Notification) {
        self.subscribers.retain(|tx| tx.send(n.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize { self.subscribers.len() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_pipeline::GestureSymbol;

    #[test]
    fn every_subscriber_gets_every_notification() {
        let mut n = Notifier::new();
        let a = n.subscribe();
        let b = n.subscribe();
        n.publish(Notification::ModeChanged {
            from: InteractionMode::Auto,
            to:   InteractionMode::Selection,
        });
        assert_eq!(a.try_recv().unwrap(), b.try_recv().unwrap());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut n = Notifier::new();
        let keep = n.subscribe();
        drop(n.subscribe());
        n.publish(Notification::ActionDispatched { action: Action::ResetView, ok: true });
        assert_eq!(n.subscriber_count(), 1);
        assert!(keep.try_recv().is_ok());
    }

    #[test]
    fn display_is_human_readable() {
        let ev = GestureEvent { symbol: GestureSymbol::Pinch, confirmed_at_ms: 1_200 };
        assert_eq!(Notification::GestureConfirmed(ev).to_string(), "gesture pinch @ 1200ms");
        let failed = Notification::ActionDispatched { action: Action::SetPage(2), ok: false };
        assert_eq!(failed.to_string(), "action set-page(2) FAILED");
    }
}
