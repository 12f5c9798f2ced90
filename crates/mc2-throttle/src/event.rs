//! Events delivered to applications, and their fan-out to subscribers.

use crossbeam::channel::{Receiver, Sender, TrySendError};
use mc2_protocol::{StopButtonCallback, ThrottleCallback};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Events buffered per subscriber before new ones are dropped.
pub const SUBSCRIBER_CAPACITY: usize = 256;

/// Throttle input as seen by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThrottleEvent {
    /// The throttle button was pressed.
    ButtonDown,
    /// The throttle button was released.
    ButtonUp,
    /// The slider moved to a new raw position.
    PositionChanged(i32),
    /// The slider entered a different step of the attached scale.
    StepChanged(i32),
}

impl From<ThrottleCallback> for ThrottleEvent {
    fn from(callback: ThrottleCallback) -> Self {
        match callback {
            ThrottleCallback::ButtonDown => Self::ButtonDown,
            ThrottleCallback::ButtonUp => Self::ButtonUp,
            ThrottleCallback::PositionChanged(position) => Self::PositionChanged(position),
        }
    }
}

/// Stop button input as seen by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopButtonEvent {
    /// The stop button was pressed.
    Down,
    /// The stop button was released.
    Up,
}

impl From<StopButtonCallback> for StopButtonEvent {
    fn from(callback: StopButtonCallback) -> Self {
        match callback {
            StopButtonCallback::Down => Self::Down,
            StopButtonCallback::Up => Self::Up,
        }
    }
}

/// Broadcasts events to every live subscriber.
#[derive(Debug)]
pub(crate) struct Subscribers<E> {
    senders: Vec<Sender<E>>,
}

impl<E: Clone> Subscribers<E> {
    pub(crate) fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self) -> Receiver<E> {
        let (tx, rx) = crossbeam::channel::bounded(SUBSCRIBER_CAPACITY);
        self.senders.push(tx);
        rx
    }

    /// Receivers that were dropped are removed. A subscriber whose queue is
    /// full misses the event but stays subscribed.
    pub(crate) fn publish(&mut self, event: E) {
        self.senders.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Subscriber queue full, dropping event");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}
