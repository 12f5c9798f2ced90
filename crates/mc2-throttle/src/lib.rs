//! Throttle and stop button controllers for the Mobile Control II
//!
//! This crate sits between the service transport and the application:
//!
//! - [`Throttle`] registers with the throttle service, sends slider commands
//!   and turns incoming callbacks into [`ThrottleEvent`]s. With a
//!   [`ThrottleScale`] attached it also reports slider steps.
//! - [`StopButton`] does the same for the stop button service.
//!
//! The transport is injected through [`MessageSink`]. Events are delivered
//! over bounded `crossbeam` channels returned by `subscribe()`; a subscriber
//! that stops reading misses events once [`SUBSCRIBER_CAPACITY`] are queued.
//!
//! # Example
//!
//! ```
//! use mc2_protocol::Message;
//! use mc2_throttle::{Throttle, ThrottleEvent};
//! use mc2_throttle_scale::ThrottleScale;
//!
//! let (tx, rx) = crossbeam::channel::unbounded::<Message>();
//! let mut throttle = Throttle::new(tx, 10)?.with_scale(ThrottleScale::new(10, 5)?);
//! let events = throttle.subscribe();
//!
//! throttle.connect()?;
//! throttle.move_to_step(2)?;
//! assert_eq!(rx.try_iter().last(), Some(Message::with_arg(3, 108)));
//!
//! throttle.handle_message(&Message::with_arg(5, 120));
//! let received: Vec<_> = events.try_iter().collect();
//! assert_eq!(
//!     received,
//!     vec![ThrottleEvent::PositionChanged(120), ThrottleEvent::StepChanged(2)]
//! );
//! # Ok::<(), mc2_throttle::ThrottleError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod config;
pub mod connection;
pub mod event;
pub mod stop_button;
pub mod throttle;

pub use config::ThrottleConfig;
pub use connection::ServiceConnection;
pub use event::{SUBSCRIBER_CAPACITY, StopButtonEvent, ThrottleEvent};
pub use stop_button::StopButton;
pub use throttle::Throttle;

pub use mc2_protocol::Message;
pub use mc2_throttle_scale::ThrottleScale;

use mc2_protocol::ProtocolError;
use mc2_throttle_scale::ScaleError;
use thiserror::Error;

/// Errors raised by the controllers.
#[derive(Error, Debug)]
pub enum ThrottleError {
    /// A scale argument was invalid.
    #[error("Scale error: {0}")]
    Scale(#[from] ScaleError),

    /// A command argument was invalid.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A step command was issued without a scale attached.
    #[error("No throttle scale configured")]
    NoScale,

    /// The transport refused the message.
    #[error("Failed to send message: {0}")]
    SendFailed(String),

    /// The configuration could not be parsed or serialized.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Reading or writing a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for controller operations.
pub type ThrottleResult<T> = Result<T, ThrottleError>;

/// Outgoing side of the service transport.
///
/// Implementations deliver a message to the service process. The controllers
/// never retry; a failed send is logged and returned to the caller.
pub trait MessageSink {
    /// Delivers `message` to the service.
    ///
    /// # Errors
    ///
    /// Returns [`ThrottleError::SendFailed`] if the transport is gone.
    fn send(&mut self, message: Message) -> ThrottleResult<()>;
}

impl MessageSink for crossbeam::channel::Sender<Message> {
    fn send(&mut self, message: Message) -> ThrottleResult<()> {
        crossbeam::channel::Sender::send(self, message)
            .map_err(|e| ThrottleError::SendFailed(e.to_string()))
    }
}

impl MessageSink for Vec<Message> {
    fn send(&mut self, message: Message) -> ThrottleResult<()> {
        self.push(message);
        Ok(())
    }
}
