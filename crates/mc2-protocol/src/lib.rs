//! Mobile Control II service protocol
//!
//! The throttle and stop button are served by vendor system services that
//! talk to clients with small integer-coded messages: a message code plus
//! two integer arguments. This crate names those codes, decodes incoming
//! callbacks and encodes outgoing commands with range checks.
//!
//! Nothing here performs I/O; the transport is supplied by the caller.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod codes;
pub mod command;
pub mod event;
pub mod message;

pub use codes::{StopButtonMessage, ThrottleMessage};
pub use command::{ThrottleCommand, check_position, check_step_count};
pub use event::{StopButtonCallback, ThrottleCallback};
pub use message::Message;

use thiserror::Error;

/// Highest position accepted by `MoveTo` and `SetZeroPosition`.
pub const MAX_POSITION: i32 = 255;

/// Highest step count accepted by `SetStepCount`.
pub const MAX_STEP_COUNT: i32 = 127;

/// Errors raised while decoding or encoding service messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The code is not defined by the service.
    #[error("Unknown message code: {0}")]
    UnknownMessage(i32),

    /// The code is defined but only travels from client to service.
    #[error("Message {0} is not a service callback")]
    UnexpectedMessage(i32),

    /// A position argument outside `0..=255`.
    #[error("Position must be >= 0 and <= 255, got {0}")]
    PositionOutOfRange(i32),

    /// A step count argument outside `0..=127`.
    #[error("Step count must be >= 0 and <= 127, got {0}")]
    StepCountOutOfRange(i32),
}

/// Result alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
