//! Commands sent to the throttle service.

use serde::{Deserialize, Serialize};

use crate::codes::ThrottleMessage;
use crate::message::Message;
use crate::{MAX_POSITION, MAX_STEP_COUNT, ProtocolError, ProtocolResult};

/// Validates a raw slider position (`0..=255`).
///
/// # Errors
///
/// Returns [`ProtocolError::PositionOutOfRange`] otherwise.
pub fn check_position(position: i32) -> ProtocolResult<i32> {
    if (0..=MAX_POSITION).contains(&position) {
        Ok(position)
    } else {
        Err(ProtocolError::PositionOutOfRange(position))
    }
}

/// Validates a slider step count (`0..=127`).
///
/// # Errors
///
/// Returns [`ProtocolError::StepCountOutOfRange`] otherwise.
pub fn check_step_count(count: i32) -> ProtocolResult<i32> {
    if (0..=MAX_STEP_COUNT).contains(&count) {
        Ok(count)
    } else {
        Err(ProtocolError::StepCountOutOfRange(count))
    }
}

/// A command for the throttle service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThrottleCommand {
    /// Start receiving callbacks.
    RegisterClient,
    /// Stop receiving callbacks.
    UnregisterClient,
    /// Move the slider to a raw position.
    MoveTo(i32),
    /// Set the lowest position the slider may rest at.
    SetZeroPosition(i32),
    /// Set the number of slider steps, including zero.
    SetStepCount(i32),
}

impl ThrottleCommand {
    /// Message code used for this command.
    pub fn message_code(&self) -> ThrottleMessage {
        match self {
            Self::RegisterClient => ThrottleMessage::RegisterClient,
            Self::UnregisterClient => ThrottleMessage::UnregisterClient,
            Self::MoveTo(_) => ThrottleMessage::MoveTo,
            Self::SetZeroPosition(_) => ThrottleMessage::SetZeroPosition,
            Self::SetStepCount(_) => ThrottleMessage::SetStepCount,
        }
    }

    /// Encodes the command, checking its argument.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::PositionOutOfRange`] for `MoveTo`/`SetZeroPosition`
    ///   outside `0..=255`
    /// - [`ProtocolError::StepCountOutOfRange`] for `SetStepCount` outside `0..=127`
    pub fn encode(&self) -> ProtocolResult<Message> {
        let what = self.message_code().code();
        match *self {
            Self::RegisterClient | Self::UnregisterClient => Ok(Message::new(what)),
            Self::MoveTo(position) | Self::SetZeroPosition(position) => {
                Ok(Message::with_arg(what, check_position(position)?))
            }
            Self::SetStepCount(count) => Ok(Message::with_arg(what, check_step_count(count)?)),
        }
    }
}
