//! Decoding of service callbacks.

use serde::{Deserialize, Serialize};

use crate::codes::{StopButtonMessage, ThrottleMessage};
use crate::message::Message;
use crate::{ProtocolError, ProtocolResult};

/// A callback delivered by the throttle service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThrottleCallback {
    /// The throttle button was pressed.
    ButtonDown,
    /// The throttle button was released.
    ButtonUp,
    /// The user moved the slider to a new raw position.
    PositionChanged(i32),
}

impl TryFrom<&Message> for ThrottleCallback {
    type Error = ProtocolError;

    fn try_from(message: &Message) -> ProtocolResult<Self> {
        match ThrottleMessage::try_from(message.what)? {
            ThrottleMessage::ButtonDown => Ok(Self::ButtonDown),
            ThrottleMessage::ButtonUp => Ok(Self::ButtonUp),
            ThrottleMessage::PositionChanged => Ok(Self::PositionChanged(message.arg1)),
            other => Err(ProtocolError::UnexpectedMessage(other.code())),
        }
    }
}

/// A callback delivered by the stop button service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopButtonCallback {
    /// The stop button was pressed.
    Down,
    /// The stop button was released.
    Up,
}

impl TryFrom<&Message> for StopButtonCallback {
    type Error = ProtocolError;

    fn try_from(message: &Message) -> ProtocolResult<Self> {
        match StopButtonMessage::try_from(message.what)? {
            StopButtonMessage::StopButtonDown => Ok(Self::Down),
            StopButtonMessage::StopButtonUp => Ok(Self::Up),
            other => Err(ProtocolError::UnexpectedMessage(other.code())),
        }
    }
}
