//! Message codes understood by the input services.

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, ProtocolResult};

/// Messages exchanged with the throttle service.
///
/// `arg1` carries the position for `MoveTo`, `SetZeroPosition` and
/// `PositionChanged`, and the count for `SetStepCount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ThrottleMessage {
    /// Registers the sender for callbacks.
    RegisterClient = 1,
    /// Removes a registered client.
    UnregisterClient = 2,
    /// Moves the slider to `arg1`.
    MoveTo = 3,
    /// Sets the lowest position the slider may rest at to `arg1`.
    SetZeroPosition = 4,
    /// The user moved the slider to `arg1`.
    PositionChanged = 5,
    /// The throttle button was pressed.
    ButtonDown = 6,
    /// The throttle button was released.
    ButtonUp = 7,
    /// Sets the number of slider steps, including zero, to `arg1`.
    SetStepCount = 8,
}

impl ThrottleMessage {
    /// Wire value of this code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Returns `true` for messages sent by the service to its clients.
    pub fn is_callback(self) -> bool {
        matches!(
            self,
            Self::PositionChanged | Self::ButtonDown | Self::ButtonUp
        )
    }
}

impl TryFrom<i32> for ThrottleMessage {
    type Error = ProtocolError;

    fn try_from(code: i32) -> ProtocolResult<Self> {
        match code {
            1 => Ok(Self::RegisterClient),
            2 => Ok(Self::UnregisterClient),
            3 => Ok(Self::MoveTo),
            4 => Ok(Self::SetZeroPosition),
            5 => Ok(Self::PositionChanged),
            6 => Ok(Self::ButtonDown),
            7 => Ok(Self::ButtonUp),
            8 => Ok(Self::SetStepCount),
            other => Err(ProtocolError::UnknownMessage(other)),
        }
    }
}

/// Messages exchanged with the stop button service.
///
/// The stop button service reuses codes 3 and 4 with a different meaning
/// than the throttle service, so the two sets are kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum StopButtonMessage {
    /// Registers the sender for callbacks.
    RegisterClient = 1,
    /// Removes a registered client.
    UnregisterClient = 2,
    /// The stop button was pressed.
    StopButtonDown = 3,
    /// The stop button was released.
    StopButtonUp = 4,
}

impl StopButtonMessage {
    /// Wire value of this code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Returns `true` for messages sent by the service to its clients.
    pub fn is_callback(self) -> bool {
        matches!(self, Self::StopButtonDown | Self::StopButtonUp)
    }
}

impl TryFrom<i32> for StopButtonMessage {
    type Error = ProtocolError;

    fn try_from(code: i32) -> ProtocolResult<Self> {
        match code {
            1 => Ok(Self::RegisterClient),
            2 => Ok(Self::UnregisterClient),
            3 => Ok(Self::StopButtonDown),
            4 => Ok(Self::StopButtonUp),
            other => Err(ProtocolError::UnknownMessage(other)),
        }
    }
}
