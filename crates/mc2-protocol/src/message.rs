//! The raw message shape carried by the service transport.

use serde::{Deserialize, Serialize};

/// A service message: a code and two integer arguments.
///
/// Unused arguments are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Message {
    /// Message code.
    pub what: i32,
    /// First argument.
    pub arg1: i32,
    /// Second argument.
    pub arg2: i32,
}

impl Message {
    /// A message without arguments.
    pub fn new(what: i32) -> Self {
        Self {
            what,
            arg1: 0,
            arg2: 0,
        }
    }

    /// A message with a single argument.
    pub fn with_arg(what: i32, arg1: i32) -> Self {
        Self {
            what,
            arg1,
            arg2: 0,
        }
    }
}
