//! Throttle scaling for the Mobile Control II
//!
//! The throttle slider reports a raw position in `0..=255`. Applications
//! usually work with discrete speed steps instead, so this crate provides
//! [`ThrottleScale`], a pre-computed lookup table that converts between the
//! two.
//!
//! # Example
//!
//! ```
//! use mc2_throttle_scale::ThrottleScale;
//!
//! let scale = ThrottleScale::new(10, 5)?;
//! assert_eq!(scale.lookup(), &[0, 59, 108, 157, 206]);
//!
//! // Command the slider to step 2
//! assert_eq!(scale.step_to_position(2)?, 108);
//!
//! // A position exactly on a boundary belongs to the step below
//! assert_eq!(scale.position_to_step(108), 1);
//! assert_eq!(scale.position_to_step(109), 2);
//! # Ok::<(), mc2_throttle_scale::ScaleError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod scale;

pub use error::{ScaleError, ScaleResult};
pub use scale::{MAX_POSITION, ThrottleScale, ThrottleScaleConfig};
