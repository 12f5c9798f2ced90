//! Error types for throttle scaling.

use thiserror::Error;

/// Error type for [`ThrottleScale`](crate::ThrottleScale) construction and lookups.
///
/// Every variant describes an invalid argument passed by the caller. Nothing
/// in this crate performs I/O, so there is no retryable failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScaleError {
    /// The zero offset is outside `0..=255`.
    #[error("zero offset must be >= 0 and <= 255, got {0}")]
    ZeroOffsetOutOfRange(i32),

    /// A negative step count was requested.
    #[error("step count must not be negative, got {0}")]
    NegativeStepCount(i32),

    /// More steps than raw positions left above the zero offset.
    #[error("more steps than available positions in range: {step_count} > {available}")]
    TooManySteps {
        /// Requested number of steps.
        step_count: i32,
        /// Positions available above the zero offset.
        available: i32,
    },

    /// Step index outside `0..step_count`.
    #[error("step {step} is out of range for a scale with {step_count} steps")]
    StepOutOfRange {
        /// Requested step.
        step: i32,
        /// Number of steps in the scale.
        step_count: i32,
    },
}

impl ScaleError {
    /// Returns `true` for errors caused by an invalid caller argument.
    ///
    /// This holds for every current variant.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::ZeroOffsetOutOfRange(_)
                | Self::NegativeStepCount(_)
                | Self::TooManySteps { .. }
                | Self::StepOutOfRange { .. }
        )
    }
}

/// Result alias for scaling operations.
pub type ScaleResult<T> = Result<T, ScaleError>;
