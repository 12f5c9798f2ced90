//! Pre-computed position/step lookup table.

use serde::{Deserialize, Serialize};

use crate::error::{ScaleError, ScaleResult};

/// Highest raw position the throttle slider reports.
pub const MAX_POSITION: i32 = 255;

/// Converts raw throttle positions to discrete steps and back.
///
/// Positions in `0..=zero_offset` are the rest range and map to step 0. The
/// remaining range up to [`MAX_POSITION`] is split into evenly sized chunks,
/// one per step. The boundary of each step is computed once at construction
/// and kept in an immutable table, so both conversions are plain reads.
///
/// # Example
///
/// ```
/// use mc2_throttle_scale::ThrottleScale;
///
/// let scale = ThrottleScale::new(10, 5)?;
/// assert_eq!(scale.step_to_position(0)?, 0);
/// assert_eq!(scale.position_to_step(5), 0);
/// assert_eq!(scale.position_to_step(300), 4);
/// # Ok::<(), mc2_throttle_scale::ScaleError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThrottleScaleConfig", into = "ThrottleScaleConfig")]
pub struct ThrottleScale {
    zero_offset: i32,
    step_count: i32,
    lookup: Vec<i32>,
}

impl ThrottleScale {
    /// Builds a scale with `step_count` steps, including the zero step.
    ///
    /// # Errors
    ///
    /// - [`ScaleError::ZeroOffsetOutOfRange`] if `zero_offset` is not in `0..=255`
    /// - [`ScaleError::NegativeStepCount`] if `step_count < 0`
    /// - [`ScaleError::TooManySteps`] if `step_count > 255 - zero_offset`
    ///
    /// A `step_count` of 0 is accepted. The resulting scale has an empty
    /// table, rejects every `step_to_position` call and maps every position
    /// to step 0.
    pub fn new(zero_offset: i32, step_count: i32) -> ScaleResult<Self> {
        if !(0..=MAX_POSITION).contains(&zero_offset) {
            return Err(ScaleError::ZeroOffsetOutOfRange(zero_offset));
        }

        if step_count < 0 {
            return Err(ScaleError::NegativeStepCount(step_count));
        }

        let available = MAX_POSITION - zero_offset;
        if step_count > available {
            return Err(ScaleError::TooManySteps {
                step_count,
                available,
            });
        }

        Ok(Self {
            zero_offset,
            step_count,
            lookup: build_lookup(zero_offset, step_count),
        })
    }

    /// Returns the raw position assigned to `step`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::StepOutOfRange`] unless `0 <= step < step_count`.
    pub fn step_to_position(&self, step: i32) -> ScaleResult<i32> {
        self.boundary(step).ok_or(ScaleError::StepOutOfRange {
            step,
            step_count: self.step_count,
        })
    }

    /// Returns the step a raw position falls into.
    ///
    /// The result is the highest step whose boundary lies strictly below
    /// `position`, so a position equal to a boundary belongs to the step
    /// below it. Any position at or below the first boundary, including
    /// negative ones, maps to 0.
    pub fn position_to_step(&self, position: i32) -> i32 {
        (1..self.step_count)
            .rev()
            .find(|&step| self.boundary(step).is_some_and(|bound| position > bound))
            .unwrap_or(0)
    }

    /// Last position of the rest range.
    pub fn zero_offset(&self) -> i32 {
        self.zero_offset
    }

    /// Number of steps, including step 0.
    pub fn step_count(&self) -> i32 {
        self.step_count
    }

    /// Highest valid step, or `None` for an empty scale.
    pub fn max_step(&self) -> Option<i32> {
        (self.step_count > 0).then(|| self.step_count - 1)
    }

    /// Returns `true` if the scale was built with zero steps.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// The step boundaries, indexed by step.
    pub fn lookup(&self) -> &[i32] {
        &self.lookup
    }

    fn boundary(&self, step: i32) -> Option<i32> {
        let index = usize::try_from(step).ok()?;
        self.lookup.get(index).copied()
    }
}

/// Each boundary is rounded on its own (half away from zero) so rounding
/// error never accumulates across steps.
fn build_lookup(zero_offset: i32, step_count: i32) -> Vec<i32> {
    let chunk_size = (f64::from(MAX_POSITION) - f64::from(zero_offset)) / f64::from(step_count);

    (0..step_count)
        .map(|step| {
            if step == 0 {
                0
            } else {
                (f64::from(zero_offset) + f64::from(step) * chunk_size).round() as i32
            }
        })
        .collect()
}

/// Persisted form of a [`ThrottleScale`].
///
/// Deserializing a `ThrottleScale` goes through [`ThrottleScale::new`], so a
/// stored configuration that would not construct is rejected on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleScaleConfig {
    /// Last position of the rest range.
    pub zero_offset: i32,
    /// Number of steps, including step 0.
    pub step_count: i32,
}

impl ThrottleScaleConfig {
    /// Builds the scale described by this configuration.
    ///
    /// # Errors
    ///
    /// Same as [`ThrottleScale::new`].
    pub fn build(&self) -> ScaleResult<ThrottleScale> {
        ThrottleScale::new(self.zero_offset, self.step_count)
    }
}

impl TryFrom<ThrottleScaleConfig> for ThrottleScale {
    type Error = ScaleError;

    fn try_from(config: ThrottleScaleConfig) -> ScaleResult<Self> {
        config.build()
    }
}

impl From<ThrottleScale> for ThrottleScaleConfig {
    fn from(scale: ThrottleScale) -> Self {
        Self {
            zero_offset: scale.zero_offset,
            step_count: scale.step_count,
        }
    }
}
