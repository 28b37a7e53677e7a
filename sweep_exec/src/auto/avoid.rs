//! Reactive obstacle avoidance
//!
//! When the cell ahead is obstructed the rover rotates in fixed increments
//! until the forward distance clears the safe threshold. The loop is bounded:
//! if no clear direction is found within the configured number of rotations
//! the rover is boxed in, and that is reported rather than spinning forever.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, warn};

use super::{heading::HeadingCtrl, params::AutoParams, read_distance_checked, AutoError};
use crate::mech::Mech;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Outcome of an avoidance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvoidanceOutcome {
    /// A clear forward direction was found, the heading controller holds the
    /// new heading.
    Clear,

    /// No rotation within the retry bound yielded a clear forward path.
    BoxedIn,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Rotate until the forward distance clears the safe threshold.
///
/// Reads the forward distance and, while it is below `safe_distance`, rotates
/// by `avoid_turn_deg` and re-reads. At most `max_avoidance_retries`
/// rotations are attempted; if the final reading is still obstructed the
/// outcome is [`AvoidanceOutcome::BoxedIn`].
pub fn clear_path<M: Mech>(
    mech: &mut M,
    heading: &mut HeadingCtrl,
    params: &AutoParams,
) -> Result<AvoidanceOutcome, AutoError> {
    for attempt in 0..=params.max_avoidance_retries {
        let dist = read_distance_checked(mech)?;

        if dist >= params.safe_distance {
            if attempt > 0 {
                debug!(
                    "Clear path found towards {:?} after {} rotation(s)",
                    heading.current(),
                    attempt
                );
            }
            return Ok(AvoidanceOutcome::Clear);
        }

        if attempt == params.max_avoidance_retries {
            break;
        }

        debug!(
            "Obstacle at {:.1} units, turning {} degrees (attempt {}/{})",
            dist,
            params.avoid_turn_deg,
            attempt + 1,
            params.max_avoidance_retries
        );
        heading.turn_by(mech, params.avoid_turn_deg)?;
    }

    warn!(
        "Boxed in: no clear direction within {} rotations",
        params.max_avoidance_retries
    );

    Ok(AvoidanceOutcome::BoxedIn)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
