//! Frame → [`HandReading`] sampling.
//!
//! Hand order is taken from the detector as-is.  There is no identity
//! tracking, so if the detector reorders two hands between frames the
//! "primary" hand swaps with it.

use tracing::debug;

use crate::classifier::classify;
use crate::landmarks::{Detection, Landmarks};
use crate::reading::{HandPose, HandReading, MAX_HANDS};

fn pose_of(hand: &Landmarks) -> HandPose {
    HandPose::new(classify(hand), hand.anchor())
}

/// Reduce one frame's detection to exactly one reading.
///
/// Hands past the second are ignored, so `count` is at most [`MAX_HANDS`].
pub fn sample(detection: &Detection) -> HandReading {
    if detection.len() > MAX_HANDS {
        debug!(detected = detection.len(), "ignoring hands beyond the first two");
    }

    let mut reading = HandReading::idle();
    reading.count = detection.len().min(MAX_HANDS);

    if let Some(first) = detection.hands.first() {
        reading.primary = pose_of(first);
    }
    if let Some(second) = detection.hands.get(1) {
        reading.secondary = pose_of(second);
    }
    reading
}
