//! Open-palm vs. closed-fist classification from finger-extension geometry.
//!
//! A finger is *extended* when its tip is clearly further from the wrist
//! than its PIP joint.  Pose-instantaneous: no smoothing at this layer.

use crate::landmarks::{
    Landmarks,
    INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP,
};
use crate::reading::HandState;

/// `dist(wrist, tip) > EXTENSION_RATIO × dist(wrist, pip)` ⇒ extended.
pub const EXTENSION_RATIO: f32 = 1.2;

/// Extended fingers needed for an open palm.
pub const OPEN_PALM_MIN_FINGERS: usize = 3;

/// `(tip, pip)` for index, middle, ring and pinky.  The thumb is ignored.
const FINGERS: [(usize, usize); 4] = [
    (INDEX_TIP,  INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP,   RING_PIP),
    (PINKY_TIP,  PINKY_PIP),
];

/// Number of non-thumb fingers currently extended (0–4).
pub fn extended_fingers(hand: &Landmarks) -> usize {
    let wrist = hand.wrist();
    FINGERS
        .iter()
        .filter(|&&(tip, pip)| {
            wrist.distance(hand.point(tip)) > EXTENSION_RATIO * wrist.distance(hand.point(pip))
        })
        .count()
}

/// Classify one hand.  Always returns [`HandState::OpenPalm`] or
/// [`HandState::ClosedFist`].
pub fn classify(hand: &Landmarks) -> HandState {
    if extended_fingers(hand) >= OPEN_PALM_MIN_FINGERS {
        HandState::OpenPalm
    } else {
        HandState::ClosedFist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Point2;
    use crate::synthetic;

    const AT: Point2 = Point2 { x: 0.5, y: 0.5 };

    #[test]
    fn tips_at_twice_pip_distance_is_open_palm() {
        let hand = synthetic::hand_with_tip_ratios(AT, [2.0; 4]);
        assert_eq!(extended_fingers(&hand), 4);
        assert_eq!(classify(&hand), HandState::OpenPalm);
    }

    #[test]
    fn tips_at_half_pip_distance_is_closed_fist() {
        let hand = synthetic::hand_with_tip_ratios(AT, [0.5; 4]);
        assert_eq!(extended_fingers(&hand), 0);
        assert_eq!(classify(&hand), HandState::ClosedFist);
    }

    #[test]
    fn three_extended_fingers_is_enough() {
        let hand = synthetic::hand_with_tip_ratios(AT, [2.0, 2.0, 2.0, 0.5]);
        assert_eq!(classify(&hand), HandState::OpenPalm);
    }

    #[test]
    fn two_extended_fingers_is_a_fist() {
        let hand = synthetic::hand_with_tip_ratios(AT, [2.0, 2.0, 0.5, 0.5]);
        assert_eq!(classify(&hand), HandState::ClosedFist);
    }

    #[test]
    fn tip_level_with_pip_is_not_extended() {
        let hand = synthetic::hand_with_tip_ratios(AT, [1.0; 4]);
        assert_eq!(extended_fingers(&hand), 0);
    }
}
