//! Synthetic landmark sets.
//!
//! Used by the keyboard/mouse simulator (no camera needed) and by tests.
//! Fingers fan upward from a wrist placed below the anchor; each PIP joint
//! sits [`PIP_REACH`] from the wrist and each tip at `ratio × PIP_REACH`.

use crate::landmarks::{
    Landmarks, Point2, ANCHOR, INDEX_PIP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_PIP, MIDDLE_TIP,
    PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP, WRIST,
};

/// Wrist-to-PIP distance of a synthetic hand.
pub const PIP_REACH: f32 = 0.1;

/// Vertical wrist-to-knuckle offset.
const PALM_LENGTH: f32 = 0.08;

/// `(tip, pip, fan angle in radians from vertical)`, index → pinky.
const FAN: [(usize, usize, f32); 4] = [
    (INDEX_TIP,  INDEX_PIP,  -0.25),
    (MIDDLE_TIP, MIDDLE_PIP,  0.0),
    (RING_TIP,   RING_PIP,    0.2),
    (PINKY_TIP,  PINKY_PIP,   0.4),
];

/// A hand whose anchor sits at `anchor`, with per-finger tip/pip ratios.
pub fn hand_with_tip_ratios(anchor: Point2, ratios: [f32; 4]) -> Landmarks {
    let wrist = Point2::new(anchor.x, anchor.y + PALM_LENGTH);
    let mut pts = [wrist; LANDMARK_COUNT];
    pts[WRIST] = wrist;

    for (&(tip, pip, angle), ratio) in FAN.iter().zip(ratios) {
        let (dx, dy) = (angle.sin(), -angle.cos());
        pts[pip] = Point2::new(wrist.x + dx * PIP_REACH, wrist.y + dy * PIP_REACH);
        let reach = PIP_REACH * ratio;
        pts[tip] = Point2::new(wrist.x + dx * reach, wrist.y + dy * reach);
        // dip halfway between pip and tip
        pts[tip - 1] = Point2::new((pts[pip].x + pts[tip].x) / 2.0, (pts[pip].y + pts[tip].y) / 2.0);
        // mcp at palm length along the same ray
        pts[pip - 1] = Point2::new(wrist.x + dx * PALM_LENGTH, wrist.y + dy * PALM_LENGTH);
    }
    // thumb out to the side
    for (k, idx) in (1..=4).enumerate() {
        let t = (k + 1) as f32 * 0.025;
        pts[idx] = Point2::new(wrist.x - t, wrist.y - t * 0.6);
    }
    pts[ANCHOR] = anchor;
    Landmarks::from(pts)
}

/// All four fingers extended to twice the PIP reach.
pub fn open_palm(anchor: Point2) -> Landmarks {
    hand_with_tip_ratios(anchor, [2.0; 4])
}

/// All four fingertips curled to half the PIP reach.
pub fn closed_fist(anchor: Point2) -> Landmarks {
    hand_with_tip_ratios(anchor, [0.5; 4])
}
