//! Fixed-size, validated hand landmark sets.
//!
//! The external detector hands us loosely-shaped point lists.  They are
//! checked exactly once here and turned into a [`Landmarks`] value; every
//! consumer downstream can index wrist, tips and pips without bounds checks.

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices (MediaPipe hand convention)
// ════════════════════════════════════════════════════════════════════════════

/// Number of keypoints per hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP:   usize = 14;
pub const RING_TIP:   usize = 16;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_TIP:  usize = 20;

/// The anchor point used as the hand's tracked position (middle knuckle).
pub const ANCHOR: usize = MIDDLE_MCP;

// ════════════════════════════════════════════════════════════════════════════
// Point2
// ════════════════════════════════════════════════════════════════════════════

/// A normalized image-space point; `x`, `y` nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const CENTER: Point2 = Point2 { x: 0.5, y: 0.5 };

    pub fn new(x: f32, y: f32) -> Self {
        Point2 { x, y }
    }

    /// Euclidean distance in normalized image units.
    pub fn distance(self, other: Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[f32; 2]> for Point2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Point2 { x, y }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmarks
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    WrongCount(usize),

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// One hand's keypoints, always exactly [`LANDMARK_COUNT`] finite points.
#[derive(Clone, Debug, PartialEq)]
pub struct Landmarks {
    points: [Point2; LANDMARK_COUNT],
}

impl Landmarks {
    /// Validate a detector-supplied point list.
    pub fn try_from_slice(points: &[Point2]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount(points.len()));
        }
        if let Some(index) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        let mut out = [Point2::default(); LANDMARK_COUNT];
        out.copy_from_slice(points);
        Ok(Landmarks { points: out })
    }

    pub fn point(&self, index: usize) -> Point2 {
        self.points[index]
    }

    pub fn wrist(&self) -> Point2  { self.points[WRIST] }
    pub fn anchor(&self) -> Point2 { self.points[ANCHOR] }

    pub fn points(&self) -> &[Point2; LANDMARK_COUNT] {
        &self.points
    }
}

impl From<[Point2; LANDMARK_COUNT]> for Landmarks {
    fn from(points: [Point2; LANDMARK_COUNT]) -> Self {
        Landmarks { points }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Detection — one frame's worth of hands
// ════════════════════════════════════════════════════════════════════════════

/// All hands found in a single video frame, in detector order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detection {
    pub hands: Vec<Landmarks>,
}

impl Detection {
    pub fn empty() -> Self {
        Detection::default()
    }

    pub fn new(hands: Vec<Landmarks>) -> Self {
        Detection { hands }
    }

    pub fn len(&self) -> usize     { self.hands.len() }
    pub fn is_empty(&self) -> bool { self.hands.is_empty() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize) -> Vec<Point2> {
        (0..n).map(|i| Point2::new(i as f32 / 40.0, 0.5)).collect()
    }

    #[test]
    fn accepts_exactly_21_points() {
        let lm = Landmarks::try_from_slice(&flat(21)).unwrap();
        assert_eq!(lm.wrist(), Point2::new(0.0, 0.5));
        assert_eq!(lm.anchor(), Point2::new(9.0 / 40.0, 0.5));
    }

    #[test]
    fn rejects_short_list() {
        assert_eq!(
            Landmarks::try_from_slice(&flat(9)),
            Err(LandmarkError::WrongCount(9))
        );
    }

    #[test]
    fn rejects_nan() {
        let mut pts = flat(21);
        pts[12].y = f32::NAN;
        assert_eq!(
            Landmarks::try_from_slice(&pts),
            Err(LandmarkError::NonFinite { index: 12 })
        );
    }

    #[test]
    fn distance_is_euclidean() {
        let d = Point2::new(0.0, 0.0).distance(Point2::new(0.3, 0.4));
        assert!((d - 0.5).abs() < 1e-6);
    }
}
