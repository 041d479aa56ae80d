//! Per-frame hand readings handed to the interaction state machine.

use crate::landmarks::Point2;

/// Only the first two detected hands are ever tracked.
pub const MAX_HANDS: usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// HandState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum HandState {
    /// No hand in this slot.
    #[default]
    Idle,
    OpenPalm,
    ClosedFist,
    /// The detector could not be started; tracking is unavailable.
    Error,
}

impl HandState {
    pub fn label(&self) -> &'static str {
        match self {
            HandState::Idle       => "IDLE",
            HandState::OpenPalm   => "OPEN_PALM",
            HandState::ClosedFist => "CLOSED_FIST",
            HandState::Error      => "ERROR",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandPose
// ════════════════════════════════════════════════════════════════════════════

/// One hand's relevant signal: its pose and anchor-point position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPose {
    pub state: HandState,
    pub x:     f32,
    pub y:     f32,
}

impl HandPose {
    pub const IDLE:  HandPose = HandPose { state: HandState::Idle,  x: 0.5, y: 0.5 };
    pub const ERROR: HandPose = HandPose { state: HandState::Error, x: 0.5, y: 0.5 };

    pub fn new(state: HandState, at: Point2) -> Self {
        HandPose { state, x: at.x, y: at.y }
    }

    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

impl Default for HandPose {
    fn default() -> Self { HandPose::IDLE }
}

// ════════════════════════════════════════════════════════════════════════════
// HandReading
// ════════════════════════════════════════════════════════════════════════════

/// `(count, primary, secondary)` for one processed video frame.
///
/// With `count == 0` both poses sit at the idle center (or the error center
/// when tracking is unavailable); with `count == 1` only `primary` carries
/// data.  `count` never exceeds [`MAX_HANDS`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandReading {
    pub count:     usize,
    pub primary:   HandPose,
    pub secondary: HandPose,
}

impl HandReading {
    /// No hands in view.
    pub fn idle() -> Self {
        HandReading { count: 0, primary: HandPose::IDLE, secondary: HandPose::IDLE }
    }

    /// Steady reading emitted while the camera is switched off.
    pub fn disabled() -> Self {
        HandReading::idle()
    }

    /// Terminal reading emitted when the detector cannot run.
    pub fn unavailable() -> Self {
        HandReading { count: 0, primary: HandPose::ERROR, secondary: HandPose::ERROR }
    }

    /// Distinguishes "tracking unavailable" from "no hands visible"; both
    /// report `count == 0`.
    pub fn is_tracking_unavailable(&self) -> bool {
        self.primary.state == HandState::Error
    }
}

impl Default for HandReading {
    fn default() -> Self { HandReading::idle() }
}
