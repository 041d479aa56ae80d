//! JSON-lines wire format of an external detector process.
//!
//! One line per processed frame:
//!
//! ```text
//! {"hands": [[[0.51, 0.80], [0.49, 0.74], ... 21 points ...], ...]}
//! {"error": "camera permission denied"}
//! ```
//!
//! Points may be `[x, y]`, `[x, y, z]` or `{"x": .., "y": .., "z": ..}`;
//! depth is ignored.

use serde::Deserialize;
use thiserror::Error;

use crate::landmarks::{Detection, LandmarkError, Landmarks, Point2};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed detection line: {0}")]
    Json(#[from] serde_json::Error),

    #[error("point needs at least x and y, got {0} values")]
    ShortPoint(usize),

    #[error("hand {hand}: {source}")]
    Landmarks {
        hand:   usize,
        #[source]
        source: LandmarkError,
    },
}

/// A successfully parsed feed line.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedLine {
    Frame(Detection),
    /// Detector reports it cannot run (permission denied, init failure).
    Unavailable(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePoint {
    Array(Vec<f32>),
    Object { x: f32, y: f32 },
}

impl WirePoint {
    fn to_point(&self) -> Result<Point2, FeedError> {
        match self {
            WirePoint::Array(v) if v.len() >= 2 => Ok(Point2::new(v[0], v[1])),
            WirePoint::Array(v)                 => Err(FeedError::ShortPoint(v.len())),
            WirePoint::Object { x, y }          => Ok(Point2::new(*x, *y)),
        }
    }
}

#[derive(Deserialize)]
struct WireFrame {
    #[serde(default)]
    hands: Vec<Vec<WirePoint>>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one line of the feed, validating every hand.
pub fn parse_feed_line(line: &str) -> Result<FeedLine, FeedError> {
    let frame: WireFrame = serde_json::from_str(line)?;
    if let Some(reason) = frame.error {
        return Ok(FeedLine::Unavailable(reason));
    }

    let mut hands = Vec::with_capacity(frame.hands.len());
    for (hand, raw) in frame.hands.iter().enumerate() {
        let points = raw.iter().map(WirePoint::to_point).collect::<Result<Vec<_>, _>>()?;
        let landmarks = Landmarks::try_from_slice(&points)
            .map_err(|source| FeedError::Landmarks { hand, source })?;
        hands.push(landmarks);
    }
    Ok(FeedLine::Frame(Detection::new(hands)))
}
