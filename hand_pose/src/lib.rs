//! # hand_pose
//!
//! The detector boundary of the gesture tree.  Turns raw, per-frame hand
//! landmark output into one [`HandReading`] per frame.
//!
//! | Stage | Module | Output |
//! |---|---|---|
//! | wire line → validated points | [`feed`] | [`Detection`] |
//! | one hand → pose | [`classifier`] | [`HandState`] (open palm / closed fist) |
//! | frame → reading | [`sampler`] | [`HandReading`] `(count, primary, secondary)` |
//!
//! Nothing here raises to the interaction layer: malformed frames are
//! reported as [`FeedError`] for the caller to drop, and a detector that
//! cannot start is represented by [`HandReading::unavailable`].
//!
//! ```rust
//! use hand_pose::{sample, synthetic, Detection, HandState, Point2};
//!
//! let frame = Detection::new(vec![synthetic::open_palm(Point2::new(0.4, 0.3))]);
//! let reading = sample(&frame);
//! assert_eq!(reading.count, 1);
//! assert_eq!(reading.primary.state, HandState::OpenPalm);
//! ```

pub mod classifier;
pub mod feed;
pub mod landmarks;
pub mod reading;
pub mod sampler;
pub mod synthetic;

pub use classifier::classify;
pub use feed::{parse_feed_line, FeedError, FeedLine};
pub use landmarks::{Detection, LandmarkError, Landmarks, Point2, LANDMARK_COUNT};
pub use reading::{HandPose, HandReading, HandState, MAX_HANDS};
pub use sampler::sample;
