//! # scene_params
//!
//! Maps each tick's [`InteractionSnapshot`](interaction::InteractionSnapshot)
//! onto continuous transforms for every object in the gesture tree scene.
//!
//! | Object | Target | Smoothing |
//! |---|---|---|
//! | tree | spin accumulates; scale `1 + expansion × k` | per-frame factor, frame-rate independent |
//! | gallery ring | active slot facing the viewer | shortest-path angle, `rate × dt` |
//! | browsing image | orbit slot with per-index bob | `rate × dt` |
//! | viewed image | mirrored primary-hand position near the viewer | `rate × dt` |
//! | wish particle | rises and circles the trunk | integrated from `dt` |
//! | star topper, camera | closed-form in elapsed time and mode | none |
//!
//! Every rate is multiplied by the tick's elapsed time, so uneven render
//! ticks trace the same motion.
//!
//! ```rust
//! use std::time::Duration;
//! use hand_pose::HandReading;
//! use interaction::Session;
//! use scene_params::SceneMapper;
//!
//! let mut session = Session::default();
//! session.add_image("tree.png").unwrap();
//! let tick = session.tick(&HandReading::idle(), Duration::ZERO);
//!
//! let mut mapper = SceneMapper::default();
//! let frame = mapper.update(&tick.snapshot, session.gallery(), session.wishes(), Duration::from_millis(16));
//! assert_eq!(frame.images.len(), 1);
//! ```

pub mod config;
pub mod mapper;
pub mod motion;
pub mod objects;

pub use config::SceneConfig;
pub use mapper::{SceneFrame, SceneMapper};
pub use motion::Vec3;
pub use objects::{
    CameraControls, ImageRole, ImageTransform, RingTransform, StarTransform, TreeTransform,
    WishParticle,
};
