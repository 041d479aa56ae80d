//! # interaction
//!
//! The gesture-driven interaction core of the gesture tree.  Consumes one
//! [`HandReading`](hand_pose::HandReading) per render tick and produces the
//! discrete and scalar state the scene is driven from:
//!
//! | Output | Driven by |
//! |---|---|
//! | expansion value (0–1, smoothed) | primary hand height; pinned at 0.5 while inspecting |
//! | [`Mode::Browsing`] → [`Mode::Locked`] | one hand held still for the lock hold time |
//! | [`Mode::Locked`] → [`Mode::Browsing`] | one large movement, or all hands gone |
//! | [`Mode::Inspecting`] | exactly two hands with a non-empty gallery |
//! | active gallery index | carousel auto-advance while browsing; newest upload |
//!
//! ```rust
//! use std::time::Duration;
//! use interaction::{Session, Mode};
//! use hand_pose::HandReading;
//!
//! let mut session = Session::default();
//! session.add_image("photos/tree.png").unwrap();
//! let tick = session.tick(&HandReading::idle(), Duration::ZERO);
//! assert_eq!(tick.snapshot.mode, Mode::Browsing);
//! ```

pub mod config;
pub mod gallery;
pub mod session;
pub mod state;

pub use config::InteractionConfig;
pub use gallery::{Gallery, GalleryImage, ImageId, SessionError, Wish, WishBook, WishId, WISH_SPAWN};
pub use session::{Session, Tick};
pub use state::{InteractionSnapshot, InteractionState, Mode, Transition, UnlockReason};
