//! # tree_gallery
//!
//! A hand-gesture controlled gallery tree.  A particle tree sits in a ring of
//! uploaded images; hand tracking opens the tree, freezes the carousel and
//! pulls single images out for a closer look.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hands | Action |
//! |---|---|---|
//! | Raise hand | 1 | Tree expands with hand height |
//! | Hold still for 2 s | 1 | Lock the carousel on the current image |
//! | Sweep quickly | 1 | Release the lock |
//! | Show a second hand | 2 | Inspect the current image; it follows the first hand |
//! | Open palm while inspecting | 2 | Zoom the inspected image |
//! | Drop all hands | 0 | Tree closes, lock released, carousel resumes |
//!
//! ## Detection
//!
//! * (default) **Simulation**: the mouse is the hand, keys set the hand count.
//! * `--detector-cmd CMD` **External detector**: `CMD` writes one JSON line
//!   of hand landmarks per frame to stdout.
//!
//! ### Keyboard
//!
//! | Key | Action |
//! |---|---|
//! | `0` / `1` / `2` | Simulated hand count |
//! | `F` (hold) | Simulated fist |
//! | `X` | Simulate a camera failure |
//! | `C` | Camera on/off |
//! | `W` | Make a wish (typed on the terminal) |
//! | `U` | Upload an image path (typed on the terminal) |
//! | `←` / `→` | Orbit the camera (not while inspecting) |
//! | `Q` / `Esc` | Quit |

pub mod app;
pub mod config;
pub mod detection;
pub mod visualizer;
