//! Tunables of the interaction state machine.

use std::time::Duration;

use serde::Deserialize;

/// Thresholds, timers and smoothing constants.  `Default` carries the
/// values the installation ships with; every field may be overridden from a
/// config file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Per-tick primary-hand movement below this counts as stationary.
    pub stationary_threshold: f32,
    /// Per-tick movement above this releases a lock.
    pub unlock_threshold:     f32,
    /// Continuous stillness needed to lock the carousel.
    pub lock_hold_ms:         u64,
    /// Carousel auto-advance period while browsing.
    pub auto_advance_ms:      u64,
    /// First-order smoothing factor applied to the expansion value per tick.
    pub expansion_lerp:       f32,
    /// Residual below which the expansion value snaps onto its target.
    pub snap_epsilon:         f32,
    /// Expansion held while inspecting an image.
    pub inspect_expansion:    f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig {
            stationary_threshold: 0.01,
            unlock_threshold:     0.1,
            lock_hold_ms:         2000,
            auto_advance_ms:      2500,
            expansion_lerp:       0.05,
            snap_epsilon:         0.01,
            inspect_expansion:    0.5,
        }
    }
}

impl InteractionConfig {
    pub fn lock_hold(&self) -> Duration    { Duration::from_millis(self.lock_hold_ms) }
    pub fn auto_advance(&self) -> Duration { Duration::from_millis(self.auto_advance_ms) }
}
