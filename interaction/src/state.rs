//! The interaction state machine.
//!
//! Fuses the latest [`HandReading`] into stable interaction state once per
//! render tick:
//!
//! ```text
//!              count == 1, still ≥ lock hold
//!   Browsing ─────────────────────────────────▶ Locked
//!      ▲  ◀──────────────────────────────────── │
//!      │      move > unlock threshold, or       │
//!      │      count == 0                        │
//!      │                                        │
//!      │ count < 2      count == 2 ∧ gallery    │
//!      └──────────── Inspecting ◀───────────────┘
//! ```
//!
//! Timers are plain deadlines on the session clock (`now`, time since the
//! session began) and are compared every tick; nothing is scheduled.

use std::time::Duration;

use tracing::{debug, info};

use hand_pose::{HandPose, HandReading, Point2};

use crate::config::InteractionConfig;
use crate::gallery::{Gallery, ImageId};

// ════════════════════════════════════════════════════════════════════════════
// Mode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Carousel auto-advances; hand height drives the tree.
    Browsing,
    /// Carousel frozen on the active image after sustained stillness.
    Locked,
    /// Two hands up: one image pulled out and steered by the primary hand.
    Inspecting { image: ImageId },
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Browsing        => "browsing",
            Mode::Locked          => "locked",
            Mode::Inspecting {..} => "inspecting",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Transition
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnlockReason {
    AggressiveMovement,
    HandsLost,
}

/// A discrete change observed during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Locked         { index: usize },
    Unlocked       { reason: UnlockReason },
    InspectStarted { image: ImageId, index: usize },
    InspectEnded   { image: ImageId },
    /// Ambient carousel step.
    Advanced       { index: usize },
}

// ════════════════════════════════════════════════════════════════════════════
// Snapshot
// ════════════════════════════════════════════════════════════════════════════

/// Everything a renderer needs from one tick, published as a whole value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionSnapshot {
    pub mode:                 Mode,
    pub expansion:            f32,
    /// Meaningful only when `gallery_len > 0`.
    pub active_index:         usize,
    pub gallery_len:          usize,
    pub hand_count:           usize,
    pub primary:              HandPose,
    pub tracking_unavailable: bool,
}

impl InteractionSnapshot {
    pub fn viewed_image(&self) -> Option<ImageId> {
        match self.mode {
            Mode::Inspecting { image } => Some(image),
            _ => None,
        }
    }

    pub fn is_locked(&self) -> bool     { self.mode == Mode::Locked }
    pub fn is_inspecting(&self) -> bool { matches!(self.mode, Mode::Inspecting { .. }) }
}

// ════════════════════════════════════════════════════════════════════════════
// InteractionState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct InteractionState {
    config:           InteractionConfig,
    expansion:        f32,
    mode:             Mode,
    active_index:     usize,
    /// Session time of the last tick whose movement broke stillness.
    last_movement:    Duration,
    /// `None` whenever single-hand tracking is not running.
    previous_primary: Option<Point2>,
    /// Next carousel step; `None` while the carousel is not running.
    next_advance:     Option<Duration>,
}

impl InteractionState {
    pub fn new(config: InteractionConfig) -> Self {
        InteractionState {
            config,
            expansion:        0.0,
            mode:             Mode::Browsing,
            active_index:     0,
            last_movement:    Duration::ZERO,
            previous_primary: None,
            next_advance:     None,
        }
    }

    pub fn config(&self) -> &InteractionConfig { &self.config }
    pub fn mode(&self) -> Mode                 { self.mode }
    pub fn expansion(&self) -> f32             { self.expansion }
    pub fn active_index(&self) -> usize        { self.active_index }

    /// A new image was appended at `index`: point the carousel at it.
    ///
    /// Inspecting is left alone.  While browsing the auto-advance period
    /// restarts so the new image gets a full turn in front.
    pub fn image_added(&mut self, index: usize) {
        self.active_index = index;
        if self.mode == Mode::Browsing {
            self.next_advance = None;
        }
    }

    /// Advance the machine by one render tick.
    pub fn tick(&mut self, reading: &HandReading, gallery: &Gallery, now: Duration) -> Vec<Transition> {
        let mut out = Vec::new();

        self.clamp_index(gallery.len());
        self.arbitrate_inspect(reading, gallery, now, &mut out);
        self.track_lock(reading, gallery.len(), now, &mut out);
        self.auto_advance(gallery.len(), now, &mut out);
        self.update_expansion(reading);

        for t in &out {
            match t {
                Transition::Advanced { index } => debug!(index, "carousel advanced"),
                other => info!(transition = ?other, mode = self.mode.label(), "interaction transition"),
            }
        }
        out
    }

    pub fn snapshot(&self, reading: &HandReading, gallery_len: usize) -> InteractionSnapshot {
        InteractionSnapshot {
            mode:                 self.mode,
            expansion:            self.expansion,
            active_index:         self.active_index,
            gallery_len,
            hand_count:           reading.count,
            primary:              reading.primary,
            tracking_unavailable: reading.is_tracking_unavailable(),
        }
    }

    // ── steps ────────────────────────────────────────────────────────────

    fn clamp_index(&mut self, len: usize) {
        if len == 0 {
            self.active_index = 0;
        } else if self.active_index >= len {
            self.active_index = len - 1;
        }
    }

    /// Level-triggered on `count == 2`: repeated evaluation never churns.
    fn arbitrate_inspect(
        &mut self,
        reading: &HandReading,
        gallery: &Gallery,
        now: Duration,
        out: &mut Vec<Transition>,
    ) {
        let wants_inspect = reading.count == 2 && !gallery.is_empty();

        match self.mode {
            Mode::Inspecting { .. } if wants_inspect => {}
            Mode::Inspecting { image } => {
                self.mode = Mode::Browsing;
                self.restart_timers(now);
                out.push(Transition::InspectEnded { image });
            }
            _ if wants_inspect => {
                if let Some(img) = gallery.get(self.active_index) {
                    self.mode = Mode::Inspecting { image: img.id };
                    self.next_advance = None;
                    self.previous_primary = None;
                    out.push(Transition::InspectStarted { image: img.id, index: self.active_index });
                }
            }
            _ => {}
        }
    }

    fn track_lock(&mut self, reading: &HandReading, len: usize, now: Duration, out: &mut Vec<Transition>) {
        if matches!(self.mode, Mode::Inspecting { .. }) {
            return;
        }

        if reading.count == 0 {
            self.previous_primary = None;
            if self.mode == Mode::Locked {
                self.mode = Mode::Browsing;
                out.push(Transition::Unlocked { reason: UnlockReason::HandsLost });
            }
            return;
        }

        if reading.count != 1 || len == 0 {
            self.previous_primary = None;
            return;
        }

        let pos = reading.primary.position();
        let Some(prev) = self.previous_primary.replace(pos) else {
            // first tracked tick: stillness is measured from here
            self.last_movement = now;
            return;
        };

        let dist = pos.distance(prev);
        if dist < self.config.stationary_threshold {
            let still_for = now.saturating_sub(self.last_movement);
            if self.mode == Mode::Browsing && still_for >= self.config.lock_hold() {
                self.mode = Mode::Locked;
                self.next_advance = None;
                out.push(Transition::Locked { index: self.active_index });
            }
        } else {
            self.last_movement = now;
            // between the two thresholds the lock state is left as is
            if dist > self.config.unlock_threshold && self.mode == Mode::Locked {
                self.mode = Mode::Browsing;
                out.push(Transition::Unlocked { reason: UnlockReason::AggressiveMovement });
            }
        }
    }

    fn auto_advance(&mut self, len: usize, now: Duration, out: &mut Vec<Transition>) {
        if self.mode != Mode::Browsing || len == 0 {
            self.next_advance = None;
            return;
        }
        let period = self.config.auto_advance();
        let deadline = self.next_advance.get_or_insert(now + period);
        while now >= *deadline {
            self.active_index = (self.active_index + 1) % len;
            *deadline += period;
            out.push(Transition::Advanced { index: self.active_index });
        }
    }

    fn update_expansion(&mut self, reading: &HandReading) {
        let target = if matches!(self.mode, Mode::Inspecting { .. }) {
            self.config.inspect_expansion
        } else if reading.count > 0 {
            (1.0 - reading.primary.y).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let residual = target - self.expansion;
        if residual.abs() < self.config.snap_epsilon {
            self.expansion = target;
        } else {
            self.expansion += residual * self.config.expansion_lerp;
        }
    }

    fn restart_timers(&mut self, now: Duration) {
        self.next_advance = None;
        self.previous_primary = None;
        self.last_movement = now;
    }
}

impl Default for InteractionState {
    fn default() -> Self { InteractionState::new(InteractionConfig::default()) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
