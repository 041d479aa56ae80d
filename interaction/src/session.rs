//! `Session` — the single owner of all mutable interaction state.
//!
//! Collaborators only ever see the [`InteractionSnapshot`] returned from
//! each [`Session::tick`]; nothing else writes to the state machine.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::info;

use hand_pose::HandReading;

use crate::config::InteractionConfig;
use crate::gallery::{Gallery, ImageId, SessionError, Wish, WishBook};
use crate::state::{InteractionSnapshot, InteractionState, Transition};

/// Output of one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub snapshot:    InteractionSnapshot,
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Default)]
pub struct Session {
    state:        InteractionState,
    gallery:      Gallery,
    wishes:       WishBook,
    last_reading: HandReading,
}

impl Session {
    pub fn new(config: InteractionConfig) -> Self {
        Session {
            state:        InteractionState::new(config),
            gallery:      Gallery::default(),
            wishes:       WishBook::default(),
            last_reading: HandReading::idle(),
        }
    }

    /// Run the state machine for one render tick on the latest reading.
    pub fn tick(&mut self, reading: &HandReading, now: Duration) -> Tick {
        let transitions = self.state.tick(reading, &self.gallery, now);
        self.last_reading = *reading;
        Tick { snapshot: self.snapshot(), transitions }
    }

    /// The state as of the last tick.
    pub fn snapshot(&self) -> InteractionSnapshot {
        self.state.snapshot(&self.last_reading, self.gallery.len())
    }

    /// Upload an image; the carousel jumps to it.
    pub fn add_image(&mut self, source: &str) -> Result<ImageId, SessionError> {
        let image = self.gallery.push(source)?;
        let id = image.id;
        info!(%id, source = %image.source, "image added to gallery");
        self.state.image_added(self.gallery.len() - 1);
        Ok(id)
    }

    pub fn add_wish(&mut self, text: &str) -> Result<&Wish, SessionError> {
        self.add_wish_at(text, Utc::now())
    }

    pub fn add_wish_at(&mut self, text: &str, timestamp: DateTime<Utc>) -> Result<&Wish, SessionError> {
        let wish = self.wishes.submit(text, timestamp)?;
        info!(id = %wish.id, "wish submitted");
        Ok(wish)
    }

    pub fn gallery(&self) -> &Gallery           { &self.gallery }
    pub fn wishes(&self) -> &WishBook           { &self.wishes }
    pub fn state(&self) -> &InteractionState    { &self.state }
}
