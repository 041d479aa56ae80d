//! Append-only session collections: the image gallery and the wish list.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("wish text is empty")]
    EmptyWish,

    #[error("image source is empty")]
    EmptySource,
}

// ════════════════════════════════════════════════════════════════════════════
// Ids
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(Uuid);

impl ImageId {
    pub fn new() -> Self { ImageId(Uuid::new_v4()) }
}

impl Default for ImageId {
    fn default() -> Self { ImageId::new() }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WishId(Uuid);

impl WishId {
    pub fn new() -> Self { WishId(Uuid::new_v4()) }
}

impl Default for WishId {
    fn default() -> Self { WishId::new() }
}

impl fmt::Display for WishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gallery
// ════════════════════════════════════════════════════════════════════════════

/// An uploaded image.  `source` is an opaque handle (path or URL) that only
/// the renderer interprets.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryImage {
    pub id:       ImageId,
    pub source:   String,
    pub position: [f32; 3],
}

/// Images in upload order; append order is display order.
#[derive(Clone, Debug, Default)]
pub struct Gallery {
    images: Vec<GalleryImage>,
}

impl Gallery {
    /// Append an image; it lands at index `len() - 1`.
    pub fn push(&mut self, source: &str) -> Result<&GalleryImage, SessionError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(SessionError::EmptySource);
        }
        self.images.push(GalleryImage {
            id:       ImageId::new(),
            source:   source.to_string(),
            position: [0.0, 0.0, 0.0],
        });
        Ok(&self.images[self.images.len() - 1])
    }

    pub fn get(&self, index: usize) -> Option<&GalleryImage> { self.images.get(index) }
    pub fn len(&self) -> usize                                { self.images.len() }
    pub fn is_empty(&self) -> bool                            { self.images.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &GalleryImage> { self.images.iter() }
}

// ════════════════════════════════════════════════════════════════════════════
// Wishes
// ════════════════════════════════════════════════════════════════════════════

/// Where new wishes spawn: just below the tree base.
pub const WISH_SPAWN: [f32; 3] = [0.0, -5.0, 0.0];

#[derive(Clone, Debug, PartialEq)]
pub struct Wish {
    pub id:        WishId,
    pub text:      String,
    pub position:  [f32; 3],
    pub timestamp: DateTime<Utc>,
}

/// Submitted wishes, never mutated or removed.
#[derive(Clone, Debug, Default)]
pub struct WishBook {
    wishes: Vec<Wish>,
}

impl WishBook {
    pub fn submit(&mut self, text: &str, timestamp: DateTime<Utc>) -> Result<&Wish, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyWish);
        }
        self.wishes.push(Wish {
            id:       WishId::new(),
            text:     text.to_string(),
            position: WISH_SPAWN,
            timestamp,
        });
        Ok(&self.wishes[self.wishes.len() - 1])
    }

    pub fn len(&self) -> usize                       { self.wishes.len() }
    pub fn is_empty(&self) -> bool                   { self.wishes.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &Wish> { self.wishes.iter() }
}
