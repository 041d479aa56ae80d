//! `SceneMapper`: turns each tick's snapshot into smoothed transforms.

use std::time::Duration;

use tracing::trace;

use interaction::{Gallery, ImageId, InteractionSnapshot, WishBook};

use crate::config::SceneConfig;
use crate::motion::Vec3;
use crate::objects::{
    CameraControls, ImageRole, ImageTransform, RingTransform, StarTransform, TreeTransform,
    WishParticle,
};

/// Every object's transform for one rendered frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneFrame {
    pub tree:    TreeTransform,
    pub ring:    RingTransform,
    /// Gallery order.
    pub images:  Vec<(ImageId, ImageTransform)>,
    pub wishes:  Vec<WishParticle>,
    pub star:    StarTransform,
    pub camera:  CameraControls,
    /// Seconds since the mapper started.
    pub elapsed: f32,
}

#[derive(Clone, Debug, Default)]
pub struct SceneMapper {
    config: SceneConfig,
    frame:  SceneFrame,
}

impl SceneMapper {
    pub fn new(config: SceneConfig) -> Self {
        SceneMapper { config, frame: SceneFrame::default() }
    }

    pub fn config(&self) -> &SceneConfig { &self.config }
    pub fn frame(&self) -> &SceneFrame   { &self.frame }

    /// Advance every object by `dt` toward the targets implied by `snap`.
    ///
    /// New gallery images and wishes join the scene the first tick they
    /// appear; both collections are append-only so position is identity.
    pub fn update(
        &mut self,
        snap:    &InteractionSnapshot,
        gallery: &Gallery,
        wishes:  &WishBook,
        dt:      Duration,
    ) -> &SceneFrame {
        let dt = dt.as_secs_f32();
        let cfg = &self.config;
        let frame = &mut self.frame;
        frame.elapsed += dt;
        let t = frame.elapsed;

        frame.tree.update(cfg, snap, dt);
        frame.ring.update(cfg, snap, dt);

        for image in gallery.iter().skip(frame.images.len()) {
            trace!(id = %image.id, "image joins the ring");
            frame.images.push((image.id, ImageTransform::default()));
        }
        let total = frame.images.len();
        let viewed = snap.viewed_image();
        let ring_rotation = frame.ring.rotation;
        for (index, (id, transform)) in frame.images.iter_mut().enumerate() {
            let role = ImageRole {
                index,
                total,
                active: index == snap.active_index,
                locked: snap.is_locked(),
                viewed: viewed == Some(*id),
            };
            transform.update(cfg, role, snap, ring_rotation, t, dt);
        }

        for wish in wishes.iter().skip(frame.wishes.len()) {
            trace!(id = %wish.id, "wish released");
            frame.wishes.push(WishParticle::new(wish.id, Vec3::from(wish.position)));
        }
        for particle in &mut frame.wishes {
            particle.update(t, dt);
        }

        frame.star = StarTransform::at(cfg, t);
        frame.camera = CameraControls::from_snapshot(cfg, snap);
        &self.frame
    }
}
