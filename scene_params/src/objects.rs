//! The animated objects of the scene and the rule each one follows per tick.

use std::f32::consts::{FRAC_PI_2, TAU};

use hand_pose::{HandPose, HandState};
use interaction::{InteractionSnapshot, WishId};

use crate::config::SceneConfig;
use crate::motion::{frame_factor, lerp, lerp3, step_factor, wrap_angle, Vec3};

// ════════════════════════════════════════════════════════════════════════════
// Tree
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeTransform {
    /// Accumulated spin about y, radians.
    pub rotation: f32,
    pub scale:    Vec3,
}

impl Default for TreeTransform {
    fn default() -> Self {
        TreeTransform { rotation: 0.0, scale: Vec3::ONE }
    }
}

impl TreeTransform {
    pub fn target_scale(cfg: &SceneConfig, expansion: f32) -> Vec3 {
        let xz = 1.0 + expansion * cfg.expand_multiplier;
        Vec3::new(xz, 1.0 + expansion * cfg.expand_multiplier_y, xz)
    }

    pub fn update(&mut self, cfg: &SceneConfig, snap: &InteractionSnapshot, dt: f32) {
        let spin = if snap.is_inspecting() { cfg.tree_spin_inspecting } else { cfg.tree_spin };
        self.rotation += spin * dt;
        let target = Self::target_scale(cfg, snap.expansion);
        self.scale = lerp3(self.scale, target, frame_factor(cfg.tree_lerp, dt));
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gallery ring
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RingTransform {
    pub rotation: f32,
}

impl RingTransform {
    /// Angular slot of image `index` among `total` on the ring.
    pub fn slot_angle(index: usize, total: usize) -> f32 {
        index as f32 / total as f32 * TAU
    }

    /// Ring rotation that brings the active slot round to face the viewer.
    pub fn target_rotation(active: usize, total: usize) -> f32 {
        -Self::slot_angle(active, total) + FRAC_PI_2
    }

    pub fn update(&mut self, cfg: &SceneConfig, snap: &InteractionSnapshot, dt: f32) {
        if snap.gallery_len == 0 {
            return;
        }
        let target = Self::target_rotation(snap.active_index, snap.gallery_len);
        let diff = wrap_angle(target - self.rotation);
        self.rotation += diff * step_factor(cfg.ring_rate, dt);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Images
// ════════════════════════════════════════════════════════════════════════════

/// Where one gallery image is drawn.
///
/// While browsing, `position` is in ring space and turns with the ring.
/// While `viewed`, it is in world space, floating in front of the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageTransform {
    pub position: Vec3,
    pub scale:    f32,
    pub opacity:  f32,
    /// Gold selection frame.
    pub framed:   bool,
    pub viewed:   bool,
}

impl Default for ImageTransform {
    fn default() -> Self {
        ImageTransform { position: Vec3::ZERO, scale: 1.0, opacity: 1.0, framed: false, viewed: false }
    }
}

/// Per-image inputs derived from the snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageRole {
    pub index:  usize,
    pub total:  usize,
    pub active: bool,
    pub locked: bool,
    pub viewed: bool,
}

impl ImageTransform {
    /// Ring-space slot of a browsing image at time `t`.
    pub fn browse_target(cfg: &SceneConfig, role: ImageRole, expansion: f32, t: f32) -> Vec3 {
        let angle = RingTransform::slot_angle(role.index, role.total);
        let radius = cfg.ring_radius + expansion * cfg.ring_expand;
        let y = if role.active && role.locked {
            0.0
        } else {
            (t + role.index as f32).sin() * cfg.bob_amplitude
        };
        Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
    }

    /// World-space spot for the viewed image, mirrored so the image follows
    /// the user's hand the way a mirror would.
    pub fn inspect_target(cfg: &SceneConfig, hand: &HandPose) -> Vec3 {
        Vec3::new(
            (1.0 - hand.x) * 20.0 - 10.0,
            (1.0 - hand.y) * 10.0 - 2.0,
            cfg.inspect_plane_z,
        )
    }

    pub fn target_scale(cfg: &SceneConfig, role: ImageRole, hand: &HandPose) -> f32 {
        if role.viewed {
            if hand.state == HandState::OpenPalm { cfg.inspect_scale_zoomed } else { cfg.inspect_scale }
        } else if role.active && role.locked {
            cfg.image_scale_locked
        } else if role.active {
            cfg.image_scale_active
        } else {
            cfg.image_scale
        }
    }

    /// Advance one tick.  `ring_rotation` is the ring's rotation this tick,
    /// used to carry the position across when the image enters or leaves the
    /// viewed state.
    pub fn update(
        &mut self,
        cfg: &SceneConfig,
        role: ImageRole,
        snap: &InteractionSnapshot,
        ring_rotation: f32,
        t: f32,
        dt: f32,
    ) {
        if role.viewed != self.viewed {
            self.position = if role.viewed {
                self.position.rotate_y(ring_rotation)
            } else {
                self.position.rotate_y(-ring_rotation)
            };
            self.viewed = role.viewed;
        }

        let (target, rate) = if role.viewed {
            (Self::inspect_target(cfg, &snap.primary), cfg.inspect_position_rate)
        } else {
            (Self::browse_target(cfg, role, snap.expansion, t), cfg.browse_position_rate)
        };
        self.position = lerp3(self.position, target, step_factor(rate, dt));
        self.scale = lerp(
            self.scale,
            Self::target_scale(cfg, role, &snap.primary),
            step_factor(cfg.scale_rate, dt),
        );
        self.opacity = if role.viewed || role.active { 1.0 } else { cfg.dimmed_opacity };
        self.framed = role.active && role.locked && !role.viewed;
    }

    /// Position in world space given the ring's rotation.
    pub fn world_position(&self, ring_rotation: f32) -> Vec3 {
        if self.viewed { self.position } else { self.position.rotate_y(ring_rotation) }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wish particles
// ════════════════════════════════════════════════════════════════════════════

pub const WISH_RISE:     f32 = 2.0;
pub const WISH_SPIN:     f32 = 2.0;
pub const WISH_ORBIT:    f32 = 1.5;
pub const WISH_CEILING:  f32 = 10.0;
pub const WISH_FLOOR:    f32 = -6.0;

/// A wish rising round the trunk, in tree space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WishParticle {
    pub id:       WishId,
    pub position: Vec3,
    pub rotation: f32,
}

impl WishParticle {
    pub fn new(id: WishId, spawn: Vec3) -> Self {
        WishParticle { id, position: spawn, rotation: 0.0 }
    }

    pub fn update(&mut self, elapsed: f32, dt: f32) {
        self.position.y += dt * WISH_RISE;
        self.rotation += dt * WISH_SPIN;
        let angle = elapsed + self.position.y;
        self.position.x = angle.sin() * WISH_ORBIT;
        self.position.z = angle.cos() * WISH_ORBIT;
        if self.position.y > WISH_CEILING {
            self.position.y = WISH_FLOOR;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Star topper and camera
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StarTransform {
    pub height:   f32,
    pub rotation: f32,
}

impl StarTransform {
    pub fn at(cfg: &SceneConfig, t: f32) -> Self {
        StarTransform {
            height:   cfg.tree_height / 2.0 + 0.6 + (t * 1.5).sin() * 0.1,
            rotation: t * 0.3,
        }
    }
}

/// What the viewer's orbit camera is allowed to do this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraControls {
    pub orbit_enabled:     bool,
    pub auto_rotate:       bool,
    pub auto_rotate_speed: f32,
}

impl CameraControls {
    pub fn from_snapshot(cfg: &SceneConfig, snap: &InteractionSnapshot) -> Self {
        let inspecting = snap.is_inspecting();
        CameraControls {
            orbit_enabled:     !inspecting,
            auto_rotate:       !inspecting && !snap.is_locked() && snap.expansion < cfg.auto_rotate_ceiling,
            auto_rotate_speed: cfg.auto_rotate_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interaction::{ImageId, Mode};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn snap(mode: Mode, expansion: f32, active: usize, len: usize) -> InteractionSnapshot {
        InteractionSnapshot {
            mode,
            expansion,
            active_index:         active,
            gallery_len:          len,
            hand_count:           0,
            primary:              HandPose::IDLE,
            tracking_unavailable: false,
        }
    }

    fn role(index: usize, total: usize, active: bool, locked: bool, viewed: bool) -> ImageRole {
        ImageRole { index, total, active, locked, viewed }
    }

    #[test]
    fn tree_spins_slower_while_inspecting() {
        let cfg = SceneConfig::default();
        let mut browse = TreeTransform::default();
        let mut inspect = TreeTransform::default();
        browse.update(&cfg, &snap(Mode::Browsing, 0.0, 0, 1), 1.0);
        inspect.update(&cfg, &snap(Mode::Inspecting { image: ImageId::new() }, 0.0, 0, 1), 1.0);
        assert!(close(browse.rotation, 0.15));
        assert!(close(inspect.rotation, 0.01));
    }

    #[test]
    fn tree_scale_heads_for_expansion_target() {
        let cfg = SceneConfig::default();
        let target = TreeTransform::target_scale(&cfg, 1.0);
        assert_eq!(target, Vec3::new(3.0, 1.2, 3.0));

        let mut tree = TreeTransform::default();
        let s = snap(Mode::Browsing, 1.0, 0, 0);
        tree.update(&cfg, &s, 1.0 / 60.0);
        assert!(close(tree.scale.x, 1.1));
        for _ in 0..600 {
            tree.update(&cfg, &s, 1.0 / 60.0);
        }
        assert!(close(tree.scale.x, 3.0) && close(tree.scale.y, 1.2));
    }

    #[test]
    fn ring_brings_active_slot_to_the_front() {
        let cfg = SceneConfig::default();
        let mut ring = RingTransform::default();
        let s = snap(Mode::Browsing, 0.0, 2, 4);
        for _ in 0..300 {
            ring.update(&cfg, &s, 1.0 / 60.0);
        }
        let slot = Vec3::new(1.0, 0.0, 0.0).rotate_y(RingTransform::slot_angle(2, 4));
        let front = slot.rotate_y(ring.rotation);
        assert!(close(front.x, 0.0) && close(front.z, 1.0));
    }

    #[test]
    fn ring_turns_the_short_way() {
        let cfg = SceneConfig::default();
        // target for index 3 of 4 is -π, reached from just below +π by a
        // small positive step
        let mut ring = RingTransform { rotation: 3.0 };
        let s = snap(Mode::Browsing, 0.0, 3, 4);
        ring.update(&cfg, &s, 0.1);
        assert!(ring.rotation > 3.0 && ring.rotation < 3.2);
    }

    #[test]
    fn ring_holds_still_with_empty_gallery() {
        let cfg = SceneConfig::default();
        let mut ring = RingTransform { rotation: 0.7 };
        ring.update(&cfg, &snap(Mode::Browsing, 0.0, 0, 0), 1.0);
        assert_eq!(ring.rotation, 0.7);
    }

    #[test]
    fn locked_active_image_stops_bobbing() {
        let cfg = SceneConfig::default();
        let bob = ImageTransform::browse_target(&cfg, role(0, 4, true, false, false), 0.0, 1.0);
        let held = ImageTransform::browse_target(&cfg, role(0, 4, true, true, false), 0.0, 1.0);
        assert!(close(bob.y, 1.0f32.sin() * 1.5));
        assert_eq!(held.y, 0.0);
        assert!(close(held.x, 7.5));
    }

    #[test]
    fn ring_radius_grows_with_expansion() {
        let cfg = SceneConfig::default();
        let p = ImageTransform::browse_target(&cfg, role(0, 2, true, true, false), 1.0, 0.0);
        assert!(close(p.x, 9.5));
    }

    #[test]
    fn scale_levels() {
        let cfg = SceneConfig::default();
        let fist = HandPose { state: HandState::ClosedFist, x: 0.5, y: 0.5 };
        let palm = HandPose { state: HandState::OpenPalm, x: 0.5, y: 0.5 };
        assert_eq!(ImageTransform::target_scale(&cfg, role(1, 3, false, true, false), &fist), 1.5);
        assert_eq!(ImageTransform::target_scale(&cfg, role(1, 3, true, false, false), &fist), 2.5);
        assert_eq!(ImageTransform::target_scale(&cfg, role(1, 3, true, true, false), &fist), 3.5);
        assert_eq!(ImageTransform::target_scale(&cfg, role(1, 3, true, false, true), &fist), 10.0);
        assert_eq!(ImageTransform::target_scale(&cfg, role(1, 3, true, false, true), &palm), 16.0);
    }

    #[test]
    fn inspect_target_mirrors_the_hand() {
        let cfg = SceneConfig::default();
        let left = HandPose { state: HandState::Idle, x: 0.0, y: 0.0 };
        let right = HandPose { state: HandState::Idle, x: 1.0, y: 1.0 };
        assert_eq!(ImageTransform::inspect_target(&cfg, &left), Vec3::new(10.0, 8.0, 13.0));
        assert_eq!(ImageTransform::inspect_target(&cfg, &right), Vec3::new(-10.0, -2.0, 13.0));
    }

    #[test]
    fn opacity_and_frame_follow_role() {
        let cfg = SceneConfig::default();
        let s = snap(Mode::Locked, 0.0, 0, 3);
        let mut img = ImageTransform::default();

        img.update(&cfg, role(1, 3, false, true, false), &s, 0.0, 0.0, 0.016);
        assert_eq!(img.opacity, 0.6);
        assert!(!img.framed);

        img.update(&cfg, role(1, 3, true, true, false), &s, 0.0, 0.0, 0.016);
        assert_eq!(img.opacity, 1.0);
        assert!(img.framed);

        img.update(&cfg, role(1, 3, true, true, true), &s, 0.0, 0.0, 0.016);
        assert!(!img.framed);
    }

    #[test]
    fn entering_view_keeps_world_position_continuous() {
        let cfg = SceneConfig::default();
        let s = snap(Mode::Browsing, 0.0, 0, 2);
        let mut img = ImageTransform { position: Vec3::new(7.5, 0.0, 0.0), ..Default::default() };
        let ring = FRAC_PI_2;
        let before = img.world_position(ring);
        img.update(&cfg, role(0, 2, true, false, true), &s, ring, 0.0, 0.0);
        let after = img.world_position(ring);
        assert!((before - after).length() < 1e-4);
        assert!(img.viewed);
    }

    #[test]
    fn viewed_image_flies_to_the_hand() {
        let cfg = SceneConfig::default();
        let mut s = snap(Mode::Inspecting { image: ImageId::new() }, 0.5, 0, 1);
        s.primary = HandPose { state: HandState::OpenPalm, x: 0.5, y: 0.5 };
        let mut img = ImageTransform::default();
        for _ in 0..240 {
            img.update(&cfg, role(0, 1, true, false, true), &s, 0.0, 0.0, 1.0 / 60.0);
        }
        assert!((img.position - Vec3::new(0.0, 3.0, 13.0)).length() < 1e-3);
        assert!(close(img.scale, 16.0));
    }

    #[test]
    fn wish_rises_orbits_and_wraps() {
        let mut w = WishParticle::new(WishId::new(), Vec3::new(0.0, -5.0, 0.0));
        w.update(0.0, 0.5);
        assert!(close(w.position.y, -4.0));
        assert!(close(w.rotation, 1.0));
        let r = (w.position.x * w.position.x + w.position.z * w.position.z).sqrt();
        assert!(close(r, 1.5));

        w.position.y = 9.9;
        w.update(1.0, 0.1);
        assert_eq!(w.position.y, WISH_FLOOR);
    }

    #[test]
    fn star_bobs_above_the_tree() {
        let cfg = SceneConfig::default();
        let star = StarTransform::at(&cfg, 0.0);
        assert!(close(star.height, 7.6));
        assert_eq!(star.rotation, 0.0);
        let later = StarTransform::at(&cfg, 10.0);
        assert!(close(later.rotation, 3.0));
        assert!((later.height - 7.6).abs() <= 0.1 + 1e-4);
    }

    #[test]
    fn camera_rules() {
        let cfg = SceneConfig::default();
        let idle = CameraControls::from_snapshot(&cfg, &snap(Mode::Browsing, 0.05, 0, 0));
        assert!(idle.orbit_enabled && idle.auto_rotate);

        let open = CameraControls::from_snapshot(&cfg, &snap(Mode::Browsing, 0.5, 0, 0));
        assert!(open.orbit_enabled && !open.auto_rotate);

        let locked = CameraControls::from_snapshot(&cfg, &snap(Mode::Locked, 0.0, 0, 1));
        assert!(!locked.auto_rotate);

        let viewing = CameraControls::from_snapshot(&cfg, &snap(Mode::Inspecting { image: ImageId::new() }, 0.0, 0, 1));
        assert!(!viewing.orbit_enabled && !viewing.auto_rotate);
    }
}
