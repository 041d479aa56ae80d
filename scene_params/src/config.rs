//! Scene tunables.

use serde::Deserialize;

/// Rates, radii and scale levels for every animated object.
///
/// Rates ending in `_rate` are approach speeds per second; `tree_lerp` is the
/// fraction of the residual closed per 60 Hz frame.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    // tree
    pub tree_height:           f32,
    pub tree_radius:           f32,
    pub tree_spin:             f32,
    pub tree_spin_inspecting:  f32,
    pub expand_multiplier:     f32,
    pub expand_multiplier_y:   f32,
    pub tree_lerp:             f32,

    // gallery ring
    pub ring_rate:             f32,
    pub ring_radius:           f32,
    pub ring_expand:           f32,
    pub bob_amplitude:         f32,

    // images
    pub browse_position_rate:  f32,
    pub scale_rate:            f32,
    pub inspect_position_rate: f32,
    pub image_scale:           f32,
    pub image_scale_active:    f32,
    pub image_scale_locked:    f32,
    pub inspect_scale:         f32,
    pub inspect_scale_zoomed:  f32,
    pub inspect_plane_z:       f32,
    pub dimmed_opacity:        f32,

    // camera
    pub auto_rotate_speed:     f32,
    pub auto_rotate_ceiling:   f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            tree_height:           14.0,
            tree_radius:           6.0,
            tree_spin:             0.15,
            tree_spin_inspecting:  0.01,
            expand_multiplier:     2.0,
            expand_multiplier_y:   0.2,
            tree_lerp:             0.05,

            ring_rate:             5.0,
            ring_radius:           7.5,
            ring_expand:           2.0,
            bob_amplitude:         1.5,

            browse_position_rate:  3.0,
            scale_rate:            5.0,
            inspect_position_rate: 8.0,
            image_scale:           1.5,
            image_scale_active:    2.5,
            image_scale_locked:    3.5,
            inspect_scale:         10.0,
            inspect_scale_zoomed:  16.0,
            inspect_plane_z:       13.0,
            dimmed_opacity:        0.6,

            auto_rotate_speed:     0.4,
            auto_rotate_ceiling:   0.1,
        }
    }
}
