//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                          ◆ star                          │
//! │           ▢                 /\              ▢            │
//! │                 ▢          /··\     ▢                    │
//! │                           /·  ·\          + hand cursor  │
//! │      ▢ gallery ring      /··  ··\                ▢       │
//! │                            ·  wishes                     │
//! ├──────────────────────────────────────────────────────────┤
//! │ mode · expansion · image i/n · hands · camera            │
//! │ status line                                              │
//! │ key legend                                               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The scene is projected from a camera orbiting the tree at a fixed height.

use std::f32::consts::TAU;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use hand_pose::HandState;
use interaction::InteractionSnapshot;
use scene_params::{SceneFrame, Vec3};

use crate::detection::{SimInput, SimKey, TrackingStatus};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 960;
pub const WIN_H:     usize = 640;
const STATUS_H:      usize = 48;
const SCENE_H:       usize = WIN_H - STATUS_H;
const STATUS_Y:      usize = SCENE_H;

const CAM_DIST:      f32   = 18.0;
const CAM_Y:         f32   = 2.0;
/// Focal length in pixels for a 45° vertical field of view.
const FOCAL:         f32   = (SCENE_H as f32 / 2.0) / 0.414_213_57;
const NEAR:          f32   = 0.5;
const ORBIT_STEP:    f32   = 0.03;

const BG_COLOR:      u32   = 0xFF000510;
const TREE_COLOR:    u32   = 0xFF0A2A5A;
const SPARK_COLOR:   u32   = 0xFF00FFFF;
const SPARK_BACK:    u32   = 0xFF0047AB;
const GOLD:          u32   = 0xFFFFD700;
const TEXT_BG:       u32   = 0xFF0F1A30;
const PALETTE:       [u32; 6] = [
    0xFF7DF9FF, 0xFFE0FFFF, 0xFFC0C0C0, 0xFF4FA3FF, 0xFFB0E0E6, 0xFF87CEEB,
];

// ════════════════════════════════════════════════════════════════════════════
// ShellKey
// ════════════════════════════════════════════════════════════════════════════

/// Window keys handled by the application rather than the simulated
/// detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellKey {
    ToggleCamera,   // C
    Wish,           // W
    Upload,         // U
    Quit,           // Q / Escape
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:      Window,
    buf:         Vec<u32>,
    sim_tx:      Option<Sender<SimInput>>,
    pointer:     Option<(f32, f32)>,
    fist_down:   bool,
    /// Camera orbit angle about the tree.
    yaw:         f32,
    last_frame:  Instant,
}

impl Visualizer {
    pub fn new() -> anyhow::Result<Self> {
        let mut window = Window::new(
            "Gesture Tree — hand-controlled gallery",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow::anyhow!("failed to open window: {e}"))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf:        vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx:     None,
            pointer:    None,
            fist_down:  false,
            yaw:        0.0,
            last_frame: Instant::now(),
        })
    }

    /// Route simulated hand input to a (new) simulated detector.
    pub fn set_sim_sender(&mut self, tx: Sender<SimInput>) {
        self.sim_tx = Some(tx);
        self.pointer = None;
        self.fist_down = false;
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    fn send(&self, input: SimInput) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }

    /// Poll keyboard and mouse.  Simulated-hand input is forwarded to the
    /// detector; shell keys are returned.
    pub fn poll_input(&mut self, orbit_enabled: bool) -> Vec<ShellKey> {
        let mut keys = Vec::new();
        if !self.window.is_open() {
            keys.push(ShellKey::Quit);
            return keys;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) { keys.push(ShellKey::Quit); }
        if one_shot(Key::C) { keys.push(ShellKey::ToggleCamera); }
        if one_shot(Key::W) { keys.push(ShellKey::Wish); }
        if one_shot(Key::U) { keys.push(ShellKey::Upload); }

        let mut sim = Vec::new();
        if one_shot(Key::Key0) { sim.push(SimInput::KeyDown(SimKey::NoHands)); }
        if one_shot(Key::Key1) { sim.push(SimInput::KeyDown(SimKey::OneHand)); }
        if one_shot(Key::Key2) { sim.push(SimInput::KeyDown(SimKey::TwoHands)); }
        if one_shot(Key::X)    { sim.push(SimInput::KeyDown(SimKey::Fail)); }

        // Fist while F is held
        let fist = self.window.is_key_down(Key::F);
        if fist != self.fist_down {
            self.fist_down = fist;
            sim.push(if fist { SimInput::KeyDown(SimKey::Fist) } else { SimInput::KeyUp(SimKey::Fist) });
        }

        // The camera image is mirrored on screen: pointer x flips.
        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let at = (
                (1.0 - mx / WIN_W as f32).clamp(0.0, 1.0),
                (my / SCENE_H as f32).clamp(0.0, 1.0),
            );
            if self.pointer != Some(at) {
                self.pointer = Some(at);
                sim.push(SimInput::Pointer { x: at.0, y: at.1 });
            }
        }
        for input in sim {
            self.send(input);
        }

        if orbit_enabled {
            if self.window.is_key_down(Key::Left)  { self.yaw -= ORBIT_STEP; }
            if self.window.is_key_down(Key::Right) { self.yaw += ORBIT_STEP; }
        }
        keys
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        frame:    &SceneFrame,
        snap:     &InteractionSnapshot,
        tracking: TrackingStatus,
        status:   &str,
    ) {
        let dt = self.last_frame.elapsed().as_secs_f32();
        self.last_frame = Instant::now();
        if frame.camera.auto_rotate {
            // orbit-control convention: `speed` full turns per minute
            self.yaw += TAU / 60.0 * frame.camera.auto_rotate_speed * dt;
        }

        // Clear
        self.buf.fill(BG_COLOR);

        // ── Tree, its ornaments, wishes and star ──────────────────────────
        self.draw_tree(frame);
        self.draw_wishes(frame);
        let star = Vec3::new(0.0, frame.star.height * frame.tree.scale.y, 0.0);
        if let Some((sx, sy, _)) = self.project(star) {
            self.draw_diamond(sx, sy, 6, GOLD);
        }

        // ── Gallery, far to near ──────────────────────────────────────────
        self.draw_images(frame);

        // ── Hand cursor ───────────────────────────────────────────────────
        if snap.hand_count > 0 {
            let x = ((1.0 - snap.primary.x) * WIN_W as f32) as isize;
            let y = (snap.primary.y * SCENE_H as f32) as isize;
            let color = match snap.primary.state {
                HandState::ClosedFist => 0xFFFF8C00,
                HandState::OpenPalm   => 0xFFFFFFFF,
                _                     => 0xFF888888,
            };
            self.draw_cross(x, y, 8, color);
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, STATUS_H, TEXT_BG);
        let camera_color = match tracking {
            TrackingStatus::Active       => 0xFF66FF99,
            TrackingStatus::Initializing => 0xFFFFEE88,
            TrackingStatus::Unavailable  => 0xFFFF6666,
            TrackingStatus::Disabled     => 0xFF888888,
        };
        let image = if snap.gallery_len == 0 {
            "no images".to_string()
        } else {
            format!("image {}/{}", snap.active_index + 1, snap.gallery_len)
        };
        let summary = format!(
            "{}   expansion {:.2}   {}   hands {}",
            snap.mode.label(), snap.expansion, image, snap.hand_count,
        );
        self.draw_label(&summary, 10, STATUS_Y + 6, 0xFFEEEEEE);
        self.draw_label(tracking.label(), WIN_W - 4 * 20, STATUS_Y + 6, camera_color);
        self.draw_label(status, 10, STATUS_Y + 20, GOLD);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "mouse=hand  0/1/2=hands  F=fist  X=fail cam  C=camera  W=wish  U=upload  arrows=orbit  Q=quit",
            10, WIN_H - 10, 0xFF888888,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Projection ────────────────────────────────────────────────────────

    /// World point → (screen x, screen y, depth), or `None` behind the
    /// near plane.
    fn project(&self, p: Vec3) -> Option<(isize, isize, f32)> {
        let v = p.rotate_y(-self.yaw);
        let depth = CAM_DIST - v.z;
        if depth < NEAR { return None; }
        let sx = WIN_W as f32 / 2.0 + v.x * FOCAL / depth;
        let sy = SCENE_H as f32 / 2.0 - (v.y - CAM_Y) * FOCAL / depth;
        Some((sx as isize, sy as isize, depth))
    }

    // ── Tree ──────────────────────────────────────────────────────────────

    fn draw_tree(&mut self, frame: &SceneFrame) {
        const HEIGHT: f32 = 14.0;
        const RADIUS: f32 = 6.0;
        const SPARKS: usize = 90;

        let s = frame.tree.scale;
        let half_h = HEIGHT / 2.0 * s.y;
        let (Some((ax, ay, _)), Some((_, by, _))) = (
            self.project(Vec3::new(0.0, half_h, 0.0)),
            self.project(Vec3::new(0.0, -half_h, 0.0)),
        ) else { return };
        let base_half_w = RADIUS * s.x * FOCAL / CAM_DIST;

        // Silhouette
        let rows = (by - ay).max(1);
        for dy in 0..=rows {
            let half = (base_half_w * dy as f32 / rows as f32) as isize;
            self.hline(ax - half, ax + half, ay + dy, TREE_COLOR);
        }

        // Spiral of sparks turning with the tree
        for i in 0..SPARKS {
            let t = i as f32 / SPARKS as f32;
            let angle = i as f32 * 0.7 + frame.tree.rotation;
            let r = RADIUS * t;
            let local = Vec3::new(angle.cos() * r * s.x, half_h - t * HEIGHT * s.y, angle.sin() * r * s.z);
            if let Some((x, y, _)) = self.project(local) {
                let color = if local.rotate_y(-self.yaw).z >= 0.0 { SPARK_COLOR } else { SPARK_BACK };
                self.fill_rect_i(x - 1, y - 1, 3, 3, color);
            }
        }
    }

    fn draw_wishes(&mut self, frame: &SceneFrame) {
        let s = frame.tree.scale;
        for wish in &frame.wishes {
            let p = wish.position;
            let world = Vec3::new(p.x * s.x, p.y * s.y, p.z * s.z).rotate_y(frame.tree.rotation);
            if let Some((x, y, _)) = self.project(world) {
                self.fill_rect_i(x - 2, y - 2, 4, 4, GOLD);
            }
        }
    }

    // ── Gallery ───────────────────────────────────────────────────────────

    fn draw_images(&mut self, frame: &SceneFrame) {
        let mut placed: Vec<_> = frame.images.iter().enumerate()
            .filter_map(|(i, (_, t))| {
                let (x, y, depth) = self.project(t.world_position(frame.ring.rotation))?;
                Some((i, t, x, y, depth))
            })
            .collect();
        placed.sort_by(|a, b| b.4.total_cmp(&a.4));

        for (i, t, x, y, depth) in placed {
            let half = (t.scale * FOCAL / depth / 2.0).max(1.0) as isize;
            if t.framed {
                let pad = half / 10 + 2;
                self.fill_rect_i(x - half - pad, y - half - pad, 2 * (half + pad), 2 * (half + pad), GOLD);
            }
            let color = blend(BG_COLOR, PALETTE[i % PALETTE.len()], t.opacity);
            self.fill_rect_i(x - half, y - half, 2 * half, 2 * half, color);
            self.draw_label(&(i + 1).to_string(), (x - 1).max(0) as usize, (y - 2).max(0) as usize, 0xFF000000);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    /// `fill_rect` for signed coordinates, clipped to the scene area.
    fn fill_rect_i(&mut self, x: isize, y: isize, w: isize, h: isize, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(WIN_W as isize);
        let y1 = (y + h).min(SCENE_H as isize);
        if x1 <= x0 || y1 <= y0 { return; }
        for row in y0..y1 {
            self.hline(x0, x1 - 1, row, color);
        }
    }

    fn hline(&mut self, x0: isize, x1: isize, y: isize, color: u32) {
        if y < 0 || y >= SCENE_H as isize { return; }
        let from = x0.max(0) as usize;
        let to = (x1.min(WIN_W as isize - 1)).max(-1);
        if to < 0 { return; }
        for col in from..=to as usize {
            self.buf[y as usize * WIN_W + col] = color;
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn set_pixel_i(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    fn draw_cross(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for d in -r..=r {
            self.set_pixel_i(cx + d, cy, color);
            self.set_pixel_i(cx, cy + d, color);
        }
    }

    fn draw_diamond(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            let half = r - dy.abs();
            for dx in -half..=half {
                self.set_pixel_i(cx + dx, cy + dy, color);
            }
        }
    }

    /// Minimal bitmap font — 3×5 characters.
    /// Each character is encoded as 5 rows × 3 bits.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '"' => [0b101, 0b101, 0b000, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}
