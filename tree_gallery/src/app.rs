//! Top-level application state.
//!
//! `AppState` owns the interaction [`Session`], the [`SceneMapper`] and the
//! detector [`ReadingMailbox`].  Each frame it drains the mailbox, ticks the
//! session on the newest reading and advances the scene transforms; the
//! visualizer only ever sees the resulting snapshot and frame.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{info, warn};

use interaction::{InteractionSnapshot, Session, Transition, UnlockReason};
use scene_params::{SceneFrame, SceneMapper};

use crate::config::{AppConfig, DetectorConfig};
use crate::detection::{
    spawn_detection_source, CommandDetectionSource, DetectorEvent, ReadingMailbox,
    SimDetectionSource, SimInput, TrackingStatus,
};
use crate::visualizer::{ShellKey, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppCommand
// ════════════════════════════════════════════════════════════════════════════

/// User actions from the shell chrome.
#[derive(Clone, Debug, PartialEq)]
pub enum AppCommand {
    ToggleCamera,
    Wish(String),
    Upload(String),
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    session:   Session,
    mapper:    SceneMapper,
    mailbox:   ReadingMailbox,
    snapshot:  InteractionSnapshot,
    last_tick: Option<Duration>,

    // ── status message ────────────────────────────────────────────────────
    pub status: String,
}

impl AppState {
    /// `rx` is the running detector, or `None` when the camera starts off.
    pub fn new(cfg: &AppConfig, rx: Option<Receiver<DetectorEvent>>) -> Self {
        let mut session = Session::new(cfg.interaction.clone());
        for source in &cfg.images {
            if let Err(e) = session.add_image(source) {
                warn!(%source, error = %e, "skipping startup image");
            }
        }
        let snapshot = session.snapshot();
        AppState {
            session,
            mapper:    SceneMapper::new(cfg.scene.clone()),
            mailbox:   ReadingMailbox::new(rx),
            snapshot,
            last_tick: None,
            status:    "Ready".to_string(),
        }
    }

    // ── process one command ───────────────────────────────────────────────

    /// Returns `true` when the camera is being switched on; the caller
    /// starts a detector and hands it to [`AppState::reconnect`].
    pub fn handle_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::ToggleCamera => {
                if self.mailbox.is_enabled() {
                    self.mailbox.disable();
                    info!("camera switched off");
                    self.status = "Camera off".to_string();
                } else {
                    info!("camera switched on");
                    self.status = "Camera on".to_string();
                    return true;
                }
            }
            AppCommand::Wish(text) => match self.session.add_wish(&text) {
                Ok(wish) => self.status = format!("Wish released: \"{}\"", wish.text),
                Err(e)   => self.status = format!("Wish not sent: {e}"),
            },
            AppCommand::Upload(source) => match self.session.add_image(&source) {
                Ok(_)  => self.status = format!("Added {} ({} images)", source.trim(), self.session.gallery().len()),
                Err(e) => self.status = format!("Upload failed: {e}"),
            },
        }
        false
    }

    /// Attach a freshly started detector.
    pub fn reconnect(&mut self, rx: Receiver<DetectorEvent>) {
        self.mailbox.reconnect(rx);
    }

    // ── per-frame tick ────────────────────────────────────────────────────

    /// Advance everything to session time `now`.
    pub fn tick(&mut self, now: Duration) -> &SceneFrame {
        let dt = self.last_tick.map_or(Duration::ZERO, |prev| now.saturating_sub(prev));
        self.last_tick = Some(now);

        let reading = self.mailbox.drain();
        let tick = self.session.tick(&reading, now);
        for transition in &tick.transitions {
            if let Some(line) = self.describe(transition) {
                self.status = line;
            }
        }
        self.snapshot = tick.snapshot;
        self.mapper.update(&self.snapshot, self.session.gallery(), self.session.wishes(), dt)
    }

    fn describe(&self, transition: &Transition) -> Option<String> {
        let total = self.session.gallery().len();
        Some(match *transition {
            Transition::Locked { index } =>
                format!("LOCKED on image {}/{}", index + 1, total),
            Transition::Unlocked { reason: UnlockReason::AggressiveMovement } =>
                "Unlocked: hand moved".to_string(),
            Transition::Unlocked { reason: UnlockReason::HandsLost } =>
                "Unlocked: hands lost".to_string(),
            Transition::InspectStarted { index, .. } =>
                format!("INSPECTING image {}/{}", index + 1, total),
            Transition::InspectEnded { .. } =>
                "Back to browsing".to_string(),
            Transition::Advanced { .. } => return None,
        })
    }

    // ── accessors for the render loop ─────────────────────────────────────

    pub fn snapshot(&self) -> &InteractionSnapshot { &self.snapshot }
    pub fn frame(&self) -> &SceneFrame             { self.mapper.frame() }
    pub fn session(&self) -> &Session              { &self.session }
    pub fn tracking(&self) -> TrackingStatus       { self.mailbox.status() }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Start the configured detector.  A simulated detector takes its input from
/// the window, so the visualizer gets the sending end.
fn connect(detector: &DetectorConfig, vis: &mut Visualizer) -> anyhow::Result<Receiver<DetectorEvent>> {
    match &detector.command {
        Some(line) => {
            let source = CommandDetectionSource::from_command_line(line)
                .context("detector command is empty")?;
            info!(program = %source.program, "using external detector");
            Ok(spawn_detection_source(source))
        }
        None => {
            let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
            vis.set_sim_sender(sim_tx);
            info!("using simulated detector");
            Ok(spawn_detection_source(SimDetectionSource { rx: sim_rx, interval: detector.sim_interval() }))
        }
    }
}

/// Prompt for one line on stdout/stdin.  Blocks the render loop while the
/// user types.
pub fn prompt_line(label: &str) -> String {
    print!("\n  {label}: ");
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Run the full application at ~60 fps until the window closes or `Q`.
pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let mut vis = Visualizer::new()?;
    let rx = if cfg.camera_enabled { Some(connect(&cfg.detector, &mut vis)?) } else { None };
    let mut app = AppState::new(&cfg, rx);
    let start = Instant::now();

    while vis.is_open() {
        // 1. Window input; simulated hands go straight to the detector
        let orbit = app.frame().camera.orbit_enabled;
        for key in vis.poll_input(orbit) {
            let cmd = match key {
                ShellKey::Quit         => return Ok(()),
                ShellKey::ToggleCamera => AppCommand::ToggleCamera,
                ShellKey::Wish         => AppCommand::Wish(prompt_line("Make a wish")),
                ShellKey::Upload       => AppCommand::Upload(prompt_line("Image path")),
            };
            if app.handle_command(cmd) {
                let rx = connect(&cfg.detector, &mut vis)?;
                app.reconnect(rx);
            }
        }

        // 2. Per-frame logic
        app.tick(start.elapsed());

        // 3. Render
        vis.render(app.frame(), app.snapshot(), app.tracking(), &app.status);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::Sender;
    use hand_pose::{sample, synthetic, Detection, HandReading, Point2};
    use interaction::Mode;

    const TICK: Duration = Duration::from_millis(16);

    fn make_app(images: &[&str]) -> (AppState, Sender<DetectorEvent>) {
        let cfg = AppConfig {
            images: images.iter().map(|s| s.to_string()).collect(),
            ..AppConfig::default()
        };
        let (tx, rx) = mpsc::channel();
        (AppState::new(&cfg, Some(rx)), tx)
    }

    fn frame(anchors: &[(f32, f32)]) -> DetectorEvent {
        let hands = anchors.iter().map(|&(x, y)| synthetic::open_palm(Point2::new(x, y))).collect();
        DetectorEvent::Frame(sample(&Detection::new(hands)))
    }

    fn run_for(app: &mut AppState, now: &mut Duration, span: Duration) {
        let end = *now + span;
        while *now < end {
            app.tick(*now);
            *now += TICK;
        }
    }

    #[test]
    fn startup_images_fill_the_gallery() {
        let (app, _tx) = make_app(&["a.png", "  ", "b.png"]);
        assert_eq!(app.session().gallery().len(), 2);
        assert_eq!(app.tracking(), TrackingStatus::Initializing);
    }

    #[test]
    fn upload_moves_the_carousel_to_the_new_image() {
        let (mut app, _tx) = make_app(&["a.png"]);
        app.handle_command(AppCommand::Upload("b.png".into()));
        app.tick(Duration::ZERO);
        assert_eq!(app.snapshot().active_index, 1);
        assert_eq!(app.frame().images.len(), 2);
        assert!(app.status.contains("b.png"));
    }

    #[test]
    fn empty_upload_and_wish_are_reported() {
        let (mut app, _tx) = make_app(&[]);
        app.handle_command(AppCommand::Upload("   ".into()));
        assert!(app.status.starts_with("Upload failed"));
        app.handle_command(AppCommand::Wish("".into()));
        assert!(app.status.starts_with("Wish not sent"));
        assert!(app.session().wishes().is_empty());
    }

    #[test]
    fn wish_becomes_a_particle() {
        let (mut app, _tx) = make_app(&[]);
        app.handle_command(AppCommand::Wish("peace".into()));
        app.tick(Duration::ZERO);
        assert_eq!(app.frame().wishes.len(), 1);
    }

    #[test]
    fn two_hands_open_inspection() {
        let (mut app, tx) = make_app(&["a.png", "b.png"]);
        tx.send(frame(&[(0.3, 0.4), (0.7, 0.4)])).unwrap();
        app.tick(Duration::ZERO);
        assert!(app.snapshot().is_inspecting());
        assert!(app.status.starts_with("INSPECTING"));
        assert_eq!(app.tracking(), TrackingStatus::Active);
        let viewed: Vec<_> = app.frame().images.iter().filter(|(_, t)| t.viewed).collect();
        assert_eq!(viewed.len(), 1);
    }

    #[test]
    fn still_hand_locks_after_hold() {
        let (mut app, tx) = make_app(&["a.png", "b.png"]);
        let mut now = Duration::ZERO;
        tx.send(frame(&[(0.5, 0.3)])).unwrap();
        run_for(&mut app, &mut now, Duration::from_millis(2100));
        assert_eq!(app.snapshot().mode, Mode::Locked);
        assert!(app.status.starts_with("LOCKED"));
        assert!(app.frame().images.iter().any(|(_, t)| t.framed));
    }

    #[test]
    fn camera_off_behaves_as_no_hands() {
        let (mut app, tx) = make_app(&["a.png"]);
        let mut now = Duration::ZERO;
        tx.send(frame(&[(0.5, 0.0)])).unwrap();
        run_for(&mut app, &mut now, Duration::from_millis(500));
        let raised = app.snapshot().expansion;
        assert!(raised > 0.5);

        assert!(!app.handle_command(AppCommand::ToggleCamera));
        // the detector's channel is closed so its thread winds down
        assert!(tx.send(frame(&[(0.3, 0.4), (0.7, 0.4)])).is_err());
        run_for(&mut app, &mut now, Duration::from_millis(500));
        let snap = app.snapshot();
        assert_eq!(snap.mode, Mode::Browsing);
        assert_eq!(snap.hand_count, 0);
        assert!(snap.expansion < raised);
        assert_eq!(app.tracking(), TrackingStatus::Disabled);

        // switching back on always asks for a new detector
        assert!(app.handle_command(AppCommand::ToggleCamera));
        let (tx2, rx2) = mpsc::channel();
        app.reconnect(rx2);
        assert_eq!(app.tracking(), TrackingStatus::Initializing);
        tx2.send(frame(&[(0.5, 0.0)])).unwrap();
        app.tick(now);
        assert_eq!(app.snapshot().hand_count, 1);
    }

    #[test]
    fn camera_can_start_switched_off() {
        let cfg = AppConfig { camera_enabled: false, ..AppConfig::default() };
        let mut app = AppState::new(&cfg, None);
        app.tick(Duration::ZERO);
        assert_eq!(app.tracking(), TrackingStatus::Disabled);
        assert_eq!(app.snapshot().hand_count, 0);
        assert!(app.handle_command(AppCommand::ToggleCamera));
    }

    #[test]
    fn detector_failure_is_a_status_not_an_error() {
        let (mut app, tx) = make_app(&["a.png"]);
        tx.send(DetectorEvent::Unavailable("permission denied".into())).unwrap();
        app.tick(Duration::ZERO);
        assert_eq!(app.tracking(), TrackingStatus::Unavailable);
        assert!(app.snapshot().tracking_unavailable);
        assert_eq!(app.snapshot().mode, Mode::Browsing);

        // off and on again asks for a new detector
        assert!(!app.handle_command(AppCommand::ToggleCamera));
        assert!(app.handle_command(AppCommand::ToggleCamera));
        let (tx2, rx2) = mpsc::channel();
        app.reconnect(rx2);
        tx2.send(DetectorEvent::Frame(HandReading::idle())).unwrap();
        app.tick(TICK);
        assert_eq!(app.tracking(), TrackingStatus::Active);
    }

    #[test]
    fn ring_turns_toward_the_active_image() {
        let (mut app, _tx) = make_app(&["a.png", "b.png", "c.png", "d.png"]);
        let mut now = Duration::ZERO;
        run_for(&mut app, &mut now, Duration::from_millis(1000));
        // active index is the last upload (3 of 4)
        let target = scene_params::RingTransform::target_rotation(3, 4);
        let diff = (app.frame().ring.rotation - target).abs();
        assert!(diff < 0.2, "ring at {}, target {}", app.frame().ring.rotation, target);
    }
}
