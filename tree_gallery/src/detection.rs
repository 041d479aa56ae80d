//! Hand detection sources: an external detector process or keyboard/mouse
//! simulation.
//!
//! Every source runs on its own thread and publishes [`DetectorEvent`]s over
//! an `mpsc` channel.  The render loop never waits on it: a
//! [`ReadingMailbox`] drains whatever has arrived and keeps only the newest
//! reading.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use hand_pose::{parse_feed_line, sample, synthetic, Detection, FeedLine, HandReading, Point2};

// ════════════════════════════════════════════════════════════════════════════
// DetectorEvent
// ════════════════════════════════════════════════════════════════════════════

/// What one detection cycle produced.
#[derive(Clone, Debug, PartialEq)]
pub enum DetectorEvent {
    /// A processed frame.
    Frame(HandReading),
    /// A frame failed to decode; no new reading this cycle.
    Dropped,
    /// The detector cannot run (permission denied, init failure, exited).
    Unavailable(String),
}

// ════════════════════════════════════════════════════════════════════════════
// DetectionSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`DetectorEvent`]s over a channel.
pub trait DetectionSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<DetectorEvent>);
}

/// Spawn a detection source on its own thread and return the receiving end.
pub fn spawn_detection_source<D: DetectionSource>(source: D) -> Receiver<DetectorEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// CommandDetectionSource — external detector process
// ════════════════════════════════════════════════════════════════════════════

/// Runs an external landmark detector and reads its JSON-lines feed from
/// stdout, one frame per line.
#[derive(Clone, Debug)]
pub struct CommandDetectionSource {
    pub program: String,
    pub args:    Vec<String>,
}

impl CommandDetectionSource {
    /// Split a shell-style command line on whitespace.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(CommandDetectionSource { program, args: parts.collect() })
    }
}

impl DetectionSource for CommandDetectionSource {
    fn run(self: Box<Self>, tx: Sender<DetectorEvent>) {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn();
        let mut child = match child {
            Ok(c) => c,
            Err(e) => {
                let _ = tx.send(DetectorEvent::Unavailable(format!("{}: {e}", self.program)));
                return;
            }
        };
        info!(program = %self.program, pid = child.id(), "detector started");

        let Some(stdout) = child.stdout.take() else {
            stop(&mut child);
            let _ = tx.send(DetectorEvent::Unavailable("detector stdout not captured".into()));
            return;
        };
        for line in BufReader::new(stdout).lines() {
            let event = match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => feed_event(&line),
                Err(e) => DetectorEvent::Unavailable(format!("detector read failed: {e}")),
            };
            let terminal = matches!(event, DetectorEvent::Unavailable(_));
            if tx.send(event).is_err() || terminal {
                stop(&mut child);
                return;
            }
        }

        let status = child.wait().map(|s| s.to_string()).unwrap_or_else(|e| e.to_string());
        let _ = tx.send(DetectorEvent::Unavailable(format!("detector exited ({status})")));
    }
}

/// Kill the detector and reap it.
fn stop(child: &mut Child) {
    let _ = child.kill();
    match child.wait() {
        Ok(status) => info!(pid = child.id(), %status, "detector stopped"),
        Err(e)     => warn!(pid = child.id(), error = %e, "detector did not exit cleanly"),
    }
}

/// Decode one feed line into an event.
pub fn feed_event(line: &str) -> DetectorEvent {
    match parse_feed_line(line) {
        Ok(FeedLine::Frame(detection))  => DetectorEvent::Frame(sample(&detection)),
        Ok(FeedLine::Unavailable(why))  => DetectorEvent::Unavailable(why),
        Err(e) => {
            debug!(error = %e, "dropping malformed detector frame");
            DetectorEvent::Dropped
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimDetectionSource — keyboard/mouse simulation
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position in normalized camera coordinates.
    Pointer { x: f32, y: f32 },
    KeyDown(SimKey),
    KeyUp(SimKey),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    NoHands,    // 0
    OneHand,    // 1
    TwoHands,   // 2
    Fist,       // F (held)
    Fail,       // X
}

/// Synthesises real 21-point landmark sets from simulated input, so the
/// classifier and sampler run exactly as they do on camera frames.
///
/// Emits one frame per `interval`, like a detector bounded by its own
/// throughput.
pub struct SimDetectionSource {
    pub rx:       Receiver<SimInput>,
    pub interval: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SimHands {
    count:   usize,
    fist:    bool,
    pointer: Point2,
}

impl Default for SimHands {
    fn default() -> Self {
        SimHands { count: 0, fist: false, pointer: Point2::CENTER }
    }
}

impl SimHands {
    /// The pointer hand first; a second hand mirrors it across the frame.
    fn detection(&self) -> Detection {
        let pose = |at: Point2| if self.fist { synthetic::closed_fist(at) } else { synthetic::open_palm(at) };
        let mirror = Point2::new(1.0 - self.pointer.x, self.pointer.y);
        let hands = [self.pointer, mirror].into_iter().take(self.count).map(pose).collect();
        Detection::new(hands)
    }
}

impl DetectionSource for SimDetectionSource {
    fn run(self: Box<Self>, tx: Sender<DetectorEvent>) {
        let mut hands = SimHands::default();
        let mut next_frame = Instant::now() + self.interval;
        loop {
            let wait = next_frame.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(wait) {
                Ok(SimInput::Pointer { x, y }) => hands.pointer = Point2::new(x, y),
                Ok(SimInput::KeyDown(SimKey::NoHands))  => hands.count = 0,
                Ok(SimInput::KeyDown(SimKey::OneHand))  => hands.count = 1,
                Ok(SimInput::KeyDown(SimKey::TwoHands)) => hands.count = 2,
                Ok(SimInput::KeyDown(SimKey::Fist))     => hands.fist = true,
                Ok(SimInput::KeyUp(SimKey::Fist))       => hands.fist = false,
                Ok(SimInput::KeyDown(SimKey::Fail)) => {
                    let _ = tx.send(DetectorEvent::Unavailable("simulated camera failure".into()));
                    return;
                }
                Ok(SimInput::KeyUp(_)) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }

            // the frame clock runs independently of input
            let now = Instant::now();
            if now >= next_frame {
                if tx.send(DetectorEvent::Frame(sample(&hands.detection()))).is_err() {
                    debug!("simulated detector stopped");
                    return;
                }
                next_frame += self.interval;
                if next_frame < now {
                    next_frame = now + self.interval;
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackingStatus + ReadingMailbox
// ════════════════════════════════════════════════════════════════════════════

/// Camera state as shown in the status bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingStatus {
    /// Enabled, waiting for the first frame.
    Initializing,
    Active,
    /// Terminal until the camera is toggled off and on again.
    Unavailable,
    Disabled,
}

impl TrackingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TrackingStatus::Initializing => "camera starting",
            TrackingStatus::Active       => "tracking",
            TrackingStatus::Unavailable  => "camera unavailable",
            TrackingStatus::Disabled     => "camera off",
        }
    }
}

/// Latest-value mailbox between the detection thread and the render loop.
///
/// Holding no receiver means the camera is off.  Dropping the receiver is
/// what stops a source: its next send fails and its thread exits.
pub struct ReadingMailbox {
    rx:     Option<Receiver<DetectorEvent>>,
    latest: HandReading,
    failed: Option<String>,
    seen:   bool,
}

impl ReadingMailbox {
    /// `None` starts with the camera off.
    pub fn new(rx: Option<Receiver<DetectorEvent>>) -> Self {
        ReadingMailbox { rx, latest: HandReading::idle(), failed: None, seen: false }
    }

    /// Drain everything queued without blocking and return the reading the
    /// state machine should see this tick.
    pub fn drain(&mut self) -> HandReading {
        let mut gone = false;
        if let Some(rx) = &self.rx {
            let mut queued = Vec::new();
            loop {
                match rx.try_recv() {
                    Ok(event) => queued.push(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        gone = true;
                        break;
                    }
                }
            }
            for event in queued {
                self.absorb(event);
            }
        }
        if gone && self.failed.is_none() {
            self.absorb(DetectorEvent::Unavailable("detector stopped".into()));
        }
        self.reading()
    }

    fn absorb(&mut self, event: DetectorEvent) {
        if self.failed.is_some() {
            return;
        }
        match event {
            DetectorEvent::Frame(reading) => {
                self.latest = reading;
                self.seen = true;
            }
            DetectorEvent::Dropped => {}
            DetectorEvent::Unavailable(reason) => {
                warn!(%reason, "hand tracking unavailable");
                self.latest = HandReading::unavailable();
                self.failed = Some(reason);
            }
        }
    }

    /// The reading as of the last drain.
    pub fn reading(&self) -> HandReading {
        if self.rx.is_none() {
            HandReading::disabled()
        } else {
            self.latest
        }
    }

    pub fn status(&self) -> TrackingStatus {
        match (self.rx.is_some(), &self.failed, self.seen) {
            (false, _, _)      => TrackingStatus::Disabled,
            (true, Some(_), _) => TrackingStatus::Unavailable,
            (true, None, true) => TrackingStatus::Active,
            (true, None, false) => TrackingStatus::Initializing,
        }
    }

    pub fn failure(&self) -> Option<&str> { self.failed.as_deref() }
    pub fn is_enabled(&self) -> bool      { self.rx.is_some() }

    /// Turn the camera off and let the current source wind down.
    pub fn disable(&mut self) {
        self.rx = None;
        self.latest = HandReading::idle();
        self.failed = None;
        self.seen = false;
    }

    /// Turn the camera on with a fresh source; clears any failure.
    pub fn reconnect(&mut self, rx: Receiver<DetectorEvent>) {
        self.rx = Some(rx);
        self.latest = HandReading::idle();
        self.failed = None;
        self.seen = false;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_pose::HandState;

    fn one_hand(x: f32) -> HandReading {
        sample(&Detection::new(vec![synthetic::open_palm(Point2::new(x, 0.4))]))
    }

    fn feed_line(anchor: Point2) -> String {
        let hand = synthetic::open_palm(anchor);
        let pts: Vec<String> = hand.points().iter().map(|p| format!("[{},{}]", p.x, p.y)).collect();
        format!(r#"{{"hands":[[{}]]}}"#, pts.join(","))
    }

    #[test]
    fn mailbox_keeps_only_the_newest_reading() {
        let (tx, rx) = mpsc::channel();
        let mut mb = ReadingMailbox::new(Some(rx));
        assert_eq!(mb.status(), TrackingStatus::Initializing);

        tx.send(DetectorEvent::Frame(one_hand(0.2))).unwrap();
        tx.send(DetectorEvent::Frame(one_hand(0.6))).unwrap();
        let r = mb.drain();
        assert_eq!(r.count, 1);
        assert_eq!(r.primary, one_hand(0.6).primary);
        assert_eq!(mb.status(), TrackingStatus::Active);

        // nothing new: the last reading stands
        assert_eq!(mb.drain(), r);
    }

    #[test]
    fn dropped_frames_keep_the_last_reading() {
        let (tx, rx) = mpsc::channel();
        let mut mb = ReadingMailbox::new(Some(rx));
        tx.send(DetectorEvent::Frame(one_hand(0.3))).unwrap();
        tx.send(DetectorEvent::Dropped).unwrap();
        assert_eq!(mb.drain(), one_hand(0.3));
    }

    #[test]
    fn unavailable_latches() {
        let (tx, rx) = mpsc::channel();
        let mut mb = ReadingMailbox::new(Some(rx));
        tx.send(DetectorEvent::Unavailable("denied".into())).unwrap();
        tx.send(DetectorEvent::Frame(one_hand(0.3))).unwrap();
        let r = mb.drain();
        assert!(r.is_tracking_unavailable());
        assert_eq!(r.count, 0);
        assert_eq!(mb.status(), TrackingStatus::Unavailable);
        assert_eq!(mb.failure(), Some("denied"));
    }

    #[test]
    fn disconnected_source_is_unavailable() {
        let (tx, rx) = mpsc::channel::<DetectorEvent>();
        drop(tx);
        let mut mb = ReadingMailbox::new(Some(rx));
        assert!(mb.drain().is_tracking_unavailable());
    }

    #[test]
    fn disabled_camera_reads_idle() {
        let mut mb = ReadingMailbox::new(None);
        assert_eq!(mb.drain(), HandReading::disabled());
        assert_eq!(mb.status(), TrackingStatus::Disabled);

        let (tx, rx) = mpsc::channel();
        mb.reconnect(rx);
        tx.send(DetectorEvent::Frame(one_hand(0.3))).unwrap();
        assert_eq!(mb.drain(), one_hand(0.3));

        mb.disable();
        assert_eq!(mb.drain(), HandReading::disabled());
        assert!(tx.send(DetectorEvent::Dropped).is_err());
    }

    #[test]
    fn reconnect_clears_the_failure() {
        let (tx, rx) = mpsc::channel();
        let mut mb = ReadingMailbox::new(Some(rx));
        tx.send(DetectorEvent::Unavailable("gone".into())).unwrap();
        mb.drain();

        let (tx2, rx2) = mpsc::channel();
        mb.reconnect(rx2);
        assert_eq!(mb.status(), TrackingStatus::Initializing);
        tx2.send(DetectorEvent::Frame(one_hand(0.5))).unwrap();
        assert_eq!(mb.drain().count, 1);
    }

    #[test]
    fn feed_event_decodes_frames_and_errors() {
        match feed_event(&feed_line(Point2::new(0.5, 0.5))) {
            DetectorEvent::Frame(r) => {
                assert_eq!(r.count, 1);
                assert_eq!(r.primary.state, HandState::OpenPalm);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            feed_event(r#"{"error":"permission denied"}"#),
            DetectorEvent::Unavailable("permission denied".into())
        );
        assert_eq!(feed_event("{not json"), DetectorEvent::Dropped);
    }

    #[test]
    fn sim_hands_mirror_the_second_hand() {
        let hands = SimHands { count: 2, fist: true, pointer: Point2::new(0.2, 0.3) };
        let r = sample(&hands.detection());
        assert_eq!(r.count, 2);
        assert_eq!(r.primary.state, HandState::ClosedFist);
        assert!((r.secondary.x - 0.8).abs() < 1e-5);
    }

    #[test]
    fn sim_source_emits_frames_and_fails_on_request() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = spawn_detection_source(SimDetectionSource { rx: sim_rx, interval: Duration::from_millis(1) });
        sim_tx.send(SimInput::KeyDown(SimKey::OneHand)).unwrap();
        let frame = rx.iter().find(|e| matches!(e, DetectorEvent::Frame(r) if r.count == 1));
        assert!(frame.is_some());

        sim_tx.send(SimInput::KeyDown(SimKey::Fail)).unwrap();
        let failed = rx.iter().any(|e| matches!(e, DetectorEvent::Unavailable(_)));
        assert!(failed);
    }

    #[test]
    fn frames_keep_coming_while_the_pointer_moves() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = spawn_detection_source(SimDetectionSource { rx: sim_rx, interval: Duration::from_millis(20) });
        sim_tx.send(SimInput::KeyDown(SimKey::OneHand)).unwrap();

        // pointer updates arrive faster than the frame interval
        let until = Instant::now() + Duration::from_millis(400);
        let mut x = 0.0;
        while Instant::now() < until {
            x = (x + 0.01) % 1.0;
            sim_tx.send(SimInput::Pointer { x, y: 0.5 }).unwrap();
            thread::sleep(Duration::from_millis(5));
        }
        let frames = rx.try_iter().filter(|e| matches!(e, DetectorEvent::Frame(_))).count();
        assert!(frames >= 5, "only {frames} frames in 400ms");
    }

    #[test]
    fn disabling_the_camera_stops_the_source_thread() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = spawn_detection_source(SimDetectionSource { rx: sim_rx, interval: Duration::from_millis(2) });
        let mut mb = ReadingMailbox::new(Some(rx));
        mb.disable();

        // once the thread exits its input receiver is gone
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut stopped = false;
        while Instant::now() < deadline {
            if sim_tx.send(SimInput::Pointer { x: 0.5, y: 0.5 }).is_err() {
                stopped = true;
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(stopped, "simulated detector still running after disable");
    }

    #[test]
    fn detector_exit_is_reported_after_its_frames() {
        let script = format!("echo '{}'", feed_line(Point2::new(0.5, 0.5)));
        let rx = spawn_detection_source(CommandDetectionSource {
            program: "sh".into(),
            args:    vec!["-c".into(), script],
        });
        assert!(matches!(rx.recv().unwrap(), DetectorEvent::Frame(r) if r.count == 1));
        match rx.recv().unwrap() {
            DetectorEvent::Unavailable(why) => assert!(why.starts_with("detector exited")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_detector_binary_is_unavailable() {
        let rx = spawn_detection_source(CommandDetectionSource {
            program: "definitely-not-a-hand-detector".into(),
            args:    vec![],
        });
        assert!(matches!(rx.recv().unwrap(), DetectorEvent::Unavailable(_)));
    }

    #[test]
    fn command_line_splits_program_and_args() {
        let src = CommandDetectionSource::from_command_line("python3  detect.py --cam 0").unwrap();
        assert_eq!(src.program, "python3");
        assert_eq!(src.args, ["detect.py", "--cam", "0"]);
        assert!(CommandDetectionSource::from_command_line("   ").is_none());
    }
}
