//! Scripted walk through the interaction modes with synthetic hands.

use std::time::Duration;

use hand_pose::{sample, synthetic, Detection, HandReading, Point2};
use interaction::{Session, Transition};

const TICK: Duration = Duration::from_millis(16);

/// Tick the session for `span` on a fixed reading, printing transitions.
fn hold(session: &mut Session, reading: &HandReading, now: &mut Duration, span: Duration) {
    let end = *now + span;
    while *now < end {
        let tick = session.tick(reading, *now);
        for t in tick.transitions {
            if !matches!(t, Transition::Advanced { .. }) {
                println!("   t={:>6}ms  {:?}", now.as_millis(), t);
            }
        }
        *now += TICK;
    }
    let s = session.snapshot();
    println!(
        "   → mode={:<10} expansion={:.3} active={}",
        s.mode.label(), s.expansion, s.active_index
    );
}

fn main() {
    println!("\n=== Interaction Demo ===\n");

    let mut session = Session::default();
    for name in ["aurora.png", "harbor.png", "lantern.png", "frost.png"] {
        session.add_image(name).ok();
    }
    let mut now = Duration::ZERO;

    // ── 1. No hands: carousel drifts, tree stays closed ──────────────────
    println!("1. No hands for 6 s");
    hold(&mut session, &HandReading::idle(), &mut now, Duration::from_secs(6));

    // ── 2. One high, still hand: tree opens, carousel locks ──────────────
    println!("\n2. One open palm held still near the top");
    let high = sample(&Detection::new(vec![synthetic::open_palm(Point2::new(0.5, 0.15))]));
    hold(&mut session, &high, &mut now, Duration::from_secs(3));

    // ── 3. Big sweep: unlock ─────────────────────────────────────────────
    println!("\n3. Sweep the hand across");
    let swept = sample(&Detection::new(vec![synthetic::open_palm(Point2::new(0.8, 0.15))]));
    hold(&mut session, &swept, &mut now, Duration::from_millis(100));

    // ── 4. Second hand: inspect ──────────────────────────────────────────
    println!("\n4. Raise a second hand");
    let both = sample(&Detection::new(vec![
        synthetic::closed_fist(Point2::new(0.3, 0.4)),
        synthetic::open_palm(Point2::new(0.7, 0.4)),
    ]));
    hold(&mut session, &both, &mut now, Duration::from_secs(2));

    // ── 5. Drop everything ───────────────────────────────────────────────
    println!("\n5. Hands down");
    hold(&mut session, &HandReading::idle(), &mut now, Duration::from_secs(2));

    // ── 6. Camera fails ──────────────────────────────────────────────────
    println!("\n6. Detector unavailable");
    hold(&mut session, &HandReading::unavailable(), &mut now, Duration::from_secs(1));
    println!("   tracking unavailable: {}", session.snapshot().tracking_unavailable);
    println!();
}
