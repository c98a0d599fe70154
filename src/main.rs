//! Koro Stage headless driver
//!
//! Plays a scripted session against the in-memory scene graph, the way an AR
//! host would feed it: collaborators push events into the queue, the frame
//! loop pumps the queue and advances the clock.
//!
//! Usage: `koro-stage [settings.json]`

use koro_stage::consts::{GOAL_TAG, HAZARD_TAG, SIM_DT};
use koro_stage::platform::{LimitedReason, PlaneAnchor, PlaneEvent, RawTrackingState};
use koro_stage::sim::Hud;
use koro_stage::{Event, EventQueue, EventSender, GameSession, HudSink, SceneGraph, Settings};

/// Prints the HUD whenever it is republished
#[derive(Default)]
struct ConsoleHud {
    last: Option<Hud>,
}

impl HudSink for ConsoleHud {
    fn present(&mut self, hud: &Hud) {
        if self.last.as_ref() == Some(hud) {
            return;
        }
        println!(
            "[{:<24}] {:<10} {:<16} score: {}",
            hud.status, hud.main, hud.sub, hud.score
        );
        self.last = Some(hud.clone());
    }
}

type Session = GameSession<SceneGraph, ConsoleHud>;

/// Run the frame loop for `secs` seconds of session time
fn run_frames(session: &mut Session, queue: &mut EventQueue, secs: f64) {
    let frames = (secs / SIM_DT).round() as u32;
    for _ in 0..frames {
        session.pump(queue);
        session.advance(SIM_DT);
    }
    session.pump(queue);
}

/// Report every live obstacle as having reached the goal
fn clear_obstacles(session: &Session, tx: &EventSender) {
    for obstacle in session.live_obstacles() {
        tx.contact(&obstacle.tag, GOAL_TAG);
    }
}

fn main() {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(2);
            }
        },
        None => Settings::default(),
    };

    let mut session = match GameSession::new(SceneGraph::new(), ConsoleHud::default(), settings) {
        Ok(session) => session,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(2);
        }
    };
    log::info!("Koro Stage (headless) starting...");

    let mut queue = EventQueue::new();
    let tx = queue.sender();

    // Tracking settles, a plane shows up
    tx.send(Event::Tracking(RawTrackingState::Limited(
        LimitedReason::Initializing,
    )));
    run_frames(&mut session, &mut queue, 0.5);
    tx.send(Event::Tracking(RawTrackingState::Normal));
    tx.send(Event::CameraHeading(0.3));
    tx.send(Event::Plane(PlaneEvent::Added(PlaneAnchor::new(1, 0.2, -1.0))));
    // A second plane is ignored
    tx.send(Event::Plane(PlaneEvent::Added(PlaneAnchor::new(2, 2.0, -3.0))));
    run_frames(&mut session, &mut queue, 0.5);

    // First round: survive a few obstacles, then hit the hazard
    tx.send(Event::UserStart);
    for _ in 0..4 {
        run_frames(&mut session, &mut queue, 1.5);
        clear_obstacles(&session, &tx);
    }
    tx.contact(HAZARD_TAG, "ball9");
    run_frames(&mut session, &mut queue, 1.0);

    // Second round, ended early
    tx.send(Event::UserStart);
    run_frames(&mut session, &mut queue, 3.0);
    clear_obstacles(&session, &tx);
    tx.contact("ball1", HAZARD_TAG);
    run_frames(&mut session, &mut queue, 1.0);

    match serde_json::to_string_pretty(session.records()) {
        Ok(json) => println!("\nSession records:\n{json}"),
        Err(err) => log::warn!("Could not serialize records: {}", err),
    }

    tx.send(Event::ResetRequested);
    run_frames(&mut session, &mut queue, 0.1);
    println!(
        "\nAfter reset: phase={} stages={} obstacles destroyed={}",
        session.phase().kind(),
        session.world().stage_count(),
        session.world().destroyed_obstacles()
    );
}
