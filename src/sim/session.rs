//! Game phase state machine
//!
//! `GameSession` owns the phase, the scene mutator and the HUD sink. Every
//! phase change goes through [`GameSession::transition`]: side effects on the
//! world run first, then the new phase is published and projected.

use super::contact::{ContactOutcome, resolve_contact};
use super::phase::{Phase, PhaseKind, Transition};
use super::projector::{Hud, Projection, project};
use super::spawn::{Obstacle, ScheduledTask, SpawnScheduler, TaskKind, TimerQueue};
use crate::consts::{INTERRUPTED_MESSAGE, NOT_AVAILABLE_MESSAGE};
use crate::error::{SettingsError, WorldError};
use crate::highscores::HighScores;
use crate::normalize_angle;
use crate::platform::{AnchorFeed, Event, EventQueue, PlaneAnchor, TrackingAdapter, TrackingQuality};
use crate::settings::Settings;
use crate::world::{HudSink, World};

/// Events the state machine understands
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TrackingQualityChanged(TrackingQuality),
    SessionFailed(String),
    SessionInterrupted,
    SessionResumed,
    PlaneDetected(PlaneAnchor),
    UserStart,
    ObstacleAvoided,
    CollidedWithObstacle,
    ResetRequested,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::TrackingQualityChanged(_) => "trackingQualityChanged",
            GameEvent::SessionFailed(_) => "sessionFailed",
            GameEvent::SessionInterrupted => "sessionInterrupted",
            GameEvent::SessionResumed => "sessionResumed",
            GameEvent::PlaneDetected(_) => "planeDetected",
            GameEvent::UserStart => "userStart",
            GameEvent::ObstacleAvoided => "obstacleAvoided",
            GameEvent::CollidedWithObstacle => "collidedWithObstacle",
            GameEvent::ResetRequested => "resetRequested",
        }
    }
}

/// One game session on one thread
pub struct GameSession<W: World, H: HudSink> {
    phase: Phase,
    world: W,
    sink: H,
    hud: Hud,
    settings: Settings,
    timers: TimerQueue,
    spawner: SpawnScheduler,
    tracking: TrackingAdapter,
    anchors: AnchorFeed,
    /// Latest camera yaw (radians)
    heading: f32,
    /// Incremented every time a round starts
    run: u64,
    records: HighScores,
    last_fault: Option<WorldError>,
    /// Set while `Error` was entered through an interruption, not a sensor fault
    interrupted: bool,
}

impl<W: World, H: HudSink> GameSession<W, H> {
    /// Start a session in `Initializing` and publish the initial HUD
    pub fn new(world: W, sink: H, settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut session = Self {
            phase: Phase::Initializing,
            world,
            sink,
            hud: Hud::default(),
            spawner: SpawnScheduler::new(&settings),
            records: HighScores::new(settings.max_records),
            settings,
            timers: TimerQueue::new(),
            tracking: TrackingAdapter::new(),
            anchors: AnchorFeed::new(),
            heading: 0.0,
            run: 0,
            last_fault: None,
            interrupted: false,
        };
        session.present(project(&Phase::Initializing));
        Ok(session)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn sink(&self) -> &H {
        &self.sink
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn records(&self) -> &HighScores {
        &self.records
    }

    /// Session time in seconds
    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Number of the current (or last) round, 0 before the first start
    pub fn current_run(&self) -> u64 {
        self.run
    }

    /// Obstacles alive on the current stage
    pub fn live_obstacles(&self) -> &[Obstacle] {
        self.spawner.live()
    }

    /// Most recent construction error reported by the world
    pub fn last_fault(&self) -> Option<&WorldError> {
        self.last_fault.as_ref()
    }

    /// Drain the queue, applying events in delivery order
    pub fn pump(&mut self, queue: &mut EventQueue) -> Vec<Transition> {
        let mut applied = Vec::new();
        while let Some(event) = queue.try_next() {
            if let Some(transition) = self.handle(event) {
                applied.push(transition);
            }
        }
        applied
    }

    /// Apply one collaborator event
    pub fn handle(&mut self, event: Event) -> Option<Transition> {
        match event {
            Event::Tracking(raw) => {
                let quality = self.tracking.observe(raw)?;
                self.transition(GameEvent::TrackingQualityChanged(quality))
            }
            Event::SessionFailed(description) => {
                self.transition(GameEvent::SessionFailed(description))
            }
            Event::SessionInterrupted => self.transition(GameEvent::SessionInterrupted),
            Event::SessionResumed => self.transition(GameEvent::SessionResumed),
            Event::CameraHeading(heading) => {
                self.heading = normalize_angle(heading);
                None
            }
            Event::Plane(plane) => {
                let anchor = self.anchors.observe(plane)?;
                self.transition(GameEvent::PlaneDetected(anchor))
            }
            Event::Contact { a, b } => self.on_contact(&a, &b),
            Event::UserStart => self.transition(GameEvent::UserStart),
            Event::ResetRequested => self.transition(GameEvent::ResetRequested),
        }
    }

    /// Apply a state machine event. Returns `None` when the event is ignored.
    pub fn transition(&mut self, event: GameEvent) -> Option<Transition> {
        let name = event.name();
        let next = match event {
            GameEvent::TrackingQualityChanged(quality) => self.on_tracking(quality),
            GameEvent::SessionFailed(description) => Some(self.fail(description, false)),
            GameEvent::SessionInterrupted => {
                Some(self.fail(INTERRUPTED_MESSAGE.to_string(), true))
            }
            GameEvent::SessionResumed => self.on_resumed(),
            GameEvent::PlaneDetected(anchor) => self.on_plane(anchor),
            GameEvent::UserStart => self.on_user_start(),
            GameEvent::ObstacleAvoided => match self.phase {
                Phase::Playing { stage, score } => Some(Phase::Playing {
                    stage,
                    score: score.saturating_add(1),
                }),
                _ => None,
            },
            GameEvent::CollidedWithObstacle => match self.phase {
                Phase::Playing { stage, score } => {
                    self.world.set_physics_simulation_running(false);
                    Some(Phase::GameOver { stage, score })
                }
                _ => None,
            },
            GameEvent::ResetRequested => Some(self.reset()),
        };

        match next {
            Some(phase) => Some(self.publish(phase)),
            None => {
                log::debug!("{} ignored in {}", name, self.phase.kind());
                None
            }
        }
    }

    /// Move session time forward by `dt` seconds, firing every due task
    pub fn advance(&mut self, dt: f64) {
        if !dt.is_finite() {
            log::warn!("Ignoring non-finite frame delta {}", dt);
            return;
        }
        let until = self.timers.now() + dt.max(0.0);
        while let Some(task) = self.timers.pop_due(until) {
            self.run_task(task);
        }
        self.timers.set_now(until);
    }

    fn on_tracking(&mut self, quality: TrackingQuality) -> Option<Phase> {
        let kind = self.phase.kind();
        match quality {
            TrackingQuality::Normal => match kind {
                PhaseKind::Initializing | PhaseKind::Limited => Some(Phase::Tracking),
                _ => None,
            },
            TrackingQuality::Limited(reason) => {
                log::warn!("Tracking limited: {}", reason);
                match kind {
                    PhaseKind::Initializing | PhaseKind::Tracking => Some(Phase::Limited),
                    // The stage and run survive a transient degradation
                    _ => None,
                }
            }
            TrackingQuality::NotAvailable => {
                Some(self.fail(NOT_AVAILABLE_MESSAGE.to_string(), false))
            }
        }
    }

    fn on_resumed(&mut self) -> Option<Phase> {
        let resumable = self.interrupted && self.phase.kind() == PhaseKind::Error;
        resumable.then(|| self.reset())
    }

    fn on_plane(&mut self, anchor: PlaneAnchor) -> Option<Phase> {
        // First plane wins
        if self.phase.kind() != PhaseKind::Tracking {
            return None;
        }
        match self.world.instantiate_stage_at(anchor.center, self.heading) {
            Ok(stage) => {
                log::info!(
                    "Stage {} placed on plane {} at {:?}",
                    stage.node(),
                    anchor.id.0,
                    anchor.center
                );
                Some(Phase::Ready { stage })
            }
            Err(err) => {
                log::error!("Stage placement on plane {} failed: {}", anchor.id.0, err);
                self.last_fault = Some(err);
                None
            }
        }
    }

    fn on_user_start(&mut self) -> Option<Phase> {
        let stage = match self.phase {
            Phase::Ready { stage } | Phase::GameOver { stage, .. } => stage,
            _ => return None,
        };
        // Leftovers from the previous round
        for obstacle in self.spawner.drain() {
            self.world.destroy(obstacle.node());
        }
        self.run += 1;
        self.world.set_physics_simulation_running(true);
        self.timers.schedule(
            self.settings.banner_delay_secs,
            ScheduledTask {
                kind: TaskKind::ClearBanner,
                run: self.run,
            },
        );
        Some(Phase::Playing { stage, score: 0 })
    }

    fn on_contact(&mut self, a: &str, b: &str) -> Option<Transition> {
        match resolve_contact(a, b) {
            ContactOutcome::BarrierHit => self.transition(GameEvent::CollidedWithObstacle),
            ContactOutcome::GoalHit { body } => {
                if !self.phase.is_playing() {
                    log::debug!("goal contact with {} outside a round", body);
                    return None;
                }
                let Some(obstacle) = self.spawner.take(&body) else {
                    log::debug!("goal contact with {} which is not a live obstacle", body);
                    return None;
                };
                self.world.destroy(obstacle.node());
                self.transition(GameEvent::ObstacleAvoided)
            }
            ContactOutcome::None => None,
        }
    }

    /// Enter `Error`, releasing any stage
    fn fail(&mut self, message: String, interrupted: bool) -> Phase {
        log::error!("Session fault: {}", message);
        self.teardown_stage();
        self.interrupted = interrupted;
        Phase::Error { message }
    }

    /// Back to `Initializing` with an empty world and anchor set
    fn reset(&mut self) -> Phase {
        self.teardown_stage();
        self.interrupted = false;
        self.anchors.reset();
        self.tracking.reset();
        self.world.restart_plane_detection();
        Phase::Initializing
    }

    /// Destroy the current stage (and its obstacles with it)
    fn teardown_stage(&mut self) {
        let Some(stage) = self.phase.stage() else {
            return;
        };
        if self.phase.is_playing() {
            self.world.set_physics_simulation_running(false);
        }
        let obstacles = self.spawner.drain().len();
        self.world.destroy(stage.node());
        log::info!("Stage {} torn down with {} obstacles", stage.node(), obstacles);
    }

    fn publish(&mut self, next: Phase) -> Transition {
        let from = std::mem::replace(&mut self.phase, next);
        log::info!("Phase {} -> {}", from.kind(), self.phase.kind());

        if let (PhaseKind::Playing, Phase::GameOver { score, .. }) = (from.kind(), &self.phase) {
            let score = *score;
            if let Some(rank) = self.records.add_score(score, self.run, self.timers.now()) {
                log::info!("Run {} scored {} (rank {})", self.run, score, rank);
            }
        }

        self.present(project(&self.phase));
        Transition {
            from,
            to: self.phase.clone(),
        }
    }

    fn is_current_run(&self, task: &ScheduledTask) -> bool {
        self.phase.is_playing() && task.run == self.run
    }

    fn run_task(&mut self, task: ScheduledTask) {
        if !self.is_current_run(&task) {
            log::debug!("Stale {:?} from run {} dropped", task.kind, task.run);
            return;
        }
        let Some(stage) = self.phase.stage() else {
            return;
        };
        match task.kind {
            TaskKind::ClearBanner => {
                self.present(Projection::clear_banner());
                self.timers.schedule(
                    self.settings.spawn_delay_secs,
                    ScheduledTask {
                        kind: TaskKind::SpawnTick,
                        run: task.run,
                    },
                );
            }
            TaskKind::SpawnTick => match self.spawner.spawn_one(&mut self.world, stage) {
                Ok(_) => self.timers.schedule(self.spawner.interval(), task),
                Err(err) => {
                    // Spawning stops for this run; the round itself goes on
                    log::error!("Spawning aborted for run {}: {}", task.run, err);
                    self.last_fault = Some(err);
                }
            },
        }
    }

    fn present(&mut self, projection: Projection) {
        self.hud.apply(&projection);
        self.sink.present(&self.hud);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{LimitedReason, PlaneEvent, RawTrackingState};
    use crate::world::SceneGraph;

    type Session = GameSession<SceneGraph, Vec<Hud>>;

    fn session() -> Session {
        GameSession::new(SceneGraph::new(), Vec::new(), Settings::default()).unwrap()
    }

    fn ready_session() -> Session {
        let mut s = session();
        s.transition(GameEvent::TrackingQualityChanged(TrackingQuality::Normal));
        s.transition(GameEvent::PlaneDetected(PlaneAnchor::new(1, 0.0, -1.0)));
        assert_eq!(s.phase().kind(), PhaseKind::Ready);
        s
    }

    fn playing_session() -> Session {
        let mut s = ready_session();
        s.transition(GameEvent::UserStart);
        s
    }

    #[test]
    fn test_starts_initializing() {
        let s = session();
        assert_eq!(s.phase(), &Phase::Initializing);
        assert_eq!(s.hud().status, "initializing");
        assert_eq!(s.hud().sub, "please wait");
        assert_eq!(s.sink().len(), 1);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            spawn_interval_secs: -1.0,
            ..Default::default()
        };
        assert!(GameSession::new(SceneGraph::new(), (), settings).is_err());
    }

    #[test]
    fn test_full_round_scenario() {
        let mut s = ready_session();
        let stage = s.phase().stage().unwrap();

        let t = s.transition(GameEvent::UserStart).unwrap();
        assert_eq!(t.from, Phase::Ready { stage });
        assert_eq!(t.to, Phase::Playing { stage, score: 0 });
        assert!(s.world().is_physics_running());

        s.transition(GameEvent::ObstacleAvoided);
        assert_eq!(s.phase(), &Phase::Playing { stage, score: 1 });

        s.transition(GameEvent::CollidedWithObstacle);
        assert_eq!(s.phase(), &Phase::GameOver { stage, score: 1 });
        assert!(!s.world().is_physics_running());
        assert_eq!(s.hud().main, "GAME OVER");
        assert_eq!(s.records().top_score(), Some(1));

        s.transition(GameEvent::ResetRequested);
        assert_eq!(s.phase(), &Phase::Initializing);
        assert!(!s.world().contains(stage.node()));
        assert_eq!(s.world().detection_restarts(), 1);
    }

    #[test]
    fn test_restart_resets_score() {
        let mut s = playing_session();
        for _ in 0..3 {
            s.transition(GameEvent::ObstacleAvoided);
        }
        assert_eq!(s.phase().score(), Some(3));
        s.transition(GameEvent::CollidedWithObstacle);
        assert_eq!(s.phase().score(), Some(3));

        s.transition(GameEvent::UserStart);
        assert_eq!(s.phase().kind(), PhaseKind::Playing);
        assert_eq!(s.phase().score(), Some(0));
        assert_eq!(s.current_run(), 2);
    }

    #[test]
    fn test_second_plane_ignored() {
        let mut s = ready_session();
        let before = s.phase().clone();
        assert!(s
            .transition(GameEvent::PlaneDetected(PlaneAnchor::new(2, 3.0, 3.0)))
            .is_none());
        assert_eq!(s.phase(), &before);
        assert_eq!(s.world().stage_count(), 1);
    }

    #[test]
    fn test_plane_ignored_before_tracking() {
        let mut s = session();
        assert!(s
            .transition(GameEvent::PlaneDetected(PlaneAnchor::new(1, 0.0, 0.0)))
            .is_none());
        assert_eq!(s.world().stage_count(), 0);
    }

    #[test]
    fn test_round_events_ignored_outside_playing() {
        let mut s = ready_session();
        assert!(s.transition(GameEvent::ObstacleAvoided).is_none());
        assert!(s.transition(GameEvent::CollidedWithObstacle).is_none());
        assert_eq!(s.phase().kind(), PhaseKind::Ready);

        let mut s = session();
        assert!(s.transition(GameEvent::UserStart).is_none());
    }

    #[test]
    fn test_tracking_quality_transitions() {
        let mut s = session();
        let limited = TrackingQuality::Limited(LimitedReason::ExcessiveMotion);

        s.transition(GameEvent::TrackingQualityChanged(limited));
        assert_eq!(s.phase(), &Phase::Limited);
        assert_eq!(s.hud().status, "limited / low quality");

        s.transition(GameEvent::TrackingQualityChanged(TrackingQuality::Normal));
        assert_eq!(s.phase(), &Phase::Tracking);
        assert_eq!(s.hud().status, "tracking");

        s.transition(GameEvent::TrackingQualityChanged(limited));
        assert_eq!(s.phase(), &Phase::Limited);
    }

    #[test]
    fn test_limited_keeps_round() {
        let mut s = playing_session();
        let before = s.phase().clone();
        let limited = TrackingQuality::Limited(LimitedReason::InsufficientFeatures);
        assert!(s.transition(GameEvent::TrackingQualityChanged(limited)).is_none());
        assert!(s
            .transition(GameEvent::TrackingQualityChanged(TrackingQuality::Normal))
            .is_none());
        assert_eq!(s.phase(), &before);
    }

    #[test]
    fn test_not_available_tears_down_stage() {
        let mut s = playing_session();
        let stage = s.phase().stage().unwrap();
        s.transition(GameEvent::TrackingQualityChanged(
            TrackingQuality::NotAvailable,
        ));
        assert_eq!(
            s.phase(),
            &Phase::Error {
                message: "tracking not available".into()
            }
        );
        assert!(!s.world().contains(stage.node()));
        assert!(!s.world().is_physics_running());
        assert_eq!(s.hud().status, "error: tracking not available");
    }

    #[test]
    fn test_error_is_sticky_until_reset() {
        let mut s = session();
        s.transition(GameEvent::SessionFailed("camera unavailable".into()));
        assert_eq!(s.phase().kind(), PhaseKind::Error);
        assert!(s
            .transition(GameEvent::TrackingQualityChanged(TrackingQuality::Normal))
            .is_none());
        assert!(s.transition(GameEvent::SessionResumed).is_none());
        assert_eq!(s.phase().kind(), PhaseKind::Error);

        s.transition(GameEvent::ResetRequested);
        assert_eq!(s.phase(), &Phase::Initializing);
    }

    #[test]
    fn test_resume_after_interruption_resets() {
        let mut s = ready_session();
        s.transition(GameEvent::SessionInterrupted);
        assert_eq!(
            s.phase(),
            &Phase::Error {
                message: "interrupted".into()
            }
        );
        assert_eq!(s.world().stage_count(), 0);

        let t = s.transition(GameEvent::SessionResumed).unwrap();
        assert_eq!(t.to, Phase::Initializing);
        assert_eq!(s.world().detection_restarts(), 1);
    }

    #[test]
    fn test_failure_named_interrupted_is_not_resumable() {
        let mut s = ready_session();
        s.transition(GameEvent::SessionFailed("interrupted".into()));
        assert!(s.transition(GameEvent::SessionResumed).is_none());
        assert_eq!(
            s.phase(),
            &Phase::Error {
                message: "interrupted".into()
            }
        );
        assert_eq!(s.world().detection_restarts(), 0);
    }

    #[test]
    fn test_fault_after_interruption_is_not_resumable() {
        let mut s = session();
        s.transition(GameEvent::SessionInterrupted);
        s.transition(GameEvent::SessionFailed("camera unavailable".into()));
        assert!(s.transition(GameEvent::SessionResumed).is_none());
        assert_eq!(s.phase().kind(), PhaseKind::Error);
    }

    #[test]
    fn test_huge_camera_heading_is_wrapped() {
        let mut s = session();
        for heading in [1.0e10_f32, -3.0e9] {
            assert!(s.handle(Event::CameraHeading(heading)).is_none());
            assert!((-std::f32::consts::PI..std::f32::consts::PI).contains(&s.heading()));
        }
    }

    #[test]
    fn test_non_finite_frame_delta_ignored() {
        let mut s = playing_session();
        s.advance(2.5);
        assert_eq!(s.world().obstacle_count(), 1);

        s.advance(f64::INFINITY);
        s.advance(f64::NAN);
        s.advance(f64::NEG_INFINITY);
        assert!((s.now() - 2.5).abs() < 1e-9);
        assert_eq!(s.world().obstacle_count(), 1);

        // Clock still runs afterwards
        s.advance(1.0);
        assert_eq!(s.world().obstacle_count(), 2);
    }

    #[test]
    fn test_banner_then_spawns() {
        let mut s = playing_session();
        assert_eq!(s.hud().main, "READY?");

        s.advance(0.99);
        assert_eq!(s.hud().main, "READY?");
        s.advance(0.02);
        assert_eq!(s.hud().main, "");
        assert_eq!(s.hud().sub, "");
        assert_eq!(s.world().obstacle_count(), 0);

        // First spawn one second after the banner clears
        s.advance(1.0);
        assert_eq!(s.world().obstacle_count(), 1);
        s.advance(1.5);
        assert_eq!(s.world().obstacle_count(), 2);
        s.advance(3.0);
        assert_eq!(s.world().obstacle_count(), 4);
        assert_eq!(s.live_obstacles().len(), 4);
    }

    #[test]
    fn test_stale_tick_does_not_spawn() {
        let mut s = playing_session();
        s.advance(2.5);
        assert_eq!(s.world().obstacle_count(), 1);

        // A tick is already queued; leaving the round makes it a no-op
        s.transition(GameEvent::CollidedWithObstacle);
        s.advance(10.0);
        assert_eq!(s.world().obstacle_count(), 1);
    }

    #[test]
    fn test_stale_tick_from_previous_run() {
        let mut s = playing_session();
        s.advance(2.1);
        s.transition(GameEvent::CollidedWithObstacle);
        s.transition(GameEvent::UserStart);
        // Leftover obstacle cleared on restart
        assert_eq!(s.world().obstacle_count(), 0);

        // Run 1 had a tick due at 3.5; run 2 spawns first at 4.1
        s.advance(1.5);
        assert!((s.now() - 3.6).abs() < 1e-9);
        assert_eq!(s.world().obstacle_count(), 0);
        s.advance(0.6);
        assert_eq!(s.world().obstacle_count(), 1);
    }

    #[test]
    fn test_goal_contact_destroys_and_scores() {
        let mut s = playing_session();
        s.advance(2.0);
        let ball = s.live_obstacles()[0].clone();
        assert_eq!(ball.tag, "ball1");

        let t = s
            .handle(Event::Contact {
                a: ball.tag.clone(),
                b: "goal".into(),
            })
            .unwrap();
        assert_eq!(t.to.score(), Some(1));
        assert!(!s.world().contains(ball.handle.node()));
        assert_eq!(s.hud().score, "1");

        // Duplicate report of the same contact
        assert!(s
            .handle(Event::Contact {
                a: "goal".into(),
                b: ball.tag,
            })
            .is_none());
        assert_eq!(s.phase().score(), Some(1));
    }

    #[test]
    fn test_hazard_contact_ends_round() {
        let mut s = playing_session();
        let t = s
            .handle(Event::Contact {
                a: "ng".into(),
                b: "goal".into(),
            })
            .unwrap();
        assert_eq!(t.to.kind(), PhaseKind::GameOver);
    }

    #[test]
    fn test_reset_destroys_all_obstacles() {
        let mut s = playing_session();
        s.advance(6.0);
        let live = s.world().obstacle_count();
        assert!(live > 0);
        let before = s.world().destroyed_obstacles();

        s.transition(GameEvent::ResetRequested);
        assert_eq!(s.world().destroyed_obstacles() - before, live);
        assert_eq!(s.world().obstacle_count(), 0);
        assert_eq!(s.world().stage_count(), 0);
        assert!(s.live_obstacles().is_empty());
    }

    #[test]
    fn test_missing_spawn_anchor_reported() {
        let mut s =
            GameSession::new(SceneGraph::without_spawn_anchor(), (), Settings::default()).unwrap();
        s.transition(GameEvent::TrackingQualityChanged(TrackingQuality::Normal));
        s.transition(GameEvent::PlaneDetected(PlaneAnchor::new(1, 0.0, 0.0)));
        s.transition(GameEvent::UserStart);
        s.advance(5.0);

        assert!(matches!(
            s.last_fault(),
            Some(WorldError::MissingSpawnAnchor { .. })
        ));
        assert_eq!(s.phase().kind(), PhaseKind::Playing);
        assert_eq!(s.world().obstacle_count(), 0);
    }

    #[test]
    fn test_events_through_adapters() {
        let mut s = session();
        let mut queue = EventQueue::new();
        let tx = queue.sender();
        tx.send(Event::Tracking(RawTrackingState::Limited(
            LimitedReason::Initializing,
        )));
        tx.send(Event::Tracking(RawTrackingState::Limited(
            LimitedReason::Initializing,
        )));
        tx.send(Event::Tracking(RawTrackingState::Normal));
        tx.send(Event::CameraHeading(std::f32::consts::PI * 2.5));
        tx.send(Event::Plane(PlaneEvent::Added(PlaneAnchor::new(7, 0.5, -1.0))));
        tx.send(Event::UserStart);

        let applied = s.pump(&mut queue);
        let kinds: Vec<PhaseKind> = applied.iter().map(|t| t.to.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                PhaseKind::Limited,
                PhaseKind::Tracking,
                PhaseKind::Ready,
                PhaseKind::Playing
            ]
        );
        assert!((s.heading() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        let stage = s.phase().stage().unwrap();
        let node = s.world().node(stage.node()).unwrap();
        assert_eq!(node.heading, s.heading());
        assert_eq!(node.position.x, 0.5);
    }

    #[test]
    fn test_reset_restarts_anchor_feed() {
        let mut s = session();
        s.handle(Event::Tracking(RawTrackingState::Normal));
        s.handle(Event::Plane(PlaneEvent::Added(PlaneAnchor::new(1, 0.0, 0.0))));
        s.handle(Event::ResetRequested);
        assert_eq!(s.phase(), &Phase::Initializing);

        // Tracking adapter forgot its last quality, so Normal is delivered again
        let t = s.handle(Event::Tracking(RawTrackingState::Normal)).unwrap();
        assert_eq!(t.to, Phase::Tracking);
        let t = s
            .handle(Event::Plane(PlaneEvent::Added(PlaneAnchor::new(2, 1.0, 1.0))))
            .unwrap();
        assert_eq!(t.to.kind(), PhaseKind::Ready);
        assert_eq!(s.world().stage_count(), 1);
    }
}
