//! Game flow: lives, timers, pause, game over, and the per-frame pipeline.
//!
//! Each [`GameSession::tick`] runs, in order: scheduled actions, timers,
//! the pause/game-over gate, flight control, the physics step, the boundary
//! clamp, hazard checks, mission triggers, and HUD/minimap output.

use courier_core::{horizontal, Countdown, Lives, Pose, Quat, Scheduler, Vec2, Vec3};
use input::InputState;
use physics::{DroneBody, FlightWorld};

use crate::boundary::BoundaryGuard;
use crate::config::{ArenaConfig, GameConfig, RulesConfig};
use crate::flight::{CameraBasis, FlightController, VisualTilt};
use crate::hud::{GameEvent, GameOverDisplay, GameOverReason, HudSnapshot};
use crate::minimap::{MinimapFrame, MinimapProjection};
use crate::mission::{MissionDefinition, MissionProgress, MissionStateMachine, Stage};
use crate::score::{ScoreEntry, ScoreStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Normal,
    /// Mission timer ran out with lives left; waiting for confirm.
    PausedForTimeout,
    /// Waiting for restart.
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub lives: Lives,
    pub invincibility: Countdown,
    pub mission_timer: Countdown,
    pub mission_index: usize,
    pub score: u32,
    /// A delivery happened and the next mission's setup is queued.
    pub is_mission_transitioning: bool,
    pub nickname: String,
    score_submitted: bool,
}

impl GameState {
    fn new(rules: &RulesConfig, nickname: String) -> Self {
        Self {
            phase: GamePhase::Normal,
            lives: Lives::new(rules.starting_lives),
            invincibility: Countdown::default(),
            mission_timer: Countdown::new(rules.mission_time_limit),
            mission_index: 0,
            score: 0,
            is_mission_transitioning: false,
            nickname,
            score_submitted: false,
        }
    }

    pub fn score_submitted(&self) -> bool {
        self.score_submitted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredAction {
    SetupMission { index: usize },
}

/// Output of one tick.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub hud: HudSnapshot,
    pub minimap: MinimapFrame,
    pub events: Vec<GameEvent>,
    /// Drone model orientation including the cosmetic lean.
    pub model_rotation: Quat,
}

pub struct GameSession<S: ScoreStore> {
    rules: RulesConfig,
    arena: ArenaConfig,
    top_n: usize,
    flight: FlightController,
    boundary: BoundaryGuard,
    missions: MissionStateMachine,
    state: GameState,
    scheduler: Scheduler<DeferredAction>,
    store: S,
    tilt: VisualTilt,
    minimap: MinimapProjection,
    obstacle_markers: Vec<Vec2>,
    game_over_display: Option<GameOverDisplay>,
    events: Vec<GameEvent>,
    last_pose: Pose,
}

impl<S: ScoreStore> GameSession<S> {
    /// New game on mission 0. The drone is expected at the respawn point.
    pub fn new(config: &GameConfig, missions: Vec<MissionDefinition>, store: S) -> Self {
        let mut session = Self {
            rules: config.rules.clone(),
            arena: config.arena.clone(),
            top_n: config.leaderboard.top_n,
            flight: FlightController::new(config.flight.clone()),
            boundary: BoundaryGuard::from_config(&config.arena),
            missions: MissionStateMachine::new(missions, config.mission.clone()),
            state: GameState::new(&config.rules, config.nickname.clone()),
            scheduler: Scheduler::new(),
            store,
            tilt: VisualTilt::default(),
            minimap: MinimapProjection::from_config(&config.minimap),
            obstacle_markers: Vec::new(),
            game_over_display: None,
            events: Vec::new(),
            last_pose: Pose::level_at(config.arena.respawn_point),
        };
        session.setup_mission(0);
        session
    }

    /// Project static obstacle positions onto the minimap.
    pub fn set_obstacle_markers(&mut self, positions: impl IntoIterator<Item = Vec3>) {
        self.obstacle_markers = positions
            .into_iter()
            .map(|p| self.minimap.to_pixels(p))
            .collect();
    }

    pub fn obstacle_markers(&self) -> &[Vec2] {
        &self.obstacle_markers
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn missions(&self) -> &MissionStateMachine {
        &self.missions
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pending_actions(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.state.nickname = nickname.into();
    }

    /// Advance the game by `dt` seconds.
    pub fn tick<W: FlightWorld>(
        &mut self,
        dt: f32,
        input: &InputState,
        camera: CameraBasis,
        world: &mut W,
    ) -> FrameReport {
        let dt = dt.max(0.0);

        for action in self.scheduler.advance(dt) {
            self.run_deferred(action);
        }

        match self.state.phase {
            GamePhase::Normal => {
                self.tick_timers(dt);
            }
            GamePhase::PausedForTimeout => {
                if input.confirm_continue {
                    self.resume(world);
                }
                return self.report(world);
            }
            GamePhase::GameOver => {
                if input.restart {
                    self.reset(world);
                }
                return self.report(world);
            }
        }
        if self.state.phase != GamePhase::Normal {
            return self.report(world);
        }

        self.step_gameplay(dt, input, camera, world);
        self.report(world)
    }

    // ── Pipeline stages ─────────────────────────────────────────────────

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::SetupMission { index } => {
                let current =
                    self.state.is_mission_transitioning && index == self.state.mission_index;
                if !current || self.state.phase == GamePhase::GameOver {
                    log::debug!("Ignoring stale setup for mission {}", index + 1);
                    return;
                }
                self.setup_mission(index);
            }
        }
    }

    fn tick_timers(&mut self, dt: f32) {
        self.state.invincibility.tick(dt);

        if self.state.is_mission_transitioning || !self.state.mission_timer.tick(dt) {
            return;
        }

        let lives_left = self.state.lives.lose_one();
        self.state.invincibility.start(self.rules.invincibility_duration);
        self.events.push(GameEvent::TimerExpired { lives_left });
        log::info!("Mission timer expired, {} lives left", lives_left);

        if self.state.lives.is_exhausted() {
            self.enter_game_over(GameOverReason::OutOfLives);
        } else {
            self.state.phase = GamePhase::PausedForTimeout;
            self.events.push(GameEvent::Paused);
        }
    }

    fn step_gameplay<W: FlightWorld>(
        &mut self,
        dt: f32,
        input: &InputState,
        camera: CameraBasis,
        world: &mut W,
    ) {
        {
            let Some(mut drone) = world.drone_mut() else {
                return;
            };
            self.flight.apply(&mut drone, input, camera, self.arena.gravity);
        }

        world.step(dt);

        {
            let Some(mut drone) = world.drone_mut() else {
                return;
            };
            self.boundary.apply(&mut drone);
        }

        if !self.state.invincibility.is_active() {
            let hit = (0..world.hazard_count()).find(|&i| world.drone_intersects_hazard(i));
            if let Some(hazard) = hit {
                self.on_hazard_hit(hazard, world);
                if self.state.phase == GamePhase::GameOver {
                    return;
                }
            }
        }

        let Some((pose, velocity)) = world
            .drone_mut()
            .map(|d| (d.pose(), d.linear_velocity()))
        else {
            return;
        };
        self.tilt.update(self.flight.tuning(), &pose, velocity, dt);

        let delivered = self.state.mission_index;
        match self.missions.update(pose.position) {
            MissionProgress::Unchanged => {}
            MissionProgress::PickedUp => {
                self.events.push(GameEvent::PackagePickedUp { mission: delivered });
            }
            MissionProgress::Delivered { next } => {
                let points = self.delivery_points();
                self.state.score = self.state.score.saturating_add(points);
                self.events.push(GameEvent::PackageDelivered {
                    mission: delivered,
                    points,
                });
                log::info!("Mission {} delivered for {} points", delivered + 1, points);

                match next {
                    Some(index) => {
                        self.state.mission_index = index;
                        self.state.is_mission_transitioning = true;
                        self.scheduler
                            .schedule(self.rules.transition_delay, DeferredAction::SetupMission { index });
                    }
                    None => self.enter_game_over(GameOverReason::MissionsComplete),
                }
            }
        }
    }

    fn delivery_points(&self) -> u32 {
        let whole_seconds = self.state.mission_timer.remaining().floor() as u32;
        self.rules
            .delivery_points
            .saturating_add(self.rules.time_bonus_per_second.saturating_mul(whole_seconds))
    }

    fn on_hazard_hit<W: FlightWorld>(&mut self, hazard: usize, world: &mut W) {
        self.state.invincibility.start(self.rules.invincibility_duration);
        let lives_left = self.state.lives.lose_one();
        log::debug!("Hazard {} hit, {} lives left", hazard, lives_left);
        self.events.push(GameEvent::HazardHit { hazard, lives_left });
        self.respawn(world);

        if self.state.lives.is_exhausted() {
            self.enter_game_over(GameOverReason::OutOfLives);
        }
    }

    // ── Transitions ─────────────────────────────────────────────────────

    fn setup_mission(&mut self, index: usize) {
        self.state.is_mission_transitioning = false;
        match self.missions.setup(index) {
            Ok(()) => {
                self.state.mission_index = index;
                self.state.mission_timer.start(self.rules.mission_time_limit);
                self.events.push(GameEvent::MissionSetUp { index });
            }
            // Already logged by the mission machine: treat as the end of the list.
            Err(_) => self.enter_game_over(GameOverReason::MissionsComplete),
        }
    }

    fn respawn<W: FlightWorld>(&mut self, world: &mut W) {
        if let Some(mut drone) = world.drone_mut() {
            drone.respawn_at(self.arena.respawn_point);
        }
        self.tilt.reset();
        self.events.push(GameEvent::Respawned);
    }

    fn resume<W: FlightWorld>(&mut self, world: &mut W) {
        self.respawn(world);
        self.state.mission_timer.start(self.rules.mission_time_limit);
        self.state.phase = GamePhase::Normal;
        self.events.push(GameEvent::Resumed);
        log::info!("Resumed mission {}", self.state.mission_index + 1);
    }

    fn enter_game_over(&mut self, reason: GameOverReason) {
        if self.state.phase == GamePhase::GameOver {
            return;
        }
        self.state.phase = GamePhase::GameOver;
        self.state.is_mission_transitioning = false;
        self.scheduler.cancel_all();
        log::info!("Game over ({:?}) with score {}", reason, self.state.score);

        self.submit_score();
        self.game_over_display = Some(self.leaderboard_display());
        self.events.push(GameEvent::GameOver {
            reason,
            score: self.state.score,
        });
    }

    fn submit_score(&mut self) {
        if self.state.score_submitted {
            return;
        }
        self.state.score_submitted = true;

        let nickname = self.state.nickname.trim();
        if nickname.is_empty() {
            log::debug!("No nickname set, score {} not submitted", self.state.score);
            return;
        }
        match self.store.submit(ScoreEntry::now(nickname, self.state.score)) {
            Ok(true) => log::debug!("Submitted score {} for {}", self.state.score, nickname),
            Ok(false) => log::debug!("Duplicate score submission ignored"),
            Err(e) => log::warn!("Score submission failed: {}", e),
        }
    }

    fn leaderboard_display(&self) -> GameOverDisplay {
        if self.state.score == 0 {
            return GameOverDisplay::Plain;
        }
        match self.store.top_n(self.top_n) {
            Ok(entries) if !entries.is_empty() => GameOverDisplay::Leaderboard(entries),
            Ok(_) => GameOverDisplay::Plain,
            Err(e) => {
                log::warn!("Leaderboard unavailable: {}", e);
                GameOverDisplay::Plain
            }
        }
    }

    /// Back to mission 0 with full lives and no score.
    fn reset<W: FlightWorld>(&mut self, world: &mut W) {
        self.scheduler.cancel_all();
        self.state.lives = Lives::new(self.rules.starting_lives);
        self.state.score = 0;
        self.state.invincibility.clear();
        self.state.is_mission_transitioning = false;
        self.state.score_submitted = false;
        self.game_over_display = None;
        self.respawn(world);
        self.state.phase = GamePhase::Normal;
        self.setup_mission(0);
        self.events.push(GameEvent::Reset);
        log::info!("Game reset");
    }

    // ── Output ──────────────────────────────────────────────────────────

    fn report<W: FlightWorld>(&mut self, world: &mut W) -> FrameReport {
        let (pose, velocity) = match world.drone_mut() {
            Some(drone) => (drone.pose(), drone.linear_velocity()),
            None => (self.last_pose, Vec3::ZERO),
        };
        self.last_pose = pose;

        let count = self.missions.mission_count();
        // The delivered mission keeps its number until the next one is set up.
        let shown_index = if self.state.is_mission_transitioning {
            self.state.mission_index.saturating_sub(1)
        } else {
            self.state.mission_index
        };
        let hud = HudSnapshot {
            altitude: pose.altitude(),
            speed: horizontal(velocity).length(),
            lives: self.state.lives.current,
            timer: self.state.mission_timer.remaining().max(0.0),
            score: self.state.score,
            objective: self.missions.objective().clone(),
            mission_number: (shown_index + 1).min(count.max(1)),
            mission_count: count,
            timeout_prompt_visible: self.state.phase == GamePhase::PausedForTimeout,
            game_over_visible: self.state.phase == GamePhase::GameOver,
            game_over: self.game_over_display.clone(),
        };

        let target = match self.missions.stage() {
            Stage::Complete => None,
            _ => self.missions.target(),
        };

        FrameReport {
            hud,
            minimap: MinimapFrame::project(&self.minimap, pose.position, target),
            events: std::mem::take(&mut self.events),
            model_rotation: self.tilt.world(&pose),
        }
    }
}
