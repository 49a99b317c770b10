//! Game state and session control
//!
//! `GameState` owns every entity collection, the camera, the effect queue,
//! the score and the RNG. Nothing here is global.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::effects::{EffectQueue, ScoreTracker};
use super::entity::{DeathCause, Obstacle, Player, PowerUp, PowerUpKind};
use crate::error::ConfigError;
use crate::highscores::{HighScores, RunRecord};
use crate::settings::Settings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Time is frozen
    Paused,
    /// Run ended; waiting for restart
    GameOver,
}

/// Session events for the surrounding application
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameOver { cause: DeathCause, score: i64 },
    ScoreChanged { total: i64 },
    Reset,
    PowerUpCollected { kind: PowerUpKind },
    ShieldBroken,
    PowerUpExpired { kind: PowerUpKind },
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter (not advanced while paused or over)
    pub time_ticks: u64,
    /// Simulation clock in seconds
    pub clock: f64,
    /// Clock value when the current run started
    pub run_started_at: f64,
    pub player: Player,
    /// Active obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    /// Active power-ups (sorted by id)
    pub power_ups: Vec<PowerUp>,
    pub camera: Camera,
    pub score: ScoreTracker,
    pub effects: EffectQueue,
    /// Finished runs this process
    pub high_scores: HighScores,
    /// Highest point reached by the player this run (world y, smaller is higher)
    pub best_y: f32,
    /// fire_primary / fire_secondary on the previous tick, for edge detection
    pub prev_fire: (bool, bool),
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session. Refuses to start on invalid settings.
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        if let Err(err) = settings.validate() {
            log::warn!("Refusing to start session: {err}");
            return Err(err);
        }

        let camera = Camera::new(&settings);
        let player = Player::spawn(1, &settings);
        let best_y = player.ground_pos.y;
        log::info!("Session started (seed {seed})");

        Ok(Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            phase: GamePhase::Playing,
            time_ticks: 0,
            clock: 0.0,
            run_started_at: 0.0,
            player,
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            camera,
            score: ScoreTracker::default(),
            effects: EffectQueue::default(),
            high_scores: HighScores::new(),
            best_y,
            prev_fire: (false, false),
            events: Vec::new(),
            next_id: 2,
            settings,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Raise a session event
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whole rows climbed above the starting row this run
    pub fn rows_advanced(&self) -> u32 {
        let start_y = Player::spawn(0, &self.settings).ground_pos.y;
        ((start_y - self.best_y) / self.settings.grid_size).round().max(0.0) as u32
    }

    /// Move to GameOver and record the run. Called once per death.
    pub fn end_run(&mut self, cause: DeathCause) {
        self.phase = GamePhase::GameOver;
        let score = self.score.total;
        let record = RunRecord {
            score,
            rows_advanced: self.rows_advanced(),
            duration_secs: (self.clock - self.run_started_at) as f32,
            cause,
        };
        if let Some(rank) = self.high_scores.add_run(record) {
            log::info!("New high score #{rank}: {score}");
        }
        log::info!("Game over ({cause:?}), score {score}");
        self.emit(GameEvent::GameOver { cause, score });
    }

    /// Start a fresh run in the same session
    ///
    /// Pending effect expiries are discarded, never fired.
    pub fn restart(&mut self) {
        let id = self.next_entity_id();
        self.player = Player::spawn(id, &self.settings);
        self.best_y = self.player.ground_pos.y;
        self.obstacles.clear();
        self.power_ups.clear();
        self.camera.reset();
        self.effects.clear();
        self.score.reset();
        self.phase = GamePhase::Playing;
        self.run_started_at = self.clock;
        log::info!("Session restarted");
        self.emit(GameEvent::Reset);
        self.emit(GameEvent::ScoreChanged { total: 0 });
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
