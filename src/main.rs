//! Lane Hopper headless runner
//!
//! Drives the simulation with a fixed-step loop and a simple autopilot, then
//! prints the final snapshot and the leaderboard as JSON.
//!
//! Usage: `lane-hopper [settings.json|-] [seed]`

use lane_hopper::sim::{FixedStep, GameEvent, GameState, InputSource, TickInput, tick};
use lane_hopper::{ConfigError, Settings};

const DEFAULT_SEED: u64 = 0x1a4e_4077;

/// Simulated wall-clock seconds to run
const SESSION_SECS: f32 = 120.0;

/// Alternating frame times, to exercise the accumulator like a real frame clock
const FRAME_TIMES: [f32; 2] = [0.012, 0.021];

/// Hops up whenever the next lane looks clear, backs off when its own lane is threatened
struct Autopilot<'a> {
    state: &'a GameState,
}

impl<'a> Autopilot<'a> {
    fn new(state: &'a GameState) -> Self {
        Self { state }
    }

    /// No obstacle within a few cells of the player in the lane `rows` away
    fn lane_clear(&self, rows: f32) -> bool {
        let grid = self.state.settings.grid_size;
        let player = &self.state.player;
        let lane_y = player.ground_pos.y + rows * grid;
        let reach = grid * 4.0;
        let left = player.body.pos.x - reach;
        let right = player.body.pos.x + player.body.size.x + reach;

        !self.state.obstacles.iter().any(|o| {
            (o.body.pos.y - lane_y).abs() < grid * 0.5
                && o.body.pos.x < right
                && o.body.pos.x + o.body.size.x > left
        })
    }
}

impl InputSource for Autopilot<'_> {
    fn move_up(&self) -> bool {
        !self.state.is_over() && self.lane_clear(-1.0)
    }

    fn move_down(&self) -> bool {
        !self.state.is_over() && !self.move_up() && !self.lane_clear(0.0) && self.lane_clear(1.0)
    }

    fn move_left(&self) -> bool {
        false
    }

    fn move_right(&self) -> bool {
        false
    }

    fn fire_primary(&self) -> bool {
        self.state.is_over()
    }

    fn fire_secondary(&self) -> bool {
        false
    }
}

fn main() {
    env_logger::init();
    log::info!("Lane Hopper (headless) starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ConfigError> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) if path != "-" => Settings::load(&path)?,
        _ => Settings::default(),
    };
    let seed = match args.next() {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Parse(format!("invalid seed: {raw}")))?,
        None => DEFAULT_SEED,
    };

    let mut state = GameState::new(settings, seed)?;
    let mut clock = FixedStep::default();
    let mut elapsed = 0.0;
    let mut frame = 0usize;

    while elapsed < SESSION_SECS {
        let frame_dt = FRAME_TIMES[frame % FRAME_TIMES.len()];
        frame += 1;
        elapsed += frame_dt;

        for _ in 0..clock.advance(frame_dt) {
            let input = TickInput::sample(&Autopilot::new(&state));
            tick(&mut state, &input, clock.step);

            for event in state.drain_events() {
                match event {
                    GameEvent::GameOver { cause, score } => {
                        println!("run over: {cause:?} with score {score}");
                    }
                    GameEvent::ScoreChanged { .. } => {}
                    other => log::debug!("{other:?}"),
                }
            }
        }
    }

    log::info!("Simulated {} ticks over {frame} frames", state.time_ticks);
    println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
    println!("{}", state.high_scores.to_json()?);
    Ok(())
}
