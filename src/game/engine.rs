use log::{debug, info, warn};

use super::{
    action::Direction,
    config::{ConfigError, GameConfig},
    field::{Field, TickReport},
};

/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No round has been started yet
    Idle,
    /// Ticks advance the field
    Running,
    /// A snake crashed or the round was stopped; only a new game leaves this
    GameOver,
}

/// The game engine: owns the round's field and drives it through
/// `Idle -> Running -> GameOver -> Running ...`.
///
/// It knows nothing about time or keys; a front end calls `advance` once
/// per tick and feeds turns through `queue_direction`.
pub struct GameEngine {
    config: GameConfig,
    phase: Phase,
    field: Option<Field>,
    last_report: Option<TickReport>,
    round: u32,
    ticks: u64,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Idle,
            field: None,
            last_report: None,
            round: 0,
            ticks: 0,
        })
    }

    /// Throw away the current round and start a fresh one
    pub fn new_game(&mut self) {
        let mut field = Field::new(&self.config);
        let spawned = (0..self.config.food_count)
            .map_while(|_| field.spawn_food())
            .count();
        if spawned < self.config.food_count {
            warn!(
                "only {} of {} foods fit on the grid",
                spawned, self.config.food_count
            );
        }

        self.field = Some(field);
        self.last_report = None;
        self.ticks = 0;
        self.round += 1;
        self.phase = Phase::Running;
        info!(
            "round {} started: {}x{} grid, {} snakes, {} foods",
            self.round,
            self.config.grid_width,
            self.config.grid_height,
            self.field.as_ref().map_or(0, |f| f.snakes().len()),
            spawned
        );
    }

    /// End the running round without a collision.
    ///
    /// Returns false if there was no running round.
    pub fn stop_game(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::GameOver;
        info!("round {} stopped after {} ticks", self.round, self.ticks);
        true
    }

    /// Queue a turn for a player's snake.
    ///
    /// Turns are only taken while a round is running. Returns whether the
    /// turn was queued.
    pub fn queue_direction(&mut self, player: usize, direction: Direction) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(snake) = self.field.as_mut().and_then(|f| f.snake_mut(player)) else {
            warn!("turn for unknown player {}", player);
            return false;
        };
        let queued = snake.queue_direction(direction);
        if !queued {
            debug!("player {} cannot reverse into {:?}", player, direction);
        }
        queued
    }

    /// Execute one tick of the running round
    pub fn advance(&mut self) -> Option<&TickReport> {
        if self.phase != Phase::Running {
            return None;
        }
        let report = self.field.as_mut()?.advance_tick();
        self.ticks += 1;

        for food in &report.eaten {
            debug!("tick {}: food eaten at {}", self.ticks, food);
        }

        if !report.continues() {
            self.phase = Phase::GameOver;
            for collision in &report.collisions {
                info!(
                    "tick {}: snake {} crashed at {} ({:?})",
                    self.ticks, collision.snake, collision.position, collision.kind
                );
            }
            info!("round {} over after {} ticks", self.round, self.ticks);
        }

        self.last_report = Some(report);
        self.last_report.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// The current (or last finished) round's field
    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    /// Number of rounds started so far
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Ticks played in the current round
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
