use std::io;

use log::info;
use rand::Rng;
use rand::rngs::StdRng;

use crate::config::{Arena, ConfigError, GameConfig};
use crate::direction::Direction;
use crate::food::FoodSpawner;
use crate::game::{GameState, Outcome};
use crate::render::{self, RenderSink};
use crate::snake::Snake;

/// Single-slot holder for the most recent direction request.
///
/// Requests arriving between pulses overwrite each other; the slot keeps its
/// value across pulses until a newer request replaces it.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DirectionLatch {
    latest: Option<Direction>,
}

impl DirectionLatch {
    pub fn offer(&mut self, direction: Direction) {
        self.latest = Some(direction);
    }

    #[must_use]
    pub fn latest(&self) -> Option<Direction> {
        self.latest
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}

/// What a pulse produced.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickEvent {
    /// The session is still running and a new frame was drawn.
    Frame,
    /// The session ended; the outcome message was drawn.
    Finished(Outcome),
}

/// Owns the current state and runs one simulation step per clock pulse.
#[derive(Debug)]
pub struct GameLoop<R> {
    arena: Arena,
    initial_snake: Snake,
    spawner: FoodSpawner<R>,
    state: GameState,
    requests: DirectionLatch,
    finished: bool,
}

impl GameLoop<StdRng> {
    /// Builds a loop from validated configuration, seeding food when asked.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = match config.seed {
            Some(seed) => FoodSpawner::with_seed(seed),
            None => FoodSpawner::from_entropy(),
        };
        Ok(Self::new(config.initial_snake()?, config.arena(), spawner))
    }
}

impl<R: Rng> GameLoop<R> {
    #[must_use]
    pub fn new(initial_snake: Snake, arena: Arena, mut spawner: FoodSpawner<R>) -> Self {
        let state = GameState::new(initial_snake.clone(), &arena, &mut spawner);

        Self {
            arena,
            initial_snake,
            spawner,
            state,
            requests: DirectionLatch::default(),
            finished: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Records a direction request for the next pulse.
    pub fn request(&mut self, direction: Direction) {
        self.requests.offer(direction);
    }

    /// Draws the opening frame. Reports the outcome if the arena starts full.
    pub fn start<S: RenderSink>(&mut self, sink: &mut S) -> io::Result<Option<Outcome>> {
        info!(
            "session started: {}x{} arena, snake length {}",
            self.arena.width,
            self.arena.height,
            self.state.snake.len()
        );
        sink.present(&render::initial_plan(&self.state))?;

        match self.state.status.outcome() {
            Some(outcome) => {
                self.finish(outcome, sink)?;
                Ok(Some(outcome))
            }
            None => Ok(None),
        }
    }

    /// Runs one simulation step and hands the result to `sink`.
    ///
    /// Returns `Ok(None)` without doing anything once the session has ended.
    pub fn on_pulse<S: RenderSink>(&mut self, sink: &mut S) -> io::Result<Option<TickEvent>> {
        if self.finished {
            return Ok(None);
        }

        let next = self
            .state
            .step(self.requests.latest(), &self.arena, &mut self.spawner);
        self.state = next;

        match self.state.status.outcome() {
            Some(outcome) => {
                self.finish(outcome, sink)?;
                Ok(Some(TickEvent::Finished(outcome)))
            }
            None => {
                sink.present(&render::frame_plan(&self.state))?;
                Ok(Some(TickEvent::Frame))
            }
        }
    }

    /// Throws the session away and starts again from the initial snake.
    pub fn restart<S: RenderSink>(&mut self, sink: &mut S) -> io::Result<Option<Outcome>> {
        info!("restarting session");
        self.state = GameState::new(self.initial_snake.clone(), &self.arena, &mut self.spawner);
        self.requests.clear();
        self.finished = false;
        self.start(sink)
    }

    fn finish<S: RenderSink>(&mut self, outcome: Outcome, sink: &mut S) -> io::Result<()> {
        self.finished = true;
        info!(
            "session over after {} ticks: {outcome:?}, snake length {}",
            self.state.tick_count,
            self.state.snake.len()
        );
        sink.present(&render::outcome_plan(outcome, &self.arena))
    }
}
