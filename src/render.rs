use std::io;

use crate::config::Arena;
use crate::game::{GameState, Outcome};
use crate::snake::Position;

/// What a filled cell represents; sinks pick the colour.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Paint {
    Wall,
    SnakeHead,
    SnakeBody,
    Food,
}

/// One drawing instruction, in arena pixel coordinates.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DrawCommand {
    /// Paints the whole arena, walls included, with the wall colour.
    FillArena,
    /// Blanks the playable interior.
    ClearInterior,
    FillCell { position: Position, paint: Paint },
    /// Draws `message` centered on `at`.
    Text { message: String, at: Position },
}

/// Consumer of drawing plans, applied in order.
pub trait RenderSink {
    fn present(&mut self, plan: &[DrawCommand]) -> io::Result<()>;
}

/// Plan for the very first frame: walls, then the opening state.
#[must_use]
pub fn initial_plan(state: &GameState) -> Vec<DrawCommand> {
    let mut plan = vec![DrawCommand::FillArena];
    plan.extend(frame_plan(state));
    plan
}

/// Plan for a running tick: clear, snake head, body, then food.
#[must_use]
pub fn frame_plan(state: &GameState) -> Vec<DrawCommand> {
    let mut plan = Vec::with_capacity(state.snake.len() + 2);
    plan.push(DrawCommand::ClearInterior);

    for (index, segment) in state.snake.segments().enumerate() {
        let paint = if index == 0 {
            Paint::SnakeHead
        } else {
            Paint::SnakeBody
        };
        plan.push(DrawCommand::FillCell {
            position: *segment,
            paint,
        });
    }

    if let Some(food) = state.food {
        plan.push(DrawCommand::FillCell {
            position: food,
            paint: Paint::Food,
        });
    }

    plan
}

/// Plan shown once a session ends, drawn over the last frame.
#[must_use]
pub fn outcome_plan(outcome: Outcome, arena: &Arena) -> Vec<DrawCommand> {
    vec![DrawCommand::Text {
        message: outcome.message().to_owned(),
        at: arena.center(),
    }]
}

/// Sink that keeps every plan it receives; handy for headless runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub plans: Vec<Vec<DrawCommand>>,
}

impl RenderSink for RecordingSink {
    fn present(&mut self, plan: &[DrawCommand]) -> io::Result<()> {
        self.plans.push(plan.to_vec());
        Ok(())
    }
}
