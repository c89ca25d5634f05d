use serde::{Deserialize, Serialize};

use crate::snake::Snake;

/// Canonical movement directions for the snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Axis a direction travels along.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Direction {
    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }
}

/// Infers the direction the snake is travelling from its head and neck.
///
/// Vertical when head and neck share an x coordinate: `Down` if the head has
/// the larger y, else `Up`. Otherwise horizontal: `Right` if the head has the
/// larger x, else `Left`. A head stacked on its neck (the tick after growth)
/// reads as `Up`.
#[must_use]
pub fn heading(snake: &Snake) -> Direction {
    let head = snake.head();
    let neck = snake.neck();

    if snake.is_vertical() {
        if head.y > neck.y {
            Direction::Down
        } else {
            Direction::Up
        }
    } else if head.x > neck.x {
        Direction::Right
    } else {
        Direction::Left
    }
}

/// Returns whether `requested` turns the snake onto the orthogonal axis.
///
/// Continuing along the heading's axis and 180° reversals are both rejected.
/// A stacked head counts as heading `Up`, so only Left/Right turn it.
#[must_use]
pub fn turn_is_accepted(snake: &Snake, requested: Direction) -> bool {
    requested.axis() != heading(snake).axis()
}

/// Resolves the direction for the next move.
///
/// Falls back to the inferred heading when no request is pending or the
/// request is rejected.
#[must_use]
pub fn resolve(snake: &Snake, requested: Option<Direction>) -> Direction {
    match requested {
        Some(direction) if turn_is_accepted(snake, direction) => direction,
        _ => heading(snake),
    }
}
