use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Arena;
use crate::direction::Direction;

/// Arena position in pixel units, aligned to the cell size.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns this position moved one cell in `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction, cell_size: i32) -> Self {
        match direction {
            Direction::Up => Self {
                x: self.x,
                y: self.y - cell_size,
            },
            Direction::Down => Self {
                x: self.x,
                y: self.y + cell_size,
            },
            Direction::Left => Self {
                x: self.x - cell_size,
                y: self.y,
            },
            Direction::Right => Self {
                x: self.x + cell_size,
                y: self.y,
            },
        }
    }

    /// Returns true when both positions are one cell apart along exactly one axis.
    #[must_use]
    pub fn is_adjacent(self, other: Self, cell_size: i32) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        (dx == cell_size && dy == 0) || (dx == 0 && dy == cell_size)
    }
}

/// Reasons an explicit body cannot form a snake.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SnakeError {
    #[error("snake needs at least 2 segments, got {0}")]
    TooShort(usize),
    #[error("segment {index} at ({x}, {y}) is not aligned to the cell grid")]
    Misaligned { index: usize, x: i32, y: i32 },
    #[error("segments {index} and {next} are not one cell apart on a single axis")]
    NotAdjacent { index: usize, next: usize },
    #[error("segment {index} overlaps an earlier segment")]
    Overlapping { index: usize },
    #[error("segment {index} at ({x}, {y}) lies outside the playable interior")]
    OutsideInterior { index: usize, x: i32, y: i32 },
}

/// Snake body, head first.
///
/// Values are never mutated in place by the simulation: movement and growth
/// return a new snake.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Creates a snake from `segments`, checking it fits `arena`.
    pub fn new(segments: Vec<Position>, arena: &Arena) -> Result<Self, SnakeError> {
        if segments.len() < 2 {
            return Err(SnakeError::TooShort(segments.len()));
        }

        let mut seen = HashSet::with_capacity(segments.len());
        for (index, segment) in segments.iter().enumerate() {
            if !arena.is_aligned(*segment) {
                return Err(SnakeError::Misaligned {
                    index,
                    x: segment.x,
                    y: segment.y,
                });
            }
            if !arena.in_interior(*segment) {
                return Err(SnakeError::OutsideInterior {
                    index,
                    x: segment.x,
                    y: segment.y,
                });
            }
            if !seen.insert(*segment) {
                return Err(SnakeError::Overlapping { index });
            }
        }

        for (index, pair) in segments.windows(2).enumerate() {
            if !pair[0].is_adjacent(pair[1], arena.cell_size) {
                return Err(SnakeError::NotAdjacent {
                    index,
                    next: index + 1,
                });
            }
        }

        Ok(Self::from_segments(segments))
    }

    /// Creates a snake from explicit body segments (front is head) without checks.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>) -> Self {
        debug_assert!(segments.len() >= 2);
        Self {
            body: VecDeque::from(segments),
        }
    }

    /// Returns a snake shifted one cell towards `direction`, keeping its length.
    #[must_use]
    pub fn moved(&self, direction: Direction, cell_size: i32) -> Self {
        let mut body = self.body.clone();
        body.push_front(self.head().stepped(direction, cell_size));
        let _ = body.pop_back();
        Self { body }
    }

    /// Returns a snake one segment longer, with `eaten` pushed on the front.
    ///
    /// Called on the already moved snake, so the eaten cell ends up twice at
    /// the front until the duplicate works its way out at the tail.
    #[must_use]
    pub fn grown(&self, eaten: Position) -> Self {
        let mut body = self.body.clone();
        body.push_front(eaten);
        Self { body }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least two segments")
    }

    /// Returns the segment directly behind the head.
    #[must_use]
    pub fn neck(&self) -> Position {
        *self
            .body
            .get(1)
            .expect("snake body must always contain at least two segments")
    }

    /// True when head and neck share a column.
    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.head().x == self.neck().x
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if the head lands on a segment past the neck.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(2).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
