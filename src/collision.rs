use crate::config::Arena;
use crate::snake::{Position, Snake};

/// Why a session was lost.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LossCause {
    WallCollision,
    SelfCollision,
}

/// Returns true when `head` has left the playable interior.
#[must_use]
pub fn hits_wall(head: Position, arena: &Arena) -> bool {
    head.x < arena.wall_thickness
        || head.x > arena.width - arena.wall_thickness - arena.cell_size
        || head.y < arena.wall_thickness
        || head.y > arena.height - arena.wall_thickness - arena.cell_size
}

/// Reports the collision the snake is in, if any. Wall hits win over self hits.
#[must_use]
pub fn detect(snake: &Snake, arena: &Arena) -> Option<LossCause> {
    if hits_wall(snake.head(), arena) {
        return Some(LossCause::WallCollision);
    }

    if snake.head_overlaps_body() {
        return Some(LossCause::SelfCollision);
    }

    None
}

#[must_use]
pub fn is_dead(snake: &Snake, arena: &Arena) -> bool {
    detect(snake, arena).is_some()
}
