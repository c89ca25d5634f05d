use log::debug;
use rand::Rng;

use crate::collision::{self, LossCause};
use crate::config::Arena;
use crate::direction::{self, Direction};
use crate::food::FoodSpawner;
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Won,
    Lost(LossCause),
}

impl GameStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Returns the terminal outcome, if the session has ended.
    #[must_use]
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Running => None,
            Self::Won => Some(Outcome::Won),
            Self::Lost(cause) => Some(Outcome::Lost(cause)),
        }
    }
}

/// Terminal signal handed to the render sink when a session ends.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Outcome {
    Won,
    Lost(LossCause),
}

impl Outcome {
    /// Human-readable message shown in the middle of the arena.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Won => "win the game",
            Self::Lost(_) => "lose the game",
        }
    }
}

/// Snapshot of one session. Each tick produces a new value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` once the arena has no free cell left.
    pub food: Option<Position>,
    pub status: GameStatus,
    pub tick_count: u64,
}

impl GameState {
    /// Creates the opening state with freshly spawned food.
    ///
    /// An initial snake that already fills the arena starts as `Won`.
    pub fn new<R: Rng>(snake: Snake, arena: &Arena, spawner: &mut FoodSpawner<R>) -> Self {
        let food = spawner.spawn(&snake, arena);
        let status = if food.is_some() {
            GameStatus::Running
        } else {
            GameStatus::Won
        };

        Self {
            snake,
            food,
            status,
            tick_count: 0,
        }
    }

    /// Advances the simulation by one tick, returning the next state.
    ///
    /// Terminal states are returned unchanged.
    #[must_use]
    pub fn step<R: Rng>(
        &self,
        requested: Option<Direction>,
        arena: &Arena,
        spawner: &mut FoodSpawner<R>,
    ) -> Self {
        if self.status.is_terminal() {
            return self.clone();
        }

        let direction = direction::resolve(&self.snake, requested);
        let mut snake = self.snake.moved(direction, arena.cell_size);
        let mut food = self.food;
        let tick_count = self.tick_count + 1;

        if let Some(eaten) = self.food.filter(|food| *food == snake.head()) {
            food = spawner.spawn(&snake, arena);
            if food.is_none() {
                debug!("tick {tick_count}: ate last food at {eaten:?}, arena full");
                return Self {
                    snake,
                    food,
                    status: GameStatus::Won,
                    tick_count,
                };
            }
            snake = snake.grown(eaten);
        }

        let status = match collision::detect(&snake, arena) {
            Some(cause) => GameStatus::Lost(cause),
            None => GameStatus::Running,
        };
        debug!(
            "tick {tick_count}: moved {direction:?} to {:?}, length {}, {status:?}",
            snake.head(),
            snake.len()
        );

        Self {
            snake,
            food,
            status,
            tick_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use crate::collision::LossCause;
    use crate::config::Arena;
    use crate::direction::Direction;
    use crate::food::FoodSpawner;
    use crate::snake::{Position, Snake};

    use super::{GameState, GameStatus, Outcome};

    fn p(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    fn running(snake: Snake, food: Position) -> GameState {
        GameState {
            snake,
            food: Some(food),
            status: GameStatus::Running,
            tick_count: 0,
        }
    }

    #[test]
    fn snake_grows_after_eating_food() {
        let arena = Arena::default();
        let mut spawner = FoodSpawner::with_seed(1);
        let state = running(
            Snake::from_segments(vec![p(50, 50), p(40, 50), p(30, 50)]),
            p(60, 50),
        );

        let next = state.step(None, &arena, &mut spawner);

        assert_eq!(next.status, GameStatus::Running);
        assert_eq!(next.snake.len(), 4);
        assert_eq!(next.snake.head(), p(60, 50));
        let food = next.food.expect("arena still has room");
        assert!(!next.snake.occupies(food));
        assert_eq!(state.snake.len(), 3, "previous state must be untouched");
    }

    #[test]
    fn reversal_after_eating_while_heading_up_is_ignored() {
        let arena = Arena::default();
        let mut spawner = FoodSpawner::new(StepRng::new(0, 0));
        let state = running(
            Snake::from_segments(vec![
                p(100, 100),
                p(100, 110),
                p(100, 120),
                p(100, 130),
            ]),
            p(100, 90),
        );

        let grown = state.step(None, &arena, &mut spawner);
        assert_eq!(grown.snake.len(), 5);
        assert_eq!(grown.snake.head(), grown.snake.neck());

        let next = grown.step(Some(Direction::Down), &arena, &mut spawner);

        assert_eq!(next.status, GameStatus::Running);
        assert_eq!(next.snake.head(), p(100, 80));
    }

    #[test]
    fn length_is_constant_without_food() {
        let arena = Arena::default();
        let mut spawner = FoodSpawner::with_seed(2);
        let mut state = running(
            Snake::from_segments(vec![p(230, 130), p(230, 140), p(230, 150)]),
            p(10, 10),
        );

        let requests = [
            None,
            Some(Direction::Left),
            None,
            Some(Direction::Up),
            Some(Direction::Right),
        ];
        for requested in requests {
            state = state.step(requested, &arena, &mut spawner);
            assert_eq!(state.status, GameStatus::Running);
            assert_eq!(state.snake.len(), 3);
        }
        assert_eq!(state.tick_count, 5);
    }

    #[test]
    fn snake_collision_with_wall_sets_lost() {
        let arena = Arena::default();
        let mut spawner = FoodSpawner::with_seed(3);
        let state = running(Snake::from_segments(vec![p(10, 50), p(20, 50)]), p(200, 200));

        let next = state.step(None, &arena, &mut spawner);

        assert_eq!(next.status, GameStatus::Lost(LossCause::WallCollision));
        assert_eq!(next.status.outcome(), Some(Outcome::Lost(LossCause::WallCollision)));
    }

    #[test]
    fn snake_collision_with_self_sets_lost() {
        let arena = Arena::default();
        let mut spawner = FoodSpawner::with_seed(4);
        let state = running(
            Snake::from_segments(vec![
                p(50, 50),
                p(60, 50),
                p(60, 60),
                p(50, 60),
                p(40, 60),
                p(40, 50),
            ]),
            p(200, 200),
        );

        let next = state.step(Some(Direction::Down), &arena, &mut spawner);

        assert_eq!(next.snake.head(), p(50, 60));
        assert_eq!(next.status, GameStatus::Lost(LossCause::SelfCollision));
    }

    #[test]
    fn eating_last_free_cell_wins() {
        let arena = Arena {
            width: 40,
            height: 40,
            wall_thickness: 10,
            cell_size: 10,
        };
        let mut spawner = FoodSpawner::new(StepRng::new(0, 0));
        let state = running(
            Snake::from_segments(vec![p(10, 10), p(20, 10), p(20, 20), p(20, 20)]),
            p(10, 20),
        );

        let next = state.step(Some(Direction::Down), &arena, &mut spawner);

        assert_eq!(next.status, GameStatus::Won);
        assert_eq!(next.food, None);
        assert_eq!(next.snake.len(), 4);
        assert_eq!(Outcome::Won.message(), "win the game");
    }

    #[test]
    fn terminal_state_does_not_advance() {
        let arena = Arena::default();
        let mut spawner = FoodSpawner::with_seed(5);
        let mut state = running(Snake::from_segments(vec![p(230, 130), p(230, 140)]), p(10, 10));
        state.status = GameStatus::Lost(LossCause::WallCollision);

        let next = state.step(Some(Direction::Left), &arena, &mut spawner);

        assert_eq!(next, state);
        assert_eq!(Outcome::Lost(LossCause::SelfCollision).message(), "lose the game");
    }

    #[test]
    fn opening_state_on_full_arena_is_won() {
        let arena = Arena {
            width: 30,
            height: 40,
            wall_thickness: 10,
            cell_size: 10,
        };
        let mut spawner = FoodSpawner::with_seed(6);

        let snake = Snake::from_segments(vec![p(10, 10), p(10, 20)]);
        let state = GameState::new(snake, &arena, &mut spawner);

        assert_eq!(state.status, GameStatus::Won);
    }
}
