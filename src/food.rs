use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Arena;
use crate::snake::{Position, Snake};

/// Places food on free interior cells using an injected random source.
#[derive(Debug, Clone)]
pub struct FoodSpawner<R> {
    rng: R,
}

impl FoodSpawner<StdRng> {
    /// Creates a deterministic spawner for tests and reproducible sessions.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> FoodSpawner<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Picks a free cell uniformly at random, or `None` once the arena is full.
    pub fn spawn(&mut self, snake: &Snake, arena: &Arena) -> Option<Position> {
        let candidates = free_cells(snake, arena);
        if candidates.is_empty() {
            debug!("no free cell left for food");
            return None;
        }

        let index = self.rng.gen_range(0..candidates.len());
        Some(candidates[index])
    }
}

/// Collects every interior cell not covered by the snake.
#[must_use]
pub fn free_cells(snake: &Snake, arena: &Arena) -> Vec<Position> {
    arena
        .interior_cells()
        .filter(|cell| !snake.occupies(*cell))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use crate::config::Arena;
    use crate::snake::{Position, Snake};

    use super::{free_cells, FoodSpawner};

    fn p(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    fn two_by_two() -> Arena {
        Arena {
            width: 40,
            height: 40,
            wall_thickness: 10,
            cell_size: 10,
        }
    }

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut spawner = FoodSpawner::with_seed(7);
        let snake = Snake::from_segments(vec![p(10, 10), p(20, 10), p(30, 10)]);
        let arena = Arena {
            width: 100,
            height: 80,
            wall_thickness: 10,
            cell_size: 10,
        };

        for _ in 0..100 {
            let food = spawner.spawn(&snake, &arena).expect("board has free cells");
            assert!(!snake.occupies(food));
            assert!(arena.in_interior(food));
        }
    }

    #[test]
    fn candidates_include_last_column_and_row() {
        let snake = Snake::from_segments(vec![p(10, 10), p(10, 20)]);

        let cells = free_cells(&snake, &two_by_two());

        assert_eq!(cells, vec![p(20, 10), p(20, 20)]);
    }

    #[test]
    fn mocked_rng_picks_first_candidate() {
        let mut spawner = FoodSpawner::new(StepRng::new(0, 0));
        let snake = Snake::from_segments(vec![p(10, 10), p(10, 20)]);

        assert_eq!(spawner.spawn(&snake, &two_by_two()), Some(p(20, 10)));
    }

    #[test]
    fn full_board_yields_none() {
        let mut spawner = FoodSpawner::with_seed(1);
        let snake = Snake::from_segments(vec![p(10, 10), p(20, 10), p(20, 20), p(10, 20)]);

        assert_eq!(spawner.spawn(&snake, &two_by_two()), None);
    }

    #[test]
    fn same_seed_gives_same_food() {
        let snake = Snake::from_segments(vec![p(230, 130), p(230, 140)]);
        let arena = Arena::default();

        let first = FoodSpawner::with_seed(42).spawn(&snake, &arena);
        let second = FoodSpawner::with_seed(42).spawn(&snake, &arena);

        assert_eq!(first, second);
    }
}
