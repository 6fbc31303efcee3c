use std::collections::HashSet;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::config::GameConfig;
use super::snake::{MoveOutcome, Snake};
use super::vector::Vector2;

/// What a crashed snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// Its own body
    SelfBite,
    /// Any segment of the snake with this index, head included
    HitSnake(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    /// Index of the crashed snake
    pub snake: usize,
    /// Where its head ended up
    pub position: Vector2,
    pub kind: CollisionKind,
}

/// Everything that changed during one tick, for the renderer and the loop
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// One entry per snake, in field order
    pub moves: Vec<MoveOutcome>,
    /// Food cells taken off the field this tick
    pub eaten: Vec<Vector2>,
    /// Replacement for each eaten food, `None` when the grid was full
    pub spawned: Vec<Option<Vector2>>,
    pub collisions: Vec<Collision>,
}

impl TickReport {
    /// Whether the game goes on after this tick
    pub fn continues(&self) -> bool {
        self.collisions.is_empty()
    }

    pub fn collision_positions(&self) -> impl Iterator<Item = Vector2> + '_ {
        self.collisions.iter().map(|c| c.position)
    }
}

/// Holds the foods and snakes of a round and deals with the interactions
/// among them.
pub struct Field {
    width: usize,
    height: usize,
    foods: HashSet<Vector2>,
    snakes: Vec<Snake>,
    rng: StdRng,
}

impl Field {
    /// Create a field with the snakes of a fresh round and no food.
    ///
    /// Food placement is seeded from the config when it carries a seed.
    pub fn new(config: &GameConfig) -> Self {
        let bounds = config.bounds();
        let snakes = config
            .spawns()
            .into_iter()
            .map(|spawn| {
                Snake::new(
                    spawn.position,
                    spawn.direction,
                    config.initial_snake_length,
                    config.food_increase,
                    bounds,
                    spawn.color,
                )
            })
            .collect();

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self::with_rng(config.grid_width, config.grid_height, snakes, rng)
    }

    /// Create a field from prepared snakes and a given random source
    pub fn with_rng(width: usize, height: usize, snakes: Vec<Snake>, rng: StdRng) -> Self {
        Self {
            width,
            height,
            foods: HashSet::new(),
            snakes,
            rng,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> Vector2 {
        Vector2::new(self.width as i32, self.height as i32)
    }

    pub fn foods(&self) -> &HashSet<Vector2> {
        &self.foods
    }

    pub fn has_food(&self, p: Vector2) -> bool {
        self.foods.contains(&p)
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake(&self, index: usize) -> Option<&Snake> {
        self.snakes.get(index)
    }

    pub fn snake_mut(&mut self, index: usize) -> Option<&mut Snake> {
        self.snakes.get_mut(index)
    }

    /// Check if a position is part of any snake
    pub fn is_occupied(&self, p: Vector2) -> bool {
        self.snakes.iter().any(|snake| snake.contains(p))
    }

    /// All cells holding neither food nor a snake segment, column by column
    pub fn empty_positions(&self) -> Vec<Vector2> {
        let occupied: HashSet<Vector2> = self.snakes.iter().flat_map(|s| s.body()).collect();
        let mut empty = Vec::new();
        for x in 0..self.width as i32 {
            for y in 0..self.height as i32 {
                let p = Vector2::new(x, y);
                if !occupied.contains(&p) && !self.foods.contains(&p) {
                    empty.push(p);
                }
            }
        }
        empty
    }

    /// Put one food on a random empty cell.
    ///
    /// Returns `None` when there is no room left; the game just goes on
    /// with fewer foods.
    pub fn spawn_food(&mut self) -> Option<Vector2> {
        let empty = self.empty_positions();
        let Some(&food) = empty.choose(&mut self.rng) else {
            debug!("no room left to spawn food");
            return None;
        };
        self.foods.insert(food);
        Some(food)
    }

    /// True if the head of snake `index` lies on any other snake's body
    pub fn snake_collided_with_any_other_snake(&self, index: usize) -> bool {
        self.snake_hit_by(index).is_some()
    }

    fn snake_hit_by(&self, index: usize) -> Option<usize> {
        let head = self.snakes.get(index)?.head();
        self.snakes
            .iter()
            .enumerate()
            .find(|(other, snake)| *other != index && snake.contains(head))
            .map(|(other, _)| other)
    }

    fn collision_of(&self, index: usize) -> Option<Collision> {
        let snake = &self.snakes[index];
        let kind = if snake.collided_with_self() {
            CollisionKind::SelfBite
        } else {
            CollisionKind::HitSnake(self.snake_hit_by(index)?)
        };
        Some(Collision {
            snake: index,
            position: snake.head(),
            kind,
        })
    }

    /// Run one tick.
    ///
    /// Every snake moves before any collision is looked at, so all checks see
    /// the same post-move field. Snakes that crashed do not eat: a food under
    /// a crashed head stays where it is.
    pub fn advance_tick(&mut self) -> TickReport {
        let moves: Vec<MoveOutcome> = self
            .snakes
            .iter_mut()
            .map(|snake| snake.move_snake(&self.foods))
            .collect();

        let collisions: Vec<Collision> = (0..self.snakes.len())
            .filter_map(|index| self.collision_of(index))
            .collect();

        let mut eaten = Vec::new();
        let mut spawned = Vec::new();
        for index in 0..self.snakes.len() {
            if collisions.iter().any(|c| c.snake == index) {
                continue;
            }
            let head = self.snakes[index].head();
            if self.foods.remove(&head) {
                eaten.push(head);
                spawned.push(self.spawn_food());
            }
        }

        TickReport {
            moves,
            eaten,
            spawned,
            collisions,
        }
    }
}
