use std::collections::{HashSet, VecDeque};

use super::action::Direction;
use super::config::SnakeColor;
use super::vector::Vector2;

/// What happened to a snake during one move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// New head position
    pub head: Vector2,
    /// Whether the new head landed on food
    pub ate_food: bool,
    /// Cell the tail left, if the snake did not grow this tick
    pub tail_freed: Option<Vector2>,
}

/// A snake on the field.
///
/// The body is a deque with the head at the front, so moving is a push at
/// the front and (unless growing) a pop at the back.
///
/// Turns are queued so that more than one can be entered between two ticks:
/// heading up, a player can press left then down before the next move, and
/// both turns are played out on consecutive ticks instead of the second one
/// being rejected as a reversal or overwriting the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Vector2>,
    /// Pending turns; the front is the current heading, never empty
    direction_queue: VecDeque<Direction>,
    /// Ticks left during which the tail stays in place
    grow_counter: i32,
    /// Added to the grow counter for each food eaten
    grow_rate: i32,
    wrap_limits: Vector2,
    color: SnakeColor,
}

impl Snake {
    /// Create a snake made of its head only.
    ///
    /// It unfolds to `initial_length` over the first ticks by holding its
    /// tail in place.
    pub fn new(
        head: Vector2,
        direction: Direction,
        initial_length: usize,
        grow_rate: i32,
        wrap_limits: Vector2,
        color: SnakeColor,
    ) -> Self {
        let initial_length = i32::try_from(initial_length).unwrap_or(i32::MAX);
        Self {
            body: VecDeque::from([head]),
            direction_queue: VecDeque::from([direction]),
            grow_counter: initial_length.saturating_sub(1),
            grow_rate,
            wrap_limits,
            color,
        }
    }

    /// Queue a turn, unless it reverses the last queued direction.
    ///
    /// Returns whether the turn was queued.
    pub fn queue_direction(&mut self, direction: Direction) -> bool {
        let last = self.last_queued();
        if direction.is_opposite(last) {
            return false;
        }
        self.direction_queue.push_back(direction);
        true
    }

    /// Advance the turn queue and return the heading for this tick.
    ///
    /// The last remaining direction is kept as the heading until a new turn
    /// is queued.
    pub fn pop_direction(&mut self) -> Direction {
        if self.direction_queue.len() > 1 {
            self.direction_queue.pop_front();
        }
        self.direction()
    }

    /// Move one cell, growing if a pending growth budget remains.
    ///
    /// Landing on one of `foods` adds to the budget; taking the food off the
    /// field is up to the caller.
    pub fn move_snake(&mut self, foods: &HashSet<Vector2>) -> MoveOutcome {
        let direction = self.pop_direction();
        let new_head = (self.head() + direction.delta()).wrap(self.wrap_limits);
        self.body.push_front(new_head);

        let ate_food = foods.contains(&new_head);
        if ate_food {
            self.grow_counter = self.grow_counter.saturating_add(self.grow_rate);
        }

        let tail_freed = if self.grow_counter > 0 {
            self.grow_counter -= 1;
            None
        } else {
            self.body.pop_back()
        };

        MoveOutcome {
            head: new_head,
            ate_food,
            tail_freed,
        }
    }

    /// True if the head sits on any other segment of this snake
    pub fn collided_with_self(&self) -> bool {
        let head = self.head();
        self.body_minus_head().any(|p| p == head)
    }

    pub fn head(&self) -> Vector2 {
        // body is never empty: created with a head, every pop follows a push
        self.body[0]
    }

    pub fn tail(&self) -> Vector2 {
        self.body[self.body.len() - 1]
    }

    /// Segments from head to tail
    pub fn body(&self) -> impl Iterator<Item = Vector2> + '_ {
        self.body.iter().copied()
    }

    /// Segments from the one behind the head to the tail
    pub fn body_minus_head(&self) -> impl Iterator<Item = Vector2> + '_ {
        self.body.iter().skip(1).copied()
    }

    pub fn contains(&self, p: Vector2) -> bool {
        self.body.contains(&p)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true: a snake always has its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Heading used for the most recent move
    pub fn direction(&self) -> Direction {
        self.direction_queue[0]
    }

    fn last_queued(&self) -> Direction {
        self.direction_queue[self.direction_queue.len() - 1]
    }

    /// Turns queued but not yet played
    pub fn pending_turns(&self) -> usize {
        self.direction_queue.len() - 1
    }

    pub fn grow_counter(&self) -> i32 {
        self.grow_counter
    }

    pub fn color(&self) -> SnakeColor {
        self.color
    }
}
