use serde::{Deserialize, Serialize};

use super::heading::Heading;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// True if the cell lies on a `width` x `height` grid anchored at (0, 0)
    pub fn is_within(&self, width: usize, height: usize) -> bool {
        self.x >= 0
            && (self.x as i64) < width as i64
            && self.y >= 0
            && (self.y as i64) < height as i64
    }

    /// Move position one cell along a heading
    pub fn moved_in_direction(&self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Heading applied on the most recent step
    pub direction: Heading,
}

impl Snake {
    /// Create a single-segment snake
    pub fn new(head: Position, direction: Heading) -> Self {
        Self {
            body: vec![head],
            direction,
        }
    }

    /// Create a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>, direction: Heading) -> Self {
        debug_assert!(!body.is_empty(), "a snake needs at least one segment");
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// True if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push a new head, dropping the tail unless the snake grows
    pub fn advance(&mut self, new_head: Position, should_grow: bool) {
        self.body.insert(0, new_head);

        if !should_grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// The single mutable source of truth for one game
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub snake: Snake,
    /// Heading the next step will commit
    pub pending_heading: Heading,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    /// Current tick interval in milliseconds
    pub speed_ms: u64,
    pub steps: u32,
    pub is_alive: bool,
    /// What ended the game, once it has ended
    pub collision: Option<CollisionType>,
}

impl GameSession {
    /// Create a new running session
    pub fn new(
        snake: Snake,
        food: Position,
        grid_width: usize,
        grid_height: usize,
        speed_ms: u64,
    ) -> Self {
        let pending_heading = snake.direction;
        Self {
            snake,
            pending_heading,
            food,
            grid_width,
            grid_height,
            score: 0,
            speed_ms,
            steps: 0,
            is_alive: true,
            collision: None,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.is_within(self.grid_width, self.grid_height)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    /// Current heading, i.e. the one applied on the last step
    pub fn heading(&self) -> Heading {
        self.snake.direction
    }

    pub fn is_game_over(&self) -> bool {
        !self.is_alive
    }

    /// Copy out what a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.body.clone(),
            food: self.food,
            score: self.score,
            speed_ms: self.speed_ms,
            terminal: !self.is_alive,
            grid_width: self.grid_width,
            grid_height: self.grid_height,
        }
    }
}

/// Read-only view of a session handed to renderers after each step
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub speed_ms: u64,
    pub terminal: bool,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl Snapshot {
    pub fn head(&self) -> Position {
        self.snake[0]
    }
}
