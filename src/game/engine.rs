use super::{
    config::GameConfig,
    heading::Heading,
    state::{CollisionType, GameSession, Position, Snake, Snapshot},
};
use anyhow::Result;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Whether the tick interval changed; the ticker must be re-installed
    pub speed_changed: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
    /// State after the step
    pub snapshot: Snapshot,
}

/// The game engine that handles all game logic
pub struct GameEngine<R: Rng = StdRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Engine whose food placement is reproducible
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine drawing food positions from `rng`
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh session
    pub fn reset(&mut self) -> GameSession {
        let snake = Snake::new(self.config.origin, self.config.initial_heading);
        let food = self.spawn_food();

        info!(
            grid_width = self.config.grid_width,
            grid_height = self.config.grid_height,
            food_x = food.x,
            food_y = food.y,
            "new game"
        );

        GameSession::new(
            snake,
            food,
            self.config.grid_width,
            self.config.grid_height,
            self.config.initial_speed_ms,
        )
    }

    /// Queue a heading for the next step.
    ///
    /// Reversals are checked against the heading applied on the last step,
    /// not against an earlier queued request, so a burst of turns between
    /// two ticks can never fold the snake back onto its neck.
    pub fn set_heading(&self, state: &mut GameSession, requested: Heading) {
        if state.snake.direction.is_opposite(requested) {
            debug!(?requested, current = ?state.snake.direction, "ignored reversal");
            return;
        }
        state.pending_heading = requested;
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameSession) -> StepOutcome {
        if !state.is_alive {
            return StepOutcome {
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: state.collision,
                    speed_changed: false,
                },
                snapshot: state.snapshot(),
            };
        }

        state.snake.direction = state.pending_heading;

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.is_alive = false;
            state.collision = Some(collision_type);
            state.steps += 1;

            info!(?collision_type, score = state.score, steps = state.steps, "game over");

            return StepOutcome {
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                    speed_changed: false,
                },
                snapshot: state.snapshot(),
            };
        }

        let ate_food = new_head == state.food;

        // Grow by keeping the tail when food was eaten
        state.snake.advance(new_head, ate_food);

        let mut speed_changed = false;
        if ate_food {
            state.score = state.score.saturating_add(self.config.food_score);
            state.food = self.spawn_food();

            if state.score % self.config.speed_up_every == 0 {
                let new_speed = state
                    .speed_ms
                    .saturating_sub(self.config.speed_step_ms)
                    .max(self.config.min_speed_ms);
                speed_changed = new_speed != state.speed_ms;
                if speed_changed {
                    info!(from = state.speed_ms, to = new_speed, score = state.score, "speed up");
                }
                state.speed_ms = new_speed;
            }
        }

        state.steps += 1;

        debug!(
            head_x = new_head.x,
            head_y = new_head.y,
            len = state.snake.len(),
            ate_food,
            score = state.score,
            "step"
        );

        StepOutcome {
            terminated: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
                speed_changed,
            },
            snapshot: state.snapshot(),
        }
    }

    /// Check if the new head position causes a collision.
    ///
    /// Runs against the pre-move body, so the cell the tail is about to
    /// vacate still counts.
    fn check_collision(&self, state: &GameSession, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a food cell uniformly over the whole grid. The snake's cells are
    /// not excluded.
    fn spawn_food(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.config.grid_width) as i32;
        let y = self.rng.gen_range(0..self.config.grid_height) as i32;
        Position::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: GameConfig) -> GameEngine {
        GameEngine::seeded(config, 7).unwrap()
    }

    /// Session on a 20x20 grid with food parked out of the way
    fn session(snake: Snake) -> GameSession {
        GameSession::new(snake, Position::new(19, 19), 20, 20, 150)
    }

    #[test]
    fn test_reset() {
        let mut engine = engine(GameConfig::default());
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.speed_ms, 150);
        assert_eq!(state.snake.body, vec![Position::new(5, 5)]);
        assert_eq!(state.heading(), Heading::Right);
        assert_eq!(state.pending_heading, Heading::Right);
        assert!(state.is_in_bounds(state.food));
        assert_eq!(state.collision, None);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        assert!(GameEngine::new(GameConfig::new(0, 0)).is_err());
        assert!(GameEngine::seeded(GameConfig::new(20, 0), 1).is_err());
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameConfig::default());
        let mut state = session(Snake::new(Position::new(5, 5), Heading::Right));

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.body, vec![Position::new(6, 5)]);
        assert_eq!(result.snapshot, state.snapshot());
    }

    #[test]
    fn test_worked_example() {
        let mut engine = engine(GameConfig::default());
        let mut state = session(Snake::new(Position::new(5, 5), Heading::Right));
        state.food = Position::new(6, 5);

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert!(result.info.ate_food);
        assert_eq!(state.snake.body, vec![Position::new(6, 5), Position::new(5, 5)]);
        assert_eq!(state.score, 10);
        assert_eq!(state.speed_ms, 150);
        assert!(!result.info.speed_changed);
        assert!(state.is_in_bounds(state.food));
    }

    #[test]
    fn test_food_consumption_keeps_tail() {
        let mut engine = engine(GameConfig::default());
        let mut state = session(Snake::from_segments(
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Heading::Right,
        ));
        state.food = Position::new(6, 5);

        engine.step(&mut state);

        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.snake.tail(), Position::new(3, 5));
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine(GameConfig::default());
        let mut state = session(Snake::new(Position::new(19, 7), Heading::Right));
        state.food = Position::new(3, 3);
        state.score = 40;
        let before = state.clone();

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert!(!state.is_alive);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(state.snake, before.snake);
        assert_eq!(state.food, before.food);
        assert_eq!(state.score, before.score);
        assert!(result.snapshot.terminal);
    }

    #[test]
    fn test_wall_collision_each_edge() {
        let cases = [
            (Position::new(0, 5), Heading::Left),
            (Position::new(5, 0), Heading::Up),
            (Position::new(5, 19), Heading::Down),
        ];
        for (head, heading) in cases {
            let mut engine = engine(GameConfig::default());
            let mut state = session(Snake::new(head, heading));
            let result = engine.step(&mut state);
            assert_eq!(result.info.collision_type, Some(CollisionType::Wall), "{heading:?}");
        }
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameConfig::default());

        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let body = (1..=5).rev().map(|x| Position::new(x, 5)).collect();
        let mut state = session(Snake::from_segments(body, Heading::Right));

        // (5,6) (5,5) (4,5) (3,5) (2,5)
        engine.set_heading(&mut state, Heading::Down);
        engine.step(&mut state);
        // (4,6) (5,6) (5,5) (4,5) (3,5)
        engine.set_heading(&mut state, Heading::Left);
        engine.step(&mut state);
        // Up lands on (4,5), which is still part of the body
        engine.set_heading(&mut state, Heading::Up);
        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(result.info.collision_type, Some(CollisionType::SelfCollision));
        assert_eq!(state.snake.head(), Position::new(4, 6));
    }

    #[test]
    fn test_tail_cell_counts_as_occupied() {
        let mut engine = engine(GameConfig::default());

        // A tight loop of four: the head moves onto the cell the tail is leaving
        let body = vec![
            Position::new(5, 6),
            Position::new(6, 6),
            Position::new(6, 5),
            Position::new(5, 5),
        ];
        let mut state = session(Snake::from_segments(body, Heading::Left));
        engine.set_heading(&mut state, Heading::Up);

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(result.info.collision_type, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine(GameConfig::default());
        let mut state = engine.reset();

        engine.set_heading(&mut state, Heading::Left);
        engine.set_heading(&mut state, Heading::Left);
        engine.step(&mut state);

        assert_eq!(state.heading(), Heading::Right);
        assert_eq!(state.snake.head(), Position::new(6, 5));
    }

    #[test]
    fn test_guard_uses_applied_heading_not_queued_one() {
        let mut engine = engine(GameConfig::default());
        let mut state = engine.reset();

        // Up is queued, but Left is still the reverse of the applied Right
        engine.set_heading(&mut state, Heading::Up);
        engine.set_heading(&mut state, Heading::Left);
        assert_eq!(state.pending_heading, Heading::Up);

        // Down reverses the queued Up, but not the applied Right, so it wins
        engine.set_heading(&mut state, Heading::Down);
        assert_eq!(state.pending_heading, Heading::Down);

        engine.step(&mut state);
        assert_eq!(state.heading(), Heading::Down);
        assert_eq!(state.snake.head(), Position::new(5, 6));
    }

    #[test]
    fn test_set_heading_does_not_move_snake() {
        let engine = engine(GameConfig::default());
        let mut state = session(Snake::new(Position::new(5, 5), Heading::Right));
        engine.set_heading(&mut state, Heading::Up);

        assert_eq!(state.snake.body, vec![Position::new(5, 5)]);
        assert_eq!(state.heading(), Heading::Right);
        assert_eq!(state.steps, 0);
    }

    #[test]
    fn test_speed_up_on_multiple_of_fifty() {
        let mut engine = engine(GameConfig::default());
        let mut state = session(Snake::new(Position::new(5, 5), Heading::Right));
        state.score = 40;
        state.food = Position::new(6, 5);

        let result = engine.step(&mut state);

        assert_eq!(state.score, 50);
        assert_eq!(state.speed_ms, 140);
        assert!(result.info.speed_changed);
    }

    #[test]
    fn test_no_speed_up_off_multiple() {
        let mut engine = engine(GameConfig::default());
        let mut state = session(Snake::new(Position::new(5, 5), Heading::Right));
        state.score = 50;
        state.food = Position::new(6, 5);

        let result = engine.step(&mut state);

        assert_eq!(state.score, 60);
        assert_eq!(state.speed_ms, 150);
        assert!(!result.info.speed_changed);
    }

    #[test]
    fn test_speed_floor() {
        let mut engine = engine(GameConfig::default());
        let mut state = session(Snake::new(Position::new(5, 5), Heading::Right));
        state.score = 90;
        state.speed_ms = 50;
        state.food = Position::new(6, 5);

        let result = engine.step(&mut state);

        assert_eq!(state.score, 100);
        assert_eq!(state.speed_ms, 50);
        assert!(!result.info.speed_changed);
    }

    #[test]
    fn test_score_saturates_instead_of_overflowing() {
        let config = GameConfig {
            food_score: u32::MAX / 2 + 1,
            ..Default::default()
        };
        let mut engine = engine(config);
        let mut state = session(Snake::new(Position::new(5, 5), Heading::Right));

        state.food = Position::new(6, 5);
        engine.step(&mut state);
        state.food = Position::new(7, 5);
        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert_eq!(state.score, u32::MAX);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_food_may_land_on_snake() {
        let config = GameConfig {
            origin: Position::new(0, 0),
            ..GameConfig::new(2, 1)
        };
        let mut engine = engine(config);
        let mut state = GameSession::new(
            Snake::new(Position::new(0, 0), Heading::Right),
            Position::new(1, 0),
            2,
            1,
            150,
        );

        engine.step(&mut state);

        // The snake now covers the whole grid, so the new food overlaps it
        assert_eq!(state.snake.len(), 2);
        assert!(state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine(GameConfig::default());
        let mut state = session(Snake::new(Position::new(19, 0), Heading::Right));
        let first = engine.step(&mut state);
        assert!(first.terminated);
        let before = state.clone();

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(result, first);
        assert_eq!(state, before);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut engine = engine(GameConfig::default());
        let mut state = session(Snake::new(Position::new(19, 0), Heading::Right));
        state.score = 70;
        state.speed_ms = 130;
        engine.step(&mut state);

        let state = engine.reset();
        assert!(state.is_alive);
        assert_eq!(state.snake.body, vec![Position::new(5, 5)]);
        assert_eq!(state.heading(), Heading::Right);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed_ms, 150);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = engine(GameConfig::default());
        let mut b = engine(GameConfig::default());
        for _ in 0..5 {
            assert_eq!(a.reset().food, b.reset().food);
        }
    }
}
