use std::time::Duration;

use rand::Rng;

use super::{
    config::GameConfig,
    direction::Direction,
    grid::{Position, TileGrid},
};

/// Where a game currently stands. The two non-running states are terminal
/// and sticky: once reached, `step()` and `update()` stop mutating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    /// The head ran into the body
    GameOver,
    /// No free tile was left to place food on: the snake owns the grid
    Won,
}

/// The simulation: grid, snake, food, direction state and step timing.
///
/// The snake's body lives entirely inside the [`TileGrid`] as a chain of
/// behind-links starting at `head`. The engine advances one tile per step;
/// `update` converts wall-clock time into steps and keeps the remainder as
/// the sub-step fraction the renderer interpolates with.
pub struct GameEngine {
    config: GameConfig,
    grid: TileGrid,
    head: Position,
    food: Position,
    /// Most recently requested direction, committed at the next step
    input_direction: Direction,
    /// Direction actually applied by the current/most recent step
    move_direction: Direction,
    body_length: u32,
    /// Flat index of the chain's terminal free tile (the tail marker)
    tail: usize,
    outcome: Outcome,
    step_time: Duration,
    accumulated: Duration,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    /// Create an engine and start a game at a random head position
    pub fn new(config: GameConfig) -> Self {
        let grid = TileGrid::new(config.grid_width, config.grid_height);
        let step_time = config.step_time();

        let mut engine = Self {
            config,
            grid,
            head: Position::new(0, 0),
            food: Position::new(0, 0),
            input_direction: Direction::Down,
            move_direction: Direction::Down,
            body_length: 1,
            tail: 0,
            outcome: Outcome::Running,
            step_time,
            accumulated: Duration::ZERO,
            rng: rand::thread_rng(),
        };
        engine.reset();
        engine
    }

    /// Restart at a random head position
    pub fn reset(&mut self) {
        let head = Position::new(
            self.rng.gen_range(0..self.grid.width()) as i32,
            self.rng.gen_range(0..self.grid.height()) as i32,
        );
        self.reset_at(head);
    }

    /// Restart with the head on a given tile.
    ///
    /// The tile wrapped-north of the head becomes its predecessor, giving
    /// one visible segment plus the trailing tail marker; the initial
    /// direction is Down, away from the tail.
    pub fn reset_at(&mut self, head: Position) {
        self.grid.clear_all();

        self.head = self.grid.wrap(head);
        let marker = self.grid.wrap(self.head.moved_by(0, -1));
        self.tail = self.grid.index_of(marker);
        self.grid
            .set_behind(self.grid.index_of(self.head), self.tail);

        self.body_length = 1;
        self.input_direction = Direction::Down;
        self.move_direction = Direction::Down;
        self.outcome = Outcome::Running;
        self.accumulated = Duration::ZERO;

        match self.place_food() {
            Some(food) => self.food = food,
            None => self.outcome = Outcome::Won,
        }
    }

    /// Record a direction intent. Ignored when it reverses the *applied*
    /// move direction, so the head can never fold back through its own
    /// neck within one step. Takes effect at the next `step()`.
    pub fn set_input_direction(&mut self, direction: Direction) {
        if !direction.is_opposite(self.move_direction) {
            self.input_direction = direction;
        }
    }

    /// Feed elapsed wall-clock time into the simulation, draining one
    /// `step()` per full step interval (catch-up after a slow frame) and
    /// keeping the remainder for interpolation.
    pub fn update(&mut self, delta: Duration) {
        if self.outcome != Outcome::Running {
            return;
        }

        self.accumulated += delta;
        while self.accumulated >= self.step_time {
            self.accumulated -= self.step_time;
            self.step();
            if self.outcome != Outcome::Running {
                // freeze the final frame grid-aligned
                self.accumulated = Duration::ZERO;
                break;
            }
        }
    }

    /// Advance the simulation by one discrete tick
    pub fn step(&mut self) {
        if self.outcome != Outcome::Running {
            return;
        }

        self.contract_tail();
        self.move_direction = self.input_direction;
        self.advance_head();
    }

    /// Walk the chain from the head and vacate the last occupied tile,
    /// which becomes the new tail marker. O(body length), hard-bounded by
    /// grid size.
    fn contract_tail(&mut self) {
        let mut current = self.grid.index_of(self.head);
        for _ in 0..self.grid.len() {
            let Some(next) = self.grid.behind(current) else {
                return;
            };
            if self.grid.behind(next).is_none() {
                self.grid.clear(current);
                self.tail = current;
                return;
            }
            current = next;
        }
    }

    /// Move the head one tile, handling collision, feeding and growth.
    /// Feeding re-advances without another contraction, so growth costs no
    /// tick; the loop is capped by grid size so a food-placement bug
    /// cannot re-enter forever.
    fn advance_head(&mut self) {
        for _ in 0..self.grid.len() {
            let new_head = self
                .grid
                .wrap(self.head.moved_in_direction(self.move_direction));
            let new_index = self.grid.index_of(new_head);

            // Entering the tail marker of a longer body would link the
            // chain into a cycle; it counts as hitting the body.
            let hits_marker = self.body_length > 1 && new_index == self.tail;
            if self.grid.is_occupied(new_index) || hits_marker {
                self.outcome = Outcome::GameOver;
                return;
            }

            let old_index = self.grid.index_of(self.head);
            self.grid.set_behind(new_index, old_index);
            self.head = new_head;

            if self.head != self.food {
                return;
            }

            self.body_length += 1;
            match self.place_food() {
                Some(food) => self.food = food,
                None => {
                    self.outcome = Outcome::Won;
                    return;
                }
            }
        }
    }

    /// Pick a uniformly random free tile for food, excluding the tail
    /// marker (entering the marker is lethal, see `advance_head`). `None`
    /// means the grid is exhausted.
    fn place_food(&mut self) -> Option<Position> {
        let candidates: Vec<usize> = self
            .grid
            .free_cells()
            .filter(|&index| index != self.tail)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let pick = candidates[self.rng.gen_range(0..candidates.len())];
        Some(self.grid.position_of(pick))
    }

    // Accessors; none of these mutate.

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn head_position(&self) -> Position {
        self.head
    }

    pub fn food_position(&self) -> Position {
        self.food
    }

    pub fn move_direction(&self) -> Direction {
        self.move_direction
    }

    pub fn body_length(&self) -> u32 {
        self.body_length
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_running(&self) -> bool {
        self.outcome == Outcome::Running
    }

    /// Whether a tile (wrapped onto the grid) is part of the body
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.grid.is_occupied(self.grid.index_of(self.grid.wrap(pos)))
    }

    /// The tile behind a body tile, or `None` for free tiles
    pub fn predecessor_of(&self, pos: Position) -> Option<Position> {
        let index = self.grid.index_of(self.grid.wrap(pos));
        self.grid.behind(index).map(|i| self.grid.position_of(i))
    }

    /// Progress toward the next step in [0, 1], for rendering only
    pub fn fraction(&self) -> f32 {
        if self.step_time.is_zero() {
            return 0.0;
        }
        (self.accumulated.as_secs_f32() / self.step_time.as_secs_f32()).min(1.0)
    }

    pub(crate) fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Build a mid-game state directly: `chain` lists body tiles from head
    /// to tail, `marker` is the free tile the last of them points at.
    #[cfg(test)]
    pub(crate) fn with_chain(
        config: GameConfig,
        chain: &[(i32, i32)],
        marker: (i32, i32),
        direction: Direction,
        food: (i32, i32),
    ) -> Self {
        let mut engine = Self::new(config);
        engine.grid.clear_all();

        let indices: Vec<usize> = chain
            .iter()
            .map(|&(x, y)| engine.grid.index_of(Position::new(x, y)))
            .collect();
        let marker_index = engine.grid.index_of(Position::new(marker.0, marker.1));
        for pair in indices.windows(2) {
            engine.grid.set_behind(pair[0], pair[1]);
        }
        engine
            .grid
            .set_behind(indices[indices.len() - 1], marker_index);

        engine.head = Position::new(chain[0].0, chain[0].1);
        engine.tail = marker_index;
        engine.body_length = chain.len() as u32;
        engine.move_direction = direction;
        engine.input_direction = direction;
        engine.food = Position::new(food.0, food.1);
        engine.outcome = Outcome::Running;
        engine.accumulated = Duration::ZERO;
        engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_engine(width: usize, height: usize, head: Position) -> GameEngine {
        let mut engine = GameEngine::new(GameConfig::new(width, height));
        engine.reset_at(head);
        engine
    }

    fn engine_with_chain(
        width: usize,
        height: usize,
        chain: &[(i32, i32)],
        marker: (i32, i32),
        direction: Direction,
        food: (i32, i32),
    ) -> GameEngine {
        GameEngine::with_chain(GameConfig::new(width, height), chain, marker, direction, food)
    }

    #[test]
    fn test_reset_initial_state() {
        let engine = make_engine(10, 10, Position::new(5, 5));

        assert_eq!(engine.head_position(), Position::new(5, 5));
        assert_eq!(engine.body_length(), 1);
        assert_eq!(engine.move_direction(), Direction::Down);
        assert_eq!(engine.outcome(), Outcome::Running);

        // one occupied tile, pointing at the marker directly north
        assert_eq!(engine.grid.occupied_count(), 1);
        assert!(engine.is_occupied(Position::new(5, 5)));
        assert_eq!(
            engine.predecessor_of(Position::new(5, 5)),
            Some(Position::new(5, 4))
        );
        assert_eq!(engine.tail, engine.grid.index_of(Position::new(5, 4)));

        // food on a free tile, not the marker
        assert!(!engine.is_occupied(engine.food_position()));
        assert_ne!(
            engine.grid.index_of(engine.food_position()),
            engine.tail
        );
    }

    #[test]
    fn test_reset_wraps_initial_tail() {
        let engine = make_engine(6, 6, Position::new(3, 0));
        assert_eq!(
            engine.predecessor_of(Position::new(3, 0)),
            Some(Position::new(3, 5))
        );
    }

    #[test]
    fn test_single_step_contracts_and_advances() {
        // 4x4 grid, head (1,1), marker (1,0), moving down, food far away
        let mut engine = make_engine(4, 4, Position::new(1, 1));
        engine.food = Position::new(3, 3);

        engine.step();

        assert_eq!(engine.head_position(), Position::new(1, 2));
        assert_eq!(engine.body_length(), 1);
        assert_eq!(engine.grid.occupied_count(), 1);
        assert!(engine.is_occupied(Position::new(1, 2)));
        assert!(!engine.is_occupied(Position::new(1, 1)));
        assert_eq!(
            engine.predecessor_of(Position::new(1, 2)),
            Some(Position::new(1, 1))
        );
        assert_eq!(engine.tail, engine.grid.index_of(Position::new(1, 1)));
    }

    #[test]
    fn test_wrap_on_all_four_edges() {
        // down off the bottom edge
        let mut engine = make_engine(4, 4, Position::new(1, 3));
        engine.food = Position::new(3, 1);
        engine.step();
        assert_eq!(engine.head_position(), Position::new(1, 0));

        // up off the top edge
        let mut engine = make_engine(4, 4, Position::new(1, 0));
        engine.food = Position::new(3, 2);
        engine.move_direction = Direction::Up;
        engine.input_direction = Direction::Up;
        engine.step();
        assert_eq!(engine.head_position(), Position::new(1, 3));

        // left off the left edge
        let mut engine = make_engine(4, 4, Position::new(0, 1));
        engine.food = Position::new(2, 3);
        engine.move_direction = Direction::Left;
        engine.input_direction = Direction::Left;
        engine.step();
        assert_eq!(engine.head_position(), Position::new(3, 1));

        // right off the right edge
        let mut engine = make_engine(4, 4, Position::new(3, 1));
        engine.food = Position::new(1, 3);
        engine.move_direction = Direction::Right;
        engine.input_direction = Direction::Right;
        engine.step();
        assert_eq!(engine.head_position(), Position::new(0, 1));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut engine = make_engine(10, 10, Position::new(5, 5));
        engine.food = Position::new(0, 0);

        engine.set_input_direction(Direction::Up);
        engine.step();

        assert_eq!(engine.move_direction(), Direction::Down);
        assert_eq!(engine.head_position(), Position::new(5, 6));
    }

    #[test]
    fn test_turn_is_buffered_until_step() {
        let mut engine = make_engine(10, 10, Position::new(5, 5));
        engine.food = Position::new(0, 0);

        engine.set_input_direction(Direction::Left);
        assert_eq!(engine.move_direction(), Direction::Down);

        engine.step();
        assert_eq!(engine.move_direction(), Direction::Left);
        assert_eq!(engine.head_position(), Position::new(4, 5));
    }

    #[test]
    fn test_last_intent_before_step_wins() {
        let mut engine = make_engine(10, 10, Position::new(5, 5));
        engine.food = Position::new(0, 0);

        engine.set_input_direction(Direction::Left);
        engine.set_input_direction(Direction::Right);
        engine.step();

        assert_eq!(engine.move_direction(), Direction::Right);
        assert_eq!(engine.head_position(), Position::new(6, 5));
    }

    #[test]
    fn test_feeding_grows_and_advances_twice() {
        let mut engine = make_engine(10, 10, Position::new(5, 2));
        engine.food = Position::new(5, 3);

        engine.step();

        // Every feeding grows the chain by one and advances the head one
        // extra tile, all within this single tick. Relocated food may by
        // chance land on the advance path and feed again, so assert
        // relative to the number of tiles actually eaten.
        let length = engine.body_length();
        assert!(length >= 2);
        let head_y = 2 + length as i32;
        assert_eq!(engine.head_position(), Position::new(5, head_y));
        assert_eq!(engine.grid.occupied_count(), length as usize);
        assert!(engine.is_occupied(Position::new(5, 3)));
        assert_eq!(
            engine.predecessor_of(Position::new(5, head_y)),
            Some(Position::new(5, head_y - 1))
        );
        // exactly one tile was vacated this tick
        assert!(!engine.is_occupied(Position::new(5, 2)));
        assert_eq!(engine.tail, engine.grid.index_of(Position::new(5, 2)));

        // food moved to a free non-marker tile
        let food = engine.food_position();
        assert!(!engine.is_occupied(food));
        assert_ne!(engine.grid.index_of(food), engine.tail);
        assert_eq!(engine.outcome(), Outcome::Running);
    }

    #[test]
    fn test_self_collision_is_terminal() {
        // U-shaped body; turning left runs the head into it
        let mut engine = engine_with_chain(
            4,
            4,
            &[(2, 1), (2, 0), (1, 0), (1, 1), (1, 2)],
            (1, 3),
            Direction::Down,
            (3, 3),
        );

        engine.set_input_direction(Direction::Left);
        engine.step();
        assert_eq!(engine.outcome(), Outcome::GameOver);
        assert!(!engine.is_running());

        // terminal state is frozen: further steps and updates are no-ops
        let head = engine.head_position();
        let food = engine.food_position();
        let occupied = engine.grid.occupied_count();
        engine.step();
        engine.update(Duration::from_secs(10));
        assert_eq!(engine.head_position(), head);
        assert_eq!(engine.food_position(), food);
        assert_eq!(engine.grid.occupied_count(), occupied);
        assert_eq!(engine.outcome(), Outcome::GameOver);
    }

    #[test]
    fn test_entering_tail_marker_is_collision_not_wraparound() {
        // Corridor-like fill: the only reachable free tile is the marker
        // directly behind the tail. Entering it would close the chain into
        // a cycle, so it must end the game instead of hanging or passing
        // through.
        let mut engine = engine_with_chain(
            3,
            2,
            &[(0, 0), (0, 1), (1, 1), (1, 0)],
            (2, 0),
            Direction::Up,
            (2, 1),
        );

        engine.set_input_direction(Direction::Right);
        engine.step();

        assert_eq!(engine.outcome(), Outcome::GameOver);
        // no wrap-through: the body is exactly as the contraction left it
        assert!(engine.is_occupied(Position::new(0, 0)));
        assert!(engine.is_occupied(Position::new(0, 1)));
        assert!(engine.is_occupied(Position::new(1, 1)));
        assert!(!engine.is_occupied(Position::new(1, 0)));

        // and the state stays frozen
        engine.step();
        assert_eq!(engine.outcome(), Outcome::GameOver);
    }

    #[test]
    fn test_grid_exhaustion_ends_in_won() {
        // 4x2 grid, six body tiles; eating (2,0) relocates food to the only
        // candidate (3,0), which the growth re-advance consumes in the same
        // tick, leaving no free tile for food: a win.
        let mut engine = engine_with_chain(
            4,
            2,
            &[(1, 0), (0, 0), (0, 1), (1, 1), (2, 1), (3, 1)],
            (3, 0),
            Direction::Right,
            (2, 0),
        );

        engine.step();

        assert_eq!(engine.outcome(), Outcome::Won);
        assert_eq!(engine.body_length(), 8);
        assert!(!engine.is_running());

        // Won is terminal exactly like GameOver
        let head = engine.head_position();
        engine.step();
        engine.update(Duration::from_secs(1));
        assert_eq!(engine.head_position(), head);
        assert_eq!(engine.outcome(), Outcome::Won);
    }

    #[test]
    fn test_chain_invariants_over_many_steps() {
        let mut engine = make_engine(10, 10, Position::new(5, 5));

        // steer in a fixed rotation; reversals are filtered automatically
        let inputs = [
            Direction::Down,
            Direction::Left,
            Direction::Up,
            Direction::Right,
        ];
        for turn in 0..200 {
            engine.set_input_direction(inputs[turn % inputs.len()]);
            engine.step();
            if !engine.is_running() {
                break;
            }

            let length = engine.body_length() as usize;
            assert_eq!(engine.grid.occupied_count(), length);

            // exactly one chain from the head, ending at a free tile
            let head_index = engine.grid.index_of(engine.head_position());
            let chain: Vec<usize> = engine.grid.chain_from(head_index).collect();
            assert_eq!(chain.len(), length);
            let last = chain[chain.len() - 1];
            assert_eq!(engine.grid.behind(last), Some(engine.tail));
            assert!(!engine.grid.is_occupied(engine.tail));

            assert!(!engine.is_occupied(engine.food_position()));
        }
    }

    #[test]
    fn test_update_drains_whole_steps_and_keeps_fraction() {
        let mut config = GameConfig::small();
        config.speed = 1.0; // 100 ms steps
        let mut engine = GameEngine::new(config);
        engine.reset_at(Position::new(5, 2));
        engine.food = Position::new(0, 0);

        engine.update(Duration::from_millis(250));

        assert_eq!(engine.head_position(), Position::new(5, 4));
        assert!((engine.fraction() - 0.5).abs() < 1e-3);

        engine.update(Duration::from_millis(49));
        assert_eq!(engine.head_position(), Position::new(5, 4));
        engine.update(Duration::from_millis(1));
        assert_eq!(engine.head_position(), Position::new(5, 5));
        assert!(engine.fraction() < 1e-3);
    }
}
