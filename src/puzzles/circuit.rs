//! Circuit tracing.
//!
//! The player traces a route across a square grid from the start terminal to
//! the end terminal, one orthogonal step at a time, avoiding barriers. When
//! the route reaches the end it must match the solution route exactly;
//! otherwise the circuit shorts, the route resets and an attempt is spent.
//!
//! ## Clicks
//!
//! - A cell adjacent to the route's head extends the route.
//! - The cell before the head backtracks one step.
//! - Barriers, revisits and non-adjacent cells are rejected.

use serde::{Deserialize, Serialize};

use super::{AttemptPolicy, InputOutcome, Lifecycle, Puzzle, PuzzleInput, SeedData, Submission};
use crate::core::{MessageKind, PuzzleConfig, PuzzleKind, PuzzleRng};
use crate::error::ConfigError;
use crate::host::Host;
use crate::view::{CircuitView, PuzzleView};

/// A grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbours share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

/// A circuit board and its solution route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitLayout {
    pub grid_size: u8,
    pub start: Cell,
    pub end: Cell,
    pub barriers: Vec<Cell>,
    pub switches: Vec<Cell>,
    pub solution: Vec<Cell>,
}

impl CircuitLayout {
    /// The stock 5×5 board.
    #[must_use]
    pub fn classic() -> Self {
        let cells = |list: &[(u8, u8)]| list.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        Self {
            grid_size: 5,
            start: Cell::new(0, 2),
            end: Cell::new(4, 2),
            barriers: cells(&[(1, 1), (1, 2), (3, 1)]),
            switches: cells(&[(1, 3), (3, 3)]),
            solution: cells(&[(0, 2), (0, 3), (1, 3), (2, 3), (2, 2), (3, 2), (4, 2)]),
        }
    }

    /// Generate a board: `5 + difficulty / 2` cells square (at most 8), a
    /// route that sweeps left to right, `1 + difficulty` barriers off the
    /// route and up to two switches on it.
    pub fn generate(rng: &mut PuzzleRng, difficulty: u32) -> Self {
        let size = (5 + difficulty / 2).min(8) as u8;
        let start = Cell::new(0, rng.gen_range(0..u32::from(size)) as u8);
        let end_y = rng.gen_range(0..u32::from(size)) as u8;

        let mut solution = vec![start];
        let mut y = start.y;
        for x in 0..size {
            let target = if x + 1 == size {
                end_y
            } else {
                rng.gen_range(0..u32::from(size)) as u8
            };
            while y != target {
                y = if y < target { y + 1 } else { y - 1 };
                solution.push(Cell::new(x, y));
            }
            if x + 1 < size {
                solution.push(Cell::new(x + 1, y));
            }
        }
        let end = Cell::new(size - 1, end_y);

        let free: Vec<Cell> = (0..size)
            .flat_map(|x| (0..size).map(move |y| Cell::new(x, y)))
            .filter(|c| !solution.contains(c))
            .collect();
        let barriers = rng
            .sample_indices(free.len(), 1 + difficulty as usize)
            .into_iter()
            .map(|i| free[i])
            .collect();

        let interior = solution.len().saturating_sub(2);
        let switches = rng
            .sample_indices(interior, 2)
            .into_iter()
            .map(|i| solution[i + 1])
            .collect();

        Self {
            grid_size: size,
            start,
            end,
            barriers,
            switches,
            solution,
        }
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.grid_size && cell.y < self.grid_size
    }

    #[must_use]
    pub fn is_barrier(&self, cell: Cell) -> bool {
        self.barriers.contains(&cell)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| Err(ConfigError::InvalidSeed(format!("circuit: {reason}")));

        if self.grid_size < 2 {
            return invalid("grid must be at least 2x2");
        }
        if self.solution.first() != Some(&self.start) || self.solution.last() != Some(&self.end) {
            return invalid("route must run from start to end");
        }
        if self.solution.iter().any(|&c| !self.contains(c) || self.is_barrier(c)) {
            return invalid("route leaves the grid or crosses a barrier");
        }
        if self.solution.windows(2).any(|w| !w[0].is_adjacent(w[1])) {
            return invalid("route steps must be orthogonal neighbours");
        }
        let mut seen = self.solution.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.solution.len() {
            return invalid("route revisits a cell");
        }
        Ok(())
    }
}

/// Circuit tracing puzzle.
#[derive(Clone, Debug)]
pub struct CircuitPuzzle {
    lifecycle: Lifecycle,
    difficulty: u32,
    rng: PuzzleRng,
    seed: Option<CircuitLayout>,
    layout: Option<CircuitLayout>,
    path: Vec<Cell>,
}

impl CircuitPuzzle {
    #[must_use]
    pub fn new(config: &PuzzleConfig, policy: AttemptPolicy) -> Self {
        let seed = match &config.seed_data {
            Some(SeedData::Circuit(layout)) => Some(layout.clone()),
            _ => None,
        };
        Self {
            lifecycle: Lifecycle::new(
                PuzzleKind::Circuit,
                policy,
                "The board burned out. Security has been alerted.",
            ),
            difficulty: config.difficulty,
            rng: PuzzleRng::new(config.rng_seed).for_context("circuit"),
            seed,
            layout: None,
            path: Vec::new(),
        }
    }

    /// The route traced so far.
    #[must_use]
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    fn click(&mut self, cell: Cell, layout: &CircuitLayout, host: &mut dyn Host) -> InputOutcome {
        if !layout.contains(cell) {
            return InputOutcome::Rejected;
        }
        if self.path.len() >= 2 && self.path[self.path.len() - 2] == cell {
            self.path.pop();
            return InputOutcome::Accepted;
        }
        if layout.is_barrier(cell) {
            host.show_message("That cell is blocked.", MessageKind::Warning);
            return InputOutcome::Rejected;
        }
        let Some(&head) = self.path.last() else {
            return InputOutcome::Rejected;
        };
        if !head.is_adjacent(cell) || self.path.contains(&cell) {
            return InputOutcome::Rejected;
        }

        self.path.push(cell);
        if cell != layout.end {
            return InputOutcome::Accepted;
        }
        if self.path == layout.solution {
            return self.lifecycle.succeed(host);
        }
        self.path = vec![layout.start];
        self.lifecycle
            .wrong_answer("Short circuit! The route is wrong.", host)
    }
}

impl Puzzle for CircuitPuzzle {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn initialize(&mut self, host: &mut dyn Host) {
        let layout = match self.seed.take() {
            Some(layout) => layout,
            None => CircuitLayout::generate(&mut self.rng, self.difficulty),
        };
        self.path = vec![layout.start];
        self.layout = Some(layout);
        self.lifecycle.activate(host);
    }

    fn handle_input(&mut self, input: &PuzzleInput, host: &mut dyn Host) -> InputOutcome {
        if !matches!(input, PuzzleInput::ClickCell(_) | PuzzleInput::ResetPath) {
            return InputOutcome::Ignored;
        }
        if let Err(outcome) = self.lifecycle.admit(host) {
            return outcome;
        }
        let Some(layout) = self.layout.clone() else {
            return InputOutcome::Ignored;
        };

        match *input {
            PuzzleInput::ClickCell(cell) => self.click(cell, &layout, host),
            _ => {
                self.path = vec![layout.start];
                InputOutcome::Accepted
            }
        }
    }

    fn submission_data(&self) -> Submission {
        Submission::Circuit {
            path: self.path.clone(),
        }
    }

    fn solution(&self) -> Option<SeedData> {
        self.layout.clone().map(SeedData::Circuit)
    }

    fn view(&self) -> PuzzleView {
        let header = self.lifecycle.header();
        let layout = self.layout.as_ref();
        PuzzleView::Circuit(CircuitView {
            grid_size: layout.map_or(0, |l| l.grid_size),
            start: layout.map_or(Cell::new(0, 0), |l| l.start),
            end: layout.map_or(Cell::new(0, 0), |l| l.end),
            barriers: layout.map(|l| l.barriers.clone()).unwrap_or_default(),
            switches: layout
                .filter(|_| !header.hints_obscured)
                .map(|l| l.switches.clone())
                .unwrap_or_default(),
            path: self.path.clone(),
            header,
        })
    }
}
