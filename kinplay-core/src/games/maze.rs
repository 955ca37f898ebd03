//! Find My Family: guide the child through a maze to the right person.
//!
//! The maze is a small fixed grid of path and wall cells. The target
//! member's portrait sits on the end cell; optionally a different member's
//! portrait sits on a decoy cell. Reaching the decoy names that person and
//! sends the child back to the start. Reaching the end wins the round.
//!
//! The shipped layout (`#` = wall):
//!
//! ```text
//!   S . # . .
//!   # . # . #
//!   . . . . .
//!   . # # . #
//!   D . . . E
//! ```

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::IteratorRandom;
use tracing::debug;

use crate::config::MazeConfig;
use crate::error::{KinError, Result};
use crate::session::{Feedback, GameSession, Readiness, Stage};
use crate::types::{Direction, FamilyMember, Position, Roster};

/// Shipped walls, `1` = wall.
const STANDARD_WALLS: [[u8; 5]; 5] = [
    [0, 0, 1, 0, 0],
    [1, 0, 1, 0, 1],
    [0, 0, 0, 0, 0],
    [0, 1, 1, 0, 1],
    [0, 0, 0, 0, 0],
];

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Grid, walkable mask and the distinguished cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeLayout {
    rows: usize,
    cols: usize,
    walkable: Vec<bool>,
    start: Position,
    end: Position,
    decoy: Option<Position>,
}

impl MazeLayout {
    /// The shipped 5×5 maze: start `(0,0)`, end `(4,4)`, decoy `(4,0)`.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rows: 5,
            cols: 5,
            walkable: STANDARD_WALLS.iter().flatten().map(|&w| w == 0).collect(),
            start: Position::new(0, 0),
            end: Position::new(4, 4),
            decoy: Some(Position::new(4, 0)),
        }
    }

    /// Build and validate a layout from config.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::Config`] if the rows are empty or ragged, contain
    /// anything other than `.` and `#`, if a distinguished cell is off the
    /// grid, on a wall or doubled up, or if the end or decoy cannot be
    /// reached from the start.
    pub fn from_config(config: &MazeConfig) -> Result<Self> {
        let rows = config.layout.len();
        let cols = config.layout.first().map_or(0, |r| r.chars().count());
        if rows == 0 || cols == 0 {
            return Err(KinError::Config("maze layout is empty".to_string()));
        }

        let mut walkable = Vec::with_capacity(rows * cols);
        for (r, line) in config.layout.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(KinError::Config(format!(
                    "maze row {r} has {} cells, expected {cols}",
                    line.chars().count()
                )));
            }
            for ch in line.chars() {
                match ch {
                    '.' => walkable.push(true),
                    '#' => walkable.push(false),
                    other => {
                        return Err(KinError::Config(format!(
                            "maze row {r} contains '{other}', expected '.' or '#'"
                        )));
                    }
                }
            }
        }

        let layout = Self {
            rows,
            cols,
            walkable,
            start: config.start_position(),
            end: config.end_position(),
            decoy: config.decoy_position(),
        };
        layout.validate()?;
        Ok(layout)
    }

    fn validate(&self) -> Result<()> {
        let mut cells = vec![("start", self.start), ("end", self.end)];
        if let Some(decoy) = self.decoy {
            cells.push(("decoy", decoy));
        }
        for (label, pos) in &cells {
            if !self.is_walkable(*pos) {
                return Err(KinError::Config(format!(
                    "maze {label} {pos} is off the grid or on a wall"
                )));
            }
        }
        for (i, (a, pa)) in cells.iter().enumerate() {
            for (b, pb) in &cells[i + 1..] {
                if pa == pb {
                    return Err(KinError::Config(format!("maze {a} and {b} share cell {pa}")));
                }
            }
        }
        for (label, pos) in &cells[1..] {
            if !self.is_reachable(self.start, *pos) {
                return Err(KinError::Config(format!(
                    "maze {label} {pos} cannot be reached from the start"
                )));
            }
        }
        Ok(())
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Start cell.
    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    /// Cell with the target portrait.
    #[must_use]
    pub fn end(&self) -> Position {
        self.end
    }

    /// Cell with the decoy portrait, if the layout has one.
    #[must_use]
    pub fn decoy(&self) -> Option<Position> {
        self.decoy
    }

    /// Whether `pos` is on the grid and not a wall.
    #[must_use]
    pub fn is_walkable(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols && self.walkable[pos.row * self.cols + pos.col]
    }

    /// Whether `to` can be reached from `from` over walkable cells.
    #[must_use]
    pub fn is_reachable(&self, from: Position, to: Position) -> bool {
        self.shortest_path(from, to).is_some()
    }

    /// Breadth-first shortest path from `from` to `to`, both ends included.
    #[must_use]
    pub fn shortest_path(&self, from: Position, to: Position) -> Option<Vec<Position>> {
        if !self.is_walkable(from) || !self.is_walkable(to) {
            return None;
        }
        let index = |p: Position| p.row * self.cols + p.col;
        let mut parent: Vec<Option<Position>> = vec![None; self.rows * self.cols];
        let mut seen = vec![false; self.rows * self.cols];
        let mut queue = VecDeque::from([from]);
        seen[index(from)] = true;

        while let Some(cur) = queue.pop_front() {
            if cur == to {
                let mut path = vec![cur];
                let mut node = cur;
                while let Some(prev) = parent[index(node)] {
                    path.push(prev);
                    node = prev;
                }
                path.reverse();
                return Some(path);
            }
            for dir in Direction::ALL {
                if let Some(next) = cur.step(dir, self.rows, self.cols) {
                    if self.is_walkable(next) && !seen[index(next)] {
                        seen[index(next)] = true;
                        parent[index(next)] = Some(cur);
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }

    /// Directions that walk `path` cell by cell.
    #[must_use]
    pub fn directions_along(path: &[Position]) -> Vec<Direction> {
        path.windows(2)
            .filter_map(|pair| {
                Direction::ALL
                    .into_iter()
                    .find(|&d| pair[0].step(d, usize::MAX, usize::MAX) == Some(pair[1]))
            })
            .collect()
    }
}

impl Default for MazeLayout {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// What a move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Round not in progress; nothing changed.
    Ignored,
    /// The child moved one cell.
    Moved,
    /// Wall in the way; position unchanged.
    Blocked,
    /// Edge of the grid; position unchanged.
    OutOfBounds,
    /// The child reached the decoy and was sent back to the start.
    WrongPerson,
    /// The child reached the target.
    Reached,
}

/// What occupies a cell, for drawing the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Impassable.
    Wall,
    /// Empty path.
    Path,
    /// The child token.
    Child,
    /// The target portrait.
    Target,
    /// The decoy portrait.
    Decoy,
}

/// State of one Find-My-Family round.
#[derive(Debug, Clone)]
pub struct MazeSession {
    layout: MazeLayout,
    stage: Stage,
    position: Position,
    target: Option<FamilyMember>,
    decoy: Option<FamilyMember>,
    message: Option<Feedback>,
}

impl MazeSession {
    /// A session in [`Stage::NotStarted`] on `layout`.
    #[must_use]
    pub fn new(layout: MazeLayout) -> Self {
        Self {
            position: layout.start(),
            layout,
            stage: Stage::NotStarted,
            target: None,
            decoy: None,
            message: None,
        }
    }

    /// Entry check: one member per portrait on the layout.
    #[must_use]
    pub fn readiness(roster: &Roster, layout: &MazeLayout) -> Readiness {
        let required = if layout.decoy().is_some() { 2 } else { 1 };
        Readiness::evaluate(roster, roster.len(), required)
    }

    /// Start a round: child on the start cell, a random target, and a
    /// different random member on the decoy cell.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::SetupIncomplete`] for an empty roster,
    /// [`KinError::InsufficientData`] when the layout has a decoy and the
    /// roster has a single member, or [`KinError::DuplicateName`] if two
    /// members share a name.
    pub fn start<R: Rng + ?Sized>(&mut self, roster: &Roster, rng: &mut R) -> Result<()> {
        Self::readiness(roster, &self.layout).into_result(Self::TITLE)?;
        roster.ensure_unique_names()?;

        let members = roster.members();
        let target_idx = rng.gen_range(0..members.len());
        let decoy = if self.layout.decoy().is_some() {
            (0..members.len())
                .filter(|&i| i != target_idx)
                .choose(rng)
                .map(|i| members[i].clone())
        } else {
            None
        };

        self.target = Some(members[target_idx].clone());
        self.decoy = decoy;
        self.position = self.layout.start();
        self.message = None;
        self.stage = Stage::InProgress;

        debug!(
            target = %members[target_idx].name,
            decoy = ?self.decoy.as_ref().map(|d| d.name.as_str()),
            "Maze round started"
        );
        Ok(())
    }

    /// Reset and immediately start a fresh round.
    ///
    /// # Errors
    /// Same as [`MazeSession::start`].
    pub fn restart<R: Rng + ?Sized>(&mut self, roster: &Roster, rng: &mut R) -> Result<()> {
        self.reset();
        self.start(roster, rng)
    }

    /// Move the child one cell.
    ///
    /// Off-grid and wall moves are rejected with a message and leave the
    /// position alone. After the target is reached further moves are ignored.
    pub fn move_in(&mut self, direction: Direction) -> MoveOutcome {
        if self.stage != Stage::InProgress {
            return MoveOutcome::Ignored;
        }

        let Some(next) = self
            .position
            .step(direction, self.layout.rows(), self.layout.cols())
        else {
            self.message = Some(Feedback::OutOfBounds);
            debug!(from = %self.position, %direction, "Move off the grid");
            return MoveOutcome::OutOfBounds;
        };
        if !self.layout.is_walkable(next) {
            self.message = Some(Feedback::Blocked);
            debug!(from = %self.position, %direction, "Move into a wall");
            return MoveOutcome::Blocked;
        }

        self.position = next;
        self.message = None;

        if next == self.layout.end() {
            self.stage = Stage::Completed;
            debug!(at = %next, "Target reached");
            return MoveOutcome::Reached;
        }
        if Some(next) == self.layout.decoy() {
            if let Some(decoy) = &self.decoy {
                self.message = Some(Feedback::WrongPerson(decoy.name.clone()));
                self.position = self.layout.start();
                debug!(decoy = %decoy.name, "Decoy reached, back to start");
                return MoveOutcome::WrongPerson;
            }
        }
        MoveOutcome::Moved
    }

    /// The layout being played.
    #[must_use]
    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    /// Where the child is.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The member the child must reach.
    #[must_use]
    pub fn target(&self) -> Option<&FamilyMember> {
        self.target.as_ref()
    }

    /// The member on the decoy cell.
    #[must_use]
    pub fn decoy(&self) -> Option<&FamilyMember> {
        self.decoy.as_ref()
    }

    /// What to draw at `pos`.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Cell {
        if pos == self.position {
            Cell::Child
        } else if !self.layout.is_walkable(pos) {
            Cell::Wall
        } else if pos == self.layout.end() && self.target.is_some() {
            Cell::Target
        } else if Some(pos) == self.layout.decoy() && self.decoy.is_some() {
            Cell::Decoy
        } else {
            Cell::Path
        }
    }
}

impl Default for MazeSession {
    fn default() -> Self {
        Self::new(MazeLayout::standard())
    }
}

impl GameSession for MazeSession {
    const TITLE: &'static str = "Find My Family";

    fn stage(&self) -> Stage {
        self.stage
    }

    fn message(&self) -> Option<&Feedback> {
        self.message.as_ref()
    }

    fn reset(&mut self) {
        self.stage = Stage::NotStarted;
        self.position = self.layout.start();
        self.target = None;
        self.decoy = None;
        self.message = None;
    }
}
