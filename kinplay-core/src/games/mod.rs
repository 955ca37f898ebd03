//! The three game engines.
//!
//! Each engine owns its session struct and exposes `start`, `reset` and the
//! game's own actions. Engines read a [`Roster`](crate::types::Roster)
//! snapshot when a round starts and never write to the roster.

pub mod matching;
pub mod maze;
pub mod quiz;

pub use matching::{MatchOutcome, MatchingSession};
pub use maze::{MazeLayout, MazeSession, MoveOutcome};
pub use quiz::{QuizOutcome, QuizSession};
