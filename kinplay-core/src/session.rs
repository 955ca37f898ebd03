//! The contract every game session follows.
//!
//! A session is plain data owned by whoever is running the game. Actions are
//! methods that mutate it and return an outcome; the caller then re-reads the
//! session to redraw. Lifecycle:
//!
//! ```text
//!   NotStarted ──start──▶ InProgress ──win──▶ Completed
//!        ▲                    │                   │
//!        └──────reset─────────┴───────reset───────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{KinError, Result};
use crate::types::Roster;

/// Where a session is in its play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    /// Intro view; no session data drawn yet.
    #[default]
    NotStarted,
    /// The child is playing.
    InProgress,
    /// The round is won. Only `reset` leaves this stage.
    Completed,
}

/// Transient message shown after an action, cleared by the next successful one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    /// The answer or match was right.
    Correct,
    /// The answer or match was wrong; the child may try again.
    TryAgain,
    /// A maze move ran into a wall.
    Blocked,
    /// A maze move would leave the grid.
    OutOfBounds,
    /// The child reached the wrong person's portrait.
    WrongPerson(String),
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => f.write_str("Correct!"),
            Self::TryAgain => f.write_str("Try again"),
            Self::Blocked => f.write_str("That path is blocked!"),
            Self::OutOfBounds => f.write_str("Can't go that way!"),
            Self::WrongPerson(name) => write!(f, "This is {name}. Try again!"),
        }
    }
}

/// Whether a game can be entered with the current roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Preconditions hold.
    Ready,
    /// The roster is empty; send the parent to setup.
    SetupIncomplete,
    /// The roster has members, but too few suitable ones for this game.
    InsufficientData {
        /// Minimum number of suitable members.
        required: usize,
        /// Suitable members on the roster.
        available: usize,
    },
}

impl Readiness {
    /// Evaluate entry preconditions.
    ///
    /// `eligible` is how many roster members this game can use.
    #[must_use]
    pub fn evaluate(roster: &Roster, eligible: usize, required: usize) -> Self {
        if roster.is_empty() {
            Self::SetupIncomplete
        } else if eligible < required {
            Self::InsufficientData {
                required,
                available: eligible,
            }
        } else {
            Self::Ready
        }
    }

    /// Whether the game may start.
    #[must_use]
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }

    /// Turn a failed check into the matching error.
    ///
    /// # Errors
    /// Returns [`KinError::SetupIncomplete`] or [`KinError::InsufficientData`]
    /// unless `self` is [`Readiness::Ready`].
    pub fn into_result(self, game: &'static str) -> Result<()> {
        match self {
            Self::Ready => Ok(()),
            Self::SetupIncomplete => Err(KinError::SetupIncomplete),
            Self::InsufficientData {
                required,
                available,
            } => Err(KinError::InsufficientData {
                game,
                required,
                available,
            }),
        }
    }
}

/// Shared surface of the three game sessions.
pub trait GameSession {
    /// Human-readable game title.
    const TITLE: &'static str;

    /// Current stage.
    fn stage(&self) -> Stage;

    /// Current feedback message, if any.
    fn message(&self) -> Option<&Feedback>;

    /// Clear every field and return to [`Stage::NotStarted`].
    fn reset(&mut self);

    /// Whether the round has been won.
    fn is_complete(&self) -> bool {
        self.stage() == Stage::Completed
    }
}
