//! Error types for the Know My Family core library.

use thiserror::Error;

/// Top-level error type for roster and game operations.
#[derive(Error, Debug)]
pub enum KinError {
    /// A family member record is missing a required field.
    #[error("Invalid family member: {reason}")]
    InvalidMember {
        /// Which rule the record broke.
        reason: String,
    },

    /// A name is already present on the roster.
    #[error("Duplicate family member name: {0}")]
    DuplicateName(String),

    /// A roster index does not refer to any member.
    #[error("Roster index {index} out of range (roster has {len} members)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current roster length.
        len: usize,
    },

    /// A direction word the maze does not understand.
    #[error("Unknown direction: {0}")]
    UnknownDirection(String),

    /// The roster is empty; the parent has not finished setup.
    #[error("Family setup is incomplete")]
    SetupIncomplete,

    /// The roster does not hold enough suitable members for a game.
    #[error("{game} needs at least {required} members (found {available})")]
    InsufficientData {
        /// Which game refused to start.
        game: &'static str,
        /// Minimum number of suitable members.
        required: usize,
        /// How many suitable members the roster holds.
        available: usize,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, KinError>;
