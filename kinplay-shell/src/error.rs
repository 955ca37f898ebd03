//! Error types for the application shell.

use kinplay_core::KinError;
use thiserror::Error;

use crate::screens::Screen;

/// Errors surfaced to the front end.
#[derive(Error, Debug)]
pub enum ShellError {
    /// A roster, config or engine error from the core.
    #[error(transparent)]
    Core(#[from] KinError),

    /// An action that belongs to another screen.
    #[error("'{action}' is not available on the {screen} screen")]
    WrongScreen {
        /// The attempted action.
        action: &'static str,
        /// Screen that was showing.
        screen: Screen,
    },

    /// The named member is not part of the current round.
    #[error("No one called '{0}' in this round")]
    UnknownMember(String),

    /// A route id that names no screen.
    #[error("Unknown screen: {0}")]
    UnknownScreen(String),

    /// A console line that does not parse.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The parent tried to leave setup with an empty roster.
    #[error("Add at least one family member before leaving setup")]
    RosterEmpty,
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, ShellError>;
