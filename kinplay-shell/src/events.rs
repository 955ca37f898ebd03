//! Signals the dispatcher emits after each action.
//!
//! A front end turns these into side effects the core never performs
//! itself: drawing a celebration, playing a clip, showing a warning.

use std::fmt;

use kinplay_core::Feedback;

use crate::screens::Screen;

/// Something the front end may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// The visible screen changed.
    Navigated {
        /// Screen that was showing.
        from: Screen,
        /// Screen now showing.
        to: Screen,
    },
    /// A game was refused because the roster is empty.
    SetupRequired {
        /// The game the child tried to open.
        game: Screen,
    },
    /// A game was refused because too few members qualify.
    NotEnoughMembers {
        /// The game the child tried to open.
        game: Screen,
        /// Members the game needs.
        required: usize,
        /// Members that qualify.
        available: usize,
    },
    /// A round left its intro and is now playable.
    RoundStarted(Screen),
    /// A transient message to show under the board.
    Feedback(Feedback),
    /// A photo was picked before a name; prompt for the name.
    NeedName,
    /// Play this voice clip.
    PlayAudio(String),
    /// The round is won.
    Celebrate(Screen),
    /// The parent added a member.
    MemberAdded(String),
    /// The parent removed a member.
    MemberRemoved(String),
    /// A roster photo or clip is missing from the asset directories.
    MissingAsset {
        /// Member the asset belongs to.
        member: String,
        /// File name that was not found.
        file: String,
    },
}

impl fmt::Display for ShellEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigated { to, .. } => write!(f, "-> {}", to.title()),
            Self::SetupRequired { game } => write!(
                f,
                "{} needs your family first. Ask a grown-up to add family members.",
                game.title()
            ),
            Self::NotEnoughMembers {
                game,
                required,
                available,
            } => write!(
                f,
                "{} needs at least {required} family members (found {available}).",
                game.title()
            ),
            Self::RoundStarted(game) => write!(f, "{} has started!", game.title()),
            Self::Feedback(feedback) => write!(f, "{feedback}"),
            Self::NeedName => f.write_str("Pick a name first"),
            Self::PlayAudio(file) => write!(f, "(playing {file})"),
            Self::Celebrate(Screen::MeetMyFamily) => {
                f.write_str("Great job! You matched everyone in your family!")
            }
            Self::Celebrate(Screen::FindMyFamily) => f.write_str("You found them! Great job!"),
            Self::Celebrate(_) => f.write_str("Well done!"),
            Self::MemberAdded(name) => write!(f, "Added {name}"),
            Self::MemberRemoved(name) => write!(f, "Removed {name}"),
            Self::MissingAsset { member, file } => {
                write!(f, "Warning: {file} for {member} was not found")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_naturally() {
        let event = ShellEvent::NotEnoughMembers {
            game: Screen::WhoIsSpeaking,
            required: 2,
            available: 1,
        };
        assert_eq!(
            event.to_string(),
            "Who Is Speaking? needs at least 2 family members (found 1)."
        );
        assert_eq!(
            ShellEvent::Feedback(Feedback::WrongPerson("Dad".into())).to_string(),
            "This is Dad. Try again!"
        );
        assert_eq!(ShellEvent::Navigated { from: Screen::Home, to: Screen::Setup }.to_string(), "-> Family Setup");
    }
}
