//! Screens of the application and their stable route ids.

use std::fmt;
use std::str::FromStr;

use crate::error::ShellError;

/// One full-screen view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Menu with the three games and the setup entry.
    #[default]
    Home,
    /// Parent's roster editor.
    Setup,
    /// Name-to-photo matching game.
    MeetMyFamily,
    /// Maze game.
    FindMyFamily,
    /// Voice quiz.
    WhoIsSpeaking,
}

impl Screen {
    /// Every screen, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::MeetMyFamily,
        Self::FindMyFamily,
        Self::WhoIsSpeaking,
        Self::Setup,
    ];

    /// The three game screens.
    pub const GAMES: [Self; 3] = [Self::MeetMyFamily, Self::FindMyFamily, Self::WhoIsSpeaking];

    /// Stable route id.
    #[must_use]
    pub fn route(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Setup => "setup",
            Self::MeetMyFamily => "meet_my_family",
            Self::FindMyFamily => "find_my_family",
            Self::WhoIsSpeaking => "who_is_speaking",
        }
    }

    /// Heading shown at the top of the screen.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Know My Family",
            Self::Setup => "Family Setup",
            Self::MeetMyFamily => "Meet My Family",
            Self::FindMyFamily => "Find My Family",
            Self::WhoIsSpeaking => "Who Is Speaking?",
        }
    }

    /// Whether this screen hosts a game.
    #[must_use]
    pub fn is_game(self) -> bool {
        Self::GAMES.contains(&self)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

impl FromStr for Screen {
    type Err = ShellError;

    /// Accepts route ids, plus `meet`, `find` and `who` as shorthands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "home" => Ok(Self::Home),
            "setup" => Ok(Self::Setup),
            "meet_my_family" | "meet" => Ok(Self::MeetMyFamily),
            "find_my_family" | "find" => Ok(Self::FindMyFamily),
            "who_is_speaking" | "who" => Ok(Self::WhoIsSpeaking),
            _ => Err(ShellError::UnknownScreen(s.trim().to_string())),
        }
    }
}
