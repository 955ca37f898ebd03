//! Line commands understood by the console driver.
//!
//! One command per line. Member names are matched ignoring case. Roster
//! positions are shown and typed starting from 1.

use std::str::FromStr;

use rand::Rng;

use kinplay_core::Direction;

use crate::dispatcher::{App, Navigator};
use crate::error::{Result, ShellError};
use crate::events::ShellEvent;
use crate::screens::Screen;
use crate::setup::MemberDraft;

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  open <screen>        home, setup, meet, find, who
  start                leave the intro and play
  name <name>          Meet My Family: pick a name
  photo <name>         Meet My Family: pick that person's photo
  up|down|left|right   Find My Family: move (u/d/l/r also work)
  pick <name>          Who Is Speaking?: answer
  replay               Who Is Speaking?: hear the voice again
  again                play again
  home                 back to the home screen
  add <name> | <relationship> | <photo> [| <voice>]
  remove <number>      setup: remove a family member
  done                 setup: finish and go home
  show                 redraw the screen
  help                 this text
  quit                 exit";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a screen.
    Open(Screen),
    /// Leave the intro stage.
    Start,
    /// Pick a name.
    Name(String),
    /// Pick a photo by its member's name.
    Photo(String),
    /// Move in the maze.
    Move(Direction),
    /// Answer the quiz.
    Pick(String),
    /// Replay the voice clip.
    Replay,
    /// Play again.
    Again,
    /// Back to Home.
    Home,
    /// Add a family member.
    Add(MemberDraft),
    /// Remove the member at this zero-based index.
    Remove(usize),
    /// Leave setup.
    Done,
    /// Redraw.
    Show,
    /// Print help.
    Help,
    /// Exit the driver.
    Quit,
}

impl FromStr for Command {
    type Err = ShellError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));
        let unknown = || ShellError::UnknownCommand(line.to_string());
        let argument = |value: &str| {
            if value.is_empty() {
                Err(unknown())
            } else {
                Ok(value.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "" | "show" | "look" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "open" | "go" => rest.parse().map(Self::Open),
            "start" | "play" => Ok(Self::Start),
            "name" => argument(rest).map(Self::Name),
            "photo" => argument(rest).map(Self::Photo),
            "pick" | "answer" => argument(rest).map(Self::Pick),
            "move" => rest.parse().map(Self::Move).map_err(|_| unknown()),
            "replay" | "listen" => Ok(Self::Replay),
            "again" => Ok(Self::Again),
            "home" | "back" => Ok(Self::Home),
            "done" | "finish" => Ok(Self::Done),
            "add" => parse_draft(rest).map(Self::Add).ok_or_else(unknown),
            "remove" | "delete" => rest
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .map(Self::Remove)
                .ok_or_else(unknown),
            other => other.parse().map(Self::Move).map_err(|_| unknown()),
        }
    }
}

fn parse_draft(rest: &str) -> Option<MemberDraft> {
    let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
    match fields.as_slice() {
        [name, relationship, photo] => Some(MemberDraft::new(*name, *relationship, *photo)),
        [name, relationship, photo, voice] => {
            Some(MemberDraft::new(*name, *relationship, *photo).with_voice(*voice))
        }
        _ => None,
    }
}

impl Command {
    /// Run the command against `app`.
    ///
    /// `Show`, `Help` and `Quit` change nothing and return no events.
    ///
    /// # Errors
    /// Whatever the corresponding [`App`] method returns.
    pub fn apply<N: Navigator, R: Rng>(self, app: &mut App<N, R>) -> Result<Vec<ShellEvent>> {
        match self {
            Self::Open(screen) => Ok(app.open(screen)),
            Self::Start => app.start_game(),
            Self::Name(name) => app.select_name(&name),
            Self::Photo(name) => app.select_photo(&name),
            Self::Move(direction) => app.move_in(direction),
            Self::Pick(name) => app.answer(&name),
            Self::Replay => app.replay(),
            Self::Again => app.play_again(),
            Self::Home => Ok(app.back_home()),
            Self::Add(draft) => app.add_member(&draft),
            Self::Remove(index) => app.remove_member(index),
            Self::Done => app.finish_setup(),
            Self::Show | Self::Help | Self::Quit => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        line.parse().expect(line)
    }

    #[test]
    fn parses_game_commands() {
        assert_eq!(parse("open meet"), Command::Open(Screen::MeetMyFamily));
        assert_eq!(parse("  START "), Command::Start);
        assert_eq!(parse("name Aunt May"), Command::Name("Aunt May".into()));
        assert_eq!(parse("photo mom"), Command::Photo("mom".into()));
        assert_eq!(parse("up"), Command::Move(Direction::Up));
        assert_eq!(parse("r"), Command::Move(Direction::Right));
        assert_eq!(parse("move left"), Command::Move(Direction::Left));
        assert_eq!(parse("pick Dad"), Command::Pick("Dad".into()));
        assert_eq!(parse(""), Command::Show);
    }

    #[test]
    fn parses_setup_commands() {
        assert_eq!(
            parse("add Mom | Mother | mom.jpg"),
            Command::Add(MemberDraft::new("Mom", "Mother", "mom.jpg"))
        );
        assert_eq!(
            parse("add Dad|Father|dad.png|dad.wav"),
            Command::Add(MemberDraft::new("Dad", "Father", "dad.png").with_voice("dad.wav"))
        );
        assert_eq!(parse("remove 1"), Command::Remove(0));
        assert_eq!(parse("done"), Command::Done);
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in ["name", "add Mom | Mother", "remove 0", "remove x", "open garden", "dance"] {
            assert!(line.parse::<Command>().is_err(), "{line} should not parse");
        }
    }
}
