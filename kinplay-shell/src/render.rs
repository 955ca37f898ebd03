//! Plain-text drawing of the current screen.
//!
//! This is the console front end's whole "renderer": it reads the app and
//! draws it, nothing more. Photos and clips are shown by file name.

use std::fmt;

use rand::Rng;

use kinplay_core::games::maze::Cell;
use kinplay_core::games::{MatchingSession, MazeSession, QuizSession};
use kinplay_core::{GameSession, Position, Roster, Stage};

use crate::dispatcher::{ActiveGame, App, Navigator};
use crate::screens::Screen;

/// Borrowed view of an [`App`] that draws itself.
pub struct View<'a, N: Navigator, R: Rng>(pub &'a App<N, R>);

/// Draw the current screen.
#[must_use]
pub fn render<N: Navigator, R: Rng>(app: &App<N, R>) -> String {
    View(app).to_string()
}

impl<N: Navigator, R: Rng> fmt::Display for View<'_, N, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let app = self.0;
        writeln!(f, "=== {} ===", app.screen().title())?;
        match (app.screen(), app.game()) {
            (_, Some(ActiveGame::Matching(s))) => matching(f, s, app.roster()),
            (_, Some(ActiveGame::Maze(s))) => maze(f, s),
            (_, Some(ActiveGame::Quiz(s))) => quiz(f, s, app.roster()),
            (Screen::Setup, None) => setup(f, app.roster()),
            _ => home(f, app),
        }
    }
}

fn home<N: Navigator, R: Rng>(f: &mut fmt::Formatter<'_>, app: &App<N, R>) -> fmt::Result {
    writeln!(f, "Hello! What would you like to play?")?;
    for game in Screen::GAMES {
        let note = if app.readiness(game).is_ready() {
            ""
        } else {
            "  (needs more family members)"
        };
        writeln!(f, "  open {:<16}{}{note}", game.route(), game.title())?;
    }
    writeln!(f, "  open {:<16}Parents: family setup", Screen::Setup.route())
}

fn setup(f: &mut fmt::Formatter<'_>, roster: &Roster) -> fmt::Result {
    if roster.is_empty() {
        writeln!(f, "No family members yet.")?;
    }
    for (i, member) in roster.iter().enumerate() {
        let voice = member
            .audio_ref
            .as_deref()
            .filter(|_| member.has_audio())
            .map_or_else(String::new, |a| format!(", voice {a}"));
        writeln!(
            f,
            "  {}. {} - {} (photo {}{voice})",
            i + 1,
            member.name,
            member.relationship,
            member.image_ref
        )?;
    }
    writeln!(f, "add <name> | <relationship> | <photo> [| <voice>], remove <number>, done")
}

fn matching(f: &mut fmt::Formatter<'_>, s: &MatchingSession, roster: &Roster) -> fmt::Result {
    match s.stage() {
        Stage::NotStarted => {
            writeln!(f, "Let's meet your family!")?;
            for member in MatchingSession::intro_members(roster) {
                writeln!(f, "  [{}] {} - {}", member.image_ref, member.name, member.relationship)?;
            }
            writeln!(f, "Type 'start' to play.")
        }
        Stage::InProgress | Stage::Completed => {
            writeln!(f, "Matched {} of {}", s.matched().len(), s.total())?;
            writeln!(f, "Names:")?;
            for name in s.shuffled_names() {
                let mark = if s.is_matched(name) {
                    "x"
                } else if s.selected_name() == Some(name.as_str()) {
                    ">"
                } else {
                    " "
                };
                writeln!(f, "  [{mark}] {name}")?;
            }
            writeln!(f, "Photos:")?;
            for photo in s.shuffled_photos() {
                if s.is_matched(&photo.name) {
                    writeln!(f, "  [x] {} = {}", photo.image_ref, photo.name)?;
                } else {
                    writeln!(f, "  [ ] {}", photo.image_ref)?;
                }
            }
            footer(f, s)
        }
    }
}

fn maze(f: &mut fmt::Formatter<'_>, s: &MazeSession) -> fmt::Result {
    if s.stage() == Stage::NotStarted {
        writeln!(f, "Help find your family member in the maze!")?;
        return writeln!(f, "Type 'start' to play.");
    }
    if let Some(target) = s.target() {
        writeln!(f, "Find {} ({})", target.name, target.relationship)?;
    }
    let layout = s.layout();
    for row in 0..layout.rows() {
        let line: String = (0..layout.cols())
            .map(|col| match s.cell(Position::new(row, col)) {
                Cell::Wall => '#',
                Cell::Path => '.',
                Cell::Child => 'C',
                Cell::Target => 'T',
                Cell::Decoy => '?',
            })
            .flat_map(|c| [c, ' '])
            .collect();
        writeln!(f, "  {}", line.trim_end())?;
    }
    footer(f, s)
}

fn quiz(f: &mut fmt::Formatter<'_>, s: &QuizSession, roster: &Roster) -> fmt::Result {
    match s.stage() {
        Stage::NotStarted => {
            writeln!(f, "Listen to your family's voices first:")?;
            for member in QuizSession::intro_members(roster) {
                writeln!(
                    f,
                    "  {} - {} ({})",
                    member.name,
                    member.relationship,
                    member.audio_ref.as_deref().unwrap_or_default()
                )?;
            }
            writeln!(f, "Type 'start' to play.")
        }
        Stage::InProgress | Stage::Completed => {
            writeln!(f, "Who is speaking? (type 'replay' to listen again)")?;
            for option in s.options() {
                writeln!(f, "  [{}] {}", option.image_ref, option.name)?;
            }
            footer(f, s)
        }
    }
}

fn footer<G: GameSession>(f: &mut fmt::Formatter<'_>, s: &G) -> fmt::Result {
    if let Some(message) = s.message() {
        writeln!(f, "{message}")?;
    }
    if s.is_complete() {
        writeln!(f, "Type 'again' to play again or 'home' to go back.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::MemberDraft;
    use kinplay_core::config::KinConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app(dir: &tempfile::TempDir) -> App<fn(Screen), StdRng> {
        let mut config = KinConfig::default();
        config.storage.data_file = dir.path().join("family_data.json");
        config.storage.image_dir = dir.path().join("images");
        config.storage.audio_dir = dir.path().join("audio");
        let ignore: fn(Screen) = |_| {};
        App::new(config, ignore, StdRng::seed_from_u64(5)).expect("app")
    }

    #[test]
    fn home_marks_unready_games() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = app(&dir);
        let text = render(&app);
        assert!(text.starts_with("=== Know My Family ==="));
        assert_eq!(text.matches("needs more family members").count(), 3);
    }

    #[test]
    fn maze_draws_grid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(&dir);
        app.open(Screen::Setup);
        app.add_member(&MemberDraft::new("Mom", "Mother", "mom.jpg")).expect("add");
        app.add_member(&MemberDraft::new("Dad", "Father", "dad.jpg")).expect("add");
        app.open(Screen::FindMyFamily);
        app.start_game().expect("start");

        let text = render(&app);
        let grid: Vec<&str> = text.lines().skip(2).take(5).collect();
        assert_eq!(
            grid,
            vec![
                "  C . # . .",
                "  # . # . #",
                "  . . . . .",
                "  . # # . #",
                "  ? . . . T",
            ]
        );
    }

    #[test]
    fn setup_lists_members_from_one() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(&dir);
        app.open(Screen::Setup);
        app.add_member(&MemberDraft::new("Mom", "Mother", "mom.jpg").with_voice("mom.mp3"))
            .expect("add");
        let text = render(&app);
        assert!(text.contains("  1. Mom - Mother (photo mom.jpg, voice mom.mp3)"));
    }

    #[test]
    fn meet_intro_shows_every_member() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(&dir);
        app.open(Screen::Setup);
        app.add_member(&MemberDraft::new("Mom", "Mother", "mom.jpg")).expect("add");
        app.add_member(&MemberDraft::new("Dad", "Father", "dad.jpg")).expect("add");
        app.open(Screen::MeetMyFamily);

        let text = render(&app);
        assert!(text.contains("Let's meet your family!"));
        assert!(text.contains("  [mom.jpg] Mom - Mother"));
        assert!(text.contains("  [dad.jpg] Dad - Father"));
    }
}
