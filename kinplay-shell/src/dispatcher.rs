//! The application state machine.
//!
//! [`App`] owns the configuration, a roster snapshot, the visible screen and
//! at most one live game session. Front ends call one method per user
//! action and get back a list of [`ShellEvent`]s; they then re-read the app
//! to redraw. Screen changes are also pushed to a [`Navigator`], which is the
//! only outward coupling a game has.
//!
//! The roster snapshot is refreshed whenever a screen is opened, so a game
//! always plays against what was on disk when it was entered.

use rand::Rng;
use tracing::{debug, info};

use kinplay_core::config::KinConfig;
use kinplay_core::games::{
    MatchOutcome, MatchingSession, MazeLayout, MazeSession, MoveOutcome, QuizOutcome, QuizSession,
};
use kinplay_core::{Direction, Feedback, FamilyMember, GameSession, Readiness, Roster, Stage};

use crate::error::{Result, ShellError};
use crate::events::ShellEvent;
use crate::screens::Screen;
use crate::setup::{MemberDraft, SetupFlow};

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// Receives every screen change the app makes.
pub trait Navigator {
    /// The app has switched to `to`.
    fn navigate(&mut self, to: Screen);
}

impl<F: FnMut(Screen)> Navigator for F {
    fn navigate(&mut self, to: Screen) {
        self(to);
    }
}

// ---------------------------------------------------------------------------
// Active game
// ---------------------------------------------------------------------------

/// The one live game session.
#[derive(Debug, Clone)]
pub enum ActiveGame {
    /// Meet My Family.
    Matching(MatchingSession),
    /// Find My Family.
    Maze(MazeSession),
    /// Who Is Speaking?
    Quiz(QuizSession),
}

impl ActiveGame {
    /// Screen hosting this game.
    #[must_use]
    pub fn screen(&self) -> Screen {
        match self {
            Self::Matching(_) => Screen::MeetMyFamily,
            Self::Maze(_) => Screen::FindMyFamily,
            Self::Quiz(_) => Screen::WhoIsSpeaking,
        }
    }

    /// Stage of the session.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Matching(s) => s.stage(),
            Self::Maze(s) => s.stage(),
            Self::Quiz(s) => s.stage(),
        }
    }

    /// Transient message of the session.
    #[must_use]
    pub fn message(&self) -> Option<&Feedback> {
        match self {
            Self::Matching(s) => s.message(),
            Self::Maze(s) => s.message(),
            Self::Quiz(s) => s.message(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Matching(s) => s.reset(),
            Self::Maze(s) => s.reset(),
            Self::Quiz(s) => s.reset(),
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Screen routing, the live session and the setup flow.
pub struct App<N: Navigator, R: Rng> {
    config: KinConfig,
    layout: MazeLayout,
    setup: SetupFlow,
    roster: Roster,
    screen: Screen,
    game: Option<ActiveGame>,
    navigator: N,
    rng: R,
}

impl<N: Navigator, R: Rng> App<N, R> {
    /// Build the app on the Home screen.
    ///
    /// Validates the maze layout, creates the asset directories and loads
    /// the roster.
    ///
    /// # Errors
    ///
    /// Returns a config error for an invalid maze layout, or an I/O error
    /// if the asset directories cannot be created.
    pub fn new(config: KinConfig, navigator: N, rng: R) -> Result<Self> {
        let layout = MazeLayout::from_config(&config.maze)?;
        let setup = SetupFlow::from_config(&config);
        setup.assets().ensure_dirs()?;
        let roster = setup.roster();
        info!(
            members = roster.len(),
            data_file = %config.storage.data_file.display(),
            "Application ready"
        );
        Ok(Self {
            config,
            layout,
            setup,
            roster,
            screen: Screen::Home,
            game: None,
            navigator,
            rng,
        })
    }

    /// Screen currently showing.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Roster snapshot the current screen was opened with.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Live game session, if a game screen is showing.
    #[must_use]
    pub fn game(&self) -> Option<&ActiveGame> {
        self.game.as_ref()
    }

    /// Application config.
    #[must_use]
    pub fn config(&self) -> &KinConfig {
        &self.config
    }

    /// The setup flow.
    #[must_use]
    pub fn setup(&self) -> &SetupFlow {
        &self.setup
    }

    /// Readiness of `game` against the current roster snapshot.
    #[must_use]
    pub fn readiness(&self, game: Screen) -> Readiness {
        match game {
            Screen::MeetMyFamily => MatchingSession::readiness(&self.roster),
            Screen::FindMyFamily => MazeSession::readiness(&self.roster, &self.layout),
            Screen::WhoIsSpeaking => QuizSession::new(&self.config.quiz).readiness(&self.roster),
            Screen::Home | Screen::Setup => Readiness::Ready,
        }
    }

    // -- navigation ---------------------------------------------------------

    /// Open `screen`.
    ///
    /// A game screen is entered only if the roster is ready for it. An empty
    /// roster sends the app to Setup; too few suitable members keeps the
    /// current screen, or falls back to Home from another game. A game is
    /// entered on its intro stage.
    pub fn open(&mut self, screen: Screen) -> Vec<ShellEvent> {
        self.roster = self.setup.roster();
        if let Some(game) = &mut self.game {
            game.reset();
        }
        self.game = None;

        let mut events = Vec::new();
        if screen.is_game() {
            match self.readiness(screen) {
                Readiness::Ready => {}
                Readiness::SetupIncomplete => {
                    info!(game = %screen, "Setup incomplete, routing to setup");
                    events.push(ShellEvent::SetupRequired { game: screen });
                    events.push(self.go(Screen::Setup));
                    return events;
                }
                Readiness::InsufficientData {
                    required,
                    available,
                } => {
                    info!(game = %screen, required, available, "Not enough members");
                    events.push(ShellEvent::NotEnoughMembers {
                        game: screen,
                        required,
                        available,
                    });
                    if self.screen.is_game() {
                        events.push(self.go(Screen::Home));
                    }
                    return events;
                }
            }
            self.game = Some(match screen {
                Screen::MeetMyFamily => ActiveGame::Matching(MatchingSession::new()),
                Screen::FindMyFamily => ActiveGame::Maze(MazeSession::new(self.layout.clone())),
                _ => ActiveGame::Quiz(QuizSession::new(&self.config.quiz)),
            });
        }

        events.push(self.go(screen));
        if screen == Screen::Setup {
            events.extend(self.setup.missing_assets(&self.roster));
        }
        events
    }

    /// Reset the live game, if any, and return Home.
    pub fn back_home(&mut self) -> Vec<ShellEvent> {
        self.open(Screen::Home)
    }

    fn go(&mut self, to: Screen) -> ShellEvent {
        let from = self.screen;
        self.screen = to;
        self.navigator.navigate(to);
        info!(%from, %to, "Screen changed");
        ShellEvent::Navigated { from, to }
    }

    // -- game lifecycle -----------------------------------------------------

    /// Leave the intro and start playing.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::WrongScreen`] off a game screen, or the engine's
    /// start error (for example duplicate names in Meet My Family).
    pub fn start_game(&mut self) -> Result<Vec<ShellEvent>> {
        let screen = self.screen;
        let game = self.game.as_mut().ok_or(ShellError::WrongScreen {
            action: "start",
            screen,
        })?;
        match game {
            ActiveGame::Matching(s) => s.start(&self.roster, &mut self.rng)?,
            ActiveGame::Maze(s) => s.start(&self.roster, &mut self.rng)?,
            ActiveGame::Quiz(s) => s.new_question(&self.roster, &mut self.rng)?,
        }
        let mut events = vec![ShellEvent::RoundStarted(screen)];
        events.extend(self.clip_event());
        Ok(events)
    }

    /// Reset the live game and start a fresh round.
    ///
    /// # Errors
    /// Same as [`App::start_game`].
    pub fn play_again(&mut self) -> Result<Vec<ShellEvent>> {
        let screen = self.screen;
        let game = self.game.as_mut().ok_or(ShellError::WrongScreen {
            action: "again",
            screen,
        })?;
        game.reset();
        debug!(game = %screen, "Play again");
        self.start_game()
    }

    // -- Meet My Family -----------------------------------------------------

    /// Pick a name. Names are matched ignoring case.
    ///
    /// # Errors
    ///
    /// [`ShellError::WrongScreen`] outside Meet My Family, or
    /// [`ShellError::UnknownMember`] for a name not in the round.
    pub fn select_name(&mut self, name: &str) -> Result<Vec<ShellEvent>> {
        let session = self.matching("name")?;
        let Some(actual) = session
            .shuffled_names()
            .iter()
            .find(|n| n.eq_ignore_ascii_case(name.trim()))
            .cloned()
        else {
            return Err(ShellError::UnknownMember(name.trim().to_string()));
        };
        session.select_name(&actual);
        Ok(Vec::new())
    }

    /// Pick the photo of the member called `name`.
    ///
    /// # Errors
    ///
    /// [`ShellError::WrongScreen`] outside Meet My Family, or
    /// [`ShellError::UnknownMember`] for a photo not in the round.
    pub fn select_photo(&mut self, name: &str) -> Result<Vec<ShellEvent>> {
        let session = self.matching("photo")?;
        let photo = find_member(session.shuffled_photos(), name)?;
        let outcome = session.select_photo(&photo);
        let message = session.message().cloned();
        Ok(match outcome {
            MatchOutcome::Ignored | MatchOutcome::NameSelected => Vec::new(),
            MatchOutcome::NeedName => vec![ShellEvent::NeedName],
            MatchOutcome::Correct | MatchOutcome::TryAgain => {
                message.map(ShellEvent::Feedback).into_iter().collect()
            }
            MatchOutcome::Completed => vec![
                ShellEvent::Feedback(Feedback::Correct),
                ShellEvent::Celebrate(Screen::MeetMyFamily),
            ],
        })
    }

    fn matching(&mut self, action: &'static str) -> Result<&mut MatchingSession> {
        match &mut self.game {
            Some(ActiveGame::Matching(s)) => Ok(s),
            _ => Err(ShellError::WrongScreen {
                action,
                screen: self.screen,
            }),
        }
    }

    // -- Find My Family -----------------------------------------------------

    /// Move the child one cell.
    ///
    /// # Errors
    /// [`ShellError::WrongScreen`] outside Find My Family.
    pub fn move_in(&mut self, direction: Direction) -> Result<Vec<ShellEvent>> {
        let screen = self.screen;
        let Some(ActiveGame::Maze(session)) = &mut self.game else {
            return Err(ShellError::WrongScreen {
                action: "move",
                screen,
            });
        };
        let outcome = session.move_in(direction);
        let message = session.message().cloned();
        Ok(match outcome {
            MoveOutcome::Ignored | MoveOutcome::Moved => Vec::new(),
            MoveOutcome::Blocked | MoveOutcome::OutOfBounds | MoveOutcome::WrongPerson => {
                message.map(ShellEvent::Feedback).into_iter().collect()
            }
            MoveOutcome::Reached => vec![ShellEvent::Celebrate(Screen::FindMyFamily)],
        })
    }

    // -- Who Is Speaking? ---------------------------------------------------

    /// Answer with the member called `name`.
    ///
    /// # Errors
    ///
    /// [`ShellError::WrongScreen`] outside Who Is Speaking?, or
    /// [`ShellError::UnknownMember`] for a name not among the choices.
    pub fn answer(&mut self, name: &str) -> Result<Vec<ShellEvent>> {
        let session = self.quiz("pick")?;
        let choice = find_member(session.options(), name)?;
        Ok(match session.answer(&choice) {
            QuizOutcome::Ignored => Vec::new(),
            QuizOutcome::TryAgain => vec![ShellEvent::Feedback(Feedback::TryAgain)],
            QuizOutcome::Correct => vec![
                ShellEvent::Feedback(Feedback::Correct),
                ShellEvent::Celebrate(Screen::WhoIsSpeaking),
            ],
        })
    }

    /// Play the speaker's clip again.
    ///
    /// # Errors
    /// [`ShellError::WrongScreen`] outside Who Is Speaking?.
    pub fn replay(&mut self) -> Result<Vec<ShellEvent>> {
        self.quiz("replay")?;
        Ok(self.clip_event().into_iter().collect())
    }

    fn quiz(&mut self, action: &'static str) -> Result<&mut QuizSession> {
        match &mut self.game {
            Some(ActiveGame::Quiz(s)) => Ok(s),
            _ => Err(ShellError::WrongScreen {
                action,
                screen: self.screen,
            }),
        }
    }

    fn clip_event(&self) -> Option<ShellEvent> {
        let Some(ActiveGame::Quiz(session)) = &self.game else {
            return None;
        };
        let clip = session.replay_audio()?;
        let path = self.setup.assets().audio_dir().join(clip);
        Some(ShellEvent::PlayAudio(path.display().to_string()))
    }

    // -- Setup ----------------------------------------------------------------

    /// Add a family member from the setup screen.
    ///
    /// # Errors
    ///
    /// [`ShellError::WrongScreen`] off the setup screen, or the validation
    /// and I/O errors of [`SetupFlow::add_member`].
    pub fn add_member(&mut self, draft: &MemberDraft) -> Result<Vec<ShellEvent>> {
        self.require(Screen::Setup, "add")?;
        let (_, events) = self.setup.add_member(draft)?;
        self.roster = self.setup.roster();
        Ok(events)
    }

    /// Remove the member at `index` from the setup screen.
    ///
    /// # Errors
    ///
    /// [`ShellError::WrongScreen`] off the setup screen, or the errors of
    /// [`SetupFlow::remove_member`].
    pub fn remove_member(&mut self, index: usize) -> Result<Vec<ShellEvent>> {
        self.require(Screen::Setup, "remove")?;
        let removed = self.setup.remove_member(index)?;
        self.roster = self.setup.roster();
        Ok(vec![ShellEvent::MemberRemoved(removed.name)])
    }

    /// Leave setup for Home.
    ///
    /// # Errors
    ///
    /// [`ShellError::WrongScreen`] off the setup screen, or
    /// [`ShellError::RosterEmpty`] while the roster is empty.
    pub fn finish_setup(&mut self) -> Result<Vec<ShellEvent>> {
        self.require(Screen::Setup, "finish")?;
        self.setup.finish()?;
        Ok(self.open(Screen::Home))
    }

    fn require(&self, screen: Screen, action: &'static str) -> Result<()> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(ShellError::WrongScreen {
                action,
                screen: self.screen,
            })
        }
    }
}

fn find_member(members: &[FamilyMember], name: &str) -> Result<FamilyMember> {
    members
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
        .cloned()
        .ok_or_else(|| ShellError::UnknownMember(name.trim().to_string()))
}
