//! Who Is Speaking?: listen to a voice clip and pick the speaker.
//!
//! Only members with a voice clip take part. A question is a target plus a
//! small set of choices that always contains the target exactly once. Wrong
//! answers leave the question in place so the child can guess again; the
//! clip can be replayed any number of times.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::config::QuizConfig;
use crate::error::Result;
use crate::session::{Feedback, GameSession, Readiness, Stage};
use crate::types::{FamilyMember, Roster};

/// What an answer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizOutcome {
    /// No question is open; nothing changed.
    Ignored,
    /// The child picked the speaker.
    Correct,
    /// Wrong pick; the question stays.
    TryAgain,
}

/// State of one Who-Is-Speaking question.
#[derive(Debug, Clone)]
pub struct QuizSession {
    option_count: usize,
    min_voices: usize,
    stage: Stage,
    target: Option<FamilyMember>,
    options: Vec<FamilyMember>,
    message: Option<Feedback>,
}

impl QuizSession {
    /// A session in [`Stage::NotStarted`].
    #[must_use]
    pub fn new(config: &QuizConfig) -> Self {
        Self {
            option_count: config.option_count.max(2),
            min_voices: config.min_voices.max(2),
            stage: Stage::NotStarted,
            target: None,
            options: Vec::new(),
            message: None,
        }
    }

    /// Entry check: enough members with a voice clip.
    #[must_use]
    pub fn readiness(&self, roster: &Roster) -> Readiness {
        let voices = roster.iter().filter(|m| m.has_audio()).count();
        Readiness::evaluate(roster, voices, self.min_voices)
    }

    /// Members shown in the listen-first intro.
    #[must_use]
    pub fn intro_members(roster: &Roster) -> Vec<FamilyMember> {
        roster.with_audio()
    }

    /// Draw a fresh question.
    ///
    /// The target is uniform over members with a voice clip. The choices
    /// are `min(option_count, n)` distinct members in random order; if the
    /// sample missed the target, the target takes a random slot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::KinError::SetupIncomplete`] for an empty roster,
    /// [`crate::KinError::InsufficientData`] with fewer than two voices, or
    /// [`crate::KinError::DuplicateName`] if two members share a name.
    pub fn new_question<R: Rng + ?Sized>(&mut self, roster: &Roster, rng: &mut R) -> Result<()> {
        self.readiness(roster).into_result(Self::TITLE)?;
        roster.ensure_unique_names()?;
        let voices = roster.with_audio();

        let target_idx = rng.gen_range(0..voices.len());
        let k = self.option_count.min(voices.len());

        let mut picks: Vec<usize> = (0..voices.len()).collect();
        picks.shuffle(rng);
        picks.truncate(k);
        if !picks.contains(&target_idx) {
            let slot = rng.gen_range(0..k);
            picks[slot] = target_idx;
        }

        self.target = Some(voices[target_idx].clone());
        self.options = picks.into_iter().map(|i| voices[i].clone()).collect();
        self.message = None;
        self.stage = Stage::InProgress;

        debug!(
            target = %voices[target_idx].name,
            options = self.options.len(),
            "Quiz question drawn"
        );
        Ok(())
    }

    /// Answer the open question. Members are compared by name.
    pub fn answer(&mut self, member: &FamilyMember) -> QuizOutcome {
        if self.stage != Stage::InProgress {
            return QuizOutcome::Ignored;
        }
        let Some(target) = &self.target else {
            return QuizOutcome::Ignored;
        };

        if member.name == target.name {
            self.message = Some(Feedback::Correct);
            self.stage = Stage::Completed;
            debug!(answer = %member.name, "Speaker identified");
            QuizOutcome::Correct
        } else {
            self.message = Some(Feedback::TryAgain);
            debug!(answer = %member.name, "Wrong speaker");
            QuizOutcome::TryAgain
        }
    }

    /// The target's voice clip reference. Does not change the session.
    #[must_use]
    pub fn replay_audio(&self) -> Option<&str> {
        self.target.as_ref().and_then(|t| t.audio_ref.as_deref())
    }

    /// The member whose voice is playing.
    #[must_use]
    pub fn target(&self) -> Option<&FamilyMember> {
        self.target.as_ref()
    }

    /// Choices in display order.
    #[must_use]
    pub fn options(&self) -> &[FamilyMember] {
        &self.options
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(&QuizConfig::default())
    }
}

impl GameSession for QuizSession {
    const TITLE: &'static str = "Who Is Speaking?";

    fn stage(&self) -> Stage {
        self.stage
    }

    fn message(&self) -> Option<&Feedback> {
        self.message.as_ref()
    }

    fn reset(&mut self) {
        self.stage = Stage::NotStarted;
        self.target = None;
        self.options.clear();
        self.message = None;
    }
}
