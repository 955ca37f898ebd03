//! Meet My Family: match each name to its photo.
//!
//! The round shows two independently shuffled columns: names and photos.
//! The child picks a name, then a photo. A pick of the right photo marks the
//! name as matched; either way the name selection is used up. The round is
//! won once every name is matched.
//!
//! Names are the matching key, so a roster with two members of the same name
//! cannot be scored and is refused at start.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::Result;
use crate::session::{Feedback, GameSession, Readiness, Stage};
use crate::types::{FamilyMember, Roster};

/// What a matching action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The action was not valid in the current state; nothing changed.
    Ignored,
    /// A name is now selected.
    NameSelected,
    /// A photo was picked with no name selected; nothing changed.
    NeedName,
    /// Right photo for the selected name.
    Correct,
    /// Wrong photo; the selection was cleared.
    TryAgain,
    /// Right photo, and it was the last one.
    Completed,
}

/// State of one Meet-My-Family round.
#[derive(Debug, Clone, Default)]
pub struct MatchingSession {
    stage: Stage,
    shuffled_names: Vec<String>,
    shuffled_photos: Vec<FamilyMember>,
    matched: BTreeSet<String>,
    selected_name: Option<String>,
    message: Option<Feedback>,
}

impl MatchingSession {
    /// A session in [`Stage::NotStarted`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry check: at least one member.
    #[must_use]
    pub fn readiness(roster: &Roster) -> Readiness {
        Readiness::evaluate(roster, roster.len(), 1)
    }

    /// Members shown in the meet-the-family intro, in roster order.
    #[must_use]
    pub fn intro_members(roster: &Roster) -> Vec<FamilyMember> {
        roster.members().to_vec()
    }

    /// Start a round from `roster`.
    ///
    /// Draws one permutation of the names and an independent permutation of
    /// the members for the photo column.
    ///
    /// # Errors
    ///
    /// Returns [`crate::KinError::SetupIncomplete`] for an empty roster, or
    /// [`crate::KinError::DuplicateName`] if two members share a name.
    pub fn start<R: Rng + ?Sized>(&mut self, roster: &Roster, rng: &mut R) -> Result<()> {
        Self::readiness(roster).into_result(Self::TITLE)?;
        roster.ensure_unique_names()?;

        let mut names = roster.names();
        names.shuffle(rng);
        let mut photos = roster.members().to_vec();
        photos.shuffle(rng);

        self.shuffled_names = names;
        self.shuffled_photos = photos;
        self.matched.clear();
        self.selected_name = None;
        self.message = None;
        self.stage = Stage::InProgress;

        debug!(members = roster.len(), "Matching round started");
        Ok(())
    }

    /// Pick a name from the names column.
    ///
    /// Ignored unless the round is in progress and `name` is an unmatched
    /// name of this round.
    pub fn select_name(&mut self, name: &str) -> MatchOutcome {
        if self.stage != Stage::InProgress
            || self.matched.contains(name)
            || !self.shuffled_names.iter().any(|n| n == name)
        {
            return MatchOutcome::Ignored;
        }
        self.selected_name = Some(name.to_string());
        self.message = None;
        debug!(name, "Name selected");
        MatchOutcome::NameSelected
    }

    /// Pick a photo from the photos column.
    ///
    /// With no name selected this changes nothing and returns
    /// [`MatchOutcome::NeedName`]; the caller may prompt for a name.
    pub fn select_photo(&mut self, member: &FamilyMember) -> MatchOutcome {
        if self.stage != Stage::InProgress
            || self.matched.contains(&member.name)
            || !self.shuffled_photos.iter().any(|p| p.name == member.name)
        {
            return MatchOutcome::Ignored;
        }
        let Some(selected) = self.selected_name.take() else {
            return MatchOutcome::NeedName;
        };

        if selected == member.name {
            self.matched.insert(selected);
            self.message = Some(Feedback::Correct);
            debug!(
                name = %member.name,
                matched = self.matched.len(),
                total = self.total(),
                "Correct match"
            );
            if self.matched.len() == self.total() {
                self.stage = Stage::Completed;
                debug!("Matching round completed");
                return MatchOutcome::Completed;
            }
            MatchOutcome::Correct
        } else {
            self.message = Some(Feedback::TryAgain);
            debug!(selected = %selected, photo = %member.name, "Wrong match");
            MatchOutcome::TryAgain
        }
    }

    /// Names column, in display order.
    #[must_use]
    pub fn shuffled_names(&self) -> &[String] {
        &self.shuffled_names
    }

    /// Photos column, in display order.
    #[must_use]
    pub fn shuffled_photos(&self) -> &[FamilyMember] {
        &self.shuffled_photos
    }

    /// Names matched so far.
    #[must_use]
    pub fn matched(&self) -> &BTreeSet<String> {
        &self.matched
    }

    /// Whether `name` has been matched.
    #[must_use]
    pub fn is_matched(&self, name: &str) -> bool {
        self.matched.contains(name)
    }

    /// Currently selected name.
    #[must_use]
    pub fn selected_name(&self) -> Option<&str> {
        self.selected_name.as_deref()
    }

    /// Number of names in the round.
    #[must_use]
    pub fn total(&self) -> usize {
        self.shuffled_names.len()
    }

    /// Names still to match.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total() - self.matched.len()
    }
}

impl GameSession for MatchingSession {
    const TITLE: &'static str = "Meet My Family";

    fn stage(&self) -> Stage {
        self.stage
    }

    fn message(&self) -> Option<&Feedback> {
        self.message.as_ref()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
