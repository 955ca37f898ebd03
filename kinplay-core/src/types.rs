//! Core type definitions: family members, the roster, and grid geometry.
//!
//! All persisted types are serializable; the on-disk roster is a plain JSON
//! array of [`FamilyMember`] records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KinError, Result};

// ---------------------------------------------------------------------------
// Family members
// ---------------------------------------------------------------------------

/// One roster entry.
///
/// Serialized as `{ "name", "relationship", "image", "audio" }`, with
/// `audio` set to `null` when the member has no voice clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FamilyMember {
    /// Display name, e.g. "Maya".
    pub name: String,
    /// Free-text relationship label, e.g. "Mother".
    pub relationship: String,
    /// File name of the photo inside the image directory.
    #[serde(rename = "image")]
    pub image_ref: String,
    /// File name of the voice clip inside the audio directory, if any.
    #[serde(rename = "audio", default)]
    pub audio_ref: Option<String>,
}

impl FamilyMember {
    /// Create a member without a voice clip.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        relationship: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            relationship: relationship.into(),
            image_ref: image_ref.into(),
            audio_ref: None,
        }
    }

    /// Attach a voice clip reference.
    #[must_use]
    pub fn with_audio(mut self, audio_ref: impl Into<String>) -> Self {
        self.audio_ref = Some(audio_ref.into());
        self
    }

    /// Whether this member can take part in the voice quiz.
    ///
    /// A blank audio reference counts as no clip.
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.audio_ref
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty())
    }

    /// Check that name, relationship and photo are all present.
    ///
    /// # Errors
    /// Returns [`KinError::InvalidMember`] naming the first blank field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("relationship", &self.relationship),
            ("image", &self.image_ref),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(KinError::InvalidMember {
                    reason: format!("{field} must not be empty"),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for FamilyMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.relationship)
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// The ordered family roster.
///
/// Order only matters for display; the games treat the roster as a set.
/// An empty roster means the parent has not finished setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    members: Vec<FamilyMember>,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster holds no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    /// Iterate over members in insertion order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, FamilyMember> {
        self.members.iter()
    }

    /// Member at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FamilyMember> {
        self.members.get(index)
    }

    /// Append a member.
    pub fn push(&mut self, member: FamilyMember) {
        self.members.push(member);
    }

    /// Remove and return the member at `index`.
    ///
    /// # Errors
    /// Returns [`KinError::IndexOutOfRange`] if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Result<FamilyMember> {
        if index >= self.members.len() {
            return Err(KinError::IndexOutOfRange {
                index,
                len: self.members.len(),
            });
        }
        Ok(self.members.remove(index))
    }

    /// Members that have a voice clip, in roster order.
    #[must_use]
    pub fn with_audio(&self) -> Vec<FamilyMember> {
        self.members.iter().filter(|m| m.has_audio()).cloned().collect()
    }

    /// All names in roster order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    /// First member whose name matches exactly.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&FamilyMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Whether a member with this name exists, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn contains_name_ignore_case(&self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        self.members
            .iter()
            .any(|m| m.name.trim().to_lowercase() == wanted)
    }

    /// Names that occur more than once, each reported once.
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for m in &self.members {
            if !seen.insert(m.name.as_str()) && !dups.contains(&m.name) {
                dups.push(m.name.clone());
            }
        }
        dups
    }

    /// Fail on the first name that occurs more than once.
    ///
    /// # Errors
    /// Returns [`KinError::DuplicateName`] naming the repeated member.
    pub fn ensure_unique_names(&self) -> Result<()> {
        match self.duplicate_names().into_iter().next() {
            Some(name) => Err(KinError::DuplicateName(name)),
            None => Ok(()),
        }
    }
}

impl From<Vec<FamilyMember>> for Roster {
    fn from(members: Vec<FamilyMember>) -> Self {
        Self { members }
    }
}

impl FromIterator<FamilyMember> for Roster {
    fn from_iter<I: IntoIterator<Item = FamilyMember>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a FamilyMember;
    type IntoIter = std::slice::Iter<'a, FamilyMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

// ---------------------------------------------------------------------------
// Grid geometry
// ---------------------------------------------------------------------------

/// A cell on the maze grid, zero-based from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index (0 = top).
    pub row: usize,
    /// Column index (0 = left).
    pub col: usize,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell in `direction`, or `None` when it would fall
    /// off a `rows` × `cols` grid.
    #[must_use]
    pub fn step(self, direction: Direction, rows: usize, cols: usize) -> Option<Self> {
        let (dr, dc) = direction.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < rows && col < cols).then_some(Self { row, col })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// One of the four maze moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit `(row, col)` delta for this direction.
    #[must_use]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

impl FromStr for Direction {
    type Err = KinError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Ok(Self::Up),
            "down" | "d" => Ok(Self::Down),
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            other => Err(KinError::UnknownDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mom() -> FamilyMember {
        FamilyMember::new("Mom", "Mother", "mom.jpg").with_audio("mom.mp3")
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert!(mom().validate().is_ok());
        let blank_name = FamilyMember::new("  ", "Mother", "mom.jpg");
        assert!(matches!(
            blank_name.validate(),
            Err(KinError::InvalidMember { .. })
        ));
        let no_photo = FamilyMember::new("Mom", "Mother", "");
        assert!(no_photo.validate().is_err());
    }

    #[test]
    fn blank_audio_is_not_audio() {
        let member = FamilyMember::new("Dad", "Father", "dad.jpg").with_audio("");
        assert!(!member.has_audio());
        assert!(mom().has_audio());
    }

    #[test]
    fn serializes_with_short_keys() {
        let json = serde_json::to_value(FamilyMember::new("Dad", "Father", "dad.jpg"))
            .expect("serialize");
        assert_eq!(json["image"], "dad.jpg");
        assert!(json["audio"].is_null());
    }

    #[test]
    fn missing_audio_key_deserializes_as_none() {
        let member: FamilyMember =
            serde_json::from_str(r#"{"name":"Gran","relationship":"Grandma","image":"g.png"}"#)
                .expect("deserialize");
        assert_eq!(member.audio_ref, None);
    }

    #[test]
    fn roster_remove_out_of_range() {
        let mut roster = Roster::from(vec![mom()]);
        assert!(matches!(
            roster.remove(3),
            Err(KinError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert_eq!(roster.remove(0).expect("remove").name, "Mom");
        assert!(roster.is_empty());
    }

    #[test]
    fn duplicate_names_reported_once() {
        let roster: Roster = vec![mom(), mom(), mom(), FamilyMember::new("Dad", "Father", "d.jpg")]
            .into_iter()
            .collect();
        assert_eq!(roster.duplicate_names(), vec!["Mom".to_string()]);
        assert!(roster.contains_name_ignore_case(" mom "));
        assert!(matches!(
            roster.ensure_unique_names(),
            Err(KinError::DuplicateName(name)) if name == "Mom"
        ));
        assert!(Roster::from(vec![mom()]).ensure_unique_names().is_ok());
    }

    #[test]
    fn step_stays_on_grid() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Direction::Up, 5, 5), None);
        assert_eq!(origin.step(Direction::Left, 5, 5), None);
        assert_eq!(origin.step(Direction::Down, 5, 5), Some(Position::new(1, 0)));
        assert_eq!(Position::new(4, 4).step(Direction::Right, 5, 5), None);
    }

    #[test]
    fn direction_parses_short_forms() {
        assert_eq!("U".parse::<Direction>().expect("parse"), Direction::Up);
        assert_eq!("right".parse::<Direction>().expect("parse"), Direction::Right);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(KinError::UnknownDirection(d)) if d == "sideways"
        ));
    }
}
