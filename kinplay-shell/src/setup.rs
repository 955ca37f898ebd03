//! The parent's setup flow: add and remove family members.
//!
//! Every edit goes straight through [`RosterStore`], so the file on disk is
//! authoritative after each call. A photo or voice clip given as a path to an
//! existing file is copied into the asset directory and stored by file name,
//! the same way an upload would be; a bare file name is stored as-is.

use std::path::Path;

use tracing::{info, warn};

use kinplay_core::assets::{AssetLibrary, extension_of};
use kinplay_core::config::{KinConfig, SetupConfig};
use kinplay_core::{FamilyMember, KinError, Roster, RosterStore};

use crate::error::{Result, ShellError};
use crate::events::ShellEvent;

/// What the parent typed into the add-member form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDraft {
    /// Display name.
    pub name: String,
    /// Relationship to the child.
    pub relationship: String,
    /// Photo file name or path.
    pub photo: String,
    /// Voice clip file name or path, if any.
    pub voice: Option<String>,
}

impl MemberDraft {
    /// A draft without a voice clip.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        relationship: impl Into<String>,
        photo: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            relationship: relationship.into(),
            photo: photo.into(),
            voice: None,
        }
    }

    /// Attach a voice clip.
    #[must_use]
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }
}

/// Add/remove operations over the roster file and the asset directories.
#[derive(Debug, Clone)]
pub struct SetupFlow {
    store: RosterStore,
    assets: AssetLibrary,
    rules: SetupConfig,
}

impl SetupFlow {
    /// Create a flow over an existing store and asset library.
    #[must_use]
    pub fn new(store: RosterStore, assets: AssetLibrary, rules: SetupConfig) -> Self {
        Self {
            store,
            assets,
            rules,
        }
    }

    /// Create a flow from the application config.
    #[must_use]
    pub fn from_config(config: &KinConfig) -> Self {
        Self::new(
            RosterStore::from_config(&config.storage),
            AssetLibrary::from_config(&config.storage),
            config.setup.clone(),
        )
    }

    /// Current roster, read from disk.
    #[must_use]
    pub fn roster(&self) -> Roster {
        self.store.load()
    }

    /// The asset library photos and clips are resolved against.
    #[must_use]
    pub fn assets(&self) -> &AssetLibrary {
        &self.assets
    }

    /// Validate `draft` against `roster` and the setup rules without
    /// touching the disk. Fields are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::InvalidMember`] for a blank field or a file type
    /// outside the accepted lists, and [`KinError::DuplicateName`] when the
    /// name is already on the roster (ignoring case).
    pub fn check(&self, draft: &MemberDraft, roster: &Roster) -> Result<FamilyMember> {
        let photo = file_name(draft.photo.trim());
        let voice = draft
            .voice
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(file_name);

        let mut member = FamilyMember::new(draft.name.trim(), draft.relationship.trim(), photo);
        if let Some(voice) = voice {
            member = member.with_audio(voice);
        }
        member.validate()?;

        check_extension("photo", &member.image_ref, &self.rules.image_extensions)?;
        if let Some(voice) = &member.audio_ref {
            check_extension("voice clip", voice, &self.rules.audio_extensions)?;
        }
        if self.rules.unique_names && roster.contains_name_ignore_case(&member.name) {
            return Err(KinError::DuplicateName(member.name).into());
        }
        Ok(member)
    }

    /// Validate, import the asset files, append and save.
    ///
    /// Returns the stored member and any events for the front end (a
    /// warning when the photo or clip is not in the asset directories).
    ///
    /// # Errors
    ///
    /// Validation errors from [`SetupFlow::check`], or an I/O error while
    /// copying an asset or writing the roster.
    pub fn add_member(&self, draft: &MemberDraft) -> Result<(FamilyMember, Vec<ShellEvent>)> {
        let roster = self.store.load();
        let member = self.check(draft, &roster)?;

        self.import(draft.photo.trim(), self.assets.image_dir())?;
        if let Some(voice) = draft.voice.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            self.import(voice, self.assets.audio_dir())?;
        }

        self.store.append(member.clone())?;
        info!(name = %member.name, relationship = %member.relationship, "Family member added");

        let mut events = vec![ShellEvent::MemberAdded(member.name.clone())];
        events.extend(self.missing_assets_of(&member));
        Ok((member, events))
    }

    /// Remove the member at `index` and save. Asset files are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::IndexOutOfRange`] for a bad index, or an I/O
    /// error while writing the roster.
    pub fn remove_member(&self, index: usize) -> Result<FamilyMember> {
        let removed = self.store.remove(index)?;
        info!(name = %removed.name, index, "Family member removed");
        Ok(removed)
    }

    /// Leave setup. Only allowed once the roster has at least one member.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::RosterEmpty`] for an empty roster.
    pub fn finish(&self) -> Result<Roster> {
        let roster = self.store.load();
        if roster.is_empty() {
            return Err(ShellError::RosterEmpty);
        }
        Ok(roster)
    }

    /// Warnings for every roster photo or clip missing on disk.
    #[must_use]
    pub fn missing_assets(&self, roster: &Roster) -> Vec<ShellEvent> {
        roster.iter().flat_map(|m| self.missing_assets_of(m)).collect()
    }

    fn missing_assets_of(&self, member: &FamilyMember) -> Vec<ShellEvent> {
        let mut missing = Vec::new();
        if !self.assets.has_image(member) {
            missing.push(ShellEvent::MissingAsset {
                member: member.name.clone(),
                file: member.image_ref.clone(),
            });
        }
        if let Some(audio) = member.audio_ref.as_ref().filter(|_| !self.assets.has_audio(member)) {
            missing.push(ShellEvent::MissingAsset {
                member: member.name.clone(),
                file: audio.clone(),
            });
        }
        missing
    }

    /// Copy `source` into `dir` when it names an existing file elsewhere.
    fn import(&self, source: &str, dir: &Path) -> Result<()> {
        let path = Path::new(source);
        if !path.is_file() {
            return Ok(());
        }
        let Some(name) = path.file_name() else {
            return Ok(());
        };
        let dest = dir.join(name);
        if dest == path {
            return Ok(());
        }
        self.assets.ensure_dirs()?;
        std::fs::copy(path, &dest).map_err(KinError::from)?;
        info!(from = %path.display(), to = %dest.display(), "Asset imported");
        Ok(())
    }
}

fn file_name(source: &str) -> String {
    Path::new(source)
        .file_name()
        .map_or_else(|| source.to_string(), |n| n.to_string_lossy().into_owned())
}

fn check_extension(label: &str, file: &str, allowed: &[String]) -> Result<()> {
    let ok = extension_of(file).is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)));
    if ok {
        return Ok(());
    }
    warn!(file, "Rejected {label} file type");
    Err(KinError::InvalidMember {
        reason: format!("{label} must be one of: {}", allowed.join(", ")),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(dir: &tempfile::TempDir) -> SetupFlow {
        SetupFlow::new(
            RosterStore::open(dir.path().join("family_data.json")),
            AssetLibrary::new(dir.path().join("images"), dir.path().join("audio")),
            SetupConfig::default(),
        )
    }

    #[test]
    fn add_then_remove() {
        let dir = tempfile::tempdir().expect("tempdir");
        let flow = flow(&dir);
        let (mom, events) = flow
            .add_member(&MemberDraft::new(" Mom ", "Mother", "mom.jpg").with_voice("mom.mp3"))
            .expect("add");
        assert_eq!(mom.name, "Mom");
        assert_eq!(events[0], ShellEvent::MemberAdded("Mom".into()));
        assert_eq!(events.len(), 3, "photo and clip are both missing");

        flow.add_member(&MemberDraft::new("Dad", "Father", "dad.png"))
            .expect("add");
        assert_eq!(flow.roster().names(), vec!["Mom", "Dad"]);

        let removed = flow.remove_member(0).expect("remove");
        assert_eq!(removed.name, "Mom");
        assert_eq!(flow.roster().names(), vec!["Dad"]);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let flow = flow(&dir);
        let err = flow
            .add_member(&MemberDraft::new("  ", "Mother", "mom.jpg"))
            .expect_err("blank name");
        assert!(matches!(err, ShellError::Core(KinError::InvalidMember { .. })));
        assert!(!flow.store.exists());
    }

    #[test]
    fn file_types_are_checked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let flow = flow(&dir);
        let roster = Roster::new();
        assert!(flow.check(&MemberDraft::new("Mom", "Mother", "mom.gif"), &roster).is_err());
        assert!(flow.check(&MemberDraft::new("Mom", "Mother", "mom"), &roster).is_err());
        assert!(
            flow.check(&MemberDraft::new("Mom", "Mother", "mom.JPEG").with_voice("mom.flac"), &roster)
                .is_err()
        );
        assert!(
            flow.check(&MemberDraft::new("Mom", "Mother", "mom.JPEG").with_voice("mom.OGG"), &roster)
                .is_ok()
        );
        let blank_voice = flow
            .check(&MemberDraft::new("Mom", "Mother", "mom.png").with_voice("  "), &roster)
            .expect("blank voice is no voice");
        assert_eq!(blank_voice.audio_ref, None);
    }

    #[test]
    fn names_are_unique_ignoring_case() {
        let dir = tempfile::tempdir().expect("tempdir");
        let flow = flow(&dir);
        flow.add_member(&MemberDraft::new("Mom", "Mother", "mom.jpg"))
            .expect("add");
        let err = flow
            .add_member(&MemberDraft::new("mom", "Step-mother", "other.jpg"))
            .expect_err("duplicate");
        assert!(matches!(err, ShellError::Core(KinError::DuplicateName(n)) if n == "mom"));
        assert_eq!(flow.roster().len(), 1);
    }

    #[test]
    fn duplicates_allowed_when_configured() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut flow = flow(&dir);
        flow.rules.unique_names = false;
        flow.add_member(&MemberDraft::new("Mom", "Mother", "a.jpg")).expect("add");
        flow.add_member(&MemberDraft::new("Mom", "Mother", "b.jpg")).expect("add");
        assert_eq!(flow.roster().len(), 2);
    }

    #[test]
    fn existing_files_are_imported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let flow = flow(&dir);
        let outside = tempfile::tempdir().expect("outside");
        let photo = outside.path().join("gran.png");
        let voice = outside.path().join("gran.wav");
        std::fs::write(&photo, b"png").expect("photo");
        std::fs::write(&voice, b"wav").expect("voice");

        let draft = MemberDraft::new("Gran", "Grandmother", photo.display().to_string())
            .with_voice(voice.display().to_string());
        let (gran, events) = flow.add_member(&draft).expect("add");
        assert_eq!(gran.image_ref, "gran.png");
        assert_eq!(gran.audio_ref.as_deref(), Some("gran.wav"));
        assert_eq!(events, vec![ShellEvent::MemberAdded("Gran".into())]);
        assert!(flow.assets().has_image(&gran));
        assert!(flow.assets().has_audio(&gran));
    }

    #[test]
    fn finish_needs_a_member() {
        let dir = tempfile::tempdir().expect("tempdir");
        let flow = flow(&dir);
        assert!(matches!(flow.finish(), Err(ShellError::RosterEmpty)));
        flow.add_member(&MemberDraft::new("Mom", "Mother", "mom.jpg"))
            .expect("add");
        assert_eq!(flow.finish().expect("finish").len(), 1);
    }

    #[test]
    fn bad_index_does_not_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let flow = flow(&dir);
        let err = flow.remove_member(0).expect_err("empty");
        assert!(matches!(err, ShellError::Core(KinError::IndexOutOfRange { index: 0, len: 0 })));
        assert!(!flow.store.exists());
    }
}
