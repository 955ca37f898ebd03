//! Photo and voice clip references.
//!
//! A [`FamilyMember`] stores only file names. This module resolves them
//! against the configured image and audio directories and reports whether
//! the file is actually there. Asset bytes are never read: a missing photo
//! or clip is something the renderer degrades around, not a game error.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::Result;
use crate::types::FamilyMember;

/// Resolves asset references to paths.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    image_dir: PathBuf,
    audio_dir: PathBuf,
}

impl AssetLibrary {
    /// Create a library over two directories.
    #[must_use]
    pub fn new(image_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            audio_dir: audio_dir.into(),
        }
    }

    /// Create a library from the storage section of the config.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.image_dir, &config.audio_dir)
    }

    /// Create both directories if they do not exist yet.
    ///
    /// # Errors
    /// Returns [`crate::KinError::Io`] if a directory cannot be created.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.image_dir)?;
        std::fs::create_dir_all(&self.audio_dir)?;
        info!(
            images = %self.image_dir.display(),
            audio = %self.audio_dir.display(),
            "Asset directories ready"
        );
        Ok(())
    }

    /// Directory photos resolve against.
    #[must_use]
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Directory voice clips resolve against.
    #[must_use]
    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Path of a member's photo.
    #[must_use]
    pub fn image_path(&self, member: &FamilyMember) -> PathBuf {
        self.image_dir.join(&member.image_ref)
    }

    /// Path of a member's voice clip, if they have one.
    #[must_use]
    pub fn audio_path(&self, member: &FamilyMember) -> Option<PathBuf> {
        member
            .audio_ref
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .map(|a| self.audio_dir.join(a))
    }

    /// Whether the member's photo exists on disk.
    #[must_use]
    pub fn has_image(&self, member: &FamilyMember) -> bool {
        let present = self.image_path(member).is_file();
        if !present {
            debug!(member = %member.name, image = %member.image_ref, "Photo missing on disk");
        }
        present
    }

    /// Whether the member's voice clip exists on disk.
    #[must_use]
    pub fn has_audio(&self, member: &FamilyMember) -> bool {
        self.audio_path(member).is_some_and(|p| p.is_file())
    }
}

/// Lowercase extension of an asset file name, without the dot.
#[must_use]
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_and_checks_existence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let library = AssetLibrary::new(dir.path().join("images"), dir.path().join("audio"));
        library.ensure_dirs().expect("dirs");

        let member = FamilyMember::new("Mom", "Mother", "mom.jpg").with_audio("mom.mp3");
        assert!(!library.has_image(&member));
        assert!(!library.has_audio(&member));

        std::fs::write(library.image_path(&member), b"jpg").expect("write image");
        assert!(library.has_image(&member));
        assert_eq!(
            library.audio_path(&member),
            Some(dir.path().join("audio").join("mom.mp3"))
        );
    }

    #[test]
    fn no_audio_path_without_clip() {
        let library = AssetLibrary::new("img", "aud");
        let member = FamilyMember::new("Dad", "Father", "dad.png");
        assert_eq!(library.audio_path(&member), None);
        assert!(!library.has_audio(&member));
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of("Photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("noext"), None);
    }
}
