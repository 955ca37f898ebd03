//! JSON file persistence for the family roster.
//!
//! The roster is stored as a single JSON array, one object per member:
//!
//! ```json
//! [
//!     { "name": "Maya", "relationship": "Mother", "image": "maya.jpg", "audio": "maya.mp3" },
//!     { "name": "Ravi", "relationship": "Father", "image": "ravi.jpg", "audio": null }
//! ]
//! ```
//!
//! Every write replaces the whole file. The new content goes to a sibling
//! temporary file first and is then renamed over the target, so a reader
//! sees either the old roster or the new one, never a partial write.
//!
//! Loading fails open: a missing, empty, unreadable or malformed file is the
//! "setup incomplete" state, reported as an empty roster plus a warning.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::error::{KinError, Result};
use crate::types::{FamilyMember, Roster};

/// Handle to the roster file.
///
/// # Usage
///
/// ```no_run
/// # use kinplay_core::persistence::RosterStore;
/// # use kinplay_core::types::FamilyMember;
/// let store = RosterStore::open("data/family_data.json");
/// store.append(FamilyMember::new("Maya", "Mother", "maya.jpg"))?;
/// let roster = store.load();
/// assert_eq!(roster.len(), 1);
/// # Ok::<(), kinplay_core::error::KinError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RosterStore {
    path: PathBuf,
    pretty: bool,
}

impl RosterStore {
    /// Point a store at `path`. Nothing is read or created until the first
    /// load or save.
    #[must_use]
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
        }
    }

    /// Point a store at the configured roster file.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            path: config.data_file.clone(),
            pretty: config.pretty_json,
        }
    }

    /// Path of the roster file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a roster file exists yet.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    // ------------------------------------------------------------------
    // Load / save
    // ------------------------------------------------------------------

    /// Read the roster.
    ///
    /// Never fails. Anything that prevents reading a roster yields an empty
    /// one; individual records missing a required field are skipped.
    #[must_use]
    pub fn load(&self) -> Roster {
        let start = Instant::now();

        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No roster file yet");
                return Roster::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Roster file unreadable, treating as empty");
                return Roster::new();
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Roster::new();
        }

        let records: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed roster file, treating as empty");
                return Roster::new();
            }
        };

        let mut roster = Roster::new();
        for (index, record) in records.into_iter().enumerate() {
            let member = serde_json::from_value::<FamilyMember>(record)
                .map_err(|e| KinError::Serialization(e.to_string()))
                .and_then(|m| m.validate().map(|()| m));
            match member {
                Ok(member) => roster.push(member),
                Err(e) => warn!(index, error = %e, "Skipping invalid roster record"),
            }
        }

        debug!(
            members = roster.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Loaded roster"
        );
        roster
    }

    /// Overwrite the roster file with `roster`.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::Serialization`] if JSON encoding fails, or
    /// [`KinError::Io`] if the file cannot be written.
    pub fn save(&self, roster: &Roster) -> Result<()> {
        let start = Instant::now();
        let json = self.encode(roster)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, &json)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        info!(
            path = %self.path.display(),
            members = roster.len(),
            bytes = json.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Saved roster"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Validate `member`, append it and save immediately.
    ///
    /// Returns the roster as written.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::InvalidMember`] without writing if a required
    /// field is blank, or any error from [`RosterStore::save`].
    pub fn append(&self, member: FamilyMember) -> Result<Roster> {
        member.validate()?;
        let mut roster = self.load();
        debug!(member = %member.name, "Appending family member");
        roster.push(member);
        self.save(&roster)?;
        Ok(roster)
    }

    /// Remove the member at `index` and save immediately.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::IndexOutOfRange`] without writing if no member
    /// sits at `index`, or any error from [`RosterStore::save`].
    pub fn remove(&self, index: usize) -> Result<FamilyMember> {
        let mut roster = self.load();
        let removed = roster.remove(index)?;
        debug!(member = %removed.name, index, "Removing family member");
        self.save(&roster)?;
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn encode(&self, roster: &Roster) -> Result<Vec<u8>> {
        if !self.pretty {
            return serde_json::to_vec(roster).map_err(|e| KinError::Serialization(e.to_string()));
        }
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        roster
            .serialize(&mut ser)
            .map_err(|e| KinError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Sibling temp file, e.g. `family_data.json.tmp`.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roster() -> Roster {
        Roster::from(vec![
            FamilyMember::new("Maya", "Mother", "maya.jpg").with_audio("maya.mp3"),
            FamilyMember::new("Ravi", "Father", "ravi.jpg"),
        ])
    }

    fn temp_store() -> (tempfile::TempDir, RosterStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RosterStore::open(dir.path().join("data").join("family_data.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_dir, store) = temp_store();
        assert!(!store.exists());
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_creates_parent_and_round_trips() {
        let (_dir, store) = temp_store();
        store.save(&sample_roster()).expect("save");
        assert!(store.exists());
        assert_eq!(store.load(), sample_roster());
        assert!(!store.temp_path().exists(), "temp file should be renamed away");
    }

    #[test]
    fn pretty_output_uses_short_keys() {
        let (_dir, store) = temp_store();
        store.save(&sample_roster()).expect("save");
        let text = std::fs::read_to_string(store.path()).expect("read");
        assert!(text.contains("    {"), "expected 4-space indentation");
        assert!(text.contains("\"image\": \"maya.jpg\""));
        assert!(text.contains("\"audio\": null"));
    }

    #[test]
    fn malformed_file_loads_empty() {
        let (_dir, store) = temp_store();
        store.save(&sample_roster()).expect("save");
        std::fs::write(store.path(), b"{ not json").expect("corrupt");
        assert!(store.load().is_empty());

        std::fs::write(store.path(), b"{\"name\": \"Maya\"}").expect("not an array");
        assert!(store.load().is_empty());

        std::fs::write(store.path(), b"   \n").expect("blank");
        assert!(store.load().is_empty());
    }

    #[test]
    fn invalid_records_are_skipped() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(
            store.path(),
            br#"[
                {"name": "Maya", "relationship": "Mother", "image": "maya.jpg", "audio": null},
                {"name": "", "relationship": "Uncle", "image": "x.jpg"},
                {"relationship": "Aunt"},
                {"name": "Ravi", "relationship": "Father", "image": "ravi.jpg"}
            ]"#,
        )
        .expect("write");
        assert_eq!(store.load().names(), vec!["Maya", "Ravi"]);
    }

    #[test]
    fn append_and_remove_write_through() {
        let (_dir, store) = temp_store();
        store
            .append(FamilyMember::new("Maya", "Mother", "maya.jpg"))
            .expect("append");
        let written = store
            .append(FamilyMember::new("Ravi", "Father", "ravi.jpg"))
            .expect("append");
        assert_eq!(written.len(), 2);
        assert_eq!(store.load().len(), 2);

        let removed = store.remove(0).expect("remove");
        assert_eq!(removed.name, "Maya");
        assert_eq!(store.load().names(), vec!["Ravi"]);
    }

    #[test]
    fn invalid_append_does_not_write() {
        let (_dir, store) = temp_store();
        let err = store
            .append(FamilyMember::new("Maya", "", "maya.jpg"))
            .expect_err("blank relationship");
        assert!(matches!(err, KinError::InvalidMember { .. }));
        assert!(!store.exists());
    }

    #[test]
    fn remove_out_of_range_leaves_file_untouched() {
        let (_dir, store) = temp_store();
        store.save(&sample_roster()).expect("save");
        let err = store.remove(5).expect_err("out of range");
        assert!(matches!(err, KinError::IndexOutOfRange { index: 5, len: 2 }));
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn compact_output_when_configured() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StorageConfig {
            data_file: dir.path().join("roster.json"),
            pretty_json: false,
            ..StorageConfig::default()
        };
        let store = RosterStore::from_config(&config);
        store.save(&sample_roster()).expect("save");
        let text = std::fs::read_to_string(store.path()).expect("read");
        assert!(!text.contains('\n'));
    }
}
