//! Configuration for the Know My Family application.
//!
//! Maps directly to `kinplay.toml`. Every section and field has a default,
//! so an empty file (or no file) yields the shipped behaviour.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::KinError;
use crate::types::Position;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KinConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Where the roster and its assets live.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Parent setup rules.
    #[serde(default)]
    pub setup: SetupConfig,
    /// Find-My-Family maze layout.
    #[serde(default)]
    pub maze: MazeConfig,
    /// Who-Is-Speaking quiz tuning.
    #[serde(default)]
    pub quiz: QuizConfig,
}

impl KinConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `KinError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| KinError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Roster file and asset directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the roster.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Directory that photo references resolve against.
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
    /// Directory that voice clip references resolve against.
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
    /// Indent the roster file for hand editing.
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            image_dir: default_image_dir(),
            audio_dir: default_audio_dir(),
            pretty_json: true,
        }
    }
}

/// Rules applied when the parent adds a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Reject a name already on the roster (case-insensitive).
    #[serde(default = "default_true")]
    pub unique_names: bool,
    /// Accepted photo file extensions, lowercase, without the dot.
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
    /// Accepted voice clip file extensions, lowercase, without the dot.
    #[serde(default = "default_audio_extensions")]
    pub audio_extensions: Vec<String>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            unique_names: true,
            image_extensions: default_image_extensions(),
            audio_extensions: default_audio_extensions(),
        }
    }
}

/// Maze layout. Rows use `.` for a path cell and `#` for a wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeConfig {
    /// One string per row, all the same width.
    #[serde(default = "default_maze_layout")]
    pub layout: Vec<String>,
    /// Where the child starts, `[row, col]`.
    #[serde(default = "default_maze_start")]
    pub start: [usize; 2],
    /// Cell showing the target member's portrait.
    #[serde(default = "default_maze_end")]
    pub end: [usize; 2],
    /// Cell showing a different member's portrait.
    #[serde(default = "default_maze_decoy")]
    pub decoy: [usize; 2],
    /// Whether the decoy portrait is placed at all.
    #[serde(default = "default_true")]
    pub decoy_enabled: bool,
}

impl MazeConfig {
    /// Start cell as a [`Position`].
    #[must_use]
    pub fn start_position(&self) -> Position {
        Position::new(self.start[0], self.start[1])
    }

    /// End cell as a [`Position`].
    #[must_use]
    pub fn end_position(&self) -> Position {
        Position::new(self.end[0], self.end[1])
    }

    /// Decoy cell as a [`Position`], if configured.
    #[must_use]
    pub fn decoy_position(&self) -> Option<Position> {
        self.decoy_enabled
            .then(|| Position::new(self.decoy[0], self.decoy[1]))
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            layout: default_maze_layout(),
            start: default_maze_start(),
            end: default_maze_end(),
            decoy: default_maze_decoy(),
            decoy_enabled: true,
        }
    }
}

/// Who-Is-Speaking quiz tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Maximum number of answer choices shown.
    #[serde(default = "default_3")]
    pub option_count: usize,
    /// Minimum number of members with a voice clip before the quiz opens.
    #[serde(default = "default_2")]
    pub min_voices: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            option_count: 3,
            min_voices: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_data_file() -> PathBuf { PathBuf::from("data/family_data.json") }
fn default_image_dir() -> PathBuf { PathBuf::from("data/images") }
fn default_audio_dir() -> PathBuf { PathBuf::from("data/audio") }
fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png"].iter().map(ToString::to_string).collect()
}
fn default_audio_extensions() -> Vec<String> {
    ["mp3", "wav", "ogg"].iter().map(ToString::to_string).collect()
}
fn default_maze_layout() -> Vec<String> {
    ["..#..", "#.#.#", ".....", ".##.#", "....."]
        .iter()
        .map(ToString::to_string)
        .collect()
}
fn default_maze_start() -> [usize; 2] { [0, 0] }
fn default_maze_end() -> [usize; 2] { [4, 4] }
fn default_maze_decoy() -> [usize; 2] { [4, 0] }
fn default_2() -> usize { 2 }
fn default_3() -> usize { 3 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = KinConfig::from_toml("").expect("parse");
        assert_eq!(config.quiz.option_count, 3);
        assert_eq!(config.maze.layout.len(), 5);
        assert_eq!(config.maze.decoy_position(), Some(Position::new(4, 0)));
        assert_eq!(
            config.storage.data_file,
            PathBuf::from("data/family_data.json")
        );
        assert!(config.setup.unique_names);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = KinConfig::from_toml(
            r#"
            [quiz]
            option_count = 4

            [maze]
            layout = ["...", ".#.", "..."]
            end = [2, 2]
            decoy_enabled = false
            "#,
        )
        .expect("parse");
        assert_eq!(config.quiz.option_count, 4);
        assert_eq!(config.quiz.min_voices, 2);
        assert_eq!(config.maze.end_position(), Position::new(2, 2));
        assert_eq!(config.maze.start_position(), Position::new(0, 0));
        assert_eq!(config.maze.decoy_position(), None);
    }

    #[test]
    fn shipped_sample_matches_defaults() {
        let sample = KinConfig::from_toml(include_str!("../../kinplay.toml")).expect("sample");
        let defaults = KinConfig::default();
        assert_eq!(sample.maze.layout, defaults.maze.layout);
        assert_eq!(sample.setup.image_extensions, defaults.setup.image_extensions);
        assert_eq!(sample.setup.audio_extensions, defaults.setup.audio_extensions);
        assert_eq!(sample.storage.data_file, defaults.storage.data_file);
        assert_eq!(sample.general.log_level, defaults.general.log_level);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = KinConfig::from_toml("[quiz\noption_count = ").expect_err("should fail");
        assert!(matches!(err, KinError::Config(_)));
    }
}
