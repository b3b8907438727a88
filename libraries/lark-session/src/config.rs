/// Session configuration
use lark_core::{LarkError, Result};
use lark_library::scanner::DEFAULT_EXTENSIONS;
use lark_library::{FileSystemScanner, DEFAULT_ITEM_HEIGHT};
use lark_playback::{EngineConfig, TimerLabels};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, relative to the working directory
pub const CONFIG_FILE: &str = "lark.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_rail")]
    pub rail: RailSettings,

    #[serde(default = "default_timer")]
    pub timer: TimerSettings,

    #[serde(default = "default_engine")]
    pub engine: EngineSettings,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default = "default_scan_directories")]
    pub scan_directories: Vec<PathBuf>,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub follow_links: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RailSettings {
    /// Pitch of one rail label, in the same units as pointer positions
    #[serde(default = "default_item_height")]
    pub item_height: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimerSettings {
    #[serde(default = "default_idle_label")]
    pub idle_label: String,

    #[serde(default = "default_finished_label")]
    pub finished_label: String,

    #[serde(default = "default_presets_minutes")]
    pub presets_minutes: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineSettings {
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,

    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl SessionConfig {
    /// Load configuration from `lark.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from a specific file and the environment
    ///
    /// A missing file is not an error; every setting has a default.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        // Override with environment variables, e.g. LARK_STORAGE__DATABASE_URL
        settings = settings.add_source(
            config::Environment::with_prefix("LARK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| LarkError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| LarkError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.rail.item_height.is_finite() && self.rail.item_height > 0.0) {
            return Err(LarkError::Config(format!(
                "rail.item_height must be positive, got {}",
                self.rail.item_height
            )));
        }

        if self.timer.presets_minutes.is_empty() {
            return Err(LarkError::Config(
                "timer.presets_minutes must not be empty".to_string(),
            ));
        }

        if self.timer.presets_minutes.contains(&0) {
            return Err(LarkError::Config(
                "timer.presets_minutes must not contain 0".to_string(),
            ));
        }

        if self.engine.command_buffer == 0 || self.engine.event_buffer == 0 {
            return Err(LarkError::Config(
                "engine buffers must hold at least one message".to_string(),
            ));
        }

        Ok(())
    }

    /// Engine host settings
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            command_buffer: self.engine.command_buffer,
            event_buffer: self.engine.event_buffer,
            ..EngineConfig::default()
        }
    }

    /// Sleep timer display labels
    pub fn timer_labels(&self) -> TimerLabels {
        TimerLabels {
            idle: self.timer.idle_label.clone(),
            finished: self.timer.finished_label.clone(),
        }
    }

    /// Filesystem scanner over the configured directories
    pub fn scanner(&self) -> FileSystemScanner {
        FileSystemScanner::new(self.library.scan_directories.iter().cloned())
            .extensions(self.library.extensions.iter().cloned())
            .follow_links(self.library.follow_links)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            storage: default_storage(),
            rail: default_rail(),
            timer: default_timer(),
            engine: default_engine(),
            logging: default_logging(),
        }
    }
}

// Default values
fn default_library() -> LibrarySettings {
    LibrarySettings {
        scan_directories: default_scan_directories(),
        extensions: default_extensions(),
        follow_links: false,
    }
}

fn default_scan_directories() -> Vec<PathBuf> {
    vec![PathBuf::from("./music")]
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://lark.db".to_string()
}

fn default_rail() -> RailSettings {
    RailSettings {
        item_height: default_item_height(),
    }
}

fn default_item_height() -> f32 {
    DEFAULT_ITEM_HEIGHT
}

fn default_timer() -> TimerSettings {
    TimerSettings {
        idle_label: default_idle_label(),
        finished_label: default_finished_label(),
        presets_minutes: default_presets_minutes(),
    }
}

fn default_idle_label() -> String {
    TimerLabels::default().idle
}

fn default_finished_label() -> String {
    TimerLabels::default().finished
}

fn default_presets_minutes() -> Vec<u32> {
    vec![15, 30, 60]
}

fn default_engine() -> EngineSettings {
    let engine = EngineConfig::default();
    EngineSettings {
        command_buffer: engine.command_buffer,
        event_buffer: engine.event_buffer,
    }
}

fn default_command_buffer() -> usize {
    EngineConfig::default().command_buffer
}

fn default_event_buffer() -> usize {
    EngineConfig::default().event_buffer
}

fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: default_filter(),
    }
}

fn default_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        config.validate().unwrap();

        assert_eq!(config.storage.database_url, "sqlite://lark.db");
        assert_eq!(config.timer.presets_minutes, vec![15, 30, 60]);
        assert_eq!(config.engine_config(), EngineConfig::default());
        assert_eq!(config.timer_labels(), TimerLabels::default());
        assert!(config.library.extensions.iter().any(|ext| ext == "flac"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lark.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[rail]\nitem_height = 24.0\n\n[timer]\nidle_label = \"Sleep\"\npresets_minutes = [5, 10]"
        )
        .unwrap();

        let config = SessionConfig::load_from(&path).unwrap();
        assert!((config.rail.item_height - 24.0).abs() < f32::EPSILON);
        assert_eq!(config.timer.idle_label, "Sleep");
        assert_eq!(config.timer.finished_label, "Timer finished");
        assert_eq!(config.timer.presets_minutes, vec![5, 10]);
        assert_eq!(config.storage, default_storage());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.rail, default_rail());
        assert_eq!(config.timer, default_timer());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = SessionConfig::default();
        config.rail.item_height = 0.0;
        assert!(matches!(config.validate(), Err(LarkError::Config(_))));

        let mut config = SessionConfig::default();
        config.rail.item_height = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.timer.presets_minutes.clear();
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.timer.presets_minutes = vec![15, 0];
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.engine.command_buffer = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn scanner_uses_configured_roots() {
        let mut config = SessionConfig::default();
        config.library.scan_directories = vec![PathBuf::from("/a"), PathBuf::from("/b")];

        let scanner = config.scanner();
        assert_eq!(scanner.roots(), &[PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(scanner.is_audio_file(Path::new("/a/song.mp3")));
        assert!(!scanner.is_audio_file(Path::new("/a/cover.jpg")));
    }
}
