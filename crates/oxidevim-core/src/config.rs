//! User settings, read from `config.toml`.
//!
//! ## Learning: Partial Files with Serde
//!
//! Every section derives `Deserialize` and carries `#[serde(default)]`,
//! so serde fills anything the file leaves out from `Default`. A file
//! holding only `[timing] build_ms = 500` is a complete config.
//!
//! ```toml
//! [editor]
//! indent_unit = "\t"
//!
//! [keyboard.bindings]
//! "ctrl+g" = "graph.toggle"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorConfig,
    /// Status message and staged outcome delays
    pub timing: TimingConfig,
    /// The simulated crate reported by `:cargo`
    pub project: ProjectConfig,
    pub keyboard: KeyboardConfig,
}

impl Config {
    /// Reads `default_path()`. A missing file means defaults; a broken
    /// one is logged and also means defaults.
    pub fn load() -> Self {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(%err, "no config location, using defaults");
                return Self::default();
            }
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "ignoring config file");
            Self::default()
        })
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// `<config dir>/oxidevim/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("oxidevim").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Writes pretty TOML to `path`, creating missing directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }
}

/// Editing behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Text inserted by Tab in Insert mode
    pub indent_unit: String,

    /// File opened at startup (first file of the project when unset)
    pub start_file: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_unit: "    ".to_string(),
            start_file: None,
        }
    }
}

/// Delays, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long a command's status message stays up
    pub status_clear_ms: u64,

    /// How long "Opened <file>" stays up
    pub open_clear_ms: u64,

    /// `:cargo run`: compiling -> running
    pub run_compile_ms: u64,

    /// `:cargo run`: running -> program output
    pub run_launch_ms: u64,

    /// `:cargo build`: compiling -> finished
    pub build_ms: u64,

    /// `:cargo check`: checking -> finished
    pub check_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            status_clear_ms: 4000,
            open_clear_ms: 3000,
            run_compile_ms: 1500,
            run_launch_ms: 1000,
            build_ms: 2000,
            check_ms: 1000,
        }
    }
}

/// The simulated crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Crate (and binary) name
    pub crate_name: String,

    /// Crate version
    pub version: String,

    /// What the simulated program prints
    pub greeting: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            crate_name: "oxide_vim".to_string(),
            version: "0.1.0".to_string(),
            greeting: "Welcome to OxideVim!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Extra Normal-mode bindings, e.g. `"ctrl+g" = "graph.toggle"`
    pub bindings: HashMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("this platform has no config directory")]
    NoConfigDir,

    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config could not be written as TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.indent_unit, "    ");
        assert_eq!(config.timing.status_clear_ms, 4000);
        assert_eq!(config.timing.open_clear_ms, 3000);
        assert_eq!(config.project.crate_name, "oxide_vim");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [editor]
            indent_unit = "\t"

            [keyboard.bindings]
            "ctrl+g" = "graph.toggle"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.editor.indent_unit, "\t");
        assert_eq!(parsed.timing.check_ms, 1000);
        assert_eq!(
            parsed.keyboard.bindings.get("ctrl+g").map(String::as_str),
            Some("graph.toggle")
        );
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.project.crate_name = "demo".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.project.crate_name, "demo");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Config::load_from(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[timing]\nbuild_ms = \"soon\"").unwrap();
        assert!(matches!(Config::load_from(&bad), Err(ConfigError::Parse(_))));
    }
}
