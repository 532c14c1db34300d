//! Facts about the host platform, used only for display.
//!
//! The editing engine never rewrites document text based on anything in
//! here. These helpers feed the status bar and the simulated cargo paths.

use serde::{Deserialize, Serialize};

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Windows,
    Linux,
    Macos,
    Unknown,
}

impl Os {
    /// Lower-case name as shown in the status bar.
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Linux => "linux",
            Os::Macos => "macos",
            Os::Unknown => "unknown",
        }
    }

    /// The OS this binary was compiled for.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Os::Windows,
            "linux" => Os::Linux,
            "macos" => Os::Macos,
            _ => Os::Unknown,
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line ending convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    /// Unix-style: \n
    #[default]
    Lf,
    /// Windows-style: \r\n
    CrLf,
}

impl LineEnding {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Short label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            LineEnding::Lf => "LF",
            LineEnding::CrLf => "CRLF",
        }
    }
}

/// Platform facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    pub os: Os,
    pub path_separator: char,
    pub binary_extension: &'static str,
    pub line_ending: LineEnding,
    pub home_dir: &'static str,
}

impl PlatformInfo {
    /// Describes the platform this binary was compiled for.
    pub fn detect() -> Self {
        Self::for_os(Os::current())
    }

    /// Describes a given OS. Anything that is not Windows follows Unix
    /// conventions.
    pub fn for_os(os: Os) -> Self {
        let windows = os == Os::Windows;
        Self {
            os,
            path_separator: if windows { '\\' } else { '/' },
            binary_extension: if windows { ".exe" } else { "" },
            line_ending: if windows {
                LineEnding::CrLf
            } else {
                LineEnding::Lf
            },
            home_dir: if windows { "%USERPROFILE%" } else { "~" },
        }
    }

    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Joins non-empty segments with this platform's separator.
    pub fn join_path(&self, segments: &[&str]) -> String {
        let separator = self.path_separator.to_string();
        segments
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(&separator)
    }

    /// Rewrites every separator to this platform's one.
    pub fn normalize_path(&self, path: &str) -> String {
        path.chars()
            .map(|c| match c {
                '/' | '\\' => self.path_separator,
                other => other,
            })
            .collect()
    }

    /// Returns the directory part of a path, in this platform's separator.
    pub fn directory(&self, path: &str) -> String {
        let unix = path.replace('\\', "/");
        let dir = unix.rsplit_once('/').map_or("", |(dir, _)| dir);
        self.normalize_path(dir)
    }

    /// Converts line endings to this platform's convention.
    pub fn normalize_line_endings(&self, text: &str) -> String {
        let lf = to_lf(text);
        match self.line_ending {
            LineEnding::Lf => lf,
            LineEnding::CrLf => lf.replace('\n', "\r\n"),
        }
    }

    /// Path of a binary named `name` under `base`, with the platform's
    /// executable extension.
    pub fn format_binary_path(&self, base: &str, name: &str) -> String {
        let file = format!("{name}{}", self.binary_extension);
        self.join_path(&[base, &file])
    }

    /// How a shell on this platform spells an environment variable.
    pub fn env_var_syntax(&self, name: &str) -> String {
        if self.is_windows() {
            format!("%{name}%")
        } else {
            format!("${name}")
        }
    }

    pub fn clear_command(&self) -> &'static str {
        if self.is_windows() { "cls" } else { "clear" }
    }

    pub fn list_command(&self) -> &'static str {
        if self.is_windows() { "dir" } else { "ls -la" }
    }

    /// Prefix for running a binary from the current directory.
    pub fn command_prefix(&self) -> &'static str {
        if self.is_windows() { "" } else { "./" }
    }
}

impl Default for PlatformInfo {
    fn default() -> Self {
        Self::detect()
    }
}

/// Returns the last component of a path written with either separator.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or("")
}

/// Converts `\r\n` and lone `\r` to `\n`.
pub fn to_lf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
