use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(alias = "data_url")]
    pub url: Option<String>,
    pub timeout: Option<u64>,
    #[serde(alias = "mode")]
    pub policy: Option<String>,
    pub search: Option<String>,
    pub hide: Option<Vec<String>>,
    pub show_all: Option<bool>,
    pub media_origin: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
    pub interactive: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".introviewer").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<ConfigFile, String> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents)
        .map_err(|e| format!("failed to parse config '{}': {e}", origin.display()))
}

/// Reads a YAML config. A missing file is only an error when the user named
/// it explicitly (`allow_missing == false`).
pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# introviewer config
#
# Location (default):
#   ~/.introviewer/config.yml

# Roster endpoint (JSON array of student records)
url: https://dvonb.xyz/api/2025-fall/itis-3135/students?full=1
timeout: 10

# Relative media paths are resolved against the roster URL's origin.
# media_origin: https://dvonb.xyz

# Browsing
# wrap  - next/previous cycle around the match list
# clamp - next/previous stop at the first/last match
policy: wrap
# search: ana
show_all: false
interactive: false

# Fields to hide: name, mascot, image, personal, backgrounds,
# classes, extra, funfact, quote, links
hide: []

# Export (optional)
# output: ./roster.json
# output_format: json

no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}
