//! Workspace configuration: compiler catalog entries, defaults and the
//! compile endpoint, loaded restore-or-default from a JSON file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::CompilerDescriptor;

const CONFIG_DIR: &str = ".asmview";
const CONFIG_FILE: &str = "config.json";
const LAYOUT_FILE: &str = "layout.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub compilers: Vec<CompilerDescriptor>,
    pub default_compiler: String,
    pub default_options: String,
    pub compile_url: String,
    pub debounce_ms: u64,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            compilers: vec![
                CompilerDescriptor::new("gcc", "GCC"),
                CompilerDescriptor::new("clang", "Clang"),
            ],
            default_compiler: "gcc".to_string(),
            default_options: "-O2".to_string(),
            compile_url: "http://localhost:10240/compile".to_string(),
            debounce_ms: 250,
        }
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn get_layout_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_DIR).join(LAYOUT_FILE))
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_DIR).join("logs"))
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine log directory",
        )
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn ensure_config_file() -> std::io::Result<PathBuf> {
    let path = get_config_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine config directory",
        )
    })?;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&WorkspaceConfig::default())
            .unwrap_or_else(|_| "{}".to_string());
        std::fs::write(&path, content)?;
    }
    Ok(path)
}

/// Loads the config file if it exists and parses; any failure falls back to
/// defaults at the caller.
pub fn load_config() -> Option<WorkspaceConfig> {
    let path = get_config_path()?;
    let data = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}

fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return Some(PathBuf::from(appdata));
        }
        return std::env::var("LOCALAPPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}
