//! Where settings, saved drawings and logs live.
//!
//! Paths resolve to platform locations:
//! - Windows: `%APPDATA%\chartmark\`
//! - macOS: `~/Library/Application Support/chartmark/`
//! - Linux: `~/.config/chartmark/` (config), `~/.local/share/chartmark/` (data)
//!
//! Setting `CHARTMARK_LOCAL_PATHS=1` keeps everything in the current
//! directory instead, which is handy while developing a host.

use std::path::PathBuf;

/// Environment variable that switches to local paths
pub const LOCAL_PATHS_VAR: &str = "CHARTMARK_LOCAL_PATHS";

const APP_DIR: &str = "chartmark";

/// True when the host opted into local paths.
pub fn is_local_mode() -> bool {
    local_mode_from(std::env::var(LOCAL_PATHS_VAR).ok().as_deref())
}

fn local_mode_from(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("1" | "true" | "yes"))
}

/// Config directory.
///
/// - Local mode: current directory
/// - Linux: `~/.config/chartmark/`
/// - Windows/macOS: same as data_dir
pub fn config_dir() -> Option<PathBuf> {
    if is_local_mode() {
        return Some(PathBuf::from("."));
    }

    #[cfg(target_os = "linux")]
    {
        dirs::config_dir().map(|p| p.join(APP_DIR))
    }

    #[cfg(not(target_os = "linux"))]
    {
        data_dir()
    }
}

pub fn data_dir() -> Option<PathBuf> {
    if is_local_mode() {
        return Some(PathBuf::from("."));
    }
    dirs::data_dir().map(|p| p.join(APP_DIR))
}

/// Engine settings file, `{config_dir}/chartmark.json`.
pub fn config_file() -> PathBuf {
    config_dir()
        .map(|p| p.join("chartmark.json"))
        .unwrap_or_else(|| PathBuf::from("chartmark.json"))
}

/// One saved drawing file per chart session lives here.
pub fn drawings_dir() -> PathBuf {
    data_dir()
        .map(|p| p.join("drawings"))
        .unwrap_or_else(|| PathBuf::from("drawings"))
}

pub fn logs_dir() -> PathBuf {
    data_dir()
        .map(|p| p.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
