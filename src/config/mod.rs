//! Engine configuration: persisted tunables plus the per-instance tool registry.
//!
//! One [`EngineConfig`] is built per chart and passed by reference to every
//! sub-component; nothing here is global.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DOUBLE_CLICK_MIN_MS, DEFAULT_DOUBLE_CLICK_MS, DEFAULT_FREEHAND_MIN_SPACING,
    DEFAULT_HANDLE_RADIUS, DEFAULT_HIT_TOLERANCE, DEFAULT_POSITION_WIDTH_BARS,
    DEFAULT_PRICE_INCREMENT, DEFAULT_REWARD_RATIO, DEFAULT_RISK_PERCENT,
    DEFAULT_STACKED_THRESHOLD, DEFAULT_STYLE_DEBOUNCE_MS, DEFAULT_VERTEX_TOLERANCE_FACTOR,
};
use crate::drawing::Style;
use crate::mapper::MagnetMode;
use crate::tools::ToolRegistry;

/// Tunables persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Stroke hit tolerance in pixels
    pub hit_tolerance: f32,
    /// Grab radius around handles in pixels
    pub handle_radius: f32,
    /// Polyline vertices accept hits within `hit_tolerance * vertex_tolerance_factor`
    pub vertex_tolerance_factor: f32,
    /// More than this many lines under the pointer counts as a stack
    pub stacked_threshold: usize,
    /// Keep the tool armed after a drawing is finished
    pub keep_drawing_mode: bool,
    pub magnet_mode: MagnetMode,
    /// Select drawings by hovering while Ctrl is held
    pub ctrl_hover_select: bool,
    /// Eraser mode: selecting a drawing deletes it
    pub eraser_mode: bool,
    /// Share of the visible price range used for a new position's stop
    pub risk_percent: f64,
    /// Stop distance when the visible range is unusable
    pub price_increment: f64,
    pub position_width_bars: f64,
    pub reward_ratio: f64,
    pub style_debounce_ms: i64,
    pub double_click_ms: i64,
    pub double_click_min_ms: i64,
    /// Freehand samples closer than this to the previous one are dropped
    pub freehand_min_spacing: f32,
    /// Last used style per tool type
    pub tool_styles: BTreeMap<String, Style>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            handle_radius: DEFAULT_HANDLE_RADIUS,
            vertex_tolerance_factor: DEFAULT_VERTEX_TOLERANCE_FACTOR,
            stacked_threshold: DEFAULT_STACKED_THRESHOLD,
            keep_drawing_mode: false,
            magnet_mode: MagnetMode::Off,
            ctrl_hover_select: false,
            eraser_mode: false,
            risk_percent: DEFAULT_RISK_PERCENT,
            price_increment: DEFAULT_PRICE_INCREMENT,
            position_width_bars: DEFAULT_POSITION_WIDTH_BARS,
            reward_ratio: DEFAULT_REWARD_RATIO,
            style_debounce_ms: DEFAULT_STYLE_DEBOUNCE_MS,
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            double_click_min_ms: DEFAULT_DOUBLE_CLICK_MIN_MS,
            freehand_min_spacing: DEFAULT_FREEHAND_MIN_SPACING,
            tool_styles: BTreeMap::new(),
        }
    }
}

/// Runtime configuration for one chart instance
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// The persisted settings
    pub settings: EngineSettings,
    /// Tool identifier to constructor and flags
    pub registry: ToolRegistry,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether settings need to be saved
    pub dirty: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settings: EngineSettings::default(),
            registry: ToolRegistry::with_builtin_tools(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Result of loading config from disk
pub struct LoadConfigResult {
    pub config: EngineConfig,
    /// Why the settings were reset to defaults, if they were
    pub reset_reason: Option<String>,
}

impl EngineConfig {
    /// Load settings from the platform config file.
    pub fn load() -> LoadConfigResult {
        Self::load_from(&crate::paths::config_file())
    }

    /// Load settings from `config_path`, falling back to defaults on any error.
    pub fn load_from(config_path: &Path) -> LoadConfigResult {
        let (settings, reset_reason) = if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(json) => match serde_json::from_str(&json) {
                    Ok(settings) => {
                        info!("Loaded engine settings from {:?}", config_path);
                        (settings, None)
                    }
                    Err(e) => {
                        warn!("Failed to parse settings file: {}", e);
                        (
                            EngineSettings::default(),
                            Some(format!("Settings file was corrupted: {}", e)),
                        )
                    }
                },
                Err(e) => {
                    warn!("Failed to read settings file: {}", e);
                    (
                        EngineSettings::default(),
                        Some(format!("Could not read settings file: {}", e)),
                    )
                }
            }
        } else {
            info!("No settings file found, using defaults");
            (EngineSettings::default(), None)
        };

        LoadConfigResult {
            config: EngineConfig {
                settings,
                registry: ToolRegistry::with_builtin_tools(),
                config_path: config_path.to_path_buf(),
                dirty: false,
            },
            reset_reason,
        }
    }

    /// Write settings to disk if they changed. Failures are logged.
    pub fn save(&mut self) {
        if !self.dirty {
            return;
        }
        match serde_json::to_string_pretty(&self.settings) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.config_path, json) {
                    error!("Failed to save settings: {}", e);
                } else {
                    info!("Settings saved to {:?}", self.config_path);
                    self.dirty = false;
                }
            }
            Err(e) => {
                error!("Failed to serialize settings: {}", e);
            }
        }
    }

    pub fn saved_style(&self, tool: &str) -> Option<&Style> {
        self.settings.tool_styles.get(tool)
    }

    /// Remember `style` as the last used style for `tool`.
    pub fn remember_style(&mut self, tool: &str, style: &Style) {
        if self.settings.tool_styles.get(tool) != Some(style) {
            self.settings.tool_styles.insert(tool.to_string(), style.clone());
            self.dirty = true;
        }
    }
}
