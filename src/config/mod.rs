use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::annotation::StyleDefaults;
use crate::constants::{DEFAULT_HIT_TOLERANCE, MAX_HISTORY_SIZE};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfigData {
    /// Stroke color for new annotations
    pub stroke_color: Color,

    /// Line width for new annotations (world units)
    pub line_width: f32,

    /// Font size for new text markers
    pub font_size: f32,

    /// Number of undo steps kept
    pub history_limit: usize,

    /// Click distance that still hits an annotation (screen pixels)
    pub hit_tolerance: f32,
}

impl Default for AppConfigData {
    fn default() -> Self {
        let style = StyleDefaults::default();
        Self {
            stroke_color: style.foreground,
            line_width: style.line_width,
            font_size: style.font_size,
            history_limit: MAX_HISTORY_SIZE,
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
        }
    }
}

impl AppConfigData {
    /// Replace out-of-range values with their defaults.
    ///
    /// Returns the names of the fields that were reset.
    pub fn sanitize(&mut self) -> Vec<&'static str> {
        let defaults = Self::default();
        let mut reset = Vec::new();

        let is_positive = |v: f32| v.is_finite() && v > 0.0;
        if !is_positive(self.line_width) {
            self.line_width = defaults.line_width;
            reset.push("line_width");
        }
        if !is_positive(self.font_size) {
            self.font_size = defaults.font_size;
            reset.push("font_size");
        }
        if !(self.hit_tolerance.is_finite() && self.hit_tolerance >= 0.0) {
            self.hit_tolerance = defaults.hit_tolerance;
            reset.push("hit_tolerance");
        }
        if self.history_limit == 0 {
            self.history_limit = defaults.history_limit;
            reset.push("history_limit");
        }
        reset
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: get_config_path(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether the notification is still pending
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to store new defaults for annotations
#[derive(Message, Debug, Clone, PartialEq)]
pub struct UpdateAnnotationDefaultsRequest {
    pub stroke_color: Option<Color>,
    pub line_width: Option<f32>,
}

/// Get the path to the config file (platform-appropriate location)
fn get_config_path() -> PathBuf {
    crate::paths::config_file()
}

/// Result of loading config from disk
struct LoadConfigResult {
    config: AppConfig,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Parse config JSON, falling back to defaults on error
fn parse_config(json: &str) -> (AppConfigData, Option<String>) {
    match serde_json::from_str::<AppConfigData>(json) {
        Ok(mut data) => {
            let reset = data.sanitize();
            if reset.is_empty() {
                (data, None)
            } else {
                warn!("Reset invalid config values: {}", reset.join(", "));
                (
                    data,
                    Some(format!("Invalid values were reset: {}", reset.join(", "))),
                )
            }
        }
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

/// Load configuration from disk
fn load_config() -> LoadConfigResult {
    let config_path = get_config_path();

    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => {
                let (data, reason) = parse_config(&json);
                if reason.is_none() {
                    info!("Loaded config from {:?}", config_path);
                }
                (data, reason)
            }
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (AppConfigData::default(), None)
    };

    LoadConfigResult {
        config: AppConfig {
            data,
            config_path,
            dirty: false,
        },
        reset_reason,
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    if let Some(parent) = config.config_path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        error!("Failed to create config directory: {}", e);
        return;
    }

    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config();
    config.data = result.config.data;
    config.config_path = result.config.config_path;
    config.dirty = result.config.dirty;

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// Startup system to report a config reset once
fn report_config_reset(mut reset_notification: ResMut<ConfigResetNotification>) {
    if !reset_notification.show {
        return;
    }
    if let Some(reason) = reset_notification.reason.take() {
        warn!("Configuration reset to defaults: {}", reason);
    }
    reset_notification.show = false;
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// Apply a defaults update to the config data, returning whether anything changed
fn apply_defaults_update(data: &mut AppConfigData, update: &UpdateAnnotationDefaultsRequest) -> bool {
    let mut changed = false;
    if let Some(color) = update.stroke_color
        && data.stroke_color != color
    {
        data.stroke_color = color;
        changed = true;
    }
    if let Some(width) = update.line_width
        && width.is_finite()
        && width > 0.0
        && data.line_width != width
    {
        data.line_width = width;
        changed = true;
    }
    changed
}

/// System to store new annotation defaults
fn update_annotation_defaults_system(
    mut events: MessageReader<UpdateAnnotationDefaultsRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        if apply_defaults_update(&mut config.data, event) {
            config.dirty = true;
            save_events.write(SaveConfigRequest);
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateAnnotationDefaultsRequest>()
            .add_systems(
                Startup,
                (load_config_system, report_config_reset)
                    .chain()
                    .in_set(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    update_annotation_defaults_system
                        .run_if(on_message::<UpdateAnnotationDefaultsRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.history_limit, MAX_HISTORY_SIZE);
        assert_eq!(data.hit_tolerance, DEFAULT_HIT_TOLERANCE);
        assert_eq!(data.line_width, StyleDefaults::default().line_width);
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            stroke_color: Color::srgb(0.0, 0.0, 1.0),
            line_width: 5.0,
            font_size: 18.0,
            history_limit: 40,
            hit_tolerance: 8.0,
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, data);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let (data, reason) = parse_config(r#"{ "history_limit": 25 }"#);
        assert!(reason.is_none());
        assert_eq!(data.history_limit, 25);
        assert_eq!(data.font_size, AppConfigData::default().font_size);
    }

    #[test]
    fn test_corrupt_config_resets_with_reason() {
        let (data, reason) = parse_config("{ not json");
        assert_eq!(data, AppConfigData::default());
        assert!(reason.unwrap().contains("corrupted"));
    }

    #[test]
    fn test_invalid_values_are_sanitized() {
        let (data, reason) = parse_config(r#"{ "line_width": -2.0, "history_limit": 0 }"#);
        assert_eq!(data.line_width, AppConfigData::default().line_width);
        assert_eq!(data.history_limit, MAX_HISTORY_SIZE);
        let reason = reason.unwrap();
        assert!(reason.contains("line_width"));
        assert!(reason.contains("history_limit"));
    }

    #[test]
    fn test_defaults_update_reports_changes() {
        let mut data = AppConfigData::default();
        let update = UpdateAnnotationDefaultsRequest {
            stroke_color: None,
            line_width: Some(7.0),
        };
        assert!(apply_defaults_update(&mut data, &update));
        assert_eq!(data.line_width, 7.0);
        // Same value again is not a change
        assert!(!apply_defaults_update(&mut data, &update));

        let bogus = UpdateAnnotationDefaultsRequest {
            stroke_color: None,
            line_width: Some(f32::NAN),
        };
        assert!(!apply_defaults_update(&mut data, &bogus));
    }

    #[test]
    fn test_config_reset_notification_default() {
        let notification = ConfigResetNotification::default();
        assert!(!notification.show);
        assert!(notification.reason.is_none());
    }
}
