//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// First id handed out by a fresh annotation layer
pub const FIRST_ANNOTATION_ID: u64 = 1000;

/// Maximum number of records to keep in the undo history
pub const MAX_HISTORY_SIZE: usize = 100;

/// Click distance (in screen pixels) within which an annotation counts as hit
pub const DEFAULT_HIT_TOLERANCE: f32 = 5.0;

/// Minimum drag extent (screen pixels) before a shape is created
pub const MIN_SHAPE_SIZE: f32 = 2.0;

/// Side length of vertex handles drawn on the selected annotation (screen pixels)
pub const HANDLE_SIZE: f32 = 8.0;
