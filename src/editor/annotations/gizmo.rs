//! Custom gizmo group for annotations.

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;

/// Custom gizmo group for annotation strokes
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct AnnotationGizmoGroup;

/// Strokes are widened by the painter, so the base gizmo line stays at one pixel
pub fn configure_annotation_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<AnnotationGizmoGroup>();
    config.line.width = 1.0;
}
