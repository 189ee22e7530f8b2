//! Polyline tool system for open polylines and closed polygons.
//!
//! Left click places a vertex. Enter or right click finishes, Backspace
//! removes the last vertex, Escape discards the shape.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::annotation::Polyline;

use super::super::params::{is_cursor_over_ui, wants_keyboard_input, CameraParams};
use super::super::tools::EditorTool;
use super::draw_tool::commit_points;
use super::state::{AnnotationResources, PolylineDrawState};

/// Vertices needed before a shape of `kind` can be finished
fn min_points(kind: &str) -> usize {
    if kind == Polyline::CLOSED_KIND { 3 } else { 2 }
}

/// Appends a vertex unless it repeats the previous one
fn push_vertex(points: &mut Vec<Vec2>, point: Vec2) -> bool {
    if points.last().is_some_and(|last| last.distance(point) < f32::EPSILON) {
        return false;
    }
    points.push(point);
    true
}

pub fn handle_polyline(
    mut res: AnnotationResources,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut polyline_state: ResMut<PolylineDrawState>,
    camera: CameraParams,
    mut contexts: EguiContexts,
) {
    let kind = match res.current_tool.tool {
        EditorTool::Polyline => Polyline::OPEN_KIND,
        EditorTool::Polygon => Polyline::CLOSED_KIND,
        _ => {
            polyline_state.points.clear();
            return;
        }
    };

    if !wants_keyboard_input(&mut contexts) {
        if keyboard.just_pressed(KeyCode::Escape) {
            polyline_state.points.clear();
            return;
        }
        if keyboard.just_pressed(KeyCode::Backspace) {
            polyline_state.points.pop();
            return;
        }
    }

    let finish = res.mouse_button.just_pressed(MouseButton::Right)
        || (keyboard.just_pressed(KeyCode::Enter) && !wants_keyboard_input(&mut contexts));

    if finish {
        let points = std::mem::take(&mut polyline_state.points);
        if points.len() < min_points(kind) {
            debug!("Discarded {} with {} points", kind, points.len());
            return;
        }
        let style = res.settings.new_item_style();
        if let Err(e) = commit_points(&mut res.layer, kind, points, style) {
            warn!("Could not create {}: {}", kind, e);
        }
        return;
    }

    if !res.mouse_button.just_pressed(MouseButton::Left) || is_cursor_over_ui(&mut contexts) {
        return;
    }

    if let Some(world_pos) = camera.cursor_world_pos() {
        push_vertex(&mut polyline_state.points, world_pos);
    }
}
