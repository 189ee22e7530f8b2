//! Editor camera: middle-drag pan, scroll zoom around the cursor, Home to reset.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use super::params::CameraParams;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

#[derive(Component)]
pub struct EditorCamera;

#[derive(Component)]
pub struct CameraZoom {
    pub scale: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        EditorCamera,
        CameraZoom::default(),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut camera_query: Query<(&mut Transform, &CameraZoom), With<EditorCamera>>,
) {
    if !mouse_button.pressed(MouseButton::Middle) {
        mouse_motion.clear();
        return;
    }

    let Ok((mut transform, zoom)) = camera_query.single_mut() else {
        return;
    };

    for event in mouse_motion.read() {
        let delta = event.delta * zoom.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }
}

/// Camera position that keeps `focus` fixed on screen when the scale changes.
fn zoom_about(camera_pos: Vec2, focus: Vec2, old_scale: f32, new_scale: f32) -> Vec2 {
    focus + (camera_pos - focus) * (new_scale / old_scale)
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    camera: CameraParams,
    mut camera_query: Query<(&mut CameraZoom, &mut Transform), With<EditorCamera>>,
) {
    let focus = camera.cursor_world_pos();
    let Ok((mut zoom, mut transform)) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };

        let old_scale = zoom.scale;
        zoom.scale = (zoom.scale - scroll_amount).clamp(MIN_ZOOM, MAX_ZOOM);
        if let Some(focus) = focus {
            let pos = zoom_about(transform.translation.truncate(), focus, old_scale, zoom.scale);
            transform.translation.x = pos.x;
            transform.translation.y = pos.y;
        }
    }
}

pub fn apply_camera_zoom(
    mut camera_query: Query<(&CameraZoom, &mut Projection), (With<EditorCamera>, Changed<CameraZoom>)>,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = zoom.scale;
        }
    }
}

/// Home recenters the view at the origin with no zoom.
pub fn reset_camera(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut camera_query: Query<(&mut CameraZoom, &mut Transform), With<EditorCamera>>,
) {
    if !keyboard.just_pressed(KeyCode::Home) {
        return;
    }
    let Ok((mut zoom, mut transform)) = camera_query.single_mut() else {
        return;
    };
    zoom.scale = 1.0;
    transform.translation.x = 0.0;
    transform.translation.y = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_keeps_focus_fixed() {
        let camera = Vec2::new(100.0, 50.0);
        let focus = Vec2::new(140.0, 30.0);
        // Screen offset of the focus point, in world units at the old scale
        let offset_before = (focus - camera) / 1.0;
        let moved = zoom_about(camera, focus, 1.0, 2.0);
        let offset_after = (focus - moved) / 2.0;
        assert!((offset_before - offset_after).length() < 1e-4);
    }

    #[test]
    fn test_zoom_about_camera_center_does_not_move() {
        let camera = Vec2::new(3.0, 4.0);
        assert_eq!(zoom_about(camera, camera, 1.0, 0.5), camera);
    }
}
