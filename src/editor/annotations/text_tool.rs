//! Text tool system for placing and editing numbered markers.

use bevy::prelude::*;
use bevy_egui::egui;
use bevy_egui::EguiContexts;

use crate::annotation::{AccessorTag, AnnotationId, FieldValue, NumberedText};
use crate::history::{SelectionState, ToolController};
use crate::layer::AnnotationLayer;

use super::super::camera::EditorCamera;
use super::super::params::{is_cursor_over_ui, CameraWithProjection};
use super::super::selection::AnnotationSelection;
use super::super::tools::{CurrentTool, EditorTool, ToolBinding};
use super::rendering::next_marker_number;
use super::state::{AnnotationSettings, TextEditState};

/// What confirming the text box did to the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TextCommit {
    Created(AnnotationId),
    Updated(AnnotationId),
    Removed(AnnotationId),
    Nothing,
}

/// Writes the text box back to the layer and closes it.
///
/// A new marker is created with the next free number, an edited marker gets
/// its text replaced, and an edited marker left empty is deleted.
pub(super) fn commit_text(
    layer: &mut AnnotationLayer,
    text_state: &mut TextEditState,
    settings: &AnnotationSettings,
) -> TextCommit {
    let text = text_state.buffer.trim().to_owned();
    let anchor = text_state.anchor;
    let editing = text_state.editing;
    text_state.cancel();

    if let Some(id) = editing {
        if text.is_empty() {
            return match layer.remove_item(id) {
                Ok(_) => TextCommit::Removed(id),
                Err(e) => {
                    warn!("Could not remove empty marker {}: {}", id, e);
                    TextCommit::Nothing
                }
            };
        }
        return match layer.edit(id).and_then(|mut item| item.set_text(text)) {
            Ok(()) => TextCommit::Updated(id),
            Err(e) => {
                warn!("Could not edit marker {}: {}", id, e);
                TextCommit::Nothing
            }
        };
    }

    let Some(anchor) = anchor.filter(|_| !text.is_empty()) else {
        return TextCommit::Nothing;
    };
    let style = settings
        .new_item_style()
        .with_font_size(settings.font_size);
    let state = NumberedText::initial_state(anchor, &text, next_marker_number(layer), style);
    match layer.add_item_with(NumberedText::KIND, state) {
        Ok(item) => TextCommit::Created(item.id()),
        Err(e) => {
            warn!("Could not create marker: {}", e);
            TextCommit::Nothing
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_text(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentTool>,
    mut layer: ResMut<AnnotationLayer>,
    settings: Res<AnnotationSettings>,
    mut selection: ResMut<AnnotationSelection>,
    mut tools: ToolBinding,
    camera: CameraWithProjection,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::Text || !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    // Clicks inside the text box itself land on the UI
    if is_cursor_over_ui(&mut contexts) {
        return;
    }

    let Some(world_pos) = camera.cursor_world_pos() else {
        return;
    };

    // Finalize any current editing
    if tools.text.is_active()
        && let TextCommit::Removed(id) = commit_text(&mut layer, &mut tools.text, &settings)
        && selection.get() == Some(id)
    {
        selection.clear();
        tools.deactivate();
    }

    let tolerance = settings.hit_tolerance * camera.zoom_scale();
    let clicked_marker = layer
        .hit_test(world_pos, tolerance, &settings.style_defaults())
        .and_then(|id| layer.get(id))
        .filter(|item| item.kind() == NumberedText::KIND);

    if let Some(item) = clicked_marker {
        // Edit existing marker
        let id = item.id();
        selection.set_selected(Some(id));
        tools.activate_tool_for(item);
        tools.text.editing = Some(id);
        tools.text.buffer = match item.read(AccessorTag::Text) {
            Some(FieldValue::Text(text)) => text,
            _ => String::new(),
        };
    } else {
        // New marker at position once the text is confirmed
        if selection.get().is_some() {
            selection.clear();
            tools.deactivate();
        }
        tools.text.anchor = Some(world_pos);
        tools.text.buffer.clear();
    }
}

/// UI system for the marker text box - shows an egui text input
#[allow(clippy::too_many_arguments)]
pub fn text_annotation_input_ui(
    mut contexts: EguiContexts,
    mut layer: ResMut<AnnotationLayer>,
    settings: Res<AnnotationSettings>,
    mut selection: ResMut<AnnotationSelection>,
    mut tools: ToolBinding,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    keyboard: Res<ButtonInput<KeyCode>>,
) {
    // Only show while placing or editing a marker
    let world_pos = match (tools.text.editing, tools.text.anchor) {
        (Some(id), _) => {
            let anchor = layer.get(id).and_then(|item| item.points().first().copied());
            let Some(anchor) = anchor else {
                // Marker no longer exists, clear editing state
                tools.text.cancel();
                return;
            };
            anchor
        }
        (None, Some(anchor)) => anchor,
        (None, None) => return,
    };

    // Check for escape to cancel
    if keyboard.just_pressed(KeyCode::Escape) {
        tools.text.cancel();
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    // Convert world position to screen position
    let Ok(screen_pos) = camera.world_to_viewport(camera_transform, world_pos.extend(0.0)) else {
        return;
    };

    let mut should_finalize = false;

    // Create an egui Area just below the marker
    egui::Area::new(egui::Id::new("text_annotation_input"))
        .fixed_pos(egui::pos2(screen_pos.x, screen_pos.y + settings.font_size))
        .pivot(egui::Align2::LEFT_TOP)
        .show(ctx, |ui| {
            ui.set_min_width(150.0);
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut tools.text.buffer)
                        .hint_text("Enter text...")
                        .desired_width(200.0)
                        .font(egui::TextStyle::Body),
                );

                // Request focus only when not already focused
                if !response.has_focus() {
                    response.request_focus();
                }

                // Finalize on Enter
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    should_finalize = true;
                }

                // Show hint
                ui.label("Press Enter to confirm, Esc to cancel");
            });
        });

    if should_finalize
        && let TextCommit::Removed(id) = commit_text(&mut layer, &mut tools.text, &settings)
        && selection.get() == Some(id)
    {
        selection.clear();
        tools.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;

    fn setup() -> (AnnotationLayer, AnnotationSettings) {
        (
            AnnotationLayer::with_builtin_variants().unwrap(),
            AnnotationSettings::default(),
        )
    }

    fn marker_text(layer: &AnnotationLayer, id: AnnotationId) -> Option<FieldValue> {
        layer.get(id).and_then(|item| item.read(AccessorTag::Text))
    }

    #[test]
    fn test_new_marker_gets_next_number() {
        let (mut layer, settings) = setup();
        for (i, label) in ["Gate", "Well"].into_iter().enumerate() {
            let mut state = TextEditState {
                anchor: Some(Vec2::new(i as f32 * 50.0, 0.0)),
                editing: None,
                buffer: format!("  {label} "),
            };
            let TextCommit::Created(id) = commit_text(&mut layer, &mut state, &settings) else {
                panic!("marker was not created");
            };
            assert_eq!(marker_text(&layer, id), Some(FieldValue::Text(label.into())));
            assert_eq!(
                layer.get(id).unwrap().read(AccessorTag::Number),
                Some(FieldValue::Int(i as i64 + 1))
            );
            assert!(!state.is_active());
        }
        assert_eq!(layer.history().undo_count(), 2);
    }

    #[test]
    fn test_empty_new_marker_is_discarded() {
        let (mut layer, settings) = setup();
        let mut state = TextEditState {
            anchor: Some(Vec2::ZERO),
            editing: None,
            buffer: "   ".into(),
        };
        assert_eq!(commit_text(&mut layer, &mut state, &settings), TextCommit::Nothing);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_editing_marker_records_one_step() {
        let (mut layer, settings) = setup();
        let id = layer
            .add_item_with(
                NumberedText::KIND,
                NumberedText::initial_state(Vec2::ZERO, "Old", 1, default()),
            )
            .unwrap()
            .id();

        let mut state = TextEditState {
            anchor: None,
            editing: Some(id),
            buffer: "New".into(),
        };
        assert_eq!(commit_text(&mut layer, &mut state, &settings), TextCommit::Updated(id));
        assert_eq!(marker_text(&layer, id), Some(FieldValue::Text("New".into())));
        assert_eq!(layer.history().undo_description(), Some("Edit text"));

        // Confirming unchanged text records nothing
        let mut state = TextEditState {
            anchor: None,
            editing: Some(id),
            buffer: "New".into(),
        };
        let before = layer.history().undo_count();
        commit_text(&mut layer, &mut state, &settings);
        assert_eq!(layer.history().undo_count(), before);
    }

    #[test]
    fn test_clearing_marker_text_deletes_it() {
        let (mut layer, settings) = setup();
        let id = layer
            .add_item_with(
                NumberedText::KIND,
                NumberedText::initial_state(Vec2::ZERO, "Gone", 1, default()),
            )
            .unwrap()
            .id();

        let mut state = TextEditState {
            anchor: None,
            editing: Some(id),
            buffer: String::new(),
        };
        assert_eq!(commit_text(&mut layer, &mut state, &settings), TextCommit::Removed(id));
        assert!(!layer.contains(id));
        assert!(layer.history().undo_description().is_some_and(|d| d.starts_with("Delete")));
    }

    #[test]
    fn test_marker_style_carries_font_size() {
        let (mut layer, mut settings) = setup();
        settings.font_size = 30.0;
        let mut state = TextEditState {
            anchor: Some(Vec2::ZERO),
            editing: None,
            buffer: "Camp".into(),
        };
        let TextCommit::Created(id) = commit_text(&mut layer, &mut state, &settings) else {
            panic!("marker was not created");
        };
        let item: &dyn Annotation = layer.get(id).unwrap();
        assert_eq!(item.style().font_size, Some(30.0));
    }
}
