//! Keyboard shortcuts for the selected annotation.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::annotation::{AccessorTag, FieldValue};
use crate::config::UpdateAnnotationDefaultsRequest;
use crate::editor::annotations::{AnnotationSettings, MAX_LINE_WIDTH, MIN_LINE_WIDTH, PALETTE};
use crate::editor::params::wants_keyboard_input;
use crate::editor::tools::{CurrentTool, EditorTool, ToolBinding};
use crate::history::ToolController;
use crate::layer::AnnotationLayer;

use super::AnnotationSelection;

const DIGIT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

pub fn handle_deletion(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_tool: Res<CurrentTool>,
    mut layer: ResMut<AnnotationLayer>,
    mut selection: ResMut<AnnotationSelection>,
    mut tools: ToolBinding,
    mut contexts: EguiContexts,
) {
    // Don't trigger if typing in UI
    if wants_keyboard_input(&mut contexts) {
        return;
    }

    // Backspace belongs to the polyline tool while it is active
    if current_tool.tool != EditorTool::Select {
        return;
    }

    let should_delete =
        keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace);
    if !should_delete {
        return;
    }

    let Some(id) = selection.get() else {
        return;
    };

    selection.clear();
    tools.deactivate();
    match layer.remove_item(id) {
        Ok(item) => info!("Deleted {} {}", item.kind(), id),
        Err(e) => warn!("Could not delete annotation {}: {}", id, e),
    }
}

pub fn handle_escape_clear_selection(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_tool: Res<CurrentTool>,
    mut selection: ResMut<AnnotationSelection>,
    mut tools: ToolBinding,
    mut contexts: EguiContexts,
) {
    if wants_keyboard_input(&mut contexts) {
        return;
    }

    if current_tool.tool == EditorTool::Select
        && keyboard.just_pressed(KeyCode::Escape)
        && selection.get().is_some()
    {
        selection.clear();
        tools.deactivate();
    }
}

/// PageUp brings the selection to the front, PageDown sends it to the back
pub fn handle_reorder(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut layer: ResMut<AnnotationLayer>,
    selection: Res<AnnotationSelection>,
    mut contexts: EguiContexts,
) {
    if wants_keyboard_input(&mut contexts) {
        return;
    }

    let Some(id) = selection.get() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::PageUp) && layer.bring_to_front(id) {
        debug!("Brought {} to front", id);
    } else if keyboard.just_pressed(KeyCode::PageDown) && layer.send_to_back(id) {
        debug!("Sent {} to back", id);
    }
}

/// Change of stroke style requested from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StyleShortcut {
    Color(Color),
    WidthStep(f32),
}

fn style_shortcut(keyboard: &ButtonInput<KeyCode>) -> Option<StyleShortcut> {
    if let Some(index) = DIGIT_KEYS.iter().position(|k| keyboard.just_pressed(*k)) {
        return Some(StyleShortcut::Color(PALETTE[index]));
    }
    if keyboard.just_pressed(KeyCode::BracketLeft) {
        return Some(StyleShortcut::WidthStep(-1.0));
    }
    if keyboard.just_pressed(KeyCode::BracketRight) {
        return Some(StyleShortcut::WidthStep(1.0));
    }
    None
}

fn stepped_width(current: f32, step: f32) -> f32 {
    (current + step).clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
}

/// Digits 1-9 pick a palette color, `[` and `]` change the line width.
///
/// With a selection the annotation itself is edited (one undo step per key
/// press); otherwise the defaults for new annotations change.
pub fn handle_style_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut layer: ResMut<AnnotationLayer>,
    selection: Res<AnnotationSelection>,
    mut settings: ResMut<AnnotationSettings>,
    mut defaults_events: MessageWriter<UpdateAnnotationDefaultsRequest>,
    mut contexts: EguiContexts,
) {
    if wants_keyboard_input(&mut contexts) {
        return;
    }

    // Ctrl+digit is left free for other bindings
    if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
        return;
    }

    let Some(shortcut) = style_shortcut(&keyboard) else {
        return;
    };

    if let Some(id) = selection.get() {
        let result = layer.edit(id).and_then(|mut item| match shortcut {
            StyleShortcut::Color(color) => item.set_foreground(Some(color)),
            StyleShortcut::WidthStep(step) => {
                let current = match item.read(AccessorTag::LineWidth) {
                    Some(FieldValue::Float(width)) => width,
                    _ => settings.stroke_width,
                };
                item.set_line_width(Some(stepped_width(current, step)))
            }
        });
        if let Err(e) = result {
            warn!("Could not restyle annotation {}: {}", id, e);
        }
        return;
    }

    match shortcut {
        StyleShortcut::Color(color) => {
            settings.stroke_color = color;
            defaults_events.write(UpdateAnnotationDefaultsRequest {
                stroke_color: Some(color),
                line_width: None,
            });
        }
        StyleShortcut::WidthStep(step) => {
            let width = stepped_width(settings.stroke_width, step);
            settings.stroke_width = width;
            defaults_events.write(UpdateAnnotationDefaultsRequest {
                stroke_color: None,
                line_width: Some(width),
            });
        }
    }
}
