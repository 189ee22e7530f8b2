//! Bevy systems for undo/redo requests.
//!
//! Keyboard shortcuts emit [`HistoryRequest`] messages, and any other UI can
//! send the same message. A single system replays them against the layer.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::editor::params::wants_keyboard_input;
use crate::editor::{AnnotationSelection, RedrawRequests, ToolBinding};
use crate::layer::AnnotationLayer;

use super::execute::ReplayHooks;

/// Message asking for one undo or redo step
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRequest {
    Undo,
    Redo,
}

/// Map the pressed keys to a history request.
///
/// Ctrl+Z undoes; Ctrl+Y and Ctrl+Shift+Z redo.
fn shortcut_request(keyboard: &ButtonInput<KeyCode>) -> Option<HistoryRequest> {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl {
        return None;
    }
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if keyboard.just_pressed(KeyCode::KeyY) || (shift && keyboard.just_pressed(KeyCode::KeyZ)) {
        Some(HistoryRequest::Redo)
    } else if keyboard.just_pressed(KeyCode::KeyZ) {
        Some(HistoryRequest::Undo)
    } else {
        None
    }
}

/// System to handle undo/redo keyboard shortcuts
pub fn handle_history_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: MessageWriter<HistoryRequest>,
    mut contexts: EguiContexts,
) {
    // Text fields keep their own undo
    if wants_keyboard_input(&mut contexts) {
        return;
    }

    if let Some(request) = shortcut_request(&keyboard) {
        requests.write(request);
    }
}

/// System to replay requested undo/redo steps against the layer
pub fn apply_history_requests(
    mut requests: MessageReader<HistoryRequest>,
    mut layer: ResMut<AnnotationLayer>,
    mut selection: ResMut<AnnotationSelection>,
    mut tools: ToolBinding,
    mut redraw: RedrawRequests,
) {
    for request in requests.read() {
        let mut hooks = ReplayHooks {
            selection: &mut *selection,
            tools: &mut tools,
            redraw: &mut redraw,
        };
        let result = match request {
            HistoryRequest::Undo => layer.undo(&mut hooks),
            HistoryRequest::Redo => layer.redo(&mut hooks),
        };
        match result {
            Ok(Some(description)) => info!("{:?}: {}", request, description),
            Ok(None) => debug!("Nothing to {:?}", request),
            Err(e) => warn!("{:?} failed: {}", request, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pressed: &[KeyCode]) -> ButtonInput<KeyCode> {
        let mut keyboard = ButtonInput::default();
        for key in pressed {
            keyboard.press(*key);
        }
        keyboard
    }

    #[test]
    fn test_shortcut_mapping() {
        assert_eq!(
            shortcut_request(&keys(&[KeyCode::ControlLeft, KeyCode::KeyZ])),
            Some(HistoryRequest::Undo)
        );
        assert_eq!(
            shortcut_request(&keys(&[KeyCode::ControlRight, KeyCode::KeyY])),
            Some(HistoryRequest::Redo)
        );
        assert_eq!(
            shortcut_request(&keys(&[KeyCode::ControlLeft, KeyCode::ShiftLeft, KeyCode::KeyZ])),
            Some(HistoryRequest::Redo)
        );
        // Plain Z belongs to the tools
        assert_eq!(shortcut_request(&keys(&[KeyCode::KeyZ])), None);
    }
}
