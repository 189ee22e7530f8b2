//! Run conditions for controlling when editor systems execute.
//!
//! These conditions help optimize performance by preventing systems from running
//! when they have no work to do.

use bevy::prelude::*;

use crate::editor::annotations::TextEditState;
use crate::editor::selection::{AnnotationSelection, DragState};
use crate::editor::tools::{CurrentTool, EditorTool};

/// Run condition: returns true when the current tool matches the specified tool.
///
/// Usage: `.run_if(tool_is(EditorTool::Select))`
pub fn tool_is(tool: EditorTool) -> impl FnMut(Res<CurrentTool>) -> bool + Clone {
    move |current: Res<CurrentTool>| current.tool == tool
}

/// Run condition: returns true when an annotation is selected.
pub fn has_selection(selection: Res<AnnotationSelection>) -> bool {
    selection.get().is_some()
}

/// Run condition: returns true while a selection drag is in progress.
pub fn drag_active(drag_state: Res<DragState>) -> bool {
    drag_state.active.is_some()
}

/// Run condition: returns true while the marker text box is open.
pub fn text_box_open(text_state: Res<TextEditState>) -> bool {
    text_state.is_active()
}
