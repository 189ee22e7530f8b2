use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

use crate::annotation::{
    AccessorTag, Annotation, AnnotationId, Arrow, EllipseShape, FieldValue, FreeLine,
    NumberedText, Polyline, RectangleShape,
};
use crate::history::ToolController;

use super::annotations::{PolylineDrawState, ShapeDrawState, TextEditState};
use super::params::wants_keyboard_input;
use super::selection::{AnnotationSelection, DragState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTool {
    #[default]
    Select,
    Draw,
    Arrow,
    Rectangle,
    Ellipse,
    Polyline,
    Polygon,
    Text,
}

impl EditorTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorTool::Select => "Select (V)",
            EditorTool::Draw => "Draw (D)",
            EditorTool::Arrow => "Arrow (A)",
            EditorTool::Rectangle => "Rectangle (R)",
            EditorTool::Ellipse => "Ellipse (E)",
            EditorTool::Polyline => "Polyline (L)",
            EditorTool::Polygon => "Polygon (G)",
            EditorTool::Text => "Text (T)",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            EditorTool::Select => CursorIcon::System(SystemCursorIcon::Default),
            EditorTool::Text => CursorIcon::System(SystemCursorIcon::Text),
            _ => CursorIcon::System(SystemCursorIcon::Crosshair),
        }
    }

    pub fn all() -> &'static [EditorTool] {
        &[
            EditorTool::Select,
            EditorTool::Draw,
            EditorTool::Arrow,
            EditorTool::Rectangle,
            EditorTool::Ellipse,
            EditorTool::Polyline,
            EditorTool::Polygon,
            EditorTool::Text,
        ]
    }

    /// Annotation kind this tool creates, if it creates one.
    pub fn creates_kind(&self) -> Option<&'static str> {
        match self {
            EditorTool::Select => None,
            EditorTool::Draw => Some(FreeLine::KIND),
            EditorTool::Arrow => Some(Arrow::KIND),
            EditorTool::Rectangle => Some(RectangleShape::KIND),
            EditorTool::Ellipse => Some(EllipseShape::KIND),
            EditorTool::Polyline => Some(Polyline::OPEN_KIND),
            EditorTool::Polygon => Some(Polyline::CLOSED_KIND),
            EditorTool::Text => Some(NumberedText::KIND),
        }
    }

    /// Tools that build a shape from two dragged corners.
    pub fn is_two_point(&self) -> bool {
        matches!(
            self,
            EditorTool::Arrow | EditorTool::Rectangle | EditorTool::Ellipse
        )
    }

    /// The tool that edits annotations of `kind`.
    pub fn for_kind(kind: &str) -> EditorTool {
        Self::all()
            .iter()
            .copied()
            .find(|tool| tool.creates_kind() == Some(kind))
            .unwrap_or(EditorTool::Select)
    }

    fn shortcut(key: KeyCode) -> Option<EditorTool> {
        match key {
            KeyCode::KeyV | KeyCode::KeyS => Some(EditorTool::Select),
            KeyCode::KeyD => Some(EditorTool::Draw),
            KeyCode::KeyA => Some(EditorTool::Arrow),
            KeyCode::KeyR => Some(EditorTool::Rectangle),
            KeyCode::KeyE => Some(EditorTool::Ellipse),
            KeyCode::KeyL => Some(EditorTool::Polyline),
            KeyCode::KeyG => Some(EditorTool::Polygon),
            KeyCode::KeyT => Some(EditorTool::Text),
            _ => None,
        }
    }
}

#[derive(Resource, Default)]
pub struct CurrentTool {
    pub tool: EditorTool,
}

/// The editing tool attached to the selected annotation.
#[derive(Resource, Default, Debug)]
pub struct BoundTool {
    pub item: Option<AnnotationId>,
    pub tool: Option<EditorTool>,
}

impl BoundTool {
    pub fn is_bound_to(&self, id: AnnotationId) -> bool {
        self.item == Some(id)
    }
}

/// Resources touched when a tool is bound to or released from an annotation.
#[derive(SystemParam)]
pub struct ToolBinding<'w> {
    pub bound: ResMut<'w, BoundTool>,
    pub drag: ResMut<'w, DragState>,
    pub text: ResMut<'w, TextEditState>,
}

impl ToolController for ToolBinding<'_> {
    fn deactivate(&mut self) {
        if let Some(id) = self.bound.item.take() {
            debug!("Released {:?} from {}", self.bound.tool, id);
            if self.text.editing == Some(id) {
                self.text.cancel();
            }
        }
        self.bound.tool = None;
        self.drag.cancel();
    }

    fn activate_tool_for(&mut self, item: &dyn Annotation) {
        let id = item.id();
        self.bound.item = Some(id);
        self.bound.tool = Some(EditorTool::for_kind(item.kind()));
        self.drag.cancel();
        // Keep an open text box in step with the item's current text
        if self.text.editing == Some(id)
            && let Some(FieldValue::Text(text)) = item.read(AccessorTag::Text)
        {
            self.text.buffer = text;
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut current_tool: ResMut<CurrentTool>,
    mut selection: ResMut<AnnotationSelection>,
    mut tools: ToolBinding,
    mut shape_state: ResMut<ShapeDrawState>,
    mut polyline_state: ResMut<PolylineDrawState>,
    mut contexts: EguiContexts,
) {
    // Don't change tools if typing in a text field
    if wants_keyboard_input(&mut contexts) {
        return;
    }

    // Tool letters double as shortcuts with Ctrl (Ctrl+S, Ctrl+Z...)
    if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
        return;
    }

    let Some(tool) = keyboard
        .get_just_pressed()
        .find_map(|key| EditorTool::shortcut(*key))
    else {
        return;
    };

    if tool != current_tool.tool {
        // Clear selection and any half-finished shape when switching tools
        selection.clear();
        tools.deactivate();
        shape_state.start = None;
        polyline_state.points.clear();
        tools.text.cancel();
        debug!("Switched to {}", tool.display_name());
    }
    current_tool.tool = tool;
}

pub fn update_cursor_icon(
    current_tool: Res<CurrentTool>,
    window_query: Query<Entity, With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok(entity) = window_query.single() else {
        return;
    };

    // Use default cursor over UI, tool cursor in editor space
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        commands
            .entity(entity)
            .insert(CursorIcon::System(SystemCursorIcon::Default));
        return;
    }

    commands.entity(entity).insert(current_tool.tool.cursor_icon());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_contain_shortcuts() {
        // Each display name should contain its keyboard shortcut in parentheses
        for tool in EditorTool::all() {
            let name = tool.display_name();
            assert!(name.contains('('), "Display name should contain shortcut: {}", name);
            assert!(name.contains(')'), "Display name should contain shortcut: {}", name);
        }
    }

    #[test]
    fn test_shortcuts_match_display_names() {
        for tool in EditorTool::all() {
            let letter = tool.display_name().chars().rev().nth(1).unwrap();
            let key = match letter {
                'V' => KeyCode::KeyV,
                'D' => KeyCode::KeyD,
                'A' => KeyCode::KeyA,
                'R' => KeyCode::KeyR,
                'E' => KeyCode::KeyE,
                'L' => KeyCode::KeyL,
                'G' => KeyCode::KeyG,
                'T' => KeyCode::KeyT,
                other => panic!("unexpected shortcut {other}"),
            };
            assert_eq!(EditorTool::shortcut(key), Some(*tool));
        }
    }

    #[test]
    fn test_every_kind_has_a_creating_tool() {
        let creators: Vec<_> = EditorTool::all()
            .iter()
            .filter_map(|t| t.creates_kind())
            .collect();
        assert_eq!(creators.len(), 7);
        for kind in creators {
            assert_eq!(EditorTool::for_kind(kind).creates_kind(), Some(kind));
        }
        assert_eq!(EditorTool::for_kind("unknown"), EditorTool::Select);
    }

    #[test]
    fn test_default_tool_is_select() {
        assert_eq!(EditorTool::default(), EditorTool::Select);
        assert_eq!(CurrentTool::default().tool, EditorTool::Select);
    }

    #[test]
    fn test_cursor_icons() {
        assert_eq!(
            EditorTool::Select.cursor_icon(),
            CursorIcon::System(SystemCursorIcon::Default)
        );
        assert_eq!(
            EditorTool::Text.cursor_icon(),
            CursorIcon::System(SystemCursorIcon::Text)
        );
        assert_eq!(
            EditorTool::Polygon.cursor_icon(),
            CursorIcon::System(SystemCursorIcon::Crosshair)
        );
    }
}
