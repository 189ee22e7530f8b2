//! Interactive editor: camera, tools, selection, and annotation rendering.
//!
//! ## Module Structure
//!
//! - [`annotations`] - Creation tools, marker text box, and rendering
//! - [`camera`] - Pan/zoom camera
//! - [`conditions`] - Run conditions for editor systems
//! - [`params`] - Shared `SystemParam` bundles
//! - [`selection`] - Click selection, drags, and selection shortcuts
//! - [`tools`] - Tool switching and the tool bound to the selection
//! - [`window`] - Redraw requests and window title

pub mod annotations;
mod camera;
mod conditions;
pub mod params;
mod selection;
pub mod tools;
mod window;

pub use annotations::AnnotationSettings;
pub use camera::EditorCamera;
pub use selection::AnnotationSelection;
pub use tools::{CurrentTool, EditorTool, ToolBinding};
pub use window::{RedrawRequests, APP_TITLE};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{AppConfig, ConfigLoaded};
use crate::history::{apply_history_requests, handle_history_shortcuts, HistoryRequest};
use crate::layer::{AnnotationLayer, LayerChange};

use conditions::{drag_active, has_selection, text_box_open};

/// Input handling runs before anything is painted for the frame
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
enum EditorSet {
    Input,
    Render,
}

/// Build the annotation layer with every built-in kind registered.
///
/// A kind whose mutator table cannot be resolved is a programming error, so
/// registration failure stops the app.
fn build_layer() -> AnnotationLayer {
    let mut layer = match AnnotationLayer::with_builtin_variants() {
        Ok(layer) => layer,
        Err(e) => {
            error!("Annotation kinds failed to register: {}", e);
            panic!("annotation kinds failed to register: {e}");
        }
    };
    layer.add_listener(|change: &LayerChange| {
        trace!("{:?} {} ({:?})", change.kind, change.id, change.origin);
    });
    layer
}

/// Startup system copying persisted defaults into the editor
fn apply_config_defaults(
    config: Res<AppConfig>,
    mut settings: ResMut<AnnotationSettings>,
    mut layer: ResMut<AnnotationLayer>,
) {
    let data = &config.data;
    settings.stroke_color = data.stroke_color;
    settings.stroke_width = data.line_width;
    settings.font_size = data.font_size;
    settings.hit_tolerance = data.hit_tolerance;
    layer.set_history_limit(data.history_limit);
    debug!("Undo history keeps {} steps", data.history_limit);
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(build_layer())
            .init_resource::<tools::CurrentTool>()
            .init_resource::<tools::BoundTool>()
            .init_resource::<selection::AnnotationSelection>()
            .init_resource::<selection::DragState>()
            .init_resource::<annotations::DrawState>()
            .init_resource::<annotations::ShapeDrawState>()
            .init_resource::<annotations::PolylineDrawState>()
            .init_resource::<annotations::TextEditState>()
            .init_resource::<annotations::AnnotationSettings>()
            .init_resource::<annotations::PendingLabels>()
            .add_message::<HistoryRequest>()
            .init_gizmo_group::<annotations::AnnotationGizmoGroup>()
            .init_gizmo_group::<selection::SelectionGizmoGroup>()
            .configure_sets(Update, (EditorSet::Input, EditorSet::Render).chain())
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    annotations::configure_annotation_gizmos,
                    selection::configure_selection_gizmos,
                    apply_config_defaults.after(ConfigLoaded),
                ),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::apply_camera_zoom,
                    camera::reset_camera,
                    tools::handle_tool_shortcuts,
                    tools::update_cursor_icon,
                    (handle_history_shortcuts, apply_history_requests).chain(),
                )
                    .in_set(EditorSet::Input),
            )
            .add_systems(
                Update,
                (
                    selection::handle_selection,
                    selection::handle_drag.run_if(drag_active),
                    selection::handle_deletion.run_if(has_selection),
                    selection::handle_escape_clear_selection.run_if(has_selection),
                    selection::handle_reorder.run_if(has_selection),
                    selection::handle_style_shortcuts,
                )
                    .chain()
                    .after(apply_history_requests)
                    .in_set(EditorSet::Input),
            )
            .add_systems(
                Update,
                (
                    annotations::handle_draw,
                    annotations::handle_shape,
                    annotations::handle_polyline,
                    annotations::handle_text,
                )
                    .after(tools::handle_tool_shortcuts)
                    .after(apply_history_requests)
                    .in_set(EditorSet::Input),
            )
            .add_systems(
                Update,
                (
                    (
                        annotations::render_annotations,
                        annotations::render_text_anchor_preview,
                    )
                        .chain(),
                    annotations::render_tool_preview,
                    selection::draw_selection_indicators,
                    window::update_window_title,
                )
                    .in_set(EditorSet::Render),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    annotations::text_annotation_input_ui.run_if(text_box_open),
                    annotations::render_text_labels,
                ),
            );
    }
}
