//! Annotation tools and rendering.
//!
//! The annotation items themselves live in the layer resource; this module
//! holds the interactive side: creation tools, the marker text box, and the
//! gizmo/egui painting of everything in the layer.
//!
//! ## Module Structure
//!
//! - [`state`] - Tool state resources (DrawState, ShapeDrawState, AnnotationSettings)
//! - [`gizmo`] - Custom gizmo group for annotation strokes
//! - [`draw_tool`] - Freehand drawing system
//! - [`shape_tool`] - Arrow, rectangle and ellipse drag tools
//! - [`polyline_tool`] - Click-to-place polyline and polygon tool
//! - [`text_tool`] - Numbered marker placement and text editing
//! - [`rendering`] - Gizmo painter, tool previews, and egui text labels

mod draw_tool;
mod gizmo;
mod polyline_tool;
mod rendering;
mod shape_tool;
mod state;
mod text_tool;

// Re-exports - State
pub use state::{
    AnnotationSettings, DrawState, PolylineDrawState, ShapeDrawState, TextEditState,
    MAX_LINE_WIDTH, MIN_LINE_WIDTH, PALETTE,
};

// Re-exports - Gizmo
pub use gizmo::{configure_annotation_gizmos, AnnotationGizmoGroup};

// Re-exports - Systems
pub use draw_tool::handle_draw;
pub use polyline_tool::handle_polyline;
pub use rendering::{
    render_annotations, render_text_anchor_preview, render_text_labels, render_tool_preview,
    PendingLabels,
};
pub use shape_tool::handle_shape;
pub use text_tool::{handle_text, text_annotation_input_ui};
