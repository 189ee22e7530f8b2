//! Rendering systems for annotations.
//!
//! Strokes are painted with gizmos; text labels are queued during `Update`
//! and drawn with egui in the egui pass.

use bevy::gizmos::prelude::*;
use bevy::prelude::*;
use bevy_egui::egui;
use bevy_egui::EguiContexts;

use crate::annotation::{
    Annotation, AnnotationId, AnnotationState, FontWeight, NumberedText, Painter, StyleDefaults,
    TextLabel,
};
use crate::history::AnnotationFactory;
use crate::layer::AnnotationLayer;

use super::super::params::{CameraParams, CameraWithProjection};
use super::super::selection::{DragState, DragTarget};
use super::super::tools::{CurrentTool, EditorTool};
use super::gizmo::AnnotationGizmoGroup;
use super::state::{AnnotationSettings, DrawState, PolylineDrawState, ShapeDrawState, TextEditState};

/// Opacity applied to in-progress shapes
const PREVIEW_ALPHA: f32 = 0.5;

/// Most parallel strands drawn for one wide stroke
const MAX_STRANDS: usize = 12;

/// Text labels collected while painting, drawn by [`render_text_labels`]
#[derive(Resource, Default)]
pub struct PendingLabels(pub Vec<TextLabel>);

/// [`Painter`] over the annotation gizmo group.
pub struct GizmoPainter<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's, AnnotationGizmoGroup>,
    labels: &'a mut Vec<TextLabel>,
    offset: Vec2,
    alpha: f32,
}

impl<'a, 'w, 's> GizmoPainter<'a, 'w, 's> {
    pub fn new(
        gizmos: &'a mut Gizmos<'w, 's, AnnotationGizmoGroup>,
        labels: &'a mut Vec<TextLabel>,
    ) -> Self {
        Self {
            gizmos,
            labels,
            offset: Vec2::ZERO,
            alpha: 1.0,
        }
    }

    /// Shift everything painted afterwards by `offset`
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    fn tint(&self, color: Color) -> Color {
        color.with_alpha(color.alpha() * self.alpha)
    }
}

impl Painter for GizmoPainter<'_, '_, '_> {
    fn line(&mut self, start: Vec2, end: Vec2, color: Color, width: f32) {
        let color = self.tint(color);
        let (start, end) = (start + self.offset, end + self.offset);
        for offset in strand_offsets(start, end, width) {
            self.gizmos.line_2d(start + offset, end + offset, color);
        }
    }

    fn label(&mut self, mut label: TextLabel) {
        label.anchor += self.offset;
        label.color = self.tint(label.color);
        label.background = label.background.map(|c| self.tint(c));
        self.labels.push(label);
    }
}

/// Perpendicular offsets of the parallel strands that make up a wide stroke
fn strand_offsets(start: Vec2, end: Vec2, width: f32) -> Vec<Vec2> {
    let Some(dir) = (end - start).try_normalize() else {
        return vec![Vec2::ZERO];
    };
    let strands = (width.round() as usize).clamp(1, MAX_STRANDS);
    if strands == 1 {
        return vec![Vec2::ZERO];
    }
    let normal = dir.perp();
    let spacing = width / (strands - 1) as f32;
    (0..strands)
        .map(|i| normal * (i as f32 * spacing - width / 2.0))
        .collect()
}

/// Throwaway instance used to preview an item that is not (yet) in the layer
fn preview_item(
    factory: &AnnotationFactory,
    kind: &str,
    state: AnnotationState,
) -> Option<Box<dyn Annotation>> {
    let mut item = factory.create(kind, AnnotationId::UNASSIGNED).ok()?;
    item.import_state(state).ok()?;
    Some(item)
}

/// The item as it will look once the active vertex drag is released
fn vertex_drag_preview(
    factory: &AnnotationFactory,
    item: &dyn Annotation,
    drag_state: &DragState,
) -> Option<Box<dyn Annotation>> {
    let drag = drag_state.active?;
    let DragTarget::Vertex(index) = drag.target else {
        return None;
    };
    if drag.item != item.id() {
        return None;
    }
    let mut state = item.export_state();
    *state.points.get_mut(index)? += drag.delta();
    preview_item(factory, item.kind(), state)
}

pub fn render_annotations(
    mut gizmos: Gizmos<AnnotationGizmoGroup>,
    layer: Res<AnnotationLayer>,
    drag_state: Res<DragState>,
    settings: Res<AnnotationSettings>,
    mut labels: ResMut<PendingLabels>,
) {
    labels.0.clear();
    let defaults = settings.style_defaults();

    for item in layer.iter() {
        let mut painter = GizmoPainter::new(&mut gizmos, &mut labels.0)
            .with_offset(drag_state.body_offset(item.id()));
        match vertex_drag_preview(layer.factory(), item, &drag_state) {
            Some(preview) => preview.paint(&mut painter, &defaults),
            None => item.paint(&mut painter, &defaults),
        }
    }
}

/// State of the shape the active creation tool is building, if any
fn tool_preview_state(
    tool: EditorTool,
    cursor: Vec2,
    draw_state: &DrawState,
    shape_state: &ShapeDrawState,
    polyline_state: &PolylineDrawState,
    settings: &AnnotationSettings,
) -> Option<AnnotationState> {
    let points = match tool {
        EditorTool::Draw if draw_state.is_drawing => draw_state.current_points.clone(),
        EditorTool::Arrow | EditorTool::Rectangle | EditorTool::Ellipse => {
            vec![shape_state.start?, cursor]
        }
        EditorTool::Polyline | EditorTool::Polygon if !polyline_state.points.is_empty() => {
            let mut points = polyline_state.points.clone();
            points.push(cursor);
            points
        }
        _ => return None,
    };
    Some(AnnotationState {
        points,
        style: settings.new_item_style(),
        ..default()
    })
}

#[allow(clippy::too_many_arguments)]
pub fn render_tool_preview(
    mut gizmos: Gizmos<AnnotationGizmoGroup>,
    current_tool: Res<CurrentTool>,
    layer: Res<AnnotationLayer>,
    draw_state: Res<DrawState>,
    shape_state: Res<ShapeDrawState>,
    polyline_state: Res<PolylineDrawState>,
    settings: Res<AnnotationSettings>,
    camera: CameraParams,
) {
    let tool = current_tool.tool;
    let Some(kind) = tool.creates_kind() else {
        return;
    };
    let Some(cursor) = camera.cursor_world_pos() else {
        return;
    };
    let Some(state) = tool_preview_state(
        tool,
        cursor,
        &draw_state,
        &shape_state,
        &polyline_state,
        &settings,
    ) else {
        return;
    };
    let Some(preview) = preview_item(layer.factory(), kind, state) else {
        return;
    };

    // Previews never carry labels
    let mut labels = Vec::new();
    let mut painter = GizmoPainter::new(&mut gizmos, &mut labels).with_alpha(PREVIEW_ALPHA);
    preview.paint(&mut painter, &settings.style_defaults());
}

/// Marker outline shown where a new numbered marker will be placed
pub fn render_text_anchor_preview(
    mut gizmos: Gizmos<AnnotationGizmoGroup>,
    layer: Res<AnnotationLayer>,
    text_state: Res<TextEditState>,
    settings: Res<AnnotationSettings>,
    mut labels: ResMut<PendingLabels>,
) {
    let Some(anchor) = text_state.anchor else {
        return;
    };
    let state = NumberedText::initial_state(
        anchor,
        "",
        next_marker_number(&layer),
        settings.new_item_style(),
    );
    let Some(preview) = preview_item(layer.factory(), NumberedText::KIND, state) else {
        return;
    };
    let mut painter = GizmoPainter::new(&mut gizmos, &mut labels.0).with_alpha(PREVIEW_ALPHA);
    preview.paint(&mut painter, &settings.style_defaults());
}

/// Number given to the next marker placed on the layer
pub fn next_marker_number(layer: &AnnotationLayer) -> u32 {
    let markers = layer
        .iter()
        .filter(|item| item.kind() == NumberedText::KIND)
        .count();
    u32::try_from(markers).unwrap_or(u32::MAX).saturating_add(1)
}

/// Convert a Bevy color to an egui color
pub fn to_egui_color(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        (srgba.alpha * 255.0) as u8,
    )
}

/// Render queued text labels using egui, scaled with the camera zoom
pub fn render_text_labels(
    mut contexts: EguiContexts,
    camera: CameraWithProjection,
    labels: Res<PendingLabels>,
) {
    if labels.0.is_empty() {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let Ok((cam, cam_transform, _)) = camera.camera.single() else {
        return;
    };
    let zoom = camera.zoom_scale();

    for (index, label) in labels.0.iter().enumerate() {
        // Convert world position to screen position
        let Ok(screen_pos) = cam.world_to_viewport(cam_transform, label.anchor.extend(0.0)) else {
            continue;
        };

        let mut text = egui::RichText::new(&label.text)
            .color(to_egui_color(label.color))
            .size(label.font_size / zoom);
        text = match label.font_weight {
            FontWeight::Bold => text.strong(),
            FontWeight::Light => text.weak(),
            FontWeight::Regular => text,
        };
        if let Some(background) = label.background {
            text = text.background_color(to_egui_color(background));
        }

        let pivot = if label.centered {
            egui::Align2::CENTER_CENTER
        } else {
            egui::Align2::LEFT_CENTER
        };

        egui::Area::new(egui::Id::new(("annotation_label", index)))
            .fixed_pos(egui::pos2(screen_pos.x, screen_pos.y))
            .pivot(pivot)
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(text);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> AnnotationFactory {
        AnnotationFactory::with_builtin_variants().unwrap()
    }

    #[test]
    fn test_strand_offsets_span_width() {
        let offsets = strand_offsets(Vec2::ZERO, Vec2::X * 10.0, 4.0);
        assert_eq!(offsets.len(), 4);
        assert!(offsets[0].abs_diff_eq(Vec2::new(0.0, -2.0), 1e-5));
        assert!(offsets[3].abs_diff_eq(Vec2::new(0.0, 2.0), 1e-5));

        assert_eq!(strand_offsets(Vec2::ZERO, Vec2::X, 1.0), vec![Vec2::ZERO]);
        // Degenerate segment
        assert_eq!(strand_offsets(Vec2::ONE, Vec2::ONE, 6.0), vec![Vec2::ZERO]);
    }

    #[test]
    fn test_preview_item_is_unassigned() {
        let state = AnnotationState {
            points: vec![Vec2::ZERO, Vec2::ONE],
            ..default()
        };
        let item = preview_item(&factory(), "rectangle", state).unwrap();
        assert_eq!(item.id(), AnnotationId::UNASSIGNED);
        assert_eq!(item.points().len(), 2);
        assert!(preview_item(&factory(), "hexagon", AnnotationState::default()).is_none());
    }

    #[test]
    fn test_shape_preview_follows_cursor() {
        let shape_state = ShapeDrawState {
            start: Some(Vec2::ZERO),
        };
        let state = tool_preview_state(
            EditorTool::Rectangle,
            Vec2::new(5.0, 5.0),
            &DrawState::default(),
            &shape_state,
            &PolylineDrawState::default(),
            &AnnotationSettings::default(),
        )
        .unwrap();
        assert_eq!(state.points, vec![Vec2::ZERO, Vec2::new(5.0, 5.0)]);

        // Nothing to preview before the first click
        assert!(tool_preview_state(
            EditorTool::Polyline,
            Vec2::ZERO,
            &DrawState::default(),
            &ShapeDrawState::default(),
            &PolylineDrawState::default(),
            &AnnotationSettings::default(),
        )
        .is_none());
    }

    #[test]
    fn test_vertex_drag_preview_moves_only_dragged_item() {
        let mut layer = AnnotationLayer::with_builtin_variants().unwrap();
        let state = AnnotationState {
            points: vec![Vec2::ZERO, Vec2::new(10.0, 0.0)],
            ..default()
        };
        let id = layer.add_item_with("arrow", state).unwrap().id();

        let mut drag = DragState::default();
        drag.begin(id, DragTarget::Vertex(1), Vec2::new(10.0, 0.0));
        if let Some(active) = drag.active.as_mut() {
            active.current = Vec2::new(10.0, 4.0);
        }

        let item = layer.get(id).unwrap();
        let preview = vertex_drag_preview(layer.factory(), item, &drag).unwrap();
        assert_eq!(preview.points()[1], Vec2::new(10.0, 4.0));
        // The layer copy is untouched until release
        assert_eq!(item.points()[1], Vec2::new(10.0, 0.0));

        drag.begin(id, DragTarget::Body, Vec2::ZERO);
        assert!(vertex_drag_preview(layer.factory(), item, &drag).is_none());
    }

    #[test]
    fn test_next_marker_number_counts_markers() {
        let mut layer = AnnotationLayer::with_builtin_variants().unwrap();
        assert_eq!(next_marker_number(&layer), 1);
        layer
            .add_item_with(
                NumberedText::KIND,
                NumberedText::initial_state(Vec2::ZERO, "a", 1, default()),
            )
            .unwrap();
        layer.add_item("free_line").unwrap();
        assert_eq!(next_marker_number(&layer), 2);
    }

    #[test]
    fn test_to_egui_color() {
        assert_eq!(to_egui_color(Color::WHITE), egui::Color32::WHITE);
        let faded = to_egui_color(Color::srgba(1.0, 0.0, 0.0, 0.5));
        assert_eq!(faded.a(), 127);
    }
}
