//! Selection tool module for the editor.
//!
//! This module handles all selection-related functionality including:
//! - Click selection via layer hit testing
//! - Dragging whole annotations or single vertices
//! - Selection gizmo rendering
//! - Keyboard shortcuts for the selected annotation

mod drag;
mod gizmos;
mod handle;
mod shortcuts;

use bevy::prelude::*;

use crate::annotation::AnnotationId;
use crate::history::SelectionState;

pub use drag::handle_drag;
pub use gizmos::{configure_selection_gizmos, draw_selection_indicators, SelectionGizmoGroup};
pub use handle::handle_selection;
pub use shortcuts::{
    handle_deletion, handle_escape_clear_selection, handle_reorder, handle_style_shortcuts,
};

/// The single selected annotation, if any.
#[derive(Resource, Default, Debug)]
pub struct AnnotationSelection {
    selected: Option<AnnotationId>,
}

impl AnnotationSelection {
    pub fn get(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

impl SelectionState for AnnotationSelection {
    fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    fn set_selected(&mut self, id: Option<AnnotationId>) {
        self.selected = id;
    }
}

/// What part of the selected annotation is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Body,
    Vertex(usize),
}

/// An in-progress drag. Nothing is written to the layer until release, so a
/// whole drag becomes one undo step.
#[derive(Debug, Clone, Copy)]
pub struct ActiveDrag {
    pub item: AnnotationId,
    pub target: DragTarget,
    pub start: Vec2,
    pub current: Vec2,
}

impl ActiveDrag {
    pub fn delta(&self) -> Vec2 {
        self.current - self.start
    }
}

#[derive(Resource, Default, Debug)]
pub struct DragState {
    pub active: Option<ActiveDrag>,
}

impl DragState {
    pub fn begin(&mut self, item: AnnotationId, target: DragTarget, at: Vec2) {
        self.active = Some(ActiveDrag {
            item,
            target,
            start: at,
            current: at,
        });
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Offset to preview for `item` while its body is dragged.
    pub fn body_offset(&self, item: AnnotationId) -> Vec2 {
        match self.active {
            Some(drag) if drag.item == item && drag.target == DragTarget::Body => drag.delta(),
            _ => Vec2::ZERO,
        }
    }
}
