//! Tracked handle that turns mutator calls into undo records.

use std::ops::Deref;

use bevy::prelude::*;

use crate::annotation::{Annotation, AnnotationId, DashPattern, FontWeight, Mutation};
use crate::error::MutationError;
use crate::layer::{AnnotationLayer, ChangeKind};

use super::payload::Payload;
use super::record::UndoRecord;

/// Mutable access to one annotation in a layer.
///
/// Reads go straight to the annotation through `Deref`. Every mutator is
/// routed through [`AnnotationEditor::apply`], which records an edit on the
/// layer's history unless the call would not change anything.
pub struct AnnotationEditor<'a> {
    layer: &'a mut AnnotationLayer,
    index: usize,
}

impl<'a> AnnotationEditor<'a> {
    pub(crate) fn new(layer: &'a mut AnnotationLayer, index: usize) -> Self {
        Self { layer, index }
    }

    pub fn item(&self) -> &(dyn Annotation + 'static) {
        self.layer.item_at(self.index)
    }

    pub fn id(&self) -> AnnotationId {
        self.item().id()
    }

    /// Apply a mutation, recording it for undo.
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), MutationError> {
        let index = self.index;
        let layer = &mut *self.layer;
        let item = layer.item_at(index);
        let (id, kind, tag) = (item.id(), item.kind(), mutation.tag());

        let binding = layer
            .factory()
            .binding(kind, tag)
            .copied()
            .ok_or(MutationError::Unregistered { kind, mutator: tag })?;

        if !layer.history().is_recording() {
            layer.item_at_mut(index).apply(&mutation)?;
            layer.mark_changed(id, ChangeKind::Edited);
            return Ok(());
        }

        if let Some(accessor) = binding.accessor
            && item.read(accessor) == mutation.compared_value()
        {
            return layer.item_at_mut(index).apply(&mutation);
        }

        let pre = Payload::capture(item)?;
        layer.item_at_mut(index).apply(&mutation)?;
        let post = Payload::capture(layer.item_at(index))?;

        trace!("{} on {id}", binding.description);
        layer
            .history_mut()
            .push(UndoRecord::edited(id, binding.description, pre, post));
        layer.mark_changed(id, ChangeKind::Edited);
        Ok(())
    }

    pub fn add_point(&mut self, point: Vec2) -> Result<(), MutationError> {
        self.apply(Mutation::AddPoint(point))
    }

    pub fn insert_point(&mut self, index: usize, point: Vec2) -> Result<(), MutationError> {
        self.apply(Mutation::InsertPoint { index, point })
    }

    pub fn remove_point(&mut self, index: usize) -> Result<(), MutationError> {
        self.apply(Mutation::RemovePoint(index))
    }

    pub fn set_point(&mut self, index: usize, point: Vec2) -> Result<(), MutationError> {
        self.apply(Mutation::SetPoint { index, point })
    }

    pub fn set_points(&mut self, points: Vec<Vec2>) -> Result<(), MutationError> {
        self.apply(Mutation::SetPoints(points))
    }

    pub fn translate(&mut self, delta: Vec2) -> Result<(), MutationError> {
        self.apply(Mutation::Translate(delta))
    }

    pub fn set_foreground(&mut self, color: Option<Color>) -> Result<(), MutationError> {
        self.apply(Mutation::SetForeground(color))
    }

    pub fn set_background(&mut self, color: Option<Color>) -> Result<(), MutationError> {
        self.apply(Mutation::SetBackground(color))
    }

    pub fn set_line_width(&mut self, width: Option<f32>) -> Result<(), MutationError> {
        self.apply(Mutation::SetLineWidth(width))
    }

    pub fn set_font_weight(&mut self, weight: Option<FontWeight>) -> Result<(), MutationError> {
        self.apply(Mutation::SetFontWeight(weight))
    }

    pub fn set_font_size(&mut self, size: Option<f32>) -> Result<(), MutationError> {
        self.apply(Mutation::SetFontSize(size))
    }

    pub fn set_dash(&mut self, dash: Option<DashPattern>) -> Result<(), MutationError> {
        self.apply(Mutation::SetDash(dash))
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), MutationError> {
        self.apply(Mutation::SetText(text.into()))
    }

    pub fn set_number(&mut self, number: u32) -> Result<(), MutationError> {
        self.apply(Mutation::SetNumber(number))
    }
}

impl Deref for AnnotationEditor<'_> {
    type Target = dyn Annotation;

    fn deref(&self) -> &Self::Target {
        self.item()
    }
}
