//! The annotation layer: ordered annotations plus their undo history.
//!
//! Items are kept back-to-front, so painting iterates in order and hit
//! testing walks the list in reverse. All creation, deletion and editing
//! goes through this resource, which keeps the dirty flag, change listeners
//! and the command history in step with the items.

use bevy::prelude::*;

use crate::annotation::{Annotation, AnnotationId, AnnotationState, StyleDefaults};
use crate::constants::FIRST_ANNOTATION_ID;
use crate::error::{FactoryError, MutationError, RegistrationError};
use crate::history::{AnnotationEditor, AnnotationFactory, CommandHistory, Payload, UndoRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Edited,
    Replaced,
    Reordered,
}

/// Whether a change came from the user or from undo/redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    Interactive,
    Replay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerChange {
    pub id: AnnotationId,
    pub kind: ChangeKind,
    pub origin: ChangeOrigin,
}

pub type LayerListener = Box<dyn FnMut(&LayerChange) + Send + Sync>;

#[derive(Resource)]
pub struct AnnotationLayer {
    /// Back-to-front paint order
    items: Vec<Box<dyn Annotation>>,
    factory: AnnotationFactory,
    history: CommandHistory,
    next_id: u64,
    dirty: bool,
    listeners: Vec<LayerListener>,
}

impl AnnotationLayer {
    pub fn new(factory: AnnotationFactory) -> Self {
        Self {
            items: Vec::new(),
            factory,
            history: CommandHistory::default(),
            next_id: FIRST_ANNOTATION_ID,
            dirty: false,
            listeners: Vec::new(),
        }
    }

    pub fn with_builtin_variants() -> Result<Self, RegistrationError> {
        Ok(Self::new(AnnotationFactory::with_builtin_variants()?))
    }

    /// Create an empty annotation of `kind` on top of the layer.
    pub fn add_item(&mut self, kind: &str) -> Result<AnnotationEditor<'_>, FactoryError> {
        let item = self.factory.create(kind, AnnotationId(self.next_id))?;
        self.push_created(item)
    }

    /// Create an annotation with its initial state as a single undo step.
    pub fn add_item_with(
        &mut self,
        kind: &str,
        state: AnnotationState,
    ) -> Result<AnnotationEditor<'_>, FactoryError> {
        let mut item = self.factory.create(kind, AnnotationId(self.next_id))?;
        item.import_state(state)?;
        self.push_created(item)
    }

    fn push_created(
        &mut self,
        item: Box<dyn Annotation>,
    ) -> Result<AnnotationEditor<'_>, FactoryError> {
        let id = item.id();
        if self.history.is_recording() {
            let payload = Payload::capture(item.as_ref())?;
            let description = format!("Add {}", self.describe(item.kind()));
            self.history
                .push(UndoRecord::created(id, description, payload));
        }
        self.next_id += 1;
        self.items.push(item);
        self.mark_changed(id, ChangeKind::Added);
        debug!("Added annotation {id}");

        let index = self.items.len() - 1;
        Ok(AnnotationEditor::new(self, index))
    }

    /// Remove an annotation, recording its full state for undo.
    pub fn remove_item(&mut self, id: AnnotationId) -> Result<Box<dyn Annotation>, MutationError> {
        let index = self.position(id).ok_or(MutationError::UnknownItem(id))?;
        if self.history.is_recording() {
            let item = self.items[index].as_ref();
            let payload = Payload::capture(item)?;
            let description = format!("Delete {}", self.describe(item.kind()));
            self.history
                .push(UndoRecord::deleted(id, description, payload));
        }
        let item = self.items.remove(index);
        self.mark_changed(id, ChangeKind::Removed);
        debug!("Removed annotation {id}");
        Ok(item)
    }

    /// Swap in `item` for the annotation with the same id, without recording.
    ///
    /// Returns the previous annotation, or `None` (dropping `item`) when no
    /// annotation has that id.
    pub fn replace_item(&mut self, item: Box<dyn Annotation>) -> Option<Box<dyn Annotation>> {
        let id = item.id();
        let index = self.position(id)?;
        let previous = std::mem::replace(&mut self.items[index], item);
        self.mark_changed(id, ChangeKind::Replaced);
        Some(previous)
    }

    /// Tracked handle for an existing annotation.
    pub fn edit(&mut self, id: AnnotationId) -> Result<AnnotationEditor<'_>, MutationError> {
        let index = self.position(id).ok_or(MutationError::UnknownItem(id))?;
        Ok(AnnotationEditor::new(self, index))
    }

    pub fn get(&self, id: AnnotationId) -> Option<&(dyn Annotation + 'static)> {
        self.position(id).map(|index| self.item_at(index))
    }

    /// Annotations in paint order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Annotation + 'static)> {
        self.items.iter().map(|item| item.as_ref())
    }

    pub fn ids(&self) -> Vec<AnnotationId> {
        self.items.iter().map(|item| item.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.position(id).is_some()
    }

    /// Move an annotation to the back. Not recorded for undo.
    pub fn send_to_back(&mut self, id: AnnotationId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let item = self.items.remove(index);
        self.items.insert(0, item);
        self.mark_changed(id, ChangeKind::Reordered);
        true
    }

    /// Move an annotation to the front. Not recorded for undo.
    pub fn bring_to_front(&mut self, id: AnnotationId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let item = self.items.remove(index);
        self.items.push(item);
        self.mark_changed(id, ChangeKind::Reordered);
        true
    }

    /// Topmost annotation under `point`.
    pub fn hit_test(
        &self,
        point: Vec2,
        tolerance: f32,
        defaults: &StyleDefaults,
    ) -> Option<AnnotationId> {
        self.items
            .iter()
            .rev()
            .find(|item| item.hit_test(point, tolerance, defaults))
            .map(|item| item.id())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&LayerChange) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.history.set_limit(limit);
    }

    pub fn factory(&self) -> &AnnotationFactory {
        &self.factory
    }

    pub(crate) fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    pub(crate) fn item_at(&self, index: usize) -> &(dyn Annotation + 'static) {
        self.items[index].as_ref()
    }

    pub(crate) fn item_at_mut(&mut self, index: usize) -> &mut (dyn Annotation + 'static) {
        self.items[index].as_mut()
    }

    /// Append a rebuilt annotation without recording.
    pub(crate) fn insert(&mut self, item: Box<dyn Annotation>) {
        let id = item.id();
        self.next_id = self.next_id.max(id.0 + 1);
        self.items.push(item);
        self.mark_changed(id, ChangeKind::Added);
    }

    /// Remove an annotation without recording.
    pub(crate) fn take(&mut self, id: AnnotationId) -> Option<Box<dyn Annotation>> {
        let index = self.position(id)?;
        let item = self.items.remove(index);
        self.mark_changed(id, ChangeKind::Removed);
        Some(item)
    }

    /// Set the dirty flag and notify listeners.
    pub(crate) fn mark_changed(&mut self, id: AnnotationId, kind: ChangeKind) {
        self.dirty = true;
        let origin = if self.history.is_recording() {
            ChangeOrigin::Interactive
        } else {
            ChangeOrigin::Replay
        };
        let change = LayerChange { id, kind, origin };
        for listener in &mut self.listeners {
            listener(&change);
        }
    }

    fn position(&self, id: AnnotationId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn describe(&self, kind: &str) -> String {
        self.factory
            .display_name(kind)
            .map_or_else(|| kind.replace('_', " "), str::to_lowercase)
    }
}
