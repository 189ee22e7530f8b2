//! Undo records and how each kind is replayed.

use crate::annotation::AnnotationId;
use crate::error::ReplayError;
use crate::layer::AnnotationLayer;

use super::execute::ReplayHooks;
use super::payload::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Create,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Created,
    Undone,
    Redone,
}

/// A reversible change to one annotation.
///
/// Create records keep the state at creation in `post`, delete records keep
/// the state just before removal in `pre`, edit records keep both.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoRecord {
    pub kind: RecordKind,
    pub description: String,
    pub item: AnnotationId,
    pub pre: Option<Payload>,
    pub post: Option<Payload>,
    pub state: RecordState,
}

impl UndoRecord {
    pub fn created(item: AnnotationId, description: impl Into<String>, payload: Payload) -> Self {
        Self::new(RecordKind::Create, item, description, None, Some(payload))
    }

    pub fn deleted(item: AnnotationId, description: impl Into<String>, payload: Payload) -> Self {
        Self::new(RecordKind::Delete, item, description, Some(payload), None)
    }

    pub fn edited(
        item: AnnotationId,
        description: impl Into<String>,
        pre: Payload,
        post: Payload,
    ) -> Self {
        Self::new(RecordKind::Edit, item, description, Some(pre), Some(post))
    }

    fn new(
        kind: RecordKind,
        item: AnnotationId,
        description: impl Into<String>,
        pre: Option<Payload>,
        post: Option<Payload>,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            item,
            pre,
            post,
            state: RecordState::Created,
        }
    }

    /// Reverse this record against the layer.
    ///
    /// Every fallible step runs before the layer is touched, so an error
    /// leaves the layer as it was.
    pub(crate) fn perform_undo(
        &self,
        layer: &mut AnnotationLayer,
        hooks: &mut ReplayHooks<'_>,
    ) -> Result<(), ReplayError> {
        match self.kind {
            RecordKind::Create => self.remove(layer, hooks),
            RecordKind::Delete => self.reinsert(layer, self.pre.as_ref()),
            RecordKind::Edit => self.restore(layer, hooks, self.pre.as_ref()),
        }
    }

    /// Apply this record again after it was undone.
    pub(crate) fn perform_redo(
        &self,
        layer: &mut AnnotationLayer,
        hooks: &mut ReplayHooks<'_>,
    ) -> Result<(), ReplayError> {
        match self.kind {
            RecordKind::Create => self.reinsert(layer, self.post.as_ref()),
            RecordKind::Delete => self.remove(layer, hooks),
            RecordKind::Edit => self.restore(layer, hooks, self.post.as_ref()),
        }
    }

    fn remove(
        &self,
        layer: &mut AnnotationLayer,
        hooks: &mut ReplayHooks<'_>,
    ) -> Result<(), ReplayError> {
        if layer.take(self.item).is_none() {
            return Err(ReplayError::MissingItem(self.item));
        }
        if hooks.selection.selected() == Some(self.item) {
            hooks.selection.set_selected(None);
            hooks.tools.deactivate();
        }
        Ok(())
    }

    fn reinsert(
        &self,
        layer: &mut AnnotationLayer,
        payload: Option<&Payload>,
    ) -> Result<(), ReplayError> {
        let payload = payload.ok_or(ReplayError::MissingPayload(self.item))?;
        let item = layer.factory().reconstruct(payload)?;
        self.check_identity(item.id())?;
        if layer.contains(self.item) {
            return Err(ReplayError::AlreadyPresent(self.item));
        }
        layer.insert(item);
        Ok(())
    }

    fn restore(
        &self,
        layer: &mut AnnotationLayer,
        hooks: &mut ReplayHooks<'_>,
        payload: Option<&Payload>,
    ) -> Result<(), ReplayError> {
        let payload = payload.ok_or(ReplayError::MissingPayload(self.item))?;
        let item = layer.factory().reconstruct(payload)?;
        self.check_identity(item.id())?;
        if layer.replace_item(item).is_none() {
            return Err(ReplayError::MissingItem(self.item));
        }
        if hooks.selection.selected() == Some(self.item)
            && let Some(item) = layer.get(self.item)
        {
            hooks.selection.set_selected(Some(self.item));
            hooks.tools.activate_tool_for(item);
        }
        Ok(())
    }

    fn check_identity(&self, found: AnnotationId) -> Result<(), ReplayError> {
        if found == self.item {
            Ok(())
        } else {
            Err(ReplayError::IdentityMismatch {
                expected: self.item,
                found,
            })
        }
    }
}
