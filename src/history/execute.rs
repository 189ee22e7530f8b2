//! Undo and redo entry points on the annotation layer.

use bevy::prelude::*;

use crate::annotation::{Annotation, AnnotationId};
use crate::error::ReplayError;
use crate::layer::AnnotationLayer;

use super::record::UndoRecord;

/// Which annotation, if any, is currently selected.
pub trait SelectionState {
    fn selected(&self) -> Option<AnnotationId>;
    fn set_selected(&mut self, id: Option<AnnotationId>);
}

/// The editing tool bound to the selected annotation.
pub trait ToolController {
    fn deactivate(&mut self);
    fn activate_tool_for(&mut self, item: &dyn Annotation);
}

pub trait RedrawTrigger {
    fn request_redraw(&mut self);
}

/// Collaborators touched while replaying a record.
pub struct ReplayHooks<'a> {
    pub selection: &'a mut dyn SelectionState,
    pub tools: &'a mut dyn ToolController,
    pub redraw: &'a mut dyn RedrawTrigger,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Undo,
    Redo,
}

impl AnnotationLayer {
    /// Undo the most recent record.
    ///
    /// Returns the record description, or `None` when there is nothing to
    /// undo. On error the history cursor and the items are unchanged.
    pub fn undo(&mut self, hooks: &mut ReplayHooks<'_>) -> Result<Option<String>, ReplayError> {
        self.replay(hooks, Direction::Undo)
    }

    /// Redo the most recently undone record.
    pub fn redo(&mut self, hooks: &mut ReplayHooks<'_>) -> Result<Option<String>, ReplayError> {
        self.replay(hooks, Direction::Redo)
    }

    fn replay(
        &mut self,
        hooks: &mut ReplayHooks<'_>,
        direction: Direction,
    ) -> Result<Option<String>, ReplayError> {
        let next: Option<UndoRecord> = match direction {
            Direction::Undo => self.history().peek_undo().cloned(),
            Direction::Redo => self.history().peek_redo().cloned(),
        };
        let Some(record) = next else {
            hooks.redraw.request_redraw();
            return Ok(None);
        };

        let was_recording = self.history().is_recording();
        self.history_mut().set_recording(false);
        let result = match direction {
            Direction::Undo => record.perform_undo(self, hooks),
            Direction::Redo => record.perform_redo(self, hooks),
        };
        self.history_mut().set_recording(was_recording);

        if result.is_ok() {
            match direction {
                Direction::Undo => self.history_mut().step_back(),
                Direction::Redo => self.history_mut().step_forward(),
            }
        }
        hooks.redraw.request_redraw();

        result.map(|()| {
            debug!(
                "{direction:?} {:?} of {}: {}",
                record.kind, record.item, record.description
            );
            Some(record.description)
        })
    }
}
