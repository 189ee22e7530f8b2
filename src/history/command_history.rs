//! Undo stack with a cursor separating undoable and redoable records.

use crate::constants::MAX_HISTORY_SIZE;

use super::record::{RecordState, UndoRecord};

/// Recorded edits, oldest first.
///
/// Records before the cursor can be undone, records at or after it can be
/// redone. Pushing a new record discards everything after the cursor.
#[derive(Debug)]
pub struct CommandHistory {
    records: Vec<UndoRecord>,
    cursor: usize,
    limit: usize,
    /// Cleared while a record is being replayed
    recording: bool,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_limit(MAX_HISTORY_SIZE)
    }
}

impl CommandHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            cursor: 0,
            limit: limit.max(1),
            recording: true,
        }
    }

    /// Push a new record to the history
    pub fn push(&mut self, record: UndoRecord) {
        // A new action invalidates everything that could have been redone
        self.records.truncate(self.cursor);
        self.records.push(record);
        self.cursor = self.records.len();
        self.trim();
    }

    /// Next record to undo, if any
    pub fn peek_undo(&self) -> Option<&UndoRecord> {
        self.cursor.checked_sub(1).and_then(|i| self.records.get(i))
    }

    /// Next record to redo, if any
    pub fn peek_redo(&self) -> Option<&UndoRecord> {
        self.records.get(self.cursor)
    }

    /// Move the cursor back over the record just undone.
    pub(crate) fn step_back(&mut self) {
        if let Some(index) = self.cursor.checked_sub(1) {
            self.records[index].state = RecordState::Undone;
            self.cursor = index;
        }
    }

    /// Move the cursor forward over the record just redone.
    pub(crate) fn step_forward(&mut self) {
        if let Some(record) = self.records.get_mut(self.cursor) {
            record.state = RecordState::Redone;
            self.cursor += 1;
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.records.len()
    }

    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    pub fn redo_count(&self) -> usize {
        self.records.len() - self.cursor
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.peek_undo().map(|r| r.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.peek_redo().map(|r| r.description.as_str())
    }

    /// All records, oldest first
    pub fn records(&self) -> &[UndoRecord] {
        &self.records
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.records.clear();
        self.cursor = 0;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub(crate) fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the depth limit, dropping the oldest records if needed.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.trim();
    }

    fn trim(&mut self) {
        if self.records.len() > self.limit {
            let excess = self.records.len() - self.limit;
            self.records.drain(..excess);
            self.cursor = self.cursor.saturating_sub(excess);
        }
    }
}
