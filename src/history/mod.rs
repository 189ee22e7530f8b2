//! Undo/Redo for annotation edits.
//!
//! Annotations are never mutated directly. The layer hands out an
//! [`AnnotationEditor`] whose mutators capture a snapshot of the item before
//! and after each change and push the pair onto the [`CommandHistory`]. Undo
//! and redo rebuild items from those snapshots through the same
//! [`AnnotationFactory`] that created them, so replayed items keep their ids
//! and stay editable.
//!
//! ## Usage
//!
//! - **Ctrl+Z**: Undo the last action
//! - **Ctrl+Y** or **Ctrl+Shift+Z**: Redo the last undone action
//!
//! ## Module Structure
//!
//! - [`mutators`] - Static mutator declarations per annotation kind
//! - [`factory`] - Kind registry used for creation and reconstruction
//! - [`payload`] - Serialized annotation snapshots
//! - [`record`] - Create/edit/delete records and their replay
//! - [`command_history`] - Cursor-based undo stack
//! - [`interceptor`] - Tracked handle that records mutator calls
//! - [`execute`] - Undo/redo entry points and replay collaborators
//! - [`systems`] - Bevy systems for undo/redo shortcuts and requests

mod command_history;
mod execute;
mod factory;
mod interceptor;
pub mod mutators;
mod payload;
mod record;
mod systems;


pub use command_history::CommandHistory;
pub use execute::{RedrawTrigger, ReplayHooks, SelectionState, ToolController};
pub use factory::{AnnotationFactory, VariantRegistration};
pub use interceptor::AnnotationEditor;
pub use payload::{Payload, Snapshot};
pub use record::{RecordKind, RecordState, UndoRecord};
pub use systems::{apply_history_requests, handle_history_shortcuts, HistoryRequest};
