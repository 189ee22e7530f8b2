//! Annotation items drawn on top of the map.
//!
//! Every annotation shares an [`AnnotationCore`] (identity, style, ordered
//! geometry points) and implements the [`Annotation`] contract for painting,
//! hit testing, bounds, and state export/import. Variants differ in how they
//! interpret their points and which style fields they honour.
//!
//! ## Module Structure
//!
//! - [`style`] - Optional-field style value object and defaults
//! - [`state`] - Exported state used by undo snapshots
//! - [`mutation`] - Mutator operations and their paired accessors
//! - [`geometry`] - Hit testing, bounds, and stroke helpers
//!
//! ## Annotation Types
//!
//! - [`FreeLine`]: freehand stroke
//! - [`Arrow`]: straight line with a head at its second point
//! - [`RectangleShape`] / [`EllipseShape`]: shapes spanned by two corners
//! - [`Polyline`]: open polyline or closed polygon
//! - [`NumberedText`]: numbered marker with a text label

mod arrow;
mod free_line;
pub mod geometry;
pub mod mutation;
mod numbered_text;
mod polyline;
mod shapes;
pub mod state;
pub mod style;

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{FactoryError, MutationError};

pub use arrow::Arrow;
pub use free_line::FreeLine;
pub use mutation::{AccessorTag, Mutation, MutatorTag};
pub use numbered_text::NumberedText;
pub use polyline::Polyline;
pub use shapes::{EllipseShape, RectangleShape};
pub use state::{AnnotationState, FieldValue, Fields};
pub use style::{DashPattern, FontWeight, ResolvedStyle, Style, StyleDefaults};

/// Identity of an annotation, stable across undo and redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub u64);

impl AnnotationId {
    /// Placeholder carried by instances the factory has not stamped yet.
    pub const UNASSIGNED: AnnotationId = AnnotationId(0);
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State shared by every annotation kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationCore {
    pub id: AnnotationId,
    pub style: Style,
    pub points: Vec<Vec2>,
}

/// A text label queued for painting.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub anchor: Vec2,
    pub text: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub color: Color,
    pub background: Option<Color>,
    /// Centered on the anchor instead of starting at it
    pub centered: bool,
}

/// Drawing surface annotations paint onto.
pub trait Painter {
    fn line(&mut self, start: Vec2, end: Vec2, color: Color, width: f32);
    fn label(&mut self, label: TextLabel);
}

/// Contract every annotation kind implements.
///
/// Mutation goes through [`Annotation::apply`]; callers outside the crate
/// reach it only via the tracked handle handed out by the annotation layer.
pub trait Annotation: Send + Sync + 'static {
    /// Registered kind tag, used as the snapshot type tag.
    fn kind(&self) -> &'static str;
    fn core(&self) -> &AnnotationCore;
    fn core_mut(&mut self) -> &mut AnnotationCore;

    fn id(&self) -> AnnotationId {
        self.core().id
    }

    fn style(&self) -> &Style {
        &self.core().style
    }

    fn points(&self) -> &[Vec2] {
        &self.core().points
    }

    /// Maximum number of geometry points, `None` when unbounded.
    fn point_limit(&self) -> Option<usize> {
        None
    }

    fn paint(&self, painter: &mut dyn Painter, defaults: &StyleDefaults);

    /// Check if a world-space point hits this annotation.
    ///
    /// Unset style fields resolve against `defaults`, as in [`Annotation::paint`].
    fn hit_test(&self, point: Vec2, tolerance: f32, defaults: &StyleDefaults) -> bool;

    fn bounds(&self, defaults: &StyleDefaults) -> Option<Rect> {
        let _ = defaults;
        geometry::points_bounds(self.points())
    }

    fn supports(&self, accessor: AccessorTag) -> bool {
        mutation::supports_common(accessor)
    }

    fn read(&self, accessor: AccessorTag) -> Option<FieldValue> {
        mutation::read_common(self.core(), accessor)
    }

    fn apply(&mut self, mutation: &Mutation) -> Result<(), MutationError> {
        let kind = self.kind();
        let limit = self.point_limit();
        mutation::apply_common(self.core_mut(), kind, limit, mutation)
    }

    fn export_fields(&self) -> Fields {
        Fields::new()
    }

    fn import_fields(&mut self, fields: &Fields) -> Result<(), FactoryError> {
        let _ = fields;
        Ok(())
    }

    fn export_state(&self) -> AnnotationState {
        AnnotationState {
            points: self.points().to_vec(),
            style: self.style().clone(),
            fields: self.export_fields(),
        }
    }

    fn import_state(&mut self, state: AnnotationState) -> Result<(), FactoryError> {
        if let Some(max) = self.point_limit()
            && state.points.len() > max
        {
            return Err(FactoryError::Import {
                kind: self.kind().to_owned(),
                reason: format!("{} points exceed the limit of {max}", state.points.len()),
            });
        }
        mutation::validate_state(&state).map_err(|err| FactoryError::Import {
            kind: self.kind().to_owned(),
            reason: err.to_string(),
        })?;
        self.import_fields(&state.fields)?;
        let core = self.core_mut();
        core.points = state.points;
        core.style = state.style;
        Ok(())
    }
}

/// Half of the resolved line width, added to hit tolerances.
pub(crate) fn stroke_slack(style: &Style, defaults: &StyleDefaults) -> f32 {
    style.line_width.unwrap_or(defaults.line_width) / 2.0
}
