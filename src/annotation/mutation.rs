//! Mutator operations and the accessors paired with them.
//!
//! Every change to an annotation's observable geometry or style is expressed as
//! a [`Mutation`]. Tools never poke at annotation fields directly; they go
//! through a tracked handle that turns each mutation into an undo record.

use bevy::prelude::*;

use crate::error::MutationError;

use super::state::{AnnotationState, FieldValue};
use super::style::{DashPattern, FontWeight};
use super::AnnotationCore;

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddPoint(Vec2),
    InsertPoint { index: usize, point: Vec2 },
    RemovePoint(usize),
    SetPoint { index: usize, point: Vec2 },
    SetPoints(Vec<Vec2>),
    Translate(Vec2),
    SetForeground(Option<Color>),
    SetBackground(Option<Color>),
    SetLineWidth(Option<f32>),
    SetFontWeight(Option<FontWeight>),
    SetFontSize(Option<f32>),
    SetDash(Option<DashPattern>),
    SetText(String),
    SetNumber(u32),
}

/// Identifies a mutator independent of its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutatorTag {
    AddPoint,
    InsertPoint,
    RemovePoint,
    SetPoint,
    SetPoints,
    Translate,
    SetForeground,
    SetBackground,
    SetLineWidth,
    SetFontWeight,
    SetFontSize,
    SetDash,
    SetText,
    SetNumber,
}

/// Read operations that can be paired with a mutator to detect no-op calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorTag {
    Points,
    Foreground,
    Background,
    LineWidth,
    FontWeight,
    FontSize,
    Dash,
    Text,
    Number,
}

impl Mutation {
    pub fn tag(&self) -> MutatorTag {
        match self {
            Mutation::AddPoint(_) => MutatorTag::AddPoint,
            Mutation::InsertPoint { .. } => MutatorTag::InsertPoint,
            Mutation::RemovePoint(_) => MutatorTag::RemovePoint,
            Mutation::SetPoint { .. } => MutatorTag::SetPoint,
            Mutation::SetPoints(_) => MutatorTag::SetPoints,
            Mutation::Translate(_) => MutatorTag::Translate,
            Mutation::SetForeground(_) => MutatorTag::SetForeground,
            Mutation::SetBackground(_) => MutatorTag::SetBackground,
            Mutation::SetLineWidth(_) => MutatorTag::SetLineWidth,
            Mutation::SetFontWeight(_) => MutatorTag::SetFontWeight,
            Mutation::SetFontSize(_) => MutatorTag::SetFontSize,
            Mutation::SetDash(_) => MutatorTag::SetDash,
            Mutation::SetText(_) => MutatorTag::SetText,
            Mutation::SetNumber(_) => MutatorTag::SetNumber,
        }
    }

    /// The value a paired accessor would report once this mutation is applied.
    ///
    /// `None` stands for "absent", so clearing an already-unset field compares
    /// equal to the accessor's reading.
    pub fn compared_value(&self) -> Option<FieldValue> {
        match self {
            Mutation::SetPoints(points) => Some(FieldValue::Points(points.clone())),
            Mutation::SetForeground(color) | Mutation::SetBackground(color) => {
                color.map(FieldValue::Color)
            }
            Mutation::SetLineWidth(value) | Mutation::SetFontSize(value) => {
                value.map(FieldValue::Float)
            }
            Mutation::SetFontWeight(weight) => weight.map(FieldValue::FontWeight),
            Mutation::SetDash(dash) => dash.map(FieldValue::Dash),
            Mutation::SetText(text) => Some(FieldValue::Text(text.clone())),
            Mutation::SetNumber(number) => Some(FieldValue::Int(i64::from(*number))),
            Mutation::AddPoint(_)
            | Mutation::InsertPoint { .. }
            | Mutation::RemovePoint(_)
            | Mutation::SetPoint { .. }
            | Mutation::Translate(_) => None,
        }
    }
}

/// Accessors every annotation answers from its shared core.
pub fn supports_common(accessor: AccessorTag) -> bool {
    !matches!(accessor, AccessorTag::Text | AccessorTag::Number)
}

pub fn read_common(core: &AnnotationCore, accessor: AccessorTag) -> Option<FieldValue> {
    let style = &core.style;
    match accessor {
        AccessorTag::Points => Some(FieldValue::Points(core.points.clone())),
        AccessorTag::Foreground => style.foreground.map(FieldValue::Color),
        AccessorTag::Background => style.background.map(FieldValue::Color),
        AccessorTag::LineWidth => style.line_width.map(FieldValue::Float),
        AccessorTag::FontWeight => style.font_weight.map(FieldValue::FontWeight),
        AccessorTag::FontSize => style.font_size.map(FieldValue::Float),
        AccessorTag::Dash => style.dash.map(FieldValue::Dash),
        AccessorTag::Text | AccessorTag::Number => None,
    }
}

/// Applies a geometry or style mutation to the shared core.
///
/// Validation happens before anything is written, so a failed call leaves the
/// core untouched.
pub fn apply_common(
    core: &mut AnnotationCore,
    kind: &'static str,
    point_limit: Option<usize>,
    mutation: &Mutation,
) -> Result<(), MutationError> {
    let len = core.points.len();
    let check_limit = |count: usize| match point_limit {
        Some(max) if count > max => Err(MutationError::PointLimit { kind, max }),
        _ => Ok(()),
    };
    let check_index = |index: usize, bound: usize| {
        if index < bound {
            Ok(())
        } else {
            Err(MutationError::IndexOutOfRange { index, len })
        }
    };

    match mutation {
        Mutation::AddPoint(point) => {
            check_finite(*point)?;
            check_limit(len + 1)?;
            core.points.push(*point);
        }
        Mutation::InsertPoint { index, point } => {
            check_finite(*point)?;
            check_index(*index, len + 1)?;
            check_limit(len + 1)?;
            core.points.insert(*index, *point);
        }
        Mutation::RemovePoint(index) => {
            check_index(*index, len)?;
            core.points.remove(*index);
        }
        Mutation::SetPoint { index, point } => {
            check_finite(*point)?;
            check_index(*index, len)?;
            core.points[*index] = *point;
        }
        Mutation::SetPoints(points) => {
            for point in points {
                check_finite(*point)?;
            }
            check_limit(points.len())?;
            core.points = points.clone();
        }
        Mutation::Translate(delta) => {
            check_finite(*delta)?;
            let moved: Vec<Vec2> = core.points.iter().map(|p| *p + *delta).collect();
            for point in &moved {
                check_finite(*point)?;
            }
            core.points = moved;
        }
        Mutation::SetForeground(color) => {
            check_color("foreground", *color)?;
            core.style.foreground = *color;
        }
        Mutation::SetBackground(color) => {
            check_color("background", *color)?;
            core.style.background = *color;
        }
        Mutation::SetLineWidth(width) => {
            check_positive("line width", *width)?;
            core.style.line_width = *width;
        }
        Mutation::SetFontWeight(weight) => core.style.font_weight = *weight,
        Mutation::SetFontSize(size) => {
            check_positive("font size", *size)?;
            core.style.font_size = *size;
        }
        Mutation::SetDash(dash) => {
            check_dash(*dash)?;
            core.style.dash = *dash;
        }
        Mutation::SetText(_) | Mutation::SetNumber(_) => {
            return Err(MutationError::Unsupported {
                kind,
                mutator: mutation.tag(),
            });
        }
    }
    Ok(())
}

fn check_finite(point: Vec2) -> Result<(), MutationError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(MutationError::InvalidValue {
            field: "point",
            reason: format!("{point} is not finite"),
        })
    }
}

/// Checks imported geometry and style against the same rules the mutators
/// enforce.
pub fn validate_state(state: &AnnotationState) -> Result<(), MutationError> {
    for point in &state.points {
        check_finite(*point)?;
    }
    let style = &state.style;
    check_color("foreground", style.foreground)?;
    check_color("background", style.background)?;
    check_positive("line width", style.line_width)?;
    check_positive("font size", style.font_size)?;
    check_dash(style.dash)
}

fn check_dash(dash: Option<DashPattern>) -> Result<(), MutationError> {
    match dash {
        Some(pattern) if !pattern.is_valid() => Err(MutationError::InvalidValue {
            field: "dash pattern",
            reason: format!("dash {} / gap {}", pattern.dash, pattern.gap),
        }),
        _ => Ok(()),
    }
}

/// Every component must be finite for the color to survive a snapshot.
fn check_color(field: &'static str, color: Option<Color>) -> Result<(), MutationError> {
    let Some(color) = color else {
        return Ok(());
    };
    let linear = color.to_linear();
    let components = [linear.red, linear.green, linear.blue, linear.alpha];
    if components.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(MutationError::InvalidValue {
            field,
            reason: format!("{color:?} has non-finite components"),
        })
    }
}

fn check_positive(field: &'static str, value: Option<f32>) -> Result<(), MutationError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(MutationError::InvalidValue {
            field,
            reason: format!("{v} must be a positive number"),
        }),
        _ => Ok(()),
    }
}
