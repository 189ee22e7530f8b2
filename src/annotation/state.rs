//! Exported annotation state used for snapshots.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::style::{DashPattern, FontWeight, Style};

/// Primitive value of a single annotation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Text(String),
    Color(Color),
    Point(Vec2),
    Points(Vec<Vec2>),
    FontWeight(FontWeight),
    Dash(DashPattern),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }
}

/// Variant-specific fields, keyed by name.
pub type Fields = BTreeMap<String, FieldValue>;

/// Full state of one annotation: geometry, style and variant fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationState {
    pub points: Vec<Vec2>,
    #[serde(default)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: Fields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_is_tagged() {
        let json = serde_json::to_string(&FieldValue::Int(4)).unwrap();
        assert_eq!(json, r#"{"type":"int","value":4}"#);
    }

    #[test]
    fn test_state_without_fields_omits_them() {
        let state = AnnotationState {
            points: vec![Vec2::new(1.0, 2.0)],
            ..default()
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("fields"));

        let parsed: AnnotationState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(FieldValue::Text("a".into()).as_text(), Some("a"));
        assert_eq!(FieldValue::Int(3).as_text(), None);
        assert_eq!(FieldValue::Int(3).as_int(), Some(3));
    }
}
