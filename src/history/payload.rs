//! Snapshot payloads stored on undo records.

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, AnnotationId, AnnotationState};
use crate::error::FactoryError;

/// Serialized form of one annotation: kind tag, identity and exported state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub kind: String,
    pub id: AnnotationId,
    pub state: AnnotationState,
}

/// Opaque JSON block holding a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(String);

impl Payload {
    /// Capture the full state of an annotation.
    pub fn capture(item: &dyn Annotation) -> Result<Self, serde_json::Error> {
        let snapshot = Snapshot {
            kind: item.kind().to_owned(),
            id: item.id(),
            state: item.export_state(),
        };
        serde_json::to_string(&snapshot).map(Self)
    }

    pub fn decode(&self) -> Result<Snapshot, FactoryError> {
        Ok(serde_json::from_str(&self.0)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::*;
    use crate::annotation::{Arrow, Style};

    #[test]
    fn test_capture_embeds_kind_and_id() {
        let mut arrow = Arrow::default();
        arrow.core.id = AnnotationId(1004);
        arrow.core.points = vec![Vec2::ZERO, Vec2::new(5.0, 5.0)];
        arrow.core.style = Style::default().with_line_width(2.0);

        let payload = Payload::capture(&arrow).unwrap();
        assert!(payload.as_str().contains(r#""kind":"arrow""#));

        let snapshot = payload.decode().unwrap();
        assert_eq!(snapshot.id, AnnotationId(1004));
        assert_eq!(snapshot.state, arrow.export_state());
    }

    #[test]
    fn test_corrupt_payload_fails_to_decode() {
        let payload = Payload::from_raw("{not json");
        assert!(matches!(payload.decode(), Err(FactoryError::Payload(_))));
    }
}
