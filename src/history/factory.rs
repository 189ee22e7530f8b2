//! Registry of annotation kinds.
//!
//! The factory is the only place annotations are constructed, both for tools
//! creating new items and for undo/redo rebuilding them from payloads. Each
//! registered kind carries a resolved [`MutatorTable`] so the interceptor
//! never has to look anything up by name at call time.

use std::collections::HashMap;

use crate::annotation::{
    Annotation, AnnotationId, Arrow, EllipseShape, FreeLine, MutatorTag, NumberedText, Polyline,
    RectangleShape,
};
use crate::error::{FactoryError, RegistrationError};

use super::mutators::{
    MutatorBinding, MutatorDecl, MutatorTable, FILL_MUTATORS, FONT_MUTATORS, GEOMETRY_MUTATORS,
    STROKE_MUTATORS, TEXT_MUTATORS,
};
use super::payload::Payload;

/// Everything needed to register one annotation kind.
pub struct VariantRegistration {
    pub kind: &'static str,
    pub display_name: &'static str,
    pub construct: fn() -> Box<dyn Annotation>,
    pub mutators: Vec<MutatorDecl>,
}

impl VariantRegistration {
    fn new(
        kind: &'static str,
        display_name: &'static str,
        construct: fn() -> Box<dyn Annotation>,
        tables: &[&[MutatorDecl]],
    ) -> Self {
        Self {
            kind,
            display_name,
            construct,
            mutators: tables.concat(),
        }
    }
}

struct RegisteredVariant {
    display_name: &'static str,
    construct: fn() -> Box<dyn Annotation>,
    mutators: MutatorTable,
}

#[derive(Default)]
pub struct AnnotationFactory {
    variants: HashMap<&'static str, RegisteredVariant>,
}

impl AnnotationFactory {
    /// Factory with every built-in annotation kind registered.
    pub fn with_builtin_variants() -> Result<Self, RegistrationError> {
        let mut factory = Self::default();
        for registration in builtin_variants() {
            factory.register(registration)?;
        }
        Ok(factory)
    }

    /// Register a kind, resolving its mutator table against a prototype.
    pub fn register(&mut self, registration: VariantRegistration) -> Result<(), RegistrationError> {
        if self.variants.contains_key(registration.kind) {
            return Err(RegistrationError::DuplicateKind(registration.kind));
        }

        let prototype = (registration.construct)();
        if prototype.kind() != registration.kind {
            return Err(RegistrationError::KindMismatch {
                registered: registration.kind,
                built: prototype.kind(),
            });
        }
        let mutators = MutatorTable::resolve(prototype.as_ref(), &registration.mutators)?;

        self.variants.insert(
            registration.kind,
            RegisteredVariant {
                display_name: registration.display_name,
                construct: registration.construct,
                mutators,
            },
        );
        Ok(())
    }

    /// Build an empty instance of `kind` stamped with `id`.
    pub fn create(&self, kind: &str, id: AnnotationId) -> Result<Box<dyn Annotation>, FactoryError> {
        let variant = self
            .variants
            .get(kind)
            .ok_or_else(|| FactoryError::UnknownKind(kind.to_owned()))?;
        let mut item = (variant.construct)();
        item.core_mut().id = id;
        Ok(item)
    }

    /// Rebuild an annotation from a snapshot, keeping its original id.
    pub fn reconstruct(&self, payload: &Payload) -> Result<Box<dyn Annotation>, FactoryError> {
        let snapshot = payload.decode()?;
        let mut item = self.create(&snapshot.kind, snapshot.id)?;
        item.import_state(snapshot.state)?;
        Ok(item)
    }

    pub fn binding(&self, kind: &str, tag: MutatorTag) -> Option<&MutatorBinding> {
        self.variants.get(kind)?.mutators.get(tag)
    }

    pub fn display_name(&self, kind: &str) -> Option<&'static str> {
        self.variants.get(kind).map(|v| v.display_name)
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.variants.contains_key(kind)
    }

    /// Registered kind tags, sorted.
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.variants.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }
}

fn builtin_variants() -> Vec<VariantRegistration> {
    vec![
        VariantRegistration::new(
            FreeLine::KIND,
            "Freehand line",
            || Box::new(FreeLine::default()),
            &[GEOMETRY_MUTATORS, STROKE_MUTATORS],
        ),
        VariantRegistration::new(
            Arrow::KIND,
            "Arrow",
            || Box::new(Arrow::default()),
            &[GEOMETRY_MUTATORS, STROKE_MUTATORS],
        ),
        VariantRegistration::new(
            RectangleShape::KIND,
            "Rectangle",
            || Box::new(RectangleShape::default()),
            &[GEOMETRY_MUTATORS, STROKE_MUTATORS, FILL_MUTATORS],
        ),
        VariantRegistration::new(
            EllipseShape::KIND,
            "Ellipse",
            || Box::new(EllipseShape::default()),
            &[GEOMETRY_MUTATORS, STROKE_MUTATORS, FILL_MUTATORS],
        ),
        VariantRegistration::new(
            Polyline::OPEN_KIND,
            "Polyline",
            || Box::new(Polyline::open()),
            &[GEOMETRY_MUTATORS, STROKE_MUTATORS],
        ),
        VariantRegistration::new(
            Polyline::CLOSED_KIND,
            "Polygon",
            || Box::new(Polyline::closed()),
            &[GEOMETRY_MUTATORS, STROKE_MUTATORS, FILL_MUTATORS],
        ),
        VariantRegistration::new(
            NumberedText::KIND,
            "Numbered text",
            || Box::new(NumberedText::default()),
            &[
                GEOMETRY_MUTATORS,
                STROKE_MUTATORS,
                FILL_MUTATORS,
                FONT_MUTATORS,
                TEXT_MUTATORS,
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::*;
    use crate::annotation::{AccessorTag, Style};

    fn factory() -> AnnotationFactory {
        AnnotationFactory::with_builtin_variants().unwrap()
    }

    #[test]
    fn test_builtin_kinds_registered() {
        let factory = factory();
        assert_eq!(
            factory.kinds(),
            vec![
                "arrow",
                "ellipse",
                "free_line",
                "numbered_text",
                "polygon",
                "polyline",
                "rectangle"
            ]
        );
        assert_eq!(factory.display_name("polygon"), Some("Polygon"));
    }

    #[test]
    fn test_create_stamps_id() {
        let item = factory().create("rectangle", AnnotationId(1000)).unwrap();
        assert_eq!(item.kind(), "rectangle");
        assert_eq!(item.id(), AnnotationId(1000));
        assert!(item.points().is_empty());
    }

    #[test]
    fn test_unknown_kind() {
        let result = factory().create("hexagon", AnnotationId(1));
        assert!(matches!(result, Err(FactoryError::UnknownKind(kind)) if kind == "hexagon"));
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut factory = factory();
        let err = factory
            .register(VariantRegistration::new(
                Arrow::KIND,
                "Arrow again",
                || Box::new(Arrow::default()),
                &[],
            ))
            .unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateKind("arrow"));
    }

    #[test]
    fn test_text_mutators_on_line_kind_fail_registration() {
        let mut factory = AnnotationFactory::default();
        let err = factory
            .register(VariantRegistration::new(
                FreeLine::KIND,
                "Freehand line",
                || Box::new(FreeLine::default()),
                &[TEXT_MUTATORS],
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::UnresolvedAccessor {
                accessor: AccessorTag::Text,
                ..
            }
        ));
        assert!(!factory.is_registered(FreeLine::KIND));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut factory = AnnotationFactory::default();
        let err = factory
            .register(VariantRegistration::new(
                "polygon",
                "Polygon",
                || Box::new(Polyline::open()),
                &[],
            ))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::KindMismatch { built: "polyline", .. }));
    }

    #[test]
    fn test_binding_lookup() {
        let factory = factory();
        let binding = factory.binding("rectangle", MutatorTag::SetBackground).unwrap();
        assert_eq!(binding.accessor, Some(AccessorTag::Background));
        assert!(factory.binding("arrow", MutatorTag::SetBackground).is_none());
        assert!(factory.binding("arrow", MutatorTag::SetText).is_none());
        assert!(factory.binding("numbered_text", MutatorTag::SetText).is_some());
    }

    #[test]
    fn test_reconstruct_preserves_id_and_state() {
        let factory = factory();
        let mut ellipse = factory.create("ellipse", AnnotationId(1007)).unwrap();
        ellipse.core_mut().points = vec![Vec2::ZERO, Vec2::new(10.0, 6.0)];
        ellipse.core_mut().style = Style::default().with_foreground(Color::WHITE);

        let payload = Payload::capture(ellipse.as_ref()).unwrap();
        let rebuilt = factory.reconstruct(&payload).unwrap();
        assert_eq!(rebuilt.kind(), "ellipse");
        assert_eq!(rebuilt.id(), AnnotationId(1007));
        assert_eq!(rebuilt.export_state(), ellipse.export_state());
    }

    #[test]
    fn test_reconstruct_unknown_kind() {
        let factory = factory();
        let payload = Payload::from_raw(r#"{"kind":"hexagon","id":5,"state":{"points":[]}}"#);
        assert!(matches!(
            factory.reconstruct(&payload),
            Err(FactoryError::UnknownKind(_))
        ));
    }
}
