//! Static mutator registration tables.
//!
//! Each variant declares which mutators it accepts, which accessor (if any)
//! pairs with each, and the description recorded on the undo stack. The
//! factory resolves these declarations once when the variant is registered.

use std::collections::HashMap;

use crate::annotation::{AccessorTag, Annotation, MutatorTag};
use crate::error::RegistrationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutatorDecl {
    pub tag: MutatorTag,
    pub accessor: Option<AccessorTag>,
    pub description: &'static str,
}

impl MutatorDecl {
    pub const fn new(
        tag: MutatorTag,
        accessor: Option<AccessorTag>,
        description: &'static str,
    ) -> Self {
        Self {
            tag,
            accessor,
            description,
        }
    }
}

pub const GEOMETRY_MUTATORS: &[MutatorDecl] = &[
    MutatorDecl::new(MutatorTag::AddPoint, None, "Add point"),
    MutatorDecl::new(MutatorTag::InsertPoint, None, "Insert point"),
    MutatorDecl::new(MutatorTag::RemovePoint, None, "Remove point"),
    MutatorDecl::new(MutatorTag::SetPoint, None, "Move point"),
    MutatorDecl::new(MutatorTag::SetPoints, Some(AccessorTag::Points), "Reshape"),
    MutatorDecl::new(MutatorTag::Translate, None, "Move annotation"),
];

pub const STROKE_MUTATORS: &[MutatorDecl] = &[
    MutatorDecl::new(
        MutatorTag::SetForeground,
        Some(AccessorTag::Foreground),
        "Change color",
    ),
    MutatorDecl::new(
        MutatorTag::SetLineWidth,
        Some(AccessorTag::LineWidth),
        "Change line width",
    ),
    MutatorDecl::new(MutatorTag::SetDash, Some(AccessorTag::Dash), "Change dash pattern"),
];

pub const FILL_MUTATORS: &[MutatorDecl] = &[MutatorDecl::new(
    MutatorTag::SetBackground,
    Some(AccessorTag::Background),
    "Change fill",
)];

pub const FONT_MUTATORS: &[MutatorDecl] = &[
    MutatorDecl::new(
        MutatorTag::SetFontWeight,
        Some(AccessorTag::FontWeight),
        "Change font weight",
    ),
    MutatorDecl::new(
        MutatorTag::SetFontSize,
        Some(AccessorTag::FontSize),
        "Change font size",
    ),
];

pub const TEXT_MUTATORS: &[MutatorDecl] = &[
    MutatorDecl::new(MutatorTag::SetText, Some(AccessorTag::Text), "Edit text"),
    MutatorDecl::new(MutatorTag::SetNumber, Some(AccessorTag::Number), "Renumber"),
];

/// Resolved entry for one mutator of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutatorBinding {
    pub accessor: Option<AccessorTag>,
    pub description: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct MutatorTable {
    bindings: HashMap<MutatorTag, MutatorBinding>,
}

impl MutatorTable {
    /// Resolve declarations against a prototype instance of the variant.
    pub fn resolve(
        prototype: &dyn Annotation,
        decls: &[MutatorDecl],
    ) -> Result<Self, RegistrationError> {
        let kind = prototype.kind();
        let mut bindings = HashMap::with_capacity(decls.len());
        for decl in decls {
            if let Some(accessor) = decl.accessor
                && !prototype.supports(accessor)
            {
                return Err(RegistrationError::UnresolvedAccessor {
                    kind,
                    mutator: decl.tag,
                    accessor,
                });
            }
            let binding = MutatorBinding {
                accessor: decl.accessor,
                description: decl.description,
            };
            if bindings.insert(decl.tag, binding).is_some() {
                return Err(RegistrationError::DuplicateMutator {
                    kind,
                    mutator: decl.tag,
                });
            }
        }
        Ok(Self { bindings })
    }

    pub fn get(&self, tag: MutatorTag) -> Option<&MutatorBinding> {
        self.bindings.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{FreeLine, NumberedText};

    #[test]
    fn test_resolve_common_tables() {
        let decls: Vec<MutatorDecl> = [GEOMETRY_MUTATORS, STROKE_MUTATORS].concat();
        let table = MutatorTable::resolve(&FreeLine::default(), &decls).unwrap();
        assert_eq!(table.len(), decls.len());

        let binding = table.get(MutatorTag::SetForeground).unwrap();
        assert_eq!(binding.accessor, Some(AccessorTag::Foreground));
        assert_eq!(binding.description, "Change color");
        assert!(table.get(MutatorTag::SetText).is_none());
    }

    #[test]
    fn test_text_accessor_unresolved_on_free_line() {
        let err = MutatorTable::resolve(&FreeLine::default(), TEXT_MUTATORS).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::UnresolvedAccessor {
                kind: "free_line",
                mutator: MutatorTag::SetText,
                accessor: AccessorTag::Text,
            }
        );
    }

    #[test]
    fn test_text_accessor_resolves_on_numbered_text() {
        let table = MutatorTable::resolve(&NumberedText::default(), TEXT_MUTATORS).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_mutator_rejected() {
        let decls = [GEOMETRY_MUTATORS[0], GEOMETRY_MUTATORS[0]];
        let err = MutatorTable::resolve(&FreeLine::default(), &decls).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateMutator { .. }));
    }
}
