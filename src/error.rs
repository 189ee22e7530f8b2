//! Error types for the annotation layer.
//!
//! - [`RegistrationError`]: a variant's mutator table cannot be resolved
//!   (fatal, raised while registering kinds at startup)
//! - [`FactoryError`]: an item could not be built or rebuilt from a payload
//! - [`ReplayError`]: an undo or redo step was abandoned
//! - [`MutationError`]: a mutator call was rejected; no record is created

use thiserror::Error;

use crate::annotation::{AccessorTag, AnnotationId, MutatorTag};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrationError {
    /// A mutator declares a paired accessor the variant cannot answer
    #[error("{kind}: accessor {accessor:?} paired with {mutator:?} is not provided by the variant")]
    UnresolvedAccessor {
        kind: &'static str,
        mutator: MutatorTag,
        accessor: AccessorTag,
    },

    /// The same mutator appears twice in one variant's table
    #[error("{kind}: mutator {mutator:?} is declared more than once")]
    DuplicateMutator {
        kind: &'static str,
        mutator: MutatorTag,
    },

    /// The kind tag is already registered
    #[error("annotation kind `{0}` is already registered")]
    DuplicateKind(&'static str),

    /// The constructor produced an instance reporting a different kind
    #[error("constructor for `{registered}` builds `{built}` instances")]
    KindMismatch {
        registered: &'static str,
        built: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("unknown annotation kind `{0}`")]
    UnknownKind(String),

    #[error("snapshot payload could not be encoded or decoded: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("{kind} rejected imported state: {reason}")]
    Import { kind: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("could not rebuild annotation: {0}")]
    Reconstruct(#[from] FactoryError),

    #[error("annotation {0} is not in the layer")]
    MissingItem(AnnotationId),

    #[error("annotation {0} is already in the layer")]
    AlreadyPresent(AnnotationId),

    #[error("record for {expected} carries a snapshot of {found}")]
    IdentityMismatch {
        expected: AnnotationId,
        found: AnnotationId,
    },

    #[error("record for {0} has no snapshot to restore")]
    MissingPayload(AnnotationId),
}

#[derive(Error, Debug)]
pub enum MutationError {
    #[error("point index {index} out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{kind} holds at most {max} points")]
    PointLimit { kind: &'static str, max: usize },

    #[error("{kind} does not support {mutator:?}")]
    Unsupported {
        kind: &'static str,
        mutator: MutatorTag,
    },

    #[error("{mutator:?} is not registered for {kind}")]
    Unregistered {
        kind: &'static str,
        mutator: MutatorTag,
    },

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("annotation {0} is not in the layer")]
    UnknownItem(AnnotationId),

    #[error("could not capture snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_subject() {
        let err = MutationError::PointLimit {
            kind: "arrow",
            max: 2,
        };
        assert_eq!(err.to_string(), "arrow holds at most 2 points");

        let err = ReplayError::MissingItem(AnnotationId(1001));
        assert_eq!(err.to_string(), "annotation #1001 is not in the layer");
    }

    #[test]
    fn test_factory_error_wraps_into_replay_error() {
        let err: ReplayError = FactoryError::UnknownKind("blob".into()).into();
        assert!(matches!(err, ReplayError::Reconstruct(FactoryError::UnknownKind(_))));
        assert!(err.to_string().contains("blob"));
    }
}
