//! Error types for the diff engine.

use crate::catalog::ObjectKind;

/// Errors that can occur while diffing catalog snapshots.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// An option entry could not be split into a key and a value.
    #[error("Malformed option list entry '{entry}': {reason}")]
    MalformedOptionList {
        /// The offending entry, verbatim.
        entry: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// An ACL item could not be parsed.
    #[error("Malformed ACL item '{entry}'")]
    MalformedAcl {
        /// The offending item, verbatim.
        entry: String,
    },

    /// Two objects in one snapshot share an identity.
    #[error("Duplicate {kind} identity in snapshot: {identity}")]
    DuplicateIdentity {
        /// Object kind of the snapshot.
        kind: ObjectKind,
        /// The repeated identity.
        identity: String,
    },

    /// Diffing a single object failed.
    #[error("Failed to diff {kind} {identity}: {source}")]
    Object {
        /// Object kind.
        kind: ObjectKind,
        /// Identity of the failing object.
        identity: String,
        /// Underlying cause.
        #[source]
        source: Box<DiffError>,
    },

    /// Reading a snapshot for a kind failed.
    #[error("Failed to read {kind} snapshot: {source}")]
    Snapshot {
        /// Object kind.
        kind: ObjectKind,
        /// Underlying cause.
        #[source]
        source: Box<DiffError>,
    },

    /// IO error (reading snapshot files, writing the script).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Multiple errors occurred.
    #[error("Multiple errors occurred:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<DiffError>),
}

impl DiffError {
    /// Wraps an error as the failure of one object.
    pub fn for_object(self, kind: ObjectKind, identity: impl ToString) -> Self {
        Self::Object {
            kind,
            identity: identity.to_string(),
            source: Box::new(self),
        }
    }

    /// Wraps an error as the failure to read one kind's snapshot.
    pub fn for_snapshot(self, kind: ObjectKind) -> Self {
        Self::Snapshot {
            kind,
            source: Box::new(self),
        }
    }

    /// Returns the object kind this error is attributed to, if any.
    #[must_use]
    pub fn kind(&self) -> Option<ObjectKind> {
        match self {
            Self::DuplicateIdentity { kind, .. }
            | Self::Object { kind, .. }
            | Self::Snapshot { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result type for diff operations.
pub type Result<T> = std::result::Result<T, DiffError>;
