//! Error types for snapshot stores.
//!
//! A store rejects an update batch as a whole: the first bad patch aborts the
//! merge before anything is published, so the snapshot and its version are
//! left untouched.

use thiserror::Error;

/// Errors reported synchronously by a store's update entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A patch addressed a field the snapshot does not declare.
    ///
    /// The whole batch is rejected; no partial merge is applied.
    #[error("unknown field `{field}` for `{store}` snapshot")]
    UnknownField {
        /// Snapshot name ([`Snapshot::NAME`](crate::snapshot::Snapshot::NAME))
        store: &'static str,
        /// The offending field name
        field: String,
    },

    /// A patch carried a value of the wrong type for its field.
    ///
    /// The whole batch is rejected; no partial merge is applied.
    #[error("field `{field}` of `{store}` snapshot expects a {expected} value")]
    TypeMismatch {
        /// Snapshot name ([`Snapshot::NAME`](crate::snapshot::Snapshot::NAME))
        store: &'static str,
        /// The field whose value did not match
        field: String,
        /// Human-readable description of the expected type
        expected: &'static str,
    },
}

impl StoreError {
    /// Build an [`StoreError::UnknownField`] for the given store and field.
    #[must_use]
    pub fn unknown_field(store: &'static str, field: &str) -> Self {
        Self::UnknownField {
            store,
            field: field.to_owned(),
        }
    }

    /// Build a [`StoreError::TypeMismatch`] for the given store and field.
    #[must_use]
    pub fn type_mismatch(store: &'static str, field: &str, expected: &'static str) -> Self {
        Self::TypeMismatch {
            store,
            field: field.to_owned(),
            expected,
        }
    }
}
