//! Snapshot and field-patch types.
//!
//! A snapshot is an immutable point-in-time value of a store's state. Stores
//! never hand out mutable references: an update clones the current snapshot,
//! merges a batch of [`FieldPatch`]es into the copy left-to-right, and
//! publishes the copy as a single atomic replacement.
//!
//! Fields are addressed by name so that one update entry point can serve
//! every snapshot shape; each snapshot type validates names and value types
//! in its [`Snapshot::apply`] implementation and rejects anything it does not
//! declare.

use crate::error::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A typed value carried by a [`FieldPatch`].
///
/// The variants cover the field types the booking UI state actually uses:
/// chrome flags, counters and percentages, airport/carrier codes, and
/// calendar dates for the search form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// A boolean flag (panel open/closed, one-way toggle, ...)
    Bool(bool),
    /// An integer (progress percent, stop count, ...)
    Integer(i64),
    /// Free-form text (airport code, carrier code, ...)
    Text(String),
    /// A calendar date (departure/return dates)
    Date(NaiveDate),
}

impl FieldValue {
    /// Human-readable name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
        }
    }
}

/// A partial update of a single named field.
///
/// Updates are submitted to a store as an ordered batch of patches which are
/// merged left-to-right; a later patch for the same field wins.
///
/// # Example
///
/// ```
/// use flightdeck_core::snapshot::FieldPatch;
///
/// let patch = FieldPatch::bool("menu_open", true);
/// assert_eq!(patch.field(), "menu_open");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPatch {
    field: String,
    value: FieldValue,
}

impl FieldPatch {
    /// Create a patch carrying an arbitrary [`FieldValue`].
    #[must_use]
    pub fn new(field: impl Into<String>, value: FieldValue) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }

    /// Create a boolean patch.
    #[must_use]
    pub fn bool(field: impl Into<String>, value: bool) -> Self {
        Self::new(field, FieldValue::Bool(value))
    }

    /// Create an integer patch.
    #[must_use]
    pub fn integer(field: impl Into<String>, value: i64) -> Self {
        Self::new(field, FieldValue::Integer(value))
    }

    /// Create a text patch.
    #[must_use]
    pub fn text(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FieldValue::Text(value.into()))
    }

    /// Create a calendar-date patch.
    #[must_use]
    pub fn date(field: impl Into<String>, value: NaiveDate) -> Self {
        Self::new(field, FieldValue::Date(value))
    }

    /// The field this patch addresses.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The value this patch carries.
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Extract a boolean value, or report a type mismatch for `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TypeMismatch`] if the patch does not carry a
    /// boolean.
    pub fn expect_bool(&self, store: &'static str) -> Result<bool, StoreError> {
        match self.value {
            FieldValue::Bool(value) => Ok(value),
            _ => Err(StoreError::type_mismatch(store, &self.field, "boolean")),
        }
    }

    /// Extract an integer value, or report a type mismatch for `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TypeMismatch`] if the patch does not carry an
    /// integer.
    pub fn expect_integer(&self, store: &'static str) -> Result<i64, StoreError> {
        match self.value {
            FieldValue::Integer(value) => Ok(value),
            _ => Err(StoreError::type_mismatch(store, &self.field, "integer")),
        }
    }

    /// Extract a text value, or report a type mismatch for `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TypeMismatch`] if the patch does not carry text.
    pub fn expect_text(&self, store: &'static str) -> Result<String, StoreError> {
        match &self.value {
            FieldValue::Text(value) => Ok(value.clone()),
            _ => Err(StoreError::type_mismatch(store, &self.field, "text")),
        }
    }

    /// Extract a date value, or report a type mismatch for `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TypeMismatch`] if the patch does not carry a
    /// date.
    pub fn expect_date(&self, store: &'static str) -> Result<NaiveDate, StoreError> {
        match self.value {
            FieldValue::Date(value) => Ok(value),
            _ => Err(StoreError::type_mismatch(store, &self.field, "date")),
        }
    }
}

/// A point-in-time state value that supports named partial updates.
///
/// Implementations match on the patch's field name, write the typed value
/// into the corresponding struct field, and reject unknown names. Applying
/// an identical patch twice must be idempotent (field assignment makes this
/// hold for free).
pub trait Snapshot: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Short name used in diagnostics and error messages.
    const NAME: &'static str;

    /// Merge one field patch into this snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownField`] for an undeclared field name and
    /// [`StoreError::TypeMismatch`] for a value of the wrong type. The store
    /// treats any error as a rejection of the whole batch.
    fn apply(&mut self, patch: &FieldPatch) -> Result<(), StoreError>;
}

/// A snapshot paired with its publication version.
///
/// The version increases by exactly one per accepted update batch, so
/// subscribers (and tests) can count publications without instrumenting
/// callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<S> {
    /// Number of accepted update batches since the store was created.
    pub version: u64,
    /// The published snapshot value.
    pub value: S,
}

impl<S> Versioned<S> {
    /// Wrap an initial snapshot at version zero.
    #[must_use]
    pub const fn initial(value: S) -> Self {
        Self { version: 0, value }
    }
}
