use std::fmt;

/// Convenience result type used across ctxmap.
pub type CtxmapResult<T> = Result<T, CtxmapError>;

/// Which input of a diff an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The original item set.
    Before,
    /// The transformed item set.
    After,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Before => f.write_str("before"),
            Side::After => f.write_str("after"),
        }
    }
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum CtxmapError {
    /// Placed weight does not fit in the capacity of a layout call.
    #[error("capacity exceeded: items total {total} tokens but capacity is {capacity}")]
    CapacityExceeded {
        /// Sum of all item weights.
        total: u64,
        /// Capacity the items were laid out against.
        capacity: u64,
    },

    /// An id appears more than once within one side of a diff.
    #[error("duplicate identity: id '{id}' appears more than once in the {side} set")]
    DuplicateIdentity {
        /// The repeated id.
        id: String,
        /// The side containing the repeat.
        side: Side,
    },

    /// An internal geometry or conservation check failed. Always a bug.
    #[error("layout invariant violated: {0}")]
    LayoutInvariantViolation(String),

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CtxmapError {
    /// Build a [`CtxmapError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CtxmapError::LayoutInvariantViolation`] value.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::LayoutInvariantViolation(msg.into())
    }

    /// Build a [`CtxmapError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`CtxmapError::DuplicateIdentity`] value.
    pub fn duplicate(id: impl Into<String>, side: Side) -> Self {
        Self::DuplicateIdentity {
            id: id.into(),
            side,
        }
    }

    /// `true` for errors that signal a bug in this crate rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::LayoutInvariantViolation(_))
    }
}

impl From<serde_json::Error> for CtxmapError {
    fn from(value: serde_json::Error) -> Self {
        Self::serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
