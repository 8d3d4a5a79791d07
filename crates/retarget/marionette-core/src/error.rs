//! Error type shared by every retargeting operation.

use thiserror::Error;

/// Hard failures. Each aborts only the operation that raised it and leaves
/// prior state untouched; non-fatal diagnostics are logged and reported as data.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum RetargetError {
    /// Skeleton argument is empty or structurally invalid.
    #[error("invalid skeleton '{name}': {reason}")]
    InvalidSkeleton { name: String, reason: String },

    /// A binding for this performer/puppet pair is already active.
    #[error("binding '{performer}' -> '{puppet}' is already active; unbind it first")]
    BindingAlreadyActive { performer: String, puppet: String },

    /// Sampling was requested through a binding that is not active.
    #[error("puppet '{puppet}' has no active binding")]
    UnboundPuppet { puppet: String },

    /// The binding was built for different skeletons than the ones supplied.
    #[error("binding was built for {expected}, got {found}")]
    BindingMismatch { expected: String, found: String },

    /// Frame range with start after end.
    #[error("empty frame range [{start}, {end}]")]
    EmptyFrameRange { start: i32, end: i32 },

    /// A clip would overlap the clip placed before it.
    #[error("clip at frame {start} overlaps previous clip ending at {previous_end} on track '{track}'")]
    ClipOverlap {
        track: String,
        start: i32,
        previous_end: i32,
    },

    /// Stored JSON could not be parsed into the data model.
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T, E = RetargetError> = std::result::Result<T, E>;
