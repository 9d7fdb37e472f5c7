//! Batch format and continuity validation.
//!
//! # Responsibility
//! - Turn raw comma-separated input into classified item lists.
//! - Decide whether a day's items continue the recorded sequence.
//!
//! # Invariants
//! - Validation is all-or-nothing; a batch is never partially accepted.
//! - Check order is fixed: intra-day problems, intra-day exercises,
//!   cross-day problems, cross-day exercises. The first failure wins.

mod continuity;

pub use continuity::{is_consecutive, validate_batch, validate_continuity, ItemBatch};

use crate::model::item::ItemKind;
use std::fmt::{Display, Formatter};

/// Where a continuity break was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuityScope {
    /// Two adjacent items inside the submitted day.
    IntraDay,
    /// Last item of the previous record versus first item of the submitted day.
    CrossDay,
}

impl Display for ContinuityScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IntraDay => f.write_str("within the day"),
            Self::CrossDay => f.write_str("across days"),
        }
    }
}

/// User-facing rejection reason for a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A token matches neither `X.Y` nor `X.Y.Z`.
    #[error("invalid format: `{token}`; use X.Y for problems or X.Y.Z for exercises")]
    Format { token: String },
    /// Two adjacent items are not consecutive.
    #[error("{kind} sequence broken {scope}: {previous} -> {next}")]
    Continuity {
        kind: ItemKind,
        scope: ContinuityScope,
        previous: String,
        next: String,
    },
}
