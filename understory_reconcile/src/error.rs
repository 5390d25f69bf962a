// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciliation errors.

use crate::keypath::AnimationKeypath;
use crate::provider::ValueKind;

/// A declared collaborator does not fit the player it is applied to.
///
/// These are programming errors in the description: the declared state cannot
/// be reflected on the player. They are not retried; the next pass applies
/// the next description from scratch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// A value provider keypath matches nothing in the loaded animation.
    #[error("value provider keypath `{keypath}` does not resolve in the loaded animation")]
    UnresolvedKeypath {
        /// The keypath that failed to resolve.
        keypath: AnimationKeypath,
    },
    /// A value provider produces a different kind of value than the
    /// properties its keypath resolves to.
    #[error("value provider for `{keypath}` produces {found:?} values but the property holds {expected:?}")]
    ValueKindMismatch {
        /// The keypath the provider was declared for.
        keypath: AnimationKeypath,
        /// Kind of the resolved properties.
        expected: ValueKind,
        /// Kind the provider produces.
        found: ValueKind,
    },
}

impl ReconcileError {
    /// Returns the keypath the error refers to.
    #[must_use]
    pub fn keypath(&self) -> &AnimationKeypath {
        match self {
            Self::UnresolvedKeypath { keypath } | Self::ValueKindMismatch { keypath, .. } => keypath,
        }
    }
}
