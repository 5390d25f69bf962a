// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered replay of configuration operations.

use smallvec::SmallVec;

use crate::error::ReconcileError;
use crate::guard::Outcome;
use crate::op::{ConfigureOp, OpKind};
use crate::player::AnimationPlayer;

/// Inline capacity for pipeline operations.
///
/// The animation assignment plus a handful of modifiers covers most views.
const INLINE_OPS: usize = 8;

/// Summary of one pipeline replay.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Operations whose write went through.
    pub applied: usize,
    /// Operations skipped because the value was already in place.
    pub skipped: usize,
    /// `true` if the animation was reassigned (the player rebuilt its render tree).
    pub rebuilt: bool,
}

impl ApplyReport {
    /// Returns `true` if no operation wrote anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied == 0
    }
}

/// An ordered list of pending operations, replayed in full on every pass.
///
/// There is no structural diff between an old and a new pipeline. Each
/// operation guards its own write, so replaying an unchanged pipeline costs
/// one comparison per operation and writes nothing.
///
/// # Example
///
/// ```rust
/// use understory_reconcile::{BackgroundBehavior, ConfigurationPipeline, ConfigureOp, OpKind};
/// # use understory_reconcile::AnimationPlayer;
/// # fn kinds<P: AnimationPlayer>() {
/// let mut pipeline = ConfigurationPipeline::<P>::new();
/// pipeline.push(ConfigureOp::Looping);
/// pipeline.push(ConfigureOp::BackgroundBehavior(BackgroundBehavior::Pause));
/// assert_eq!(
///     pipeline.kinds().collect::<Vec<_>>(),
///     [OpKind::Looping, OpKind::BackgroundBehavior]
/// );
/// # }
/// ```
pub struct ConfigurationPipeline<P: AnimationPlayer + ?Sized> {
    ops: SmallVec<[ConfigureOp<P>; INLINE_OPS]>,
}

impl<P: AnimationPlayer + ?Sized> ConfigurationPipeline<P> {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ops: SmallVec::new(),
        }
    }

    /// Appends an operation.
    pub fn push(&mut self, op: ConfigureOp<P>) {
        self.ops.push(op);
    }

    /// Returns the operations in application order.
    #[must_use]
    pub fn operations(&self) -> &[ConfigureOp<P>] {
        &self.ops
    }

    /// Returns the kinds of the operations in application order.
    pub fn kinds(&self) -> impl Iterator<Item = OpKind> + '_ {
        self.ops.iter().map(ConfigureOp::kind)
    }

    /// Returns the number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if there are no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies every operation to `player` in declaration order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing operation and returns its error. Operations
    /// before it have been applied; operations after it have not, since they
    /// may depend on it.
    pub fn apply(&self, player: &mut P) -> Result<ApplyReport, ReconcileError> {
        let mut report = ApplyReport::default();
        for (index, op) in self.ops.iter().enumerate() {
            let kind = op.kind();
            match op.apply(player)? {
                Outcome::Applied => {
                    report.applied += 1;
                    if kind == OpKind::Animation {
                        report.rebuilt = true;
                        tracing::debug!(index, "animation reassigned; player rebuilds render tree");
                    }
                }
                Outcome::Skipped => {
                    report.skipped += 1;
                    tracing::trace!(index, ?kind, "unchanged; write skipped");
                }
            }
        }
        Ok(report)
    }
}

impl<P: AnimationPlayer + ?Sized> Default for ConfigurationPipeline<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: AnimationPlayer + ?Sized> Clone for ConfigurationPipeline<P> {
    fn clone(&self) -> Self {
        Self {
            ops: self.ops.clone(),
        }
    }
}

impl<P: AnimationPlayer + ?Sized> core::fmt::Debug for ConfigurationPipeline<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.ops.iter()).finish()
    }
}

impl<P: AnimationPlayer + ?Sized> FromIterator<ConfigureOp<P>> for ConfigurationPipeline<P> {
    fn from_iter<I: IntoIterator<Item = ConfigureOp<P>>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl<P: AnimationPlayer + ?Sized> Extend<ConfigureOp<P>> for ConfigurationPipeline<P> {
    fn extend<I: IntoIterator<Item = ConfigureOp<P>>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}
