// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Equality-gated writes.
//!
//! Every property write the reconciler performs goes through an
//! [`UpdateGuard`]: the current value is read from the player, compared to the
//! declared value, and the write only happens when they differ.

use alloc::rc::Rc;

/// How a guarded write decides whether the value changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UpdateGuard {
    /// Compare shared references by pointer identity.
    ///
    /// Used for animation assets: equal-but-distinct assets still count as a
    /// change, identical ones never do.
    Identity,
    /// Compare by [`PartialEq`].
    Value,
    /// Always write. The write itself must be idempotent.
    Unguarded,
}

/// Whether a guarded write happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The value differed and was written.
    Applied,
    /// The value was unchanged; nothing was written.
    Skipped,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Applied`].
    #[must_use]
    #[inline]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

impl UpdateGuard {
    /// Identity check for optional shared references.
    ///
    /// Returns `true` when `current` and `next` refer to different
    /// allocations, or exactly one of them is `None`.
    #[must_use]
    pub fn identity_changed<T: ?Sized>(current: Option<&Rc<T>>, next: Option<&Rc<T>>) -> bool {
        match (current, next) {
            (None, None) => false,
            (Some(current), Some(next)) => !Rc::ptr_eq(current, next),
            _ => true,
        }
    }

    /// Value check. A missing current value always counts as a change.
    #[must_use]
    pub fn value_changed<T: PartialEq + ?Sized>(current: Option<&T>, next: &T) -> bool {
        current != Some(next)
    }

    /// Runs `write` on `target` if `changed`, reporting what happened.
    ///
    /// `changed` is computed by the caller (usually with
    /// [`identity_changed`](Self::identity_changed) or
    /// [`value_changed`](Self::value_changed)) so the read borrow of `target`
    /// ends before the write borrows it mutably. [`UpdateGuard::Unguarded`]
    /// ignores `changed` and always writes.
    pub fn run<P: ?Sized>(self, target: &mut P, changed: bool, write: impl FnOnce(&mut P)) -> Outcome {
        if changed || self == Self::Unguarded {
            write(target);
            Outcome::Applied
        } else {
            Outcome::Skipped
        }
    }
}
