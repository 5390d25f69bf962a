// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The identity-preserving owner of a retained player.

use kurbo::Size;

use crate::error::ReconcileError;
use crate::guard::UpdateGuard;
use crate::pipeline::ApplyReport;
use crate::player::{AnimationPlayer, PlayerSeed};
use crate::sizing::{ProposedSize, SizingStrategy};
use crate::view::AnimationView;

/// Provider side of a two-phase host layout protocol.
///
/// A host first asks how large the participant would be for one or more
/// offers ([`measure`](Self::measure)), possibly several times per pass, then
/// tells it the final size ([`commit`](Self::commit)).
pub trait LayoutParticipant {
    /// Returns the size this participant takes for `offered`.
    ///
    /// Must be deterministic: the same offer with no intervening state change
    /// returns the same size.
    fn measure(&self, offered: ProposedSize) -> Size;

    /// Accepts the final size chosen by the host.
    fn commit(&mut self, size: Size);
}

/// How a container reacts when a pass fails with a [`ReconcileError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum MismatchHandling {
    /// Panic in debug builds; return the error in release builds.
    ///
    /// This is the default behavior: a description that cannot be reflected
    /// on the player surfaces loudly during development.
    #[default]
    DebugAssert,
    /// Always return the error.
    Error,
}

/// Owns one retained player across re-evaluations of its description.
///
/// The player is created once, in [`mount`](Self::mount), from the first
/// description's seed values. Every later [`update`](Self::update) replays
/// the new description's pipeline against the same player and adopts its
/// sizing strategy; the player is never recreated because the description
/// was rebuilt.
///
/// # Example
///
/// ```rust
/// # use understory_reconcile::AnimationPlayer;
/// use kurbo::Size;
/// use understory_reconcile::{
///     AnimationView, LayoutParticipant, MeasurementContainer, PlayerSeed, ProposedSize,
/// };
///
/// # fn demo<P: AnimationPlayer>(
/// #     animation: std::rc::Rc<P::Animation>,
/// #     make_player: impl FnOnce(PlayerSeed<'_, P::Animation>) -> P,
/// # ) -> Result<(), understory_reconcile::ReconcileError> {
/// let view = AnimationView::<P>::new(Some(animation.clone())).resizable().looping();
/// let mut container = MeasurementContainer::mount(&view, make_player)?;
///
/// let size = container.measure(ProposedSize::exact(Size::new(320.0, 240.0)));
/// container.commit(size);
///
/// // Re-evaluation builds a fresh description; the player survives.
/// let next = AnimationView::<P>::new(Some(animation)).resizable().looping();
/// let report = container.update(&next)?;
/// assert!(!report.rebuilt);
/// # Ok(())
/// # }
/// ```
pub struct MeasurementContainer<P: AnimationPlayer> {
    player: P,
    strategy: SizingStrategy,
    committed: Option<Size>,
    committed_intrinsic: Option<Size>,
    strategy_changed: bool,
    handling: MismatchHandling,
}

impl<P: AnimationPlayer> MeasurementContainer<P> {
    /// Creates the player from `view`'s seed values and applies the first pass.
    ///
    /// # Errors
    ///
    /// Returns the first pass's error; see [`update`](Self::update).
    pub fn mount(
        view: &AnimationView<P>,
        make_player: impl FnOnce(PlayerSeed<'_, P::Animation>) -> P,
    ) -> Result<Self, ReconcileError> {
        Self::mount_with(view, make_player, MismatchHandling::default())
    }

    /// Like [`mount`](Self::mount), with an explicit failure policy.
    ///
    /// # Errors
    ///
    /// Returns the first pass's error; see [`update`](Self::update).
    pub fn mount_with(
        view: &AnimationView<P>,
        make_player: impl FnOnce(PlayerSeed<'_, P::Animation>) -> P,
        handling: MismatchHandling,
    ) -> Result<Self, ReconcileError> {
        let player = make_player(view.seed());
        let mut container = Self {
            player,
            strategy: view.sizing(),
            committed: None,
            committed_intrinsic: None,
            strategy_changed: false,
            handling,
        };
        container.update(view)?;
        Ok(container)
    }

    /// Sets the failure policy for later [`update`](Self::update) calls.
    ///
    /// The first pass runs inside `mount`, before this can be called; pass the
    /// policy to [`mount_with`](Self::mount_with) to cover it too.
    #[must_use]
    pub fn with_mismatch_handling(mut self, handling: MismatchHandling) -> Self {
        self.handling = handling;
        self
    }

    /// Reconciles the player with a freshly built description.
    ///
    /// Adopts the description's sizing strategy, replays its pipeline, and,
    /// if a size was already committed, refreshes the content transform
    /// (for example once content arrives for a deferred fit).
    ///
    /// # Errors
    ///
    /// Returns the pipeline's [`ReconcileError`]. With
    /// [`MismatchHandling::DebugAssert`] this panics instead in debug builds.
    pub fn update(&mut self, view: &AnimationView<P>) -> Result<ApplyReport, ReconcileError> {
        let strategy = view.sizing();
        if strategy != self.strategy {
            tracing::debug!(from = ?self.strategy, to = ?strategy, "sizing strategy changed");
            self.strategy = strategy;
            self.strategy_changed = true;
        }

        let report = match view.pipeline().apply(&mut self.player) {
            Ok(report) => report,
            Err(err) => return Err(self.fail(err)),
        };

        if let Some(size) = self.committed {
            self.place_content(size);
        }
        Ok(report)
    }

    fn fail(&self, err: ReconcileError) -> ReconcileError {
        match self.handling {
            MismatchHandling::DebugAssert => {
                if cfg!(debug_assertions) {
                    panic!("{err}");
                }
                tracing::warn!(error = %err, "description does not fit the player");
            }
            MismatchHandling::Error => {}
        }
        err
    }

    fn place_content(&mut self, size: Size) {
        let Some(transform) = self
            .strategy
            .content_transform(size, self.player.intrinsic_size())
        else {
            return;
        };
        let changed = UpdateGuard::value_changed(Some(&self.player.content_transform()), &transform);
        UpdateGuard::Value.run(&mut self.player, changed, |p| {
            p.set_content_transform(transform);
        });
    }

    /// Returns the player.
    #[must_use]
    pub fn player(&self) -> &P {
        &self.player
    }

    /// Returns the player mutably, for host-driven changes outside a pass.
    #[must_use]
    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Returns the active sizing strategy.
    #[must_use]
    pub fn strategy(&self) -> SizingStrategy {
        self.strategy
    }

    /// Returns the last committed size.
    #[must_use]
    pub fn committed_size(&self) -> Option<Size> {
        self.committed
    }

    /// Returns `true` if the host should lay this container out again.
    ///
    /// That is the case before the first commit, after the sizing strategy
    /// changed, and when the content's intrinsic size differs from the one
    /// seen at the last commit.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.committed.is_none()
            || self.strategy_changed
            || self.committed_intrinsic != self.player.intrinsic_size()
    }

    /// Consumes the container, returning the player.
    #[must_use]
    pub fn into_player(self) -> P {
        self.player
    }
}

impl<P: AnimationPlayer> LayoutParticipant for MeasurementContainer<P> {
    fn measure(&self, offered: ProposedSize) -> Size {
        self.strategy
            .measure(offered, self.player.intrinsic_size())
    }

    fn commit(&mut self, size: Size) {
        self.committed = Some(size);
        self.committed_intrinsic = self.player.intrinsic_size();
        self.strategy_changed = false;
        self.place_content(size);
    }
}

impl<P: AnimationPlayer + core::fmt::Debug> core::fmt::Debug for MeasurementContainer<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MeasurementContainer")
            .field("player", &self.player)
            .field("strategy", &self.strategy)
            .field("committed", &self.committed)
            .field("handling", &self.handling)
            .finish_non_exhaustive()
    }
}
