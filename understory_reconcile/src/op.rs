// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred configuration operations.
//!
//! A [`ConfigureOp`] is one unit of pending work against a player. Operations
//! are data: they can be inspected ([`ConfigureOp::kind`]) and are only
//! executed when a pipeline is applied.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use crate::erased::EquatableBox;
use crate::error::ReconcileError;
use crate::guard::{Outcome, UpdateGuard};
use crate::keypath::AnimationKeypath;
use crate::player::{AnimationPlayer, BackgroundBehavior, LoopMode, PlayerConfiguration};
use crate::provider::{FontProvider, ImageProvider, TextProvider, ValueProvider};

/// A caller-supplied closure run against the player on every pass.
///
/// The closure must be idempotent: running it against a player that is
/// already in the desired state must not change anything observable.
pub struct Mutation<P: ?Sized> {
    label: Option<&'static str>,
    apply: Rc<dyn Fn(&mut P)>,
}

impl<P: ?Sized> Mutation<P> {
    /// Wraps a closure.
    #[must_use]
    pub fn new(apply: impl Fn(&mut P) + 'static) -> Self {
        Self {
            label: None,
            apply: Rc::new(apply),
        }
    }

    /// Attaches a label shown in `Debug` output and traces.
    #[must_use]
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Returns the label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    /// Runs the closure.
    pub fn call(&self, player: &mut P) {
        (self.apply)(player);
    }
}

impl<P: ?Sized> Clone for Mutation<P> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            apply: self.apply.clone(),
        }
    }
}

impl<P: ?Sized> fmt::Debug for Mutation<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Discriminant of a [`ConfigureOp`], for inspection and tracing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// See [`ConfigureOp::Animation`].
    Animation,
    /// See [`ConfigureOp::Mutation`].
    Mutation,
    /// See [`ConfigureOp::Looping`].
    Looping,
    /// See [`ConfigureOp::BackgroundBehavior`].
    BackgroundBehavior,
    /// See [`ConfigureOp::AccessibilityLabel`].
    AccessibilityLabel,
    /// See [`ConfigureOp::Configuration`].
    Configuration,
    /// See [`ConfigureOp::ImageProvider`].
    ImageProvider,
    /// See [`ConfigureOp::TextProvider`].
    TextProvider,
    /// See [`ConfigureOp::FontProvider`].
    FontProvider,
    /// See [`ConfigureOp::ValueProvider`].
    ValueProvider,
}

impl OpKind {
    /// The guard this kind of operation writes through.
    #[must_use]
    pub fn guard(self) -> UpdateGuard {
        match self {
            Self::Animation => UpdateGuard::Identity,
            Self::Mutation => UpdateGuard::Unguarded,
            Self::Looping
            | Self::BackgroundBehavior
            | Self::AccessibilityLabel
            | Self::Configuration
            | Self::ImageProvider
            | Self::TextProvider
            | Self::FontProvider
            | Self::ValueProvider => UpdateGuard::Value,
        }
    }
}

/// One pending configuration step.
pub enum ConfigureOp<P: AnimationPlayer + ?Sized> {
    /// Load the animation. Identity-gated: re-assigning the same asset would
    /// rebuild the player's render tree.
    Animation(Option<Rc<P::Animation>>),
    /// Run a caller-supplied closure.
    Mutation(Mutation<P>),
    /// Start looping playback from the beginning unless already playing.
    Looping,
    /// Set the background behavior.
    BackgroundBehavior(BackgroundBehavior),
    /// Set the accessibility label.
    AccessibilityLabel(Option<String>),
    /// Set the player configuration.
    Configuration(PlayerConfiguration),
    /// Install an image provider.
    ImageProvider(EquatableBox<dyn ImageProvider>),
    /// Install a text provider.
    TextProvider(EquatableBox<dyn TextProvider>),
    /// Install a font provider.
    FontProvider(EquatableBox<dyn FontProvider>),
    /// Install a value provider for a keypath.
    ValueProvider {
        /// Keypath of the overridden properties.
        keypath: AnimationKeypath,
        /// The provider.
        provider: EquatableBox<dyn ValueProvider>,
    },
}

impl<P: AnimationPlayer + ?Sized> ConfigureOp<P> {
    /// Returns the kind of this operation.
    #[must_use]
    pub fn kind(&self) -> OpKind {
        match self {
            Self::Animation(_) => OpKind::Animation,
            Self::Mutation(_) => OpKind::Mutation,
            Self::Looping => OpKind::Looping,
            Self::BackgroundBehavior(_) => OpKind::BackgroundBehavior,
            Self::AccessibilityLabel(_) => OpKind::AccessibilityLabel,
            Self::Configuration(_) => OpKind::Configuration,
            Self::ImageProvider(_) => OpKind::ImageProvider,
            Self::TextProvider(_) => OpKind::TextProvider,
            Self::FontProvider(_) => OpKind::FontProvider,
            Self::ValueProvider { .. } => OpKind::ValueProvider,
        }
    }

    /// Applies this operation to `player`, skipping writes whose value is
    /// already in place.
    ///
    /// # Errors
    ///
    /// A value provider fails when the player has an animation loaded and the
    /// keypath does not resolve, or resolves to properties of another kind.
    pub fn apply(&self, player: &mut P) -> Result<Outcome, ReconcileError> {
        let guard = self.kind().guard();
        let outcome = match self {
            Self::Animation(animation) => {
                let changed = UpdateGuard::identity_changed(player.animation(), animation.as_ref());
                guard.run(player, changed, |p| p.set_animation(animation.clone()))
            }
            Self::Mutation(mutation) => guard.run(player, true, |p| mutation.call(p)),
            Self::Looping => {
                let changed = !player.is_playing();
                guard.run(player, changed, |p| p.play(0.0, 1.0, LoopMode::Loop))
            }
            Self::BackgroundBehavior(behavior) => {
                let changed =
                    UpdateGuard::value_changed(Some(&player.background_behavior()), behavior);
                guard.run(player, changed, |p| p.set_background_behavior(*behavior))
            }
            Self::AccessibilityLabel(label) => {
                let changed = player.accessibility_label() != label.as_deref();
                guard.run(player, changed, |p| p.set_accessibility_label(label.clone()))
            }
            Self::Configuration(configuration) => {
                let changed = UpdateGuard::value_changed(Some(player.configuration()), configuration);
                guard.run(player, changed, |p| p.set_configuration(*configuration))
            }
            Self::ImageProvider(provider) => {
                let changed = UpdateGuard::value_changed(player.image_provider(), provider);
                guard.run(player, changed, |p| p.set_image_provider(provider.clone()))
            }
            Self::TextProvider(provider) => {
                let changed = UpdateGuard::value_changed(Some(player.text_provider()), provider);
                guard.run(player, changed, |p| p.set_text_provider(provider.clone()))
            }
            Self::FontProvider(provider) => {
                let changed = UpdateGuard::value_changed(Some(player.font_provider()), provider);
                guard.run(player, changed, |p| p.set_font_provider(provider.clone()))
            }
            Self::ValueProvider { keypath, provider } => {
                check_keypath(player, keypath, provider)?;
                let changed = UpdateGuard::value_changed(player.value_provider(keypath), provider);
                guard.run(player, changed, |p| {
                    p.set_value_provider(keypath.clone(), provider.clone());
                })
            }
        };
        Ok(outcome)
    }
}

/// Verifies a value provider against the loaded animation.
///
/// Without an animation there is nothing to resolve against; the provider is
/// installed and checked again on the next pass.
fn check_keypath<P: AnimationPlayer + ?Sized>(
    player: &P,
    keypath: &AnimationKeypath,
    provider: &EquatableBox<dyn ValueProvider>,
) -> Result<(), ReconcileError> {
    if player.animation().is_none() {
        return Ok(());
    }
    let found = provider.value_kind();
    match player.keypath_kind(keypath) {
        None => Err(ReconcileError::UnresolvedKeypath {
            keypath: keypath.clone(),
        }),
        Some(expected) if expected != found => Err(ReconcileError::ValueKindMismatch {
            keypath: keypath.clone(),
            expected,
            found,
        }),
        Some(_) => Ok(()),
    }
}

impl<P: AnimationPlayer + ?Sized> Clone for ConfigureOp<P> {
    fn clone(&self) -> Self {
        match self {
            Self::Animation(animation) => Self::Animation(animation.clone()),
            Self::Mutation(mutation) => Self::Mutation(mutation.clone()),
            Self::Looping => Self::Looping,
            Self::BackgroundBehavior(behavior) => Self::BackgroundBehavior(*behavior),
            Self::AccessibilityLabel(label) => Self::AccessibilityLabel(label.clone()),
            Self::Configuration(configuration) => Self::Configuration(*configuration),
            Self::ImageProvider(provider) => Self::ImageProvider(provider.clone()),
            Self::TextProvider(provider) => Self::TextProvider(provider.clone()),
            Self::FontProvider(provider) => Self::FontProvider(provider.clone()),
            Self::ValueProvider { keypath, provider } => Self::ValueProvider {
                keypath: keypath.clone(),
                provider: provider.clone(),
            },
        }
    }
}

impl<P: AnimationPlayer + ?Sized> fmt::Debug for ConfigureOp<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Animation(animation) => f
                .debug_tuple("Animation")
                .field(&animation.as_ref().map(|a| Rc::as_ptr(a).cast::<()>()))
                .finish(),
            Self::Mutation(mutation) => f.debug_tuple("Mutation").field(mutation).finish(),
            Self::Looping => f.write_str("Looping"),
            Self::BackgroundBehavior(behavior) => {
                f.debug_tuple("BackgroundBehavior").field(behavior).finish()
            }
            Self::AccessibilityLabel(label) => {
                f.debug_tuple("AccessibilityLabel").field(label).finish()
            }
            Self::Configuration(configuration) => {
                f.debug_tuple("Configuration").field(configuration).finish()
            }
            Self::ImageProvider(provider) => f.debug_tuple("ImageProvider").field(provider).finish(),
            Self::TextProvider(provider) => f.debug_tuple("TextProvider").field(provider).finish(),
            Self::FontProvider(provider) => f.debug_tuple("FontProvider").field(provider).finish(),
            Self::ValueProvider { keypath, provider } => f
                .debug_struct("ValueProvider")
                .field("keypath", keypath)
                .field("provider", provider)
                .finish(),
        }
    }
}
