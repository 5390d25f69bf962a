// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The declarative, value-typed description of an animation view.

use alloc::rc::Rc;
use alloc::string::String;

use smallvec::SmallVec;

use crate::erased::{Erase, EquatableBox};
use crate::keypath::AnimationKeypath;
use crate::op::{ConfigureOp, Mutation};
use crate::pipeline::ConfigurationPipeline;
use crate::player::{AnimationPlayer, BackgroundBehavior, PlayerConfiguration, PlayerSeed};
use crate::provider::{
    DefaultFontProvider, DefaultTextProvider, FontProvider, ImageProvider, TextProvider,
    ValueProvider,
};
use crate::sizing::SizingStrategy;

/// A cheap, immutable description of how a player should look.
///
/// Views are rebuilt on every evaluation of the host's view tree and carry no
/// player state. Every builder method consumes the view and returns a new
/// one; nothing touches a player until a
/// [`MeasurementContainer`](crate::MeasurementContainer) applies the view's
/// [`pipeline`](Self::pipeline).
///
/// Builders that set a collaborator (configuration and the image, text and
/// font providers) do two things: they record the value as a seed for player
/// creation, and they append an operation so later passes keep the player in
/// sync.
pub struct AnimationView<P: AnimationPlayer> {
    animation: Option<Rc<P::Animation>>,
    image_provider: Option<EquatableBox<dyn ImageProvider>>,
    text_provider: EquatableBox<dyn TextProvider>,
    font_provider: EquatableBox<dyn FontProvider>,
    configuration: PlayerConfiguration,
    sizing: SizingStrategy,
    operations: SmallVec<[ConfigureOp<P>; 4]>,
}

impl<P: AnimationPlayer> AnimationView<P> {
    /// Describes a view of `animation`, or of nothing yet.
    ///
    /// The asset is compared by identity: passing a different [`Rc`] with
    /// equal contents reloads the player.
    #[must_use]
    pub fn new(animation: Option<Rc<P::Animation>>) -> Self {
        Self {
            animation,
            image_provider: None,
            text_provider: EquatableBox::new(DefaultTextProvider),
            font_provider: EquatableBox::new(DefaultFontProvider),
            configuration: PlayerConfiguration::default(),
            sizing: SizingStrategy::default(),
            operations: SmallVec::new(),
        }
    }

    /// Describes a view with no animation.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Appends a closure run against the player on every pass.
    ///
    /// The closure must be idempotent.
    #[must_use]
    pub fn with_mutation(self, mutation: impl Fn(&mut P) + 'static) -> Self {
        self.with_operation(ConfigureOp::Mutation(Mutation::new(mutation)))
    }

    /// Appends a labeled closure; see [`with_mutation`](Self::with_mutation).
    #[must_use]
    pub fn with_labeled_mutation(
        self,
        label: &'static str,
        mutation: impl Fn(&mut P) + 'static,
    ) -> Self {
        self.with_operation(ConfigureOp::Mutation(
            Mutation::new(mutation).with_label(label),
        ))
    }

    /// Appends an arbitrary operation.
    #[must_use]
    pub fn with_operation(mut self, op: ConfigureOp<P>) -> Self {
        self.operations.push(op);
        self
    }

    /// Sizes the view to the parent's offer and scales content to fit it.
    #[must_use]
    pub fn resizable(mut self) -> Self {
        self.sizing = SizingStrategy::Proposed;
        self
    }

    /// Starts looping playback unless the player is already playing.
    #[must_use]
    pub fn looping(self) -> Self {
        self.with_operation(ConfigureOp::Looping)
    }

    /// Sets the behavior when the host application is backgrounded.
    #[must_use]
    pub fn background_behavior(self, behavior: BackgroundBehavior) -> Self {
        self.with_operation(ConfigureOp::BackgroundBehavior(behavior))
    }

    /// Sets the accessibility label. `None` hides the player from assistive
    /// technology.
    #[must_use]
    pub fn accessibility_label(self, label: Option<&str>) -> Self {
        self.with_operation(ConfigureOp::AccessibilityLabel(label.map(String::from)))
    }

    /// Sets the player configuration.
    #[must_use]
    pub fn configuration(mut self, configuration: PlayerConfiguration) -> Self {
        self.configuration = configuration;
        self.with_operation(ConfigureOp::Configuration(configuration))
    }

    /// Installs an image provider.
    #[must_use]
    pub fn image_provider<T>(mut self, provider: T) -> Self
    where
        T: Erase<dyn ImageProvider> + PartialEq,
    {
        let provider = EquatableBox::new(provider);
        self.image_provider = Some(provider.clone());
        self.with_operation(ConfigureOp::ImageProvider(provider))
    }

    /// Installs a text provider.
    #[must_use]
    pub fn text_provider<T>(mut self, provider: T) -> Self
    where
        T: Erase<dyn TextProvider> + PartialEq,
    {
        let provider = EquatableBox::new(provider);
        self.text_provider = provider.clone();
        self.with_operation(ConfigureOp::TextProvider(provider))
    }

    /// Installs a font provider.
    #[must_use]
    pub fn font_provider<T>(mut self, provider: T) -> Self
    where
        T: Erase<dyn FontProvider> + PartialEq,
    {
        let provider = EquatableBox::new(provider);
        self.font_provider = provider.clone();
        self.with_operation(ConfigureOp::FontProvider(provider))
    }

    /// Installs a value provider for every property matching `keypath`.
    ///
    /// When the pipeline runs with an animation loaded, a keypath that
    /// matches nothing, or matches properties of another kind, fails the
    /// pass.
    #[must_use]
    pub fn value_provider<T>(self, provider: T, keypath: AnimationKeypath) -> Self
    where
        T: Erase<dyn ValueProvider> + PartialEq,
    {
        self.with_operation(ConfigureOp::ValueProvider {
            keypath,
            provider: EquatableBox::new(provider),
        })
    }

    /// Returns the declared operations, without the leading animation
    /// assignment.
    #[must_use]
    pub fn operations(&self) -> &[ConfigureOp<P>] {
        &self.operations
    }

    /// Returns the sizing strategy.
    #[must_use]
    pub fn sizing(&self) -> SizingStrategy {
        self.sizing
    }

    /// Returns the animation asset.
    #[must_use]
    pub fn animation(&self) -> Option<&Rc<P::Animation>> {
        self.animation.as_ref()
    }

    /// Builds the pipeline applied on every pass: the animation assignment,
    /// then every declared operation in order.
    #[must_use]
    pub fn pipeline(&self) -> ConfigurationPipeline<P> {
        core::iter::once(ConfigureOp::Animation(self.animation.clone()))
            .chain(self.operations.iter().cloned())
            .collect()
    }

    /// Returns the values a player is created with.
    #[must_use]
    pub fn seed(&self) -> PlayerSeed<'_, P::Animation> {
        PlayerSeed {
            animation: self.animation.as_ref(),
            image_provider: self.image_provider.as_ref(),
            text_provider: &self.text_provider,
            font_provider: &self.font_provider,
            configuration: self.configuration,
        }
    }
}

impl<P: AnimationPlayer> Clone for AnimationView<P> {
    fn clone(&self) -> Self {
        Self {
            animation: self.animation.clone(),
            image_provider: self.image_provider.clone(),
            text_provider: self.text_provider.clone(),
            font_provider: self.font_provider.clone(),
            configuration: self.configuration,
            sizing: self.sizing,
            operations: self.operations.clone(),
        }
    }
}

impl<P: AnimationPlayer> core::fmt::Debug for AnimationView<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnimationView")
            .field("has_animation", &self.animation.is_some())
            .field("sizing", &self.sizing)
            .field("configuration", &self.configuration)
            .field("operations", &self.operations)
            .finish_non_exhaustive()
    }
}
