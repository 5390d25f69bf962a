// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The retained animation player contract.
//!
//! [`AnimationPlayer`] is the fixed surface the reconciler drives. The player
//! itself (parsing, interpolation, rendering) lives elsewhere; this crate only
//! reads and writes the properties below.

use alloc::rc::Rc;
use alloc::string::String;

use kurbo::{Affine, Size};

use crate::erased::EquatableBox;
use crate::keypath::AnimationKeypath;
use crate::provider::{FontProvider, ImageProvider, TextProvider, ValueKind, ValueProvider};

/// Which renderer the player should use.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderingEngine {
    /// Let the player pick, preferring acceleration when the animation supports it.
    #[default]
    Automatic,
    /// Always render on the CPU.
    Software,
    /// Always render through the accelerated backend.
    Accelerated,
}

/// How the player decodes animation data it loads itself.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DecodingStrategy {
    /// Decode everything up front.
    #[default]
    Eager,
    /// Decode layers as they are first needed.
    Lazy,
}

/// Whether the player honors a reduced-motion preference.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReducedMotion {
    /// Play animations normally.
    #[default]
    Standard,
    /// Prefer a static or simplified rendition.
    Reduced,
}

/// Global player configuration.
///
/// Changing any field forces the player to rebuild its render state, so
/// writes are gated on full value equality.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlayerConfiguration {
    /// Renderer selection.
    pub rendering_engine: RenderingEngine,
    /// Decoding behavior.
    pub decoding: DecodingStrategy,
    /// Reduced-motion behavior.
    pub reduced_motion: ReducedMotion,
}

/// How playback repeats.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum LoopMode {
    /// Play once and stop on the last frame.
    #[default]
    PlayOnce,
    /// Loop forever.
    Loop,
    /// Play forward, then backward, forever.
    AutoReverse,
    /// Loop the given number of times.
    Repeat(f32),
    /// Play forward then backward the given number of times.
    RepeatBackwards(f32),
}

/// What happens to playback when the host application is backgrounded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackgroundBehavior {
    /// Stop and reset to the start.
    Stop,
    /// Pause at the current frame.
    Pause,
    /// Pause, then resume when returning to the foreground.
    #[default]
    PauseAndRestore,
    /// Jump to the end and stop.
    ForceFinish,
    /// Keep playing.
    ContinuePlaying,
}

/// Values the player is created with, taken from the first description.
///
/// Later descriptions never recreate the player; they only replay their
/// configuration pipeline against it.
pub struct PlayerSeed<'a, A: ?Sized> {
    /// The animation, if one is available yet.
    pub animation: Option<&'a Rc<A>>,
    /// Image provider, if any.
    pub image_provider: Option<&'a EquatableBox<dyn ImageProvider>>,
    /// Text provider.
    pub text_provider: &'a EquatableBox<dyn TextProvider>,
    /// Font provider.
    pub font_provider: &'a EquatableBox<dyn FontProvider>,
    /// Configuration.
    pub configuration: PlayerConfiguration,
}

impl<A: ?Sized> core::fmt::Debug for PlayerSeed<'_, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlayerSeed")
            .field("has_animation", &self.animation.is_some())
            .field("image_provider", &self.image_provider)
            .field("text_provider", &self.text_provider)
            .field("font_provider", &self.font_provider)
            .field("configuration", &self.configuration)
            .finish()
    }
}

/// A long-lived, stateful animation player.
///
/// Implementations own expensive render state. In particular,
/// [`set_animation`](Self::set_animation) and
/// [`set_configuration`](Self::set_configuration) are assumed to rebuild that
/// state on every call, even when the new value equals the old one. The
/// reconciler therefore reads the current value first and only writes when
/// it differs.
pub trait AnimationPlayer {
    /// The opaque animation asset. Compared by identity only.
    type Animation: ?Sized;

    /// Returns the currently loaded animation.
    fn animation(&self) -> Option<&Rc<Self::Animation>>;

    /// Loads an animation, rebuilding the render tree.
    fn set_animation(&mut self, animation: Option<Rc<Self::Animation>>);

    /// Returns the installed image provider.
    fn image_provider(&self) -> Option<&EquatableBox<dyn ImageProvider>>;

    /// Installs an image provider, reloading images.
    fn set_image_provider(&mut self, provider: EquatableBox<dyn ImageProvider>);

    /// Returns the installed text provider.
    fn text_provider(&self) -> &EquatableBox<dyn TextProvider>;

    /// Installs a text provider, re-laying out text layers.
    fn set_text_provider(&mut self, provider: EquatableBox<dyn TextProvider>);

    /// Returns the installed font provider.
    fn font_provider(&self) -> &EquatableBox<dyn FontProvider>;

    /// Installs a font provider, re-laying out text layers.
    fn set_font_provider(&mut self, provider: EquatableBox<dyn FontProvider>);

    /// Returns the value provider installed for exactly `keypath`.
    fn value_provider(&self, keypath: &AnimationKeypath) -> Option<&EquatableBox<dyn ValueProvider>>;

    /// Installs a value provider for `keypath`, replacing any previous one.
    fn set_value_provider(
        &mut self,
        keypath: AnimationKeypath,
        provider: EquatableBox<dyn ValueProvider>,
    );

    /// Resolves `keypath` against the loaded animation.
    ///
    /// Returns the kind of the matched properties, or `None` if nothing
    /// matches. Only meaningful while an animation is loaded.
    fn keypath_kind(&self, keypath: &AnimationKeypath) -> Option<ValueKind>;

    /// Returns the current configuration.
    fn configuration(&self) -> &PlayerConfiguration;

    /// Replaces the configuration, rebuilding render state.
    fn set_configuration(&mut self, configuration: PlayerConfiguration);

    /// Returns `true` while playback is running.
    fn is_playing(&self) -> bool;

    /// Starts playback between two progress values.
    fn play(&mut self, from_progress: f64, to_progress: f64, loop_mode: LoopMode);

    /// Returns the current playback progress in `0.0..=1.0`.
    fn current_progress(&self) -> f64;

    /// Jumps to a progress value, stopping playback.
    fn set_current_progress(&mut self, progress: f64);

    /// Returns the background behavior.
    fn background_behavior(&self) -> BackgroundBehavior;

    /// Sets the background behavior.
    fn set_background_behavior(&mut self, behavior: BackgroundBehavior);

    /// Returns the accessibility label, if the player is an accessibility element.
    fn accessibility_label(&self) -> Option<&str>;

    /// Sets the accessibility label. `None` removes the player from the
    /// accessibility tree.
    fn set_accessibility_label(&mut self, label: Option<String>);

    /// Natural size of the loaded animation, or `None` without content.
    fn intrinsic_size(&self) -> Option<Size>;

    /// Returns the transform from animation space into the player's bounds.
    fn content_transform(&self) -> Affine;

    /// Sets the transform from animation space into the player's bounds.
    fn set_content_transform(&mut self, transform: Affine);
}
