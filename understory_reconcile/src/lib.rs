// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Reconcile: declarative descriptions over a retained animation player.
//!
//! A host UI framework rebuilds its view tree constantly. An animation player
//! is the opposite: it is long-lived, stateful and expensive to reconfigure.
//! This crate bridges the two. A cheap [`AnimationView`] value describes what
//! the player should look like; a [`MeasurementContainer`] owns one player
//! and keeps it in sync with each new description, writing only what changed.
//!
//! ## Core Concepts
//!
//! - [`AnimationView`] is an immutable builder. Each modifier appends a
//!   [`ConfigureOp`] to an ordered list.
//! - [`ConfigurationPipeline`] replays that list, in declaration order, on
//!   every pass. There is no diffing between old and new lists.
//! - [`UpdateGuard`] makes replay cheap: each write first compares the
//!   declared value against the player's current one. The animation asset is
//!   compared by identity, everything else by value.
//! - [`EquatableBox`] holds providers of any concrete type behind a
//!   capability trait while keeping value equality, so a rebuilt provider
//!   equal to the installed one is not re-sent.
//! - [`SizingStrategy`] and the [`LayoutParticipant`] protocol negotiate size
//!   with the host layout system.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use kurbo::Size;
//! use understory_reconcile::{
//!     AnimationKeypath, AnimationPlayer, AnimationView, Color, ColorValueProvider,
//!     FilepathImageProvider, LayoutParticipant, MeasurementContainer, ProposedSize,
//! };
//! # use kurbo::Affine;
//! # use understory_reconcile::{
//! #     BackgroundBehavior, EquatableBox, FontProvider, ImageProvider, LoopMode,
//! #     PlayerConfiguration, TextProvider, ValueKind, ValueProvider,
//! # };
//! # #[derive(Default)]
//! # struct Player {
//! #     animation: Option<Rc<Size>>,
//! #     images: Option<EquatableBox<dyn ImageProvider>>,
//! #     text: Option<EquatableBox<dyn TextProvider>>,
//! #     fonts: Option<EquatableBox<dyn FontProvider>>,
//! #     values: Vec<(AnimationKeypath, EquatableBox<dyn ValueProvider>)>,
//! #     configuration: PlayerConfiguration,
//! #     playing: bool,
//! #     background: BackgroundBehavior,
//! #     label: Option<String>,
//! #     transform: Affine,
//! # }
//! # impl AnimationPlayer for Player {
//! #     type Animation = Size;
//! #     fn animation(&self) -> Option<&Rc<Size>> { self.animation.as_ref() }
//! #     fn set_animation(&mut self, a: Option<Rc<Size>>) { self.animation = a; }
//! #     fn image_provider(&self) -> Option<&EquatableBox<dyn ImageProvider>> { self.images.as_ref() }
//! #     fn set_image_provider(&mut self, p: EquatableBox<dyn ImageProvider>) { self.images = Some(p); }
//! #     fn text_provider(&self) -> &EquatableBox<dyn TextProvider> { self.text.as_ref().unwrap() }
//! #     fn set_text_provider(&mut self, p: EquatableBox<dyn TextProvider>) { self.text = Some(p); }
//! #     fn font_provider(&self) -> &EquatableBox<dyn FontProvider> { self.fonts.as_ref().unwrap() }
//! #     fn set_font_provider(&mut self, p: EquatableBox<dyn FontProvider>) { self.fonts = Some(p); }
//! #     fn value_provider(&self, k: &AnimationKeypath) -> Option<&EquatableBox<dyn ValueProvider>> {
//! #         self.values.iter().find(|(key, _)| key == k).map(|(_, p)| p)
//! #     }
//! #     fn set_value_provider(&mut self, k: AnimationKeypath, p: EquatableBox<dyn ValueProvider>) {
//! #         self.values.retain(|(key, _)| *key != k);
//! #         self.values.push((k, p));
//! #     }
//! #     fn keypath_kind(&self, k: &AnimationKeypath) -> Option<ValueKind> {
//! #         k.matches(&["Background", "Fill", "Color"]).then_some(ValueKind::Color)
//! #     }
//! #     fn configuration(&self) -> &PlayerConfiguration { &self.configuration }
//! #     fn set_configuration(&mut self, c: PlayerConfiguration) { self.configuration = c; }
//! #     fn is_playing(&self) -> bool { self.playing }
//! #     fn play(&mut self, _: f64, _: f64, _: LoopMode) { self.playing = true; }
//! #     fn current_progress(&self) -> f64 { 0.0 }
//! #     fn set_current_progress(&mut self, _: f64) { self.playing = false; }
//! #     fn background_behavior(&self) -> BackgroundBehavior { self.background }
//! #     fn set_background_behavior(&mut self, b: BackgroundBehavior) { self.background = b; }
//! #     fn accessibility_label(&self) -> Option<&str> { self.label.as_deref() }
//! #     fn set_accessibility_label(&mut self, l: Option<String>) { self.label = l; }
//! #     fn intrinsic_size(&self) -> Option<Size> { self.animation.as_deref().copied() }
//! #     fn content_transform(&self) -> Affine { self.transform }
//! #     fn set_content_transform(&mut self, t: Affine) { self.transform = t; }
//! # }
//! # fn create_player(seed: understory_reconcile::PlayerSeed<'_, Size>) -> Player {
//! #     Player {
//! #         text: Some(seed.text_provider.clone()),
//! #         fonts: Some(seed.font_provider.clone()),
//! #         ..Player::default()
//! #     }
//! # }
//! // The asset is loaded once and shared; identity decides whether it changed.
//! let asset = Rc::new(Size::new(200.0, 100.0));
//!
//! let describe = |asset: &Rc<Size>| {
//!     AnimationView::<Player>::new(Some(asset.clone()))
//!         .resizable()
//!         .looping()
//!         .image_provider(FilepathImageProvider::new("images"))
//!         .value_provider(
//!             ColorValueProvider(Color::rgb(1.0, 0.0, 0.0)),
//!             AnimationKeypath::new("**.Fill.Color"),
//!         )
//! };
//!
//! let mut container = MeasurementContainer::mount(&describe(&asset), create_player)?;
//! let size = container.measure(ProposedSize::new(Some(100.0), None));
//! assert_eq!(size, Size::new(100.0, 50.0));
//! container.commit(size);
//!
//! // A rebuilt but equal description writes nothing.
//! let report = container.update(&describe(&asset))?;
//! assert!(report.is_noop());
//! # Ok::<(), understory_reconcile::ReconcileError>(())
//! ```
//!
//! ## Failure Policy
//!
//! A value provider whose keypath does not resolve in the loaded animation,
//! or resolves to properties of another kind, fails the pass with a
//! [`ReconcileError`]. By default ([`MismatchHandling::DebugAssert`]) this
//! panics in debug builds and is returned (and logged with `tracing`) in
//! release builds.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Enable the `libm` feature for
//! builds without `std`.

#![no_std]

extern crate alloc;

mod container;
mod erased;
mod error;
mod guard;
mod keypath;
mod op;
mod pipeline;
mod player;
mod provider;
mod sizing;
mod view;

#[cfg(test)]
mod test_player;

pub use container::{LayoutParticipant, MeasurementContainer, MismatchHandling};
pub use erased::{Erase, EquatableBox};
pub use error::ReconcileError;
pub use guard::{Outcome, UpdateGuard};
pub use keypath::AnimationKeypath;
pub use op::{ConfigureOp, Mutation, OpKind};
pub use pipeline::{ApplyReport, ConfigurationPipeline};
pub use player::{
    AnimationPlayer, BackgroundBehavior, DecodingStrategy, LoopMode, PlayerConfiguration,
    PlayerSeed, ReducedMotion, RenderingEngine,
};
pub use provider::{
    Color, ColorValueProvider, DefaultFontProvider, DefaultTextProvider, DictionaryTextProvider,
    FilepathImageProvider, FloatValueProvider, FontDescriptor, FontProvider, ImageProvider,
    ImageSource, PointValueProvider, PropertyValue, SizeValueProvider, TextProvider, ValueKind,
    ValueProvider,
};
pub use sizing::{ProposedSize, SizingStrategy, fit_transform};
pub use view::AnimationView;
