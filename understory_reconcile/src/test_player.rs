// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory player that counts writes, for unit tests.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Affine, Size};

use crate::erased::EquatableBox;
use crate::keypath::AnimationKeypath;
use crate::player::{AnimationPlayer, BackgroundBehavior, LoopMode, PlayerConfiguration};
use crate::provider::{
    DefaultFontProvider, DefaultTextProvider, FontProvider, ImageProvider, TextProvider,
    ValueKind, ValueProvider,
};

#[derive(Debug)]
pub(crate) struct TestAnimation {
    pub(crate) name: &'static str,
    pub(crate) size: Size,
    properties: Vec<(Vec<String>, ValueKind)>,
}

impl TestAnimation {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            size: Size::new(100.0, 50.0),
            properties: Vec::new(),
        }
    }

    pub(crate) fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub(crate) fn with_property(mut self, path: &str, kind: ValueKind) -> Self {
        self.properties
            .push((path.split('.').map(String::from).collect(), kind));
        self
    }

    pub(crate) fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct WriteCounts {
    pub(crate) animation_sets: u32,
    pub(crate) image_provider_sets: u32,
    pub(crate) text_provider_sets: u32,
    pub(crate) font_provider_sets: u32,
    pub(crate) value_provider_sets: u32,
    pub(crate) configuration_sets: u32,
    pub(crate) transform_sets: u32,
    pub(crate) plays: u32,
}

#[derive(Debug)]
pub(crate) struct TestPlayer {
    animation: Option<Rc<TestAnimation>>,
    image_provider: Option<EquatableBox<dyn ImageProvider>>,
    text_provider: EquatableBox<dyn TextProvider>,
    font_provider: EquatableBox<dyn FontProvider>,
    value_providers: HashMap<AnimationKeypath, EquatableBox<dyn ValueProvider>>,
    configuration: PlayerConfiguration,
    playing: bool,
    progress: f64,
    pub(crate) loop_mode: Option<LoopMode>,
    background_behavior: BackgroundBehavior,
    accessibility_label: Option<String>,
    transform: Affine,
    pub(crate) counts: WriteCounts,
}

impl Default for TestPlayer {
    fn default() -> Self {
        Self {
            animation: None,
            image_provider: None,
            text_provider: EquatableBox::new(DefaultTextProvider),
            font_provider: EquatableBox::new(DefaultFontProvider),
            value_providers: HashMap::new(),
            configuration: PlayerConfiguration::default(),
            playing: false,
            progress: 0.0,
            loop_mode: None,
            background_behavior: BackgroundBehavior::default(),
            accessibility_label: None,
            transform: Affine::IDENTITY,
            counts: WriteCounts::default(),
        }
    }
}

impl AnimationPlayer for TestPlayer {
    type Animation = TestAnimation;

    fn animation(&self) -> Option<&Rc<TestAnimation>> {
        self.animation.as_ref()
    }

    fn set_animation(&mut self, animation: Option<Rc<TestAnimation>>) {
        self.counts.animation_sets += 1;
        self.animation = animation;
    }

    fn image_provider(&self) -> Option<&EquatableBox<dyn ImageProvider>> {
        self.image_provider.as_ref()
    }

    fn set_image_provider(&mut self, provider: EquatableBox<dyn ImageProvider>) {
        self.counts.image_provider_sets += 1;
        self.image_provider = Some(provider);
    }

    fn text_provider(&self) -> &EquatableBox<dyn TextProvider> {
        &self.text_provider
    }

    fn set_text_provider(&mut self, provider: EquatableBox<dyn TextProvider>) {
        self.counts.text_provider_sets += 1;
        self.text_provider = provider;
    }

    fn font_provider(&self) -> &EquatableBox<dyn FontProvider> {
        &self.font_provider
    }

    fn set_font_provider(&mut self, provider: EquatableBox<dyn FontProvider>) {
        self.counts.font_provider_sets += 1;
        self.font_provider = provider;
    }

    fn value_provider(&self, keypath: &AnimationKeypath) -> Option<&EquatableBox<dyn ValueProvider>> {
        self.value_providers.get(keypath)
    }

    fn set_value_provider(
        &mut self,
        keypath: AnimationKeypath,
        provider: EquatableBox<dyn ValueProvider>,
    ) {
        self.counts.value_provider_sets += 1;
        self.value_providers.insert(keypath, provider);
    }

    fn keypath_kind(&self, keypath: &AnimationKeypath) -> Option<ValueKind> {
        let animation = self.animation.as_ref()?;
        animation
            .properties
            .iter()
            .find(|(path, _)| keypath.matches(path))
            .map(|(_, kind)| *kind)
    }

    fn configuration(&self) -> &PlayerConfiguration {
        &self.configuration
    }

    fn set_configuration(&mut self, configuration: PlayerConfiguration) {
        self.counts.configuration_sets += 1;
        self.configuration = configuration;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self, from_progress: f64, _to_progress: f64, loop_mode: LoopMode) {
        self.counts.plays += 1;
        self.playing = true;
        self.progress = from_progress;
        self.loop_mode = Some(loop_mode);
    }

    fn current_progress(&self) -> f64 {
        self.progress
    }

    fn set_current_progress(&mut self, progress: f64) {
        self.playing = false;
        self.progress = progress;
    }

    fn background_behavior(&self) -> BackgroundBehavior {
        self.background_behavior
    }

    fn set_background_behavior(&mut self, behavior: BackgroundBehavior) {
        self.background_behavior = behavior;
    }

    fn accessibility_label(&self) -> Option<&str> {
        self.accessibility_label.as_deref()
    }

    fn set_accessibility_label(&mut self, label: Option<String>) {
        self.accessibility_label = label;
    }

    fn intrinsic_size(&self) -> Option<Size> {
        self.animation.as_ref().map(|animation| animation.size)
    }

    fn content_transform(&self) -> Affine {
        self.transform
    }

    fn set_content_transform(&mut self, transform: Affine) {
        self.counts.transform_sets += 1;
        self.transform = transform;
    }
}
