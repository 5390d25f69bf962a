// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_reconcile`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::rc::Rc;
use std::sync::Once;

use kurbo::{Affine, Size};
use understory_reconcile::{
    AnimationKeypath, AnimationPlayer, AnimationView, BackgroundBehavior, Color,
    ColorValueProvider, DictionaryTextProvider, EquatableBox, FilepathImageProvider, FontProvider,
    ImageProvider, LayoutParticipant, LoopMode, MeasurementContainer, PlayerConfiguration,
    PlayerSeed, ProposedSize, TextProvider, ValueKind, ValueProvider,
};

struct Player {
    animation: Option<Rc<Size>>,
    image: Option<EquatableBox<dyn ImageProvider>>,
    text: EquatableBox<dyn TextProvider>,
    font: EquatableBox<dyn FontProvider>,
    values: Vec<(AnimationKeypath, EquatableBox<dyn ValueProvider>)>,
    configuration: PlayerConfiguration,
    playing: bool,
    background: BackgroundBehavior,
    label: Option<String>,
    transform: Affine,
}

impl Player {
    fn create(seed: PlayerSeed<'_, Size>) -> Self {
        Self {
            animation: None,
            image: seed.image_provider.cloned(),
            text: seed.text_provider.clone(),
            font: seed.font_provider.clone(),
            values: Vec::new(),
            configuration: seed.configuration,
            playing: false,
            background: BackgroundBehavior::default(),
            label: None,
            transform: Affine::IDENTITY,
        }
    }
}

impl AnimationPlayer for Player {
    type Animation = Size;

    fn animation(&self) -> Option<&Rc<Size>> {
        self.animation.as_ref()
    }

    fn set_animation(&mut self, animation: Option<Rc<Size>>) {
        self.animation = animation;
    }

    fn image_provider(&self) -> Option<&EquatableBox<dyn ImageProvider>> {
        self.image.as_ref()
    }

    fn set_image_provider(&mut self, provider: EquatableBox<dyn ImageProvider>) {
        self.image = Some(provider);
    }

    fn text_provider(&self) -> &EquatableBox<dyn TextProvider> {
        &self.text
    }

    fn set_text_provider(&mut self, provider: EquatableBox<dyn TextProvider>) {
        self.text = provider;
    }

    fn font_provider(&self) -> &EquatableBox<dyn FontProvider> {
        &self.font
    }

    fn set_font_provider(&mut self, provider: EquatableBox<dyn FontProvider>) {
        self.font = provider;
    }

    fn value_provider(&self, keypath: &AnimationKeypath) -> Option<&EquatableBox<dyn ValueProvider>> {
        self.values
            .iter()
            .find(|(key, _)| key == keypath)
            .map(|(_, provider)| provider)
    }

    fn set_value_provider(
        &mut self,
        keypath: AnimationKeypath,
        provider: EquatableBox<dyn ValueProvider>,
    ) {
        self.values.retain(|(key, _)| *key != keypath);
        self.values.push((keypath, provider));
    }

    fn keypath_kind(&self, keypath: &AnimationKeypath) -> Option<ValueKind> {
        keypath
            .property_key()
            .is_some_and(|key| key == "Color")
            .then_some(ValueKind::Color)
    }

    fn configuration(&self) -> &PlayerConfiguration {
        &self.configuration
    }

    fn set_configuration(&mut self, configuration: PlayerConfiguration) {
        self.configuration = configuration;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self, _from: f64, _to: f64, _loop_mode: LoopMode) {
        self.playing = true;
    }

    fn current_progress(&self) -> f64 {
        0.0
    }

    fn set_current_progress(&mut self, _progress: f64) {
        self.playing = false;
    }

    fn background_behavior(&self) -> BackgroundBehavior {
        self.background
    }

    fn set_background_behavior(&mut self, behavior: BackgroundBehavior) {
        self.background = behavior;
    }

    fn accessibility_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn set_accessibility_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    fn intrinsic_size(&self) -> Option<Size> {
        self.animation.as_deref().copied()
    }

    fn content_transform(&self) -> Affine {
        self.transform
    }

    fn set_content_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }
}

/// A description with `overrides` color value providers on top of the usual modifiers.
fn describe(asset: &Rc<Size>, overrides: usize) -> AnimationView<Player> {
    let mut view = AnimationView::new(Some(asset.clone()))
        .resizable()
        .looping()
        .background_behavior(BackgroundBehavior::Pause)
        .accessibility_label(Some("Loading"))
        .image_provider(FilepathImageProvider::new("images"))
        .text_provider(DictionaryTextProvider::new([("Title", "Hello")]));
    for layer in 0..overrides {
        view = view.value_provider(
            ColorValueProvider(Color::rgb(0.1, 0.2, 0.3)),
            AnimationKeypath::new(&format!("Layer{layer}.Fill.Color")),
        );
    }
    view
}

fn bench_reconcile(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: EquatableBox={} AnimationView={} MeasurementContainer={}",
            core::mem::size_of::<EquatableBox<dyn TextProvider>>(),
            core::mem::size_of::<AnimationView<Player>>(),
            core::mem::size_of::<MeasurementContainer<Player>>(),
        );
    });

    let asset = Rc::new(Size::new(200.0, 100.0));

    let mut group = c.benchmark_group("reconcile/update");

    for overrides in [0_usize, 8, 32] {
        group.bench_function(BenchmarkId::new("unchanged", overrides), |b| {
            let mut container = MeasurementContainer::mount(&describe(&asset, overrides), Player::create)
                .unwrap();
            b.iter_batched(
                || describe(&asset, overrides),
                |view| black_box(container.update(&view).unwrap()),
                BatchSize::SmallInput,
            )
        });
    }

    group.bench_function("asset_swap", |b| {
        let other = Rc::new(Size::new(200.0, 100.0));
        let mut container = MeasurementContainer::mount(&describe(&asset, 4), Player::create).unwrap();
        let views = [describe(&asset, 4), describe(&other, 4)];
        let mut flip = 0;
        b.iter(|| {
            flip ^= 1;
            black_box(container.update(&views[flip]).unwrap())
        })
    });

    group.finish();

    let mut group = c.benchmark_group("reconcile/equatable_box");

    let a: EquatableBox<dyn TextProvider> =
        EquatableBox::new(DictionaryTextProvider::new([("Title", "Hello"), ("Body", "World")]));
    let b_equal: EquatableBox<dyn TextProvider> =
        EquatableBox::new(DictionaryTextProvider::new([("Title", "Hello"), ("Body", "World")]));
    let other: EquatableBox<dyn TextProvider> =
        EquatableBox::new(understory_reconcile::DefaultTextProvider);

    group.bench_function("eq/same_type", |b| b.iter(|| black_box(a == b_equal)));
    group.bench_function("eq/different_type", |b| b.iter(|| black_box(a == other)));

    group.finish();

    let mut group = c.benchmark_group("reconcile/layout");

    group.bench_function("measure_commit", |b| {
        let mut container = MeasurementContainer::mount(&describe(&asset, 0), Player::create).unwrap();
        let offer = ProposedSize::new(Some(320.0), None);
        b.iter(|| {
            let size = container.measure(black_box(offer));
            container.commit(size);
            black_box(size)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
