// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator capabilities accepted by an animation player.
//!
//! A player pulls images, text, fonts and per-keypath value overrides from
//! pluggable providers. Providers are handed to the player inside an
//! [`EquatableBox`](crate::EquatableBox), so every concrete provider must also
//! implement [`PartialEq`].
//!
//! ## Contract
//!
//! A provider is treated as an immutable snapshot for the duration of a pass.
//! A provider whose answers change while its [`PartialEq`] keeps reporting
//! "equal" breaks reconciliation: the player is never told about the change.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::any::Any;

use hashbrown::HashMap;
use kurbo::{Point, Size};

use crate::erased::Erase;
use crate::keypath::AnimationKeypath;

/// Where the image for an image asset comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// A file path, resolved by the player's image loader.
    Path(String),
    /// Encoded image bytes (PNG, JPEG, ...).
    Encoded(Rc<[u8]>),
}

/// Supplies images for image assets referenced by an animation.
pub trait ImageProvider: Any {
    /// Returns the image for the asset with the given identifier, or `None`
    /// to leave the asset empty.
    fn image_for(&self, asset_id: &str) -> Option<ImageSource>;
}

/// Supplies replacement text for text layers.
pub trait TextProvider: Any {
    /// Returns replacement text for the layer at `keypath`, or `None` to keep
    /// `source_text`.
    fn text_for(&self, keypath: &AnimationKeypath, source_text: &str) -> Option<String>;
}

/// A font chosen by a [`FontProvider`].
#[derive(Clone, Debug, PartialEq)]
pub struct FontDescriptor {
    /// Font family name.
    pub family: String,
    /// Point size.
    pub size: f64,
}

/// Supplies fonts for text layers.
pub trait FontProvider: Any {
    /// Returns the font to use for `family` at `size`, or `None` to let the
    /// player fall back to system lookup.
    fn font_for(&self, family: &str, size: f64) -> Option<FontDescriptor>;
}

/// Kind of value an animated property holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// An RGBA color.
    Color,
    /// A single scalar, such as opacity or rotation.
    Scalar,
    /// A 2D point, such as position or anchor.
    Point,
    /// A 2D size or scale.
    Size,
}

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    /// Red component.
    pub red: f64,
    /// Green component.
    pub green: f64,
    /// Blue component.
    pub blue: f64,
    /// Alpha component.
    pub alpha: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Creates a color from RGBA components.
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }
}

/// A value produced by a [`ValueProvider`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// See [`ValueKind::Color`].
    Color(Color),
    /// See [`ValueKind::Scalar`].
    Scalar(f64),
    /// See [`ValueKind::Point`].
    Point(Point),
    /// See [`ValueKind::Size`].
    Size(Size),
}

impl PropertyValue {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Color(_) => ValueKind::Color,
            Self::Scalar(_) => ValueKind::Scalar,
            Self::Point(_) => ValueKind::Point,
            Self::Size(_) => ValueKind::Size,
        }
    }
}

/// Overrides the value of the properties matched by a keypath.
pub trait ValueProvider: Any {
    /// Kind of value this provider produces.
    ///
    /// Installing a provider on a keypath that resolves to a different kind
    /// is a configuration error.
    fn value_kind(&self) -> ValueKind;

    /// Returns `true` if the value at `frame` may differ from the value at
    /// the previously rendered frame.
    fn has_update(&self, frame: f64) -> bool;

    /// Returns the value at `frame`.
    fn value(&self, frame: f64) -> PropertyValue;
}

impl<T: ImageProvider> Erase<dyn ImageProvider> for T {
    fn erase(self: Rc<Self>) -> Rc<dyn ImageProvider> {
        self
    }
}

impl<T: TextProvider> Erase<dyn TextProvider> for T {
    fn erase(self: Rc<Self>) -> Rc<dyn TextProvider> {
        self
    }
}

impl<T: FontProvider> Erase<dyn FontProvider> for T {
    fn erase(self: Rc<Self>) -> Rc<dyn FontProvider> {
        self
    }
}

impl<T: ValueProvider> Erase<dyn ValueProvider> for T {
    fn erase(self: Rc<Self>) -> Rc<dyn ValueProvider> {
        self
    }
}

/// Resolves image assets to files inside a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilepathImageProvider {
    directory: String,
}

impl FilepathImageProvider {
    /// Creates a provider rooted at `directory`.
    #[must_use]
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn directory(&self) -> &str {
        &self.directory
    }
}

impl ImageProvider for FilepathImageProvider {
    fn image_for(&self, asset_id: &str) -> Option<ImageSource> {
        if asset_id.is_empty() {
            return None;
        }
        let directory = self.directory.trim_end_matches('/');
        Some(ImageSource::Path(format!("{directory}/{asset_id}")))
    }
}

/// Leaves all text as authored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultTextProvider;

impl TextProvider for DefaultTextProvider {
    fn text_for(&self, _keypath: &AnimationKeypath, _source_text: &str) -> Option<String> {
        None
    }
}

/// Replaces text by layer name or full keypath.
///
/// A lookup first tries the full dotted keypath, then its final key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DictionaryTextProvider {
    values: HashMap<String, String>,
}

impl DictionaryTextProvider {
    /// Creates a provider from `(key, text)` pairs.
    #[must_use]
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl TextProvider for DictionaryTextProvider {
    fn text_for(&self, keypath: &AnimationKeypath, _source_text: &str) -> Option<String> {
        self.values
            .get(&keypath.to_string())
            .or_else(|| keypath.property_key().and_then(|key| self.values.get(key)))
            .cloned()
    }
}

/// Leaves font lookup to the player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultFontProvider;

impl FontProvider for DefaultFontProvider {
    fn font_for(&self, _family: &str, _size: f64) -> Option<FontDescriptor> {
        None
    }
}

macro_rules! constant_value_provider {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $variant:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq)]
        pub struct $name(pub $ty);

        impl ValueProvider for $name {
            fn value_kind(&self) -> ValueKind {
                ValueKind::$variant
            }

            fn has_update(&self, _frame: f64) -> bool {
                false
            }

            fn value(&self, _frame: f64) -> PropertyValue {
                PropertyValue::$variant(self.0)
            }
        }
    };
}

constant_value_provider!(
    /// Overrides color properties with a constant color.
    ColorValueProvider,
    Color,
    Color
);
constant_value_provider!(
    /// Overrides scalar properties with a constant value.
    FloatValueProvider,
    f64,
    Scalar
);
constant_value_provider!(
    /// Overrides point properties with a constant point.
    PointValueProvider,
    Point,
    Point
);
constant_value_provider!(
    /// Overrides size properties with a constant size.
    SizeValueProvider,
    Size,
    Size
);
