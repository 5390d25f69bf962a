// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sizing strategies and aspect-preserving fit.

use kurbo::{Affine, Size, Vec2};

/// How a container negotiates its size with its layout parent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SizingStrategy {
    /// Report the content's natural size, whatever the parent offers.
    #[default]
    Automatic,
    /// Take the size the parent offers and scale content to fit it,
    /// preserving aspect ratio.
    Proposed,
}

/// A size offered by a layout parent.
///
/// Either dimension may be unspecified, meaning "use your ideal value".
/// Non-finite dimensions are treated as unspecified and negative ones are
/// clamped to zero, so a measurement never reports an unusable size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ProposedSize {
    /// Offered width, if constrained.
    pub width: Option<f64>,
    /// Offered height, if constrained.
    pub height: Option<f64>,
}

impl ProposedSize {
    /// Both dimensions unspecified.
    pub const UNSPECIFIED: Self = Self {
        width: None,
        height: None,
    };

    /// Creates a proposal, normalizing each dimension.
    #[must_use]
    pub fn new(width: Option<f64>, height: Option<f64>) -> Self {
        Self {
            width: normalize(width),
            height: normalize(height),
        }
    }

    /// A fully specified proposal.
    #[must_use]
    pub fn exact(size: Size) -> Self {
        Self::new(Some(size.width), Some(size.height))
    }
}

impl From<Size> for ProposedSize {
    fn from(size: Size) -> Self {
        Self::exact(size)
    }
}

fn normalize(dimension: Option<f64>) -> Option<f64> {
    dimension
        .filter(|d| d.is_finite())
        .map(|d| d.max(0.0))
}

impl SizingStrategy {
    /// Computes the size reported to the parent.
    ///
    /// This is a pure function of its inputs: the same offer and the same
    /// intrinsic size always produce the same answer.
    ///
    /// - [`Automatic`](Self::Automatic): the intrinsic size, or zero without content.
    /// - [`Proposed`](Self::Proposed): specified dimensions verbatim. A single
    ///   unspecified dimension follows the content's aspect ratio; with both
    ///   unspecified the intrinsic size is used. Without content, unspecified
    ///   dimensions are zero.
    ///
    /// ```rust
    /// use kurbo::Size;
    /// use understory_reconcile::{ProposedSize, SizingStrategy};
    ///
    /// let intrinsic = Some(Size::new(200.0, 100.0));
    /// let offer = ProposedSize::new(Some(50.0), None);
    ///
    /// assert_eq!(SizingStrategy::Automatic.measure(offer, intrinsic), Size::new(200.0, 100.0));
    /// assert_eq!(SizingStrategy::Proposed.measure(offer, intrinsic), Size::new(50.0, 25.0));
    /// ```
    #[must_use]
    pub fn measure(self, offered: ProposedSize, intrinsic: Option<Size>) -> Size {
        let offered = ProposedSize::new(offered.width, offered.height);
        match self {
            Self::Automatic => intrinsic.unwrap_or(Size::ZERO),
            Self::Proposed => {
                let content = intrinsic.filter(|s| s.width > 0.0 && s.height > 0.0);
                match (offered.width, offered.height, content) {
                    (Some(width), Some(height), _) => Size::new(width, height),
                    (Some(width), None, Some(content)) => {
                        Size::new(width, width * content.height / content.width)
                    }
                    (None, Some(height), Some(content)) => {
                        Size::new(height * content.width / content.height, height)
                    }
                    (None, None, Some(content)) => content,
                    (width, height, None) => {
                        Size::new(width.unwrap_or(0.0), height.unwrap_or(0.0))
                    }
                }
            }
        }
    }

    /// Computes the content transform for a committed size.
    ///
    /// Returns `None` when there is no content to place yet.
    ///
    /// - [`Automatic`](Self::Automatic): content at its natural scale,
    ///   centered in `bounds`.
    /// - [`Proposed`](Self::Proposed): [`fit_transform`].
    #[must_use]
    pub fn content_transform(self, bounds: Size, intrinsic: Option<Size>) -> Option<Affine> {
        let content = intrinsic?;
        Some(match self {
            Self::Automatic => center_transform(content, bounds, 1.0),
            Self::Proposed => fit_transform(content, bounds),
        })
    }
}

/// Scales `content` uniformly to fit inside `bounds` and centers the slack.
///
/// The content's limiting dimension exactly matches the corresponding bounds
/// dimension. Degenerate content or bounds produce the identity transform.
///
/// ```rust
/// use kurbo::{Point, Size};
/// use understory_reconcile::fit_transform;
///
/// // 100x50 content in a 200x200 box: scale 2, letterboxed vertically.
/// let t = fit_transform(Size::new(100.0, 50.0), Size::new(200.0, 200.0));
/// assert_eq!(t * Point::new(0.0, 0.0), Point::new(0.0, 50.0));
/// assert_eq!(t * Point::new(100.0, 50.0), Point::new(200.0, 150.0));
/// ```
#[must_use]
pub fn fit_transform(content: Size, bounds: Size) -> Affine {
    if content.width <= 0.0 || content.height <= 0.0 {
        return Affine::IDENTITY;
    }
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Affine::IDENTITY;
    }
    let sx = bounds.width / content.width;
    let sy = bounds.height / content.height;
    center_transform(content, bounds, sx.min(sy))
}

fn center_transform(content: Size, bounds: Size, scale: f64) -> Affine {
    let offset = Vec2::new(
        (bounds.width - content.width * scale) * 0.5,
        (bounds.height - content.height * scale) * 0.5,
    );
    Affine::translate(offset) * Affine::scale(scale)
}
