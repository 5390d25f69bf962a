// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Taffy ↔ reconcile adapter.
//!
//! This crate plugs [`LayoutParticipant`]s (usually
//! [`MeasurementContainer`](understory_reconcile::MeasurementContainer)s) into
//! the [`taffy`] layout engine. Taffy owns layout; each participant only
//! answers measurement queries for its leaf and receives the final size.
//!
//! The two phases map onto Taffy as follows:
//!
//! - **Measure**: inside the closure passed to
//!   [`TaffyTree::compute_layout_with_measure`], call [`measure_participant`]
//!   for leaves that hold a participant. Taffy's known dimensions and
//!   available space are translated into a [`ProposedSize`].
//! - **Commit**: after layout, [`TaffyContainerMap::commit_layout`] reads
//!   each mapped node's final size and hands it to its participant.
//!
//! As with other Taffy adapters in this workspace, your `taffy` dependency
//! must enable at least one layout algorithm (for example `flexbox`) for
//! `Style` to participate in layout.
//!
//! ## Example
//!
//! ```rust
//! use hashbrown::HashMap;
//! use kurbo::Size;
//! use taffy::prelude::{AvailableSpace, Size as TaffySize, Style, TaffyTree};
//! use understory_reconcile::{LayoutParticipant, ProposedSize, SizingStrategy};
//! use understory_reconcile_taffy::{TaffyContainerMap, measure_participant};
//!
//! // A stand-in participant: fixed content, proposed sizing.
//! struct Leaf {
//!     committed: Option<Size>,
//! }
//!
//! impl LayoutParticipant for Leaf {
//!     fn measure(&self, offered: ProposedSize) -> Size {
//!         SizingStrategy::Proposed.measure(offered, Some(Size::new(100.0, 50.0)))
//!     }
//!
//!     fn commit(&mut self, size: Size) {
//!         self.committed = Some(size);
//!     }
//! }
//!
//! let mut taffy: TaffyTree<&'static str> = TaffyTree::new();
//! let root = taffy.new_leaf_with_context(Style::DEFAULT, "hero").unwrap();
//!
//! let mut containers = HashMap::new();
//! containers.insert("hero", Leaf { committed: None });
//! let mut map = TaffyContainerMap::new();
//! map.attach(root, "hero");
//!
//! taffy
//!     .compute_layout_with_measure(
//!         root,
//!         TaffySize {
//!             width: AvailableSpace::Definite(200.0),
//!             height: AvailableSpace::MaxContent,
//!         },
//!         |known, available, _node, key, _style| match key.and_then(|key| containers.get(&*key)) {
//!             Some(leaf) => measure_participant(leaf, known, available),
//!             None => TaffySize::ZERO,
//!         },
//!     )
//!     .unwrap();
//!
//! map.commit_layout(&taffy, &mut containers).unwrap();
//! assert_eq!(containers["hero"].committed, Some(Size::new(200.0, 100.0)));
//! ```

#![deny(unsafe_code)]

use core::hash::Hash;

use hashbrown::HashMap;

use taffy::{AvailableSpace, Layout, NodeId as TaffyNode, TaffyError, TaffyTree};
use understory_reconcile::{LayoutParticipant, ProposedSize};

/// Non-owning mapping from Taffy nodes to host container keys.
///
/// The containers themselves live wherever the host keeps them; this type
/// only records which Taffy leaf each one occupies.
#[derive(Debug)]
pub struct TaffyContainerMap<K> {
    map: HashMap<TaffyNode, K>,
}

impl<K> Default for TaffyContainerMap<K> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<K> TaffyContainerMap<K> {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a Taffy leaf with a container key, replacing any previous key.
    ///
    /// Returns the previous key for `taffy_node`, if any.
    pub fn attach(&mut self, taffy_node: TaffyNode, key: K) -> Option<K> {
        self.map.insert(taffy_node, key)
    }

    /// Forget a Taffy leaf, returning its key.
    ///
    /// It is safe to call this even if the node was never attached.
    pub fn detach(&mut self, taffy_node: TaffyNode) -> Option<K> {
        self.map.remove(&taffy_node)
    }

    /// Look up the container key for a Taffy node.
    #[must_use]
    pub fn key(&self, taffy_node: TaffyNode) -> Option<&K> {
        self.map.get(&taffy_node)
    }

    /// Look up the Taffy node for a container key.
    #[must_use]
    pub fn taffy_node(&self, key: &K) -> Option<TaffyNode>
    where
        K: PartialEq,
    {
        self.map
            .iter()
            .find_map(|(node, k)| (k == key).then_some(*node))
    }

    /// Returns the number of attached nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Commit the layout of every attached node to its participant.
    ///
    /// Assumes the caller has already run layout on the Taffy tree. Keys with
    /// no entry in `containers` are skipped.
    pub fn commit_layout<NodeContext, P>(
        &self,
        taffy: &TaffyTree<NodeContext>,
        containers: &mut HashMap<K, P>,
    ) -> Result<(), TaffyError>
    where
        K: Hash + Eq,
        P: LayoutParticipant,
    {
        self.commit_layout_with(taffy, |key, size| {
            if let Some(container) = containers.get_mut(key) {
                container.commit(size);
            }
        })
    }

    /// Advanced: commit layout through a custom callback.
    ///
    /// The callback receives each attached key with its node's final size, for
    /// hosts that store containers in something other than a map.
    pub fn commit_layout_with<NodeContext, F>(
        &self,
        taffy: &TaffyTree<NodeContext>,
        mut commit: F,
    ) -> Result<(), TaffyError>
    where
        F: FnMut(&K, kurbo::Size),
    {
        for (taffy_node, key) in &self.map {
            let layout = taffy.layout(*taffy_node)?;
            commit(key, layout_size(layout));
        }
        Ok(())
    }
}

/// Translate a Taffy measurement query into a [`ProposedSize`].
///
/// Known dimensions win over available space. Definite available space
/// becomes an offered dimension; min-content and max-content queries leave
/// the dimension unspecified so the participant reports its ideal.
///
/// ```rust
/// use taffy::prelude::{AvailableSpace, Size};
/// use understory_reconcile::ProposedSize;
/// use understory_reconcile_taffy::proposed_size;
///
/// let offer = proposed_size(
///     Size { width: None, height: Some(40.0) },
///     Size { width: AvailableSpace::Definite(300.0), height: AvailableSpace::Definite(90.0) },
/// );
/// assert_eq!(offer, ProposedSize::new(Some(300.0), Some(40.0)));
/// ```
#[must_use]
pub fn proposed_size(
    known_dimensions: taffy::Size<Option<f32>>,
    available_space: taffy::Size<AvailableSpace>,
) -> ProposedSize {
    let axis = |known: Option<f32>, available: AvailableSpace| {
        known
            .or(match available {
                AvailableSpace::Definite(value) => Some(value),
                AvailableSpace::MinContent | AvailableSpace::MaxContent => None,
            })
            .map(f64::from)
    };
    ProposedSize::new(
        axis(known_dimensions.width, available_space.width),
        axis(known_dimensions.height, available_space.height),
    )
}

/// Answer a Taffy measurement query with a participant's measurement.
///
/// Dimensions Taffy already knows are returned unchanged, so the participant
/// only decides the free ones.
#[must_use]
pub fn measure_participant<P>(
    participant: &P,
    known_dimensions: taffy::Size<Option<f32>>,
    available_space: taffy::Size<AvailableSpace>,
) -> taffy::Size<f32>
where
    P: LayoutParticipant + ?Sized,
{
    let measured = participant.measure(proposed_size(known_dimensions, available_space));
    taffy::Size {
        width: known_dimensions.width.unwrap_or(to_f32(measured.width)),
        height: known_dimensions.height.unwrap_or(to_f32(measured.height)),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Taffy lays out in f32; measured sizes are well within its range"
)]
fn to_f32(value: f64) -> f32 {
    value as f32
}

/// Convert a Taffy layout into the size committed to a participant.
fn layout_size(layout: &Layout) -> kurbo::Size {
    kurbo::Size::new(
        f64::from(layout.size.width),
        f64::from(layout.size.height),
    )
}
