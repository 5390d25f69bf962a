// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dotted key paths addressing properties inside an animation.

use alloc::string::{String, ToString};
use core::fmt;
use smallvec::SmallVec;

/// Inline capacity for key segments; most paths are `Layer.Group.Shape.Property`.
const INLINE_KEYS: usize = 4;

/// A key path into an animation's property hierarchy.
///
/// Key paths are written as dot-separated keys, for example
/// `"Hero.Body.Fill 1.Color"`. Two wildcards are understood by
/// [`AnimationKeypath::matches`]:
///
/// - `*` matches exactly one key.
/// - `**` matches zero or more keys.
///
/// ```rust
/// use understory_reconcile::AnimationKeypath;
///
/// let keypath = AnimationKeypath::new("**.Fill 1.Color");
/// assert!(keypath.matches(&["Hero", "Body", "Fill 1", "Color"]));
/// assert!(keypath.matches(&["Fill 1", "Color"]));
/// assert!(!keypath.matches(&["Hero", "Stroke 1", "Color"]));
/// assert_eq!(keypath.to_string(), "**.Fill 1.Color");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationKeypath {
    keys: SmallVec<[String; INLINE_KEYS]>,
}

impl AnimationKeypath {
    /// Wildcard matching exactly one key.
    pub const ANY_KEY: &'static str = "*";
    /// Wildcard matching zero or more keys.
    pub const ANY_DEPTH: &'static str = "**";

    /// Parses a dot-separated key path. Empty segments are dropped.
    #[must_use]
    pub fn new(keypath: &str) -> Self {
        Self::from_keys(keypath.split('.').filter(|key| !key.is_empty()))
    }

    /// Builds a key path from individual keys.
    ///
    /// Consecutive `**` keys are collapsed into one.
    #[must_use]
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collapsed = SmallVec::<[String; INLINE_KEYS]>::new();
        for key in keys {
            let key = key.as_ref();
            let repeated_depth = key == Self::ANY_DEPTH
                && collapsed.last().is_some_and(|last| last == Self::ANY_DEPTH);
            if repeated_depth {
                continue;
            }
            collapsed.push(key.to_string());
        }
        Self { keys: collapsed }
    }

    /// Returns the individual keys.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the final key, usually the property name.
    #[must_use]
    pub fn property_key(&self) -> Option<&str> {
        self.keys.last().map(String::as_str)
    }

    /// Returns `true` if the key path contains a wildcard.
    #[must_use]
    pub fn has_wildcards(&self) -> bool {
        self.keys
            .iter()
            .any(|key| key == Self::ANY_KEY || key == Self::ANY_DEPTH)
    }

    /// Returns `true` if this key path (possibly with wildcards) matches the
    /// concrete property path `path`.
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        match_keys(&self.keys, path)
    }
}

/// Glob match over keys, where `**` behaves like `*` in a filename glob and
/// `*` like `?`.
///
/// Only the most recent `**` is kept as a backtrack point, so a match costs
/// at most `pattern.len() * path.len()` steps.
fn match_keys<S: AsRef<str>>(pattern: &[String], path: &[S]) -> bool {
    let (mut p, mut k) = (0, 0);
    // (index of the last `**`, path keys it has absorbed so far)
    let mut backtrack: Option<(usize, usize)> = None;
    while k < path.len() {
        match pattern.get(p).map(String::as_str) {
            Some(AnimationKeypath::ANY_DEPTH) => {
                backtrack = Some((p, k));
                p += 1;
            }
            Some(key) if key == AnimationKeypath::ANY_KEY || key == path[k].as_ref() => {
                p += 1;
                k += 1;
            }
            _ => {
                let Some((star, start)) = backtrack else {
                    return false;
                };
                backtrack = Some((star, start + 1));
                p = star + 1;
                k = start + 1;
            }
        }
    }
    pattern[p..].iter().all(|key| key == AnimationKeypath::ANY_DEPTH)
}

impl fmt::Debug for AnimationKeypath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnimationKeypath")
            .field(&format_args!("{self}"))
            .finish()
    }
}

impl fmt::Display for AnimationKeypath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(key)?;
        }
        Ok(())
    }
}

impl From<&str> for AnimationKeypath {
    fn from(keypath: &str) -> Self {
        Self::new(keypath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn parses_and_displays() {
        let keypath = AnimationKeypath::new("Layer.Group.Color");
        assert_eq!(keypath.keys(), &["Layer", "Group", "Color"]);
        assert_eq!(keypath.property_key(), Some("Color"));
        assert_eq!(format!("{keypath}"), "Layer.Group.Color");
        assert!(!keypath.has_wildcards());
    }

    #[test]
    fn empty_segments_are_dropped() {
        let keypath = AnimationKeypath::new(".Layer..Color.");
        assert_eq!(keypath, AnimationKeypath::from_keys(["Layer", "Color"]));
    }

    #[test]
    fn exact_match() {
        let keypath = AnimationKeypath::new("Layer.Color");
        assert!(keypath.matches(&["Layer", "Color"]));
        assert!(!keypath.matches(&["Layer"]));
        assert!(!keypath.matches(&["Layer", "Color", "Extra"]));
    }

    #[test]
    fn single_wildcard_matches_exactly_one_key() {
        let keypath = AnimationKeypath::new("Layer.*.Color");
        assert!(keypath.has_wildcards());
        assert!(keypath.matches(&["Layer", "Group", "Color"]));
        assert!(!keypath.matches(&["Layer", "Color"]));
        assert!(!keypath.matches(&["Layer", "A", "B", "Color"]));
    }

    #[test]
    fn double_wildcard_matches_any_depth() {
        let keypath = AnimationKeypath::new("Layer.**.Color");
        assert!(keypath.matches(&["Layer", "Color"]));
        assert!(keypath.matches(&["Layer", "A", "B", "Color"]));
        assert!(!keypath.matches(&["Other", "Color"]));

        let everything = AnimationKeypath::new("**");
        assert!(everything.matches::<&str>(&[]));
        assert!(everything.matches(&["a", "b"]));
    }

    #[test]
    fn consecutive_double_wildcards_collapse() {
        assert_eq!(
            AnimationKeypath::new("Layer.**.**.Color"),
            AnimationKeypath::new("Layer.**.Color")
        );
        assert_eq!(AnimationKeypath::new("**.**").keys(), &["**"]);
    }

    #[test]
    fn many_double_wildcards_match_in_polynomial_time() {
        let keypath = AnimationKeypath::new("**.A.**.A.**.A.**.A.**.A.**.A.**.Z");
        let long = ["A"; 60];
        assert!(!keypath.matches(&long));

        let mut hit = long.to_vec();
        hit.push("Z");
        assert!(keypath.matches(&hit));
        assert!(!keypath.matches(&["A", "A", "A", "A", "A", "Z"]));
    }

    #[test]
    fn double_wildcard_backtracks_past_partial_matches() {
        let keypath = AnimationKeypath::new("**.Fill.Color");
        assert!(keypath.matches(&["Fill", "Group", "Fill", "Color"]));
        assert!(!keypath.matches(&["Fill", "Color", "Extra"]));
        let mixed = AnimationKeypath::new("Layer.**.*.Color");
        assert!(mixed.matches(&["Layer", "Group", "Color"]));
        assert!(mixed.matches(&["Layer", "A", "B", "Color"]));
        assert!(!mixed.matches(&["Layer", "Color"]));
    }

    #[test]
    fn debug_uses_dotted_form() {
        let keypath = AnimationKeypath::new("a.b");
        assert_eq!(format!("{keypath:?}"), "AnimationKeypath(a.b)");
    }
}
