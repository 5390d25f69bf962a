// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased, equality-preserving collaborator storage.
//!
//! This module provides [`EquatableBox`] for holding collaborators of any
//! concrete type behind a capability trait object, while still being able to
//! ask "is this the same collaborator as last pass?".

use alloc::rc::Rc;
use core::any::{Any, TypeId};
use core::fmt;
use core::ops::Deref;

/// Coercion from a concrete collaborator into the capability trait object `C`.
///
/// Every capability in this crate provides a blanket implementation, so
/// callers never implement this by hand. It exists because generic code
/// cannot coerce `Rc<T>` into `Rc<dyn Capability>` on its own.
pub trait Erase<C: ?Sized>: Any {
    /// Converts a shared concrete value into the capability trait object.
    fn erase(self: Rc<Self>) -> Rc<C>;
}

/// A collaborator boxed behind capability `C`, comparable by value.
///
/// Two boxes are equal only if they hold the same concrete type and that
/// type's [`PartialEq`] says the values are equal. Boxes holding different
/// concrete types are never equal, even if the values look alike.
///
/// Construction requires `T: PartialEq`, so a collaborator without value
/// equality is rejected at compile time.
///
/// # Example
///
/// ```rust
/// use understory_reconcile::{DictionaryTextProvider, DefaultTextProvider, EquatableBox, TextProvider};
///
/// let a: EquatableBox<dyn TextProvider> =
///     EquatableBox::new(DictionaryTextProvider::new([("title", "Hello")]));
/// let b: EquatableBox<dyn TextProvider> =
///     EquatableBox::new(DictionaryTextProvider::new([("title", "Hello")]));
/// let c: EquatableBox<dyn TextProvider> = EquatableBox::new(DefaultTextProvider);
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert!(a.is::<DictionaryTextProvider>());
/// ```
pub struct EquatableBox<C: ?Sized> {
    value: Rc<C>,
    any: Rc<dyn Any>,
    type_id: TypeId,
    type_name: &'static str,
    eq: fn(&dyn Any, &dyn Any) -> bool,
}

impl<C: ?Sized> EquatableBox<C> {
    /// Boxes a concrete collaborator.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Erase<C> + PartialEq,
    {
        let concrete = Rc::new(value);
        let any: Rc<dyn Any> = concrete.clone();
        Self {
            value: <T as Erase<C>>::erase(concrete),
            any,
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            eq: eq_erased::<T>,
        }
    }

    /// Returns the [`TypeId`] of the concrete collaborator.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name of the concrete collaborator, for diagnostics.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the concrete collaborator is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Attempts to downcast to the concrete collaborator type.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.any.downcast_ref()
    }

    /// Returns `true` if both boxes share the same allocation.
    ///
    /// This is identity, not equality; a fresh box around an equal value is
    /// not identical.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.any, &other.any)
    }

    /// Returns the shared capability object.
    #[must_use]
    pub fn as_rc(&self) -> &Rc<C> {
        &self.value
    }
}

fn eq_erased<T: PartialEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

impl<C: ?Sized> PartialEq for EquatableBox<C> {
    fn eq(&self, other: &Self) -> bool {
        if self.type_id != other.type_id {
            return false;
        }
        (self.eq)(&*self.any, &*other.any)
    }
}

impl<C: ?Sized> Clone for EquatableBox<C> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            any: self.any.clone(),
            type_id: self.type_id,
            type_name: self.type_name,
            eq: self.eq,
        }
    }
}

impl<C: ?Sized> Deref for EquatableBox<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.value
    }
}

impl<C: ?Sized> fmt::Debug for EquatableBox<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EquatableBox")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    trait Named: Any {
        fn name(&self) -> String;
    }

    impl<T: Named> Erase<dyn Named> for T {
        fn erase(self: Rc<Self>) -> Rc<dyn Named> {
            self
        }
    }

    #[derive(PartialEq)]
    struct Meters(u32);

    #[derive(PartialEq)]
    struct Feet(u32);

    #[derive(PartialEq)]
    struct Float(f64);

    impl Named for Meters {
        fn name(&self) -> String {
            format!("{}m", self.0)
        }
    }

    impl Named for Feet {
        fn name(&self) -> String {
            format!("{}m", self.0)
        }
    }

    impl Named for Float {
        fn name(&self) -> String {
            format!("{}", self.0)
        }
    }

    #[test]
    fn equal_values_of_same_type_are_equal() {
        let a: EquatableBox<dyn Named> = EquatableBox::new(Meters(3));
        let b: EquatableBox<dyn Named> = EquatableBox::new(Meters(3));
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b), "separate boxes are not identical");
    }

    #[test]
    fn different_values_of_same_type_are_unequal() {
        let a: EquatableBox<dyn Named> = EquatableBox::new(Meters(3));
        let b: EquatableBox<dyn Named> = EquatableBox::new(Meters(4));
        assert_ne!(a, b);
    }

    #[test]
    fn different_types_are_never_equal() {
        // Same payload and the same rendered name, but unrelated types.
        let a: EquatableBox<dyn Named> = EquatableBox::new(Meters(3));
        let b: EquatableBox<dyn Named> = EquatableBox::new(Feet(3));
        assert_eq!(a.name(), b.name());
        assert_ne!(a, b);
        assert_ne!(b, a);
    }

    #[test]
    fn equality_is_delegated_not_shortcut() {
        // NaN is not equal to itself, even through the same allocation.
        let a: EquatableBox<dyn Named> = EquatableBox::new(Float(f64::NAN));
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn downcast_and_deref() {
        let a: EquatableBox<dyn Named> = EquatableBox::new(Meters(7));
        assert!(a.is::<Meters>());
        assert!(!a.is::<Feet>());
        assert_eq!(a.downcast_ref::<Meters>().map(|m| m.0), Some(7));
        assert!(a.downcast_ref::<Feet>().is_none());
        assert_eq!(a.name(), "7m");
        assert_eq!(a.type_id(), TypeId::of::<Meters>());
    }

    #[test]
    fn debug_names_the_concrete_type() {
        let a: EquatableBox<dyn Named> = EquatableBox::new(Meters(1));
        let debug = format!("{:?}", a);
        assert!(debug.contains("EquatableBox"));
        assert!(debug.contains("Meters"));
    }
}
