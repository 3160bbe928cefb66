//! Typed indices into the document's entity arrays.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::ser::{Error as _, Serialize, Serializer};

/// Zero-based handle into one entity category of a [`JsonRoot`](super::JsonRoot).
///
/// An `Index<Node>` cannot be passed where an `Index<Accessor>` is expected.
/// [`Index::UNSET`] stands for "no reference"; fields holding it are omitted
/// when the document is written, and serializing it directly is an error.
pub struct Index<T> {
    value: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> Index<T> {
    /// Sentinel for "no reference".
    pub const UNSET: Self = Self {
        value: u32::MAX,
        marker: PhantomData,
    };

    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self {
            value,
            marker: PhantomData,
        }
    }

    /// Build an index from a `Vec` position.
    ///
    /// # Panics
    /// Panics if `position` does not fit below the sentinel.
    #[must_use]
    pub fn from_position(position: usize) -> Self {
        let value = u32::try_from(position)
            .ok()
            .filter(|&v| v != u32::MAX)
            .unwrap_or_else(|| panic!("entity count overflowed the index range: {position}"));
        Self::new(value)
    }

    #[must_use]
    pub const fn is_set(self) -> bool {
        self.value != u32::MAX
    }

    #[must_use]
    pub const fn is_unset(self) -> bool {
        self.value == u32::MAX
    }

    /// The array position, or `None` if unset.
    #[must_use]
    pub const fn position(self) -> Option<usize> {
        if self.is_set() {
            Some(self.value as usize)
        } else {
            None
        }
    }

    /// The raw integer value (`u32::MAX` when unset).
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.value
    }

    /// `self` if set, otherwise `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        if self.is_set() { self } else { other }
    }

    /// Serde helper for `skip_serializing_if`.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(crate) fn is_unset_ref(index: &Self) -> bool {
        index.is_unset()
    }
}

impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> Default for Index<T> {
    fn default() -> Self {
        Self::UNSET
    }
}

impl<T> PartialEq for Index<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Index<T> {}

impl<T> PartialOrd for Index<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Index<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Index<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = short_type_name::<T>();
        if self.is_set() {
            write!(f, "Index<{name}>({})", self.value)
        } else {
            write!(f, "Index<{name}>(unset)")
        }
    }
}

impl<T> Serialize for Index<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_unset() {
            return Err(S::Error::custom(format!(
                "unset {} index cannot be written",
                short_type_name::<T>()
            )));
        }
        serializer.serialize_u32(self.value)
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
