//! Vector: owned, contiguous, growable buffer.
//!
//! Storage is a single `realloc`-grown allocation. Growth on push is
//! `cap = (cap + 1) * 2`; `append` grows by one and a half times the
//! appended length. Removal is either `pop` or the O(1) `swap_remove`
//! the dictionary relies on for its dense entry store.
//!
//! Allocation failure is fatal in the infallible API (`push`,
//! `with_capacity`, `append`); the `try_*` methods report it as
//! [`AllocError`] instead.

use crate::error::AllocError;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr::{self, NonNull};
use core::slice;
use std::alloc::{self, Layout};

/// Growable array owning `cap` slots of which the first `len` are live.
///
/// ```
/// use dense_dict::{vector, Vector};
///
/// let mut v: Vector<u16> = Vector::with_capacity(1);
/// v.push(123);
/// v.push(456);
/// assert_eq!(v.capacity(), 4);
/// assert_eq!(v.last(), Some(&456));
///
/// let mut front = vector![1u16, 2, 3];
/// front.append(&vector![4, 5, 6]);
/// assert_eq!(front.as_slice(), &[1, 2, 3, 4, 5, 6]);
/// ```
pub struct Vector<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    _owns: PhantomData<T>,
}

impl<T> Vector<T> {
    /// Empty vector without a backing allocation; the first push allocates.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            len: 0,
            _owns: PhantomData,
        }
    }

    /// Create a vector with room for `cap` elements.
    ///
    /// Panics if `cap == 0`; aborts if the allocation fails.
    pub fn with_capacity(cap: usize) -> Self {
        Self::try_with_capacity(cap).unwrap_or_else(|e| e.fatal())
    }

    /// Fallible form of [`Vector::with_capacity`]: allocation failure is
    /// returned as an [`AllocError`].
    ///
    /// # Panics
    ///
    /// A zero `cap` is a caller bug, not an allocation failure, and panics
    /// as in `with_capacity`.
    pub fn try_with_capacity(cap: usize) -> Result<Self, AllocError> {
        assert!(cap > 0, "Vector initial capacity must be non-zero");
        let mut v = Self::new();
        v.try_grow_to(cap)?;
        Ok(v)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // `ptr` is dangling but aligned and non-null when nothing is live.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Append `value`, doubling (plus one) the capacity when full.
    pub fn push(&mut self, value: T) {
        if let Err(e) = self.try_push(value) {
            e.fatal();
        }
    }

    /// Fallible form of [`Vector::push`]. On error `value` is dropped and
    /// the vector is unchanged.
    pub fn try_push(&mut self, value: T) -> Result<(), AllocError> {
        if self.len == self.cap {
            let new_cap = self
                .cap
                .checked_add(1)
                .and_then(|c| c.checked_mul(2))
                .ok_or(AllocError::CapacityOverflow)?;
            self.try_grow_to(new_cap)?;
        }
        unsafe { ptr::write(self.ptr.as_ptr().add(self.len), value) };
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last element; `None` when empty. Never shrinks.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(unsafe { ptr::read(self.ptr.as_ptr().add(self.len)) })
    }

    /// Remove the element at `index` by moving the last element into its
    /// slot. O(1); does not preserve order.
    ///
    /// Panics if the vector is empty or `index >= len`.
    pub fn swap_remove(&mut self, index: usize) -> T {
        assert!(self.len > 0, "swap_remove on an empty Vector");
        assert!(
            index < self.len,
            "swap_remove index (is {}) should be < len (is {})",
            index,
            self.len
        );
        let last = self.len - 1;
        unsafe {
            let base = self.ptr.as_ptr();
            let removed = ptr::read(base.add(index));
            // Degenerates to a self-copy when `index == last`.
            ptr::copy(base.add(last), base.add(index), 1);
            self.len = last;
            removed
        }
    }

    /// Make room for at least `additional` more elements.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow)?;
        if required <= self.cap {
            return Ok(());
        }
        let doubled = self.cap.saturating_add(1).saturating_mul(2);
        self.try_grow_to(required.max(doubled))
    }

    /// Drop every live element; capacity is kept.
    pub fn clear(&mut self) {
        let live: *mut [T] = self.as_mut_slice();
        self.len = 0;
        unsafe { ptr::drop_in_place(live) };
    }

    fn try_grow_to(&mut self, new_cap: usize) -> Result<(), AllocError> {
        debug_assert!(new_cap > self.cap);
        let new_layout = Layout::array::<T>(new_cap).map_err(|_| AllocError::CapacityOverflow)?;
        if new_layout.size() == 0 {
            // Zero-sized elements never touch the allocator.
            self.cap = new_cap;
            return Ok(());
        }

        let raw = if self.cap == 0 {
            unsafe { alloc::alloc(new_layout) }
        } else {
            let old_layout =
                Layout::array::<T>(self.cap).map_err(|_| AllocError::CapacityOverflow)?;
            unsafe { alloc::realloc(self.ptr.as_ptr().cast::<u8>(), old_layout, new_layout.size()) }
        };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or_else(|| AllocError::out_of_memory(new_layout))?;

        log::trace!("vector grown {} -> {} slots", self.cap, new_cap);
        self.ptr = ptr;
        self.cap = new_cap;
        Ok(())
    }
}

impl<T: Clone> Vector<T> {
    /// Clone `back`'s live elements onto the end of `self`.
    ///
    /// When the combined length does not fit, capacity grows by
    /// `back.len() * 1.5`.
    pub fn append(&mut self, back: &Vector<T>) {
        let needed = match self.len.checked_add(back.len) {
            Some(n) => n,
            None => AllocError::CapacityOverflow.fatal(),
        };
        if needed > self.cap {
            let grown = self
                .cap
                .checked_add(back.len)
                .and_then(|c| c.checked_add(back.len / 2));
            match grown {
                Some(new_cap) => {
                    if let Err(e) = self.try_grow_to(new_cap) {
                        e.fatal();
                    }
                }
                None => AllocError::CapacityOverflow.fatal(),
            }
        }
        for item in back.iter() {
            unsafe { ptr::write(self.ptr.as_ptr().add(self.len), item.clone()) };
            self.len += 1;
        }
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        self.clear();
        if self.cap == 0 {
            return;
        }
        if let Ok(layout) = Layout::array::<T>(self.cap) {
            if layout.size() != 0 {
                unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
            }
        }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Vector<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        assert!(
            index < self.len,
            "index out of bounds: the len is {} but the index is {}",
            self.len,
            index
        );
        unsafe { &*self.ptr.as_ptr().add(index) }
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        assert!(
            index < self.len,
            "index out of bounds: the len is {} but the index is {}",
            self.len,
            index
        );
        unsafe { &mut *self.ptr.as_ptr().add(index) }
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity(self.cap.max(1));
        out.append(self);
        out
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        if let Err(e) = self.try_reserve(iter.size_hint().0) {
            e.fatal();
        }
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Self::new();
        v.extend(iter);
        v
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { vec: self, next: 0 }
    }
}

/// Owning iterator over a [`Vector`], front to back.
pub struct IntoIter<T> {
    vec: Vector<T>,
    next: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next == self.vec.len {
            return None;
        }
        let item = unsafe { ptr::read(self.vec.ptr.as_ptr().add(self.next)) };
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.vec.len - self.next;
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // Elements before `next` were moved out; only drop the rest.
        let rest = ptr::slice_from_raw_parts_mut(
            unsafe { self.vec.ptr.as_ptr().add(self.next) },
            self.vec.len - self.next,
        );
        self.vec.len = 0;
        unsafe { ptr::drop_in_place(rest) };
    }
}

// Safety: Vector<T> uniquely owns its elements.
unsafe impl<T: Send> Send for Vector<T> {}
unsafe impl<T: Sync> Sync for Vector<T> {}

/// Build a [`Vector`] from a list of elements, sized to fit them.
///
/// ```
/// let v = dense_dict::vector![10u16, 20, 30];
/// assert_eq!(v[1], 20);
/// ```
#[macro_export]
macro_rules! vector {
    () => {
        $crate::Vector::new()
    };
    ($($x:expr),+ $(,)?) => {{
        let items = [$($x),+];
        let mut v = $crate::Vector::with_capacity(items.len());
        for item in items {
            v.push(item);
        }
        v
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Drop counter for ownership checks.
    struct Tracked(Rc<Cell<usize>>);
    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn push_grows_cap_plus_one_doubled() {
        let mut v: Vector<u16> = Vector::with_capacity(1);
        assert_eq!(v.capacity(), 1);
        v.push(123);
        assert_eq!(v.capacity(), 1);
        v.push(456);
        assert_eq!(v.capacity(), 4);
        v.push(7);
        v.push(8);
        v.push(9);
        assert_eq!(v.capacity(), 10);
        assert_eq!(v.as_slice(), &[123, 456, 7, 8, 9]);
    }

    #[test]
    fn pop_returns_last_and_never_shrinks() {
        let mut v: Vector<u16> = Vector::with_capacity(1);
        v.push(123);
        v.push(456);
        let indexed = v[v.len() - 1];
        let last = *v.last().unwrap();
        assert_eq!(v.pop(), Some(456));
        assert_eq!(v.pop(), Some(123));
        assert!(v.is_empty());
        assert_eq!(indexed, 456);
        assert_eq!(last, indexed);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.pop(), None);
    }

    #[test]
    fn swap_remove_moves_last_into_hole() {
        let mut v = vector![1, 2, 3, 4];
        assert_eq!(v.swap_remove(1), 2);
        assert_eq!(v.as_slice(), &[1, 4, 3]);
        // Removing the last slot is a plain truncate.
        assert_eq!(v.swap_remove(2), 3);
        assert_eq!(v.as_slice(), &[1, 4]);
        assert_eq!(v.swap_remove(0), 1);
        assert_eq!(v.swap_remove(0), 4);
        assert!(v.is_empty());
    }

    #[test]
    #[should_panic(expected = "swap_remove on an empty Vector")]
    fn swap_remove_on_empty_panics() {
        let mut v: Vector<u8> = Vector::with_capacity(2);
        v.swap_remove(0);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn index_past_len_panics() {
        let mut v: Vector<u8> = Vector::with_capacity(4);
        v.push(1);
        let _ = v[1];
    }

    #[test]
    #[should_panic(expected = "initial capacity must be non-zero")]
    fn zero_capacity_is_rejected() {
        let _v: Vector<u8> = Vector::with_capacity(0);
    }

    #[test]
    #[should_panic(expected = "initial capacity must be non-zero")]
    fn try_with_capacity_zero_panics() {
        let _ = Vector::<u8>::try_with_capacity(0);
    }

    #[test]
    fn try_with_capacity_allocates_requested_slots() {
        let v = Vector::<u32>::try_with_capacity(5).unwrap();
        assert_eq!(v.capacity(), 5);
        assert!(v.is_empty());
    }

    #[test]
    fn append_keeps_order_and_adds_headroom() {
        let mut front = vector![1u16, 2, 3];
        let back = vector![4u16, 5, 6];
        assert_eq!(front.capacity(), 3);
        front.append(&back);
        assert_eq!(front.len(), 6);
        assert_eq!(front.as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(front.capacity(), 3 + 3 + 1);
        // `back` is only read.
        assert_eq!(back.as_slice(), &[4, 5, 6]);
    }

    #[test]
    fn append_within_capacity_does_not_grow() {
        let mut front: Vector<u8> = Vector::with_capacity(8);
        front.push(1);
        front.append(&vector![2, 3]);
        assert_eq!(front.capacity(), 8);
        assert_eq!(front.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn elements_dropped_exactly_once() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut v = Vector::with_capacity(1);
            for _ in 0..5 {
                v.push(Tracked(drops.clone()));
            }
            drop(v.swap_remove(0));
            assert_eq!(drops.get(), 1);
            drop(v.pop());
            assert_eq!(drops.get(), 2);
        }
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn partially_consumed_into_iter_drops_rest() {
        let drops = Rc::new(Cell::new(0));
        let v: Vector<Tracked> = (0..4).map(|_| Tracked(drops.clone())).collect();
        let mut it = v.into_iter();
        drop(it.next());
        assert_eq!(drops.get(), 1);
        drop(it);
        assert_eq!(drops.get(), 4);
    }

    #[test]
    fn zero_sized_elements() {
        let mut v: Vector<()> = Vector::with_capacity(1);
        for _ in 0..10 {
            v.push(());
        }
        assert_eq!(v.len(), 10);
        assert_eq!(v.swap_remove(3), ());
        assert_eq!(v.len(), 9);
    }

    #[test]
    fn empty_vector_has_no_allocation_until_push() {
        let mut v: Vector<u64> = vector![];
        assert_eq!(v.capacity(), 0);
        assert!(v.as_slice().is_empty());
        v.push(9);
        assert_eq!(v.capacity(), 2);
        assert_eq!(v[0], 9);
    }

    #[test]
    fn clone_and_eq() {
        let v = vector![String::from("a"), String::from("b")];
        let w = v.clone();
        assert_eq!(v, w);
        assert_eq!(format!("{:?}", w), r#"["a", "b"]"#);
    }
}
