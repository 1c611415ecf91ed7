// Copyright 2024 the chaincollections developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Portions copyright The Rust Project Developers. Licensed under
// the MIT License.

//! # `ChainSet`: an open-chained hash set.
//! `ChainSet` maps each element to a bucket by `hash % bucket_count` and
//! stores colliding elements in a singly linked [`Chain`] per bucket.
//! When the element-to-bucket ratio reaches the maximum load factor, the
//! bucket array doubles and every element is redistributed.
//!
//! [`Chain`]: ../chain/struct.Chain.html

use chain::{free_node, Chain, ChainIter, Node};
use bucket_array::BucketArray;
use chain_hasher::ChainHasherBuilder;

use std::cmp;
use std::fmt;
use std::hash::BuildHasher;
use std::hash::Hash;
use std::hash::Hasher;
use std::iter::FromIterator;
use std::iter::FusedIterator;
use std::mem;
use std::ptr;

/// Bucket count of a freshly constructed set. A set moved out of with
/// `mem::take`/`mem::replace` is reset to this same canonical state.
const INITIAL_BUCKETS: usize = 8;

/// A hash set implemented with open chaining: a resizable array of
/// buckets, each bucket a singly linked chain of elements.
///
/// Elements must implement [`Eq`] and [`Hash`], usually via
/// `#[derive(PartialEq, Eq, Hash)]`. If you implement these yourself, it
/// is important that the following property holds:
///
/// ```text
/// k1 == k2 -> hash(k1) == hash(k2)
/// ```
///
/// It is a logic error for an element to be modified in such a way that
/// its hash or equality changes while it is in the set.
///
/// Lookup, insertion and removal run in O(1) on average; a rehash is the
/// only O(n) operation, and [`reserve`] avoids it for a known size. The
/// set is unordered: global iteration order follows bucket layout, not
/// insertion order.
///
/// # Examples
///
/// ```
/// use chaincollections::chain_set::ChainSet;
///
/// let mut nums = ChainSet::new();
///
/// nums.insert(17);
/// nums.insert(42);
/// nums.insert(-5);
///
/// if !nums.contains(&44) {
///     println!("We have {} nums, but 44 ain't one.", nums.len());
/// }
///
/// nums.remove(&42);
///
/// // Will print in an arbitrary order.
/// for n in &nums {
///     println!("{}", n);
/// }
/// ```
///
/// Custom element types only need the derives:
///
/// ```
/// use chaincollections::chain_set::ChainSet;
///
/// #[derive(Hash, Eq, PartialEq, Debug)]
/// struct Color {
///     r: u8, g: u8, b: u8
/// }
///
/// let mut colors = ChainSet::new();
/// colors.insert(Color { r: 255, g: 255, b: 0 });
/// colors.insert(Color { r: 0, g: 255, b: 255 });
/// assert_eq!(2, colors.len());
/// ```
///
/// [`Eq`]: ../../std/cmp/trait.Eq.html
/// [`Hash`]: ../../std/hash/trait.Hash.html
/// [`reserve`]: #method.reserve
pub struct ChainSet<T: Eq + Hash, S: BuildHasher = ChainHasherBuilder> {
    hasher: S,
    buckets: BucketArray<T>,
    num_elements: usize,
    max_load_factor: f32,
}

impl<T: Eq + Hash> ChainSet<T, ChainHasherBuilder> {
    /// Creates an empty `ChainSet` with 8 buckets and a maximum load
    /// factor of 1.0.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    /// let set: ChainSet<i32> = ChainSet::new();
    /// assert_eq!(8, set.bucket_count());
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    pub fn new() -> ChainSet<T, ChainHasherBuilder> {
        ChainSet::with_bucket_count(INITIAL_BUCKETS)
    }

    /// Creates an empty `ChainSet` with at least one bucket: a zero
    /// `bucket_count` is clamped to 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    /// let set: ChainSet<i32> = ChainSet::with_bucket_count(32);
    /// assert_eq!(32, set.bucket_count());
    /// ```
    #[inline]
    pub fn with_bucket_count(bucket_count: usize) -> ChainSet<T, ChainHasherBuilder> {
        ChainSet::with_bucket_count_and_hasher(bucket_count, ChainHasherBuilder::new())
    }
}

impl<T, S> ChainSet<T, S>
    where T: Eq + Hash,
          S: BuildHasher
{
    /// Creates an empty `ChainSet` with 8 buckets which will use the
    /// given hasher to place elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    /// use chaincollections::chain_hasher::TrivialChainHasherBuilder;
    ///
    /// let mut set = ChainSet::with_hasher(TrivialChainHasherBuilder::new());
    /// set.insert(2);
    /// assert!(set.contains(&2));
    /// ```
    #[inline]
    pub fn with_hasher(hasher: S) -> ChainSet<T, S> {
        ChainSet::with_bucket_count_and_hasher(INITIAL_BUCKETS, hasher)
    }

    /// Creates an empty `ChainSet` with the given bucket count (clamped
    /// to at least 1), using `hasher` to place elements.
    ///
    /// Warning: the bundled builders are randomly seeded to resist
    /// collision attacks; supplying a fixed hasher gives deterministic
    /// placement at the cost of that resistance.
    pub fn with_bucket_count_and_hasher(bucket_count: usize, hasher: S) -> ChainSet<T, S> {
        let bucket_count = cmp::max(1, bucket_count);
        ChainSet {
            hasher,
            buckets: BucketArray::new(bucket_count),
            num_elements: 0,
            max_load_factor: 1.0,
        }
    }

    /// Returns a reference to the set's [`BuildHasher`].
    ///
    /// [`BuildHasher`]: ../../std/hash/trait.BuildHasher.html
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut v = ChainSet::new();
    /// assert_eq!(v.len(), 0);
    /// v.insert(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.num_elements
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_elements == 0
    }

    /// Returns the number of buckets.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of elements in bucket `index`.
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn bucket_size(&self, index: usize) -> usize {
        self.buckets[index].len()
    }

    /// Returns the index of the bucket that holds, or would hold,
    /// `value`. Always less than [`bucket_count`].
    ///
    /// [`bucket_count`]: #method.bucket_count
    #[inline]
    pub fn bucket(&self, value: &T) -> usize {
        self.index_for(value)
    }

    /// Returns the ratio of elements to buckets, as a fraction.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set = ChainSet::new();
    /// for i in 0..4 {
    ///     set.insert(i);
    /// }
    /// assert_eq!(0.5, set.load_factor());
    /// ```
    #[inline]
    pub fn load_factor(&self) -> f32 {
        self.num_elements as f32 / self.bucket_count() as f32
    }

    /// Returns the load factor at which an insert grows the bucket
    /// array. Defaults to 1.0.
    #[inline]
    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Sets the load factor at which an insert grows the bucket array.
    ///
    /// Panics if `m` is not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set = ChainSet::new();
    /// set.set_max_load_factor(4.0);
    /// for i in 0..32 {
    ///     set.insert(i);
    /// }
    /// // 32 elements in 8 buckets: still under the 4.0 threshold
    /// assert_eq!(8, set.bucket_count());
    /// ```
    pub fn set_max_load_factor(&mut self, m: f32) {
        assert!(m > 0.0, "max load factor must be positive");
        self.max_load_factor = m;
    }

    /// Adds a value to the set and returns the cursor at it.
    ///
    /// If an equal value was already present, returns the cursor at the
    /// existing value and `false`; the set is unchanged and no rehash
    /// happens. Otherwise the set grows first if the load factor has
    /// reached the maximum, then places the value against the grown
    /// bucket count and returns `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set = ChainSet::new();
    ///
    /// assert_eq!(true, set.insert(2).1);
    /// assert_eq!(false, set.insert(2).1);
    /// assert_eq!(1, set.len());
    ///
    /// let (pos, inserted) = set.insert(7);
    /// assert!(inserted);
    /// assert_eq!(Some(&7), pos.get());
    /// ```
    pub fn insert(&mut self, value: T) -> (Cursor<'_, T>, bool) {
        let index = self.index_for(&value);
        let existing = self.buckets[index].find_node(&value);
        if !existing.is_null() {
            return (self.cursor_at(index, existing), false);
        }
        if self.load_factor() >= self.max_load_factor {
            let doubled = self.bucket_count() * 2;
            self.rehash(doubled);
        }
        let index = self.index_for(&value);
        self.buckets[index].push_back(value);
        self.num_elements += 1;
        let node = self.buckets[index].tail_node();
        (self.cursor_at(index, node), true)
    }

    /// Returns a cursor at the element equal to `value`, or the end
    /// cursor if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let set: ChainSet<i32> = [1, 2, 3].iter().cloned().collect();
    /// assert_eq!(Some(&2), set.find(&2).get());
    /// assert!(set.find(&4).is_end());
    /// assert!(set.find(&4) == set.end());
    /// ```
    pub fn find(&self, value: &T) -> Cursor<'_, T> {
        let index = self.index_for(value);
        let node = self.buckets[index].find_node(value);
        if node.is_null() {
            return self.end();
        }
        self.cursor_at(index, node)
    }

    /// Returns `true` if the set contains a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let set: ChainSet<i32> = [1, 2, 3].iter().cloned().collect();
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        let index = self.index_for(value);
        self.buckets[index].contains(value)
    }

    /// Returns a reference to the value in the set, if any, that is
    /// equal to the given value.
    pub fn get(&self, value: &T) -> Option<&T> {
        let index = self.index_for(value);
        self.buckets[index].find(value)
    }

    /// Removes the element equal to `value` and returns the cursor at
    /// the element that followed it in global iteration order (or the
    /// end cursor if it was the last). If no such element exists, the
    /// set is unchanged and the end cursor is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set: ChainSet<i32> = [1, 2, 3].iter().cloned().collect();
    /// set.erase(&2);
    /// assert_eq!(2, set.len());
    /// assert!(!set.contains(&2));
    /// assert!(set.erase(&99).is_end());
    /// assert_eq!(2, set.len());
    /// ```
    pub fn erase(&mut self, value: &T) -> Cursor<'_, T> {
        let index = self.index_for(value);
        match self.buckets[index].unlink(value) {
            None => self.end(),
            Some((_, next)) => {
                self.num_elements -= 1;
                if !next.is_null() {
                    self.cursor_at(index, next)
                } else {
                    self.first_occupied_from(index + 1)
                }
            }
        }
    }

    /// Removes a value from the set. Returns `true` if the value was
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set = ChainSet::new();
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    #[inline]
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the value in the set, if any, that is equal
    /// to the given one.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let index = self.index_for(value);
        match self.buckets[index].unlink(value) {
            None => None,
            Some((removed, _)) => {
                self.num_elements -= 1;
                Some(removed)
            }
        }
    }

    /// Grows the bucket array to `new_bucket_count` buckets and moves
    /// every element to the bucket its hash selects against the new
    /// count. A count at or below the current one is a no-op: the set
    /// never shrinks.
    ///
    /// The replacement array is fully allocated before any element
    /// moves, and elements move by relinking their existing nodes, so a
    /// failed allocation leaves the set untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set: ChainSet<i32> = (0..20).collect();
    /// set.rehash(64);
    /// assert_eq!(64, set.bucket_count());
    /// set.rehash(32);
    /// assert_eq!(64, set.bucket_count());
    /// assert_eq!(20, set.len());
    /// assert!(set.contains(&17));
    /// ```
    pub fn rehash(&mut self, new_bucket_count: usize) {
        if new_bucket_count <= self.bucket_count() {
            return;
        }
        let replacement = BucketArray::new(new_bucket_count);
        let mut old = mem::replace(&mut self.buckets, replacement);
        for chain in old.iter_mut() {
            loop {
                let node = chain.detach_front();
                if node.is_null() {
                    break;
                }
                let index = unsafe { self.index_for(&(*node).value) };
                self.buckets[index].attach_back(node);
            }
        }
    }

    /// Grows the bucket array so that `n` elements fit without crossing
    /// the maximum load factor.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set: ChainSet<i32> = ChainSet::new();
    /// set.reserve(100);
    /// assert!(set.bucket_count() >= 100);
    /// ```
    pub fn reserve(&mut self, n: usize) {
        let required = (n as f32 / self.max_load_factor).ceil() as usize;
        self.rehash(required);
    }

    /// Removes all elements. The bucket count is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set: ChainSet<i32> = (0..100).collect();
    /// let buckets = set.bucket_count();
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(buckets, set.bucket_count());
    /// ```
    pub fn clear(&mut self) {
        for chain in self.buckets.iter_mut() {
            chain.clear();
        }
        self.num_elements = 0;
    }

    /// Exchanges the entire contents of two sets in O(1). No element is
    /// copied or rehashed.
    #[inline]
    pub fn swap(&mut self, other: &mut ChainSet<T, S>) {
        mem::swap(self, other);
    }

    /// Retains only the elements specified by the predicate. Bucket
    /// placement is preserved, so no rehash happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set: ChainSet<i32> = (0..7).collect();
    /// set.retain(|&v| v % 2 == 0);
    /// assert_eq!(4, set.len());
    /// assert!(set.contains(&6) && !set.contains(&5));
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
        where F: FnMut(&T) -> bool
    {
        let mut removed = 0;
        for chain in self.buckets.iter_mut() {
            let mut kept = Chain::new();
            loop {
                let node = chain.detach_front();
                if node.is_null() {
                    break;
                }
                unsafe {
                    if f(&(*node).value) {
                        kept.attach_back(node);
                    } else {
                        drop(free_node(node));
                        removed += 1;
                    }
                }
            }
            *chain = kept;
        }
        self.num_elements -= removed;
    }

    /// Clears the set, returning all elements in an iterator. Any
    /// elements not yielded by the time the iterator is dropped are
    /// dropped with it.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set: ChainSet<i32> = [1, 2, 3].iter().cloned().collect();
    /// let drained: Vec<i32> = set.drain().collect();
    /// assert_eq!(3, drained.len());
    /// assert!(set.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            buckets: &mut self.buckets,
            bucket: 0,
            num_elements: &mut self.num_elements,
        }
    }

    /// An iterator visiting all elements in arbitrary order. The
    /// iterator element type is `&'a T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    /// let mut set = ChainSet::new();
    /// set.insert(7);
    /// set.insert(22);
    ///
    /// // Will print in an arbitrary order.
    /// for x in set.iter() {
    ///     println!("{}", x);
    /// }
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            cursor: self.begin(),
            remaining: self.num_elements,
        }
    }

    /// Returns the cursor at the first element in global iteration
    /// order, or the end cursor if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let mut set = ChainSet::new();
    /// assert!(set.begin() == set.end());
    /// set.insert(1);
    /// assert!(set.begin() != set.end());
    /// assert_eq!(Some(&1), set.begin().get());
    /// ```
    pub fn begin(&self) -> Cursor<'_, T> {
        self.first_occupied_from(0)
    }

    /// Returns the end cursor: the unique past-the-last sentinel. Every
    /// way of reaching the end yields an equal cursor.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor {
            buckets: &self.buckets,
            bucket: self.buckets.len(),
            node: ptr::null_mut(),
        }
    }

    /// An iterator over the contents of one bucket, in chain order. It
    /// never crosses into another bucket.
    ///
    /// Panics if `index` is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let set: ChainSet<i32> = (0..20).collect();
    /// let mut total = 0;
    /// for b in 0..set.bucket_count() {
    ///     total += set.bucket_iter(b).count();
    /// }
    /// assert_eq!(set.len(), total);
    /// ```
    #[inline]
    pub fn bucket_iter(&self, index: usize) -> ChainIter<'_, T> {
        self.buckets[index].iter()
    }

    #[inline]
    fn index_for(&self, value: &T) -> usize {
        let mut hasher = self.hasher.build_hasher();
        value.hash(&mut hasher);
        (hasher.finish() % self.bucket_count() as u64) as usize
    }

    #[inline]
    fn cursor_at(&self, bucket: usize, node: *mut Node<T>) -> Cursor<'_, T> {
        Cursor {
            buckets: &self.buckets,
            bucket,
            node,
        }
    }

    fn first_occupied_from(&self, start: usize) -> Cursor<'_, T> {
        let mut bucket = start;
        while bucket < self.buckets.len() {
            if !self.buckets[bucket].is_empty() {
                return self.cursor_at(bucket, self.buckets[bucket].head_node());
            }
            bucket += 1;
        }
        self.end()
    }
}

impl<T, S> PartialEq for ChainSet<T, S>
    where T: Eq + Hash,
          S: BuildHasher
{
    fn eq(&self, other: &ChainSet<T, S>) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|value| other.contains(value))
    }
}

impl<T, S> Eq for ChainSet<T, S>
    where T: Eq + Hash,
          S: BuildHasher
{}

impl<T, S> fmt::Debug for ChainSet<T, S>
    where T: Eq + Hash + fmt::Debug,
          S: BuildHasher
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> Default for ChainSet<T, S>
    where T: Eq + Hash,
          S: BuildHasher + Default
{
    /// Creates the canonical empty set: 8 buckets, no elements, maximum
    /// load factor 1.0. `mem::take` therefore leaves a moved-from slot
    /// in this state.
    fn default() -> ChainSet<T, S> {
        ChainSet::with_bucket_count_and_hasher(INITIAL_BUCKETS, Default::default())
    }
}

impl<T, S> Clone for ChainSet<T, S>
    where T: Eq + Hash + Clone,
          S: BuildHasher + Clone
{
    /// Deep-copies every chain. The hasher is cloned with it, so bucket
    /// placement in the copy is identical to the original.
    fn clone(&self) -> ChainSet<T, S> {
        let mut buckets = BucketArray::new(self.bucket_count());
        for (index, chain) in self.buckets.iter().enumerate() {
            for value in chain.iter() {
                buckets[index].push_back(value.clone());
            }
        }
        ChainSet {
            hasher: self.hasher.clone(),
            buckets,
            num_elements: self.num_elements,
            max_load_factor: self.max_load_factor,
        }
    }
}

impl<T, S> FromIterator<T> for ChainSet<T, S>
    where T: Eq + Hash,
          S: BuildHasher + Default
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> ChainSet<T, S> {
        let mut set = ChainSet::with_hasher(Default::default());
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for ChainSet<T, S>
    where T: Eq + Hash,
          S: BuildHasher
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, S> Extend<&'a T> for ChainSet<T, S>
    where T: 'a + Eq + Hash + Copy,
          S: BuildHasher
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

/// A cursor over a `ChainSet`: either at an element or at the unique
/// end position.
///
/// A cursor borrows the set, so the borrow checker rejects any use after
/// a structural mutation instead of letting it dangle. Two cursors are
/// equal only if they view the same bucket array, sit at the same bucket
/// position and at the same chain position; the end cursor is therefore
/// a single well-defined sentinel.
pub struct Cursor<'a, T: 'a> {
    buckets: &'a BucketArray<T>,
    bucket: usize,
    node: *mut Node<T>,
}

impl<'a, T: 'a> Cursor<'a, T> {
    /// Returns the element the cursor is at, or `None` at the end.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        if self.node.is_null() {
            return None;
        }
        unsafe { Some(&(*self.node).value) }
    }

    /// Returns `true` if the cursor is at the end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_null()
    }

    /// Moves to the next element in global iteration order: the next
    /// element of the current chain, or the first element of the next
    /// non-empty bucket, or the end position. Advancing the end cursor
    /// is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    ///
    /// let set: ChainSet<i32> = [1, 2, 3].iter().cloned().collect();
    /// let mut cursor = set.begin();
    /// let mut seen = 0;
    /// while !cursor.is_end() {
    ///     seen += 1;
    ///     cursor.advance();
    /// }
    /// assert_eq!(3, seen);
    /// cursor.advance();
    /// assert!(cursor == set.end());
    /// ```
    pub fn advance(&mut self) {
        if self.node.is_null() {
            return;
        }
        unsafe {
            let next = (*self.node).next;
            if !next.is_null() {
                self.node = next;
                return;
            }
        }
        self.bucket += 1;
        while self.bucket < self.buckets.len() {
            let chain = &self.buckets[self.bucket];
            if !chain.is_empty() {
                self.node = chain.head_node();
                return;
            }
            self.bucket += 1;
        }
        self.node = ptr::null_mut();
    }
}

impl<'a, T: 'a> Clone for Cursor<'a, T> {
    #[inline]
    fn clone(&self) -> Cursor<'a, T> {
        *self
    }
}

impl<'a, T: 'a> Copy for Cursor<'a, T> {}

impl<'a, T: 'a> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Cursor<'a, T>) -> bool {
        ptr::eq(self.buckets, other.buckets)
            && self.bucket == other.bucket
            && self.node == other.node
    }
}

impl<'a, T: 'a> Eq for Cursor<'a, T> {}

impl<'a, T: 'a + fmt::Debug> fmt::Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get() {
            Some(value) => write!(f, "Cursor({:?})", value),
            None => write!(f, "Cursor(end)"),
        }
    }
}

/// An iterator over the items of a `ChainSet`.
///
/// This `struct` is created by the [`iter`] method on [`ChainSet`].
///
/// [`ChainSet`]: struct.ChainSet.html
/// [`iter`]: struct.ChainSet.html#method.iter
pub struct Iter<'a, T: 'a> {
    cursor: Cursor<'a, T>,
    remaining: usize,
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        match self.cursor.get() {
            None => None,
            Some(value) => {
                self.cursor.advance();
                self.remaining -= 1;
                Some(value)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {
    #[inline]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

impl<'a, T: 'a> Clone for Iter<'a, T> {
    fn clone(&self) -> Iter<'a, T> {
        Iter {
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

/// An owning iterator over the items of a `ChainSet`.
///
/// This `struct` is created by the [`into_iter`] method on
/// [`ChainSet`] (provided by the `IntoIterator` trait).
///
/// [`ChainSet`]: struct.ChainSet.html
/// [`into_iter`]: struct.ChainSet.html#method.into_iter
pub struct IntoIter<T> {
    buckets: BucketArray<T>,
    bucket: usize,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while self.bucket < self.buckets.len() {
            if let Some(value) = self.buckets[self.bucket].pop_front() {
                self.remaining -= 1;
                return Some(value);
            }
            self.bucket += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    #[inline]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for IntoIter<T> {}

/// A draining iterator over the items of a `ChainSet`.
///
/// This `struct` is created by the [`drain`] method on [`ChainSet`].
///
/// [`ChainSet`]: struct.ChainSet.html
/// [`drain`]: struct.ChainSet.html#method.drain
pub struct Drain<'a, T: 'a> {
    buckets: &'a mut BucketArray<T>,
    bucket: usize,
    num_elements: &'a mut usize,
}

impl<'a, T: 'a> Iterator for Drain<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while self.bucket < self.buckets.len() {
            if let Some(value) = self.buckets[self.bucket].pop_front() {
                *self.num_elements -= 1;
                return Some(value);
            }
            self.bucket += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (*self.num_elements, Some(*self.num_elements))
    }
}

impl<'a, T: 'a> ExactSizeIterator for Drain<'a, T> {
    #[inline]
    fn len(&self) -> usize {
        *self.num_elements
    }
}

impl<'a, T: 'a> FusedIterator for Drain<'a, T> {}

impl<'a, T: 'a> Drop for Drain<'a, T> {
    fn drop(&mut self) {
        self.for_each(drop);
    }
}

impl<'a, T, S> IntoIterator for &'a ChainSet<T, S>
    where T: Eq + Hash,
          S: BuildHasher
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, S> IntoIterator for ChainSet<T, S>
    where T: Eq + Hash,
          S: BuildHasher
{
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Creates a consuming iterator, that is, one that moves each value
    /// out of the set in arbitrary order. The set cannot be used after
    /// calling this.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain_set::ChainSet;
    /// let mut set = ChainSet::new();
    /// set.insert(1_000_000);
    /// set.insert(200_000);
    ///
    /// let v: Vec<u32> = set.into_iter().collect();
    /// assert_eq!(2, v.len());
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        let remaining = self.num_elements;
        let ChainSet { buckets, .. } = self;
        IntoIter {
            buckets,
            bucket: 0,
            remaining,
        }
    }
}

#[cfg(test)]
mod test_set {
    use super::ChainSet;
    use std::hash::{BuildHasher, Hash, Hasher};
    use std::mem;

    /// Hashes a `u64` to itself, so `bucket(v) == v % bucket_count`.
    /// Placement tests need determinism, which the crate's seeded
    /// builders refuse to give.
    #[derive(Clone, Default)]
    struct IdentityBuilder;

    struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            // native-endian, matching the bytes integer hashing emits
            let mut buf = [0u8; 8];
            let n = bytes.len().min(8);
            buf[..n].copy_from_slice(&bytes[..n]);
            self.0 = u64::from_ne_bytes(buf);
        }

        fn write_u64(&mut self, i: u64) {
            self.0 = i;
        }
    }

    impl BuildHasher for IdentityBuilder {
        type Hasher = IdentityHasher;

        fn build_hasher(&self) -> IdentityHasher {
            IdentityHasher(0)
        }
    }

    fn identity_set(bucket_count: usize) -> ChainSet<u64, IdentityBuilder> {
        ChainSet::with_bucket_count_and_hasher(bucket_count, IdentityBuilder)
    }

    #[test]
    fn test_identity_hasher_maps_value_to_itself() {
        for &v in [0u64, 1, 9, 17, 0xFFFF_FFFF_FFFF].iter() {
            let mut hasher = IdentityBuilder.build_hasher();
            v.hash(&mut hasher);
            assert_eq!(v, hasher.finish());
        }
    }

    fn expected_bucket<S: BuildHasher>(set: &ChainSet<i32, S>, value: i32) -> usize {
        let mut hasher = set.hasher().build_hasher();
        value.hash(&mut hasher);
        (hasher.finish() % set.bucket_count() as u64) as usize
    }

    #[test]
    fn test_len_counts_successful_inserts() {
        let mut set = ChainSet::new();
        let mut successes = 0;
        for i in 0..100 {
            if set.insert(i % 60).1 {
                successes += 1;
            }
        }
        assert_eq!(60, successes);
        assert_eq!(successes, set.len());
    }

    #[test]
    fn test_duplicate_insert_keeps_existing() {
        let mut set = ChainSet::new();
        assert!(set.insert(7).1);
        let buckets_before = set.bucket_count();
        let (pos, inserted) = set.insert(7);
        assert!(!inserted);
        assert_eq!(Some(&7), pos.get());
        assert_eq!(1, set.len());
        assert_eq!(buckets_before, set.bucket_count());
    }

    #[test]
    fn test_find_and_placement_invariant() {
        let mut set = ChainSet::new();
        for i in 0..200 {
            set.insert(i);
        }
        for i in 0..200 {
            assert_eq!(Some(&i), set.find(&i).get());
            assert_eq!(expected_bucket(&set, i), set.bucket(&i));
        }
        assert!(set.find(&200).is_end());
        assert!(set.find(&200) == set.end());
    }

    #[test]
    fn test_rehash_grows_and_preserves() {
        let mut set = ChainSet::new();
        for i in 0..100 {
            set.insert(i);
        }
        set.rehash(256);
        assert_eq!(256, set.bucket_count());
        assert_eq!(100, set.len());
        for i in 0..100 {
            assert!(set.contains(&i));
            assert_eq!(expected_bucket(&set, i), set.bucket(&i));
        }
    }

    #[test]
    fn test_rehash_never_shrinks() {
        let mut set = identity_set(8);
        for i in 0..4u64 {
            set.insert(i);
        }
        set.rehash(8);
        set.rehash(4);
        assert_eq!(8, set.bucket_count());
        // placement untouched by the no-op
        for i in 0..4u64 {
            assert_eq!(i as usize, set.bucket(&i));
            assert_eq!(1, set.bucket_size(i as usize));
        }
    }

    #[test]
    fn test_growth_scenario() {
        let mut set = ChainSet::new();
        assert_eq!(8, set.bucket_count());
        for i in 0..8 {
            assert!(set.insert(i).1);
        }
        // load factor has reached 1.0 but nothing grew yet
        assert_eq!(8, set.bucket_count());
        assert_eq!(1.0, set.load_factor());
        assert!(set.insert(8).1);
        assert!(set.bucket_count() > 8);
        for i in 0..9 {
            assert!(set.contains(&i), "lost {} across the growth rehash", i);
        }
        assert_eq!(9, set.len());
    }

    #[test]
    fn test_erase_absent() {
        let mut set: ChainSet<i32> = ChainSet::new();
        assert!(set.erase(&1).is_end());
        assert_eq!(0, set.len());
        set.insert(1);
        assert!(set.erase(&2).is_end());
        assert_eq!(1, set.len());
    }

    #[test]
    fn test_erase_returns_chain_successor() {
        let mut set = identity_set(8);
        // 1, 9 and 17 all land in bucket 1, in chain order
        set.insert(1);
        set.insert(9);
        set.insert(17);
        let next = set.erase(&9);
        assert_eq!(Some(&17), next.get());
        assert_eq!(2, set.len());
    }

    #[test]
    fn test_erase_returns_next_bucket_head() {
        let mut set = identity_set(8);
        set.insert(1); // bucket 1, alone in its chain
        set.insert(4); // bucket 4
        set.insert(5); // bucket 5
        let next = set.erase(&1);
        assert_eq!(Some(&4), next.get());
        let next = set.erase(&5);
        assert!(next.is_end());
        assert_eq!(1, set.len());
    }

    #[test]
    fn test_erase_last_element_returns_end() {
        let mut set = identity_set(8);
        set.insert(3);
        let next = set.erase(&3);
        assert!(next.is_end());
        assert!(set.is_empty());
    }

    #[test]
    fn test_iterate_visits_all() {
        let mut set = ChainSet::new();
        for i in 0..32 {
            assert!(set.insert(i).1);
        }
        let mut observed: u32 = 0;
        for value in &set {
            observed |= 1 << *value;
        }
        assert_eq!(observed, 0xFFFF_FFFF);
        assert_eq!(32, set.iter().count());
    }

    #[test]
    fn test_iterate_single_occupied_bucket() {
        let mut set = identity_set(8);
        // everything hashes into bucket 2
        set.insert(2);
        set.insert(10);
        set.insert(18);
        let collected: Vec<u64> = set.iter().cloned().collect();
        assert_eq!(vec![2, 10, 18], collected);
    }

    #[test]
    fn test_cursor_advance_is_idle_at_end() {
        let set: ChainSet<i32> = ChainSet::new();
        let mut cursor = set.begin();
        assert!(cursor == set.end());
        cursor.advance();
        assert!(cursor == set.end());
    }

    #[test]
    fn test_take_resets_to_canonical_empty() {
        let mut set = ChainSet::new();
        for i in 0..100 {
            set.insert(i);
        }
        set.set_max_load_factor(2.5);
        let moved = mem::take(&mut set);
        assert_eq!(100, moved.len());
        assert_eq!(8, set.bucket_count());
        assert_eq!(0, set.len());
        assert_eq!(1.0, set.max_load_factor());
        // the reset source must be fully usable
        set.insert(1);
        assert!(set.contains(&1));
    }

    #[test]
    fn test_clear_keeps_bucket_count() {
        let mut set = ChainSet::new();
        for i in 0..50 {
            set.insert(i);
        }
        let buckets = set.bucket_count();
        set.clear();
        assert_eq!(0, set.len());
        assert_eq!(buckets, set.bucket_count());
        assert!(set.begin() == set.end());
    }

    #[test]
    fn test_reserve() {
        let mut set: ChainSet<i32> = ChainSet::new();
        set.reserve(100);
        assert!(set.bucket_count() >= 100);
        let buckets = set.bucket_count();
        set.reserve(10);
        assert_eq!(buckets, set.bucket_count());

        let mut set: ChainSet<i32> = ChainSet::new();
        set.set_max_load_factor(0.5);
        set.reserve(100);
        assert!(set.bucket_count() >= 200);
    }

    #[test]
    fn test_swap() {
        let mut a: ChainSet<i32> = (0..10).collect();
        let mut b: ChainSet<i32> = (100..103).collect();
        a.swap(&mut b);
        assert_eq!(3, a.len());
        assert_eq!(10, b.len());
        assert!(a.contains(&100));
        assert!(b.contains(&9));
    }

    #[test]
    fn test_max_load_factor_defers_growth() {
        let mut set = ChainSet::new();
        set.set_max_load_factor(4.0);
        for i in 0..32 {
            set.insert(i);
        }
        assert_eq!(8, set.bucket_count());
        assert_eq!(4.0, set.load_factor());
        set.insert(32);
        assert!(set.bucket_count() > 8);
    }

    #[test]
    #[should_panic]
    fn test_non_positive_load_factor_rejected() {
        let mut set: ChainSet<i32> = ChainSet::new();
        set.set_max_load_factor(0.0);
    }

    #[test]
    fn test_load_factor_is_fractional() {
        let mut set = ChainSet::new();
        for i in 0..4 {
            set.insert(i);
        }
        assert_eq!(0.5, set.load_factor());
    }

    #[test]
    fn test_clone_is_deep() {
        let mut set: ChainSet<i32> = (0..50).collect();
        let cloned = set.clone();
        assert_eq!(set, cloned);
        // identical placement in the clone
        for i in 0..50 {
            assert_eq!(set.bucket(&i), cloned.bucket(&i));
        }
        set.remove(&25);
        assert_eq!(49, set.len());
        assert_eq!(50, cloned.len());
        assert!(cloned.contains(&25));
    }

    #[test]
    fn test_local_iteration() {
        let mut set = identity_set(8);
        set.insert(1);
        set.insert(9);
        set.insert(4);
        let bucket_one: Vec<u64> = set.bucket_iter(1).cloned().collect();
        assert_eq!(vec![1, 9], bucket_one);
        assert_eq!(0, set.bucket_iter(0).count());
        let mut total = 0;
        for bucket in 0..set.bucket_count() {
            total += set.bucket_size(bucket);
        }
        assert_eq!(set.len(), total);
    }

    #[test]
    fn test_retain() {
        let mut set: ChainSet<i32> = (0..100).collect();
        let buckets = set.bucket_count();
        set.retain(|&v| v % 3 == 0);
        assert_eq!(34, set.len());
        assert_eq!(buckets, set.bucket_count());
        assert!(set.contains(&99) && !set.contains(&98));
        for i in (0..100).filter(|v| v % 3 == 0) {
            assert_eq!(expected_bucket(&set, i), set.bucket(&i));
        }
    }

    #[test]
    fn test_drain_finishes_on_drop() {
        let mut set: ChainSet<i32> = (0..100).collect();
        {
            let mut drain = set.drain();
            for _ in drain.by_ref().take(10) {}
        }
        assert!(set.is_empty());
        set.insert(1);
        assert_eq!(1, set.len());
    }

    #[test]
    fn test_into_iter_moves_everything() {
        let set: ChainSet<i32> = (0..100).collect();
        let mut values: Vec<i32> = set.into_iter().collect();
        values.sort();
        let expected: Vec<i32> = (0..100).collect();
        assert_eq!(expected, values);
    }

    #[test]
    fn test_eq() {
        let mut s1 = ChainSet::new();
        s1.insert(1);
        s1.insert(2);
        s1.insert(3);

        let mut s2 = ChainSet::new();
        s2.insert(1);
        s2.insert(2);
        assert!(s1 != s2);

        s2.insert(3);
        assert_eq!(s1, s2);

        // equal contents with different bucket layouts still compare equal
        s2.rehash(64);
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_show() {
        let mut set = ChainSet::new();
        let empty = ChainSet::<i32>::new();

        set.insert(1);
        set.insert(2);

        let set_str = format!("{:?}", set);
        assert!(set_str == "{1, 2}" || set_str == "{2, 1}");
        assert_eq!(format!("{:?}", empty), "{}");
    }

    #[test]
    fn test_zero_bucket_count_is_clamped() {
        let mut set: ChainSet<i32> = ChainSet::with_bucket_count(0);
        assert_eq!(1, set.bucket_count());
        set.insert(5);
        assert!(set.contains(&5));
    }
}
