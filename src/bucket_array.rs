// Copyright 2024 the chaincollections developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//

//! # `BucketArray`: an indexed, resizable sequence of chains.
//! The storage layer of [`ChainSet`]: one [`Chain`] per bucket, indexed
//! `0..len()`. Resizing always builds fresh empty chains; redistributing
//! elements across a new size is the owning set's job, not this type's.
//!
//! [`Chain`]: ../chain/struct.Chain.html
//! [`ChainSet`]: ../chain_set/struct.ChainSet.html

use chain::Chain;

use std::ops::{Index, IndexMut};
use std::slice;

/// A fixed-size-at-any-instant array of chains.
///
/// Indexing a bucket outside `0..len()` is a contract violation and
/// panics.
///
/// # Examples
///
/// ```
/// use chaincollections::bucket_array::BucketArray;
///
/// let mut buckets: BucketArray<i32> = BucketArray::new(4);
/// assert_eq!(4, buckets.len());
/// buckets[1].push_back(7);
/// assert_eq!(1, buckets[1].len());
/// ```
#[derive(Clone, Debug)]
pub struct BucketArray<T> {
    chains: Vec<Chain<T>>,
}

impl<T> BucketArray<T> {
    /// Creates an array of `count` empty chains.
    pub fn new(count: usize) -> BucketArray<T> {
        BucketArray {
            chains: (0..count).map(|_| Chain::new()).collect(),
        }
    }

    /// Returns the number of buckets.
    #[inline]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns `true` if the array has no buckets at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Replaces the array with `count` fresh empty chains, dropping any
    /// previous contents. Never element-preserving.
    pub fn resize(&mut self, count: usize) {
        self.chains = (0..count).map(|_| Chain::new()).collect();
    }

    /// Returns an iterator over the chains, in bucket order.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Chain<T>> {
        self.chains.iter()
    }

    /// Returns a mutable iterator over the chains, in bucket order.
    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Chain<T>> {
        self.chains.iter_mut()
    }
}

impl<T> Index<usize> for BucketArray<T> {
    type Output = Chain<T>;

    #[inline]
    fn index(&self, index: usize) -> &Chain<T> {
        &self.chains[index]
    }
}

impl<T> IndexMut<usize> for BucketArray<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Chain<T> {
        &mut self.chains[index]
    }
}

impl<T> Default for BucketArray<T> {
    #[inline]
    fn default() -> BucketArray<T> {
        BucketArray { chains: Vec::new() }
    }
}
