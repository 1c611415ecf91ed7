// Copyright 2024 the chaincollections developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//

//! # `Chain`: a singly linked chain of elements.
//! One `Chain` holds the elements of a single bucket in a [`ChainSet`].
//! Elements are appended at the tail in O(1) and looked up with a linear
//! scan, which stays cheap because the owning set keeps chains short.
//!
//! [`ChainSet`]: ../chain_set/struct.ChainSet.html

use std::fmt;
use std::marker;
use std::ptr;

/// One heap node of a chain. The set engine moves nodes between chains
/// during a rehash without reallocating them.
#[doc(hidden)]
pub struct Node<T> {
    pub value: T,
    pub next: *mut Node<T>,
}

/// Frees a detached node and returns the element it carried.
///
/// The node must have come out of a chain via `detach_front` or `unlink`
/// and must not be reachable from any chain afterwards.
#[doc(hidden)]
#[inline]
pub unsafe fn free_node<T>(node: *mut Node<T>) -> T {
    Box::from_raw(node).value
}

/// A singly linked chain of elements in insertion order.
///
/// `Chain` owns its elements. It performs no uniqueness checks; keeping
/// chains duplicate-free is the caller's job.
///
/// # Examples
///
/// ```
/// use chaincollections::chain::Chain;
///
/// let mut chain = Chain::new();
/// chain.push_back(2);
/// chain.push_back(7);
/// assert_eq!(2, chain.len());
/// assert_eq!(Some(&7), chain.find(&7));
/// assert_eq!(Some(2), chain.remove(&2));
/// assert_eq!(1, chain.len());
/// ```
pub struct Chain<T> {
    head: *mut Node<T>,
    tail: *mut Node<T>,
    len: usize,
}

impl<T> Chain<T> {
    /// Creates an empty chain. Does not allocate.
    #[inline]
    pub fn new() -> Chain<T> {
        Chain {
            head: ptr::null_mut(),
            tail: ptr::null_mut(),
            len: 0,
        }
    }

    /// Returns the number of elements in the chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends an element at the tail of the chain. O(1).
    pub fn push_back(&mut self, value: T) {
        let node = Box::into_raw(Box::new(Node {
            value,
            next: ptr::null_mut(),
        }));
        if self.tail.is_null() {
            self.head = node;
        } else {
            unsafe {
                (*self.tail).next = node;
            }
        }
        self.tail = node;
        self.len += 1;
    }

    /// Removes and returns the element at the head of the chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaincollections::chain::Chain;
    ///
    /// let mut chain = Chain::new();
    /// chain.push_back(1);
    /// chain.push_back(2);
    /// assert_eq!(Some(1), chain.pop_front());
    /// assert_eq!(Some(2), chain.pop_front());
    /// assert_eq!(None, chain.pop_front());
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        let node = self.detach_front();
        if node.is_null() {
            return None;
        }
        unsafe { Some(free_node(node)) }
    }

    /// Removes every element and resets the chain to empty. O(len).
    pub fn clear(&mut self) {
        unsafe {
            let mut cur = self.head;
            while !cur.is_null() {
                let next = (*cur).next;
                drop(Box::from_raw(cur));
                cur = next;
            }
        }
        self.head = ptr::null_mut();
        self.tail = ptr::null_mut();
        self.len = 0;
    }

    /// Returns an iterator over the chain, head to tail.
    #[inline]
    pub fn iter(&self) -> ChainIter<'_, T> {
        ChainIter {
            cur: self.head,
            _marker: marker::PhantomData,
        }
    }

    #[doc(hidden)]
    #[inline]
    pub fn head_node(&self) -> *mut Node<T> {
        self.head
    }

    #[doc(hidden)]
    #[inline]
    pub fn tail_node(&self) -> *mut Node<T> {
        self.tail
    }

    /// Unhooks the head node without freeing it. Null if the chain is empty.
    #[doc(hidden)]
    pub fn detach_front(&mut self) -> *mut Node<T> {
        let node = self.head;
        if node.is_null() {
            return node;
        }
        unsafe {
            self.head = (*node).next;
            (*node).next = ptr::null_mut();
        }
        if self.head.is_null() {
            self.tail = ptr::null_mut();
        }
        self.len -= 1;
        node
    }

    /// Hooks a detached node onto the tail. The node must not belong to
    /// any chain.
    #[doc(hidden)]
    pub fn attach_back(&mut self, node: *mut Node<T>) {
        debug_assert!(!node.is_null());
        unsafe {
            (*node).next = ptr::null_mut();
        }
        if self.tail.is_null() {
            self.head = node;
        } else {
            unsafe {
                (*self.tail).next = node;
            }
        }
        self.tail = node;
        self.len += 1;
    }
}

impl<T: PartialEq> Chain<T> {
    /// Returns a reference to the first element equal to `value`, if any.
    /// O(len).
    pub fn find(&self, value: &T) -> Option<&T> {
        let node = self.find_node(value);
        if node.is_null() {
            return None;
        }
        unsafe { Some(&(*node).value) }
    }

    /// Returns `true` if the chain holds an element equal to `value`.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        !self.find_node(value).is_null()
    }

    /// Removes the first element equal to `value` and returns it. O(len).
    /// Only positions at the removed element are invalidated.
    pub fn remove(&mut self, value: &T) -> Option<T> {
        self.unlink(value).map(|(v, _)| v)
    }

    #[doc(hidden)]
    pub fn find_node(&self, value: &T) -> *mut Node<T> {
        unsafe {
            let mut cur = self.head;
            while !cur.is_null() {
                if (*cur).value == *value {
                    return cur;
                }
                cur = (*cur).next;
            }
        }
        ptr::null_mut()
    }

    /// Unlinks and frees the first element equal to `value`. On success,
    /// returns the removed element and the node that followed it in the
    /// chain (null if it was the tail).
    #[doc(hidden)]
    pub fn unlink(&mut self, value: &T) -> Option<(T, *mut Node<T>)> {
        unsafe {
            let mut prev: *mut Node<T> = ptr::null_mut();
            let mut cur = self.head;
            while !cur.is_null() {
                if (*cur).value == *value {
                    let next = (*cur).next;
                    if prev.is_null() {
                        self.head = next;
                    } else {
                        (*prev).next = next;
                    }
                    if self.tail == cur {
                        self.tail = prev;
                    }
                    self.len -= 1;
                    return Some((free_node(cur), next));
                }
                prev = cur;
                cur = (*cur).next;
            }
        }
        None
    }
}

impl<T> Drop for Chain<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for Chain<T> {
    #[inline]
    fn default() -> Chain<T> {
        Chain::new()
    }
}

impl<T: Clone> Clone for Chain<T> {
    fn clone(&self) -> Chain<T> {
        let mut chain = Chain::new();
        for value in self.iter() {
            chain.push_back(value.clone());
        }
        chain
    }
}

impl<T: fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a Chain<T> {
    type Item = &'a T;
    type IntoIter = ChainIter<'a, T>;

    fn into_iter(self) -> ChainIter<'a, T> {
        self.iter()
    }
}

/// An iterator over one chain, head to tail. Never crosses into another
/// bucket.
///
/// Two `ChainIter`s compare equal when they sit at the same position in
/// the same chain; the exhausted position acts as the chain-local end.
pub struct ChainIter<'a, T: 'a> {
    cur: *mut Node<T>,
    _marker: marker::PhantomData<&'a T>,
}

impl<'a, T: 'a> Iterator for ChainIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.cur.is_null() {
            return None;
        }
        unsafe {
            let r = &(*self.cur).value;
            self.cur = (*self.cur).next;
            Some(r)
        }
    }
}

impl<'a, T: 'a> Clone for ChainIter<'a, T> {
    #[inline]
    fn clone(&self) -> ChainIter<'a, T> {
        *self
    }
}

impl<'a, T: 'a> Copy for ChainIter<'a, T> {}

impl<'a, T: 'a> PartialEq for ChainIter<'a, T> {
    #[inline]
    fn eq(&self, other: &ChainIter<'a, T>) -> bool {
        self.cur == other.cur
    }
}

impl<'a, T: 'a> Eq for ChainIter<'a, T> {}
