// Copyright 2024 the chaincollections developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//

//! # Chain Collections for Rust
//! An open-chained hash set with explicit control over buckets, load
//! factor and iteration.
//!
//! `ChainSet` stores each element in the chain of the bucket its hash
//! selects. Unlike `std::collections::HashSet`, it exposes the bucket
//! structure: the bucket count, the bucket of any value, per-bucket
//! iteration, a tunable maximum load factor and an explicit `rehash`.
//! That makes it a good fit when you need to observe or steer the
//! layout, or when you want removal to hand you a cursor at the next
//! element the way `erase` does.
//!
//! `Chain` and `BucketArray` are the building blocks underneath, usable
//! on their own when a plain singly linked chain or an indexed array of
//! chains is all you need.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! chaincollections = "0.1.0"
//! ```
//!
//! and this to your crate root:
//!
//! ```rust
//! #[macro_use] extern crate chaincollections;
//! # fn main() {
//! # }
//! ```
//!

pub mod chain;
pub mod bucket_array;
pub mod chain_set;
pub mod chain_hasher;
#[doc(hidden)]
pub mod util;


/// Creates a [`ChainSet`] containing the arguments.
///
/// `chainset!` allows `ChainSet`s to be defined with the same syntax as
/// array expressions. Duplicate arguments collapse into one element.
///
/// ```
/// # #[macro_use] extern crate chaincollections;
/// # fn main() {
/// let set = chainset![1, 2, 3, 2];
/// assert_eq!(3, set.len());
/// assert!(set.contains(&2));
/// # }
/// ```
///
/// [`ChainSet`]: chain_set/struct.ChainSet.html
#[macro_export]
macro_rules! chainset {
    // count helper: transform any expression into 1
    (@one $x:expr) => (1usize);
    ($($x:expr),*$(,)*) => ({
        let count = 0usize $(+ chainset!(@one $x))*;
        let mut set = $crate::chain_set::ChainSet::with_bucket_count(count);
        $(set.insert($x);)*
        set
    });
}
