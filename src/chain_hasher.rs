// Copyright 2024 the chaincollections developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//

//! Implementations of `Hasher` that work well with `ChainSet`.
use util::*;

use std::sync::atomic::*;
use std::hash::BuildHasher;
use std::hash::Hasher;

static SEED: AtomicUsize = AtomicUsize::new(0xbead_cafe_usize);

fn next_seed() -> u64 {
    let x = SEED.load(Ordering::Acquire) as u64;
    let y = mix64(x);
    // we don't care if it fails
    let _ = SEED.compare_exchange(x as usize, y as usize, Ordering::Release, Ordering::Relaxed);
    y
}

const FOLD: u64 = 0x2545_f491_4f6c_dd1d;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainHasherBuilder {
    seed: u64,
}

/// The default hasher used by `ChainSet`. Folds every written field into
/// the state with a multiply and finalizes with a full bit mix, so the
/// low bits survive the set's modulo bucket selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainHasher {
    hash: u64,
}

impl Default for ChainHasherBuilder {
    fn default() -> Self {
        ChainHasherBuilder::new()
    }
}

impl ChainHasherBuilder {
    pub fn new() -> Self {
        ChainHasherBuilder { seed: next_seed() }
    }
}

impl BuildHasher for ChainHasherBuilder {
    type Hasher = ChainHasher;

    #[inline]
    fn build_hasher(&self) -> <Self as BuildHasher>::Hasher {
        ChainHasher::new(self.seed)
    }
}

impl ChainHasher {
    #[inline]
    pub fn new(seed: u64) -> Self {
        ChainHasher { hash: seed }
    }

    #[inline(always)]
    fn fold(&mut self, x: u64) {
        self.hash = (self.hash ^ x).wrapping_mul(FOLD);
    }
}

impl Hasher for ChainHasher {
    #[inline(always)]
    fn finish(&self) -> u64 {
        mix64(self.hash)
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut x: u64 = 0;
            for byte in chunk {
                x = (x << 8) | *byte as u64;
            }
            self.fold(x);
        }
    }

    #[inline(always)]
    fn write_u8(&mut self, i: u8) {
        self.fold(i as u64)
    }

    #[inline(always)]
    fn write_u16(&mut self, i: u16) {
        self.fold(i as u64)
    }

    #[inline(always)]
    fn write_u32(&mut self, i: u32) {
        self.fold(i as u64)
    }

    #[inline(always)]
    fn write_u64(&mut self, i: u64) {
        self.fold(i)
    }

    #[inline(always)]
    fn write_u128(&mut self, i: u128) {
        self.fold(i as u64);
        self.fold((i >> 64) as u64);
    }

    #[inline(always)]
    fn write_usize(&mut self, i: usize) {
        self.fold(i as u64)
    }

    #[inline(always)]
    fn write_i8(&mut self, i: i8) {
        self.fold(i as u64)
    }

    #[inline(always)]
    fn write_i16(&mut self, i: i16) {
        self.fold(i as u64)
    }

    #[inline(always)]
    fn write_i32(&mut self, i: i32) {
        self.fold(i as u64)
    }

    #[inline(always)]
    fn write_i64(&mut self, i: i64) {
        self.fold(i as u64)
    }

    #[inline(always)]
    fn write_i128(&mut self, i: i128) {
        self.write_u128(i as u128)
    }

    #[inline(always)]
    fn write_isize(&mut self, i: isize) {
        self.fold(i as u64)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrivialChainHasherBuilder {
    seed: u64,
}

/// A very fast hasher with low resilience: fields are summed straight
/// into the state and no finish mix is applied. Fine for keys that are
/// already well distributed; adversarial keys will pile into one chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrivialChainHasher {
    hash: u64,
}

impl Default for TrivialChainHasherBuilder {
    fn default() -> Self {
        TrivialChainHasherBuilder::new()
    }
}

impl TrivialChainHasherBuilder {
    pub fn new() -> Self {
        TrivialChainHasherBuilder { seed: next_seed() }
    }
}

impl BuildHasher for TrivialChainHasherBuilder {
    type Hasher = TrivialChainHasher;

    #[inline]
    fn build_hasher(&self) -> <Self as BuildHasher>::Hasher {
        TrivialChainHasher::new(self.seed)
    }
}

impl TrivialChainHasher {
    #[inline]
    pub fn new(seed: u64) -> Self {
        TrivialChainHasher { hash: seed }
    }

    #[inline(always)]
    fn add(&mut self, x: u64) {
        self.hash = self.hash.wrapping_add(x);
    }
}

impl Hasher for TrivialChainHasher {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        // rotate per byte so permuted byte strings stay distinct
        for byte in bytes {
            self.hash = self.hash.rotate_left(8) ^ *byte as u64;
        }
    }

    #[inline(always)]
    fn write_u8(&mut self, i: u8) {
        self.add(i as u64)
    }

    #[inline(always)]
    fn write_u16(&mut self, i: u16) {
        self.add(i as u64)
    }

    #[inline(always)]
    fn write_u32(&mut self, i: u32) {
        self.add(i as u64)
    }

    #[inline(always)]
    fn write_u64(&mut self, i: u64) {
        self.add(i)
    }

    #[inline(always)]
    fn write_u128(&mut self, i: u128) {
        self.add(i as u64);
        self.add((i >> 64) as u64);
    }

    #[inline(always)]
    fn write_usize(&mut self, i: usize) {
        self.add(i as u64)
    }

    #[inline(always)]
    fn write_i8(&mut self, i: i8) {
        self.add(i as u64)
    }

    #[inline(always)]
    fn write_i16(&mut self, i: i16) {
        self.add(i as u64)
    }

    #[inline(always)]
    fn write_i32(&mut self, i: i32) {
        self.add(i as u64)
    }

    #[inline(always)]
    fn write_i64(&mut self, i: i64) {
        self.add(i as u64)
    }

    #[inline(always)]
    fn write_i128(&mut self, i: i128) {
        self.write_u128(i as u128)
    }

    #[inline(always)]
    fn write_isize(&mut self, i: isize) {
        self.add(i as u64)
    }
}
