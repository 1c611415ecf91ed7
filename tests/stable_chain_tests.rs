// Copyright 2024 the chaincollections developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//

extern crate chaincollections;

use chaincollections::chain::Chain;
use chaincollections::chain_set::ChainSet;
use std::cell::Cell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Element that bumps a shared counter when dropped. Identity (equality
/// and hash) is the id alone.
struct Tracked {
    id: i32,
    drops: Rc<Cell<u32>>,
}

impl Tracked {
    fn new(id: i32, drops: &Rc<Cell<u32>>) -> Tracked {
        Tracked { id, drops: drops.clone() }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Tracked) -> bool {
        self.id == other.id
    }
}

impl Eq for Tracked {}

impl Hash for Tracked {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[test]
fn test_chain_drops_contents()
{
    let drops = Rc::new(Cell::new(0));
    {
        let mut chain = Chain::new();
        for i in 0..10 {
            chain.push_back(Tracked::new(i, &drops));
        }
        assert_eq!(0, drops.get());
    }
    assert_eq!(10, drops.get());
}

#[test]
fn test_chain_clear_drops_contents()
{
    let drops = Rc::new(Cell::new(0));
    let mut chain = Chain::new();
    for i in 0..10 {
        chain.push_back(Tracked::new(i, &drops));
    }
    chain.clear();
    assert_eq!(10, drops.get());
    chain.push_back(Tracked::new(99, &drops));
    assert_eq!(10, drops.get());
}

#[test]
fn test_chain_remove_drops_only_removed()
{
    let drops = Rc::new(Cell::new(0));
    let mut chain = Chain::new();
    for i in 0..5 {
        chain.push_back(Tracked::new(i, &drops));
    }
    let removed = chain.remove(&Tracked::new(2, &drops));
    assert!(removed.is_some());
    // one drop for the probe value, one for the removed element
    drop(removed);
    assert_eq!(2, drops.get());
    assert_eq!(4, chain.len());
}

#[test]
fn test_set_drop_drops_everything()
{
    let drops = Rc::new(Cell::new(0));
    {
        let mut set = ChainSet::new();
        for i in 0..100 {
            set.insert(Tracked::new(i, &drops));
        }
        assert_eq!(0, drops.get());
    }
    assert_eq!(100, drops.get());
}

#[test]
fn test_set_duplicate_insert_drops_rejected_value()
{
    let drops = Rc::new(Cell::new(0));
    let mut set = ChainSet::new();
    set.insert(Tracked::new(1, &drops));
    assert!(!set.insert(Tracked::new(1, &drops)).1);
    // the rejected duplicate is dropped, the original survives
    assert_eq!(1, drops.get());
    assert_eq!(1, set.len());
}

#[test]
fn test_set_rehash_moves_without_dropping()
{
    let drops = Rc::new(Cell::new(0));
    let mut set = ChainSet::new();
    for i in 0..100 {
        set.insert(Tracked::new(i, &drops));
    }
    let before = drops.get();
    set.rehash(512);
    assert_eq!(before, drops.get());
    assert_eq!(100, set.len());
}

#[test]
fn test_set_clear_drops_contents()
{
    let drops = Rc::new(Cell::new(0));
    let mut set = ChainSet::new();
    for i in 0..50 {
        set.insert(Tracked::new(i, &drops));
    }
    set.clear();
    assert_eq!(50, drops.get());
}

#[test]
fn test_set_retain_drops_only_filtered()
{
    let drops = Rc::new(Cell::new(0));
    let mut set = ChainSet::new();
    for i in 0..20 {
        set.insert(Tracked::new(i, &drops));
    }
    set.retain(|t| t.id < 5);
    assert_eq!(15, drops.get());
    assert_eq!(5, set.len());
}

#[test]
fn test_set_drain_drops_unconsumed()
{
    let drops = Rc::new(Cell::new(0));
    let mut set = ChainSet::new();
    for i in 0..20 {
        set.insert(Tracked::new(i, &drops));
    }
    {
        let mut drain = set.drain();
        let first = drain.next();
        assert!(first.is_some());
        drop(first);
        assert_eq!(1, drops.get());
    }
    assert_eq!(20, drops.get());
    assert!(set.is_empty());
}

#[test]
fn test_set_into_iter_drops_unconsumed()
{
    let drops = Rc::new(Cell::new(0));
    let mut set = ChainSet::new();
    for i in 0..20 {
        set.insert(Tracked::new(i, &drops));
    }
    {
        let mut iter = set.into_iter();
        drop(iter.next());
        drop(iter.next());
        assert_eq!(2, drops.get());
    }
    assert_eq!(20, drops.get());
}

#[test]
fn test_set_take_hands_ownership_back()
{
    let drops = Rc::new(Cell::new(0));
    let mut set = ChainSet::new();
    set.insert(Tracked::new(7, &drops));
    let taken = set.take(&Tracked::new(7, &drops));
    // the probe dropped, the taken element still alive
    assert_eq!(1, drops.get());
    assert_eq!(Some(7), taken.map(|t| t.id));
    assert_eq!(2, drops.get());
    assert!(set.is_empty());
}
