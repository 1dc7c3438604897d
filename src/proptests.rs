//! Model-based property tests.
//!
//! Random operation sequences run against both tree substrates and a
//! `BTreeMap` model in lockstep; after every step the leaf chain must agree
//! with the model in both directions.

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::disktree::DiskTree;
use crate::error::{Result, StrataError};
use crate::memtree::MemTree;
use crate::vfs::MemFile;

/// Both substrates behind one face so the harness can drive either.
trait Substrate {
    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<()>;
    fn update(&mut self, key: &[u8], value: &[u8]) -> Result<()>;
    fn find(&mut self, key: &[u8]) -> Result<Vec<u8>>;
    fn delete(&mut self, key: &[u8]) -> Result<()>;
    fn forward(&mut self) -> Vec<Vec<u8>>;
    fn backward(&mut self) -> Vec<Vec<u8>>;
}

impl Substrate for MemTree {
    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        MemTree::insert(self, key, value)
    }
    fn update(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        MemTree::update(self, key, value)
    }
    fn find(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        MemTree::find(self, key)
    }
    fn delete(&mut self, key: &[u8]) -> Result<()> {
        MemTree::delete(self, key)
    }
    fn forward(&mut self) -> Vec<Vec<u8>> {
        self.leaf_keys_forward()
    }
    fn backward(&mut self) -> Vec<Vec<u8>> {
        self.leaf_keys_backward()
    }
}

impl Substrate for DiskTree<MemFile> {
    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        DiskTree::insert(self, key, value)
    }
    fn update(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        DiskTree::update(self, key, value)
    }
    fn find(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        DiskTree::find(self, key)
    }
    fn delete(&mut self, key: &[u8]) -> Result<()> {
        DiskTree::delete(self, key)
    }
    fn forward(&mut self) -> Vec<Vec<u8>> {
        self.leaf_keys_forward().unwrap()
    }
    fn backward(&mut self) -> Vec<Vec<u8>> {
        self.leaf_keys_backward().unwrap()
    }
}

#[derive(Debug, Clone)]
enum Action {
    Insert(u32, u16),
    Update(u32, u16),
    Find(u32),
    Delete(u32),
}

/// Keys are drawn from a small space so inserts, updates, and deletes
/// collide often enough to exercise every rebalancing path.
fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u32..48, any::<u16>()).prop_map(|(k, v)| Action::Insert(k, v)),
        (0u32..48, any::<u16>()).prop_map(|(k, v)| Action::Update(k, v)),
        (0u32..48).prop_map(Action::Find),
        (0u32..48).prop_map(Action::Delete),
    ]
}

fn key_bytes(k: u32) -> Vec<u8> {
    k.to_be_bytes().to_vec()
}

fn value_bytes(v: u16) -> Vec<u8> {
    format!("val{}", v).into_bytes()
}

/// Run `actions` against `tree` and a `BTreeMap` model, checking that every
/// outcome and the full key ordering agree after each step.
fn run_against_model(tree: &mut impl Substrate, actions: &[Action]) {
    let mut model: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();

    for action in actions {
        match action {
            Action::Insert(k, v) => {
                let (key, value) = (key_bytes(*k), value_bytes(*v));
                let outcome = tree.insert(&key, &value);
                if model.contains_key(&key) {
                    assert!(matches!(outcome, Err(StrataError::KeyAlreadyExists)));
                } else {
                    outcome.unwrap();
                    model.insert(key, value);
                }
            }
            Action::Update(k, v) => {
                let (key, value) = (key_bytes(*k), value_bytes(*v));
                let outcome = tree.update(&key, &value);
                if model.contains_key(&key) {
                    outcome.unwrap();
                    model.insert(key, value);
                } else {
                    assert!(matches!(outcome, Err(StrataError::KeyNotFound)));
                }
            }
            Action::Find(k) => {
                let key = key_bytes(*k);
                match model.get(&key) {
                    Some(expected) => assert_eq!(&tree.find(&key).unwrap(), expected),
                    None => {
                        assert!(matches!(tree.find(&key), Err(StrataError::KeyNotFound)))
                    }
                }
            }
            Action::Delete(k) => {
                let key = key_bytes(*k);
                let outcome = tree.delete(&key);
                if model.remove(&key).is_some() {
                    outcome.unwrap();
                } else {
                    assert!(matches!(outcome, Err(StrataError::KeyNotFound)));
                }
            }
        }

        // The leaf chain must mirror the model in both directions.
        let forward = tree.forward();
        let expected: Vec<Vec<u8>> = model.keys().cloned().collect();
        assert_eq!(forward, expected, "forward chain diverged from model");

        let mut backward = tree.backward();
        backward.reverse();
        assert_eq!(forward, backward, "prev chain disagrees with next chain");
    }

    // Every surviving key still resolves to its last written value.
    for (key, expected) in &model {
        assert_eq!(&tree.find(key).unwrap(), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn memtree_matches_model(actions in prop::collection::vec(action_strategy(), 1..64)) {
        let mut tree = MemTree::new();
        run_against_model(&mut tree, &actions);
    }

    #[test]
    fn disktree_matches_model(actions in prop::collection::vec(action_strategy(), 1..64)) {
        let mut tree = DiskTree::from_file(MemFile::new()).unwrap();
        run_against_model(&mut tree, &actions);
    }

    #[test]
    fn disktree_survives_reopen(raw_keys in prop::collection::hash_set(0u32..256, 1..96)) {
        let mut tree = DiskTree::from_file(MemFile::new()).unwrap();
        for &k in &raw_keys {
            tree.insert(&key_bytes(k), &value_bytes(k as u16)).unwrap();
        }

        let file = tree.close().unwrap();
        let mut tree = DiskTree::from_file(file).unwrap();

        for &k in &raw_keys {
            prop_assert_eq!(tree.find(&key_bytes(k)).unwrap(), value_bytes(k as u16));
        }
    }
}
