//! Symmetry-aware task mapping for heterogeneous many-core architectures.
//!
//! An architecture is a graph of processing elements connected by typed
//! channels. Its automorphism group captures which processor indices are
//! interchangeable; two task-to-processor allocations that differ only by
//! such a symmetry are functionally identical. This crate extracts that
//! group (via a pluggable graph-automorphism oracle), turns its generators
//! into a base and strong generating set with the Schreier-Sims algorithm,
//! and uses the resulting [`group::PermGroup`] to compute a canonical
//! representative for every allocation, shrinking the mapping design space.

pub mod arch;
pub mod error;
pub mod group;
pub mod mapping;
pub mod perm;

pub use error::{
    Error,
    Result,
};

use std::{
    collections::{
        hash_map::{
            DefaultHasher,
            HashMap,
        },
        HashSet,
    },
    hash::BuildHasherDefault,
};

/// A type of HashMap that uses a determined seed
pub type DetHashMap<K, V> = HashMap<K, V, BuildHasherDefault<DefaultHasher>>;

/// A type of HashSet that uses a determined seed
pub type DetHashSet<K> = HashSet<K, BuildHasherDefault<DefaultHasher>>;
