//! Base and strong generating set representation.

pub mod queue;
pub mod schreier_sims;

pub use schreier_sims::RandomOptions;

use {
    crate::{
        group::schreier::SchreierTree,
        perm::{
            Perm,
            PermSet,
        },
    },
    num::BigUint,
};

use tracing::trace;

/// A base `B = (b_1, ..., b_k)` with strong generators and one transversal
/// per level, stored as Schreier trees.
///
/// Level indices in the public API are 1-based, matching the stabilizer
/// chain `G = G_1 >= G_2 >= ... >= G_{k+1} = 1` with
/// `G_{i+1} = Stab_{G_i}(b_i)`.
#[derive(Debug, Clone)]
pub struct Bsgs {
    degree: usize,
    base: Vec<usize>,
    strong_generators: PermSet,
    transversals: Vec<SchreierTree>,
}

impl Bsgs {
    pub(crate) fn empty(degree: usize) -> Self {
        Self {
            degree,
            base: Vec::new(),
            strong_generators: PermSet::new(),
            transversals: Vec::new(),
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn base(&self) -> &[usize] {
        &self.base[..]
    }

    pub fn base_size(&self) -> usize {
        self.base.len()
    }

    pub fn strong_generators(&self) -> &PermSet {
        &self.strong_generators
    }

    pub(crate) fn set_strong_generators(&mut self, generators: PermSet) {
        self.strong_generators = generators;
    }

    /// The transversal of level `i` (0-based here, as an internal index).
    pub fn transversal(&self, i: usize) -> &SchreierTree {
        &self.transversals[i]
    }

    /// The fundamental orbit length of level `i` (0-based).
    pub fn orbit_len(&self, i: usize) -> usize {
        self.transversals[i].size()
    }

    /// Group order: the product of the fundamental orbit lengths.
    pub fn order(&self) -> BigUint {
        self.transversals
            .iter()
            .fold(BigUint::from(1u8), |acc, tree| acc * BigUint::from(tree.size()))
    }

    /// Coset representatives of level `i` (0-based), in orbit discovery
    /// order; the first is always the identity.
    pub fn transversal_reps(&self, i: usize) -> Vec<Perm> {
        let tree = &self.transversals[i];
        tree.points()
            .iter()
            .map(|&p| tree.path_product(p).expect("orbit point has a representative"))
            .collect()
    }

    /// Sift `g` through levels `start_level..=k` (1-based).
    ///
    /// Returns the residue and the level at which sifting stopped: the
    /// first level whose orbit does not contain the image of its base
    /// point, or `k + 1` after a full sift. `g` was an element of the
    /// group iff the level is `k + 1` and the residue is the identity.
    pub fn strip(&self, g: &Perm, start_level: usize) -> (Perm, usize) {
        debug_assert!(start_level >= 1);

        let mut residue = g.clone();
        for i in start_level..=self.base_size() {
            let point = residue.apply(self.base[i - 1]);
            let tree = &self.transversals[i - 1];

            if !tree.contains(point) {
                return (residue, i);
            }

            let rep = tree.path_product(point).expect("orbit point has a representative");
            residue = residue.divide(&rep);
        }

        (residue, self.base_size() + 1)
    }

    /// Membership test via sifting from the top level.
    pub fn contains(&self, g: &Perm) -> bool {
        let (residue, level) = self.strip(g, 1);
        level == self.base_size() + 1 && residue.is_id()
    }

    /// Append a new base point with an empty transversal rooted at it.
    pub(crate) fn extend_base(&mut self, point: usize) {
        debug_assert!(!self.base.contains(&point));
        trace!(point = point, "Adjoining new base point");
        self.base.push(point);
        self.transversals.push(SchreierTree::new(point));
    }

    /// The smallest point not already in the base that is moved by `perm`;
    /// used when sifting past the current base leaves a non-trivial residue.
    pub(crate) fn next_base_point(&self, perm: &Perm) -> usize {
        (1..=self.degree)
            .find(|&bp| !self.base.contains(&bp) && perm.apply(bp) != bp)
            .expect("non-identity residue moves some point")
    }

    /// Replace level `i`'s transversal (0-based) with the tree of `base[i]`
    /// under `generators`.
    pub(crate) fn update_transversal(&mut self, i: usize, generators: &PermSet) {
        self.transversals[i] = SchreierTree::from_generators(self.base[i], generators);
    }
}
