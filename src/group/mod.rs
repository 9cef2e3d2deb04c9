//! Permutation groups represented by a base and strong generating set.

pub mod bsgs;
pub mod orbit;
pub mod random_perm;
pub mod schreier;

pub use bsgs::{
    Bsgs,
    RandomOptions,
};

use {
    crate::{
        perm::{
            Perm,
            PermSet,
        },
        Error,
        Result,
    },
    itertools::Itertools,
    num::BigUint,
    rand::Rng,
};

/// A permutation group on `{1..n}`, wrapping one [`Bsgs`].
///
/// Order, membership and element enumeration all run off the stabilizer
/// chain; construction happens once, queries are read-only and may be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct PermGroup {
    bsgs: Bsgs,
}

impl PermGroup {
    /// The group generated by `generators` inside `Sym(degree)`, built
    /// with the deterministic Schreier-Sims algorithm.
    pub fn new(degree: usize, generators: &PermSet) -> Result<Self> {
        Ok(Self {
            bsgs: Bsgs::schreier_sims(degree, generators)?,
        })
    }

    /// As [`PermGroup::new`], but with the Monte-Carlo construction.
    pub fn new_random<R: Rng>(
        degree: usize,
        generators: &PermSet,
        options: &RandomOptions,
        rng: &mut R,
    ) -> Result<Self> {
        Ok(Self {
            bsgs: Bsgs::schreier_sims_random(degree, generators, options, rng)?,
        })
    }

    pub fn from_bsgs(bsgs: Bsgs) -> Self {
        Self { bsgs }
    }

    /// The trivial group of the given degree.
    pub fn trivial(degree: usize) -> Self {
        let gens: PermSet = vec![Perm::identity(degree)].into();
        Self::new(degree, &gens).expect("trivial group always constructs")
    }

    /// The full symmetric group on `{1..n}`.
    pub fn symmetric(degree: usize) -> Self {
        if degree < 2 {
            return Self::trivial(degree);
        }
        let cycle: Vec<usize> = (1..=degree).collect();
        let gens: PermSet = vec![
            Perm::from_cycles(degree, &[vec![1, 2]]),
            Perm::from_cycles(degree, &[cycle]),
        ]
        .into();
        Self::new(degree, &gens).expect("symmetric group always constructs")
    }

    pub fn degree(&self) -> usize {
        self.bsgs.degree()
    }

    pub fn bsgs(&self) -> &Bsgs {
        &self.bsgs
    }

    pub fn generators(&self) -> &PermSet {
        self.bsgs.strong_generators()
    }

    pub fn order(&self) -> BigUint {
        self.bsgs.order()
    }

    pub fn is_trivial(&self) -> bool {
        self.bsgs.base_size() == 0
    }

    /// Membership test by sifting.
    pub fn contains(&self, perm: &Perm) -> bool {
        self.bsgs.contains(perm)
    }

    /// The orbit of `point` under this group, in discovery order.
    pub fn orbit(&self, point: usize) -> Result<Vec<usize>> {
        if point < 1 || point > self.degree() {
            return Err(Error::InvalidArgument(format!(
                "point {} outside 1..={}",
                point,
                self.degree()
            )));
        }
        Ok(orbit::orbit(point, self.bsgs.strong_generators()))
    }

    /// Every group element exactly once, as the Cartesian product of the
    /// per-level transversals (deepest level first).
    pub fn elements(&self) -> Box<dyn Iterator<Item = Perm> + '_> {
        if self.bsgs.base_size() == 0 {
            return Box::new(std::iter::once(Perm::identity(self.degree())));
        }

        let reps: Vec<Vec<Perm>> = (0..self.bsgs.base_size())
            .rev()
            .map(|i| self.bsgs.transversal_reps(i))
            .collect();

        Box::new(
            reps.into_iter()
                .multi_cartesian_product()
                .map(|combo| combo.iter().fold(Perm::id(), |acc, u| acc.multiply(u))),
        )
    }
}
