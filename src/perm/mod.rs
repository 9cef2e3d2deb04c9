//! Permutations of `{1..n}` and unordered collections thereof.

pub mod cycles;
pub mod set;

pub use cycles::Cycles;
pub use set::PermSet;

use std::{
    fmt,
    hash::{
        Hash,
        Hasher,
    },
};

/// A permutation of degree `n`, stored as the image vector of `1..=n`.
///
/// Points above the stored degree are implicitly fixed, so permutations of
/// different degrees compose freely (the smaller operand is treated as
/// identity-extended) and compare equal whenever they agree on every point
/// of the larger domain. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Perm {
    images: Vec<usize>,
}

impl Perm {
    /// The identity of degree 0, absorbing under composition.
    pub fn id() -> Self {
        Self { images: Vec::new() }
    }

    /// The identity acting on `1..=n`.
    pub fn identity(n: usize) -> Self {
        Self {
            images: (1..=n).collect(),
        }
    }

    /// Build from the full image vector, i.e. `images[i - 1]` is the image
    /// of `i`. Panics if the vector is not a bijection on `1..=n`.
    pub fn from_images(images: &[usize]) -> Self {
        assert_valid_images(images);
        Self {
            images: images.to_vec(),
        }
    }

    pub(crate) fn from_images_unchecked(images: Vec<usize>) -> Self {
        Self { images }
    }

    /// Build a permutation of degree `n` from a list of cycles, the
    /// rightmost cycle applied first. Cycles may overlap.
    pub fn from_cycles(n: usize, cycles: &[Vec<usize>]) -> Self {
        cycles
            .iter()
            .rev()
            .fold(Self::identity(n), |acc, cycle| acc.multiply(&single_cycle(n, cycle)))
    }

    pub fn degree(&self) -> usize {
        self.images.len()
    }

    /// Image of the point `x` (1-based). Points beyond the degree are fixed.
    pub fn apply(&self, x: usize) -> usize {
        debug_assert!(x >= 1, "points are 1-based");
        if x <= self.images.len() {
            self.images[x - 1]
        } else {
            x
        }
    }

    pub fn is_id(&self) -> bool {
        self.images.iter().enumerate().all(|(i, &img)| img == i + 1)
    }

    /// True iff every point of the sequence is fixed.
    pub fn stabilizes<I>(&self, points: I) -> bool
    where
        I: IntoIterator<Item = usize>,
    {
        points.into_iter().all(|p| self.apply(p) == p)
    }

    /// `self` then `other`: the result maps `x` to `other(self(x))`. The
    /// result degree is the larger of the operand degrees.
    pub fn multiply(&self, other: &Self) -> Self {
        let n = self.degree().max(other.degree());
        let images = (1..=n).map(|x| other.apply(self.apply(x))).collect();
        Self { images }
    }

    /// Computes `self * other^-1`
    pub fn divide(&self, other: &Self) -> Self {
        self.multiply(&other.inv())
    }

    pub fn inv(&self) -> Self {
        let mut images = vec![0; self.images.len()];
        for (i, &img) in self.images.iter().enumerate() {
            images[img - 1] = i + 1;
        }
        Self { images }
    }

    pub fn pow(&self, pow: isize) -> Self {
        let base = if pow < 0 { self.inv() } else { self.clone() };
        let mut result = Self::identity(self.degree());
        for _ in 0..pow.unsigned_abs() {
            result = result.multiply(&base);
        }
        result
    }

    /// Identity-pad up to degree `m`. Panics if this would narrow.
    pub fn extend(mut self, m: usize) -> Self {
        assert!(m >= self.degree(), "permutation not narrowed");
        for i in self.degree() + 1..=m {
            self.images.push(i);
        }
        self
    }

    /// Conjugate by the shift `i -> i + k`: the result acts on
    /// `k+1..=k+n` the way `self` acts on `1..=n` and fixes `1..=k`.
    pub fn shifted(&self, k: usize) -> Self {
        let mut images: Vec<usize> = (1..=k).collect();
        images.extend(self.images.iter().map(|&img| img + k));
        Self { images }
    }

    /// Largest moved point, or `None` for the identity.
    pub fn lmp(&self) -> Option<usize> {
        (1..=self.degree()).rev().find(|&x| self.apply(x) != x)
    }

    /// First (smallest) moved point, or `None` for the identity.
    pub fn fmp(&self) -> Option<usize> {
        (1..=self.degree()).find(|&x| self.apply(x) != x)
    }

    /// Order of the cyclic group generated by this permutation.
    pub fn order(&self) -> usize {
        Cycles::from(self).order()
    }

    pub fn as_images(&self) -> &[usize] {
        &self.images[..]
    }
}

fn single_cycle(n: usize, cycle: &[usize]) -> Perm {
    assert!(cycle.iter().all(|&p| p >= 1 && p <= n), "cycle point out of range");
    let mut seen = vec![false; n];
    for &p in cycle {
        assert!(!seen[p - 1], "duplicate point in cycle");
        seen[p - 1] = true;
    }

    let mut images: Vec<usize> = (1..=n).collect();
    if cycle.len() < 2 {
        return Perm { images };
    }
    for w in cycle.windows(2) {
        images[w[0] - 1] = w[1];
    }
    images[cycle[cycle.len() - 1] - 1] = cycle[0];
    Perm { images }
}

fn assert_valid_images(images: &[usize]) {
    let n = images.len();
    let mut seen = vec![false; n];
    for &img in images {
        assert!(img >= 1 && img <= n, "image out of range");
        assert!(!seen[img - 1], "duplicate image");
        seen[img - 1] = true;
    }
}

impl PartialEq for Perm {
    fn eq(&self, other: &Self) -> bool {
        let n = self.degree().max(other.degree());
        (1..=n).all(|x| self.apply(x) == other.apply(x))
    }
}

impl Eq for Perm {}

impl Hash for Perm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Trailing fixed points do not participate, keeping the hash
        // consistent with degree-invariant equality.
        let trimmed = self.lmp().unwrap_or(0);
        self.images[..trimmed].hash(state);
    }
}

impl fmt::Display for Perm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Cycles::from(self))
    }
}
