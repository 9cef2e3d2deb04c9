//! An unordered, deduplicatable collection of permutations.

use {
    super::Perm,
    crate::{
        DetHashSet,
        Error,
        Result,
    },
};

use std::fmt;

/// A set of permutations with stable (insertion) iteration order.
///
/// Duplicates are tolerated on insertion and suppressed on demand via
/// [`PermSet::make_unique`], so hot loops can defer the dedup cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermSet {
    perms: Vec<Perm>,
}

impl PermSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, perm: Perm) {
        self.perms.push(perm);
    }

    pub fn len(&self) -> usize {
        self.perms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perms.is_empty()
    }

    pub fn contains(&self, perm: &Perm) -> bool {
        self.perms.contains(perm)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Perm> {
        self.perms.iter()
    }

    pub fn clear(&mut self) {
        self.perms.clear();
    }

    /// Drop duplicates, keeping the first occurrence of each permutation.
    pub fn make_unique(&mut self) {
        let mut seen = DetHashSet::default();
        self.perms.retain(|p| seen.insert(p.clone()));
    }

    /// Contract check used by operations that require at least one
    /// generator (the trivial group is passed as `{identity}`).
    pub fn assert_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidArgument("empty permutation set".into()));
        }
        Ok(())
    }

    /// Largest moved point over all members; 0 if all are trivial.
    pub fn max_degree(&self) -> usize {
        self.perms.iter().filter_map(Perm::lmp).max().unwrap_or(0)
    }
}

impl FromIterator<Perm> for PermSet {
    fn from_iter<I: IntoIterator<Item = Perm>>(iter: I) -> Self {
        Self {
            perms: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Perm>> for PermSet {
    fn from(perms: Vec<Perm>) -> Self {
        Self { perms }
    }
}

impl<'a> IntoIterator for &'a PermSet {
    type Item = &'a Perm;
    type IntoIter = std::slice::Iter<'a, Perm>;

    fn into_iter(self) -> Self::IntoIter {
        self.perms.iter()
    }
}

impl IntoIterator for PermSet {
    type Item = Perm;
    type IntoIter = std::vec::IntoIter<Perm>;

    fn into_iter(self) -> Self::IntoIter {
        self.perms.into_iter()
    }
}

impl fmt::Display for PermSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, p) in self.perms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "}}")
    }
}
