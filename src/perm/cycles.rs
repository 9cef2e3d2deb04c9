//! Disjoint cycle notation for permutations.

use {
    super::Perm,
    crate::DetHashSet,
    serde::{
        Deserialize,
        Serialize,
    },
};

use std::fmt;

use num::integer::lcm;

/// A permutation in disjoint cycle notation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycles {
    cycles: Vec<Vec<usize>>,
}

impl Cycles {
    pub fn id() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(cycles: Vec<Vec<usize>>) -> Self {
        // Check the element range
        assert!(cycles.iter().flatten().all(|&i| i > 0));

        // Within one cycle every element occurs at most once
        for cycle in &cycles {
            let distinct: DetHashSet<usize> = cycle.iter().cloned().collect();
            assert!(distinct.len() == cycle.len());
        }

        Self { cycles }
    }

    /// Been needing this for a while. (1 2 3)
    pub fn single_cycle(cycle: &[usize]) -> Self {
        Self::from_vec(vec![cycle.to_vec()])
    }

    /// Get the order of the permutation
    pub fn order(&self) -> usize {
        self.cycles.iter().map(|s| s.len()).fold(1, lcm)
    }

    pub fn cycles(&self) -> &[Vec<usize>] {
        &self.cycles[..]
    }

    /// Realize as an image-vector permutation of degree `n` (at least the
    /// largest point mentioned).
    pub fn into_perm(self, n: usize) -> Perm {
        let max = self.cycles.iter().flatten().max().cloned().unwrap_or(0);
        assert!(n >= max, "degree too small for cycle notation");
        Perm::from_cycles(n, &self.cycles)
    }
}

impl From<&Perm> for Cycles {
    fn from(perm: &Perm) -> Self {
        let n = match perm.lmp() {
            // This path means that the permutation is the identity
            None => return Self { cycles: Vec::new() },
            Some(n) => n,
        };

        let mut accounted = DetHashSet::default();
        let mut cycles = Vec::new();

        for i in 1..=n {
            if accounted.contains(&i) {
                continue;
            }
            accounted.insert(i);

            let mut current = perm.apply(i);
            let mut cycle = vec![i];
            while current != i {
                accounted.insert(current);
                cycle.push(current);
                current = perm.apply(current);
            }

            // Do not add 1-cycles
            if cycle.len() > 1 {
                cycles.push(cycle);
            }
        }

        Self { cycles }
    }
}

impl fmt::Display for Cycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cycles.is_empty() {
            write!(f, "()")?;
            return Ok(());
        }

        for cycle in &self.cycles {
            write!(f, "(")?;
            for img in cycle[0..cycle.len() - 1].iter() {
                write!(f, "{} ", img)?;
            }
            write!(f, "{})", cycle[cycle.len() - 1])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_cycle() {
        let id = Cycles::from(&Perm::identity(6));
        assert_eq!(id.cycles().len(), 0);
        assert_eq!(format!("{}", id), "()");
    }

    #[test]
    fn two_cycles() {
        let perm = Perm::from_images(&[2, 5, 4, 3, 1]);
        let cycles = Cycles::from(&perm);
        assert_eq!(cycles.cycles(), &[vec![1, 2, 5], vec![3, 4]]);
        assert_eq!(format!("{}", cycles), "(1 2 5)(3 4)");
    }

    #[test]
    fn roundtrip_through_cycles() {
        let perm = Perm::from_images(&[4, 5, 7, 6, 8, 2, 1, 3]);
        let back = Cycles::from(&perm).into_perm(8);
        assert_eq!(perm, back);
    }

    #[test]
    fn order_is_lcm_of_cycle_lengths() {
        let cycles = Cycles::from_vec(vec![vec![1, 2, 3], vec![5, 6], vec![7, 8, 9, 10]]);
        assert_eq!(cycles.order(), 12);
        assert_eq!(Cycles::id().order(), 1);
    }

    #[test]
    #[should_panic]
    fn rejects_repetition_within_cycle() {
        let _ = Cycles::from_vec(vec![vec![2, 4, 2]]);
    }
}
