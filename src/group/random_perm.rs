//! Product-replacement generator for (nearly) uniform random group elements.

use {
    crate::perm::{
        Perm,
        PermSet,
    },
    rand::Rng,
    std::cmp::max,
};

const MIN_SIZE: usize = 11;
const INITIAL_RUNS: usize = 50;

/// Calling [`PrRandomizer::next_element`] repeatedly yields random elements
/// of the subgroup generated by the seed set, via product replacement with
/// an accumulator.
#[derive(Debug)]
pub struct PrRandomizer<R> {
    size: usize,
    rng: R,
    elements: Vec<Perm>,
    accum: Perm,
}

impl<R> PrRandomizer<R>
where
    R: Rng,
{
    /// Seed with a generating set, using a defined source of randomness.
    /// The element list is padded by repetition when there are fewer than
    /// `MIN_SIZE` generators, then shaken by some initial rounds.
    pub fn new(generators: &PermSet, rng: R) -> Self {
        let mut elements: Vec<Perm> = if generators.is_empty() {
            vec![Perm::id()]
        } else {
            generators.iter().cloned().collect()
        };

        let k = elements.len();
        for i in k..MIN_SIZE {
            elements.push(elements[(i - k) % k].clone());
        }

        let size = max(MIN_SIZE, k);
        let mut randomizer = Self {
            size,
            rng,
            elements,
            accum: Perm::id(),
        };
        for _ in 0..INITIAL_RUNS {
            randomizer.next_element();
        }
        randomizer
    }

    /// Produce the next random element.
    pub fn next_element(&mut self) -> Perm {
        let s = self.rng.gen_range(0..self.size);
        let mut t = s;
        // another index that isn't equal to s
        while t == s {
            t = self.rng.gen_range(0..self.size);
        }
        // either product or quotient
        let e = if self.rng.gen::<bool>() { 1 } else { -1 };
        // randomly pick the side the replacement multiplies on, then
        // accumulate with the stored permutation
        if self.rng.gen::<bool>() {
            self.elements[s] = self.elements[s].multiply(&self.elements[t].pow(e));
            self.accum = self.accum.multiply(&self.elements[s]);
        } else {
            self.elements[s] = self.elements[t].pow(e).multiply(&self.elements[s]);
            self.accum = self.elements[s].multiply(&self.accum);
        }
        self.accum.clone()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        rand::{
            rngs::StdRng,
            SeedableRng,
        },
    };

    #[test]
    fn empty_generators_only_produce_the_identity() {
        let mut randomizer = PrRandomizer::new(&PermSet::new(), StdRng::seed_from_u64(7));
        for _ in 0..20 {
            assert!(randomizer.next_element().is_id());
        }
    }

    #[test]
    fn elements_stay_in_the_generated_subgroup() {
        let generator = Perm::from_cycles(4, &[vec![1, 2, 3, 4]]);
        let powers = [
            generator.clone(),
            generator.pow(2),
            generator.pow(3),
            generator.pow(4),
        ];
        let gens: PermSet = vec![generator].into();
        let mut randomizer = PrRandomizer::new(&gens, StdRng::seed_from_u64(7));
        for _ in 0..50 {
            let element = randomizer.next_element();
            assert!(powers.contains(&element));
        }
    }
}
