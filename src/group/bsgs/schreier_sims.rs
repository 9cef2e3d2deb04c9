//! Deterministic and Monte-Carlo BSGS construction.

use {
    super::{
        queue::SchreierGeneratorQueue,
        Bsgs,
    },
    crate::{
        group::random_perm::PrRandomizer,
        perm::{
            Perm,
            PermSet,
        },
        Error,
        Result,
    },
    num::BigUint,
    rand::Rng,
};

use tracing::{
    debug,
    trace,
};

/// Parameters of the Monte-Carlo construction.
#[derive(Debug, Clone)]
pub struct RandomOptions {
    /// Number of consecutive random elements that must sift to the
    /// identity before construction is considered complete.
    pub w: usize,
    /// How often to re-run when `known_order` is set and the candidate
    /// order comes out wrong.
    pub retries: usize,
    /// The group order, if the caller knows it. With this set the result
    /// is guaranteed correct: wrong candidates are retried and ultimately
    /// completed by the deterministic algorithm.
    pub known_order: Option<BigUint>,
}

impl Default for RandomOptions {
    fn default() -> Self {
        Self {
            w: 10,
            retries: 3,
            known_order: None,
        }
    }
}

impl RandomOptions {
    pub fn known_order(mut self, order: BigUint) -> Self {
        self.known_order = Some(order);
        self
    }
}

// Per-level working state of a construction run: strong generators and
// fundamental orbits, alongside the partially built chain.
struct Construction {
    bsgs: Bsgs,
    strong_gens: Vec<PermSet>,
    orbits: Vec<Vec<usize>>,
}

impl Construction {
    fn init(degree: usize, generators: &PermSet) -> Result<Self> {
        if generators.max_degree() > degree {
            return Err(Error::InvalidArgument(format!(
                "generator moves a point beyond degree {}",
                degree
            )));
        }

        let mut bsgs = Bsgs::empty(degree);

        // provisional strong generators: the input minus identities
        let provisional: PermSet = generators.iter().filter(|g| !g.is_id()).cloned().collect();

        // every generator must move some base point
        for gen in &provisional {
            if gen.stabilizes(bsgs.base().iter().cloned()) {
                let bp = gen.fmp().expect("non-identity generator moves a point");
                bsgs.extend_base(bp);
            }
        }
        bsgs.set_strong_generators(provisional);

        let mut construction = Self {
            bsgs,
            strong_gens: Vec::new(),
            orbits: Vec::new(),
        };

        // initial per-level strong generator sets: the generators fixing
        // the base prefix of each level
        for i in 0..construction.bsgs.base_size() {
            let prefix: Vec<usize> = construction.bsgs.base()[..i].to_vec();
            let level_gens: PermSet = construction
                .bsgs
                .strong_generators()
                .iter()
                .filter(|g| g.stabilizes(prefix.iter().cloned()))
                .cloned()
                .collect();

            construction.strong_gens.push(PermSet::new());
            construction.orbits.push(Vec::new());
            construction.insert_level_generator(i, level_gens);
        }

        debug!(
            base = ?construction.bsgs.base(),
            levels = construction.bsgs.base_size(),
            "Initialized Schreier-Sims state"
        );

        Ok(construction)
    }

    // Add generators to level `i` (0-based) and rebuild its transversal
    // and fundamental orbit.
    fn insert_level_generator<I>(&mut self, i: usize, new_gens: I)
    where
        I: IntoIterator<Item = Perm>,
    {
        for gen in new_gens {
            self.strong_gens[i].insert(gen);
        }
        let gens = self.strong_gens[i].clone();
        self.bsgs.update_transversal(i, &gens);
        self.orbits[i] = self.bsgs.transversal(i).points().to_vec();
    }

    fn push_level(&mut self, residue: &Perm) {
        let bp = self.bsgs.next_base_point(residue);
        self.bsgs.extend_base(bp);
        self.strong_gens.push(PermSet::new());
        self.orbits.push(Vec::new());
    }

    // Deterministic main loop: examine Schreier generators level by level,
    // bottom up; a residue that does not sift to the identity is adjoined
    // one level down and that level is re-examined.
    fn run_deterministic(&mut self) {
        let mut queues: Vec<SchreierGeneratorQueue> = (0..self.bsgs.base_size())
            .map(|_| SchreierGeneratorQueue::new())
            .collect();

        let mut i = self.bsgs.base_size();
        'levels: while i >= 1 {
            trace!(level = i, "Examining Schreier generators");
            queues[i - 1].update(&self.strong_gens[i - 1], &self.orbits[i - 1], self.bsgs.transversal(i - 1));

            while let Some(schreier_generator) = queues[i - 1].next_generator() {
                let (residue, level) = self.bsgs.strip(&schreier_generator, i + 1);
                trace!(perm = %schreier_generator, residue = %residue, level = level, "Stripped");

                if level <= self.bsgs.base_size() || !residue.is_id() {
                    let extended = i == self.bsgs.base_size();
                    if extended {
                        self.push_level(&residue);
                        debug!(base = ?self.bsgs.base(), "Base extended");
                    }

                    self.insert_level_generator(i, [residue]);

                    if extended {
                        queues.push(SchreierGeneratorQueue::new());
                    } else {
                        queues[i].invalidate();
                    }

                    i += 1;
                    continue 'levels;
                }
            }

            i -= 1;
        }
    }

    // Monte-Carlo loop: sift random elements from a product-replacement
    // generator until `w` consecutive draws sift to the identity.
    fn run_random<R: Rng>(&mut self, w: usize, rng: &mut R) {
        let mut randomizer = PrRandomizer::new(self.bsgs.strong_generators(), rng);

        let mut trivial_sifts = 0;
        while trivial_sifts < w {
            let candidate = randomizer.next_element();
            let (residue, level) = self.bsgs.strip(&candidate, 1);
            trace!(perm = %candidate, residue = %residue, level = level, "Stripped random element");

            let update = if level <= self.bsgs.base_size() {
                true
            } else if !residue.is_id() {
                self.push_level(&residue);
                debug!(base = ?self.bsgs.base(), "Base extended");
                true
            } else {
                false
            };

            if update {
                // the residue fixes every base point above its drop-out
                // level, so it belongs to each of those stabilizers
                for i in 1..level.min(self.bsgs.base_size() + 1) {
                    self.insert_level_generator(i, [residue.clone()]);
                }
                trivial_sifts = 0;
            } else {
                trivial_sifts += 1;
            }
        }
    }

    // Collect the union of transversal edge labels as the canonical strong
    // generating set.
    fn finish(mut self) -> Bsgs {
        let mut strong: PermSet = (0..self.bsgs.base_size())
            .flat_map(|i| self.bsgs.transversal(i).labels())
            .collect();
        strong.make_unique();

        debug!(order = %self.bsgs.order(), base = ?self.bsgs.base(), "Construction finished");
        self.bsgs.set_strong_generators(strong);
        self.bsgs
    }
}

impl Bsgs {
    /// Deterministic Schreier-Sims: builds a BSGS for the subgroup of
    /// `Sym(degree)` generated by `generators`.
    pub fn schreier_sims(degree: usize, generators: &PermSet) -> Result<Bsgs> {
        debug!(degree = degree, generators = %generators, "Executing Schreier-Sims algorithm");
        generators.assert_not_empty()?;

        let mut construction = Construction::init(degree, generators)?;
        construction.run_deterministic();
        Ok(construction.finish())
    }

    /// Monte-Carlo Schreier-Sims. Without a known order in `options` the
    /// result may be a proper subgroup with small probability; with one,
    /// wrong candidates are retried and finally corrected by the
    /// deterministic algorithm continuing from the candidate state.
    pub fn schreier_sims_random<R: Rng>(
        degree: usize,
        generators: &PermSet,
        options: &RandomOptions,
        rng: &mut R,
    ) -> Result<Bsgs> {
        debug!(degree = degree, generators = %generators, "Executing randomized Schreier-Sims algorithm");
        generators.assert_not_empty()?;

        match &options.known_order {
            None => {
                let mut construction = Construction::init(degree, generators)?;
                construction.run_random(options.w, rng);
                Ok(construction.finish())
            }

            Some(known_order) => {
                let mut candidate = None;
                for attempt in 0..=options.retries {
                    let mut construction = Construction::init(degree, generators)?;
                    construction.run_random(options.w, rng);

                    if construction.bsgs.order() == *known_order {
                        return Ok(construction.finish());
                    }

                    debug!(attempt = attempt, order = %construction.bsgs.order(), "Candidate order mismatch");
                    candidate = Some(construction);
                }

                // force correctness on the (likely near-complete) state
                debug!("Falling back to deterministic Schreier-Sims");
                let mut construction = candidate.expect("at least one attempt ran");
                construction.run_deterministic();
                Ok(construction.finish())
            }
        }
    }
}
