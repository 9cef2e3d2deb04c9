//! Lazy enumeration of Schreier generators for one stabilizer level.

use {
    crate::{
        group::schreier::SchreierTree,
        perm::{
            Perm,
            PermSet,
        },
    },
};

use tracing::trace;

/// Enumerates the Schreier generators `u_p * s * u_{s(p)}^-1` over all
/// pairs of an orbit point `p` and a level generator `s`.
///
/// The queue snapshots the level state it was last updated with and walks
/// a cursor over the `orbit x generators` rectangle, so repeated
/// [`update`] calls with an unchanged level never re-emit pairs the
/// construction loop has already examined. [`invalidate`] (or a
/// structurally changed level) re-snapshots and starts the enumeration
/// over against the new transversal.
///
/// [`update`]: SchreierGeneratorQueue::update
/// [`invalidate`]: SchreierGeneratorQueue::invalidate
#[derive(Debug)]
pub struct SchreierGeneratorQueue {
    generators: Vec<Perm>,
    orbit: Vec<usize>,
    tree: SchreierTree,
    point_cursor: usize,
    gen_cursor: usize,
    dirty: bool,
}

impl SchreierGeneratorQueue {
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
            orbit: Vec::new(),
            tree: SchreierTree::new(0),
            point_cursor: 0,
            gen_cursor: 0,
            dirty: true,
        }
    }

    /// Force a re-snapshot on the next call to
    /// [`SchreierGeneratorQueue::update`].
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Adopt the level state `(generators, orbit, tree)`, restarting the
    /// enumeration only if the queue was invalidated or the state differs
    /// from the last snapshot.
    pub fn update(&mut self, generators: &PermSet, orbit: &[usize], tree: &SchreierTree) {
        let changed = self.generators.len() != generators.len() || self.orbit != orbit;
        if !self.dirty && !changed {
            return;
        }

        trace!(gens = generators.len(), orbit = orbit.len(), "Rebuilding Schreier generator queue");
        self.generators = generators.iter().cloned().collect();
        self.orbit = orbit.to_vec();
        self.tree = tree.clone();
        self.point_cursor = 0;
        self.gen_cursor = 0;
        self.dirty = false;
    }

    /// The next non-identity Schreier generator, or `None` once every
    /// `(point, generator)` pair of the current snapshot is exhausted.
    pub fn next_generator(&mut self) -> Option<Perm> {
        while self.point_cursor < self.orbit.len() {
            let p = self.orbit[self.point_cursor];

            while self.gen_cursor < self.generators.len() {
                let s = &self.generators[self.gen_cursor];
                self.gen_cursor += 1;

                let u_p = self.tree.path_product(p).expect("orbit point in tree");
                let u_ps = self
                    .tree
                    .path_product(s.apply(p))
                    .expect("orbit closed under generators");

                let schreier_generator = u_p.multiply(s).divide(&u_ps);
                if schreier_generator.is_id() {
                    continue;
                }
                return Some(schreier_generator);
            }

            self.gen_cursor = 0;
            self.point_cursor += 1;
        }

        None
    }
}

impl Default for SchreierGeneratorQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(gens: Vec<Perm>) -> (PermSet, SchreierTree) {
        let set: PermSet = gens.into();
        let tree = SchreierTree::from_generators(1, &set);
        (set, tree)
    }

    #[test]
    fn schreier_generators_stabilize_the_root() {
        let (gens, tree) = level(vec![
            Perm::from_cycles(4, &[vec![1, 2, 3, 4]]),
            Perm::from_cycles(4, &[vec![1, 2]]),
        ]);

        let mut queue = SchreierGeneratorQueue::new();
        queue.update(&gens, tree.points(), &tree);

        let mut count = 0;
        while let Some(sg) = queue.next_generator() {
            assert_eq!(sg.apply(1), 1);
            assert!(!sg.is_id());
            count += 1;
        }
        assert!(count > 0);
    }

    #[test]
    fn unchanged_updates_do_not_restart_the_enumeration() {
        let (gens, tree) = level(vec![
            Perm::from_cycles(4, &[vec![1, 2, 3, 4]]),
            Perm::from_cycles(4, &[vec![1, 2]]),
        ]);

        let mut queue = SchreierGeneratorQueue::new();
        queue.update(&gens, tree.points(), &tree);
        while queue.next_generator().is_some() {}

        // the construction loop calls update on every pass; same state
        // must not re-emit exhausted pairs
        queue.update(&gens, tree.points(), &tree);
        assert!(queue.next_generator().is_none());
    }

    #[test]
    fn invalidation_restarts_against_the_new_state() {
        let small = Perm::from_cycles(4, &[vec![1, 2]]);
        let (gens, tree) = level(vec![small.clone()]);

        let mut queue = SchreierGeneratorQueue::new();
        queue.update(&gens, tree.points(), &tree);
        while queue.next_generator().is_some() {}

        let mut grown: PermSet = vec![small, Perm::from_cycles(4, &[vec![1, 2, 3, 4]])].into();
        grown.make_unique();
        let grown_tree = SchreierTree::from_generators(1, &grown);

        queue.invalidate();
        queue.update(&grown, grown_tree.points(), &grown_tree);

        let emitted: Vec<Perm> = std::iter::from_fn(|| queue.next_generator()).collect();
        assert!(!emitted.is_empty());
        for sg in emitted {
            assert_eq!(sg.apply(1), 1);
        }
    }
}
