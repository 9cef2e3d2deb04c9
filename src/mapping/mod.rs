//! Canonical representatives of task allocations under a permutation group.

use {
    crate::{
        group::PermGroup,
        perm::Perm,
        DetHashMap,
        DetHashSet,
    },
};

use tracing::trace;

/// A task-to-processor assignment: one processor index per task.
pub type TaskAllocation = Vec<usize>;

/// How to find the minimum orbit element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingMethod {
    /// Enumerate the whole group; exact, `O(|G| * tasks)`.
    Bruteforce,
    /// Greedy level-by-level coset traversal; a local minimum that is
    /// cheap on large groups and exact when the action is sufficiently
    /// transitive.
    Approximate,
}

#[derive(Debug, Clone, Copy)]
pub struct MappingOptions {
    pub method: MappingMethod,
    /// Consult the orbit cache before canonicalizing.
    pub use_orbit_cache: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            method: MappingMethod::Bruteforce,
            use_orbit_cache: false,
        }
    }
}

/// An allocation together with the canonical representative of its orbit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMapping {
    allocation: TaskAllocation,
    representative: TaskAllocation,
}

impl TaskMapping {
    pub fn new(allocation: TaskAllocation, representative: TaskAllocation) -> Self {
        Self {
            allocation,
            representative,
        }
    }

    pub fn allocation(&self) -> &TaskAllocation {
        &self.allocation
    }

    pub fn representative(&self) -> &TaskAllocation {
        &self.representative
    }

    /// Two allocations are equivalent iff their orbits coincide, i.e.
    /// their canonical representatives are equal.
    pub fn equivalent(&self, other: &TaskMapping) -> bool {
        self.representative == other.representative
    }
}

/// Image of `tasks` under `perm` acting on the processor window
/// `[offset, offset + degree)`; entries outside the window pass through
/// unchanged, which is what lets a cluster map per-subsystem.
pub fn permuted(tasks: &[usize], perm: &Perm, offset: usize, degree: usize) -> TaskAllocation {
    tasks
        .iter()
        .map(|&t| {
            if t >= offset && t < offset + degree {
                perm.apply(t - offset + 1) - 1 + offset
            } else {
                t
            }
        })
        .collect()
}

/// Exact minimum orbit element: track the running minimum over the images
/// under every group element.
pub fn min_elem_bruteforce(group: &PermGroup, tasks: &[usize], offset: usize) -> TaskAllocation {
    let degree = group.degree();
    let mut min = tasks.to_vec();

    for element in group.elements() {
        let candidate = permuted(tasks, &element, offset, degree);
        if candidate < min {
            min = candidate;
        }
    }

    trace!(representative = ?min, "Minimum orbit element (bruteforce)");
    min
}

/// Approximate minimum orbit element by greedy coset traversal: per level,
/// apply the transversal representative whose image of the current
/// allocation is smallest, ties going to the lexicographically smaller
/// representative.
pub fn min_elem_approx(group: &PermGroup, tasks: &[usize], offset: usize) -> TaskAllocation {
    let bsgs = group.bsgs();
    let degree = group.degree();
    let mut current = tasks.to_vec();

    for level in 0..bsgs.base_size() {
        let mut best: Option<(TaskAllocation, Vec<usize>)> = None;

        for rep in bsgs.transversal_reps(level) {
            let candidate = permuted(&current, &rep, offset, degree);
            let rep_images: Vec<usize> = (1..=degree).map(|x| rep.apply(x)).collect();

            let replace = match &best {
                None => true,
                Some((best_candidate, best_images)) => {
                    candidate < *best_candidate || (candidate == *best_candidate && rep_images < *best_images)
                }
            };
            if replace {
                best = Some((candidate, rep_images));
            }
        }

        if let Some((winner, _)) = best {
            current = winner;
        }
    }

    trace!(representative = ?current, "Minimum orbit element (approximate)");
    current
}

/// Cache of already canonicalized allocations, keyed by representative.
///
/// Answers "have I seen an equivalent allocation" without recomputing the
/// orbit minimum.
#[derive(Debug, Clone, Default)]
pub struct TaskOrbits {
    orbits: DetHashMap<TaskAllocation, DetHashSet<TaskAllocation>>,
    // any seen allocation -> its representative
    index: DetHashMap<TaskAllocation, TaskAllocation>,
}

impl TaskOrbits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mapping; returns whether its representative was new.
    pub fn insert(&mut self, mapping: &TaskMapping) -> bool {
        let representative = mapping.representative().clone();
        let is_new = !self.orbits.contains_key(&representative);

        self.orbits
            .entry(representative.clone())
            .or_default()
            .insert(mapping.allocation().clone());

        self.index.insert(mapping.allocation().clone(), representative.clone());
        self.index.insert(representative.clone(), representative);

        is_new
    }

    /// The representative of an allocation seen before, if any.
    pub fn canonical_of(&self, allocation: &[usize]) -> Option<&TaskAllocation> {
        self.index.get(allocation)
    }

    pub fn is_representative(&self, allocation: &[usize]) -> bool {
        self.orbits.contains_key(allocation)
    }

    pub fn num_orbits(&self) -> usize {
        self.orbits.len()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::perm::PermSet,
    };

    fn ring_group() -> PermGroup {
        // D_4 on the vertices of a 4-ring
        let gens: PermSet = vec![
            Perm::from_cycles(4, &[vec![1, 2, 3, 4]]),
            Perm::from_cycles(4, &[vec![2, 4]]),
        ]
        .into();
        PermGroup::new(4, &gens).unwrap()
    }

    #[test]
    fn window_action_fixes_outside_entries() {
        let swap = Perm::from_cycles(2, &[vec![1, 2]]);
        assert_eq!(permuted(&[4, 5, 2], &swap, 4, 2), vec![5, 4, 2]);
    }

    #[test]
    fn bruteforce_minimum_is_canonical() {
        let group = ring_group();
        let min = min_elem_bruteforce(&group, &[3, 2, 1, 0], 0);
        assert_eq!(min, vec![0, 1, 2, 3]);

        // idempotence
        assert_eq!(min_elem_bruteforce(&group, &min, 0), min);
    }

    #[test]
    fn equivalent_allocations_share_a_representative() {
        let group = ring_group();
        let a = min_elem_bruteforce(&group, &[0, 1, 2, 3], 0);
        let b = min_elem_bruteforce(&group, &[1, 2, 3, 0], 0);
        let c = min_elem_bruteforce(&group, &[3, 2, 1, 0], 0);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn bruteforce_minimum_is_in_the_orbit() {
        let group = ring_group();
        let tasks = vec![2, 0, 3, 1];
        let min = min_elem_bruteforce(&group, &tasks, 0);
        let found = group
            .elements()
            .any(|element| permuted(&tasks, &element, 0, group.degree()) == min);
        assert!(found);
    }

    #[test]
    fn approx_agrees_with_bruteforce_on_the_ring() {
        let group = ring_group();
        for tasks in [vec![3, 2, 1, 0], vec![1, 2, 3, 0], vec![2, 2, 0, 1]] {
            let exact = min_elem_bruteforce(&group, &tasks, 0);
            let approx = min_elem_approx(&group, &tasks, 0);
            assert!(approx >= exact);
            assert!(group
                .elements()
                .any(|element| permuted(&tasks, &element, 0, group.degree()) == approx));
        }
    }

    #[test]
    fn orbit_cache_tracks_representatives() {
        let group = ring_group();
        let mut orbits = TaskOrbits::new();

        let first = TaskMapping::new(vec![3, 2, 1, 0], min_elem_bruteforce(&group, &[3, 2, 1, 0], 0));
        assert!(orbits.insert(&first));

        let second = TaskMapping::new(vec![0, 1, 2, 3], min_elem_bruteforce(&group, &[0, 1, 2, 3], 0));
        assert!(!orbits.insert(&second));

        assert_eq!(orbits.num_orbits(), 1);
        assert!(orbits.is_representative(&[0, 1, 2, 3]));
        assert_eq!(orbits.canonical_of(&[3, 2, 1, 0]), Some(&vec![0, 1, 2, 3]));
        assert_eq!(orbits.canonical_of(&[2, 2, 2, 2]), None);
    }
}
