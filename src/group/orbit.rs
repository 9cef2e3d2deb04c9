//! Orbit computation by breadth-first closure.

use {
    crate::{
        perm::PermSet,
        DetHashSet,
    },
    std::collections::VecDeque,
};

/// The orbit of `beta` under `generators`: the least set containing `beta`
/// that is closed under applying every generator. Returned in breadth-first
/// discovery order, `beta` first.
pub fn orbit(beta: usize, generators: &PermSet) -> Vec<usize> {
    let mut discovered = DetHashSet::default();
    discovered.insert(beta);

    let mut order = vec![beta];
    let mut queue = VecDeque::from([beta]);

    while let Some(p) = queue.pop_front() {
        for gen in generators {
            let image = gen.apply(p);
            if discovered.insert(image) {
                order.push(image);
                queue.push_back(image);
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::perm::Perm,
    };

    #[test]
    fn orbit_of_fixed_point_is_singleton() {
        let gens: PermSet = vec![Perm::from_cycles(5, &[vec![1, 2]])].into();
        assert_eq!(orbit(4, &gens), vec![4]);
    }

    #[test]
    fn orbit_is_closed_under_generators() {
        let gens: PermSet = vec![
            Perm::from_cycles(6, &[vec![1, 2, 3]]),
            Perm::from_cycles(6, &[vec![3, 4]]),
        ]
        .into();
        let points = orbit(1, &gens);
        assert_eq!(points.len(), 4);
        for &p in &points {
            for g in &gens {
                assert!(points.contains(&g.apply(p)));
            }
        }
    }

    #[test]
    fn discovery_order_starts_at_the_seed() {
        let gens: PermSet = vec![Perm::from_cycles(4, &[vec![1, 2, 3, 4]])].into();
        assert_eq!(orbit(2, &gens), vec![2, 3, 4, 1]);
    }
}
