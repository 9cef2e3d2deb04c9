//! The graph-automorphism seam.
//!
//! Automorphism extraction itself is a black box behind
//! [`AutomorphismOracle`]; production deployments plug in a canonical
//! labeling tool, while [`BacktrackOracle`] is a self-contained exhaustive
//! search good enough for moderate architectures and for tests.

use {
    super::coloring::ColoredGraph,
    crate::{
        perm::Perm,
        DetHashSet,
        Result,
    },
};

use tracing::trace;

/// Computes generators of the automorphism group of a vertex-colored
/// graph, as permutations of `1..=num_vertices`.
pub trait AutomorphismOracle {
    fn automorphisms(&mut self, graph: &ColoredGraph) -> Result<Vec<Perm>>;
}

/// Exhaustive backtracking over color-preserving vertex bijections,
/// pruning on adjacency mismatches. Returns every automorphism, which is
/// in particular a (highly redundant) generating set.
#[derive(Debug, Default)]
pub struct BacktrackOracle;

impl AutomorphismOracle for BacktrackOracle {
    fn automorphisms(&mut self, graph: &ColoredGraph) -> Result<Vec<Perm>> {
        let n = graph.num_vertices;

        // vertex -> color id
        let mut color = vec![0; n];
        for (id, class) in graph.color_classes().into_iter().enumerate() {
            for v in class {
                color[v] = id;
            }
        }

        // undirected adjacency, multi-edges collapsed
        let mut adjacency = DetHashSet::default();
        for &(a, b) in &graph.edges {
            adjacency.insert((a.min(b), a.max(b)));
        }

        let mut search = Search {
            n,
            color: &color,
            adjacency: &adjacency,
            assignment: vec![usize::MAX; n],
            used: vec![false; n],
            found: Vec::new(),
        };
        search.descend(0);

        trace!(count = search.found.len(), vertices = n, "Backtracking search finished");
        Ok(search.found)
    }
}

struct Search<'a> {
    n: usize,
    color: &'a [usize],
    adjacency: &'a DetHashSet<(usize, usize)>,
    assignment: Vec<usize>,
    used: Vec<bool>,
    found: Vec<Perm>,
}

impl Search<'_> {
    fn descend(&mut self, v: usize) {
        if v == self.n {
            // 0-based assignment to a 1-based permutation
            let images: Vec<usize> = self.assignment.iter().map(|&w| w + 1).collect();
            self.found.push(Perm::from_images_unchecked(images));
            return;
        }

        for w in 0..self.n {
            if self.used[w] || self.color[w] != self.color[v] {
                continue;
            }
            if !self.compatible(v, w) {
                continue;
            }

            self.assignment[v] = w;
            self.used[w] = true;
            self.descend(v + 1);
            self.used[w] = false;
            self.assignment[v] = usize::MAX;
        }
    }

    // mapping v -> w must preserve (non-)adjacency towards every already
    // assigned vertex
    fn compatible(&self, v: usize, w: usize) -> bool {
        for u in 0..v {
            let mapped = self.assignment[u];
            let edge = self.adjacency.contains(&(u.min(v), u.max(v)));
            let mapped_edge = self.adjacency.contains(&(mapped.min(w), mapped.max(w)));
            if edge != mapped_edge {
                return false;
            }
        }
        // self loops must map to self loops
        let has_loop = self.adjacency.contains(&(v, v));
        let image_loop = self.adjacency.contains(&(w, w));
        has_loop == image_loop
    }
}
