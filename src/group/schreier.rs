//! Schreier trees: orbit transversals stored as labeled rooted trees.

use {
    crate::{
        perm::{
            Perm,
            PermSet,
        },
        DetHashMap,
    },
    std::collections::VecDeque,
};

use tracing::trace;

/// A rooted labeled tree on a subset of `{1..n}`.
///
/// The root is a base point `b`. Every non-root node `p` stores its parent
/// `q` and the generator `g` that discovered it, with `g(q) = p`; walking
/// the path to the root therefore reconstructs a coset representative
/// `u_p` mapping `b` to `p`. Grown monotonically by [`SchreierTree::extend`]
/// and replaced wholesale whenever a level's generator set changes.
#[derive(Debug, Clone)]
pub struct SchreierTree {
    root: usize,
    // point -> (parent, label), with label(parent) == point
    edges: DetHashMap<usize, (usize, Perm)>,
    // discovery order, root first; doubles as the ordered orbit
    order: Vec<usize>,
}

impl SchreierTree {
    pub fn new(root: usize) -> Self {
        Self {
            root,
            edges: DetHashMap::default(),
            order: vec![root],
        }
    }

    /// Build the full tree for the orbit of `root` under `generators`.
    pub fn from_generators(root: usize, generators: &PermSet) -> Self {
        let mut tree = Self::new(root);
        tree.extend(generators);
        tree
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn contains(&self, p: usize) -> bool {
        p == self.root || self.edges.contains_key(&p)
    }

    /// Number of points reachable from the root, i.e. the orbit size.
    pub fn size(&self) -> usize {
        self.order.len()
    }

    /// The orbit in discovery order, root first.
    pub fn points(&self) -> &[usize] {
        &self.order[..]
    }

    pub fn parent(&self, p: usize) -> Option<usize> {
        self.edges.get(&p).map(|(parent, _)| *parent)
    }

    pub fn label_from_parent(&self, p: usize) -> Option<&Perm> {
        self.edges.get(&p).map(|(_, label)| label)
    }

    /// The coset representative `u_p` with `u_p(root) = p`, or `None` if
    /// `p` is not in the tree.
    pub fn path_product(&self, p: usize) -> Option<Perm> {
        if !self.contains(p) {
            return None;
        }

        let mut product = Perm::id();
        let mut current = p;
        while current != self.root {
            let (parent, label) = &self.edges[&current];
            product = label.multiply(&product);
            current = *parent;
        }
        Some(product)
    }

    /// Grow the tree by breadth-first closure of the current node set
    /// under `generators`.
    pub fn extend(&mut self, generators: &PermSet) {
        let mut queue: VecDeque<usize> = self.order.iter().cloned().collect();

        while let Some(p) = queue.pop_front() {
            for gen in generators {
                let image = gen.apply(p);
                if !self.contains(image) {
                    trace!(point = image, parent = p, "Discovered orbit point");
                    self.edges.insert(image, (p, gen.clone()));
                    self.order.push(image);
                    queue.push_back(image);
                }
            }
        }
    }

    /// The distinct generators stored on some edge, in discovery order.
    pub fn labels(&self) -> PermSet {
        let mut labels: PermSet = self
            .order
            .iter()
            .filter_map(|p| self.edges.get(p).map(|(_, label)| label.clone()))
            .collect();
        labels.make_unique();
        labels
    }
}
