//! Vertex-colored graph encodings consumed by the automorphism oracle.
//!
//! Channel types cannot be expressed directly in a vertex-colored graph, so
//! the edge-colored architecture graph is layered: `floor(log2(#channel
//! types)) + 1` copies of the vertex set, vertically connected, with an
//! edge of type `t` replicated in every layer whose bit in `t + 1` is set.

use {
    super::ArchGraph,
    crate::{
        perm::{
            Perm,
            PermSet,
        },
        Error,
        Result,
    },
};

use tracing::trace;

/// Which symmetries of the architecture to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomKind {
    /// Permutations preserving processor types, ignoring channel types.
    Processors,
    /// Permutations preserving channel types, ignoring processor types.
    Channels,
    /// Permutations preserving both.
    Total,
}

/// A vertex-colored undirected graph in the oracle's input format.
///
/// The color partition follows the `(lab, ptn)` encoding of canonical
/// labeling tools: `lab` lists the vertices cell by cell, and `ptn[i]` is
/// `true` while the cell containing `lab[i]` continues at `i + 1`.
#[derive(Debug, Clone)]
pub struct ColoredGraph {
    pub num_vertices: usize,
    /// Vertices of the underlying architecture; layered encodings append
    /// copies above this range.
    pub num_original: usize,
    pub edges: Vec<(usize, usize)>,
    pub lab: Vec<usize>,
    pub ptn: Vec<bool>,
}

impl ColoredGraph {
    /// Decode `(lab, ptn)` into explicit color classes.
    pub fn color_classes(&self) -> Vec<Vec<usize>> {
        let mut classes = Vec::new();
        let mut current = Vec::new();
        for (i, &v) in self.lab.iter().enumerate() {
            current.push(v);
            if !self.ptn[i] {
                classes.push(std::mem::take(&mut current));
            }
        }
        classes
    }
}

/// Encode `graph` for the oracle according to the requested kind.
pub fn build(graph: &ArchGraph, kind: AutomKind) -> ColoredGraph {
    match kind {
        AutomKind::Processors => build_flat(graph),
        AutomKind::Channels => build_layered(graph, false),
        AutomKind::Total => build_layered(graph, true),
    }
}

// One vertex per processor, colored by processor type; channel types are
// dropped.
fn build_flat(graph: &ArchGraph) -> ColoredGraph {
    let n = graph.num_processors();

    let edges = graph.channels().iter().map(|&(from, to, _)| (from, to)).collect();

    let (lab, ptn) = partition_by_processor_type(graph, 0, n);

    trace!(vertices = n, "Constructed flat colored graph");
    ColoredGraph {
        num_vertices: n,
        num_original: n,
        edges,
        lab,
        ptn,
    }
}

// Layered encoding for channel-type-aware automorphisms. With
// `type_partition` set, each layer is additionally partitioned by
// processor type (total automorphisms); otherwise each layer is a single
// color class (channel automorphisms).
fn build_layered(graph: &ArchGraph, type_partition: bool) -> ColoredGraph {
    let n_orig = graph.num_processors();
    let levels = layer_count(graph.num_channel_types());
    let n = n_orig * levels;

    let mut edges = Vec::new();

    for level in 0..levels {
        // vertical edges between layer copies of the same processor
        if level > 0 {
            for v in 0..n_orig {
                edges.push((v + level * n_orig, v + (level - 1) * n_orig));
            }
        }

        // horizontal edges: an edge of type t appears in every layer whose
        // bit in t + 1 is set
        for &(from, to, ct) in graph.channels() {
            if (ct + 1) & (1 << level) != 0 {
                edges.push((from + level * n_orig, to + level * n_orig));
            }
        }
    }

    let mut lab = Vec::with_capacity(n);
    let mut ptn = Vec::with_capacity(n);

    for level in 0..levels {
        if type_partition {
            let (mut level_lab, mut level_ptn) = partition_by_processor_type(graph, level * n_orig, n_orig);
            lab.append(&mut level_lab);
            ptn.append(&mut level_ptn);
        } else {
            // the whole layer is one color class
            for v in 0..n_orig {
                lab.push(v + level * n_orig);
                ptn.push(v + 1 != n_orig);
            }
        }
    }

    trace!(vertices = n, levels = levels, "Constructed layered colored graph");
    ColoredGraph {
        num_vertices: n,
        num_original: n_orig,
        edges,
        lab,
        ptn,
    }
}

// floor(log2(channel_types)) + 1 layers; a graph without channel types
// still gets one layer.
fn layer_count(channel_types: usize) -> usize {
    let mut cts = channel_types;
    let mut log2 = 0;
    loop {
        cts >>= 1;
        if cts == 0 {
            break;
        }
        log2 += 1;
    }
    log2 + 1
}

// Group `count` vertices starting at `base` into contiguous cells by
// processor type, with the partition break on each cell's last member.
fn partition_by_processor_type(graph: &ArchGraph, base: usize, count: usize) -> (Vec<usize>, Vec<bool>) {
    let types = graph.num_processor_types();

    let mut offsets = Vec::with_capacity(types);
    let mut accumulated = 0;
    for pt in 0..types {
        offsets.push(accumulated);
        accumulated += graph.processor_type_instances(pt);
    }

    let mut counters = vec![0usize; types];
    let mut lab = vec![0; count];
    let mut ptn = vec![false; count];

    for v in 0..count {
        let pt = graph.processor_type(v);
        let offs = offsets[pt] + counters[pt];
        counters[pt] += 1;

        lab[offs] = v + base;
        ptn[offs] = counters[pt] != graph.processor_type_instances(pt);
    }

    (lab, ptn)
}

/// Project oracle output back onto the processors: each returned
/// permutation restricted to the original vertex range. Non-permutations
/// and layer-mixing maps are structural errors on the oracle's side.
pub fn project_generators(colored: &ColoredGraph, raw: Vec<Perm>) -> Result<PermSet> {
    let n_orig = colored.num_original;
    let mut generators = PermSet::new();

    for perm in raw {
        if perm.degree() > colored.num_vertices {
            return Err(Error::InvariantViolation(format!(
                "oracle permutation of degree {} on a graph with {} vertices",
                perm.degree(),
                colored.num_vertices
            )));
        }

        let mut images = Vec::with_capacity(n_orig);
        let mut seen = vec![false; n_orig];
        for point in 1..=n_orig {
            let image = perm.apply(point);
            if image < 1 || image > n_orig || seen[image - 1] {
                return Err(Error::InvariantViolation(
                    "oracle permutation does not restrict to the processor vertices".into(),
                ));
            }
            seen[image - 1] = true;
            images.push(image);
        }

        let projected = Perm::from_images_unchecked(images);
        if !projected.is_id() {
            generators.insert(projected);
        }
    }

    generators.make_unique();
    Ok(generators)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize) -> ArchGraph {
        let mut graph = ArchGraph::new();
        for _ in 0..n {
            graph.add_processor_with_label("pe");
        }
        for v in 0..n {
            graph.add_channel_with_label(v, (v + 1) % n, "link");
        }
        graph
    }

    #[test]
    fn flat_encoding_keeps_the_vertex_count() {
        let colored = build(&ring(4), AutomKind::Processors);
        assert_eq!(colored.num_vertices, 4);
        assert_eq!(colored.num_original, 4);
        assert_eq!(colored.edges.len(), 4);
        assert_eq!(colored.color_classes(), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn layer_counts_follow_the_type_count() {
        assert_eq!(layer_count(0), 1);
        assert_eq!(layer_count(1), 1);
        assert_eq!(layer_count(2), 2);
        assert_eq!(layer_count(3), 2);
        assert_eq!(layer_count(4), 3);
    }

    #[test]
    fn layered_encoding_replicates_edges_by_type_bits() {
        let mut graph = ring(3);
        // second channel type forces two layers
        graph.add_channel_with_label(0, 2, "fast");

        let colored = build(&graph, AutomKind::Channels);
        assert_eq!(colored.num_vertices, 6);
        assert_eq!(colored.num_original, 3);

        // type 0 ("link", bit pattern 1) lives in layer 0 only; type 1
        // ("fast", bit pattern 10) in layer 1 only; plus 3 vertical edges
        let layer0 = colored.edges.iter().filter(|(a, b)| *a < 3 && *b < 3).count();
        let layer1 = colored.edges.iter().filter(|(a, b)| *a >= 3 && *b >= 3).count();
        let vertical = colored.edges.iter().filter(|(a, b)| (*a < 3) != (*b < 3)).count();
        assert_eq!(layer0, 3);
        assert_eq!(layer1, 1);
        assert_eq!(vertical, 3);

        // one color class per layer
        assert_eq!(colored.color_classes().len(), 2);
    }

    #[test]
    fn total_encoding_partitions_each_layer_by_type() {
        let mut graph = ArchGraph::new();
        graph.add_processor_with_label("cpu");
        graph.add_processor_with_label("gpu");
        graph.add_channel_with_label(0, 1, "a");
        graph.add_channel_with_label(0, 1, "b");

        let colored = build(&graph, AutomKind::Total);
        assert_eq!(colored.num_vertices, 4);
        assert_eq!(colored.color_classes().len(), 4);
    }

    #[test]
    fn projection_rejects_layer_mixing() {
        let colored = build(&ring(2), AutomKind::Processors);
        // degree 2 graph; this "automorphism" maps vertex 1 out of range
        let bogus = Perm::from_images(&[3, 2, 1]);
        assert!(matches!(
            project_generators(&colored, vec![bogus]),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn projection_drops_identities_and_duplicates() {
        let colored = build(&ring(4), AutomKind::Processors);
        let swap = Perm::from_cycles(4, &[vec![1, 2], vec![3, 4]]);
        let projected = project_generators(
            &colored,
            vec![Perm::identity(4), swap.clone(), swap.clone()],
        )
        .unwrap();
        assert_eq!(projected.len(), 1);
        assert!(projected.contains(&swap));
    }
}
