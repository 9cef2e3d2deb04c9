//! Architecture systems: a single graph or a cluster of subsystems.

use {
    super::{
        coloring::AutomKind,
        oracle::AutomorphismOracle,
        ArchGraph,
    },
    crate::{
        group::PermGroup,
        mapping::{
            min_elem_approx,
            min_elem_bruteforce,
            MappingMethod,
            MappingOptions,
            TaskAllocation,
            TaskMapping,
            TaskOrbits,
        },
        perm::{
            Perm,
            PermSet,
        },
        Error,
        Result,
    },
};

use tracing::debug;

/// A leaf architecture graph or a cluster of disjoint subsystems, each
/// with lazily computed and cached automorphisms.
///
/// The cache is reset by every mutation, so automorphisms are recomputed
/// at most once per topology.
#[derive(Debug, Clone)]
pub enum ArchSystem {
    Graph {
        graph: ArchGraph,
        automorphisms: Option<PermGroup>,
    },
    Cluster {
        subsystems: Vec<ArchSystem>,
        automorphisms: Option<PermGroup>,
    },
}

impl ArchSystem {
    pub fn from_graph(graph: ArchGraph) -> Self {
        Self::Graph {
            graph,
            automorphisms: None,
        }
    }

    pub fn cluster(subsystems: Vec<ArchSystem>) -> Self {
        Self::Cluster {
            subsystems,
            automorphisms: None,
        }
    }

    pub fn num_processors(&self) -> usize {
        match self {
            Self::Graph { graph, .. } => graph.num_processors(),
            Self::Cluster { subsystems, .. } => subsystems.iter().map(Self::num_processors).sum(),
        }
    }

    pub fn num_channels(&self) -> usize {
        match self {
            Self::Graph { graph, .. } => graph.num_channels(),
            Self::Cluster { subsystems, .. } => subsystems.iter().map(Self::num_channels).sum(),
        }
    }

    pub fn num_subsystems(&self) -> usize {
        match self {
            Self::Graph { .. } => 0,
            Self::Cluster { subsystems, .. } => subsystems.len(),
        }
    }

    /// Append a subsystem to a cluster.
    pub fn add_subsystem(&mut self, subsystem: ArchSystem) -> Result<()> {
        match self {
            Self::Graph { .. } => Err(Error::InvalidArgument("cannot add a subsystem to a leaf graph".into())),
            Self::Cluster {
                subsystems,
                automorphisms,
            } => {
                *automorphisms = None;
                subsystems.push(subsystem);
                Ok(())
            }
        }
    }

    /// Add a processing element to a leaf graph, resetting cached
    /// automorphisms.
    pub fn add_processor(&mut self, label: &str) -> Result<usize> {
        match self {
            Self::Cluster { .. } => Err(Error::InvalidArgument("cannot add a processor to a cluster".into())),
            Self::Graph { graph, automorphisms } => {
                *automorphisms = None;
                Ok(graph.add_processor_with_label(label))
            }
        }
    }

    /// Add a channel to a leaf graph, resetting cached automorphisms.
    pub fn add_channel(&mut self, from: usize, to: usize, label: &str) -> Result<()> {
        match self {
            Self::Cluster { .. } => Err(Error::InvalidArgument("cannot add a channel to a cluster".into())),
            Self::Graph { graph, automorphisms } => {
                *automorphisms = None;
                graph.add_channel_with_label(from, to, label);
                Ok(())
            }
        }
    }

    /// The automorphism group of this system, computed on first access.
    ///
    /// A cluster's group is the direct product of its subsystem groups,
    /// each embedded at its processor offset. Symmetries between equal
    /// subsystems are not detected.
    pub fn automorphisms<O>(&mut self, oracle: &mut O) -> Result<&PermGroup>
    where
        O: AutomorphismOracle,
    {
        match self {
            Self::Graph { graph, automorphisms } => {
                let group = match automorphisms.take() {
                    Some(group) => group,
                    None => graph.automorphisms(AutomKind::Total, oracle)?,
                };
                Ok(automorphisms.insert(group))
            }

            Self::Cluster {
                subsystems,
                automorphisms,
            } => {
                let group = match automorphisms.take() {
                    Some(group) => group,
                    None => {
                        let total: usize = subsystems.iter().map(Self::num_processors).sum();

                        let mut generators = PermSet::new();
                        let mut offset = 0;
                        for subsystem in subsystems.iter_mut() {
                            let degree = subsystem.num_processors();
                            let subgroup = subsystem.automorphisms(oracle)?;
                            for gen in subgroup.generators() {
                                generators.insert(gen.shifted(offset));
                            }
                            offset += degree;
                        }

                        if generators.is_empty() {
                            generators.insert(Perm::identity(total));
                        }

                        debug!(subsystems = subsystems.len(), total = total, "Combining cluster automorphisms");
                        PermGroup::new(total, &generators)?
                    }
                };
                Ok(automorphisms.insert(group))
            }
        }
    }

    /// Inverse semigroup of partial symmetries; not supported by these
    /// system variants.
    pub fn partial_automorphisms(&self) -> Result<PermGroup> {
        Err(Error::NotImplemented("partial automorphisms"))
    }

    /// Canonicalize `allocation` under this system's automorphisms.
    ///
    /// Entries must reference processors in `[offset, offset + n)`. With
    /// `use_orbit_cache` set and a cache supplied, allocations seen before
    /// are answered from the cache; every result is recorded in the cache
    /// when one is supplied.
    pub fn mapping<O>(
        &mut self,
        allocation: &[usize],
        offset: usize,
        options: &MappingOptions,
        mut orbits: Option<&mut TaskOrbits>,
        oracle: &mut O,
    ) -> Result<TaskMapping>
    where
        O: AutomorphismOracle,
    {
        let n = self.num_processors();
        for &task in allocation {
            if task < offset || task >= offset + n {
                return Err(Error::InvalidArgument(format!(
                    "allocation references processor {} outside [{}, {})",
                    task,
                    offset,
                    offset + n
                )));
            }
        }

        if options.use_orbit_cache {
            if let Some(cached) = orbits.as_deref().and_then(|o| o.canonical_of(allocation)) {
                debug!(allocation = ?allocation, "Answering mapping from orbit cache");
                return Ok(TaskMapping::new(allocation.to_vec(), cached.clone()));
            }
        }

        let representative = self.canonical_allocation(allocation, offset, options, oracle)?;
        debug!(allocation = ?allocation, representative = ?representative, "Mapped allocation");

        let mapping = TaskMapping::new(allocation.to_vec(), representative);
        if let Some(orbits) = orbits.as_deref_mut() {
            orbits.insert(&mapping);
        }
        Ok(mapping)
    }

    // Per-variant canonicalization. A cluster maps subsystem by subsystem
    // with accumulated offsets; entries outside a subsystem's window are
    // untouched by its group action, so the results concatenate.
    fn canonical_allocation<O>(
        &mut self,
        tasks: &[usize],
        offset: usize,
        options: &MappingOptions,
        oracle: &mut O,
    ) -> Result<TaskAllocation>
    where
        O: AutomorphismOracle,
    {
        match self {
            Self::Graph { .. } => {
                let group = self.automorphisms(oracle)?;
                Ok(match options.method {
                    MappingMethod::Bruteforce => min_elem_bruteforce(group, tasks, offset),
                    MappingMethod::Approximate => min_elem_approx(group, tasks, offset),
                })
            }

            Self::Cluster { subsystems, .. } => {
                let mut current = tasks.to_vec();
                let mut suboffset = offset;
                for subsystem in subsystems.iter_mut() {
                    let degree = subsystem.num_processors();
                    current = subsystem.canonical_allocation(&current, suboffset, options, oracle)?;
                    suboffset += degree;
                }
                Ok(current)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::arch::BacktrackOracle,
        num::BigUint,
    };

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
    fn leaf_automorphisms_are_cached_until_mutation() {
        let mut system = ArchSystem::from_graph(ring(4));
        let mut oracle = BacktrackOracle;

        let order = system.automorphisms(&mut oracle).unwrap().order();
        assert_eq!(order, BigUint::from(8u8));

        // the ring with a chord loses almost all symmetry
        system.add_channel(0, 2, "link").unwrap();
        let order = system.automorphisms(&mut oracle).unwrap().order();
        assert_eq!(order, BigUint::from(4u8));
    }

    #[test]
    fn cluster_group_is_the_direct_product() {
        let mut cluster = ArchSystem::cluster(vec![
            ArchSystem::from_graph(ring(4)),
            ArchSystem::from_graph(ring(4)),
        ]);
        let mut oracle = BacktrackOracle;

        let group = cluster.automorphisms(&mut oracle).unwrap();
        assert_eq!(group.degree(), 8);
        assert_eq!(group.order(), BigUint::from(64u8));
    }

    #[test]
    fn subsystem_bookkeeping() {
        let mut cluster = ArchSystem::cluster(vec![ArchSystem::from_graph(ring(3))]);
        assert_eq!(cluster.num_subsystems(), 1);
        cluster.add_subsystem(ArchSystem::from_graph(ring(4))).unwrap();
        assert_eq!(cluster.num_subsystems(), 2);
        assert_eq!(cluster.num_processors(), 7);
        assert_eq!(cluster.num_channels(), 7);

        let mut leaf = ArchSystem::from_graph(ring(3));
        assert!(leaf.add_subsystem(ArchSystem::from_graph(ring(3))).is_err());
        assert!(cluster.add_processor("pe").is_err());
    }

    #[test]
    fn partial_automorphisms_are_not_implemented() {
        let system = ArchSystem::from_graph(ring(3));
        assert!(matches!(system.partial_automorphisms(), Err(Error::NotImplemented(_))));
    }

    #[test]
    fn mapping_validates_the_allocation_range() {
        let mut system = ArchSystem::from_graph(ring(4));
        let mut oracle = BacktrackOracle;
        let result = system.mapping(&[0, 4], 0, &MappingOptions::default(), None, &mut oracle);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn mapping_canonicalizes_ring_rotations() {
        let mut system = ArchSystem::from_graph(ring(4));
        let mut oracle = BacktrackOracle;
        let options = MappingOptions::default();

        let a = system.mapping(&[0, 1, 2, 3], 0, &options, None, &mut oracle).unwrap();
        let b = system.mapping(&[1, 2, 3, 0], 0, &options, None, &mut oracle).unwrap();
        let c = system.mapping(&[3, 2, 1, 0], 0, &options, None, &mut oracle).unwrap();

        assert!(a.equivalent(&b));
        assert!(a.equivalent(&c));
        assert_eq!(a.representative(), &vec![0, 1, 2, 3]);
    }

    #[test]
    fn orbit_cache_answers_repeat_queries() {
        let mut system = ArchSystem::from_graph(ring(4));
        let mut oracle = BacktrackOracle;
        let options = MappingOptions {
            use_orbit_cache: true,
            ..MappingOptions::default()
        };
        let mut orbits = TaskOrbits::new();

        let first = system
            .mapping(&[3, 2, 1, 0], 0, &options, Some(&mut orbits), &mut oracle)
            .unwrap();
        assert_eq!(orbits.num_orbits(), 1);

        // same allocation again: resolved by lookup, same representative
        let second = system
            .mapping(&[3, 2, 1, 0], 0, &options, Some(&mut orbits), &mut oracle)
            .unwrap();
        assert!(first.equivalent(&second));
        assert_eq!(orbits.num_orbits(), 1);
    }
}
