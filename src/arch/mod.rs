//! Architecture graphs: processing elements connected by typed channels.

pub mod coloring;
pub mod json;
pub mod oracle;
pub mod system;

pub use {
    coloring::{
        AutomKind,
        ColoredGraph,
    },
    oracle::{
        AutomorphismOracle,
        BacktrackOracle,
    },
    system::ArchSystem,
};

use crate::{
    group::PermGroup,
    DetHashMap,
    Error,
    Result,
};

use tracing::debug;

/// Interned processor type id.
pub type ProcessorType = usize;
/// Interned channel type id.
pub type ChannelType = usize;

/// An architecture graph: vertices are processing elements colored by
/// processor type, edges are channels colored by channel type.
///
/// Vertices are indexed `0..num_processors()`; the permutation layer sees
/// them shifted to `1..=n`.
#[derive(Debug, Clone, Default)]
pub struct ArchGraph {
    directed: bool,
    processor_types: Vec<String>,
    channel_types: Vec<String>,
    processor_type_instances: Vec<usize>,
    // vertex -> processor type
    processors: Vec<ProcessorType>,
    // (from, to, channel type)
    channels: Vec<(usize, usize, ChannelType)>,
}

impl ArchGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_directed() -> Self {
        Self {
            directed: true,
            ..Self::default()
        }
    }

    pub fn directed(&self) -> bool {
        self.directed
    }

    pub fn new_processor_type(&mut self, label: &str) -> ProcessorType {
        let id = self.processor_types.len();
        self.processor_types.push(label.to_owned());
        self.processor_type_instances.push(0);
        id
    }

    pub fn new_channel_type(&mut self, label: &str) -> ChannelType {
        let id = self.channel_types.len();
        self.channel_types.push(label.to_owned());
        id
    }

    /// Add a processing element of an existing type, returning its vertex.
    pub fn add_processor(&mut self, pt: ProcessorType) -> usize {
        assert!(pt < self.processor_types.len(), "unknown processor type");
        self.processor_type_instances[pt] += 1;
        self.processors.push(pt);
        self.processors.len() - 1
    }

    /// Add a processing element by type label, interning the label on
    /// first use.
    pub fn add_processor_with_label(&mut self, label: &str) -> usize {
        let pt = self.intern_processor_type(label);
        self.add_processor(pt)
    }

    pub fn add_channel(&mut self, from: usize, to: usize, ct: ChannelType) {
        assert!(ct < self.channel_types.len(), "unknown channel type");
        assert!(from < self.num_processors() && to < self.num_processors());
        self.channels.push((from, to, ct));
    }

    pub fn add_channel_with_label(&mut self, from: usize, to: usize, label: &str) {
        let ct = self.intern_channel_type(label);
        self.add_channel(from, to, ct);
    }

    fn intern_processor_type(&mut self, label: &str) -> ProcessorType {
        match self.processor_types.iter().position(|l| l == label) {
            Some(pt) => pt,
            None => self.new_processor_type(label),
        }
    }

    fn intern_channel_type(&mut self, label: &str) -> ChannelType {
        match self.channel_types.iter().position(|l| l == label) {
            Some(ct) => ct,
            None => self.new_channel_type(label),
        }
    }

    /// Build from the two-table architecture description consumed from the
    /// configuration front-end: `(pe_id, type_label)` rows with unique ids
    /// `>= 1`, and `(from_pe, to_pe, type_label)` channel rows whose
    /// endpoints appear in the processor table.
    pub fn from_tables(processors: &[(usize, String)], channels: &[(usize, usize, String)]) -> Result<Self> {
        let mut graph = Self::new();
        let mut vertex_of: DetHashMap<usize, usize> = DetHashMap::default();

        for (pe, label) in processors {
            if *pe < 1 {
                return Err(Error::InvalidArgument(format!("processing element id {} is not >= 1", pe)));
            }
            if vertex_of.contains_key(pe) {
                return Err(Error::InvalidArgument(format!(
                    "processing element {} defined twice in processor table",
                    pe
                )));
            }
            let vertex = graph.add_processor_with_label(label);
            vertex_of.insert(*pe, vertex);
        }

        for (from, to, label) in channels {
            let from_vertex = vertex_of.get(from).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "processing element {} used in channel table not defined in processor table",
                    from
                ))
            })?;
            let to_vertex = vertex_of.get(to).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "processing element {} used in channel table not defined in processor table",
                    to
                ))
            })?;
            graph.add_channel_with_label(*from_vertex, *to_vertex, label);
        }

        Ok(graph)
    }

    pub fn num_processors(&self) -> usize {
        self.processors.len()
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_processor_types(&self) -> usize {
        self.processor_types.len()
    }

    pub fn num_channel_types(&self) -> usize {
        self.channel_types.len()
    }

    pub fn processor_type_label(&self, pt: ProcessorType) -> &str {
        &self.processor_types[pt]
    }

    pub fn channel_type_label(&self, ct: ChannelType) -> &str {
        &self.channel_types[ct]
    }

    pub(crate) fn processor_type(&self, vertex: usize) -> ProcessorType {
        self.processors[vertex]
    }

    pub(crate) fn processor_type_instances(&self, pt: ProcessorType) -> usize {
        self.processor_type_instances[pt]
    }

    pub(crate) fn channels(&self) -> &[(usize, usize, ChannelType)] {
        &self.channels[..]
    }

    /// The automorphism group of the requested kind, determined by handing
    /// the colored-graph encoding to `oracle` and projecting its vertex
    /// permutations back onto the processors.
    pub fn automorphisms<O>(&self, kind: AutomKind, oracle: &mut O) -> Result<PermGroup>
    where
        O: AutomorphismOracle,
    {
        debug!(kind = ?kind, processors = self.num_processors(), "Determining automorphisms");

        let colored = coloring::build(self, kind);
        let raw = oracle.automorphisms(&colored)?;
        let generators = coloring::project_generators(&colored, raw)?;

        if generators.is_empty() {
            debug!("Trivial automorphism group");
            return Ok(PermGroup::trivial(self.num_processors()));
        }

        let group = PermGroup::new(self.num_processors(), &generators)?;
        debug!(order = %group.order(), "Automorphism group determined");
        Ok(group)
    }
}
