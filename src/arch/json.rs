//! JSON round-trip format for architecture graphs.

use {
    super::ArchGraph,
    crate::{
        Error,
        Result,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    std::collections::BTreeMap,
};

// The persisted shape: processors keyed by vertex index, channels as an
// adjacency map from vertex to (target, channel type label) pairs.
#[derive(Debug, Serialize, Deserialize)]
struct ArchGraphDump {
    directed: bool,
    processor_types: Vec<String>,
    channel_types: Vec<String>,
    processors: BTreeMap<usize, String>,
    channels: BTreeMap<usize, Vec<(usize, String)>>,
}

impl ArchGraph {
    pub fn to_json(&self) -> Result<String> {
        let mut processors = BTreeMap::new();
        for vertex in 0..self.num_processors() {
            processors.insert(vertex, self.processor_type_label(self.processor_type(vertex)).to_owned());
        }

        let mut channels: BTreeMap<usize, Vec<(usize, String)>> = BTreeMap::new();
        for &(from, to, ct) in self.channels() {
            channels
                .entry(from)
                .or_default()
                .push((to, self.channel_type_label(ct).to_owned()));
        }

        let dump = ArchGraphDump {
            directed: self.directed(),
            processor_types: (0..self.num_processor_types())
                .map(|pt| self.processor_type_label(pt).to_owned())
                .collect(),
            channel_types: (0..self.num_channel_types())
                .map(|ct| self.channel_type_label(ct).to_owned())
                .collect(),
            processors,
            channels,
        };

        serde_json::to_string(&dump).map_err(|e| Error::InvariantViolation(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let dump: ArchGraphDump =
            serde_json::from_str(json).map_err(|e| Error::InvalidArgument(format!("malformed dump: {}", e)))?;

        let mut graph = if dump.directed {
            ArchGraph::new_directed()
        } else {
            ArchGraph::new()
        };

        // recreate the type tables in dumped order so ids round-trip
        for label in &dump.processor_types {
            graph.new_processor_type(label);
        }
        for label in &dump.channel_types {
            graph.new_channel_type(label);
        }

        for (vertex, label) in &dump.processors {
            if *vertex != graph.num_processors() {
                return Err(Error::InvalidArgument(format!("non-contiguous processor index {}", vertex)));
            }
            let pt = lookup(&dump.processor_types, label, "processor")?;
            graph.add_processor(pt);
        }

        for (from, adjacent) in &dump.channels {
            for (to, label) in adjacent {
                if *from >= graph.num_processors() || *to >= graph.num_processors() {
                    return Err(Error::InvalidArgument(format!("channel endpoint {} undefined", from.max(to))));
                }
                let ct = lookup(&dump.channel_types, label, "channel")?;
                graph.add_channel(*from, *to, ct);
            }
        }

        Ok(graph)
    }
}

fn lookup(types: &[String], label: &str, kind: &str) -> Result<usize> {
    types
        .iter()
        .position(|l| l == label)
        .ok_or_else(|| Error::InvalidArgument(format!("unknown {} type '{}'", kind, label)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArchGraph {
        let mut graph = ArchGraph::new();
        graph.add_processor_with_label("cpu");
        graph.add_processor_with_label("cpu");
        graph.add_processor_with_label("gpu");
        graph.add_channel_with_label(0, 1, "bus");
        graph.add_channel_with_label(1, 2, "pcie");
        graph
    }

    #[test]
    fn dump_round_trips() {
        let graph = sample();
        let json = graph.to_json().unwrap();
        let back = ArchGraph::from_json(&json).unwrap();

        assert_eq!(back.num_processors(), graph.num_processors());
        assert_eq!(back.num_channels(), graph.num_channels());
        assert_eq!(back.num_processor_types(), graph.num_processor_types());
        assert_eq!(back.num_channel_types(), graph.num_channel_types());
        assert_eq!(back.to_json().unwrap(), json);
    }

    #[test]
    fn dump_contains_the_documented_fields() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for field in ["directed", "processor_types", "channel_types", "processors", "channels"] {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(value["directed"], serde_json::Value::Bool(false));
    }

    #[test]
    fn malformed_input_is_an_invalid_argument() {
        assert!(matches!(
            ArchGraph::from_json("{\"not\": \"a dump\"}"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn unknown_type_labels_are_rejected() {
        let json = r#"{
            "directed": false,
            "processor_types": ["cpu"],
            "channel_types": [],
            "processors": {"0": "dsp"},
            "channels": {}
        }"#;
        assert!(matches!(ArchGraph::from_json(json), Err(Error::InvalidArgument(_))));
    }
}
