// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

use super::*;
use crate::topology::{Color, NodeId, Shape};

fn write(graphs: &[DeviceGraph]) -> String {
    let mut dot = DotWriter::begin(Vec::new()).unwrap();
    for graph in graphs {
        dot.write_device(graph).unwrap();
    }
    String::from_utf8(dot.finish().unwrap()).unwrap()
}

#[test]
fn empty_digraph() {
    assert_eq!("digraph midistreaming { node[style=filled];\n}\n", write(&[]));
}

#[test]
fn node_statements() {
    let endpoint = Node {
        id: NodeId::endpoint("0x12340x5678", 2),
        label: "0x02  EP 2 OUT".to_owned(),
        paint: Paint::Color(Color::Red),
        shape: Some(Shape::Rect),
    };
    assert_eq!(
        "dev0x12340x5678ep2 [label=\"0x02  EP 2 OUT\", color=red, shape=rect];",
        node_statement(&endpoint)
    );
    let jack = Node {
        id: NodeId::jack("0x12340x5678", "5"),
        label: "#5\\nSynth".to_owned(),
        paint: Paint::Fill(Color::Magenta),
        shape: None,
    };
    assert_eq!(
        "dev0x12340x5678jack5 [label=\"#5\\nSynth\", fillcolor=magenta];",
        node_statement(&jack)
    );
}

#[test]
fn labels_are_escaped() {
    assert_eq!("12\\\" Rack", escape_label("12\" Rack"));
    assert_eq!("#1\\nMIDI", escape_label("#1\\nMIDI"));
}

#[test]
fn cluster_layout() {
    let mut graph = DeviceGraph::new(
        "0x12340x5678".to_owned(),
        "Example Co MIDI Thing".to_owned(),
    );
    let jack = NodeId::jack("0x12340x5678", "1");
    graph.connectors.push(Node {
        id: jack.connector(),
        label: "OUTPUT".to_owned(),
        paint: Paint::Fill(Color::LightBlue),
        shape: Some(Shape::Rect),
    });
    graph.external_jacks.push(Node {
        id: jack.clone(),
        label: "#1\\n".to_owned(),
        paint: Paint::Fill(Color::Blue),
        shape: None,
    });
    graph.edges.push(Edge {
        source: jack.clone(),
        target: jack.connector(),
        color: Color::DarkBlue,
    });
    let dot = write(&[graph]);
    let expected = r##"digraph midistreaming { node[style=filled];
    subgraph cluster_dev0x12340x5678 {
        label="Example Co MIDI Thing";
        subgraph dev0x12340x5678_connectors {
            rank=source;
            dev0x12340x5678jack1_conn [label="OUTPUT", fillcolor=lightblue, shape=rect];
        }
        subgraph cluster_dev0x12340x5678_usb_midi {
            style=filled;
            color=lightgrey;
            label="MIDIStreaming";
            subgraph dev0x12340x5678_ext {
                rank=source;
                label="External jacks";
                dev0x12340x5678jack1 [label="#1\n", fillcolor=blue];
            }
            subgraph dev0x12340x5678_emb {
                rank=sink;
                fillcolor=grey;
                label="Embedded jacks";
            }
        }
        subgraph cluster_dev0x12340x5678_ep {
            rank=sink;
            label="USB";
        }
        dev0x12340x5678jack1 -> dev0x12340x5678jack1_conn [color=darkblue];
    }
}
"##;
    assert_eq!(expected, dot);
}
