// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Graphviz DOT output.

use std::{
    borrow::Cow,
    io::{self, Write},
};

use crate::topology::{DeviceGraph, Edge, Node, Paint};

#[cfg(test)]
mod tests;

pub const DIGRAPH_NAME: &str = "midistreaming";

const INDENT: &str = "    ";

fn escape_label(label: &str) -> Cow<'_, str> {
    if label.contains('"') {
        Cow::Owned(label.replace('"', "\\\""))
    } else {
        Cow::Borrowed(label)
    }
}

fn node_statement(node: &Node) -> String {
    let Node {
        id,
        label,
        paint,
        shape,
    } = node;
    let label = escape_label(label);
    let paint = match paint {
        Paint::Fill(color) => format!("fillcolor={color}"),
        Paint::Color(color) => format!("color={color}"),
    };
    let shape = shape.map(|shape| format!(", shape={shape}")).unwrap_or_default();
    format!("{id} [label=\"{label}\", {paint}{shape}];")
}

fn edge_statement(edge: &Edge) -> String {
    let Edge {
        source,
        target,
        color,
    } = edge;
    format!("{source} -> {target} [color={color}];")
}

/// Writes device graphs into a single `midistreaming` digraph.
///
/// Each device is written and flushed as a whole. Output for devices
/// that has already been written is not retracted on subsequent errors.
#[derive(Debug)]
pub struct DotWriter<W> {
    writer: W,
}

impl<W> DotWriter<W>
where
    W: Write,
{
    /// Open the digraph.
    pub fn begin(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "digraph {DIGRAPH_NAME} {{ node[style=filled];")?;
        Ok(Self { writer })
    }

    /// Write one device cluster.
    pub fn write_device(&mut self, graph: &DeviceGraph) -> io::Result<()> {
        let DeviceGraph {
            device_id,
            device_name,
            connectors,
            external_jacks,
            embedded_jacks,
            endpoints,
            edges,
        } = graph;
        log::debug!("Writing cluster of device {device_id}");
        let w = &mut self.writer;
        writeln!(w, "{INDENT}subgraph cluster_dev{device_id} {{")?;
        writeln!(w, "{INDENT}{INDENT}label=\"{}\";", escape_label(device_name))?;

        writeln!(w, "{INDENT}{INDENT}subgraph dev{device_id}_connectors {{")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}rank=source;")?;
        write_nodes(w, 3, connectors)?;
        writeln!(w, "{INDENT}{INDENT}}}")?;

        writeln!(w, "{INDENT}{INDENT}subgraph cluster_dev{device_id}_usb_midi {{")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}style=filled;")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}color=lightgrey;")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}label=\"MIDIStreaming\";")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}subgraph dev{device_id}_ext {{")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}{INDENT}rank=source;")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}{INDENT}label=\"External jacks\";")?;
        write_nodes(w, 4, external_jacks)?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}}}")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}subgraph dev{device_id}_emb {{")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}{INDENT}rank=sink;")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}{INDENT}fillcolor=grey;")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}{INDENT}label=\"Embedded jacks\";")?;
        write_nodes(w, 4, embedded_jacks)?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}}}")?;
        writeln!(w, "{INDENT}{INDENT}}}")?;

        writeln!(w, "{INDENT}{INDENT}subgraph cluster_dev{device_id}_ep {{")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}rank=sink;")?;
        writeln!(w, "{INDENT}{INDENT}{INDENT}label=\"USB\";")?;
        write_nodes(w, 3, endpoints)?;
        writeln!(w, "{INDENT}{INDENT}}}")?;

        for edge in edges {
            writeln!(w, "{INDENT}{INDENT}{}", edge_statement(edge))?;
        }
        writeln!(w, "{INDENT}}}")?;
        w.flush()
    }

    /// Close the digraph and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        writeln!(self.writer, "}}")?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn write_nodes(w: &mut impl Write, depth: usize, nodes: &[Node]) -> io::Result<()> {
    let indent = INDENT.repeat(depth);
    for node in nodes {
        writeln!(w, "{indent}{}", node_statement(node))?;
    }
    Ok(())
}
