// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Per-device MIDIStreaming topology.
//!
//! Jacks and endpoints of a single USB device are collected into a
//! [`DeviceGraph`] while consuming its descriptors in document order.

use derive_more::{Deref, Display};
use strum::Display as StrumDisplay;
use thiserror::Error;

use crate::descriptor::Descriptor;

mod builder;
pub use self::builder::{device_graphs, DeviceGraphs, TopologyBuilder};


#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpretationFailure {
    #[error("missing property {name}")]
    MissingProperty { name: &'static str },

    #[error("no preceding endpoint descriptor")]
    NoEndpoint,

    #[error("invalid endpoint address {address:?}")]
    InvalidEndpointAddress { address: String },
}

/// A descriptor that could not be interpreted as part of the topology.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot interpret {descriptor}: {failure}")]
pub struct InterpretationError {
    pub descriptor: Descriptor,
    pub failure: InterpretationFailure,
}

impl InterpretationError {
    #[must_use]
    pub fn new(descriptor: &Descriptor, failure: InterpretationFailure) -> Self {
        Self {
            descriptor: descriptor.clone(),
            failure,
        }
    }
}

/// Graphviz color names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    Blue,
    DarkBlue,
    DarkGreen,
    Green,
    LightBlue,
    LightGreen,
    Magenta,
    Red,
    Yellow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Shape {
    Rect,
}

/// How a node is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Fill color, the outline keeps the default color.
    Fill(Color),
    /// Outline and fill color.
    Color(Color),
}

/// Unique node identifier within the enclosing digraph.
///
/// Identifiers are derived from the device id and the jack id or
/// endpoint number respectively.
#[derive(Debug, Display, Deref, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    #[must_use]
    pub fn jack(device_id: &str, jack_id: &str) -> Self {
        Self(format!("dev{device_id}jack{jack_id}"))
    }

    #[must_use]
    pub fn endpoint(device_id: &str, endpoint_number: u8) -> Self {
        Self(format!("dev{device_id}ep{endpoint_number}"))
    }

    /// The connector that is paired with an external jack.
    #[must_use]
    pub fn connector(&self) -> Self {
        let Self(jack) = self;
        Self(format!("{jack}_conn"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub paint: Paint,
    pub shape: Option<Shape>,
}

/// Directed relation along which MIDI data flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JackPlacement {
    /// Logical jack inside the MIDIStreaming interface.
    Embedded,
    /// Physical MIDI connector.
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JackDirection {
    In,
    Out,
}

/// Graph model of a single USB device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceGraph {
    /// Vendor id followed by product id, e.g. `0x05820x0012`.
    pub device_id: String,
    /// Manufacturer and product string.
    pub device_name: String,
    /// Synthetic INPUT/OUTPUT nodes of external jacks.
    pub connectors: Vec<Node>,
    pub external_jacks: Vec<Node>,
    pub embedded_jacks: Vec<Node>,
    pub endpoints: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl DeviceGraph {
    #[must_use]
    pub fn new(device_id: String, device_name: String) -> Self {
        Self {
            device_id,
            device_name,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn has_endpoints(&self) -> bool {
        !self.endpoints.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.connectors
            .iter()
            .chain(&self.external_jacks)
            .chain(&self.embedded_jacks)
            .chain(&self.endpoints)
    }

    #[must_use]
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes().find(|node| node.id.as_str() == id)
    }

    fn add_edge(&mut self, source: NodeId, target: NodeId, color: Color) {
        self.edges.push(Edge {
            source,
            target,
            color,
        });
    }
}
