// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

use std::mem;

use super::{
    Color, DeviceGraph, InterpretationError, InterpretationFailure, JackDirection, JackPlacement,
    Node, NodeId, Paint, Shape,
};
use crate::descriptor::{usb_string, Descriptor, DescriptorKind};

const JACK_SOURCE_PREFIX: &str = "baSourceID";

const ENDPOINT_JACK_PREFIX: &str = "baAssocJackID";

/// DOT escape sequence for a line break inside a label.
const LABEL_LINE_BREAK: &str = "\\n";

fn require<'a>(
    descriptor: &'a Descriptor,
    name: &'static str,
) -> Result<&'a str, InterpretationError> {
    descriptor.property(name).ok_or_else(|| {
        InterpretationError::new(descriptor, InterpretationFailure::MissingProperty { name })
    })
}

/// Leading token of a value like `0x0582 Roland Corp.`
fn leading_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or_default()
}

/// Endpoint number from an address like `0x81  EP 1 IN`.
fn parse_endpoint_number(address: &str) -> Option<u8> {
    let token = leading_token(address);
    let digits = token.strip_prefix("0x").unwrap_or(token);
    u8::from_str_radix(digits, 16).ok()
}

/// Device id and name from the vendor/product ids and strings.
fn device_identity(descriptor: &Descriptor) -> Result<(String, String), InterpretationError> {
    let manufacturer = usb_string(require(descriptor, "iManufacturer")?, Some(""));
    let product = usb_string(require(descriptor, "iProduct")?, Some(""));
    let vendor_id = leading_token(require(descriptor, "idVendor")?);
    let product_id = leading_token(require(descriptor, "idProduct")?);
    Ok((
        format!("{vendor_id}{product_id}"),
        format!("{manufacturer} {product}"),
    ))
}

#[derive(Debug)]
struct Jack<'a> {
    id: &'a str,
    name: &'a str,
    placement: JackPlacement,
    direction: JackDirection,
}

impl<'a> Jack<'a> {
    fn try_from_descriptor(descriptor: &'a Descriptor) -> Result<Self, InterpretationError> {
        let id = require(descriptor, "bJackID")?;
        let name = usb_string(require(descriptor, "iJack")?, Some(""));
        let placement = if require(descriptor, "bJackType")?.contains("Embedded") {
            JackPlacement::Embedded
        } else {
            JackPlacement::External
        };
        let direction = if require(descriptor, "bDescriptorSubtype")?.contains("OUT") {
            JackDirection::Out
        } else {
            JackDirection::In
        };
        Ok(Self {
            id,
            name,
            placement,
            direction,
        })
    }

    fn label(&self) -> String {
        let Self { id, name, .. } = self;
        format!("#{id}{LABEL_LINE_BREAK}{name}")
    }
}

/// Accumulates the topology of one device at a time.
///
/// The graph of a device is completed when the next device starts or
/// when the input ends. Devices without any MIDIStreaming endpoints are
/// discarded.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    graph: DeviceGraph,
    last_endpoint_address: Option<String>,
    /// Completed by a device descriptor that failed to be interpreted.
    completed: Option<DeviceGraph>,
}

impl TopologyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The graph of the current device, still under construction.
    #[must_use]
    pub const fn graph(&self) -> &DeviceGraph {
        &self.graph
    }

    /// Consume the next descriptor.
    ///
    /// Returns the completed graph of the previous device when a new
    /// device starts.
    pub fn push(
        &mut self,
        descriptor: &Descriptor,
    ) -> Result<Option<DeviceGraph>, InterpretationError> {
        let Some(kind) = descriptor.kind() else {
            return Ok(None);
        };
        log::trace!(
            "Interpreting {kind} descriptor",
            kind = <&'static str>::from(kind)
        );
        match kind {
            DescriptorKind::Device => return self.begin_device(descriptor),
            DescriptorKind::MidiStreamingInterface => {
                if require(descriptor, "bDescriptorSubtype")?.contains("JACK") {
                    self.add_jack(descriptor)?;
                }
            }
            DescriptorKind::Endpoint => {
                let address = require(descriptor, "bEndpointAddress")?;
                self.last_endpoint_address = Some(address.to_owned());
            }
            DescriptorKind::MidiStreamingEndpoint => self.add_endpoint(descriptor)?,
        }
        Ok(None)
    }

    /// The graph of the previous device, if it has been completed by
    /// a device descriptor that could not be interpreted.
    ///
    /// [`push`](Self::push) returns an error in this case, but the
    /// preceding device is still valid.
    #[must_use]
    pub fn take_completed(&mut self) -> Option<DeviceGraph> {
        self.completed.take()
    }

    /// Complete the graph of the last device.
    #[must_use]
    pub fn finish(mut self) -> Option<DeviceGraph> {
        self.flush()
    }

    /// Take the current graph if it has any endpoints and reset the state.
    fn flush(&mut self) -> Option<DeviceGraph> {
        let graph = mem::take(&mut self.graph);
        self.last_endpoint_address = None;
        if !graph.has_endpoints() {
            if graph.nodes().next().is_some() {
                log::debug!(
                    "Discarding device {device_id} without endpoints",
                    device_id = graph.device_id
                );
            }
            return None;
        }
        log::debug!(
            "Completed device {device_id}: {num_edges} edge(s)",
            device_id = graph.device_id,
            num_edges = graph.edges.len(),
        );
        Some(graph)
    }

    fn begin_device(
        &mut self,
        descriptor: &Descriptor,
    ) -> Result<Option<DeviceGraph>, InterpretationError> {
        let completed = self.flush();
        match device_identity(descriptor) {
            Ok((device_id, device_name)) => {
                log::debug!("Starting device {device_id}: {device_name}");
                self.graph = DeviceGraph::new(device_id, device_name);
                Ok(completed)
            }
            Err(err) => {
                self.completed = completed;
                Err(err)
            }
        }
    }

    fn add_jack(&mut self, descriptor: &Descriptor) -> Result<(), InterpretationError> {
        let jack = Jack::try_from_descriptor(descriptor)?;
        let graph = &mut self.graph;
        let id = NodeId::jack(&graph.device_id, jack.id);
        let label = jack.label();
        match jack.placement {
            JackPlacement::Embedded => {
                let fill_color = match jack.direction {
                    JackDirection::Out => Color::Yellow,
                    JackDirection::In => Color::Magenta,
                };
                graph.embedded_jacks.push(Node {
                    id: id.clone(),
                    label,
                    paint: Paint::Fill(fill_color),
                    shape: None,
                });
            }
            JackPlacement::External => {
                let connector_id = id.connector();
                let (connector_label, connector_color, jack_color) = match jack.direction {
                    JackDirection::Out => ("OUTPUT", Color::LightBlue, Color::Blue),
                    JackDirection::In => ("INPUT", Color::LightGreen, Color::Green),
                };
                graph.connectors.push(Node {
                    id: connector_id.clone(),
                    label: connector_label.to_owned(),
                    paint: Paint::Fill(connector_color),
                    shape: Some(Shape::Rect),
                });
                graph.external_jacks.push(Node {
                    id: id.clone(),
                    label,
                    paint: Paint::Fill(jack_color),
                    shape: None,
                });
                match jack.direction {
                    JackDirection::Out => graph.add_edge(id.clone(), connector_id, Color::DarkBlue),
                    JackDirection::In => graph.add_edge(connector_id, id.clone(), Color::DarkGreen),
                }
            }
        }
        let source_color = match jack.placement {
            JackPlacement::Embedded => Color::DarkGreen,
            JackPlacement::External => Color::DarkBlue,
        };
        for (_, source_jack_id) in descriptor.properties_with_prefix(JACK_SOURCE_PREFIX) {
            let source = NodeId::jack(&graph.device_id, source_jack_id);
            graph.add_edge(source, id.clone(), source_color);
        }
        Ok(())
    }

    fn add_endpoint(&mut self, descriptor: &Descriptor) -> Result<(), InterpretationError> {
        let Some(address) = self.last_endpoint_address.as_deref() else {
            log::warn!("MIDIStreaming endpoint without a preceding endpoint descriptor");
            return Err(InterpretationError::new(
                descriptor,
                InterpretationFailure::NoEndpoint,
            ));
        };
        let Some(endpoint_number) = parse_endpoint_number(address) else {
            log::warn!("Unrecognized endpoint address {address:?}");
            return Err(InterpretationError::new(
                descriptor,
                InterpretationFailure::InvalidEndpointAddress {
                    address: address.to_owned(),
                },
            ));
        };
        let from_host = address.contains("OUT");
        let graph = &mut self.graph;
        let id = NodeId::endpoint(&graph.device_id, endpoint_number);
        graph.endpoints.push(Node {
            id: id.clone(),
            label: address.to_owned(),
            paint: Paint::Color(Color::Red),
            shape: Some(Shape::Rect),
        });
        for (_, jack_id) in descriptor.properties_with_prefix(ENDPOINT_JACK_PREFIX) {
            let jack = NodeId::jack(&graph.device_id, jack_id);
            if from_host {
                graph.add_edge(id.clone(), jack, Color::DarkBlue);
            } else {
                graph.add_edge(jack, id.clone(), Color::DarkGreen);
            }
        }
        Ok(())
    }
}

/// Adapts a sequence of parsed descriptors into completed device graphs.
pub fn device_graphs<I>(descriptors: I) -> DeviceGraphs<I::IntoIter>
where
    I: IntoIterator<Item = Descriptor>,
{
    DeviceGraphs {
        descriptors: descriptors.into_iter(),
        builder: TopologyBuilder::new(),
        failure: None,
        done: false,
    }
}

/// Iterator over completed [`DeviceGraph`]s, fused after the first error.
///
/// A device that has been completed before the error is still yielded
/// before the error.
#[derive(Debug)]
pub struct DeviceGraphs<I> {
    descriptors: I,
    builder: TopologyBuilder,
    failure: Option<InterpretationError>,
    done: bool,
}

impl<I> Iterator for DeviceGraphs<I>
where
    I: Iterator<Item = Descriptor>,
{
    type Item = Result<DeviceGraph, InterpretationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.failure.take() {
            return Some(Err(err));
        }
        if self.done {
            return None;
        }
        for descriptor in self.descriptors.by_ref() {
            match self.builder.push(&descriptor) {
                Ok(None) => (),
                Ok(Some(graph)) => return Some(Ok(graph)),
                Err(err) => {
                    self.done = true;
                    if let Some(graph) = self.builder.take_completed() {
                        self.failure = Some(err);
                        return Some(Ok(graph));
                    }
                    return Some(Err(err));
                }
            }
        }
        self.done = true;
        mem::take(&mut self.builder).finish().map(Ok)
    }
}
