// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

#![allow(rustdoc::invalid_rust_codeblocks)]
#![doc = include_str!("../README.md")]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
//#![warn(missing_docs)] // FIXME
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(rustdoc::broken_intra_doc_links)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `..Default::default()` expressions
// is not needed since the context is obvious.
#![allow(clippy::default_trait_access)]

use std::io::Write;

pub mod descriptor;
pub use self::descriptor::{
    parse_descriptors, usb_string, Descriptor, DescriptorKind, DescriptorParser, Properties,
};

pub mod dot;
pub use self::dot::DotWriter;

pub mod topology;
pub use self::topology::{
    device_graphs, DeviceGraph, DeviceGraphs, InterpretationError, InterpretationFailure,
    TopologyBuilder,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Interpretation(#[from] InterpretationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Read `lsusb -v` output and write the MIDIStreaming topology of all
/// devices as a Graphviz digraph.
///
/// Processing stops at the first error. Clusters of devices that have
/// already been written remain in the output, but the digraph is left
/// unterminated.
pub fn write_midistreaming_dot<I, W>(lines: I, writer: W) -> Result<W>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    W: Write,
{
    let mut dot = DotWriter::begin(writer)?;
    let mut num_devices = 0usize;
    for graph in device_graphs(parse_descriptors(lines)) {
        dot.write_device(&graph?)?;
        num_devices += 1;
    }
    log::info!("Graphed {num_devices} MIDI device(s)");
    Ok(dot.finish()?)
}
