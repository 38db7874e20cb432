// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Read `lsusb -v` output on stdin and print the MIDIStreaming
//! topology as a Graphviz digraph on stdout.

use std::{
    io::{stdin, stdout, Read as _},
    process::ExitCode,
};

use anyhow::Context as _;

fn main() -> ExitCode {
    pretty_env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let mut input = String::new();
    stdin()
        .lock()
        .read_to_string(&mut input)
        .context("failed to read USB descriptors from stdin")?;
    // The digraph has already been flushed
    let _stdout = usbmidi_topology::write_midistreaming_dot(input.lines(), stdout().lock())
        .context("failed to graph the MIDIStreaming topology")?;
    Ok(())
}
