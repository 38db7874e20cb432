// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Descriptor records as printed by `lsusb -v`.

use derive_more::Display;
use indexmap::IndexMap;
use strum::{EnumString, IntoStaticStr};

mod parser;
pub use self::parser::{parse_descriptors, DescriptorParser};

#[cfg(test)]
mod tests;

/// String descriptor index that has no string attached.
pub const NO_STRING_INDEX: &str = "0";

/// Properties of a descriptor in document order.
///
/// Multi-valued fields like `baSourceID( 0)`, `baSourceID( 1)`, ...
/// are stored as distinct keys and must be processed in the order
/// of their declaration.
pub type Properties = IndexMap<String, String>;

/// Descriptor types that carry MIDI topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum DescriptorKind {
    Device,
    Endpoint,
    #[strum(serialize = "MIDIStreaming Interface")]
    MidiStreamingInterface,
    #[strum(serialize = "MIDIStreaming Endpoint")]
    MidiStreamingEndpoint,
}

#[derive(Debug, Display, Clone, PartialEq, Eq, Default)]
#[display("{type_name} Descriptor {properties:?}")]
pub struct Descriptor {
    /// Free-text category from the header line, e.g. "MIDIStreaming Interface".
    pub type_name: String,
    pub properties: Properties,
}

impl Descriptor {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Default::default(),
        }
    }

    /// The recognized kind, or `None` for unrelated descriptor types.
    #[must_use]
    pub fn kind(&self) -> Option<DescriptorKind> {
        self.type_name.parse().ok()
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// All properties whose name starts with `prefix`, in declaration order.
    pub fn properties_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.properties
            .iter()
            .filter(move |(name, _)| name.starts_with(prefix))
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Resolve a string descriptor value of the form `"<index> <text>"`.
///
/// Index `0` means that no string is attached, which resolves to `default`
/// or to the literal `"0"` if no default is given. An index without decoded
/// text resolves to an empty string.
#[must_use]
pub fn usb_string<'a>(value: &'a str, default: Option<&'a str>) -> &'a str {
    if value == NO_STRING_INDEX {
        return default.unwrap_or(value);
    }
    value.split_once(' ').map_or("", |(_index, text)| text)
}
