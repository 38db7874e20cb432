// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

use super::{parser::split_property, *};

fn parse_all(input: &str) -> Vec<Descriptor> {
    parse_descriptors(input.lines()).collect()
}

#[test]
fn usb_string_without_index() {
    assert_eq!("0", usb_string("0", None));
    assert_eq!("fallback", usb_string("0", Some("fallback")));
    assert_eq!("", usb_string("0", Some("")));
}

#[test]
fn usb_string_with_index() {
    assert_eq!("Example Co", usb_string("3 Example Co", None));
    assert_eq!("Example Co", usb_string("3 Example Co", Some("fallback")));
    // The dump tool could not read the string
    assert_eq!("", usb_string("2", Some("fallback")));
}

#[test]
fn split_property_at_first_run_of_spaces() {
    assert_eq!(
        Some(("bEndpointAddress", "0x81  EP 1 IN")),
        split_property("bEndpointAddress     0x81  EP 1 IN")
    );
    assert_eq!(
        Some(("baSourceID( 0)", "2")),
        split_property("baSourceID( 0)          2")
    );
    assert_eq!(None, split_property("single spaced"));
}

#[test]
fn empty_input() {
    assert!(parse_all("").is_empty());
    assert!(parse_all("\n   \n\t\n").is_empty());
}

#[test]
fn lines_before_first_header_are_ignored() {
    let descriptors = parse_all(
        "Bus 001 Device 005: ID 0582:0012 Roland Corp.\n\
         Couldn't open device, some information will be missing\n\
         Device Descriptor:\n  bLength                18\n",
    );
    assert_eq!(1, descriptors.len());
    assert_eq!("Device", descriptors[0].type_name);
    assert_eq!(Some("18"), descriptors[0].property("bLength"));
}

#[test]
fn header_and_properties() {
    let descriptors = parse_all(
        "Device Descriptor:\n\
         \x20 idVendor           0x0582 Roland Corp.\n\
         \x20 iProduct               2 UM-ONE\n\
         \x20   Endpoint Descriptor:\n\
         \x20     bEndpointAddress     0x02  EP 2 OUT\n\
         \x20     ignored-without-separator\n\
         \x20     MIDIStreaming Endpoint Descriptor:\n\
         \x20       baAssocJackID( 0)       1\n",
    );
    assert_eq!(3, descriptors.len());

    assert_eq!(Some(DescriptorKind::Device), descriptors[0].kind());
    assert_eq!(Some("0x0582 Roland Corp."), descriptors[0].property("idVendor"));
    assert_eq!(Some("2 UM-ONE"), descriptors[0].property("iProduct"));

    assert_eq!(Some(DescriptorKind::Endpoint), descriptors[1].kind());
    assert_eq!(1, descriptors[1].properties.len());
    assert_eq!(
        Some("0x02  EP 2 OUT"),
        descriptors[1].property("bEndpointAddress")
    );

    assert_eq!(
        Some(DescriptorKind::MidiStreamingEndpoint),
        descriptors[2].kind()
    );
    assert_eq!(Some("1"), descriptors[2].property("baAssocJackID( 0)"));
}

#[test]
fn unrelated_descriptor_kind() {
    let descriptors = parse_all("Configuration Descriptor:\n  bNumInterfaces   2\n");
    assert_eq!("Configuration", descriptors[0].type_name);
    assert_eq!(None, descriptors[0].kind());
    assert_eq!(
        Some(DescriptorKind::MidiStreamingInterface),
        Descriptor::new("MIDIStreaming Interface").kind()
    );
}

#[test]
fn duplicate_property_keeps_position() {
    let descriptors = parse_all("Endpoint Descriptor:\n  a  1\n  b  2\n  a  3\n");
    let properties = descriptors[0]
        .properties
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(vec![("a", "3"), ("b", "2")], properties);
}

#[test]
fn properties_with_prefix_in_declaration_order() {
    let descriptors = parse_all(
        "MIDIStreaming Interface Descriptor:\n\
         \x20 baSourceID( 1)          7\n\
         \x20 BaSourcePin( 1)         1\n\
         \x20 baSourceID( 0)          3\n",
    );
    let sources = descriptors[0]
        .properties_with_prefix("baSourceID")
        .map(|(_, value)| value)
        .collect::<Vec<_>>();
    assert_eq!(vec!["7", "3"], sources);
}
