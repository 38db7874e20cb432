// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

use super::Descriptor;

const HEADER_MARKER: &str = " Descriptor";

const PROPERTY_SEPARATOR: &str = "  ";

/// Lazily parse text lines into [`Descriptor`]s.
pub fn parse_descriptors<I>(lines: I) -> DescriptorParser<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    DescriptorParser::new(lines.into_iter())
}

/// Single pass parser without lookahead.
///
/// A descriptor is yielded when the next header line is encountered
/// or when the input is exhausted. Lines without a name/value separator
/// carry no property and are skipped.
#[derive(Debug)]
pub struct DescriptorParser<I> {
    lines: I,
    current: Option<Descriptor>,
}

impl<I> DescriptorParser<I> {
    #[must_use]
    pub const fn new(lines: I) -> Self {
        Self {
            lines,
            current: None,
        }
    }
}

impl<I> Iterator for DescriptorParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Descriptor;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            if line.contains(HEADER_MARKER) {
                let type_name = line
                    .find("Descriptor")
                    .map_or(line, |end| &line[..end])
                    .trim();
                log::trace!("Starting {type_name} descriptor");
                if let Some(finished) = self.current.replace(Descriptor::new(type_name)) {
                    return Some(finished);
                }
                continue;
            }
            let Some(descriptor) = self.current.as_mut() else {
                // Preamble, e.g. the "Bus 001 Device 002: ID ..." line
                continue;
            };
            let Some((name, value)) = split_property(line) else {
                continue;
            };
            descriptor
                .properties
                .insert(name.to_owned(), value.to_owned());
        }
        self.current.take()
    }
}

/// Split a trimmed line at the first run of two or more spaces.
pub(super) fn split_property(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(PROPERTY_SEPARATOR)?;
    Some((name.trim_end(), value.trim()))
}
