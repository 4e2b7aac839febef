//! Support for .NET `.resx` resource files.
//!
//! Only string `<data>` entries are read; entries carrying a `type` or
//! `mimetype` attribute (embedded files, images, ...) are skipped. The
//! `<resheader>` block and any inline schema are ignored on read and
//! regenerated on write.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};

use crate::{
    error::Error,
    formats::xml_attribute,
    traits::Parser,
    types::{SourceLine, TargetLine},
};

const RESHEADERS: [(&str, &str); 4] = [
    ("resmimetype", "text/microsoft-resx"),
    ("version", "2.0"),
    (
        "reader",
        "System.Resources.ResXResourceReader, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ),
    (
        "writer",
        "System.Resources.ResXResourceWriter, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub entries: Vec<DataEntry>,
}

/// One `<data name="...">` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataEntry {
    pub name: String,
    /// `None` when the element has no `<value>` child.
    pub value: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Value,
    Comment,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut entries = Vec::new();
        // (entry, skipped) while inside <data>
        let mut current: Option<(DataEntry, bool)> = None;
        let mut capture: Option<Capture> = None;
        let mut text = String::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.name().as_ref() == b"data" => {
                    current = Some(start_data_entry(e)?);
                }
                Event::Empty(ref e) if e.name().as_ref() == b"data" => {
                    let (entry, skipped) = start_data_entry(e)?;
                    if !skipped {
                        entries.push(entry);
                    }
                }
                Event::Start(ref e) if current.is_some() => {
                    capture = match e.name().as_ref() {
                        b"value" => Some(Capture::Value),
                        b"comment" => Some(Capture::Comment),
                        _ => None,
                    };
                    text.clear();
                }
                Event::Empty(ref e) => {
                    if let Some((entry, _)) = current.as_mut() {
                        match e.name().as_ref() {
                            b"value" => entry.value = Some(String::new()),
                            b"comment" => entry.comment = Some(String::new()),
                            _ => {}
                        }
                    }
                }
                Event::Text(e) if capture.is_some() => {
                    text.push_str(&e.unescape()?);
                }
                Event::CData(e) if capture.is_some() => {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
                Event::End(ref e) if e.name().as_ref() == b"data" => {
                    if let Some((entry, skipped)) = current.take() {
                        if !skipped {
                            entries.push(entry);
                        }
                    }
                }
                Event::End(_) => {
                    if let (Some(field), Some((entry, _))) = (capture.take(), current.as_mut()) {
                        let value = std::mem::take(&mut text);
                        match field {
                            Capture::Value => entry.value = Some(value),
                            Capture::Comment => entry.comment = Some(value),
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if current.is_some() {
            return Err(Error::InvalidResource(
                "unexpected end of file inside <data>".to_string(),
            ));
        }
        Ok(Format { entries })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 2);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new("root")))?;

        for (name, value) in RESHEADERS {
            let mut header = BytesStart::new("resheader");
            header.push_attribute(("name", name));
            xml_writer.write_event(Event::Start(header))?;
            write_text_element(&mut xml_writer, "value", value)?;
            xml_writer.write_event(Event::End(BytesEnd::new("resheader")))?;
        }

        for entry in &self.entries {
            let mut data = BytesStart::new("data");
            data.push_attribute(("name", entry.name.as_str()));
            data.push_attribute(("xml:space", "preserve"));
            xml_writer.write_event(Event::Start(data))?;
            if let Some(value) = &entry.value {
                write_text_element(&mut xml_writer, "value", value)?;
            }
            if let Some(comment) = &entry.comment {
                write_text_element(&mut xml_writer, "comment", comment)?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("data")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("root")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn start_data_entry(e: &BytesStart) -> Result<(DataEntry, bool), Error> {
    let name = xml_attribute(e, b"name")?
        .ok_or_else(|| Error::InvalidResource("data element missing 'name'".to_string()))?;
    let skipped =
        xml_attribute(e, b"type")?.is_some() || xml_attribute(e, b"mimetype")?.is_some();
    Ok((
        DataEntry {
            name,
            value: None,
            comment: None,
        },
        skipped,
    ))
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

impl From<Format> for Vec<SourceLine> {
    fn from(value: Format) -> Self {
        value
            .entries
            .into_iter()
            .map(|entry| SourceLine {
                name: entry.name,
                value: entry.value,
            })
            .collect()
    }
}

impl From<&[TargetLine]> for Format {
    fn from(lines: &[TargetLine]) -> Self {
        Format {
            entries: lines
                .iter()
                .map(|line| DataEntry {
                    name: line.name.clone(),
                    value: Some(line.value.clone()),
                    comment: None,
                })
                .collect(),
        }
    }
}
