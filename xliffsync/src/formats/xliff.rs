//! Support for XLIFF 1.2 translation catalogs.
//!
//! Reads and writes the subset of XLIFF produced by localization tool chains
//! for flat resource files: one or more `<file>` elements whose `<body>` holds
//! `<trans-unit>`s, optionally wrapped in a `<group>`. Inline markup inside
//! `<source>`/`<target>` is not modelled; its text content is kept.
//!
//! Unknown `state` values are preserved verbatim so catalogs edited by other
//! tools round-trip unchanged.

use std::{
    io::{BufRead, Write},
    path::Path,
};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    formats::xml_attribute,
    traits::Parser,
    types::{Catalog, TranslationState, TranslationUnit, UnitNote, UnitSource, UnitTarget},
};

pub const XLIFF_VERSION: &str = "1.2";
pub const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str =
    "urn:oasis:names:tc:xliff:document:1.2 xliff-core-1.2-transitional.xsd";

/// A whole XLIFF document (`<xliff>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XliffDocument {
    pub version: String,
    /// `xsi:schemaLocation`.
    pub schema_location: Option<String>,
    pub files: Vec<XliffFile>,
}

impl Default for XliffDocument {
    fn default() -> Self {
        Self {
            version: XLIFF_VERSION.to_string(),
            schema_location: None,
            files: Vec::new(),
        }
    }
}

/// A `<file>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XliffFile {
    pub datatype: String,
    pub source_language: String,
    pub target_language: Option<String>,
    pub original: String,
    pub tool_id: Option<String>,
    pub product_name: Option<String>,
    pub product_version: Option<String>,
    pub build_num: Option<String>,
    pub header: Option<XliffHeader>,
    pub body: XliffBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XliffHeader {
    pub tool: Option<XliffTool>,
}

/// `<tool>` inside `<header>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XliffTool {
    pub id: String,
    pub name: Option<String>,
    pub version: Option<String>,
    pub company: Option<String>,
}

/// `<body>`: grouped units followed by units placed directly in the body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XliffBody {
    pub groups: Vec<XliffGroup>,
    pub units: Vec<TranslationUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XliffGroup {
    pub id: Option<String>,
    pub datatype: Option<String>,
    pub units: Vec<TranslationUnit>,
}

impl XliffDocument {
    /// All translation units in document order.
    pub fn units(&self) -> impl Iterator<Item = &TranslationUnit> {
        self.files.iter().flat_map(|file| {
            file.body
                .groups
                .iter()
                .flat_map(|group| group.units.iter())
                .chain(file.body.units.iter())
        })
    }

    /// Moves all units into a [`Catalog`], keeping document order.
    ///
    /// Fails with [`Error::DuplicateKey`] if two units share an id.
    pub fn into_catalog(self) -> Result<Catalog, Error> {
        let mut catalog = Catalog::empty();
        for file in self.files {
            let XliffBody { groups, units } = file.body;
            for unit in groups.into_iter().flat_map(|g| g.units).chain(units) {
                catalog.add(unit)?;
            }
        }
        Ok(catalog)
    }
}

/// Loads the catalog stored at `path`, or an empty catalog if the file does not exist.
pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, Error> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no catalog yet, starting empty");
        return Ok(Catalog::empty());
    }
    XliffDocument::read_from(path)?.into_catalog()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    Source,
    Target,
    Note,
}

impl Leaf {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"source" => Some(Leaf::Source),
            b"target" => Some(Leaf::Target),
            b"note" => Some(Leaf::Note),
            _ => None,
        }
    }
}

/// A `<trans-unit>` being read.
struct UnitBuilder {
    unit: TranslationUnit,
    has_target: bool,
    note: Option<UnitNote>,
}

impl UnitBuilder {
    fn start(e: &BytesStart) -> Result<Self, Error> {
        let id = xml_attribute(e, b"id")?
            .ok_or_else(|| Error::InvalidResource("trans-unit missing 'id'".to_string()))?;
        let translate = xml_attribute(e, b"translate")?.is_none_or(|v| v != "no");
        let preserve_whitespace = xml_attribute(e, b"xml:space")?.as_deref() == Some("preserve");
        Ok(Self {
            unit: TranslationUnit {
                id,
                source: UnitSource::default(),
                target: UnitTarget::default(),
                note: None,
                other_notes: Vec::new(),
                translate,
                preserve_whitespace,
            },
            has_target: false,
            note: None,
        })
    }

    /// Opens a leaf element, reading its attributes.
    fn open(&mut self, leaf: Leaf, e: &BytesStart) -> Result<(), Error> {
        match leaf {
            Leaf::Source => {}
            Leaf::Target => {
                self.has_target = true;
                self.unit.target.state = xml_attribute(e, b"state")?
                    .map(|s| s.parse().unwrap_or(TranslationState::Other(s)));
            }
            Leaf::Note => {
                self.note = Some(UnitNote {
                    from: xml_attribute(e, b"from")?,
                    annotates: xml_attribute(e, b"annotates")?,
                    priority: xml_attribute(e, b"priority")?,
                    value: String::new(),
                });
            }
        }
        Ok(())
    }

    fn close(&mut self, leaf: Leaf, text: String) {
        match leaf {
            Leaf::Source => self.unit.source.value = Some(text),
            Leaf::Target => self.unit.target.value = text,
            Leaf::Note => {
                if let Some(mut note) = self.note.take() {
                    note.value = text;
                    if note.is_review_note() {
                        self.unit.note = Some(note);
                    } else {
                        self.unit.other_notes.push(note);
                    }
                }
            }
        }
    }

    fn finish(mut self) -> TranslationUnit {
        if !self.has_target {
            // no target yet: the unit mirrors its source like a freshly created one
            self.unit.target = UnitTarget {
                state: Some(TranslationState::New),
                value: self.unit.source.value.clone().unwrap_or_default(),
            };
        }
        self.unit
    }
}

impl Parser for XliffDocument {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut document = XliffDocument::default();
        let mut file: Option<XliffFile> = None;
        let mut group: Option<XliffGroup> = None;
        let mut unit: Option<UnitBuilder> = None;
        let mut leaf: Option<Leaf> = None;
        // open elements below the current <trans-unit>
        let mut depth = 0usize;
        let mut text = String::new();
        let mut in_header = false;

        loop {
            let event = xml_reader.read_event_into(&mut buf)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    match e.name().as_ref() {
                        b"xliff" => {
                            if let Some(version) = xml_attribute(e, b"version")? {
                                document.version = version;
                            }
                            document.schema_location = xml_attribute(e, b"xsi:schemaLocation")?;
                        }
                        b"file" => {
                            let new_file = read_file_attributes(e)?;
                            if is_empty {
                                document.files.push(new_file);
                            } else {
                                file = Some(new_file);
                            }
                        }
                        b"header" if !is_empty => in_header = true,
                        b"tool" if in_header => {
                            if let Some(file) = file.as_mut() {
                                file.header.get_or_insert_with(XliffHeader::default).tool =
                                    Some(read_tool_attributes(e)?);
                            }
                        }
                        b"group" if !is_empty => {
                            group = Some(XliffGroup {
                                id: xml_attribute(e, b"id")?,
                                datatype: xml_attribute(e, b"datatype")?,
                                units: Vec::new(),
                            });
                        }
                        b"trans-unit" => {
                            let builder = UnitBuilder::start(e)?;
                            if is_empty {
                                push_unit(builder.finish(), &mut file, &mut group)?;
                            } else {
                                unit = Some(builder);
                            }
                        }
                        name => {
                            if let Some(builder) = unit.as_mut() {
                                // only direct children belong to the unit; <alt-trans>
                                // carries its own source and target
                                if depth == 0 {
                                    if let Some(found) = Leaf::from_name(name) {
                                        builder.open(found, e)?;
                                        if is_empty {
                                            builder.close(found, String::new());
                                        } else {
                                            leaf = Some(found);
                                            text.clear();
                                        }
                                    }
                                }
                                if !is_empty {
                                    depth += 1;
                                }
                            }
                        }
                    }
                }
                Event::Text(e) if leaf.is_some() => {
                    text.push_str(&e.unescape()?);
                }
                Event::CData(e) if leaf.is_some() => {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
                Event::End(_) if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        if let (Some(builder), Some(closed)) = (unit.as_mut(), leaf.take()) {
                            builder.close(closed, std::mem::take(&mut text));
                        }
                    }
                }
                Event::End(ref e) => match e.name().as_ref() {
                    b"trans-unit" => {
                        if let Some(builder) = unit.take() {
                            push_unit(builder.finish(), &mut file, &mut group)?;
                        }
                    }
                    b"group" => {
                        if let (Some(finished), Some(file)) = (group.take(), file.as_mut()) {
                            file.body.groups.push(finished);
                        }
                    }
                    b"header" => in_header = false,
                    b"file" => {
                        if let Some(finished) = file.take() {
                            document.files.push(finished);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if unit.is_some() || file.is_some() {
            return Err(Error::InvalidResource(
                "unexpected end of XLIFF document".to_string(),
            ));
        }
        Ok(document)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 2);
        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut root = BytesStart::new("xliff");
        root.push_attribute(("version", self.version.as_str()));
        root.push_attribute(("xmlns", XLIFF_NAMESPACE));
        if let Some(location) = &self.schema_location {
            root.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
            root.push_attribute(("xsi:schemaLocation", location.as_str()));
        }
        xml_writer.write_event(Event::Start(root))?;

        for file in &self.files {
            write_file(&mut xml_writer, file)?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("xliff")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn push_unit(
    unit: TranslationUnit,
    file: &mut Option<XliffFile>,
    group: &mut Option<XliffGroup>,
) -> Result<(), Error> {
    if let Some(group) = group.as_mut() {
        group.units.push(unit);
    } else if let Some(file) = file.as_mut() {
        file.body.units.push(unit);
    } else {
        return Err(Error::InvalidResource(format!(
            "trans-unit `{}` outside of a <file>",
            unit.id
        )));
    }
    Ok(())
}

fn read_file_attributes(e: &BytesStart) -> Result<XliffFile, Error> {
    Ok(XliffFile {
        datatype: xml_attribute(e, b"datatype")?.unwrap_or_default(),
        source_language: xml_attribute(e, b"source-language")?.unwrap_or_default(),
        target_language: xml_attribute(e, b"target-language")?,
        original: xml_attribute(e, b"original")?.unwrap_or_default(),
        tool_id: xml_attribute(e, b"tool-id")?,
        product_name: xml_attribute(e, b"product-name")?,
        product_version: xml_attribute(e, b"product-version")?,
        build_num: xml_attribute(e, b"build-num")?,
        header: None,
        body: XliffBody::default(),
    })
}

fn read_tool_attributes(e: &BytesStart) -> Result<XliffTool, Error> {
    Ok(XliffTool {
        id: xml_attribute(e, b"tool-id")?.unwrap_or_default(),
        name: xml_attribute(e, b"tool-name")?,
        version: xml_attribute(e, b"tool-version")?,
        company: xml_attribute(e, b"tool-company")?,
    })
}

fn push_optional(element: &mut BytesStart, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        element.push_attribute((key, value.as_str()));
    }
}

fn write_file<W: Write>(xml_writer: &mut Writer<W>, file: &XliffFile) -> Result<(), Error> {
    let mut element = BytesStart::new("file");
    element.push_attribute(("datatype", file.datatype.as_str()));
    element.push_attribute(("source-language", file.source_language.as_str()));
    push_optional(&mut element, "target-language", &file.target_language);
    element.push_attribute(("original", file.original.as_str()));
    push_optional(&mut element, "tool-id", &file.tool_id);
    push_optional(&mut element, "product-name", &file.product_name);
    push_optional(&mut element, "product-version", &file.product_version);
    push_optional(&mut element, "build-num", &file.build_num);
    xml_writer.write_event(Event::Start(element))?;

    if let Some(header) = &file.header {
        xml_writer.write_event(Event::Start(BytesStart::new("header")))?;
        if let Some(tool) = &header.tool {
            let mut element = BytesStart::new("tool");
            element.push_attribute(("tool-id", tool.id.as_str()));
            push_optional(&mut element, "tool-name", &tool.name);
            push_optional(&mut element, "tool-version", &tool.version);
            push_optional(&mut element, "tool-company", &tool.company);
            xml_writer.write_event(Event::Empty(element))?;
        }
        xml_writer.write_event(Event::End(BytesEnd::new("header")))?;
    }

    xml_writer.write_event(Event::Start(BytesStart::new("body")))?;
    for group in &file.body.groups {
        let mut element = BytesStart::new("group");
        push_optional(&mut element, "id", &group.id);
        push_optional(&mut element, "datatype", &group.datatype);
        xml_writer.write_event(Event::Start(element))?;
        for unit in &group.units {
            write_unit(xml_writer, unit)?;
        }
        xml_writer.write_event(Event::End(BytesEnd::new("group")))?;
    }
    for unit in &file.body.units {
        write_unit(xml_writer, unit)?;
    }
    xml_writer.write_event(Event::End(BytesEnd::new("body")))?;

    xml_writer.write_event(Event::End(BytesEnd::new("file")))?;
    Ok(())
}

fn write_unit<W: Write>(xml_writer: &mut Writer<W>, unit: &TranslationUnit) -> Result<(), Error> {
    let mut element = BytesStart::new("trans-unit");
    element.push_attribute(("id", unit.id.as_str()));
    element.push_attribute(("translate", if unit.translate { "yes" } else { "no" }));
    if unit.preserve_whitespace {
        element.push_attribute(("xml:space", "preserve"));
    }
    xml_writer.write_event(Event::Start(element))?;

    let source = unit.source.value.as_deref().unwrap_or_default();
    write_leaf(xml_writer, BytesStart::new("source"), source)?;

    let mut target = BytesStart::new("target");
    if let Some(state) = &unit.target.state {
        target.push_attribute(("state", state.as_str()));
    }
    write_leaf(xml_writer, target, &unit.target.value)?;

    for note in unit.other_notes.iter().chain(&unit.note) {
        let mut element = BytesStart::new("note");
        push_optional(&mut element, "from", &note.from);
        push_optional(&mut element, "annotates", &note.annotates);
        push_optional(&mut element, "priority", &note.priority);
        write_leaf(xml_writer, element, &note.value)?;
    }

    xml_writer.write_event(Event::End(BytesEnd::new("trans-unit")))?;
    Ok(())
}

fn write_leaf<W: Write>(
    xml_writer: &mut Writer<W>,
    element: BytesStart,
    text: &str,
) -> Result<(), Error> {
    let end = element.to_end().into_owned();
    xml_writer.write_event(Event::Start(element))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(end))?;
    Ok(())
}
