//! Support for two-column CSV resources (`key,value`, no header row).
//!
//! As a source, an empty value cell is read as an empty string; CSV cannot
//! distinguish a missing value from an empty one.
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    traits::Parser,
    types::{SourceLine, TargetLine},
};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CSVRecord {
    pub key: String,
    pub value: String,
}

impl Parser for Vec<CSVRecord> {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);
        let mut records = Vec::new();
        for result in rdr.deserialize() {
            records.push(result?);
        }
        Ok(records)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        for record in self {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl From<CSVRecord> for SourceLine {
    fn from(record: CSVRecord) -> Self {
        SourceLine {
            name: record.key,
            value: Some(record.value),
        }
    }
}

impl From<&TargetLine> for CSVRecord {
    fn from(line: &TargetLine) -> Self {
        CSVRecord {
            key: line.name.clone(),
            value: line.value.clone(),
        }
    }
}
