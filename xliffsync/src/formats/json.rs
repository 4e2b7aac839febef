//! Support for flat JSON resources: one object mapping names to strings.
//!
//! ```json
//! {
//!   "greeting": "Hello",
//!   "farewell": null
//! }
//! ```
//!
//! Key order is preserved in both directions.

use std::io::{BufRead, Write};

use serde_json::{Map, Value};

use crate::{
    error::Error,
    traits::Parser,
    types::{SourceLine, TargetLine},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub entries: Vec<(String, Option<String>)>,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let object: Map<String, Value> = serde_json::from_reader(reader)?;
        let entries = object
            .into_iter()
            .map(|(name, value)| match value {
                Value::String(s) => Ok((name, Some(s))),
                Value::Null => Ok((name, None)),
                other => Err(Error::InvalidResource(format!(
                    "value of `{}` must be a string or null, found {}",
                    name, other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Format { entries })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(name, value)| {
                let value = value.clone().map_or(Value::Null, Value::String);
                (name.clone(), value)
            })
            .collect();
        serde_json::to_writer_pretty(&mut writer, &object)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl From<Format> for Vec<SourceLine> {
    fn from(value: Format) -> Self {
        value
            .entries
            .into_iter()
            .map(|(name, value)| SourceLine { name, value })
            .collect()
    }
}

impl From<&[TargetLine]> for Format {
    fn from(lines: &[TargetLine]) -> Self {
        Format {
            entries: lines
                .iter()
                .map(|line| (line.name.clone(), Some(line.value.clone())))
                .collect(),
        }
    }
}
