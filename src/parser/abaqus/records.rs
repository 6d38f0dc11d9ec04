// src/parser/abaqus/records.rs

//! Splits Abaqus input text into keyword records.
//!
//! Every physical line is trimmed, stripped of all whitespace and upper-cased.
//! `**` lines are comments. A line starting with `*` opens a record; a keyword
//! line ending in a comma continues on the next line. Everything else is a
//! comma-separated data line belonging to the open record.

use crate::error::{Location, MeshImportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLine {
    pub line: usize,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRecord {
    /// Upper-case keyword without the leading `*`, e.g. `NODE`, `ELEMENT`.
    pub keyword: String,
    pub parameters: Vec<(String, Option<String>)>,
    pub data: Vec<DataLine>,
    pub line: usize,
}

impl KeywordRecord {
    /// Value of a `NAME=VALUE` parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.parameters.iter().any(|(key, _)| key == name)
    }

    pub fn location(&self) -> Location {
        Location::Line(self.line)
    }
}

pub fn tokenize(content: &str) -> Result<Vec<KeywordRecord>, MeshImportError> {
    let mut records: Vec<KeywordRecord> = Vec::new();
    let mut continues_keyword = false;

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let folded: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        if folded.is_empty() || folded.starts_with("**") {
            continue;
        }

        if continues_keyword {
            if let Some(record) = records.last_mut() {
                continues_keyword = folded.ends_with(',');
                record.parameters.extend(parse_parameters(&folded));
                continue;
            }
        }

        if let Some(keyword_line) = folded.strip_prefix('*') {
            let mut parts = keyword_line.splitn(2, ',');
            let keyword = parts.next().unwrap_or_default().to_string();
            if keyword.is_empty() {
                return Err(MeshImportError::malformed(Location::Line(line), "empty keyword"));
            }
            let parameters = parts.next().map(parse_parameters).unwrap_or_default();
            continues_keyword = folded.ends_with(',');

            records.push(KeywordRecord {
                keyword,
                parameters,
                data: Vec::new(),
                line,
            });
            continue;
        }

        let record = records.last_mut().ok_or_else(|| {
            MeshImportError::malformed(Location::Line(line), "data line before the first keyword")
        })?;
        record.data.push(DataLine {
            line,
            fields: folded
                .split(',')
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect(),
        });
    }

    Ok(records)
}

fn parse_parameters(text: &str) -> Vec<(String, Option<String>)> {
    text.split(',')
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((key, value)) => (key.to_string(), Some(value.to_string())),
            None => (part.to_string(), None),
        })
        .collect()
}
