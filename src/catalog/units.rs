//! Parser for RFC822-style unit files (`*.pxu`).
//!
//! Records are separated by blank lines. A field starts with `key: value`;
//! lines that begin with whitespace continue the previous field, and a
//! continuation consisting of a single `.` stands for an empty line. Lines
//! starting with `#` are comments. A leading `_` on a key only marks the
//! field as translatable and is dropped.
use anyhow::{bail, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct UnitRecord {
    /// 1-based line where the record starts.
    pub(super) line: usize,
    fields: Vec<(String, String)>,
}

impl UnitRecord {
    pub(super) fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    fn push_field(&mut self, key: String, value: String) {
        self.fields.push((key, value));
    }

    fn extend_last(&mut self, text: &str) -> bool {
        let Some((_, value)) = self.fields.last_mut() else {
            return false;
        };
        if !value.is_empty() {
            value.push('\n');
        }
        value.push_str(text);
        true
    }
}

pub(super) fn parse_units(text: &str) -> Result<Vec<UnitRecord>> {
    let mut records = Vec::new();
    let mut current: Option<UnitRecord> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        if raw.starts_with('#') {
            continue;
        }
        if raw.trim().is_empty() {
            if let Some(record) = current.take() {
                records.push(record);
            }
            continue;
        }
        if raw.starts_with([' ', '\t']) {
            let content = raw.trim();
            let content = if content == "." { "" } else { content };
            let extended = current
                .as_mut()
                .is_some_and(|record| record.extend_last(content));
            if !extended {
                bail!("line {line_no}: continuation line without a field");
            }
            continue;
        }
        let Some((key, value)) = raw.split_once(':') else {
            bail!("line {line_no}: expected `key: value`");
        };
        let key = key.trim().trim_start_matches('_');
        if key.is_empty() {
            bail!("line {line_no}: empty field name");
        }
        current
            .get_or_insert_with(|| UnitRecord {
                line: line_no,
                fields: Vec::new(),
            })
            .push_field(key.to_string(), value.trim().to_string());
    }
    if let Some(record) = current {
        records.push(record);
    }
    Ok(records)
}
