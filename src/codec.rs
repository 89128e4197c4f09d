//! Acronym list text codec.
//!
//! Converts between the flat acronym file and a list of records.
//!
//! ## Format
//!
//! One record per line, acronym and description separated by the first `|`:
//!
//! ```text
//! FBI|Federal Bureau of Investigation
//! NASA|National Aeronautics and Space Administration
//! ```
//!
//! Blank lines are ignored. Any further `|` belongs to the description.
//! Line endings may be `\n` or `\r\n`; every record must pass
//! [`AcronymRecord::validate`].
//! Encoded output is sorted by acronym and has no trailing newline.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::model::{AcronymRecord, RecordError};

/// Field separator between acronym and description.
pub const DELIMITER: char = '|';

/// Errors that can occur while decoding an acronym list.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Line {line}: missing '|' between acronym and description")]
    MissingDelimiter { line: usize },

    #[error("Line {line}: duplicate acronym '{acronym}'")]
    DuplicateAcronym { acronym: String, line: usize },

    #[error("Line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: RecordError,
    },
}

/// Result type for codec operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Decodes acronym list content into records sorted by acronym.
///
/// Line numbers in errors are 1-based and count blank lines too.
pub fn decode(text: &str) -> DecodeResult<Vec<AcronymRecord>> {
    let mut records = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (idx, raw) in text.split('\n').enumerate() {
        let line_number = idx + 1;
        let line = raw.trim_end_matches('\r');

        // Skip blank lines
        if line.trim().is_empty() {
            continue;
        }

        let (acronym, description) = line
            .split_once(DELIMITER)
            .ok_or(DecodeError::MissingDelimiter { line: line_number })?;

        let record = AcronymRecord::new(acronym, description);
        record
            .validate()
            .map_err(|source| DecodeError::InvalidRecord {
                line: line_number,
                source,
            })?;

        if !seen.insert(acronym) {
            return Err(DecodeError::DuplicateAcronym {
                acronym: acronym.to_string(),
                line: line_number,
            });
        }

        records.push(record);
    }

    sort_records(&mut records);
    Ok(records)
}

/// Reads and decodes an acronym file.
pub fn decode_file<P: AsRef<Path>>(path: P) -> DecodeResult<Vec<AcronymRecord>> {
    let content = fs::read_to_string(path)?;
    decode(&content)
}

/// Encodes records as `ACRONYM|DESCRIPTION` lines in canonical order.
pub fn encode(records: &[AcronymRecord]) -> String {
    let mut sorted: Vec<&AcronymRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.acronym.cmp(&b.acronym));

    sorted
        .iter()
        .map(|r| format!("{}{}{}", r.acronym, DELIMITER, r.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sorts records into canonical order (ascending, case-sensitive).
pub fn sort_records(records: &mut [AcronymRecord]) {
    records.sort_by(|a, b| a.acronym.cmp(&b.acronym));
}
