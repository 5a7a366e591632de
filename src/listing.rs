//! Tokenizer for the tabular text printed by `<runtime> image ls`.
//!
//! The output is a header line followed by one row per image, columns separated by
//! runs of whitespace. Only the first data row is ever consulted.

use thiserror::Error;

/// Zero-based column holding the image identifier (`REPOSITORY TAG IMAGE_ID ...`).
pub const IMAGE_ID_COLUMN: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("line {line} of image listing has {found} fields, expected at least {expected}: {row:?}")]
    MissingField {
        line: usize,
        expected: usize,
        found: usize,
        row: String,
    },
}

/// One whitespace-delimited data row, remembering where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    line: usize,
    raw: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn new(line: usize, raw: &'a str) -> Self {
        Self {
            line,
            raw,
            fields: raw.split_whitespace().collect(),
        }
    }

    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Result<&'a str, ListingError> {
        self.fields
            .get(index)
            .copied()
            .ok_or_else(|| ListingError::MissingField {
                line: self.line,
                expected: index + 1,
                found: self.fields.len(),
                row: self.raw.to_string(),
            })
    }
}

/// Returns the row right after the header, or `None` when that line is absent or empty.
pub fn first_data_row(output: &str) -> Option<Row<'_>> {
    // Lines are numbered from 1 in errors; the header is line 1.
    output
        .lines()
        .nth(1)
        .filter(|line| !line.is_empty())
        .map(|line| Row::new(2, line))
}

/// Extracts the image identifier from `image ls` output.
///
/// `Ok(None)` means the runtime listed no image. A data row too short to hold the
/// identifier column is a [`ListingError`].
pub fn parse_image_id(output: &str) -> Result<Option<String>, ListingError> {
    match first_data_row(output) {
        Some(row) => row.field(IMAGE_ID_COLUMN).map(|id| Some(id.to_string())),
        None => Ok(None),
    }
}
