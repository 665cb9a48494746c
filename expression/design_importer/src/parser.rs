use std::io::BufRead;

use tracing::trace;

use crate::error::{DesignFileFormatError, ImportError};

/// A line of the file, 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorLine {
    pub line: usize,
    pub text: String,
}

/// A tab-delimited line, cells untrimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub cells: Vec<String>,
}

impl Row {
    fn new(line: usize, text: &str) -> Self {
        Self {
            line,
            cells: text
                .split('\t')
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, column: usize) -> &str {
        self.cells
            .get(column)
            .map_or("", |cell| cell.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignFile {
    pub factor_lines: Vec<FactorLine>,
    pub header: Row,
    pub rows: Vec<Row>,
}

enum LineKind<'a> {
    Factor(&'a str),
    Ignored,
    Table,
}

fn classify<'a>(text: &'a str, sentinel: &str) -> LineKind<'a> {
    if let Some(description) = text.strip_prefix(sentinel) {
        LineKind::Factor(description)
    } else if text.trim().is_empty() || text.starts_with('#') {
        LineKind::Ignored
    } else {
        LineKind::Table
    }
}

/// Splits a design file into factor description lines, the header and the sample rows.
///
/// Factor description lines have `sentinel` removed. Blank lines and other lines starting with `#` are skipped.
/// The first remaining line is the header, every later one a sample row.
pub fn parse_design_file<R: BufRead>(reader: R, sentinel: &str) -> Result<DesignFile, ImportError> {
    let mut factor_lines = vec![];
    let mut header: Option<Row> = None;
    let mut rows = vec![];

    for (index, text) in reader.lines().enumerate() {
        let text = text?;
        let text = text.strip_suffix('\r').unwrap_or(&text);
        let line = index + 1;

        match classify(text, sentinel) {
            LineKind::Factor(description) => {
                trace!("Factor line. line: {}, text: '{}'", line, description);
                factor_lines.push(FactorLine {
                    line,
                    text: description.to_string(),
                });
            }
            LineKind::Ignored => {}
            LineKind::Table if header.is_none() => header = Some(Row::new(line, text)),
            LineKind::Table => rows.push(Row::new(line, text)),
        }
    }

    if factor_lines.is_empty() {
        return Err(DesignFileFormatError::MissingFactorDescriptions {
            sentinel: sentinel.to_string(),
        }
        .into());
    }
    let header = header.ok_or(DesignFileFormatError::MissingHeader)?;
    if rows.is_empty() {
        return Err(DesignFileFormatError::MissingSampleLines.into());
    }

    Ok(DesignFile {
        factor_lines,
        header,
        rows,
    })
}
