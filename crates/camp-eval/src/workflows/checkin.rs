//! Participant check-in roster sheet and single-cell status updates.

use std::io::{Read, Write};

use serde::Serialize;

use super::evaluation::domain::Participant;
use super::evaluation::layout::{CellValue, ReportPayload, StyleRegion, StyleTag};

pub const CHECKED_IN_MARK: &str = "✓";

/// Column positions of the roster sheet, zero based, and how many leading
/// header rows are never matched against participant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterColumns {
    pub name: usize,
    pub status: usize,
    pub header_rows: usize,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            name: 0,
            status: 1,
            header_rows: 1,
        }
    }
}

/// Full roster: header row, then participants ordered by category and name.
pub fn roster_payload(participants: &[Participant]) -> ReportPayload {
    let header = vec![
        CellValue::text("Participant Name"),
        CellValue::text("Check-in Status"),
        CellValue::text("Type"),
    ];
    let width = header.len();

    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by(|left, right| {
        left.category
            .cmp(&right.category)
            .then_with(|| left.name.cmp(&right.name))
            .then_with(|| left.id.cmp(&right.id))
    });

    let mut matrix = Vec::with_capacity(ordered.len() + 1);
    matrix.push(header);
    matrix.extend(ordered.into_iter().map(|participant| {
        vec![
            CellValue::text(&participant.name),
            status_cell(participant.checked_in),
            CellValue::text(participant.category.label()),
        ]
    }));

    ReportPayload {
        matrix,
        regions: vec![StyleRegion {
            row_start: 0,
            row_end: 1,
            col_start: 0,
            col_end: width,
            style: StyleTag::RosterHeader,
            category: None,
        }],
    }
}

fn status_cell(checked_in: bool) -> CellValue {
    if checked_in {
        CellValue::text(CHECKED_IN_MARK)
    } else {
        CellValue::Blank
    }
}

/// 1-based row whose name cell matches `name` after trimming both sides.
///
/// Every row below the header is searched. Participants are not assumed to
/// sit inside fixed leader or supporter row ranges.
pub fn locate_participant(
    rows: &[Vec<String>],
    columns: RosterColumns,
    name: &str,
) -> Option<usize> {
    let wanted = name.trim();
    if wanted.is_empty() {
        return None;
    }

    rows.iter()
        .enumerate()
        .skip(columns.header_rows)
        .find(|(_, row)| row.get(columns.name).map(|cell| cell.trim()) == Some(wanted))
        .map(|(index, _)| index + 1)
}

/// Single status cell write for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInUpdate {
    pub row: usize,
    pub column: usize,
    pub checked_in: bool,
}

impl CheckInUpdate {
    pub fn locate(
        rows: &[Vec<String>],
        columns: RosterColumns,
        name: &str,
        checked_in: bool,
    ) -> Option<Self> {
        locate_participant(rows, columns, name).map(|row| Self {
            row,
            column: columns.status,
            checked_in,
        })
    }

    /// A1 notation of the target cell, e.g. `I35`.
    pub fn cell_reference(&self) -> String {
        format!("{}{}", column_letters(self.column), self.row)
    }

    /// Value as entered into a checkbox cell.
    pub fn sheet_value(&self) -> &'static str {
        if self.checked_in {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// Text `apply` stores in a roster export: the mark or an empty cell.
    pub fn written_value(&self) -> &'static str {
        if self.checked_in {
            CHECKED_IN_MARK
        } else {
            ""
        }
    }

    /// Apply the update to an in-memory copy of the sheet, growing the row if needed.
    pub fn apply(&self, rows: &mut [Vec<String>]) {
        let Some(row) = self.row.checked_sub(1).and_then(|index| rows.get_mut(index)) else {
            return;
        };
        if row.len() <= self.column {
            row.resize(self.column + 1, String::new());
        }
        row[self.column] = self.written_value().to_string();
    }
}

/// Reads a roster sheet export. No header handling; rows keep their widths.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Vec<String>>, csv::Error> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .records()
        .map(|record| record.map(|row| row.iter().map(str::to_string).collect()))
        .collect()
}

pub fn write_rows<W: Write>(writer: W, rows: &[Vec<String>]) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn column_letters(column: usize) -> String {
    let mut remaining = column + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push(char::from(b'A' + offset as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}
