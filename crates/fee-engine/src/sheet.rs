//! Raw row access for a sectioned CSV sheet
//!
//! The rate sheet is a single CSV file holding several tables one after
//! another. Each table starts with a header row whose first cell names the
//! section and runs until the next blank row. The `csv` crate skips empty
//! lines, so those are detected before the text reaches the reader; records
//! whose cells are all empty are treated as blank after parsing.

use crate::error::FeeError;

/// A non-blank CSV record with its 1-indexed source line
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl SheetRow {
    /// First cell, trimmed; used as the row label
    pub fn label(&self) -> &str {
        self.cells.first().map(|c| c.trim()).unwrap_or("")
    }

    /// Cells after the label
    pub fn values(&self) -> &[String] {
        self.cells.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Row(SheetRow),
    Blank,
}

/// A section located in the sheet: its header row and the data rows below it
#[derive(Debug)]
pub struct Section<'a> {
    pub name: &'a str,
    pub header: &'a SheetRow,
    pub rows: Vec<&'a SheetRow>,
}

#[derive(Debug, Default)]
pub struct Sheet {
    entries: Vec<Entry>,
}

impl Sheet {
    /// Split `text` into records, keeping blank rows as section terminators
    pub fn parse(text: &str) -> Result<Self, FeeError> {
        let mut entries = Vec::new();
        let mut block = String::new();
        let mut block_start = 0;

        for (idx, line) in text.lines().enumerate() {
            if is_blank_line(line) {
                if !block.is_empty() {
                    read_block(&block, block_start, &mut entries)?;
                    block.clear();
                }
                entries.push(Entry::Blank);
                continue;
            }
            if block.is_empty() {
                block_start = idx + 1;
            }
            block.push_str(line);
            block.push('\n');
        }
        if !block.is_empty() {
            read_block(&block, block_start, &mut entries)?;
        }

        Ok(Self { entries })
    }

    /// Number of non-blank records
    pub fn row_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Row(_)))
            .count()
    }

    /// Find the section whose header row's first cell equals `name`
    pub fn section<'a>(&'a self, name: &'a str) -> Option<Section<'a>> {
        let wanted = name.trim();
        // Headers open the sheet or follow a blank row; data rows never match
        let (start, header) = self
            .entries
            .iter()
            .enumerate()
            .find_map(|(idx, e)| match e {
                Entry::Row(row)
                    if row.label() == wanted
                        && (idx == 0 || self.entries[idx - 1] == Entry::Blank) =>
                {
                    Some((idx, row))
                }
                _ => None,
            })?;

        let rows = self.entries[start + 1..]
            .iter()
            .map_while(|e| match e {
                Entry::Row(row) => Some(row),
                Entry::Blank => None,
            })
            .collect();

        Some(Section {
            name: wanted,
            header,
            rows,
        })
    }
}

/// Empty lines and lines holding nothing but separators count as blank rows
fn is_blank_line(line: &str) -> bool {
    line.chars().all(|c| c == ',' || c.is_whitespace())
}

fn read_block(block: &str, first_line: usize, entries: &mut Vec<Entry>) -> Result<(), FeeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(block.as_bytes());

    for result in reader.records() {
        let record = result?;
        let offset = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(1)
            .saturating_sub(1);
        // Quoted empty cells ("","") survive the raw-line check
        if record.iter().all(|cell| cell.trim().is_empty()) {
            entries.push(Entry::Blank);
            continue;
        }
        entries.push(Entry::Row(SheetRow {
            line: first_line + offset,
            cells: record.iter().map(|s| s.to_string()).collect(),
        }));
    }

    Ok(())
}
