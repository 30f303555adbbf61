//! Rate sheet loader
//!
//! Turns the sectioned CSV text into `FeeTables`. Malformed numbers are
//! always rejected. Missing sections, duplicate labels and short rows are
//! errors in strict mode and logged recoveries in lenient mode.

use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::error::FeeError;
use crate::numeric::parse_amount;
use crate::sheet::{Section, Sheet, SheetRow};
use crate::tables::{FeeMatrix, FeeTables, FlatTable};

/// Parse rate sheet text with the default (strict) configuration
pub fn load_tables(text: &str) -> Result<FeeTables, FeeError> {
    load_tables_with(text, &LoaderConfig::default())
}

/// Parse rate sheet text
pub fn load_tables_with(text: &str, config: &LoaderConfig) -> Result<FeeTables, FeeError> {
    config.validate()?;
    let sheet = Sheet::parse(text)?;
    let loader = Loader { sheet: &sheet, config };
    let names = &config.sections;

    let tables = FeeTables {
        four_year: loader.matrix(&names.four_year)?,
        two_year: loader.flat(&names.two_year)?,
        non_higher_ed: loader.flat(&names.non_higher_ed)?,
        business_partner: loader.flat(&names.business_partner)?,
        region_multipliers: loader.flat(&names.regions)?,
    };

    info!(
        rows = sheet.row_count(),
        gie_brackets = tables.four_year.gie_labels.len(),
        fte_brackets = tables.four_year.fte_labels.len(),
        two_year = tables.two_year.len(),
        non_higher_ed = tables.non_higher_ed.len(),
        business_partner = tables.business_partner.len(),
        regions = tables.region_multipliers.len(),
        "Loaded fee tables"
    );

    Ok(tables)
}

struct Loader<'a> {
    sheet: &'a Sheet,
    config: &'a LoaderConfig,
}

impl<'a> Loader<'a> {
    fn section(&self, name: &'a str) -> Result<Option<Section<'a>>, FeeError> {
        match self.sheet.section(name) {
            Some(section) => {
                debug!(
                    section = name,
                    line = section.header.line,
                    rows = section.rows.len(),
                    "Found section"
                );
                Ok(Some(section))
            }
            None if self.config.strict => Err(FeeError::MissingSection(name.trim().to_string())),
            None => {
                warn!(section = name, "Section not found, using an empty table");
                Ok(None)
            }
        }
    }

    fn matrix(&self, name: &'a str) -> Result<FeeMatrix, FeeError> {
        let mut matrix = FeeMatrix::default();
        let Some(section) = self.section(name)? else {
            return Ok(matrix);
        };

        for (column, label) in section.header.values().iter().enumerate() {
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            if matrix.fte_index.insert(label.to_string(), column).is_some() {
                self.duplicate(section.name, label, section.header.line)?;
            } else {
                matrix.fte_labels.push(label.to_string());
            }
        }
        // Trailing empty header cells from spreadsheet exports are not columns
        let width = matrix.fte_index.values().max().map_or(0, |c| c + 1);

        for row in &section.rows {
            let label = row.label();
            let cells = row.values();
            let mut fees = Vec::with_capacity(width);

            for column in 0..width {
                match cells.get(column) {
                    Some(cell) => fees.push(number(section.name, row, cell)?),
                    None if self.config.strict => {
                        return Err(ragged(section.name, row, width, cells.len()));
                    }
                    None => {
                        warn!(
                            section = section.name,
                            label,
                            line = row.line,
                            column,
                            "Missing matrix cell, using 0"
                        );
                        fees.push(0.0);
                    }
                }
            }

            if matrix.rows.insert(label.to_string(), fees).is_some() {
                self.duplicate(section.name, label, row.line)?;
            } else {
                matrix.gie_labels.push(label.to_string());
            }
        }

        Ok(matrix)
    }

    fn flat(&self, name: &'a str) -> Result<FlatTable, FeeError> {
        let mut table = FlatTable::default();
        let Some(section) = self.section(name)? else {
            return Ok(table);
        };

        for row in &section.rows {
            let label = row.label();
            let Some(cell) = row.values().first() else {
                if self.config.strict {
                    return Err(ragged(section.name, row, 1, 0));
                }
                warn!(
                    section = section.name,
                    label,
                    line = row.line,
                    "Row has no value, skipping"
                );
                continue;
            };

            let value = number(section.name, row, cell)?;
            if table.insert(label.to_string(), value) {
                self.duplicate(section.name, label, row.line)?;
            }
        }

        Ok(table)
    }

    fn duplicate(&self, section: &str, label: &str, line: usize) -> Result<(), FeeError> {
        if self.config.strict {
            return Err(FeeError::DuplicateLabel {
                section: section.to_string(),
                label: label.to_string(),
                line,
            });
        }
        warn!(section, label, line, "Duplicate label, keeping the last value");
        Ok(())
    }
}

fn number(section: &str, row: &SheetRow, cell: &str) -> Result<f64, FeeError> {
    parse_amount(cell).ok_or_else(|| FeeError::InvalidNumber {
        section: section.to_string(),
        line: row.line,
        value: cell.to_string(),
    })
}

fn ragged(section: &str, row: &SheetRow, expected: usize, found: usize) -> FeeError {
    FeeError::RaggedRow {
        section: section.to_string(),
        label: row.label().to_string(),
        line: row.line,
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHEET: &str = "\
Four Year Fees,\"Under 3,000\",\"3,000–4,999\",\"5,000–9,999\"
Under $10M,1000,1500,2000
\"$10M–$25M\",\"$1,800\",2400,3100

Two Year Fees,Fee
Under $10M,800
\"$10M+\",1200

Non-Higher Ed Fees,Fee
Museum,900
Library,650

Business Partner Fees,Fee
Gold,5000
Silver,2500

Regional Multipliers,Multiplier
NE,1.1
SE,0.9
";

    #[test]
    fn test_loads_all_sections() {
        let tables = load_tables(SHEET).unwrap();

        assert_eq!(
            tables.four_year.fte_labels,
            vec!["Under 3,000", "3,000–4,999", "5,000–9,999"]
        );
        assert_eq!(tables.four_year.gie_labels, vec!["Under $10M", "$10M–$25M"]);
        assert_eq!(tables.four_year("5,000–9,999", "$10M–$25M"), Some(3100.0));
        assert_eq!(tables.four_year("Under 3,000", "$10M–$25M"), Some(1800.0));
        assert_eq!(tables.two_year("$10M+"), Some(1200.0));
        assert_eq!(tables.non_higher_ed("Library"), Some(650.0));
        assert_eq!(tables.business_partner("Gold"), Some(5000.0));
        assert_eq!(tables.multiplier("SE"), Some(0.9));
    }

    #[test]
    fn test_strict_missing_section_fails() {
        let text = SHEET.replace("Business Partner Fees", "Partners");
        match load_tables(&text) {
            Err(FeeError::MissingSection(name)) => assert_eq!(name, "Business Partner Fees"),
            other => panic!("expected MissingSection, got {:?}", other),
        }
    }

    #[test]
    fn test_lenient_missing_section_is_empty() {
        let text = SHEET.replace("Business Partner Fees", "Partners");
        let tables = load_tables_with(&text, &LoaderConfig::lenient()).unwrap();
        assert!(tables.business_partner.is_empty());
        assert_eq!(tables.non_higher_ed("Museum"), Some(900.0));
    }

    #[test]
    fn test_malformed_number_fails_in_any_mode() {
        let text = SHEET.replace("Museum,900", "Museum,nine hundred");
        for config in [LoaderConfig::default(), LoaderConfig::lenient()] {
            match load_tables_with(&text, &config) {
                Err(FeeError::InvalidNumber { section, line, value }) => {
                    assert_eq!(section, "Non-Higher Ed Fees");
                    assert_eq!(line, 10);
                    assert_eq!(value, "nine hundred");
                }
                other => panic!("expected InvalidNumber, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let text = SHEET.replace("SE,0.9", "SE,-0.9");
        assert!(matches!(
            load_tables(&text),
            Err(FeeError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_short_matrix_row() {
        let text = SHEET.replace("Under $10M,1000,1500,2000", "Under $10M,1000,1500");
        assert!(matches!(
            load_tables(&text),
            Err(FeeError::RaggedRow { expected: 3, found: 2, .. })
        ));

        let tables = load_tables_with(&text, &LoaderConfig::lenient()).unwrap();
        assert_eq!(tables.four_year("5,000–9,999", "Under $10M"), Some(0.0));
    }

    #[test]
    fn test_flat_row_without_value() {
        let text = SHEET.replace("Silver,2500", "Silver");
        assert!(matches!(
            load_tables(&text),
            Err(FeeError::RaggedRow { .. })
        ));

        let tables = load_tables_with(&text, &LoaderConfig::lenient()).unwrap();
        assert_eq!(tables.business_partner.labels, vec!["Gold"]);
    }

    #[test]
    fn test_duplicate_labels() {
        let text = SHEET.replace("Library,650", "Museum,650");
        assert!(matches!(
            load_tables(&text),
            Err(FeeError::DuplicateLabel { .. })
        ));

        let tables = load_tables_with(&text, &LoaderConfig::lenient()).unwrap();
        assert_eq!(tables.non_higher_ed("Museum"), Some(650.0));
        assert_eq!(tables.non_higher_ed.labels, vec!["Museum"]);
    }

    #[test]
    fn test_duplicate_fte_header_keeps_last_column() {
        let text = SHEET.replace("\"5,000–9,999\"", "\"Under 3,000\"");
        assert!(matches!(
            load_tables(&text),
            Err(FeeError::DuplicateLabel { line: 1, .. })
        ));

        let tables = load_tables_with(&text, &LoaderConfig::lenient()).unwrap();
        assert_eq!(tables.four_year.fte_labels, vec!["Under 3,000", "3,000–4,999"]);
        assert_eq!(tables.four_year("Under 3,000", "Under $10M"), Some(2000.0));
        assert_eq!(tables.four_year("Under 3,000", "$10M–$25M"), Some(3100.0));
    }

    #[test]
    fn test_extra_matrix_cells_are_ignored() {
        let text = SHEET.replace(
            "Under $10M,1000,1500,2000",
            "Under $10M,1000,1500,2000,9999,n/a",
        );
        let tables = load_tables(&text).unwrap();
        assert_eq!(
            tables.four_year.row("Under $10M"),
            Some(&[1000.0, 1500.0, 2000.0][..])
        );
    }

    #[test]
    fn test_quoted_blank_separators() {
        let text = SHEET.replace("\n\n", "\n\"\",\"\"\n");
        for config in [LoaderConfig::default(), LoaderConfig::lenient()] {
            let tables = load_tables_with(&text, &config).unwrap();
            assert_eq!(tables, load_tables(SHEET).unwrap());
        }
    }

    #[test]
    fn test_custom_section_names() {
        let text = SHEET.replace("Regional Multipliers", "Region Factors");
        let config =
            LoaderConfig::from_json(r#"{"sections":{"regions":"Region Factors"}}"#).unwrap();
        let tables = load_tables_with(&text, &config).unwrap();
        assert_eq!(tables.multiplier("NE"), Some(1.1));
    }

    #[test]
    fn test_loading_twice_yields_identical_tables() {
        assert_eq!(load_tables(SHEET).unwrap(), load_tables(SHEET).unwrap());
    }
}
