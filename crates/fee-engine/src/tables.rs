//! Typed rate tables
//!
//! `FeeTables` is built once by the loader and is read-only afterwards.
//! Every lookup here returns `Option`; the zero-defaulting behaviour lives in
//! the calculator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Four-year fee matrix: GIE bracket rows by FTE bracket columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeMatrix {
    /// FTE labels in column order
    pub fte_labels: Vec<String>,
    /// FTE label -> column position
    pub fte_index: HashMap<String, usize>,
    /// GIE labels in row order
    pub gie_labels: Vec<String>,
    /// GIE label -> fees by FTE column
    pub rows: HashMap<String, Vec<f64>>,
}

impl FeeMatrix {
    pub fn column(&self, fte_label: &str) -> Option<usize> {
        self.fte_index.get(fte_label.trim()).copied()
    }

    pub fn row(&self, gie_label: &str) -> Option<&[f64]> {
        self.rows.get(gie_label.trim()).map(Vec::as_slice)
    }

    /// Exact cell lookup; `None` if either label is unknown
    pub fn fee(&self, fte_label: &str, gie_label: &str) -> Option<f64> {
        let column = self.column(fte_label)?;
        self.row(gie_label)?.get(column).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoYearOption {
    pub label: String,
    pub fee: f64,
}

/// Label -> value table that remembers the order labels appeared in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatTable {
    pub labels: Vec<String>,
    pub values: HashMap<String, f64>,
}

impl FlatTable {
    pub fn get(&self, label: &str) -> Option<f64> {
        self.values.get(label.trim()).copied()
    }

    /// Insert or overwrite; returns true if the label was already present
    pub fn insert(&mut self, label: String, value: f64) -> bool {
        if self.values.insert(label.clone(), value).is_some() {
            return true;
        }
        self.labels.push(label);
        false
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Dropdown option lists, in source order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeOptions {
    pub fte_brackets: Vec<String>,
    pub four_year_gie_brackets: Vec<String>,
    pub two_year: Vec<TwoYearOption>,
    pub non_higher_ed_categories: Vec<String>,
    pub business_partner_levels: Vec<String>,
    pub regions: Vec<String>,
}

/// All rate tables loaded from one sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeTables {
    pub four_year: FeeMatrix,
    pub two_year: FlatTable,
    pub non_higher_ed: FlatTable,
    pub business_partner: FlatTable,
    pub region_multipliers: FlatTable,
}

impl FeeTables {
    pub fn four_year(&self, fte_label: &str, gie_label: &str) -> Option<f64> {
        self.four_year.fee(fte_label, gie_label)
    }

    pub fn two_year(&self, gie_label: &str) -> Option<f64> {
        self.two_year.get(gie_label)
    }

    pub fn non_higher_ed(&self, category: &str) -> Option<f64> {
        self.non_higher_ed.get(category)
    }

    pub fn business_partner(&self, level: &str) -> Option<f64> {
        self.business_partner.get(level)
    }

    pub fn multiplier(&self, region: &str) -> Option<f64> {
        self.region_multipliers.get(region)
    }

    pub fn two_year_options(&self) -> Vec<TwoYearOption> {
        self.two_year
            .labels
            .iter()
            .filter_map(|label| {
                self.two_year.get(label).map(|fee| TwoYearOption {
                    label: label.clone(),
                    fee,
                })
            })
            .collect()
    }

    pub fn options(&self) -> FeeOptions {
        FeeOptions {
            fte_brackets: self.four_year.fte_labels.clone(),
            four_year_gie_brackets: self.four_year.gie_labels.clone(),
            two_year: self.two_year_options(),
            non_higher_ed_categories: self.non_higher_ed.labels.clone(),
            business_partner_levels: self.business_partner.labels.clone(),
            regions: self.region_multipliers.labels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> FeeMatrix {
        let mut m = FeeMatrix::default();
        for (i, label) in ["Under 3,000", "3,000–4,999"].iter().enumerate() {
            m.fte_labels.push(label.to_string());
            m.fte_index.insert(label.to_string(), i);
        }
        m.gie_labels.push("Under $10M".to_string());
        m.rows.insert("Under $10M".to_string(), vec![1000.0, 1500.0]);
        m
    }

    #[test]
    fn test_matrix_fee_exact_cell() {
        let m = matrix();
        assert_eq!(m.fee("3,000–4,999", "Under $10M"), Some(1500.0));
        assert_eq!(m.fee(" Under 3,000 ", "Under $10M"), Some(1000.0));
    }

    #[test]
    fn test_matrix_fee_unknown_labels() {
        let m = matrix();
        assert_eq!(m.fee("10,000+", "Under $10M"), None);
        assert_eq!(m.fee("Under 3,000", "$1B+"), None);
    }

    #[test]
    fn test_flat_table_insert_reports_duplicates_and_keeps_order() {
        let mut t = FlatTable::default();
        assert!(!t.insert("Gold".into(), 5000.0));
        assert!(!t.insert("Silver".into(), 2500.0));
        assert!(t.insert("Gold".into(), 6000.0));
        assert_eq!(t.labels, vec!["Gold", "Silver"]);
        assert_eq!(t.get("Gold"), Some(6000.0));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_options_follow_source_order() {
        let mut tables = FeeTables {
            four_year: matrix(),
            ..Default::default()
        };
        tables.two_year.insert("Under $10M".into(), 800.0);
        tables.region_multipliers.insert("WE".into(), 1.2);
        tables.region_multipliers.insert("NE".into(), 1.1);

        let options = tables.options();
        assert_eq!(options.fte_brackets, vec!["Under 3,000", "3,000–4,999"]);
        assert_eq!(options.regions, vec!["WE", "NE"]);
        assert_eq!(
            options.two_year,
            vec![TwoYearOption {
                label: "Under $10M".into(),
                fee: 800.0
            }]
        );
    }
}
