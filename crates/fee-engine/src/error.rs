use thiserror::Error;

use crate::selection::SelectionField;

#[derive(Error, Debug)]
pub enum FeeError {
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Section '{0}' not found in rate table")]
    MissingSection(String),

    #[error("Invalid number '{value}' in section '{section}' at line {line}")]
    InvalidNumber {
        section: String,
        line: usize,
        value: String,
    },

    #[error("Row '{label}' in section '{section}' at line {line} has {found} value(s), expected {expected}")]
    RaggedRow {
        section: String,
        label: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate label '{label}' in section '{section}' at line {line}")]
    DuplicateLabel {
        section: String,
        label: String,
        line: usize,
    },

    #[error("Please select a value for {0}")]
    MissingSelection(SelectionField),

    #[error("No entry for '{label}' in {table}")]
    NotFound { table: &'static str, label: String },

    #[error("Unknown fee category: {0}")]
    UnknownCategory(String),

    #[error("Invalid loader configuration: {0}")]
    Config(String),
}

impl FeeError {
    /// True for errors caused by the user's selections rather than the rate file
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FeeError::MissingSelection(_) | FeeError::NotFound { .. } | FeeError::UnknownCategory(_)
        )
    }
}
