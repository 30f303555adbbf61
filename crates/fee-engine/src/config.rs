//! Loader configuration
//!
//! Section names default to the headings used by the published rate sheet
//! and can be overridden from JSON when a sheet uses different wording.

use serde::{Deserialize, Serialize};

use crate::error::FeeError;

/// Header text that opens each section of the rate sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionNames {
    pub four_year: String,
    pub two_year: String,
    pub non_higher_ed: String,
    pub business_partner: String,
    pub regions: String,
}

impl Default for SectionNames {
    fn default() -> Self {
        Self {
            four_year: "Four Year Fees".to_string(),
            two_year: "Two Year Fees".to_string(),
            non_higher_ed: "Non-Higher Ed Fees".to_string(),
            business_partner: "Business Partner Fees".to_string(),
            regions: "Regional Multipliers".to_string(),
        }
    }
}

impl SectionNames {
    fn all(&self) -> [&str; 5] {
        [
            self.four_year.as_str(),
            self.two_year.as_str(),
            self.non_higher_ed.as_str(),
            self.business_partner.as_str(),
            self.regions.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Structural problems (missing sections, duplicates, short rows) are errors
    pub strict: bool,
    pub sections: SectionNames,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            strict: true,
            sections: SectionNames::default(),
        }
    }
}

impl LoaderConfig {
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, FeeError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| FeeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FeeError> {
        let names = self.sections.all();
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(FeeError::Config("section names must not be blank".into()));
            }
            if names[i + 1..].iter().any(|other| other.trim() == name.trim()) {
                return Err(FeeError::Config(format!(
                    "section name '{}' is used twice",
                    name.trim()
                )));
            }
        }
        Ok(())
    }
}
