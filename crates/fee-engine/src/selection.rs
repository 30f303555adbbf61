//! Fee categories and the form selections that drive a calculation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FeeError;

/// Membership category; decides which table prices the membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeeCategory {
    FourYear,
    TwoYear,
    NonHigherEd,
    BusinessPartner,
}

impl FeeCategory {
    pub const ALL: [FeeCategory; 4] = [
        FeeCategory::FourYear,
        FeeCategory::TwoYear,
        FeeCategory::NonHigherEd,
        FeeCategory::BusinessPartner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeeCategory::FourYear => "four-year",
            FeeCategory::TwoYear => "two-year",
            FeeCategory::NonHigherEd => "non-higher-ed",
            FeeCategory::BusinessPartner => "business-partner",
        }
    }

    /// Selections the form must have before this category can be priced
    pub fn required_fields(&self) -> &'static [SelectionField] {
        match self {
            FeeCategory::FourYear => &[
                SelectionField::Fte,
                SelectionField::Gie,
                SelectionField::Region,
            ],
            FeeCategory::TwoYear => &[SelectionField::Gie, SelectionField::Region],
            FeeCategory::NonHigherEd => &[SelectionField::Organization, SelectionField::Region],
            FeeCategory::BusinessPartner => &[SelectionField::Level],
        }
    }

    /// Business partners pay a flat national fee with no regional component
    pub fn has_regional_fee(&self) -> bool {
        !matches!(self, FeeCategory::BusinessPartner)
    }
}

impl fmt::Display for FeeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeCategory {
    type Err = FeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        FeeCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| FeeError::UnknownCategory(s.trim().to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionField {
    Fte,
    Gie,
    Organization,
    Level,
    Region,
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectionField::Fte => "FTE enrollment",
            SelectionField::Gie => "gross institutional expenditure",
            SelectionField::Organization => "organization type",
            SelectionField::Level => "partnership level",
            SelectionField::Region => "region",
        })
    }
}

/// Values picked in the fee form; unused fields stay `None`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selections {
    pub fte: Option<String>,
    pub gie: Option<String>,
    pub organization: Option<String>,
    pub level: Option<String>,
    pub region: Option<String>,
}

impl Selections {
    /// Selected value for `field`, treating blank strings as unselected
    pub fn get(&self, field: SelectionField) -> Option<&str> {
        let value = match field {
            SelectionField::Fte => &self.fte,
            SelectionField::Gie => &self.gie,
            SelectionField::Organization => &self.organization,
            SelectionField::Level => &self.level,
            SelectionField::Region => &self.region,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Selected value for `field` or a validation error naming it
    pub fn require(&self, field: SelectionField) -> Result<&str, FeeError> {
        self.get(field).ok_or(FeeError::MissingSelection(field))
    }

    /// Check every field `category` needs, reporting the first missing one
    pub fn validate(&self, category: FeeCategory) -> Result<(), FeeError> {
        for field in category.required_fields() {
            self.require(*field)?;
        }
        Ok(())
    }
}
