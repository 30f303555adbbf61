//! Fee calculation over loaded rate tables
//!
//! The default calculator degrades missing table entries to a zero fee, the
//! way the fee form always has. `FeeCalculator::strict` reports them as
//! `FeeError::NotFound` instead.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::FeeError;
use crate::selection::{FeeCategory, SelectionField, Selections};
use crate::tables::FeeTables;

/// National, regional and total fee for one selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeBreakdown {
    pub national: f64,
    pub regional: f64,
    pub total: f64,
}

impl FeeBreakdown {
    pub fn new(national: f64, regional: f64) -> Self {
        Self {
            national,
            regional,
            total: national + regional,
        }
    }
}

impl fmt::Display for FeeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "National fee: {}", format_fee(self.national))?;
        writeln!(f, "Regional fee: {}", format_fee(self.regional))?;
        write!(f, "Total fee:    {}", format_fee(self.total))
    }
}

/// Two-decimal rendering used for every displayed fee
pub fn format_fee(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    ZeroOnMissing,
    Strict,
}

pub struct FeeCalculator<'a> {
    tables: &'a FeeTables,
    lookup: Lookup,
}

impl<'a> FeeCalculator<'a> {
    pub fn new(tables: &'a FeeTables) -> Self {
        Self {
            tables,
            lookup: Lookup::ZeroOnMissing,
        }
    }

    /// Calculator whose `total_fee` fails on labels missing from the tables
    pub fn strict(tables: &'a FeeTables) -> Self {
        Self {
            tables,
            lookup: Lookup::Strict,
        }
    }

    pub fn tables(&self) -> &FeeTables {
        self.tables
    }

    /// Four-year fee for an FTE/GIE pair.
    ///
    /// An unknown FTE label falls back to the first column; an unknown GIE
    /// label yields 0.
    pub fn four_year_fee(&self, fte_label: &str, gie_label: &str) -> f64 {
        let matrix = &self.tables.four_year;
        let column = matrix.column(fte_label).unwrap_or_else(|| {
            debug!(fte = fte_label, "Unknown FTE bracket, using first column");
            0
        });
        match matrix.row(gie_label) {
            Some(row) => row.get(column).copied().unwrap_or(0.0),
            None => {
                debug!(gie = gie_label, "Unknown GIE bracket, fee is 0");
                0.0
            }
        }
    }

    pub fn two_year_fee(&self, gie_label: &str) -> f64 {
        or_zero(self.tables.two_year(gie_label), "two-year fees", gie_label)
    }

    pub fn non_higher_ed_fee(&self, category: &str) -> f64 {
        or_zero(
            self.tables.non_higher_ed(category),
            "non-higher-ed fees",
            category,
        )
    }

    pub fn business_partner_fee(&self, level: &str) -> f64 {
        or_zero(
            self.tables.business_partner(level),
            "business partner fees",
            level,
        )
    }

    /// `ceil(base_fee * multiplier)`; an unknown region has multiplier 0
    pub fn regional_fee(&self, region: &str, base_fee: f64) -> f64 {
        let multiplier = or_zero(self.tables.multiplier(region), "region multipliers", region);
        (base_fee * multiplier).ceil()
    }

    /// Validate the selections for `category` and price them
    pub fn total_fee(
        &self,
        category: FeeCategory,
        selections: &Selections,
    ) -> Result<FeeBreakdown, FeeError> {
        selections.validate(category)?;

        let national = match category {
            FeeCategory::FourYear => {
                let fte = selections.require(SelectionField::Fte)?;
                let gie = selections.require(SelectionField::Gie)?;
                if self.lookup == Lookup::Strict {
                    self.tables
                        .four_year
                        .column(fte)
                        .ok_or_else(|| not_found("FTE brackets", fte))?;
                    self.tables
                        .four_year
                        .row(gie)
                        .ok_or_else(|| not_found("four-year fees", gie))?;
                }
                self.four_year_fee(fte, gie)
            }
            FeeCategory::TwoYear => {
                let gie = selections.require(SelectionField::Gie)?;
                self.resolve(self.tables.two_year(gie), "two-year fees", gie)?
            }
            FeeCategory::NonHigherEd => {
                let organization = selections.require(SelectionField::Organization)?;
                self.resolve(
                    self.tables.non_higher_ed(organization),
                    "non-higher-ed fees",
                    organization,
                )?
            }
            FeeCategory::BusinessPartner => {
                let level = selections.require(SelectionField::Level)?;
                self.resolve(
                    self.tables.business_partner(level),
                    "business partner fees",
                    level,
                )?
            }
        };

        let regional = if category.has_regional_fee() {
            let region = selections.require(SelectionField::Region)?;
            let multiplier =
                self.resolve(self.tables.multiplier(region), "region multipliers", region)?;
            (national * multiplier).ceil()
        } else {
            0.0
        };

        let breakdown = FeeBreakdown::new(national, regional);
        debug!(
            category = %category,
            national = breakdown.national,
            regional = breakdown.regional,
            total = breakdown.total,
            "Calculated fee"
        );
        Ok(breakdown)
    }

    fn resolve(
        &self,
        value: Option<f64>,
        table: &'static str,
        label: &str,
    ) -> Result<f64, FeeError> {
        match (value, self.lookup) {
            (Some(v), _) => Ok(v),
            (None, Lookup::Strict) => Err(not_found(table, label)),
            (None, Lookup::ZeroOnMissing) => Ok(or_zero(None, table, label)),
        }
    }
}

fn or_zero(value: Option<f64>, table: &'static str, label: &str) -> f64 {
    value.unwrap_or_else(|| {
        debug!(table, label, "No entry, using 0");
        0.0
    })
}

fn not_found(table: &'static str, label: &str) -> FeeError {
    FeeError::NotFound {
        table,
        label: label.to_string(),
    }
}
