//! Membership fee estimation from a sectioned CSV rate sheet
//!
//! The rate sheet holds a four-year fee matrix (GIE brackets by FTE
//! brackets), flat two-year, non-higher-ed and business partner fees, and
//! regional multipliers. [`load_tables`] parses it once into immutable
//! [`FeeTables`]; [`FeeCalculator`] prices a category and its form
//! selections into a [`FeeBreakdown`].

pub mod calculator;
pub mod config;
pub mod error;
pub mod loader;
pub mod numeric;
pub mod selection;
pub mod sheet;
pub mod tables;

pub use calculator::{format_fee, FeeBreakdown, FeeCalculator};
pub use config::{LoaderConfig, SectionNames};
pub use error::FeeError;
pub use loader::{load_tables, load_tables_with};
pub use selection::{FeeCategory, SelectionField, Selections};
pub use tables::{FeeMatrix, FeeOptions, FeeTables, FlatTable, TwoYearOption};
