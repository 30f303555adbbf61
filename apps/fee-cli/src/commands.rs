//! Subcommand handlers; each returns the text printed on stdout

use clap::Args;
use fee_engine::{format_fee, FeeBreakdown, FeeCalculator, FeeCategory, FeeTables, Selections};
use serde::Serialize;

#[derive(Args, Debug, Clone)]
pub struct CalcArgs {
    /// four-year, two-year, non-higher-ed or business-partner
    #[arg(short, long)]
    pub category: FeeCategory,

    /// FTE enrollment bracket (four-year)
    #[arg(long)]
    pub fte: Option<String>,

    /// Gross institutional expenditure bracket (four-year, two-year)
    #[arg(long)]
    pub gie: Option<String>,

    /// Organization type (non-higher-ed)
    #[arg(long)]
    pub organization: Option<String>,

    /// Partnership level (business-partner)
    #[arg(long)]
    pub level: Option<String>,

    /// Region code (all but business-partner)
    #[arg(short, long)]
    pub region: Option<String>,

    /// Fail on labels missing from the rate sheet instead of pricing them at 0
    #[arg(long)]
    pub strict_lookup: bool,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl CalcArgs {
    pub fn selections(&self) -> Selections {
        Selections {
            fte: self.fte.clone(),
            gie: self.gie.clone(),
            organization: self.organization.clone(),
            level: self.level.clone(),
            region: self.region.clone(),
        }
    }
}

#[derive(Serialize)]
struct CalcOutput<'a> {
    category: FeeCategory,
    selections: &'a Selections,
    #[serde(flatten)]
    fee: FeeBreakdown,
}

pub fn calc(tables: &FeeTables, args: &CalcArgs) -> anyhow::Result<String> {
    let category = args.category;
    let selections = args.selections();

    let calculator = if args.strict_lookup {
        FeeCalculator::strict(tables)
    } else {
        FeeCalculator::new(tables)
    };
    let fee = calculator.total_fee(category, &selections)?;

    if args.json {
        let output = CalcOutput {
            category,
            selections: &selections,
            fee,
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    Ok(format!("Category:     {}\n{}", category, fee))
}

pub fn options(tables: &FeeTables, json: bool) -> anyhow::Result<String> {
    let options = tables.options();
    if json {
        return Ok(serde_json::to_string_pretty(&options)?);
    }

    let mut out = String::new();
    list(&mut out, "FTE brackets (--fte)", &options.fte_brackets);
    list(
        &mut out,
        "Four-year GIE brackets (--gie)",
        &options.four_year_gie_brackets,
    );
    let two_year: Vec<String> = options
        .two_year
        .iter()
        .map(|o| format!("{} ({})", o.label, format_fee(o.fee)))
        .collect();
    list(&mut out, "Two-year GIE brackets (--gie)", &two_year);
    list(
        &mut out,
        "Organization types (--organization)",
        &options.non_higher_ed_categories,
    );
    list(
        &mut out,
        "Partnership levels (--level)",
        &options.business_partner_levels,
    );
    list(&mut out, "Regions (--region)", &options.regions);
    Ok(out.trim_end().to_string())
}

pub fn check(tables: &FeeTables) -> String {
    let matrix = &tables.four_year;
    [
        "Rate sheet OK".to_string(),
        format!(
            "  four-year fees:        {} GIE x {} FTE brackets",
            matrix.gie_labels.len(),
            matrix.fte_labels.len()
        ),
        format!("  two-year fees:         {}", tables.two_year.len()),
        format!("  non-higher-ed fees:    {}", tables.non_higher_ed.len()),
        format!("  business partner fees: {}", tables.business_partner.len()),
        format!("  region multipliers:    {}", tables.region_multipliers.len()),
    ]
    .join("\n")
}

fn list(out: &mut String, title: &str, items: &[String]) {
    out.push_str(title);
    out.push_str(":\n");
    if items.is_empty() {
        out.push_str("  (none)\n");
    }
    for item in items {
        out.push_str("  ");
        out.push_str(item);
        out.push('\n');
    }
    out.push('\n');
}
