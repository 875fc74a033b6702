//! The fixed mock dataset the dashboard starts from.
//!
//! The data is embedded as CSV and parsed once per fetch so that the seed reads the same way a
//! real export would.

use crate::error::Res;
use crate::model::{Amount, ExpenseEntry, FinancialDataset, ProfitMarginEntry, RevenueEntry};
use anyhow::{bail, Context};
use rust_decimal::Decimal;
use std::io::Cursor;
use std::str::FromStr;

/// Parses the embedded seed data into a `FinancialDataset`.
pub(crate) fn seed_dataset() -> Res<FinancialDataset> {
    let revenue = load_csv(REVENUE_DATA)?
        .into_iter()
        .map(|row| {
            let [month, amount, department] = fields::<3>(row)?;
            Ok(RevenueEntry::new(month, parse_amount(&amount)?, department))
        })
        .collect::<Res<Vec<_>>>()
        .context("Invalid seed revenue data")?;

    let expenses = load_csv(EXPENSE_DATA)?
        .into_iter()
        .map(|row| {
            let [category, amount, department] = fields::<3>(row)?;
            Ok(ExpenseEntry::new(category, parse_amount(&amount)?, department))
        })
        .collect::<Res<Vec<_>>>()
        .context("Invalid seed expense data")?;

    let profit_margins = load_csv(MARGIN_DATA)?
        .into_iter()
        .map(|row| {
            let [department, margin] = fields::<2>(row)?;
            let margin = Decimal::from_str(&margin)
                .with_context(|| format!("Bad margin '{margin}' for {department}"))?;
            Ok(ProfitMarginEntry::new(department, margin))
        })
        .collect::<Res<Vec<_>>>()
        .context("Invalid seed margin data")?;

    Ok(FinancialDataset::new(revenue, expenses, profit_margins))
}

fn parse_amount(s: &str) -> Res<Amount> {
    Amount::from_str(s).with_context(|| format!("Bad amount '{s}'"))
}

fn fields<const N: usize>(row: Vec<String>) -> Res<[String; N]> {
    let len = row.len();
    match row.try_into() {
        Ok(fields) => Ok(fields),
        Err(_) => bail!("Expected {N} fields but found {len}"),
    }
}

/// Loads data rows from a CSV-formatted string, skipping the header row.
fn load_csv(csv_data: &str) -> Res<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Seed revenue data.
const REVENUE_DATA: &str = r##"month,amount,department
2023-01,45000,Sales
2023-02,52000,Sales
2023-03,49000,Sales
2023-04,58000,Sales
2023-05,56000,Sales
2023-06,62000,Sales
2023-01,28000,Marketing
2023-02,32000,Marketing
2023-03,35000,Marketing
2023-04,38000,Marketing
2023-05,42000,Marketing
2023-06,45000,Marketing
2023-01,18000,HR
2023-02,19000,HR
2023-03,20000,HR
2023-04,22000,HR
2023-05,24000,HR
2023-06,25000,HR
"##;

/// Seed expense data.
const EXPENSE_DATA: &str = r##"category,amount,department
Salaries,25000,Sales
Rent,5000,Sales
Utilities,2000,Sales
Marketing,8000,Sales
Salaries,18000,Marketing
Rent,3000,Marketing
Utilities,1500,Marketing
Advertising,12000,Marketing
Salaries,12000,HR
Rent,2000,HR
Utilities,1000,HR
Training,5000,HR
"##;

/// Seed profit margin data.
const MARGIN_DATA: &str = r##"department,margin
Sales,0.32
Marketing,0.25
HR,0.18
IT,0.28
Operations,0.22
"##;
