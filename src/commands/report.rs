//! Read-only commands: the department table, the headline statistics, and the raw filtered data.

use crate::aggregate::{DepartmentRow, TableQuery, Totals};
use crate::args::{DataArgs, StatsArgs, TableArgs};
use crate::commands::{open_dashboard, Out};
use crate::dashboard::Dashboard;
use crate::error::{ErrorType, IntoResult, Res};
use crate::filter::Filters;
use crate::model::{FinancialDataset, Margin, ProfitMarginEntry};
use crate::render::{csv, markdown, OutputFormat, Rows};
use crate::series::{
    expense_breakdown, margin_ranking, revenue_trend, CategoryTotal, RevenueTrend, SummaryStats,
};
use crate::{Config, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};

const TABLE_HEADERS: [&str; 5] = ["Department", "Revenue", "Expenses", "Profit", "Margin"];

/// The department table as shown on the dashboard, with its grand totals.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TableReport {
    pub filters: Filters,
    pub rows: Vec<DepartmentRow>,
    /// Totals over every department that passed the filters, regardless of the search text.
    pub totals: Totals,
    /// `None` when there is no revenue in view.
    pub total_margin: Option<Margin>,
}

impl TableReport {
    pub(crate) fn new(dashboard: &Dashboard, query: &TableQuery) -> Self {
        let summary = dashboard.summary();
        let totals = summary.totals();
        Self {
            filters: dashboard.filters().clone(),
            rows: summary.view(query),
            totals,
            total_margin: totals.margin(),
        }
    }

    pub(crate) fn render(&self, format: OutputFormat) -> Res<Rows> {
        let mut rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.department.clone(),
                    row.revenue.to_string(),
                    row.expenses.to_string(),
                    row.profit.to_string(),
                    row.margin.to_string(),
                ]
            })
            .collect();
        rows.push(vec![
            "Total".to_string(),
            self.totals.revenue.to_string(),
            self.totals.expenses.to_string(),
            self.totals.profit.to_string(),
            self.total_margin
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
        Rows::render(format, &TABLE_HEADERS, &rows, self)
    }
}

/// Prints the department table for the filtered data.
pub async fn table(config: Config, args: TableArgs) -> Result<Out<TableReport>> {
    let dashboard = open_dashboard(&config, &args.filters).await?;
    table_output(&dashboard, &args.view.query(), args.view.format)
}

pub(super) fn table_output(
    dashboard: &Dashboard,
    query: &TableQuery,
    format: OutputFormat,
) -> Result<Out<TableReport>> {
    let report = TableReport::new(dashboard, query);
    let rendered = report.render(format).pub_result(ErrorType::Internal)?;
    Ok(Out::new(rendered.to_string(), report))
}

/// The numbers behind the dashboard's header cards and charts.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StatsReport {
    pub filters: Filters,
    pub stats: SummaryStats,
    pub revenue_trend: RevenueTrend,
    pub expense_breakdown: Vec<CategoryTotal>,
    pub margin_ranking: Vec<ProfitMarginEntry>,
}

impl StatsReport {
    pub(crate) fn new(dashboard: &Dashboard) -> Self {
        let data = dashboard.filtered();
        Self {
            filters: dashboard.filters().clone(),
            stats: dashboard.stats(),
            revenue_trend: revenue_trend(&data.revenue),
            expense_breakdown: expense_breakdown(&data.expenses),
            margin_ranking: margin_ranking(&data.profit_margins),
        }
    }

    /// Each section as a title, its column headers, and its rows.
    fn sections(&self) -> Vec<(&'static str, Vec<String>, Vec<Vec<String>>)> {
        let stats = vec![
            vec!["Total revenue".to_string(), self.stats.total_revenue.to_string()],
            vec!["Total expenses".to_string(), self.stats.total_expenses.to_string()],
            vec!["Total profit".to_string(), self.stats.total_profit.to_string()],
            vec!["Average margin".to_string(), self.stats.average_margin.to_string()],
        ];

        let mut trend_headers = vec!["Month".to_string()];
        trend_headers.extend(self.revenue_trend.series.iter().map(|s| s.department.clone()));
        let trend = self
            .revenue_trend
            .months
            .iter()
            .enumerate()
            .map(|(ix, month)| {
                let mut row = vec![month.clone()];
                row.extend(
                    self.revenue_trend
                        .series
                        .iter()
                        .map(|s| s.values.get(ix).map(|v| v.to_string()).unwrap_or_default()),
                );
                row
            })
            .collect();

        let breakdown = self
            .expense_breakdown
            .iter()
            .map(|c| vec![c.category.clone(), c.amount.to_string(), c.share.to_string()])
            .collect();

        let ranking = self
            .margin_ranking
            .iter()
            .map(|m| vec![m.department.clone(), m.margin.to_string()])
            .collect();

        vec![
            ("Summary", strings(&["Statistic", "Value"]), stats),
            ("Revenue trend", trend_headers, trend),
            (
                "Expense breakdown",
                strings(&["Category", "Amount", "Share"]),
                breakdown,
            ),
            ("Profit margins", strings(&["Department", "Margin"]), ranking),
        ]
    }

    /// Markdown renders one table per section. CSV flattens everything into `section,name,value`
    /// records, with one revenue trend record per department and month.
    pub(crate) fn render(&self, format: OutputFormat) -> Res<Rows> {
        match format {
            OutputFormat::Table => {
                let tables: Vec<String> = self
                    .sections()
                    .into_iter()
                    .map(|(title, headers, rows)| {
                        let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
                        format!("## {title}\n\n{}", markdown(&headers, &rows))
                    })
                    .collect();
                Ok(Rows::Table(tables.join("\n\n")))
            }
            OutputFormat::Csv => Ok(Rows::Csv(csv(
                &["section", "name", "value"],
                &self.records(),
            )?)),
            OutputFormat::Json => Ok(Rows::Json(
                serde_json::to_value(self).context("Unable to serialize statistics")?,
            )),
        }
    }

    fn records(&self) -> Vec<Vec<String>> {
        let record =
            |section: String, name: &str, value: String| vec![section, name.to_string(), value];
        let stats = &self.stats;
        let mut records = vec![
            record("Summary".into(), "Total revenue", stats.total_revenue.to_string()),
            record("Summary".into(), "Total expenses", stats.total_expenses.to_string()),
            record("Summary".into(), "Total profit", stats.total_profit.to_string()),
            record("Summary".into(), "Average margin", stats.average_margin.to_string()),
        ];
        for series in &self.revenue_trend.series {
            for (month, value) in self.revenue_trend.months.iter().zip(&series.values) {
                records.push(record(
                    format!("Revenue trend: {}", series.department),
                    month,
                    value.to_string(),
                ));
            }
        }
        for category in &self.expense_breakdown {
            records.push(record(
                "Expense breakdown".into(),
                &category.category,
                category.amount.to_string(),
            ));
            records.push(record(
                "Expense share".into(),
                &category.category,
                category.share.to_string(),
            ));
        }
        for margin in &self.margin_ranking {
            records.push(record(
                "Profit margins".into(),
                &margin.department,
                margin.margin.to_string(),
            ));
        }
        records
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Prints the headline statistics and chart series for the filtered data.
pub async fn stats(config: Config, args: StatsArgs) -> Result<Out<StatsReport>> {
    let dashboard = open_dashboard(&config, &args.filters).await?;
    let report = StatsReport::new(&dashboard);
    let rendered = report.render(args.format).pub_result(ErrorType::Internal)?;
    Ok(Out::new(rendered.to_string(), report))
}

/// Prints the filtered dataset as JSON.
pub async fn data(config: Config, args: DataArgs) -> Result<Out<FinancialDataset>> {
    let dashboard = open_dashboard(&config, &args.filters).await?;
    let dataset = dashboard.filtered().clone();
    let json = serde_json::to_string_pretty(&dataset)
        .context("Unable to serialize the dataset")
        .pub_result(ErrorType::Internal)?;
    Ok(Out::new(json, dataset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{FilterArgs, ViewArgs};
    use crate::aggregate::SortField;
    use crate::model::Amount;
    use crate::test::test_config;

    fn first_half_2023() -> FilterArgs {
        FilterArgs {
            start: Some("2023-01".to_string()),
            end: Some("2023-06".to_string()),
            department: None,
        }
    }

    #[tokio::test]
    async fn test_table_default_view() {
        let args = TableArgs {
            filters: first_half_2023(),
            view: ViewArgs::default(),
        };
        let out = table(test_config(), args).await.unwrap();
        let report = out.structure().unwrap();
        let departments: Vec<&str> = report.rows.iter().map(|r| r.department.as_str()).collect();
        assert_eq!(departments, vec!["HR", "IT", "Marketing", "Operations", "Sales"]);
        assert_eq!(report.totals.revenue, Amount::from(670000));
        assert_eq!(report.totals.expenses, Amount::from(94500));

        let lines: Vec<&str> = out.message().lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("| Department"));
        assert!(lines[7].starts_with("| Total"));
        assert!(lines[7].contains("$670,000.00"));
    }

    #[tokio::test]
    async fn test_table_search_leaves_totals() {
        let args = TableArgs {
            filters: first_half_2023(),
            view: ViewArgs {
                search: "sal".to_string(),
                sort: SortField::Margin,
                desc: true,
                format: OutputFormat::Csv,
            },
        };
        let out = table(test_config(), args).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.totals.revenue, Amount::from(670000));
        assert_eq!(
            out.message(),
            "Department,Revenue,Expenses,Profit,Margin\n\
             Sales,\"$322,000.00\",\"$40,000.00\",\"$282,000.00\",32.00%\n\
             Total,\"$670,000.00\",\"$94,500.00\",\"$575,500.00\",85.90%\n"
        );
    }

    #[tokio::test]
    async fn test_table_without_revenue_has_no_total_margin() {
        let args = TableArgs {
            filters: FilterArgs {
                start: Some("2024-01".to_string()),
                end: Some("2024-12".to_string()),
                department: None,
            },
            view: ViewArgs::default(),
        };
        let out = table(test_config(), args).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.total_margin, None);
        assert!(out.message().lines().last().unwrap().ends_with("| -      |"));
    }

    #[tokio::test]
    async fn test_stats_report() {
        let args = StatsArgs {
            filters: first_half_2023(),
            format: OutputFormat::Table,
        };
        let out = stats(test_config(), args).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.stats.total_revenue, Amount::from(670000));
        assert_eq!(report.revenue_trend.months.len(), 6);
        assert_eq!(report.margin_ranking[0].department, "Sales");
        assert!(out.message().starts_with("## Summary"));
        assert!(out.message().contains("| Average margin | 25.00%"));
        assert!(out.message().contains("## Revenue trend"));
    }

    #[tokio::test]
    async fn test_stats_csv_records() {
        let args = StatsArgs {
            filters: FilterArgs {
                department: Some("HR".to_string()),
                ..first_half_2023()
            },
            format: OutputFormat::Csv,
        };
        let out = stats(test_config(), args).await.unwrap();
        let lines: Vec<&str> = out.message().lines().collect();
        assert_eq!(lines[0], "section,name,value");
        assert!(lines.contains(&"Profit margins,HR,18.00%"));
        assert!(lines.iter().any(|l| l.starts_with("Revenue trend: HR,2023-01,")));
    }

    #[tokio::test]
    async fn test_data_is_filtered_json() {
        let args = DataArgs {
            filters: FilterArgs {
                department: Some("Marketing".to_string()),
                ..first_half_2023()
            },
        };
        let out = data(test_config(), args).await.unwrap();
        let dataset = out.structure().unwrap();
        assert_eq!(dataset.revenue.len(), 6);
        assert!(dataset.revenue.iter().all(|r| r.department == "Marketing"));
        let parsed: FinancialDataset = serde_json::from_str(out.message()).unwrap();
        assert_eq!(&parsed, dataset);
    }
}
