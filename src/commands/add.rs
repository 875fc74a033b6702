use crate::args::AddArgs;
use crate::commands::report::{table_output, TableReport};
use crate::commands::{open_dashboard, Out};
use crate::model::EXPENSE_CATEGORIES;
use crate::{Config, Result};
use tracing::{info, warn};

/// Records one data point in this run's copy of the data and prints the resulting table.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<TableReport>> {
    if !EXPENSE_CATEGORIES.contains(&args.expense_category.as_str()) {
        warn!(
            "'{}' is not one of the usual expense categories ({})",
            args.expense_category,
            EXPENSE_CATEGORIES.join(", ")
        );
    }

    let mut dashboard = open_dashboard(&config, &args.filters()).await?;
    let input = args.input();
    dashboard.submit(&input).await?;
    info!(
        "Added {} revenue for {} in {} and {} of {} expenses",
        input.revenue, input.department, input.month, input.expense_amount, input.expense_category
    );

    table_output(&dashboard, &args.view.query(), args.view.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::SortField;
    use crate::args::ViewArgs;
    use crate::model::{Amount, Margin};
    use crate::ErrorType;
    use crate::test::test_config;
    use rust_decimal::Decimal;

    fn args(revenue: i32) -> AddArgs {
        AddArgs {
            month: "2023-07".to_string(),
            department: "Sales".to_string(),
            revenue: Amount::from(revenue),
            expense_category: "Rent".to_string(),
            expense_amount: Amount::from(200),
            start: Some("2023-01".to_string()),
            end: Some("2023-07".to_string()),
            view: ViewArgs {
                sort: SortField::Revenue,
                desc: true,
                ..ViewArgs::default()
            },
        }
    }

    #[tokio::test]
    async fn test_add_updates_table() {
        let out = add(test_config(), args(1000)).await.unwrap();
        let report = out.structure().unwrap();
        let sales = &report.rows[0];
        assert_eq!(sales.department, "Sales");
        assert_eq!(sales.revenue, Amount::from(323000));
        assert_eq!(sales.expenses, Amount::from(40200));
        let expected = Margin::new(Decimal::from(282800) / Decimal::from(323000));
        assert_eq!(sales.margin, expected);
        assert_eq!(report.totals.revenue, Amount::from(671000));
    }

    #[tokio::test]
    async fn test_add_rejects_zero_revenue() {
        let err = add(test_config(), args(0)).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidInput);
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.len(), 1);
    }
}
