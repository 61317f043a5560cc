//! Terminal renderings of a parse result: the table view and the dashboard view.

use comfy_table::{Cell, CellAlignment, Color, Table, TableComponent};

use crate::aggregator::Dashboard;
use crate::fmt::{bar, money};
use crate::table::{AmountTone, TransactionTable};

const CHART_WIDTH: usize = 30;

pub fn format_table(table: &TransactionTable) -> String {
    if table.is_empty() {
        return "No transactions found or data is invalid.".to_string();
    }

    let mut out = Table::new();
    out.remove_style(TableComponent::HorizontalLines);
    out.remove_style(TableComponent::MiddleIntersections);
    out.remove_style(TableComponent::LeftBorderIntersections);
    out.remove_style(TableComponent::RightBorderIntersections);
    out.set_header(table.headers.clone());

    let amount_column = table.amount_column();
    for row in &table.rows {
        out.add_row(row.iter().enumerate().map(|(i, value)| {
            if Some(i) != amount_column {
                return Cell::new(value);
            }
            let cell = Cell::new(value).set_alignment(CellAlignment::Right);
            match AmountTone::of(value) {
                AmountTone::Credit => cell.fg(Color::Green),
                AmountTone::Debit => cell.fg(Color::Red),
                AmountTone::Unknown => cell,
            }
        }));
    }

    out.to_string()
}

pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let summary = &dashboard.summary;
    let mut out = String::new();

    out.push_str(&format!("Total Transactions  {}\n", summary.count));
    out.push_str(&format!("Total Credit        {}\n", money(summary.credit)));
    out.push_str(&format!("Total Debit         {}\n", money(summary.debit.abs())));

    out.push_str("\nSpending by Category\n");
    let label_width = dashboard
        .spending_by_category
        .keys()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0);
    let max_spend = dashboard
        .spending_by_category
        .values()
        .cloned()
        .fold(0.0_f64, f64::max);
    if dashboard.spending_by_category.is_empty() {
        out.push_str("  No spending data to display.\n");
    }
    for (category, amount) in &dashboard.spending_by_category {
        out.push_str(&format!(
            "  {:<width$}  {:<chart$}  {}\n",
            category,
            bar(*amount, max_spend, CHART_WIDTH),
            money(*amount),
            width = label_width,
            chart = CHART_WIDTH,
        ));
    }

    out.push_str("\nCredit vs. Debit\n");
    let flow_max = summary.credit.max(summary.debit.abs());
    out.push_str(&format!(
        "  Credit  {:<chart$}  {}\n",
        bar(summary.credit, flow_max, CHART_WIDTH),
        money(summary.credit),
        chart = CHART_WIDTH,
    ));
    out.push_str(&format!(
        "  Debit   {:<chart$}  {}\n",
        bar(summary.debit.abs(), flow_max, CHART_WIDTH),
        money(summary.debit.abs()),
        chart = CHART_WIDTH,
    ));

    out.push_str("\nTop 5 Expenses\n");
    if dashboard.top_expenses.is_empty() {
        out.push_str("  No expense data to display.\n");
    }
    for (rank, expense) in dashboard.top_expenses.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {}  {}\n",
            rank + 1,
            expense.description,
            money(expense.amount)
        ));
    }

    out
}
