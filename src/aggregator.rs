use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::fields::{header_names, split_document, split_line};
use crate::schema::parse_amount;

/// Number of entries kept in [`Dashboard::top_expenses`].
pub const TOP_EXPENSES_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Every data line after the header, including ones that contributed nothing.
    pub count: usize,
    /// Sum of positive amounts.
    pub credit: f64,
    /// Sum of non-positive amounts, kept negative.
    pub debit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub description: String,
    /// Absolute value of the debit.
    pub amount: f64,
}

/// Everything the dashboard view derives from one CSV result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: Summary,
    pub spending_by_category: BTreeMap<String, f64>,
    pub top_expenses: Vec<Expense>,
}

struct ColumnIndex {
    amount: usize,
    category: usize,
    description: usize,
}

impl ColumnIndex {
    fn locate(header: &str) -> Option<Self> {
        let names: Vec<String> = header_names(header)
            .into_iter()
            .map(|h| h.to_lowercase())
            .collect();
        let find = |name: &str| names.iter().position(|h| h == name);

        Some(Self {
            amount: find("amount")?,
            category: find("category")?,
            description: find("description")?,
        })
    }

    fn max(&self) -> usize {
        self.amount.max(self.category).max(self.description)
    }
}

/// Derives credit/debit totals, per-category spending and the largest expenses from CSV text.
///
/// Returns `None` when there is nothing to show: empty input, a header with no data lines,
/// or a header missing any of `amount`, `category`, `description`. Malformed lines and
/// unparseable amounts are skipped silently but still counted.
pub fn aggregate(csv_text: &str) -> Option<Dashboard> {
    let (header, lines) = split_document(csv_text)?;
    if lines.is_empty() {
        return None;
    }
    let columns = ColumnIndex::locate(header)?;

    let mut credit = 0.0;
    let mut debit = 0.0;
    let mut spending_by_category: BTreeMap<String, f64> = BTreeMap::new();
    let mut expenses: Vec<Expense> = Vec::new();
    let mut skipped = 0usize;

    for line in &lines {
        let values = split_line(line);
        if values.len() <= columns.max() {
            skipped += 1;
            continue;
        }

        let Some(amount) = parse_amount(&values[columns.amount]) else {
            skipped += 1;
            continue;
        };

        if amount > 0.0 {
            credit += amount;
            continue;
        }

        debit += amount;
        let category = values[columns.category].trim();
        if !category.is_empty() {
            *spending_by_category.entry(category.to_string()).or_insert(0.0) += amount.abs();
        }
        expenses.push(Expense {
            description: values[columns.description].trim().to_string(),
            amount: amount.abs(),
        });
    }

    if skipped > 0 {
        debug!("{} of {} CSV lines contributed nothing to the summary", skipped, lines.len());
    }

    // Stable sort: equal amounts keep statement order.
    expenses.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    expenses.truncate(TOP_EXPENSES_LIMIT);

    Some(Dashboard {
        summary: Summary {
            count: lines.len(),
            credit,
            debit,
        },
        spending_by_category,
        top_expenses: expenses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "date,description,amount,category,notes\n\
                          2024-06-24,AMAZON,-129.00,Shopping,\n\
                          2024-06-22,SALARY,5000.00,Income,";

    #[test]
    fn test_credit_and_debit_split() {
        let dashboard = aggregate(SAMPLE).unwrap();

        assert_eq!(dashboard.summary.count, 2);
        assert_eq!(dashboard.summary.credit, 5000.0);
        assert_eq!(dashboard.summary.debit, -129.0);
        assert_eq!(dashboard.spending_by_category.len(), 1);
        assert_eq!(dashboard.spending_by_category["Shopping"], 129.0);
        assert_eq!(
            dashboard.top_expenses,
            vec![Expense {
                description: "AMAZON".to_string(),
                amount: 129.0
            }]
        );
    }

    #[test]
    fn test_missing_required_column_yields_nothing() {
        for header in [
            "date,description,value,category,notes",
            "date,memo,amount,category,notes",
            "date,description,amount,notes",
        ] {
            let csv = format!("{}\n2024-06-24,AMAZON,-129.00,Shopping,", header);
            assert!(aggregate(&csv).is_none(), "header {:?} should not aggregate", header);
        }
    }

    #[test]
    fn test_header_match_is_case_insensitive_and_order_free() {
        let csv = "Amount, CATEGORY ,Description\n-10,Food,Lunch\n-20,Food,Dinner";
        let dashboard = aggregate(csv).unwrap();

        assert_eq!(dashboard.summary.debit, -30.0);
        assert_eq!(dashboard.spending_by_category["Food"], 30.0);
        assert_eq!(dashboard.top_expenses[0].description, "Dinner");
    }

    #[test]
    fn test_empty_and_header_only_yield_nothing() {
        assert!(aggregate("").is_none());
        assert!(aggregate("   \n").is_none());
        assert!(aggregate("date,description,amount,category,notes\n").is_none());
    }

    #[test]
    fn test_all_credits() {
        let csv = "date,description,amount,category,notes\n\
                   2024-06-01,SALARY,5000,Income,\n\
                   2024-06-02,REFUND,25.50,Shopping,";
        let dashboard = aggregate(csv).unwrap();

        assert_eq!(dashboard.summary.credit, 5025.5);
        assert_eq!(dashboard.summary.debit, 0.0);
        assert!(dashboard.spending_by_category.is_empty());
        assert!(dashboard.top_expenses.is_empty());
    }

    #[test]
    fn test_all_debits() {
        let csv = "date,description,amount,category,notes\n\
                   2024-06-01,UBER,-350.50,Transport,\n\
                   2024-06-02,ATM WITHDRAWAL,-5000,Cash,";
        let dashboard = aggregate(csv).unwrap();

        assert_eq!(dashboard.summary.credit, 0.0);
        assert_eq!(dashboard.summary.debit, -5350.5);
    }

    #[test]
    fn test_top_expenses_sorted_and_truncated() {
        let mut csv = String::from("date,description,amount,category,notes\n");
        for (i, amount) in [12.0, 450.0, 3.5, 99.0, 1200.0, 75.0, 640.0].iter().enumerate() {
            csv.push_str(&format!("2024-06-{:02},Merchant {},-{},Other,\n", i + 1, i, amount));
        }
        csv.push_str("2024-06-30,SALARY,5000,Income,\n");

        let dashboard = aggregate(&csv).unwrap();
        let amounts: Vec<f64> = dashboard.top_expenses.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![1200.0, 640.0, 450.0, 99.0, 75.0]);
        assert_eq!(dashboard.top_expenses[0].description, "Merchant 4");
        assert_eq!(dashboard.summary.count, 8);
    }

    #[test]
    fn test_fewer_than_five_debits() {
        let csv = "date,description,amount,category,notes\n\
                   2024-06-01,A,-1,Food,\n\
                   2024-06-02,B,-2,Food,\n\
                   2024-06-03,C,bogus,Food,";
        let dashboard = aggregate(csv).unwrap();
        assert_eq!(dashboard.top_expenses.len(), 2);
        assert_eq!(dashboard.summary.count, 3);
    }

    #[test]
    fn test_equal_amounts_keep_statement_order() {
        let csv = "date,description,amount,category,notes\n\
                   2024-06-01,First,-10,Food,\n\
                   2024-06-02,Second,-10,Food,";
        let dashboard = aggregate(csv).unwrap();
        assert_eq!(dashboard.top_expenses[0].description, "First");
        assert_eq!(dashboard.top_expenses[1].description, "Second");
    }

    #[test]
    fn test_malformed_row_counts_but_does_not_contribute() {
        let csv = "date,description,amount,category,notes\n\
                   2024-06-25,ZOMATO, ONLINE, ORDER,-49.00,Food,\n\
                   2024-06-24,AMAZON,-129.00,Shopping,\n\
                   short";
        let dashboard = aggregate(csv).unwrap();

        assert_eq!(dashboard.summary.count, 3);
        assert_eq!(dashboard.summary.debit, -129.0);
        assert!(!dashboard.spending_by_category.contains_key("Food"));
        assert_eq!(dashboard.top_expenses.len(), 1);
    }

    #[test]
    fn test_quoted_description_with_commas_contributes() {
        let csv = "date,description,amount,category,notes\n\
                   2024-06-25,\"ZOMATO, ONLINE, ORDER\",-49.00,Food,";
        let dashboard = aggregate(csv).unwrap();

        assert_eq!(dashboard.summary.debit, -49.0);
        assert_eq!(dashboard.top_expenses[0].description, "ZOMATO, ONLINE, ORDER");
    }

    #[test]
    fn test_unbalanced_quote_does_not_swallow_the_row() {
        let csv = "date,description,amount,category,notes\n\
                   2024-06-25,\"JOE'S CAFE,-5.00,Food,\n\
                   2024-06-24,AMAZON,-129.00,Shopping,";
        let dashboard = aggregate(csv).unwrap();

        assert_eq!(dashboard.summary.count, 2);
        assert_eq!(dashboard.summary.debit, -134.0);
        assert_eq!(dashboard.spending_by_category["Food"], 5.0);
        assert_eq!(dashboard.top_expenses[1].description, "\"JOE'S CAFE");
        assert_eq!(dashboard.top_expenses[1].amount, 5.0);
    }

    #[test]
    fn test_uncategorised_debit_still_listed() {
        let csv = "date,description,amount,category,notes\n\
                   2024-06-01,MYSTERY,-80,,\n\
                   2024-06-02,LUNCH,-20,Food,";
        let dashboard = aggregate(csv).unwrap();

        assert_eq!(dashboard.spending_by_category.len(), 1);
        assert_eq!(dashboard.top_expenses[0].description, "MYSTERY");
    }

    #[test]
    fn test_zero_amount_counts_as_debit() {
        let csv = "date,description,amount,category,notes\n\
                   2024-06-01,FEE WAIVED,0.00,Other,";
        let dashboard = aggregate(csv).unwrap();

        assert_eq!(dashboard.summary.credit, 0.0);
        assert_eq!(dashboard.summary.debit, 0.0);
        assert_eq!(dashboard.spending_by_category["Other"], 0.0);
        assert_eq!(dashboard.top_expenses.len(), 1);
    }

    #[test]
    fn test_currency_symbols_are_not_stripped() {
        let csv = "date,description,amount,category,notes\n\
                   2024-06-01,RENT,$-1200,Housing,\n\
                   2024-06-02,GAS BILL,-60,Utilities,";
        let dashboard = aggregate(csv).unwrap();

        assert_eq!(dashboard.summary.count, 2);
        assert_eq!(dashboard.summary.debit, -60.0);
        assert!(!dashboard.spending_by_category.contains_key("Housing"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let csv = "date,description,amount,category,notes\r\n2024-06-24,AMAZON,-129.00,Shopping,\r\n";
        let dashboard = aggregate(csv).unwrap();
        assert_eq!(dashboard.summary.debit, -129.0);
        assert_eq!(dashboard.top_expenses[0].description, "AMAZON");
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        assert_eq!(aggregate(SAMPLE), aggregate(SAMPLE));
    }

    #[test]
    fn test_dashboard_json_shape() {
        let json = serde_json::to_value(aggregate(SAMPLE).unwrap()).unwrap();

        assert_eq!(json["summary"]["count"], 2);
        assert_eq!(json["spendingByCategory"]["Shopping"], 129.0);
        assert_eq!(json["topExpenses"][0]["description"], "AMAZON");
    }
}
