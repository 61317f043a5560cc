//! Row reconstruction for the table view.
//!
//! Unlike the aggregator, this view tries to keep rows whose description carried
//! unquoted commas: surplus fields are folded back into the second column before the
//! row is matched against the header.

use serde::Serialize;

use crate::fields::{header_names, split_document, split_line};
use crate::schema::{parse_amount, ColumnMap, Transaction};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// How an amount cell reads at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountTone {
    Credit,
    Debit,
    Unknown,
}

impl AmountTone {
    pub fn of(raw: &str) -> Self {
        match parse_amount(raw) {
            Some(v) if v >= 0.0 => AmountTone::Credit,
            Some(_) => AmountTone::Debit,
            None => AmountTone::Unknown,
        }
    }
}

impl TransactionTable {
    /// Rebuilds table rows from CSV text. Rows that cannot be made to match the header
    /// width are dropped.
    pub fn from_csv(csv_text: &str) -> Self {
        let Some((header, lines)) = split_document(csv_text) else {
            return Self::default();
        };
        let headers = header_names(header);

        let rows = lines
            .into_iter()
            .filter_map(|line| {
                let values = repair_surplus_fields(split_line(line), headers.len());
                (values.len() == headers.len())
                    .then(|| values.into_iter().map(|v| v.trim().to_string()).collect())
            })
            .collect();

        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the `amount` column, if any.
    pub fn amount_column(&self) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("amount"))
    }

    /// Rows as typed records, with columns matched by header name. Empty when the header
    /// lacks `description` or `amount`; rows whose amount does not parse are left out.
    pub fn transactions(&self) -> Vec<Transaction> {
        let Some(columns) = ColumnMap::locate(self.headers.as_slice()) else {
            return Vec::new();
        };

        self.rows
            .iter()
            .filter_map(|row| columns.transaction(row.as_slice()))
            .collect()
    }
}

/// Folds surplus interior fields into the description column (index 1), keeping the
/// first field and the last `width - 2` fields in place.
fn repair_surplus_fields(values: Vec<String>, width: usize) -> Vec<String> {
    if width < 2 || values.len() <= width {
        return values;
    }

    let tail_start = values.len() - (width - 2);
    let mut repaired = Vec::with_capacity(width);
    repaired.push(values[0].clone());
    repaired.push(values[1..tail_start].join(","));
    repaired.extend_from_slice(&values[tail_start..]);
    repaired
}
