//! # Statement to CSV
//!
//! Converts bank statements (pasted text, images or PDFs) into a fixed five-column CSV by
//! relaying them to a large language model, then derives dashboard figures from the CSV.
//!
//! ## Core Concepts
//!
//! - **CSV contract**: `date,description,amount,category,notes`, one transaction per line.
//!   Debits are negative, credits positive.
//! - **Relay**: one model call per request with fixed extraction instructions; the reply is
//!   cleaned up ([`clean_model_output`]) and returned verbatim.
//! - **Aggregator**: [`aggregate`] sums credits and debits, totals spending per category
//!   and ranks the five largest expenses. Malformed lines are skipped, never reported.
//! - **Table view**: [`TransactionTable`] rebuilds rows for display, folding stray commas
//!   back into the description.
//!
//! ## Example
//!
//! ```rust
//! use statement_to_csv::aggregate;
//!
//! let csv = "date,description,amount,category,notes\n\
//!            2024-06-24,AMAZON,-129.00,Shopping,\n\
//!            2024-06-22,SALARY,5000.00,Income,";
//!
//! let dashboard = aggregate(csv).unwrap();
//! assert_eq!(dashboard.summary.credit, 5000.0);
//! assert_eq!(dashboard.summary.debit, -129.0);
//! assert_eq!(dashboard.spending_by_category["Shopping"], 129.0);
//! ```

pub mod aggregator;
pub mod error;
pub mod fields;
pub mod fmt;
pub mod report;
pub mod sanitize;
pub mod schema;
pub mod table;

#[cfg(feature = "gemini")]
pub mod backend;
#[cfg(feature = "gemini")]
pub mod config;
#[cfg(feature = "gemini")]
pub mod llm;

#[cfg(feature = "server")]
pub mod server;

pub use aggregator::{aggregate, Dashboard, Expense, Summary, TOP_EXPENSES_LIMIT};
pub use error::{Result, StatementError};
pub use report::{format_dashboard, format_table};
pub use sanitize::clean_model_output;
pub use schema::{ColumnMap, ParseInput, ParseRequest, Transaction, CSV_COLUMNS, CSV_HEADER};
pub use table::{AmountTone, TransactionTable};

#[cfg(feature = "gemini")]
pub use backend::{BackendClient, DEFAULT_BACKEND_URL};
#[cfg(feature = "gemini")]
pub use config::RelayConfig;
#[cfg(feature = "gemini")]
pub use llm::{GeminiClient, StatementExtractor};
