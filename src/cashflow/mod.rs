//! Monthly cashflow summaries.
//!
//! [summarize] is a pure function over in-memory records. [load_cashflow_report]
//! fetches those records through the [TransactionStore] and [IncomeStore]
//! traits so the calculation never touches the database directly.

mod period;
mod report;
mod store;
mod summary;
mod validation;

pub use period::{MAX_YEAR, MIN_YEAR, Period};
pub use report::{CashflowReport, load_cashflow_report};
pub use store::{IncomeStore, SQLiteIncomeStore, SQLiteTransactionStore, TransactionStore};
pub use summary::{CashflowSummary, summarize};
pub use validation::{
    DataValidationError, MAX_AMOUNT, RecordKind, RecordRef, STORED_DATE_FORMAT,
    parse_stored_amount, parse_stored_category, parse_stored_date,
};
