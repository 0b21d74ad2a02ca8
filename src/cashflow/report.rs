//! Loads a user's records and summarizes them for the pages that show totals.

use crate::{
    Error, UserID,
    cashflow::{CashflowSummary, IncomeStore, Period, TransactionStore, summarize},
    income::Income,
    transaction::Transaction,
};

/// A user's records together with their summary for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct CashflowReport {
    /// Every transaction owned by the user, newest first.
    pub transactions: Vec<Transaction>,
    /// Every income owned by the user, newest first.
    pub incomes: Vec<Income>,
    /// The totals for the requested period.
    pub summary: CashflowSummary,
}

impl CashflowReport {
    /// The transactions dated within the summarized period.
    pub fn transactions_in_period(&self) -> impl Iterator<Item = &Transaction> {
        let period = self.summary.period;

        self.transactions
            .iter()
            .filter(move |transaction| transaction.date.is_some_and(|date| period.contains(date)))
    }

    /// The incomes dated within the summarized period.
    pub fn incomes_in_period(&self) -> impl Iterator<Item = &Income> {
        let period = self.summary.period;

        self.incomes
            .iter()
            .filter(move |income| income.date.is_some_and(|date| period.contains(date)))
    }
}

/// Load the records owned by `user_id` and summarize them over `period`.
///
/// # Errors
///
/// Returns [Error::DataValidation] if a record cannot be read or has a
/// negative amount, or any error raised by the stores.
pub fn load_cashflow_report(
    user_id: UserID,
    period: Period,
    transaction_store: &impl TransactionStore,
    income_store: &impl IncomeStore,
) -> Result<CashflowReport, Error> {
    let transactions = transaction_store.find_by_user(user_id)?;
    let incomes = income_store.find_by_user(user_id)?;
    let summary = summarize(&transactions, &incomes, period)?;

    for record in &summary.undated_records {
        tracing::warn!("{record} has no date and was left out of the summary for {period}");
    }

    Ok(CashflowReport {
        transactions,
        incomes,
        summary,
    })
}
