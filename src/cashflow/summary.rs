//! Monthly cashflow aggregation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
    cashflow::{DataValidationError, Period, RecordRef},
    category::Category,
    income::Income,
    transaction::Transaction,
};

/// The totals for one user over one [Period].
///
/// Always derived from the current records and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CashflowSummary {
    /// The month the totals cover.
    pub period: Period,
    /// The sum of the transaction amounts dated within the period.
    pub monthly_expense_total: Decimal,
    /// The sum of the income amounts dated within the period.
    pub monthly_income_total: Decimal,
    /// `monthly_income_total - monthly_expense_total`.
    pub net_cashflow: Decimal,
    /// Spending per category within the period.
    ///
    /// Categories without transactions in the period are left out.
    pub category_totals: BTreeMap<Category, Decimal>,
    /// Records left out of every total because they have no date.
    pub undated_records: Vec<RecordRef>,
}

/// Calculate the monthly totals of `transactions` and `incomes` for `period`.
///
/// Records dated outside `period` do not count towards the totals, but their
/// amounts are still checked. Records without a date are skipped and listed
/// in [CashflowSummary::undated_records].
///
/// # Errors
///
/// Returns [DataValidationError::NegativeAmount] if any record has a negative
/// amount, or [DataValidationError::TotalOverflow] if a total does not fit in
/// a [Decimal]. No partial summary is returned.
pub fn summarize(
    transactions: &[Transaction],
    incomes: &[Income],
    period: Period,
) -> Result<CashflowSummary, DataValidationError> {
    check_amounts(transactions, incomes)?;

    let overflow = || DataValidationError::TotalOverflow { period };

    let mut undated_records = Vec::new();
    let mut monthly_expense_total = Decimal::ZERO;
    let mut category_totals: BTreeMap<Category, Decimal> = BTreeMap::new();

    for transaction in transactions {
        let Some(date) = transaction.date else {
            undated_records.push(RecordRef::transaction(transaction.id));
            continue;
        };

        if period.contains(date) {
            monthly_expense_total = monthly_expense_total
                .checked_add(transaction.amount)
                .ok_or_else(overflow)?;

            let category_total = category_totals.entry(transaction.category).or_default();
            *category_total = category_total
                .checked_add(transaction.amount)
                .ok_or_else(overflow)?;
        }
    }

    let mut monthly_income_total = Decimal::ZERO;

    for income in incomes {
        let Some(date) = income.date else {
            undated_records.push(RecordRef::income(income.id));
            continue;
        };

        if period.contains(date) {
            monthly_income_total = monthly_income_total
                .checked_add(income.amount)
                .ok_or_else(overflow)?;
        }
    }

    Ok(CashflowSummary {
        period,
        monthly_expense_total,
        monthly_income_total,
        net_cashflow: monthly_income_total
            .checked_sub(monthly_expense_total)
            .ok_or_else(overflow)?,
        category_totals,
        undated_records,
    })
}

fn check_amounts(
    transactions: &[Transaction],
    incomes: &[Income],
) -> Result<(), DataValidationError> {
    let amounts = transactions
        .iter()
        .map(|transaction| (RecordRef::transaction(transaction.id), transaction.amount))
        .chain(
            incomes
                .iter()
                .map(|income| (RecordRef::income(income.id), income.amount)),
        );

    for (record, amount) in amounts {
        if amount < Decimal::ZERO {
            return Err(DataValidationError::NegativeAmount { record, amount });
        }
    }

    Ok(())
}
