//! Defines the income model and its database queries.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, UserID,
    cashflow::{MAX_AMOUNT, RecordRef, parse_stored_amount, parse_stored_date},
    database_id::IncomeId,
};

/// Money that was earned, e.g. a salary payment.
///
/// To create a new `Income`, use [Income::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    /// The ID of the income.
    pub id: IncomeId,
    /// A short name for the income, e.g. "January salary".
    pub title: String,
    /// The amount of money earned. Never negative.
    pub amount: Decimal,
    /// When the money was received, `None` if it was stored without a date.
    pub date: Option<Date>,
    /// Where the money came from, e.g. an employer.
    pub source: String,
    /// The user that owns the income.
    pub user_id: UserID,
}

impl Income {
    /// Create a new income.
    ///
    /// Shortcut for [IncomeBuilder] for discoverability.
    pub fn build(title: &str, amount: Decimal, date: Option<Date>) -> IncomeBuilder {
        IncomeBuilder {
            title: title.to_owned(),
            amount,
            date,
            source: String::new(),
        }
    }
}

/// A builder for creating or overwriting an [Income].
#[derive(Debug, PartialEq, Clone)]
pub struct IncomeBuilder {
    /// A short name for the income.
    pub title: String,
    /// The amount of money earned, must not be negative.
    pub amount: Decimal,
    /// When the money was received.
    pub date: Option<Date>,
    /// Where the money came from. Empty by default.
    pub source: String,
}

impl IncomeBuilder {
    /// Set where the money came from.
    pub fn source(mut self, source: &str) -> Self {
        self.source = source.to_owned();
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.amount < Decimal::ZERO {
            Err(Error::NegativeAmount(self.amount))
        } else if self.amount > Decimal::from(MAX_AMOUNT) {
            Err(Error::AmountTooLarge(self.amount))
        } else {
            Ok(())
        }
    }
}

const SELECT_COLUMNS: &str = "id, title, amount, date, source, user_id";

/// Create a new income owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_income(
    builder: IncomeBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<Income, Error> {
    builder.validate()?;

    let income = connection
        .prepare(&format!(
            "INSERT INTO income (title, amount, date, source, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.title,
                builder.amount.to_string(),
                builder.date,
                builder.source,
                user_id.as_i64(),
            ),
            map_income_row,
        )?;

    Ok(income)
}

/// Retrieve the income with `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an income owned by `user_id`,
/// - or [Error::DataValidation] if the stored row cannot be read,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_income(id: IncomeId, user_id: UserID, connection: &Connection) -> Result<Income, Error> {
    let income = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM income WHERE id = :id AND user_id = :user_id"
        ))?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_income_row,
        )?;

    Ok(income)
}

/// An income as stored, with the fields that could not be read left empty.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeDraft {
    pub id: IncomeId,
    pub title: String,
    /// The stored amount, if it is a decimal number.
    pub amount: Option<Decimal>,
    /// The stored date, if it is set and readable.
    pub date: Option<Date>,
    pub source: String,
}

/// Retrieve the income with `id` owned by `user_id` without failing on
/// unreadable amounts or dates.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an income owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_income_draft(
    id: IncomeId,
    user_id: UserID,
    connection: &Connection,
) -> Result<IncomeDraft, Error> {
    let draft = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM income WHERE id = :id AND user_id = :user_id"
        ))?
        .query_one(&[(":id", &id), (":user_id", &user_id.as_i64())], |row| {
            let record = RecordRef::income(id);
            let raw_amount: String = row.get(2)?;
            let raw_date: Option<String> = row.get(3)?;

            Ok(IncomeDraft {
                id,
                title: row.get(1)?,
                amount: parse_stored_amount(record, &raw_amount).ok(),
                date: raw_date.and_then(|raw_date| parse_stored_date(record, &raw_date).ok()),
                source: row.get(4)?,
            })
        })?;

    Ok(draft)
}

/// Retrieve every income owned by `user_id`, newest first with undated incomes last.
///
/// # Errors
/// This function will return a:
/// - [Error::DataValidation] if a stored row cannot be read,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_user_incomes(user_id: UserID, connection: &Connection) -> Result<Vec<Income>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM income
             WHERE user_id = :user_id
             ORDER BY date IS NULL, date DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_income_row)?
        .map(|maybe_income| maybe_income.map_err(Error::from))
        .collect()
}

/// Overwrite the income with `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - or [Error::UpdateMissingIncome] if `id` does not refer to an income owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_income(
    id: IncomeId,
    builder: IncomeBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<Income, Error> {
    builder.validate()?;

    connection
        .prepare(&format!(
            "UPDATE income
             SET title = ?1, amount = ?2, date = ?3, source = ?4
             WHERE id = ?5 AND user_id = ?6
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.title,
                builder.amount.to_string(),
                builder.date,
                builder.source,
                id,
                user_id.as_i64(),
            ),
            map_income_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingIncome,
            error => error.into(),
        })
}

/// Delete the income with `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingIncome] if `id` does not refer to an income owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_income(id: IncomeId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM income WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingIncome);
    }

    Ok(())
}

/// Create the income table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS income (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount TEXT NOT NULL,
                date TEXT,
                source TEXT NOT NULL DEFAULT '',
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_income_user_date ON income(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Income.
pub fn map_income_row(row: &Row) -> Result<Income, rusqlite::Error> {
    let id = row.get(0)?;
    let record = RecordRef::income(id);

    let title = row.get(1)?;
    let raw_amount: String = row.get(2)?;
    let amount = parse_stored_amount(record, &raw_amount).map_err(|error| error.into_sql_error(2))?;
    let raw_date: Option<String> = row.get(3)?;
    let date = raw_date
        .map(|raw_date| parse_stored_date(record, &raw_date))
        .transpose()
        .map_err(|error| error.into_sql_error(3))?;
    let source = row.get(4)?;
    let user_id = UserID::new(row.get(5)?);

    Ok(Income {
        id,
        title,
        amount,
        date,
        source,
        user_id,
    })
}
