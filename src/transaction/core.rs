//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, UserID,
    cashflow::{
        MAX_AMOUNT, RecordRef, parse_stored_amount, parse_stored_category, parse_stored_date,
    },
    category::Category,
    database_id::TransactionId,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense, i.e. an event where money was spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short name for the transaction, e.g. "Weekly groceries".
    pub title: String,
    /// The amount of money spent. Never negative.
    pub amount: Decimal,
    /// When the transaction happened.
    ///
    /// `None` for rows that were stored without a date. These are left out of
    /// monthly totals.
    pub date: Option<Date>,
    /// What the money was spent on.
    pub category: Category,
    /// Free text notes about the transaction.
    pub description: String,
    /// The user that owns the transaction.
    pub user_id: UserID,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        title: &str,
        amount: Decimal,
        date: Option<Date>,
        category: Category,
    ) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            amount,
            date,
            category,
            description: String::new(),
        }
    }
}

/// A builder for creating or overwriting a [Transaction].
///
/// The owning user is given when the builder is saved, see [create_transaction].
///
/// # Examples
///
/// ```ignore
/// use rust_decimal::Decimal;
/// use time::macros::date;
///
/// let builder = Transaction::build(
///         "Groceries",
///         Decimal::new(4599, 2),
///         Some(date!(2026 - 01 - 15)),
///         Category::Food,
///     )
///     .description("Weekly shop");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A short name for the transaction.
    pub title: String,
    /// The amount of money spent, must not be negative.
    pub amount: Decimal,
    /// When the transaction happened.
    pub date: Option<Date>,
    /// What the money was spent on.
    pub category: Category,
    /// Free text notes about the transaction. Empty by default.
    pub description: String,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
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

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "id, title, amount, date, category, description, user_id";

/// Create a new transaction owned by `user_id` in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (title, amount, date, category, description, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.title,
                builder.amount.to_string(),
                builder.date,
                builder.category,
                builder.description,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction with `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::DataValidation] if the stored row cannot be read,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
        ))?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// A stored transaction read for editing.
///
/// Fields holding values that cannot be read are `None`, so the row can be
/// corrected through the edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short name for the transaction.
    pub title: String,
    /// The stored amount, if it is a decimal number.
    pub amount: Option<Decimal>,
    /// The stored date, if it is set and readable.
    pub date: Option<Date>,
    /// The stored category, if it is a known category.
    pub category: Option<Category>,
    /// Free text notes about the transaction.
    pub description: String,
}

/// Retrieve the transaction with `id` owned by `user_id`, leaving out the
/// fields that cannot be read instead of failing.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction_draft(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<TransactionDraft, Error> {
    let draft = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
        ))?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_draft_row,
        )?;

    Ok(draft)
}

fn map_draft_row(row: &Row) -> Result<TransactionDraft, rusqlite::Error> {
    let id = row.get(0)?;
    let record = RecordRef::transaction(id);

    let raw_amount: String = row.get(2)?;
    let raw_date: Option<String> = row.get(3)?;
    let raw_category: String = row.get(4)?;

    Ok(TransactionDraft {
        id,
        title: row.get(1)?,
        amount: parse_stored_amount(record, &raw_amount).ok(),
        date: raw_date.and_then(|raw_date| parse_stored_date(record, &raw_date).ok()),
        category: parse_stored_category(record, &raw_category).ok(),
        description: row.get(5)?,
    })
}

/// Retrieve every transaction owned by `user_id`, newest first.
///
/// Transactions without a date are listed last.
///
/// # Errors
/// This function will return a:
/// - [Error::DataValidation] if a stored row cannot be read,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_user_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY date IS NULL, date DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Overwrite the transaction with `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - or [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET title = ?1, amount = ?2, date = ?3, category = ?4, description = ?5
             WHERE id = ?6 AND user_id = ?7
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.title,
                builder.amount.to_string(),
                builder.date,
                builder.category,
                builder.description,
                id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction with `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount TEXT NOT NULL,
                date TEXT,
                category TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Amounts, dates and categories are stored as text. Values that cannot be
/// parsed are returned as a [crate::cashflow::DataValidationError] wrapped in a
/// [rusqlite::Error::FromSqlConversionFailure].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let record = RecordRef::transaction(id);

    let title = row.get(1)?;
    let raw_amount: String = row.get(2)?;
    let amount =
        parse_stored_amount(record, &raw_amount).map_err(|error| error.into_sql_error(2))?;
    let raw_date: Option<String> = row.get(3)?;
    let date = raw_date
        .map(|raw_date| parse_stored_date(record, &raw_date))
        .transpose()
        .map_err(|error| error.into_sql_error(3))?;
    let raw_category: String = row.get(4)?;
    let category =
        parse_stored_category(record, &raw_category).map_err(|error| error.into_sql_error(4))?;
    let description = row.get(5)?;
    let user_id = UserID::new(row.get(6)?);

    Ok(Transaction {
        id,
        title,
        amount,
        date,
        category,
        description,
        user_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error, PasswordHash, UserID, Username,
        auth::create_user,
        cashflow::{DataValidationError, MAX_AMOUNT, RecordRef},
        category::Category,
        db::initialize,
        transaction::{
            Transaction, TransactionDraft, create_transaction, delete_transaction,
            get_transaction, get_transaction_draft, get_user_transactions, update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_user(username: &str, conn: &Connection) -> UserID {
        create_user(
            Username::new_unchecked(username),
            PasswordHash::new_unchecked("hunter2"),
            conn,
        )
            .unwrap()
            .id
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let amount = Decimal::new(1230, 2);

        let result = create_transaction(
            Transaction::build("Lunch", amount, Some(date!(2025 - 10 - 05)), Category::Food)
                .description("Sushi"),
            user_id,
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.title, "Lunch");
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.date, Some(date!(2025 - 10 - 05)));
                assert_eq!(transaction.category, Category::Food);
                assert_eq!(transaction.description, "Sushi");
                assert_eq!(transaction.user_id, user_id);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_keeps_decimal_places() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let amount = Decimal::new(1_000_000_001, 2);

        let created = create_transaction(
            Transaction::build("Car", amount, Some(date!(2026 - 01 - 01)), Category::Transport),
            user_id,
            &conn,
        )
        .unwrap();
        let fetched = get_transaction(created.id, user_id, &conn).unwrap();

        assert_eq!(fetched.amount, amount);
        assert_eq!(fetched.amount.to_string(), "10000000.01");
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);

        let result = create_transaction(
            Transaction::build("Refund", Decimal::from(-5), None, Category::Other),
            user_id,
            &conn,
        );

        assert_eq!(result, Err(Error::NegativeAmount(Decimal::from(-5))));
    }

    #[test]
    fn create_fails_on_amount_above_maximum() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let amount = Decimal::from(MAX_AMOUNT) + Decimal::new(1, 2);

        let result = create_transaction(
            Transaction::build("Yacht", amount, None, Category::Other),
            user_id,
            &conn,
        );

        assert_eq!(result, Err(Error::AmountTooLarge(amount)));
    }

    #[test]
    fn create_accepts_maximum_amount() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);

        let result = create_transaction(
            Transaction::build("House", Decimal::from(MAX_AMOUNT), None, Category::Housing),
            user_id,
            &conn,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn create_fails_on_invalid_user() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build("Lunch", Decimal::ONE, None, Category::Food),
            UserID::new(42),
            &conn,
        );

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_fails_for_other_users_transaction() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let other_user_id = create_test_user("bob", &conn);
        let transaction = create_transaction(
            Transaction::build("Lunch", Decimal::ONE, None, Category::Food),
            user_id,
            &conn,
        )
        .unwrap();

        let result = get_transaction(transaction.id, other_user_id, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_overwrites_fields() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let transaction = create_transaction(
            Transaction::build("Lunch", Decimal::ONE, None, Category::Food),
            user_id,
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            transaction.id,
            Transaction::build(
                "Bus fare",
                Decimal::new(350, 2),
                Some(date!(2026 - 01 - 04)),
                Category::Transport,
            )
            .description("Airport"),
            user_id,
            &conn,
        )
        .unwrap();

        assert_eq!(
            get_transaction(transaction.id, user_id, &conn),
            Ok(updated.clone())
        );
        assert_eq!(updated.title, "Bus fare");
        assert_eq!(updated.amount, Decimal::new(350, 2));
        assert_eq!(updated.date, Some(date!(2026 - 01 - 04)));
        assert_eq!(updated.category, Category::Transport);
        assert_eq!(updated.description, "Airport");
    }

    #[test]
    fn update_fails_for_other_users_transaction() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let other_user_id = create_test_user("bob", &conn);
        let transaction = create_transaction(
            Transaction::build("Lunch", Decimal::ONE, None, Category::Food),
            user_id,
            &conn,
        )
        .unwrap();

        let result = update_transaction(
            transaction.id,
            Transaction::build("Stolen", Decimal::ONE, None, Category::Food),
            other_user_id,
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
        assert_eq!(
            get_transaction(transaction.id, user_id, &conn).unwrap().title,
            "Lunch"
        );
    }

    #[test]
    fn delete_succeeds() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let transaction = create_transaction(
            Transaction::build("Lunch", Decimal::ONE, None, Category::Food),
            user_id,
            &conn,
        )
        .unwrap();

        delete_transaction(transaction.id, user_id, &conn).unwrap();

        assert_eq!(
            get_transaction(transaction.id, user_id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_fails_on_missing_transaction() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);

        let result = delete_transaction(1337, user_id, &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn unknown_stored_category_fails_with_validation_error() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let transaction = create_transaction(
            Transaction::build("Lunch", Decimal::ONE, None, Category::Food),
            user_id,
            &conn,
        )
        .unwrap();
        conn.execute(
            "UPDATE \"transaction\" SET category = 'SNACKS' WHERE id = ?1",
            (transaction.id,),
        )
        .unwrap();

        let result = get_user_transactions(user_id, &conn);

        assert_eq!(
            result,
            Err(Error::DataValidation(DataValidationError::UnknownCategory {
                record: RecordRef::transaction(transaction.id),
                value: "SNACKS".to_owned(),
            }))
        );
    }

    #[test]
    fn unparsable_stored_amount_fails_with_validation_error() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let transaction = create_transaction(
            Transaction::build("Lunch", Decimal::ONE, None, Category::Food),
            user_id,
            &conn,
        )
        .unwrap();
        conn.execute(
            "UPDATE \"transaction\" SET amount = 'a lot' WHERE id = ?1",
            (transaction.id,),
        )
        .unwrap();

        let result = get_transaction(transaction.id, user_id, &conn);

        assert_eq!(
            result,
            Err(Error::DataValidation(DataValidationError::UnparsableAmount {
                record: RecordRef::transaction(transaction.id),
                value: "a lot".to_owned(),
            }))
        );
    }

    #[test]
    fn draft_leaves_out_unreadable_fields() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let transaction = create_transaction(
            Transaction::build(
                "Groceries",
                Decimal::new(4599, 2),
                Some(date!(2026 - 01 - 05)),
                Category::Food,
            )
            .description("Weekly shop"),
            user_id,
            &conn,
        )
        .unwrap();
        conn.execute(
            "UPDATE \"transaction\" SET date = 'last tuesday', category = 'SNACKS' WHERE id = ?1",
            [transaction.id],
        )
        .unwrap();

        let draft = get_transaction_draft(transaction.id, user_id, &conn).unwrap();

        assert_eq!(
            draft,
            TransactionDraft {
                id: transaction.id,
                title: "Groceries".to_owned(),
                amount: Some(Decimal::new(4599, 2)),
                date: None,
                category: None,
                description: "Weekly shop".to_owned(),
            }
        );
    }

    #[test]
    fn draft_is_not_found_for_other_user() {
        let conn = get_test_connection();
        let owner = create_test_user("alice", &conn);
        let other_user = create_test_user("bob", &conn);
        let transaction = create_transaction(
            Transaction::build("Groceries", Decimal::ONE, None, Category::Food),
            owner,
            &conn,
        )
        .unwrap();

        assert_eq!(
            get_transaction_draft(transaction.id, other_user, &conn),
            Err(Error::NotFound)
        );
    }
}
