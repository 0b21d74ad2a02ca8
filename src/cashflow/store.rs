//! Read access to a user's records, independent of how they are stored.

use rusqlite::Connection;

use crate::{
    Error, UserID,
    income::{Income, get_user_incomes},
    transaction::{Transaction, get_user_transactions},
};

/// Looks up the transactions owned by a user.
pub trait TransactionStore {
    /// Get every transaction owned by `user_id`, newest first with undated
    /// transactions last.
    ///
    /// # Errors
    ///
    /// Returns [Error::DataValidation] if a stored transaction cannot be read,
    /// or [Error::SqlError] if the store cannot be queried.
    fn find_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;
}

/// Looks up the incomes owned by a user.
pub trait IncomeStore {
    /// Get every income owned by `user_id`, newest first with undated incomes
    /// last.
    ///
    /// # Errors
    ///
    /// Returns [Error::DataValidation] if a stored income cannot be read,
    /// or [Error::SqlError] if the store cannot be queried.
    fn find_by_user(&self, user_id: UserID) -> Result<Vec<Income>, Error>;
}

/// A [TransactionStore] backed by the SQLite transaction table.
#[derive(Debug, Clone, Copy)]
pub struct SQLiteTransactionStore<'a> {
    connection: &'a Connection,
}

impl<'a> SQLiteTransactionStore<'a> {
    /// Create a store that reads from `connection`.
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore<'_> {
    fn find_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        get_user_transactions(user_id, self.connection)
    }
}

/// An [IncomeStore] backed by the SQLite income table.
#[derive(Debug, Clone, Copy)]
pub struct SQLiteIncomeStore<'a> {
    connection: &'a Connection,
}

impl<'a> SQLiteIncomeStore<'a> {
    /// Create a store that reads from `connection`.
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }
}

impl IncomeStore for SQLiteIncomeStore<'_> {
    fn find_by_user(&self, user_id: UserID) -> Result<Vec<Income>, Error> {
        get_user_incomes(user_id, self.connection)
    }
}
