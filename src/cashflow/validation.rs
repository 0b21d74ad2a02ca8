//! Errors for records that cannot be used in a summary.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use rusqlite::types::Type;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    cashflow::Period,
    category::Category,
    database_id::DatabaseId,
    endpoints::{self, format_endpoint},
};

/// The largest amount a single record may hold, in dollars.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// The format dates are stored in, e.g. "2026-01-05".
pub const STORED_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The kind of record a [RecordRef] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A row in the transaction table.
    Transaction,
    /// A row in the income table.
    Income,
}

/// Identifies a stored record in error messages and data-quality reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordRef {
    /// Whether the record is a transaction or an income.
    pub kind: RecordKind,
    /// The database ID of the record.
    pub id: DatabaseId,
}

impl RecordRef {
    /// Refer to the transaction with `id`.
    pub fn transaction(id: DatabaseId) -> Self {
        Self {
            kind: RecordKind::Transaction,
            id,
        }
    }

    /// Refer to the income with `id`.
    pub fn income(id: DatabaseId) -> Self {
        Self {
            kind: RecordKind::Income,
            id,
        }
    }

    /// The page where the record can be corrected.
    pub fn edit_url(&self) -> String {
        match self.kind {
            RecordKind::Transaction => format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, self.id),
            RecordKind::Income => format_endpoint(endpoints::EDIT_INCOME_VIEW, self.id),
        }
    }
}

impl Display for RecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            RecordKind::Transaction => write!(f, "transaction #{}", self.id),
            RecordKind::Income => write!(f, "income #{}", self.id),
        }
    }
}

/// A record holds a value that cannot be summarized.
///
/// These errors are never swallowed: a summary is either computed from every
/// record or not at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataValidationError {
    /// Amounts record money spent or earned and must not be negative.
    #[error("{record} has a negative amount ({amount})")]
    NegativeAmount {
        /// The offending record.
        record: RecordRef,
        /// The stored amount.
        amount: Decimal,
    },

    /// The stored date is not a "YYYY-MM-DD" date.
    #[error("{record} has an unreadable date \"{value}\"")]
    UnparsableDate {
        /// The offending record.
        record: RecordRef,
        /// The raw stored value.
        value: String,
    },

    /// The stored amount is not a decimal number.
    #[error("{record} has an unreadable amount \"{value}\"")]
    UnparsableAmount {
        /// The offending record.
        record: RecordRef,
        /// The raw stored value.
        value: String,
    },

    /// The stored category is not one of the known categories.
    #[error("{record} has an unknown category \"{value}\"")]
    UnknownCategory {
        /// The offending record.
        record: RecordRef,
        /// The raw stored value.
        value: String,
    },

    /// The amounts in a period add up to more than a decimal can hold.
    #[error("the totals for {} are too large to calculate", period.label())]
    TotalOverflow {
        /// The period being summarized.
        period: Period,
    },
}

impl DataValidationError {
    /// The record that failed validation, if the error is about a single record.
    pub fn record(&self) -> Option<RecordRef> {
        match self {
            Self::NegativeAmount { record, .. }
            | Self::UnparsableDate { record, .. }
            | Self::UnparsableAmount { record, .. }
            | Self::UnknownCategory { record, .. } => Some(*record),
            Self::TotalOverflow { .. } => None,
        }
    }

    /// Wrap the error so it can be returned from a rusqlite row mapper.
    ///
    /// `From<rusqlite::Error> for Error` unwraps it again into
    /// [crate::Error::DataValidation].
    pub fn into_sql_error(self, column_index: usize) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(column_index, Type::Text, Box::new(self))
    }
}

/// Parse an amount read from the database for `record`.
pub fn parse_stored_amount(record: RecordRef, raw: &str) -> Result<Decimal, DataValidationError> {
    Decimal::from_str(raw.trim()).map_err(|_| DataValidationError::UnparsableAmount {
        record,
        value: raw.to_owned(),
    })
}

/// Parse a date read from the database for `record`.
pub fn parse_stored_date(record: RecordRef, raw: &str) -> Result<Date, DataValidationError> {
    Date::parse(raw, STORED_DATE_FORMAT).map_err(|_| DataValidationError::UnparsableDate {
        record,
        value: raw.to_owned(),
    })
}

/// Parse a category name read from the database for `record`.
pub fn parse_stored_category(
    record: RecordRef,
    raw: &str,
) -> Result<Category, DataValidationError> {
    Category::from_str(raw).map_err(|_| DataValidationError::UnknownCategory {
        record,
        value: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        cashflow::{
            DataValidationError, RecordRef,
            validation::{parse_stored_amount, parse_stored_category, parse_stored_date},
        },
        category::Category,
    };

    #[test]
    fn message_names_record() {
        let error = DataValidationError::NegativeAmount {
            record: RecordRef::transaction(7),
            amount: Decimal::new(-1250, 2),
        };

        assert_eq!(
            error.to_string(),
            "transaction #7 has a negative amount (-12.50)"
        );
    }

    #[test]
    fn survives_sql_error_round_trip() {
        let error = DataValidationError::UnknownCategory {
            record: RecordRef::income(2),
            value: "SNACKS".to_owned(),
        };

        let sql_error = error.clone().into_sql_error(4);

        assert_eq!(Error::from(sql_error), Error::DataValidation(error));
    }

    #[test]
    fn parses_stored_values() {
        let record = RecordRef::transaction(1);

        assert_eq!(
            parse_stored_amount(record, "12.30"),
            Ok(Decimal::new(1230, 2))
        );
        assert_eq!(
            parse_stored_date(record, "2026-01-31"),
            Ok(date!(2026 - 01 - 31))
        );
        assert_eq!(
            parse_stored_category(record, "HOUSING"),
            Ok(Category::Housing)
        );
    }

    #[test]
    fn rejects_malformed_stored_values() {
        let record = RecordRef::income(9);

        assert_eq!(
            parse_stored_amount(record, "twelve"),
            Err(DataValidationError::UnparsableAmount {
                record,
                value: "twelve".to_owned()
            })
        );
        assert_eq!(
            parse_stored_date(record, "2026-02-30"),
            Err(DataValidationError::UnparsableDate {
                record,
                value: "2026-02-30".to_owned()
            })
        );
        assert_eq!(
            parse_stored_date(record, "31/01/2026"),
            Err(DataValidationError::UnparsableDate {
                record,
                value: "31/01/2026".to_owned()
            })
        );
    }
}
