//! The URIs of pages and API routes.
//!
//! For endpoints that take a parameter, e.g., '/api/incomes/{income_id}', use [format_endpoint].

use serde::Deserialize;
use time::UtcOffset;

use crate::{Error, cashflow::Period};

/// The landing page for visitors, or the home page for logged in users.
pub const ROOT: &str = "/";
/// The monthly dashboard with the category breakdown.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for displaying a user's incomes.
pub const INCOMES_VIEW: &str = "/incomes";
/// The page for recording a new income.
pub const NEW_INCOME_VIEW: &str = "/incomes/new";
/// The page for editing an existing income.
pub const EDIT_INCOME_VIEW: &str = "/incomes/{income_id}/edit";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for registering a new user.
pub const USERS: &str = "/api/users";
/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create an income.
pub const INCOMES_API: &str = "/api/incomes";
/// The route to update or delete a single income.
pub const INCOME: &str = "/api/incomes/{income_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/incomes/{income_id}', '{income_id}' is the parameter.
///
/// Only the first parameter is replaced. If there is no parameter, the
/// original `endpoint_path` is returned.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map(|offset| start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end..])
}

/// Append `?period=YYYY-MM` to `endpoint_path`.
pub fn with_period(endpoint_path: &str, period: &Period) -> String {
    format!("{endpoint_path}?period={period}")
}

/// The `?period=YYYY-MM` query string of the pages that show monthly totals.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    /// The requested period, or the current month at `local_offset` if the
    /// query does not name one.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidPeriod] if the query is not a valid "YYYY-MM" period.
    pub fn resolve(&self, local_offset: UtcOffset) -> Result<Period, Error> {
        match self.period.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse(),
            _ => Period::current(local_offset),
        }
    }
}

/// Append `redirect_url` to `endpoint_path` as the `redirect_url` query parameter.
///
/// Falls back to `endpoint_path` if the query cannot be encoded.
pub fn with_redirect_url(endpoint_path: &str, redirect_url: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", redirect_url)]) {
        Ok(query) => format!("{endpoint_path}?{query}"),
        Err(error) => {
            tracing::error!("could not encode redirect URL {redirect_url}: {error}");
            endpoint_path.to_owned()
        }
    }
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use time::{OffsetDateTime, UtcOffset};

    use crate::{Error, cashflow::Period, endpoints};

    use super::{PeriodQuery, format_endpoint, with_period, with_redirect_url};

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
            endpoints::EDIT_TRANSACTION_VIEW,
            endpoints::INCOMES_VIEW,
            endpoints::NEW_INCOME_VIEW,
            endpoints::EDIT_INCOME_VIEW,
            endpoints::REGISTER_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::LOG_IN_API,
            endpoints::LOG_OUT,
            endpoints::USERS,
            endpoints::TRANSACTIONS_API,
            endpoints::TRANSACTION,
            endpoints::INCOMES_API,
            endpoints::INCOME,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn replaces_parameter() {
        assert_eq!(format_endpoint("/hello/{world_id}", 1), "/hello/1");
        assert_eq!(format_endpoint("/hello/{world}", 1), "/hello/1");
    }

    #[test]
    fn replaces_parameter_in_middle() {
        assert_eq!(
            format_endpoint(endpoints::EDIT_INCOME_VIEW, 42),
            "/incomes/42/edit"
        );
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        assert_eq!(format_endpoint("/hello/world", 1), "/hello/world");
    }

    #[test]
    fn appends_period_query() {
        let period = Period::new(2026, 3).unwrap();

        assert_eq!(
            with_period(endpoints::DASHBOARD_VIEW, &period),
            "/dashboard?period=2026-03"
        );
    }

    #[test]
    fn appends_encoded_redirect_url() {
        assert_eq!(
            with_redirect_url("/transactions/1/edit", "/?period=2026-03"),
            "/transactions/1/edit?redirect_url=%2F%3Fperiod%3D2026-03"
        );
    }

    #[test]
    fn period_query_parses_named_period() {
        let query = PeriodQuery {
            period: Some("2026-01".to_owned()),
        };

        assert_eq!(query.resolve(UtcOffset::UTC), Period::new(2026, 1));
    }

    #[test]
    fn period_query_defaults_to_current_month() {
        let today = OffsetDateTime::now_utc().date();

        for query in [
            PeriodQuery::default(),
            PeriodQuery {
                period: Some(String::new()),
            },
        ] {
            assert_eq!(query.resolve(UtcOffset::UTC), Period::containing(today));
        }
    }

    #[test]
    fn period_query_rejects_invalid_period() {
        let query = PeriodQuery {
            period: Some("2026-13".to_owned()),
        };

        assert_eq!(
            query.resolve(UtcOffset::UTC),
            Err(Error::InvalidPeriod("2026-13".to_owned()))
        );
    }
}
