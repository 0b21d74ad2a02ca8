//! The dashboard route handler and page view.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    cashflow::{CashflowReport, SQLiteIncomeStore, SQLiteTransactionStore, load_cashflow_report},
    dashboard::{
        charts::{DashboardChart, category_chart, chart_script, chart_view},
        tables::category_table,
    },
    endpoints::{self, PeriodQuery, with_period},
    html::{
        HeadElement, PAGE_CONTAINER_STYLE, base, period_navigation, summary_cards,
        undated_records_warning,
    },
    navigation::NavBar,
    timezone::local_offset_or_error,
    transaction::transaction_table,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and incomes.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

const CATEGORY_CHART_ID: &str = "category-chart";

/// Display the totals, category breakdown and transactions for the
/// requested period, or the current month if none is given.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let period = query.resolve(local_offset)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let report = load_cashflow_report(
        user_id,
        period,
        &SQLiteTransactionStore::new(&connection),
        &SQLiteIncomeStore::new(&connection),
    )
    .inspect_err(|error| tracing::error!("could not load cashflow for {period}: {error}"))?;

    Ok(dashboard_view(&report).into_response())
}

fn dashboard_view(report: &CashflowReport) -> Markup {
    let summary = &report.summary;
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let return_to = with_period(endpoints::DASHBOARD_VIEW, &summary.period);

    let chart = (!summary.category_totals.is_empty()).then(|| DashboardChart {
        id: CATEGORY_CHART_ID,
        options: category_chart(&summary.category_totals, summary.period).to_string(),
    });

    let mut head_elements = Vec::new();
    if let Some(chart) = &chart {
        head_elements.push(HeadElement::ScriptLink(
            "/static/echarts.6.0.0.min.js".to_owned(),
        ));
        head_elements.push(chart_script(chart));
    }

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (period_navigation(endpoints::DASHBOARD_VIEW, &summary.period))

            (undated_records_warning(&summary.undated_records))

            section class="w-full space-y-4 lg:max-w-5xl"
            {
                (summary_cards(summary))
            }

            section class="w-full my-8 space-y-4 lg:max-w-5xl"
            {
                h2 class="text-xl font-semibold" { "Spending by Category" }

                div class="grid grid-cols-1 gap-4 lg:grid-cols-2"
                {
                    (category_table(&summary.category_totals, summary.monthly_expense_total))

                    @if let Some(chart) = &chart {
                        (chart_view(chart))
                    }
                }
            }

            section class="w-full space-y-4 lg:max-w-5xl"
            {
                h2 class="text-xl font-semibold" { "Transactions" }

                (transaction_table(report.transactions_in_period(), Some(&return_to)))
            }
        }
    };

    base("Dashboard", &head_elements, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rust_decimal::Decimal;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        cashflow::DataValidationError,
        category::Category,
        dashboard::handlers::{DashboardState, get_dashboard_page},
        endpoints::PeriodQuery,
        income::{Income, create_income},
        test_utils::{
            assert_status_ok, assert_valid_html, create_test_user, get_test_connection,
            parse_html_document, select_text,
        },
        transaction::{Transaction, create_transaction},
    };

    fn january() -> Query<PeriodQuery> {
        Query(PeriodQuery {
            period: Some("2026-01".to_owned()),
        })
    }

    #[tokio::test]
    async fn shows_totals_and_categories_for_period() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let other_user = create_test_user("bob", &connection);
        for (title, amount, date, category) in [
            ("Rent", 1200, date!(2026 - 01 - 01), Category::Housing),
            ("Groceries", 300, date!(2026 - 01 - 10), Category::Food),
            ("February rent", 1200, date!(2026 - 02 - 01), Category::Housing),
        ] {
            create_transaction(
                Transaction::build(title, Decimal::new(amount, 0), Some(date), category),
                user.id,
                &connection,
            )
            .unwrap();
        }
        create_transaction(
            Transaction::build(
                "Not mine",
                Decimal::new(999, 0),
                Some(date!(2026 - 01 - 05)),
                Category::Other,
            ),
            other_user.id,
            &connection,
        )
        .unwrap();
        create_income(
            Income::build("Salary", Decimal::new(2000, 0), Some(date!(2026 - 01 - 15))),
            user.id,
            &connection,
        )
        .unwrap();
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state), Extension(user.id), january())
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_eq!(select_text(&document, "#monthly-expense-total span"), ["$1,500"]);
        assert_eq!(select_text(&document, "#monthly-income-total span"), ["$2,000"]);
        assert_eq!(select_text(&document, "#net-cashflow span"), ["$500"]);
        assert_eq!(
            select_text(&document, "#categoryTotals tbody th"),
            ["Housing", "Food"]
        );
        assert_eq!(
            select_text(&document, "#transactionList tbody th"),
            ["Groceries", "Rent"]
        );
        let chart_selector = Selector::parse("#category-chart").unwrap();
        assert!(document.select(&chart_selector).next().is_some());
        let income_selector = Selector::parse("#incomeList").unwrap();
        assert!(document.select(&income_selector).next().is_none());
    }

    #[tokio::test]
    async fn empty_month_has_no_chart() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state), Extension(user.id), january())
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let chart_selector = Selector::parse("#category-chart").unwrap();
        assert!(document.select(&chart_selector).next().is_none());
        assert_eq!(select_text(&document, "#net-cashflow span"), ["$0"]);
    }

    #[tokio::test]
    async fn warns_about_undated_records() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        create_transaction(
            Transaction::build("Mystery", Decimal::new(10, 0), None, Category::Other),
            user.id,
            &connection,
        )
        .unwrap();
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state), Extension(user.id), january())
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let warning_selector = Selector::parse("#undated-records-warning li").unwrap();
        assert_eq!(document.select(&warning_selector).count(), 1);
    }

    #[tokio::test]
    async fn invalid_period_is_bad_request() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let result = get_dashboard_page(
            State(state),
            Extension(user.id),
            Query(PeriodQuery {
                period: Some("2026-13".to_owned()),
            }),
        )
        .await;

        let error = result.unwrap_err();
        assert_eq!(error, Error::InvalidPeriod("2026-13".to_owned()));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_totals_fail_without_breaking_later_requests() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        for _ in 0..2 {
            connection
                .execute(
                    "INSERT INTO \"transaction\" (title, amount, date, category, description, user_id)
                     VALUES ('Imported', ?1, '2026-01-10', 'OTHER', '', ?2)",
                    (Decimal::MAX.to_string(), user.id.as_i64()),
                )
                .unwrap();
        }
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let result = get_dashboard_page(State(state.clone()), Extension(user.id), january()).await;

        assert!(matches!(
            result,
            Err(Error::DataValidation(DataValidationError::TotalOverflow { .. }))
        ));
        let response = get_dashboard_page(
            State(state),
            Extension(user.id),
            Query(PeriodQuery {
                period: Some("2025-01".to_owned()),
            }),
        )
        .await
        .unwrap();
        assert_status_ok(&response);
    }
}
