//! The root page: a landing page for visitors and the monthly overview for
//! logged in users.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{User, get_token_from_cookies, get_user_by_id},
    cashflow::{CashflowReport, SQLiteIncomeStore, SQLiteTransactionStore, load_cashflow_report},
    endpoints::{self, PeriodQuery, with_period},
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, period_navigation,
        summary_cards, undated_records_warning,
    },
    income::income_table,
    navigation::NavBar,
    timezone::local_offset_or_error,
    transaction::transaction_table,
};

/// The state needed for the root page.
#[derive(Debug, Clone)]
pub struct HomeState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for reading transactions and incomes.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for HomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FromRef<HomeState> for Key {
    fn from_ref(state: &HomeState) -> Self {
        state.cookie_key.clone()
    }
}

/// Show the landing page to visitors without a valid log-in, otherwise the
/// totals and records for the requested period.
pub async fn get_home_page(
    State(state): State<HomeState>,
    jar: PrivateCookieJar,
    Query(query): Query<PeriodQuery>,
) -> Result<Response, Error> {
    let user_id = match get_token_from_cookies(&jar) {
        Ok(token) => token.user_id,
        Err(error) => {
            tracing::debug!("showing landing page: {error}");
            return Ok(landing_view().into_response());
        }
    };

    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let period = query.resolve(local_offset)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = match get_user_by_id(user_id, &connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            tracing::warn!("auth cookie names unknown user {user_id}, showing landing page");
            return Ok(landing_view().into_response());
        }
        Err(error) => return Err(error),
    };

    let report = load_cashflow_report(
        user_id,
        period,
        &SQLiteTransactionStore::new(&connection),
        &SQLiteIncomeStore::new(&connection),
    )
    .inspect_err(|error| tracing::error!("could not load cashflow for {period}: {error}"))?;

    Ok(home_view(&user, &report).into_response())
}

fn landing_view() -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="max-w-md space-y-6 text-center"
            {
                h1 class="text-3xl font-bold" { "Budget Tracker" }

                p class="text-gray-600 dark:text-gray-300"
                {
                    "Record what you spend and what you earn, and see where the money went each month."
                }

                a href=(endpoints::LOG_IN_VIEW) id="log-in-link"
                {
                    button type="button" class=(BUTTON_PRIMARY_STYLE) { "Log in" }
                }

                p class="text-sm"
                {
                    "New here? "
                    a href=(endpoints::REGISTER_VIEW) id="register-link" class=(LINK_STYLE) { "Create an account" }
                }
            }
        }
    };

    base("Welcome", &[], &content)
}

fn home_view(user: &User, report: &CashflowReport) -> Markup {
    let summary = &report.summary;
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();
    let return_to = with_period(endpoints::ROOT, &summary.period);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 id="greeting" class="text-2xl font-bold" { "Welcome back, " (user.username) }

            (period_navigation(endpoints::ROOT, &summary.period))

            (undated_records_warning(&summary.undated_records))

            (summary_cards(summary))

            section class="w-full my-8 space-y-4 lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h2 class="text-xl font-semibold" { "Transactions" }
                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "Add Transaction" }
                }

                (transaction_table(&report.transactions, Some(&return_to)))
            }

            section class="w-full space-y-4 lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h2 class="text-xl font-semibold" { "Incomes" }
                    a href=(endpoints::NEW_INCOME_VIEW) class=(LINK_STYLE) { "Add Income" }
                }

                (income_table(&report.incomes, Some(&return_to)))
            }
        }
    };

    base("Home", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        extract::{Path, Query, State},
        routing::{get, post},
    };
    use axum_extra::extract::PrivateCookieJar;
    use axum_test::TestServer;
    use rust_decimal::Decimal;
    use scraper::{Html, Selector};
    use time::{Duration, UtcOffset, macros::date};

    use crate::{
        Error, UserID,
        app_state::create_cookie_key,
        auth::{COOKIE_TOKEN, set_auth_cookie},
        category::Category,
        endpoints::{self, PeriodQuery},
        home::{HomeState, get_home_page},
        income::{Income, create_income},
        test_utils::{assert_valid_html, create_test_user, get_test_connection, select_text},
        transaction::{Transaction, create_transaction},
    };

    const TEST_LOG_IN_ROUTE: &str = "/stub_log_in/{user_id}";

    async fn stub_log_in_route(
        jar: PrivateCookieJar,
        Path(user_id): Path<i64>,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(
            jar,
            UserID::new(user_id),
            Duration::minutes(5),
            UtcOffset::UTC,
        )
    }

    fn get_test_server(state: HomeState) -> TestServer {
        let app = Router::new()
            .route(endpoints::ROOT, get(get_home_page))
            .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn get_test_state(connection: rusqlite::Connection) -> HomeState {
        HomeState {
            cookie_key: create_cookie_key("nafstenoas"),
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn visitor_sees_landing_page() {
        let server = get_test_server(get_test_state(get_test_connection()));

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        let document = Html::parse_document(&response.text());
        assert_valid_html(&document);
        let log_in = Selector::parse("a#log-in-link").unwrap();
        let register = Selector::parse("a#register-link").unwrap();
        assert_eq!(
            document.select(&log_in).next().unwrap().attr("href"),
            Some(endpoints::LOG_IN_VIEW)
        );
        assert_eq!(
            document.select(&register).next().unwrap().attr("href"),
            Some(endpoints::REGISTER_VIEW)
        );
    }

    #[tokio::test]
    async fn logged_in_user_sees_totals_and_records() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        create_transaction(
            Transaction::build(
                "Groceries",
                Decimal::new(120, 0),
                Some(date!(2026 - 01 - 10)),
                Category::Food,
            ),
            user.id,
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(
                "Bus pass",
                Decimal::new(50, 0),
                Some(date!(2026 - 02 - 01)),
                Category::Transport,
            ),
            user.id,
            &connection,
        )
        .unwrap();
        create_income(
            Income::build("Salary", Decimal::new(1000, 0), Some(date!(2026 - 01 - 15))),
            user.id,
            &connection,
        )
        .unwrap();
        let server = get_test_server(get_test_state(connection));
        let token_cookie = server
            .post(&format!("/stub_log_in/{}", user.id))
            .await
            .cookie(COOKIE_TOKEN);

        let response = server
            .get(endpoints::ROOT)
            .add_query_param("period", "2026-01")
            .add_cookie(token_cookie)
            .await;

        response.assert_status_ok();
        let document = Html::parse_document(&response.text());
        assert_valid_html(&document);
        assert_eq!(select_text(&document, "#monthly-expense-total span"), ["$120"]);
        assert_eq!(select_text(&document, "#monthly-income-total span"), ["$1,000"]);
        assert_eq!(select_text(&document, "#net-cashflow span"), ["$880"]);
        assert_eq!(
            select_text(&document, "#transactionList tbody th"),
            ["Bus pass", "Groceries"]
        );
        assert_eq!(select_text(&document, "#incomeList tbody th"), ["Salary"]);
        assert_eq!(select_text(&document, "#greeting"), ["Welcome back, alice"]);
    }

    #[tokio::test]
    async fn cookie_for_unknown_user_shows_landing_page() {
        let server = get_test_server(get_test_state(get_test_connection()));
        let token_cookie = server.post("/stub_log_in/42").await.cookie(COOKIE_TOKEN);

        let response = server.get(endpoints::ROOT).add_cookie(token_cookie).await;

        response.assert_status_ok();
        let document = Html::parse_document(&response.text());
        assert_eq!(select_text(&document, "h1"), ["Budget Tracker"]);
    }

    #[tokio::test]
    async fn invalid_period_is_bad_request() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let server = get_test_server(get_test_state(connection));
        let token_cookie = server
            .post(&format!("/stub_log_in/{}", user.id))
            .await
            .cookie(COOKIE_TOKEN);

        let response = server
            .get(endpoints::ROOT)
            .add_query_param("period", "January")
            .add_cookie(token_cookie)
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn handler_falls_back_to_landing_page_without_cookie() {
        let state = get_test_state(get_test_connection());
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = get_home_page(State(state), jar, Query(PeriodQuery::default()))
            .await
            .unwrap();

        let document = Html::parse_document(
            &String::from_utf8_lossy(
                &axum::body::to_bytes(response.into_body(), usize::MAX)
                    .await
                    .unwrap(),
            ),
        );
        assert_eq!(select_text(&document, "h1"), ["Budget Tracker"]);
    }
}
