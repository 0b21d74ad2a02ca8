//! The page listing a user's incomes, and the income table shared with the
//! home page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    endpoints::{self, format_endpoint, with_redirect_url},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency,
    },
    income::{Income, get_user_incomes},
    navigation::NavBar,
};

#[derive(Debug, Clone)]
pub struct IncomesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IncomesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn income_row(income: &Income, return_to: Option<&str>) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_INCOME_VIEW, income.id);
    let edit_url = match return_to {
        Some(return_to) => with_redirect_url(&edit_url, return_to),
        None => edit_url,
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-income-id=(income.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(date) = income.date {
                    time datetime=(date) { (date) }
                } @else {
                    span class="text-yellow-700 dark:text-yellow-300" { "No date" }
                }
            }

            th
                scope="row"
                class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
            {
                (income.title)
            }

            td class=(TABLE_CELL_STYLE) { (income.source) }

            td class="px-6 py-4 text-right tabular-nums" { (format_currency(income.amount)) }

            td class=(TABLE_CELL_STYLE)
            {
                (edit_delete_action_links(
                    &edit_url,
                    &format_endpoint(endpoints::INCOME, income.id),
                    &format!(
                        "Are you sure you want to delete the income '{}'? This cannot be undone.",
                        income.title
                    ),
                ))
            }
        }
    }
}

/// A table of incomes with edit and delete actions.
pub fn income_table<'a>(
    incomes: impl IntoIterator<Item = &'a Income>,
    return_to: Option<&str>,
) -> Markup {
    let incomes: Vec<&Income> = incomes.into_iter().collect();

    html! {
        div class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl"
        {
            table
                id="incomeList"
                class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Source" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for income in &incomes {
                        (income_row(income, return_to))
                    }

                    @if incomes.is_empty() {
                        tr
                        {
                            td
                                colspan="5"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No incomes found. Record one "
                                a href=(endpoints::NEW_INCOME_VIEW) class=(LINK_STYLE) { "here" }
                                "."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn incomes_view(incomes: &[Income]) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOMES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Incomes" }

                    a href=(endpoints::NEW_INCOME_VIEW) class=(LINK_STYLE) { "Add Income" }
                }

                (income_table(incomes, None))
            }
        }
    };

    base("Incomes", &[], &content)
}

/// Renders every income owned by the logged in user, newest first.
pub async fn get_incomes_page(
    State(state): State<IncomesPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let incomes = get_user_incomes(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get incomes: {error}"))?;

    Ok(incomes_view(&incomes).into_response())
}
