//! The page for recording a new income.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    income::form::{IncomeFormDefaults, income_form_fields},
    navigation::NavBar,
    timezone::local_offset_or_error,
};

fn create_income_view(today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOMES_VIEW).into_html();
    let fields = income_form_fields(&IncomeFormDefaults {
        date: Some(today),
        ..Default::default()
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::INCOMES_API)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Income" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Add Income"
                }
            }
        }
    };

    base("New Income", &[], &content)
}

#[derive(Debug, Clone)]
pub struct CreateIncomePageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateIncomePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for recording an income received today.
pub async fn get_create_income_page(
    State(state): State<CreateIncomePageState>,
) -> Result<Response, Error> {
    let local_offset = local_offset_or_error(&state.local_timezone)?;
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    Ok(create_income_view(today).into_response())
}

#[cfg(test)]
mod tests {
    use axum::extract::State;

    use crate::{
        endpoints,
        income::create_page::{CreateIncomePageState, get_create_income_page},
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn new_income_page_returns_form() {
        let state = CreateIncomePageState {
            local_timezone: "Pacific/Auckland".to_owned(),
        };

        let response = get_create_income_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::INCOMES_API, "hx-post");
        assert_form_input(&form, "title", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_form_submit_button(&form);
    }
}
