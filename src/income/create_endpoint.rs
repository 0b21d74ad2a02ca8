//! Defines the endpoint for recording a new income.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID, endpoints,
    income::{create_income, form::IncomeForm},
};

#[derive(Debug, Clone)]
pub struct CreateIncomeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for recording an income, redirects to the incomes view on success.
pub async fn create_income_endpoint(
    State(state): State<CreateIncomeState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<IncomeForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_income(form.into_builder(), user_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::INCOMES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("Could not create income: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        endpoints,
        income::{
            create_endpoint::{CreateIncomeState, create_income_endpoint},
            form::IncomeForm,
            get_user_incomes,
        },
        test_utils::{assert_hx_redirect, create_test_user, get_test_connection},
    };

    fn form(amount: Decimal) -> IncomeForm {
        IncomeForm {
            title: "Salary".to_owned(),
            amount,
            date: date!(2026 - 01 - 15),
            source: "Acme".to_owned(),
        }
    }

    #[tokio::test]
    async fn creates_income_for_logged_in_user() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let state = CreateIncomeState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = create_income_endpoint(
            State(state.clone()),
            Extension(user.id),
            Form(form(Decimal::new(1000, 0))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::INCOMES_VIEW);
        let incomes = get_user_incomes(user.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].title, "Salary");
        assert_eq!(incomes[0].amount, Decimal::new(1000, 0));
        assert_eq!(incomes[0].date, Some(date!(2026 - 01 - 15)));
        assert_eq!(incomes[0].source, "Acme");
    }

    #[tokio::test]
    async fn rejects_negative_amount() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let state = CreateIncomeState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = create_income_endpoint(
            State(state.clone()),
            Extension(user.id),
            Form(form(Decimal::new(-1000, 0))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let incomes = get_user_incomes(user.id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(incomes.is_empty());
    }
}
