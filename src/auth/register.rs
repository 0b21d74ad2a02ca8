//! The registration page and the endpoint that creates a new user.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, PasswordHash, Username, ValidatedPassword,
    auth::{create_user, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, link, loading_spinner, log_in_register, password_input,
        username_input,
    },
    timezone::get_local_offset,
};

/// Error messages to show next to each field of the registration form.
#[derive(Default)]
struct FieldErrors {
    username: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
}

fn registration_form(username: &str, errors: FieldErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, errors.username.as_deref()))
            (password_input("password", "Password", errors.password.as_deref()))
            (password_input(
                "confirm_password",
                "Confirm Password",
                errors.confirm_password.as_deref()
            ))

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = registration_form("", FieldErrors::default());
    let content = log_in_register("Create an account", &form);

    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The data entered in the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

fn internal_error_redirect() -> Response {
    (
        HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// Create a user from the registration form and log them in.
///
/// Invalid input is reported by returning the form with an error message
/// under the offending field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let form_with_errors =
        |errors: FieldErrors| registration_form(&user_data.username, errors).into_response();

    let username = match Username::new(&user_data.username) {
        Ok(username) => username,
        Err(error) => {
            return form_with_errors(FieldErrors {
                username: Some(error.to_string()),
                ..Default::default()
            });
        }
    };

    let validated_password = match ValidatedPassword::new(&user_data.password, &[username.as_ref()])
    {
        Ok(password) => password,
        Err(error) => {
            return form_with_errors(FieldErrors {
                password: Some(error.to_string()),
                ..Default::default()
            });
        }
    };

    if user_data.password != user_data.confirm_password {
        return form_with_errors(FieldErrors {
            confirm_password: Some("Passwords do not match".to_owned()),
            ..Default::default()
        });
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("could not hash password: {error}");
            return internal_error_redirect();
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return internal_error_redirect();
            }
        };

        create_user(username, password_hash, &connection)
    };

    let user = match user {
        Ok(user) => user,
        Err(error @ Error::DuplicateUsername(_)) => {
            return form_with_errors(FieldErrors {
                username: Some(error.to_string()),
                ..Default::default()
            });
        }
        Err(error) => {
            tracing::error!("could not create user: {error}");
            return internal_error_redirect();
        }
    };

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::ROOT.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not set auth cookie: {error}");
            internal_error_redirect()
        }
    }
}
