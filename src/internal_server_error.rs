//! The error page shown when a request cannot be completed.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A full page error with a headline status, what went wrong and how to fix it.
pub struct InternalServerError<'a> {
    pub status: StatusCode,
    pub header: &'a str,
    pub description: &'a str,
    pub fix: &'a str,
    /// An extra link shown before the link home, as `(label, href)`.
    pub link: Option<(&'a str, &'a str)>,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            header: "500",
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
            link: None,
        }
    }
}

impl InternalServerError<'_> {
    pub fn into_html(self) -> Html<String> {
        let title = self.status.canonical_reason().unwrap_or("Error");

        Html(error_view(title, self.header, self.description, self.fix, self.link).into_string())
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (self.status, self.into_html()).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
