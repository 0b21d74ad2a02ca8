//! Success and error messages shown in the alert container after an HTMX request.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;

/// A dismissable message that HTMX swaps into `#alert-container`.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Html<String> {
        let (message, details, container_style, is_error) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400",
                false,
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
                true,
            ),
        };

        // Swapped in out-of-band so a handler can return it next to other content.
        let markup = html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class=(container_style)
                    data-alert-kind=(if is_error { "error" } else { "success" })
                {
                    div class="flex items-start justify-between gap-4"
                    {
                        div
                        {
                            p class="font-semibold" { (message) }

                            @if !details.is_empty() {
                                p { (details) }
                            }
                        }

                        button
                            type="button"
                            aria-label="Dismiss"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                        {
                            "×"
                        }
                    }
                }
            }
        };

        Html(markup.into_string())
    }

    /// Render the alert with `status`, e.g. a 4xx code so `hx-target-error` picks it up.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, self.into_html()).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}
