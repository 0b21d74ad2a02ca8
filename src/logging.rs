//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{Method, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Form fields whose values never reach the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both are logged at the `info` level with bodies cut to
/// [LOG_BODY_LENGTH_LIMIT] bytes, the full body goes to `debug`.
/// Password fields in submitted forms are masked.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match read_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return axum::http::StatusCode::BAD_REQUEST.into_response();
        }
    };
    let body_text = String::from_utf8_lossy(&body);

    let is_form_post = parts.method == Method::POST
        && parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

    if is_form_post {
        log_request(&parts, &redact_passwords(&body_text));
    } else {
        log_request(&parts, &body_text);
    }

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (parts, body) = response.into_parts();
    let body = match read_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body));

    Response::from_parts(parts, Body::from(body))
}

async fn read_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

fn redact_passwords(form_text: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if REDACTED_FIELDS.contains(&name) => format!("{name}=********"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn truncate(body: &str) -> &str {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return body;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    tracing::info!(
        method = %parts.method,
        uri = %parts.uri,
        "received request, body: {:?}",
        truncate(body)
    );
    tracing::debug!("full request: {parts:#?}\nbody: {body:?}");
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    tracing::info!(
        status = %parts.status,
        "sending response, body: {:?}",
        truncate(body)
    );
    tracing::debug!("full response: {parts:#?}\nbody: {body:?}");
}

#[cfg(test)]
mod tests {
    use crate::logging::{LOG_BODY_LENGTH_LIMIT, redact_passwords, truncate};

    #[test]
    fn redacts_password_fields() {
        assert_eq!(
            redact_passwords("username=alice&password=hunter2&confirm_password=hunter2"),
            "username=alice&password=********&confirm_password=********"
        );
    }

    #[test]
    fn leaves_other_fields_alone() {
        assert_eq!(
            redact_passwords("title=Groceries&amount=12.50&category=FOOD"),
            "title=Groceries&amount=12.50&category=FOOD"
        );
    }

    #[test]
    fn truncates_on_char_boundary() {
        let body = "é".repeat(LOG_BODY_LENGTH_LIMIT);

        let truncated = truncate(&body);

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(body.starts_with(truncated));
    }
}
