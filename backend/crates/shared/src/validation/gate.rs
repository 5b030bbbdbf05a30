//! Validation Gate Middleware
//!
//! Runs a route's [`RouteSchema`] before the handler. A rejected request never
//! reaches the handler (and therefore never reaches persistence).

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{FromRequestParts, Query, RawPathParams, Request, State};
use axum::http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;
use http_body_util::LengthLimitError;

use super::report::{Location, ValidationErrors, Violation};
use super::schema::{RequestInput, RouteSchema};
use crate::error::app_error::AppError;

/// Largest request body the gate will buffer (1 MiB)
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Attach `schema` to a method router
///
/// ```ignore
/// .route("/expenses", with_schema(post(create), schema::create_expense()))
/// ```
pub fn with_schema<S>(method: MethodRouter<S>, schema: RouteSchema) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    method.route_layer(from_fn_with_state(Arc::new(schema), validation_gate))
}

/// Middleware: validate path, query and body against the route schema
pub async fn validation_gate(
    State(schema): State<Arc<RouteSchema>>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let mut input = RequestInput::new();

    if schema.expects(Location::Path) {
        // No matched parameters is the same as none declared
        if let Ok(params) = RawPathParams::from_request_parts(&mut parts, &()).await {
            for (key, value) in params.iter() {
                input = input.with_path(key, value);
            }
        }
    }

    if schema.expects(Location::Query) {
        match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => {
                for (key, value) in pairs {
                    input = input.with_query(key, value);
                }
            }
            Err(rejection) => {
                let mut errors = ValidationErrors::new();
                errors.push(Violation::new(
                    Location::Query,
                    "query",
                    "query",
                    rejection.body_text(),
                ));
                return reject(&schema, errors);
            }
        }
    }

    let bytes = if schema.expects(Location::Body) {
        let declared = parts
            .headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared.is_some_and(|len| len > MAX_BODY_BYTES) {
            return too_large(&schema);
        }

        match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => {
                input = input.with_raw_body(&bytes);
                bytes
            }
            Err(err) if exceeds_limit(&err) => return too_large(&schema),
            Err(err) => {
                tracing::debug!(
                    route = schema.name(),
                    error = %err,
                    "Failed to buffer request body"
                );
                return AppError::bad_request("Request body could not be read")
                    .with_action("Resend the request")
                    .into_response();
            }
        }
    } else {
        // Handlers on routes without body fields never read the body
        drop(body);
        parts.headers.remove(CONTENT_LENGTH);
        parts.headers.remove(TRANSFER_ENCODING);
        Bytes::new()
    };

    if let Err(errors) = schema.check(&input) {
        return reject(&schema, errors);
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn reject(schema: &RouteSchema, errors: ValidationErrors) -> Response {
    tracing::debug!(
        route = schema.name(),
        fields = ?errors.fields(),
        "Request rejected by validation gate"
    );
    AppError::from(errors).into_response()
}

/// Whether buffering stopped at [`MAX_BODY_BYTES`]
fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return true;
        }
        source = std::error::Error::source(err);
    }
    false
}

fn too_large(schema: &RouteSchema) -> Response {
    tracing::debug!(route = schema.name(), "Request body too large");
    AppError::payload_too_large("Request body must not exceed 1 MiB")
        .with_action("Send a smaller request body")
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use super::*;
    use crate::validation::Rule;
    use axum::Router;
    use axum::body::HttpBody;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use http_body::Frame;
    use tower::ServiceExt;

    /// Body whose transport fails on the first read
    struct BrokenBody;

    impl HttpBody for BrokenBody {
        type Data = Bytes;
        type Error = std::io::Error;

        fn poll_frame(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, Self::Error>>> {
            Poll::Ready(Some(Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "client went away",
            ))))
        }
    }

    async fn content_length(headers: HeaderMap) -> String {
        headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none")
            .to_string()
    }

    async fn echo(body: Bytes) -> Bytes {
        body
    }

    fn app() -> Router {
        let create = RouteSchema::new("things.create")
            .body("name", [Rule::Required, Rule::NotBlank, Rule::length(1, 10)])
            .body("size", [Rule::integer_range(1, 5)]);
        let show = RouteSchema::new("things.get")
            .path("id", [Rule::Required, Rule::min_integer(1)])
            .query("verbose", [Rule::Boolean]);

        Router::new()
            .route("/things", with_schema(post(echo), create))
            .route("/things/{id}", with_schema(get(content_length), show))
    }

    async fn send(req: axum::http::Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn post_json(body: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/things")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_reaches_handler_unchanged() {
        let raw = r#"{"name":"lamp","size":"3"}"#;
        let response = app().oneshot(post_json(raw)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], raw.as_bytes());
    }

    #[tokio::test]
    async fn test_invalid_body_is_rejected() {
        let (status, body) = send(post_json(r#"{"name":"  ","size":9}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "name");
        assert_eq!(errors[0]["rule"], "not_blank");
        assert_eq!(errors[1]["field"], "size");
        assert_eq!(errors[1]["location"], "body");
    }

    #[tokio::test]
    async fn test_empty_body_reports_required_fields() {
        let (status, body) = send(post_json("")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "name");
        assert_eq!(body["errors"][0]["rule"], "required");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (status, body) = send(post_json("{\"name\":")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["rule"], "json");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let big = format!(r#"{{"name":"{}"}}"#, "x".repeat(MAX_BODY_BYTES));
        let (status, body) = send(post_json(&big)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["status"], 413);
    }

    #[tokio::test]
    async fn test_path_and_query_are_checked() {
        let req = |uri: &str| {
            axum::http::Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        };

        let response = app().oneshot(req("/things/7?verbose=true")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (status, body) = send(req("/things/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["location"], "path");
        assert_eq!(body["errors"][0]["field"], "id");

        let (status, body) = send(req("/things/7?verbose=maybe")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["location"], "query");
    }

    #[tokio::test]
    async fn test_broken_body_is_bad_request() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/things")
            .header("content-type", "application/json")
            .body(Body::new(BrokenBody))
            .unwrap();

        let (status, body) = send(req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Request body could not be read");
    }

    #[tokio::test]
    async fn test_dropped_body_clears_content_length() {
        let req = axum::http::Request::builder()
            .uri("/things/7")
            .header(CONTENT_LENGTH, "4")
            .body(Body::from("junk"))
            .unwrap();

        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"none");
    }
}
