use axum::{
    body::Body,
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Multipart, Query, Request,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::AuthenticatedAdmin;
use crate::shared::types::ErrorResponse;

/// JSON extractor whose rejections use the standard error envelope
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
            JsonRejection::JsonSyntaxError(err) => {
                format!("Invalid JSON syntax: {}", err.body_text())
            }
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            // Body read failures keep their own status (e.g. 413)
            other => return envelope(other.status(), other.body_text()),
        };

        AppError::BadRequest(message).into_response()
    }
}

fn envelope(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse::new(message, None))).into_response()
}

/// Multipart extractor whose rejections use the standard error envelope
pub struct AppMultipart(pub Multipart);

impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(Self)
            .map_err(|rejection: MultipartRejection| {
                envelope(
                    rejection.status(),
                    format!("Invalid multipart request: {}", rejection.body_text()),
                )
            })
    }
}

/// Query string extractor whose rejections use the standard error envelope
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection: QueryRejection| {
                envelope(rejection.status(), rejection.body_text())
            })
    }
}

impl<S> FromRequestParts<S> for AuthenticatedAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAdmin>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Payload {
        name: String,
    }

    #[derive(Deserialize)]
    struct Filter {
        page: Option<u32>,
    }

    async fn count_parts(AppMultipart(mut multipart): AppMultipart) -> String {
        let mut count = 0;
        while let Ok(Some(_)) = multipart.next_field().await {
            count += 1;
        }
        count.to_string()
    }

    fn server() -> TestServer {
        let router = Router::new()
            .route(
                "/echo",
                post(|AppJson(payload): AppJson<Payload>| async move { payload.name }),
            )
            .route("/upload", post(count_parts))
            .route(
                "/search",
                axum::routing::get(|AppQuery(filter): AppQuery<Filter>| async move {
                    filter.page.unwrap_or(1).to_string()
                }),
            )
            .route(
                "/whoami",
                post(|admin: AuthenticatedAdmin| async move { admin.sub }),
            );
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_valid_json_reaches_the_handler() {
        let response = server().post("/echo").json(&json!({"name": "x"})).await;
        response.assert_status_ok();
        response.assert_text("x");
    }

    #[tokio::test]
    async fn test_malformed_json_uses_the_error_envelope() {
        let response = server()
            .post("/echo")
            .text("{not json")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON syntax"));
    }

    #[tokio::test]
    async fn test_wrong_shape_and_missing_content_type_are_bad_requests() {
        let server = server();
        server
            .post("/echo")
            .json(&json!({"name": 5}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/echo")
            .text("{\"name\":\"x\"}")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_extractor_requires_authenticated_request() {
        server()
            .post("/whoami")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_multipart_body_uses_the_error_envelope() {
        let response = server().post("/upload").json(&json!({"name": "x"})).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid multipart request"));
    }

    #[tokio::test]
    async fn test_multipart_body_reaches_the_handler() {
        let form = axum_test::multipart::MultipartForm::new()
            .add_text("a", "1")
            .add_text("b", "2");

        let response = server().post("/upload").multipart(form).await;
        response.assert_status_ok();
        response.assert_text("2");
    }

    #[tokio::test]
    async fn test_bad_query_uses_the_error_envelope() {
        let server = server();
        server.get("/search?page=3").await.assert_text("3");

        let response = server.get("/search?page=many").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }
}
