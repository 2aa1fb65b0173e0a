//! Request extractors whose rejections render as [`AppError::Validation`].
//!
//! axum's own `Json` and `Path` reject with plain-text 415/422 responses.
//! Handlers use these wrappers so a malformed request gets the same
//! `{error, message}` body as every other client error.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;

/// JSON body extractor and response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Path parameter extractor.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Item {
        id: i64,
    }

    async fn extract(
        body: &'static str,
        content_type: Option<&str>,
    ) -> Result<Json<Item>, AppError> {
        let mut req = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            req = req.header(header::CONTENT_TYPE, ct);
        }
        let req = req.body(Body::from(body)).unwrap();
        Json::<Item>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let Json(item) = extract(r#"{"id":7}"#, Some("application/json"))
            .await
            .unwrap();
        assert_eq!(item.id, 7);
    }

    #[tokio::test]
    async fn malformed_bodies_become_validation_errors() {
        let cases = [
            (r#"{"id":"seven"}"#, Some("application/json")),
            (r#"{"nope":1}"#, Some("application/json")),
            ("{", Some("application/json")),
            (r#"{"id":7}"#, None),
        ];
        for (body, content_type) in cases {
            let err = extract(body, content_type).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{body}: {err:?}");
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }
}
