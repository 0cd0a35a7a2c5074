// middleware/response.rs - Success envelope for API handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Success envelope: `{"success": true, "<key>": <payload>}`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub key: &'static str,
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Payload under `data` with 200 OK
    pub fn success(data: T) -> Self {
        Self::keyed("data", data)
    }

    /// Payload under a named key, e.g. `design` or `attachments`
    pub fn keyed(key: &'static str, data: T) -> Self {
        Self {
            key,
            data,
            status_code: None,
        }
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn created(key: &'static str, data: T) -> Self {
        Self::keyed(key, data).with_status(StatusCode::CREATED)
    }
}

impl ApiResponse<Value> {
    /// Envelope with no payload, for deletes and acknowledgements
    pub fn ok() -> Self {
        Self::keyed("", Value::Null)
    }

    /// Envelope with extra top-level fields merged next to `success`
    pub fn with_fields(fields: Value) -> Self {
        Self::keyed("", fields)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data",
                        "code": "INTERNAL_SERVER_ERROR"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = Map::new();
        envelope.insert("success".to_string(), Value::Bool(true));
        match (self.key, data_value) {
            ("", Value::Object(fields)) => {
                for (name, value) in fields {
                    if name != "success" {
                        envelope.insert(name, value);
                    }
                }
            }
            ("", _) => {}
            (key, value) => {
                envelope.insert(key.to_string(), value);
            }
        }

        (status, Json(Value::Object(envelope))).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn keyed_payload_sits_next_to_success() {
        let response = ApiResponse::created("design", json!({"theme_id": "dawn"})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_of(response).await, json!({"success": true, "design": {"theme_id": "dawn"}}));
    }

    #[tokio::test]
    async fn bare_envelopes_merge_fields() {
        assert_eq!(body_of(ApiResponse::ok().into_response()).await, json!({"success": true}));
        let ignored = ApiResponse::with_fields(json!({"ignored": true, "success": false}));
        assert_eq!(body_of(ignored.into_response()).await, json!({"success": true, "ignored": true}));
    }
}
