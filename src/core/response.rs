use crate::utils::error::IntakeError;
use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use http::{HeaderMap, StatusCode};
use serde_json::{json, Value};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// handler 的回應，和宿主（axum / Lambda）無關
#[derive(Debug, Clone, PartialEq)]
pub struct LeadResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl LeadResponse {
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(json!({ "ok": true })),
        }
    }

    /// CORS preflight：200、空 body
    pub fn preflight() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }

    pub fn from_error(error: &IntakeError) -> Self {
        Self {
            status: error.status_code(),
            body: Some(json!({ "error": error.client_message() })),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.body.as_ref()?.get("error")?.as_str()
    }

    pub fn into_http(self) -> http::Response<String> {
        let body = self.body.as_ref().map(Value::to_string).unwrap_or_default();
        let mut response = http::Response::new(body);
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        apply_cors(headers);
        if self.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        response
    }
}

/// 每個回應（包含錯誤與 preflight）都要帶這三個標頭
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cors(response: &http::Response<String>) {
        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[test]
    fn test_ok_response() {
        let response = LeadResponse::ok().into_http();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), r#"{"ok":true}"#);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_cors(&response);
    }

    #[test]
    fn test_preflight_has_empty_body() {
        let response = LeadResponse::preflight().into_http();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
        assert!(response.headers().get(CONTENT_TYPE).is_none());
        assert_cors(&response);
    }

    #[test]
    fn test_error_response() {
        let response =
            LeadResponse::from_error(&IntakeError::validation("email", "email is invalid"));
        assert_eq!(response.error_message(), Some("email is invalid"));

        let response = response.into_http();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body(), r#"{"error":"email is invalid"}"#);
        assert_cors(&response);
    }
}
