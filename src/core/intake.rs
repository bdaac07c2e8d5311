use crate::config::{LeadConfig, API_KEY_VAR};
use crate::core::response::LeadResponse;
use crate::core::{ConfigProvider, EmailSender, LeadSubmission, OutboundEmail, Receipt};
use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::validate_lead_fields;
use chrono::Utc;
use http::Method;

/// 接收表單、驗證、組信、寄出。每個請求互相獨立，沒有共享的可變狀態
pub struct LeadIntake<E: EmailSender, C: ConfigProvider = LeadConfig> {
    sender: E,
    config: C,
}

impl<E: EmailSender, C: ConfigProvider> LeadIntake<E, C> {
    pub fn new(sender: E, config: C) -> Self {
        Self { sender, config }
    }

    /// 宿主層的入口：記錄請求資訊後交給 `handle`
    pub async fn handle_request<B: AsRef<[u8]>>(
        &self,
        request: http::Request<B>,
    ) -> http::Response<String> {
        let (parts, body) = request.into_parts();
        tracing::info!(method = %parts.method, uri = %parts.uri, "Lead request received");
        tracing::debug!(headers = ?parts.headers, "Request headers");

        self.handle(&parts.method, body.as_ref()).await.into_http()
    }

    pub async fn handle(&self, method: &Method, body: &[u8]) -> LeadResponse {
        if *method == Method::OPTIONS {
            tracing::info!("OPTIONS request handled");
            return LeadResponse::preflight();
        }
        if *method != Method::POST {
            tracing::warn!("Rejected {} request", method);
            return LeadResponse::from_error(&IntakeError::MethodNotAllowed);
        }

        match self.submit(body).await {
            Ok(receipt) => {
                tracing::info!(
                    receipt_id = receipt.id.as_deref().unwrap_or("-"),
                    "Email sent successfully"
                );
                LeadResponse::ok()
            }
            Err(e @ IntakeError::ValidationError { .. }) => {
                tracing::warn!("Validation error: {}", e);
                LeadResponse::from_error(&e)
            }
            Err(e) => {
                tracing::error!(error = ?e, "Lead submission failed: {}", e);
                LeadResponse::from_error(&e)
            }
        }
    }

    /// 驗證 → 取 credential → 組信 → 寄出。任何一步失敗就停
    pub async fn submit(&self, body: &[u8]) -> Result<Receipt> {
        let lead = LeadSubmission::from_body(body, Utc::now());
        tracing::debug!(
            name = %lead.name,
            email = %lead.email,
            lead_type = %lead.lead_type,
            axes = %lead.axes,
            created_at = %lead.created_at,
            "Parsed lead"
        );

        validate_lead_fields(&lead.name, &lead.email, &lead.lead_type)?;

        let credential = self
            .config
            .api_key()
            .ok_or_else(|| IntakeError::MissingCredential {
                name: API_KEY_VAR.to_string(),
            })?;

        let email = OutboundEmail::for_lead(
            &lead,
            self.config.sender(),
            self.config.recipient(),
            self.config.subject_prefix(),
        )?;

        tracing::info!(to = %email.to, "Sending lead notification");
        self.sender.send(credential, &email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use secrecy::{ExposeSecret, SecretString};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockSender {
        sent: Arc<Mutex<Vec<(String, OutboundEmail)>>>,
        fail_with: Option<String>,
    }

    impl MockSender {
        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::default()
            }
        }

        async fn sent(&self) -> Vec<(String, OutboundEmail)> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl EmailSender for MockSender {
        async fn send(&self, credential: &SecretString, email: &OutboundEmail) -> Result<Receipt> {
            self.sent
                .lock()
                .await
                .push((credential.expose_secret().to_string(), email.clone()));
            match &self.fail_with {
                Some(message) => Err(IntakeError::ProviderError {
                    status: 500,
                    message: message.clone(),
                }),
                None => Ok(Receipt {
                    id: Some("email_123".to_string()),
                }),
            }
        }
    }

    fn intake(sender: MockSender) -> LeadIntake<MockSender> {
        LeadIntake::new(sender, LeadConfig::default().with_api_key("re_test"))
    }

    const VALID: &[u8] =
        br#"{"name":"Taro","email":"taro@example.com","type":"analyst","axes":{"logic":3}}"#;

    #[tokio::test]
    async fn test_valid_submission_is_sent_once() {
        let sender = MockSender::default();
        let response = intake(sender.clone()).handle(&Method::POST, VALID).await;

        assert_eq!(response, LeadResponse::ok());
        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        let (credential, email) = &sent[0];
        assert_eq!(credential, "re_test");
        assert_eq!(email.to, crate::config::DEFAULT_RECIPIENT);
        assert_eq!(email.from, crate::config::DEFAULT_SENDER);
        assert_eq!(email.reply_to, "taro@example.com");
        assert_eq!(email.subject, "【診断リード】Taro / taro@example.com / analyst");
        assert!(email.text.contains(r#"axes: {"logic":3}"#));
    }

    #[tokio::test]
    async fn test_validation_stops_before_dispatch() {
        let sender = MockSender::default();
        let intake = intake(sender.clone());

        let cases: [(&[u8], &str); 4] = [
            (br#"{"email":"taro@example.com","type":"a"}"#, "name is required"),
            (br#"{"name":"  ","email":"taro@example.com","type":"a"}"#, "name is required"),
            (br#"{"name":"Taro","email":"taro@example","type":"a"}"#, "email is invalid"),
            (br#"{"name":"Taro","email":"taro@example.com","type":" "}"#, "type is required"),
        ];
        for (body, message) in cases {
            let response = intake.handle(&Method::POST, body).await;
            assert_eq!(response.status, http::StatusCode::BAD_REQUEST);
            assert_eq!(response.error_message(), Some(message));
        }

        assert!(sender.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_is_a_server_error() {
        let sender = MockSender::default();
        let intake = LeadIntake::new(sender.clone(), LeadConfig::default());

        let response = intake.handle(&Method::POST, VALID).await;

        assert_eq!(response.status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error_message(), Some("RESEND_API_KEY is missing"));
        assert!(sender.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_validation_runs_before_credential_check() {
        let intake = LeadIntake::new(MockSender::default(), LeadConfig::default());
        let response = intake.handle(&Method::POST, b"{}").await;
        assert_eq!(response.status, http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sender_failure_is_reported() {
        let sender = MockSender::failing("The gmail.com domain is not verified.");
        let response = intake(sender.clone()).handle(&Method::POST, VALID).await;

        assert_eq!(response.status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.error_message(),
            Some("The gmail.com domain is not verified.")
        );
        assert_eq!(sender.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sender_failure_without_message_uses_fallback() {
        let sender = MockSender::failing("");
        let response = intake(sender).handle(&Method::POST, VALID).await;
        assert_eq!(response.error_message(), Some("Internal Error"));
    }

    #[tokio::test]
    async fn test_options_never_dispatches() {
        let sender = MockSender::default();
        let response = intake(sender.clone()).handle(&Method::OPTIONS, VALID).await;

        assert_eq!(response, LeadResponse::preflight());
        assert!(sender.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_other_methods_are_rejected() {
        let sender = MockSender::default();
        let intake = intake(sender.clone());

        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let response = intake.handle(&method, VALID).await;
            assert_eq!(response.status, http::StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(response.error_message(), Some("Method Not Allowed"));
        }
        assert!(sender.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_submissions_are_not_deduplicated() {
        let sender = MockSender::default();
        let intake = intake(sender.clone());

        intake.handle(&Method::POST, VALID).await;
        intake.handle(&Method::POST, VALID).await;

        assert_eq!(sender.sent().await.len(), 2);
    }

    #[tokio::test]
    async fn test_handle_request_attaches_cors() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/api/lead")
            .body(b"not json".to_vec())
            .unwrap();

        let response = intake(MockSender::default()).handle_request(request).await;

        assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(response.body(), r#"{"error":"name is required"}"#);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
