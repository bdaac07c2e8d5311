use crate::config::LeadConfig;
use crate::core::{EmailSender, OutboundEmail, Receipt};
use crate::utils::error::{IntakeError, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resend `POST /emails` 的 request body
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    reply_to: &'a str,
}

impl<'a> From<&'a OutboundEmail> for SendEmailRequest<'a> {
    fn from(email: &'a OutboundEmail) -> Self {
        Self {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            text: &email.text,
            reply_to: &email.reply_to,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResendClient {
    client: Client,
    api_base: String,
}

impl ResendClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &LeadConfig) -> Result<Self> {
        Self::new(&config.api_base, config.timeout())
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.api_base)
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, credential: &SecretString, email: &OutboundEmail) -> Result<Receipt> {
        tracing::debug!("Making API request to: {}", self.endpoint());
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(credential.expose_secret())
            .json(&SendEmailRequest::from(email))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status.is_success() {
            let text = response.text().await?;
            // 成功但 body 不是預期格式時，不影響結果，只是拿不到 id
            let receipt = serde_json::from_str::<Receipt>(&text).unwrap_or_else(|e| {
                tracing::warn!("Unexpected success body from Resend: {}", e);
                Receipt::default()
            });
            return Ok(receipt);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
            .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Internal Error")
                    .to_string()
            });

        Err(IntakeError::ProviderError {
            status: status.as_u16(),
            message,
        })
    }
}
