#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use secrecy::SecretString;
use std::time::Duration;
use toml_config::EmailSection;

pub const API_KEY_VAR: &str = "RESEND_API_KEY";
pub const DEFAULT_RECIPIENT: &str = "delivered@resend.dev";
pub const DEFAULT_SENDER: &str = "Shukatsu診断 <onboarding@resend.dev>";
pub const DEFAULT_SUBJECT_PREFIX: &str = "【診断リード】";
pub const DEFAULT_API_BASE: &str = "https://api.resend.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 啟動時讀一次，之後注入 handler
#[derive(Debug)]
pub struct LeadConfig {
    pub api_key: Option<SecretString>,
    pub recipient: String,
    pub sender: String,
    pub subject_prefix: String,
    pub api_base: String,
    pub timeout_seconds: u64,
}

impl Default for LeadConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            recipient: DEFAULT_RECIPIENT.to_string(),
            sender: DEFAULT_SENDER.to_string(),
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LeadConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_sources(None, |key| std::env::var(key).ok())
    }

    /// 優先順序：環境變數 > TOML 檔 > 預設值。空字串等同沒設定
    pub fn from_sources<F>(file: Option<&EmailSection>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let from_file = |pick: fn(&EmailSection) -> Option<&String>| {
            file.and_then(pick).filter(|v| !v.trim().is_empty()).cloned()
        };

        let timeout_seconds = match env("RESEND_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                IntakeError::InvalidConfigValueError {
                    field: "RESEND_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                    reason: "Expected a whole number of seconds".to_string(),
                }
            })?,
            None => file
                .and_then(|f| f.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key: env(API_KEY_VAR).map(SecretString::from),
            recipient: env("LEAD_TO_EMAIL")
                .or_else(|| from_file(|f| f.to.as_ref()))
                .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string()),
            sender: env("LEAD_FROM_EMAIL")
                .or_else(|| from_file(|f| f.from.as_ref()))
                .unwrap_or_else(|| DEFAULT_SENDER.to_string()),
            // prefix 常以空白結尾，不做 trim
            subject_prefix: lookup("LEAD_SUBJECT_PREFIX")
                .filter(|v| !v.is_empty())
                .or_else(|| file.and_then(|f| f.subject_prefix.clone()))
                .unwrap_or_else(|| DEFAULT_SUBJECT_PREFIX.to_string()),
            api_base: env("RESEND_API_BASE")
                .or_else(|| from_file(|f| f.api_base.as_ref()))
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout_seconds,
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl ConfigProvider for LeadConfig {
    fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    fn recipient(&self) -> &str {
        &self.recipient
    }

    fn sender(&self) -> &str {
        &self.sender
    }

    fn subject_prefix(&self) -> &str {
        &self.subject_prefix
    }
}

impl Validate for LeadConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base", &self.api_base)?;
        validate_non_empty_string("recipient", &self.recipient)?;
        validate_non_empty_string("sender", &self.sender)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 120)?;

        tracing::debug!("Lead configuration validation passed");
        Ok(())
    }
}
