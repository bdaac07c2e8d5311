use crate::utils::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 一筆從診斷表單送進來的 lead，只活在單次請求裡
#[derive(Debug, Clone, PartialEq)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub lead_type: String,
    pub axes: Value,
    pub created_at: String,
    /// 解析後的完整 body，包含未知欄位
    pub raw: Map<String, Value>,
}

impl LeadSubmission {
    /// 盡量解析 body：不是 JSON 或不是物件時一律當作 `{}`
    pub fn from_body(body: &[u8], now: DateTime<Utc>) -> Self {
        Self::from_fields(parse_body(body), now)
    }

    pub fn from_fields(raw: Map<String, Value>, now: DateTime<Utc>) -> Self {
        let created_at = match string_field(&raw, "createdAt") {
            value if value.is_empty() => now.to_rfc3339_opts(SecondsFormat::Millis, true),
            value => value,
        };

        let axes = match raw.get("axes") {
            Some(value) if is_truthy(value) => value.clone(),
            _ => Value::Object(Map::new()),
        };

        Self {
            name: string_field(&raw, "name"),
            email: string_field(&raw, "email"),
            lead_type: string_field(&raw, "type"),
            axes,
            created_at,
            raw,
        }
    }
}

pub fn parse_body(body: &[u8]) -> Map<String, Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        tracing::debug!("Request body is empty, using {{}}");
        return Map::new();
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            tracing::warn!("Request body is not a JSON object, using {{}}: {}", other);
            Map::new()
        }
        Err(e) => {
            tracing::warn!("Failed to parse request body: {}", e);
            Map::new()
        }
    }
}

// 非字串（數字、null、物件…）一律視為空字串
fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 要寄出去的通知信
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub reply_to: String,
}

impl OutboundEmail {
    pub fn for_lead(
        lead: &LeadSubmission,
        from: &str,
        to: &str,
        subject_prefix: &str,
    ) -> Result<Self> {
        let subject = format!(
            "{}{} / {} / {}",
            subject_prefix, lead.name, lead.email, lead.lead_type
        );

        let text = [
            format!("createdAt: {}", lead.created_at),
            format!("name: {}", lead.name),
            format!("email: {}", lead.email),
            format!("type: {}", lead.lead_type),
            format!("axes: {}", serde_json::to_string(&lead.axes)?),
            String::new(),
            "raw:".to_string(),
            serde_json::to_string(&lead.raw)?,
        ]
        .join("\n");

        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            subject,
            text,
            reply_to: lead.email.clone(),
        })
    }
}

/// 寄信服務回傳的結果
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Receipt {
    #[serde(default)]
    pub id: Option<String>,
}
