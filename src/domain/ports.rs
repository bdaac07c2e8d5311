use crate::domain::model::{OutboundEmail, Receipt};
use crate::utils::error::Result;
use async_trait::async_trait;
use secrecy::SecretString;

/// 寄信的外部協作者。正式環境是 Resend，測試時換成記錄用的 stub
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, credential: &SecretString, email: &OutboundEmail) -> Result<Receipt>;
}

#[async_trait]
impl<T: EmailSender + ?Sized> EmailSender for std::sync::Arc<T> {
    async fn send(&self, credential: &SecretString, email: &OutboundEmail) -> Result<Receipt> {
        (**self).send(credential, email).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> Option<&SecretString>;
    fn recipient(&self) -> &str;
    fn sender(&self) -> &str;
    fn subject_prefix(&self) -> &str;
}
