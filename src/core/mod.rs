pub mod intake;
pub mod response;

pub use crate::domain::model::{LeadSubmission, OutboundEmail, Receipt};
pub use crate::domain::ports::{ConfigProvider, EmailSender};
pub use crate::utils::error::Result;
