pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, ServerSettings};

pub use adapters::resend::ResendClient;
pub use config::LeadConfig;
pub use crate::core::{intake::LeadIntake, response::LeadResponse};
pub use utils::error::{IntakeError, Result};
