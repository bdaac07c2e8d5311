use crate::config::toml_config::TomlConfig;
use crate::config::LeadConfig;
use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::{validate_route_path, Validate};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_PATH: &str = "/api/lead";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, Parser)]
#[command(name = "lead-intake")]
#[command(about = "Receives assessment lead submissions and forwards them by email")]
pub struct CliConfig {
    /// Address to bind, e.g. 0.0.0.0:8080 (default 127.0.0.1:3000)
    #[arg(long)]
    pub listen: Option<String>,

    /// Route that accepts POST/OPTIONS submissions (default /api/lead)
    #[arg(long)]
    pub path: Option<String>,

    /// Optional TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// CLI 旗標 > 設定檔 > 預設值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub listen: String,
    pub path: String,
}

impl ServerSettings {
    pub fn resolve(cli: &CliConfig, file: Option<&TomlConfig>) -> Self {
        let listen = cli
            .listen
            .clone()
            .or_else(|| file.and_then(TomlConfig::listen).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let path = cli
            .path
            .clone()
            .or_else(|| file.and_then(TomlConfig::path).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        Self { listen, path }
    }
}

impl Validate for ServerSettings {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("listen", &self.listen)?;
        validate_route_path("path", &self.path)?;
        if self.path == HEALTH_PATH {
            return Err(IntakeError::InvalidConfigValueError {
                field: "path".to_string(),
                value: self.path.clone(),
                reason: format!("{} is reserved for the health check", HEALTH_PATH),
            });
        }
        Ok(())
    }
}

impl CliConfig {
    /// 讀設定檔（如果有），組出 server 與寄信設定
    pub fn load(&self) -> Result<(ServerSettings, LeadConfig)> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config file: {}", path.display());
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };

        let server = ServerSettings::resolve(self, file.as_ref());
        server.validate()?;

        let lead = LeadConfig::from_sources(file.as_ref().and_then(TomlConfig::email), |key| {
            std::env::var(key).ok()
        })?;
        lead.validate()?;

        Ok((server, lead))
    }
}
