use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::{validate_route_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 選用的 TOML 設定檔。API key 不放這裡，只從環境變數讀
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub email: Option<EmailSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub listen: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailSection {
    pub to: Option<String>,
    pub from: Option<String>,
    pub subject_prefix: Option<String>,
    pub api_base: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IntakeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| IntakeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LEAD_TO_EMAIL})，找不到就原樣保留
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn email(&self) -> Option<&EmailSection> {
        self.email.as_ref()
    }

    pub fn listen(&self) -> Option<&str> {
        self.server.as_ref()?.listen.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.server.as_ref()?.path.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = self.path() {
            validate_route_path("server.path", path)?;
        }
        if let Some(api_base) = self.email().and_then(|e| e.api_base.as_deref()) {
            crate::utils::validation::validate_url("email.api_base", api_base)?;
        }
        Ok(())
    }
}
