use crate::config::RelayConfig;
use crate::utils::error::{RelayError, Result};
use regex::Regex;
use std::path::Path;

impl RelayConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// 替換環境變數 (例如 ${REFRESH_TOKEN})，未定義的保留原樣
fn substitute_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([^}]+)\}").expect("valid substitution pattern");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}
