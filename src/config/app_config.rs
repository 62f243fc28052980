// ==========================================
// B2B 交易平台 - 应用配置 (config.toml)
// ==========================================
// 查找顺序:
// 1. 环境变量 B2B_CONFIG 指定的路径
// 2. 可执行文件同目录下的 config.toml
// 3. 内置默认配置
// ==========================================

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 内置默认配置
const DEFAULT_CONFIG: &str = r#"
[server]
bind = "127.0.0.1:8000"

[database]
path = ""

[auth]
jwt_secret = "change-me"

[import]
auto_create_related = false
error_preview_limit = 10

[currency]
api_url = "https://api.exchangerate.host/latest?base=USD"
cache_ttl_secs = 3600
request_timeout_secs = 10
"#;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub import: ImportSettings,
    #[serde(default)]
    pub currency: CurrencySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseSettings {
    /// 为空时使用用户数据目录
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportSettings {
    #[serde(default)]
    pub auto_create_related: bool,
    #[serde(default = "default_error_preview_limit")]
    pub error_preview_limit: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            auto_create_related: false,
            error_preview_limit: default_error_preview_limit(),
        }
    }
}

fn default_error_preview_limit() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct CurrencySettings {
    pub api_url: String,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.exchangerate.host/latest?base=USD".to_string(),
            cache_ttl_secs: 3600,
            request_timeout_secs: 10,
        }
    }
}

/// 加载配置
pub fn load_config() -> anyhow::Result<AppConfig> {
    if let Ok(path) = std::env::var("B2B_CONFIG") {
        let path = PathBuf::from(path.trim());
        tracing::info!("Loading config from B2B_CONFIG: {}", path.display());
        return parse_config_file(&path);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");
            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                return parse_config_file(&config_path);
            }
            tracing::warn!("config.toml not found at: {}", config_path.display());
        }
    }

    tracing::info!("Using default embedded configuration");
    Ok(toml::from_str(DEFAULT_CONFIG)?)
}

fn parse_config_file(path: &Path) -> anyhow::Result<AppConfig> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

impl AppConfig {
    /// JWT 密钥（环境变量 B2B_JWT_SECRET 优先）
    pub fn jwt_secret(&self) -> String {
        std::env::var("B2B_JWT_SECRET").unwrap_or_else(|_| self.auth.jwt_secret.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(!config.import.auto_create_related);
        assert_eq!(config.import.error_preview_limit, 10);
        assert_eq!(config.currency.cache_ttl_secs, 3600);
        assert_eq!(config.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("[import]\nauto_create_related = true\n").unwrap();
        assert!(config.import.auto_create_related);
        assert_eq!(config.import.error_preview_limit, 10);
        assert_eq!(config.currency.request_timeout_secs, 10);
    }
}
