use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ValuationError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuerConfig {
    pub service: ServiceConfig,
    pub market: MarketConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub temperature: f32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub region: String,
    pub currency: String,
    pub auction_houses: Vec<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            region: "South Africa".to_string(),
            currency: "ZAR".to_string(),
            auction_houses: vec![
                "Strauss & Co".to_string(),
                "Stephan Welz".to_string(),
                "Aspire".to_string(),
            ],
        }
    }
}

impl ValuerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: ValuerConfig = toml::from_str(&processed_content)
            .map_err(|e| ValuationError::config("toml_parsing", format!("TOML parsing error: {}", e)))?;
        config.apply_env_fallbacks();
        Ok(config)
    }

    /// 全部使用預設值，API key 取自環境變數
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_fallbacks();
        config
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ValuationError::config("toml_parsing", e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn apply_env_fallbacks(&mut self) {
        let unresolved = match self.service.api_key.as_deref() {
            None => true,
            Some(key) => key.trim().is_empty() || key.starts_with("${"),
        };
        if unresolved {
            self.service.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("service.api_key", self.api_key())?;
        validation::validate_url("service.api_base_url", &self.service.api_base_url)?;
        validation::validate_non_empty_string("service.model", &self.service.model)?;
        validation::validate_range(
            "service.request_timeout_secs",
            self.service.request_timeout_secs,
            1,
            600,
        )?;
        validation::validate_range("service.temperature", self.service.temperature, 0.0, 2.0)?;
        validation::validate_non_empty_string("market.region", &self.market.region)?;
        validation::validate_currency_code("market.currency", &self.market.currency)?;
        Ok(())
    }
}

impl ConfigProvider for ValuerConfig {
    fn api_base_url(&self) -> &str {
        self.service.api_base_url.trim_end_matches('/')
    }

    fn api_key(&self) -> &str {
        self.service.api_key.as_deref().unwrap_or("")
    }

    fn model(&self) -> &str {
        &self.service.model
    }

    fn request_timeout_secs(&self) -> u64 {
        self.service.request_timeout_secs
    }

    fn temperature(&self) -> f32 {
        self.service.temperature
    }

    fn market_region(&self) -> &str {
        &self.market.region
    }

    fn currency(&self) -> &str {
        &self.market.currency
    }

    fn auction_houses(&self) -> &[String] {
        &self.market.auction_houses
    }
}

impl Validate for ValuerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
