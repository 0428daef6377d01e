use anyhow::{Context, Result};
use std::time::Duration;

use crate::market::twelvedata::DEFAULT_BASE_URL;

pub const ENV_API_KEY: &str = "TWELVEDATA_API_KEY";
pub const ENV_BASE_URL: &str = "TWELVEDATA_BASE_URL";
pub const ENV_REFRESH_MS: &str = "STOCKSCREEN_REFRESH_MS";
pub const ENV_LOCALE: &str = "STOCKSCREEN_LOCALE";

pub const DEFAULT_REFRESH_MS: u64 = 5000;
pub const DEFAULT_LOCALE: &str = "en";

/// History requested on every selection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesOptions {
    pub interval: String,
    pub outputsize: u32,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            interval: "1day".to_string(),
            outputsize: 30,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub refresh_interval: Duration,
    pub series: SeriesOptions,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("refresh_interval", &self.refresh_interval)
            .field("series", &self.series)
            .finish()
    }
}

impl Config {
    /// Read configuration from the environment (`.env` already loaded)
    pub fn from_env() -> Result<Self> {
        let api_key = non_empty_env(ENV_API_KEY)
            .with_context(|| format!("missing environment variable {ENV_API_KEY}"))?;
        let base_url = non_empty_env(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let refresh_ms = match non_empty_env(ENV_REFRESH_MS) {
            Some(raw) => parse_refresh_ms(&raw)
                .with_context(|| format!("invalid {ENV_REFRESH_MS}: {raw}"))?,
            None => DEFAULT_REFRESH_MS,
        };

        Ok(Self {
            api_key,
            base_url,
            refresh_interval: Duration::from_millis(refresh_ms),
            series: SeriesOptions::default(),
        })
    }
}

/// Refresh interval in milliseconds; must be a positive integer
pub fn parse_refresh_ms(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|ms| *ms > 0)
}

#[must_use]
pub fn locale() -> String {
    non_empty_env(ENV_LOCALE).unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

#[must_use]
pub fn missing_required_env() -> Vec<&'static str> {
    [ENV_API_KEY]
        .into_iter()
        .filter(|key| non_empty_env(key).is_none())
        .collect()
}

/// Display config guide (when config loading fails)
pub fn print_config_guide() {
    eprintln!("配置错误：缺少必需环境变量");
    eprintln!();
    eprintln!("请先配置以下环境变量：");
    eprintln!("  {ENV_API_KEY}=<your_api_key>");
    eprintln!();
    eprintln!("可选：通过 {ENV_BASE_URL} 指定自定义服务地址（默认 {DEFAULT_BASE_URL}）");
    eprintln!("可选：通过 {ENV_REFRESH_MS} 调整报价刷新间隔（毫秒，默认 {DEFAULT_REFRESH_MS}）");
    eprintln!("可选：通过 {ENV_LOCALE} 指定界面语言（如 en / zh-CN）");
    eprintln!("可选：通过 STOCKSCREEN_LOG 调整日志过滤（如 error,stockscreen=info）");
    eprintln!();
    eprintln!("获取 API Key: https://twelvedata.com/apikey");
    eprintln!();
    eprintln!("提示：你可以在项目根目录创建 .env 文件来管理这些变量");
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
