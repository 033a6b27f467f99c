//! API configuration

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use core_kernel::Rate;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,
    /// Catalog JSON file
    pub catalog_path: PathBuf,
    /// Simulated pricing delay
    pub quote_latency_ms: u64,
    /// Simulated OTP verification delay
    pub otp_latency_ms: u64,
    /// Code the simulated OTP gateway accepts
    pub otp_code: String,
    /// Tax applied to the premium subtotal, in percent
    pub tax_rate_percent: Decimal,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            catalog_path: PathBuf::from("config/catalog.json"),
            quote_latency_ms: 500,
            otp_latency_ms: 1000,
            otp_code: domain_purchase::DEFAULT_OTP_CODE.to_string(),
            tax_rate_percent: domain_pricing::DEFAULT_TAX_PERCENT,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `PURCHASE_`-prefixed environment variables
    ///
    /// Unset variables keep their default.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port)?
            .set_default("log_level", defaults.log_level)?
            .set_default("catalog_path", defaults.catalog_path.display().to_string())?
            .set_default("quote_latency_ms", defaults.quote_latency_ms)?
            .set_default("otp_latency_ms", defaults.otp_latency_ms)?
            .set_default("otp_code", defaults.otp_code)?
            .set_default("tax_rate_percent", defaults.tax_rate_percent.to_string())?
            .add_source(config::Environment::with_prefix("PURCHASE"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn quote_latency(&self) -> Duration {
        Duration::from_millis(self.quote_latency_ms)
    }

    pub fn otp_latency(&self) -> Duration {
        Duration::from_millis(self.otp_latency_ms)
    }

    pub fn tax_rate(&self) -> Rate {
        Rate::from_percentage(self.tax_rate_percent)
    }
}
