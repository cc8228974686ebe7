use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use storage::services::PaymentEnforcement;

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub payment_enforcement: PaymentEnforcement,
    pub currency: String,
    pub razorpay: Option<RazorpayConfig>,
    pub smtp: Option<SmtpConfig>,
    pub notify_timeout: Duration,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            jwt_secret: std::env::var("JWT_SECRET").context("Cannot load JWT_SECRET env variable")?,
            payment_enforcement: match optional("PAYMENT_ENFORCEMENT") {
                Some(mode) => mode.parse().map_err(|e: String| anyhow!(e))?,
                None => PaymentEnforcement::default(),
            },
            currency: optional("PAYMENT_CURRENCY").unwrap_or_else(|| "INR".to_string()),
            razorpay: razorpay_from_env(),
            smtp: smtp_from_env()?,
            notify_timeout: seconds("NOTIFY_TIMEOUT_SECS", 10)?,
            upstream_timeout: seconds("UPSTREAM_TIMEOUT_SECS", 15)?,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn seconds(key: &str, default: u64) -> Result<Duration> {
    let secs = match optional(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a whole number of seconds"))?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}

fn razorpay_from_env() -> Option<RazorpayConfig> {
    Some(RazorpayConfig {
        key_id: optional("RAZORPAY_KEY_ID")?,
        key_secret: optional("RAZORPAY_KEY_SECRET")?,
        api_base: optional("RAZORPAY_API_BASE")
            .unwrap_or_else(|| "https://api.razorpay.com/v1".to_string()),
    })
}

fn smtp_from_env() -> Result<Option<SmtpConfig>> {
    let Some(host) = optional("SMTP_HOST") else {
        return Ok(None);
    };

    Ok(Some(SmtpConfig {
        host,
        port: match optional("SMTP_PORT") {
            Some(port) => port.parse().context("SMTP_PORT must be a number")?,
            None => 587,
        },
        username: optional("SMTP_USERNAME").context("SMTP_USERNAME is required with SMTP_HOST")?,
        password: optional("SMTP_PASSWORD").context("SMTP_PASSWORD is required with SMTP_HOST")?,
        from: optional("SMTP_FROM").context("SMTP_FROM is required with SMTP_HOST")?,
    }))
}
