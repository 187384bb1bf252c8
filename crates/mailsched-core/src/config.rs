use std::collections::HashMap;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{MailschedError, Result};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_CLEANUP_HOUR: u8 = 1;
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FROM: &str = "Mail Scheduler <noreply@localhost>";

/// Top-level config (mailsched.toml + MAILSCHED_* env overrides).
///
/// Nested keys are addressed with a double underscore in the environment,
/// e.g. `MAILSCHED_SCHEDULER__POLL_INTERVAL_SECS=10`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailschedConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub mail: MailConfig,
    /// Display-label overrides, keyed like `recurrence.Daily` or `weekDay.Monday`.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// IANA zone applied to rows without a timezone. Falls back to the host zone.
    pub timezone: Option<String>,
    /// How often the dispatcher looks for due triggers.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Local hour at which the daily orphan sweep runs.
    #[serde(default = "default_cleanup_hour")]
    pub cleanup_hour: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            cleanup_hour: DEFAULT_CLEANUP_HOUR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// RFC 5322 sender, e.g. `"Reports <reports@example.com>"`.
    #[serde(default = "default_from")]
    pub from: String,
    /// When absent, messages go to the local outbox table instead of SMTP.
    pub smtp: Option<SmtpConfig>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: default_from(),
            smtp: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Use implicit TLS (port 465 style) instead of STARTTLS.
    #[serde(default)]
    pub implicit_tls: bool,
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.mailsched/mailsched.db", home)
}
fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
fn default_cleanup_hour() -> u8 {
    DEFAULT_CLEANUP_HOUR
}
fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}
fn default_from() -> String {
    DEFAULT_FROM.to_string()
}

impl MailschedConfig {
    /// Load config from a TOML file with MAILSCHED_* env var overrides.
    ///
    /// Uses the explicit path when given, otherwise ~/.mailsched/mailsched.toml.
    /// A missing file is not an error: every section has defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(&path))
                .merge(Env::prefixed("MAILSCHED_").split("__")),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: MailschedConfig = figment
            .extract()
            .map_err(|e| MailschedError::Config(e.to_string()))?;

        if config.scheduler.cleanup_hour > 23 {
            return Err(MailschedError::Config(format!(
                "scheduler.cleanup_hour must be 0-23, got {}",
                config.scheduler.cleanup_hour
            )));
        }
        if config.scheduler.poll_interval_secs == 0 {
            return Err(MailschedError::Config(
                "scheduler.poll_interval_secs must be positive".to_string(),
            ));
        }
        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.mailsched/mailsched.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<MailschedConfig> {
        MailschedConfig::from_figment(Figment::new().merge(Toml::string(toml)))
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse("").expect("defaults");
        assert_eq!(config.scheduler.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
        assert_eq!(config.scheduler.cleanup_hour, DEFAULT_CLEANUP_HOUR);
        assert!(config.scheduler.timezone.is_none());
        assert!(config.mail.smtp.is_none());
        assert_eq!(config.mail.from, DEFAULT_FROM);
    }

    #[test]
    fn smtp_section_and_labels_are_read() {
        let config = parse(
            r#"
            [scheduler]
            timezone = "Europe/Berlin"

            [mail]
            from = "Ops <ops@example.com>"

            [mail.smtp]
            host = "smtp.example.com"
            username = "ops"
            password = "secret"

            [labels]
            "recurrence.Daily" = "Täglich"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.scheduler.timezone.as_deref(), Some("Europe/Berlin"));
        let smtp = config.mail.smtp.expect("smtp section");
        assert_eq!(smtp.port, DEFAULT_SMTP_PORT);
        assert!(!smtp.implicit_tls);
        assert_eq!(config.labels.get("recurrence.Daily").map(String::as_str), Some("Täglich"));
    }

    #[test]
    fn out_of_range_cleanup_hour_is_rejected() {
        let err = parse("[scheduler]\ncleanup_hour = 24").unwrap_err();
        assert!(matches!(err, MailschedError::Config(_)));
    }
}
