use anyhow::bail;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug,sqlx=warn";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            loki_enabled: lookup("LOKI_ENABLED")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(false),
            loki_url: lookup("LOKI_URL").filter(|v| !v.trim().is_empty()),
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| "observatoire".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.loki_enabled && self.loki_url.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }
        Ok(())
    }
}

pub fn init_logging(config: LoggingConfig) -> anyhow::Result<()> {
    if let Err(msg) = config.validate() {
        bail!(msg);
    }

    #[cfg(feature = "loki")]
    {
        if config.loki_enabled {
            if let Some(loki_url) = config.loki_url.clone() {
                return init_with_loki(config, &loki_url);
            }
        }
    }

    init_console_only(config)
}

fn init_console_only(config: LoggingConfig) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!("📊 Console logging initialized ({})", config.environment);
    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: LoggingConfig, loki_url: &str) -> anyhow::Result<()> {
    let url = url::Url::parse(loki_url)?;

    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url)?;

    // Ships buffered events to Loki for the lifetime of the process.
    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()?;

    tracing::info!("✅ Loki logging initialized at {}", loki_url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = LoggingConfig::from_lookup(|_| None);
        assert!(!config.loki_enabled);
        assert_eq!(config.loki_url, None);
        assert_eq!(config.service_name, "observatoire");
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_level, DEFAULT_LOG_FILTER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loki_settings_are_read() {
        let config = LoggingConfig::from_lookup(|key| match key {
            "LOKI_ENABLED" => Some("true".into()),
            "LOKI_URL" => Some("http://loki:3100".into()),
            "RUST_LOG" => Some("debug".into()),
            _ => None,
        });
        assert!(config.loki_enabled);
        assert_eq!(config.loki_url.as_deref(), Some("http://loki:3100"));
        assert_eq!(config.log_level, "debug");

        // A garbled flag stays off; an empty URL counts as unset.
        let config = LoggingConfig::from_lookup(|key| match key {
            "LOKI_ENABLED" => Some("yes please".into()),
            "LOKI_URL" => Some("  ".into()),
            _ => None,
        });
        assert!(!config.loki_enabled);
        assert_eq!(config.loki_url, None);
    }

    #[test]
    fn loki_requires_url() {
        let config = LoggingConfig {
            loki_enabled: true,
            loki_url: None,
            service_name: "observatoire".into(),
            environment: "test".into(),
            log_level: "info".into(),
        };
        assert!(config.validate().is_err());

        let config = LoggingConfig {
            loki_url: Some("http://localhost:3100".into()),
            ..config
        };
        assert!(config.validate().is_ok());
    }
}
