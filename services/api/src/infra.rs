use chrono::NaiveDate;
use clan_sync::config::DeliveryConfig;
use clan_sync::workflows::roster::{DeliveryError, DeliverySink, DisabledSink, DiscordWebhook};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Webhook when one is configured, otherwise reports are computed but not posted.
#[derive(Debug)]
pub(crate) enum ConfiguredSink {
    Webhook(DiscordWebhook),
    Disabled(DisabledSink),
}

impl ConfiguredSink {
    /// Builds a blocking HTTP client; call from a blocking context.
    pub(crate) fn from_config(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        match config.webhook_url.as_deref() {
            Some(url) => Ok(Self::Webhook(DiscordWebhook::new(url, WEBHOOK_TIMEOUT)?)),
            None => Ok(Self::Disabled(DisabledSink)),
        }
    }
}

impl DeliverySink for ConfiguredSink {
    fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        match self {
            ConfiguredSink::Webhook(webhook) => webhook.deliver(text),
            ConfiguredSink::Disabled(disabled) => disabled.deliver(text),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_webhook_disables_delivery() {
        let sink = ConfiguredSink::from_config(&DeliveryConfig {
            webhook_url: None,
            max_chunk_len: 1500,
        })
        .expect("sink builds");
        assert!(matches!(sink, ConfiguredSink::Disabled(_)));
        assert!(sink.deliver("hello").is_ok());
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert!(parse_date("2025-10-19").is_ok());
        let err = parse_date("19/10/2025").expect_err("rejected");
        assert!(err.contains("19/10/2025"));
    }
}
