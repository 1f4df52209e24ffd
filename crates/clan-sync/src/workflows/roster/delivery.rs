use std::fmt::Debug;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::json;
use tracing::{debug, info, warn};

/// Outbound hook for rendered report blocks (Discord webhook in production).
pub trait DeliverySink: Send + Sync + Debug {
    fn deliver(&self, text: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook rejected message with status {status}")]
    Status { status: reqwest::StatusCode },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

/// Posts blocks one at a time. A failed block is logged and the next one is
/// still attempted; nothing is returned as an error.
pub fn deliver_all<S, B>(sink: &S, blocks: &[B]) -> Vec<DeliveryOutcome>
where
    S: DeliverySink + ?Sized,
    B: AsRef<str>,
{
    let outcomes: Vec<DeliveryOutcome> = blocks
        .iter()
        .enumerate()
        .map(|(index, block)| match sink.deliver(block.as_ref()) {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(err) => {
                warn!(block = index, error = %err, "report block was not delivered");
                DeliveryOutcome::Failed(err.to_string())
            }
        })
        .collect();

    let delivered = outcomes.iter().filter(|o| o.is_delivered()).count();
    info!(delivered, total = outcomes.len(), "report delivery finished");
    outcomes
}

/// Discord-compatible webhook: `POST {"content": text}`.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    client: Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl DeliverySink for DiscordWebhook {
    fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "content": text }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status { status });
        }
        Ok(())
    }
}

/// Stand-in when no webhook is configured; reports are computed but not posted.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSink;

impl DeliverySink for DisabledSink {
    fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        debug!(chars = text.chars().count(), "webhook not configured; dropping block");
        Ok(())
    }
}
