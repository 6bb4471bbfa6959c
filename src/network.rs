//! Telegram delivery with a chunked fallback for oversized digests.

use crate::consts::limits;
use futures::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::requests::Request;
use teloxide::types::Recipient;
use teloxide::RequestError;
use thiserror::Error;
use tokio::time::{sleep, timeout};

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Telegram: {0}")]
    Telegram(#[from] RequestError),
    #[error("HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("rejected ({status}): {detail}")]
    Rejected { status: String, detail: String },
}

impl DeliveryError {
    /// Short machine-readable failure class
    pub fn status(&self) -> &str {
        match self {
            DeliveryError::Telegram(RequestError::Api(_)) => "api",
            DeliveryError::Telegram(RequestError::RetryAfter(_)) => "rate_limited",
            DeliveryError::Telegram(RequestError::Network(_)) => "network",
            DeliveryError::Telegram(_) => "transport",
            DeliveryError::Client(_) => "client",
            DeliveryError::Timeout(_) => "timeout",
            DeliveryError::Rejected { status, .. } => status.as_str(),
        }
    }
}

/// Anything that can post a text body to the configured destination
pub trait Messenger: Send + Sync {
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), DeliveryError>>;
}

/// Plain-text `sendMessage` through the Bot API
pub struct TelegramMessenger {
    bot: Bot,
    destination: Recipient,
    request_timeout: Duration,
}

impl TelegramMessenger {
    pub fn new(token: &str, destination: &str, request_timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(request_timeout)
            .build()?;

        Ok(Self {
            bot: Bot::with_client(token, client),
            destination: parse_destination(destination),
            request_timeout,
        })
    }
}

/// Numeric ids go to `ChatId`, everything else is treated as `@channel`
pub fn parse_destination(destination: &str) -> Recipient {
    let destination = destination.trim();
    match destination.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(destination.to_string()),
    }
}

impl Messenger for TelegramMessenger {
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), DeliveryError>> {
        Box::pin(async move {
            let request = self
                .bot
                .send_message(self.destination.clone(), text)
                .disable_web_page_preview(true);

            match timeout(self.request_timeout, request.send()).await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(e.into()),
                Err(_) => Err(DeliveryError::Timeout(self.request_timeout)),
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Longer texts go straight to chunking
    pub preemptive_split_chars: usize,
    pub chunk_chars: usize,
    pub chunk_delay: Duration,
    /// Extra attempts per chunk
    pub chunk_retries: u32,
    pub retry_delay: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            preemptive_split_chars: limits::PREEMPTIVE_SPLIT_CHARS,
            chunk_chars: limits::CHUNK_CHARS,
            chunk_delay: Duration::from_millis(limits::CHUNK_DELAY_MS),
            chunk_retries: limits::CHUNK_RETRIES,
            retry_delay: Duration::from_millis(limits::RETRY_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub parts: usize,
    pub sent: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.sent > 0
    }
}

/// Send `text` as one message, or as `Part i/N` chunks when it is too long
/// or the single send fails. A failed chunk does not stop the rest.
pub async fn deliver<M>(messenger: &M, text: &str, config: &DeliveryConfig) -> DeliveryReport
where
    M: Messenger + ?Sized,
{
    let length = text.chars().count();
    if length <= config.preemptive_split_chars {
        match messenger.send(text).await {
            Ok(()) => {
                log::info!("Digest delivered in one message ({} chars)", length);
                return DeliveryReport { parts: 1, sent: 1, failed: 0 };
            }
            Err(e) => {
                log::warn!("Single send failed [{}]: {}; splitting into chunks", e.status(), e)
            }
        }
    } else {
        log::info!("Digest is {} chars, splitting into chunks", length);
    }

    let chunks = split_chunks(text, config.chunk_chars);
    let total = chunks.len();
    let mut report = DeliveryReport { parts: total, ..DeliveryReport::default() };

    for (i, chunk) in chunks.iter().enumerate() {
        if i > 0 {
            sleep(config.chunk_delay).await;
        }
        let body = format!("Part {}/{}\n\n{}", i + 1, total, chunk);
        match send_with_retry(messenger, &body, config).await {
            Ok(()) => {
                report.sent += 1;
                log::info!("Chunk {}/{} sent", i + 1, total);
            }
            Err(e) => {
                report.failed += 1;
                log::error!("Chunk {}/{} failed [{}]: {}", i + 1, total, e.status(), e);
            }
        }
    }

    report
}

async fn send_with_retry<M>(messenger: &M, body: &str, config: &DeliveryConfig) -> Result<(), DeliveryError>
where
    M: Messenger + ?Sized,
{
    let mut attempt = 0;
    loop {
        match messenger.send(body).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < config.chunk_retries => {
                attempt += 1;
                log::warn!("Retrying chunk ({}/{}) after [{}]: {}", attempt, config.chunk_retries, e.status(), e);
                sleep(config.retry_delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Pack blank-line separated blocks into chunks of at most `max_chars`.
/// A block is never cut; one longer than the limit becomes its own chunk.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for block in text.split("\n\n") {
        let block = block.trim_matches('\n');
        if block.trim().is_empty() {
            continue;
        }
        let block_len = block.chars().count();

        if current_len > 0 && current_len + 2 + block_len > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push_str("\n\n");
            current_len += 2;
        }
        current.push_str(block);
        current_len += block_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
