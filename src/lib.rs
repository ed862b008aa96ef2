pub mod chat;
pub mod core;
pub mod exchange;
pub mod providers;
pub mod server;

use crate::chat::ChatContext;
use crate::core::config::AppConfig;
use crate::core::{FileJournal, RateCache};
use crate::exchange::RateAggregator;
use crate::providers::{PrivatBankProvider, RetryPolicy};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Wires the rate pipeline, journal and client registry from `config`.
pub fn build_context(config: &AppConfig) -> Result<Arc<ChatContext>> {
    let privatbank = &config.providers.privatbank;
    let provider = PrivatBankProvider::new(
        &privatbank.base_url,
        RetryPolicy::new(privatbank.retries, Duration::from_millis(300)),
        RateCache::new(),
    )?;

    Ok(Arc::new(ChatContext::new(
        RateAggregator::new(Arc::new(provider)),
        Arc::new(FileJournal::new(&config.message_log)),
        config.currencies.clone(),
    )))
}

pub async fn run(config: AppConfig) -> Result<()> {
    info!("Rate chat starting...");
    debug!("Using config: {config:#?}");

    let ctx = build_context(&config)?;
    let server = server::Server::bind(&config.server.address(), ctx).await?;
    server.run().await
}
