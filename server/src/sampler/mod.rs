use std::time::Duration;

use chrono::{DateTime, SecondsFormat};

use crate::config::Config;
use crate::data_sources::{fetch_prices, Sources};
use crate::error::{Error, Result};
use crate::helpers::unix_now;
use crate::history::{HistoryStore, Sample};

mod calculate;
use calculate::{cross_rate, midpoint_timestamp};

const USER_AGENT: &str = "btc-eth-price-history";

/// Fetches both prices and records one cross-rate sample per tick.
pub struct Sampler {
    client: reqwest::Client,
    sources: Sources,
    window: Duration,
    history: HistoryStore,
}

impl Sampler {
    pub fn new(config: &Config, history: HistoryStore) -> Result<Self> {
        let sources = Sources {
            btc_url: config.btc_url.clone(),
            eth_url: config.eth_url.clone(),
        };

        Self::with_sources(sources, config.window, config.fetch_timeout, history)
    }

    pub fn with_sources(
        sources: Sources,
        window: Duration,
        fetch_timeout: Duration,
        history: HistoryStore,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(fetch_timeout)
            .build()
            .map_err(|error| Error::ConfigError(format!("failed to build HTTP client: {}", error)))?;

        Ok(Self {
            client,
            sources,
            window,
            history,
        })
    }

    /// Runs one fetch-compute-store cycle. On error the history is left untouched.
    pub async fn tick(&self) -> Result<Sample> {
        let before = unix_now();
        let prices = fetch_prices(&self.client, &self.sources).await?;
        let after = unix_now();

        let value = cross_rate(prices)?;
        let sample = Sample::new(midpoint_timestamp(before, after), value);

        let window_start = before.floor() as i64 - self.window.as_secs() as i64;
        self.history.append_and_trim(sample, window_start);

        let history = self.history.snapshot();
        let iso = DateTime::from_timestamp(sample.timestamp, 0)
            .map(|time| time.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| sample.timestamp.to_string());
        tracing::info!(
            "history @ {}: BTC/ETH {} ({} samples, fetch took {:.3}s)",
            iso,
            sample.value,
            history.len(),
            after - before
        );
        tracing::debug!("history: {:?}", history);

        Ok(sample)
    }
}
