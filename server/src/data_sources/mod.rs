use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};

// Exchanges
pub mod blockchain;
pub mod cryptocompare;

/// Upstream endpoints polled on every tick.
#[derive(Debug, Clone)]
pub struct Sources {
    pub btc_url: Url,
    pub eth_url: Url,
}

/// USD spot prices fetched within one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prices {
    pub btc_usd: f64,
    pub eth_usd: f64,
}

/// Fetches both prices concurrently. Fails as soon as either source fails.
pub async fn fetch_prices(client: &reqwest::Client, sources: &Sources) -> Result<Prices> {
    let (btc_usd, eth_usd) = tokio::try_join!(
        blockchain::fetch_btc_price(client, &sources.btc_url),
        cryptocompare::fetch_eth_price(client, &sources.eth_url),
    )?;

    Ok(Prices { btc_usd, eth_usd })
}

async fn fetch_json<T>(client: &reqwest::Client, url: &Url, source_name: &'static str) -> Result<T>
where
    T: DeserializeOwned,
{
    let fetch_error = |error: reqwest::Error| Error::SourceFetchError { source_name, error };

    let data = client
        .get(url.clone())
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(fetch_error)?
        .bytes()
        .await
        .map_err(fetch_error)?;

    serde_json::from_slice::<T>(&data).map_err(|error| Error::SourceParseError { source_name, error })
}
