use serde::Deserialize;
use url::Url;

use crate::error::Result;

pub const SOURCE_NAME: &str = "cryptocompare ETH-USD";

#[derive(Deserialize, Debug)]
pub struct CryptoCompareQuote {
    #[serde(rename = "USD")]
    pub usd: f64,
}

pub async fn fetch_eth_price(client: &reqwest::Client, url: &Url) -> Result<f64> {
    let quote: CryptoCompareQuote = super::fetch_json(client, url, SOURCE_NAME).await?;
    Ok(quote.usd)
}
