use serde::Deserialize;
use url::Url;

use crate::error::Result;

pub const SOURCE_NAME: &str = "blockchain.com BTC-USD";

#[derive(Deserialize, Debug)]
pub struct BlockchainTicker {
    // it also contains `symbol`, `price_24h` and `volume_24h`, which are not used in this app
    pub last_trade_price: f64,
}

pub async fn fetch_btc_price(client: &reqwest::Client, url: &Url) -> Result<f64> {
    let ticker: BlockchainTicker = super::fetch_json(client, url, SOURCE_NAME).await?;
    Ok(ticker.last_trade_price)
}
