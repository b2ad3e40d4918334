use crate::data_sources::{cryptocompare, Prices};
use crate::error::{Error, Result};

/// Estimate of when the quoted prices were current: halfway through the fetch.
pub fn midpoint_timestamp(before: f64, after: f64) -> i64 {
    ((before + after) / 2.0).floor() as i64
}

/// BTC priced in ETH.
pub fn cross_rate(prices: Prices) -> Result<f64> {
    if prices.eth_usd == 0.0 {
        return Err(Error::DivisionError(cryptocompare::SOURCE_NAME));
    }

    let rate = prices.btc_usd / prices.eth_usd;
    if !rate.is_finite() {
        return Err(Error::DivisionError(cryptocompare::SOURCE_NAME));
    }

    Ok(rate)
}
