use std::{env, time::Duration};

use url::Url;

use crate::error::{Error, Result};
use crate::helpers::{parse_flag, parse_or_default};

const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_SAMPLING_INTERVAL_SECS: u64 = 300; // 5 minutes
const DEFAULT_WINDOW_SECS: u64 = 3600; // 1 hour
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

const DEFAULT_BTC_URL: &str = "https://api.blockchain.com/v3/exchange/tickers/BTC-USD";
const DEFAULT_ETH_URL: &str = "https://min-api.cryptocompare.com/data/price?fsym=ETH&tsyms=USD";

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub debug: bool,
    /// Epoch seconds of the first tick. `None` means start immediately.
    pub start_at: Option<u64>,
    pub sampling_interval: Duration,
    pub window: Duration,
    pub fetch_timeout: Duration,
    pub btc_url: Url,
    pub eth_url: Url,
}

impl Config {
    /// Reads the process environment. `PORT` may also be given as the first CLI argument.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok(), env::args().nth(1))
    }

    pub fn from_vars<F>(lookup: F, port_arg: Option<String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_port = lookup("PORT")
            .filter(|port| !port.trim().is_empty())
            .or(port_arg)
            .ok_or_else(|| {
                Error::ConfigError(
                    "listening port is required (PORT env var or first argument)".to_string(),
                )
            })?;
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|error| Error::ConfigError(format!("invalid port {:?}: {}", raw_port, error)))?;

        let debug = Self::debug_flag(&lookup);

        let start_at = parse_or_default("START_AT", lookup("START_AT").as_deref(), 0u64);
        let start_at = if start_at == 0 { None } else { Some(start_at) };

        let sampling_interval_secs = parse_or_default(
            "SAMPLING_INTERVAL_SECS",
            lookup("SAMPLING_INTERVAL_SECS").as_deref(),
            DEFAULT_SAMPLING_INTERVAL_SECS,
        );
        let window_secs = parse_or_default(
            "WINDOW_SECS",
            lookup("WINDOW_SECS").as_deref(),
            DEFAULT_WINDOW_SECS,
        );
        let fetch_timeout_secs = parse_or_default(
            "FETCH_TIMEOUT_SECS",
            lookup("FETCH_TIMEOUT_SECS").as_deref(),
            DEFAULT_FETCH_TIMEOUT_SECS,
        )
        .max(1);

        if sampling_interval_secs == 0 {
            return Err(Error::ConfigError(
                "sampling interval must be positive".to_string(),
            ));
        }
        // A hung fetch must give up before the next grid point.
        if fetch_timeout_secs >= sampling_interval_secs {
            return Err(Error::ConfigError(format!(
                "fetch timeout of {}s must be shorter than the {}s sampling interval",
                fetch_timeout_secs, sampling_interval_secs
            )));
        }
        // The window holds a whole number of samples.
        if window_secs == 0 || window_secs % sampling_interval_secs != 0 {
            return Err(Error::ConfigError(format!(
                "window of {}s is not a positive multiple of the {}s sampling interval",
                window_secs, sampling_interval_secs
            )));
        }

        Ok(Self {
            bind: lookup("BIND")
                .map(|bind| bind.trim().to_string())
                .filter(|bind| !bind.is_empty())
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port,
            debug,
            start_at,
            sampling_interval: Duration::from_secs(sampling_interval_secs),
            window: Duration::from_secs(window_secs),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            btc_url: parse_url("BTC_URL", lookup("BTC_URL"), DEFAULT_BTC_URL)?,
            eth_url: parse_url("ETH_URL", lookup("ETH_URL"), DEFAULT_ETH_URL)?,
        })
    }

    /// The `DEBUG` flag alone, so logging can be set up before the rest is read.
    pub fn debug_from_env() -> bool {
        Self::debug_flag(&|name: &str| env::var(name).ok())
    }

    fn debug_flag<F>(lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("DEBUG").map(|val| parse_flag(&val)).unwrap_or(false)
    }

    /// Number of samples a full window holds.
    pub fn window_capacity(&self) -> u64 {
        self.window.as_secs() / self.sampling_interval.as_secs()
    }
}

fn parse_url(var_name: &str, value: Option<String>, default: &str) -> Result<Url> {
    let value = value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
        .unwrap_or_else(|| default.to_string());

    Url::parse(&value)
        .map_err(|error| Error::ConfigError(format!("invalid {} {:?}: {}", var_name, value, error)))
}
