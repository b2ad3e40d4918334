use std::{env, error::Error, time::Duration};

use serde::Deserialize;

mod print_history_table;
use print_history_table::print_history_as_table;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080/";
const DEFAULT_REFRESH_SECS: u64 = 5;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub time: i64,
    pub price: f64,
}

#[derive(Deserialize, Debug)]
struct PriceHistoryResponse {
    #[serde(rename = "BTCETHPriceHistory")]
    history: Vec<PricePoint>,
}

async fn fetch_history(client: &reqwest::Client, url: &str) -> Result<Vec<PricePoint>, Box<dyn Error>> {
    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<PriceHistoryResponse>()
        .await?;

    Ok(response.history)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let url = env::var("SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let refresh_secs = env::var("REFRESH_SECS")
        .ok()
        .and_then(|secs| secs.trim().parse().ok())
        .unwrap_or(DEFAULT_REFRESH_SECS);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    loop {
        match fetch_history(&client, &url).await {
            Ok(history) => print_history_as_table(&history),
            Err(error) => eprintln!("Error fetching {}: {}", url, error),
        }

        tokio::time::sleep(Duration::from_secs(refresh_secs.max(1))).await;
    }
}
