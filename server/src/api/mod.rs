use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::history::{HistoryStore, Sample};

// Live data, replaced every sampling interval.
const CACHE_CONTROL: &str = "no-store; max-age=0";

#[derive(Serialize, Debug)]
struct PriceHistoryResponse {
    #[serde(rename = "BTCETHPriceHistory")]
    history: Arc<Vec<Sample>>,
}

async fn price_history(State(history): State<HistoryStore>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, CACHE_CONTROL)],
        Json(PriceHistoryResponse {
            history: history.snapshot(),
        }),
    )
}

pub fn router(history: HistoryStore) -> Router {
    Router::new()
        .route("/", get(price_history))
        .with_state(history)
}

pub async fn serve(listener: TcpListener, history: HistoryStore) -> Result<()> {
    axum::serve(listener, router(history))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received. Stopping..."),
        Err(error) => {
            tracing::error!("Failed to listen for Ctrl+C: {}", error);
            // keep serving; the process can still be killed
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use serde_json::{json, Value};

    use super::*;

    async fn spawn_api(history: HistoryStore) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(history)).await.unwrap();
        });
        addr
    }

    #[test]
    fn response_shares_the_snapshot() {
        let history = HistoryStore::new();
        history.append_and_trim(Sample::new(1_700_000_000, 18.5), 0);

        let snapshot = history.snapshot();
        let response = PriceHistoryResponse {
            history: history.snapshot(),
        };

        assert!(Arc::ptr_eq(&snapshot, &response.history));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "BTCETHPriceHistory": [{ "time": 1_700_000_000, "price": 18.5 }] })
        );
    }

    #[tokio::test]
    async fn empty_history_before_first_tick() {
        let addr = spawn_api(HistoryStore::new()).await;

        let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers()[reqwest::header::CACHE_CONTROL],
            "no-store; max-age=0"
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "BTCETHPriceHistory": [] }));
    }

    #[tokio::test]
    async fn history_is_reported_oldest_first() {
        let history = HistoryStore::new();
        history.append_and_trim(Sample::new(1_700_000_000, 18.5), 0);
        history.append_and_trim(Sample::new(1_700_000_300, 18.75), 0);
        let addr = spawn_api(history.clone()).await;

        let body: Value = reqwest::get(format!("http://{}/", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(
            body,
            json!({
                "BTCETHPriceHistory": [
                    { "time": 1_700_000_000, "price": 18.5 },
                    { "time": 1_700_000_300, "price": 18.75 },
                ]
            })
        );
    }

    #[tokio::test]
    async fn each_request_sees_the_latest_snapshot() {
        let history = HistoryStore::new();
        let addr = spawn_api(history.clone()).await;
        let url = format!("http://{}/", addr);

        let first: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        history.append_and_trim(Sample::new(100, 1.5), 0);
        let second: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();

        assert_eq!(first["BTCETHPriceHistory"].as_array().unwrap().len(), 0);
        assert_eq!(second["BTCETHPriceHistory"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn only_get_root_is_served() {
        let addr = spawn_api(HistoryStore::new()).await;
        let client = reqwest::Client::new();

        let response = client
            .get(format!("http://{}/history", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

        let response = client
            .post(format!("http://{}/", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }
}
