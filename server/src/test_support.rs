//! Fake upstream price APIs for tests.

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::get, Router};
use url::Url;

use crate::data_sources::Sources;

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
}

#[derive(Clone)]
struct Replies {
    btc: Arc<Mutex<Reply>>,
    eth: Arc<Mutex<Reply>>,
}

/// Serves `/btc` and `/eth` on an ephemeral port; replies can be swapped at any time.
pub struct FakeUpstream {
    replies: Replies,
    pub sources: Sources,
}

impl FakeUpstream {
    pub async fn start(btc_usd: f64, eth_usd: f64) -> Self {
        let replies = Replies {
            btc: Arc::new(Mutex::new(Reply {
                status: StatusCode::OK,
                body: String::new(),
            })),
            eth: Arc::new(Mutex::new(Reply {
                status: StatusCode::OK,
                body: String::new(),
            })),
        };

        let app = Router::new()
            .route("/btc", get(btc))
            .route("/eth", get(eth))
            .with_state(replies.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let sources = Sources {
            btc_url: Url::parse(&format!("http://{}/btc", addr)).unwrap(),
            eth_url: Url::parse(&format!("http://{}/eth", addr)).unwrap(),
        };

        let upstream = Self { replies, sources };
        upstream.set_prices(btc_usd, eth_usd);
        upstream
    }

    pub fn set_prices(&self, btc_usd: f64, eth_usd: f64) {
        self.set_btc(StatusCode::OK, &format!(r#"{{"symbol":"BTC-USD","last_trade_price":{}}}"#, btc_usd));
        self.set_eth(StatusCode::OK, &format!(r#"{{"USD":{}}}"#, eth_usd));
    }

    pub fn set_btc(&self, status: StatusCode, body: &str) {
        *self.replies.btc.lock().unwrap() = Reply {
            status,
            body: body.to_string(),
        };
    }

    pub fn set_eth(&self, status: StatusCode, body: &str) {
        *self.replies.eth.lock().unwrap() = Reply {
            status,
            body: body.to_string(),
        };
    }
}

async fn btc(State(replies): State<Replies>) -> (StatusCode, String) {
    let reply = replies.btc.lock().unwrap().clone();
    (reply.status, reply.body)
}

async fn eth(State(replies): State<Replies>) -> (StatusCode, String) {
    let reply = replies.eth.lock().unwrap().clone();
    (reply.status, reply.body)
}
