use tokio::{net::TcpListener, time::Instant};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod data_sources;
mod error;
mod history;
mod sampler;
mod schedule;
#[cfg(test)]
mod test_support;

mod helpers;
use helpers::unix_now;

use config::Config;
use history::HistoryStore;
use sampler::Sampler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let default_level = if Config::debug_from_env() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::from_env().map_err(|error| {
        tracing::error!("{}", error);
        error
    })?;

    if config.debug {
        tracing::debug!("Debug mode enabled: {:?}", config);
    }

    let history = HistoryStore::new();
    let sampler = Sampler::new(&config, history.clone())?;

    let now = unix_now();
    let first_fire = schedule::align_start(config.start_at, now, config.sampling_interval);
    let delay = schedule::initial_delay(first_fire, now);
    if !delay.is_zero() {
        tracing::info!("Delaying first sample by {:.0} seconds", delay.as_secs_f64());
    }

    let first_fire = schedule::first_fire_instant(Instant::now(), delay).map_err(|error| {
        tracing::error!("{}", error);
        error
    })?;

    let interval = config.sampling_interval;
    tracing::info!(
        "Sampling every {:?}, keeping {:?} of history ({} samples)",
        interval,
        config.window,
        config.window_capacity()
    );

    let listener = TcpListener::bind((config.bind.as_str(), config.port)).await?;
    tracing::info!("Serving price history on http://{}", listener.local_addr()?);

    let sampling_thread = tokio::spawn(async move {
        schedule::run(first_fire, interval, || sampler.tick()).await
    });

    tokio::select! {
        served = api::serve(listener, history) => served?,
        sampled = sampling_thread => {
            let message = match sampled {
                Err(error) => format!("sampling task died: {}", error),
                Ok(()) => "sampling task stopped".to_string(),
            };
            tracing::error!("{}", message);
            return Err(message.into());
        }
    }

    Ok(())
}
