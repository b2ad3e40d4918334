use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Missing or invalid startup configuration. Fatal.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Network failure, timeout or non-2xx status from an upstream source.
    #[error("failed to fetch {source_name} price: {error}")]
    SourceFetchError {
        source_name: &'static str,
        #[source]
        error: reqwest::Error,
    },

    /// The upstream answered, but without a numeric price field.
    #[error("failed to parse {source_name} price: {error}")]
    SourceParseError {
        source_name: &'static str,
        #[source]
        error: serde_json::Error,
    },

    #[error("cannot derive cross-rate: {0} price is zero")]
    DivisionError(&'static str),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
