use thiserror::Error;

/// Errors that can abort startup. Per-connection and per-command failures
/// never reach this type — they are handled inline by writing a reply.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("invalid port {0:?}: must be a positive integer no greater than 65535")]
    InvalidPort(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to listen: {0}")]
    Listen(#[source] std::io::Error),

    #[error("failed to poll for readiness: {0}")]
    Poll(#[source] std::io::Error),

    #[error("failed to read configuration file {path:?}: {source}")]
    ConfigRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path:?}: {source}")]
    ConfigParse {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
