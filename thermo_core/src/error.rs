use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error("reading source error: {0}")]
    Source(String),
    #[error("power monitor error: {0}")]
    Power(String),
    #[error("reading trace exhausted")]
    TraceExhausted,
    #[error("timeout waiting for collaborator")]
    Timeout,
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing power monitor")]
    MissingPower,
    #[error("missing reading source factory")]
    MissingSource,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
