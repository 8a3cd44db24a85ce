use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("power supply not available: {0}")]
    NotSupported(String),
    #[error("could not parse {what}: {value:?}")]
    Parse { what: &'static str, value: String },
    #[error("reading trace exhausted")]
    TraceExhausted,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
