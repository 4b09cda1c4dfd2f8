use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// The gate was closed for shutdown while (or before) waiting.
    #[error("signal `{signal}` closed")]
    Closed { signal: &'static str },
}

pub type GateResult<T> = Result<T, GateError>;
