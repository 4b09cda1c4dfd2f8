use fc_core::{FerryError, Role};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] FerryError),

    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        role:   Role,
        #[source]
        source: std::io::Error,
    },

    #[error("shutdown timed out with {} agent(s) still running", .stragglers.len())]
    ShutdownTimeout {
        stragglers: Vec<Role>,
    },

    #[error("{0} panicked")]
    AgentPanicked(Role),

    #[error("simulation has already run")]
    AlreadyRun,
}

pub type SimResult<T> = Result<T, SimError>;
