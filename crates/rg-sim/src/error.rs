use rg_grid::GridError;
use rg_mover::MoverError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("mover error: {0}")]
    Mover(#[from] MoverError),

    #[error("snapshot does not match its own contents: {0}")]
    SnapshotMismatch(String),
}

pub type SimResult<T> = Result<T, SimError>;
