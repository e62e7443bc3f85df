use rg_core::ObjectId;
use rg_grid::GridError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoverError {
    #[error("{0} has no mover")]
    NotRegistered(ObjectId),

    #[error("{0} is deploying and cannot take orders")]
    Deploying(ObjectId),

    #[error("{0} is busy; deploy needs an idle mover")]
    Busy(ObjectId),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

pub type MoverResult<T> = Result<T, MoverError>;
