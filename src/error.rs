use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no audio output available: {0}")]
    Audio(String),
    #[error("could not determine a data directory")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, Error>;
