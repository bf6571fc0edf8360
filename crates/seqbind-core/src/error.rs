use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid package model: {0}")]
    InvalidModel(String),

    #[error("Model parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
