use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from routing service")]
    InvalidResponse,
}
