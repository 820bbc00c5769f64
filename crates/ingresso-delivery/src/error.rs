use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, DeliveryError>;

#[cfg(feature = "http")]
impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeliveryError::Transport(format!("request timed out: {err}"))
        } else {
            DeliveryError::Transport(err.to_string())
        }
    }
}
