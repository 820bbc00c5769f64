use crate::Result;
use std::future::Future;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Primary delivery: POST a JSON body and wait for the reply.
pub trait Transport {
    fn post_json(
        &self,
        endpoint: &Url,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<TransportResponse>> + Send;
}

/// Fallback delivery. Hands the body off without waiting for a response and
/// reports whether it was queued.
pub trait Beacon {
    fn send(&self, endpoint: &Url, body: Vec<u8>) -> bool;
}
