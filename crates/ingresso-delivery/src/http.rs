#[cfg(feature = "http")]
mod imp {
    use crate::transport::{Beacon, Transport, TransportResponse};
    use crate::Result;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::Client;
    use std::future::Future;
    use std::mem;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::runtime::Handle;
    use tokio::task::JoinHandle;
    use tracing::{debug, warn};
    use url::Url;

    const DEFAULT_USER_AGENT: &str = "ingresso";
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    const BEACON_TIMEOUT: Duration = Duration::from_secs(10);

    fn build_client(user_agent: Option<&str>) -> Result<Client> {
        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(client)
    }

    /// reqwest-backed primary transport. The overall deadline is enforced by
    /// the pipeline, not here.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: Client,
    }

    impl HttpTransport {
        pub fn new(user_agent: Option<&str>) -> Result<Self> {
            Ok(Self {
                client: build_client(user_agent)?,
            })
        }
    }

    impl Transport for HttpTransport {
        fn post_json(
            &self,
            endpoint: &Url,
            body: Vec<u8>,
        ) -> impl Future<Output = Result<TransportResponse>> + Send {
            let request = self
                .client
                .post(endpoint.clone())
                .header(CONTENT_TYPE, "application/json")
                .body(body);
            async move {
                let response = request.send().await?;
                let status = response.status().as_u16();
                let body = response.text().await?;
                Ok(TransportResponse { status, body })
            }
        }
    }

    /// Fire-and-forget POST spawned on the current tokio runtime.
    #[derive(Debug, Clone)]
    pub struct HttpBeacon {
        client: Client,
        in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
    }

    impl HttpBeacon {
        pub fn new(user_agent: Option<&str>) -> Result<Self> {
            Ok(Self {
                client: build_client(user_agent)?,
                in_flight: Arc::new(Mutex::new(Vec::new())),
            })
        }

        /// Waits for every queued beacon to finish. A short-lived process
        /// calls this before its runtime shuts down, which would otherwise
        /// drop the requests mid-flight.
        /// Beacons spawned and not yet reaped.
        pub fn in_flight(&self) -> usize {
            self.in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .len()
        }

        pub async fn drain(&self) {
            let pending = {
                let mut guard = self
                    .in_flight
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                mem::take(&mut *guard)
            };
            for task in pending {
                if let Err(err) = task.await {
                    warn!(error = %err, "beacon task aborted");
                }
            }
        }
    }

    impl Beacon for HttpBeacon {
        fn send(&self, endpoint: &Url, body: Vec<u8>) -> bool {
            let Ok(handle) = Handle::try_current() else {
                warn!("no async runtime available for beacon");
                return false;
            };
            let request = self
                .client
                .post(endpoint.clone())
                .header(CONTENT_TYPE, "application/json")
                .timeout(BEACON_TIMEOUT)
                .body(body);
            let task = handle.spawn(async move {
                match request.send().await {
                    Ok(response) => debug!(status = response.status().as_u16(), "beacon delivered"),
                    Err(err) => warn!(error = %err, "beacon failed"),
                }
            });
            let mut in_flight = self
                .in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            in_flight.retain(|pending| !pending.is_finished());
            in_flight.push(task);
            true
        }
    }
}

#[cfg(not(feature = "http"))]
mod imp {
    use crate::transport::{Beacon, Transport, TransportResponse};
    use crate::{DeliveryError, Result};
    use std::future::Future;
    use url::Url;

    fn unavailable() -> DeliveryError {
        DeliveryError::Unavailable("webhook delivery requires the http feature".to_string())
    }

    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        _private: (),
    }

    impl HttpTransport {
        pub fn new(_user_agent: Option<&str>) -> Result<Self> {
            Err(unavailable())
        }
    }

    impl Transport for HttpTransport {
        fn post_json(
            &self,
            _endpoint: &Url,
            _body: Vec<u8>,
        ) -> impl Future<Output = Result<TransportResponse>> + Send {
            async { Err(unavailable()) }
        }
    }

    #[derive(Debug, Clone)]
    pub struct HttpBeacon {
        _private: (),
    }

    impl HttpBeacon {
        pub fn new(_user_agent: Option<&str>) -> Result<Self> {
            Err(unavailable())
        }

        pub async fn drain(&self) {}
    }

    impl Beacon for HttpBeacon {
        fn send(&self, _endpoint: &Url, _body: Vec<u8>) -> bool {
            false
        }
    }
}

pub use imp::{HttpBeacon, HttpTransport};
