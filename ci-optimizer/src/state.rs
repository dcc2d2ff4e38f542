use crate::config::Settings;
use crate::optimizer_client::{Caller, RequestError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub optimizer_client: Arc<Client>,
}

impl AppState {
    fn create_optimizer_client(timeout: Duration) -> Result<Client, RequestError> {
        let caller = Caller::current();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("{}/{}", caller.name, caller.version))?,
        );

        Ok(Client::builder()
            // Bounds connect, send and reading the body
            .timeout(timeout)
            .default_headers(headers)
            // One request per process, so there is nothing to keep idle connections for
            .pool_max_idle_per_host(0)
            .build()?)
    }

    pub fn new(settings: Settings) -> Result<Self, RequestError> {
        let optimizer_client = Self::create_optimizer_client(settings.timeout)?;
        Ok(Self {
            settings: Arc::new(settings),
            optimizer_client: Arc::new(optimizer_client),
        })
    }
}
