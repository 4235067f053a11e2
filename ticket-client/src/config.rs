//! Client configuration

use reqwest::Url;

use crate::{ClientError, ClientResult, RealtimeClient, TicketApi};

/// Default capacity of the local event fan-out
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Client configuration for connecting to the ticket server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    /// WebSocket endpoint. Derived from `base_url` when unset.
    pub ws_url: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Events buffered per local subscriber before it starts lagging
    pub event_capacity: usize,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ws_url: None,
            timeout: 30,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Set an explicit WebSocket endpoint
    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// WebSocket endpoint: explicit value, or `base_url` with the scheme
    /// swapped to ws/wss and a `ws` segment appended to its path
    ///
    /// Query and fragment of `base_url` are dropped.
    pub fn realtime_url(&self) -> ClientResult<String> {
        if let Some(url) = &self.ws_url {
            return Ok(url.clone());
        }

        let invalid = || ClientError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            _ => return Err(invalid()),
        };
        url.set_scheme(scheme).map_err(|_| invalid())?;
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("ws");
        Ok(url.into())
    }

    /// Create an HTTP API client from this configuration
    pub fn build_api(&self) -> ClientResult<TicketApi> {
        TicketApi::new(self)
    }

    /// Open the real-time channel described by this configuration
    pub async fn connect_realtime(&self) -> ClientResult<RealtimeClient> {
        RealtimeClient::from_config(self).await
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_url_derivation() {
        let config = ClientConfig::new("http://localhost:3000/");
        assert_eq!(config.realtime_url().unwrap(), "ws://localhost:3000/ws");

        let config = ClientConfig::new("https://tickets.example.com");
        assert_eq!(config.realtime_url().unwrap(), "wss://tickets.example.com/ws");

        let config = ClientConfig::new("http://a").with_ws_url("ws://b:9000/ws");
        assert_eq!(config.realtime_url().unwrap(), "ws://b:9000/ws");

        let config = ClientConfig::new("localhost:3000");
        assert!(matches!(config.realtime_url(), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_realtime_url_keeps_path_prefix_and_drops_query() {
        let config = ClientConfig::new("https://example.com/support/?token=x#top");
        assert_eq!(config.realtime_url().unwrap(), "wss://example.com/support/ws");

        let config = ClientConfig::new("HTTP://LocalHost:8080/api");
        assert_eq!(config.realtime_url().unwrap(), "ws://localhost:8080/api/ws");

        for base in ["ftp://example.com", "not a url", ""] {
            let config = ClientConfig::new(base);
            assert!(matches!(config.realtime_url(), Err(ClientError::InvalidUrl(_))), "{base}");
        }
    }

    #[test]
    fn test_event_capacity_is_at_least_one() {
        assert_eq!(ClientConfig::default().with_event_capacity(0).event_capacity, 1);
    }
}
