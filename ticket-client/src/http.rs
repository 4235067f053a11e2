//! HTTP client for the ticket REST API

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::AppError;
use shared::models::{Ticket, TicketCreate, TicketFilter, TicketStats, TicketUpdate};

use crate::{ClientConfig, ClientError, ClientResult};

/// `GET /health` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub observers: usize,
}

/// Typed wrappers over every ticket endpoint
#[derive(Debug, Clone)]
pub struct TicketApi {
    client: Client,
    base_url: Url,
}

impl TicketApi {
    /// Create a new API client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an endpoint URL; every segment is percent-encoded
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    /// Responses without a body (204)
    async fn handle_empty(response: Response) -> ClientResult<()> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn error_from(response: Response) -> ClientError {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return e.into(),
        };

        match serde_json::from_str::<AppError>(&text) {
            Ok(body) => ClientError::from_response(status, body),
            Err(_) => {
                tracing::debug!(status = %status, body = %text, "Non-standard error body");
                match status.as_u16() {
                    400..=499 => ClientError::InvalidResponse(format!("{status}: {text}")),
                    code => ClientError::Server {
                        status: code,
                        message: text,
                    },
                }
            }
        }
    }

    // ========== Tickets API ==========

    /// POST /tickets
    pub async fn create(&self, input: &TicketCreate) -> ClientResult<Ticket> {
        let response = self
            .client
            .post(self.url(&["tickets"])?)
            .json(input)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// GET /tickets, newest first
    pub async fn list(&self, filter: &TicketFilter) -> ClientResult<Vec<Ticket>> {
        let mut request = self.client.get(self.url(&["tickets"])?);
        if !filter.is_empty() {
            request = request.query(filter);
        }
        Self::handle_response(request.send().await?).await
    }

    /// GET /tickets/by-email/{email}
    pub async fn list_by_email(&self, email: &str) -> ClientResult<Vec<Ticket>> {
        let response = self
            .client
            .get(self.url(&["tickets", "by-email", email])?)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// GET /tickets/{id}
    pub async fn get(&self, id: &str) -> ClientResult<Ticket> {
        let response = self.client.get(self.url(&["tickets", id])?).send().await?;
        Self::handle_response(response).await
    }

    /// PATCH /tickets/{id}
    pub async fn update(&self, id: &str, patch: &TicketUpdate) -> ClientResult<Ticket> {
        let response = self
            .client
            .patch(self.url(&["tickets", id])?)
            .json(patch)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// DELETE /tickets/{id}
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let response = self
            .client
            .delete(self.url(&["tickets", id])?)
            .send()
            .await?;
        Self::handle_empty(response).await
    }

    /// GET /tickets/stats
    pub async fn stats(&self) -> ClientResult<TicketStats> {
        let response = self
            .client
            .get(self.url(&["tickets", "stats"])?)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// GET /health
    pub async fn health(&self) -> ClientResult<HealthStatus> {
        let response = self.client.get(self.url(&["health"])?).send().await?;
        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_segments_are_encoded() {
        let api = TicketApi::new(&ClientConfig::new("http://localhost:3000/")).unwrap();
        let url = api.url(&["tickets", "by-email", "a b/c@d.com"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/tickets/by-email/a%20b%2Fc@d.com"
        );
        assert_eq!(
            api.url(&["tickets", "stats"]).unwrap().as_str(),
            "http://localhost:3000/tickets/stats"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        let api = TicketApi::new(&ClientConfig::new("http://host/api")).unwrap();
        assert_eq!(api.url(&["tickets"]).unwrap().as_str(), "http://host/api/tickets");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            TicketApi::new(&ClientConfig::new("not a url")),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
