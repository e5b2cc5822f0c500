//! HTTP client for the altwatch server.

use anyhow::{bail, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use altwatch_core::{AircraftSnapshot, Alert, AltitudeStatus};

/// Response envelope used by every altwatch endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => bail!(self.error.unwrap_or_else(|| "empty response".to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Accepted {
    pub accepted: usize,
}

/// Client for the altwatch REST API.
pub struct AltwatchClient {
    base_url: String,
    client: reqwest::Client,
}

impl AltwatchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Report a single aircraft position.
    pub async fn report_position(&self, snapshot: &AircraftSnapshot) -> Result<usize> {
        let url = format!("{}/v1/aircraft/positions", self.base_url);
        let response = self.client.post(&url).json(snapshot).send().await?;
        let accepted: Accepted = decode(response).await?;
        Ok(accepted.accepted)
    }

    pub async fn active_alerts(&self) -> Result<Vec<Alert>> {
        self.get(&format!("{}/v1/alerts/active", self.base_url)).await
    }

    pub async fn alert_history(&self, limit: usize) -> Result<Vec<Alert>> {
        self.get(&format!("{}/v1/alerts/history?limit={}", self.base_url, limit))
            .await
    }

    /// Altitude status for one aircraft. `None` when the server does not know it.
    pub async fn altitude_status(&self, callsign: &str) -> Result<Option<AltitudeStatus>> {
        let url = format!("{}/v1/aircraft/{}/altitude-status", self.base_url, callsign);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    /// Ask the server to run a monitor cycle now.
    pub async fn run_check(&self) -> Result<Vec<Alert>> {
        let url = format!("{}/v1/monitor/check", self.base_url);
        let response = self.client.post(&url).send().await?;
        decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str::<Envelope<T>>(&body) {
        Ok(envelope) => envelope.into_result(),
        Err(_) if !status.is_success() => bail!("Request failed: {} {}", status, body),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_yields_data() {
        let envelope: Envelope<Accepted> =
            serde_json::from_str(r#"{"success":true,"data":{"accepted":2}}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap().accepted, 2);
    }

    #[test]
    fn envelope_surfaces_error_message() {
        let envelope: Envelope<Accepted> =
            serde_json::from_str(r#"{"success":false,"error":"Aircraft X not found"}"#).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Aircraft X not found");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = AltwatchClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
