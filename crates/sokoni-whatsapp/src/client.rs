// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the bridge's send API.
//!
//! Sends are at-most-once: a failed POST surfaces as a transport error and
//! is never retried here.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use sokoni_core::SokoniError;
use tracing::debug;

use crate::wire::{
    PresenceRequest, SendContactRequest, SendImageRequest, SendResponse, SendTextRequest,
};

/// HTTP client for bridge send endpoints.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    client: reqwest::Client,
    base_url: String,
}

impl BridgeClient {
    /// Creates a client for the bridge API at `base_url`, attaching the
    /// bearer token to every request when one is configured.
    pub fn new(base_url: String, api_token: Option<&str>) -> Result<Self, SokoniError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = api_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                SokoniError::Config(format!("invalid bridge API token: {e}"))
            })?;
            headers.insert("authorization", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SokoniError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn send_text(
        &self,
        to: &str,
        body: &str,
    ) -> Result<SendResponse, SokoniError> {
        self.post("send/text", &SendTextRequest { to, body }).await
    }

    pub async fn send_image(
        &self,
        to: &str,
        url: &str,
        caption: Option<&str>,
    ) -> Result<SendResponse, SokoniError> {
        self.post("send/image", &SendImageRequest { to, url, caption })
            .await
    }

    pub async fn send_contact(
        &self,
        to: &str,
        display_name: &str,
        vcard: String,
    ) -> Result<SendResponse, SokoniError> {
        self.post(
            "send/contact",
            &SendContactRequest {
                to,
                display_name,
                vcard,
            },
        )
        .await
    }

    pub async fn set_presence(&self, to: &str, state: String) -> Result<(), SokoniError> {
        self.post::<_, SendResponse>("presence", &PresenceRequest { to, state })
            .await?;
        Ok(())
    }

    /// Checks the bridge's health endpoint.
    pub async fn health(&self) -> Result<(), SokoniError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            SokoniError::Transport {
                message: format!("bridge unreachable: {e}"),
                source: Some(Box::new(e)),
            }
        })?;
        if !response.status().is_success() {
            return Err(SokoniError::Transport {
                message: format!("bridge health check returned {}", response.status()),
                source: None,
            });
        }
        Ok(())
    }

    async fn post<B: serde::Serialize, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, SokoniError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| SokoniError::Transport {
                message: format!("bridge request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(path, status = %status, "bridge request complete");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SokoniError::Transport {
                message: format!("bridge returned {status}: {body}"),
                source: None,
            });
        }

        response.json().await.map_err(|e| SokoniError::Transport {
            message: format!("invalid bridge response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
