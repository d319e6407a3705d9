//! HTTP client for the pattern persistence/execution service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::pattern::Pattern;

/// Keep requests short; the operator is sitting at the terminal waiting.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
}

/// Error body the service sends on non-2xx. Anything it carries beyond the
/// message is ignored; every failure is handled the same way.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteRequest<'a> {
    pattern_id: &'a str,
    device_id: &'a str,
}

pub struct PatternApi {
    base_url: String,
    client: reqwest::Client,
}

impl PatternApi {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create or fully replace a pattern. Returns the id it lives under:
    /// the server assigns one on create, a replace keeps its own.
    pub async fn save_pattern(&self, pattern: &Pattern) -> Result<String, TransportError> {
        match &pattern.id {
            Some(id) => {
                let response = self
                    .client
                    .put(format!("{}/patterns/{}", self.base_url, id))
                    .json(pattern)
                    .send()
                    .await?;
                check(response).await?;
                Ok(id.clone())
            }
            None => {
                let response = self
                    .client
                    .post(format!("{}/patterns", self.base_url))
                    .json(pattern)
                    .send()
                    .await?;
                let response = check(response).await?;
                let created: Pattern = response.json().await?;
                created.id.ok_or(TransportError::Api {
                    status: 200,
                    message: String::from("create response carried no id"),
                })
            }
        }
    }

    pub async fn delete_pattern(&self, id: &str) -> Result<(), TransportError> {
        let response = self
            .client
            .delete(format!("{}/patterns/{}", self.base_url, id))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Start sequential playback of a saved pattern on the named device.
    /// The call returns as soon as the service accepts it; playback runs on
    /// the device, and only the out-of-band stop the dispatcher owns can
    /// interrupt it.
    pub async fn execute_pattern(
        &self,
        pattern_id: &str,
        device_id: &str,
    ) -> Result<(), TransportError> {
        let response = self
            .client
            .post(format!("{}/patterns/execute", self.base_url))
            .json(&ExecuteRequest {
                pattern_id,
                device_id,
            })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Any non-2xx is the same kind of failure: pull the message out of the
/// `{ "error": ... }` body if there is one, fall back to something generic.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ApiError>().await {
        Ok(body) => body.error,
        Err(_) => String::from("request failed"),
    };
    Err(TransportError::Api {
        status: status.as_u16(),
        message,
    })
}
