//! Blocking HTTP helpers. Callers run these on the IO task pool.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::time::Duration;

use super::ApiError;
use crate::constants::{HTTP_TIMEOUT_SECS, MAX_IMAGE_DOWNLOAD_BYTES};

const USER_AGENT: &str = concat!("sitemark/", env!("CARGO_PKG_VERSION"));

/// Shared ureq agent bound to the service base URL.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a service path such as `/v1/projects/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self.agent.get(&url).call().map_err(|e| map_error(&url, e))?;
        decode(&url, response)
    }

    pub fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(|e| map_error(&url, e))?;
        decode(&url, response)
    }

    pub fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .agent
            .put(&url)
            .send_json(body)
            .map_err(|e| map_error(&url, e))?;
        decode(&url, response)
    }

    /// Download raw bytes from an absolute URL (permit scans, blueprint images).
    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.agent.get(url).call().map_err(|e| map_error(url, e))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_IMAGE_DOWNLOAD_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| ApiError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(bytes)
    }
}

fn decode<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T, ApiError> {
    response.into_json::<T>().map_err(|e| ApiError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn map_error(url: &str, error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::Status(status, _) => ApiError::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(transport) => ApiError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}
