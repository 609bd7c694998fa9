use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

const MAX_ERROR_BODY_CHARS: usize = 2_000;

/// Sends one request, once. Non-2xx statuses become [`ProviderError::Api`].
pub(crate) async fn send(
    request: RequestBuilder,
    service: &'static str,
    timeout_secs: Option<u64>,
) -> Result<Response, ProviderError> {
    let request = match timeout_secs {
        Some(secs) => request.timeout(Duration::from_secs(secs)),
        None => request,
    };

    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Request { service, source })?;

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Api {
        service,
        status,
        body: clip_body(body),
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    service: &'static str,
) -> Result<T, ProviderError> {
    response
        .json()
        .await
        .map_err(|source| ProviderError::Request { service, source })
}

fn clip_body(body: String) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut clipped: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    clipped.push_str("...");
    clipped
}
