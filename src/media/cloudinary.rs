use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::config::{CloudinaryCredentials, MediaConfig};
use crate::error::ProviderError;
use crate::http;
use crate::media::host::{DestroyResult, ImageHost, UploadOptions, UploadResponse};

const UPLOAD_SERVICE: &str = "image upload";
const DESTROY_SERVICE: &str = "image delete";

/// Signed-request client for the Cloudinary upload API.
#[derive(Clone)]
pub struct CloudinaryClient {
    client: reqwest::Client,
    credentials: CloudinaryCredentials,
    base_url: String,
}

impl CloudinaryClient {
    pub fn new(credentials: CloudinaryCredentials, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(credentials: CloudinaryCredentials, config: &MediaConfig) -> Self {
        Self::new(credentials, &config.base_url)
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{action}",
            self.base_url, self.credentials.cloud_name
        )
    }

    /// Adds `timestamp`, `api_key` and `signature` to the signed parameters.
    fn signed_form(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", unix_timestamp().to_string());
        let signature = sign_params(&params, &self.credentials.api_secret);
        params.insert("api_key", self.credentials.api_key.clone());
        params.insert("signature", signature);
        params
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload(
        &self,
        file: &str,
        options: &UploadOptions,
    ) -> Result<UploadResponse, ProviderError> {
        let mut params = BTreeMap::new();
        params.insert("folder", options.folder.clone());
        params.insert("transformation", options.transformation.to_param());
        let mut form = self.signed_form(params);
        // `file` is never part of the signature.
        form.insert("file", file.to_string());

        debug!(folder = %options.folder, "uploading image");
        let request = self.client.post(self.endpoint("upload")).form(&form);
        let response = http::send(request, UPLOAD_SERVICE, None).await?;
        http::read_json(response, UPLOAD_SERVICE).await
    }

    async fn destroy(&self, public_id: &str) -> Result<DestroyResult, ProviderError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        let form = self.signed_form(params);

        debug!(public_id, "deleting image");
        let request = self.client.post(self.endpoint("destroy")).form(&form);
        let response = http::send(request, DESTROY_SERVICE, None).await?;
        http::read_json(response, DESTROY_SERVICE).await
    }
}

/// Cloudinary request signature: hex SHA-1 over the sorted, `&`-joined
/// `key=value` pairs with the API secret appended. Empty values are skipped.
pub fn sign_params(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
