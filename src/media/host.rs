use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Incoming transformation applied by the host at upload time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    pub width: u32,
    pub height: u32,
    pub crop: String,
    pub gravity: String,
}

impl Transformation {
    /// 300x300 square, cropped to fill, anchored on the detected face.
    pub fn avatar() -> Self {
        Self {
            width: 300,
            height: 300,
            crop: "fill".to_string(),
            gravity: "face".to_string(),
        }
    }

    /// Cloudinary URL-style form, keys in alphabetical order.
    pub fn to_param(&self) -> String {
        format!(
            "c_{},g_{},h_{},w_{}",
            self.crop, self.gravity, self.height, self.width
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub folder: String,
    pub transformation: Transformation,
}

/// Subset of the host's upload reply that callers use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub public_id: String,
    pub secure_url: String,
}

/// Host reply to a delete: `"ok"` or `"not found"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyResult {
    pub result: String,
}

impl DestroyResult {
    pub fn is_ok(&self) -> bool {
        self.result == "ok"
    }
}

/// A hosted image store with server-side transformations.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// `file` is a data URI or a remote URL.
    async fn upload(
        &self,
        file: &str,
        options: &UploadOptions,
    ) -> Result<UploadResponse, ProviderError>;

    async fn destroy(&self, public_id: &str) -> Result<DestroyResult, ProviderError>;
}
