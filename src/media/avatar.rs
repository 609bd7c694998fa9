use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::capability::Capability;
use crate::config::Settings;
use crate::error::MediaError;
use crate::media::cloudinary::CloudinaryClient;
use crate::media::host::{DestroyResult, ImageHost, Transformation, UploadOptions};
use crate::media::intake::normalize_payload;

/// A stored avatar with the host's own identifier kept alongside the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedAvatar {
    pub url: String,
    pub public_id: String,
}

/// Avatar upload and deletion against the image host.
///
/// Remote failures are re-raised as [`MediaError::Upload`] or
/// [`MediaError::Delete`]; the cause is logged and then dropped.
#[derive(Clone)]
pub struct AvatarManager {
    host: Capability<Arc<dyn ImageHost>>,
    options: UploadOptions,
}

impl AvatarManager {
    pub fn new(host: Capability<Arc<dyn ImageHost>>, folder: impl Into<String>) -> Self {
        Self {
            host,
            options: UploadOptions {
                folder: folder.into(),
                transformation: Transformation::avatar(),
            },
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let host = match &settings.cloudinary {
            Some(credentials) => {
                info!(cloud = %credentials.cloud_name, "image host client initialized");
                let client = CloudinaryClient::from_config(credentials.clone(), &settings.media);
                Capability::Enabled(Arc::new(client) as Arc<dyn ImageHost>)
            }
            None => {
                warn!("Cloudinary credentials not provided; avatar uploads are disabled");
                Capability::Disabled
            }
        };
        Self::new(host, settings.media.folder.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.host.is_enabled()
    }

    pub fn folder(&self) -> &str {
        &self.options.folder
    }

    /// Uploads and returns the secure URL of the transformed image.
    pub async fn upload_avatar(&self, payload: &str) -> Result<String, MediaError> {
        self.upload_avatar_with_id(payload)
            .await
            .map(|avatar| avatar.url)
    }

    /// Uploads and keeps the host's public id, so deletion never has to
    /// re-derive it from the URL.
    pub async fn upload_avatar_with_id(&self, payload: &str) -> Result<UploadedAvatar, MediaError> {
        let file = normalize_payload(payload)?;
        let host = self.host.client().ok_or(MediaError::NotConfigured)?;

        match host.upload(&file, &self.options).await {
            Ok(uploaded) => {
                info!(public_id = %uploaded.public_id, "avatar uploaded");
                Ok(UploadedAvatar {
                    url: uploaded.secure_url,
                    public_id: uploaded.public_id,
                })
            }
            Err(err) => {
                error!(error = %err, "avatar upload failed");
                Err(MediaError::Upload)
            }
        }
    }

    pub async fn delete_avatar(&self, public_id: &str) -> Result<DestroyResult, MediaError> {
        let host = self.host.client().ok_or(MediaError::NotConfigured)?;

        match host.destroy(public_id).await {
            Ok(result) => {
                if result.is_ok() {
                    info!(public_id, "avatar deleted");
                } else {
                    warn!(public_id, result = %result.result, "avatar was not deleted");
                }
                Ok(result)
            }
            Err(err) => {
                error!(error = %err, public_id, "avatar delete failed");
                Err(MediaError::Delete)
            }
        }
    }

    /// Rebuilds a public id from a hosted URL. See [`extract_public_id`].
    pub fn extract_public_id(&self, url: &str) -> String {
        extract_public_id(url, &self.options.folder)
    }
}

/// Last path segment, cut at its first `.`, prefixed with `folder/`.
///
/// Only valid for URLs produced by this host under `folder`; anything else
/// yields a wrong id without an error. Prefer
/// [`UploadedAvatar::public_id`] when it was kept.
pub fn extract_public_id(url: &str, folder: &str) -> String {
    let last_segment = url.rsplit('/').next().unwrap_or(url);
    let stem = last_segment.split('.').next().unwrap_or(last_segment);
    format!("{folder}/{stem}")
}
