//! Avatar hosting on top of an image transformation service.

pub mod avatar;
pub mod cloudinary;
pub mod host;
pub mod intake;

pub use avatar::{AvatarManager, UploadedAvatar, extract_public_id};
pub use cloudinary::CloudinaryClient;
pub use host::{DestroyResult, ImageHost, Transformation, UploadOptions, UploadResponse};
pub use intake::{AvatarIntake, IncomingFile, MAX_AVATAR_BYTES, normalize_payload};
