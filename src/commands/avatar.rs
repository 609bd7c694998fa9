use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};

use crate::config::Settings;
use crate::media::{AvatarIntake, AvatarManager, IncomingFile, extract_public_id};

#[derive(Debug, Args, Clone)]
pub struct AvatarArgs {
    #[command(subcommand)]
    command: AvatarSubcommand,
}

#[derive(Debug, Subcommand, Clone)]
enum AvatarSubcommand {
    /// Upload an image file as an avatar.
    Upload {
        path: PathBuf,
        /// Declared content type; guessed from the extension when omitted.
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Delete a stored avatar by public id.
    Delete { public_id: String },
    /// Print the public id encoded in an avatar URL.
    PublicId { url: String },
}

pub async fn run(args: AvatarArgs, settings: &Settings) -> anyhow::Result<()> {
    match args.command {
        AvatarSubcommand::Upload { path, content_type } => {
            let bytes =
                fs::read(&path).with_context(|| format!("Failed to read '{}'", path.display()))?;
            let file = IncomingFile {
                file_name: path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                content_type: content_type.unwrap_or_else(|| guess_content_type(&path).to_string()),
                bytes,
            };
            // Intake runs before the manager so rejected files never need credentials.
            let payload = AvatarIntake::default().accept(&file)?;
            let avatar = AvatarManager::from_settings(settings)
                .upload_avatar_with_id(&payload)
                .await?;
            println!("{}", serde_json::to_string_pretty(&avatar)?);
        }
        AvatarSubcommand::Delete { public_id } => {
            let result = AvatarManager::from_settings(settings)
                .delete_avatar(&public_id)
                .await?;
            println!("{}", result.result);
        }
        AvatarSubcommand::PublicId { url } => {
            println!("{}", extract_public_id(&url, &settings.media.folder));
        }
    }
    Ok(())
}

fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::guess_content_type;
    use std::path::Path;

    #[test]
    fn content_type_from_extension() {
        assert_eq!(guess_content_type(Path::new("me.JPG")), "image/jpeg");
        assert_eq!(guess_content_type(Path::new("me.webp")), "image/webp");
        assert_eq!(guess_content_type(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(guess_content_type(Path::new("noext")), "application/octet-stream");
    }
}
