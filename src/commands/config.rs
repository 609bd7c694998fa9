use clap::{Args, Subcommand};

use crate::config::Settings;

#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand, Clone)]
enum ConfigSubcommand {
    /// Validate the config file and show which services are enabled.
    Check,
}

pub fn run(args: ConfigArgs, settings: &Settings) -> anyhow::Result<()> {
    match args.command {
        ConfigSubcommand::Check => {
            match &settings.config_path {
                Some(path) => println!("config OK: {}", path.display()),
                None => println!("config OK: defaults (no config file)"),
            }
            let chat = settings.openai_api_key.is_some();
            println!("chat: {} (model {})", status(chat), settings.ai.model);
            println!(
                "embeddings: {} (model {})",
                status(chat),
                settings.ai.embedding_model
            );
            println!(
                "media: {} (folder {})",
                status(settings.cloudinary.is_some()),
                settings.media.folder
            );
            Ok(())
        }
    }
}

fn status(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
