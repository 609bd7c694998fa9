use clap::Args;
use serde_json::json;

use crate::config::Settings;
use crate::embedding::EmbeddingGenerator;

#[derive(Debug, Args, Clone)]
pub struct EmbedArgs {
    /// Text to embed.
    text: String,
    /// Treat the text as a search query.
    #[arg(long)]
    query: bool,
}

/// Prints `{"model", "dimensions", "embedding"}`, or `null` when embeddings
/// are not configured.
pub async fn run(args: EmbedArgs, settings: &Settings) -> anyhow::Result<()> {
    let generator = EmbeddingGenerator::from_settings(settings)?;
    let vector = if args.query {
        generator.embed_query(&args.text).await?
    } else {
        generator.embed(&args.text).await?
    };

    let output = match vector {
        Some(embedding) => json!({
            "model": generator.model_name(),
            "dimensions": embedding.len(),
            "embedding": embedding,
        }),
        None => serde_json::Value::Null,
    };
    println!("{output}");
    Ok(())
}
