use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Args;
use owo_colors::OwoColorize;
use serde::de::DeserializeOwned;

use crate::assistant::{AiResponse, ConversationTurn, ResponseGenerator, RetrievedPassage, UserProfile};
use crate::config::Settings;

#[derive(Debug, Args, Clone)]
pub struct AskArgs {
    /// Question for the tutor. Read from stdin when omitted.
    message: Option<String>,
    /// JSON array of earlier turns: [{"sender": "user", "message": "..."}].
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,
    /// JSON array of retrieved passages: [{"content", "documentName", "similarity"}].
    #[arg(long, value_name = "FILE")]
    context: Option<PathBuf>,
    /// JSON object describing the learner.
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,
    /// Print the full response as JSON.
    #[arg(long)]
    json: bool,
}

pub async fn run(args: AskArgs, settings: &Settings) -> anyhow::Result<()> {
    let message = resolve_message(args.message)?;
    let history: Vec<ConversationTurn> = read_json_file(args.history.as_deref())?.unwrap_or_default();
    let context: Vec<RetrievedPassage> = read_json_file(args.context.as_deref())?.unwrap_or_default();
    let profile: UserProfile = read_json_file(args.profile.as_deref())?.unwrap_or_default();

    let generator = ResponseGenerator::from_settings(settings)?;
    let response = generator
        .generate(&message, &history, &profile, &context)
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_text(&response);
    }
    Ok(())
}

fn resolve_message(argument: Option<String>) -> anyhow::Result<String> {
    if let Some(message) = argument {
        if !message.trim().is_empty() {
            return Ok(message);
        }
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("No message provided. Pass MESSAGE or pipe it on stdin.");
    }
    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("Failed to read message from stdin")?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        bail!("No message provided. Pass MESSAGE or pipe it on stdin.");
    }
    Ok(trimmed.to_string())
}

fn read_json_file<T: DeserializeOwned>(path: Option<&Path>) -> anyhow::Result<Option<T>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON in '{}'", path.display()))?;
    Ok(Some(value))
}

fn print_text(response: &AiResponse) {
    println!("{}", response.message);

    let metadata = &response.metadata;
    if !metadata.suggested_topics.is_empty() {
        println!();
        println!("{}", "Suggested topics".bold());
        for topic in &metadata.suggested_topics {
            println!("  - {topic}");
        }
    }
    if !metadata.follow_up_questions.is_empty() {
        println!();
        println!("{}", "Follow-up questions".bold());
        for question in &metadata.follow_up_questions {
            println!("  - {question}");
        }
    }
    if let Some(sources) = metadata.retrieved_context.as_ref().filter(|s| !s.is_empty()) {
        println!();
        println!("{}", "Sources".bold());
        for (index, passage) in sources.iter().enumerate() {
            println!(
                "  [{}] {} ({:.2})",
                index + 1,
                passage.document_name.cyan(),
                passage.similarity
            );
        }
    }
}
