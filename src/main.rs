use std::io;
use std::process;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use studybuddy::commands::ask::{self, AskArgs};
use studybuddy::commands::avatar::{self, AvatarArgs};
use studybuddy::commands::config::{self, ConfigArgs};
use studybuddy::commands::embed::{self, EmbedArgs};
use studybuddy::commands::{LogArgs, VERSION};
use studybuddy::config::Settings;
use studybuddy::logging;

const ROOT_HELP_EXAMPLES: &str = "Examples:\n  studybuddy ask \"What is photosynthesis?\"\n  studybuddy ask --context passages.json --history turns.json --json \"Explain osmosis\"\n  studybuddy embed --query \"Define entropy\"\n  studybuddy avatar upload me.png\n  studybuddy avatar public-id https://res.cloudinary.com/demo/image/upload/v1/studybuddy-avatars/abc.jpg\n  studybuddy config check";

const ASK_HELP_EXAMPLES: &str = "Examples:\n  studybuddy ask \"What is photosynthesis?\"\n  echo \"Explain mitosis\" | studybuddy ask --json\n  studybuddy ask --context passages.json --history turns.json \"Summarise chapter 2\"";

#[derive(Debug, Parser)]
#[command(
    name = "studybuddy",
    about = "StudyBuddy AI backend helpers",
    version = VERSION,
    after_help = ROOT_HELP_EXAMPLES
)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Ask the tutor a question", after_help = ASK_HELP_EXAMPLES)]
    Ask(AskArgs),
    #[command(about = "Embed text with the configured embedding model")]
    Embed(EmbedArgs),
    #[command(about = "Upload, delete or inspect avatars")]
    Avatar(AvatarArgs),
    #[command(about = "Inspect local config")]
    Config(ConfigArgs),
    #[command(about = "Generate shell completion script")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Ask(args) => ask::run(args, &Settings::load()?).await,
        Commands::Embed(args) => embed::run(args, &Settings::load()?).await,
        Commands::Avatar(args) => avatar::run(args, &Settings::load()?).await,
        Commands::Config(args) => config::run(args, &Settings::load()?),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log.verbosity());

    if let Err(err) = run(cli.command).await {
        eprintln!("{err:#}");
        process::exit(1);
    }
}
