use std::process;

use clap::Parser;
use studybuddy::commands::ask::{self, AskArgs};
use studybuddy::commands::{LogArgs, VERSION};
use studybuddy::config::Settings;
use studybuddy::logging;

#[derive(Debug, Parser)]
#[command(name = "sbask", about = "Ask the StudyBuddy tutor a question", version = VERSION)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,
    #[command(flatten)]
    ask: AskArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log.verbosity());

    let result = match Settings::load() {
        Ok(settings) => ask::run(cli.ask, &settings).await,
        Err(err) => Err(err.into()),
    };
    if let Err(err) = result {
        eprintln!("{err:#}");
        process::exit(1);
    }
}
