//! quiz-harvester CLI entry point.

use clap::Parser;

use quiz_harvester::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = quiz_harvester::cli::commands::run::execute(cli).await {
        quiz_harvester::cli::handle_error(err, json_mode);
    }
}
