use clap::Parser;
use dotenv::dotenv;
use std::error::Error;
use tracing::{error, warn};

use github_triage::{
    timestamp, Args, ConfigFile, GitHubSearcher, QueryOrchestrator, RunConfig, TerminalPrompter,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let args = Args::parse();
    let file = ConfigFile::load(&args.config)?;

    // Initialize the tracing logger at the configured verbosity
    tracing_subscriber::fmt()
        .with_max_level(file.log_level()?)
        .with_writer(std::io::stderr)
        .init();

    for key in file.duplicates() {
        warn!("Duplicate config key {} will be ignored.", key);
    }

    let config = RunConfig::from_file(&file, args.token, args.api_base)?;
    println!("Read config:\n{}", config);

    let searcher = GitHubSearcher::from_config(&config)?;
    let started = timestamp::now_eastern();
    let mut prompter = TerminalPrompter::new();

    match QueryOrchestrator::new(&config, &searcher, started)
        .run(&mut prompter)
        .await
    {
        Ok(report) => {
            println!(
                "Accepted {} repositories. Records written to {}",
                report.accepted.len(),
                report.record_path.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
