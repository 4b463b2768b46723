use clap::Parser;
use page_discussions::bridge::{Bridge, RunOutcome};
use page_discussions::error::Result;
use page_discussions::github::GitHubClient;
use page_discussions::site::HttpFetcher;
use std::process::ExitCode;
use std::time::Duration;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(outcome) => {
            report(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<RunOutcome> {
    let config = args.into_config()?;
    config.validate()?;
    ::log::info!(
        "Syncing {}/{} category {:?}",
        config.repo_owner,
        config.repo_name,
        config.category_name
    );

    let timeout = Duration::from_secs(config.timeout_secs);
    let client = GitHubClient::new(
        &config.graphql_url,
        &config.token,
        &config.repo_owner,
        &config.repo_name,
        timeout,
    )?
    .with_max_discussions(config.max_discussions)
    .with_max_comments(config.max_comments);
    let fetcher = HttpFetcher::new(timeout)?;

    let bridge = Bridge::new(&config, &client, Box::new(fetcher))?;
    bridge.run().await
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Synced(report) => println!(
            "got {} pages from site. found {} unsynced discussions. created {}, failed {}.",
            report.pages, report.unsynced, report.created, report.failed
        ),
        RunOutcome::Saved { discussions, path } => {
            println!("wrote {} discussions to {}", discussions, path.display())
        }
        RunOutcome::Ignored(event) => println!("unhandled event name {event:?}. doing nothing."),
    }
}
