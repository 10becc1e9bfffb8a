use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use log::{debug, error, info};

use github_analyzer::{
    AccountName, CommitFetcher, DEFAULT_USER_AGENT, GITHUB_REST_ENDPOINT, ProfileAnalyzer,
    QueryResult, RepositoryName, RestFetcher, SequentialAnalyzer, StdResult,
};

/// Maximum number of description characters displayed per repository.
const DESCRIPTION_DISPLAY_LENGTH: usize = 50;

/// Command line arguments for the GitHub profile analyzer
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// GitHub username to analyze
    username: String,

    /// Root URL of the GitHub REST API
    #[arg(short, long, env = "GITHUB_API_ENDPOINT", default_value = GITHUB_REST_ENDPOINT)]
    api_endpoint: String,

    /// User agent sent to the GitHub REST API
    #[arg(short, long, env = "GITHUB_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Also list the recent commits of the analyzed repository
    #[arg(long)]
    show_commits: bool,
}

#[tokio::main]
async fn main() -> StdResult<()> {
    env_logger::init();
    info!("Starting GitHub profile analysis");
    let args = Args::parse();
    debug!("Arguments: {args:?}");

    analyze(&args).await?;
    info!("Analysis completed");

    Ok(())
}

async fn analyze(args: &Args) -> StdResult<()> {
    let fetcher = Arc::new(RestFetcher::try_new(&args.api_endpoint, &args.user_agent)?);
    let analyzer = SequentialAnalyzer::new(fetcher.clone(), fetcher.clone());
    let result = analyzer.run_query(&args.username).await.map_err(|e| {
        error!("Analysis failed: {e}");
        anyhow!(e.user_message())
    })?;

    print_query_result(&result);
    if args.show_commits {
        if let Some(repository) = result.repositories().first() {
            print_commits(fetcher.as_ref(), result.account(), repository.repository_name()).await;
        }
    }

    Ok(())
}

fn truncate_description(description: &str) -> String {
    let truncated = description
        .chars()
        .take(DESCRIPTION_DISPLAY_LENGTH)
        .collect::<String>();

    format!("{truncated}...")
}

fn print_query_result(result: &QueryResult) {
    if !result.repositories().is_empty() {
        println!("Repositories of {}:", result.account());
    }
    for repository in result.repositories() {
        println!("  {} <{}>", repository.repository_name(), repository.html_url());
        if let Some(description) = repository.description() {
            println!("    {}", truncate_description(description));
        }
        let mut badges = vec![];
        if let Some(language) = repository.language() {
            badges.push(language.to_string());
        }
        if **repository.total_stars() > 0 {
            badges.push(format!("stars: {}", repository.total_stars()));
        }
        if **repository.total_forks() > 0 {
            badges.push(format!("forks: {}", repository.total_forks()));
        }
        if !badges.is_empty() {
            println!("    [{}]", badges.join(", "));
        }
    }

    let commit_activity = result.commit_activity();
    if !commit_activity.is_empty() {
        println!(
            "Commit activity ({} commits over {} weeks):",
            commit_activity.total_commits(),
            commit_activity.total_weeks()
        );
        for point in commit_activity.weekly_points() {
            println!("  week {:>2}: {}", point.week, point.commits);
        }
    }

    if let Some(message) = result.message() {
        println!("{message}");
    }
}

async fn print_commits(
    fetcher: &dyn CommitFetcher,
    account: &AccountName,
    repository: &RepositoryName,
) {
    match fetcher.list_commits(account, repository).await {
        Ok(commits) => {
            println!("Recent commits of {account}/{repository}:");
            for commit in commits {
                println!("  {commit}");
            }
        }
        Err(e) => {
            error!("Failed to list commits: {e}");
            eprintln!("Error: {}", e.user_message());
        }
    }
}
