use std::sync::Arc;

use log::{debug, info, warn};

use crate::{
    AccountName, AnalyzerError, AnalyzerResult, AnalyzerState, CommitActivityFetcher,
    CommitActivitySeries, ProfileAnalyzer, QueryResult, QueryState, Repository,
    RepositoryFetcher,
};

/// A sequential analyzer
///
/// Lists the repositories of an account, then fetches the commit activity of
/// the first listed repository. The two calls are never issued in parallel.
pub struct SequentialAnalyzer {
    repository_fetcher: Arc<dyn RepositoryFetcher>,
    commit_activity_fetcher: Arc<dyn CommitActivityFetcher>,
    state: Arc<AnalyzerState>,
}

impl SequentialAnalyzer {
    /// Creates a new `SequentialAnalyzer` instance with the given fetchers.
    pub fn new(
        repository_fetcher: Arc<dyn RepositoryFetcher>,
        commit_activity_fetcher: Arc<dyn CommitActivityFetcher>,
    ) -> Self {
        Self {
            repository_fetcher,
            commit_activity_fetcher,
            state: Arc::new(AnalyzerState::default()),
        }
    }

    async fn fetch_query_result(&self, account: &AccountName) -> AnalyzerResult<QueryResult> {
        let repositories = self.repository_fetcher.list_repositories(account).await?;
        for repository in &repositories {
            debug!("Fetched {repository}");
        }
        let Some(first_repository) = repositories.first() else {
            info!("No repositories found for account {account}");
            return Ok(QueryResult::empty(account.to_owned()));
        };

        let repository_name = first_repository.repository_name().to_owned();
        info!("Fetching commit activity of {account}/{repository_name}");
        let commit_activity = self
            .commit_activity_fetcher
            .get_commit_activity(account, &repository_name)
            .await;

        resolve_query_result(account, repositories, commit_activity)
    }
}

/// Merges the repositories and the commit activity outcome of a query.
///
/// Incomplete commit activity is tolerated and yields a partial result, any
/// other failure aborts the query.
pub fn resolve_query_result(
    account: &AccountName,
    repositories: Vec<Repository>,
    commit_activity: AnalyzerResult<CommitActivitySeries>,
) -> AnalyzerResult<QueryResult> {
    match commit_activity {
        Ok(commit_activity) => Ok(QueryResult::full(
            account.to_owned(),
            repositories,
            commit_activity,
        )),
        Err(e @ AnalyzerError::DataIncomplete { .. }) => {
            warn!("Keeping repositories without commit activity: {e}");
            Ok(QueryResult::partial(account.to_owned(), repositories))
        }
        Err(e) => Err(e),
    }
}

#[async_trait::async_trait]
impl ProfileAnalyzer for SequentialAnalyzer {
    async fn run_query(&self, account: &str) -> AnalyzerResult<QueryResult> {
        let account = AccountName::try_new(account)?;
        let ticket = self.state.begin_query(&account).await;

        let result = self.fetch_query_result(&account).await;
        let state = match &result {
            Ok(query_result) => {
                info!(
                    "Query {ticket} for account {account} completed with status {:?}",
                    query_result.status()
                );
                QueryState::Completed(query_result.to_owned())
            }
            Err(e) => {
                warn!("Query {ticket} for account {account} failed: {e}");
                QueryState::Failed {
                    account: account.to_owned(),
                    message: e.user_message(),
                }
            }
        };
        self.state.complete_query(ticket, state).await;

        result
    }

    async fn current_state(&self) -> QueryState {
        self.state.current_state().await
    }
}
