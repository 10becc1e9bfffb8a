use crate::{
    AccountName, AnalyzerResult, Commit, CommitActivitySeries, Repository, RepositoryName,
};

/// A trait for listing the repositories of an account.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryFetcher: Sync + Send {
    /// Lists the repositories of the account, in upstream order.
    ///
    /// Only the first page returned by the API is used.
    async fn list_repositories(&self, account: &AccountName) -> AnalyzerResult<Vec<Repository>>;
}

/// A trait for fetching the weekly commit participation of a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CommitActivityFetcher: Sync + Send {
    /// Fetches the commit activity of the repository.
    ///
    /// Fails with `AnalyzerError::DataIncomplete` when the API answers without both series.
    async fn get_commit_activity(
        &self,
        account: &AccountName,
        repository: &RepositoryName,
    ) -> AnalyzerResult<CommitActivitySeries>;
}

/// A trait for listing the recent commits of a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CommitFetcher: Sync + Send {
    /// Lists the most recent commits of the repository, newest first.
    async fn list_commits(
        &self,
        account: &AccountName,
        repository: &RepositoryName,
    ) -> AnalyzerResult<Vec<Commit>>;
}
