use std::fmt::Display;

use super::{AccountName, RepositoryName};

/// A request to the GitHub REST API
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Request {
    /// A request to list the repositories of an account.
    ListRepositories(AccountName),

    /// A request to fetch the weekly commit participation of a repository.
    CommitActivity(RepositoryRequest),

    /// A request to list the recent commits of a repository.
    ListCommits(RepositoryRequest),
}

impl Request {
    /// Creates a `CommitActivity` request for the given account and repository.
    pub fn commit_activity(account: &AccountName, repository: &RepositoryName) -> Self {
        Self::CommitActivity(RepositoryRequest::new(account, repository))
    }

    /// Creates a `ListCommits` request for the given account and repository.
    pub fn list_commits(account: &AccountName, repository: &RepositoryName) -> Self {
        Self::ListCommits(RepositoryRequest::new(account, repository))
    }

    /// Retrieves the path of the endpoint, relative to the API root.
    pub fn path(&self) -> String {
        match self {
            Request::ListRepositories(account) => format!("/users/{account}/repos"),
            Request::CommitActivity(request) => format!(
                "/repos/{}/{}/stats/participation",
                request.account, request.repository
            ),
            Request::ListCommits(request) => {
                format!("/repos/{}/{}/commits", request.account, request.repository)
            }
        }
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::ListRepositories(account) => write!(f, "repositories for {account}"),
            Request::CommitActivity(request) => write!(f, "commit activity for {request}"),
            Request::ListCommits(request) => write!(f, "commits for {request}"),
        }
    }
}

/// A request targeting a single repository of an account
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct RepositoryRequest {
    /// The account owning the repository.
    pub(crate) account: AccountName,

    /// The repository name.
    pub(crate) repository: RepositoryName,
}

impl RepositoryRequest {
    /// Creates a new `RepositoryRequest` for the given account and repository.
    pub fn new(account: &AccountName, repository: &RepositoryName) -> Self {
        Self {
            account: account.to_owned(),
            repository: repository.to_owned(),
        }
    }

    /// Retrieves the account name.
    pub fn account(&self) -> &AccountName {
        &self.account
    }

    /// Retrieves the repository name.
    pub fn repository(&self) -> &RepositoryName {
        &self.repository
    }
}

impl Display for RepositoryRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.account, self.repository)
    }
}
