use super::{AccountName, CommitActivitySeries, Repository};

/// The status message of a query for an account without repositories.
pub const NO_REPOSITORIES_MESSAGE: &str = "No repositories found for this user.";

/// The status message of a query whose commit activity could not be obtained.
pub const INCOMPLETE_COMMIT_ACTIVITY_MESSAGE: &str = "Commit Activity data is incomplete.";

/// The outcome of a successful query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Repositories and commit activity were both retrieved.
    Full,

    /// The account has no repositories.
    Empty,

    /// Repositories were retrieved but the commit activity was incomplete.
    PartialData,
}

/// The aggregate of a query, as rendered by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// The queried account.
    pub(crate) account: AccountName,

    /// Repositories of the account, in upstream order.
    pub(crate) repositories: Vec<Repository>,

    /// Commit activity of the first repository, empty when unavailable.
    pub(crate) commit_activity: CommitActivitySeries,

    /// Diagnostic message for the user.
    pub(crate) message: Option<String>,

    /// The outcome of the query.
    pub(crate) status: QueryStatus,
}

impl QueryResult {
    /// Creates a result holding both the repositories and the commit activity.
    pub fn full(
        account: AccountName,
        repositories: Vec<Repository>,
        commit_activity: CommitActivitySeries,
    ) -> Self {
        Self {
            account,
            repositories,
            commit_activity,
            message: None,
            status: QueryStatus::Full,
        }
    }

    /// Creates a result for an account without repositories.
    pub fn empty(account: AccountName) -> Self {
        Self {
            account,
            repositories: vec![],
            commit_activity: CommitActivitySeries::default(),
            message: Some(NO_REPOSITORIES_MESSAGE.to_string()),
            status: QueryStatus::Empty,
        }
    }

    /// Creates a result holding the repositories without commit activity.
    pub fn partial(account: AccountName, repositories: Vec<Repository>) -> Self {
        Self {
            account,
            repositories,
            commit_activity: CommitActivitySeries::default(),
            message: Some(INCOMPLETE_COMMIT_ACTIVITY_MESSAGE.to_string()),
            status: QueryStatus::PartialData,
        }
    }

    /// Retrieves the queried account.
    pub fn account(&self) -> &AccountName {
        &self.account
    }

    /// Retrieves the repositories.
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Retrieves the commit activity.
    pub fn commit_activity(&self) -> &CommitActivitySeries {
        &self.commit_activity
    }

    /// Retrieves the diagnostic message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Retrieves the outcome of the query.
    pub fn status(&self) -> QueryStatus {
        self.status
    }
}

/// The state of the result slot read by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryState {
    /// No query has been submitted yet.
    #[default]
    Idle,

    /// A query is in flight.
    Fetching {
        /// The queried account.
        account: AccountName,
    },

    /// The latest query succeeded, possibly with partial data.
    Completed(QueryResult),

    /// The latest query failed.
    Failed {
        /// The queried account.
        account: AccountName,
        /// The message displayed to the user.
        message: String,
    },
}

impl QueryState {
    /// Returns true while a query is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Fetching { .. })
    }
}
