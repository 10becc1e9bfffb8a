use crate::{AnalyzerResult, QueryResult, QueryState};

/// A trait for analyzing the profile of a GitHub account.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProfileAnalyzer: Sync + Send {
    /// Runs a query for the account and returns its aggregated result.
    async fn run_query(&self, account: &str) -> AnalyzerResult<QueryResult>;

    /// Retrieves the state of the most recently started query.
    async fn current_state(&self) -> QueryState;
}
