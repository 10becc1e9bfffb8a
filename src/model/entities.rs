use std::{fmt::Display, ops::Deref};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{AnalyzerError, AnalyzerResult, QueryState};

/// The maximum length of a GitHub account name.
const ACCOUNT_NAME_MAX_LENGTH: usize = 39;

/// The name of a GitHub account.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct AccountName(String);

impl AccountName {
    /// Creates a new `AccountName` from user input, trimming surrounding whitespace.
    pub fn try_new(name: &str) -> AnalyzerResult<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AnalyzerError::validation(
                name,
                "account name must not be empty",
            ));
        }
        if trimmed.len() > ACCOUNT_NAME_MAX_LENGTH {
            return Err(AnalyzerError::validation(
                name,
                "account name must not exceed 39 characters",
            ));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(AnalyzerError::validation(
                name,
                "account name may only contain alphanumeric characters or hyphens",
            ));
        }
        if trimmed.starts_with('-') || trimmed.ends_with('-') {
            return Err(AnalyzerError::validation(
                name,
                "account name must not begin or end with a hyphen",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl Deref for AccountName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a repository.
#[derive(Deserialize, Debug, PartialEq, Eq, Clone, Hash)]
#[serde(try_from = "String")]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Creates a new `RepositoryName`.
    pub fn try_new(name: &str) -> AnalyzerResult<Self> {
        if name.is_empty() {
            return Err(AnalyzerError::validation(
                name,
                "repository name must not be empty",
            ));
        }
        if name.contains('/') || name.chars().any(char::is_whitespace) {
            return Err(AnalyzerError::validation(
                name,
                "repository name must not contain slashes or whitespace",
            ));
        }

        Ok(Self(name.to_string()))
    }
}

impl TryFrom<String> for RepositoryName {
    type Error = AnalyzerError;

    fn try_from(name: String) -> AnalyzerResult<Self> {
        Self::try_new(&name)
    }
}

impl Deref for RepositoryName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The number of stars a repository has.
#[derive(Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct StarsCounter(pub u32);

impl Deref for StarsCounter {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for StarsCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The number of forks a repository has.
#[derive(Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct ForksCounter(pub u32);

impl Deref for ForksCounter {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ForksCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata of a GitHub repository, as listed for an account.
#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Repository {
    /// The stable identifier of the repository.
    id: u64,

    /// The name of the repository.
    #[serde(rename = "name")]
    repository_name: RepositoryName,

    /// The description of the repository.
    description: Option<String>,

    /// The primary language of the repository.
    language: Option<String>,

    /// The number of stars the repository has.
    #[serde(rename = "stargazers_count")]
    total_stars: StarsCounter,

    /// The number of forks of the repository.
    #[serde(rename = "forks_count")]
    total_forks: ForksCounter,

    /// The creation date of the repository.
    created_at: DateTime<Utc>,

    /// The canonical URL of the repository.
    html_url: String,
}

impl Repository {
    /// Retrieves the repository identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Retrieves the repository name.
    pub fn repository_name(&self) -> &RepositoryName {
        &self.repository_name
    }

    /// Retrieves the repository description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Retrieves the primary language of the repository.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Retrieves the total stars of the repository.
    pub fn total_stars(&self) -> &StarsCounter {
        &self.total_stars
    }

    /// Retrieves the total forks of the repository.
    pub fn total_forks(&self) -> &ForksCounter {
        &self.total_forks
    }

    /// Retrieves the creation date of the repository.
    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    /// Retrieves the canonical URL of the repository.
    pub fn html_url(&self) -> &str {
        &self.html_url
    }

    /// Creates a dummy `Repository` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy(id: u64, name: &str) -> Self {
        Self {
            id,
            repository_name: RepositoryName(name.to_string()),
            description: Some(format!("Description of {name}")),
            language: Some("Rust".to_string()),
            total_stars: StarsCounter(10),
            total_forks: ForksCounter(2),
            created_at: DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            html_url: format!("https://github.com/octocat/{name}"),
        }
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repository: {}, Stars: {}, Forks: {}",
            self.repository_name, self.total_stars, self.total_forks
        )
    }
}

/// The number of commits made during one week.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct WeeklyCommits {
    /// The week number, starting at 1 for the oldest week.
    pub week: usize,

    /// The number of commits made during the week.
    pub commits: u32,
}

/// The weekly commit participation of a repository, oldest week first.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct CommitActivitySeries {
    /// Commits per week across all contributors.
    all: Vec<u32>,

    /// Commits per week by the repository owner.
    owner: Vec<u32>,
}

impl CommitActivitySeries {
    /// Creates a new `CommitActivitySeries` instance.
    pub fn new(all: Vec<u32>, owner: Vec<u32>) -> Self {
        Self { all, owner }
    }

    /// Retrieves the commits per week across all contributors.
    pub fn all(&self) -> &[u32] {
        &self.all
    }

    /// Retrieves the commits per week by the repository owner.
    pub fn owner(&self) -> &[u32] {
        &self.owner
    }

    /// Returns true if the series holds no data.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.owner.is_empty()
    }

    /// Returns the number of weeks covered by the series.
    pub fn total_weeks(&self) -> usize {
        self.all.len()
    }

    /// Returns the total number of commits across all contributors.
    pub fn total_commits(&self) -> u64 {
        self.all.iter().map(|commits| u64::from(*commits)).sum()
    }

    /// Returns the chart points of the commits across all contributors.
    pub fn weekly_points(&self) -> Vec<WeeklyCommits> {
        Self::to_points(&self.all)
    }

    /// Returns the chart points of the commits by the repository owner.
    pub fn owner_weekly_points(&self) -> Vec<WeeklyCommits> {
        Self::to_points(&self.owner)
    }

    fn to_points(series: &[u32]) -> Vec<WeeklyCommits> {
        series
            .iter()
            .enumerate()
            .map(|(index, commits)| WeeklyCommits {
                week: index + 1,
                commits: *commits,
            })
            .collect()
    }

    /// Creates a dummy 52 weeks `CommitActivitySeries` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self {
            all: (0..52).collect(),
            owner: (0..52).map(|week| week / 2).collect(),
        }
    }
}

/// A commit of a repository.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Commit {
    /// The commit hash.
    pub sha: String,

    /// The commit message.
    pub message: String,

    /// The name of the commit author.
    pub author_name: Option<String>,

    /// The authoring date.
    pub date: Option<DateTime<Utc>>,

    /// The URL of the commit page.
    pub html_url: String,
}

impl Display for Commit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short_sha = self.sha.get(..7).unwrap_or(self.sha.as_str());
        let summary = self.message.lines().next().unwrap_or_default();
        write!(
            f,
            "{short_sha} {summary} ({})",
            self.author_name.as_deref().unwrap_or("unknown author")
        )
    }
}

/// A ticket identifying a query by its start order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryTicket(u64);

impl Display for QueryTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct QuerySlot {
    latest_ticket: u64,
    state: QueryState,
}

/// The result slot shared by the queries of an analyzer.
///
/// Only the most recently started query may write its outcome, whatever the
/// order in which queries complete.
#[derive(Debug, Default)]
pub struct AnalyzerState {
    slot: RwLock<QuerySlot>,
}

impl AnalyzerState {
    /// Starts a new query, superseding any query still in flight.
    pub async fn begin_query(&self, account: &AccountName) -> QueryTicket {
        let mut slot = self.slot.write().await;
        slot.latest_ticket += 1;
        slot.state = QueryState::Fetching {
            account: account.to_owned(),
        };
        let ticket = QueryTicket(slot.latest_ticket);
        info!("Query {ticket} started for account {account}");

        ticket
    }

    /// Stores the outcome of a query, unless a newer query has started since.
    ///
    /// Returns true if the outcome was stored.
    pub async fn complete_query(&self, ticket: QueryTicket, state: QueryState) -> bool {
        let mut slot = self.slot.write().await;
        if ticket.0 != slot.latest_ticket {
            warn!(
                "Discarding result of superseded query {ticket}, latest query is #{}",
                slot.latest_ticket
            );
            return false;
        }
        slot.state = state;

        true
    }

    /// Retrieves the state exposed to the presentation layer.
    pub async fn current_state(&self) -> QueryState {
        self.slot.read().await.state.to_owned()
    }
}
