use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use reqwest::{Client, Url, header::ACCEPT};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    AccountName, AnalyzerError, AnalyzerResult, Commit, CommitActivityFetcher,
    CommitActivitySeries, CommitFetcher, Repository, RepositoryFetcher, RepositoryName, Request,
    StdResult,
};

/// The REST production endpoint for GitHub.
pub const GITHUB_REST_ENDPOINT: &str = "https://api.github.com";

/// The user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "github-analyzer";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

#[derive(Deserialize, Debug)]
struct CommitNode {
    sha: String,
    html_url: String,
    commit: CommitDetail,
}

#[derive(Deserialize, Debug)]
struct CommitDetail {
    message: String,
    author: Option<CommitAuthor>,
}

#[derive(Deserialize, Debug)]
struct CommitAuthor {
    name: Option<String>,
    date: Option<DateTime<Utc>>,
}

impl From<CommitNode> for Commit {
    fn from(node: CommitNode) -> Self {
        let (author_name, date) = match node.commit.author {
            Some(author) => (author.name, author.date),
            None => (None, None),
        };

        Self {
            sha: node.sha,
            message: node.commit.message,
            author_name,
            date,
            html_url: node.html_url,
        }
    }
}

/// Fetches repository data from the GitHub REST API.
///
/// Requests are unauthenticated and no timeout is configured: a call the
/// upstream never answers stays pending.
pub struct RestFetcher {
    client: Client,
    endpoint: String,
}

impl RestFetcher {
    /// Creates a new `RestFetcher` instance targeting the given API root.
    pub fn try_new(endpoint: &str, user_agent: &str) -> StdResult<Self> {
        Url::parse(endpoint).with_context(|| format!("Invalid API endpoint: {endpoint}"))?;
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .with_context(|| "Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_body(&self, request: &Request) -> AnalyzerResult<String> {
        let url = format!("{}{}", self.endpoint, request.path());
        debug!("Fetching {request} from {url}");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| AnalyzerError::Transport {
                request: request.to_owned(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Failed to fetch {request}: {status}");
            return Err(AnalyzerError::Fetch {
                request: request.to_owned(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| AnalyzerError::Transport {
            request: request.to_owned(),
            message: e.to_string(),
        })
    }

    /// Decodes a participation series, an absent or null series being empty.
    fn parse_series(request: &Request, series: Option<&Value>) -> AnalyzerResult<Vec<u32>> {
        match series {
            None | Some(Value::Null) => Ok(vec![]),
            Some(series) => Vec::<u32>::deserialize(series).map_err(|e| {
                error!("Failed to parse series of {request}: {e}");
                AnalyzerError::Unknown(format!("Failed to parse series of {request}: {e}"))
            }),
        }
    }

    fn parse<T: DeserializeOwned>(request: &Request, body: &str) -> AnalyzerResult<T> {
        serde_json::from_str(body).map_err(|e| {
            error!("Failed to parse response of {request}: {e}");
            AnalyzerError::Unknown(format!("Failed to parse response of {request}: {e}"))
        })
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for RestFetcher {
    async fn list_repositories(&self, account: &AccountName) -> AnalyzerResult<Vec<Repository>> {
        let request = Request::ListRepositories(account.to_owned());
        let body = self.fetch_body(&request).await?;

        Self::parse(&request, &body)
    }
}

#[async_trait::async_trait]
impl CommitActivityFetcher for RestFetcher {
    async fn get_commit_activity(
        &self,
        account: &AccountName,
        repository: &RepositoryName,
    ) -> AnalyzerResult<CommitActivitySeries> {
        let request = Request::commit_activity(account, repository);
        let incomplete = || {
            warn!("Incomplete commit activity data for {account}/{repository}");
            AnalyzerError::DataIncomplete {
                account: account.to_string(),
                repository: repository.to_string(),
            }
        };
        let body = self.fetch_body(&request).await?;
        if body.trim().is_empty() {
            return Err(incomplete());
        }

        let stats: Value = Self::parse(&request, &body)?;
        let all = Self::parse_series(&request, stats.get("all"))?;
        let owner = Self::parse_series(&request, stats.get("owner"))?;
        if all.is_empty() || owner.is_empty() {
            return Err(incomplete());
        }

        Ok(CommitActivitySeries::new(all, owner))
    }
}

#[async_trait::async_trait]
impl CommitFetcher for RestFetcher {
    async fn list_commits(
        &self,
        account: &AccountName,
        repository: &RepositoryName,
    ) -> AnalyzerResult<Vec<Commit>> {
        let request = Request::list_commits(account, repository);
        let body = self.fetch_body(&request).await?;
        let nodes: Vec<CommitNode> = Self::parse(&request, &body)?;

        Ok(nodes.into_iter().map(Commit::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;

    fn setup_fetcher(server: &MockServer) -> RestFetcher {
        RestFetcher::try_new(&server.base_url(), DEFAULT_USER_AGENT).unwrap()
    }

    fn account() -> AccountName {
        AccountName::try_new("octocat").unwrap()
    }

    fn repository() -> RepositoryName {
        RepositoryName::try_new("hello-world").unwrap()
    }

    fn repository_json(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "full_name": format!("octocat/{name}"),
            "description": format!("Description of {name}"),
            "language": "Rust",
            "stargazers_count": 10,
            "forks_count": 2,
            "created_at": "2025-01-01T00:00:00Z",
            "html_url": format!("https://github.com/octocat/{name}"),
            "fork": false
        })
    }

    #[test]
    fn try_new_fails_with_invalid_endpoint() {
        RestFetcher::try_new("not an url", DEFAULT_USER_AGENT)
            .err()
            .expect("Expected an invalid endpoint error");
    }

    mod list_repositories {
        use super::*;

        #[tokio::test]
        async fn returns_repositories_in_upstream_order() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method("GET").path("/users/octocat/repos");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!([
                        repository_json(3, "zeta"),
                        repository_json(1, "alpha"),
                        repository_json(2, "beta"),
                    ]));
            });
            let fetcher = setup_fetcher(&server);

            let repositories = fetcher.list_repositories(&account()).await.unwrap();

            mock.assert();
            assert_eq!(
                vec![
                    Repository::dummy(3, "zeta"),
                    Repository::dummy(1, "alpha"),
                    Repository::dummy(2, "beta"),
                ],
                repositories
            );
        }

        #[tokio::test]
        async fn returns_empty_list() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method("GET").path("/users/octocat/repos");
                then.status(200).json_body(json!([]));
            });
            let fetcher = setup_fetcher(&server);

            let repositories = fetcher.list_repositories(&account()).await.unwrap();

            mock.assert();
            assert!(repositories.is_empty());
        }

        #[tokio::test]
        async fn fails_with_fetch_error_on_not_found() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method("GET").path("/users/octocat/repos");
                then.status(404)
                    .json_body(json!({ "message": "Not Found" }));
            });
            let fetcher = setup_fetcher(&server);

            let error = fetcher
                .list_repositories(&account())
                .await
                .expect_err("Expected a fetch error");

            mock.assert();
            assert_eq!(Some(404), error.status());
            assert_eq!(
                "Failed to fetch repositories for octocat: 404",
                error.to_string()
            );
        }

        #[tokio::test]
        async fn fails_with_unknown_error_on_malformed_body() {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method("GET").path("/users/octocat/repos");
                then.status(200).body("not json");
            });
            let fetcher = setup_fetcher(&server);

            let error = fetcher
                .list_repositories(&account())
                .await
                .expect_err("Expected a parsing error");

            assert!(matches!(error, AnalyzerError::Unknown(_)));
        }

        #[tokio::test]
        async fn fails_with_unknown_error_on_empty_repository_name() {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method("GET").path("/users/octocat/repos");
                then.status(200).json_body(json!([repository_json(1, "")]));
            });
            let fetcher = setup_fetcher(&server);

            let error = fetcher
                .list_repositories(&account())
                .await
                .expect_err("Expected a parsing error");

            assert!(matches!(error, AnalyzerError::Unknown(_)));
        }

        #[tokio::test]
        async fn fails_with_transport_error_when_unreachable() {
            let fetcher = RestFetcher::try_new("http://127.0.0.1:1", DEFAULT_USER_AGENT).unwrap();

            let error = fetcher
                .list_repositories(&account())
                .await
                .expect_err("Expected a transport error");

            assert!(matches!(error, AnalyzerError::Transport { .. }));
        }
    }

    mod get_commit_activity {
        use super::*;

        const PARTICIPATION_PATH: &str = "/repos/octocat/hello-world/stats/participation";

        async fn fetch_with_body(status: u16, body: &str) -> AnalyzerResult<CommitActivitySeries> {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method("GET").path(PARTICIPATION_PATH);
                then.status(status).body(body);
            });
            let fetcher = setup_fetcher(&server);

            let result = fetcher
                .get_commit_activity(&account(), &repository())
                .await;
            mock.assert();

            result
        }

        #[tokio::test]
        async fn returns_both_series() {
            let server = MockServer::start();
            let all = (0..52).collect::<Vec<u32>>();
            let owner = (0..52).map(|week| week / 2).collect::<Vec<u32>>();
            let mock = server.mock(|when, then| {
                when.method("GET").path(PARTICIPATION_PATH);
                then.status(200)
                    .json_body(json!({ "all": all, "owner": owner }));
            });
            let fetcher = setup_fetcher(&server);

            let series = fetcher
                .get_commit_activity(&account(), &repository())
                .await
                .unwrap();

            mock.assert();
            assert_eq!(CommitActivitySeries::dummy(), series);
        }

        #[tokio::test]
        async fn keeps_upstream_length() {
            let series = fetch_with_body(200, r#"{"all": [1, 2, 3], "owner": [0, 1, 0]}"#)
                .await
                .unwrap();

            assert_eq!(3, series.total_weeks());
        }

        #[tokio::test]
        async fn fails_with_data_incomplete_when_owner_is_missing() {
            let error = fetch_with_body(200, r#"{"all": [1, 2, 3]}"#)
                .await
                .expect_err("Expected incomplete data");

            assert!(matches!(
                error,
                AnalyzerError::DataIncomplete { ref account, ref repository }
                    if account == "octocat" && repository == "hello-world"
            ));
        }

        #[tokio::test]
        async fn fails_with_data_incomplete_when_all_is_missing() {
            let error = fetch_with_body(200, r#"{"owner": [1, 2, 3]}"#)
                .await
                .expect_err("Expected incomplete data");

            assert!(matches!(error, AnalyzerError::DataIncomplete { .. }));
        }

        #[tokio::test]
        async fn fails_with_data_incomplete_when_series_are_empty() {
            let error = fetch_with_body(200, r#"{"all": [], "owner": []}"#)
                .await
                .expect_err("Expected incomplete data");

            assert!(matches!(error, AnalyzerError::DataIncomplete { .. }));
        }

        #[tokio::test]
        async fn fails_with_data_incomplete_while_stats_are_computed() {
            let error = fetch_with_body(202, "{}")
                .await
                .expect_err("Expected incomplete data");

            assert!(matches!(error, AnalyzerError::DataIncomplete { .. }));
        }

        #[tokio::test]
        async fn fails_with_data_incomplete_on_null_or_empty_body() {
            let error = fetch_with_body(200, "null")
                .await
                .expect_err("Expected incomplete data");
            assert!(matches!(error, AnalyzerError::DataIncomplete { .. }));

            let error = fetch_with_body(204, "")
                .await
                .expect_err("Expected incomplete data");
            assert!(matches!(error, AnalyzerError::DataIncomplete { .. }));
        }

        #[tokio::test]
        async fn fails_with_data_incomplete_on_non_object_body() {
            for body in ["[]", "42", r#""computing""#] {
                let error = fetch_with_body(200, body)
                    .await
                    .expect_err("Expected incomplete data");

                assert!(
                    matches!(error, AnalyzerError::DataIncomplete { .. }),
                    "unexpected error for body {body}: {error:?}"
                );
            }
        }

        #[tokio::test]
        async fn fails_with_data_incomplete_when_all_is_null() {
            let error = fetch_with_body(200, r#"{"all": null, "owner": [1]}"#)
                .await
                .expect_err("Expected incomplete data");

            assert!(matches!(error, AnalyzerError::DataIncomplete { .. }));
        }

        #[tokio::test]
        async fn fails_with_fetch_error_on_server_error() {
            let error = fetch_with_body(500, "")
                .await
                .expect_err("Expected a fetch error");

            assert_eq!(Some(500), error.status());
            assert_eq!(
                "Failed to fetch commit activity for octocat/hello-world: 500",
                error.to_string()
            );
        }

        #[tokio::test]
        async fn fails_with_unknown_error_on_malformed_body() {
            let error = fetch_with_body(200, r#"{"all": "many"}"#)
                .await
                .expect_err("Expected a parsing error");

            assert!(matches!(error, AnalyzerError::Unknown(_)));
        }
    }

    mod list_commits {
        use super::*;

        #[tokio::test]
        async fn returns_commits_in_upstream_order() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method("GET").path("/repos/octocat/hello-world/commits");
                then.status(200).json_body(json!([
                    {
                        "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
                        "html_url": "https://github.com/octocat/hello-world/commit/6dcb09b",
                        "commit": {
                            "message": "Fix all the bugs",
                            "author": {
                                "name": "Monalisa Octocat",
                                "email": "support@github.com",
                                "date": "2025-04-14T16:00:49Z"
                            }
                        }
                    },
                    {
                        "sha": "7638417db6d59f3c431d3e1f261cc637155684cd",
                        "html_url": "https://github.com/octocat/hello-world/commit/7638417",
                        "commit": {
                            "message": "Initial commit",
                            "author": null
                        }
                    }
                ]));
            });
            let fetcher = setup_fetcher(&server);

            let commits = fetcher
                .list_commits(&account(), &repository())
                .await
                .unwrap();

            mock.assert();
            assert_eq!(2, commits.len());
            assert_eq!("Fix all the bugs", commits[0].message);
            assert_eq!(Some("Monalisa Octocat"), commits[0].author_name.as_deref());
            assert_eq!(
                Some("2025-04-14T16:00:49+00:00".to_string()),
                commits[0].date.map(|date| date.to_rfc3339())
            );
            assert_eq!("Initial commit", commits[1].message);
            assert_eq!(None, commits[1].author_name);
        }

        #[tokio::test]
        async fn fails_with_fetch_error_on_conflict() {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method("GET").path("/repos/octocat/hello-world/commits");
                then.status(409)
                    .json_body(json!({ "message": "Git Repository is empty." }));
            });
            let fetcher = setup_fetcher(&server);

            let error = fetcher
                .list_commits(&account(), &repository())
                .await
                .expect_err("Expected a fetch error");

            assert_eq!(Some(409), error.status());
        }
    }
}
