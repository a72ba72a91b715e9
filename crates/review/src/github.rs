//! Minimal GitHub REST client: just the calls the summarizer needs.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ReviewError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "rahnuma-review";

/// `owner/name` repository coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoName {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReviewError::InvalidRepoName(s.to_string());
        let valid_segment = |seg: &str| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };

        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        if !valid_segment(owner) || !valid_segment(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub html_url: String,
    pub default_branch: Option<String>,
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    pub sha: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub state: String,
    pub base: GitRef,
    pub head: GitRef,
}

impl fmt::Display for PullRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PR #{}: {}", self.number, self.title)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    #[serde(default)]
    pub status: String,
    /// Absent for binary files and very large diffs.
    pub patch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
}

/// Result of `GET /repos/{owner}/{repo}/compare/{base}...{head}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Comparison {
    #[serde(default)]
    pub files: Vec<ChangedFile>,
    #[serde(default)]
    pub commits: Vec<CommitSummary>,
    pub diff_url: Option<String>,
}

/// Everything the pipeline reads from GitHub for one pull request.
#[derive(Debug, Clone)]
pub struct PullRequestSnapshot {
    pub repo: Repository,
    pub pull: PullRequest,
    pub comparison: Comparison,
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(client: reqwest::Client, base_url: &str, token: &str) -> Result<Self, ReviewError> {
        if token.trim().is_empty() {
            return Err(ReviewError::MissingCredential("GITHUB_TOKEN"));
        }
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ReviewError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GitHub request");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::Api {
                service: "GitHub",
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    pub async fn get_repo(&self, repo: &RepoName) -> Result<Repository, ReviewError> {
        self.get_json(&format!("/repos/{}/{}", repo.owner, repo.name))
            .await
    }

    pub async fn get_pull(&self, repo: &RepoName, number: u64) -> Result<PullRequest, ReviewError> {
        self.get_json(&format!("/repos/{}/{}/pulls/{number}", repo.owner, repo.name))
            .await
    }

    pub async fn compare(
        &self,
        repo: &RepoName,
        base: &str,
        head: &str,
    ) -> Result<Comparison, ReviewError> {
        self.get_json(&format!(
            "/repos/{}/{}/compare/{base}...{head}",
            repo.owner, repo.name
        ))
        .await
    }

    /// Fetch the repository, the pull request and its base...head comparison.
    #[tracing::instrument(skip(self), fields(repo = %repo))]
    pub async fn snapshot(
        &self,
        repo: &RepoName,
        number: u64,
    ) -> Result<PullRequestSnapshot, ReviewError> {
        let repository = self.get_repo(repo).await?;
        let pull = self.get_pull(repo, number).await?;
        let comparison = self.compare(repo, &pull.base.sha, &pull.head.sha).await?;

        tracing::info!(
            files = comparison.files.len(),
            commits = comparison.commits.len(),
            "Fetched pull request comparison"
        );

        Ok(PullRequestSnapshot {
            repo: repository,
            pull,
            comparison,
        })
    }
}
