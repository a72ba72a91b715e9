//! Pull-request web views: a PR lookup and the full summarizer run.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse};
use axum::Form;
use rahnuma_review::bot::OpenAiBot;
use rahnuma_review::github::{GitHubClient, RepoName};
use rahnuma_review::pipeline::code_review;
use rahnuma_review::prompts::Prompts;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Form fields shared by both views. `pr_number` stays a string so a bad
/// value is a 400 with our error body rather than an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct PullRequestForm {
    pub repo_name: String,
    pub pr_number: String,
}

impl PullRequestForm {
    fn parse(&self) -> AppResult<(RepoName, u64)> {
        let number: u64 = self
            .pr_number
            .trim()
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Invalid pr_number '{}'", self.pr_number))
            })?;
        let repo: RepoName = self.repo_name.parse()?;
        Ok((repo, number))
    }
}

fn github_client(state: &AppState) -> AppResult<GitHubClient> {
    let review = &state.config.review;
    Ok(GitHubClient::new(
        state.http.clone(),
        &review.github_api_url,
        review.github_token.as_deref().unwrap_or_default(),
    )?)
}

/// POST /pull-request
pub async fn pull_request(
    State(state): State<AppState>,
    _auth: AuthUser,
    Form(form): Form<PullRequestForm>,
) -> AppResult<Html<String>> {
    let (repo_name, number) = form.parse()?;
    let github = github_client(&state)?;

    let repo = github.get_repo(&repo_name).await?;
    let pull = github.get_pull(&repo_name, number).await?;
    Ok(Html(format!("{repo}<br>{pull}")))
}

/// POST /summarize
///
/// Runs the whole review pipeline and answers with the final summary only.
pub async fn summarize(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<PullRequestForm>,
) -> AppResult<impl IntoResponse> {
    let (repo_name, number) = form.parse()?;
    let review = &state.config.review;

    // Resolve every credential before the first outbound call.
    let github = github_client(&state)?;
    let api_key = review.openai_api_key.as_deref().unwrap_or_default();
    let api_org = review.openai_api_org.as_deref();
    let light = OpenAiBot::new(
        state.http.clone(),
        api_key,
        api_org,
        &review.options,
        review.options.light_bot(),
    )?;
    let heavy = OpenAiBot::new(
        state.http.clone(),
        api_key,
        api_org,
        &review.options,
        review.options.heavy_bot(),
    )?;

    tracing::info!(user_id = auth.user_id, repo = %repo_name, number, "Summarizing pull request");
    let snapshot = github.snapshot(&repo_name, number).await?;
    let report = code_review(
        &light,
        &heavy,
        &review.options,
        &Prompts::default(),
        &snapshot,
    )
    .await;

    if !report.failed.is_empty() {
        tracing::warn!(failed = ?report.failed, "Some files could not be summarized");
    }

    Ok((
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        report.summary,
    ))
}
