/// Errors raised while talking to GitHub or OpenAI.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream API answered with a non-2xx status.
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// `repo_name` was not of the form `owner/name`.
    #[error("Invalid repository name '{0}', expected owner/name")]
    InvalidRepoName(String),

    /// A required credential is not configured.
    #[error("{0} is not configured")]
    MissingCredential(&'static str),
}
