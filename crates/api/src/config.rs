use rahnuma_review::github::DEFAULT_API_URL;
use rahnuma_review::options::{
    ReviewOptions, DEFAULT_API_BASE_URL, DEFAULT_HEAVY_MODEL, DEFAULT_LIGHT_MODEL,
    DEFAULT_PATH_FILTERS,
};
use rahnuma_review::path_filter::PathFilter;

use crate::auth::jwt::JwtConfig;

/// Default cap on multipart upload bodies (20 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`, review runs are slow).
    pub request_timeout_secs: u64,
    /// Upper bound for reference upload bodies.
    pub max_upload_bytes: usize,
    /// Timeout for fetching reference URLs and extracting uploaded files (default: `10`).
    pub url_fetch_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub review: ReviewConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `8000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `120`                      |
    /// | `MAX_UPLOAD_BYTES`       | `20971520`                 |
    /// | `URL_FETCH_TIMEOUT_SECS` | `10`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let url_fetch_timeout_secs: u64 = std::env::var("URL_FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("URL_FETCH_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            url_fetch_timeout_secs,
            jwt: JwtConfig::from_env(),
            review: ReviewConfig::from_env(),
        }
    }
}

/// Credentials and options for the pull-request summarizer.
///
/// Missing credentials are not a startup error: the review views answer
/// 503 until they are configured.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub openai_api_key: Option<String>,
    pub openai_api_org: Option<String>,
    pub options: ReviewOptions,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: DEFAULT_API_URL.to_string(),
            openai_api_key: None,
            openai_api_org: None,
            options: ReviewOptions::default(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ReviewConfig {
    /// Load review settings from the environment.
    ///
    /// | Env Var                    | Default                              |
    /// |----------------------------|--------------------------------------|
    /// | `GITHUB_TOKEN`             | unset (views return 503)             |
    /// | `GITHUB_API_URL`           | `https://api.github.com`             |
    /// | `OPENAI_API_KEY`           | unset (views return 503)             |
    /// | `OPENAI_API_ORG`           | unset                                |
    /// | `OPENAI_API_BASE_URL`      | `https://api.openai.com/v1`          |
    /// | `OPENAI_LIGHT_MODEL`       | `gpt-3.5-turbo-0125`                 |
    /// | `OPENAI_HEAVY_MODEL`       | `gpt-3.5-turbo`                      |
    /// | `OPENAI_MODEL_TEMPERATURE` | `0.0`                                |
    /// | `REVIEW_LANGUAGE`          | `en-US`                              |
    /// | `REVIEW_PATH_FILTERS`      | `!package-lock.json,!package.json`   |
    /// | `REVIEW_SIMPLE_CHANGES`    | `false`                              |
    /// | `REVIEW_SYSTEM_MESSAGE`    | empty                                |
    pub fn from_env() -> Self {
        let light = non_empty_var("OPENAI_LIGHT_MODEL").unwrap_or_else(|| DEFAULT_LIGHT_MODEL.into());
        let heavy = non_empty_var("OPENAI_HEAVY_MODEL").unwrap_or_else(|| DEFAULT_HEAVY_MODEL.into());

        let model_temperature: f32 = std::env::var("OPENAI_MODEL_TEMPERATURE")
            .unwrap_or_else(|_| "0.0".into())
            .parse()
            .expect("OPENAI_MODEL_TEMPERATURE must be a valid f32");

        let review_simple_changes: bool = std::env::var("REVIEW_SIMPLE_CHANGES")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("REVIEW_SIMPLE_CHANGES must be true or false");

        let path_filters = match std::env::var("REVIEW_PATH_FILTERS") {
            Ok(list) => PathFilter::parse_list(&list),
            Err(_) => PathFilter::new(DEFAULT_PATH_FILTERS),
        };

        let options = ReviewOptions {
            review_simple_changes,
            path_filters,
            system_message: std::env::var("REVIEW_SYSTEM_MESSAGE").unwrap_or_default(),
            model_temperature,
            language: non_empty_var("REVIEW_LANGUAGE").unwrap_or_else(|| "en-US".into()),
            api_base_url: non_empty_var("OPENAI_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.into()),
            ..ReviewOptions::default()
        }
        .with_models(light, heavy);

        tracing::debug!(%options, "Loaded review options");

        Self {
            github_token: non_empty_var("GITHUB_TOKEN"),
            github_api_url: non_empty_var("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_api_org: non_empty_var("OPENAI_API_ORG"),
            options,
        }
    }
}
