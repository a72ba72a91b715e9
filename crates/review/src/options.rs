//! Review run settings.

use std::fmt;

use crate::limits::TokenLimits;
use crate::path_filter::PathFilter;

pub const DEFAULT_LIGHT_MODEL: &str = "gpt-3.5-turbo-0125";
pub const DEFAULT_HEAVY_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_PATH_FILTERS: [&str; 2] = ["!package-lock.json", "!package.json"];

/// Everything that shapes one review run.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    /// When false, the summarize prompt also asks for a triage verdict.
    pub review_simple_changes: bool,
    pub path_filters: PathFilter,
    pub system_message: String,
    pub light_model: String,
    pub heavy_model: String,
    pub model_temperature: f32,
    /// ISO code of the language the answer must be written in.
    pub language: String,
    pub api_base_url: String,
    pub light_token_limits: TokenLimits,
    pub heavy_token_limits: TokenLimits,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            review_simple_changes: false,
            path_filters: PathFilter::new(DEFAULT_PATH_FILTERS),
            system_message: String::new(),
            light_model: DEFAULT_LIGHT_MODEL.into(),
            heavy_model: DEFAULT_HEAVY_MODEL.into(),
            model_temperature: 0.0,
            language: DEFAULT_LANGUAGE.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            light_token_limits: TokenLimits::for_model(DEFAULT_LIGHT_MODEL),
            heavy_token_limits: TokenLimits::for_model(DEFAULT_HEAVY_MODEL),
        }
    }
}

impl ReviewOptions {
    /// Swap the models, recomputing their token budgets.
    pub fn with_models(mut self, light: impl Into<String>, heavy: impl Into<String>) -> Self {
        self.light_model = light.into();
        self.heavy_model = heavy.into();
        self.light_token_limits = TokenLimits::for_model(&self.light_model);
        self.heavy_token_limits = TokenLimits::for_model(&self.heavy_model);
        self
    }

    pub fn light_bot(&self) -> BotOptions {
        BotOptions {
            model: self.light_model.clone(),
            token_limits: self.light_token_limits.clone(),
        }
    }

    pub fn heavy_bot(&self) -> BotOptions {
        BotOptions {
            model: self.heavy_model.clone(),
            token_limits: self.heavy_token_limits.clone(),
        }
    }

    pub fn check_path(&self, path: &str) -> bool {
        let ok = self.path_filters.check(path);
        tracing::debug!(path, ok, "Path filter check");
        ok
    }
}

impl fmt::Display for ReviewOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "review_simple_changes={} light_model={} heavy_model={} temperature={} language={} api_base_url={} light=({}) heavy=({})",
            self.review_simple_changes,
            self.light_model,
            self.heavy_model,
            self.model_temperature,
            self.language,
            self.api_base_url,
            self.light_token_limits,
            self.heavy_token_limits,
        )
    }
}

/// Model selection for a single chat bot.
#[derive(Debug, Clone)]
pub struct BotOptions {
    pub model: String,
    pub token_limits: TokenLimits,
}
