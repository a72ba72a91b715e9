//! Per-model token budgets.

use std::fmt;

/// Token budget for one chat model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLimits {
    pub max_tokens: u32,
    pub response_tokens: u32,
    /// What is left for the prompt after the response and a safety margin.
    pub request_tokens: u32,
    pub knowledge_cut_off: &'static str,
}

/// Headroom kept between the request budget and the model maximum.
const REQUEST_MARGIN: u32 = 100;

impl TokenLimits {
    pub fn for_model(model: &str) -> Self {
        let (max_tokens, response_tokens) = match model {
            "gpt-4-32k" => (32_600, 4_000),
            "gpt-3.5-turbo-16k" => (16_300, 3_000),
            "gpt-4" => (8_000, 2_000),
            "gpt-3.5-turbo-0125" => (16_385, 4_096),
            _ => (4_000, 1_000),
        };

        Self {
            max_tokens,
            response_tokens,
            request_tokens: max_tokens - response_tokens - REQUEST_MARGIN,
            knowledge_cut_off: "2021-09-01",
        }
    }
}

impl fmt::Display for TokenLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max_tokens={}, request_tokens={}, response_tokens={}",
            self.max_tokens, self.request_tokens, self.response_tokens
        )
    }
}
