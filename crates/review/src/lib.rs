//! Pull-request summarizer.
//!
//! Fetches a pull request from GitHub, splits each changed file's patch into
//! hunks, asks an OpenAI chat model to summarize and triage every file, then
//! merges the per-file summaries into one final summary.
//!
//! - [`github`] -- minimal GitHub REST client (repository, pull, compare).
//! - [`bot`] -- the [`bot::ChatBot`] seam and its OpenAI implementation.
//! - [`diff`] -- hunk splitting and line renumbering.
//! - [`path_filter`] -- glob include/exclude rules for changed paths.
//! - [`prompts`] / [`inputs`] -- prompt templates and `$placeholder` rendering.
//! - [`pipeline`] -- the sequential review run.

pub mod bot;
pub mod diff;
pub mod error;
pub mod github;
pub mod inputs;
pub mod limits;
pub mod options;
pub mod path_filter;
pub mod pipeline;
pub mod prompts;

pub use error::ReviewError;
