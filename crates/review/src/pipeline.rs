//! The review run: filter, split, summarize per file, merge, summarize again.
//!
//! Everything runs sequentially. Chat failures never abort the run; they are
//! logged and the affected file is listed in [`ReviewReport::failed`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::bot::ChatBot;
use crate::diff::{self, Hunk};
use crate::github::{ChangedFile, PullRequestSnapshot};
use crate::inputs::Inputs;
use crate::options::ReviewOptions;
use crate::prompts::Prompts;

/// Files per changeset-merge request.
pub const SUMMARY_BATCH_SIZE: usize = 10;

static TRIAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[TRIAGE\]:\s*(NEEDS_REVIEW|APPROVED)").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub filename: String,
    pub summary: String,
    pub needs_review: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewReport {
    /// Final summary from the heavy model. Empty if that call failed.
    pub summary: String,
    /// Markdown `<details>` blocks describing what was reviewed.
    pub status_message: String,
    pub summaries: Vec<FileSummary>,
    /// `"{filename} ({reason})"` for every file that produced no summary.
    pub failed: Vec<String>,
}

/// A selected file with at least one parsable hunk.
struct FileChange<'a> {
    filename: &'a str,
    patch: &'a str,
    hunks: Vec<Hunk>,
}

/// Pull the triage verdict out of a summary.
///
/// Returns the summary with the marker removed and `Some(needs_review)`, or
/// the untouched text and `None` when no marker is present.
pub fn parse_triage(response: &str) -> (String, Option<bool>) {
    match TRIAGE_RE.captures(response) {
        Some(caps) => {
            let needs_review = &caps[1] == "NEEDS_REVIEW";
            let summary = TRIAGE_RE.replace_all(response, "").trim().to_string();
            (summary, Some(needs_review))
        }
        None => (response.to_string(), None),
    }
}

/// Render the status block: commit range, selected files with their hunk
/// counts and files dropped by the path filter.
pub fn status_message(
    base_sha: &str,
    head_sha: &str,
    selected: &[(&str, usize)],
    ignored: &[&str],
) -> String {
    let mut msg = format!(
        "<details>\n<summary>Commits</summary>\nFiles that changed from the base of the PR and between {base_sha} and {head_sha} commits.\n</details>\n"
    );

    if !selected.is_empty() {
        let list: Vec<String> = selected
            .iter()
            .map(|(name, hunks)| format!("{name} ({hunks})"))
            .collect();
        msg.push_str(&format!(
            "<details>\n<summary>Files selected ({})</summary>\n\n* {}\n</details>\n",
            selected.len(),
            list.join("\n* ")
        ));
    }

    if !ignored.is_empty() {
        msg.push_str(&format!(
            "<details>\n<summary>Files ignored due to filter ({})</summary>\n\n* {}\n\n</details>\n",
            ignored.len(),
            ignored.join("\n* ")
        ));
    }

    msg
}

/// Split changed files into those the path filter keeps and those it drops.
fn partition_files<'a>(
    files: &'a [ChangedFile],
    options: &ReviewOptions,
) -> (Vec<&'a ChangedFile>, Vec<&'a ChangedFile>) {
    files.iter().partition(|f| options.check_path(&f.filename))
}

fn collect_changes<'a>(selected: &[&'a ChangedFile]) -> Vec<FileChange<'a>> {
    selected
        .iter()
        .filter_map(|file| {
            let patch = file.patch.as_deref()?;
            let hunks = diff::hunks(patch);
            if hunks.is_empty() {
                tracing::debug!(filename = %file.filename, "No parsable hunks, skipping");
                return None;
            }
            Some(FileChange {
                filename: &file.filename,
                patch,
                hunks,
            })
        })
        .collect()
}

async fn summarize_file(
    bot: &dyn ChatBot,
    prompts: &Prompts,
    options: &ReviewOptions,
    inputs: &Inputs,
    change: &FileChange<'_>,
) -> Result<FileSummary, String> {
    let filename = change.filename;
    if change.patch.is_empty() {
        tracing::info!(filename, "File diff is empty, skipping");
        return Err(format!("{filename} (empty diff)"));
    }

    let ins = Inputs {
        filename: filename.to_string(),
        file_diff: change.patch.to_string(),
        ..inputs.clone()
    };
    let prompt = prompts.render_summarize_file_diff(&ins, options.review_simple_changes);

    let reply = match bot.chat(&prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(filename, error = %e, "Summarize request failed");
            return Err(format!("{filename} (error from openai: {e})"));
        }
    };

    if reply.text.is_empty() {
        tracing::warn!(filename, "Nothing obtained from openai");
        return Err(format!("{filename} (nothing obtained from openai)"));
    }

    if !options.review_simple_changes {
        if let (summary, Some(needs_review)) = parse_triage(&reply.text) {
            tracing::debug!(filename, needs_review, "Triage parsed");
            return Ok(FileSummary {
                filename: filename.to_string(),
                summary,
                needs_review,
            });
        }
    }

    Ok(FileSummary {
        filename: filename.to_string(),
        summary: reply.text,
        needs_review: true,
    })
}

/// Fold file summaries into `inputs.raw_summary`, asking the heavy bot to
/// deduplicate after every batch.
async fn merge_summaries(
    bot: &dyn ChatBot,
    prompts: &Prompts,
    inputs: &mut Inputs,
    summaries: &[FileSummary],
) {
    for batch in summaries.chunks(SUMMARY_BATCH_SIZE) {
        for s in batch {
            inputs
                .raw_summary
                .push_str(&format!("---\n{}: {}\n", s.filename, s.summary));
        }

        let prompt = prompts.render_summarize_changesets(inputs);
        match bot.chat(&prompt).await {
            Ok(reply) if !reply.text.is_empty() => inputs.raw_summary = reply.text,
            Ok(_) => tracing::warn!("Changeset merge returned nothing"),
            Err(e) => tracing::warn!(error = %e, "Changeset merge failed"),
        }
    }
}

/// Summarize a pull request.
///
/// `light` writes the per-file summaries, `heavy` merges them and writes the
/// final summary.
#[tracing::instrument(skip_all, fields(pr = snapshot.pull.number, repo = %snapshot.repo.full_name))]
pub async fn code_review(
    light: &dyn ChatBot,
    heavy: &dyn ChatBot,
    options: &ReviewOptions,
    prompts: &Prompts,
    snapshot: &PullRequestSnapshot,
) -> ReviewReport {
    let pull = &snapshot.pull;
    let comparison = &snapshot.comparison;

    let mut inputs = Inputs {
        system_message: options.system_message.clone(),
        title: pull.title.clone(),
        description: pull
            .body
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or("No description provided")
            .to_string(),
        ..Inputs::default()
    };

    if comparison.files.is_empty() {
        tracing::info!("Skipped: files data is missing");
    }
    if comparison.commits.is_empty() {
        tracing::info!("Skipped: commits is null");
    }

    let (selected, ignored) = partition_files(&comparison.files, options);
    let changes = collect_changes(&selected);
    if changes.is_empty() {
        tracing::info!("Skipped: no files to review");
    }

    let selected_counts: Vec<(&str, usize)> =
        changes.iter().map(|c| (c.filename, c.hunks.len())).collect();
    let ignored_names: Vec<&str> = ignored.iter().map(|f| f.filename.as_str()).collect();
    let status_message =
        status_message(&pull.base.sha, &pull.head.sha, &selected_counts, &ignored_names);

    let mut summaries = Vec::new();
    let mut failed = Vec::new();
    for change in &changes {
        tracing::info!(filename = change.filename, "Summarizing file");
        match summarize_file(light, prompts, options, &inputs, change).await {
            Ok(summary) => summaries.push(summary),
            Err(reason) => failed.push(reason),
        }
    }

    merge_summaries(heavy, prompts, &mut inputs, &summaries).await;

    let summary = match heavy.chat(&prompts.render_summarize(&inputs)).await {
        Ok(reply) => reply.text,
        Err(e) => {
            tracing::warn!(error = %e, "Final summary failed");
            String::new()
        }
    };

    tracing::info!(
        reviewed = summaries.len(),
        failed = failed.len(),
        ignored = ignored_names.len(),
        "Review finished"
    );

    ReviewReport {
        summary,
        status_message,
        summaries,
        failed,
    }
}
