//! Prompt templates for the summarizer.

use crate::inputs::Inputs;

const SUMMARIZE_FILE_DIFF: &str = r#" ## GitHub PR Title

`$title`

## Description

```
$description
```

## Diff

```diff
$file_diff
```

## Instructions

I would like you to succinctly summarize the diff within 100 words.
If applicable, your summary should include a note about alterations
to the signatures of exported functions, global data structures and
variables, and any changes that might affect the external interface or
behavior of the code.
"#;

const TRIAGE_FILE_DIFF: &str = r#"Below the summary, I would also like you to triage the diff as `NEEDS_REVIEW` or
`APPROVED` based on the following criteria:

- If the diff involves any modifications to the logic or functionality, even if they
  seem minor, triage it as `NEEDS_REVIEW`. This includes changes to control structures,
  function calls, or variable assignments that might impact the behavior of the code.
- If the diff only contains very minor changes that don't affect the code logic, such as
  fixing typos, formatting, or renaming variables for clarity, triage it as `APPROVED`.

Please evaluate the diff thoroughly and take into account factors such as the number of
lines changed, the potential impact on the overall system, and the likelihood of
introducing new bugs or security vulnerabilities.
When in doubt, always err on the side of caution and triage the diff as `NEEDS_REVIEW`.

You must strictly follow the format below for triaging the diff:
[TRIAGE]: <NEEDS_REVIEW or APPROVED>

Important:
- In your summary do not mention that the file needs a through review or caution about
  potential issues.
- Do not provide any reasoning why you triaged the diff as `NEEDS_REVIEW` or `APPROVED`.
- Do not mention that these changes affect the logic or functionality of the code in
  the summary. You must only use the triage status format above to indicate that.
"#;

const SUMMARIZE_CHANGESETS: &str = r#"Provided below are changesets in this pull request. Changesets
are in chronlogical order and new changesets are appended to the
end of the list. The format consists of filename(s) and the summary
of changes for those files. There is a separator between each changeset.
Your task is to deduplicate and group together files with
related/similar changes into a single changeset. Respond with the updated
changesets using the same format as the input.
```
$raw_summary
```
"#;

const SUMMARIZE_PREFIX: &str = r#"Here is the summary of changes you have generated for files:
    ```
    $raw_summary
    ```
"#;

/// Prompt set for one review run.
///
/// `summarize` is appended to the summary prefix for the final call and is
/// empty unless configured.
#[derive(Debug, Clone, Default)]
pub struct Prompts {
    pub summarize: String,
}

impl Prompts {
    pub fn new(summarize: impl Into<String>) -> Self {
        Self {
            summarize: summarize.into(),
        }
    }

    pub fn render_summarize_file_diff(&self, inputs: &Inputs, review_simple_changes: bool) -> String {
        let mut prompt = SUMMARIZE_FILE_DIFF.to_string();
        if !review_simple_changes {
            prompt.push_str(TRIAGE_FILE_DIFF);
        }
        inputs.render(&prompt)
    }

    pub fn render_summarize_changesets(&self, inputs: &Inputs) -> String {
        inputs.render(SUMMARIZE_CHANGESETS)
    }

    pub fn render_summarize(&self, inputs: &Inputs) -> String {
        inputs.render(&format!("{SUMMARIZE_PREFIX}{}", self.summarize))
    }
}
