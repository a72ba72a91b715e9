//! Values substituted into prompt templates.

/// Prompt variables. Each field replaces the `$name` placeholder of the same
/// name when a template is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub system_message: String,
    pub title: String,
    pub description: String,
    pub raw_summary: String,
    pub short_summary: String,
    pub filename: String,
    pub file_content: String,
    pub file_diff: String,
    pub patches: String,
    pub diff: String,
    pub comment_chain: String,
    pub comment: String,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            system_message: String::new(),
            title: "no title provided".into(),
            description: "no description provided".into(),
            raw_summary: String::new(),
            short_summary: String::new(),
            filename: String::new(),
            file_content: "file contents cannot be provided".into(),
            file_diff: "file diff cannot be provided".into(),
            patches: String::new(),
            diff: "no diff".into(),
            comment_chain: "no other comments on this patch".into(),
            comment: "no comment provided".into(),
        }
    }
}

impl Inputs {
    /// Substitute every known placeholder in `template`.
    ///
    /// Longer names that share a prefix (`$comment_chain`, `$file_diff`) are
    /// replaced before the shorter ones (`$comment`, `$diff`).
    pub fn render(&self, template: &str) -> String {
        if template.is_empty() {
            return String::new();
        }

        let replacements: [(&str, &str); 12] = [
            ("$system_message", &self.system_message),
            ("$title", &self.title),
            ("$description", &self.description),
            ("$raw_summary", &self.raw_summary),
            ("$short_summary", &self.short_summary),
            ("$filename", &self.filename),
            ("$file_content", &self.file_content),
            ("$file_diff", &self.file_diff),
            ("$patches", &self.patches),
            ("$diff", &self.diff),
            ("$comment_chain", &self.comment_chain),
            ("$comment", &self.comment),
        ];

        replacements
            .iter()
            .fold(template.to_string(), |acc, (key, value)| acc.replace(key, value))
    }
}
