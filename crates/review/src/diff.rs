//! Unified-diff hunk handling.
//!
//! GitHub's compare API hands back each file's patch as a string of one or
//! more `@@ -a,b +c,d @@` hunks. These helpers split that string, work out
//! the line ranges of each hunk and rebuild the hunk as an "old" and a "new"
//! side, with new-side lines prefixed by their line number.

use std::sync::LazyLock;

use regex::Regex;

/// Hunk header. Counts are optional in unified diffs and default to 1.
static HUNK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@.*$").expect("valid regex")
});

/// Context lines at either edge of a hunk that are left unnumbered.
const SKIP_START: usize = 3;
const SKIP_END: usize = 3;

/// Inclusive line range of one side of a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start_line: u32,
    pub end_line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkLines {
    pub old_hunk: LineRange,
    pub new_hunk: LineRange,
}

/// A hunk split into its two sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHunk {
    /// Removed and context lines, unprefixed.
    pub old_hunk: String,
    /// Added and context lines, numbered as `"{line}: text"`.
    pub new_hunk: String,
}

/// A hunk ready to be shown to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub start_line: u32,
    pub end_line: u32,
    pub rendered: String,
}

/// Split a file patch at every hunk header. Text before the first header is
/// discarded.
pub fn split_patch(patch: &str) -> Vec<&str> {
    let starts: Vec<usize> = HUNK_HEADER_RE.find_iter(patch).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(patch.len());
            &patch[start..end]
        })
        .collect()
}

/// Line ranges of the first hunk header found in `patch`.
pub fn patch_start_end_line(patch: &str) -> Option<HunkLines> {
    let caps = HUNK_HEADER_RE.captures(patch)?;
    let num = |i: usize, default: u32| -> Option<u32> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };

    let old_begin = num(1, 0)?;
    let old_count = num(2, 1)?;
    let new_begin = num(3, 0)?;
    let new_count = num(4, 1)?;

    Some(HunkLines {
        old_hunk: LineRange {
            start_line: old_begin,
            end_line: old_begin.saturating_add(old_count).saturating_sub(1),
        },
        new_hunk: LineRange {
            start_line: new_begin,
            end_line: new_begin.saturating_add(new_count).saturating_sub(1),
        },
    })
}

/// Rebuild one hunk as an old side and a numbered new side.
///
/// Context lines are numbered on the new side except within the first and
/// last three lines of the hunk, unless the hunk only removes lines, in which
/// case every context line is numbered.
pub fn parse_patch(patch: &str) -> Option<ParsedHunk> {
    let info = patch_start_end_line(patch)?;

    let mut lines: Vec<&str> = patch.split('\n').skip(1).collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }

    let removal_only = !lines.iter().any(|l| l.starts_with('+'));
    let total = lines.len();

    let mut old_lines: Vec<String> = Vec::new();
    let mut new_lines: Vec<String> = Vec::new();
    let mut new_line = info.new_hunk.start_line;

    for (idx, line) in lines.iter().enumerate() {
        let current = idx + 1;
        if let Some(removed) = line.strip_prefix('-') {
            old_lines.push(removed.to_string());
        } else if let Some(added) = line.strip_prefix('+') {
            new_lines.push(format!("{new_line}: {added}"));
            new_line = new_line.saturating_add(1);
        } else {
            old_lines.push(line.to_string());
            let annotate =
                removal_only || (current > SKIP_START && current + SKIP_END <= total);
            if annotate {
                new_lines.push(format!("{new_line}: {line}"));
            } else {
                new_lines.push(line.to_string());
            }
            new_line = new_line.saturating_add(1);
        }
    }

    Some(ParsedHunk {
        old_hunk: old_lines.join("\n"),
        new_hunk: new_lines.join("\n"),
    })
}

impl ParsedHunk {
    /// Format both sides the way the summarize prompts expect them.
    pub fn render(&self) -> String {
        format!(
            "\n---new_hunk---\n```\n{}\n```\n\n---old_hunk---\n```\n{}\n```\n",
            self.new_hunk, self.old_hunk
        )
    }
}

/// Split, range and render every parsable hunk of a file patch.
pub fn hunks(patch: &str) -> Vec<Hunk> {
    split_patch(patch)
        .into_iter()
        .filter_map(|chunk| {
            let lines = patch_start_end_line(chunk)?;
            let parsed = parse_patch(chunk)?;
            Some(Hunk {
                start_line: lines.new_hunk.start_line,
                end_line: lines.new_hunk.end_line,
                rendered: parsed.render(),
            })
        })
        .collect()
}
