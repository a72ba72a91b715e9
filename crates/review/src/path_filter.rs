//! Include/exclude glob rules for changed file paths.
//!
//! Each rule is a shell-style glob. A leading `!` turns it into an exclusion.
//! A path is reviewed when it matches some inclusion rule (or there are no
//! inclusion rules at all) and matches no exclusion rule.

use glob::Pattern;

#[derive(Debug, Clone)]
struct Rule {
    pattern: Pattern,
    exclude: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    rules: Vec<Rule>,
}

impl PathFilter {
    /// Build a filter from raw rule strings. Blank rules are ignored and
    /// rules that are not valid globs are matched literally.
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .filter_map(|raw| {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return None;
                }
                let (glob, exclude) = match trimmed.strip_prefix('!') {
                    Some(rest) => (rest.trim(), true),
                    None => (trimmed, false),
                };
                let pattern = Pattern::new(glob).or_else(|e| {
                    tracing::warn!(rule = %trimmed, error = %e, "Invalid path filter glob, matching literally");
                    Pattern::new(&Pattern::escape(glob))
                });
                pattern.ok().map(|pattern| Rule { pattern, exclude })
            })
            .collect();

        Self { rules }
    }

    /// Parse a comma or newline separated rule list, as found in env vars.
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split([',', '\n']))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn check(&self, path: &str) -> bool {
        if self.rules.is_empty() {
            return true;
        }

        let mut has_inclusion = false;
        let mut included = false;
        let mut excluded = false;

        for rule in &self.rules {
            let matches = rule.pattern.matches(path);
            if rule.exclude {
                excluded |= matches;
            } else {
                has_inclusion = true;
                included |= matches;
            }
        }

        (!has_inclusion || included) && !excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rules_accepts_everything() {
        let filter = PathFilter::new(Vec::<String>::new());
        assert!(filter.is_empty());
        assert!(filter.check("src/main.rs"));
    }

    #[test]
    fn exclusions_only() {
        let filter = PathFilter::new(["!package-lock.json", "!package.json"]);
        assert!(!filter.check("package-lock.json"));
        assert!(!filter.check("package.json"));
        assert!(filter.check("src/index.ts"));
    }

    #[test]
    fn inclusions_restrict_to_matches() {
        let filter = PathFilter::new(["src/**/*.rs", "!src/generated/*"]);
        assert!(filter.check("src/api/handlers.rs"));
        assert!(!filter.check("README.md"));
        assert!(!filter.check("src/generated/schema.rs"));
    }

    #[test]
    fn star_crosses_directories() {
        let filter = PathFilter::new(["!*.lock"]);
        assert!(!filter.check("Cargo.lock"));
        assert!(!filter.check("frontend/yarn.lock"));
    }

    #[test]
    fn rules_are_trimmed_and_blanks_dropped() {
        let filter = PathFilter::parse_list(" !*.md , ,\n src/* ");
        assert!(!filter.check("src/README.md"));
        assert!(filter.check("src/lib.rs"));
        assert!(!filter.check("docs/guide.txt"));
    }

    #[test]
    fn invalid_glob_matches_literally() {
        let filter = PathFilter::new(["!a[b"]);
        assert!(!filter.check("a[b"));
        assert!(filter.check("ab"));
    }
}
