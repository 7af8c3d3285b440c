use regex::{Regex, RegexBuilder};

use crate::store::Task;

/// Compiled form of a search term.
///
/// The term is matched literally and case-insensitively; regex
/// metacharacters typed by the user carry no meaning.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Blank term: everything matches, nothing is highlighted.
    All,
    Pattern(Regex),
    /// Term that could not be compiled (oversized input): nothing matches.
    Nothing,
}

/// A run of text that either matched the search term or did not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

impl Matcher {
    pub fn new(term: &str) -> Self {
        if term.trim().is_empty() {
            return Matcher::All;
        }
        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Matcher::Pattern(re),
            Err(e) => {
                tracing::warn!("search term rejected: {}", e);
                Matcher::Nothing
            }
        }
    }

    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Pattern(re) => re.is_match(text),
            Matcher::Nothing => false,
        }
    }

    /// Title OR description. An empty description never matches a real term.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Matcher::All => true,
            _ => {
                self.matches_text(&task.title)
                    || (task.has_description() && self.matches_text(&task.description))
            }
        }
    }

    /// Split `text` into matched and unmatched runs, preserving original casing.
    /// Concatenating the segments yields `text` again.
    pub fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let Matcher::Pattern(re) = self else {
            return vec![Segment {
                text,
                matched: false,
            }];
        };

        let mut out = Vec::new();
        let mut last = 0;
        for m in re.find_iter(text) {
            if m.start() > last {
                out.push(Segment {
                    text: &text[last..m.start()],
                    matched: false,
                });
            }
            out.push(Segment {
                text: m.as_str(),
                matched: true,
            });
            last = m.end();
        }
        if last < text.len() || out.is_empty() {
            out.push(Segment {
                text: &text[last..],
                matched: false,
            });
        }
        out
    }
}

/// Project `tasks` onto the ones matching `term`, keeping their order.
pub fn filter(term: &str, tasks: &[Task]) -> Vec<Task> {
    let matcher = Matcher::new(term);
    tasks.iter().filter(|t| matcher.matches(t)).cloned().collect()
}

pub fn highlight<'a>(term: &str, text: &'a str) -> Vec<Segment<'a>> {
    Matcher::new(term).segments(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: &str, title: &str, description: &str) -> Task {
        Task::new(id.to_string(), title, description, Utc::now())
    }

    fn sample() -> Vec<Task> {
        vec![
            task("3", "Call Bob", ""),
            task("2", "Buy milk", "2%"),
            task("1", "Water plants", "the MILKweed too"),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn blank_term_is_identity() {
        let tasks = sample();
        assert_eq!(filter("", &tasks), tasks);
        assert_eq!(filter("   \t", &tasks), tasks);
    }

    #[test]
    fn matches_title_or_description_case_insensitively() {
        let tasks = sample();
        assert_eq!(ids(&filter("MiLk", &tasks)), vec!["2", "1"]);
        assert_eq!(ids(&filter("bob", &tasks)), vec!["3"]);
        assert_eq!(ids(&filter("2%", &tasks)), vec!["2"]);
    }

    #[test]
    fn empty_description_never_matches() {
        let tasks = vec![task("1", "Title", "")];
        assert!(filter("x", &tasks).is_empty());
    }

    #[test]
    fn term_is_literal_not_a_pattern() {
        let tasks = vec![task("1", "a.c", ""), task("2", "abc", "")];
        assert_eq!(ids(&filter(".", &tasks)), vec!["1"]);
        assert_eq!(ids(&filter("(", &tasks)), Vec::<&str>::new());
    }

    #[test]
    fn filter_is_idempotent_and_order_preserving() {
        let tasks = sample();
        for term in ["milk", "a", "o", "zzz", ""] {
            let once = filter(term, &tasks);
            let twice = filter(term, &once);
            assert_eq!(once, twice, "not idempotent for {term:?}");

            // Result order is a subsequence of the input order.
            let mut cursor = tasks.iter();
            for t in &once {
                assert!(cursor.any(|c| c == t), "order broken for {term:?}");
            }
        }
    }

    #[test]
    fn highlight_preserves_casing_and_text() {
        let segs = highlight("milk", "Buy MILK and milk");
        let joined: String = segs.iter().map(|s| s.text).collect();
        assert_eq!(joined, "Buy MILK and milk");
        assert_eq!(
            segs,
            vec![
                Segment {
                    text: "Buy ",
                    matched: false
                },
                Segment {
                    text: "MILK",
                    matched: true
                },
                Segment {
                    text: " and ",
                    matched: false
                },
                Segment {
                    text: "milk",
                    matched: true
                },
            ]
        );
    }

    #[test]
    fn highlight_blank_term_is_plain() {
        let segs = highlight("  ", "Buy milk");
        assert_eq!(
            segs,
            vec![Segment {
                text: "Buy milk",
                matched: false
            }]
        );
    }

    #[test]
    fn highlight_without_match_is_plain() {
        let segs = highlight("xyz", "Buy milk");
        assert_eq!(segs.len(), 1);
        assert!(!segs[0].matched);
    }

    #[test]
    fn highlight_handles_multibyte_text() {
        let segs = highlight("café", "Un CAFÉ noir");
        let matched: Vec<&str> = segs.iter().filter(|s| s.matched).map(|s| s.text).collect();
        assert_eq!(matched, vec!["CAFÉ"]);
    }
}
