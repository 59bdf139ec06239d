use std::collections::HashSet;

use tracing::debug;

use crate::models::ArticleRecord;

/// Whether a record can be rendered and summarized at all.
///
/// A record needs a title and a URL, plus a description or content to
/// summarize. Surrounding whitespace does not count.
pub fn is_usable(record: &ArticleRecord) -> bool {
    let has_text = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.trim().is_empty());

    if record.title.trim().is_empty() || record.url.trim().is_empty() {
        return false;
    }

    has_text(&record.description) || has_text(&record.content)
}

pub fn filter_usable(records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    records
        .into_iter()
        .filter(|record| {
            let usable = is_usable(record);
            if !usable {
                debug!(url = %record.url, title = %record.title, "Rejected unusable record");
            }
            usable
        })
        .collect()
}

pub fn normalize_url(url: &str) -> String {
    url.trim().to_string()
}

/// Lowercased title with whitespace runs collapsed, for comparison only.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// What one `dedupe` call has already accepted.
#[derive(Debug, Default)]
struct DedupState {
    urls: HashSet<String>,
    titles: HashSet<String>,
}

impl DedupState {
    /// Records the pair and returns true if neither value was seen before.
    fn accept(&mut self, url: String, title: String) -> bool {
        if self.urls.contains(&url) || self.titles.contains(&title) {
            return false;
        }
        self.urls.insert(url);
        self.titles.insert(title);
        true
    }
}

/// Drop records whose URL or title repeats an earlier one in the batch.
///
/// The first occurrence is kept and the output keeps input order.
pub fn dedupe(records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let mut state = DedupState::default();

    records
        .into_iter()
        .filter(|record| {
            let kept = state.accept(normalize_url(&record.url), normalize_title(&record.title));
            if !kept {
                debug!(url = %record.url, title = %record.title, "Dropped duplicate record");
            }
            kept
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, url: &str) -> ArticleRecord {
        ArticleRecord::new(title, url, "en").with_description("Some description text")
    }

    // ==================== Quality Filter Tests ====================

    #[test]
    fn test_usable_with_description_only() {
        assert!(is_usable(&record("Title", "https://a.example")));
    }

    #[test]
    fn test_usable_with_content_only() {
        let r = ArticleRecord::new("Title", "https://a.example", "en").with_content("Body");
        assert!(is_usable(&r));
    }

    #[test]
    fn test_rejects_empty_title() {
        assert!(!is_usable(&record("", "https://a.example")));
        assert!(!is_usable(&record("   \t", "https://a.example")));
    }

    #[test]
    fn test_rejects_empty_url() {
        assert!(!is_usable(&record("Title", "")));
        assert!(!is_usable(&record("Title", "  ")));
    }

    #[test]
    fn test_rejects_without_description_and_content() {
        let r = ArticleRecord::new("Title", "https://a.example", "en");
        assert!(!is_usable(&r));
    }

    #[test]
    fn test_rejects_whitespace_fields_set_directly() {
        let mut r = ArticleRecord::new("Title", "https://a.example", "en");
        r.description = Some("  ".to_string());
        r.content = Some("\n".to_string());
        assert!(!is_usable(&r));
    }

    #[test]
    fn test_filter_usable_keeps_order() {
        let records = vec![
            record("One", "https://1.example"),
            record("", "https://2.example"),
            record("Three", "https://3.example"),
        ];
        let titles: Vec<_> = filter_usable(records)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["One", "Three"]);
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_normalize_title_collapses_whitespace_and_case() {
        assert_eq!(
            normalize_title("  Big   News\tToday\n"),
            normalize_title("big news today")
        );
        assert_eq!(normalize_title("  Big   News\tToday\n"), "big news today");
    }

    #[test]
    fn test_normalize_url_only_trims() {
        let url = "https://A.example/x";
        assert_eq!(normalize_url(&format!("  {}  ", url)), url);
    }

    // ==================== Deduplication Tests ====================

    #[test]
    fn test_dedupe_same_url_keeps_first() {
        let records = vec![
            record("First", "https://a.example"),
            record("Second", " https://a.example "),
        ];
        let out = dedupe(records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "First");
    }

    #[test]
    fn test_dedupe_same_normalized_title_keeps_first() {
        let records = vec![
            record("OpenAI ships  a model", "https://a.example"),
            record("openai ships a MODEL", "https://b.example"),
        ];
        let out = dedupe(records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].url, "https://a.example");
    }

    #[test]
    fn test_dedupe_keeps_distinct_records_in_order() {
        let records = vec![
            record("A", "https://a.example"),
            record("B", "https://b.example"),
            record("a", "https://c.example"),
            record("C", "https://b.example"),
            record("D", "https://d.example"),
        ];
        let titles: Vec<_> = dedupe(records).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["A", "B", "D"]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let records = vec![
            record("A", "https://a.example"),
            record("A ", "https://x.example"),
            record("B", "https://a.example"),
            record("C", "https://c.example"),
        ];
        let once = dedupe(records);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedupe_output_is_pairwise_distinct() {
        let records = vec![
            record("Same story", "https://a.example"),
            record("Other story", "https://b.example"),
            record("SAME   story", "https://c.example"),
            record("Third", "https://b.example "),
            record("Fourth", "https://d.example"),
        ];
        let out = dedupe(records);

        let urls: HashSet<_> = out.iter().map(|r| normalize_url(&r.url)).collect();
        let titles: HashSet<_> = out.iter().map(|r| normalize_title(&r.title)).collect();
        assert_eq!(urls.len(), out.len());
        assert_eq!(titles.len(), out.len());
    }

    #[test]
    fn test_dedupe_empty_batch() {
        assert!(dedupe(Vec::new()).is_empty());
    }
}
