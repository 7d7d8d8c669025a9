use super::shape::Record;
use serde_json::Value;
use std::fmt;

/// Filter expression sent to the search endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Featured entries for `keyword`, most-starred first, capped at
    /// `watermark` stars when one is set
    pub fn for_watermark(keyword: &str, watermark: Option<u64>) -> Self {
        let mut query = format!("{} is:featured sort:stars-desc", keyword.trim());
        if let Some(max) = watermark {
            query.push_str(&format!(" stars:1..{max}"));
        }
        Self(query)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowest positive stargazer count among `repositories`
pub fn min_stargazers(repositories: &[Record]) -> Option<u64> {
    repositories
        .iter()
        .filter_map(|r| r.get("stargazers_count").and_then(Value::as_u64))
        .filter(|&count| count > 0)
        .min()
}

/// Watermark and continuation flag of the outer loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub max_stargazers: Option<u64>,
    pub has_next_page: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            max_stargazers: None,
            has_next_page: true,
        }
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query for the next outer pass
    pub fn query(&self, keyword: &str) -> SearchQuery {
        SearchQuery::for_watermark(keyword, self.max_stargazers)
    }

    /// Start a pass. A pass that yields no pages at all ends the harvest.
    pub fn begin_pass(&mut self) {
        self.has_next_page = false;
    }

    /// Fold in the novel repositories of the page just processed.
    ///
    /// Only the last page of a pass matters: when it contributed nothing new
    /// there is no minimum, and the harvest stops.
    pub fn observe_page(&mut self, novel_repositories: &[Record]) {
        let min = min_stargazers(novel_repositories);
        self.max_stargazers = min;
        self.has_next_page = min.is_some();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repos(stars: &[u64]) -> Vec<Record> {
        stars
            .iter()
            .enumerate()
            .map(|(i, s)| {
                json!({"id": i, "stargazers_count": s})
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_unbounded_query() {
        let query = SearchQuery::for_watermark("awesome", None);
        assert_eq!(query.as_str(), "awesome is:featured sort:stars-desc");
    }

    #[test]
    fn test_bounded_query() {
        let query = SearchQuery::for_watermark("awesome", Some(1200));
        assert_eq!(
            query.to_string(),
            "awesome is:featured sort:stars-desc stars:1..1200"
        );
    }

    #[test]
    fn test_observe_page_takes_minimum() {
        let mut cursor = Cursor::new();
        cursor.observe_page(&repos(&[50, 30, 10]));

        assert_eq!(cursor.max_stargazers, Some(10));
        assert!(cursor.has_next_page);
        assert_eq!(
            cursor.query("awesome").as_str(),
            "awesome is:featured sort:stars-desc stars:1..10"
        );
    }

    #[test]
    fn test_empty_page_stops_the_harvest() {
        let mut cursor = Cursor::new();
        cursor.observe_page(&repos(&[40]));
        cursor.observe_page(&[]);

        assert_eq!(cursor.max_stargazers, None);
        assert!(!cursor.has_next_page);
    }

    #[test]
    fn test_zero_or_missing_counts_are_ignored() {
        assert_eq!(min_stargazers(&repos(&[0, 7, 3])), Some(3));

        let no_counts = vec![json!({"id": 1}).as_object().cloned().unwrap()];
        assert_eq!(min_stargazers(&no_counts), None);
    }

    #[test]
    fn test_pass_without_pages_stops() {
        let mut cursor = Cursor::new();
        cursor.begin_pass();
        assert!(!cursor.has_next_page);
    }
}
