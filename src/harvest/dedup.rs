use super::shape::{record_id, shape_account, shape_repository, Record};
use serde_json::Value;
use std::collections::HashSet;

/// Novel records extracted from one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageDiff {
    pub accounts: Vec<Record>,
    pub repositories: Vec<Record>,
}

impl PageDiff {
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.repositories.is_empty()
    }
}

/// Ids already emitted during this run, one set per entity kind
#[derive(Debug, Clone, Default)]
pub struct Registry {
    repositories: HashSet<u64>,
    accounts: HashSet<u64>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repository_count(&self) -> usize {
        self.repositories.len()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn has_repository(&self, id: u64) -> bool {
        self.repositories.contains(&id)
    }

    pub fn has_account(&self, id: u64) -> bool {
        self.accounts.contains(&id)
    }

    /// Shape one raw page and keep only records not seen before.
    ///
    /// Ids are registered as they are accepted, so a repeat later in the
    /// same page loses to its first occurrence. Entries without an integer
    /// id, and repositories without an identifiable owner, are skipped.
    pub fn diff_page(&mut self, items: &[Value]) -> PageDiff {
        let mut diff = PageDiff::default();

        for item in items {
            let Some(repository) = item.as_object() else {
                continue;
            };
            let Some(repository_id) = record_id(repository) else {
                continue;
            };
            let Some(owner) = repository.get("owner").and_then(Value::as_object) else {
                continue;
            };
            let Some(owner_id) = record_id(owner) else {
                continue;
            };

            if self.accounts.insert(owner_id) {
                diff.accounts.push(shape_account(owner));
            }

            if self.repositories.insert(repository_id) {
                diff.repositories.push(shape_repository(repository));
            }
        }

        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo(id: u64, owner: u64, stars: u64) -> Value {
        json!({
            "id": id,
            "full_name": format!("owner{owner}/repo{id}"),
            "html_url": format!("https://github.com/owner{owner}/repo{id}"),
            "owner": {"id": owner, "login": format!("owner{owner}"), "url": "https://api.github.com/users/x"},
            "stargazers_count": stars,
            "topics": [],
            "permissions": {"pull": true}
        })
    }

    #[test]
    fn test_diff_page_registers_everything_it_emits() {
        let mut registry = Registry::new();
        let diff = registry.diff_page(&[repo(1, 10, 50), repo(2, 11, 30)]);

        assert_eq!(diff.repositories.len(), 2);
        assert_eq!(diff.accounts.len(), 2);
        for r in &diff.repositories {
            assert!(registry.has_repository(record_id(r).unwrap()));
        }
        for a in &diff.accounts {
            assert!(registry.has_account(record_id(a).unwrap()));
        }
    }

    #[test]
    fn test_repeats_within_a_page_keep_first() {
        let mut registry = Registry::new();
        let mut second = repo(1, 10, 50);
        second["full_name"] = json!("renamed");

        let diff = registry.diff_page(&[repo(1, 10, 50), second, repo(2, 10, 20)]);

        assert_eq!(diff.repositories.len(), 2);
        assert_eq!(diff.repositories[0]["full_name"], json!("owner10/repo1"));
        assert_eq!(diff.accounts.len(), 1);
    }

    #[test]
    fn test_repeats_across_pages_are_dropped() {
        let mut registry = Registry::new();
        registry.diff_page(&[repo(1, 10, 50)]);

        let diff = registry.diff_page(&[repo(1, 10, 50), repo(3, 10, 5)]);
        assert_eq!(diff.repositories.len(), 1);
        assert_eq!(record_id(&diff.repositories[0]), Some(3));
        assert!(diff.accounts.is_empty());
        assert_eq!(registry.repository_count(), 2);
        assert_eq!(registry.account_count(), 1);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let mut registry = Registry::new();
        let items = vec![
            json!({"name": "no id", "owner": {"id": 1}}),
            json!({"id": 2, "name": "no owner"}),
            json!({"id": 3, "owner": null}),
            json!({"id": 4, "owner": {"login": "no id"}}),
            json!("not an object"),
        ];

        let diff = registry.diff_page(&items);
        assert!(diff.is_empty());
        assert_eq!(registry.repository_count(), 0);
        assert_eq!(registry.account_count(), 0);
    }

    #[test]
    fn test_excluded_fields_never_emitted() {
        let mut registry = Registry::new();
        let diff = registry.diff_page(&[repo(1, 10, 50)]);

        assert!(diff.accounts[0].keys().all(|k| !k.ends_with("url")));
        assert!(diff.repositories[0].keys().all(|k| !k.ends_with("url")));
        assert!(!diff.repositories[0].contains_key("permissions"));
    }
}
