pub mod cursor;
pub mod dedup;
pub mod shape;

pub use cursor::{Cursor, SearchQuery};
pub use dedup::{PageDiff, Registry};
pub use shape::{record_id, shape_account, shape_repository, Record};

use crate::config::HarvestConfig;
use crate::sink::{CsvSink, EntityKind, RecordSink};
use crate::Result;
use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;
use std::future::Future;
use std::pin::pin;
use tracing::{debug, info};

/// One page of raw search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<Value>,
    /// Opaque position of the following page; `None` once exhausted
    pub next: Option<String>,
}

/// Source of paged search results
pub trait SearchProvider {
    /// Fetch the page at `cursor`, or the first page when `cursor` is `None`
    fn fetch_page(
        &self,
        query: &SearchQuery,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<SearchPage>> + Send;
}

/// Every page for `query`, in order, until the provider reports exhaustion
pub fn pages<'a, P>(provider: &'a P, query: &'a SearchQuery) -> impl Stream<Item = Result<Vec<Value>>> + 'a
where
    P: SearchProvider,
{
    enum Position {
        Start,
        At(String),
        Done,
    }

    stream::try_unfold(Position::Start, move |position| async move {
        let cursor = match position {
            Position::Start => None,
            Position::At(next) => Some(next),
            Position::Done => return Ok(None),
        };

        let page = provider.fetch_page(query, cursor.as_deref()).await?;
        let position = match page.next {
            Some(next) => Position::At(next),
            None => Position::Done,
        };

        Ok::<_, crate::Error>(Some((page.items, position)))
    })
}

/// Mutable state threaded through the harvest loop
#[derive(Debug, Clone, Default)]
pub struct HarvestState {
    pub registry: Registry,
    pub cursor: Cursor,
    pub pages: usize,
    pub passes: usize,
}

impl HarvestState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Outcome of a completed harvest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    pub repositories: usize,
    pub accounts: usize,
    pub pages: usize,
    pub passes: usize,
    /// Star cap of the last query issued, `None` if it was unbounded
    pub lowest_watermark: Option<u64>,
}

/// Run the harvest into `users.csv` and `repositories.csv` under the
/// configured output directory.
///
/// Both files are finished on every exit path. A provider error is
/// returned after the files are closed.
pub async fn harvest<P: SearchProvider>(provider: &P, config: &HarvestConfig) -> Result<HarvestReport> {
    std::fs::create_dir_all(&config.output_dir)?;

    let mut users = CsvSink::create(EntityKind::Account, &config.output_dir)?;
    let mut repositories = CsvSink::create(EntityKind::Repository, &config.output_dir)?;
    let mut state = HarvestState::new();

    let outcome = run(
        provider,
        &config.keyword,
        &mut state,
        &mut users,
        &mut repositories,
    )
    .await;

    let users_closed = users.finish();
    let repositories_closed = repositories.finish();

    let report = outcome?;
    users_closed?;
    repositories_closed?;

    info!(
        "Harvest complete: {} repositories, {} users over {} pages in {} passes",
        report.repositories, report.accounts, report.pages, report.passes
    );

    Ok(report)
}

/// The pagination loop proper, over arbitrary sinks
pub async fn run<P, U, R>(
    provider: &P,
    keyword: &str,
    state: &mut HarvestState,
    users: &mut U,
    repositories: &mut R,
) -> Result<HarvestReport>
where
    P: SearchProvider,
    U: RecordSink,
    R: RecordSink,
{
    let mut lowest_watermark = state.cursor.max_stargazers;

    while state.cursor.has_next_page {
        let query = state.cursor.query(keyword);
        lowest_watermark = state.cursor.max_stargazers;
        state.passes += 1;
        state.cursor.begin_pass();
        debug!("Pass {}: {}", state.passes, query);

        let mut stream = pin!(pages(provider, &query));
        while let Some(items) = stream.try_next().await? {
            state.pages += 1;
            let diff = state.registry.diff_page(&items);

            for repository in &diff.repositories {
                repositories.write(repository)?;
            }
            for user in &diff.accounts {
                users.write(user)?;
            }

            state.cursor.observe_page(&diff.repositories);

            info!(
                repos = state.registry.repository_count(),
                users = state.registry.account_count(),
                has_next_page = state.cursor.has_next_page,
                max_stargazers = ?state.cursor.max_stargazers,
                "Processed page {} ({} items)",
                state.pages,
                items.len()
            );
        }
    }

    Ok(HarvestReport {
        repositories: state.registry.repository_count(),
        accounts: state.registry.account_count(),
        pages: state.pages,
        passes: state.passes,
        lowest_watermark,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    /// Serves fixed pages per query string
    struct FixedProvider {
        pages: HashMap<String, Vec<Vec<Value>>>,
    }

    impl SearchProvider for FixedProvider {
        async fn fetch_page(&self, query: &SearchQuery, cursor: Option<&str>) -> Result<SearchPage> {
            let pages = self.pages.get(query.as_str()).cloned().unwrap_or_default();
            let index: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
            let items = pages.get(index).cloned().unwrap_or_default();
            let next = (index + 1 < pages.len()).then(|| (index + 1).to_string());
            Ok(SearchPage { items, next })
        }
    }

    fn repo(id: u64, owner: u64, stars: u64) -> Value {
        json!({"id": id, "owner": {"id": owner}, "stargazers_count": stars})
    }

    #[tokio::test]
    async fn test_pages_follows_cursor_until_exhausted() {
        let query = SearchQuery::for_watermark("awesome", None);
        let provider = FixedProvider {
            pages: HashMap::from([(
                query.as_str().to_string(),
                vec![vec![repo(1, 1, 9)], vec![repo(2, 1, 8)], vec![repo(3, 1, 7)]],
            )]),
        };

        let collected: Vec<Vec<Value>> = pages(&provider, &query).try_collect().await.unwrap();
        assert_eq!(collected.len(), 3);
        assert_eq!(collected[2][0]["id"], json!(3));
    }

    #[tokio::test]
    async fn test_run_into_memory_sinks() {
        let first = SearchQuery::for_watermark("awesome", None);
        let second = SearchQuery::for_watermark("awesome", Some(10));
        let provider = FixedProvider {
            pages: HashMap::from([
                (
                    first.as_str().to_string(),
                    vec![vec![repo(1, 100, 50), repo(2, 101, 30), repo(3, 102, 10)]],
                ),
                (
                    second.as_str().to_string(),
                    vec![vec![repo(3, 102, 10), repo(4, 100, 10)], vec![repo(4, 100, 10)]],
                ),
            ]),
        };

        let mut state = HarvestState::new();
        let mut users: Vec<Record> = Vec::new();
        let mut repositories: Vec<Record> = Vec::new();
        let report = run(&provider, "awesome", &mut state, &mut users, &mut repositories)
            .await
            .unwrap();

        assert_eq!(repositories.len(), 4);
        assert_eq!(users.len(), 3);
        assert_eq!(report.passes, 2);
        assert_eq!(report.pages, 3);
        assert_eq!(report.lowest_watermark, Some(10));
        assert!(!state.cursor.has_next_page);
    }
}
