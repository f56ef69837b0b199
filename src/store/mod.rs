//! In-memory resources standing in for the back-office REST hooks
//!
//! Each resource answers paged, filtered list queries and deletes, with an
//! optional artificial latency so the UI can show its loading states.

pub mod mock;
pub mod models;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;

use models::{Expense, Lookups, Product, Purchase, Role, SaleReport};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(String),
    #[error("record {0} is protected and cannot be deleted")]
    Protected(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// A row a resource can hold
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;

    /// Case-insensitive match against an already lowercased needle
    fn matches_search(&self, needle: &str) -> bool;

    /// Value the list filter compares against (category, status, ...)
    fn filter_key(&self) -> Option<&str> {
        None
    }

    fn check_deletable(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based
    pub page: usize,
    pub limit: usize,
    pub search: String,
    pub filter: Option<String>,
}

impl ListQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            page: 1,
            limit,
            search: String::new(),
            filter: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl PageMeta {
    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            return 1;
        }
        self.total.div_ceil(self.limit).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Absolute index of the first row of this page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.limit
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

pub struct MemoryResource<T> {
    name: &'static str,
    rows: RwLock<Vec<T>>,
    latency: Duration,
}

impl<T: Record> MemoryResource<T> {
    pub fn new(name: &'static str, rows: Vec<T>) -> Self {
        Self {
            name,
            rows: RwLock::new(rows),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// One page of rows matching the query's search text and filter
    pub async fn list(&self, query: &ListQuery) -> Result<Page<T>, StoreError> {
        if query.limit == 0 {
            return Err(StoreError::InvalidQuery("limit must be positive".to_string()));
        }
        if query.page == 0 {
            return Err(StoreError::InvalidQuery("pages start at 1".to_string()));
        }

        self.simulate_latency().await;

        let needle = query.search.trim().to_lowercase();
        let rows = self.rows.read().await;
        let matching: Vec<&T> = rows
            .iter()
            .filter(|row| needle.is_empty() || row.matches_search(&needle))
            .filter(|row| match &query.filter {
                Some(filter) => row.filter_key() == Some(filter.as_str()),
                None => true,
            })
            .collect();

        let meta = PageMeta {
            total: matching.len(),
            page: query.page,
            limit: query.limit,
        };
        let items = matching
            .into_iter()
            .skip(meta.offset())
            .take(query.limit)
            .cloned()
            .collect();

        tracing::debug!(
            "{}: page {} of {} ({} rows)",
            self.name,
            meta.page,
            meta.total_pages(),
            meta.total
        );
        Ok(Page { items, meta })
    }

    pub async fn delete(&self, id: &str) -> Result<T, StoreError> {
        self.simulate_latency().await;

        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        rows[index].check_deletable()?;

        tracing::info!("{}: deleted {}", self.name, id);
        Ok(rows.remove(index))
    }

    pub async fn all(&self) -> Vec<T> {
        self.simulate_latency().await;
        self.rows.read().await.clone()
    }
}

/// Handles to every resource plus the shared reference data
#[derive(Clone)]
pub struct Resources {
    pub products: Arc<MemoryResource<Product>>,
    pub purchases: Arc<MemoryResource<Purchase>>,
    pub expenses: Arc<MemoryResource<Expense>>,
    pub sales: Arc<MemoryResource<SaleReport>>,
    pub roles: Arc<MemoryResource<Role>>,
    pub lookups: Arc<Lookups>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        kind: &'static str,
        locked: bool,
    }

    impl Record for Row {
        fn id(&self) -> &str {
            &self.id
        }

        fn matches_search(&self, needle: &str) -> bool {
            self.id.to_lowercase().contains(needle)
        }

        fn filter_key(&self) -> Option<&str> {
            Some(self.kind)
        }

        fn check_deletable(&self) -> Result<(), StoreError> {
            if self.locked {
                return Err(StoreError::Protected(self.id.clone()));
            }
            Ok(())
        }
    }

    fn resource() -> MemoryResource<Row> {
        let rows = (1..=12)
            .map(|i| Row {
                id: format!("R-{i:02}"),
                kind: if i % 3 == 0 { "odd" } else { "even" },
                locked: i == 1,
            })
            .collect();
        MemoryResource::new("rows", rows)
    }

    #[test]
    fn test_total_pages() {
        let meta = PageMeta { total: 11, page: 1, limit: 5 };
        assert_eq!(meta.total_pages(), 3);
        assert!(meta.has_next());
        assert!(!meta.has_prev());

        let empty = PageMeta { total: 0, page: 1, limit: 5 };
        assert_eq!(empty.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_list_pages_and_filters() {
        let resource = resource();

        let mut query = ListQuery::new(5);
        query.page = 3;
        let page = resource.list(&query).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.meta.total, 12);
        assert_eq!(page.items[0].id, "R-11");

        let mut query = ListQuery::new(10);
        query.filter = Some("odd".to_string());
        let page = resource.list(&query).await.unwrap();
        assert_eq!(page.meta.total, 4);

        let mut query = ListQuery::new(10);
        query.search = "  r-1".to_string();
        let page = resource.list(&query).await.unwrap();
        assert_eq!(page.meta.total, 3); // R-10, R-11, R-12
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let resource = resource();
        let mut query = ListQuery::new(5);
        query.page = 9;

        let page = resource.list(&query).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total, 12);
    }

    #[tokio::test]
    async fn test_zero_limit_is_rejected() {
        let resource = resource();
        let err = resource.list(&ListQuery::new(0)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let resource = resource();

        let removed = resource.delete("R-05").await.unwrap();
        assert_eq!(removed.id, "R-05");
        assert_eq!(resource.all().await.len(), 11);

        assert_eq!(
            resource.delete("R-05").await.unwrap_err(),
            StoreError::NotFound("R-05".to_string())
        );
        assert_eq!(
            resource.delete("R-01").await.unwrap_err(),
            StoreError::Protected("R-01".to_string())
        );
        assert_eq!(resource.all().await.len(), 11);
    }
}
