use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::DefinitionRow;

/// category -> level -> description, built from the definitions table
#[derive(Debug, Default, Clone, PartialEq)]
pub struct KnowledgeCatalog(HashMap<String, BTreeMap<i32, String>>);

impl KnowledgeCatalog {
    /// Rows missing a category, level or description are skipped
    pub fn from_rows(rows: impl IntoIterator<Item = DefinitionRow>) -> Self {
        let mut map: HashMap<String, BTreeMap<i32, String>> = HashMap::new();
        for row in rows {
            let (Some(category), Some(level), Some(description)) =
                (row.category, row.level, row.description)
            else {
                continue;
            };
            if category.is_empty() || description.is_empty() {
                continue;
            }
            map.entry(category).or_default().insert(level, description);
        }
        Self(map)
    }

    pub fn describe(&self, category: &str, level: i32) -> Option<&str> {
        self.0
            .get(category)
            .and_then(|levels| levels.get(&level))
            .map(String::as_str)
    }

    pub fn contains(&self, category: &str, level: i32) -> bool {
        self.describe(category, level).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lazily loaded catalog shared by every request
#[derive(Debug, Default)]
pub struct CatalogCache {
    catalog: RwLock<Option<Arc<KnowledgeCatalog>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached catalog, running `load` when there is none
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<Arc<KnowledgeCatalog>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<KnowledgeCatalog, E>>,
    {
        if let Some(catalog) = self.catalog.read().await.as_ref() {
            return Ok(catalog.clone());
        }

        let mut guard = self.catalog.write().await;
        // Another request may have filled it while we waited
        if let Some(catalog) = guard.as_ref() {
            return Ok(catalog.clone());
        }
        let catalog = Arc::new(load().await?);
        *guard = Some(catalog.clone());
        tracing::debug!("Financial knowledge catalog loaded");
        Ok(catalog)
    }

    /// Drop the cached catalog so the next reader reloads it
    pub async fn invalidate(&self) {
        *self.catalog.write().await = None;
    }
}
