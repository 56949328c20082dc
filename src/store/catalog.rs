use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use super::CatalogStore;
use crate::context::CallContext;
use crate::error::StoreError;
use crate::model::{Filter, Item};

/// Validate a caller-supplied id, or generate one when it is empty.
pub fn assign_id(item: &mut Item) -> Result<(), StoreError> {
    if item.has_id() {
        Uuid::parse_str(&item.id).map_err(|e| StoreError::InvalidId {
            id: item.id.clone(),
            reason: e.to_string(),
        })?;
    } else {
        item.id = Uuid::new_v4().to_string();
    }
    Ok(())
}

/// Item store backed by one `RwLock<HashMap>`.
///
/// `save` takes the lock exclusively; `find` and `search` share it. `search`
/// keeps its read guard for the whole scan, so writers queue behind a slow
/// consumer until the scan ends. Clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    items: Arc<RwLock<HashMap<String, Item>>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(items.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn save(&self, item: &Item) -> Result<String, StoreError> {
        let mut stored = item.clone();
        assign_id(&mut stored)?;

        let mut items = self
            .items
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        if items.contains_key(&stored.id) {
            return Err(StoreError::AlreadyExists(stored.id));
        }
        let id = stored.id.clone();
        items.insert(id.clone(), stored);
        tracing::debug!(%id, "item stored");
        Ok(id)
    }

    fn find(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(items.get(id).cloned())
    }

    fn search<F, E>(&self, ctx: &CallContext, filter: &Filter, mut on_match: F) -> Result<(), E>
    where
        F: FnMut(Item) -> Result<(), E>,
        E: From<StoreError>,
    {
        let items = self
            .items
            .read()
            .map_err(|_| StoreError::LockPoisoned("search"))?;

        for item in items.values() {
            ctx.check().map_err(StoreError::from)?;
            if filter.matches(item) {
                on_match(item.clone())?;
            }
        }
        Ok(())
    }
}
