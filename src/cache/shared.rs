use super::{MenuCache, MenuSource, Store};
use crate::error::Error;
use std::{fmt, ops::Deref};

use futures_locks::{Mutex, RwLock};

/// The menu shared by every request handler.
///
/// The catalog itself is never mutated, a refresh swaps in a whole new `MenuCache`.
pub struct SharedCatalog {
    cache: RwLock<MenuCache>,
    last_error: RwLock<Option<String>>,
    store: Mutex<Store>,
    source: MenuSource,
}

impl fmt::Debug for SharedCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCatalog")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl SharedCatalog {
    /// Loads the menu from `store`, falling back to an empty catalog if it cannot be loaded.
    pub async fn open(mut store: Store, source: MenuSource) -> Self {
        let (cache, last_error) = match store.load(&source).await {
            Ok(cache) => (cache, None),
            Err(e) => {
                log::error!("Could not load the menu, starting with an empty catalog: {e}");
                (MenuCache::default(), Some(e.to_string()))
            }
        };
        Self {
            cache: RwLock::new(cache),
            last_error: RwLock::new(last_error),
            store: Mutex::new(store),
            source,
        }
    }

    /// A catalog that is not backed by any store.
    pub fn detached(cache: MenuCache, source: MenuSource) -> Self {
        Self {
            cache: RwLock::new(cache),
            last_error: RwLock::new(None),
            store: Mutex::new(Store::AdHoc),
            source,
        }
    }

    /// Scrapes the menu again. On failure the previous menu stays in place.
    pub async fn refresh(&self) -> Result<(), Error> {
        let fresh = match MenuCache::load(&self.source).await {
            Ok(fresh) => fresh,
            Err(e) => {
                *self.last_error.write().await = Some(e.to_string());
                return Err(e);
            }
        };
        {
            let mut guard = self.cache.write().await;
            *guard = fresh;
        }
        *self.last_error.write().await = None;

        let cache = self.cache.read().await;
        if let Err(e) = self.store.lock().await.save(&cache).await {
            log::warn!("Refreshed menu could not be saved: {e}");
        }
        Ok(())
    }

    pub async fn get(&self) -> impl Deref<Target = MenuCache> + '_ {
        self.cache.read().await
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }
}
