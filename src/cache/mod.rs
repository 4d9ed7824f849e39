mod local;
mod shared;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    config::{CacheLocation, Config, DEFAULT_MENU_URL},
    fetch,
    parse::{Catalog, PizzaForteExtractor},
};

use local::FileStore;
pub use shared::SharedCatalog;

/// Where and how the menu is scraped.
#[derive(Debug, Clone)]
pub struct MenuSource {
    client: reqwest::Client,
    url: Url,
    labels: Vec<String>,
}

impl MenuSource {
    pub fn new(url: Url, labels: Vec<String>) -> Self {
        Self {
            client: fetch::make_client(),
            url,
            labels,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.menu_url.clone(), config.categories.clone())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub async fn fetch_catalog(&self) -> crate::Result<Catalog> {
        let page = fetch::menu_page(&self.client, &self.url).await?;
        let catalog = Catalog::from_html(&page, &self.labels, &PizzaForteExtractor)?;
        log::info!(
            "Loaded {} pizzas and {} toppings from {}",
            catalog.pizza_count(),
            catalog.toppings().len(),
            self.url
        );
        Ok(catalog)
    }
}

impl Default for MenuSource {
    fn default() -> Self {
        let url = Url::parse(DEFAULT_MENU_URL).expect("default menu url should be valid");
        let labels = crate::config::DEFAULT_CATEGORIES
            .split(',')
            .map(ToOwned::to_owned)
            .collect();
        Self::new(url, labels)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCache {
    cached_at: DateTime<Utc>,
    catalog: Catalog,
}

impl Default for MenuCache {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}

impl MenuCache {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            cached_at: Utc::now(),
            catalog,
        }
    }

    #[inline]
    #[must_use]
    pub fn time_since_refresh(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.cached_at)
    }

    #[inline]
    #[must_use]
    pub const fn cached_at(&self) -> DateTime<Utc> {
        self.cached_at
    }

    #[inline]
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Whether this cache was built for exactly the categories of `source`.
    fn matches(&self, source: &MenuSource) -> bool {
        self.catalog
            .categories()
            .iter()
            .map(|c| c.label())
            .eq(source.labels().iter().map(String::as_str))
    }

    pub async fn load(source: &MenuSource) -> crate::Result<Self> {
        let catalog = source.fetch_catalog().await?;
        Ok(Self::new(catalog))
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub enum Store {
    Local(FileStore),
    AdHoc,
}

impl Store {
    #[inline]
    pub fn open(location: &CacheLocation) -> Self {
        match location {
            CacheLocation::Memory => Self::AdHoc,
            CacheLocation::File(p) => Self::Local(FileStore::open(p)),
        }
    }

    /// Returns the stored menu, scraping a fresh one if nothing usable is stored.
    pub async fn load(&mut self, source: &MenuSource) -> crate::Result<MenuCache> {
        let value = match self {
            Self::Local(f) => f.load().await?,
            Self::AdHoc => None,
        };

        match value {
            Some(v) if v.matches(source) => {
                log::info!("Using stored menu from {}", v.cached_at);
                Ok(v)
            }
            _ => {
                let v = MenuCache::load(source).await?;
                self.save(&v).await?;
                Ok(v)
            }
        }
    }

    pub async fn save(&mut self, data: &MenuCache) -> crate::Result<()> {
        match self {
            Self::Local(f) => f.save(data).await,
            Self::AdHoc => Ok(()),
        }
    }
}
