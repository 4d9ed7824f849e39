use std::{env, net::SocketAddr, str::FromStr};

use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_MENU_URL: &str = "https://pizzaforte.hu/pizzak.php";
pub const DEFAULT_CATEGORIES: &str = "classic,italy";

/// Where the parsed menu is kept between restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLocation {
    Memory,
    File(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub menu_url: Url,
    pub categories: Vec<String>,
    pub cache: CacheLocation,
    pub addr: SocketAddr,
}

impl Config {
    /// Reads `MENU_URL`, `CATEGORIES`, `CACHE`, `HOST` and `PORT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let menu_url = var("MENU_URL").unwrap_or_else(|| DEFAULT_MENU_URL.to_string());
        let menu_url = Url::parse(&menu_url)
            .map_err(|e| Error::Config(format!("MENU_URL `{menu_url}` is invalid: {e}")))?;

        let categories = parse_categories(
            &var("CATEGORIES").unwrap_or_else(|| DEFAULT_CATEGORIES.to_string()),
        )?;

        let cache = match var("CACHE").as_deref() {
            Some(":memory:") => CacheLocation::Memory,
            Some(p) => CacheLocation::File(p.to_owned()),
            None => {
                log::warn!("env var CACHE not set, using ad-hoc memory cache.");
                CacheLocation::Memory
            }
        };

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = var("PORT").unwrap_or_else(|| "3000".to_string());
        let addr = SocketAddr::from_str(&format!("{host}:{port}"))
            .map_err(|e| Error::Config(format!("`{host}:{port}` is not a socket address: {e}")))?;

        Ok(Self {
            menu_url,
            categories,
            cache,
            addr,
        })
    }
}

fn parse_categories(raw: &str) -> Result<Vec<String>> {
    let mut categories: Vec<String> = Vec::new();
    for label in raw.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        if !categories.iter().any(|c| c == label) {
            categories.push(label.to_owned());
        }
    }
    if categories.is_empty() {
        return Err(Error::Config("CATEGORIES should name at least one category".into()));
    }
    Ok(categories)
}
