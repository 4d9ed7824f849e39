#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod cache;
mod config;
mod error;
mod fetch;
mod filter;
mod parse;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, on, MethodFilter},
    Extension, Router,
};
use chrono::{DateTime, Utc};

use crate::{
    cache::{MenuSource, SharedCatalog, Store},
    config::Config,
    error::Error,
    filter::{MatchResult, MenuQuery},
    parse::Pizza,
};
use juniper::{graphql_object, EmptyMutation, EmptySubscription, FieldResult, GraphQLObject, RootNode};
use juniper_axum::{graphiql, graphql, playground};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::{compression::CompressionLayer, cors::Any};

pub use error::Result;

#[derive(Clone, Debug)]
pub struct Root(Arc<SharedCatalog>);

/// State of the loaded menu.
#[derive(Debug, GraphQLObject)]
pub struct Status {
    cached_at: DateTime<Utc>,
    /// Set when the last load or refresh failed.
    last_error: Option<String>,
    pizza_count: i32,
}

fn menu_query<S: AsRef<str>>(category: String, toppings: &[S]) -> MenuQuery {
    let mut query: MenuQuery = toppings.iter().collect();
    query.select_category(category);
    query
}

#[graphql_object]
impl Root {
    async fn status(&self) -> Status {
        let last_error = self.0.last_error().await;
        let cache = self.0.get().await;
        Status {
            cached_at: cache.cached_at(),
            last_error,
            pizza_count: i32::try_from(cache.catalog().pizza_count()).unwrap_or(i32::MAX),
        }
    }

    /// Labels of the categories on the menu.
    async fn categories(&self) -> Vec<String> {
        let cache = self.0.get().await;
        cache
            .catalog()
            .categories()
            .iter()
            .map(|c| c.label().to_owned())
            .collect()
    }

    /// Every topping that can be picked, sorted.
    async fn toppings(&self) -> Vec<String> {
        let cache = self.0.get().await;
        cache.catalog().toppings().iter().cloned().collect()
    }

    async fn category(&self, label: String) -> FieldResult<Vec<Pizza>> {
        let cache = self.0.get().await;
        let category = cache
            .catalog()
            .category(&label)
            .ok_or(Error::UnknownCategory(label))?;
        Ok(category.pizzas().to_vec())
    }

    /// Pizzas of `category` ordered by how many of `toppings` they have.
    async fn rank(&self, category: String, toppings: Vec<String>) -> FieldResult<Vec<MatchResult>> {
        let cache = self.0.get().await;
        Ok(menu_query(category, &toppings).rank(cache.catalog())?)
    }

    /// Same as `rank`, rendered as plain text.
    async fn report(&self, category: String, toppings: Vec<String>) -> FieldResult<String> {
        let cache = self.0.get().await;
        Ok(menu_query(category, &toppings).report(cache.catalog())?)
    }
}

type Schema = RootNode<'static, Root, EmptyMutation, EmptySubscription>;

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Debug, Default, serde::Deserialize)]
struct ReportParams {
    category: Option<String>,
    /// comma separated
    #[serde(default)]
    toppings: String,
}

async fn report(
    State(cache): State<Arc<SharedCatalog>>,
    Query(params): Query<ReportParams>,
) -> Response {
    let toppings: Vec<&str> = params
        .toppings
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    let mut query: MenuQuery = toppings.into_iter().collect();
    if let Some(category) = params.category {
        query.select_category(category);
    }
    let cache = cache.get().await;
    match query.report(cache.catalog()) {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(e @ Error::UnknownCategory(_)) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn refresh(State(cache): State<Arc<SharedCatalog>>) -> Response {
    let status = match cache.refresh().await {
        Ok(()) => StatusCode::CREATED,
        Err(e) => {
            tracing::warn!("Error while refreshing menu: {e}");
            StatusCode::BAD_GATEWAY
        }
    };
    let c = cache.get().await;
    let last_error = cache.last_error().await.unwrap_or_default();
    (
        status,
        format!(
            "Last refresh: {}\nPizzas: {}\n{last_error}",
            c.time_since_refresh(),
            c.catalog().pizza_count(),
        ),
    )
        .into_response()
}

fn app(cache: &Arc<SharedCatalog>) -> Router {
    let schema = Schema::new(
        Root(Arc::clone(cache)),
        EmptyMutation::new(),
        EmptySubscription::new(),
    );
    let comression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST]) // intentionally excludes request-refresh/PUT
        .allow_origin(Any);

    Router::new()
        .route(
            "/graphql",
            on(
                MethodFilter::GET.or(MethodFilter::POST),
                graphql::<Arc<Schema>>,
            ),
        )
        .route("/graphiql", get(graphiql("/graphql", None::<&str>)))
        .route("/playground", get(playground("/graphql", None::<&str>)))
        .route("/report", get(report))
        .route("/request-refresh", on(MethodFilter::PUT, refresh))
        .with_state(Arc::clone(cache))
        .layer(cors_layer)
        .layer(Extension(Arc::new(schema)))
        .layer(comression_layer)
}

#[cfg(not(feature = "dump-schema"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env()?;
    let store = Store::open(&config.cache);
    log::debug!("{store:?}");
    let cache = Arc::new(SharedCatalog::open(store, MenuSource::from_config(&config)).await);
    let app = app(&cache);

    let listener = TcpListener::bind(config.addr).await?;
    log::info!("listening on http://{}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(feature = "dump-schema")]
fn main() {
    pretty_env_logger::init();
    let cache = Arc::new(SharedCatalog::detached(
        cache::MenuCache::default(),
        MenuSource::default(),
    ));
    let schema = Schema::new(Root(cache), EmptyMutation::new(), EmptySubscription::new());
    std::fs::write("pizza_finder.graphql", schema.as_sdl().as_bytes())
        .expect("error writing schema to file");
}
