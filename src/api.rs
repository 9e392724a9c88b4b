//! PokeAPI catalog client

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::pagination::{page_offset, ITEMS_PER_PAGE};
use crate::state::{CatalogPage, PokemonDetail};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";

/// Listing record: a name and the URL of its detail resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub name: String,
    pub url: String,
}

/// `GET /pokemon?limit=&offset=` response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ListingResponse {
    pub count: u32,
    pub results: Vec<PokemonSummary>,
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("no pokemon named {0:?}")]
    NotFound(String),
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// The three PokeAPI shapes the browser consumes.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_listing(&self, limit: u32, offset: u32)
        -> Result<ListingResponse, CatalogError>;

    async fn fetch_detail(&self, url: &str) -> Result<PokemonDetail, CatalogError>;

    /// `name` is already normalized. A missing resource is
    /// [`CatalogError::NotFound`].
    async fn fetch_named(&self, name: &str) -> Result<PokemonDetail, CatalogError>;
}

pub type SharedCatalog = Arc<dyn CatalogSource>;

/// Fetch one listing page and resolve every entry into its detail record.
///
/// The detail requests are all in flight at once; the page fails as a whole
/// if the listing or any detail fails.
pub async fn fetch_page(
    source: &dyn CatalogSource,
    page: u32,
) -> Result<CatalogPage, CatalogError> {
    let offset = page_offset(page, ITEMS_PER_PAGE);
    tracing::debug!(page, offset, "fetching catalog page");
    let listing = source.fetch_listing(ITEMS_PER_PAGE, offset).await?;
    let items = try_join_all(
        listing
            .results
            .iter()
            .map(|summary| source.fetch_detail(&summary.url)),
    )
    .await?;
    tracing::debug!(page, count = items.len(), total = listing.count, "catalog page resolved");
    Ok(CatalogPage {
        items,
        total_count: listing.count,
    })
}

/// Case-insensitive exact-name lookup.
pub async fn fetch_by_name(
    source: &dyn CatalogSource,
    name: &str,
) -> Result<PokemonDetail, CatalogError> {
    let name = normalize_name(name);
    if name.is_empty() {
        return Err(CatalogError::NotFound(name));
    }
    tracing::debug!(%name, "searching pokemon");
    source.fetch_named(&name).await
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// reqwest-backed [`CatalogSource`] for PokeAPI.
#[derive(Clone, Debug)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for PokeApiClient {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, CatalogError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| CatalogError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn fetch_listing(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<ListingResponse, CatalogError> {
        let url = format!("{}/pokemon?limit={limit}&offset={offset}", self.base_url);
        self.get_json(&url).await
    }

    async fn fetch_detail(&self, url: &str) -> Result<PokemonDetail, CatalogError> {
        self.get_json(url).await
    }

    async fn fetch_named(&self, name: &str) -> Result<PokemonDetail, CatalogError> {
        let url = format!("{}/pokemon/{name}", self.base_url);
        match self.get_json(&url).await {
            Err(CatalogError::Status { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Err(CatalogError::NotFound(name.to_string()))
            }
            other => other,
        }
    }
}
