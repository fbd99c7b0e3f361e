//! Catalog endpoints: listing, search, and record lookup.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::TokenGetter;
use crate::cache;
use crate::error::ClientResult;
use crate::http::{ApiRequest, HttpClient};
use crate::models::catalog::{ApiId, Record, RecordPage};
use crate::store::SessionStore;

/// Client for the `/records/` and `/search/` endpoints.
#[derive(Clone)]
pub struct CatalogService {
    http: Arc<HttpClient>,
    token_getter: Option<TokenGetter>,
}

impl CatalogService {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            token_getter: None,
        }
    }

    /// Attach a bearer-token supplier. Catalog endpoints work anonymously
    /// too; the token is sent when available.
    pub fn with_token_getter(mut self, getter: TokenGetter) -> Self {
        self.token_getter = Some(getter);
        self
    }

    fn token(&self) -> Option<String> {
        self.token_getter.as_ref().and_then(|getter| getter())
    }

    /// One page of the catalog listing.
    pub async fn list(
        &self,
        page: Option<u32>,
        cancel: &CancellationToken,
    ) -> ClientResult<RecordPage> {
        let request = ApiRequest::get("/records/")
            .query_opt("page", page)
            .bearer(self.token());
        self.http.execute_json(request, cancel).await
    }

    /// One page of full-text search results.
    pub async fn search(
        &self,
        query: &str,
        page: Option<u32>,
        cancel: &CancellationToken,
    ) -> ClientResult<RecordPage> {
        let request = ApiRequest::get("/search/")
            .query("query", query)
            .query_opt("page", page)
            .bearer(self.token());
        self.http.execute_json(request, cancel).await
    }

    /// Look up a single record by id.
    pub async fn record_by_id(
        &self,
        id: &ApiId,
        cancel: &CancellationToken,
    ) -> ClientResult<Record> {
        let request = ApiRequest::get(format!("/records/{id}/")).bearer(self.token());
        self.http.execute_json(request, cancel).await
    }

    /// Look up a single record by slug.
    ///
    /// On a 404, falls back to a full-text search for the same slug and
    /// returns the exact slug match when present, else the first result.
    /// When the fallback finds nothing (or itself fails) the original 404
    /// propagates — this is best-effort recovery for slug mismatches between
    /// systems, not a guaranteed resolution.
    pub async fn record_by_slug(
        &self,
        slug: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<Record> {
        let request = ApiRequest::get(format!("/records/{slug}/")).bearer(self.token());
        let original = match self.http.execute_json(request, cancel).await {
            Ok(record) => return Ok(record),
            Err(err) if err.is_not_found() => err,
            Err(err) => return Err(err),
        };

        debug!(slug, "record lookup 404, trying search fallback");
        match self.search(slug, Some(1), cancel).await {
            Ok(page) => {
                let exact = page.results.iter().position(|r| r.slug == slug);
                match exact
                    .and_then(|i| page.results.get(i).cloned())
                    .or_else(|| page.results.into_iter().next())
                {
                    Some(record) => Ok(record),
                    None => Err(original),
                }
            }
            Err(fallback_err) => {
                debug!(slug, error = %fallback_err, "search fallback failed");
                Err(original)
            }
        }
    }

    /// Slug lookup with a session-store snapshot cache.
    ///
    /// A cached snapshot short-circuits the network entirely; a successful
    /// fetch writes the snapshot back. Malformed cache entries are a miss.
    pub async fn record_by_slug_cached(
        &self,
        store: &dyn SessionStore,
        slug: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<Record> {
        let key = cache::record_detail_key(slug);
        if let Some(cached) = cache::read_json::<Record>(store, &key) {
            debug!(slug, "record detail served from cache");
            return Ok(cached);
        }
        let record = self.record_by_slug(slug, cancel).await?;
        cache::write_json(store, &key, &record);
        Ok(record)
    }
}
