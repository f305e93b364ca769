// crates/edge/src/client.rs

use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use adapt::{SearchClient, SearchStore};
use domain::Entity;
use reqwest::{Method, Response, StatusCode, Url};
use serde_json::Value as Json;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::settings::SearchSettings;

// ─────────────────────────────────────────────────────────────────────────────
// Sync bridge: a private global current-thread runtime.
// Callers never need to be inside Tokio; they must not call from within one.
// ─────────────────────────────────────────────────────────────────────────────
static RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build search client runtime")
});

#[inline]
fn run_async<F: Future>(fut: F) -> F::Output {
    RUNTIME.block_on(fut)
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP search client
// ─────────────────────────────────────────────────────────────────────────────

/// [`SearchClient`] speaking the search engine's REST API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    http: reqwest::Client,
    base: Url,
    settings: SearchSettings,
}

impl HttpSearchClient {
    pub fn new(settings: SearchSettings) -> Result<Self> {
        let base = Url::parse(&settings.url)
            .map_err(|err| Error::config(format!("Invalid search url {}: {err}", settings.url)))?;
        if base.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Search url cannot be a base: {}",
                settings.url
            )));
        }

        // Environment proxies are ignored; the url is used as given.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .no_proxy()
            .build()?;

        Ok(Self {
            http,
            base,
            settings,
        })
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// A store of `E` documents in `index`, backed by this client.
    pub fn store<E: Entity>(self, index: impl Into<String>) -> SearchStore<E, Self> {
        SearchStore::new(self, index)
    }

    /// `base/segment/...` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn with_refresh(&self, mut url: Url) -> Url {
        url.query_pairs_mut()
            .append_pair("refresh", if self.settings.refresh { "true" } else { "false" });
        url
    }

    /// Send and return the response when its status is a success or is one of
    /// `tolerated`.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Json>,
        tolerated: &[StatusCode],
    ) -> Result<Response> {
        let mut builder = self.http.request(method.clone(), url.clone());
        if let Some(user) = &self.settings.username {
            builder = builder.basic_auth(user, self.settings.password.as_ref());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() || tolerated.contains(&status) {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%method, %url, %status, "search request failed");
        Err(Error::Status {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

impl SearchClient for HttpSearchClient {
    type Error = Error;

    #[tracing::instrument(skip_all, fields(index = %index, id = %id))]
    fn get(&self, index: &str, id: &str) -> Result<Option<Json>> {
        let url = self.endpoint(&[index, "_doc", id]);
        run_async(async {
            let response = self
                .send(Method::GET, url, None, &[StatusCode::NOT_FOUND])
                .await?;
            if response.status() == StatusCode::NOT_FOUND {
                debug!("document not found");
                return Ok(None);
            }

            let mut body: Json = response.json().await?;
            if body.get("found").and_then(Json::as_bool) == Some(false) {
                return Ok(None);
            }
            body.get_mut("_source")
                .map(Json::take)
                .map(Some)
                .ok_or_else(|| Error::response("document without _source"))
        })
    }

    #[tracing::instrument(skip_all, fields(index = %index, id = %id))]
    fn index(&self, index: &str, id: &str, document: &Json) -> Result<()> {
        let url = self.with_refresh(self.endpoint(&[index, "_doc", id]));
        run_async(async {
            self.send(Method::PUT, url, Some(document), &[]).await?;
            Ok(())
        })
    }

    #[tracing::instrument(skip_all, fields(index = %index, id = %id))]
    fn delete(&self, index: &str, id: &str) -> Result<bool> {
        let url = self.with_refresh(self.endpoint(&[index, "_doc", id]));
        run_async(async {
            let response = self
                .send(Method::DELETE, url, None, &[StatusCode::NOT_FOUND])
                .await?;
            Ok(response.status() != StatusCode::NOT_FOUND)
        })
    }

    #[tracing::instrument(skip_all, fields(index = %index))]
    fn search(&self, index: &str, body: &Json) -> Result<Json> {
        let mut url = self.endpoint(&[index, "_search"]);
        // An exact total lets the store detect reads cut short by `size`.
        url.query_pairs_mut()
            .append_pair("size", &self.settings.max_hits.to_string())
            .append_pair("track_total_hits", "true");
        run_async(async {
            let response = self.send(Method::POST, url, Some(body), &[]).await?;
            Ok(response.json::<Json>().await?)
        })
    }

    #[tracing::instrument(skip_all, fields(index = %index))]
    fn create_index(&self, index: &str, body: &Json) -> Result<()> {
        let url = self.endpoint(&[index]);
        run_async(async {
            self.send(Method::PUT, url, Some(body), &[]).await?;
            Ok(())
        })
    }

    #[tracing::instrument(skip_all, fields(index = %index))]
    fn delete_index(&self, index: &str) -> Result<()> {
        let url = self.endpoint(&[index]);
        run_async(async {
            self.send(Method::DELETE, url, None, &[StatusCode::NOT_FOUND])
                .await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> HttpSearchClient {
        let mut settings = SearchSettings::new(url);
        settings.timeout_ms = 5_000;
        HttpSearchClient::new(settings).unwrap()
    }

    #[test]
    fn rejects_invalid_urls() {
        assert!(matches!(
            HttpSearchClient::new(SearchSettings::new("not a url")),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            HttpSearchClient::new(SearchSettings::new("mailto:search@example.com")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn endpoints_encode_segments() {
        let c = client("http://localhost:9200/");
        assert_eq!(
            c.endpoint(&["items", "_doc", "a/b c"]).as_str(),
            "http://localhost:9200/items/_doc/a%2Fb%20c"
        );

        let c = client("http://localhost:9200/prefix");
        assert_eq!(
            c.with_refresh(c.endpoint(&["items"])).as_str(),
            "http://localhost:9200/prefix/items?refresh=true"
        );
    }
}
