use crate::api::EnvConfig;
use crate::models::Cat;

/// Page size requested from the cat API on every fetch. The end of the
/// source is signalled by a batch shorter than this.
pub(crate) const PAGE_SIZE: usize = 15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SourceErrorKind {
    Network,
    Http,
    Parse,
}

/// Failure talking to the external image source. Always retryable with the
/// same cursor; the accumulator owns the cursor and never advances it on error.
#[derive(Clone, Debug)]
pub(crate) struct SourceError {
    pub kind: SourceErrorKind,
    pub message: String,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl SourceError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: SourceErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: SourceErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, ctx: &str) -> Self {
        Self {
            kind: SourceErrorKind::Http,
            message: format!("{ctx} ({status})"),
        }
    }
}

pub(crate) type SourceResult<T> = Result<T, SourceError>;

/// One fetched page plus the size that was asked for, so the consumer can
/// detect a short (exhausting) batch without knowing the page-size constant.
#[derive(Clone, Debug)]
pub(crate) struct CatBatch {
    pub cats: Vec<Cat>,
    pub requested: usize,
}

/// Stateless client for the external image-search API.
#[derive(Clone)]
pub(crate) struct CatSourceClient {
    base_url: String,
    api_key: Option<String>,
}

impl CatSourceClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self { base_url, api_key }
    }

    pub fn from_env() -> Self {
        let cfg = EnvConfig::new();
        Self::new(cfg.cat_api_url, cfg.cat_api_key)
    }

    fn with_key(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(key) = &self.api_key {
            req = req.header("x-api-key", key);
        }
        req
    }

    /// Fetches one page of the search feed. `page` is the 1-based cursor.
    pub async fn fetch_page(&self, page: u32) -> SourceResult<CatBatch> {
        let client = reqwest::Client::new();
        let url = format!(
            "{}/images/search?limit={}&page={}",
            self.base_url, PAGE_SIZE, page
        );

        let res = self
            .with_key(client.get(url))
            .send()
            .await
            .map_err(SourceError::network)?;

        if !res.status().is_success() {
            return Err(SourceError::http(res.status(), "Fetching cats failed"));
        }

        let cats: Vec<Cat> = res.json().await.map_err(SourceError::parse)?;

        Ok(CatBatch {
            cats,
            requested: PAGE_SIZE,
        })
    }

    /// Resolves a single image by id (used to display favorites).
    pub async fn fetch_by_id(&self, id: &str) -> SourceResult<Cat> {
        let client = reqwest::Client::new();
        let url = format!("{}/images/{}", self.base_url, id);

        let res = self
            .with_key(client.get(url))
            .send()
            .await
            .map_err(SourceError::network)?;

        if !res.status().is_success() {
            return Err(SourceError::http(res.status(), "Fetching cat failed"));
        }

        res.json().await.map_err(SourceError::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_contract_deserialize() {
        // The search endpoint returns a bare array with extra fields we ignore.
        let json = r#"[
            {"id": "a1", "url": "https://cdn/a1.jpg", "width": 500, "height": 400},
            {"id": "b2", "url": "https://cdn/b2.png", "breeds": []}
        ]"#;
        let cats: Vec<Cat> = serde_json::from_str(json).expect("search batch should parse");
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].id, "a1");
        assert_eq!(cats[1].url, "https://cdn/b2.png");
    }
}
