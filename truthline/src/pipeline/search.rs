use crate::error::SearchError;
use crate::models::SourceRef;
use crate::pipeline::traits::SearchBackend;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const DUCKDUCKGO_HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

static RESULT_URL_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*\bclass\s*=\s*"[^"]*\bresult__url\b[^"]*"[^>]*>(.*?)</a>"#)
        .expect("static regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

/// Infallible search front used by the pipeline.
///
/// Search is advisory: transport failures, timeouts and unreadable pages all
/// come back as an empty list. Results are deduplicated and capped at
/// `max_results`, preserving provider order. No retries.
pub struct SearchClient<B: SearchBackend + ?Sized> {
    backend: Arc<B>,
}

impl<B: SearchBackend + ?Sized> Clone for SearchClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: SearchBackend + ?Sized> SearchClient<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn search(&self, query: &str, max_results: usize) -> Vec<SourceRef> {
        if max_results == 0 {
            return Vec::new();
        }
        match self.backend.lookup(query).await {
            Ok(found) => {
                let sources = dedup_capped(found, max_results);
                debug!(query, count = sources.len(), "search completed");
                sources
            }
            Err(err) => {
                warn!(query, error = %err, "search failed, continuing without sources");
                Vec::new()
            }
        }
    }
}

fn dedup_capped(found: Vec<SourceRef>, max_results: usize) -> Vec<SourceRef> {
    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|s| !s.as_str().is_empty())
        .filter(|s| seen.insert(s.clone()))
        .take(max_results)
        .collect()
}

/// Scrapes the DuckDuckGo HTML results page.
pub struct DuckDuckGoBackend {
    client: Client,
    endpoint: Url,
}

impl DuckDuckGoBackend {
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        Self::with_endpoint(DUCKDUCKGO_HTML_ENDPOINT, timeout)
    }

    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
        })
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoBackend {
    async fn lookup(&self, query: &str) -> Result<Vec<SourceRef>, SearchError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(extract_result_urls(&body))
    }
}

/// Pulls the displayed result locations out of a DuckDuckGo HTML page, in page
/// order. Returns an empty list when the markup is not recognised.
pub fn extract_result_urls(html: &str) -> Vec<SourceRef> {
    RESULT_URL_ANCHOR
        .captures_iter(html)
        .filter_map(|caps| {
            let inner = TAG.replace_all(&caps[1], "");
            let text = decode_entities(inner.trim());
            if text.is_empty() {
                None
            } else {
                Some(SourceRef::new(text))
            }
        })
        .collect()
}

const ENTITIES: [(&str, &str); 7] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#x27;", "'"),
    ("&#39;", "'"),
    ("&nbsp;", " "),
];

/// Single left-to-right pass; decoded output is never decoded again.
fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| tail.starts_with(entity)) {
            Some((entity, decoded)) => {
                out.push_str(decoded);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::mock::{http_stub, FailingSearch, StaticSearch};

    const PAGE: &str = r#"
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title"><a class="result__a" href="//duckduckgo.com/l/?uddg=a">Eiffel Tower</a></h2>
  <div class="result__extras__url">
    <a class="result__url" href="//duckduckgo.com/l/?uddg=a">
      en.wikipedia.org/wiki/Eiffel_Tower
    </a>
  </div>
</div>
<div class="result">
  <a class="result__url" href="//duckduckgo.com/l/?uddg=b"><b>www.toureiffel.paris</b>/en</a>
</div>
<div class="result">
  <a href="x" class="result__url js-result-url">history.com/topics/a&amp;b</a>
</div>
"#;

    #[test]
    fn extracts_result_urls_in_page_order() {
        let urls = extract_result_urls(PAGE);
        let urls: Vec<&str> = urls.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "en.wikipedia.org/wiki/Eiffel_Tower",
                "www.toureiffel.paris/en",
                "history.com/topics/a&b",
            ]
        );
    }

    #[test]
    fn entities_are_decoded_once() {
        assert_eq!(decode_entities("example.com/?q=&amp;lt;b&amp;gt;"), "example.com/?q=&lt;b&gt;");
        assert_eq!(decode_entities("a&amp;b &lt;c&gt; & d&unknown;"), "a&b <c> & d&unknown;");
        let page = r#"<a class="result__url" href="x">example.com/?q=&amp;lt;b&amp;gt;</a>"#;
        assert_eq!(extract_result_urls(page), vec![SourceRef::new("example.com/?q=&lt;b&gt;")]);
    }

    #[test]
    fn unrecognised_markup_yields_nothing() {
        assert!(extract_result_urls("<html><body>captcha</body></html>").is_empty());
    }

    #[tokio::test]
    async fn search_dedups_and_caps() {
        let backend = Arc::new(StaticSearch::new(["a.com", "b.org", "a.com", "c.net", "d.io"]));
        let client = SearchClient::new(backend);
        let found = client.search("q", 3).await;
        assert_eq!(
            found,
            vec![SourceRef::new("a.com"), SourceRef::new("b.org"), SourceRef::new("c.net")]
        );
        assert_eq!(client.search("q", 1).await.len(), 1);
        assert!(client.search("q", 0).await.is_empty());
    }

    fn backend_at(addr: std::net::SocketAddr, timeout: Duration) -> DuckDuckGoBackend {
        DuckDuckGoBackend::with_endpoint(&format!("http://{addr}/html/"), timeout).unwrap()
    }

    #[tokio::test]
    async fn query_is_form_encoded_with_browser_agent() {
        let (addr, head) = http_stub::respond_once("200 OK", PAGE).await;
        let client = SearchClient::new(Arc::new(backend_at(addr, Duration::from_secs(5))));

        let found = client.search("café & co", 2).await;

        assert_eq!(
            found,
            vec![
                SourceRef::new("en.wikipedia.org/wiki/Eiffel_Tower"),
                SourceRef::new("www.toureiffel.paris/en"),
            ]
        );
        let head = head.await.unwrap();
        assert_eq!(head.lines().next().unwrap(), "GET /html/?q=caf%C3%A9+%26+co HTTP/1.1");
        assert!(head
            .to_lowercase()
            .contains("user-agent: mozilla/5.0 (windows nt 10.0; win64; x64) applewebkit/537.36"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error_and_degrades() {
        let (addr, _head) = http_stub::respond_once("503 Service Unavailable", "").await;
        let err = backend_at(addr, Duration::from_secs(5)).lookup("q").await.unwrap_err();
        assert!(matches!(err, SearchError::Status(503)));

        let (addr, _head) = http_stub::respond_once("503 Service Unavailable", "").await;
        let client = SearchClient::new(Arc::new(backend_at(addr, Duration::from_secs(5))));
        assert!(client.search("q", 3).await.is_empty());
    }

    #[tokio::test]
    async fn silent_provider_hits_the_timeout() {
        let addr = http_stub::silent().await;
        let backend = Arc::new(backend_at(addr, Duration::from_millis(200)));

        let started = std::time::Instant::now();
        match backend.lookup("q").await {
            Err(SearchError::Request(err)) => assert!(err.is_timeout()),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(SearchClient::new(backend).search("q", 3).await.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn backend_failure_degrades_to_empty() {
        let backend = Arc::new(FailingSearch::default());
        let client = SearchClient::new(backend.clone());
        assert!(client.search("anything", 3).await.is_empty());
        assert_eq!(backend.calls(), 1);
    }
}
