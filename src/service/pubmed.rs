//! PubMed E-utilities client service
//!
//! Provides keyword search (esearch, JSON) and batched abstract fetch
//! (efetch, XML) against the NCBI literature database.

use std::env;

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Article, NO_ABSTRACT, NO_TITLE};

const PUBMED_API_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const PUBMED_BASE_URL_ENV: &str = "PUBMED_BASE_URL";
const NCBI_API_KEY_ENV: &str = "NCBI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum PubMedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Literature search seam consumed by the analysis service.
///
/// Both operations are total: any transport or parse failure resolves to an
/// empty list so that a failed step degrades the pipeline result instead of
/// aborting the request.
#[async_trait]
pub trait LiteratureSearch: Send + Sync {
    /// Search for article ids matching a query, in relevance order.
    async fn search(&self, query: &str, max_results: usize) -> Vec<String>;

    /// Fetch title and abstract for a batch of ids. May return fewer
    /// articles than ids were requested.
    async fn fetch_details(&self, pmids: &[String]) -> Vec<Article>;
}

/// Client for the NCBI E-utilities API
pub struct PubMedClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl PubMedClient {
    /// Create a new PubMed client
    ///
    /// The base URL is resolved in this order:
    /// 1. `PUBMED_BASE_URL` environment variable if set
    /// 2. Default NCBI E-utilities URL
    ///
    /// `NCBI_API_KEY`, when present, is attached to every request; its
    /// absence is not an error.
    pub fn new() -> Self {
        let base_url = env::var(PUBMED_BASE_URL_ENV)
            .ok()
            .unwrap_or_else(|| PUBMED_API_BASE_URL.to_string());

        Self {
            client: Client::new(),
            base_url,
            api_key: env::var(NCBI_API_KEY_ENV).ok(),
        }
    }

    async fn try_search(&self, query: &str, max_results: usize) -> Result<Vec<String>, PubMedError> {
        let url = format!("{}/esearch.fcgi", self.base_url);
        let retmax = max_results.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("db", "pubmed"),
            ("term", query),
            ("retmax", &retmax),
            ("sort", "relevance"),
            ("retmode", "json"),
        ];
        if let Some(ref key) = self.api_key {
            params.push(("api_key", key));
        }

        tracing::debug!(query = %query, retmax = max_results, "Searching PubMed");

        let response = self.client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(PubMedError::Status(response.status()));
        }

        let parsed: EsearchResponse = response
            .json()
            .await
            .map_err(|e| PubMedError::Parse(format!("Failed to deserialize esearch result: {}", e)))?;

        Ok(parsed.esearchresult.idlist)
    }

    async fn try_fetch_details(&self, pmids: &[String]) -> Result<Vec<Article>, PubMedError> {
        let url = format!("{}/efetch.fcgi", self.base_url);

        // POST keeps large id lists out of the URL
        let mut form: Vec<(&str, String)> = vec![
            ("db", "pubmed".to_string()),
            ("id", pmids.join(",")),
            ("retmode", "xml".to_string()),
        ];
        if let Some(ref key) = self.api_key {
            form.push(("api_key", key.clone()));
        }

        tracing::debug!(id_count = pmids.len(), "Fetching PubMed abstracts");

        let response = self.client.post(&url).form(&form).send().await?;

        if !response.status().is_success() {
            return Err(PubMedError::Status(response.status()));
        }

        let body = response.text().await?;
        parse_efetch_xml(&body)
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiteratureSearch for PubMedClient {
    async fn search(&self, query: &str, max_results: usize) -> Vec<String> {
        match self.try_search(query, max_results).await {
            Ok(ids) => {
                tracing::debug!(id_count = ids.len(), "PubMed search completed");
                ids
            }
            Err(e) => {
                tracing::warn!(error = %e, "PubMed search failed, returning no results");
                Vec::new()
            }
        }
    }

    async fn fetch_details(&self, pmids: &[String]) -> Vec<Article> {
        if pmids.is_empty() {
            return Vec::new();
        }

        match self.try_fetch_details(pmids).await {
            Ok(articles) => {
                tracing::debug!(
                    requested = pmids.len(),
                    fetched = articles.len(),
                    "PubMed abstract fetch completed"
                );
                articles
            }
            Err(e) => {
                tracing::warn!(error = %e, "PubMed abstract fetch failed, returning no articles");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct EsearchResponse {
    #[serde(default)]
    esearchresult: EsearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// Which leaf element's text is currently being collected
enum Capture {
    Pmid,
    Title,
    AbstractText,
}

#[derive(Default)]
struct PendingArticle {
    pmid: Option<String>,
    title: Option<String>,
    abstract_parts: Vec<String>,
}

impl PendingArticle {
    fn into_article(self) -> Article {
        Article {
            pmid: self.pmid.unwrap_or_default(),
            title: self.title.unwrap_or_else(|| NO_TITLE.to_string()),
            abstract_text: if self.abstract_parts.is_empty() {
                NO_ABSTRACT.to_string()
            } else {
                self.abstract_parts.join(" ")
            },
        }
    }
}

/// Parse an efetch `PubmedArticleSet` payload into articles.
///
/// Per `PubmedArticle` record: first `PMID`, first `ArticleTitle` (inline
/// markup flattened to its text), and every `AbstractText` directly under
/// `Abstract`, joined by single spaces. Records may omit title or abstract;
/// placeholders are substituted.
fn parse_efetch_xml(xml: &str) -> Result<Vec<Article>, PubMedError> {
    let mut reader = Reader::from_str(xml);

    let mut articles = Vec::new();
    let mut current: Option<PendingArticle> = None;
    let mut in_abstract = false;
    let mut capture: Option<Capture> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Err(e) => return Err(PubMedError::Parse(e.to_string())),
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"PubmedArticle" => {
                    current = Some(PendingArticle::default());
                    in_abstract = false;
                    capture = None;
                }
                b"Abstract" => in_abstract = true,
                b"PMID" => {
                    // Only the record's own PMID; later ones (e.g. comment
                    // cross-references) are ignored.
                    if capture.is_none()
                        && current.as_ref().map(|a| a.pmid.is_none()).unwrap_or(false)
                    {
                        capture = Some(Capture::Pmid);
                        text.clear();
                    }
                }
                b"ArticleTitle" => {
                    if capture.is_none()
                        && current.as_ref().map(|a| a.title.is_none()).unwrap_or(false)
                    {
                        capture = Some(Capture::Title);
                        text.clear();
                    }
                }
                b"AbstractText" => {
                    if capture.is_none() && in_abstract && current.is_some() {
                        capture = Some(Capture::AbstractText);
                        text.clear();
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                if capture.is_some() {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| PubMedError::Parse(e.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"PubmedArticle" => {
                    if let Some(article) = current.take() {
                        articles.push(article.into_article());
                    }
                }
                b"Abstract" => in_abstract = false,
                b"PMID" => {
                    if matches!(capture, Some(Capture::Pmid)) {
                        if let Some(ref mut article) = current {
                            article.pmid = Some(text.trim().to_string());
                        }
                        capture = None;
                    }
                }
                b"ArticleTitle" => {
                    if matches!(capture, Some(Capture::Title)) {
                        if let Some(ref mut article) = current {
                            article.title = Some(text.trim().to_string());
                        }
                        capture = None;
                    }
                }
                b"AbstractText" => {
                    if matches!(capture, Some(Capture::AbstractText)) {
                        if let Some(ref mut article) = current {
                            let part = text.trim().to_string();
                            if !part.is_empty() {
                                article.abstract_parts.push(part);
                            }
                        }
                        capture = None;
                    }
                }
                _ => {}
            },
            Ok(_) => {}
        }
    }

    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_EFETCH: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID Version="1">111</PMID>
      <Article>
        <ArticleTitle>Coffee consumption and <i>cancer</i> risk</ArticleTitle>
        <Abstract>
          <AbstractText Label="BACKGROUND">Part one.</AbstractText>
          <AbstractText Label="RESULTS">Part two.</AbstractText>
        </Abstract>
      </Article>
      <CommentsCorrectionsList>
        <CommentsCorrections RefType="CommentIn">
          <PMID Version="1">999</PMID>
        </CommentsCorrections>
      </CommentsCorrectionsList>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>222</PMID>
      <Article>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn efetch_parses_records_in_order() {
        let articles = parse_efetch_xml(SAMPLE_EFETCH).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].pmid, "111");
        assert_eq!(articles[1].pmid, "222");
    }

    #[test]
    fn efetch_flattens_inline_markup_in_title() {
        let articles = parse_efetch_xml(SAMPLE_EFETCH).unwrap();
        assert_eq!(articles[0].title, "Coffee consumption and cancer risk");
    }

    #[test]
    fn efetch_joins_abstract_sections_with_spaces() {
        let articles = parse_efetch_xml(SAMPLE_EFETCH).unwrap();
        assert_eq!(articles[0].abstract_text, "Part one. Part two.");
    }

    #[test]
    fn efetch_substitutes_placeholders_for_missing_fields() {
        let articles = parse_efetch_xml(SAMPLE_EFETCH).unwrap();
        assert_eq!(articles[1].title, NO_TITLE);
        assert_eq!(articles[1].abstract_text, NO_ABSTRACT);
    }

    #[test]
    fn efetch_ignores_cross_reference_pmids() {
        let articles = parse_efetch_xml(SAMPLE_EFETCH).unwrap();
        assert_eq!(articles[0].pmid, "111");
        assert!(articles.iter().all(|a| a.pmid != "999"));
    }

    #[test]
    fn efetch_empty_result_set() {
        let articles = parse_efetch_xml("<PubmedArticleSet></PubmedArticleSet>").unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn efetch_rejects_malformed_xml() {
        let result =
            parse_efetch_xml("<PubmedArticleSet><PubmedArticle></Mismatch></PubmedArticleSet>");
        assert!(matches!(result, Err(PubMedError::Parse(_))));
    }

    #[test]
    fn esearch_response_extracts_id_list() {
        let json = r#"{
            "header": {"type": "esearch", "version": "0.3"},
            "esearchresult": {
                "count": "2",
                "retmax": "2",
                "idlist": ["38881111", "38882222"]
            }
        }"#;
        let parsed: EsearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.esearchresult.idlist, vec!["38881111", "38882222"]);
    }

    #[test]
    fn esearch_response_defaults_missing_fields() {
        let parsed: EsearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.esearchresult.idlist.is_empty());
    }

    fn unreachable_client() -> PubMedClient {
        client_for("http://127.0.0.1:1/eutils".to_string())
    }

    fn client_for(base_url: String) -> PubMedClient {
        PubMedClient {
            client: Client::new(),
            base_url,
            api_key: None,
        }
    }

    /// Serve a single canned HTTP response on an ephemeral local port and
    /// return a base URL pointing at it.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 8192];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        format!("http://{addr}/eutils")
    }

    #[tokio::test]
    async fn search_extracts_ids_from_esearch_json() {
        let base_url = serve_once(
            "200 OK",
            r#"{"esearchresult": {"idlist": ["111", "222"]}}"#,
        )
        .await;
        let client = client_for(base_url);

        let ids = client.search("coffee cancer", 10).await;

        assert_eq!(ids, vec!["111", "222"]);
    }

    #[tokio::test]
    async fn search_fails_soft_on_server_error() {
        let base_url = serve_once("500 Internal Server Error", "").await;
        let client = client_for(base_url);

        let ids = client.search("coffee cancer", 10).await;

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn search_fails_soft_on_malformed_json() {
        let base_url = serve_once("200 OK", "<html>not json</html>").await;
        let client = client_for(base_url);

        let ids = client.search("coffee cancer", 10).await;

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn fetch_details_fails_soft_on_server_error() {
        let base_url = serve_once("500 Internal Server Error", "").await;
        let client = client_for(base_url);

        let articles = client.fetch_details(&["111".to_string()]).await;

        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn search_fails_soft_on_unreachable_host() {
        let client = unreachable_client();
        let ids = client.search("coffee cancer", 10).await;
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn fetch_details_fails_soft_on_unreachable_host() {
        let client = unreachable_client();
        let articles = client.fetch_details(&["111".to_string()]).await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn fetch_details_empty_input_short_circuits() {
        let client = unreachable_client();
        let articles = client.fetch_details(&[]).await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn search_live_pubmed() {
        let client = PubMedClient::new();
        let ids = client.search("aspirin cardiovascular", 3).await;
        assert!(!ids.is_empty());
    }
}
