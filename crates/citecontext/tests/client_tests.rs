//! Mock-based tests for the Graph API client: search, pagination, earliest
//! publication year, status mapping and the disk cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use citecontext::client::{PublicationYears, SemanticScholarClient};
use citecontext::config::Config;
use citecontext::error::ClientError;
use citecontext::pipeline::{fetch_author_papers, resolve_author, scan_citations};
use citecontext::PipelineError;

fn setup_client(mock_server: &MockServer) -> SemanticScholarClient {
    SemanticScholarClient::new(Config::for_testing(&mock_server.uri())).unwrap()
}

fn author(id: &str, name: &str, papers: i32, affiliation: &str) -> serde_json::Value {
    json!({
        "authorId": id,
        "name": name,
        "affiliations": [affiliation],
        "paperCount": papers,
        "citationCount": papers * 10,
        "hIndex": papers / 4
    })
}

/// Answers `publicationDateOrYear=:Y` queries as if the author's first paper
/// appeared in `first_year`.
struct FirstPaperIn {
    first_year: Option<i32>,
}

impl Respond for FirstPaperIn {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let up_to: Option<i32> = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "publicationDateOrYear")
            .and_then(|(_, v)| v.trim_start_matches(':').parse().ok());

        let data = match (self.first_year, up_to) {
            (Some(first), Some(y)) if first <= y => json!([{"paperId": "x", "year": first}]),
            _ => json!([]),
        };
        ResponseTemplate::new(200).set_body_json(json!({"offset": 0, "data": data}))
    }
}

/// Serves `total` citations for any paper, honoring `offset` and `limit`.
struct CitationPages {
    total: usize,
}

impl Respond for CitationPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let offset = query_usize(request, "offset");
        let limit = query_usize(request, "limit");
        let data: Vec<_> = (offset..self.total.min(offset + limit))
            .map(|i| json!({"citingPaper": {"paperId": format!("c{i}")}, "contexts": [], "isInfluential": false}))
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({"offset": offset, "data": data}))
    }
}

fn query_usize(request: &Request, name: &str) -> usize {
    request.url.query_pairs().find(|(k, _)| k == name).and_then(|(_, v)| v.parse().ok()).unwrap_or(0)
}

async fn mount_citation_pages(mock_server: &MockServer, total: usize) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/graph/v1/paper/[^/]+/citations$"))
        .respond_with(CitationPages { total })
        .mount(mock_server)
        .await;
}

/// `(offset, limit)` of every citations request the server saw.
async fn citation_requests(mock_server: &MockServer) -> Vec<(usize, usize)> {
    mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| (query_usize(r, "offset"), query_usize(r, "limit")))
        .collect()
}

// =============================================================================
// Author resolution
// =============================================================================

#[tokio::test]
async fn test_resolve_author_prefers_affiliation_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/search"))
        .and(query_param("query", "Jane Doe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "data": [
                author("1", "Jane Doe", 300, "Elsewhere University"),
                author("2", "Jane Doe", 40, "Shanghai Jiao Tong University"),
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);

    let chosen = resolve_author(&client, "Jane Doe", None, false).await.unwrap();
    assert_eq!(chosen.author_id, "1");

    let chosen = resolve_author(&client, "Jane Doe", Some("jiao tong"), false).await.unwrap();
    assert_eq!(chosen.author_id, "2");
}

#[tokio::test]
async fn test_resolve_author_strict_rejects_near_tie() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                author("1", "Wei Zhang", 100, "A"),
                author("2", "Wei Zhang", 100, "B"),
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);

    let err = resolve_author(&client, "Wei Zhang", None, true).await.unwrap_err();
    match err {
        PipelineError::AmbiguousAuthor { candidates } => {
            assert_eq!(candidates.len(), 2);
            assert!(candidates[0].contains("authorId=1"));
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }

    // Not strict: first of the tied candidates wins.
    let chosen = resolve_author(&client, "Wei Zhang", None, false).await.unwrap();
    assert_eq!(chosen.author_id, "1");
}

#[tokio::test]
async fn test_resolve_author_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "data": null})))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = resolve_author(&client, "Nobody", None, false).await.unwrap_err();
    assert!(matches!(err, PipelineError::AuthorNotFound(name) if name == "Nobody"));
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn test_fetch_author_papers_follows_pages() {
    let mock_server = MockServer::start().await;

    let full_page: Vec<_> = (0..100).map(|i| json!({"paperId": format!("p{i}")})).collect();
    Mock::given(method("GET"))
        .and(path("/graph/v1/author/42/papers"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"offset": 0, "next": 100, "data": full_page})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/42/papers"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 100,
            "data": [{"paperId": "p100"}, {"paperId": "p101"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let papers = fetch_author_papers(&client, "42").await.unwrap();

    assert_eq!(papers.len(), 102);
    assert_eq!(papers[101].id(), "p101");
}

#[tokio::test]
async fn test_scan_citations_reads_short_second_page() {
    let mock_server = MockServer::start().await;
    mount_citation_pages(&mock_server, 137).await;
    let client = setup_client(&mock_server);

    let citations = scan_citations(&client, "p1", 1000).await.unwrap();

    assert_eq!(citations.len(), 137);
    assert_eq!(citations[136].citing_paper.as_ref().unwrap().id(), "c136");
    assert_eq!(citation_requests(&mock_server).await, vec![(0, 100), (100, 100)]);
}

#[tokio::test]
async fn test_scan_citations_shrinks_last_request_to_max_items() {
    let mock_server = MockServer::start().await;
    mount_citation_pages(&mock_server, 500).await;
    let client = setup_client(&mock_server);

    let citations = scan_citations(&client, "p1", 150).await.unwrap();

    assert_eq!(citations.len(), 150);
    assert_eq!(citation_requests(&mock_server).await, vec![(0, 100), (100, 50)]);
}

#[tokio::test]
async fn test_scan_citations_stops_on_empty_page() {
    let mock_server = MockServer::start().await;
    mount_citation_pages(&mock_server, 100).await;
    let client = setup_client(&mock_server);

    let citations = scan_citations(&client, "p1", 1000).await.unwrap();

    assert_eq!(citations.len(), 100);
    assert_eq!(citation_requests(&mock_server).await, vec![(0, 100), (100, 100)]);
}

#[tokio::test]
async fn test_ids_are_escaped_as_single_path_segments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/a%2Fb%3Fc/papers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"offset": 0, "data": [{"paperId": "p1"}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let page = client.get_author_papers("a/b?c", 0, 10, &["year"], None).await.unwrap();
    assert_eq!(page.data.len(), 1);
}

// =============================================================================
// Throttling
// =============================================================================

#[tokio::test]
async fn test_min_interval_spaces_requests_without_delaying_the_first() {
    let mock_server = MockServer::start().await;
    mount_citation_pages(&mock_server, 0).await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.min_interval = Duration::from_millis(1500);
    let client = SemanticScholarClient::new(config).unwrap();

    let start = Instant::now();
    client.get_citations("p1", 0, 10).await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(1500));

    client.get_citations("p2", 0, 10).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(1500));
}

// =============================================================================
// Earliest publication year
// =============================================================================

#[tokio::test]
async fn test_earliest_year_binary_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/7/papers"))
        .and(query_param("limit", "1"))
        .respond_with(FirstPaperIn { first_year: Some(1987) })
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);

    assert_eq!(client.earliest_publication_year("7", Some(2020)).await.unwrap(), Some(1987));
    assert_eq!(client.earliest_publication_year("7", Some(1987)).await.unwrap(), Some(1987));
    assert_eq!(client.earliest_publication_year("7", Some(1986)).await.unwrap(), None);
}

#[tokio::test]
async fn test_earliest_year_is_memoized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/8/papers"))
        .respond_with(FirstPaperIn { first_year: None })
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);

    assert_eq!(client.earliest_publication_year("8", Some(2024)).await.unwrap(), None);
    assert_eq!(client.earliest_publication_year("8", Some(2024)).await.unwrap(), None);
}

#[tokio::test]
async fn test_earliest_year_blank_id_skips_network() {
    let mock_server = MockServer::start().await;
    let client = setup_client(&mock_server);

    assert_eq!(client.earliest_publication_year("  ", None).await.unwrap(), None);
    assert!(mock_server.received_requests().await.unwrap_or_default().is_empty());
}

// =============================================================================
// Status mapping
// =============================================================================

#[tokio::test]
async fn test_status_mapping() {
    let mock_server = MockServer::start().await;

    let cases: HashMap<&str, ResponseTemplate> = HashMap::from([
        ("p404", ResponseTemplate::new(404).set_body_string("Paper not found")),
        ("p429", ResponseTemplate::new(429).insert_header("Retry-After", "7")),
        ("p503", ResponseTemplate::new(503).set_body_string("busy")),
        ("p400", ResponseTemplate::new(400).set_body_string("bad fields")),
    ]);
    for (id, response) in cases {
        Mock::given(method("GET"))
            .and(path(format!("/graph/v1/paper/{id}/citations")))
            .respond_with(response)
            .mount(&mock_server)
            .await;
    }

    let client = setup_client(&mock_server);

    let err = client.get_citations("p404", 0, 10).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));

    let err = client.get_citations("p429", 0, 10).await.unwrap_err();
    assert!(
        matches!(err, ClientError::RateLimited { retry_after } if retry_after == Duration::from_secs(7))
    );

    let err = client.get_citations("p503", 0, 10).await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 503, .. }));

    let err = client.get_citations("p400", 0, 10).await.unwrap_err();
    assert!(matches!(err, ClientError::BadRequest { .. }));
}

// =============================================================================
// Disk cache
// =============================================================================

#[tokio::test]
async fn test_disk_cache_serves_repeat_requests() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/p1/citations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 0,
            "data": [{"citingPaper": {"paperId": "c1"}, "contexts": ["see [3]"], "isInfluential": true}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.cache_dir = Some(dir.path().to_path_buf());

    let client = SemanticScholarClient::new(config.clone()).unwrap();
    let first = client.get_citations("p1", 0, 10).await.unwrap();

    // A fresh client reads the same entry from disk.
    let client = SemanticScholarClient::new(config).unwrap();
    let second = client.get_citations("p1", 0, 10).await.unwrap();

    assert_eq!(first.data.len(), 1);
    assert_eq!(second.data[0].contexts, vec!["see [3]"]);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_disk_cache_keys_include_params() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/p1/citations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.cache_dir = Some(dir.path().to_path_buf());
    let client = SemanticScholarClient::new(config).unwrap();

    client.get_citations("p1", 0, 10).await.unwrap();
    client.get_citations("p1", 10, 10).await.unwrap();
    client.get_citations("p1", 0, 10).await.unwrap();
}

#[test]
fn test_client_debug_hides_api_key() {
    let mut config = Config::new(Some("super-secret-key".to_string()));
    config.cache_dir = None;
    let client = SemanticScholarClient::new(config).unwrap();
    let debug = format!("{client:?}");
    assert!(!debug.contains("super-secret-key"));
    assert!(debug.contains("has_api_key"));
}
